use anyhow::Result;

use crate::config::MonitorConfig;
use crate::error::MonitorError;

/// Print the effective configuration.
pub fn execute(config: &MonitorConfig, json: bool) -> Result<()> {
    config.validate()?;
    if json {
        let text = serde_json::to_string_pretty(config).map_err(MonitorError::from)?;
        println!("{text}");
    } else {
        print!("{}", config.to_yaml()?);
    }
    Ok(())
}
