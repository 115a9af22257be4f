use anyhow::Result;

use crate::output;
use crate::transport::list_ports;

/// List serial ports the operating system reports.
pub fn execute(json: bool) -> Result<()> {
    let ports = list_ports()?;
    output::print_ports(&ports, json);
    Ok(())
}
