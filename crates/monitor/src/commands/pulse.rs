//! Tachometer RPM sampling.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use esc_telemetry_pulse_rpm::PulseRateEstimator;
use tokio::time::MissedTickBehavior;
use tracing::info;

use crate::commands::PulseArgs;
use crate::config::MonitorConfig;
use crate::error::MonitorError;
use crate::output::{self, RpmReport};
use crate::transport::{EdgeInput, EdgeSource, SimulatedEdges};

pub async fn execute(args: &PulseArgs, mut config: MonitorConfig, json: bool) -> Result<()> {
    args.apply(&mut config.pulse);
    config.validate()?;

    let ppr = NonZeroU32::new(config.pulse.pulses_per_revolution).ok_or_else(|| {
        MonitorError::InvalidConfiguration("pulse.pulses_per_revolution must be positive".into())
    })?;
    let estimator = Arc::new(PulseRateEstimator::with_pulses_per_revolution(
        ppr,
        Instant::now(),
    ));

    let source: Box<dyn EdgeSource> = match args.simulate_hz {
        Some(hz) => Box::new(SimulatedEdges::spawn(Arc::clone(&estimator), hz)?),
        None => Box::new(EdgeInput::open(config.pulse.pin, Arc::clone(&estimator))?),
    };
    info!(
        source = %source.label(),
        interval_ms = config.pulse.interval_ms,
        pulses_per_revolution = ppr.get(),
        "sampling pulse rate"
    );

    // Discard edges counted before the first full window.
    estimator.sample_now();
    let reports = run_sampler(&estimator, config.pulse.interval(), args.count, json).await?;

    drop(source);
    info!(reports, "pulse sampler finished");
    Ok(())
}

/// Print one RPM report per `interval` until `count` is reached or Ctrl+C.
async fn run_sampler(
    estimator: &PulseRateEstimator,
    interval: Duration,
    count: Option<u64>,
    json: bool,
) -> Result<u64> {
    let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut reports = 0u64;
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let window = estimator.sample_window(Instant::now());
                output::print_rpm(&RpmReport::from(window), json)?;
                reports += 1;
                if count.is_some_and(|count| reports >= count) {
                    break;
                }
            }
            result = &mut ctrl_c => {
                result?;
                output::print_banner("Program terminated by user.", json);
                break;
            }
        }
    }
    Ok(reports)
}
