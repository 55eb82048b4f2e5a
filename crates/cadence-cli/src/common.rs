//! Setup shared by the compile and plan commands.

use std::fs::File;
use std::num::NonZeroUsize;

use anyhow::Context;
use cadence_config::Config;
use cadence_core::Schedule;

use crate::Cli;

/// Resolve the config file and apply command-line overrides.
pub(crate) fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = Config::resolve(cli.config.as_deref())?;

    if let Some(engine) = cli.engine {
        config.speech.engine = engine;
    }
    if let Some(voice) = &cli.voice {
        config.speech.voice.clone_from(voice);
    }
    if let Some(rate) = cli.sample_rate {
        config.audio.sample_rate = rate;
    }
    if let Some(bitrate) = &cli.bitrate {
        config.export.bitrate.clone_from(bitrate);
    }
    if let Some(depth) = cli.bit_depth {
        config.export.bit_depth = depth;
    }

    config.validate()?;
    tracing::debug!(?config, "configuration");
    Ok(config)
}

/// Read and validate the schedule. Nothing is synthesized if this fails.
pub(crate) fn load_schedule(cli: &Cli) -> anyhow::Result<Schedule> {
    let file = File::open(&cli.input)
        .with_context(|| format!("failed to open schedule '{}'", cli.input.display()))?;
    let schedule = Schedule::from_csv(file, cli.variant)
        .map_err(cadence_core::Error::from)
        .with_context(|| format!("failed to read schedule '{}'", cli.input.display()))?;

    tracing::info!(
        segments = schedule.len(),
        total_seconds = schedule.total_duration_seconds(),
        variant = ?schedule.variant(),
        "schedule loaded"
    );
    Ok(schedule)
}

/// Worker count: `--jobs`, else one per available core.
pub(crate) fn jobs(cli: &Cli) -> usize {
    cli.jobs
        .or_else(|| std::thread::available_parallelism().ok())
        .map_or(1, NonZeroUsize::get)
}
