//! Cadence CLI - compiles an interval workout schedule into one audio track.

mod common;
mod compile;
mod plan;

use std::num::NonZeroUsize;
use std::path::PathBuf;

use cadence_core::ScheduleVariant;
use cadence_synth::SpeechEngine;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cadence")]
#[command(author, version, about = "Interval workout audio compiler", long_about = None)]
struct Cli {
    /// Workout schedule (CSV)
    #[arg(short, long, default_value = "interval.csv")]
    input: PathBuf,

    /// Output audio file (.mp3 or .wav)
    #[arg(short, long, default_value = "interval_music.mp3")]
    output: PathBuf,

    /// Background music, looped under the cues
    #[arg(short, long, default_value = "music.mp3")]
    music: PathBuf,

    /// Beep asset used for every tone in the minimal variant
    #[arg(long, default_value = "beep.mp3")]
    beep: PathBuf,

    /// Use silence instead of background music
    #[arg(long)]
    debug: bool,

    /// Schedule variant: minimal or extended
    #[arg(long, default_value = "extended", value_parser = parse_variant)]
    variant: ScheduleVariant,

    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Concurrent synthesis requests [default: available cores]
    #[arg(short, long)]
    jobs: Option<NonZeroUsize>,

    /// Speech engine: say, espeak or silent
    #[arg(long, value_parser = parse_engine)]
    engine: Option<SpeechEngine>,

    /// Voice passed to the speech engine
    #[arg(long)]
    voice: Option<String>,

    /// Sample rate of the mix in Hz
    #[arg(long)]
    sample_rate: Option<u32>,

    /// MP3 bitrate (e.g. 192k)
    #[arg(long)]
    bitrate: Option<String>,

    /// WAV bit depth (16, 24, or 32)
    #[arg(long)]
    bit_depth: Option<u16>,

    /// Validate the schedule and print the cue timeline without synthesizing
    #[arg(long)]
    plan: bool,

    /// Print the plan as JSON
    #[arg(long, requires = "plan")]
    json: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn parse_variant(s: &str) -> Result<ScheduleVariant, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "minimal" => Ok(ScheduleVariant::Minimal),
        "extended" => Ok(ScheduleVariant::Extended),
        _ => Err(format!("Invalid variant: '{s}' (expected minimal or extended)")),
    }
}

fn parse_engine(s: &str) -> Result<SpeechEngine, String> {
    SpeechEngine::from_name(s).ok_or_else(|| {
        let names: Vec<_> = SpeechEngine::ALL.iter().map(|e| e.name()).collect();
        format!("Invalid engine: '{s}' (expected one of {})", names.join(", "))
    })
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.plan {
        plan::run(&cli)
    } else {
        compile::run(&cli)
    }
}
