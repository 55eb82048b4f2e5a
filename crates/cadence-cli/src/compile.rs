//! Default command: compile the schedule and export the mix.

use std::sync::Arc;
use std::time::Duration;

use cadence_core::{
    Backing, CompileOptions, Compiler, PlannedCue, ScheduleVariant, ToneSource, plan_cues,
};
use cadence_io::{ExportOptions, Exporter, MediaLoader, Transcoder};
use cadence_synth::SineToneSynth;
use indicatif::{ProgressBar, ProgressStyle};

use crate::Cli;
use crate::common::{jobs, load_config, load_schedule};

pub(crate) fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = load_config(cli)?;
    let schedule = load_schedule(cli)?;

    let transcoder = Transcoder::default();
    let loader = MediaLoader::new(&transcoder, config.audio.sample_rate);

    let tones = match schedule.variant() {
        ScheduleVariant::Minimal => ToneSource::Asset(Arc::new(loader.load(&cli.beep)?)),
        ScheduleVariant::Extended => ToneSource::Table(config.tone_table()),
    };
    let backing = if cli.debug {
        tracing::info!("debug mode: silent base track");
        Backing::Silence
    } else {
        Backing::Music(loader.load(&cli.music)?)
    };

    let speech = config
        .speech
        .engine
        .build(&config.speech.voice, &transcoder);
    let options = CompileOptions {
        sample_rate: config.audio.sample_rate,
        music_gain_db: config.audio.music_gain_db,
        halfway_text: config.speech.halfway_text.clone(),
        jobs: jobs(cli),
    };
    tracing::info!(
        engine = %config.speech.engine,
        voice = %config.speech.voice,
        jobs = options.jobs,
        "synthesizing cues"
    );

    let cue_count = plan_cues(&schedule, &tones, &options.halfway_text).len();
    let pb = ProgressBar::new(cue_count as u64);
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} [{elapsed_precise}] {pos}/{len} cues {msg}")?,
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    let report = |cue: &PlannedCue| {
        pb.set_message(cue.label());
        pb.inc(1);
    };

    let result = Compiler::new(speech.as_ref(), &SineToneSynth, options)
        .with_progress(&report)
        .compile(&schedule, backing, &tones);
    match &result {
        Ok(_) => pb.finish_with_message("done"),
        Err(_) => pb.abandon(),
    }
    let mix = result?;

    let export = ExportOptions {
        format: None,
        bitrate: config.export.bitrate.clone(),
        bit_depth: config.export.bit_depth,
    };
    Exporter::new(&transcoder, export).export(&mix, &cli.output)?;

    println!(
        "Interval audio file created successfully: {}",
        cli.output.display()
    );
    Ok(())
}
