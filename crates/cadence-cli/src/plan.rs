//! `--plan`: print the cue timeline without synthesizing anything.

use std::sync::Arc;

use cadence_core::{
    AudioClip, CueContent, CueKind, PlannedCue, ScheduleVariant, ToneSource, plan_cues,
};
use serde::Serialize;

use crate::Cli;
use crate::common::{load_config, load_schedule};

#[derive(Debug, Serialize)]
struct PlanRow {
    offset_ms: u64,
    kind: &'static str,
    source: String,
    content: String,
}

impl From<&PlannedCue> for PlanRow {
    fn from(cue: &PlannedCue) -> Self {
        Self {
            offset_ms: cue.start_offset_ms,
            kind: match cue.kind {
                CueKind::Tone => "tone",
                CueKind::Voice => "voice",
            },
            source: cue.source.to_string(),
            content: describe(&cue.content),
        }
    }
}

fn describe(content: &CueContent) -> String {
    match content {
        CueContent::Speech(text) => format!("\"{text}\""),
        CueContent::Tone(req) => format!(
            "{:.0} Hz x{} ({:.1}s, {:.1} dB)",
            req.frequency_hz, req.repeat_count, req.duration_secs, req.gain_db
        ),
        CueContent::Beep => "beep asset".to_string(),
    }
}

fn format_offset(ms: u64) -> String {
    let secs = ms / 1000;
    format!("{:02}:{:02}.{:03}", secs / 60, secs % 60, ms % 1000)
}

pub(crate) fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = load_config(cli)?;
    let schedule = load_schedule(cli)?;

    // Planning only needs to know that an asset will be used, not its audio.
    let tones = match schedule.variant() {
        ScheduleVariant::Minimal => ToneSource::Asset(Arc::new(AudioClip::new(
            Vec::new(),
            config.audio.sample_rate,
        ))),
        ScheduleVariant::Extended => ToneSource::Table(config.tone_table()),
    };

    let mut plan = plan_cues(&schedule, &tones, &config.speech.halfway_text);
    plan.sort_by_key(PlannedCue::order_key);
    let rows: Vec<PlanRow> = plan.iter().map(PlanRow::from).collect();

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!(
        "{} segments, {}s total, halfway at {}s",
        schedule.len(),
        schedule.total_duration_seconds(),
        schedule.halfway_point_seconds()
    );
    println!();
    for row in &rows {
        println!(
            "  {}  {:<11} {:<6} {}",
            format_offset(row.offset_ms),
            row.source,
            row.kind,
            row.content
        );
    }
    Ok(())
}
