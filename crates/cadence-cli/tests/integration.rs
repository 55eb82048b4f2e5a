//! Integration tests for cadence-cli.
//!
//! Every run uses the silent speech engine, debug mode (no music) and WAV
//! output, so no external programs are needed.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use cadence_core::AudioClip;
use cadence_io::{WavSpec, read_wav_info, write_wav};
use tempfile::TempDir;

const SAMPLE_RATE: &str = "8000";

const SCHEDULE: &str = "\
Phase,Effort_Description,Focus_Notes,Duration_Seconds,Cumulative_Time_Seconds
Warm-up,Easy jog,Stay relaxed,5,5
Interval,Hard effort,Drive the arms,10,15
Cool-down,Walk it off,Breathe deeply,5,20
";

/// Helper to get the path to the `cadence` binary built by cargo.
fn cadence_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_cadence"));
    cmd.env("RUST_LOG", "warn");
    cmd
}

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new(schedule: &str) -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("interval.csv"), schedule).unwrap();
        // Empty config keeps the user's own config file out of the test.
        std::fs::write(dir.path().join("config.toml"), "").unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn run(&self, extra: &[&str]) -> Output {
        cadence_bin()
            .current_dir(self.dir.path())
            .args(["--config", "config.toml", "--engine", "silent", "--debug"])
            .args(["--sample-rate", SAMPLE_RATE])
            .args(extra)
            .output()
            .expect("failed to run cadence")
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn duration_ms(path: &Path) -> u64 {
    let info = read_wav_info(path).unwrap();
    info.num_frames * 1000 / u64::from(info.sample_rate)
}

// ---------------------------------------------------------------------------
// Help and version
// ---------------------------------------------------------------------------

#[test]
fn cli_help_lists_options() {
    let output = cadence_bin().arg("--help").output().unwrap();
    assert!(output.status.success());
    let text = stdout(&output);
    for flag in ["--input", "--output", "--music", "--debug", "--variant", "--plan"] {
        assert!(text.contains(flag), "help should mention {flag}");
    }
}

#[test]
fn cli_version() {
    let output = cadence_bin().arg("--version").output().unwrap();
    assert!(output.status.success());
    assert!(stdout(&output).contains(env!("CARGO_PKG_VERSION")));
}

// ---------------------------------------------------------------------------
// Compile
// ---------------------------------------------------------------------------

#[test]
fn debug_run_writes_full_length_wav() {
    let ws = Workspace::new(SCHEDULE);
    let output = ws.run(&["--output", "out.wav"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(
        stdout(&output).contains("Interval audio file created successfully: out.wav"),
        "stdout: {}",
        stdout(&output)
    );

    let out = ws.path("out.wav");
    let info = read_wav_info(&out).unwrap();
    assert_eq!(info.sample_rate, 8_000);
    assert_eq!(info.channels, 1);
    assert_eq!(info.bits_per_sample, 16);
    assert_eq!(duration_ms(&out), 20_000);
}

#[test]
fn bit_depth_flag_is_honored() {
    let ws = Workspace::new(SCHEDULE);
    let output = ws.run(&["--output", "out.wav", "--bit-depth", "24", "--jobs", "2"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(read_wav_info(ws.path("out.wav")).unwrap().bits_per_sample, 24);
}

#[test]
fn minimal_variant_uses_beep_file() {
    let ws = Workspace::new(
        "\
Phase,Effort_Description,Focus_Notes,Duration_Seconds,Cumulative_Time_Seconds
Warm-up,Easy jog,,6,6
Interval,Hard effort,,6,12
",
    );
    let beep = AudioClip::new(vec![0.5; 800], 8_000);
    write_wav(ws.path("beep.wav"), &beep, WavSpec::default()).unwrap();

    let output = ws.run(&[
        "--variant",
        "minimal",
        "--beep",
        "beep.wav",
        "--output",
        "out.wav",
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(duration_ms(&ws.path("out.wav")), 12_000);
}

#[test]
fn minimal_variant_without_beep_fails() {
    let ws = Workspace::new(SCHEDULE);
    let output = ws.run(&["--variant", "minimal", "--output", "out.wav"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("beep.mp3"), "stderr: {}", stderr(&output));
    assert!(!ws.path("out.wav").exists());
}

#[test]
fn missing_music_fails_without_debug() {
    let ws = Workspace::new(SCHEDULE);
    let output = cadence_bin()
        .current_dir(ws.dir.path())
        .args(["--config", "config.toml", "--engine", "silent"])
        .args(["--output", "out.wav"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(stderr(&output).contains("music.mp3"), "stderr: {}", stderr(&output));
    assert!(!ws.path("out.wav").exists());
}

// ---------------------------------------------------------------------------
// Validation failures
// ---------------------------------------------------------------------------

#[test]
fn invalid_schedule_exits_nonzero_and_writes_nothing() {
    let ws = Workspace::new(
        "\
Phase,Effort_Description,Focus_Notes,Duration_Seconds,Cumulative_Time_Seconds
Warm-up,Easy jog,Stay relaxed,5,5
Interval,Hard effort,,10,15
",
    );
    let output = ws.run(&["--output", "out.wav"]);

    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("row 2"), "stderr: {err}");
    assert!(err.contains("Focus_Notes"), "stderr: {err}");
    assert!(!ws.path("out.wav").exists());
}

#[test]
fn missing_input_file_reported() {
    let ws = Workspace::new(SCHEDULE);
    let output = ws.run(&["--input", "nope.csv", "--output", "out.wav"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("nope.csv"));
}

#[test]
fn bad_config_value_rejected() {
    let ws = Workspace::new(SCHEDULE);
    std::fs::write(ws.path("config.toml"), "[export]\nbit_depth = 12\n").unwrap();
    let output = ws.run(&["--output", "out.wav"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("export.bit_depth"));
}

// ---------------------------------------------------------------------------
// Plan
// ---------------------------------------------------------------------------

#[test]
fn plan_prints_timeline_without_output() {
    let ws = Workspace::new(SCHEDULE);
    let output = ws.run(&["--plan", "--output", "out.wav"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains("3 segments, 20s total, halfway at 10s"), "{text}");
    assert!(text.contains("00:05.000"), "{text}");
    assert!(text.contains("00:10.000  halfway"), "{text}");
    assert!(text.contains("\"Hard effort. Drive the arms\""), "{text}");
    assert!(!ws.path("out.wav").exists());
}

#[test]
fn plan_json_is_sorted_by_offset() {
    let ws = Workspace::new(SCHEDULE);
    let output = ws.run(&["--plan", "--json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let rows: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(rows.len(), 8);
    let offsets: Vec<u64> = rows
        .iter()
        .map(|r| r["offset_ms"].as_u64().unwrap())
        .collect();
    assert_eq!(
        offsets,
        vec![0, 0, 5_000, 5_000, 10_000, 10_000, 15_000, 15_000]
    );
    assert_eq!(rows[0]["kind"], "tone");
    assert_eq!(rows[1]["kind"], "voice");
    assert_eq!(rows[4]["source"], "halfway");
}
