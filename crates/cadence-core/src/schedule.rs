//! Workout schedule model and validation.
//!
//! A schedule arrives as a table with one row per segment. Parsing is
//! fail-fast: the first bad row aborts with a [`ValidationError`] naming the
//! row (1-based, header excluded) and the offending field, before any
//! synthesis work is started.
//!
//! # CSV Format
//!
//! ```text
//! Phase,Effort_Description,Focus_Notes,Duration_Seconds,Cumulative_Time_Seconds
//! Warm-up,Easy jog,Relax your shoulders,300,300
//! Interval,Hard effort,Drive with the arms,60,360
//! ```

use std::collections::HashMap;
use std::fmt;
use std::io::Read;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Column holding the phase label.
pub const COL_PHASE: &str = "Phase";
/// Column holding the spoken effort description.
pub const COL_EFFORT: &str = "Effort_Description";
/// Column holding the focus notes appended to the spoken cue.
pub const COL_FOCUS: &str = "Focus_Notes";
/// Column holding the segment length in seconds.
pub const COL_DURATION: &str = "Duration_Seconds";
/// Column holding the running total in seconds.
pub const COL_CUMULATIVE: &str = "Cumulative_Time_Seconds";

/// Longest supported workout: 24 hours.
///
/// Bounds every millisecond and sample count derived from a schedule.
pub const MAX_TOTAL_SECONDS: u64 = 24 * 60 * 60;

/// Schedule validation errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The schedule has a header but no segments.
    #[error("schedule has no rows")]
    EmptySchedule,

    /// A required column is absent from the header.
    #[error("schedule is missing required column '{0}'")]
    MissingColumn(&'static str),

    /// A row is too short to contain a required field.
    #[error("row {row}: missing required field '{field}'")]
    MissingField {
        /// 1-based data row.
        row: usize,
        /// Column name.
        field: &'static str,
    },

    /// A required field is blank after trimming.
    #[error("row {row}: required field '{field}' is empty")]
    EmptyField {
        /// 1-based data row.
        row: usize,
        /// Column name.
        field: &'static str,
    },

    /// An integer column holds something else.
    #[error("row {row}: field '{field}' is not a whole number of seconds: '{value}'")]
    InvalidInteger {
        /// 1-based data row.
        row: usize,
        /// Column name.
        field: &'static str,
        /// Raw field content.
        value: String,
    },

    /// A segment has zero length.
    #[error("row {row}: duration must be positive")]
    NonPositiveDuration {
        /// 1-based data row.
        row: usize,
    },

    /// The running total disagrees with the sum of durations so far.
    #[error("row {row}: cumulative time is {found}s but durations sum to {expected}s")]
    CumulativeMismatch {
        /// 1-based data row.
        row: usize,
        /// Sum of durations up to and including this row.
        expected: u64,
        /// Value found in the row.
        found: u64,
    },

    /// The running total exceeds the longest supported workout.
    #[error("row {row}: workout exceeds the {limit_seconds}s maximum")]
    TooLong {
        /// 1-based data row where the limit was crossed.
        row: usize,
        /// Longest supported workout in seconds.
        limit_seconds: u64,
    },

    /// The CSV reader could not decode a record.
    #[error("row {row}: malformed record: {reason}")]
    Malformed {
        /// 1-based data row (0 for the header).
        row: usize,
        /// Reader diagnostic.
        reason: String,
    },
}

/// Which fields a schedule must provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleVariant {
    /// Only `Effort_Description` is required; focus notes are spoken when present.
    Minimal,
    /// `Effort_Description` and `Focus_Notes` are both required and non-empty.
    #[default]
    Extended,
}

/// Workout phase label.
///
/// The set is open: unrecognized labels are kept verbatim in [`Phase::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Warm-up.
    WarmUp,
    /// Work interval.
    Interval,
    /// Recovery between intervals.
    Recovery,
    /// Cool-down.
    CoolDown,
    /// Any other label.
    Other(String),
}

impl Phase {
    /// Interpret a label, ignoring case, whitespace and punctuation.
    pub fn parse(label: &str) -> Self {
        match normalize_label(label).as_str() {
            "warmup" => Phase::WarmUp,
            "interval" => Phase::Interval,
            "recovery" => Phase::Recovery,
            "cooldown" => Phase::CoolDown,
            _ => Phase::Other(label.trim().to_string()),
        }
    }

    /// Display label.
    pub fn label(&self) -> &str {
        match self {
            Phase::WarmUp => "Warm-up",
            Phase::Interval => "Interval",
            Phase::Recovery => "Recovery",
            Phase::CoolDown => "Cool-down",
            Phase::Other(label) => label,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lowercase alphanumerics only, so `Warm-up`, `warm up` and `WARMUP` agree.
pub fn normalize_label(label: &str) -> String {
    label
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// One scheduled phase of the workout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Phase label.
    pub phase: Phase,
    /// Spoken verbatim.
    pub effort_description: String,
    /// Appended to the spoken cue when present.
    pub focus_notes: Option<String>,
    /// Segment length in seconds.
    pub duration_seconds: u64,
    /// Running total up to and including this segment.
    pub cumulative_time_seconds: u64,
}

impl Segment {
    /// Create a segment.
    pub fn new(
        phase: &str,
        effort_description: impl Into<String>,
        focus_notes: Option<&str>,
        duration_seconds: u64,
        cumulative_time_seconds: u64,
    ) -> Self {
        Self {
            phase: Phase::parse(phase),
            effort_description: effort_description.into(),
            focus_notes: focus_notes.map(str::to_string),
            duration_seconds,
            cumulative_time_seconds,
        }
    }

    /// Text for the segment's voice cue.
    ///
    /// Focus notes follow the effort description as a new sentence. If the
    /// description already ends in sentence punctuation only a space is added.
    pub fn spoken_text(&self) -> String {
        let effort = self.effort_description.trim();
        match self.focus_notes.as_deref().map(str::trim) {
            Some(notes) if !notes.is_empty() => {
                if effort.ends_with(['.', '!', '?']) {
                    format!("{effort} {notes}")
                } else {
                    format!("{effort}. {notes}")
                }
            }
            _ => effort.to_string(),
        }
    }
}

/// A validated, ordered, contiguous list of segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    segments: Vec<Segment>,
    variant: ScheduleVariant,
}

impl Schedule {
    /// Validate `segments` and build a schedule.
    ///
    /// Rows are checked in order and the first problem is returned.
    pub fn new(segments: Vec<Segment>, variant: ScheduleVariant) -> Result<Self, ValidationError> {
        if segments.is_empty() {
            return Err(ValidationError::EmptySchedule);
        }

        let mut running = 0u64;
        for (i, seg) in segments.iter().enumerate() {
            let row = i + 1;
            if seg.effort_description.trim().is_empty() {
                return Err(ValidationError::EmptyField {
                    row,
                    field: COL_EFFORT,
                });
            }
            if variant == ScheduleVariant::Extended
                && seg.focus_notes.as_deref().is_none_or(|n| n.trim().is_empty())
            {
                return Err(ValidationError::EmptyField {
                    row,
                    field: COL_FOCUS,
                });
            }
            if seg.duration_seconds == 0 {
                return Err(ValidationError::NonPositiveDuration { row });
            }
            running = match running.checked_add(seg.duration_seconds) {
                Some(total) if total <= MAX_TOTAL_SECONDS => total,
                _ => {
                    return Err(ValidationError::TooLong {
                        row,
                        limit_seconds: MAX_TOTAL_SECONDS,
                    });
                }
            };
            if seg.cumulative_time_seconds != running {
                return Err(ValidationError::CumulativeMismatch {
                    row,
                    expected: running,
                    found: seg.cumulative_time_seconds,
                });
            }
        }

        Ok(Self { segments, variant })
    }

    /// Parse and validate CSV with a header row.
    pub fn from_csv<R: Read>(reader: R, variant: ScheduleVariant) -> Result<Self, ValidationError> {
        let mut csv = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = csv.headers().map_err(|e| ValidationError::Malformed {
            row: 0,
            reason: e.to_string(),
        })?;
        let columns = Columns::locate(headers)?;

        let mut segments = Vec::new();
        for (i, record) in csv.records().enumerate() {
            let row = i + 1;
            let record = record.map_err(|e| ValidationError::Malformed {
                row,
                reason: e.to_string(),
            })?;
            segments.push(columns.segment(&record, row, variant)?);
        }

        Self::new(segments, variant)
    }

    /// Segments in schedule order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false for a validated schedule.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Variant the schedule was validated against.
    pub fn variant(&self) -> ScheduleVariant {
        self.variant
    }

    /// Total workout length: the last segment's cumulative time.
    pub fn total_duration_seconds(&self) -> u64 {
        self.segments.last().map_or(0, |s| s.cumulative_time_seconds)
    }

    /// Total workout length in milliseconds.
    pub fn total_duration_ms(&self) -> u64 {
        self.total_duration_seconds() * 1000
    }

    /// Midpoint in whole seconds, rounded down (125 s gives 62 s).
    pub fn halfway_point_seconds(&self) -> u64 {
        self.total_duration_seconds() / 2
    }

    /// Start of segment `index` in milliseconds: the sum of all earlier
    /// durations. `None` past the end.
    pub fn segment_start_ms(&self, index: usize) -> Option<u64> {
        self.segment_starts_ms().nth(index)
    }

    /// Start of every segment in milliseconds, in schedule order.
    pub fn segment_starts_ms(&self) -> impl Iterator<Item = u64> + '_ {
        self.segments.iter().scan(0u64, |elapsed, seg| {
            let start = *elapsed * 1000;
            *elapsed += seg.duration_seconds;
            Some(start)
        })
    }
}

/// Header positions of the schedule columns.
struct Columns {
    index: HashMap<&'static str, usize>,
}

impl Columns {
    fn locate(headers: &csv::StringRecord) -> Result<Self, ValidationError> {
        let mut index = HashMap::new();
        for name in [COL_PHASE, COL_EFFORT, COL_FOCUS, COL_DURATION, COL_CUMULATIVE] {
            if let Some(pos) = headers.iter().position(|h| h.trim() == name) {
                index.insert(name, pos);
            } else if name != COL_FOCUS {
                return Err(ValidationError::MissingColumn(name));
            }
        }
        Ok(Self { index })
    }

    fn field<'r>(
        &self,
        record: &'r csv::StringRecord,
        name: &'static str,
        row: usize,
    ) -> Result<&'r str, ValidationError> {
        self.index
            .get(name)
            .and_then(|&pos| record.get(pos))
            .ok_or(ValidationError::MissingField { row, field: name })
    }

    fn seconds(
        &self,
        record: &csv::StringRecord,
        name: &'static str,
        row: usize,
    ) -> Result<u64, ValidationError> {
        let raw = self.field(record, name, row)?.trim();
        if raw.is_empty() {
            return Err(ValidationError::EmptyField { row, field: name });
        }
        raw.parse().map_err(|_| ValidationError::InvalidInteger {
            row,
            field: name,
            value: raw.to_string(),
        })
    }

    fn segment(
        &self,
        record: &csv::StringRecord,
        row: usize,
        variant: ScheduleVariant,
    ) -> Result<Segment, ValidationError> {
        let phase = self.field(record, COL_PHASE, row)?;
        let effort = self.field(record, COL_EFFORT, row)?;

        let focus = match variant {
            ScheduleVariant::Extended => Some(self.field(record, COL_FOCUS, row)?),
            ScheduleVariant::Minimal => self.field(record, COL_FOCUS, row).ok(),
        }
        .map(str::trim)
        .filter(|s| !s.is_empty() || variant == ScheduleVariant::Extended);

        Ok(Segment {
            phase: Phase::parse(phase),
            effort_description: effort.trim().to_string(),
            focus_notes: focus.map(str::to_string),
            duration_seconds: self.seconds(record, COL_DURATION, row)?,
            cumulative_time_seconds: self.seconds(record, COL_CUMULATIVE, row)?,
        })
    }
}
