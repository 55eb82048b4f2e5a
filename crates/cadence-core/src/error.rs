//! Error types for timeline compilation.

use thiserror::Error;

use crate::schedule::ValidationError;

/// Failure reported by a speech or tone synthesis collaborator.
#[derive(Debug, Error)]
pub enum SynthesisError {
    /// The external program could not be started.
    #[error("failed to launch `{program}`: {source}")]
    Spawn {
        /// Program that was invoked.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The external program ran but reported failure.
    #[error("`{program}` exited with {status}: {stderr}")]
    Status {
        /// Program that was invoked.
        program: String,
        /// Exit status as reported by the OS.
        status: String,
        /// Captured standard error, trimmed.
        stderr: String,
    },

    /// The synthesized asset could not be decoded into the mixing format.
    #[error("could not decode synthesized asset: {0}")]
    Decode(String),

    /// The scratch area for intermediate assets could not be prepared.
    #[error("scratch area unavailable: {0}")]
    Scratch(#[from] std::io::Error),

    /// The synthesis worker pool could not be started.
    #[error("worker pool unavailable: {0}")]
    Pool(String),
}

/// Errors that abort a compilation run.
///
/// Every variant is fatal: nothing is retried and no partial output is
/// produced.
#[derive(Debug, Error)]
pub enum Error {
    /// The schedule failed validation before any synthesis was attempted.
    #[error("invalid schedule: {0}")]
    Validation(#[from] ValidationError),

    /// A speech or tone request failed.
    #[error("synthesis failed for {cue}: {source}")]
    Synthesis {
        /// Human-readable cue label, e.g. `segment 2 voice`.
        cue: String,
        /// Collaborator failure.
        #[source]
        source: SynthesisError,
    },

    /// The music or beep asset could not be loaded or used.
    #[error("failed to load {asset}: {reason}")]
    MediaLoad {
        /// Asset name or path.
        asset: String,
        /// Description of the failure.
        reason: String,
    },

    /// The final encode failed.
    #[error("failed to export '{path}': {reason}")]
    Export {
        /// Destination that was being written.
        path: String,
        /// Description of the failure.
        reason: String,
    },

    /// The cue set is inconsistent with the base track.
    #[error("cannot composite timeline: {0}")]
    Composite(String),
}

impl Error {
    /// Create a media load error.
    pub fn media_load(asset: impl Into<String>, reason: impl ToString) -> Self {
        Error::MediaLoad {
            asset: asset.into(),
            reason: reason.to_string(),
        }
    }

    /// Create an export error.
    pub fn export(path: impl Into<String>, reason: impl ToString) -> Self {
        Error::Export {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a synthesis error for the named cue.
    pub fn synthesis(cue: impl Into<String>, source: SynthesisError) -> Self {
        Error::Synthesis {
            cue: cue.into(),
            source,
        }
    }
}

/// Convenience result type for compilation.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn validation_converts_and_displays_row() {
        let err: Error = ValidationError::EmptyField {
            row: 3,
            field: "Focus_Notes",
        }
        .into();
        let msg = err.to_string();
        assert!(msg.contains("row 3"), "got: {msg}");
        assert!(msg.contains("Focus_Notes"), "got: {msg}");
    }

    #[test]
    fn synthesis_exposes_source() {
        let err = Error::synthesis(
            "segment 1 voice",
            SynthesisError::Status {
                program: "say".to_string(),
                status: "exit status: 1".to_string(),
                stderr: "no voice".to_string(),
            },
        );
        assert!(err.to_string().contains("segment 1 voice"));
        assert!(err.source().is_some());
    }

    #[test]
    fn media_load_display() {
        let err = Error::media_load("music.wav", "file not found");
        assert_eq!(err.to_string(), "failed to load music.wav: file not found");
    }
}
