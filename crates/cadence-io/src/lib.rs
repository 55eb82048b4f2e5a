//! Audio I/O layer for cadence.
//!
//! This crate provides:
//!
//! - **WAV file I/O**: [`read_wav`] and [`write_wav`] for mono `f32` clips
//! - **Transcoding**: [`Transcoder`] wraps `ffmpeg` to normalize any input
//!   into the mixing format and to encode MP3
//! - **Media loading**: [`MediaLoader`] reads music and beep assets at the
//!   run's sample rate
//! - **Export**: [`Exporter`] writes the final mix atomically
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cadence_io::{ExportOptions, Exporter, MediaLoader, Transcoder};
//!
//! let transcoder = Transcoder::default();
//! let music = MediaLoader::new(&transcoder, 44_100).load("music.mp3")?;
//! // ... compile ...
//! Exporter::new(&transcoder, ExportOptions::default()).export(&mix, "workout.mp3")?;
//! ```

mod export;
mod media;
mod transcode;
mod wav;

pub use export::{ExportFormat, ExportOptions, Exporter};
pub use media::MediaLoader;
pub use transcode::{DEFAULT_FFMPEG, Transcoder, stderr_tail};
pub use wav::{WavFormat, WavInfo, WavSpec, read_wav, read_wav_info, write_wav};

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// The transcoder could not be started.
    #[error("failed to launch `{program}`: {source}")]
    Spawn {
        /// Program that was invoked.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The transcoder exited with a failure status.
    #[error("`{program}` exited with {status}: {stderr}")]
    Transcode {
        /// Program that was invoked.
        program: String,
        /// Exit status as reported by the OS.
        status: String,
        /// Captured standard error, last lines only.
        stderr: String,
    },

    /// The requested output format is not supported.
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
