//! Configuration for cadence runs.
//!
//! A run is configured from a TOML file with four optional sections. Every
//! key has a built-in default, so an empty file (or no file) is valid.
//!
//! ```toml
//! [audio]
//! sample_rate = 44100
//! music_gain_db = -4.5
//!
//! [speech]
//! engine = "say"
//! voice = "Samantha"
//! halfway_text = "Halfway point, time to turn around"
//!
//! [tones.default]
//! frequency_hz = 440.0
//! beep_count = 1
//!
//! [tones.phases]
//! "Tempo" = { frequency_hz = 660.0, beep_count = 2 }
//!
//! [export]
//! bitrate = "192k"
//! bit_depth = 16
//! ```
//!
//! # Example
//!
//! ```rust
//! use cadence_config::Config;
//!
//! let config = Config::from_toml("[speech]\nvoice = \"Alex\"\n").unwrap();
//! assert_eq!(config.speech.voice, "Alex");
//! assert_eq!(config.audio.sample_rate, 44100);
//! ```

mod config;
mod error;

/// Platform-specific configuration paths.
pub mod paths;

pub use config::{AudioConfig, Config, ExportConfig, SpeechConfig, TonesConfig};
pub use error::ConfigError;
pub use paths::{CONFIG_FILE_NAME, default_config_path, resolve_config_path, user_config_dir};
