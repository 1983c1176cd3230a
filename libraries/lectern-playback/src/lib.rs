//! Lectern Playback
//!
//! The playback state machine that ties a `Library` to one audio output.
//!
//! This crate provides:
//! - Play, pause, seek, next and previous over the catalog
//! - Resume from a lecture's saved position
//! - Shuffle and repeat modes (none, one, all)
//! - Volume and playback-rate control
//! - Throttled progress persistence through a `StateWriter`
//!
//! # Architecture
//!
//! The controller never touches an audio device. It drives an `AudioOutput`
//! and reacts to `AudioEvent`s, each tagged with the `LoadToken` of the load
//! it answers. Late answers for a superseded load are dropped.
//!
//! # Example
//!
//! ```rust
//! use lectern_core::Lecture;
//! use lectern_library::Library;
//! use lectern_playback::{AudioEvent, PlaybackConfig, PlaybackController, PlaybackState, RecordingOutput};
//! use lectern_storage::StateWriter;
//!
//! let mut lecture = Lecture::new("intro", "Introduction");
//! lecture.filename = "intro.mp3".to_string();
//!
//! let (writer, _writes) = StateWriter::channel();
//! let mut controller = PlaybackController::new(
//!     Library::from_lectures(vec![lecture]),
//!     RecordingOutput::new(),
//!     writer,
//!     PlaybackConfig::default(),
//! );
//!
//! controller.play(&"intro".into()).unwrap();
//! let token = controller.load_token();
//! controller.handle_event(AudioEvent::Started { token });
//! assert_eq!(controller.state(), PlaybackState::Playing);
//! ```

pub mod controller;
pub mod error;
pub mod events;
pub mod output;
pub mod shuffle;
pub mod types;

pub use controller::PlaybackController;
pub use error::{PlaybackError, Result};
pub use events::PlaybackEvent;
pub use output::{AudioEvent, AudioOutput, LoadToken, OutputCommand, RecordingOutput};
pub use types::{PlaybackConfig, PlaybackState, ResumeOutcome, MAX_RATE, MIN_RATE};

pub use lectern_core::RepeatMode;
