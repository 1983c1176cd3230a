//! Audio output boundary
//!
//! The controller drives exactly one `AudioOutput` and learns what happened
//! through `AudioEvent`s. Every event carries the `LoadToken` of the load it
//! belongs to so answers for superseded loads can be told apart.

use serde::{Deserialize, Serialize};

/// Identifies one `load` request
///
/// Tokens increase with every load. Only events carrying the controller's
/// current token are acted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct LoadToken(u64);

impl LoadToken {
    /// The token after this one
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for LoadToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Something that can play one audio resource at a time
///
/// Commands are fire-and-forget; outcomes come back as `AudioEvent`s.
pub trait AudioOutput {
    /// Replace the current resource with `locator`, tagging its events with `token`
    fn load(&mut self, token: LoadToken, locator: &str);

    fn play(&mut self);

    fn pause(&mut self);

    /// Seek to an absolute position in seconds
    fn seek(&mut self, position: f64);

    /// Volume in [0, 1]
    fn set_volume(&mut self, volume: f64);

    /// Playback rate, 1.0 = normal speed
    fn set_rate(&mut self, rate: f64);
}

/// Notifications from the audio output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AudioEvent {
    /// Playback actually began
    Started { token: LoadToken },

    /// The real duration is known
    MetadataReady { token: LoadToken, duration: f64 },

    /// Periodic position report, in seconds
    PositionTick { token: LoadToken, position: f64 },

    /// Reached the end of the resource
    Ended { token: LoadToken },

    /// The resource could not be loaded or played
    Error { token: LoadToken, message: String },
}

impl AudioEvent {
    pub fn token(&self) -> LoadToken {
        match self {
            Self::Started { token }
            | Self::MetadataReady { token, .. }
            | Self::PositionTick { token, .. }
            | Self::Ended { token }
            | Self::Error { token, .. } => *token,
        }
    }
}

/// A command issued to an `AudioOutput`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OutputCommand {
    Load { token: LoadToken, locator: String },
    Play,
    Pause,
    Seek(f64),
    SetVolume(f64),
    SetRate(f64),
}

/// Output that plays nothing and remembers every command
///
/// Used where no audio device exists: headless front ends and tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingOutput {
    commands: Vec<OutputCommand>,
}

impl RecordingOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[OutputCommand] {
        &self.commands
    }

    /// Most recent load, if any
    pub fn last_load(&self) -> Option<(LoadToken, &str)> {
        self.commands.iter().rev().find_map(|c| match c {
            OutputCommand::Load { token, locator } => Some((*token, locator.as_str())),
            _ => None,
        })
    }

    /// Most recent seek target, if any
    pub fn last_seek(&self) -> Option<f64> {
        self.commands.iter().rev().find_map(|c| match c {
            OutputCommand::Seek(position) => Some(*position),
            _ => None,
        })
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl AudioOutput for RecordingOutput {
    fn load(&mut self, token: LoadToken, locator: &str) {
        tracing::debug!(%token, locator, "Load");
        self.commands.push(OutputCommand::Load {
            token,
            locator: locator.to_string(),
        });
    }

    fn play(&mut self) {
        self.commands.push(OutputCommand::Play);
    }

    fn pause(&mut self) {
        self.commands.push(OutputCommand::Pause);
    }

    fn seek(&mut self, position: f64) {
        self.commands.push(OutputCommand::Seek(position));
    }

    fn set_volume(&mut self, volume: f64) {
        self.commands.push(OutputCommand::SetVolume(volume));
    }

    fn set_rate(&mut self, rate: f64) {
        self.commands.push(OutputCommand::SetRate(rate));
    }
}
