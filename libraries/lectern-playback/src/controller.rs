//! Playback controller
//!
//! Owns the `Library` and the single `AudioOutput` and keeps them consistent:
//! which lecture is current, where it is, and what has been persisted.
//!
//! The controller is a synchronous state machine. User calls and
//! `AudioEvent`s both mutate it; neither blocks. Persistence goes through a
//! `StateWriter` and is never awaited.

use crate::error::{PlaybackError, Result};
use crate::events::PlaybackEvent;
use crate::output::{AudioEvent, AudioOutput, LoadToken};
use crate::shuffle;
use crate::types::{PlaybackConfig, PlaybackState, ResumeOutcome, MAX_RATE, MIN_RATE};
use chrono::{DateTime, Utc};
use lectern_core::{LastSession, Lecture, LectureId, LectureStateUpdate, QueryState, RepeatMode};
use lectern_library::{audio_locator, query, Library};
use lectern_storage::StateWriter;
use rand::thread_rng;
use tracing::{debug, info, warn};

/// Playback controller
///
/// Navigation (`next`/`previous`) follows catalog order, not whatever
/// filtered view the user is looking at.
pub struct PlaybackController<O: AudioOutput> {
    library: Library,
    output: O,
    writer: StateWriter,
    config: PlaybackConfig,

    state: PlaybackState,
    current: Option<LectureId>,
    current_index: Option<usize>,

    // Load tracking
    token: LoadToken,
    metadata_ready: bool,
    pending_seek: Option<f64>,
    // Seek requested before the duration was known, as a fraction
    pending_fraction: Option<f64>,
    pause_requested: bool,

    // Modes
    shuffle: bool,
    repeat: RepeatMode,
    volume: f64,
    rate: f64,

    // Position last handed to the writer for the current lecture
    last_persisted_position: f64,

    // Event queue for presentation sync
    pending_events: Vec<PlaybackEvent>,
}

impl<O: AudioOutput> PlaybackController<O> {
    /// Create a controller over a loaded library
    pub fn new(mut library: Library, mut output: O, writer: StateWriter, config: PlaybackConfig) -> Self {
        library.set_history_size(config.history_size);
        let volume = clamp_volume(config.volume).unwrap_or(0.7);
        output.set_volume(volume);

        Self {
            library,
            output,
            writer,
            config,
            state: PlaybackState::Idle,
            current: None,
            current_index: None,
            token: LoadToken::default(),
            metadata_ready: false,
            pending_seek: None,
            pending_fraction: None,
            pause_requested: false,
            shuffle: false,
            repeat: RepeatMode::None,
            volume,
            rate: 1.0,
            last_persisted_position: 0.0,
            pending_events: Vec::new(),
        }
    }

    // ===== Playback Control =====

    /// Start playing a lecture from its saved position
    ///
    /// Moves to `Loading`; the output's `Started` event moves on to `Playing`.
    /// Any earlier unresolved load is superseded.
    pub fn play(&mut self, id: &LectureId) -> Result<()> {
        let Some(index) = self.library.index_of(id) else {
            self.fail(PlaybackError::UnknownLecture(id.clone()));
            return Err(PlaybackError::UnknownLecture(id.clone()));
        };

        // Save where the outgoing lecture stopped before switching away
        if self.current.as_ref().is_some_and(|current| current != id) {
            self.persist_position();
        }

        let previous = self.current.replace(id.clone());
        self.current_index = Some(index);
        self.token = self.token.next();
        self.metadata_ready = false;
        self.pause_requested = false;

        let (locator, resume_at) = match self.library.at(index) {
            Some(lecture) => (
                audio_locator(&self.config.audio_base, lecture),
                lecture.last_position,
            ),
            None => return Err(PlaybackError::UnknownLecture(id.clone())),
        };

        if previous.as_ref() != Some(id) {
            self.emit_lecture_changed(id.clone(), previous);
        }

        let Some(locator) = locator else {
            let err = PlaybackError::NoResource(id.clone());
            self.fail(err.clone());
            return Err(err);
        };
        self.pending_seek = (resume_at > 0.0).then_some(resume_at);
        self.pending_fraction = None;
        self.last_persisted_position = resume_at;
        self.set_state(PlaybackState::Loading);

        if let Some(update) = self.library.record_play_start(id, Utc::now()) {
            self.writer.save(id, update);
        }
        self.writer
            .save_last_session(LastSession::new(id.clone(), resume_at, Utc::now()));

        info!(lecture_id = %id, token = %self.token, resume_at, "Loading lecture");
        self.output.load(self.token, &locator);
        self.output.set_volume(self.volume);
        self.output.set_rate(self.rate);
        self.output.play();

        Ok(())
    }

    /// Playing <-> Paused
    ///
    /// While loading, flips an intent to stay paused once the output starts.
    /// Does nothing when idle.
    pub fn toggle_play_pause(&mut self) {
        match self.state {
            PlaybackState::Playing => {
                self.output.pause();
                self.set_state(PlaybackState::Paused);
                self.persist_position();
            }
            PlaybackState::Paused => {
                self.output.play();
                self.set_state(PlaybackState::Playing);
            }
            PlaybackState::Loading => {
                self.pause_requested = !self.pause_requested;
                debug!(pause_requested = self.pause_requested, "Pause intent while loading");
            }
            PlaybackState::Idle | PlaybackState::Ended => {}
        }
    }

    /// Seek to a fraction of the current lecture
    ///
    /// The fraction is clamped to [0, 1] (NaN counts as 0). Returns the new
    /// position in seconds, or `None` when nothing is current or the
    /// duration is not known yet. In the latter case the seek is held and
    /// applied once the output reports the duration; the saved position is
    /// left alone until then.
    pub fn seek(&mut self, fraction: f64) -> Option<f64> {
        let id = self.current.clone()?;
        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };

        let lecture = self.library.get(&id)?;
        let (known, duration) = (lecture.has_duration(), lecture.duration);
        if !known {
            debug!(lecture_id = %id, fraction, "Duration unknown, holding seek");
            self.pending_fraction = Some(fraction);
            self.pending_seek = None;
            return None;
        }

        let position = self.library.set_position(&id, fraction * duration)?;
        self.pending_fraction = None;

        if self.metadata_ready {
            self.output.seek(position);
        } else {
            self.pending_seek = Some(position);
        }

        self.emit_position_changed();
        self.persist_position();
        Some(position)
    }

    /// Advance to the next lecture
    ///
    /// In shuffle mode picks a random other lecture. Otherwise moves one step
    /// in catalog order, wrapping only with repeat all. With nothing current,
    /// starts the first lecture.
    pub fn next(&mut self) -> Result<()> {
        let len = self.library.len();
        let target = if self.shuffle {
            shuffle::pick_other(&mut thread_rng(), len, self.current_index)
        } else {
            match self.current_index {
                None if len > 0 => Some(0),
                Some(i) if i + 1 < len => Some(i + 1),
                Some(_) if self.repeat == RepeatMode::All && len > 0 => Some(0),
                _ => None,
            }
        };

        match target {
            Some(index) => self.play_index(index),
            None => {
                debug!("No next lecture");
                Ok(())
            }
        }
    }

    /// Go back one lecture in catalog order (random in shuffle mode)
    ///
    /// Does nothing at the first lecture.
    pub fn previous(&mut self) -> Result<()> {
        let len = self.library.len();
        let target = if self.shuffle {
            shuffle::pick_other(&mut thread_rng(), len, self.current_index)
        } else {
            match self.current_index {
                Some(i) if i > 0 => Some(i - 1),
                _ => None,
            }
        };

        match target {
            Some(index) => self.play_index(index),
            None => {
                debug!("No previous lecture");
                Ok(())
            }
        }
    }

    /// Pick up the last saved session if it is recent enough
    pub fn resume(&mut self, session: &LastSession, now: DateTime<Utc>) -> Result<ResumeOutcome> {
        if !session.is_fresh(now, self.config.resume_window()) {
            debug!(lecture_id = %session.lecture_id, "Last session too old to resume");
            return Ok(ResumeOutcome::Stale);
        }
        if self.library.get(&session.lecture_id).is_none() {
            debug!(lecture_id = %session.lecture_id, "Last session lecture no longer in catalog");
            return Ok(ResumeOutcome::MissingLecture);
        }

        self.library.set_position(&session.lecture_id, session.position);
        self.play(&session.lecture_id)?;
        Ok(ResumeOutcome::Started)
    }

    // ===== Audio events =====

    /// Apply a notification from the audio output
    ///
    /// Events for any load other than the most recent one are ignored.
    pub fn handle_event(&mut self, event: AudioEvent) {
        if event.token() != self.token {
            debug!(event_token = %event.token(), current = %self.token, "Ignoring stale audio event");
            return;
        }

        match event {
            AudioEvent::Started { .. } => self.on_started(),
            AudioEvent::MetadataReady { duration, .. } => self.on_metadata(duration),
            AudioEvent::PositionTick { position, .. } => self.on_tick(position),
            AudioEvent::Ended { .. } => self.on_ended(),
            AudioEvent::Error { message, .. } => {
                let id = self.current.clone();
                warn!(lecture_id = ?id, error = %message, "Audio output failed");
                self.fail(PlaybackError::output(message));
            }
        }
    }

    fn on_started(&mut self) {
        if self.state != PlaybackState::Loading {
            return;
        }
        if self.pause_requested {
            self.pause_requested = false;
            self.output.pause();
            self.set_state(PlaybackState::Paused);
        } else {
            self.set_state(PlaybackState::Playing);
        }
    }

    fn on_metadata(&mut self, duration: f64) {
        let Some(id) = self.current.clone() else {
            return;
        };
        self.library.set_duration(&id, duration);
        self.metadata_ready = true;

        if let Some(fraction) = self.pending_fraction {
            let known = self.library.get(&id).filter(|l| l.has_duration()).map(|l| l.duration);
            let Some(duration) = known else {
                debug!(lecture_id = %id, duration, "Reported duration unusable, seek still held");
                return;
            };
            self.pending_fraction = None;
            self.pending_seek = None;
            if let Some(position) = self.library.set_position(&id, fraction * duration) {
                self.output.seek(position);
                self.emit_position_changed();
                self.persist_position();
            }
            return;
        }

        if let Some(target) = self.pending_seek.take() {
            if let Some(position) = self.library.set_position(&id, target) {
                self.output.seek(position);
            }
        }
        self.emit_position_changed();
    }

    fn on_tick(&mut self, position: f64) {
        let Some(id) = self.current.clone() else {
            return;
        };
        // Ticks before a held seek lands would clobber the saved position
        if self.pending_seek.is_some() || self.pending_fraction.is_some() {
            return;
        }
        let Some(position) = self.library.set_position(&id, position) else {
            return;
        };
        self.emit_position_changed();

        let step = self.config.progress_persist_step;
        if step <= 0.0 || (position - self.last_persisted_position).abs() >= step {
            self.persist_position();
        }
    }

    /// End of lecture: reset its position, then replay, advance or stop
    fn on_ended(&mut self) {
        let Some(id) = self.current.clone() else {
            return;
        };
        self.set_state(PlaybackState::Ended);
        self.pending_fraction = None;
        self.library.set_position(&id, 0.0);
        self.persist_position();

        let len = self.library.len();
        let has_successor = self.current_index.is_some_and(|i| i + 1 < len);

        let result = match self.repeat {
            RepeatMode::One => self.play(&id),
            RepeatMode::All => self.next(),
            RepeatMode::None if has_successor => self.next(),
            RepeatMode::None => Ok(()),
        };
        if let Err(e) = result {
            debug!(error = %e, "Advancing after end failed");
        }

        // Shuffle has no other lecture to pick; repeat all replays this one
        if self.repeat == RepeatMode::All && self.state == PlaybackState::Ended {
            if let Err(e) = self.play(&id) {
                debug!(error = %e, "Replaying after end failed");
            }
        }

        if self.state == PlaybackState::Ended {
            self.set_state(PlaybackState::Idle);
        }
    }

    // ===== Favorites and bookmarks =====

    /// Flip a lecture's favorite flag and persist it
    ///
    /// Returns the new flag.
    pub fn toggle_favorite(&mut self, id: &LectureId) -> Result<bool> {
        let is_favorite = self
            .library
            .toggle_favorite(id)
            .ok_or_else(|| PlaybackError::UnknownLecture(id.clone()))?;

        self.writer.save(id, LectureStateUpdate::favorite(is_favorite));
        self.pending_events.push(PlaybackEvent::FavoriteChanged {
            lecture_id: id.clone(),
            is_favorite,
        });
        Ok(is_favorite)
    }

    /// Save the current position on request
    pub fn bookmark(&mut self) -> Option<f64> {
        let position = self.save_current()?;
        if let Some(id) = self.current.clone() {
            self.pending_events.push(PlaybackEvent::Bookmarked {
                lecture_id: id,
                position,
            });
        }
        Some(position)
    }

    /// Persist the current lecture's position and the last-session slot
    ///
    /// Call before shutdown. Returns the saved position.
    pub fn save_current(&mut self) -> Option<f64> {
        self.persist_position()
    }

    // ===== Modes =====

    pub fn set_volume(&mut self, volume: f64) {
        let Some(volume) = clamp_volume(volume) else {
            return;
        };
        self.volume = volume;
        self.output.set_volume(volume);
        self.pending_events.push(PlaybackEvent::VolumeChanged { volume });
    }

    /// Set playback rate, clamped to [0.25, 4.0]
    pub fn set_rate(&mut self, rate: f64) {
        let rate = if rate.is_finite() && rate > 0.0 {
            rate.clamp(MIN_RATE, MAX_RATE)
        } else {
            MIN_RATE
        };
        self.rate = rate;
        self.output.set_rate(rate);
        self.pending_events.push(PlaybackEvent::RateChanged { rate });
    }

    pub fn set_shuffle(&mut self, enabled: bool) {
        self.shuffle = enabled;
        self.pending_events.push(PlaybackEvent::ShuffleChanged { enabled });
    }

    pub fn toggle_shuffle(&mut self) -> bool {
        self.set_shuffle(!self.shuffle);
        self.shuffle
    }

    pub fn set_repeat(&mut self, mode: RepeatMode) {
        self.repeat = mode;
        self.pending_events.push(PlaybackEvent::RepeatChanged { mode });
    }

    /// none -> one -> all -> none
    pub fn cycle_repeat(&mut self) -> RepeatMode {
        self.set_repeat(self.repeat.cycle());
        self.repeat
    }

    // ===== Accessors =====

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn current_lecture(&self) -> Option<&Lecture> {
        self.current.as_ref().and_then(|id| self.library.get(id))
    }

    pub fn current_id(&self) -> Option<&LectureId> {
        self.current.as_ref()
    }

    /// Index of the current lecture in catalog order
    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    /// Position of the current lecture in seconds
    pub fn position(&self) -> Option<f64> {
        self.current_lecture().map(|l| l.last_position)
    }

    /// Token of the most recent load
    pub fn load_token(&self) -> LoadToken {
        self.token
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    pub fn repeat(&self) -> RepeatMode {
        self.repeat
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    /// Lectures visible for a query
    pub fn view(&self, query: &QueryState) -> Vec<&Lecture> {
        query::view(&self.library, query)
    }

    /// Drain all pending events
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Check if there are pending events
    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    // ===== Internal =====

    fn play_index(&mut self, index: usize) -> Result<()> {
        let id = self
            .library
            .at(index)
            .map(|l| l.id.clone())
            .ok_or_else(|| PlaybackError::output(format!("no lecture at index {index}")))?;
        self.play(&id)
    }

    /// Stop whatever is loading or playing and go idle with an error
    fn fail(&mut self, err: PlaybackError) {
        warn!(error = %err, "Playback failed");
        self.token = self.token.next();
        self.metadata_ready = false;
        self.pending_seek = None;
        self.pending_fraction = None;
        self.pause_requested = false;
        self.output.pause();
        if matches!(err, PlaybackError::UnknownLecture(_)) {
            self.current = None;
            self.current_index = None;
        }
        self.set_state(PlaybackState::Idle);
        self.pending_events.push(PlaybackEvent::Error {
            message: err.to_string(),
        });
    }

    /// Queue the current position for both the lecture record and the
    /// last-session slot
    fn persist_position(&mut self) -> Option<f64> {
        let lecture = self.current.as_ref().and_then(|id| self.library.get(id))?;
        let id = lecture.id.clone();
        let position = lecture.last_position;

        self.writer.save(&id, LectureStateUpdate::position(position));
        self.writer
            .save_last_session(LastSession::new(id, position, Utc::now()));
        self.last_persisted_position = position;
        Some(position)
    }

    fn set_state(&mut self, state: PlaybackState) {
        if self.state != state {
            self.state = state;
            self.pending_events.push(PlaybackEvent::StateChanged { state });
        }
    }

    fn emit_lecture_changed(&mut self, lecture_id: LectureId, previous_lecture_id: Option<LectureId>) {
        self.pending_events.push(PlaybackEvent::LectureChanged {
            lecture_id,
            previous_lecture_id,
        });
    }

    fn emit_position_changed(&mut self) {
        if let Some(lecture) = self.current_lecture() {
            let event = PlaybackEvent::PositionChanged {
                position: lecture.last_position,
                duration: lecture.duration,
            };
            self.pending_events.push(event);
        }
    }
}

/// Clamp to [0, 1]; `None` for NaN/inf
fn clamp_volume(volume: f64) -> Option<f64> {
    volume.is_finite().then(|| volume.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{OutputCommand, RecordingOutput};
    use lectern_storage::StateWrite;
    use tokio::sync::mpsc::UnboundedReceiver;

    fn create_test_lecture(id: &str, duration: f64) -> Lecture {
        let mut lecture = Lecture::new(id, format!("Lecture {id}"));
        lecture.filename = format!("{id}.mp3");
        lecture.duration = duration;
        lecture
    }

    fn controller(
        lectures: Vec<Lecture>,
    ) -> (PlaybackController<RecordingOutput>, UnboundedReceiver<StateWrite>) {
        let (writer, rx) = StateWriter::channel();
        let controller = PlaybackController::new(
            Library::from_lectures(lectures),
            RecordingOutput::new(),
            writer,
            PlaybackConfig::default(),
        );
        (controller, rx)
    }

    fn start(controller: &mut PlaybackController<RecordingOutput>, id: &str) {
        controller.play(&LectureId::new(id)).unwrap();
        let token = controller.load_token();
        controller.handle_event(AudioEvent::Started { token });
    }

    #[test]
    fn create_controller() {
        let (controller, _rx) = controller(vec![]);
        assert_eq!(controller.state(), PlaybackState::Idle);
        assert_eq!(controller.volume(), 0.7);
        assert_eq!(controller.rate(), 1.0);
        assert!(controller.current_lecture().is_none());
    }

    #[test]
    fn play_loads_and_starts() {
        let (mut controller, _rx) = controller(vec![create_test_lecture("a", 100.0)]);

        controller.play(&LectureId::new("a")).unwrap();
        assert_eq!(controller.state(), PlaybackState::Loading);
        assert_eq!(
            controller.output().last_load().map(|(_, l)| l.to_string()),
            Some("audio/a.mp3".to_string())
        );

        let token = controller.load_token();
        controller.handle_event(AudioEvent::Started { token });
        assert_eq!(controller.state(), PlaybackState::Playing);
        assert_eq!(controller.current_lecture().unwrap().play_count, 1);
    }

    #[test]
    fn toggle_pause_and_resume() {
        let (mut controller, _rx) = controller(vec![create_test_lecture("a", 100.0)]);
        start(&mut controller, "a");

        controller.toggle_play_pause();
        assert_eq!(controller.state(), PlaybackState::Paused);
        controller.toggle_play_pause();
        assert_eq!(controller.state(), PlaybackState::Playing);
    }

    #[test]
    fn toggle_when_idle_is_noop() {
        let (mut controller, _rx) = controller(vec![create_test_lecture("a", 100.0)]);
        controller.toggle_play_pause();
        assert_eq!(controller.state(), PlaybackState::Idle);
        assert!(controller.output().commands().iter().all(|c| !matches!(c, OutputCommand::Pause)));
    }

    #[test]
    fn rate_and_volume_clamp() {
        let (mut controller, _rx) = controller(vec![]);
        controller.set_rate(10.0);
        assert_eq!(controller.rate(), MAX_RATE);
        controller.set_rate(0.0);
        assert_eq!(controller.rate(), MIN_RATE);
        controller.set_rate(f64::NAN);
        assert_eq!(controller.rate(), MIN_RATE);
        controller.set_rate(1.5);
        assert_eq!(controller.rate(), 1.5);

        controller.set_volume(2.0);
        assert_eq!(controller.volume(), 1.0);
        controller.set_volume(-1.0);
        assert_eq!(controller.volume(), 0.0);
        controller.set_volume(f64::NAN);
        assert_eq!(controller.volume(), 0.0);
    }

    #[test]
    fn cycle_repeat_modes() {
        let (mut controller, _rx) = controller(vec![]);
        assert_eq!(controller.cycle_repeat(), RepeatMode::One);
        assert_eq!(controller.cycle_repeat(), RepeatMode::All);
        assert_eq!(controller.cycle_repeat(), RepeatMode::None);
    }

    #[test]
    fn favorite_toggle_is_persisted() {
        let (mut controller, mut rx) = controller(vec![create_test_lecture("a", 100.0)]);
        let id = LectureId::new("a");

        assert!(controller.toggle_favorite(&id).unwrap());
        assert_eq!(
            rx.try_recv().unwrap(),
            StateWrite::Lecture {
                id: id.clone(),
                update: LectureStateUpdate::favorite(true),
            }
        );
        assert!(controller.library().is_favorite(&id));
    }

    #[test]
    fn drain_events_empties_queue() {
        let (mut controller, _rx) = controller(vec![create_test_lecture("a", 100.0)]);
        start(&mut controller, "a");
        assert!(controller.has_pending_events());

        let events = controller.drain_events();
        assert!(events.contains(&PlaybackEvent::StateChanged {
            state: PlaybackState::Playing
        }));
        assert!(!controller.has_pending_events());
    }
}
