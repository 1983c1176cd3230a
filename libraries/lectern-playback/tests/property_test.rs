//! Property-based tests for the playback controller
//!
//! Random operation sequences must never break the controller's invariants:
//! positions stay inside the lecture, favorites stay in sync with the flags,
//! volume and rate stay inside their ranges.

use lectern_core::{Lecture, LectureId};
use lectern_library::Library;
use lectern_playback::{
    AudioEvent, PlaybackConfig, PlaybackController, PlaybackState, RecordingOutput, RepeatMode,
    MAX_RATE, MIN_RATE,
};
use lectern_storage::StateWriter;
use proptest::prelude::*;
use std::collections::HashSet;

// ===== Helpers =====

fn arbitrary_lecture() -> impl Strategy<Value = Lecture> {
    (
        "[a-z0-9]{1,10}",   // id
        "[A-Za-z ]{1,30}",  // title
        1.0f64..7200.0,     // duration
        0.0f64..1.5,        // saved position as a fraction of duration
        any::<bool>(),      // favorite
    )
        .prop_map(|(id, title, duration, fraction, is_favorite)| {
            let mut lecture = Lecture::new(id.as_str(), title);
            lecture.filename = format!("{id}.mp3");
            lecture.duration = duration;
            lecture.last_position = lecture.clamp_position(fraction * duration);
            lecture.is_favorite = is_favorite;
            lecture
        })
}

fn arbitrary_lectures() -> impl Strategy<Value = Vec<Lecture>> {
    prop::collection::vec(arbitrary_lecture(), 1..20)
}

#[derive(Debug, Clone)]
enum Op {
    Play(usize),
    Toggle,
    Seek(f64),
    Next,
    Previous,
    Favorite(usize),
    Started,
    Metadata(f64),
    Tick(f64),
    Ended,
    Error,
    StaleStarted,
    Shuffle,
    Repeat,
}

fn arbitrary_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..25).prop_map(Op::Play),
        Just(Op::Toggle),
        (-1.0f64..2.0).prop_map(Op::Seek),
        Just(Op::Next),
        Just(Op::Previous),
        (0usize..25).prop_map(Op::Favorite),
        Just(Op::Started),
        (1.0f64..7200.0).prop_map(Op::Metadata),
        (-10.0f64..8000.0).prop_map(Op::Tick),
        Just(Op::Ended),
        Just(Op::Error),
        Just(Op::StaleStarted),
        Just(Op::Shuffle),
        Just(Op::Repeat),
    ]
}

fn controller(lectures: Vec<Lecture>) -> PlaybackController<RecordingOutput> {
    // Writes are not inspected here; a closed channel only logs
    let (writer, _) = StateWriter::channel();
    PlaybackController::new(
        Library::from_lectures(lectures),
        RecordingOutput::new(),
        writer,
        PlaybackConfig::default(),
    )
}

fn id_at(controller: &PlaybackController<RecordingOutput>, index: usize) -> LectureId {
    let len = controller.library().len();
    controller.library().at(index % len).map(|l| l.id.clone()).unwrap()
}

fn apply(controller: &mut PlaybackController<RecordingOutput>, op: Op) {
    let token = controller.load_token();
    match op {
        Op::Play(i) => {
            let id = id_at(controller, i);
            controller.play(&id).ok();
        }
        Op::Toggle => controller.toggle_play_pause(),
        Op::Seek(fraction) => {
            controller.seek(fraction);
        }
        Op::Next => {
            controller.next().ok();
        }
        Op::Previous => {
            controller.previous().ok();
        }
        Op::Favorite(i) => {
            let id = id_at(controller, i);
            controller.toggle_favorite(&id).ok();
        }
        Op::Started => controller.handle_event(AudioEvent::Started { token }),
        Op::Metadata(duration) => controller.handle_event(AudioEvent::MetadataReady { token, duration }),
        Op::Tick(position) => controller.handle_event(AudioEvent::PositionTick { token, position }),
        Op::Ended => controller.handle_event(AudioEvent::Ended { token }),
        Op::Error => controller.handle_event(AudioEvent::Error {
            token,
            message: "boom".to_string(),
        }),
        Op::StaleStarted => {
            if token.value() > 0 {
                controller.handle_event(AudioEvent::Started {
                    token: lectern_playback::LoadToken::default(),
                });
            }
        }
        Op::Shuffle => {
            controller.toggle_shuffle();
        }
        Op::Repeat => {
            controller.cycle_repeat();
        }
    }
}

fn check_invariants(controller: &PlaybackController<RecordingOutput>) -> Result<(), TestCaseError> {
    let library = controller.library();

    for lecture in library.lectures() {
        prop_assert!(lecture.last_position >= 0.0, "negative position for {}", lecture.id);
        if lecture.has_duration() {
            prop_assert!(
                lecture.last_position <= lecture.duration,
                "position {} past duration {} for {}",
                lecture.last_position,
                lecture.duration,
                lecture.id
            );
        }
        prop_assert_eq!(lecture.is_favorite, library.is_favorite(&lecture.id));
    }

    let flagged: HashSet<LectureId> = library
        .lectures()
        .iter()
        .filter(|l| l.is_favorite)
        .map(|l| l.id.clone())
        .collect();
    prop_assert_eq!(&flagged, library.favorites());

    prop_assert!((0.0..=1.0).contains(&controller.volume()));
    prop_assert!((MIN_RATE..=MAX_RATE).contains(&controller.rate()));
    prop_assert_ne!(controller.state(), PlaybackState::Ended, "Ended must resolve immediately");

    if let Some(index) = controller.current_index() {
        prop_assert!(index < library.len());
        prop_assert_eq!(
            controller.current_id(),
            library.at(index).map(|l| &l.id)
        );
    }

    prop_assert!(library.history().len() <= library.history().max_size());
    Ok(())
}

// ===== Property Tests =====

proptest! {
    /// Property: invariants hold after every operation in any sequence
    #[test]
    fn random_operations_keep_invariants(
        lectures in arbitrary_lectures(),
        ops in prop::collection::vec(arbitrary_op(), 1..60)
    ) {
        let mut controller = controller(lectures);
        check_invariants(&controller)?;

        for op in ops {
            apply(&mut controller, op);
            check_invariants(&controller)?;
        }
    }

    /// Property: toggling a favorite twice is the identity
    #[test]
    fn double_favorite_toggle_is_identity(
        lectures in arbitrary_lectures(),
        index in 0usize..25
    ) {
        let mut controller = controller(lectures);
        let id = id_at(&controller, index);
        let before = controller.library().is_favorite(&id);
        let favorites_before = controller.library().favorites().clone();

        let first = controller.toggle_favorite(&id).unwrap();
        let second = controller.toggle_favorite(&id).unwrap();

        prop_assert_eq!(first, !before);
        prop_assert_eq!(second, before);
        prop_assert_eq!(controller.library().favorites(), &favorites_before);
    }

    /// Property: seek lands inside [0, duration] for any input
    #[test]
    fn seek_always_within_duration(
        duration in 1.0f64..36000.0,
        fraction in prop::num::f64::ANY
    ) {
        let mut lecture = Lecture::new("l", "Lecture");
        lecture.filename = "l.mp3".to_string();
        lecture.duration = duration;
        let mut controller = controller(vec![lecture]);
        controller.play(&LectureId::new("l")).unwrap();

        let position = controller.seek(fraction).unwrap();
        prop_assert!(position >= 0.0 && position <= duration, "seek({}) -> {}", fraction, position);
        if (0.0..=1.0).contains(&fraction) {
            prop_assert!((position - fraction * duration).abs() < 1e-6);
        }
    }

    /// Property: volume is always clamped to [0, 1]
    #[test]
    fn volume_clamped_to_range(volume in prop::num::f64::ANY) {
        let mut controller = controller(vec![]);
        controller.set_volume(volume);
        prop_assert!((0.0..=1.0).contains(&controller.volume()));
    }

    /// Property: rate is always clamped to [MIN_RATE, MAX_RATE]
    #[test]
    fn rate_clamped_to_range(rate in prop::num::f64::ANY) {
        let mut controller = controller(vec![]);
        controller.set_rate(rate);
        let actual = controller.rate();
        prop_assert!((MIN_RATE..=MAX_RATE).contains(&actual), "rate {} -> {}", rate, actual);
    }

    /// Property: repeat one replays the same lecture from the start
    #[test]
    fn repeat_one_replays_same_lecture(
        lectures in arbitrary_lectures(),
        index in 0usize..25
    ) {
        let mut controller = controller(lectures);
        controller.set_repeat(RepeatMode::One);
        let id = id_at(&controller, index);

        controller.play(&id).unwrap();
        let token = controller.load_token();
        controller.handle_event(AudioEvent::Started { token });
        controller.handle_event(AudioEvent::Ended { token });

        prop_assert_eq!(controller.current_id(), Some(&id));
        prop_assert_eq!(controller.position(), Some(0.0));
        prop_assert_eq!(controller.state(), PlaybackState::Loading);
    }
}
