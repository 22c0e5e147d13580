// Integration tests for Ghostly Chronicles
// These walk the game's state machine end to end and exercise the audio
// engine contracts that hold with or without a real output device.

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;

use ghostly_chronicles::audio::dialogue::SpeakingState;
use ghostly_chronicles::audio::synth::{peak, render, SAMPLE_RATE};
use ghostly_chronicles::audio::{AudioEngine, SfxKind, DEFAULT_MASTER_VOLUME};
use ghostly_chronicles::game::{flow, ChoiceOutcome, GameState, GameStatus, SavedSession};
use ghostly_chronicles::levels;

fn day(n: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 10, n).unwrap()
}

fn correct_index(level: u32) -> usize {
    levels::level(level)
        .unwrap()
        .choices
        .iter()
        .position(|c| c.is_correct)
        .unwrap()
}

fn wrong_index(level: u32) -> usize {
    levels::level(level)
        .unwrap()
        .choices
        .iter()
        .position(|c| !c.is_correct && c.item_required.is_none())
        .unwrap()
}

#[test]
fn full_run_on_the_canonical_path() {
    let mut state = GameState::new(day(1));

    for level in 1..=levels::final_level() {
        assert_eq!(state.level(), level);
        let outcome = flow::resolve_choice(&mut state, correct_index(level)).unwrap();

        if level == levels::final_level() {
            assert!(matches!(outcome, ChoiceOutcome::FinalSuccess { .. }));
            assert_eq!(state.status(), GameStatus::Ending);
        } else {
            assert!(matches!(outcome, ChoiceOutcome::Success { .. }));
            assert_eq!(state.status(), GameStatus::Interaction);
            flow::advance_level(&mut state);
            assert_eq!(state.status(), GameStatus::LevelStart);
        }
    }

    // The whole item chain was collected and no life was ever lost.
    assert_eq!(state.lives(), levels::MAX_LIVES);
    for item in [
        "Rusted Key",
        "Old Map",
        "Brass Flashlight",
        "Winding Key",
        "Silver Locket",
        "Mirror Shard",
        "Cellar Key",
    ] {
        assert!(state.has_item(item), "missing {}", item);
    }
}

#[test]
fn wrong_choices_burn_lives_and_blocked_choices_do_not() {
    let mut state = GameState::new(day(1));

    // A wrong choice costs a life and fails the level.
    flow::resolve_choice(&mut state, wrong_index(1)).unwrap();
    assert_eq!(state.lives(), levels::MAX_LIVES - 1);
    assert_eq!(state.status(), GameStatus::LevelFailed);

    flow::retry_level(&mut state);
    assert_eq!(state.status(), GameStatus::LevelStart);

    // Jump ahead without the key: the gated choice refuses, free of charge.
    state.enter_level(2);
    let outcome = flow::resolve_choice(&mut state, correct_index(2)).unwrap();
    assert!(matches!(outcome, ChoiceOutcome::Blocked { .. }));
    assert_eq!(state.lives(), levels::MAX_LIVES - 1);
}

#[test]
fn lives_run_out_but_never_underflow() {
    let mut state = GameState::new(day(1));
    for _ in 0..5 {
        flow::resolve_choice(&mut state, wrong_index(1)).unwrap();
        flow::retry_level(&mut state);
    }
    assert_eq!(state.lives(), 0);
}

#[test]
fn daily_reset_preserves_progress_only() {
    let mut state = GameState::new(day(1));
    for level in 1..=4 {
        flow::resolve_choice(&mut state, correct_index(level)).unwrap();
        flow::advance_level(&mut state);
    }
    flow::resolve_choice(&mut state, wrong_index(5)).unwrap();
    assert_eq!(state.level(), 5);
    assert_eq!(state.lives(), levels::MAX_LIVES - 1);
    assert!(!state.inventory().is_empty());

    // Same day: nothing changes across a save/load cycle.
    let same_day = SavedSession::from_state(&state).into_state(day(1));
    assert_eq!(same_day.lives(), levels::MAX_LIVES - 1);
    assert!(same_day.has_item("Winding Key"));

    // Next day: lives and satchel reset, the room does not.
    let next_day = SavedSession::from_state(&state).into_state(day(2));
    assert_eq!(next_day.level(), 5);
    assert_eq!(next_day.lives(), levels::MAX_LIVES);
    assert!(next_day.inventory().is_empty());
    assert!(next_day.journal().is_empty());
}

#[test]
fn a_reset_day_regates_the_item_chain() {
    // After the daily reset strips the satchel, a room that needs an item
    // blocks again even though the player had it yesterday.
    let mut state = GameState::new(day(1));
    flow::resolve_choice(&mut state, correct_index(1)).unwrap();
    flow::advance_level(&mut state);

    let mut today = SavedSession::from_state(&state).into_state(day(2));
    today.set_status(GameStatus::Playing);
    let outcome = flow::resolve_choice(&mut today, correct_index(2)).unwrap();
    assert!(matches!(outcome, ChoiceOutcome::Blocked { .. }));
}

#[test]
fn every_sfx_renders_bounded_and_self_terminating() {
    let mut rng = StdRng::seed_from_u64(42);
    for kind in SfxKind::ALL {
        let recipe = kind.recipe(&mut rng);
        let samples = render(&recipe, &mut rng);

        assert_eq!(
            samples.len(),
            (SAMPLE_RATE as f32 * recipe.duration) as usize,
            "{} length",
            kind
        );
        assert!(samples.iter().all(|s| (-1.0..=1.0).contains(s)));
        assert!(peak(&samples) > 0.001, "{} is silent", kind);

        let tail = &samples[samples.len().saturating_sub(64)..];
        assert!(peak(tail) < 0.02, "{} never stops", kind);
    }
}

#[test]
fn rapid_sfx_sequence_builds_independent_buffers() {
    // click, door, success back to back: three separate node graphs, none
    // cancels another.
    let mut rng = StdRng::seed_from_u64(7);
    let buffers: Vec<Vec<f32>> = [SfxKind::Click, SfxKind::Door, SfxKind::Success]
        .into_iter()
        .map(|kind| {
            let recipe = kind.recipe(&mut rng);
            render(&recipe, &mut rng)
        })
        .collect();

    for buffer in &buffers {
        assert!(peak(buffer) > 0.001);
    }
    assert_ne!(buffers[0].len(), buffers[1].len());
    assert_ne!(buffers[1].len(), buffers[2].len());
}

#[test]
fn engine_guards_hold_with_or_without_a_device() {
    let mut engine = AudioEngine::new(DEFAULT_MASTER_VOLUME);
    let available = engine.ensure_ready();

    // Repeated starts create at most one ambient voice.
    engine.start_ambient();
    assert_eq!(engine.ambient_active(), available);
    engine.start_ambient();
    assert_eq!(engine.ambient_active(), available);

    // Double stop is safe, and a later start is a clean restart.
    engine.stop_ambient();
    assert!(!engine.ambient_active());
    engine.stop_ambient();
    assert!(!engine.ambient_active());
    engine.start_ambient();
    assert_eq!(engine.ambient_active(), available);

    // Every effect of the fixed enumeration schedules without panicking.
    for kind in SfxKind::ALL {
        engine.play_sfx(kind);
    }
    engine.play_sfx_named("no_such_effect");

    engine.stop_dialogue();
    assert!(!engine.is_speaking());
}

#[test]
fn newer_dialogue_always_wins() {
    let state = SpeakingState::new();

    // Clip A starts, then clip B supersedes it mid-flight.
    let a = state.begin();
    let b = state.begin();

    // A's completion arrives late: ignored, B still speaking.
    assert!(!state.finish(a));
    assert!(state.is_speaking());

    // B finishes naturally.
    assert!(state.finish(b));
    assert!(!state.is_speaking());
}

#[test]
fn no_payload_clears_the_speaking_flag() {
    let state = SpeakingState::new();
    let generation = state.begin();
    assert!(state.is_speaking());

    // The speech service returned nothing: the caller finishes its own
    // generation and the flag drops.
    assert!(state.finish(generation));
    assert!(!state.is_speaking());
}

#[test]
fn explicit_stop_beats_a_sleeping_watcher() {
    let state = SpeakingState::new();
    let generation = state.begin();

    state.halt();
    assert!(!state.is_speaking());

    let replacement = state.begin();
    assert!(state.is_speaking());

    // The stopped clip's watcher wakes up last and must change nothing.
    assert!(!state.finish(generation));
    assert!(state.is_speaking());
    assert!(state.finish(replacement));
}
