/// Choice resolution and screen transitions
///
/// Resolution is pure over the state and the static level table; callers
/// publish events from the returned outcome.
use super::state::{GameState, GameStatus};
use crate::levels;

/// Result of resolving a player choice.
#[derive(Debug, Clone, PartialEq)]
pub enum ChoiceOutcome {
    /// The choice is gated behind an item Ace does not carry. No state
    /// change, no life lost.
    Blocked { item_required: String },

    /// Correct choice; the room is cleared.
    Success {
        consequence: &'static str,
        item_found: Option<&'static str>,
    },

    /// Correct choice in the last room; the story ends.
    FinalSuccess { consequence: &'static str },

    /// Wrong choice; a life is gone.
    Failure {
        consequence: &'static str,
        lives_left: u32,
    },
}

/// Resolve choice `index` of the current level against the state, applying
/// the resulting transition. `None` when the level or index is out of
/// range.
pub fn resolve_choice(state: &mut GameState, index: usize) -> Option<ChoiceOutcome> {
    let level = levels::level(state.level())?;
    let choice = level.choices.get(index)?;

    if let Some(required) = choice.item_required {
        if !state.has_item(required) {
            return Some(ChoiceOutcome::Blocked {
                item_required: required.to_string(),
            });
        }
    }

    if choice.is_correct {
        if let Some(item) = choice.item_found {
            state.grant_item(item);
        }
        if state.level() == levels::final_level() {
            state.set_status(GameStatus::Ending);
            Some(ChoiceOutcome::FinalSuccess {
                consequence: choice.consequence,
            })
        } else {
            state.set_status(GameStatus::Interaction);
            Some(ChoiceOutcome::Success {
                consequence: choice.consequence,
                item_found: choice.item_found,
            })
        }
    } else {
        let lives_left = state.lose_life();
        state.set_status(GameStatus::LevelFailed);
        Some(ChoiceOutcome::Failure {
            consequence: choice.consequence,
            lives_left,
        })
    }
}

/// Move Ace through the door into the next room.
pub fn advance_level(state: &mut GameState) {
    let next = (state.level() + 1).min(levels::final_level());
    state.enter_level(next);
    state.set_status(GameStatus::LevelStart);
}

/// Face the same room again after a failure.
pub fn retry_level(state: &mut GameState) {
    state.set_status(GameStatus::LevelStart);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn fresh_state() -> GameState {
        GameState::new(NaiveDate::from_ymd_opt(2024, 10, 1).unwrap())
    }

    /// Index of the correct choice for a level, straight from the table.
    fn correct_index(level: u32) -> usize {
        levels::level(level)
            .unwrap()
            .choices
            .iter()
            .position(|c| c.is_correct)
            .unwrap()
    }

    #[test]
    fn test_correct_choice_clears_room_and_grants_item() {
        let mut state = fresh_state();
        let outcome = resolve_choice(&mut state, correct_index(1)).unwrap();

        match outcome {
            ChoiceOutcome::Success { item_found, .. } => {
                assert_eq!(item_found, Some("Rusted Key"));
            }
            other => panic!("expected success, got {:?}", other),
        }
        assert!(state.has_item("Rusted Key"));
        assert_eq!(state.status(), GameStatus::Interaction);
        assert_eq!(state.lives(), 3);
    }

    #[test]
    fn test_wrong_choice_costs_a_life() {
        let mut state = fresh_state();
        let wrong = levels::level(1)
            .unwrap()
            .choices
            .iter()
            .position(|c| !c.is_correct)
            .unwrap();

        let outcome = resolve_choice(&mut state, wrong).unwrap();
        match outcome {
            ChoiceOutcome::Failure { lives_left, .. } => assert_eq!(lives_left, 2),
            other => panic!("expected failure, got {:?}", other),
        }
        assert_eq!(state.status(), GameStatus::LevelFailed);
    }

    #[test]
    fn test_gated_choice_blocks_without_item() {
        let mut state = fresh_state();
        state.enter_level(2);
        // Level 2's correct choice requires the Rusted Key.
        let outcome = resolve_choice(&mut state, correct_index(2)).unwrap();

        match outcome {
            ChoiceOutcome::Blocked { item_required } => {
                assert_eq!(item_required, "Rusted Key");
            }
            other => panic!("expected blocked, got {:?}", other),
        }
        // Blocked attempts cost nothing.
        assert_eq!(state.lives(), 3);
        assert_eq!(state.status(), GameStatus::Menu);
    }

    #[test]
    fn test_gated_choice_passes_with_item() {
        let mut state = fresh_state();
        state.grant_item("Rusted Key");
        state.enter_level(2);

        let outcome = resolve_choice(&mut state, correct_index(2)).unwrap();
        assert!(matches!(outcome, ChoiceOutcome::Success { .. }));
        assert!(state.has_item("Old Map"));
    }

    #[test]
    fn test_final_level_success_ends_the_story() {
        let mut state = fresh_state();
        state.grant_item("Cellar Key");
        state.enter_level(10);

        let outcome = resolve_choice(&mut state, correct_index(10)).unwrap();
        assert!(matches!(outcome, ChoiceOutcome::FinalSuccess { .. }));
        assert_eq!(state.status(), GameStatus::Ending);
    }

    #[test]
    fn test_out_of_range_choice_is_none() {
        let mut state = fresh_state();
        assert!(resolve_choice(&mut state, 99).is_none());
    }

    #[test]
    fn test_advance_and_retry() {
        let mut state = fresh_state();
        advance_level(&mut state);
        assert_eq!(state.level(), 2);
        assert_eq!(state.status(), GameStatus::LevelStart);

        state.set_status(GameStatus::LevelFailed);
        retry_level(&mut state);
        assert_eq!(state.level(), 2);
        assert_eq!(state.status(), GameStatus::LevelStart);
    }

    #[test]
    fn test_advance_saturates_at_final_level() {
        let mut state = fresh_state();
        state.enter_level(10);
        advance_level(&mut state);
        assert_eq!(state.level(), 10);
    }
}
