use chrono::Duration;

use crate::config::SchedulerConfig;
use crate::models::{Grade, ReviewOutcome, ReviewState};

/// Folds one review outcome into a card's scheduling state.
///
/// SM-2 style: a lapse resets the repetition streak and shrinks the ease
/// factor; a success grows the interval, fixed steps for the first two
/// repetitions and `interval * ease * grade multiplier` afterwards.
///
/// `current == None` means the card has never been reviewed; an initial
/// state is synthesized before the outcome is applied. Pure function:
/// persistence is the caller's responsibility, and it never touches the
/// clock — `outcome.reviewed_at` is the only notion of "now".
pub fn schedule(
    current: Option<&ReviewState>,
    card_id: &str,
    outcome: &ReviewOutcome,
    config: &SchedulerConfig,
) -> ReviewState {
    let mut state = match current {
        Some(s) => s.clone(),
        None => ReviewState {
            card_id: card_id.to_string(),
            interval_days: config.initial_interval_days,
            ease_factor: config.initial_ease,
            due_at: outcome.reviewed_at,
            repetitions: 0,
            lapses: 0,
        },
    };

    match outcome.grade {
        Grade::Fail => {
            state.repetitions = 0;
            state.lapses += 1;
            state.interval_days = config.min_interval_days;
            state.ease_factor = (state.ease_factor - config.ease_penalty).max(config.min_ease);
        }
        Grade::Hard | Grade::Good | Grade::Easy => {
            state.repetitions += 1;

            let (ease_delta, multiplier) = match outcome.grade {
                Grade::Hard => (config.hard_ease_delta, config.hard_interval_multiplier),
                Grade::Easy => (config.easy_ease_delta, config.easy_interval_multiplier),
                _ => (0.0, 1.0),
            };

            state.ease_factor =
                (state.ease_factor + ease_delta).clamp(config.min_ease, config.max_ease);

            state.interval_days = match state.repetitions {
                1 => config.first_interval_days,
                2 => config.second_interval_days,
                _ => (state.interval_days * state.ease_factor * multiplier)
                    .max(config.min_interval_days),
            };
        }
    }

    // Whole-day granularity for due dates; fractional intervals round up
    // so a card is never due earlier than its computed spacing.
    state.due_at = outcome.reviewed_at + Duration::days(state.interval_days.ceil() as i64);

    state
}
