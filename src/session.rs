use chrono::{DateTime, Utc};

use crate::models::ReviewState;

/// What to do when fewer than `limit` cards are due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillPolicy {
    /// Return only cards whose due date has passed.
    DueOnly,
    /// Pad the batch with the soonest not-yet-due cards.
    FillAhead,
}

/// Picks the cards for a study session.
///
/// Due cards first, most overdue leading; among cards due at the same
/// instant, the ones with more lapses surface first. Pure read over the
/// caller's snapshot — recomputed fresh on every call, no cursor state.
pub fn select_due(
    states: &[ReviewState],
    now: DateTime<Utc>,
    limit: usize,
    fill: FillPolicy,
) -> Vec<String> {
    let mut due: Vec<&ReviewState> = states.iter().filter(|s| s.is_due(now)).collect();
    due.sort_by(|a, b| a.due_at.cmp(&b.due_at).then(b.lapses.cmp(&a.lapses)));

    let mut picked: Vec<String> = due
        .into_iter()
        .take(limit)
        .map(|s| s.card_id.clone())
        .collect();

    if fill == FillPolicy::FillAhead && picked.len() < limit {
        let mut ahead: Vec<&ReviewState> = states.iter().filter(|s| !s.is_due(now)).collect();
        ahead.sort_by_key(|s| s.due_at);

        picked.extend(
            ahead
                .into_iter()
                .take(limit - picked.len())
                .map(|s| s.card_id.clone()),
        );
    }

    picked
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn state(card_id: &str, due_offset_days: i64, lapses: u32) -> ReviewState {
        ReviewState {
            card_id: card_id.to_string(),
            interval_days: 1.0,
            ease_factor: 2.5,
            due_at: now() + Duration::days(due_offset_days),
            repetitions: 1,
            lapses,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn most_overdue_card_comes_first() {
        let states = vec![state("a", -1, 0), state("b", -2, 0)];
        let picked = select_due(&states, now(), 20, FillPolicy::DueOnly);
        assert_eq!(picked, vec!["b", "a"]);
    }

    #[test]
    fn never_returns_cards_that_are_not_due() {
        let states = vec![state("a", -1, 0), state("b", 1, 0), state("c", 3, 0)];
        let picked = select_due(&states, now(), 20, FillPolicy::DueOnly);
        assert_eq!(picked, vec!["a"]);
    }

    #[test]
    fn card_due_exactly_now_is_due() {
        let states = vec![state("a", 0, 0)];
        let picked = select_due(&states, now(), 20, FillPolicy::DueOnly);
        assert_eq!(picked, vec!["a"]);
    }

    #[test]
    fn equally_due_cards_order_by_lapses() {
        let states = vec![state("steady", -1, 0), state("leech", -1, 4)];
        let picked = select_due(&states, now(), 20, FillPolicy::DueOnly);
        assert_eq!(picked, vec!["leech", "steady"]);
    }

    #[test]
    fn output_is_truncated_to_limit() {
        let states: Vec<ReviewState> = (0..50)
            .map(|i| state(&format!("card-{i}"), -(i as i64) - 1, 0))
            .collect();
        let picked = select_due(&states, now(), 20, FillPolicy::DueOnly);
        assert_eq!(picked.len(), 20);
    }

    #[test]
    fn fill_ahead_pads_with_soonest_upcoming_cards() {
        let states = vec![
            state("due", -1, 0),
            state("tomorrow", 1, 0),
            state("next-week", 7, 0),
        ];

        let picked = select_due(&states, now(), 2, FillPolicy::FillAhead);
        assert_eq!(picked, vec!["due", "tomorrow"]);
    }

    #[test]
    fn fill_ahead_still_respects_limit() {
        let states = vec![state("a", -1, 0), state("b", 1, 0), state("c", 2, 0)];
        let picked = select_due(&states, now(), 2, FillPolicy::FillAhead);
        assert_eq!(picked.len(), 2);
    }

    #[test]
    fn empty_input_yields_empty_session() {
        let picked = select_due(&[], now(), 20, FillPolicy::FillAhead);
        assert!(picked.is_empty());
    }
}
