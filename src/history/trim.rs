//! History trimming that preserves conversation turn structure.

use crate::types::{Role, Turn};

/// Trim `history` to at most `max_len` turns, keeping the newest ones.
///
/// The kept suffix must start on a user turn so the model never sees a
/// conversation that opens mid-answer. If no user turn falls inside the
/// tail window, the history is returned untrimmed; callers tolerate an
/// oversized window over a broken one.
#[must_use]
pub fn trim(mut history: Vec<Turn>, max_len: usize) -> Vec<Turn> {
    if history.len() <= max_len {
        return history;
    }

    let window_start = history.len() - max_len;
    match history[window_start..]
        .iter()
        .position(|turn| turn.role == Role::User)
    {
        Some(offset) => history.split_off(window_start + offset),
        None => history,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role::{Model, User};

    fn conversation(roles: &[Role]) -> Vec<Turn> {
        roles
            .iter()
            .enumerate()
            .map(|(i, role)| match role {
                Role::User => Turn::user(format!("user {i}")),
                Role::Model => Turn::model(format!("model {i}")),
            })
            .collect()
    }

    #[test]
    fn short_history_is_untouched() {
        let history = conversation(&[User, Model]);
        assert_eq!(trim(history.clone(), 10), history);
    }

    #[test]
    fn exact_length_is_untouched() {
        let history = conversation(&[User, Model, User, Model]);
        assert_eq!(trim(history.clone(), 4), history);
    }

    #[test]
    fn trims_to_window_start_on_user_turn() {
        let history = conversation(&[User, Model, User, Model, User, Model]);
        let trimmed = trim(history.clone(), 4);
        assert_eq!(trimmed, history[2..]);
        assert_eq!(trimmed[0].text(), "user 2");
    }

    #[test]
    fn skips_model_turns_at_window_start() {
        let history = conversation(&[User, Model, Model, User, Model]);
        let trimmed = trim(history.clone(), 4);
        assert_eq!(trimmed, history[3..]);
    }

    #[test]
    fn earliest_user_turn_in_window_wins() {
        let history = conversation(&[Model, User, User, Model]);
        let trimmed = trim(history.clone(), 3);
        assert_eq!(trimmed, history[1..]);
    }

    #[test]
    fn returns_all_when_window_has_no_user_turn() {
        let history = conversation(&[User, Model, Model, Model]);
        assert_eq!(trim(history.clone(), 2), history);
    }

    #[test]
    fn zero_max_returns_all() {
        let history = conversation(&[User, Model]);
        assert_eq!(trim(history.clone(), 0), history);
    }

    #[test]
    fn trim_is_idempotent() {
        let history = conversation(&[User, Model, User, Model, User, Model]);
        let once = trim(history, 4);
        let twice = trim(once.clone(), 4);
        assert_eq!(once, twice);
    }
}
