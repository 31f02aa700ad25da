use crate::commands::CmdResult;
use crate::model::AppState;

pub fn entries(state: &AppState) -> CmdResult {
    let listed = state.sorted_entries().into_iter().cloned().collect();
    CmdResult::default()
        .with_listed_entries(listed)
        .with_prefs(state.prefs)
}

pub fn trails(state: &AppState) -> CmdResult {
    let listed = state.sorted_trails().into_iter().cloned().collect();
    CmdResult::default()
        .with_listed_trails(listed)
        .with_prefs(state.prefs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Entry, Trail};

    #[test]
    fn test_entries_newest_first() {
        let mut state = AppState::default();
        for (ts, text) in [(10, "middle"), (30, "newest"), (1, "oldest")] {
            state.entries.push(Entry {
                ts,
                ..Entry::new(text.into(), None, None)
            });
        }

        let res = entries(&state);
        let texts: Vec<&str> = res.listed_entries.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["newest", "middle", "oldest"]);
        assert!(!res.state_changed);
    }

    #[test]
    fn test_trails_carry_unit() {
        let mut state = AppState::default();
        state.trails.push(Trail::new(5));
        state.prefs.unit = crate::model::Unit::Imperial;

        let res = trails(&state);
        assert_eq!(res.listed_trails.len(), 1);
        assert_eq!(res.prefs.unwrap().unit, crate::model::Unit::Imperial);
    }
}
