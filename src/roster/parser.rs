//! Roster message parsing.
//!
//! The roster format is a fixed template: each category header (救急 / AM院内 /
//! PM院内 / 残り番) on its own line, followed by one name per line. Parsing
//! never fails — unrecognized lines before the first header are dropped, and a
//! message missing sections simply yields empty lists for them.

use crate::roster::model::{Category, WeeklyRoster};

/// Registration gate: a message is treated as a roster submission only when it
/// contains all four category labels as substrings. Anything else is an
/// unrelated chat message.
pub fn is_roster_message(text: &str) -> bool {
    contains_all_labels(text, &Category::ALL)
}

/// Pure predicate over an explicit label set, so the gate is testable
/// independently of the fixed [`Category::ALL`] list.
pub fn contains_all_labels(text: &str, categories: &[Category]) -> bool {
    categories.iter().all(|c| text.contains(c.label()))
}

/// Parse a roster message into a `WeeklyRoster`.
///
/// Line-cursor algorithm: blank lines are skipped; a line exactly equal to a
/// category label (after trimming) moves the cursor to that category; any other
/// line is appended to the current category's list. Header lines themselves are
/// never stored as entries.
pub fn parse(raw: &str) -> WeeklyRoster {
    let mut roster = WeeklyRoster::empty();
    let mut current: Option<Category> = None;

    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(cat) = Category::ALL.iter().find(|c| c.label() == line) {
            current = Some(*cat);
            continue;
        }
        if let Some(cat) = current {
            roster.entries_mut(cat).push(line.to_string());
        }
    }

    roster
}
