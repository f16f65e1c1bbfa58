//! Core roster types.
//!
//! A `WeeklyRoster` holds one ordered entry list per duty category. The three
//! simple categories index by weekday (0 = Monday); the residual list holds a
//! primary/secondary pair per weekday. Lists shorter than a full week are
//! valid — missing slots resolve to [`UNASSIGNED`].

use serde::{Deserialize, Serialize};

/// Placeholder shown when no entry exists for a requested slot.
pub const UNASSIGNED: &str = "未設定";

/// The four fixed duty categories tracked per weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// 救急 — emergency duty.
    Emergency,
    /// AM院内 — morning in-house duty.
    MorningInHouse,
    /// PM院内 — afternoon in-house duty.
    AfternoonInHouse,
    /// 残り番 — rotating two-person on-call pair.
    Residual,
}

impl Category {
    /// All categories, in the order they appear in a roster message.
    pub const ALL: [Category; 4] = [
        Category::Emergency,
        Category::MorningInHouse,
        Category::AfternoonInHouse,
        Category::Residual,
    ];

    /// The canonical section header for this category.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Emergency => "救急",
            Category::MorningInHouse => "AM院内",
            Category::AfternoonInHouse => "PM院内",
            Category::Residual => "残り番",
        }
    }

    /// The string tag stored in the DB category column.
    pub fn type_tag(&self) -> &'static str {
        match self {
            Category::Emergency => "emergency",
            Category::MorningInHouse => "morning_in_house",
            Category::AfternoonInHouse => "afternoon_in_house",
            Category::Residual => "residual",
        }
    }

    /// Parse a category from its DB tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "emergency" => Some(Category::Emergency),
            "morning_in_house" => Some(Category::MorningInHouse),
            "afternoon_in_house" => Some(Category::AfternoonInHouse),
            "residual" => Some(Category::Residual),
            _ => None,
        }
    }
}

/// The full week's duty data, replaced wholesale on each registration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyRoster {
    pub emergency: Vec<String>,
    pub morning_in_house: Vec<String>,
    pub afternoon_in_house: Vec<String>,
    pub residual: Vec<String>,
}

impl WeeklyRoster {
    /// The empty, unregistered roster.
    pub fn empty() -> Self {
        Self::default()
    }

    /// All four lists are empty — the terminal "unregistered" state.
    pub fn is_empty(&self) -> bool {
        self.emergency.is_empty()
            && self.morning_in_house.is_empty()
            && self.afternoon_in_house.is_empty()
            && self.residual.is_empty()
    }

    /// Entry list for a category.
    pub fn entries(&self, category: Category) -> &[String] {
        match category {
            Category::Emergency => &self.emergency,
            Category::MorningInHouse => &self.morning_in_house,
            Category::AfternoonInHouse => &self.afternoon_in_house,
            Category::Residual => &self.residual,
        }
    }

    /// Mutable entry list for a category.
    pub fn entries_mut(&mut self, category: Category) -> &mut Vec<String> {
        match category {
            Category::Emergency => &mut self.emergency,
            Category::MorningInHouse => &mut self.morning_in_house,
            Category::AfternoonInHouse => &mut self.afternoon_in_house,
            Category::Residual => &mut self.residual,
        }
    }
}

/// Resolved single-weekday view of the roster. Never persisted — recomputed
/// from the current roster on every daily trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyAssignment {
    pub emergency: String,
    pub morning_in_house: String,
    pub afternoon_in_house: String,
    /// Residual pair: (1st, 2nd).
    pub residual: (String, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_roster_is_empty() {
        assert!(WeeklyRoster::empty().is_empty());
    }

    #[test]
    fn roster_with_one_entry_is_not_empty() {
        let mut roster = WeeklyRoster::empty();
        roster.residual.push("田中".to_string());
        assert!(!roster.is_empty());
    }

    #[test]
    fn category_labels_are_distinct() {
        let labels: Vec<&str> = Category::ALL.iter().map(|c| c.label()).collect();
        for (i, a) in labels.iter().enumerate() {
            for b in &labels[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn category_tag_round_trip() {
        for cat in Category::ALL {
            assert_eq!(Category::from_tag(cat.type_tag()), Some(cat));
        }
        assert_eq!(Category::from_tag("unknown"), None);
    }

    #[test]
    fn entries_matches_category() {
        let mut roster = WeeklyRoster::empty();
        roster.entries_mut(Category::Emergency).push("A".to_string());
        assert_eq!(roster.entries(Category::Emergency), ["A"]);
        assert!(roster.entries(Category::Residual).is_empty());
    }
}
