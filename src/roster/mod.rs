//! Roster domain — data model, parsing, weekday resolution, message templates.

pub mod format;
pub mod model;
pub mod parser;
pub mod resolver;

pub use model::{Category, DailyAssignment, WeeklyRoster, UNASSIGNED};
pub use parser::{is_roster_message, parse};
pub use resolver::{resolve, ResidualIndexing};
