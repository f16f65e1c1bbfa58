//! Message templates.
//!
//! Fixed Japanese templates matching what the group is used to reading. The
//! empty-roster check lives in the controller — by the time `daily_message`
//! runs, an assignment has already been resolved.

use chrono::Weekday;

use crate::roster::model::{DailyAssignment, WeeklyRoster};
use crate::roster::resolver::{resolve, ResidualIndexing};

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Japanese weekday label (月曜日 … 日曜日).
pub fn weekday_label(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "月曜日",
        Weekday::Tue => "火曜日",
        Weekday::Wed => "水曜日",
        Weekday::Thu => "木曜日",
        Weekday::Fri => "金曜日",
        Weekday::Sat => "土曜日",
        Weekday::Sun => "日曜日",
    }
}

/// The daily announcement pushed to the group.
pub fn daily_message(assignment: &DailyAssignment) -> String {
    let (first, second) = &assignment.residual;
    format!(
        "【本日の担当者】\n\n\
         救急(リハ診)：{}\n\
         AM院内：{}\n\
         PM院内：{}\n\
         残り番：1st {} ／ 2nd {}\n\n\
         よろしくお願いします！",
        assignment.emergency, assignment.morning_in_house, assignment.afternoon_in_house, first, second,
    )
}

/// Full-week summary for on-demand "show me this week" queries.
pub fn weekly_summary(roster: &WeeklyRoster, indexing: ResidualIndexing) -> String {
    let mut out = String::from("【今週の予定表】\n");
    for weekday in WEEK {
        let a = resolve(roster, weekday, indexing);
        let (first, second) = &a.residual;
        out.push_str(&format!(
            "\n◆{}\n救急(リハ診)：{}\nAM院内：{}\nPM院内：{}\n残り番：1st {} ／ 2nd {}\n",
            weekday_label(weekday),
            a.emergency,
            a.morning_in_house,
            a.afternoon_in_house,
            first,
            second,
        ));
    }
    out
}

/// Reply sent after a successful roster registration.
pub fn registration_ack() -> &'static str {
    "週間予定表を登録しました！"
}

/// Reply sent for inbound messages that are not a roster.
pub fn non_roster_reply() -> &'static str {
    "週間予定表ではないメッセージを受信しました。"
}

/// Reply for summary queries when nothing is registered yet.
pub fn not_registered_reply() -> &'static str {
    "今週の予定表はまだ登録されていません。"
}

/// Broadcast sent after the weekly reset.
pub fn reset_notice() -> &'static str {
    "今週の予定表をリセットしました。来週分の予定表の登録をお願いします！"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::model::UNASSIGNED;
    use crate::roster::parser::parse;

    #[test]
    fn daily_message_names_every_category() {
        let assignment = DailyAssignment {
            emergency: "田中".to_string(),
            morning_in_house: "佐藤".to_string(),
            afternoon_in_house: "鈴木".to_string(),
            residual: ("高橋".to_string(), "伊藤".to_string()),
        };
        let msg = daily_message(&assignment);
        assert!(msg.contains("救急(リハ診)：田中"));
        assert!(msg.contains("AM院内：佐藤"));
        assert!(msg.contains("PM院内：鈴木"));
        assert!(msg.contains("残り番：1st 高橋 ／ 2nd 伊藤"));
        assert!(msg.starts_with("【本日の担当者】"));
    }

    #[test]
    fn daily_message_shows_placeholder_slots() {
        let assignment = DailyAssignment {
            emergency: UNASSIGNED.to_string(),
            morning_in_house: "佐藤".to_string(),
            afternoon_in_house: UNASSIGNED.to_string(),
            residual: (UNASSIGNED.to_string(), UNASSIGNED.to_string()),
        };
        let msg = daily_message(&assignment);
        assert!(msg.contains(&format!("救急(リハ診)：{UNASSIGNED}")));
        assert!(msg.contains(&format!("1st {UNASSIGNED} ／ 2nd {UNASSIGNED}")));
    }

    #[test]
    fn weekly_summary_covers_all_seven_days() {
        let roster = parse("救急\nA\nB\nAM院内\nC\nPM院内\nD\n残り番\nE\nF");
        let summary = weekly_summary(&roster, ResidualIndexing::Paired);
        for weekday in WEEK {
            assert!(summary.contains(weekday_label(weekday)));
        }
        assert!(summary.contains("救急(リハ診)：A"));
        assert!(summary.contains("1st E ／ 2nd F"));
    }
}
