//! Weekly outfit curation
//!
//! A fixed five-day rotation of outfit palettes, labelled with the ISO week
//! it is requested in.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// One day's outfit palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyOutfit {
    pub day: &'static str,
    pub outfit_colors: [&'static str; 3],
    pub theme: &'static str,
}

/// Weekly curation payload
#[derive(Debug, Clone, Serialize)]
pub struct WeeklyCuration {
    pub user_id: String,
    pub week: String,
    pub recommendations: Vec<DailyOutfit>,
}

static WEEKLY_OUTFITS: [DailyOutfit; 5] = [
    DailyOutfit {
        day: "Monday",
        outfit_colors: ["#FF6B6B", "#FFFFFF", "#2C3E50"],
        theme: "Professional",
    },
    DailyOutfit {
        day: "Tuesday",
        outfit_colors: ["#3498DB", "#ECF0F1", "#34495E"],
        theme: "Casual",
    },
    DailyOutfit {
        day: "Wednesday",
        outfit_colors: ["#E74C3C", "#FFD700", "#2C3E50"],
        theme: "Bold",
    },
    DailyOutfit {
        day: "Thursday",
        outfit_colors: ["#9B59B6", "#ECF0F1", "#34495E"],
        theme: "Elegant",
    },
    DailyOutfit {
        day: "Friday",
        outfit_colors: ["#F39C12", "#FFFFFF", "#2C3E50"],
        theme: "Warm",
    },
];

/// ISO week label such as `2025-W01`
pub fn iso_week_label(date: NaiveDate) -> String {
    let week = date.iso_week();
    format!("{}-W{:02}", week.year(), week.week())
}

/// Build the curation for a user in the week containing `date`
pub fn weekly_curation(user_id: &str, date: NaiveDate) -> WeeklyCuration {
    WeeklyCuration {
        user_id: user_id.to_string(),
        week: iso_week_label(date),
        recommendations: WEEKLY_OUTFITS.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_iso_week_label() {
        assert_eq!(iso_week_label(date(2025, 1, 1)), "2025-W01");
        assert_eq!(iso_week_label(date(2025, 3, 14)), "2025-W11");
        // Belongs to the last ISO week of the previous year
        assert_eq!(iso_week_label(date(2021, 1, 3)), "2020-W53");
    }

    #[test]
    fn test_weekly_curation() {
        let curation = weekly_curation("user_42", date(2025, 1, 6));
        assert_eq!(curation.user_id, "user_42");
        assert_eq!(curation.week, "2025-W02");
        assert_eq!(curation.recommendations.len(), 5);
        assert_eq!(curation.recommendations[0].day, "Monday");
        assert_eq!(curation.recommendations[4].theme, "Warm");
    }

    #[test]
    fn test_curation_serialize() {
        let json = serde_json::to_string(&weekly_curation("u", date(2025, 1, 1))).unwrap();
        assert!(json.contains("\"week\":\"2025-W01\""));
        assert!(json.contains("\"outfit_colors\":[\"#FF6B6B\",\"#FFFFFF\",\"#2C3E50\"]"));
    }
}
