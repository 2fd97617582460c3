//! The statistics snapshot shown on the report screen.

use crate::analytics::{self, EmotionShare, TagCount, WeekdayHistogram};
use crate::constants::TOP_TAGS_LIMIT;
use crate::diary::DiaryEntry;
use chrono::{DateTime, Local};
use tracing::debug;

/// Every figure on the report screen, computed from one snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub total_entries: usize,
    pub streak: usize,
    pub monthly_count: usize,
    pub distinct_tag_count: usize,
    pub top_tags: Vec<TagCount>,
    pub emotions: Vec<EmotionShare>,
    pub weekdays: WeekdayHistogram,
}

/// Computes the report for `entries` as of `now`.
pub fn build_report(entries: &[DiaryEntry], now: DateTime<Local>) -> Report {
    let today = now.date_naive();
    debug!("Building report over {} entries for {}", entries.len(), today);

    Report {
        total_entries: entries.len(),
        streak: analytics::streak(entries, today),
        monthly_count: analytics::monthly_count(entries, today),
        distinct_tag_count: analytics::distinct_tag_count(entries),
        top_tags: analytics::top_tags(entries, TOP_TAGS_LIMIT),
        emotions: analytics::emotion_distribution(entries),
        weekdays: analytics::weekday_histogram(entries),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_empty_report() {
        let report = build_report(&[], Local::now());

        assert_eq!(report.total_entries, 0);
        assert_eq!(report.streak, 0);
        assert!(report.top_tags.is_empty());
        assert!(report.emotions.is_empty());
        assert_eq!(report.weekdays.max, 1);
    }

    #[test]
    fn test_report_figures() {
        let now = Local.with_ymd_and_hms(2024, 1, 17, 20, 0, 0).unwrap();
        let mut a = DiaryEntry::new("a", "a", "a", "2024-01-17T09:00:00");
        a.tags = vec!["x".into(), "y".into()];
        a.emotion = Some("happy".into());
        let mut b = DiaryEntry::new("b", "b", "b", "2024-01-16T09:00:00");
        b.tags = vec!["x".into()];
        let c = DiaryEntry::new("c", "c", "c", "2023-12-20T09:00:00");

        let report = build_report(&[a, b, c], now);

        assert_eq!(report.total_entries, 3);
        assert_eq!(report.streak, 2);
        assert_eq!(report.monthly_count, 2);
        assert_eq!(report.distinct_tag_count, 2);
        assert_eq!(report.top_tags[0], TagCount { tag: "x".to_string(), count: 2 });
        assert_eq!(report.emotions[0].rounded_percentage(), 33);
    }
}
