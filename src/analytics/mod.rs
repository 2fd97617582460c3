//! Statistics over an entry snapshot: streaks, tag and emotion rankings, and
//! the per-weekday writing histogram.
//!
//! Every function is pure. Anything relative to the present takes `today`
//! explicitly so results are reproducible; the binary reads the clock once
//! per invocation and passes the local date down.
//!
//! All day-based statistics use the local calendar day of each entry's
//! `date`. Entries whose `date` does not parse are left out of those, but
//! still count toward totals, tags and emotions.

use crate::diary::dates::{previous_day, same_month, weekday_index};
use crate::constants::TAG_MARKER;
use crate::diary::DiaryEntry;
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};

/// How often a tag was used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

/// How often an emotion was recorded, relative to all entries.
#[derive(Debug, Clone, PartialEq)]
pub struct EmotionShare {
    pub emotion: String,
    pub count: usize,
    /// `count / total entries * 100`, unrounded.
    pub percentage: f64,
}

impl EmotionShare {
    /// The percentage rounded to a whole number for display.
    pub fn rounded_percentage(&self) -> u32 {
        self.percentage.round() as u32
    }
}

/// Entries per weekday, Sunday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekdayHistogram {
    pub counts: [usize; 7],
    /// Largest bucket, never below 1 so it can be used as a divisor.
    pub max: usize,
}

impl WeekdayHistogram {
    /// Bucket height relative to the largest bucket, in `0.0..=1.0`.
    pub fn ratio(&self, weekday: usize) -> f64 {
        self.counts.get(weekday).copied().unwrap_or(0) as f64 / self.max as f64
    }
}

/// Consecutive days of writing that end today or yesterday.
///
/// The most recent day with an entry (ignoring days after `today`) anchors
/// the count. If it is today or yesterday, the streak is the number of
/// consecutive days with entries counted back from it; otherwise the streak
/// is broken and the result is 0. Several entries on one day count once.
///
/// # Examples
///
/// ```
/// use buddy_diary::analytics::streak;
/// use buddy_diary::diary::DiaryEntry;
/// use chrono::NaiveDate;
///
/// let today = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
/// let entries = vec![
///     DiaryEntry::new("2", "", "", "2024-01-15T09:00:00"),
///     DiaryEntry::new("1", "", "", "2024-01-14T21:00:00"),
/// ];
///
/// assert_eq!(streak(&entries, today), 2);
/// assert_eq!(streak(&[], today), 0);
/// ```
pub fn streak(entries: &[DiaryEntry], today: NaiveDate) -> usize {
    let days: BTreeSet<NaiveDate> = entries
        .iter()
        .filter_map(DiaryEntry::local_day)
        .filter(|day| *day <= today)
        .collect();

    let Some(&newest) = days.last() else {
        return 0;
    };
    let yesterday = previous_day(today);
    if newest != today && Some(newest) != yesterday {
        return 0;
    }

    let mut count = 0;
    let mut cursor = Some(newest);
    while let Some(day) = cursor.filter(|day| days.contains(day)) {
        count += 1;
        cursor = previous_day(day);
    }
    count
}

/// Every tag with its number of uses, most used first.
///
/// Tags are compared with every `#` removed but are otherwise case and
/// whitespace sensitive, the same as [`crate::query::distinct_tags`]; tags
/// that are empty without their markers are ignored. Ties keep the order in
/// which the tags were first seen.
pub fn tag_frequency(entries: &[DiaryEntry]) -> Vec<TagCount> {
    rank(
        entries
            .iter()
            .flat_map(|entry| entry.tags.iter())
            .filter_map(|tag| tag_key(tag)),
    )
    .into_iter()
    .map(|(tag, count)| TagCount { tag, count })
    .collect()
}

/// The `limit` most used tags.
pub fn top_tags(entries: &[DiaryEntry], limit: usize) -> Vec<TagCount> {
    let mut ranking = tag_frequency(entries);
    ranking.truncate(limit);
    ranking
}

/// Recorded emotions with their share of all entries, most frequent first.
/// Blank labels count as no emotion.
pub fn emotion_distribution(entries: &[DiaryEntry]) -> Vec<EmotionShare> {
    let total = entries.len();

    rank(
        entries
            .iter()
            .filter_map(|entry| entry.emotion.as_deref())
            .filter(|emotion| !emotion.trim().is_empty())
            .map(str::to_string),
    )
        .into_iter()
        .map(|(emotion, count)| EmotionShare {
            emotion,
            count,
            percentage: count as f64 / total as f64 * 100.0,
        })
        .collect()
}

/// Entries written in the calendar month (and year) of `today`.
pub fn monthly_count(entries: &[DiaryEntry], today: NaiveDate) -> usize {
    entries
        .iter()
        .filter_map(DiaryEntry::local_day)
        .filter(|day| same_month(*day, today))
        .count()
}

/// Entries per weekday.
pub fn weekday_histogram(entries: &[DiaryEntry]) -> WeekdayHistogram {
    let mut counts = [0usize; 7];
    for day in entries.iter().filter_map(DiaryEntry::local_day) {
        counts[weekday_index(day)] += 1;
    }

    let max = counts.iter().copied().max().unwrap_or(0).max(1);
    WeekdayHistogram { counts, max }
}

/// Number of different tags, keyed the same way as [`tag_frequency`].
pub fn distinct_tag_count(entries: &[DiaryEntry]) -> usize {
    entries
        .iter()
        .flat_map(|entry| entry.tags.iter())
        .filter_map(|tag| tag_key(tag))
        .collect::<BTreeSet<String>>()
        .len()
}

/// A tag with its `#` markers removed, or `None` when nothing else is left.
fn tag_key(tag: &str) -> Option<String> {
    let key = tag.replace(TAG_MARKER, "");
    (!key.is_empty()).then_some(key)
}

/// Counts occurrences and orders them by count, ties by first occurrence.
fn rank(items: impl Iterator<Item = String>) -> Vec<(String, usize)> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();

    for item in items {
        match positions.get(&item) {
            Some(&index) => counts[index].1 += 1,
            None => {
                positions.insert(item.clone(), counts.len());
                counts.push((item, 1));
            }
        }
    }

    // Stable, so equal counts stay in first-seen order
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}
