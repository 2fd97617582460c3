//! Pure filters over an entry snapshot.
//!
//! Nothing here touches storage; callers pass whatever `list_entries`
//! returned. Entries whose `date` does not parse are never matched by a
//! day-based filter and sort after every dated entry.

use crate::constants::MONTH_GRID_DAYS;
use crate::diary::dates::weekday_index;
use crate::diary::DiaryEntry;
use chrono::{Datelike, Duration, NaiveDate};
use std::cmp::Reverse;
use std::collections::BTreeSet;

/// Entries that fall on the local calendar `day`, newest first.
///
/// # Examples
///
/// ```
/// use buddy_diary::diary::DiaryEntry;
/// use buddy_diary::query::by_date;
/// use chrono::NaiveDate;
///
/// let entries = vec![
///     DiaryEntry::new("1", "Morning", "", "2024-01-15T08:00:00"),
///     DiaryEntry::new("2", "Other day", "", "2024-01-16T08:00:00"),
///     DiaryEntry::new("3", "Evening", "", "2024-01-15T21:00:00"),
/// ];
///
/// let day = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
/// let ids: Vec<&str> = by_date(&entries, day).iter().map(|e| e.id.as_str()).collect();
/// assert_eq!(ids, vec!["3", "1"]);
/// ```
pub fn by_date(entries: &[DiaryEntry], day: NaiveDate) -> Vec<&DiaryEntry> {
    let mut matches: Vec<&DiaryEntry> = entries
        .iter()
        .filter(|entry| entry.local_day() == Some(day))
        .collect();
    matches.sort_by_cached_key(|entry| Reverse(entry.timestamp()));
    matches
}

/// Entries matching free `text` and an optional exact `tag`, in input order.
///
/// Empty `text` matches everything; otherwise it must occur in the title or
/// the content, ignoring case. When `tag` is given the entry must carry it
/// exactly.
pub fn search<'a>(entries: &'a [DiaryEntry], text: &str, tag: Option<&str>) -> Vec<&'a DiaryEntry> {
    let needle = text.to_lowercase();

    entries
        .iter()
        .filter(|entry| {
            needle.is_empty()
                || entry.title.to_lowercase().contains(&needle)
                || entry.content.to_lowercase().contains(&needle)
        })
        .filter(|entry| tag.map_or(true, |tag| entry.has_tag(tag)))
        .collect()
}

/// Every tag used by any entry, case-sensitive, in alphabetical order.
pub fn distinct_tags(entries: &[DiaryEntry]) -> Vec<String> {
    entries
        .iter()
        .flat_map(|entry| entry.tags.iter().cloned())
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect()
}

/// Stable sort, newest first. Undated entries go last in their original order.
pub fn sort_by_date_descending(entries: &mut [DiaryEntry]) {
    entries.sort_by_cached_key(|entry| Reverse(entry.timestamp()));
}

/// Days of `month` in `year` that have at least one entry.
pub fn days_with_entries(entries: &[DiaryEntry], year: i32, month: u32) -> BTreeSet<u32> {
    entries
        .iter()
        .filter_map(DiaryEntry::local_day)
        .filter(|day| day.year() == year && day.month() == month)
        .map(|day| day.day())
        .collect()
}

/// The six Sunday-first weeks shown for `month`, starting on the Sunday on
/// or before the first of the month.
///
/// Returns `None` for an invalid month.
///
/// # Examples
///
/// ```
/// use buddy_diary::query::month_grid;
/// use chrono::NaiveDate;
///
/// // March 2024 starts on a Friday.
/// let grid = month_grid(2024, 3).unwrap();
/// assert_eq!(grid.len(), 42);
/// assert_eq!(grid[0], NaiveDate::from_ymd_opt(2024, 2, 25).unwrap());
/// ```
pub fn month_grid(year: i32, month: u32) -> Option<Vec<NaiveDate>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let offset = weekday_index(first) as i64;
    let start = first.checked_sub_signed(Duration::days(offset))?;

    let grid: Vec<NaiveDate> = start.iter_days().take(MONTH_GRID_DAYS).collect();
    (grid.len() == MONTH_GRID_DAYS).then_some(grid)
}
