//! Weekly grouping of history for the detailed history view.

use chrono::Datelike;
use std::fmt;

use crate::history::HistoryEntry;

/// `(ISO year, ISO week number)` bucket for a history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WeekKey {
    pub year: i32,
    pub week: u32,
}

impl WeekKey {
    /// The ISO week of the entry's timestamp, if the timestamp parses.
    pub fn of(entry: &HistoryEntry) -> Option<Self> {
        let week = entry.visited_at()?.iso_week();
        Some(WeekKey {
            year: week.year(),
            week: week.week(),
        })
    }
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-W{:02}", self.year, self.week)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekGroup {
    pub key: WeekKey,
    pub entries: Vec<HistoryEntry>,
}

/// Bucket entries by ISO week. Groups appear in the order their week is first
/// seen and each group keeps the original entry order. Entries with an
/// unparseable timestamp are left out.
pub fn group_by_week(entries: &[HistoryEntry]) -> Vec<WeekGroup> {
    let mut groups: Vec<WeekGroup> = Vec::new();
    for entry in entries {
        let Some(key) = WeekKey::of(entry) else {
            log::debug!("Skipping history entry with bad timestamp: {}", entry.url);
            continue;
        };
        match groups.iter_mut().find(|g| g.key == key) {
            Some(group) => group.entries.push(entry.clone()),
            None => groups.push(WeekGroup {
                key,
                entries: vec![entry.clone()],
            }),
        }
    }
    groups
}

/// One line of the detailed history list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryRow {
    Week(WeekKey),
    Entry(HistoryEntry),
}

impl HistoryRow {
    pub fn label(&self) -> String {
        match self {
            HistoryRow::Week(key) => format!("Week {}:", key),
            HistoryRow::Entry(entry) => format!("  {} - {}", entry.timestamp, entry.url),
        }
    }

    /// The URL to navigate to when this row is chosen. Headings have none.
    pub fn url(&self) -> Option<&str> {
        match self {
            HistoryRow::Week(_) => None,
            HistoryRow::Entry(entry) => Some(&entry.url),
        }
    }
}

/// Flatten groups into display rows: each heading followed by its entries.
pub fn history_rows(groups: &[WeekGroup]) -> Vec<HistoryRow> {
    let mut rows = Vec::new();
    for group in groups {
        rows.push(HistoryRow::Week(group.key));
        rows.extend(group.entries.iter().cloned().map(HistoryRow::Entry));
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn entry(url: &str, y: i32, m: u32, d: u32) -> HistoryEntry {
        let at = NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        HistoryEntry::new(url, at)
    }

    #[test]
    fn same_week_forms_one_group_in_order() {
        // 2026-10-12 is a Monday, 2026-10-15 the Thursday of the same ISO week.
        let entries = vec![entry("http://a", 2026, 10, 12), entry("http://b", 2026, 10, 15)];
        let groups = group_by_week(&entries);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].key, WeekKey { year: 2026, week: 42 });
        assert_eq!(groups[0].entries, entries);
    }

    #[test]
    fn groups_keep_first_seen_order() {
        let entries = vec![
            entry("http://w42", 2026, 10, 12),
            entry("http://w41", 2026, 10, 5),
            entry("http://w42-again", 2026, 10, 13),
        ];
        let groups = group_by_week(&entries);
        let keys: Vec<String> = groups.iter().map(|g| g.key.to_string()).collect();
        assert_eq!(keys, vec!["2026-W42", "2026-W41"]);
        let urls: Vec<&str> = groups[0].entries.iter().map(|e| e.url.as_str()).collect();
        assert_eq!(urls, vec!["http://w42", "http://w42-again"]);
    }

    #[test]
    fn iso_year_differs_from_calendar_year() {
        // 2027-01-01 is a Friday and belongs to ISO week 53 of 2026.
        let groups = group_by_week(&[entry("http://nye", 2027, 1, 1)]);
        assert_eq!(groups[0].key, WeekKey { year: 2026, week: 53 });
    }

    #[test]
    fn week_boundary_splits_groups() {
        // Sunday 2026-10-18 and Monday 2026-10-19.
        let groups = group_by_week(&[entry("http://sun", 2026, 10, 18), entry("http://mon", 2026, 10, 19)]);
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn bad_timestamps_are_skipped() {
        let bad = HistoryEntry {
            url: "http://bad".to_string(),
            timestamp: "garbage".to_string(),
        };
        let groups = group_by_week(&[bad, entry("http://ok", 2026, 10, 12)]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].entries[0].url, "http://ok");
    }

    #[test]
    fn empty_history_has_no_groups() {
        assert!(group_by_week(&[]).is_empty());
    }

    #[test]
    fn rows_flatten_headings_and_entries() {
        let entries = vec![entry("http://a", 2026, 10, 12), entry("http://b", 2026, 10, 5)];
        let rows = history_rows(&group_by_week(&entries));
        let labels: Vec<String> = rows.iter().map(HistoryRow::label).collect();
        assert_eq!(
            labels,
            vec![
                "Week 2026-W42:".to_string(),
                "  2026-10-12T10:00:00.000000 - http://a".to_string(),
                "Week 2026-W41:".to_string(),
                "  2026-10-05T10:00:00.000000 - http://b".to_string(),
            ]
        );
    }

    #[test]
    fn selecting_rows_yields_urls_only_for_entries() {
        let rows = history_rows(&group_by_week(&[entry("http://a", 2026, 10, 12)]));
        assert_eq!(rows[0].url(), None);
        assert_eq!(rows[1].url(), Some("http://a"));
    }
}
