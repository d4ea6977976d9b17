use anyhow::{ensure, Result};
use chrono::{Datelike, Duration, NaiveDate};

/// Inclusive date window a scrape run covers. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl SeasonWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        ensure!(start <= end, "season start {start} is after season end {end}");
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days in the window, counting both endpoints.
    pub fn day_count(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    /// Iterate every day in the window in chronological order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |day| *day <= end)
    }

    /// Split the window into calendar-month chunks.
    ///
    /// Chunks are ordered, non-overlapping and cover the window without
    /// holes. The first chunk starts at the window start; each chunk ends at
    /// the earlier of its month's last day and the window end, so a window
    /// ending exactly on a month boundary produces no empty trailing chunk.
    pub fn month_chunks(&self) -> Vec<SeasonWindow> {
        let mut chunks = Vec::new();
        let mut cursor = self.start;
        while cursor <= self.end {
            let chunk_end = last_day_of_month(cursor).min(self.end);
            chunks.push(SeasonWindow {
                start: cursor,
                end: chunk_end,
            });
            cursor = chunk_end + Duration::days(1);
        }
        chunks
    }
}

/// Add `n` days to a date (negative moves backwards).
pub fn add_days(date: NaiveDate, n: i64) -> NaiveDate {
    date + Duration::days(n)
}

fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let first_of_next = if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    };
    first_of_next
        .and_then(|d| d.pred_opt())
        .expect("the first of a month is always a valid date")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn rejects_inverted_window() {
        assert!(SeasonWindow::new(date(2026, 6, 2), date(2026, 6, 1)).is_err());
        assert!(SeasonWindow::new(date(2026, 6, 1), date(2026, 6, 1)).is_ok());
    }

    #[test]
    fn month_chunks_truncate_first_and_last() {
        let window = SeasonWindow::new(date(2026, 5, 11), date(2026, 10, 19)).unwrap();
        let chunks = window.month_chunks();
        let ranges: Vec<(NaiveDate, NaiveDate)> =
            chunks.iter().map(|c| (c.start(), c.end())).collect();
        assert_eq!(
            ranges,
            vec![
                (date(2026, 5, 11), date(2026, 5, 31)),
                (date(2026, 6, 1), date(2026, 6, 30)),
                (date(2026, 7, 1), date(2026, 7, 31)),
                (date(2026, 8, 1), date(2026, 8, 31)),
                (date(2026, 9, 1), date(2026, 9, 30)),
                (date(2026, 10, 1), date(2026, 10, 19)),
            ]
        );
    }

    #[test]
    fn single_partial_month_yields_one_chunk() {
        let window = SeasonWindow::new(date(2026, 5, 10), date(2026, 5, 20)).unwrap();
        let chunks = window.month_chunks();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].start(), date(2026, 5, 10));
        assert_eq!(chunks[0].end(), date(2026, 5, 20));
    }

    #[test]
    fn window_ending_on_month_boundary_has_no_empty_trailing_chunk() {
        let window = SeasonWindow::new(date(2026, 5, 11), date(2026, 6, 30)).unwrap();
        let chunks = window.month_chunks();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1].start(), date(2026, 6, 1));
        assert_eq!(chunks[1].end(), date(2026, 6, 30));
    }

    #[test]
    fn chunks_cover_window_without_holes() {
        let window = SeasonWindow::new(date(2025, 12, 15), date(2026, 3, 1)).unwrap();
        let chunks = window.month_chunks();
        assert_eq!(chunks[0].start(), window.start());
        assert_eq!(chunks.last().unwrap().end(), window.end());
        for pair in chunks.windows(2) {
            assert_eq!(add_days(pair[0].end(), 1), pair[1].start());
        }
        let total: i64 = chunks.iter().map(|c| c.day_count()).sum();
        assert_eq!(total, window.day_count());
    }

    #[test]
    fn day_iteration_is_inclusive() {
        let window = SeasonWindow::new(date(2026, 5, 30), date(2026, 6, 2)).unwrap();
        let days: Vec<NaiveDate> = window.days().collect();
        assert_eq!(
            days,
            vec![
                date(2026, 5, 30),
                date(2026, 5, 31),
                date(2026, 6, 1),
                date(2026, 6, 2),
            ]
        );
        assert_eq!(window.day_count(), 4);
    }

    #[test]
    fn add_days_crosses_boundaries() {
        assert_eq!(add_days(date(2026, 5, 31), 1), date(2026, 6, 1));
        assert_eq!(add_days(date(2026, 1, 1), -1), date(2025, 12, 31));
        assert_eq!(add_days(date(2026, 5, 11), 3), date(2026, 5, 14));
    }
}
