pub mod checklist;
pub mod html;

use chrono::{DateTime, Utc};

use crate::models::gap::{Gap, GapReport};
use crate::season::SeasonWindow;

pub use checklist::ChecklistStore;
pub use html::render_report;

/// Wrap extracted gaps into the exportable report structure.
pub fn build_report(window: &SeasonWindow, gaps: Vec<Gap>, generated: DateTime<Utc>) -> GapReport {
    GapReport {
        generated,
        season_start: window.start(),
        season_end: window.end(),
        total_gaps: gaps.len(),
        gaps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use pretty_assertions::assert_eq;

    #[test]
    fn report_records_the_window_and_gap_count() {
        let window = SeasonWindow::new(
            NaiveDate::from_ymd_opt(2026, 5, 11).unwrap(),
            NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
        )
        .unwrap();
        let generated = Utc.with_ymd_and_hms(2026, 4, 1, 0, 0, 0).unwrap();

        let report = build_report(&window, vec![], generated);

        assert_eq!(report.season_start, window.start());
        assert_eq!(report.season_end, window.end());
        assert_eq!(report.total_gaps, 0);
        assert_eq!(report.generated, generated);
    }
}
