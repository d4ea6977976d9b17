//! Season-level rollup printed at the end of a run.

use crate::models::gap::Gap;
use crate::utils::fmt::{dollars, round_cents};

/// Totals across every gap found in a season.
#[derive(Debug, Clone, PartialEq)]
pub struct GapSummary {
    pub gap_count: usize,
    pub night_count: u32,
    pub revenue: f64,
}

impl GapSummary {
    pub fn from_gaps(gaps: &[Gap]) -> Self {
        Self {
            gap_count: gaps.len(),
            night_count: gaps.iter().map(|gap| gap.nights).sum(),
            revenue: round_cents(gaps.iter().map(|gap| gap.total_rate).sum()),
        }
    }

    /// One-line rollup, e.g. `12 gaps | 19 nights | $3,420 potential revenue`.
    pub fn headline(&self) -> String {
        format!(
            "{} gaps | {} nights | ${} potential revenue",
            self.gap_count,
            self.night_count,
            dollars(self.revenue)
        )
    }
}
