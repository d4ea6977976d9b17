pub mod availability;
pub mod gap;

pub use availability::{CabinAvailability, RateAmount, RateDay, RateRule, RULE_TYPE_MIN_STAY};
pub use gap::{CabinMeta, DayRecord, Gap, GapReport};
