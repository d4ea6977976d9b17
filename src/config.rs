//! Runtime configuration for a scrape run.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use chrono::NaiveDate;

use crate::season::SeasonWindow;

#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub season_start: NaiveDate,
    pub season_end: NaiveDate,
    pub api_base: String,
    pub grid_url: String,
    pub booking_base: String,
    pub property_name: String,
    pub auth_poll_attempts: u32,
    pub auth_poll_interval: Duration,
    pub page_load_timeout: Duration,
    pub out_dir: PathBuf,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            season_start: NaiveDate::from_ymd_opt(2026, 5, 11)
                .expect("season start is a valid date"),
            season_end: NaiveDate::from_ymd_opt(2026, 10, 19)
                .expect("season end is a valid date"),
            api_base: "https://be-booking-engine-api.innroad.com".into(),
            grid_url: "https://bobscabinsonlakesuperior.client.innroad.com/grid/".into(),
            booking_base: "https://bobscabinsonlakesuperior.client.innroad.com".into(),
            property_name: "Bob's Cabins on Lake Superior".into(),
            auth_poll_attempts: 48,
            auth_poll_interval: Duration::from_millis(2500),
            page_load_timeout: Duration::from_secs(30),
            out_dir: PathBuf::from("."),
        }
    }
}

impl ScrapeConfig {
    pub fn season(&self) -> Result<SeasonWindow> {
        SeasonWindow::new(self.season_start, self.season_end)
    }
}

/// Chrome binary to drive: `CHROME_PATH` if set, otherwise the usual install
/// location for the platform.
pub fn chrome_executable() -> PathBuf {
    if let Ok(path) = env::var("CHROME_PATH") {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    let default = if cfg!(target_os = "macos") {
        "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome"
    } else if cfg!(target_os = "windows") {
        r"C:\Program Files\Google\Chrome\Application\chrome.exe"
    } else {
        "/usr/bin/google-chrome-stable"
    };
    PathBuf::from(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_season_covers_the_published_window() {
        let config = ScrapeConfig::default();
        let season = config.season().unwrap();
        assert_eq!(season.start(), NaiveDate::from_ymd_opt(2026, 5, 11).unwrap());
        assert_eq!(season.end(), NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
        assert_eq!(season.day_count(), 162);
    }

    #[test]
    fn auth_polling_budget_is_two_minutes() {
        let config = ScrapeConfig::default();
        let budget = config.auth_poll_interval * config.auth_poll_attempts;
        assert_eq!(budget, Duration::from_secs(120));
    }
}
