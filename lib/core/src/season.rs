//! Seasonal calendar logic
//!
//! Maps a calendar month to one of four seasons and computes the cyclic
//! successor. The resolution date is injected so tests can pin the month.

use chrono::Datelike;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    /// Season for a 1-based calendar month.
    #[must_use]
    pub fn for_month(month: u32) -> Self {
        match month {
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            9..=11 => Season::Autumn,
            _ => Season::Winter,
        }
    }

    /// Cyclic successor: spring → summer → autumn → winter → spring.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Season::Spring => Season::Summer,
            Season::Summer => Season::Autumn,
            Season::Autumn => Season::Winter,
            Season::Winter => Season::Spring,
        }
    }

    /// Catalog label for the season.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Season::Spring => "春季",
            Season::Summer => "夏季",
            Season::Autumn => "秋季",
            Season::Winter => "冬季",
        }
    }
}

/// The date a resolution runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolutionDate {
    pub year: i32,
    /// 1-based calendar month.
    pub month: u32,
}

impl ResolutionDate {
    /// Today's local date.
    #[must_use]
    pub fn today() -> Self {
        let now = chrono::Local::now();
        Self {
            year: now.year(),
            month: now.month(),
        }
    }

    #[must_use]
    pub fn season(self) -> Season {
        Season::for_month(self.month)
    }
}
