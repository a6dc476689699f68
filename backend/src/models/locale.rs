//! Display locale for series labels and band names.

use std::fmt;
use std::str::FromStr;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Language used for weekday names and relative-day labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Thai labels, as shown on the deployed site.
    #[default]
    Thai,
    English,
}

const THAI_WEEKDAYS: [&str; 7] = [
    "จันทร์",
    "อังคาร",
    "พุธ",
    "พฤหัสบดี",
    "ศุกร์",
    "เสาร์",
    "อาทิตย์",
];

const ENGLISH_WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

impl Locale {
    /// Full weekday name.
    pub fn weekday_name(&self, weekday: Weekday) -> &'static str {
        let idx = weekday.num_days_from_monday() as usize;
        match self {
            Locale::Thai => THAI_WEEKDAYS[idx],
            Locale::English => ENGLISH_WEEKDAYS[idx],
        }
    }

    /// Label for the first entry of a daily series.
    pub fn today(&self) -> &'static str {
        match self {
            Locale::Thai => "วันนี้",
            Locale::English => "Today",
        }
    }

    /// Label for the second entry of a daily series.
    pub fn tomorrow(&self) -> &'static str {
        match self {
            Locale::Thai => "พรุ่งนี้",
            Locale::English => "Tomorrow",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Locale::Thai => "th",
            Locale::English => "en",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "th" | "thai" | "th-th" => Ok(Self::Thai),
            "en" | "english" | "en-us" | "en-gb" => Ok(Self::English),
            _ => Err(format!("Unsupported locale: {}", s)),
        }
    }
}
