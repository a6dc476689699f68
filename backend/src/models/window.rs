//! Query windows relative to a clock reading.
//!
//! Both planners are pure functions of `now`; the caller supplies the clock
//! reading so fixed instants can be used in tests.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use super::observation::SeriesKind;

/// How far before `now` the hourly window starts.
pub fn hourly_lookback() -> TimeDelta {
    TimeDelta::hours(1)
}

/// How far before `now` the daily window starts.
pub fn daily_lookback() -> TimeDelta {
    TimeDelta::days(1)
}

/// Forecast horizon covered by both windows.
pub fn forecast_horizon() -> TimeDelta {
    TimeDelta::days(7)
}

/// Closed time range `[start, end]` with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "WindowBounds")]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

/// Unchecked wire form of [`TimeWindow`].
#[derive(Deserialize)]
struct WindowBounds {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<WindowBounds> for TimeWindow {
    type Error = String;

    fn try_from(bounds: WindowBounds) -> Result<Self, Self::Error> {
        TimeWindow::new(bounds.start, bounds.end).ok_or_else(|| {
            format!(
                "window start {} is after end {}",
                bounds.start, bounds.end
            )
        })
    }
}

impl TimeWindow {
    /// Build a window, rejecting an inverted range.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Inclusive on both bounds.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }

    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }
}

fn shift(instant: DateTime<Utc>, delta: TimeDelta) -> DateTime<Utc> {
    instant.checked_add_signed(delta).unwrap_or(if delta < TimeDelta::zero() {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    })
}

/// `[now - 1h, now + 7d]`: a little look-back so the current hour's record
/// is not missed, then the full forecast horizon.
pub fn hourly_window(now: DateTime<Utc>) -> TimeWindow {
    TimeWindow {
        start: shift(now, -hourly_lookback()),
        end: shift(now, forecast_horizon()),
    }
}

/// `[now - 1d, now - 1d + 7d]`: starts a day back so today's record is
/// included even when it was stamped earlier than `now`.
pub fn daily_window(now: DateTime<Utc>) -> TimeWindow {
    let start = shift(now, -daily_lookback());
    TimeWindow {
        start,
        end: shift(start, forecast_horizon()),
    }
}

/// Window for the given series.
pub fn window_for(kind: SeriesKind, now: DateTime<Utc>) -> TimeWindow {
    match kind {
        SeriesKind::Hourly => hourly_window(now),
        SeriesKind::Daily => daily_window(now),
    }
}
