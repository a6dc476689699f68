pub mod clock;
pub mod locale;
pub mod macros;
pub mod observation;
pub mod series;
pub mod severity;
pub mod window;

pub use clock::{Clock, FixedClock, SystemClock};
pub use locale::Locale;
pub use observation::{LocationId, ObservationRecord, SeriesKind};
pub use series::{
    DerivedPollutant, DisplaySeriesPoint, DAILY_POLLUTANT_DIVISOR, MISSING_POLLUTANT_SENTINEL,
};
pub use severity::{classify, SeverityBand, BAND_UPPER_BOUNDS};
pub use window::{daily_window, hourly_window, window_for, TimeWindow};
