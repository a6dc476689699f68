//! Selection of the record that represents "now".

use chrono::{DateTime, NaiveDate, Timelike, Utc};
use chrono_tz::Tz;

use crate::models::ObservationRecord;

/// Local calendar date and hour-of-day of an instant.
fn local_slot(instant: DateTime<Utc>, zone: Tz) -> (NaiveDate, u32) {
    let local = instant.with_timezone(&zone);
    (local.date_naive(), local.hour())
}

/// First record whose local date and hour equal those of `now`.
///
/// `records` must be sorted ascending by timestamp. `None` means no record
/// covers the current hour; callers render that as "unavailable".
pub fn match_current_hour<'a>(
    records: &'a [ObservationRecord],
    now: DateTime<Utc>,
    zone: Tz,
) -> Option<&'a ObservationRecord> {
    let target = local_slot(now, zone);
    records
        .iter()
        .find(|record| local_slot(record.timestamp, zone) == target)
}

/// The first record of a daily batch.
///
/// The daily window already starts at "today", so the earliest record is
/// taken as the current day without further matching.
pub fn match_current_day<'a>(
    records: &'a [ObservationRecord],
    _now: DateTime<Utc>,
    _zone: Tz,
) -> Option<&'a ObservationRecord> {
    records.first()
}
