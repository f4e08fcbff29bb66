//! Calendar bucketing helpers shared by the aggregator and the predictor.

use chrono::{DateTime, Datelike, FixedOffset, TimeZone, Timelike};

/// Weekday labels in bucket order (Sunday first).
pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Month labels in bucket order.
pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// A calendar month identified by year and month number (1-12).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn of<Tz: TimeZone>(time: &DateTime<Tz>) -> Self {
        Self {
            year: time.year(),
            month: time.month(),
        }
    }

    /// The immediately preceding calendar month, rolling over the year.
    pub fn previous(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }
}

/// `time` expressed as wall-clock time in the offset of `reference`.
///
/// Every calendar bucket of a summary is taken in this one offset, so the
/// monthly comparison and the histograms always agree.
pub fn local_to(
    time: &DateTime<FixedOffset>,
    reference: &DateTime<FixedOffset>,
) -> DateTime<FixedOffset> {
    time.with_timezone(reference.offset())
}

/// Hour bucket (0-23) of a local timestamp.
pub fn hour_bucket(time: &DateTime<FixedOffset>) -> usize {
    time.hour() as usize
}

/// Weekday bucket, 0 = Sunday.
pub fn weekday_bucket(time: &DateTime<FixedOffset>) -> usize {
    time.weekday().num_days_from_sunday() as usize
}

/// Month bucket, 0 = January.
pub fn month_bucket(time: &DateTime<FixedOffset>) -> usize {
    time.month0() as usize
}

/// Calendar month of `time` as seen from the offset of `reference`.
pub fn year_month_in(time: &DateTime<FixedOffset>, reference: &DateTime<FixedOffset>) -> YearMonth {
    YearMonth::of(&local_to(time, reference))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    #[test]
    fn test_previous_month_rolls_over_year() {
        let jan = YearMonth {
            year: 2025,
            month: 1,
        };
        assert_eq!(
            jan.previous(),
            YearMonth {
                year: 2024,
                month: 12
            }
        );
        assert_eq!(
            YearMonth {
                year: 2025,
                month: 7
            }
            .previous(),
            YearMonth {
                year: 2025,
                month: 6
            }
        );
    }

    #[test]
    fn test_buckets_use_local_time() {
        // Sunday 23:30 local, Monday in UTC.
        let time = at("2024-03-10T23:30:00-05:00");
        assert_eq!(hour_bucket(&time), 23);
        assert_eq!(WEEKDAY_LABELS[weekday_bucket(&time)], "Sun");
        assert_eq!(MONTH_LABELS[month_bucket(&time)], "Mar");
    }

    #[test]
    fn test_local_to_reference_offset() {
        // 05:00 UTC is 07:00 for a viewer at +02:00.
        let time = at("2024-06-03T05:00:00.000Z");
        let reference = at("2024-06-10T12:00:00+02:00");
        let local = local_to(&time, &reference);
        assert_eq!(local, time);
        assert_eq!(hour_bucket(&local), 7);
    }

    #[test]
    fn test_year_month_in_reference_offset() {
        // Dec 31 evening at -05:00 is already Jan 1 at UTC.
        let time = at("2024-12-31T23:30:00-05:00");
        let reference = at("2025-01-15T12:00:00+00:00");
        assert_eq!(
            year_month_in(&time, &reference),
            YearMonth {
                year: 2025,
                month: 1
            }
        );
    }
}
