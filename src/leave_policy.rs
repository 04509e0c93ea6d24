use chrono::{Datelike, NaiveDate};
use derive_more::Display;
use serde::Serialize;
use utoipa::ToSchema;

/// Maximum leave days an employee may accumulate per calendar year.
pub const YEARLY_CAP_DAYS: i64 = 12;
/// Maximum leave days an employee may accumulate per calendar month.
pub const MONTHLY_CAP_DAYS: i64 = 1;

/// Why a candidate leave request was turned down.
///
/// Each variant maps to its own machine-readable code so the dashboard can
/// show an actionable message instead of a generic validation failure.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum LeaveDenial {
    #[display(fmt = "End date must be on or after start date")]
    InvalidDateRange,
    #[display(fmt = "Each leave request can only be for 1 day")]
    SpanTooLong,
    #[display(fmt = "Employee has reached the yearly leave limit (maximum 12 days per year)")]
    YearlyLimitExceeded,
    #[display(fmt = "Employee has reached the monthly leave limit (maximum 1 day per month)")]
    MonthlyLimitExceeded,
}

impl LeaveDenial {
    pub fn code(&self) -> &'static str {
        match self {
            LeaveDenial::InvalidDateRange => "InvalidDateRange",
            LeaveDenial::SpanTooLong => "SpanTooLong",
            LeaveDenial::YearlyLimitExceeded => "YearlyLimitExceeded",
            LeaveDenial::MonthlyLimitExceeded => "MonthlyLimitExceeded",
        }
    }
}

/// Start/end pair of a stored leave record, the only fields the evaluator
/// needs from the employee's history.
#[derive(Debug, Clone, Copy)]
pub struct LeaveSpan {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Inclusive day count between start and end. A single-day leave spans 1.
pub fn span_days(start_date: NaiveDate, end_date: NaiveDate) -> i64 {
    (end_date - start_date).num_days() + 1
}

fn year_window(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let year = date.year();
    (
        NaiveDate::from_ymd_opt(year, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(year, 12, 31).unwrap(),
    )
}

fn month_window(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let (year, month) = (date.year(), date.month());
    let first = NaiveDate::from_ymd_opt(year, month, 1).unwrap();
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1).unwrap()
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1).unwrap()
    };
    (first, next_first.pred_opt().unwrap())
}

/// A record belongs to a window when either its start or its end date falls
/// inside it. A leave running December into January therefore counts toward
/// both years (and both months).
fn touches_window(span: &LeaveSpan, window: (NaiveDate, NaiveDate)) -> bool {
    let (from, to) = window;
    (span.start_date >= from && span.start_date <= to)
        || (span.end_date >= from && span.end_date <= to)
}

fn days_within(others: &[LeaveSpan], window: (NaiveDate, NaiveDate)) -> i64 {
    others
        .iter()
        .filter(|span| touches_window(span, window))
        .map(|span| span_days(span.start_date, span.end_date))
        .sum()
}

/// Decide whether a candidate leave request is permissible given the
/// employee's other leave records.
///
/// `others` must not contain the record being edited; the caller excludes it
/// by id so an update never counts against itself. Pure function: the caller
/// owns fetching the history and persisting the record on accept.
///
/// The span cap rejects any multi-day request before the aggregates run, so
/// the yearly cap is only reachable through twelve separate single-day
/// requests. The sums still use real span lengths because legacy rows may
/// cover more than one day.
pub fn evaluate(
    start_date: NaiveDate,
    end_date: NaiveDate,
    others: &[LeaveSpan],
) -> Result<(), LeaveDenial> {
    if end_date < start_date {
        return Err(LeaveDenial::InvalidDateRange);
    }

    let requested_days = span_days(start_date, end_date);
    if requested_days > MONTHLY_CAP_DAYS {
        return Err(LeaveDenial::SpanTooLong);
    }

    let yearly_total = requested_days + days_within(others, year_window(start_date));
    if yearly_total > YEARLY_CAP_DAYS {
        return Err(LeaveDenial::YearlyLimitExceeded);
    }

    let monthly_total = requested_days + days_within(others, month_window(start_date));
    if monthly_total > MONTHLY_CAP_DAYS {
        return Err(LeaveDenial::MonthlyLimitExceeded);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> LeaveSpan {
        LeaveSpan {
            start_date: date(y, m, d),
            end_date: date(y, m, d),
        }
    }

    #[test]
    fn rejects_end_before_start() {
        let result = evaluate(date(2024, 3, 10), date(2024, 3, 9), &[]);
        assert_eq!(result, Err(LeaveDenial::InvalidDateRange));
    }

    #[test]
    fn rejects_multi_day_span_regardless_of_history() {
        let result = evaluate(date(2024, 3, 10), date(2024, 3, 11), &[]);
        assert_eq!(result, Err(LeaveDenial::SpanTooLong));
    }

    #[test]
    fn span_cap_short_circuits_before_aggregates() {
        // 12 days already used this year; a 2-day request must still report
        // the span violation, not the yearly one.
        let history: Vec<LeaveSpan> = (1..=12).map(|m| day(2024, m, 5)).collect();
        let result = evaluate(date(2024, 3, 10), date(2024, 3, 12), &history);
        assert_eq!(result, Err(LeaveDenial::SpanTooLong));
    }

    #[test]
    fn accepts_single_day_request_with_no_history() {
        assert_eq!(evaluate(date(2024, 3, 10), date(2024, 3, 10), &[]), Ok(()));
    }

    #[test]
    fn accepts_twelfth_day_of_the_year() {
        // 11 prior single-day leaves spread over other months.
        let history: Vec<LeaveSpan> = (1..=11).map(|m| day(2024, m, 5)).collect();
        assert_eq!(
            evaluate(date(2024, 12, 10), date(2024, 12, 10), &history),
            Ok(())
        );
    }

    #[test]
    fn rejects_thirteenth_day_of_the_year() {
        let history: Vec<LeaveSpan> = (1..=12).map(|m| day(2024, m, 5)).collect();
        let result = evaluate(date(2024, 12, 20), date(2024, 12, 20), &history);
        assert_eq!(result, Err(LeaveDenial::YearlyLimitExceeded));
    }

    #[test]
    fn rejects_second_day_in_same_month() {
        let history = [day(2024, 3, 5)];
        let result = evaluate(date(2024, 3, 20), date(2024, 3, 20), &history);
        assert_eq!(result, Err(LeaveDenial::MonthlyLimitExceeded));
    }

    #[test]
    fn other_month_same_year_is_accepted() {
        let history = [day(2024, 3, 5)];
        assert_eq!(
            evaluate(date(2024, 4, 20), date(2024, 4, 20), &history),
            Ok(())
        );
    }

    #[test]
    fn multi_day_legacy_record_counts_full_span() {
        // A 12-day legacy record exhausts the year even though new requests
        // can never be that long.
        let history = [LeaveSpan {
            start_date: date(2024, 2, 1),
            end_date: date(2024, 2, 12),
        }];
        let result = evaluate(date(2024, 6, 3), date(2024, 6, 3), &history);
        assert_eq!(result, Err(LeaveDenial::YearlyLimitExceeded));
    }

    #[test]
    fn year_straddling_record_counts_toward_both_years() {
        let straddle = [LeaveSpan {
            start_date: date(2023, 12, 31),
            end_date: date(2024, 1, 1),
        }];
        // Blocks January of the new year via the monthly window.
        let result = evaluate(date(2024, 1, 15), date(2024, 1, 15), &straddle);
        assert_eq!(result, Err(LeaveDenial::MonthlyLimitExceeded));
        // And still blocks December of the old year.
        let result = evaluate(date(2023, 12, 10), date(2023, 12, 10), &straddle);
        assert_eq!(result, Err(LeaveDenial::MonthlyLimitExceeded));
    }

    #[test]
    fn editing_a_leave_excludes_itself() {
        // The caller drops the edited record from `others`, so moving the
        // only leave from Dec 31 to Jan 1 is evaluated against an empty set.
        assert_eq!(evaluate(date(2024, 1, 1), date(2024, 1, 1), &[]), Ok(()));
    }

    #[test]
    fn evaluation_is_idempotent() {
        let history = [day(2024, 3, 5), day(2024, 4, 2)];
        let first = evaluate(date(2024, 3, 12), date(2024, 3, 12), &history);
        let second = evaluate(date(2024, 3, 12), date(2024, 3, 12), &history);
        assert_eq!(first, second);
    }

    #[test]
    fn span_days_is_inclusive() {
        assert_eq!(span_days(date(2024, 3, 10), date(2024, 3, 10)), 1);
        assert_eq!(span_days(date(2024, 3, 10), date(2024, 3, 14)), 5);
    }

    #[test]
    fn month_window_covers_leap_february() {
        let (from, to) = month_window(date(2024, 2, 10));
        assert_eq!(from, date(2024, 2, 1));
        assert_eq!(to, date(2024, 2, 29));
    }

    #[test]
    fn denial_codes_are_distinct() {
        let codes = [
            LeaveDenial::InvalidDateRange.code(),
            LeaveDenial::SpanTooLong.code(),
            LeaveDenial::YearlyLimitExceeded.code(),
            LeaveDenial::MonthlyLimitExceeded.code(),
        ];
        for (i, a) in codes.iter().enumerate() {
            for b in codes.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
