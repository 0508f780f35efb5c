//! Trailing twelve-month earnings aggregation.
//!
//! # Responsibility
//! - Bucket payment amounts into the twelve months ending at `today`.
//!
//! # Invariants
//! - Output always has exactly `MONTHS_IN_WINDOW` entries, oldest month first.
//! - Output does not depend on input order.
//! - Payments without a date never abort aggregation; they are reported.
//!
//! Under `BucketingMode::MonthOfYear` the year of a payment is ignored, so a
//! payment from June last year lands in this June's bucket. `Strict` buckets
//! by (year, month) and reports payments outside the window instead.

use crate::model::payment::{Payment, PaymentId};
use crate::model::{MalformedReason, MalformedRecord, RecordKind};
use chrono::{Datelike, NaiveDate};
use log::warn;
use serde::{Deserialize, Serialize};

pub const MONTHS_IN_WINDOW: usize = 12;

const MONTH_LABELS: [&str; MONTHS_IN_WINDOW] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// How a payment date is mapped onto a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BucketingMode {
    /// Month-of-year only; same-named months from different years share a bucket.
    #[default]
    MonthOfYear,
    /// Absolute (year, month) within the trailing window.
    Strict,
}

impl BucketingMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "month_of_year" => Some(Self::MonthOfYear),
            "strict" => Some(Self::Strict),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::MonthOfYear => "month_of_year",
            Self::Strict => "strict",
        }
    }
}

/// One bucket of the earnings series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyEarnings {
    /// Short month name, `Jan`..`Dec`.
    pub month: String,
    pub earnings: u64,
}

/// Aggregation output plus the payments that did not contribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EarningsSeries {
    /// Oldest month first, current month last.
    pub months: Vec<MonthlyEarnings>,
    /// Payments skipped because they carry no date.
    pub malformed: Vec<MalformedRecord>,
    /// Payments outside the window. Only populated in `Strict` mode.
    pub out_of_window: Vec<PaymentId>,
}

impl EarningsSeries {
    pub fn total(&self) -> u64 {
        self.months
            .iter()
            .fold(0u64, |sum, bucket| sum.saturating_add(bucket.earnings))
    }
}

/// Aggregates payments into the twelve months ending at `today`'s month.
///
/// Bucket `i` before the final reversal is the month `i` months before
/// `today`. Amounts are summed with saturation, which keeps the result
/// independent of input order.
pub fn aggregate_monthly_earnings(
    payments: &[Payment],
    today: NaiveDate,
    mode: BucketingMode,
) -> EarningsSeries {
    let current = today.month0() as usize;
    let mut months: Vec<MonthlyEarnings> = (0..MONTHS_IN_WINDOW)
        .map(|offset| MonthlyEarnings {
            month: MONTH_LABELS[(current + MONTHS_IN_WINDOW - offset) % MONTHS_IN_WINDOW]
                .to_string(),
            earnings: 0,
        })
        .collect();
    let mut malformed = Vec::new();
    let mut out_of_window = Vec::new();

    for payment in payments {
        let Some(date) = payment.date else {
            warn!(
                "event=earnings_aggregate module=analytics status=skipped reason=missing_date payment_id={}",
                payment.id
            );
            malformed.push(MalformedRecord::new(
                RecordKind::Payment,
                payment.id.to_string(),
                MalformedReason::MissingDate,
            ));
            continue;
        };

        let offset = match mode {
            BucketingMode::MonthOfYear => Some(month_of_year_offset(today, date)),
            BucketingMode::Strict => absolute_month_offset(today, date),
        };
        let Some(offset) = offset else {
            out_of_window.push(payment.id);
            continue;
        };

        let bucket = &mut months[offset];
        bucket.earnings = bucket.earnings.saturating_add(payment.amount);
    }

    months.reverse();
    EarningsSeries {
        months,
        malformed,
        out_of_window,
    }
}

fn month_of_year_offset(today: NaiveDate, date: NaiveDate) -> usize {
    (today.month0() as usize + MONTHS_IN_WINDOW - date.month0() as usize) % MONTHS_IN_WINDOW
}

fn absolute_month_offset(today: NaiveDate, date: NaiveDate) -> Option<usize> {
    let months_since_epoch = |day: NaiveDate| i64::from(day.year()) * 12 + i64::from(day.month0());
    let offset = months_since_epoch(today) - months_since_epoch(date);
    usize::try_from(offset)
        .ok()
        .filter(|offset| *offset < MONTHS_IN_WINDOW)
}

#[cfg(test)]
mod tests {
    use super::{aggregate_monthly_earnings, BucketingMode, MONTHS_IN_WINDOW};
    use crate::model::payment::Payment;
    use crate::model::MalformedReason;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn day(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn payment(amount: u64, date: NaiveDate) -> Payment {
        Payment::new(Uuid::new_v4(), amount, date)
    }

    fn earnings_for(series: &super::EarningsSeries, month: &str) -> u64 {
        series
            .months
            .iter()
            .find(|bucket| bucket.month == month)
            .map(|bucket| bucket.earnings)
            .unwrap()
    }

    #[test]
    fn empty_input_yields_twelve_zero_buckets_ending_at_current_month() {
        let series = aggregate_monthly_earnings(&[], day(2024, 6, 15), BucketingMode::MonthOfYear);

        assert_eq!(series.months.len(), MONTHS_IN_WINDOW);
        assert!(series.months.iter().all(|bucket| bucket.earnings == 0));
        let labels: Vec<&str> = series.months.iter().map(|b| b.month.as_str()).collect();
        assert_eq!(
            labels,
            ["Jul", "Aug", "Sep", "Oct", "Nov", "Dec", "Jan", "Feb", "Mar", "Apr", "May", "Jun"]
        );
    }

    #[test]
    fn same_month_of_previous_year_aliases_onto_current_bucket() {
        let payments = vec![
            payment(100, day(2024, 6, 1)),
            payment(50, day(2024, 5, 1)),
            payment(25, day(2023, 6, 1)),
        ];

        let series =
            aggregate_monthly_earnings(&payments, day(2024, 6, 15), BucketingMode::MonthOfYear);

        assert_eq!(series.months.last().unwrap().month, "Jun");
        assert_eq!(earnings_for(&series, "Jun"), 125);
        assert_eq!(earnings_for(&series, "May"), 50);
        assert_eq!(series.total(), 175);
        assert!(series.out_of_window.is_empty());
    }

    #[test]
    fn strict_mode_reports_payments_outside_window() {
        let old = payment(25, day(2023, 6, 1));
        let future = payment(10, day(2024, 7, 2));
        let payments = vec![payment(100, day(2024, 6, 1)), old.clone(), future.clone()];

        let series = aggregate_monthly_earnings(&payments, day(2024, 6, 15), BucketingMode::Strict);

        assert_eq!(earnings_for(&series, "Jun"), 100);
        assert_eq!(series.total(), 100);
        assert_eq!(series.out_of_window, vec![old.id, future.id]);
    }

    #[test]
    fn strict_mode_keeps_oldest_month_of_window() {
        let payments = vec![payment(40, day(2023, 7, 31))];
        let series = aggregate_monthly_earnings(&payments, day(2024, 6, 15), BucketingMode::Strict);

        assert_eq!(series.months[0].month, "Jul");
        assert_eq!(series.months[0].earnings, 40);
    }

    #[test]
    fn january_wraps_to_previous_december() {
        let payments = vec![payment(70, day(2023, 12, 20)), payment(5, day(2024, 1, 2))];
        let series = aggregate_monthly_earnings(&payments, day(2024, 1, 10), BucketingMode::Strict);

        let tail: Vec<(&str, u64)> = series.months[10..]
            .iter()
            .map(|bucket| (bucket.month.as_str(), bucket.earnings))
            .collect();
        assert_eq!(tail, [("Dec", 70), ("Jan", 5)]);
    }

    #[test]
    fn payment_without_date_is_reported_not_counted() {
        let mut undated = payment(999, day(2024, 6, 1));
        undated.date = None;
        let payments = vec![undated.clone(), payment(10, day(2024, 6, 2))];

        let series =
            aggregate_monthly_earnings(&payments, day(2024, 6, 15), BucketingMode::MonthOfYear);

        assert_eq!(series.total(), 10);
        assert_eq!(series.malformed.len(), 1);
        assert_eq!(series.malformed[0].record_id, undated.id.to_string());
        assert_eq!(series.malformed[0].reason, MalformedReason::MissingDate);
    }

    #[test]
    fn total_is_conserved_and_order_independent() {
        let today = day(2024, 6, 15);
        let mut payments: Vec<Payment> = (1..=30u32)
            .map(|n| payment(u64::from(n) * 7, day(2020 + (n % 5) as i32, n % 12 + 1, n % 28 + 1)))
            .collect();
        let expected: u64 = payments.iter().map(|p| p.amount).sum();

        let forward = aggregate_monthly_earnings(&payments, today, BucketingMode::MonthOfYear);
        payments.reverse();
        let backward = aggregate_monthly_earnings(&payments, today, BucketingMode::MonthOfYear);

        assert_eq!(forward.total(), expected);
        assert_eq!(forward.months, backward.months);
    }

    #[test]
    fn sums_saturate_instead_of_overflowing() {
        let payments = vec![payment(u64::MAX, day(2024, 6, 1)), payment(1, day(2024, 6, 2))];
        let series =
            aggregate_monthly_earnings(&payments, day(2024, 6, 15), BucketingMode::MonthOfYear);
        assert_eq!(earnings_for(&series, "Jun"), u64::MAX);
    }

    #[test]
    fn bucketing_mode_parses_config_text() {
        assert_eq!(BucketingMode::parse("Strict"), Some(BucketingMode::Strict));
        assert_eq!(
            BucketingMode::parse("month_of_year"),
            Some(BucketingMode::MonthOfYear)
        );
        assert_eq!(BucketingMode::parse("weekly"), None);
    }
}
