//! Relative period expressions: `-2years+3months`, `+7days`, ...
//!
//! An expression is a run of signed `<amount><unit>` steps. Steps are applied
//! cumulatively to a starting instant, left to right. Text between steps is
//! ignored, so an expression with no steps at all leaves its side of a period
//! tag unchecked.

use std::str::FromStr;

use chrono::{DateTime, Months, TimeDelta, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use super::error::ValidationError;

static STEP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([+-])(\d+)([a-z]+)").expect("period step pattern is valid"));

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Unit {
    Years,
    Months,
    Days,
    Hours,
    Minutes,
    Seconds,
    Nanoseconds,
}

impl FromStr for Unit {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "years"       => Ok(Self::Years),
            "months"      => Ok(Self::Months),
            "days"        => Ok(Self::Days),
            "hours"       => Ok(Self::Hours),
            "minutes"     => Ok(Self::Minutes),
            "seconds"     => Ok(Self::Seconds),
            "nanoseconds" => Ok(Self::Nanoseconds),
            _             => Err(()),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Step {
    amount: i64,
    unit: Unit,
}

/// A parsed period expression.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Period {
    steps: Vec<Step>,
}

impl Period {
    /// Parses `expr` for the field `field`. Unknown units are rejected here,
    /// not when the period is applied.
    pub(crate) fn parse(field: &'static str, expr: &str) -> Result<Self, ValidationError> {
        let mut steps = Vec::new();

        for caps in STEP.captures_iter(expr) {
            let unit = caps[3].parse::<Unit>().map_err(|()| ValidationError::UnsupportedUnit {
                field,
                unit: caps[3].to_owned(),
            })?;

            // `\d+` only fails to parse when it overflows i64.
            let amount: i64 = caps[2]
                .parse()
                .map_err(|_| ValidationError::PeriodOutOfRange { field })?;
            let amount = if &caps[1] == "-" { -amount } else { amount };

            steps.push(Step { amount, unit });
        }

        Ok(Self { steps })
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Applies every step to `from`. `None` when a step leaves the range
    /// chrono can represent.
    ///
    /// Month arithmetic clamps to the last day of the target month:
    /// January 31st plus one month is February 28th (or 29th).
    pub(crate) fn apply(&self, from: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.steps.iter().try_fold(from, |at, step| step.apply(at))
    }
}

impl Step {
    fn apply(self, at: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let delta = match self.unit {
            Unit::Years  => return add_months(at, self.amount.checked_mul(12)?),
            Unit::Months => return add_months(at, self.amount),
            Unit::Days        => TimeDelta::try_days(self.amount)?,
            Unit::Hours       => TimeDelta::try_hours(self.amount)?,
            Unit::Minutes     => TimeDelta::try_minutes(self.amount)?,
            Unit::Seconds     => TimeDelta::try_seconds(self.amount)?,
            Unit::Nanoseconds => TimeDelta::nanoseconds(self.amount),
        };
        at.checked_add_signed(delta)
    }
}

fn add_months(at: DateTime<Utc>, months: i64) -> Option<DateTime<Utc>> {
    let count = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
    if months < 0 {
        at.checked_sub_months(count)
    } else {
        at.checked_add_months(count)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn steps_apply_left_to_right() {
        let period = Period::parse("available", "-2years+3months").unwrap();
        assert_eq!(period.apply(at(2024, 6, 1)), Some(at(2022, 9, 1)));
    }

    #[test]
    fn every_unit_is_supported() {
        let period = Period::parse(
            "t",
            "+1years+1months+1days+1hours+1minutes+1seconds+1nanoseconds",
        )
        .unwrap();
        let expected = Utc.with_ymd_and_hms(2025, 7, 2, 13, 1, 1).unwrap()
            + TimeDelta::nanoseconds(1);
        assert_eq!(period.apply(at(2024, 6, 1)), Some(expected));
    }

    #[test]
    fn month_end_is_clamped() {
        let period = Period::parse("t", "+1months").unwrap();
        assert_eq!(period.apply(at(2024, 1, 31)), Some(at(2024, 2, 29)));
    }

    #[test]
    fn unknown_unit_is_rejected() {
        let err = Period::parse("available", "+2weeks").unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnsupportedUnit { field: "available", unit: "weeks".into() }
        );
    }

    #[test]
    fn text_without_steps_is_empty() {
        assert!(Period::parse("t", "").unwrap().is_empty());
        assert!(Period::parse("t", "soon").unwrap().is_empty());
        assert!(Period::parse("t", "7days").unwrap().is_empty());
    }

    #[test]
    fn overflowing_amount_is_out_of_range() {
        let err = Period::parse("t", "+99999999999999999999days").unwrap_err();
        assert_eq!(err, ValidationError::PeriodOutOfRange { field: "t" });

        let far = Period::parse("t", "+9000000000years").unwrap();
        assert_eq!(far.apply(at(2024, 1, 1)), None);
    }
}
