//! Constraint tags, parsed once and checked per record.

use chrono::{DateTime, Utc};
use regex::Regex;

use super::error::ValidationError;
use super::period::Period;
use super::{Kind, Value};

/// A parsed constraint tag.
#[derive(Debug)]
pub(crate) enum Rule {
    /// `regex` is `None` for an empty tag, which accepts any text.
    Pattern { tag: String, regex: Option<Regex> },
    Range { min: Option<f32>, max: Option<f32> },
    Period { lower: Period, upper: Period },
}

impl Rule {
    /// Parses `tag` with the grammar of `kind`.
    pub(crate) fn parse(kind: Kind, field: &'static str, tag: &str) -> Result<Self, ValidationError> {
        match kind {
            Kind::Text => parse_pattern(field, tag),
            Kind::Float => parse_range(field, tag),
            Kind::Timestamp => parse_period(field, tag),
        }
    }

    pub(crate) fn check(
        &self,
        field: &'static str,
        value: Value<'_>,
        now: DateTime<Utc>,
    ) -> Result<(), ValidationError> {
        match (self, value) {
            (Self::Pattern { tag, regex }, Value::Text(text)) => match regex {
                Some(regex) if !regex.is_match(text) => {
                    Err(ValidationError::PatternMismatch { field, tag: tag.clone() })
                }
                _ => Ok(()),
            },

            (Self::Range { min, max }, Value::Float(number)) => {
                if let Some(min) = min.filter(|min| number < *min) {
                    return Err(ValidationError::BelowMinimum { field, min });
                }
                if let Some(max) = max.filter(|max| number > *max) {
                    return Err(ValidationError::AboveMaximum { field, max });
                }
                Ok(())
            }

            (Self::Period { lower, upper }, Value::Timestamp(date)) => {
                if !lower.is_empty() {
                    let boundary = lower
                        .apply(now)
                        .ok_or(ValidationError::PeriodOutOfRange { field })?;
                    if date <= boundary {
                        return Err(ValidationError::NotAfter { field, boundary });
                    }
                }
                if !upper.is_empty() {
                    let boundary = upper
                        .apply(now)
                        .ok_or(ValidationError::PeriodOutOfRange { field })?;
                    if date >= boundary {
                        return Err(ValidationError::NotBefore { field, boundary });
                    }
                }
                Ok(())
            }

            _ => Err(ValidationError::UnsupportedDatatype { field }),
        }
    }
}

fn parse_pattern(field: &'static str, tag: &str) -> Result<Rule, ValidationError> {
    if tag.is_empty() {
        return Ok(Rule::Pattern { tag: String::new(), regex: None });
    }

    let invalid = |e: regex::Error| ValidationError::InvalidPattern {
        field,
        tag: tag.to_owned(),
        reason: e.to_string(),
    };

    // The tag must compile on its own before it is anchored, otherwise a tag
    // such as `a)(b` would be accepted once wrapped.
    Regex::new(tag).map_err(invalid)?;
    let regex = Regex::new(&format!("^(?:{tag})$")).map_err(invalid)?;

    Ok(Rule::Pattern { tag: tag.to_owned(), regex: Some(regex) })
}

fn parse_range(field: &'static str, tag: &str) -> Result<Rule, ValidationError> {
    let [min, max] = split_pair(tag).ok_or(ValidationError::MalformedRange { field })?;

    // An unparseable bound is no bound: `,25` and `10,` are one-sided ranges.
    Ok(Rule::Range {
        min: min.parse().ok(),
        max: max.parse().ok(),
    })
}

fn parse_period(field: &'static str, tag: &str) -> Result<Rule, ValidationError> {
    let [lower, upper] = split_pair(tag).ok_or(ValidationError::MalformedPeriod { field })?;

    Ok(Rule::Period {
        lower: Period::parse(field, lower)?,
        upper: Period::parse(field, upper)?,
    })
}

/// Splits `tag` on commas, requiring exactly two parts.
fn split_pair(tag: &str) -> Option<[&str; 2]> {
    let mut parts = tag.split(',');
    let pair = [parts.next()?, parts.next()?];
    parts.next().is_none().then_some(pair)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeDelta, TimeZone};

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn split_pair_requires_two_parts() {
        assert_eq!(split_pair(",25"), Some(["", "25"]));
        assert_eq!(split_pair(","), Some(["", ""]));
        assert_eq!(split_pair("25"), None);
        assert_eq!(split_pair(""), None);
        assert_eq!(split_pair("1,2,3"), None);
    }

    #[test]
    fn pattern_matches_whole_value() {
        let rule = Rule::parse(Kind::Text, "code", "[a-z]+").unwrap();
        assert!(rule.check("code", Value::Text("abc"), now()).is_ok());
        assert_eq!(
            rule.check("code", Value::Text("abc1"), now()),
            Err(ValidationError::PatternMismatch { field: "code", tag: "[a-z]+".into() })
        );
    }

    #[test]
    fn alternation_is_anchored_as_a_whole() {
        let rule = Rule::parse(Kind::Text, "size", "small|large").unwrap();
        assert!(rule.check("size", Value::Text("large"), now()).is_ok());
        assert!(rule.check("size", Value::Text("smallish"), now()).is_err());
    }

    #[test]
    fn empty_pattern_accepts_anything() {
        let rule = Rule::parse(Kind::Text, "note", "").unwrap();
        assert!(rule.check("note", Value::Text("whatever"), now()).is_ok());
    }

    #[test]
    fn broken_pattern_is_rejected_at_parse() {
        let err = Rule::parse(Kind::Text, "name", "a)(b").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidPattern { field: "name", .. }));

        let err = Rule::parse(Kind::Text, "name", "(").unwrap_err();
        assert_eq!(err.field(), "name");
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let rule = Rule::parse(Kind::Float, "price", "1,2").unwrap();
        assert!(rule.check("price", Value::Float(1.0), now()).is_ok());
        assert!(rule.check("price", Value::Float(2.0), now()).is_ok());
        assert_eq!(
            rule.check("price", Value::Float(0.5), now()),
            Err(ValidationError::BelowMinimum { field: "price", min: 1.0 })
        );
        assert_eq!(
            rule.check("price", Value::Float(2.5), now()),
            Err(ValidationError::AboveMaximum { field: "price", max: 2.0 })
        );
    }

    #[test]
    fn typo_in_a_bound_means_unbounded() {
        let rule = Rule::parse(Kind::Float, "price", "1O,20").unwrap();
        assert!(rule.check("price", Value::Float(-100.0), now()).is_ok());
        assert!(rule.check("price", Value::Float(21.0), now()).is_err());
    }

    #[test]
    fn malformed_tags() {
        assert_eq!(
            Rule::parse(Kind::Float, "price", "25").unwrap_err(),
            ValidationError::MalformedRange { field: "price" }
        );
        assert_eq!(
            Rule::parse(Kind::Timestamp, "at", "+1days").unwrap_err(),
            ValidationError::MalformedPeriod { field: "at" }
        );
    }

    #[test]
    fn period_boundaries_are_strict() {
        let rule = Rule::parse(Kind::Timestamp, "at", "-1hours,+1hours").unwrap();
        let lower = now() - TimeDelta::hours(1);
        let upper = now() + TimeDelta::hours(1);

        assert!(rule.check("at", Value::Timestamp(now()), now()).is_ok());
        assert_eq!(
            rule.check("at", Value::Timestamp(lower), now()),
            Err(ValidationError::NotAfter { field: "at", boundary: lower })
        );
        assert_eq!(
            rule.check("at", Value::Timestamp(upper), now()),
            Err(ValidationError::NotBefore { field: "at", boundary: upper })
        );
    }

    #[test]
    fn empty_period_side_is_unchecked() {
        let rule = Rule::parse(Kind::Timestamp, "at", ",+1days").unwrap();
        let ancient = Utc.with_ymd_and_hms(1900, 1, 1, 0, 0, 0).unwrap();
        assert!(rule.check("at", Value::Timestamp(ancient), now()).is_ok());
    }

    #[test]
    fn overflowing_boundary_fails_the_check() {
        let rule = Rule::parse(Kind::Timestamp, "at", "+9000000000years,").unwrap();
        assert_eq!(
            rule.check("at", Value::Timestamp(now()), now()),
            Err(ValidationError::PeriodOutOfRange { field: "at" })
        );

        let rule = Rule::parse(Kind::Timestamp, "at", ",-9000000000years").unwrap();
        assert_eq!(
            rule.check("at", Value::Timestamp(now()), now()),
            Err(ValidationError::PeriodOutOfRange { field: "at" })
        );
    }

    #[test]
    fn value_of_another_kind_is_unsupported() {
        let rule = Rule::parse(Kind::Float, "price", ",25").unwrap();
        assert_eq!(
            rule.check("price", Value::Text("12"), now()),
            Err(ValidationError::UnsupportedDatatype { field: "price" })
        );
    }
}
