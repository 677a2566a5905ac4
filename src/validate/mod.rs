//! Declarative field validation.
//!
//! A [`Schema`] lists the fields of one record type in declaration order,
//! each with a constraint tag whose grammar depends on the field's kind:
//!
//! | Kind | Rust type | Tag | Meaning |
//! |---|---|---|---|
//! | text | `String` | `^.{4,8}$` | the whole value matches the regex |
//! | float | `f32` | `min,max` | inclusive range; an empty side is unbounded |
//! | timestamp | `DateTime<Utc>` | `lower,upper` | strictly between two instants relative to now |
//!
//! Wrap any of them in `Option` to make the field optional: `None` is never
//! checked. Tags are parsed once, by [`SchemaBuilder::build`], so a typo in a
//! pattern or a unit surfaces at startup instead of on the first request.
//!
//! ```rust
//! use chrono::{DateTime, Utc};
//! use sieve::validate::Schema;
//!
//! struct Product {
//!     name: String,
//!     price: Option<f32>,
//!     available: DateTime<Utc>,
//! }
//!
//! let schema = Schema::builder()
//!     .field("name", "^.{4,8}$", |p: &Product| &p.name)
//!     .field("price", ",25", |p: &Product| &p.price)
//!     .field("available", "-2years+3months,+7days", |p: &Product| &p.available)
//!     .build()
//!     .unwrap();
//!
//! let product = Product { name: "lamp".into(), price: None, available: Utc::now() };
//! assert!(schema.validate(&product).is_ok());
//! ```

mod error;
mod period;
mod rule;

use std::marker::PhantomData;

use chrono::{DateTime, Utc};

pub use error::ValidationError;

use rule::Rule;

/// The kind of a field, which selects the grammar of its tag.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Kind {
    Text,
    Float,
    Timestamp,
}

/// A field's value, borrowed from the record being validated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value<'a> {
    Text(&'a str),
    Float(f32),
    Timestamp(DateTime<Utc>),
}

/// Implemented by every type a schema field can hold.
///
/// `KIND` decides how the tag is parsed; `value` yields what is checked, or
/// `None` to skip the field. A value whose variant does not match `KIND` is
/// reported as [`ValidationError::UnsupportedDatatype`].
pub trait Field {
    const KIND: Kind;

    fn value(&self) -> Option<Value<'_>>;
}

impl Field for String {
    const KIND: Kind = Kind::Text;

    fn value(&self) -> Option<Value<'_>> {
        Some(Value::Text(self))
    }
}

impl Field for f32 {
    const KIND: Kind = Kind::Float;

    fn value(&self) -> Option<Value<'_>> {
        Some(Value::Float(*self))
    }
}

impl Field for DateTime<Utc> {
    const KIND: Kind = Kind::Timestamp;

    fn value(&self) -> Option<Value<'_>> {
        Some(Value::Timestamp(*self))
    }
}

impl<T: Field> Field for Option<T> {
    const KIND: Kind = T::KIND;

    fn value(&self) -> Option<Value<'_>> {
        self.as_ref().and_then(Field::value)
    }
}

// ── Accessors ─────────────────────────────────────────────────────────────────

/// Type-erased "read this field of `R`".
trait Extract<R>: Send + Sync {
    fn extract<'a>(&self, record: &'a R) -> Option<Value<'a>>;
}

struct Accessor<A, F: ?Sized> {
    get: A,
    _field: PhantomData<fn() -> *const F>,
}

impl<R, F, A> Extract<R> for Accessor<A, F>
where
    F: Field + ?Sized + 'static,
    A: Fn(&R) -> &F + Send + Sync,
{
    fn extract<'a>(&self, record: &'a R) -> Option<Value<'a>> {
        (self.get)(record).value()
    }
}

struct FieldRule<R> {
    name: &'static str,
    rule: Rule,
    extract: Box<dyn Extract<R>>,
}

// ── Schema ────────────────────────────────────────────────────────────────────

/// The validation rules of one record type. Build it once, share it freely.
pub struct Schema<R> {
    fields: Vec<FieldRule<R>>,
}

impl<R> Schema<R> {
    pub fn builder() -> SchemaBuilder<R> {
        SchemaBuilder { fields: Vec::new(), error: None }
    }

    /// Checks `record` against every field, in declaration order, relative to
    /// the current instant. The first failing field wins.
    pub fn validate(&self, record: &R) -> Result<(), ValidationError> {
        self.validate_at(record, Utc::now())
    }

    /// [`validate`](Schema::validate) with an explicit "now" for period tags.
    pub fn validate_at(&self, record: &R, now: DateTime<Utc>) -> Result<(), ValidationError> {
        for field in &self.fields {
            let Some(value) = field.extract.extract(record) else {
                continue;
            };
            field.rule.check(field.name, value, now)?;
        }
        Ok(())
    }

    /// Declared field names, in order.
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }
}

/// Collects field declarations for a [`Schema`].
///
/// Tag errors are remembered and reported by [`build`](SchemaBuilder::build);
/// the first one in declaration order wins.
pub struct SchemaBuilder<R> {
    fields: Vec<FieldRule<R>>,
    error: Option<ValidationError>,
}

impl<R> SchemaBuilder<R> {
    /// Declares field `name`, read through `get`, constrained by `tag`.
    pub fn field<F, A>(mut self, name: &'static str, tag: &str, get: A) -> Self
    where
        F: Field + ?Sized + 'static,
        A: Fn(&R) -> &F + Send + Sync + 'static,
        R: 'static,
    {
        if self.error.is_some() {
            return self;
        }

        match Rule::parse(F::KIND, name, tag) {
            Ok(rule) => self.fields.push(FieldRule {
                name,
                rule,
                extract: Box::new(Accessor { get, _field: PhantomData }),
            }),
            Err(e) => self.error = Some(e),
        }
        self
    }

    pub fn build(self) -> Result<Schema<R>, ValidationError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(Schema { fields: self.fields }),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeDelta, TimeZone};

    use super::*;

    struct Input {
        name: String,
        price: f32,
        available: DateTime<Utc>,
    }

    struct Patch {
        name: Option<String>,
        price: Option<f32>,
        available: Option<DateTime<Utc>>,
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn input_schema(price: &str) -> Schema<Input> {
        Schema::builder()
            .field("name", "^.{4,8}$", |i: &Input| &i.name)
            .field("price", price, |i: &Input| &i.price)
            .field("available", "-1days,+1days", |i: &Input| &i.available)
            .build()
            .unwrap()
    }

    fn input(name: &str, price: f32, available: DateTime<Utc>) -> Input {
        Input { name: name.to_owned(), price, available }
    }

    #[test]
    fn name_length_pattern() {
        let schema = input_schema(",25");
        assert_eq!(
            schema.validate_at(&input("ab", 1.0, now()), now()),
            Err(ValidationError::PatternMismatch { field: "name", tag: "^.{4,8}$".into() })
        );
        assert!(schema.validate_at(&input("abcd", 1.0, now()), now()).is_ok());
    }

    #[test]
    fn upper_bound_only() {
        let schema = input_schema(",25");
        assert!(schema.validate_at(&input("abcd", 25.0, now()), now()).is_ok());
        assert!(schema.validate_at(&input("abcd", -1e6, now()), now()).is_ok());
        assert_eq!(
            schema.validate_at(&input("abcd", 25.5, now()), now()),
            Err(ValidationError::AboveMaximum { field: "price", max: 25.0 })
        );
    }

    #[test]
    fn lower_bound_only() {
        let schema = input_schema("10,");
        assert_eq!(
            schema.validate_at(&input("abcd", 5.0, now()), now()),
            Err(ValidationError::BelowMinimum { field: "price", min: 10.0 })
        );
        assert!(schema.validate_at(&input("abcd", 10.0, now()), now()).is_ok());
        assert!(schema.validate_at(&input("abcd", 1000.0, now()), now()).is_ok());
    }

    #[test]
    fn period_window_around_now() {
        let schema = input_schema(",25");
        assert!(schema.validate_at(&input("abcd", 1.0, now()), now()).is_ok());

        let two_days_ago = now() - TimeDelta::days(2);
        let err = schema.validate_at(&input("abcd", 1.0, two_days_ago), now()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::NotAfter { field: "available", boundary: now() - TimeDelta::days(1) }
        );
    }

    #[test]
    fn wall_clock_now_is_inside_the_window() {
        let schema = input_schema(",25");
        assert!(schema.validate(&input("abcd", 1.0, Utc::now())).is_ok());
    }

    #[test]
    fn first_failing_field_wins() {
        let schema = input_schema(",25");
        let err = schema.validate_at(&input("ab", 99.0, now() - TimeDelta::days(9)), now());
        assert_eq!(err.unwrap_err().field(), "name");
    }

    #[test]
    fn unset_optional_fields_are_skipped() {
        // Tags that would reject every present value.
        let schema = Schema::builder()
            .field("name", "^$", |p: &Patch| &p.name)
            .field("price", ",-1", |p: &Patch| &p.price)
            .field("available", "+1days,-1days", |p: &Patch| &p.available)
            .build()
            .unwrap();

        let empty = Patch { name: None, price: None, available: None };
        assert!(schema.validate_at(&empty, now()).is_ok());

        let priced = Patch { name: None, price: Some(3.0), available: None };
        assert_eq!(schema.validate_at(&priced, now()).unwrap_err().field(), "price");
    }

    #[test]
    fn validation_is_idempotent() {
        let schema = input_schema(",25");
        let bad = input("abcd", 30.0, now());
        let good = input("abcd", 3.0, now());

        assert_eq!(schema.validate_at(&bad, now()), schema.validate_at(&bad, now()));
        assert_eq!(schema.validate_at(&good, now()), schema.validate_at(&good, now()));
    }

    #[test]
    fn first_tag_error_is_reported_by_build() {
        let err = Schema::builder()
            .field("name", "(", |i: &Input| &i.name)
            .field("price", "25", |i: &Input| &i.price)
            .build()
            .err()
            .unwrap();
        assert_eq!(err.field(), "name");

        let err = Schema::builder()
            .field("name", "^.+$", |i: &Input| &i.name)
            .field("available", "+3fortnights,", |i: &Input| &i.available)
            .build()
            .err()
            .unwrap();
        assert_eq!(
            err,
            ValidationError::UnsupportedUnit { field: "available", unit: "fortnights".into() }
        );
    }

    #[test]
    fn mismatched_field_impl_is_unsupported() {
        struct Cents(u32);

        impl Field for Cents {
            const KIND: Kind = Kind::Text;

            fn value(&self) -> Option<Value<'_>> {
                Some(Value::Float(self.0 as f32 / 100.0))
            }
        }

        let schema = Schema::builder()
            .field("cents", "", |c: &Cents| c)
            .build()
            .unwrap();
        assert_eq!(
            schema.validate(&Cents(250)),
            Err(ValidationError::UnsupportedDatatype { field: "cents" })
        );
    }

    #[test]
    fn fields_keep_declaration_order() {
        let schema = input_schema(",25");
        assert_eq!(schema.fields().collect::<Vec<_>>(), ["name", "price", "available"]);
    }
}
