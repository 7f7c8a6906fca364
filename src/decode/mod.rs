//! # Decoding
//!
//! Converts untyped record values into typed values. [`TargetType`] names what a field
//! expects, [`Decoded`] carries the converted value and [`FromDecoded`] moves it into
//! the Rust field type.
use chrono::NaiveDate;
use chrono::NaiveDateTime;
use std::any::Any;
use std::any::TypeId;
use std::fmt::Display;
use thiserror::Error;

pub mod registry;
pub mod scalar;

/// Errors raised while decoding a raw value.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("No decoder accepts a {shape} value for target {target}")]
    NoDecoderFound { shape: &'static str, target: String },

    #[error("Value '{value}' cannot be represented as {target}")]
    ValueNotRepresentable { value: String, target: String },
}

impl DecodeError {
    pub(crate) fn not_representable(value: &str, target: &TargetType) -> Self {
        DecodeError::ValueNotRepresentable {
            value: value.to_owned(),
            target: target.to_string(),
        }
    }
}

/// A unit enum whose members are matched by name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumType {
    pub id: TypeId,
    pub name: &'static str,
    pub members: &'static [&'static str],
}

/// What a field expects to receive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TargetType {
    Boolean,
    Integer,
    Float,
    Double,
    String,
    Date,
    DateTime,
    Enum(EnumType),
    /// A nested record, by type name; only reachable through grouped columns
    Record(&'static str),
    List(Box<TargetType>),
    /// A type served by a registered [`registry::ScalarDecoder`] of the same name
    Custom(&'static str),
}

impl Display for TargetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetType::Boolean => write!(f, "boolean"),
            TargetType::Integer => write!(f, "integer"),
            TargetType::Float => write!(f, "float"),
            TargetType::Double => write!(f, "double"),
            TargetType::String => write!(f, "string"),
            TargetType::Date => write!(f, "date"),
            TargetType::DateTime => write!(f, "datetime"),
            TargetType::Enum(enum_type) => write!(f, "enum {}", enum_type.name),
            TargetType::Record(name) => write!(f, "record {}", name),
            TargetType::List(element) => write!(f, "list<{}>", element),
            TargetType::Custom(name) => write!(f, "{}", name),
        }
    }
}

/// A decoded value, ready to be moved into a typed field.
#[derive(Debug)]
pub enum Decoded {
    Boolean(bool),
    Integer(i64),
    Float(f32),
    Double(f64),
    /// `None` is the "no value" text `null`
    Text(Option<String>),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    /// Index of the matched enum member
    Enum(usize),
    List(Vec<Decoded>),
    Custom(Box<dyn Any>),
}

/// Rust types that can be produced from a [`Decoded`] value.
pub trait FromDecoded: Sized {
    /// The target type decoding must produce for this Rust type.
    fn target() -> TargetType;

    /// Converts the decoded value; `None` when it does not fit.
    fn from_decoded(value: Decoded) -> Option<Self>;
}

macro_rules! impl_from_decoded {
    ($ty:ty, $target:ident, $variant:ident) => {
        impl FromDecoded for $ty {
            fn target() -> TargetType {
                TargetType::$target
            }

            fn from_decoded(value: Decoded) -> Option<Self> {
                match value {
                    Decoded::$variant(value) => <$ty>::try_from(value).ok(),
                    _ => None,
                }
            }
        }
    };
}

impl_from_decoded!(bool, Boolean, Boolean);
impl_from_decoded!(i32, Integer, Integer);
impl_from_decoded!(i64, Integer, Integer);
impl_from_decoded!(u32, Integer, Integer);
impl_from_decoded!(u64, Integer, Integer);
impl_from_decoded!(f32, Float, Float);
impl_from_decoded!(f64, Double, Double);
impl_from_decoded!(NaiveDate, Date, Date);
impl_from_decoded!(NaiveDateTime, DateTime, DateTime);

impl FromDecoded for String {
    fn target() -> TargetType {
        TargetType::String
    }

    fn from_decoded(value: Decoded) -> Option<Self> {
        match value {
            Decoded::Text(text) => Some(text.unwrap_or_default()),
            _ => None,
        }
    }
}

impl<T: FromDecoded> FromDecoded for Option<T> {
    fn target() -> TargetType {
        T::target()
    }

    fn from_decoded(value: Decoded) -> Option<Self> {
        match value {
            Decoded::Text(None) => Some(None),
            value => T::from_decoded(value).map(Some),
        }
    }
}

impl<T: FromDecoded> FromDecoded for Vec<T> {
    fn target() -> TargetType {
        TargetType::List(Box::new(T::target()))
    }

    fn from_decoded(value: Decoded) -> Option<Self> {
        match value {
            Decoded::List(items) => items.into_iter().map(T::from_decoded).collect(),
            _ => None,
        }
    }
}
