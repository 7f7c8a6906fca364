//! # Object Binding
//!
//! Typed records describe their public fields through [`Bindable`], usually by declaring
//! them with the [`bindable!`](crate::bindable) macro. A [`binder::Binder`] walks a
//! [`Record`](crate::table::Record), resolves each key against that description and
//! decodes the value into the field.
use crate::decode::DecodeError;
use crate::decode::Decoded;
use crate::decode::TargetType;
use std::any::TypeId;
use thiserror::Error;

pub mod binder;
mod macros;

/// Errors raised while binding a record to a typed instance.
#[derive(Error, Debug)]
pub enum BindError {
    #[error("{type_name} has no field for key '{key}'")]
    PropertyNotFound { type_name: &'static str, key: String },

    #[error("Key '{key}' of {type_name} nests deeper than one group level")]
    UnsupportedPath { type_name: &'static str, key: String },

    #[error("Field '{field}' of {type_name} is not a list of records")]
    NotAGroup { type_name: &'static str, field: String },

    #[error("Field '{key}' of {type_name}: {source}")]
    Decode {
        type_name: &'static str,
        key: String,
        #[source]
        source: DecodeError,
    },

    #[error("Record {index}: {source}")]
    Record {
        index: usize,
        #[source]
        source: Box<BindError>,
    },
}

/// Why [`Bindable::assign`] refused a value.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AssignError {
    /// The type has no value field with this name
    UnknownField,
    /// The decoded value does not fit the field's Rust type
    Mismatch,
}

/// One declared field of a bindable type.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub target: TargetType,
}

impl FieldDescriptor {
    /// A field decoded directly from a record value.
    pub fn value(name: &'static str, target: TargetType) -> Self {
        FieldDescriptor { name, target }
    }

    /// A list of nested records filled from grouped (dotted) columns.
    pub fn group(name: &'static str, element: &'static str) -> Self {
        FieldDescriptor {
            name,
            target: TargetType::List(Box::new(TargetType::Record(element))),
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(&self.target, TargetType::List(element) if matches!(**element, TargetType::Record(_)))
    }
}

/// The ordered public fields of a bindable type.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeDescriptor {
    pub name: &'static str,
    pub fields: Vec<FieldDescriptor>,
}

impl TypeDescriptor {
    pub fn new(name: &'static str, fields: Vec<FieldDescriptor>) -> Self {
        TypeDescriptor { name, fields }
    }

    /// Looks a field up by exact, case-sensitive name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }
}

/// A type whose instances can be populated from records.
pub trait Bindable: 'static {
    fn descriptor() -> TypeDescriptor
    where
        Self: Sized;

    /// Stores a decoded value into a value field.
    fn assign(&mut self, field: &str, value: Decoded) -> Result<(), AssignError>;

    /// Gives access to a group field (a list of nested records).
    fn group_mut(&mut self, field: &str) -> Option<&mut dyn Group>;
}

/// A growable list of nested bindable records.
pub trait Group {
    /// Type id and descriptor of the element type.
    fn element(&self) -> (TypeId, fn() -> TypeDescriptor);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends default elements until the list holds at least `len` of them.
    fn grow(&mut self, len: usize);

    fn element_mut(&mut self, index: usize) -> Option<&mut dyn Bindable>;
}

impl<T: Bindable + Default> Group for Vec<T> {
    fn element(&self) -> (TypeId, fn() -> TypeDescriptor) {
        (TypeId::of::<T>(), T::descriptor)
    }

    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn grow(&mut self, len: usize) {
        if Vec::len(self) < len {
            self.resize_with(len, T::default);
        }
    }

    fn element_mut(&mut self, index: usize) -> Option<&mut dyn Bindable> {
        self.get_mut(index).map(|element| element as &mut dyn Bindable)
    }
}
