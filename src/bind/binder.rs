use crate::bind::AssignError;
use crate::bind::BindError;
use crate::bind::Bindable;
use crate::bind::TypeDescriptor;
use crate::decode::registry::DecoderRegistry;
use crate::decode::DecodeError;
use crate::decode::TargetType;
use crate::table::split_label;
use crate::table::Record;
use crate::table::Table;
use crate::table::Value;
use std::any::TypeId;
use std::collections::HashMap;
use std::rc::Rc;

/// Where a record key lands on a bindable type.
#[derive(Debug)]
enum ResolvedPath {
    /// A value field decoded from the whole value
    Field { field: &'static str, target: TargetType },
    /// A group field whose elements receive `suffix`, one list item each
    Group { field: &'static str, suffix: String },
}

/// A decode session.
///
/// Owns the decoder registry plus the descriptor and key-resolution caches used while
/// binding a batch of records. The caches live until [`Binder::clear`] or until the
/// binder is dropped; they are not shared, so parallel work uses one binder per unit.
#[derive(Default)]
pub struct Binder {
    registry: DecoderRegistry,
    descriptors: HashMap<TypeId, Rc<TypeDescriptor>>,
    paths: HashMap<TypeId, HashMap<String, Rc<ResolvedPath>>>,
}

impl Binder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session around a registry with custom decoders.
    pub fn with_registry(registry: DecoderRegistry) -> Self {
        Binder {
            registry,
            ..Binder::default()
        }
    }

    pub fn registry(&self) -> &DecoderRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut DecoderRegistry {
        &mut self.registry
    }

    /// Builds a `T` from one record, processing keys in record order.
    ///
    /// The first failing key aborts the bind; no partially populated instance escapes.
    pub fn bind<T: Bindable + Default>(&mut self, record: &Record) -> Result<T, BindError> {
        let mut instance = T::default();
        for (key, value) in record {
            self.bind_entry(&mut instance, TypeId::of::<T>(), T::descriptor, key, value)?;
        }
        Ok(instance)
    }

    /// Binds every record of a table, in order. The first failure aborts the batch and
    /// reports the position of the failing record.
    pub fn bind_all<T: Bindable + Default>(&mut self, table: &Table) -> Result<Vec<T>, BindError> {
        table
            .iter()
            .enumerate()
            .map(|(index, record)| {
                self.bind::<T>(record).map_err(|error| BindError::Record {
                    index,
                    source: Box::new(error),
                })
            })
            .collect()
    }

    /// Ends the session's caches.
    pub fn clear(&mut self) {
        log::debug!(
            "Clear decode session: {} descriptors, {} resolved keys",
            self.descriptors.len(),
            self.resolved_keys()
        );
        self.descriptors.clear();
        self.paths.clear();
        self.registry.clear();
    }

    /// Number of record keys resolved and cached so far.
    pub fn resolved_keys(&self) -> usize {
        self.paths.values().map(HashMap::len).sum()
    }

    fn bind_entry(
        &mut self,
        instance: &mut dyn Bindable,
        type_id: TypeId,
        describe: fn() -> TypeDescriptor,
        key: &str,
        value: &Value,
    ) -> Result<(), BindError> {
        let descriptor = self.descriptor(type_id, describe);
        let path = self.resolve(type_id, &descriptor, key)?;
        match path.as_ref() {
            ResolvedPath::Field { field, target } => {
                let decoded = self.registry
                    .decode(value, target)
                    .map_err(|source| decode_error(&descriptor, key, source))?;
                instance.assign(field, decoded).map_err(|error| match error {
                    AssignError::UnknownField => BindError::PropertyNotFound {
                        type_name: descriptor.name,
                        key: key.to_owned(),
                    },
                    AssignError::Mismatch => {
                        decode_error(&descriptor, key, DecodeError::not_representable(&value.to_string(), target))
                    }
                })
            }
            ResolvedPath::Group { field, suffix } => {
                let group = instance.group_mut(field).ok_or_else(|| BindError::NotAGroup {
                    type_name: descriptor.name,
                    field: field.to_string(),
                })?;
                let items = match value {
                    Value::List(items) => items.as_slice(),
                    Value::Scalar(_) => std::slice::from_ref(value),
                };
                let (element_id, element_describe) = group.element();
                group.grow(items.len());
                for (index, item) in items.iter().enumerate() {
                    // Gap left by a blank grouped cell: the element keeps its defaults
                    if matches!(item, Value::Scalar(text) if text.is_empty()) {
                        continue;
                    }
                    let element = group.element_mut(index).ok_or_else(|| BindError::NotAGroup {
                        type_name: descriptor.name,
                        field: field.to_string(),
                    })?;
                    self.bind_entry(element, element_id, element_describe, suffix, item)?;
                }
                Ok(())
            }
        }
    }

    fn descriptor(&mut self, type_id: TypeId, describe: fn() -> TypeDescriptor) -> Rc<TypeDescriptor> {
        let descriptor = self.descriptors
            .entry(type_id)
            .or_insert_with(|| Rc::new(describe()));
        Rc::clone(descriptor)
    }

    /// Resolves a key against a type's fields, caching the outcome per type and key.
    fn resolve(&mut self, type_id: TypeId, descriptor: &TypeDescriptor, key: &str) -> Result<Rc<ResolvedPath>, BindError> {
        if let Some(path) = self.paths.get(&type_id).and_then(|paths| paths.get(key)) {
            return Ok(Rc::clone(path));
        }

        let (property, suffix) = split_label(key);
        let field = descriptor.field(property).ok_or_else(|| BindError::PropertyNotFound {
            type_name: descriptor.name,
            key: key.to_owned(),
        })?;
        let path = match suffix {
            None => ResolvedPath::Field {
                field: field.name,
                target: field.target.clone(),
            },
            Some(suffix) if suffix.contains('.') => {
                return Err(BindError::UnsupportedPath {
                    type_name: descriptor.name,
                    key: key.to_owned(),
                })
            }
            Some(suffix) if field.is_group() => ResolvedPath::Group {
                field: field.name,
                suffix: suffix.to_owned(),
            },
            Some(_) => {
                return Err(BindError::NotAGroup {
                    type_name: descriptor.name,
                    field: field.name.to_owned(),
                })
            }
        };

        let path = Rc::new(path);
        self.paths
            .entry(type_id)
            .or_default()
            .insert(key.to_owned(), Rc::clone(&path));
        Ok(path)
    }
}

fn decode_error(descriptor: &TypeDescriptor, key: &str, source: DecodeError) -> BindError {
    BindError::Decode {
        type_name: descriptor.name,
        key: key.to_owned(),
        source,
    }
}
