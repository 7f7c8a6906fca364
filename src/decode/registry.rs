use crate::decode::scalar;
use crate::decode::DecodeError;
use crate::decode::Decoded;
use crate::decode::EnumType;
use crate::decode::TargetType;
use crate::table::Value;
use std::any::TypeId;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Decodes scalar text for a [`TargetType::Custom`] target of the same name.
pub trait ScalarDecoder {
    /// Name of the custom target this decoder serves.
    fn name(&self) -> &'static str;

    fn decode(&self, text: &str) -> Result<Decoded, DecodeError>;
}

/// Dispatches raw values to decoders by their shape and the requested target.
///
/// Scalars go through the built-in primitive parsers, enum member lookup or a
/// registered [`ScalarDecoder`]; lists are decoded element by element. Enum member
/// indexes are built on first use and kept for the registry's lifetime, so a registry
/// belongs to one decode session and is not shared across threads.
#[derive(Default)]
pub struct DecoderRegistry {
    custom: Vec<Box<dyn ScalarDecoder>>,
    enums: RefCell<HashMap<TypeId, Rc<HashMap<&'static str, usize>>>>,
}

impl DecoderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a decoder for custom targets. The first decoder registered for a name wins.
    pub fn register(&mut self, decoder: Box<dyn ScalarDecoder>) {
        self.custom.push(decoder);
    }

    /// Builder-style variant of [`DecoderRegistry::register`].
    pub fn with(mut self, decoder: Box<dyn ScalarDecoder>) -> Self {
        self.register(decoder);
        self
    }

    /// Decodes a raw value against a target type.
    pub fn decode(&self, raw: &Value, target: &TargetType) -> Result<Decoded, DecodeError> {
        match raw {
            Value::Scalar(text) => self.decode_scalar(raw, text, target),
            Value::List(items) => self.decode_list(raw, items, target),
        }
    }

    fn decode_scalar(&self, raw: &Value, text: &str, target: &TargetType) -> Result<Decoded, DecodeError> {
        let decoded = match target {
            TargetType::Boolean => scalar::parse_boolean(text).map(Decoded::Boolean),
            TargetType::Integer => scalar::parse_integer(text).map(Decoded::Integer),
            TargetType::Float => scalar::parse_float(text).map(Decoded::Float),
            TargetType::Double => scalar::parse_double(text).map(Decoded::Double),
            TargetType::String => Some(Decoded::Text(scalar::parse_string(text))),
            TargetType::Date => scalar::parse_date(text).map(Decoded::Date),
            TargetType::DateTime => scalar::parse_datetime(text).map(Decoded::DateTime),
            TargetType::Enum(enum_type) => self.enum_members(enum_type).get(text).map(|index| Decoded::Enum(*index)),
            TargetType::Custom(name) => {
                let decoder = self.custom
                    .iter()
                    .find(|decoder| decoder.name() == *name)
                    .ok_or_else(|| no_decoder(raw, target))?;
                return decoder.decode(text);
            }
            TargetType::Record(_) | TargetType::List(_) => return Err(no_decoder(raw, target)),
        };
        decoded.ok_or_else(|| DecodeError::not_representable(text, target))
    }

    /// Decodes every item or fails as a whole.
    fn decode_list(&self, raw: &Value, items: &[Value], target: &TargetType) -> Result<Decoded, DecodeError> {
        match target {
            TargetType::List(element) => items
                .iter()
                .map(|item| self.decode(item, element))
                .collect::<Result<Vec<_>, _>>()
                .map(Decoded::List),
            _ => Err(no_decoder(raw, target)),
        }
    }

    /// Member name to index of an enum, resolved once per registry.
    fn enum_members(&self, enum_type: &EnumType) -> Rc<HashMap<&'static str, usize>> {
        let mut enums = self.enums.borrow_mut();
        let members = enums.entry(enum_type.id).or_insert_with(|| {
            log::trace!("Resolve members of enum {}", enum_type.name);
            let members = enum_type.members
                .iter()
                .enumerate()
                .map(|(index, member)| (*member, index))
                .collect();
            Rc::new(members)
        });
        Rc::clone(members)
    }

    /// Number of enum types resolved so far.
    pub fn resolved_enums(&self) -> usize {
        self.enums.borrow().len()
    }

    /// Drops resolved enum members.
    pub fn clear(&self) {
        self.enums.borrow_mut().clear();
    }
}

fn no_decoder(raw: &Value, target: &TargetType) -> DecodeError {
    DecodeError::NoDecoderFound {
        shape: raw.shape(),
        target: target.to_string(),
    }
}
