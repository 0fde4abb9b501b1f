//! Yocton deserialization.
//!
//! Documents are read into [`Fields`] first and then walked by the
//! deserializers in this module. Every Yocton value is a string, so numbers,
//! booleans and chars are parsed from the string when the target type asks
//! for them.
//!
//! ## Repeated properties
//!
//! When an object maps onto a struct or a map, properties are grouped by
//! name. A field with a sequence type receives every occurrence in order;
//! any other field receives the last one.
//!
//! ```rust
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Config {
//!     name: String,
//!     port: u16,
//!     include: Vec<String>,
//!     debug: Option<bool>,
//! }
//!
//! let input = "name: demo\nport: 80\ninclude: a.conf\nport: 8080\ninclude: b.conf\n";
//! let config: Config = yocton::from_str(input).unwrap();
//! assert_eq!(
//!     config,
//!     Config {
//!         name: "demo".into(),
//!         port: 8080,
//!         include: vec!["a.conf".into(), "b.conf".into()],
//!         debug: None,
//!     }
//! );
//! ```
//!
//! ## Enums
//!
//! Unit variants are written as their name; other variants as an object with
//! a single property named after the variant.
//!
//! ```rust
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! enum Shape {
//!     Empty,
//!     Circle { r: f64 },
//! }
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Scene {
//!     shape: Vec<Shape>,
//! }
//!
//! let scene: Scene = yocton::from_str("shape: Empty\nshape { Circle { r: 1.5 } }\n").unwrap();
//! assert_eq!(scene.shape, vec![Shape::Empty, Shape::Circle { r: 1.5 }]);
//! ```

use crate::{Error, Fields, Result, Value};
use serde::de::{self, DeserializeOwned, IntoDeserializer};

/// Deserializes an instance of `T` from an owned document tree.
///
/// # Errors
///
/// Returns an error when the document does not fit the shape of `T`.
pub fn from_fields<T: DeserializeOwned>(fields: Fields) -> Result<T> {
    T::deserialize(ValueDeserializer::new(Value::Object(fields)))
}

const ERROR_ENUM_OBJECT: &str = "expected an object with properties of a single variant for enum";

fn parse_scalar<T: std::str::FromStr>(value: Value, expected: &str) -> Result<T> {
    match value {
        Value::String(s) => s
            .parse()
            .map_err(|_| Error::custom(format!("invalid {expected}: {s:?}"))),
        Value::Object(_) => Err(Error::custom(format!("expected {expected}, found object"))),
    }
}

macro_rules! deserialize_parsed {
    ($($method:ident => $visit:ident($ty:ty, $expected:literal),)*) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value>
            where
                V: de::Visitor<'de>,
            {
                visitor.$visit(parse_scalar::<$ty>(self.value, $expected)?)
            }
        )*
    };
}

/// Deserializer over a single property value.
pub(crate) struct ValueDeserializer {
    value: Value,
}

impl ValueDeserializer {
    pub(crate) fn new(value: Value) -> Self {
        ValueDeserializer { value }
    }
}

impl<'de> de::Deserializer<'de> for ValueDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::String(s) => visitor.visit_string(s),
            // Untyped targets see every property, repeats included.
            Value::Object(fields) => visitor.visit_map(PropertyDeserializer::new(fields)),
        }
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::String(s) if s == "true" => visitor.visit_bool(true),
            Value::String(s) if s == "false" => visitor.visit_bool(false),
            Value::String(s) => Err(Error::custom(format!("invalid bool: {s:?}"))),
            Value::Object(_) => Err(Error::custom("expected bool, found object")),
        }
    }

    deserialize_parsed! {
        deserialize_i8 => visit_i8(i8, "integer"),
        deserialize_i16 => visit_i16(i16, "integer"),
        deserialize_i32 => visit_i32(i32, "integer"),
        deserialize_i64 => visit_i64(i64, "integer"),
        deserialize_i128 => visit_i128(i128, "integer"),
        deserialize_u8 => visit_u8(u8, "unsigned integer"),
        deserialize_u16 => visit_u16(u16, "unsigned integer"),
        deserialize_u32 => visit_u32(u32, "unsigned integer"),
        deserialize_u64 => visit_u64(u64, "unsigned integer"),
        deserialize_u128 => visit_u128(u128, "unsigned integer"),
        deserialize_f32 => visit_f32(f32, "float"),
        deserialize_f64 => visit_f64(f64, "float"),
        deserialize_char => visit_char(char, "char"),
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_string(visitor)
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::String(s) => visitor.visit_string(s),
            Value::Object(_) => Err(Error::custom("expected string, found object")),
        }
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_byte_buf(visitor)
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::String(s) => visitor.visit_byte_buf(s.into_bytes()),
            Value::Object(_) => Err(Error::custom("expected bytes, found object")),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        // A property that exists is always Some; absent ones never get here.
        visitor.visit_some(self)
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_unit()
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        // Sequences only exist as repeated properties of an object.
        Err(Error::custom("nested sequences are not supported"))
    }

    fn deserialize_tuple<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Object(fields) => visitor.visit_map(MapDeserializer::new(fields)),
            Value::String(s) => Err(Error::custom(format!("expected object, found string {s:?}"))),
        }
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_map(visitor)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::String(variant) => visitor.visit_enum(variant.into_deserializer()),
            // Repeats of the variant name carry a sequence-typed payload.
            Value::Object(fields) => {
                let mut properties = fields.into_iter();
                let Some((variant, first)) = properties.next() else {
                    return Err(Error::custom(ERROR_ENUM_OBJECT));
                };
                let mut values = vec![first];
                for (name, value) in properties {
                    if name != variant {
                        return Err(Error::custom(ERROR_ENUM_OBJECT));
                    }
                    values.push(value);
                }
                visitor.visit_enum(EnumDeserializer::new(variant, values))
            }
        }
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_string(visitor)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_unit()
    }
}

macro_rules! forward_to_last {
    ($($method:ident($($arg:ident: $ty:ty),*),)*) => {
        $(
            fn $method<V>(self, $($arg: $ty,)* visitor: V) -> Result<V::Value>
            where
                V: de::Visitor<'de>,
            {
                de::Deserializer::$method(self.last(), $($arg,)* visitor)
            }
        )*
    };
}

/// Deserializer over all the values of one property name.
///
/// Sequence targets receive every value; everything else sees the last.
struct GroupDeserializer {
    values: Vec<Value>,
}

impl GroupDeserializer {
    fn last(mut self) -> ValueDeserializer {
        ValueDeserializer::new(self.values.pop().unwrap_or_default())
    }
}

impl<'de> de::Deserializer<'de> for GroupDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        if self.values.len() > 1 {
            visitor.visit_seq(SeqDeserializer::new(self.values))
        } else {
            self.last().deserialize_any(visitor)
        }
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_seq(SeqDeserializer::new(self.values))
    }

    fn deserialize_tuple<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    forward_to_last! {
        deserialize_bool(),
        deserialize_i8(),
        deserialize_i16(),
        deserialize_i32(),
        deserialize_i64(),
        deserialize_i128(),
        deserialize_u8(),
        deserialize_u16(),
        deserialize_u32(),
        deserialize_u64(),
        deserialize_u128(),
        deserialize_f32(),
        deserialize_f64(),
        deserialize_char(),
        deserialize_str(),
        deserialize_string(),
        deserialize_bytes(),
        deserialize_byte_buf(),
        deserialize_unit(),
        deserialize_unit_struct(name: &'static str),
        deserialize_map(),
        deserialize_struct(name: &'static str, fields: &'static [&'static str]),
        deserialize_enum(name: &'static str, variants: &'static [&'static str]),
        deserialize_identifier(),
        deserialize_ignored_any(),
    }
}

struct SeqDeserializer {
    iter: std::vec::IntoIter<Value>,
}

impl SeqDeserializer {
    fn new(vec: Vec<Value>) -> Self {
        SeqDeserializer {
            iter: vec.into_iter(),
        }
    }
}

impl<'de> de::SeqAccess<'de> for SeqDeserializer {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

/// Map access over an object with repeated names grouped.
struct MapDeserializer {
    iter: indexmap::map::IntoIter<String, Vec<Value>>,
    values: Option<Vec<Value>>,
}

impl MapDeserializer {
    fn new(fields: Fields) -> Self {
        MapDeserializer {
            iter: fields.into_grouped().into_iter(),
            values: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for MapDeserializer {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((name, values)) => {
                self.values = Some(values);
                seed.deserialize(name.into_deserializer()).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.values.take() {
            Some(values) => seed.deserialize(GroupDeserializer { values }),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

/// Map access over an object that yields every property separately.
struct PropertyDeserializer {
    iter: std::vec::IntoIter<(String, Value)>,
    value: Option<Value>,
}

impl PropertyDeserializer {
    fn new(fields: Fields) -> Self {
        PropertyDeserializer {
            iter: fields.into_iter(),
            value: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for PropertyDeserializer {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((name, value)) => {
                self.value = Some(value);
                seed.deserialize(name.into_deserializer()).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct EnumDeserializer {
    variant: String,
    values: Vec<Value>,
}

impl EnumDeserializer {
    fn new(variant: String, values: Vec<Value>) -> Self {
        EnumDeserializer { variant, values }
    }
}

impl<'de> de::EnumAccess<'de> for EnumDeserializer {
    type Error = Error;
    type Variant = VariantDeserializer;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(self.variant.into_deserializer())?;
        Ok((variant, VariantDeserializer { values: self.values }))
    }
}

struct VariantDeserializer {
    values: Vec<Value>,
}

impl<'de> de::VariantAccess<'de> for VariantDeserializer {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        Ok(())
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        seed.deserialize(GroupDeserializer {
            values: self.values,
        })
    }

    fn tuple_variant<V>(self, _len: usize, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(Error::custom("tuple variants are not supported"))
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let group = GroupDeserializer {
            values: self.values,
        };
        de::Deserializer::deserialize_map(group.last(), visitor)
    }
}
