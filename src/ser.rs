//! Yocton serialization.
//!
//! Rust values are first converted into [`Fields`] and then written out.
//! Every scalar becomes a string value, structs and maps become nested
//! objects, and sequences become repeated properties sharing the field's
//! name.
//!
//! ```rust
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Server {
//!     host: String,
//!     port: u16,
//!     alias: Vec<String>,
//!     tls: Option<bool>,
//! }
//!
//! let server = Server {
//!     host: "example.org".into(),
//!     port: 443,
//!     alias: vec!["www".into(), "web 1".into()],
//!     tls: None,
//! };
//! assert_eq!(
//!     yocton::to_string(&server).unwrap(),
//!     "host: example.org\nport: 443\nalias: www\nalias: \"web 1\"\n"
//! );
//! ```
//!
//! Nested sequences have no Yocton representation and are rejected, as is
//! any top-level value that is not a struct or a map.

use crate::{Error, Fields, Result, Value};
use serde::{ser, Serialize};

/// Converts a struct or map into an owned document tree.
///
/// # Errors
///
/// Fails when the top-level value is not a struct or map, when a map key is
/// not a string, or when a sequence is nested directly in another sequence.
pub fn to_fields<T>(value: &T) -> Result<Fields>
where
    T: ?Sized + Serialize,
{
    match value.serialize(NodeSerializer)? {
        Node::Object(fields) => Ok(fields),
        _ => Err(Error::custom("top-level value must be a struct or map")),
    }
}

/// Intermediate form of a serialized value, before it is given a name.
enum Node {
    Absent,
    Scalar(String),
    Object(Fields),
    List(Vec<Node>),
}

fn insert_node(fields: &mut Fields, name: &str, node: Node) -> Result<()> {
    match node {
        Node::Absent => {}
        Node::Scalar(s) => fields.push(name, Value::String(s)),
        Node::Object(object) => fields.push(name, Value::Object(object)),
        Node::List(items) => {
            for item in items {
                if matches!(item, Node::List(_)) {
                    return Err(Error::custom("nested sequences are not supported"));
                }
                insert_node(fields, name, item)?;
            }
        }
    }
    Ok(())
}

fn to_node<T>(value: &T) -> Result<Node>
where
    T: ?Sized + Serialize,
{
    value.serialize(NodeSerializer)
}

struct NodeSerializer;

impl ser::Serializer for NodeSerializer {
    type Ok = Node;
    type Error = Error;

    type SerializeSeq = ListSerializer;
    type SerializeTuple = ListSerializer;
    type SerializeTupleStruct = ListSerializer;
    type SerializeTupleVariant = ser::Impossible<Node, Error>;
    type SerializeMap = ObjectSerializer;
    type SerializeStruct = ObjectSerializer;
    type SerializeStructVariant = ObjectSerializer;

    fn serialize_bool(self, v: bool) -> Result<Node> {
        Ok(Node::Scalar(v.to_string()))
    }

    fn serialize_i8(self, v: i8) -> Result<Node> {
        Ok(Node::Scalar(v.to_string()))
    }

    fn serialize_i16(self, v: i16) -> Result<Node> {
        Ok(Node::Scalar(v.to_string()))
    }

    fn serialize_i32(self, v: i32) -> Result<Node> {
        Ok(Node::Scalar(v.to_string()))
    }

    fn serialize_i64(self, v: i64) -> Result<Node> {
        Ok(Node::Scalar(v.to_string()))
    }

    fn serialize_i128(self, v: i128) -> Result<Node> {
        Ok(Node::Scalar(v.to_string()))
    }

    fn serialize_u8(self, v: u8) -> Result<Node> {
        Ok(Node::Scalar(v.to_string()))
    }

    fn serialize_u16(self, v: u16) -> Result<Node> {
        Ok(Node::Scalar(v.to_string()))
    }

    fn serialize_u32(self, v: u32) -> Result<Node> {
        Ok(Node::Scalar(v.to_string()))
    }

    fn serialize_u64(self, v: u64) -> Result<Node> {
        Ok(Node::Scalar(v.to_string()))
    }

    fn serialize_u128(self, v: u128) -> Result<Node> {
        Ok(Node::Scalar(v.to_string()))
    }

    fn serialize_f32(self, v: f32) -> Result<Node> {
        Ok(Node::Scalar(v.to_string()))
    }

    fn serialize_f64(self, v: f64) -> Result<Node> {
        Ok(Node::Scalar(v.to_string()))
    }

    fn serialize_char(self, v: char) -> Result<Node> {
        Ok(Node::Scalar(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Node> {
        Ok(Node::Scalar(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Node> {
        Ok(Node::Scalar(String::from_utf8_lossy(v).into_owned()))
    }

    fn serialize_none(self) -> Result<Node> {
        Ok(Node::Absent)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Node>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Node> {
        Ok(Node::Absent)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Node> {
        Ok(Node::Absent)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Node> {
        Ok(Node::Scalar(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Node>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Node>
    where
        T: ?Sized + Serialize,
    {
        let mut fields = Fields::with_capacity(1);
        insert_node(&mut fields, variant, to_node(value)?)?;
        // An empty object would not say which variant it was.
        if fields.is_empty() {
            return Err(Error::custom(format!(
                "variant {variant} has no value to write"
            )));
        }
        Ok(Node::Object(fields))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<ListSerializer> {
        Ok(ListSerializer::new(len.unwrap_or(0)))
    }

    fn serialize_tuple(self, len: usize) -> Result<ListSerializer> {
        Ok(ListSerializer::new(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<ListSerializer> {
        Ok(ListSerializer::new(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(Error::custom("tuple variants are not supported"))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<ObjectSerializer> {
        Ok(ObjectSerializer::new(None))
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<ObjectSerializer> {
        Ok(ObjectSerializer::new(None))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<ObjectSerializer> {
        Ok(ObjectSerializer::new(Some(variant)))
    }
}

struct ListSerializer {
    items: Vec<Node>,
}

impl ListSerializer {
    fn new(capacity: usize) -> Self {
        ListSerializer {
            items: Vec::with_capacity(capacity),
        }
    }

    fn push<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.items.push(to_node(value)?);
        Ok(())
    }
}

impl ser::SerializeSeq for ListSerializer {
    type Ok = Node;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Node> {
        Ok(Node::List(self.items))
    }
}

impl ser::SerializeTuple for ListSerializer {
    type Ok = Node;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Node> {
        Ok(Node::List(self.items))
    }
}

impl ser::SerializeTupleStruct for ListSerializer {
    type Ok = Node;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Node> {
        Ok(Node::List(self.items))
    }
}

struct ObjectSerializer {
    fields: Fields,
    current_key: Option<String>,
    // Set for struct variants, which are wrapped in an object named after the variant.
    variant: Option<&'static str>,
}

impl ObjectSerializer {
    fn new(variant: Option<&'static str>) -> Self {
        ObjectSerializer {
            fields: Fields::new(),
            current_key: None,
            variant,
        }
    }

    fn finish(self) -> Node {
        match self.variant {
            Some(variant) => {
                let mut outer = Fields::with_capacity(1);
                outer.push(variant, Value::Object(self.fields));
                Node::Object(outer)
            }
            None => Node::Object(self.fields),
        }
    }
}

impl ser::SerializeMap for ObjectSerializer {
    type Ok = Node;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        match to_node(key)? {
            Node::Scalar(s) => {
                self.current_key = Some(s);
                Ok(())
            }
            _ => Err(Error::custom("map keys must be strings")),
        }
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        insert_node(&mut self.fields, &key, to_node(value)?)
    }

    fn end(self) -> Result<Node> {
        Ok(self.finish())
    }
}

impl ser::SerializeStruct for ObjectSerializer {
    type Ok = Node;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        insert_node(&mut self.fields, key, to_node(value)?)
    }

    fn end(self) -> Result<Node> {
        Ok(self.finish())
    }
}

impl ser::SerializeStructVariant for ObjectSerializer {
    type Ok = Node;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        insert_node(&mut self.fields, key, to_node(value)?)
    }

    fn end(self) -> Result<Node> {
        Ok(self.finish())
    }
}
