//! # phpser
//!
//! An encoder for the PHP `serialize()` format: a length-prefixed, type-tagged textual
//! encoding that PHP (and anything that reads its sessions and caches) understands.
//!
//! # Usage
//!
//! The trait [`PhpValue`] is used to specify how data is presented to the encoder.
//!
//! It is implemented for the primitive types, strings, the standard collections and
//! [`Value`]. For structs it can usually be auto-derived, and then they're ready for
//! serialization.
//!
//! For example:
//!
//! ```
//! use phpser::prelude::*;
//!
//! #[derive(PhpRecord)]
//! /// A user, as some PHP application expects to find it in its session.
//! struct User {
//!     #[php(rename = "id")]
//!     pub id: u64,
//!     #[php(rename = "name")]
//!     pub name: String,
//!     #[php(rename = "email", omitempty)]
//!     pub email: Option<String>,
//! }
//!
//! let user = User {
//!     id: 7,
//!     name: "Björk".to_string(),
//!     email: None,
//! };
//!
//! let encoded = encode(&user).unwrap();
//!
//! assert_eq!(encoded, r#"a:2:{s:2:"id";i:7;s:4:"name";s:6:"Björk";}"#.as_bytes());
//! ```
//!
//! # An overview of the encoded types
//!
//! ## Scalars
//!
//! | Value                                  | Encoded as                            |
//! | ---                                    | ---                                   |
//! | `None`, [`Value::Null`]                | `N;`                                  |
//! | `bool`                                 | `b:0;` or `b:1;`                      |
//! | every integer type, [`BigInt`], [`Inum`] | `i:<decimal>;`                      |
//! | `f16`, `f32`, `f64`, [`Float`]         | `d:<shortest decimal>;`               |
//! | `str`, `String`, [`Bytes`]             | `s:<length in bytes>:"<bytes>";`      |
//!
//! Integers are never truncated. Floats are written in fixed notation, with the fewest
//! digits that read back to the same value at their own width; non-finite floats are
//! written `NAN`, `INF` and `-INF`. Strings are not escaped: the length prefix alone
//! delimits them.
//!
//! ```
//! use phpser::prelude::*;
//!
//! assert_eq!(encode(&5).unwrap(), b"i:5;");
//! assert_eq!(encode(&5.6).unwrap(), b"d:5.6;");
//! assert_eq!(encode("Hello world").unwrap(), br#"s:11:"Hello world";"#);
//! assert_eq!(encode(&f16::from_f32(0.5)).unwrap(), b"d:0.5;");
//! ```
//!
//! ## Arrays
//!
//! Sequences (`Vec`, `VecDeque`, arrays, [`Value::Array`]) are written as arrays keyed
//! by position:
//!
//! ```
//! use phpser::prelude::*;
//!
//! assert_eq!(encode(&vec![7, 8, 9]).unwrap(), b"a:3:{i:0;i:7;i:1;i:8;i:2;i:9;}");
//! ```
//!
//! Maps (`HashMap`, `BTreeMap`, [`Value::Map`]) are written in their own iteration
//! order. Keys must be null, numbers or strings.
//!
//! ```
//! use phpser::prelude::*;
//! use std::collections::BTreeMap;
//!
//! let mut m = BTreeMap::new();
//! m.insert("a", 1);
//! m.insert("b", 2);
//!
//! assert_eq!(encode(&m).unwrap(), br#"a:2:{s:1:"a";i:1;s:1:"b";i:2;}"#);
//! ```
//!
//! ## Records
//!
//! A struct deriving [`PhpRecord`] is written as an array of its public fields, keyed by
//! name. Field attributes:
//!
//! | Attribute                     | Meaning                                            |
//! | ---                           | ---                                                |
//! | `#[php(rename = "n")]`        | write the field under the name `n`                 |
//! | `#[php(omitempty)]`           | skip the field when it is null, zero or empty     |
//! | `#[php(string)]`              | write a scalar as a string of its text            |
//! | `#[php(skip)]`                | never write the field                              |
//! | `#[php(embed)]`               | promote the fields of an embedded record          |
//!
//! Without a `php` attribute, `#[serde(rename, skip, skip_serializing,
//! skip_serializing_if, flatten)]` are honoured the same way.
//!
//! Promoted fields lose to fields of the same name closer to the root. Between fields of
//! one name at the same depth, a sole renamed field wins; otherwise none is written.
//!
//! ## Objects
//!
//! [`PhpObject`] names its variables, which are written like an array:
//!
//! ```
//! use phpser::prelude::*;
//!
//! let obj = PhpObject::new("Point", vec![1, 2]);
//! assert_eq!(encode(&obj).unwrap(), br#"O:5:"Point":2:{i:0;i:1;i:1;i:2;}"#);
//! ```
//!
//! A type that knows its own encoding can implement [`Marshaler`]; its bytes are written
//! as they are.
//!
//! # Grammar
//!
//! ```text
//! value  = "N;"
//!        | "b:" ("0" | "1") ";"
//!        | "i:" int ";"
//!        | "d:" decimal ";"
//!        | "s:" bytelen ":" '"' bytes '"' ";"
//!        | "a:" count ":{" (key value)* "}"
//!        | "O:" namelen ':"' name '":' count ":{" (key value)* "}"
//! key    = "i:" int ";" | "d:" decimal ";" | "s:" bytelen ":" '"' bytes '"' ";"
//! ```
//!
//! `count` is always the number of `key value` pairs that follow.

#![warn(
    deprecated_in_future,
    unsafe_code,
    unused_labels,
    keyword_idents,
    missing_debug_implementations,
    macro_use_extern_crate,
    unreachable_pub,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces
)]
#![allow(clippy::cast_lossless)]

extern crate self as phpser;

/// Procedural macro for autoderiving [`PhpValue`] and [`Record`] on structs.
pub use phpser_derive::PhpRecord;

pub mod encoding;
pub mod errors;
pub mod float;
pub mod inum;
#[cfg(feature = "json")] pub mod json;
pub mod object;
pub mod prelude;
pub mod rep;
pub mod shape;
mod util;

pub use bytes::Bytes;
pub use encoding::{cached_fields_of, encode, encode_into, Encoder};
pub use errors::{Error, TypeError};
pub use float::{Float, FloatWidth};
pub use inum::Inum;
pub use num_bigint::BigInt;
pub use object::{PhpObject, RawToken};
pub use rep::{Kind, Mapping, Marshaler, PhpValue, Record, Sequence};
pub use shape::{FieldDesc, RecordShape, Shape, ShapeKind};

use half::f16;

/// A dynamically typed value.
///
/// # Example
///
/// ```
/// use phpser::prelude::*;
///
/// let v = Value::Map(vec![
///     (Value::from("list"), Value::from(vec![1, 2])),
///     (Value::from(3), Value::Null),
/// ]);
///
/// assert_eq!(
///     encode(&v).unwrap(),
///     br#"a:2:{s:4:"list";a:2:{i:0;i:1;i:1;i:2;}i:3;N;}"#
/// );
/// ```
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Hash, Debug)]
pub enum Value {
    /// Null. Corresponds to [`None`].
    Null,
    Bool(bool),
    Int(Inum),
    Float(Float),
    /// A string. PHP strings are bytes, so this need not be UTF-8.
    Str(Bytes),
    /// Written with the keys `0..len`.
    Array(Vec<Value>),
    /// Entries in the order they are written. Duplicate keys are not merged.
    Map(Vec<(Value, Value)>),
    Object(Box<PhpObject<Value>>),
    /// Pre-encoded bytes.
    Raw(RawToken),
}

impl Value {
    /// Is this [`Value::Null`]?
    pub fn is_null(&self) -> bool { matches!(self, Value::Null) }

    /// Builds a [`Value::Map`] from its entries.
    ///
    /// # Example
    ///
    /// ```
    /// use phpser::Value;
    ///
    /// let m = Value::map(vec![("a", 1), ("b", 2)]);
    /// assert_eq!(phpser::encode(&m).unwrap().len(), 30);
    /// ```
    pub fn map<I, K, V>(entries: I) -> Value
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Value>,
        V: Into<Value>,
    {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Builds a [`Value::Object`].
    pub fn object<S: Into<String>>(name: S, vars: Value) -> Value {
        Value::Object(Box::new(PhpObject::new(name, vars)))
    }
}

impl PhpValue for Value {
    fn kind(&self) -> Kind<'_> {
        match self {
            Value::Null => Kind::Null,
            Value::Bool(b) => Kind::Bool(*b),
            Value::Int(Inum::I64(i)) => Kind::Int(*i as i128),
            Value::Int(Inum::Int(i)) => Kind::BigInt(i),
            Value::Float(f) => Kind::Float(f.to_f64(), f.width()),
            Value::Str(s) => Kind::Str(&s[..]),
            Value::Array(a) => Kind::Seq(a),
            Value::Map(m) => Kind::Map(m),
            Value::Object(o) => (**o).kind(),
            Value::Raw(r) => Kind::Marshal(r),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Value { Value::Str(Bytes::copy_from_slice(s.as_bytes())) }
}

impl From<String> for Value {
    fn from(s: String) -> Value { Value::Str(Bytes::from(s)) }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Value { Value::Array(v.into_iter().map(T::into).collect()) }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(o: Option<T>) -> Value { o.map_or(Value::Null, T::into) }
}

impl From<PhpObject<Value>> for Value {
    fn from(o: PhpObject<Value>) -> Value { Value::Object(Box::new(o)) }
}

from_fn!(Value, bool, Value::Bool);
from_fn!(Value, Inum, Value::Int);
from_fn!(Value, Float, Value::Float);
from_fn!(Value, Bytes, Value::Str);
from_fn!(Value, RawToken, Value::Raw);

// Integers
compose_from!(Value, Inum, BigInt);
compose_from!(Value, Inum, isize);
compose_from!(Value, Inum, usize);
compose_from!(Value, Inum, i64);
compose_from!(Value, Inum, u64);
compose_from!(Value, Inum, i128);
compose_from!(Value, Inum, u128);
from_prims!(Value);

// Floats
compose_from!(Value, Float, f32);
compose_from!(Value, Float, f64);
compose_from!(Value, Float, f16);
