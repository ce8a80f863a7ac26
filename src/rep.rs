use crate::{errors::Error, float::FloatWidth, shape::*};
use bytes::Bytes;
use half::f16;
use num_bigint::BigInt;
use num_traits::Zero;
use std::{
    any::type_name,
    borrow::Cow,
    collections::{BTreeMap, HashMap, VecDeque},
    fmt,
    hash::BuildHasher,
    rc::Rc,
    sync::Arc,
};

/// A value that can be written in the PHP serialization format.
///
/// Implemented for the primitive types, strings, the standard containers, the
/// indirections (`Option`, `Box`, `Rc`, `Arc`) and [`Value`](crate::Value). Record types
/// get an implementation from `#[derive(PhpRecord)]`.
pub trait PhpValue {
    /// Classifies the value for the encoder.
    ///
    /// # Example
    ///
    /// ```
    /// use phpser::{Kind, PhpValue};
    ///
    /// assert!(matches!(5u8.kind(), Kind::Uint(5)));
    /// assert!(matches!(None::<u8>.kind(), Kind::Null));
    /// ```
    fn kind(&self) -> Kind<'_>;

    /// The static shape of the type. Record fields are planned from it.
    fn shape() -> Shape
    where
        Self: Sized,
    {
        Shape::dynamic(type_name::<Self>())
    }

    /// The text written in place of the value by the `string` field option, for types
    /// with a textual form of their own. `None` writes the value's usual text.
    ///
    /// # Example
    ///
    /// ```
    /// use phpser::prelude::*;
    ///
    /// struct Level(u8);
    ///
    /// impl PhpValue for Level {
    ///     fn kind(&self) -> Kind<'_> { Kind::Uint(self.0.into()) }
    ///
    ///     fn display_text(&self) -> Option<String> {
    ///         Some(if self.0 == 0 { "debug" } else { "info" }.to_string())
    ///     }
    /// }
    ///
    /// #[derive(PhpRecord)]
    /// struct Config {
    ///     #[php(string)]
    ///     pub level: Level,
    ///     pub retries: Level,
    /// }
    ///
    /// let c = Config { level: Level(1), retries: Level(0) };
    /// assert_eq!(
    ///     encode(&c).unwrap(),
    ///     br#"a:2:{s:5:"level";s:4:"info";s:7:"retries";i:0;}"#
    /// );
    /// ```
    fn display_text(&self) -> Option<String> { None }
}

/// What the encoder sees when it looks at a value.
#[derive(Clone, Copy)]
pub enum Kind<'a> {
    Null,
    Bool(bool),
    Int(i128),
    Uint(u128),
    BigInt(&'a BigInt),
    /// The value widened to `f64`, and the width it should be printed at.
    Float(f64, FloatWidth),
    Str(&'a [u8]),
    Seq(&'a dyn Sequence),
    Map(&'a dyn Mapping),
    Record(&'a dyn Record),
    /// A named object whose variables are `vars`.
    Object {
        name: &'a str,
        vars: &'a dyn PhpValue,
    },
    /// Writes its own bytes.
    Marshal(&'a dyn Marshaler),
    /// A layer of indirection; the encoder looks through it.
    Indirect(&'a dyn PhpValue),
    /// Cannot be encoded; carries a description for the error.
    Unsupported(&'static str),
}

use Kind::*;

impl<'a> Kind<'a> {
    /// Whether an `omitempty` field holding this value is skipped.
    ///
    /// A present indirection is never empty, even if what it points at is.
    pub fn is_empty_value(&self) -> bool {
        match *self {
            Null => true,
            Bool(b) => !b,
            Int(i) => i == 0,
            Uint(u) => u == 0,
            BigInt(b) => b.is_zero(),
            Float(f, _) => f == 0.0,
            Str(s) => s.is_empty(),
            Seq(s) => s.is_empty(),
            Map(m) => m.is_empty(),
            Record(_) | Object { .. } | Marshal(_) | Indirect(_) | Unsupported(_) => false,
        }
    }
}

impl fmt::Display for Kind<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Null => f.write_str("null"),
            Bool(b) => write!(f, "bool {}", b),
            Int(i) => write!(f, "int {}", i),
            Uint(u) => write!(f, "int {}", u),
            BigInt(i) => write!(f, "int {}", i),
            Float(x, _) => write!(f, "float {}", x),
            Str(s) => write!(f, "string {:?}", String::from_utf8_lossy(s)),
            Seq(s) => write!(f, "sequence of {}", s.len()),
            Map(m) => write!(f, "map of {}", m.len()),
            Record(r) => write!(f, "record {}", r.record_shape().name),
            Object { name, .. } => write!(f, "object {}", name),
            Marshal(_) => f.write_str("marshaler"),
            Indirect(_) => f.write_str("pointer"),
            Unsupported(what) => f.write_str(what),
        }
    }
}

impl fmt::Debug for Kind<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "Kind({})", self) }
}

/// An ordered collection, written as an array keyed `0..len`.
pub trait Sequence {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool { self.len() == 0 }

    /// Calls `f` on every element in order, stopping at the first error.
    fn for_each_element(
        &self,
        f: &mut dyn FnMut(&dyn PhpValue) -> Result<(), Error>,
    ) -> Result<(), Error>;
}

/// An associative collection, written as an array of its entries in iteration order.
pub trait Mapping {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool { self.len() == 0 }

    /// Calls `f` on every `(key, value)` entry, stopping at the first error.
    fn for_each_entry(
        &self,
        f: &mut dyn FnMut(&dyn PhpValue, &dyn PhpValue) -> Result<(), Error>,
    ) -> Result<(), Error>;
}

/// A value with named fields, usually implemented with `#[derive(PhpRecord)]`.
pub trait Record {
    fn record_shape(&self) -> RecordShape;

    /// The field at `index` in `record_shape().fields`.
    fn field(&self, index: usize) -> Option<&dyn PhpValue>;
}

/// A value that produces its own serialized bytes. They are written verbatim.
pub trait Marshaler {
    fn marshal_php(&self) -> Result<Vec<u8>, failure::Error>;
}

/// Implements [`PhpValue`] for a type that implements [`Marshaler`].
///
/// # Example
///
/// ```
/// use phpser::{php_marshaler, Marshaler};
///
/// struct Version;
///
/// impl Marshaler for Version {
///     fn marshal_php(&self) -> Result<Vec<u8>, failure::Error> { Ok(b"i:3;".to_vec()) }
/// }
///
/// php_marshaler!(Version);
///
/// assert_eq!(phpser::encode(&vec![Version]).unwrap(), b"a:1:{i:0;i:3;}");
/// ```
#[macro_export]
macro_rules! php_marshaler {
    ($t:ty) => {
        impl $crate::PhpValue for $t {
            fn kind(&self) -> $crate::Kind<'_> { $crate::Kind::Marshal(self) }

            fn shape() -> $crate::Shape {
                $crate::Shape::new(stringify!($t), $crate::ShapeKind::Marshal)
            }
        }
    };
}

macro_rules! scalar_value {
    ($shape:expr, $($t:ty => |$v:ident| $kind:expr),* $(,)?) => {
        $(
            impl PhpValue for $t {
                fn kind(&self) -> Kind<'_> {
                    let $v = *self;
                    $kind
                }

                fn shape() -> Shape { Shape::new(stringify!($t), $shape) }
            }
        )*
    };
}

scalar_value!(ShapeKind::Bool, bool => |b| Bool(b));
scalar_value!(
    ShapeKind::Int,
    i8 => |i| Int(i as i128),
    i16 => |i| Int(i as i128),
    i32 => |i| Int(i as i128),
    i64 => |i| Int(i as i128),
    i128 => |i| Int(i),
    isize => |i| Int(i as i128),
    u8 => |u| Uint(u as u128),
    u16 => |u| Uint(u as u128),
    u32 => |u| Uint(u as u128),
    u64 => |u| Uint(u as u128),
    u128 => |u| Uint(u),
    usize => |u| Uint(u as u128),
);
scalar_value!(ShapeKind::Float(FloatWidth::Half), f16 => |f| Float(f.to_f64(), FloatWidth::Half));
scalar_value!(ShapeKind::Float(FloatWidth::Single), f32 => |f| Float(f as f64, FloatWidth::Single));
scalar_value!(ShapeKind::Float(FloatWidth::Double), f64 => |f| Float(f, FloatWidth::Double));

impl PhpValue for BigInt {
    fn kind(&self) -> Kind<'_> { Kind::BigInt(self) }

    fn shape() -> Shape { Shape::new("BigInt", ShapeKind::Int) }
}

impl PhpValue for str {
    fn kind(&self) -> Kind<'_> { Str(self.as_bytes()) }
}

impl PhpValue for String {
    fn kind(&self) -> Kind<'_> { Str(self.as_bytes()) }

    fn shape() -> Shape { Shape::new("String", ShapeKind::Str) }
}

impl PhpValue for Bytes {
    fn kind(&self) -> Kind<'_> { Str(&self[..]) }

    fn shape() -> Shape { Shape::new("Bytes", ShapeKind::Str) }
}

impl PhpValue for () {
    fn kind(&self) -> Kind<'_> { Unsupported("()") }

    fn shape() -> Shape { Shape::new("()", ShapeKind::Unsupported) }
}

impl<T: PhpValue + ?Sized> PhpValue for &T {
    fn kind(&self) -> Kind<'_> { (**self).kind() }

    fn display_text(&self) -> Option<String> { (**self).display_text() }
}

impl<T: PhpValue + ToOwned + ?Sized> PhpValue for Cow<'_, T> {
    fn kind(&self) -> Kind<'_> { (**self).kind() }

    fn display_text(&self) -> Option<String> { (**self).display_text() }
}

impl<T: PhpValue> PhpValue for Option<T> {
    fn kind(&self) -> Kind<'_> {
        match self {
            Some(x) => Indirect(x),
            None => Null,
        }
    }

    fn shape() -> Shape { Shape::new(type_name::<Self>(), ShapeKind::Pointer(T::shape)) }
}

macro_rules! pointer_value {
    ($($ptr:ident),*) => {
        $(
            impl<T: PhpValue> PhpValue for $ptr<T> {
                fn kind(&self) -> Kind<'_> { Indirect(&**self) }

                fn shape() -> Shape {
                    Shape::new(type_name::<Self>(), ShapeKind::Pointer(T::shape))
                }
            }
        )*
    };
}

pointer_value!(Box, Rc, Arc);

macro_rules! seq_value {
    ($($t:ty => [$($gen:tt)*]),*) => {
        $(
            impl<T: PhpValue, $($gen)*> Sequence for $t {
                fn len(&self) -> usize { <[T]>::len(&self[..]) }

                fn for_each_element(
                    &self,
                    f: &mut dyn FnMut(&dyn PhpValue) -> Result<(), Error>,
                ) -> Result<(), Error> {
                    self.iter().try_for_each(|x| f(x))
                }
            }

            impl<T: PhpValue, $($gen)*> PhpValue for $t {
                fn kind(&self) -> Kind<'_> { Seq(self) }

                fn shape() -> Shape { Shape::new(type_name::<Self>(), ShapeKind::Seq) }
            }
        )*
    };
}

seq_value!(Vec<T> => [], [T; N] => [const N: usize]);

impl<T: PhpValue> Sequence for VecDeque<T> {
    fn len(&self) -> usize { VecDeque::len(self) }

    fn for_each_element(
        &self,
        f: &mut dyn FnMut(&dyn PhpValue) -> Result<(), Error>,
    ) -> Result<(), Error> {
        self.iter().try_for_each(|x| f(x))
    }
}

impl<T: PhpValue> PhpValue for VecDeque<T> {
    fn kind(&self) -> Kind<'_> { Seq(self) }

    fn shape() -> Shape { Shape::new(type_name::<Self>(), ShapeKind::Seq) }
}

macro_rules! map_value {
    ($($t:ty => [$($gen:tt)*]),*) => {
        $(
            impl<K: PhpValue, V: PhpValue, $($gen)*> Mapping for $t {
                fn len(&self) -> usize { self.len() }

                fn for_each_entry(
                    &self,
                    f: &mut dyn FnMut(&dyn PhpValue, &dyn PhpValue) -> Result<(), Error>,
                ) -> Result<(), Error> {
                    self.iter().try_for_each(|(k, v)| f(k, v))
                }
            }

            impl<K: PhpValue, V: PhpValue, $($gen)*> PhpValue for $t {
                fn kind(&self) -> Kind<'_> { Map(self) }

                fn shape() -> Shape { Shape::new(type_name::<Self>(), ShapeKind::Map) }
            }
        )*
    };
}

map_value!(
    HashMap<K, V, S> => [S: BuildHasher],
    hashbrown::HashMap<K, V, S> => [S: BuildHasher],
    BTreeMap<K, V> => []
);

/// Association lists, e.g. the entries of [`Value::Map`](crate::Value::Map). Duplicate
/// keys are written as they are.
impl<K: PhpValue, V: PhpValue> Mapping for Vec<(K, V)> {
    fn len(&self) -> usize { Vec::len(self) }

    fn for_each_entry(
        &self,
        f: &mut dyn FnMut(&dyn PhpValue, &dyn PhpValue) -> Result<(), Error>,
    ) -> Result<(), Error> {
        self.iter().try_for_each(|(k, v)| f(k, v))
    }
}
