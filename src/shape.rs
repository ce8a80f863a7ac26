//! Static descriptions of types, used to resolve the fields of a record once per type.
use crate::float::FloatWidth;
use std::{any::TypeId, fmt};

/// The static shape of a type, as returned by [`PhpValue::shape`](crate::PhpValue::shape).
#[derive(Clone, Copy, Debug)]
pub struct Shape {
    /// The type's name, for diagnostics.
    pub name: &'static str,
    pub kind: ShapeKind,
}

#[derive(Clone, Copy)]
pub enum ShapeKind {
    Bool,
    Int,
    Float(FloatWidth),
    Str,
    Seq,
    Map,
    Record(RecordShape),
    /// A [`PhpObject`](crate::PhpObject).
    Object,
    /// A [`Marshaler`](crate::Marshaler).
    Marshal,
    /// An indirection to the shape returned by the function.
    Pointer(fn() -> Shape),
    /// Only known at runtime, e.g. [`Value`](crate::Value).
    Dynamic,
    Unsupported,
}

use ShapeKind::*;

impl fmt::Debug for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Bool => f.write_str("Bool"),
            Int => f.write_str("Int"),
            Float(w) => write!(f, "Float({:?})", w),
            Str => f.write_str("Str"),
            Seq => f.write_str("Seq"),
            Map => f.write_str("Map"),
            Record(r) => write!(f, "Record({})", r.name),
            Object => f.write_str("Object"),
            Marshal => f.write_str("Marshal"),
            Pointer(inner) => write!(f, "Pointer({})", inner().name),
            Dynamic => f.write_str("Dynamic"),
            Unsupported => f.write_str("Unsupported"),
        }
    }
}

impl Shape {
    pub const fn new(name: &'static str, kind: ShapeKind) -> Shape { Shape { name, kind } }

    pub const fn dynamic(name: &'static str) -> Shape { Shape::new(name, Dynamic) }

    pub const fn record(rec: RecordShape) -> Shape { Shape::new(rec.name, Record(rec)) }

    /// Follows `Pointer` shapes down to the first non-pointer.
    pub fn strip_indirection(self) -> Shape {
        let mut shape = self;
        while let Pointer(inner) = shape.kind {
            shape = inner();
        }
        shape
    }

    /// The record shape, if this is a record after stripping indirections.
    pub fn as_record(self) -> Option<RecordShape> {
        match self.strip_indirection().kind {
            Record(rec) => Some(rec),
            _ => None,
        }
    }

    /// Whether the zero value of this shape counts as empty for `omitempty`. Only
    /// records don't.
    pub fn zero_is_empty(self) -> bool { !matches!(self.kind, Record(_) | Unsupported) }

    /// Whether a value of this shape is written as a single scalar token, which is
    /// what the `string` field option applies to.
    pub fn is_scalar(self) -> bool {
        matches!(
            self.strip_indirection().kind,
            Bool | Int | Float(_) | Str | Dynamic
        )
    }
}

/// The static description of a record type: an identity and its declared fields.
#[derive(Clone, Copy, Debug)]
pub struct RecordShape {
    pub id: TypeId,
    pub name: &'static str,
    pub fields: &'static [FieldDesc],
}

impl RecordShape {
    /// # Example
    ///
    /// ```
    /// use phpser::{FieldDesc, RecordShape};
    ///
    /// struct Empty;
    /// let shape = RecordShape::of::<Empty>("Empty", &[]);
    /// assert_eq!(shape.name, "Empty");
    /// ```
    pub fn of<T: ?Sized + 'static>(name: &'static str, fields: &'static [FieldDesc]) -> Self {
        RecordShape {
            id: TypeId::of::<T>(),
            name,
            fields,
        }
    }
}

/// One declared field of a record.
#[derive(Clone, Copy)]
pub struct FieldDesc {
    /// The declared name.
    pub name: &'static str,
    /// `(key, value)` annotation pairs, e.g. `("php", "id,omitempty")`.
    pub tags: &'static [(&'static str, &'static str)],
    /// Only exported fields are encoded, unless they embed a record.
    pub exported: bool,
    /// An embedded field promotes the fields of its record into the parent.
    pub embedded: bool,
    pub shape: fn() -> Shape,
}

impl FieldDesc {
    /// The annotation stored under `key`, if any.
    pub fn tag(&self, key: &str) -> Option<&'static str> {
        self.tags.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }
}

impl fmt::Debug for FieldDesc {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("FieldDesc")
            .field("name", &self.name)
            .field("tags", &self.tags)
            .field("exported", &self.exported)
            .field("embedded", &self.embedded)
            .field("shape", &(self.shape)())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int() -> Shape { Shape::new("i32", Int) }
    fn ptr_int() -> Shape { Shape::new("Box<i32>", Pointer(int)) }

    #[test]
    fn strips_every_layer() {
        let shape = Shape::new("Option<Box<i32>>", Pointer(ptr_int));
        assert!(matches!(shape.strip_indirection().kind, Int));
        assert!(shape.is_scalar());
        assert!(shape.as_record().is_none());
    }

    #[test]
    fn zero_emptiness() {
        assert!(int().zero_is_empty());
        assert!(ptr_int().zero_is_empty());
        let rec = RecordShape::of::<u8>("Unit", &[]);
        assert!(!Shape::record(rec).zero_is_empty());
    }

    #[test]
    fn tag_lookup() {
        const FIELD: FieldDesc = FieldDesc {
            name: "id",
            tags: &[("serde", "ident"), ("php", "uid,omitempty")],
            exported: true,
            embedded: false,
            shape: int,
        };
        assert_eq!(FIELD.tag("php"), Some("uid,omitempty"));
        assert_eq!(FIELD.tag("serde"), Some("ident"));
        assert_eq!(FIELD.tag("json"), None);
    }
}
