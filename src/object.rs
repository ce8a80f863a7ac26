use crate::{rep::*, shape::*};
use bytes::Bytes;

/// A named PHP object, written as `O:<len>:"<name>":<count>:{...}`.
///
/// `vars` must encode to a counted block: a record, a map or a sequence.
///
/// # Example
///
/// ```
/// use phpser::PhpObject;
/// use std::collections::BTreeMap;
///
/// let mut vars = BTreeMap::new();
/// vars.insert("id", 3);
///
/// let user = PhpObject::new("User", vars);
/// assert_eq!(phpser::encode(&user).unwrap(), br#"O:4:"User":1:{s:2:"id";i:3;}"#);
/// ```
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Hash, Debug, Default)]
pub struct PhpObject<T> {
    pub name: String,
    pub vars: T,
}

impl<T> PhpObject<T> {
    pub fn new<S: Into<String>>(name: S, vars: T) -> Self {
        PhpObject {
            name: name.into(),
            vars,
        }
    }
}

impl<T: PhpValue> PhpValue for PhpObject<T> {
    fn kind(&self) -> Kind<'_> {
        Kind::Object {
            name: &self.name,
            vars: &self.vars,
        }
    }

    fn shape() -> Shape { Shape::new("PhpObject", ShapeKind::Object) }
}

/// An already serialized token, written out unchanged.
///
/// Nothing checks that the bytes are well formed.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Hash, Debug, Default)]
pub struct RawToken(pub Bytes);

impl RawToken {
    pub fn new<B: Into<Bytes>>(b: B) -> Self { RawToken(b.into()) }
}

impl Marshaler for RawToken {
    fn marshal_php(&self) -> Result<Vec<u8>, failure::Error> { Ok(self.0.to_vec()) }
}

crate::php_marshaler!(RawToken);
