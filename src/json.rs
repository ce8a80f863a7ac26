//! [`PhpValue`] for [`serde_json::Value`], so parsed JSON can be re-encoded for PHP.
//!
//! Numbers are written as integers when they fit in an `i64` or `u64`, and as floats
//! otherwise. Objects are written in the map's iteration order.
//!
//! ```
//! let v: serde_json::Value = serde_json::from_str(r#"{"a":[1,2.5,null]}"#).unwrap();
//! assert_eq!(
//!     phpser::encode(&v).unwrap(),
//!     br#"a:1:{s:1:"a";a:3:{i:0;i:1;i:1;d:2.5;i:2;N;}}"#
//! );
//! ```

use crate::{
    errors::Error,
    float::FloatWidth,
    rep::{Kind, Mapping, PhpValue},
    shape::{Shape, ShapeKind},
};
use serde_json::{Map, Number, Value};

fn number_kind(n: &Number) -> Kind<'_> {
    if let Some(i) = n.as_i64() {
        Kind::Int(i as i128)
    } else if let Some(u) = n.as_u64() {
        Kind::Uint(u as u128)
    } else {
        Kind::Float(n.as_f64().unwrap_or(f64::NAN), FloatWidth::Double)
    }
}

impl PhpValue for Number {
    fn kind(&self) -> Kind<'_> { number_kind(self) }
}

impl PhpValue for Value {
    fn kind(&self) -> Kind<'_> {
        match self {
            Value::Null => Kind::Null,
            Value::Bool(b) => Kind::Bool(*b),
            Value::Number(n) => number_kind(n),
            Value::String(s) => Kind::Str(s.as_bytes()),
            Value::Array(a) => Kind::Seq(a),
            Value::Object(m) => Kind::Map(m),
        }
    }
}

impl Mapping for Map<String, Value> {
    fn len(&self) -> usize { Map::len(self) }

    fn for_each_entry(
        &self,
        f: &mut dyn FnMut(&dyn PhpValue, &dyn PhpValue) -> Result<(), Error>,
    ) -> Result<(), Error> {
        self.iter().try_for_each(|(k, v)| f(k, v))
    }
}

impl PhpValue for Map<String, Value> {
    fn kind(&self) -> Kind<'_> { Kind::Map(self) }

    fn shape() -> Shape { Shape::new("Map<String, Value>", ShapeKind::Map) }
}
