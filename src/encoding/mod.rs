//! # PHP serialization encoder
//!
//! Encode functions for the PHP `serialize()` format.
//!
//! # Example
//!
//! ```
//! use phpser::prelude::*;
//!
//! // a struct that will store some data
//! #[derive(PhpRecord)]
//! struct SomeData {
//!     #[php(rename = "x")]
//!     pub x: usize,
//!     #[php(rename = "y", omitempty)]
//!     pub y: i32,
//! }
//!
//! // here it is storing some data
//! let some_data = SomeData { x: 1, y: 0 };
//!
//! // and we've encoded it
//! let enc_full = encode(&some_data).unwrap();
//! assert_eq!(enc_full, br#"a:1:{s:1:"x";i:1;}"#);
//!
//! // let's encode it a different way too
//!
//! // create a buffer
//! let mut out = Vec::new();
//!
//! // and we've encoded it a different way
//! encode_into(&some_data, &mut out).unwrap();
//!
//! // but they are equivalent
//! assert_eq!(out, enc_full);
//! ```

use crate::{errors::Error, rep::PhpValue};
use std::{io, mem, sync::Arc};

mod constants;
mod dispatch;
pub mod fields;
pub mod pool;
mod record;
pub mod ser;

pub use fields::{cached_fields, type_fields, FieldPlan, PRIMARY_TAG_KEY, SECONDARY_TAG_KEY};
pub use ser::*;

use dispatch::encode_value;
use pool::POOL;

/// Encodes a value into a new vector of bytes.
///
/// # Arguments
///
/// * `t: &T` - A reference to the value to be encoded.
///
/// # Example
///
/// ```
/// use phpser::encode;
///
/// assert_eq!(encode(&vec![7, 8, 9]).unwrap(), b"a:3:{i:0;i:7;i:1;i:8;i:2;i:9;}");
/// assert!(encode(&()).is_err());
/// ```
pub fn encode<T: PhpValue + ?Sized>(t: &T) -> Result<Vec<u8>, Error> {
    let mut w = POOL.rent();
    encode_value(&mut w, &t)?;
    Ok(w.as_bytes().to_vec())
}

/// Encodes a value, appending the output to `out`.
///
/// On error `out` is left as it was.
///
/// # Arguments
///
/// * `t: &T` - A reference to the value to be encoded.
/// * `out: &mut Vec<u8>` - A mutable reference to the vector where the encoder output
///   will be stored.
///
/// # Example
///
/// ```
/// use phpser::encode_into;
///
/// let mut out = b"prefix ".to_vec();
/// encode_into("Hello world", &mut out).unwrap();
/// assert_eq!(out, br#"prefix s:11:"Hello world";"#);
///
/// assert!(encode_into(&vec![()], &mut out).is_err());
/// assert_eq!(out, br#"prefix s:11:"Hello world";"#);
/// ```
pub fn encode_into<T: PhpValue + ?Sized>(t: &T, out: &mut Vec<u8>) -> Result<(), Error> {
    let start = out.len();
    let mut w = Writer::from(mem::take(out));
    let res = encode_value(&mut w, &t);
    if res.is_err() {
        w.truncate(start);
    }
    *out = w.into_inner();
    res
}

/// The cached field plan of `T`, if `T` is a record type (possibly behind pointers).
///
/// # Example
///
/// ```
/// use phpser::prelude::*;
///
/// #[derive(PhpRecord)]
/// struct Pair {
///     pub left: u8,
///     #[php(rename = "R")]
///     pub right: u8,
/// }
///
/// let plan = phpser::cached_fields_of::<Box<Pair>>().unwrap();
/// assert_eq!(plan[1].name(), "R");
/// assert!(phpser::cached_fields_of::<String>().is_none());
/// ```
pub fn cached_fields_of<T: PhpValue>() -> Option<Arc<[FieldPlan]>> {
    T::shape().as_record().map(|rec| cached_fields(&rec))
}

/// Encodes values into an [`io::Write`] sink.
///
/// Each value is fully encoded before anything is written, so a value that fails to
/// encode leaves the sink untouched.
///
/// # Example
///
/// ```
/// use phpser::Encoder;
///
/// let mut enc = Encoder::new(Vec::new());
/// enc.encode(&5).unwrap();
/// enc.encode(&true).unwrap();
/// assert_eq!(enc.into_inner(), b"i:5;b:1;");
/// ```
#[derive(Debug)]
pub struct Encoder<W: io::Write> {
    sink: W,
}

impl<W: io::Write> Encoder<W> {
    pub fn new(sink: W) -> Self { Encoder { sink } }

    /// Encodes `t`, then writes and flushes it to the sink.
    pub fn encode<T: PhpValue + ?Sized>(&mut self, t: &T) -> Result<(), Error> {
        let mut w = POOL.rent();
        encode_value(&mut w, &t)?;
        self.sink.write_all(w.as_bytes())?;
        self.sink.flush()?;
        Ok(())
    }

    pub fn get_ref(&self) -> &W { &self.sink }

    pub fn get_mut(&mut self) -> &mut W { &mut self.sink }

    pub fn into_inner(self) -> W { self.sink }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Inum, Value};

    struct FailingSink;

    impl io::Write for FailingSink {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> { Ok(()) }
    }

    #[test]
    fn encode_matches_encode_into() {
        let v = Value::Array(vec![Value::from(1), Value::from("two"), Value::Null]);
        let mut out = Vec::new();
        encode_into(&v, &mut out).unwrap();
        assert_eq!(encode(&v).unwrap(), out);
        assert_eq!(out, br#"a:3:{i:0;i:1;i:1;s:3:"two";i:2;N;}"#);
    }

    #[test]
    fn unsized_values() {
        assert_eq!(encode("x").unwrap(), br#"s:1:"x";"#);
        let mut out = Vec::new();
        encode_into("y", &mut out).unwrap();
        assert_eq!(out, br#"s:1:"y";"#);
    }

    #[test]
    fn failed_encode_writes_nothing() {
        let mut enc = Encoder::new(Vec::new());
        enc.encode(&Value::Int(Inum::from(1))).unwrap();
        assert!(enc.encode(&vec![(), ()]).is_err());
        assert_eq!(enc.get_ref(), b"i:1;");
    }

    #[test]
    fn sink_errors_are_io_errors() {
        let mut enc = Encoder::new(FailingSink);
        match enc.encode(&1) {
            Err(Error::Io(e)) => assert_eq!(e.to_string(), "closed"),
            other => panic!("unexpected {:?}", other),
        }
    }
}
