use super::constants::*;
use crate::{float::FloatWidth, util::*};
use num_bigint::BigInt;
use std::fmt::{self, Write};

/// A byte sink the encoder writes into.
pub trait Serializer {
    /// The type of the output value.
    type Out;
    /// Add a byte to the output value.
    fn put_u8(&mut self, u: u8);
    /// Add a slice to the output value.
    fn put_slice(&mut self, slice: &[u8]);
    /// Return the output value.
    fn finalize(self) -> Self::Out;
}

/// The primitive tokens of the format, for any [`Serializer`].
pub trait SerializerExt: Serializer {
    /// Add `N;` to the output value.
    fn put_null(&mut self);
    /// Add a [`bool`] to the output value.
    ///
    /// # Arguments
    ///
    /// * `b: bool` - The value to be added.
    fn put_bool(&mut self, b: bool);
    /// Add an [`i128`] to the output value. Every narrower signed integer widens to it.
    ///
    /// # Arguments
    ///
    /// * `i: i128`  - The value to be added.
    fn put_i128(&mut self, i: i128);
    /// Add a [`u128`] to the output value.
    ///
    /// # Arguments
    ///
    /// * `u: u128`  - The value to be added.
    fn put_u128(&mut self, u: u128);
    /// Add a [`BigInt`] to the output value.
    ///
    /// # Arguments
    ///
    /// * `i: &BigInt` - The value to be added.
    fn put_bigint(&mut self, i: &BigInt);
    /// Add a float to the output value, in the shortest text that reads back to `f` at
    /// `width`.
    ///
    /// # Arguments
    ///
    /// * `f: f64` - The value to be added.
    /// * `width: FloatWidth` - The width `f` was declared at.
    fn put_float(&mut self, f: f64, width: FloatWidth);
    /// Add a length-prefixed string to the output value. The bytes are not escaped.
    ///
    /// # Arguments
    ///
    /// * `b: &[u8]` - The value to be added.
    fn put_bytes(&mut self, b: &[u8]);
    /// Opens a counted block, `<tag>:<len>:{`.
    fn put_block_header(&mut self, tag: u8, len: usize);
    /// Closes a counted block.
    fn put_block_end(&mut self);
}

impl Serializer for Vec<u8> {
    type Out = Self;

    fn put_u8(&mut self, u: u8) { self.push(u) }

    fn put_slice(&mut self, slice: &[u8]) { self.extend_from_slice(slice) }

    fn finalize(self) -> Self::Out { self }
}

struct DigitSink<'a, S: ?Sized>(&'a mut S);

impl<S: Serializer + ?Sized> Write for DigitSink<'_, S> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.put_slice(s.as_bytes());
        Ok(())
    }
}

impl<S: Serializer> SerializerExt for S {
    fn put_null(&mut self) { self.put_slice(NULL) }

    fn put_bool(&mut self, b: bool) {
        if b {
            self.put_slice(TRUE)
        } else {
            self.put_slice(FALSE)
        }
    }

    #[inline]
    fn put_i128(&mut self, i: i128) {
        self.put_slice(TYPE_INT);
        self.put_slice(&i128_to_digits(i));
        self.put_u8(TERMINATOR);
    }

    #[inline]
    fn put_u128(&mut self, u: u128) {
        self.put_slice(TYPE_INT);
        self.put_slice(&u128_to_digits(u));
        self.put_u8(TERMINATOR);
    }

    fn put_bigint(&mut self, i: &BigInt) {
        self.put_slice(TYPE_INT);
        // `DigitSink` never fails
        let _ = write!(DigitSink(&mut *self), "{}", i);
        self.put_u8(TERMINATOR);
    }

    fn put_float(&mut self, f: f64, width: FloatWidth) {
        self.put_slice(TYPE_FLOAT);
        self.put_slice(&float_digits(f, width));
        self.put_u8(TERMINATOR);
    }

    fn put_bytes(&mut self, b: &[u8]) {
        self.put_slice(TYPE_STR);
        self.put_slice(&u128_to_digits(b.len() as u128));
        self.put_u8(SEP);
        self.put_u8(QUOTE);
        self.put_slice(b);
        self.put_u8(QUOTE);
        self.put_u8(TERMINATOR);
    }

    fn put_block_header(&mut self, tag: u8, len: usize) {
        self.put_u8(tag);
        self.put_u8(SEP);
        self.put_slice(&u128_to_digits(len as u128));
        self.put_u8(SEP);
        self.put_u8(BLOCK_OPEN);
    }

    fn put_block_end(&mut self) { self.put_u8(BLOCK_CLOSE) }
}

/// The append-only buffer an encode writes into.
///
/// # Example
///
/// ```
/// use phpser::encoding::{SerializerExt, Writer};
///
/// let mut w = Writer::new();
/// w.put_bytes(b"hi");
/// assert_eq!(w.as_bytes(), br#"s:2:"hi";"#);
/// ```
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    pub fn new() -> Self { Writer { buf: Vec::new() } }

    pub fn with_capacity(cap: usize) -> Self {
        Writer {
            buf: Vec::with_capacity(cap),
        }
    }

    pub fn len(&self) -> usize { self.buf.len() }

    pub fn is_empty(&self) -> bool { self.buf.is_empty() }

    pub fn capacity(&self) -> usize { self.buf.capacity() }

    pub fn as_bytes(&self) -> &[u8] { &self.buf }

    /// Empties the buffer, keeping its allocation.
    pub fn clear(&mut self) { self.buf.clear() }

    pub fn into_inner(self) -> Vec<u8> { self.buf }

    pub(crate) fn truncate(&mut self, len: usize) { self.buf.truncate(len) }

    /// The byte at `at`, if anything has been written there.
    pub(crate) fn byte_at(&self, at: usize) -> Option<u8> { self.buf.get(at).copied() }

    /// Overwrites one already written byte.
    pub(crate) fn replace_at(&mut self, at: usize, byte: u8) {
        if let Some(b) = self.buf.get_mut(at) {
            *b = byte;
        }
    }
}

impl From<Vec<u8>> for Writer {
    fn from(buf: Vec<u8>) -> Self { Writer { buf } }
}

impl Serializer for Writer {
    type Out = Vec<u8>;

    fn put_u8(&mut self, u: u8) { self.buf.push(u) }

    fn put_slice(&mut self, slice: &[u8]) { self.buf.extend_from_slice(slice) }

    fn finalize(self) -> Self::Out { self.buf }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with<F: FnOnce(&mut Writer)>(f: F) -> Vec<u8> {
        let mut w = Writer::new();
        f(&mut w);
        w.finalize()
    }

    #[test]
    fn scalars() {
        assert_eq!(with(|w| w.put_null()), b"N;");
        assert_eq!(with(|w| w.put_bool(true)), b"b:1;");
        assert_eq!(with(|w| w.put_bool(false)), b"b:0;");
        assert_eq!(with(|w| w.put_i128(-12)), b"i:-12;");
        assert_eq!(with(|w| w.put_u128(0)), b"i:0;");
        assert_eq!(
            with(|w| w.put_bigint(&(BigInt::from(u128::max_value()) * 10))),
            b"i:3402823669209384634633746074317682114550;"
        );
    }

    #[test]
    fn floats() {
        assert_eq!(with(|w| w.put_float(5.6, FloatWidth::Double)), b"d:5.6;");
        assert_eq!(with(|w| w.put_float(1.0, FloatWidth::Double)), b"d:1;");
        assert_eq!(with(|w| w.put_float(-0.5, FloatWidth::Single)), b"d:-0.5;");
    }

    #[test]
    fn text_is_raw_and_counted_in_bytes() {
        assert_eq!(
            with(|w| w.put_bytes(b"Hello world")),
            br#"s:11:"Hello world";"#.to_vec()
        );
        assert_eq!(
            with(|w| w.put_bytes("Björk".as_bytes())),
            "s:6:\"Björk\";".as_bytes()
        );
        assert_eq!(with(|w| w.put_bytes(b"a\"b")), br#"s:3:"a"b";"#.to_vec());
        assert_eq!(with(|w| w.put_bytes(b"")), br#"s:0:"";"#.to_vec());
    }

    #[test]
    fn blocks() {
        let out = with(|w| {
            w.put_block_header(TAG_ARRAY, 12);
            w.put_block_end();
        });
        assert_eq!(out, b"a:12:{}");
    }

    #[test]
    fn replace_in_bounds_only() {
        let mut w = Writer::from(b"ab".to_vec());
        w.replace_at(1, b'c');
        w.replace_at(7, b'd');
        assert_eq!(w.as_bytes(), b"ac");
        assert_eq!(w.byte_at(0), Some(b'a'));
        assert_eq!(w.byte_at(2), None);
    }
}
