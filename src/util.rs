use crate::float::FloatWidth;
use half::f16;
use smallvec::SmallVec;
use std::fmt::{self, Write};

/// Decimal digits of an integer, sign first. Every `i128` and `u128` fits inline.
pub(crate) type Digits = SmallVec<[u8; 64]>;

/// Decimal text of a float. Spills to the heap only for very large or very small
/// magnitudes, since fixed notation has no exponent.
pub(crate) type FloatText = SmallVec<[u8; 32]>;

/// Converts a `u128` to its decimal digits, most significant first.
pub(crate) fn u128_to_digits(mut num: u128) -> Digits {
    let mut out = Digits::new();
    loop {
        out.push(b'0' + (num % 10) as u8);
        num /= 10;
        if num == 0 {
            break;
        }
    }
    out.reverse();
    out
}

/// Converts an `i128` to its decimal digits, with a leading `-` when negative.
pub(crate) fn i128_to_digits(num: i128) -> Digits {
    let mut out = u128_to_digits(num.unsigned_abs());
    if num < 0 {
        out.insert(0, b'-');
    }
    out
}

struct TextSink<'a>(&'a mut FloatText);

impl Write for TextSink<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.extend_from_slice(s.as_bytes());
        Ok(())
    }
}

/// Shortest decimal text that reads back to the same float at `width`, in fixed
/// notation. Non-finite values use the spellings PHP itself writes.
pub(crate) fn float_digits(f: f64, width: FloatWidth) -> FloatText {
    let mut out = FloatText::new();
    if f.is_nan() {
        out.extend_from_slice(b"NAN");
    } else if f.is_infinite() {
        out.extend_from_slice(if f > 0.0 { &b"INF"[..] } else { &b"-INF"[..] });
    } else {
        let mut sink = TextSink(&mut out);
        // `TextSink` never fails
        let _ = match width {
            FloatWidth::Double => write!(sink, "{}", f),
            FloatWidth::Single => write!(sink, "{}", f as f32),
            FloatWidth::Half => write!(sink, "{}", shortest_half(f)),
        };
    }
    out
}

/// The decimal with the fewest significant digits that rounds to the same `f16` as `f`.
fn shortest_half(f: f64) -> f64 {
    let bits = f16::from_f64(f).to_bits();
    let mut text = FloatText::new();
    // five significant digits tell every half apart
    for precision in 0..5 {
        text.clear();
        let _ = write!(TextSink(&mut text), "{:.*e}", precision, f);
        let short = std::str::from_utf8(&text)
            .ok()
            .and_then(|t| t.parse::<f64>().ok());
        if let Some(short) = short {
            if f16::from_f64(short).to_bits() == bits {
                return short;
            }
        }
    }
    f
}

#[macro_export]
#[doc(hidden)]
/// Helper macro to compose `From` implementations.
macro_rules! compose_from {
    ($to:tt, $mid:tt, $from:ty) => {
        impl From<$from> for $to {
            fn from(f: $from) -> Self { Self::from($mid::from(f)) }
        }
    };
}

#[macro_export]
#[doc(hidden)]
/// Helper macro to make implementing `From` easier.
macro_rules! from_fn {
    ($to:ty, $from:ty, $fn:expr) => {
        impl From<$from> for $to {
            fn from(f: $from) -> $to { $fn(f) }
        }
    };
}

#[macro_export]
#[doc(hidden)]
/// Helper macro to make implementing `From` easier.
macro_rules! from_as {
    ($to:tt, $from:ty, $as:ty) => {
        impl From<$from> for $to {
            fn from(f: $from) -> $to { $to::from(f as $as) }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits() {
        assert_eq!(&u128_to_digits(0)[..], b"0");
        assert_eq!(&u128_to_digits(1200)[..], b"1200");
        assert_eq!(&i128_to_digits(-45)[..], b"-45");
        assert_eq!(
            &u128_to_digits(u128::max_value())[..],
            u128::max_value().to_string().as_bytes()
        );
        assert_eq!(
            &i128_to_digits(i128::min_value())[..],
            i128::min_value().to_string().as_bytes()
        );
    }

    #[test]
    fn floats_use_fixed_notation() {
        assert_eq!(&float_digits(5.6, FloatWidth::Double)[..], b"5.6");
        assert_eq!(&float_digits(1.0, FloatWidth::Double)[..], b"1");
        assert_eq!(&float_digits(1e21, FloatWidth::Double)[..], b"1000000000000000000000");
        assert_eq!(&float_digits(1e-7, FloatWidth::Double)[..], b"0.0000001");
    }

    #[test]
    fn floats_respect_width() {
        // 0.1f32 widened to f64 is not 0.1, but it is the shortest f32
        assert_eq!(&float_digits(0.1f32 as f64, FloatWidth::Single)[..], b"0.1");
        assert_eq!(
            &float_digits(0.1f32 as f64, FloatWidth::Double)[..],
            b"0.10000000149011612"
        );
    }

    #[test]
    fn halves_are_shortest_at_half_width() {
        let half = |x: f32| float_digits(f16::from_f32(x).to_f64(), FloatWidth::Half);
        assert_eq!(&half(0.1)[..], b"0.1");
        assert_eq!(&half(0.5)[..], b"0.5");
        assert_eq!(&half(-2.0)[..], b"-2");
        assert_eq!(&half(1.0 / 3.0)[..], b"0.3333");
        assert_eq!(&half(65504.0)[..], b"65500");
        for bits in (0..0x7c00u16).step_by(7) {
            let h = f16::from_bits(bits);
            let text = float_digits(h.to_f64(), FloatWidth::Half);
            let back: f64 = std::str::from_utf8(&text).unwrap().parse().unwrap();
            assert_eq!(f16::from_f64(back), h);
        }
    }

    #[test]
    fn non_finite() {
        assert_eq!(&float_digits(std::f64::NAN, FloatWidth::Double)[..], b"NAN");
        assert_eq!(&float_digits(std::f64::INFINITY, FloatWidth::Single)[..], b"INF");
        assert_eq!(&float_digits(std::f64::NEG_INFINITY, FloatWidth::Double)[..], b"-INF");
    }
}
