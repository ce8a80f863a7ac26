use half::f16;
use std::fmt;

/// A float, stored as its bit pattern so that [`Value`](crate::Value) can be `Eq`,
/// `Ord` and `Hash`.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Debug)]
pub enum Float {
    Half(u16),
    Single(u32),
    Double(u64),
}

/// The declared width of a float. The encoder writes the shortest text that reads
/// back to the same value *at this width*.
#[derive(Eq, PartialEq, Clone, Copy, Hash, Debug)]
pub enum FloatWidth {
    Half,
    Single,
    Double,
}

use Float::*;

impl Float {
    /// The declared width.
    pub fn width(&self) -> FloatWidth {
        match self {
            Half(_) => FloatWidth::Half,
            Single(_) => FloatWidth::Single,
            Double(_) => FloatWidth::Double,
        }
    }

    /// Widens to `f64`. Lossless for every variant.
    pub fn to_f64(&self) -> f64 {
        match self {
            Half(n) => f16::from_bits(*n).to_f64(),
            Single(n) => f32::from_bits(*n) as f64,
            Double(n) => f64::from_bits(*n),
        }
    }
}

impl From<f16> for Float {
    fn from(f: f16) -> Float { Half(f.to_bits()) }
}

impl From<f32> for Float {
    fn from(f: f32) -> Float { Single(f.to_bits()) }
}

impl From<f64> for Float {
    fn from(f: f64) -> Float { Double(f.to_bits()) }
}

impl fmt::Display for Float {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Half(n) => write!(f, "{}", f16::from_bits(*n)),
            Single(n) => write!(f, "{}", f32::from_bits(*n)),
            Double(n) => write!(f, "{}", f64::from_bits(*n)),
        }
    }
}
