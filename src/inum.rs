use num_bigint::BigInt;
use num_traits::{ToPrimitive, Zero};
use std::{convert::TryFrom, fmt};

use crate::{from_as, from_fn};

/// `Inum`s are either `i64` or `BigInt`s (i.e., big integers).
///
/// Anything that fits in an `i64` is stored as [`Inum::I64`]; the encoder writes both
/// variants as the same `i:<digits>;` token.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Hash, Debug)]
pub enum Inum {
    I64(i64),
    Int(BigInt),
}

use Inum::*;

from_fn!(Inum, i64, I64);
from_fn!(Inum, u64, |u: u64| {
    i64::try_from(u).map_or_else(|_| Int(BigInt::from(u)), I64)
});
from_fn!(Inum, i128, |i: i128| {
    i64::try_from(i).map_or_else(|_| Int(BigInt::from(i)), I64)
});
from_fn!(Inum, u128, |u: u128| {
    i64::try_from(u).map_or_else(|_| Int(BigInt::from(u)), I64)
});
from_fn!(Inum, BigInt, |i: BigInt| {
    match i.to_i64() {
        Some(small) => I64(small),
        None => Int(i),
    }
});
from_as!(Inum, usize, u64);
from_as!(Inum, isize, i64);

impl From<Inum> for BigInt {
    fn from(i: Inum) -> BigInt {
        match i {
            I64(i) => BigInt::from(i),
            Int(i) => i,
        }
    }
}

impl TryFrom<Inum> for i64 {
    type Error = BigInt;

    fn try_from(i: Inum) -> Result<Self, BigInt> {
        match i {
            I64(i) => Ok(i),
            Int(i) => Err(i),
        }
    }
}

impl PartialEq<i64> for Inum {
    fn eq(&self, other: &i64) -> bool {
        match self {
            I64(i) => i.eq(other),
            Int(i) => i.eq(&BigInt::from(*other)),
        }
    }
}

impl Inum {
    /// Whether the number is zero; `omitempty` fields skip zeros.
    pub fn is_zero(&self) -> bool {
        match self {
            I64(i) => *i == 0,
            Int(i) => i.is_zero(),
        }
    }

    /// Produces an `i64` if `self` is an `I64`, otherwise returns `None`.
    pub fn to_i64(&self) -> Option<i64> {
        match self {
            I64(i) => Some(*i),
            _ => None,
        }
    }
}

impl fmt::Display for Inum {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            I64(i) => write!(f, "{}", i),
            Int(i) => write!(f, "{}", i),
        }
    }
}

#[macro_export]
#[doc(hidden)]
macro_rules! from_prims {
    ($to:tt) => {
        from_as!($to, i32, i64);
        from_as!($to, i16, i64);
        from_as!($to, i8, i64);

        from_as!($to, u32, i64);
        from_as!($to, u16, i64);
        from_as!($to, u8, i64);
    };
}

from_prims!(Inum);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_values_stay_small() {
        assert_eq!(Inum::from(7u8), I64(7));
        assert_eq!(Inum::from(-7i128), I64(-7));
        assert_eq!(Inum::from(BigInt::from(12)), I64(12));
    }

    #[test]
    fn large_values_widen() {
        let big = Inum::from(u64::max_value());
        assert_eq!(big, Int(BigInt::from(u64::max_value())));
        assert_eq!(big.to_string(), "18446744073709551615");
        assert!(Inum::from(i128::min_value()).to_i64().is_none());
    }

    #[test]
    fn zero() {
        assert!(Inum::from(0).is_zero());
        assert!(Int(BigInt::from(0)).is_zero());
        assert!(!Inum::from(1).is_zero());
    }
}
