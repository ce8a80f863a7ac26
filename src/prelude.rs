pub use crate::{
    encoding::{encode, encode_into, Encoder},
    errors::{Error, TypeError},
    float::Float,
    inum::Inum,
    object::{PhpObject, RawToken},
    php_marshaler,
    rep::*,
    PhpRecord, Value,
};
pub use bytes::Bytes;
pub use half::f16;
pub use num_bigint::BigInt;
