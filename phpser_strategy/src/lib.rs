use bytes::Bytes;
use half::f16;
use num_bigint::BigInt;
use num_traits::Num;
use phpser::{PhpObject, RawToken, Value};
use proptest::prelude::*;

/// arbitrary Integer wider than 64 bits for use with proptest
pub fn arb_bigint() -> impl Strategy<Value = BigInt> {
    "-?1[0-1]{64,100}".prop_map(|n| -> BigInt { BigInt::from_str_radix(&n, 2).unwrap() })
}

/// arbitrary Bytes for use with proptest
pub fn arb_bs() -> impl Strategy<Value = Bytes> {
    prop_oneof![
        ".*".prop_map(Bytes::from),
        prop::collection::vec(any::<u8>(), 0..32).prop_map(Bytes::from),
    ]
}

/// arbitrary PHP class name for use with proptest
pub fn arb_class_name() -> impl Strategy<Value = String> { "[A-Z][A-Za-z0-9_]{0,15}" }

/// arbitrary value that can appear as a map key
pub fn arb_key() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<i64>().prop_map(Value::from),
        any::<u64>().prop_map(Value::from),
        any::<f64>().prop_map(Value::from),
        arb_bs().prop_map(Value::from),
    ]
}

/// arbitrary scalar [`Value`] for use with proptest
pub fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<String>().prop_map(Value::from),
        // integers
        any::<u8>().prop_map(Value::from),
        any::<i8>().prop_map(Value::from),
        any::<u16>().prop_map(Value::from),
        any::<i16>().prop_map(Value::from),
        any::<u32>().prop_map(Value::from),
        any::<i32>().prop_map(Value::from),
        any::<u64>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        any::<u128>().prop_map(Value::from),
        any::<i128>().prop_map(Value::from),
        arb_bigint().prop_map(Value::from),
        // floats
        any::<u16>().prop_map(|n| Value::from(f16::from_bits(n))),
        any::<f32>().prop_map(Value::from),
        any::<f64>().prop_map(Value::from),
        // bytestrings
        arb_bs().prop_map(Value::from),
        // pre-encoded
        any::<i64>().prop_map(|i| Value::Raw(RawToken::new(format!("i:{};", i)))),
    ]
}

/// arbitrary [`Value`] for use with proptest
pub fn arb_value() -> impl Strategy<Value = Value> {
    arb_scalar().prop_recursive(
        8,  // max depth
        64, // max nodes
        10, // max items per collection
        |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..10).prop_map(Value::Array),
                prop::collection::vec((arb_key(), inner.clone()), 0..10).prop_map(Value::Map),
                (arb_class_name(), prop::collection::vec((arb_bs(), inner), 0..6)).prop_map(
                    |(name, vars)| {
                        let vars = vars.into_iter().map(|(k, v)| (Value::Str(k), v)).collect();
                        Value::Object(Box::new(PhpObject::new(name, Value::Map(vars))))
                    }
                ),
            ]
        },
    )
}
