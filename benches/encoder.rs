#[macro_use]
extern crate criterion;

use criterion::{black_box, Criterion};
use phpser::prelude::*;

const N_BIG_ARR: usize = 2000;

fn big_arr() -> Value {
    let v: Vec<Value> = (0..N_BIG_ARR).map(|i| Value::from(i as i64)).collect();
    Value::from(v)
}

const N_ARR: usize = 10;
const N_MAP: usize = 10;

fn big_v() -> Value {
    let v0: Vec<Value> = (0..N_ARR).map(|i| Value::from(i as i64)).collect();
    let m = Value::map((0..N_MAP).map(|i| (format!("key{}", i), Value::from(v0.clone()))));
    Value::from(vec![m; N_ARR])
}

#[derive(PhpRecord, Clone)]
struct Address {
    pub street: String,
    pub city: String,
    #[php(omitempty)]
    pub zip: Option<u32>,
}

#[derive(PhpRecord, Clone)]
struct Customer {
    #[php(rename = "ID")]
    pub id: u64,
    pub name: String,
    #[php(string)]
    pub balance: f64,
    #[php(embed)]
    pub address: Address,
    pub tags: Vec<String>,
}

fn customers() -> Vec<Customer> {
    (0..N_BIG_ARR as u64)
        .map(|i| Customer {
            id: i,
            name: format!("customer {}", i),
            balance: i as f64 / 7.0,
            address: Address {
                street: "1 Main St".into(),
                city: "Springfield".into(),
                zip: if i % 2 == 0 { Some(12345) } else { None },
            },
            tags: vec!["a".into(), "b".into()],
        })
        .collect()
}

fn bench_construction(c: &mut Criterion) {
    c.bench_function(
        &format!("Creating a Value of encoded size {}", encode(&big_v()).unwrap().len()),
        |b| b.iter(|| black_box(big_v())),
    );
}

fn bench_enc(c: &mut Criterion) {
    let big_v = big_v();
    let enc_len = encode(&big_v).unwrap().len();
    c.bench_function(
        &format!("Encoding a Value, output size of {} bytes", enc_len),
        move |b| b.iter(|| encode(black_box(&big_v))),
    );
}

fn bench_enc_single_alloc(c: &mut Criterion) {
    let big_v = big_v();
    let enc_len = encode(&big_v).unwrap().len();
    c.bench_function(
        &format!(
            "Encoding a Value, output size of {} bytes, buffer preallocated",
            enc_len
        ),
        move |b| {
            b.iter(|| {
                let mut out = Vec::with_capacity(enc_len * 2);
                encode_into(black_box(&big_v), &mut out)
            })
        },
    );
}

fn bench_enc_flat(c: &mut Criterion) {
    let big_arr = big_arr();
    let enc_len = encode(&big_arr).unwrap().len();
    c.bench_function(
        &format!("Encoding a Value vector, output size of {} bytes", enc_len),
        move |b| b.iter(|| encode(black_box(&big_arr))),
    );
}

fn bench_enc_records(c: &mut Criterion) {
    let customers = customers();
    let enc_len = encode(&customers).unwrap().len();
    c.bench_function(
        &format!("Encoding derived records, output size of {} bytes", enc_len),
        move |b| b.iter(|| encode(black_box(&customers))),
    );
}

criterion_group!(
    benches,
    bench_construction,
    bench_enc,
    bench_enc_single_alloc,
    bench_enc_flat,
    bench_enc_records
);
criterion_main!(benches);
