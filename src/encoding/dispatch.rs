use super::{
    constants::*,
    record::{encode_record, encode_zero_record},
    ser::*,
};
use crate::{
    errors::{Error, TypeError},
    rep::{Kind::*, *},
    shape::{Shape, ShapeKind},
    util::*,
};

/// Writes one value. Record fields are written through one of these, picked once per
/// field from its shape.
pub(crate) type ValueEncoder = fn(&mut Writer, &dyn PhpValue) -> Result<(), Error>;

/// Writes `v` in full, looking through every indirection.
pub(crate) fn encode_value(w: &mut Writer, v: &dyn PhpValue) -> Result<(), Error> {
    encode_kind(w, v.kind())
}

/// Follows `Indirect` until something else turns up.
pub(crate) fn resolve(mut kind: Kind<'_>) -> Kind<'_> {
    while let Indirect(inner) = kind {
        kind = inner.kind();
    }
    kind
}

fn encode_kind(w: &mut Writer, kind: Kind<'_>) -> Result<(), Error> {
    match resolve(kind) {
        Marshal(m) => {
            let raw = m.marshal_php().map_err(Error::Marshal)?;
            w.put_slice(&raw);
        }
        Null => w.put_null(),
        Bool(b) => w.put_bool(b),
        Int(i) => w.put_i128(i),
        Uint(u) => w.put_u128(u),
        BigInt(i) => w.put_bigint(i),
        Float(f, width) => w.put_float(f, width),
        Str(s) => w.put_bytes(s),
        Seq(s) => encode_seq(w, s)?,
        Map(m) => encode_map(w, m)?,
        Record(r) => encode_record(w, r)?,
        Object { name, vars } => encode_object(w, name, vars)?,
        other @ Indirect(_) | other @ Unsupported(_) => {
            return Err(TypeError::value(other).into())
        }
    }
    Ok(())
}

fn encode_seq(w: &mut Writer, seq: &dyn Sequence) -> Result<(), Error> {
    let len = seq.len();
    w.put_block_header(TAG_ARRAY, len);
    let mut index = 0usize;
    seq.for_each_element(&mut |el| {
        w.put_u128(index as u128);
        index += 1;
        encode_value(w, el)
    })?;
    debug_assert_eq!(index, len, "sequence yielded a different number of elements than its len");
    w.put_block_end();
    Ok(())
}

fn encode_map(w: &mut Writer, map: &dyn Mapping) -> Result<(), Error> {
    w.put_block_header(TAG_ARRAY, map.len());
    map.for_each_entry(&mut |k, v| {
        encode_key(w, k)?;
        encode_value(w, v)
    })?;
    w.put_block_end();
    Ok(())
}

/// Map keys are restricted to scalars; a null key becomes the empty string.
fn encode_key(w: &mut Writer, k: &dyn PhpValue) -> Result<(), Error> {
    match resolve(k.kind()) {
        Null => w.put_slice(EMPTY_KEY),
        Int(i) => w.put_i128(i),
        Uint(u) => w.put_u128(u),
        BigInt(i) => w.put_bigint(i),
        Float(f, width) => w.put_float(f, width),
        Str(s) => w.put_bytes(s),
        other => return Err(TypeError::key(other).into()),
    }
    Ok(())
}

/// `O:<len>:"<name>":<count>:{...}`, made by writing the variables' own `a:` block and
/// swapping its tag for the closing quote of the name.
pub(crate) fn encode_object(
    w: &mut Writer,
    name: &str,
    vars: &dyn PhpValue,
) -> Result<(), Error> {
    w.put_u8(TAG_OBJECT);
    w.put_u8(SEP);
    w.put_slice(&u128_to_digits(name.len() as u128));
    w.put_u8(SEP);
    w.put_u8(QUOTE);
    w.put_slice(name.as_bytes());
    let at = w.len();
    encode_value(w, vars)?;
    if w.byte_at(at) != Some(TAG_ARRAY) {
        return Err(TypeError::value(format_args!(
            "{} as the variables of object {}",
            resolve(vars.kind()),
            name
        ))
        .into());
    }
    w.replace_at(at, QUOTE);
    Ok(())
}

/// The `string` field option: scalars are written as a text token of their usual text,
/// or of their own [`PhpValue::display_text`].
pub(crate) fn encode_as_text(w: &mut Writer, v: &dyn PhpValue) -> Result<(), Error> {
    let mut v = v;
    let kind = loop {
        if let Some(text) = v.display_text() {
            w.put_bytes(text.as_bytes());
            return Ok(());
        }
        match v.kind() {
            Indirect(inner) => v = inner,
            kind => break kind,
        }
    };
    match kind {
        Bool(b) => w.put_bytes(if b { TEXT_TRUE } else { TEXT_FALSE }),
        Int(i) => w.put_bytes(&i128_to_digits(i)),
        Uint(u) => w.put_bytes(&u128_to_digits(u)),
        BigInt(i) => w.put_bytes(i.to_string().as_bytes()),
        Float(f, width) => w.put_bytes(&float_digits(f, width)),
        other => return encode_kind(w, other),
    }
    Ok(())
}

/// Writes the zero value of `shape`. Fields promoted through an absent embedded record
/// hold these.
pub(crate) fn encode_zero(w: &mut Writer, shape: Shape, as_text: bool) -> Result<(), Error> {
    match shape.kind {
        ShapeKind::Bool if as_text => w.put_bytes(TEXT_FALSE),
        ShapeKind::Bool => w.put_bool(false),
        ShapeKind::Int | ShapeKind::Float(_) if as_text => w.put_bytes(b"0"),
        ShapeKind::Int => w.put_i128(0),
        ShapeKind::Float(width) => w.put_float(0.0, width),
        ShapeKind::Str => w.put_bytes(b""),
        ShapeKind::Seq | ShapeKind::Map => {
            w.put_block_header(TAG_ARRAY, 0);
            w.put_block_end();
        }
        ShapeKind::Record(rec) => encode_zero_record(w, &rec)?,
        ShapeKind::Object | ShapeKind::Marshal | ShapeKind::Pointer(_) | ShapeKind::Dynamic => {
            w.put_null()
        }
        ShapeKind::Unsupported => return Err(TypeError::value(shape.name).into()),
    }
    Ok(())
}

pub(crate) fn encode_marshaled(w: &mut Writer, v: &dyn PhpValue) -> Result<(), Error> {
    match v.kind() {
        Marshal(m) => {
            let raw = m.marshal_php().map_err(Error::Marshal)?;
            w.put_slice(&raw);
            Ok(())
        }
        other => encode_kind(w, other),
    }
}

pub(crate) fn encode_object_value(w: &mut Writer, v: &dyn PhpValue) -> Result<(), Error> {
    match resolve(v.kind()) {
        Object { name, vars } => encode_object(w, name, vars),
        other => encode_kind(w, other),
    }
}

pub(crate) fn encode_record_value(w: &mut Writer, v: &dyn PhpValue) -> Result<(), Error> {
    match resolve(v.kind()) {
        Record(r) => encode_record(w, r),
        other => encode_kind(w, other),
    }
}

pub(crate) fn encode_seq_value(w: &mut Writer, v: &dyn PhpValue) -> Result<(), Error> {
    match resolve(v.kind()) {
        Seq(s) => encode_seq(w, s),
        other => encode_kind(w, other),
    }
}

pub(crate) fn encode_map_value(w: &mut Writer, v: &dyn PhpValue) -> Result<(), Error> {
    match resolve(v.kind()) {
        Map(m) => encode_map(w, m),
        other => encode_kind(w, other),
    }
}

/// Picks the encoder for a field of the given shape.
pub(crate) fn value_encoder(shape: Shape, as_text: bool) -> ValueEncoder {
    if as_text && shape.is_scalar() {
        return encode_as_text;
    }
    match shape.strip_indirection().kind {
        ShapeKind::Marshal => encode_marshaled,
        ShapeKind::Object => encode_object_value,
        ShapeKind::Record(_) => encode_record_value,
        ShapeKind::Seq => encode_seq_value,
        ShapeKind::Map => encode_map_value,
        _ => encode_value,
    }
}
