use super::{
    constants::TAG_ARRAY,
    dispatch::{encode_zero, resolve},
    fields::{cached_fields, FieldPlan},
    ser::*,
};
use crate::{
    errors::Error,
    rep::{Kind, PhpValue, Record},
    shape::RecordShape,
};
use smallvec::SmallVec;

/// Where a planned field's value comes from.
#[derive(Clone, Copy)]
enum Slot<'a> {
    Present(&'a dyn PhpValue),
    /// An embedded record on the way is absent; the field holds its zero value.
    Zero,
}

/// Writes a record as an array of its planned fields. The count in the header is the
/// number of fields actually written, so `omitempty` fields are dropped before it.
pub(crate) fn encode_record(w: &mut Writer, rec: &dyn Record) -> Result<(), Error> {
    let plans = cached_fields(&rec.record_shape());

    let mut emitted: SmallVec<[(&FieldPlan, Slot<'_>); 16]> = SmallVec::new();
    for plan in plans.iter() {
        let slot = match field_at(rec, &plan.path) {
            Some(slot) => slot,
            None => continue,
        };
        let empty = match slot {
            Slot::Present(v) => v.kind().is_empty_value(),
            Slot::Zero => plan.shape.zero_is_empty(),
        };
        if plan.omit_empty && empty {
            continue;
        }
        emitted.push((plan, slot));
    }

    w.put_block_header(TAG_ARRAY, emitted.len());
    for (plan, slot) in emitted {
        w.put_slice(&plan.key);
        match slot {
            Slot::Present(v) => (plan.encoder)(w, v)?,
            Slot::Zero => encode_zero(w, plan.shape, plan.as_text)?,
        }
    }
    w.put_block_end();
    Ok(())
}

/// Writes the zero value of a record type: every field at its zero value, less the
/// `omitempty` ones.
pub(crate) fn encode_zero_record(w: &mut Writer, rec: &RecordShape) -> Result<(), Error> {
    let plans = cached_fields(rec);
    let kept: SmallVec<[&FieldPlan; 16]> = plans
        .iter()
        .filter(|plan| !(plan.omit_empty && plan.shape.zero_is_empty()))
        .collect();

    w.put_block_header(TAG_ARRAY, kept.len());
    for plan in kept {
        w.put_slice(&plan.key);
        encode_zero(w, plan.shape, plan.as_text)?;
    }
    w.put_block_end();
    Ok(())
}

/// Follows `path` through embedded records. `None` if the record does not have the
/// field it declared.
fn field_at<'a>(rec: &'a dyn Record, path: &[usize]) -> Option<Slot<'a>> {
    let (last, parents) = path.split_last()?;
    let mut current = rec;
    for &i in parents {
        current = match resolve(current.field(i)?.kind()) {
            Kind::Record(inner) => inner,
            Kind::Null => return Some(Slot::Zero),
            _ => return None,
        };
    }
    current.field(*last).map(Slot::Present)
}
