//! Resolving the encoded fields of a record type, once per type.
use super::{
    dispatch::{value_encoder, ValueEncoder},
    ser::SerializerExt,
};
use crate::shape::*;
use bytes::Bytes;
use hashbrown::{hash_map::Entry, HashMap, HashSet};
use log::{debug, trace};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use smallvec::SmallVec;
use std::{any::TypeId, fmt, mem, sync::Arc};

/// The annotation key read first for a field's name and options.
pub const PRIMARY_TAG_KEY: &str = "php";
/// Read when a field has no (or an empty) primary annotation.
pub const SECONDARY_TAG_KEY: &str = "serde";

/// Indices from the root record to a field, through embedded records.
pub type FieldPath = SmallVec<[usize; 4]>;

/// How one field of a record is written.
#[derive(Clone)]
pub struct FieldPlan {
    pub(crate) path: FieldPath,
    pub(crate) name: String,
    pub(crate) tagged: bool,
    pub(crate) omit_empty: bool,
    pub(crate) as_text: bool,
    /// The name, already framed as a string token.
    pub(crate) key: Bytes,
    pub(crate) encoder: ValueEncoder,
    /// The field's declared shape; its zero value is written when the field is
    /// unreachable.
    pub(crate) shape: Shape,
}

impl FieldPlan {
    pub fn path(&self) -> &[usize] { &self.path }

    /// The name the field is written under.
    pub fn name(&self) -> &str { &self.name }

    /// Whether the name came from an annotation.
    pub fn tagged(&self) -> bool { self.tagged }

    pub fn omit_empty(&self) -> bool { self.omit_empty }

    pub fn as_text(&self) -> bool { self.as_text }

    pub fn key(&self) -> &[u8] { &self.key }

    pub fn shape(&self) -> Shape { self.shape }
}

impl fmt::Debug for FieldPlan {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("FieldPlan")
            .field("path", &self.path)
            .field("name", &self.name)
            .field("tagged", &self.tagged)
            .field("omit_empty", &self.omit_empty)
            .field("as_text", &self.as_text)
            .field("shape", &self.shape)
            .finish()
    }
}

/// A parsed `name[,option...]` annotation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct FieldTag<'a> {
    name: &'a str,
    omit_empty: bool,
    as_text: bool,
}

impl<'a> FieldTag<'a> {
    fn parse(tag: &'a str) -> Self {
        let mut parts = tag.split(',');
        let mut out = FieldTag {
            name: parts.next().unwrap_or_default(),
            ..FieldTag::default()
        };
        for opt in parts {
            match opt {
                "omitempty" => out.omit_empty = true,
                "string" => out.as_text = true,
                _ => {}
            }
        }
        out
    }

    fn of(field: &FieldDesc) -> FieldTag<'static> {
        field
            .tag(PRIMARY_TAG_KEY)
            .filter(|t| !t.is_empty())
            .or_else(|| field.tag(SECONDARY_TAG_KEY))
            .map(FieldTag::parse)
            .unwrap_or_default()
    }
}

#[derive(Clone)]
struct Candidate {
    path: FieldPath,
    name: String,
    tagged: bool,
    omit_empty: bool,
    as_text: bool,
    shape: Shape,
}

impl Candidate {
    fn depth(&self) -> usize { self.path.len() }
}

/// Resolves the fields of `root`, without consulting the cache.
///
/// Fields of embedded records are promoted into the parent, breadth first. When several
/// fields end up with one name, the shallowest wins; at equal depth a sole annotated
/// field wins; otherwise none of them is written.
pub fn type_fields(root: &RecordShape) -> Vec<FieldPlan> {
    let mut next: Vec<(FieldPath, RecordShape)> = vec![(FieldPath::new(), *root)];
    let mut visited = HashSet::new();
    let mut candidates = Vec::new();

    while !next.is_empty() {
        let current = mem::take(&mut next);
        let mut queued = HashSet::new();
        for (path, rec) in current {
            if !visited.insert(rec.id) {
                continue;
            }
            for (i, field) in rec.fields.iter().enumerate() {
                let shape = (field.shape)();
                let embedded = if field.embedded { shape.as_record() } else { None };
                if !field.exported && embedded.is_none() {
                    continue;
                }
                let tag = FieldTag::of(field);
                if tag.name == "-" {
                    continue;
                }

                let mut index = path.clone();
                index.push(i);

                match embedded {
                    Some(inner) if tag.name.is_empty() => {
                        if queued.insert(inner.id) {
                            next.push((index, inner));
                        }
                    }
                    _ => candidates.push(Candidate {
                        path: index,
                        name: if tag.name.is_empty() {
                            field.name.to_string()
                        } else {
                            tag.name.to_string()
                        },
                        tagged: !tag.name.is_empty(),
                        omit_empty: tag.omit_empty,
                        as_text: tag.as_text,
                        shape,
                    }),
                }
            }
        }
    }

    candidates.sort_by(|a, b| {
        a.name
            .cmp(&b.name)
            .then(a.depth().cmp(&b.depth()))
            .then(b.tagged.cmp(&a.tagged))
            .then(a.path.cmp(&b.path))
    });

    let mut survivors = Vec::with_capacity(candidates.len());
    let mut rest = &candidates[..];
    while let Some(first) = rest.first() {
        let same_name = rest.iter().take_while(|c| c.name == first.name).count();
        let (group, tail) = rest.split_at(same_name);
        rest = tail;
        match dominant(group) {
            Some(winner) => survivors.push(winner.clone()),
            None => trace!(
                "{}: dropping {} fields named {:?}",
                root.name,
                group.len(),
                first.name
            ),
        }
    }
    survivors.sort_by(|a, b| a.path.cmp(&b.path));

    survivors
        .into_iter()
        .map(|c| {
            let mut key = Vec::with_capacity(c.name.len() + 8);
            key.put_bytes(c.name.as_bytes());
            FieldPlan {
                encoder: value_encoder(c.shape, c.as_text),
                shape: c.shape,
                key: Bytes::from(key),
                path: c.path,
                name: c.name,
                tagged: c.tagged,
                omit_empty: c.omit_empty,
                as_text: c.as_text,
            }
        })
        .collect()
}

/// `group` shares one name and is sorted shallowest first, annotated first.
fn dominant(group: &[Candidate]) -> Option<&Candidate> {
    let first = group.first()?;
    match group.get(1) {
        None => Some(first),
        Some(second) if second.depth() > first.depth() => Some(first),
        Some(second) if first.tagged && !second.tagged => Some(first),
        Some(_) => None,
    }
}

/// Field plans by record type. Entries are never evicted.
pub(crate) struct ShapeCache {
    plans: RwLock<HashMap<TypeId, Arc<[FieldPlan]>>>,
}

impl ShapeCache {
    pub(crate) fn new() -> Self {
        ShapeCache {
            plans: RwLock::new(HashMap::new()),
        }
    }

    pub(crate) fn fields(&self, shape: &RecordShape) -> Arc<[FieldPlan]> {
        if let Some(plan) = self.plans.read().get(&shape.id) {
            return plan.clone();
        }

        let built: Arc<[FieldPlan]> = type_fields(shape).into();
        match self.plans.write().entry(shape.id) {
            Entry::Occupied(e) => {
                trace!("{}: plan was stored concurrently", shape.name);
                e.get().clone()
            }
            Entry::Vacant(e) => {
                debug!("{}: planned {} fields", shape.name, built.len());
                e.insert(built).clone()
            }
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize { self.plans.read().len() }
}

static SHAPE_CACHE: Lazy<ShapeCache> = Lazy::new(ShapeCache::new);

/// The field plan of a record type, built on first use and shared afterwards.
pub fn cached_fields(shape: &RecordShape) -> Arc<[FieldPlan]> { SHAPE_CACHE.fields(shape) }
