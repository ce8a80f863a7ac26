use super::ser::Writer;
use parking_lot::{const_mutex, Mutex};
use std::ops::{Deref, DerefMut};

/// The most writers the pool keeps around.
pub const MAX_POOLED_WRITERS: usize = 32;
/// Writers that grew past this capacity are dropped instead of pooled, so that one large
/// encode does not pin its buffer for the life of the process.
pub const MAX_RETAINED_CAPACITY: usize = 64 * 1024;

/// A free list of [`Writer`]s.
pub(crate) struct WriterPool {
    free: Mutex<Vec<Writer>>,
}

pub(crate) static POOL: WriterPool = WriterPool::new();

impl WriterPool {
    pub(crate) const fn new() -> Self {
        WriterPool {
            free: const_mutex(Vec::new()),
        }
    }

    /// Rents an empty writer. It goes back to the pool when the guard is dropped.
    pub(crate) fn rent(&self) -> Rented<'_> {
        let mut w = self.free.lock().pop().unwrap_or_default();
        w.clear();
        Rented {
            value: Some(w),
            pool: self,
        }
    }

    fn give_back(&self, mut w: Writer) {
        if w.capacity() > MAX_RETAINED_CAPACITY {
            return;
        }
        w.clear();
        let mut free = self.free.lock();
        if free.len() < MAX_POOLED_WRITERS {
            free.push(w);
        }
    }

    #[cfg(test)]
    fn pooled(&self) -> usize { self.free.lock().len() }
}

/// A writer rented from a [`WriterPool`].
pub(crate) struct Rented<'p> {
    value: Option<Writer>,
    pool: &'p WriterPool,
}

impl Deref for Rented<'_> {
    type Target = Writer;

    fn deref(&self) -> &Writer {
        match &self.value {
            None => panic!("writer is returned"),
            Some(w) => w,
        }
    }
}

impl DerefMut for Rented<'_> {
    fn deref_mut(&mut self) -> &mut Writer {
        match &mut self.value {
            None => panic!("writer is returned"),
            Some(w) => w,
        }
    }
}

impl Drop for Rented<'_> {
    fn drop(&mut self) {
        if let Some(w) = self.value.take() {
            self.pool.give_back(w);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::SerializerExt;

    #[test]
    fn rented_writers_come_back_empty() {
        let pool = WriterPool::new();
        {
            let mut w = pool.rent();
            w.put_bool(true);
            assert_eq!(w.as_bytes(), b"b:1;");
        }
        assert_eq!(pool.pooled(), 1);
        let w = pool.rent();
        assert!(w.is_empty());
        assert_eq!(pool.pooled(), 0);
    }

    #[test]
    fn large_writers_are_dropped() {
        let pool = WriterPool::new();
        {
            let mut w = pool.rent();
            w.put_bytes(&vec![b'x'; MAX_RETAINED_CAPACITY + 1]);
        }
        assert_eq!(pool.pooled(), 0);
    }

    #[test]
    fn pool_is_bounded() {
        let pool = WriterPool::new();
        let rented: Vec<_> = (0..MAX_POOLED_WRITERS + 4).map(|_| pool.rent()).collect();
        drop(rented);
        assert_eq!(pool.pooled(), MAX_POOLED_WRITERS);
    }
}
