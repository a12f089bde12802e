//! Insertion-ordered staged sets keyed by object identity.

use crate::domain::DomainObject;
use std::cell::RefCell;
use std::rc::Rc;

pub(crate) type StagedObject = Rc<RefCell<dyn DomainObject>>;

/// Insertion-ordered set of staged objects, keyed by pointer identity.
#[derive(Default)]
pub(crate) struct StagedSet {
    entries: Vec<StagedObject>,
}

impl StagedSet {
    fn position(&self, obj: &StagedObject) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| std::ptr::addr_eq(Rc::as_ptr(entry), Rc::as_ptr(obj)))
    }

    pub(crate) fn contains(&self, obj: &StagedObject) -> bool {
        self.position(obj).is_some()
    }

    /// Appends `obj` unless already present; returns whether it was added.
    pub(crate) fn insert(&mut self, obj: StagedObject) -> bool {
        if self.contains(&obj) {
            return false;
        }
        self.entries.push(obj);
        true
    }

    /// Removes `obj` keeping the order of the rest; returns whether it was present.
    pub(crate) fn remove(&mut self, obj: &StagedObject) -> bool {
        match self.position(obj) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &StagedObject> {
        self.entries.iter()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}
