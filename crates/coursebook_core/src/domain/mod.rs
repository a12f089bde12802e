//! Persistable domain object capability.
//!
//! # Responsibility
//! - Define what the persistence layer needs from an entity: a fixed type
//!   tag, an identity, and named field values.
//! - Give shared entities staging methods (`mark_new`, `mark_dirty`,
//!   `mark_removed`) that register them with a unit of work.
//!
//! # Invariants
//! - `DomainObject::type_tag` equals `Persistable::TAG` for the same type.
//! - Entities carry no storage knowledge: no tables, columns or SQL.
//! - Objects are staged by identity, so they are shared through `Shared<T>`.

use crate::uow::UnitOfWork;
use std::cell::RefCell;
use std::rc::Rc;

mod fields;
mod identity;

pub use fields::{FieldValue, Record, RecordError};
pub use identity::Identity;

/// Shared, mutable handle to a domain object. Pointer identity is object
/// identity for staging purposes.
pub type Shared<T> = Rc<RefCell<T>>;

/// Wraps a domain object into a `Shared` handle.
pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}

/// Object-safe view of a persistable entity.
pub trait DomainObject: 'static {
    /// Registry dispatch key.
    fn type_tag(&self) -> &'static str;

    fn identity(&self) -> &Identity;

    fn identity_mut(&mut self) -> &mut Identity;

    /// Current value of a declared field; `None` for undeclared names.
    fn field(&self, name: &str) -> Option<FieldValue>;

    fn id(&self) -> Option<i64> {
        self.identity().get()
    }
}

/// Static side of a persistable entity: its tag, its declared fields and
/// how to rebuild it from a stored record.
pub trait Persistable: DomainObject + Sized {
    const TAG: &'static str;

    /// Declared schema; every mapped field must appear here.
    const FIELDS: &'static [&'static str];

    fn from_record(record: Record) -> Result<Self, RecordError>;
}

/// Lifecycle staging signals for shared domain objects.
pub trait Staging {
    fn mark_new(&self, uow: &mut UnitOfWork<'_>);
    fn mark_dirty(&self, uow: &mut UnitOfWork<'_>);
    fn mark_removed(&self, uow: &mut UnitOfWork<'_>);
}

impl<T: DomainObject> Staging for Shared<T> {
    fn mark_new(&self, uow: &mut UnitOfWork<'_>) {
        uow.register_new(self);
    }

    fn mark_dirty(&self, uow: &mut UnitOfWork<'_>) {
        uow.register_dirty(self);
    }

    fn mark_removed(&self, uow: &mut UnitOfWork<'_>) {
        uow.register_removed(self);
    }
}
