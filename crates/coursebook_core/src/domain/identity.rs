//! Backend-assigned identity carried by every persistable object.

use serde::Serialize;

/// Storage identity of one domain object.
///
/// # Invariants
/// - An id, once assigned by a mapper, never changes.
/// - A retired identity belongs to a deleted row and is never persisted again.
/// - Only the persistence layer assigns, revokes or retires identities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(into = "Option<i64>")]
pub struct Identity {
    id: Option<i64>,
    retired: bool,
}

impl Identity {
    /// Identity of an object that has never been stored.
    pub fn transient() -> Self {
        Self::default()
    }

    /// Identity of an object loaded from (or known to exist in) storage.
    pub fn persisted(id: i64) -> Self {
        Self {
            id: Some(id),
            retired: false,
        }
    }

    pub fn get(&self) -> Option<i64> {
        self.id
    }

    pub fn is_transient(&self) -> bool {
        self.id.is_none()
    }

    /// Whether the backing row was deleted by a committed removal.
    pub fn is_retired(&self) -> bool {
        self.retired
    }

    pub(crate) fn assign(&mut self, id: i64) {
        debug_assert!(self.id.is_none(), "identity already assigned");
        self.id = Some(id);
    }

    /// Undoes an assignment whose insert was rolled back.
    pub(crate) fn revoke(&mut self) {
        self.id = None;
    }

    pub(crate) fn retire(&mut self) {
        self.retired = true;
    }

    /// Undoes a retirement whose delete was rolled back.
    pub(crate) fn reinstate(&mut self) {
        self.retired = false;
    }
}

impl From<Identity> for Option<i64> {
    fn from(value: Identity) -> Self {
        value.id
    }
}
