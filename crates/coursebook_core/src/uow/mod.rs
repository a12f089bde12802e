//! Unit of Work: staged change sets applied as one transaction.
//!
//! # Responsibility
//! - Track objects staged as new, dirty or removed by identity.
//! - Apply them through registry-resolved mappers in a fixed order.
//!
//! # Invariants
//! - An object sits in at most one staged set.
//! - Commit order is new, dirty, removed; registration order within a set.
//! - A commit either applies every staged change or none of them; on
//!   failure the staged sets and in-memory identities are left as before.

use crate::domain::{DomainObject, Shared};
use crate::mapper::{MapperRegistry, PersistError, PersistResult};
use crate::store::Store;
use log::{debug, error, info, warn};
use std::time::Instant;

mod staged;

use staged::{StagedObject, StagedSet};

/// Staged set an object currently belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    New,
    Dirty,
    Removed,
}

/// Statements issued by one successful commit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitSummary {
    pub inserted: usize,
    pub updated: usize,
    pub deleted: usize,
}

impl CommitSummary {
    pub fn statements(&self) -> usize {
        self.inserted + self.updated + self.deleted
    }
}

/// In-memory effect of an applied write, undone when the commit fails.
enum Applied {
    Inserted(StagedObject),
    Deleted(StagedObject),
}

/// Change tracker for one logical operation.
///
/// Not shared across threads; create one per operation from a `Store`.
pub struct UnitOfWork<'store> {
    registry: &'store MapperRegistry,
    new: StagedSet,
    dirty: StagedSet,
    removed: StagedSet,
}

impl<'store> UnitOfWork<'store> {
    pub fn new(store: &'store Store) -> Self {
        Self {
            registry: store.registry(),
            new: StagedSet::default(),
            dirty: StagedSet::default(),
            removed: StagedSet::default(),
        }
    }

    /// Stages `obj` for insertion, evicting it from dirty/removed first.
    pub fn register_new<T: DomainObject>(&mut self, obj: &Shared<T>) {
        let obj: StagedObject = obj.clone();
        self.dirty.remove(&obj);
        self.removed.remove(&obj);
        if self.new.insert(obj) {
            debug!("event=uow_register module=uow stage=new");
        }
    }

    /// Stages `obj` for update. No-op while `obj` awaits insertion.
    pub fn register_dirty<T: DomainObject>(&mut self, obj: &Shared<T>) {
        let obj: StagedObject = obj.clone();
        if self.new.contains(&obj) {
            return;
        }
        self.removed.remove(&obj);
        if self.dirty.insert(obj) {
            debug!("event=uow_register module=uow stage=dirty");
        }
    }

    /// Stages `obj` for deletion. A pending insertion is cancelled instead.
    pub fn register_removed<T: DomainObject>(&mut self, obj: &Shared<T>) {
        let obj: StagedObject = obj.clone();
        if self.new.remove(&obj) {
            debug!("event=uow_register module=uow stage=cancelled");
            return;
        }
        self.dirty.remove(&obj);
        if self.removed.insert(obj) {
            debug!("event=uow_register module=uow stage=removed");
        }
    }

    pub fn stage_of<T: DomainObject>(&self, obj: &Shared<T>) -> Option<Stage> {
        let obj: StagedObject = obj.clone();
        if self.new.contains(&obj) {
            Some(Stage::New)
        } else if self.dirty.contains(&obj) {
            Some(Stage::Dirty)
        } else if self.removed.contains(&obj) {
            Some(Stage::Removed)
        } else {
            None
        }
    }

    pub fn is_empty(&self) -> bool {
        self.new.is_empty() && self.dirty.is_empty() && self.removed.is_empty()
    }

    /// Number of staged objects across all three sets.
    pub fn pending(&self) -> usize {
        self.new.len() + self.dirty.len() + self.removed.len()
    }

    /// Drops every staged change without touching storage.
    pub fn discard(&mut self) {
        self.new.clear();
        self.dirty.clear();
        self.removed.clear();
    }

    /// Applies all staged changes in one transaction.
    ///
    /// With nothing staged no statement is issued. On success the staged
    /// sets are cleared; on failure the transaction is rolled back, ids
    /// assigned during the attempt are revoked and the error is returned.
    pub fn commit(&mut self) -> PersistResult<CommitSummary> {
        if self.is_empty() {
            debug!("event=uow_commit module=uow status=skipped reason=empty");
            return Ok(CommitSummary::default());
        }

        let started_at = Instant::now();
        info!(
            "event=uow_commit module=uow status=start new={} dirty={} removed={}",
            self.new.len(),
            self.dirty.len(),
            self.removed.len()
        );

        let registry = self.registry;
        let tx = registry.connection().unchecked_transaction()?;
        let mut journal = Vec::new();

        let outcome = self
            .apply(&mut journal)
            .and_then(|summary| tx.commit().map(|()| summary).map_err(PersistError::from));

        match outcome {
            Ok(summary) => {
                self.discard();
                info!(
                    "event=uow_commit module=uow status=ok duration_ms={} inserted={} updated={} deleted={}",
                    started_at.elapsed().as_millis(),
                    summary.inserted,
                    summary.updated,
                    summary.deleted
                );
                Ok(summary)
            }
            Err(err) => {
                revert(&journal);
                warn!(
                    "event=uow_commit module=uow status=rolled_back duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    fn apply(&self, journal: &mut Vec<Applied>) -> PersistResult<CommitSummary> {
        let mut summary = CommitSummary::default();

        for obj in self.new.iter() {
            let mut object = obj.try_borrow_mut().map_err(|_| PersistError::ObjectInUse)?;
            self.registry
                .mapper_for(&*object)?
                .insert_object(&mut *object)?;
            journal.push(Applied::Inserted(obj.clone()));
            summary.inserted += 1;
        }

        for obj in self.dirty.iter() {
            let object = obj.try_borrow().map_err(|_| PersistError::ObjectInUse)?;
            self.registry.mapper_for(&*object)?.update_object(&*object)?;
            summary.updated += 1;
        }

        for obj in self.removed.iter() {
            let mut object = obj.try_borrow_mut().map_err(|_| PersistError::ObjectInUse)?;
            self.registry
                .mapper_for(&*object)?
                .delete_object(&mut *object)?;
            journal.push(Applied::Deleted(obj.clone()));
            summary.deleted += 1;
        }

        Ok(summary)
    }
}

/// Restores in-memory identities after a rolled-back commit.
fn revert(journal: &[Applied]) {
    for applied in journal.iter().rev() {
        let (obj, inserted) = match applied {
            Applied::Inserted(obj) => (obj, true),
            Applied::Deleted(obj) => (obj, false),
        };
        match obj.try_borrow_mut() {
            Ok(mut object) if inserted => object.identity_mut().revoke(),
            Ok(mut object) => object.identity_mut().reinstate(),
            Err(_) => error!("event=uow_revert module=uow status=error error_code=object_in_use"),
        }
    }
}
