//! Mapper registry: tag → lazily built mapper, over a fixed table.

use super::mapping::{TableMapping, CATEGORY_TABLE, STUDENT_TABLE};
use super::table_mapper::Mapper;
use super::{ObjectMapper, PersistError, PersistResult};
use crate::db::DbResult;
use crate::domain::{DomainObject, Persistable};
use crate::model::{Category, Student};
use log::{debug, warn};
use rusqlite::Connection;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

type BuildFn = fn(Rc<Connection>, TableMapping) -> PersistResult<Rc<dyn ObjectMapper>>;

#[derive(Clone, Copy)]
struct Registration {
    tag: &'static str,
    mapping: TableMapping,
    build: BuildFn,
}

fn build_mapper<T: Persistable>(
    conn: Rc<Connection>,
    mapping: TableMapping,
) -> PersistResult<Rc<dyn ObjectMapper>> {
    Ok(Rc::new(Mapper::<T>::new(conn, mapping)?))
}

/// Collects registrations before the registry is frozen.
#[derive(Default)]
pub struct RegistryBuilder {
    registrations: Vec<Registration>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the mapper for `T` under `T::TAG`.
    pub fn register<T: Persistable>(mut self, mapping: TableMapping) -> Self {
        self.registrations.push(Registration {
            tag: T::TAG,
            mapping,
            build: build_mapper::<T>,
        });
        self
    }

    /// Freezes the registration table and binds it to `conn`.
    ///
    /// # Errors
    /// - `DuplicateMapping` when two registrations share a tag.
    pub fn build(self, conn: Rc<Connection>) -> PersistResult<MapperRegistry> {
        let mut registrations = BTreeMap::new();
        for registration in self.registrations {
            if registrations
                .insert(registration.tag, registration)
                .is_some()
            {
                return Err(PersistError::DuplicateMapping(registration.tag));
            }
        }

        Ok(MapperRegistry {
            conn,
            registrations,
            cache: RefCell::new(BTreeMap::new()),
        })
    }
}

/// Resolves mappers by object or tag.
///
/// # Invariants
/// - At most one mapper instance exists per registered tag.
/// - The registration table never changes after `build`.
/// - Failed lookups and failed constructions leave the cache untouched.
pub struct MapperRegistry {
    conn: Rc<Connection>,
    registrations: BTreeMap<&'static str, Registration>,
    cache: RefCell<BTreeMap<&'static str, Rc<dyn ObjectMapper>>>,
}

impl MapperRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Builder preloaded with the student and category mappings.
    pub fn standard() -> RegistryBuilder {
        RegistryBuilder::new()
            .register::<Student>(STUDENT_TABLE)
            .register::<Category>(CATEGORY_TABLE)
    }

    /// Resolves the mapper for `obj` through its type tag.
    pub fn mapper_for(&self, obj: &dyn DomainObject) -> PersistResult<Rc<dyn ObjectMapper>> {
        self.mapper_by_tag(obj.type_tag())
    }

    /// Resolves the mapper registered under `tag`, building it on first use.
    ///
    /// # Errors
    /// - `UnknownMapper` when `tag` was never registered.
    /// - Construction errors from `Mapper::new` on first use.
    pub fn mapper_by_tag(&self, tag: &str) -> PersistResult<Rc<dyn ObjectMapper>> {
        let Some(registration) = self.registrations.get(tag) else {
            warn!(
                "event=mapper_resolve module=registry status=error error_code=unknown_mapper tag={}",
                tag
            );
            return Err(PersistError::UnknownMapper(tag.to_string()));
        };

        if let Some(mapper) = self.cache.borrow().get(registration.tag) {
            return Ok(Rc::clone(mapper));
        }

        let mapper = (registration.build)(Rc::clone(&self.conn), registration.mapping)?;
        self.cache
            .borrow_mut()
            .insert(registration.tag, Rc::clone(&mapper));
        debug!(
            "event=mapper_resolve module=registry status=built tag={} table={}",
            registration.tag, registration.mapping.table
        );
        Ok(mapper)
    }

    /// Typed access for callers that know the domain type statically.
    pub fn mapper<T: Persistable>(&self) -> PersistResult<Rc<Mapper<T>>> {
        self.mapper_by_tag(T::TAG)?
            .into_any()
            .downcast::<Mapper<T>>()
            .map_err(|_| PersistError::InvalidMapping {
                tag: T::TAG,
                message: "registered mapper belongs to another type".to_string(),
            })
    }

    pub fn is_registered(&self, tag: &str) -> bool {
        self.registrations.contains_key(tag)
    }

    pub fn is_cached(&self, tag: &str) -> bool {
        self.cache.borrow().contains_key(tag)
    }

    /// Tags whose mapper has been built, sorted.
    pub fn cached_tags(&self) -> Vec<&'static str> {
        self.cache.borrow().keys().copied().collect()
    }

    /// Checks every registered table without building mappers.
    pub fn verify_schema(&self) -> DbResult<()> {
        for registration in self.registrations.values() {
            registration.mapping.verify_schema(&self.conn)?;
        }
        Ok(())
    }

    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }
}
