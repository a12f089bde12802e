//! Persistence context: the shared connection plus its mapper registry.
//!
//! # Responsibility
//! - Own the single connection for the lifetime of the process.
//! - Hand out units of work and typed mappers bound to that connection.
//!
//! # Invariants
//! - A `Store` is only built over a schema that satisfies every
//!   registered mapping.

use crate::config::DatabaseConfig;
use crate::db::{configure_connection, open_db};
use crate::domain::Persistable;
use crate::mapper::{Mapper, MapperRegistry, PersistResult, RegistryBuilder};
use crate::uow::UnitOfWork;
use log::info;
use rusqlite::Connection;
use std::rc::Rc;

pub struct Store {
    conn: Rc<Connection>,
    registry: MapperRegistry,
}

impl Store {
    /// Opens the configured database file with the standard mappings.
    pub fn open(config: &DatabaseConfig) -> PersistResult<Self> {
        let conn = open_db(&config.path)?;
        Self::from_connection(conn)
    }

    /// Wraps an already opened connection with the standard mappings.
    pub fn from_connection(conn: Connection) -> PersistResult<Self> {
        Self::with_mappings(conn, MapperRegistry::standard())
    }

    /// Wraps `conn` with a caller-assembled registration table.
    ///
    /// # Errors
    /// - `DuplicateMapping` from the builder.
    /// - `Db` when a registered table or column is missing.
    pub fn with_mappings(conn: Connection, mappings: RegistryBuilder) -> PersistResult<Self> {
        configure_connection(&conn)?;
        let conn = Rc::new(conn);
        let registry = mappings.build(Rc::clone(&conn))?;
        registry.verify_schema()?;
        info!("event=store_open module=store status=ok");
        Ok(Self { conn, registry })
    }

    pub fn registry(&self) -> &MapperRegistry {
        &self.registry
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn unit_of_work(&self) -> UnitOfWork<'_> {
        UnitOfWork::new(self)
    }

    pub fn mapper<T: Persistable>(&self) -> PersistResult<Rc<Mapper<T>>> {
        self.registry.mapper::<T>()
    }
}
