//! In-process [`Database`] implementation.

mod impls;

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use common::Period;
use derive_more::{Display, Error as StdError};
use tokio::sync::RwLock;
use tracerr::Traced;

use crate::{
    domain::{
        achievement, notification, property, sale, Achievement, Goal,
        Notification, Property, Sale,
    },
    infra::database,
};
#[cfg(doc)]
use crate::infra::Database;

/// In-process [`Database`] keeping the whole ledger in memory.
///
/// Cloned instances share the same state. Every write is visible to the
/// subsequent reads immediately.
#[derive(Clone, Debug, Default)]
pub struct Memory(Arc<RwLock<State>>);

impl Memory {
    /// Creates a new empty [`Memory`] database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Switches the provided [`Table`] offline (or back online), making every
    /// operation on it fail with [`Error::Offline`].
    pub async fn set_offline(&self, table: Table, offline: bool) {
        let mut state = self.0.write().await;
        if offline {
            _ = state.offline.insert(table);
        } else {
            _ = state.offline.remove(&table);
        }
    }

    /// Switches the provided [`Table`] read-only (or back writable), making
    /// every write to it fail with [`Error::ReadOnly`].
    pub async fn set_read_only(&self, table: Table, read_only: bool) {
        let mut state = self.0.write().await;
        if read_only {
            _ = state.read_only.insert(table);
        } else {
            _ = state.read_only.remove(&table);
        }
    }
}

/// Contents of a [`Memory`] database.
#[derive(Debug, Default)]
struct State {
    /// Stored [`Property`]s.
    properties: HashMap<property::Id, Property>,

    /// Stored [`Sale`]s.
    sales: HashMap<sale::Id, Sale>,

    /// Stored [`Goal`]s, one per [`Period`].
    goals: HashMap<Period, Goal>,

    /// Stored [`Achievement`]s.
    achievements: HashMap<achievement::Key, Achievement>,

    /// Stored [`Notification`]s.
    notifications: HashMap<notification::Id, Notification>,

    /// [`Table`]s being offline.
    offline: HashSet<Table>,

    /// [`Table`]s being read-only.
    read_only: HashSet<Table>,
}

impl State {
    /// Ensures the provided [`Table`] is online.
    fn check(&self, table: Table) -> Result<(), Traced<database::Error>> {
        if self.offline.contains(&table) {
            return Err(tracerr::new!(database::Error::from(Error::Offline(
                table
            ))));
        }
        Ok(())
    }

    /// Ensures the provided [`Table`] is online and writable.
    fn check_write(&self, table: Table) -> Result<(), Traced<database::Error>> {
        self.check(table)?;
        if self.read_only.contains(&table) {
            return Err(tracerr::new!(database::Error::from(Error::ReadOnly(
                table
            ))));
        }
        Ok(())
    }
}

/// Table of a [`Memory`] database.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum Table {
    /// [`Property`]s table.
    #[display("properties")]
    Properties,

    /// [`Sale`]s table.
    #[display("sales")]
    Sales,

    /// [`Goal`]s table.
    #[display("goals")]
    Goals,

    /// [`Achievement`]s table.
    #[display("achievements")]
    Achievements,

    /// [`Notification`]s table.
    #[display("notifications")]
    Notifications,
}

/// [`Memory`] database error.
#[derive(Clone, Copy, Debug, Display, StdError)]
pub enum Error {
    /// [`Table`] is switched offline.
    #[display("`{_0}` table is offline")]
    Offline(#[error(not(source))] Table),

    /// [`Table`] is switched read-only.
    #[display("`{_0}` table is read-only")]
    ReadOnly(#[error(not(source))] Table),
}
