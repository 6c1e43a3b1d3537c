//! Service contains the business logic of the application.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod clock;
pub mod command;
pub mod domain;
pub mod error;
pub mod infra;
pub mod lifecycle;
pub mod lock;
pub mod query;
pub mod read;

use smart_default::SmartDefault;

#[cfg(doc)]
use infra::Database;

use self::{
    domain::{property, sale},
    lock::Locks,
};

pub use self::{
    clock::Clock,
    command::Command,
    error::{Categorize, Kind as ErrorKind},
    query::Query,
};

/// [`Service`] configuration.
#[derive(Clone, Copy, Debug, SmartDefault)]
pub struct Config {
    /// Default number of days ahead to look for upcoming deadlines.
    #[default(30)]
    pub notification_days: u16,
}

/// Domain service.
#[derive(Clone, Debug)]
pub struct Service<Db, Clk = clock::System> {
    /// Configuration of this [`Service`].
    config: Config,

    /// [`Database`] of this [`Service`].
    database: Db,

    /// [`Clock`] of this [`Service`].
    clock: Clk,

    /// [`Locks`] serializing mutations of the same [`Sale`].
    ///
    /// [`Sale`]: domain::Sale
    sale_locks: Locks<sale::Id>,

    /// [`Locks`] serializing mutations of the same [`Property`].
    ///
    /// [`Property`]: domain::Property
    property_locks: Locks<property::Id>,
}

impl<Db, Clk> Service<Db, Clk> {
    /// Creates a new [`Service`] with the provided parameters.
    #[must_use]
    pub fn new(config: Config, database: Db, clock: Clk) -> Self {
        Self {
            config,
            database,
            clock,
            sale_locks: Locks::default(),
            property_locks: Locks::default(),
        }
    }

    /// Returns [`Config`] of this [`Service`].
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns [`Database`] of this [`Service`].
    #[must_use]
    pub fn database(&self) -> &Db {
        &self.database
    }

    /// Returns [`Clock`] of this [`Service`].
    #[must_use]
    pub fn clock(&self) -> &Clk {
        &self.clock
    }
}
