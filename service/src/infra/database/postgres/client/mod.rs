//! Postgres database client definitions.

pub mod non_tx;

pub use self::non_tx::NonTx;
