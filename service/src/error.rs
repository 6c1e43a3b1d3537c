//! Error categorization.

use derive_more::Display;
use tracerr::Traced;

use crate::infra::database;

/// Category of an operation error, shared by all the commands and queries.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum Kind {
    /// Input is missing or malformed.
    #[display("validation")]
    Validation,

    /// Referenced entity does not exist.
    #[display("not found")]
    NotFound,

    /// Precondition of a cascading update failed.
    #[display("inconsistent state")]
    InconsistentState,

    /// Collaborator (persistence, clock) failed.
    #[display("collaborator")]
    Collaborator,
}

/// Error classifiable into a [`Kind`].
pub trait Categorize {
    /// Returns the [`Kind`] of this error.
    fn kind(&self) -> Kind;
}

impl<E: Categorize> Categorize for Traced<E> {
    fn kind(&self) -> Kind {
        self.as_ref().kind()
    }
}

impl Categorize for database::Error {
    fn kind(&self) -> Kind {
        Kind::Collaborator
    }
}
