//! [`Command`] for moving a [`Property`] to a [`Status`] required by its
//! linked [`Sale`].
//!
//! [`Sale`]: crate::domain::Sale

use common::operations::{By, Select, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        property::{self, Status, Transition},
        Property,
    },
    error::{Categorize, Kind},
    infra::{database, Database},
    lifecycle, Service,
};

use super::Command;

/// [`Command`] for moving a [`Property`] to a [`Status`] required by its
/// linked [`Sale`].
///
/// Returns the applied [`Transition`], or [`None`] if the [`Property`]
/// already has the required [`Status`].
///
/// [`Sale`]: crate::domain::Sale
#[derive(Clone, Copy, Debug)]
pub struct CascadePropertyStatus {
    /// ID of the [`Property`] to be moved.
    pub property_id: property::Id,

    /// [`Status`] the [`Property`] should have.
    pub target: Status,
}

impl<Db, Clk> Command<CascadePropertyStatus> for Service<Db, Clk>
where
    Db: Database<
            Select<By<Option<Property>, property::Id>>,
            Ok = Option<Property>,
            Err = Traced<database::Error>,
        > + Database<Update<Property>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Option<Transition>;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CascadePropertyStatus,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CascadePropertyStatus {
            property_id,
            target,
        } = cmd;

        // Avoid concurrent changes of the same `Property`.
        let _guard = self.property_locks.lock(property_id).await;

        let mut property = self
            .database()
            .execute(Select(By::<Option<Property>, _>::new(property_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::PropertyNotExists(property_id))
            .map_err(tracerr::wrap!())?;

        let Some(transition) = lifecycle::plan(&property, target)
            .map_err(E::ForbiddenTransition)
            .map_err(tracerr::wrap!())?
        else {
            return Ok(None);
        };

        property.status = target;
        self.database()
            .execute(Update(property))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        log::info!(
            "`Property(id: {property_id})` status cascaded: {transition}",
        );
        Ok(Some(transition))
    }
}

/// Error of [`CascadePropertyStatus`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Status`] machine forbids the required [`Transition`].
    #[display("Forbidden `Property` status transition: {_0}")]
    ForbiddenTransition(#[error(not(source))] Transition),

    /// [`Property`] with the provided ID does not exist.
    #[display("`Property(id: {_0})` does not exist")]
    PropertyNotExists(#[error(not(source))] property::Id),
}

impl Categorize for ExecutionError {
    fn kind(&self) -> Kind {
        match self {
            Self::Db(e) => e.kind(),
            Self::ForbiddenTransition(_) | Self::PropertyNotExists(_) => {
                Kind::InconsistentState
            }
        }
    }
}
