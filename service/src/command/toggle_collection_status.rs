//! [`Command`] for flipping the collection status of a [`Sale`].

use common::operations::{By, Select, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::{sale::CollectionStatus, Achievement};
use crate::{
    domain::{
        property::{self, Transition},
        sale, Property, Sale,
    },
    error::{Categorize, Kind},
    infra::{database, Database},
    lifecycle, Clock, Service,
};

use super::{
    cascade_property_status,
    outcome::{Evaluation, Outcome},
    CascadePropertyStatus, Command,
};

/// [`Command`] for flipping the collection status of a [`Sale`].
///
/// [`CollectionStatus::Pending`] becomes [`CollectionStatus::Collected`] as
/// of today, and vice versa. The linked [`Property`] follows. No
/// [`Achievement`]s are evaluated.
#[derive(Clone, Copy, Debug)]
pub struct ToggleCollectionStatus {
    /// ID of the [`Sale`] to be toggled.
    pub sale_id: sale::Id,
}

impl<Db, Clk> Command<ToggleCollectionStatus> for Service<Db, Clk>
where
    Db: Database<
            Select<By<Option<Sale>, sale::Id>>,
            Ok = Option<Sale>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Property>, property::Id>>,
            Ok = Option<Property>,
            Err = Traced<database::Error>,
        > + Database<Update<Sale>, Ok = (), Err = Traced<database::Error>>,
    Clk: Clock,
    Self: Command<
        CascadePropertyStatus,
        Ok = Option<Transition>,
        Err = Traced<cascade_property_status::ExecutionError>,
    >,
{
    type Ok = Outcome;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        ToggleCollectionStatus { sale_id }: ToggleCollectionStatus,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        // Avoid concurrent changes of the same `Sale`.
        let _guard = self.sale_locks.lock(sale_id).await;

        let mut sale = self
            .database()
            .execute(Select(By::<Option<Sale>, _>::new(sale_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::SaleNotExists(sale_id))
            .map_err(tracerr::wrap!())?;
        sale.collection = sale.collection.toggled(self.clock().today());

        if let Some((property_id, _)) = lifecycle::cascade_target(&sale) {
            _ = self
                .database()
                .execute(Select(By::<Option<Property>, _>::new(property_id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .ok_or(E::LinkedPropertyMissing(property_id))
                .map_err(tracerr::wrap!())?;
        }

        self.database()
            .execute(Update(sale.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let cascade = self.cascade(&sale).await;

        Ok(Outcome {
            sale,
            cascade,
            achievements: Evaluation::Skipped,
        })
    }
}

/// Error of [`ToggleCollectionStatus`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Property`] linked to the [`Sale`] no longer exists, so the
    /// collection change cannot be cascaded.
    #[display("Linked `Property(id: {_0})` does not exist")]
    LinkedPropertyMissing(#[error(not(source))] property::Id),

    /// [`Sale`] with the provided ID does not exist.
    #[display("`Sale(id: {_0})` does not exist")]
    SaleNotExists(#[error(not(source))] sale::Id),
}

impl Categorize for ExecutionError {
    fn kind(&self) -> Kind {
        match self {
            Self::Db(e) => e.kind(),
            Self::LinkedPropertyMissing(_) => Kind::InconsistentState,
            Self::SaleNotExists(_) => Kind::NotFound,
        }
    }
}
