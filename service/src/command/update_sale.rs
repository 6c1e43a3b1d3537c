//! [`Command`] for updating an existing [`Sale`].

use common::operations::{By, Select, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        achievement::Achievement,
        property::{self, Transition},
        sale, Property, Sale,
    },
    error::{Categorize, Kind},
    infra::{database, Database},
    lifecycle, Clock, Service,
};

use super::{
    cascade_property_status, evaluate_achievements,
    outcome::{Cascade, Outcome},
    CascadePropertyStatus, Command, EvaluateAchievements,
};

/// [`Command`] for updating an existing [`Sale`].
///
/// Changing the collection status cascades onto the linked [`Property`].
/// [`Achievement`]s are evaluated afterwards.
#[derive(Clone, Debug)]
pub struct UpdateSale {
    /// ID of the [`Sale`] to be updated.
    pub sale_id: sale::Id,

    /// [`sale::Patch`] to apply.
    pub patch: sale::Patch,
}

impl<Db, Clk> Command<UpdateSale> for Service<Db, Clk>
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
        > + Command<
            EvaluateAchievements,
            Ok = Vec<Achievement>,
            Err = Traced<evaluate_achievements::ExecutionError>,
        >,
{
    type Ok = Outcome;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: UpdateSale) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateSale { sale_id, patch } = cmd;

        // Avoid concurrent changes of the same `Sale`.
        let _guard = self.sale_locks.lock(sale_id).await;

        let mut sale = self
            .database()
            .execute(Select(By::<Option<Sale>, _>::new(sale_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::SaleNotExists(sale_id))
            .map_err(tracerr::wrap!())?;
        let (was_status, was_property) =
            (sale.collection_status(), sale.property_id());

        sale.apply(patch, self.clock().today())
            .map_err(tracerr::from_and_wrap!(=> E))?;

        let cascading = sale.collection_status() != was_status
            && lifecycle::cascade_target(&sale).is_some();
        if let Some(property_id) = sale.property_id() {
            let relinked = was_property != Some(property_id);
            if relinked || cascading {
                let exists = self
                    .database()
                    .execute(Select(By::<Option<Property>, _>::new(
                        property_id,
                    )))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))?
                    .is_some();
                if !exists {
                    return Err(tracerr::new!(if relinked {
                        E::PropertyNotExists(property_id)
                    } else {
                        E::LinkedPropertyMissing(property_id)
                    }));
                }
            }
        }

        self.database()
            .execute(Update(sale.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let cascade = if cascading {
            self.cascade(&sale).await
        } else {
            Cascade::NotRequired
        };
        let achievements = self.evaluate().await;

        Ok(Outcome {
            sale,
            cascade,
            achievements,
        })
    }
}

/// Error of [`UpdateSale`] [`Command`] execution.
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

    /// [`Property`] with the provided ID does not exist.
    #[display("`Property(id: {_0})` does not exist")]
    PropertyNotExists(#[error(not(source))] property::Id),

    /// [`Sale`] with the provided ID does not exist.
    #[display("`Sale(id: {_0})` does not exist")]
    SaleNotExists(#[error(not(source))] sale::Id),

    /// [`sale::Patch`] is invalid.
    #[display("Invalid `Sale`: {_0}")]
    #[from]
    Validation(sale::ValidationError),
}

impl Categorize for ExecutionError {
    fn kind(&self) -> Kind {
        match self {
            Self::Db(e) => e.kind(),
            Self::LinkedPropertyMissing(_) => Kind::InconsistentState,
            Self::PropertyNotExists(_) | Self::SaleNotExists(_) => {
                Kind::NotFound
            }
            Self::Validation(_) => Kind::Validation,
        }
    }
}
