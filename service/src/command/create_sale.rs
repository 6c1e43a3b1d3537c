//! [`Command`] for recording a new [`Sale`].

use common::operations::{By, Insert, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        achievement::Achievement,
        property::{self, Transition},
        sale::{self, Collection},
        Property, Sale,
    },
    error::{Categorize, Kind},
    infra::{database, Database},
    Clock, Service,
};

use super::{
    cascade_property_status, evaluate_achievements,
    outcome::{Cascade, Outcome},
    CascadePropertyStatus, Command, EvaluateAchievements,
};

/// [`Command`] for recording a new [`Sale`].
///
/// If the [`Sale`] is recorded as already collected, its linked [`Property`]
/// is completed. [`Achievement`]s are evaluated afterwards.
#[derive(Clone, Debug)]
pub struct CreateSale {
    /// Agent who made the [`Sale`].
    pub agent: sale::Agent,

    /// [`sale::Draft`] of the [`Sale`].
    pub draft: sale::Draft,
}

impl<Db, Clk> Command<CreateSale> for Service<Db, Clk>
where
    Db: Database<
            Select<By<Option<Property>, property::Id>>,
            Ok = Option<Property>,
            Err = Traced<database::Error>,
        > + Database<Insert<Sale>, Ok = (), Err = Traced<database::Error>>,
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

    async fn execute(&self, cmd: CreateSale) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateSale { agent, draft } = cmd;

        let (info, collection, details) = draft
            .validate(self.clock().today())
            .map_err(tracerr::from_and_wrap!(=> E))?;
        let sale = Sale::new(
            sale::Id::new(),
            agent,
            info,
            collection,
            details,
            self.clock().now().coerce(),
        );

        if let Some(property_id) = sale.property_id() {
            _ = self
                .database()
                .execute(Select(By::<Option<Property>, _>::new(property_id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .ok_or(E::PropertyNotExists(property_id))
                .map_err(tracerr::wrap!())?;
        }

        self.database()
            .execute(Insert(sale.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let cascade = match sale.collection {
            Collection::Collected { .. } => self.cascade(&sale).await,
            Collection::Pending => Cascade::NotRequired,
        };
        let achievements = self.evaluate().await;

        Ok(Outcome {
            sale,
            cascade,
            achievements,
        })
    }
}

/// Error of [`CreateSale`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Property`] with the provided ID does not exist.
    #[display("`Property(id: {_0})` does not exist")]
    PropertyNotExists(#[error(not(source))] property::Id),

    /// [`sale::Draft`] is invalid.
    #[display("Invalid `Sale`: {_0}")]
    #[from]
    Validation(sale::ValidationError),
}

impl Categorize for ExecutionError {
    fn kind(&self) -> Kind {
        match self {
            Self::Db(e) => e.kind(),
            Self::PropertyNotExists(_) => Kind::NotFound,
            Self::Validation(_) => Kind::Validation,
        }
    }
}
