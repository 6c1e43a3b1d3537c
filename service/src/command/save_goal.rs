//! [`Command`] for setting a [`Goal`] of a [`Period`].

use common::{
    operations::{By, Insert, Select},
    Money, Period,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{goal, Goal},
    error::{Categorize, Kind},
    infra::{database, Database},
    Clock, Service,
};

use super::Command;

/// [`Command`] for setting a [`Goal`] of a [`Period`].
///
/// Replaces the existing [`Goal`] of the same [`Period`], if any, keeping its
/// ID.
#[derive(Clone, Copy, Debug)]
pub struct SaveGoal {
    /// [`Period`] of the [`Goal`].
    pub period: Period,

    /// Targeted revenue.
    pub target_amount: Money,

    /// Targeted number of deals.
    pub target_count: u32,
}

impl<Db, Clk> Command<SaveGoal> for Service<Db, Clk>
where
    Db: Database<
            Select<By<Option<Goal>, Period>>,
            Ok = Option<Goal>,
            Err = Traced<database::Error>,
        > + Database<Insert<Goal>, Ok = (), Err = Traced<database::Error>>,
    Clk: Clock,
{
    type Ok = Goal;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: SaveGoal) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let SaveGoal {
            period,
            target_amount,
            target_count,
        } = cmd;

        let target_amount = goal::TargetAmount::new(target_amount)
            .ok_or(E::NonPositiveTarget(target_amount))
            .map_err(tracerr::wrap!())?;

        let existing = self
            .database()
            .execute(Select(By::<Option<Goal>, _>::new(period)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let goal = Goal {
            id: existing.map_or_else(goal::Id::new, |g| g.id),
            period,
            target_amount,
            target_count,
            created_at: self.clock().now().coerce(),
        };

        self.database()
            .execute(Insert(goal))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(goal)
    }
}

/// Error of [`SaveGoal`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Targeted revenue is not positive.
    #[display("`Goal` target amount must be positive, but is {_0}")]
    NonPositiveTarget(#[error(not(source))] Money),
}

impl Categorize for ExecutionError {
    fn kind(&self) -> Kind {
        match self {
            Self::Db(e) => e.kind(),
            Self::NonPositiveTarget(_) => Kind::Validation,
        }
    }
}
