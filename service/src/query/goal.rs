//! [`Query`] collection related to a single [`Goal`].

use std::ops::RangeInclusive;

use common::{
    operations::{By, Select},
    Date, Period,
};
use tracerr::Traced;

use crate::{
    domain::{Goal, Sale},
    infra::{database, Database},
    read::goal::Progress,
    Query, Service,
};

use super::DatabaseQuery;

/// Queries a [`Goal`] by its [`Period`].
pub type ByPeriod = DatabaseQuery<By<Option<Goal>, Period>>;

/// [`Query`] of the [`Progress`] of reaching the [`Goal`] of a [`Period`].
///
/// Returns [`None`] if no [`Goal`] is set for the [`Period`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct GoalProgress(pub Period);

impl<Db, Clk> Query<GoalProgress> for Service<Db, Clk>
where
    Db: Database<
            Select<By<Option<Goal>, Period>>,
            Ok = Option<Goal>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Sale>, RangeInclusive<Date>>>,
            Ok = Vec<Sale>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Option<Progress>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        GoalProgress(period): GoalProgress,
    ) -> Result<Self::Ok, Self::Err> {
        let Some(goal) = self
            .database()
            .execute(Select(By::<Option<Goal>, _>::new(period)))
            .await
            .map_err(tracerr::wrap!())?
        else {
            return Ok(None);
        };

        let sales = self
            .database()
            .execute(Select(By::<Vec<Sale>, _>::new(period.range())))
            .await
            .map_err(tracerr::wrap!())?;

        Ok(Some(Progress::of(&goal, &sales)))
    }
}
