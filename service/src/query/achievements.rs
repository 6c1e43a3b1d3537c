//! [`Query`] collection related to the multiple [`Achievement`]s.

use common::{
    operations::{By, Select},
    unit::All,
};
use tracerr::Traced;

use crate::{
    domain::Achievement,
    infra::{database, Database},
    read::achievement::{self, Entry},
    Query, Service,
};

use super::DatabaseQuery;

/// Queries all the unlocked [`Achievement`]s in their unlocking order.
pub type List = DatabaseQuery<By<Vec<Achievement>, All>>;

/// [`Query`] of the catalog of every known [`Achievement`] rule.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AchievementCatalog;

impl<Db, Clk> Query<AchievementCatalog> for Service<Db, Clk>
where
    Db: Database<
        Select<By<Vec<Achievement>, All>>,
        Ok = Vec<Achievement>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Vec<Entry>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: AchievementCatalog,
    ) -> Result<Self::Ok, Self::Err> {
        let unlocked = self
            .database()
            .execute(Select(By::<Vec<Achievement>, _>::new(All)))
            .await
            .map_err(tracerr::wrap!())?;
        Ok(achievement::catalog(&unlocked))
    }
}
