//! [`Query`] collection related to the multiple [`Property`]s.

use common::{
    operations::{By, Select},
    unit::All,
};
use tracerr::Traced;

use crate::{
    domain::Property,
    infra::{database, Database},
    read::{Alert, Inventory},
    Clock, Query, Service,
};

use super::DatabaseQuery;

/// Queries all the [`Property`]s in their creation order.
pub type List = DatabaseQuery<By<Vec<Property>, All>>;

/// [`Query`] of the [`Inventory`] of all the [`Property`]s.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PropertyStats;

/// [`Query`] of [`Alert`]s about upcoming [`Property`] deadlines.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct UpcomingDeadlines {
    /// Number of days ahead to look for deadlines.
    ///
    /// [`Config::notification_days`] is used if [`None`].
    ///
    /// [`Config::notification_days`]: crate::Config::notification_days
    pub notification_days: Option<u16>,
}

impl<Db, Clk> Query<PropertyStats> for Service<Db, Clk>
where
    Db: Database<
        Select<By<Vec<Property>, All>>,
        Ok = Vec<Property>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Inventory;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: PropertyStats) -> Result<Self::Ok, Self::Err> {
        let properties = self
            .database()
            .execute(Select(By::<Vec<Property>, _>::new(All)))
            .await
            .map_err(tracerr::wrap!())?;
        Ok(Inventory::of(&properties))
    }
}

impl<Db, Clk> Query<UpcomingDeadlines> for Service<Db, Clk>
where
    Db: Database<
        Select<By<Vec<Property>, All>>,
        Ok = Vec<Property>,
        Err = Traced<database::Error>,
    >,
    Clk: Clock,
{
    type Ok = Vec<Alert>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        query: UpcomingDeadlines,
    ) -> Result<Self::Ok, Self::Err> {
        let days = query
            .notification_days
            .unwrap_or(self.config().notification_days);

        let properties = self
            .database()
            .execute(Select(By::<Vec<Property>, _>::new(All)))
            .await
            .map_err(tracerr::wrap!())?;
        Ok(Alert::upcoming(&properties, self.clock().today(), days))
    }
}
