//! [`Query`] collection related to the multiple [`Sale`]s.

use std::ops::RangeInclusive;

use common::{
    operations::{By, Select},
    unit::All,
    Date, YearMonth,
};
use tracerr::Traced;

use crate::{
    domain::Sale,
    infra::{database, Database},
    read::{calendar, sale::list::Filter},
    Clock, Query, Service,
};

/// [`Query`] of [`Sale`]s passing a [`Filter`], newest first.
#[derive(Clone, Debug, Default)]
pub struct ListSales(pub Filter);

/// [`Query`] of a calendar of [`Sale`]s made within a month.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SalesCalendar(pub YearMonth);

impl<Db, Clk> Query<ListSales> for Service<Db, Clk>
where
    Db: Database<
        Select<By<Vec<Sale>, All>>,
        Ok = Vec<Sale>,
        Err = Traced<database::Error>,
    >,
    Clk: Clock,
{
    type Ok = Vec<Sale>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        ListSales(filter): ListSales,
    ) -> Result<Self::Ok, Self::Err> {
        let sales = self
            .database()
            .execute(Select(By::<Vec<Sale>, _>::new(All)))
            .await
            .map_err(tracerr::wrap!())?;
        Ok(filter.apply(sales, self.clock().today()))
    }
}

impl<Db, Clk> Query<SalesCalendar> for Service<Db, Clk>
where
    Db: Database<
        Select<By<Vec<Sale>, RangeInclusive<Date>>>,
        Ok = Vec<Sale>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Vec<calendar::Day>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        SalesCalendar(month): SalesCalendar,
    ) -> Result<Self::Ok, Self::Err> {
        let sales = self
            .database()
            .execute(Select(By::<Vec<Sale>, _>::new(month.range())))
            .await
            .map_err(tracerr::wrap!())?;
        Ok(calendar::layout(month, &sales))
    }
}
