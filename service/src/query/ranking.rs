//! [`Rankings`] definition.

use std::ops::RangeInclusive;

use common::{
    operations::{By, Select},
    Date, Granularity, Period,
};
use tracerr::Traced;

use crate::{
    domain::Sale,
    infra::{database, Database},
    read::ranking::{self, Entry},
    Clock, Query, Service,
};

/// [`Query`] ranking agents by their revenue within the current calendar
/// month or year.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Rankings(pub Granularity);

impl<Db, Clk> Query<Rankings> for Service<Db, Clk>
where
    Db: Database<
        Select<By<Vec<Sale>, RangeInclusive<Date>>>,
        Ok = Vec<Sale>,
        Err = Traced<database::Error>,
    >,
    Clk: Clock,
{
    type Ok = Vec<Entry>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Rankings(granularity): Rankings,
    ) -> Result<Self::Ok, Self::Err> {
        let period = Period::of(granularity, self.clock().today());

        let sales = self
            .database()
            .execute(Select(By::<Vec<Sale>, _>::new(period.range())))
            .await
            .map_err(tracerr::wrap!())?;
        Ok(ranking::rank(period, &sales))
    }
}
