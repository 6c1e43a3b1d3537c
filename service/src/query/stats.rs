//! [`Query`] collection of revenue [`Summary`]s.

use std::ops::RangeInclusive;

use common::{
    operations::{By, Select},
    Date, Period, Year, YearMonth,
};
use tracerr::Traced;

use crate::{
    domain::Sale,
    infra::{database, Database},
    read::Summary,
    Clock, Query, Service,
};

/// [`Query`] of the [`Summary`] of a calendar month.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MonthlyStats(pub YearMonth);

/// [`Query`] of the [`Summary`] of a calendar year.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct YearlyStats(pub Year);

/// [`Query`] of monthly [`Summary`]s of the last calendar months, ending
/// with the current one, oldest first.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RevenueTrend {
    /// Number of months to summarize.
    pub months: u8,
}

impl<Db, Clk> Query<MonthlyStats> for Service<Db, Clk>
where
    Db: Database<
        Select<By<Vec<Sale>, RangeInclusive<Date>>>,
        Ok = Vec<Sale>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Summary;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        MonthlyStats(month): MonthlyStats,
    ) -> Result<Self::Ok, Self::Err> {
        summarize(self.database(), month.into()).await
    }
}

impl<Db, Clk> Query<YearlyStats> for Service<Db, Clk>
where
    Db: Database<
        Select<By<Vec<Sale>, RangeInclusive<Date>>>,
        Ok = Vec<Sale>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Summary;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        YearlyStats(year): YearlyStats,
    ) -> Result<Self::Ok, Self::Err> {
        summarize(self.database(), year.into()).await
    }
}

impl<Db, Clk> Query<RevenueTrend> for Service<Db, Clk>
where
    Db: Database<
        Select<By<Vec<Sale>, RangeInclusive<Date>>>,
        Ok = Vec<Sale>,
        Err = Traced<database::Error>,
    >,
    Clk: Clock,
{
    type Ok = Vec<Summary>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        RevenueTrend { months }: RevenueTrend,
    ) -> Result<Self::Ok, Self::Err> {
        let last = self.clock().today().year_month();
        let mut periods = Vec::with_capacity(months.into());
        let mut month = last;
        for _ in 0..months {
            periods.push(month);
            month = month.previous();
        }
        periods.reverse();

        let Some(first) = periods.first() else {
            return Ok(vec![]);
        };
        let sales = self
            .database()
            .execute(Select(By::<Vec<Sale>, _>::new(
                first.first_day()..=last.last_day(),
            )))
            .await
            .map_err(tracerr::wrap!())?;

        Ok(periods
            .into_iter()
            .map(|m| Summary::of(m.into(), &sales))
            .collect())
    }
}

/// Selects [`Sale`]s of the provided [`Period`] and summarizes them.
async fn summarize<Db>(
    db: &Db,
    period: Period,
) -> Result<Summary, Traced<database::Error>>
where
    Db: Database<
        Select<By<Vec<Sale>, RangeInclusive<Date>>>,
        Ok = Vec<Sale>,
        Err = Traced<database::Error>,
    >,
{
    let sales = db
        .execute(Select(By::<Vec<Sale>, _>::new(period.range())))
        .await
        .map_err(tracerr::wrap!())?;
    Ok(Summary::of(period, &sales))
}
