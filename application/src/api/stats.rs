//! Aggregated statistics API definitions.

use axum::{
    extract::{Path, Query},
    Extension, Json,
};
use axum_extra::extract::WithRejection;
use common::{Granularity, Year, YearMonth};
use serde::Deserialize;
use service::{
    query,
    read::{calendar, ranking, Alert, Inventory, Summary},
    Query as _,
};

use crate::{AsError, Error, Service};

/// Default number of months in a revenue trend.
const TREND_MONTHS: u8 = 12;

/// Returns the [`Summary`] of the provided month.
///
/// # Errors
///
/// If the [`Service`] fails.
pub async fn monthly(
    Extension(service): Extension<Service>,
    WithRejection(Path(month), _): WithRejection<Path<YearMonth>, Error>,
) -> Result<Json<Summary>, Error> {
    service
        .execute(query::MonthlyStats(month))
        .await
        .map(Json)
        .map_err(AsError::into_error)
}

/// Returns the [`Summary`] of the provided year.
///
/// # Errors
///
/// If the [`Service`] fails.
pub async fn yearly(
    Extension(service): Extension<Service>,
    WithRejection(Path(year), _): WithRejection<Path<Year>, Error>,
) -> Result<Json<Summary>, Error> {
    service
        .execute(query::YearlyStats(year))
        .await
        .map(Json)
        .map_err(AsError::into_error)
}

/// Parameters of a revenue [`trend()`].
#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub struct TrendParams {
    /// Number of months to summarize.
    pub months: Option<u8>,
}

/// Returns the monthly [`Summary`]s of the last months, oldest first.
///
/// # Errors
///
/// If the [`Service`] fails.
pub async fn trend(
    Extension(service): Extension<Service>,
    WithRejection(Query(params), _): WithRejection<Query<TrendParams>, Error>,
) -> Result<Json<Vec<Summary>>, Error> {
    service
        .execute(query::RevenueTrend {
            months: params.months.unwrap_or(TREND_MONTHS),
        })
        .await
        .map(Json)
        .map_err(AsError::into_error)
}

/// Returns the [`Inventory`] breakdown of all the properties.
///
/// # Errors
///
/// If the [`Service`] fails.
pub async fn inventory(
    Extension(service): Extension<Service>,
) -> Result<Json<Inventory>, Error> {
    service
        .execute(query::PropertyStats)
        .await
        .map(Json)
        .map_err(AsError::into_error)
}

/// Parameters of upcoming [`deadlines()`].
#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub struct DeadlinesParams {
    /// Number of days ahead to look for deadlines.
    ///
    /// Configured default is used if omitted.
    pub days: Option<u16>,
}

/// Returns the [`Alert`]s of upcoming property deadlines, most urgent first.
///
/// # Errors
///
/// If the [`Service`] fails.
pub async fn deadlines(
    Extension(service): Extension<Service>,
    WithRejection(Query(params), _): WithRejection<
        Query<DeadlinesParams>,
        Error,
    >,
) -> Result<Json<Vec<Alert>>, Error> {
    service
        .execute(query::UpcomingDeadlines {
            notification_days: params.days,
        })
        .await
        .map(Json)
        .map_err(AsError::into_error)
}

/// Parameters of agent [`rankings()`].
#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub struct RankingsParams {
    /// [`Granularity`] of the current period to rank within.
    ///
    /// [`Granularity::Monthly`] if omitted.
    pub granularity: Option<Granularity>,
}

/// Ranks agents by their revenue within the current period.
///
/// # Errors
///
/// If the [`Service`] fails.
pub async fn rankings(
    Extension(service): Extension<Service>,
    WithRejection(Query(params), _): WithRejection<
        Query<RankingsParams>,
        Error,
    >,
) -> Result<Json<Vec<ranking::Entry>>, Error> {
    service
        .execute(query::Rankings(
            params.granularity.unwrap_or(Granularity::Monthly),
        ))
        .await
        .map(Json)
        .map_err(AsError::into_error)
}

/// Lays out the sales of the provided month by days.
///
/// # Errors
///
/// If the [`Service`] fails.
pub async fn calendar(
    Extension(service): Extension<Service>,
    WithRejection(Path(month), _): WithRejection<Path<YearMonth>, Error>,
) -> Result<Json<Vec<calendar::Day>>, Error> {
    service
        .execute(query::SalesCalendar(month))
        .await
        .map(Json)
        .map_err(AsError::into_error)
}
