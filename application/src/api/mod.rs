//! HTTP JSON API definitions.

pub mod achievement;
pub mod goal;
pub mod notification;
pub mod property;
pub mod sale;
pub mod stats;

use axum::{
    routing::{get, post, put},
    Router,
};

pub use self::{
    achievement::Achievement, goal::Goal, notification::Notification,
    property::Property, sale::Sale,
};

/// Builds the [`Router`] of all the API routes, to be nested under `/api`.
///
/// Routes expect the [`Service`] to be provided as an [`Extension`].
///
/// [`Extension`]: axum::Extension
/// [`Service`]: crate::Service
#[must_use]
pub fn router() -> Router {
    Router::new()
        .route("/properties", get(property::list).post(property::create))
        .route(
            "/properties/:id",
            get(property::get)
                .patch(property::update)
                .delete(property::delete),
        )
        .route("/sales", get(sale::list).post(sale::create))
        .route(
            "/sales/:id",
            get(sale::get).patch(sale::update).delete(sale::delete),
        )
        .route("/sales/:id/toggle", post(sale::toggle))
        .route("/goals", get(goal::list))
        .route("/goals/:period", put(goal::save))
        .route("/goals/:period/progress", get(goal::progress))
        .route("/achievements", get(achievement::list))
        .route("/achievements/catalog", get(achievement::catalog))
        .route("/achievements/evaluate", post(achievement::evaluate))
        .route(
            "/notifications",
            get(notification::list).delete(notification::clear),
        )
        .route("/notifications/refresh", post(notification::refresh))
        .route("/notifications/:id/read", post(notification::read))
        .route("/stats/monthly/:month", get(stats::monthly))
        .route("/stats/yearly/:year", get(stats::yearly))
        .route("/stats/trend", get(stats::trend))
        .route("/stats/inventory", get(stats::inventory))
        .route("/stats/deadlines", get(stats::deadlines))
        .route("/stats/rankings", get(stats::rankings))
        .route("/stats/calendar/:month", get(stats::calendar))
}
