//! [`Goal`]-related API definitions.

use axum::{extract::Path, Extension, Json};
use axum_extra::extract::WithRejection;
use common::{unit::All, DateTime, Granularity, Money, Period};
use serde::{Deserialize, Serialize};
use service::{
    command,
    domain::{self, goal},
    query,
    read::Progress,
    Command as _,
};

use crate::{define_error, AsError, Error, Service};

/// Sales target for a single [`Period`].
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    /// ID of this [`Goal`].
    pub id: goal::Id,

    /// [`Period`] this [`Goal`] is set for.
    pub period: Period,

    /// [`Granularity`] of the [`Period`].
    pub granularity: Granularity,

    /// Revenue to be reached within the [`Period`].
    pub target_amount: Money,

    /// Number of deals to be made within the [`Period`].
    pub target_count: u32,

    /// [`DateTime`] when this [`Goal`] was created.
    pub created_at: DateTime,
}

impl From<domain::Goal> for Goal {
    fn from(goal: domain::Goal) -> Self {
        Self {
            id: goal.id,
            period: goal.period,
            granularity: goal.kind(),
            target_amount: goal.target_amount.money(),
            target_count: goal.target_count,
            created_at: goal.created_at.coerce(),
        }
    }
}

/// Targets of a [`Goal`] to be saved.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Targets {
    /// Revenue to be reached.
    pub target_amount: Money,

    /// Number of deals to be made.
    #[serde(default)]
    pub target_count: u32,
}

/// Lists all the [`Goal`]s ordered by their periods.
///
/// # Errors
///
/// If the [`Service`] fails.
pub async fn list(
    Extension(service): Extension<Service>,
) -> Result<Json<Vec<Goal>>, Error> {
    let goals = service
        .execute(query::goals::List::by(All))
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(goals.into_iter().map(Into::into).collect()))
}

/// Sets the [`Goal`] of the provided [`Period`], replacing the existing one.
///
/// # Errors
///
/// If the provided [`Targets`] are not positive.
#[tracing::instrument(skip_all, fields(period = %period))]
pub async fn save(
    Extension(service): Extension<Service>,
    WithRejection(Path(period), _): WithRejection<Path<Period>, Error>,
    WithRejection(Json(targets), _): WithRejection<Json<Targets>, Error>,
) -> Result<Json<Goal>, Error> {
    let Targets {
        target_amount,
        target_count,
    } = targets;

    service
        .execute(command::SaveGoal {
            period,
            target_amount,
            target_count,
        })
        .await
        .map(|g| Json(g.into()))
        .map_err(AsError::into_error)
}

/// Returns the [`Progress`] towards the [`Goal`] of the provided [`Period`].
///
/// # Errors
///
/// With `GOAL_NOT_EXISTS` code if no [`Goal`] is set for the [`Period`].
pub async fn progress(
    Extension(service): Extension<Service>,
    WithRejection(Path(period), _): WithRejection<Path<Period>, Error>,
) -> Result<Json<Progress>, Error> {
    service
        .execute(query::GoalProgress(period))
        .await
        .map_err(AsError::into_error)?
        .map(Json)
        .ok_or_else(|| GoalError::NotExists.into())
}

define_error! {
    enum GoalError {
        #[code = "GOAL_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "No `Goal` is set for the period"]
        NotExists,
    }
}
