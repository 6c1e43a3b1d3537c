//! [`Achievement`]-related API definitions.

use axum::{Extension, Json};
use common::{unit::All, DateTime};
use serde::Serialize;
use service::{
    command,
    domain::{self, achievement},
    query, read, Command as _,
};

use crate::{AsError, Error, Service};

/// Unlocked achievement.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    /// Key of this [`Achievement`], unique among all the unlocked ones.
    pub key: achievement::Key,

    /// Name of this [`Achievement`].
    pub name: achievement::Name,

    /// Description of this [`Achievement`].
    pub description: achievement::Description,

    /// Icon of this [`Achievement`].
    pub icon: achievement::Icon,

    /// [`DateTime`] when this [`Achievement`] was unlocked.
    pub unlocked_at: DateTime,
}

impl From<domain::Achievement> for Achievement {
    fn from(achievement: domain::Achievement) -> Self {
        let domain::Achievement {
            key,
            name,
            description,
            icon,
            unlocked_at,
        } = achievement;

        Self {
            key,
            name,
            description,
            icon,
            unlocked_at: unlocked_at.coerce(),
        }
    }
}

/// Entry of the achievements catalog.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    /// Rule unlocking the [`Achievement`]s of this [`CatalogEntry`].
    pub rule: achievement::Rule,

    /// Title of the rule.
    pub name: &'static str,

    /// Description of the rule.
    pub description: &'static str,

    /// Icon of the rule.
    pub icon: &'static str,

    /// Indicator whether the rule may be unlocked once per period.
    pub periodic: bool,

    /// Already unlocked [`Achievement`]s of the rule.
    pub unlocked: Vec<Achievement>,
}

impl From<read::achievement::Entry> for CatalogEntry {
    fn from(entry: read::achievement::Entry) -> Self {
        let read::achievement::Entry {
            rule,
            name,
            description,
            icon,
            periodic,
            unlocked,
        } = entry;

        Self {
            rule,
            name,
            description,
            icon,
            periodic,
            unlocked: unlocked.into_iter().map(Into::into).collect(),
        }
    }
}

/// Lists all the unlocked [`Achievement`]s in their unlocking order.
///
/// # Errors
///
/// If the [`Service`] fails.
pub async fn list(
    Extension(service): Extension<Service>,
) -> Result<Json<Vec<Achievement>>, Error> {
    let achievements = service
        .execute(query::achievements::List::by(All))
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(achievements.into_iter().map(Into::into).collect()))
}

/// Returns the catalog of every known achievement rule.
///
/// # Errors
///
/// If the [`Service`] fails.
pub async fn catalog(
    Extension(service): Extension<Service>,
) -> Result<Json<Vec<CatalogEntry>>, Error> {
    let entries = service
        .execute(query::AchievementCatalog)
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(entries.into_iter().map(Into::into).collect()))
}

/// Evaluates achievement rules against the whole ledger, returning the newly
/// unlocked [`Achievement`]s.
///
/// # Errors
///
/// If the [`Service`] fails.
#[tracing::instrument(skip_all)]
pub async fn evaluate(
    Extension(service): Extension<Service>,
) -> Result<Json<Vec<Achievement>>, Error> {
    let unlocked = service
        .execute(command::EvaluateAchievements)
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(unlocked.into_iter().map(Into::into).collect()))
}
