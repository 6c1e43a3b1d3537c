//! [`Notification`]-related API definitions.

use axum::{
    extract::{Path, Query},
    Extension, Json,
};
use axum_extra::extract::WithRejection;
use common::{unit::All, Date, DateTime};
use serde::{Deserialize, Serialize};
use service::{
    command,
    domain::{self, notification, property},
    query, Command as _,
};

use crate::{AsError, Error, Service};

/// Recorded notice about an upcoming property deadline.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// ID of this [`Notification`].
    pub id: notification::Id,

    /// [`Type`] of the deadline.
    #[serde(rename = "type")]
    pub kind: Type,

    /// ID of the property the deadline belongs to.
    pub property_id: property::Id,

    /// Name of the property the deadline belongs to.
    pub property_name: property::Name,

    /// Human-readable message.
    pub message: String,

    /// [`Date`] the deadline is due on.
    pub due_on: Date,

    /// Indicator whether the deadline was urgent when recorded.
    pub urgent: bool,

    /// Indicator whether this [`Notification`] has been read.
    pub read: bool,

    /// [`DateTime`] when this [`Notification`] was recorded.
    pub created_at: DateTime,
}

impl From<domain::Notification> for Notification {
    fn from(notification: domain::Notification) -> Self {
        let domain::Notification {
            id,
            property_id,
            property_name,
            kind,
            due_on,
            message,
            urgent,
            read,
            created_at,
        } = notification;

        Self {
            id,
            kind: kind.into(),
            property_id,
            property_name,
            message,
            due_on,
            urgent,
            read,
            created_at: created_at.coerce(),
        }
    }
}

/// Type of a [`Notification`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Type {
    /// Brokerage contract expiration.
    Contract,

    /// REINS listing renewal.
    Reins,
}

impl From<property::Deadline> for Type {
    fn from(deadline: property::Deadline) -> Self {
        match deadline {
            property::Deadline::ContractExpiration => Self::Contract,
            property::Deadline::ReinsRenewal => Self::Reins,
        }
    }
}

/// Lists all the [`Notification`]s, the most recently recorded first.
///
/// # Errors
///
/// If the [`Service`] fails.
pub async fn list(
    Extension(service): Extension<Service>,
) -> Result<Json<Vec<Notification>>, Error> {
    let notifications = service
        .execute(query::notifications::List::by(All))
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(notifications.into_iter().map(Into::into).collect()))
}

/// Parameters of [`refresh()`].
#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub struct RefreshParams {
    /// Number of days ahead to look for deadlines.
    ///
    /// The configured default is used if omitted.
    pub days: Option<u16>,
}

/// Records [`Notification`]s about upcoming deadlines, returning the newly
/// recorded ones.
///
/// # Errors
///
/// If the [`Service`] fails.
#[tracing::instrument(skip_all, fields(days = params.days))]
pub async fn refresh(
    Extension(service): Extension<Service>,
    WithRejection(Query(params), _): WithRejection<
        Query<RefreshParams>,
        Error,
    >,
) -> Result<Json<Vec<Notification>>, Error> {
    let fresh = service
        .execute(command::RefreshNotifications {
            notification_days: params.days,
        })
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(fresh.into_iter().map(Into::into).collect()))
}

/// Marks a [`Notification`] as read.
///
/// # Errors
///
/// If the [`Notification`] does not exist.
#[tracing::instrument(skip_all, fields(notification.id = %id))]
pub async fn read(
    Extension(service): Extension<Service>,
    WithRejection(Path(id), _): WithRejection<Path<notification::Id>, Error>,
) -> Result<Json<Notification>, Error> {
    service
        .execute(command::MarkNotificationAsRead {
            notification_id: id,
        })
        .await
        .map(|n| Json(n.into()))
        .map_err(AsError::into_error)
}

/// Result of [`clear()`].
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Cleared {
    /// Number of deleted [`Notification`]s.
    pub deleted: usize,
}

/// Deletes all the [`Notification`]s.
///
/// # Errors
///
/// If the [`Service`] fails.
#[tracing::instrument(skip_all)]
pub async fn clear(
    Extension(service): Extension<Service>,
) -> Result<Json<Cleared>, Error> {
    service
        .execute(command::ClearNotifications)
        .await
        .map(|deleted| Json(Cleared { deleted }))
        .map_err(AsError::into_error)
}

#[cfg(test)]
mod spec {
    use service::domain::property::Deadline;

    use super::Type;

    #[test]
    fn serializes_deadline_types() {
        assert_eq!(
            serde_json::to_value(Type::from(Deadline::ContractExpiration))
                .unwrap(),
            "contract",
        );
        assert_eq!(
            serde_json::to_value(Type::from(Deadline::ReinsRenewal)).unwrap(),
            "reins",
        );
    }
}
