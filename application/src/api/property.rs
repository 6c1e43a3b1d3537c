//! [`Property`]-related API definitions.

use axum::{extract::Path, http::StatusCode, Extension, Json};
use axum_extra::extract::WithRejection;
use common::{unit::All, Date, DateTime, Money};
use serde::Serialize;
use service::{
    command,
    domain::{self, property},
    query, Command as _,
};

use crate::{define_error, AsError, Error, Service};

/// Property handled by the brokerage.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    /// ID of this [`Property`].
    pub id: property::Id,

    /// Name of this [`Property`].
    pub name: property::Name,

    /// Transaction mode of this [`Property`].
    pub mode: property::Mode,

    /// Current status of this [`Property`].
    pub status: property::Status,

    /// [`Date`] when the brokerage contract started.
    pub contract_started_on: Option<Date>,

    /// [`Date`] when the brokerage contract expires.
    pub contract_expires_on: Option<Date>,

    /// [`Date`] when the REINS listing must be renewed.
    pub reins_renewal_on: Option<Date>,

    /// Valuation amount of this [`Property`].
    pub valuation: Money,

    /// [`DateTime`] when this [`Property`] was created.
    pub created_at: DateTime,
}

impl From<domain::Property> for Property {
    fn from(property: domain::Property) -> Self {
        let domain::Property {
            id,
            name,
            mode,
            status,
            contract_started_on,
            contract_expires_on,
            reins_renewal_on,
            valuation,
            created_at,
        } = property;

        Self {
            id,
            name,
            mode,
            status,
            contract_started_on,
            contract_expires_on,
            reins_renewal_on,
            valuation,
            created_at: created_at.coerce(),
        }
    }
}

/// Lists all the [`Property`]s in their creation order.
///
/// # Errors
///
/// If the [`Service`] fails.
pub async fn list(
    Extension(service): Extension<Service>,
) -> Result<Json<Vec<Property>>, Error> {
    let properties = service
        .execute(query::properties::List::by(All))
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(properties.into_iter().map(Into::into).collect()))
}

/// Returns a single [`Property`].
///
/// # Errors
///
/// With `PROPERTY_NOT_EXISTS` code if there is no such [`Property`].
pub async fn get(
    Extension(service): Extension<Service>,
    WithRejection(Path(id), _): WithRejection<Path<property::Id>, Error>,
) -> Result<Json<Property>, Error> {
    service
        .execute(query::property::ById::by(id))
        .await
        .map_err(AsError::into_error)?
        .map(|p| Json(p.into()))
        .ok_or_else(|| PropertyError::NotExists.into())
}

/// Creates a new [`Property`].
///
/// # Errors
///
/// If the provided [`property::Draft`] is invalid.
#[tracing::instrument(skip_all, fields(name = draft.name.as_str()))]
pub async fn create(
    Extension(service): Extension<Service>,
    WithRejection(Json(draft), _): WithRejection<
        Json<property::Draft>,
        Error,
    >,
) -> Result<(StatusCode, Json<Property>), Error> {
    let property = service
        .execute(command::CreateProperty { draft })
        .await
        .map_err(AsError::into_error)?;

    Ok((StatusCode::CREATED, Json(property.into())))
}

/// Partially updates a [`Property`].
///
/// # Errors
///
/// If the [`Property`] does not exist, or its status cannot be changed as
/// requested.
#[tracing::instrument(skip_all, fields(property.id = %id))]
pub async fn update(
    Extension(service): Extension<Service>,
    WithRejection(Path(id), _): WithRejection<Path<property::Id>, Error>,
    WithRejection(Json(patch), _): WithRejection<
        Json<property::Patch>,
        Error,
    >,
) -> Result<Json<Property>, Error> {
    service
        .execute(command::UpdateProperty {
            property_id: id,
            patch,
        })
        .await
        .map(|p| Json(p.into()))
        .map_err(AsError::into_error)
}

/// Deletes a [`Property`].
///
/// # Errors
///
/// If the [`Property`] does not exist.
#[tracing::instrument(skip_all, fields(property.id = %id))]
pub async fn delete(
    Extension(service): Extension<Service>,
    WithRejection(Path(id), _): WithRejection<Path<property::Id>, Error>,
) -> Result<StatusCode, Error> {
    service
        .execute(command::DeleteProperty { property_id: id })
        .await
        .map_err(AsError::into_error)?;

    Ok(StatusCode::NO_CONTENT)
}

define_error! {
    enum PropertyError {
        #[code = "PROPERTY_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Property` does not exist"]
        NotExists,
    }
}
