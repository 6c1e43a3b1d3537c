//! [`Sale`]-related API definitions.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path, Query},
    http::StatusCode,
    Extension, Json,
};
use axum_extra::extract::WithRejection;
use common::{Date, DateTime, Money};
use serde::Serialize;
use service::{
    command::{self, Cascade, Evaluation},
    domain::{
        self, property,
        sale::{self, Transaction},
    },
    query,
    read::sale::list::Filter,
    Command as _,
};

use crate::{api, define_error, AsError, Error, Service};

/// Name of the HTTP header identifying the agent making a request.
pub const AGENT_HEADER: &str = "X-Agent";

/// Recorded sale transaction of the brokerage.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    /// ID of this [`Sale`].
    pub id: sale::Id,

    /// Bookkeeping number of this [`Sale`].
    pub sale_number: Option<sale::Number>,

    /// Deal name of this [`Sale`].
    pub deal_name: Option<sale::DealName>,

    /// Human-readable title of this [`Sale`].
    pub title: String,

    /// [`Date`] this [`Sale`] is booked on.
    pub date: Date,

    /// Customer of this [`Sale`].
    pub customer_name: sale::CustomerName,

    /// Free-form notes of this [`Sale`].
    pub notes: Option<sale::Notes>,

    /// Agent who made this [`Sale`].
    pub agent: sale::Agent,

    /// Collection status of this [`Sale`] proceeds.
    pub collection_status: sale::CollectionStatus,

    /// [`Date`] the proceeds were received on.
    pub collection_date: Option<Date>,

    /// Profit of this [`Sale`].
    pub profit: Money,

    /// Variant-specific details of this [`Sale`].
    #[serde(flatten)]
    pub details: Details,

    /// [`DateTime`] when this [`Sale`] was created.
    pub created_at: DateTime,
}

impl From<domain::Sale> for Sale {
    fn from(sale: domain::Sale) -> Self {
        Self {
            id: sale.id,
            title: sale.title().to_owned(),
            collection_status: sale.collection_status(),
            collection_date: sale.collection.date(),
            profit: sale.profit(),
            details: sale.details().into(),
            created_at: sale.created_at.coerce(),
            sale_number: sale.number,
            deal_name: sale.deal_name,
            date: sale.date,
            customer_name: sale.customer_name,
            notes: sale.notes,
            agent: sale.agent,
        }
    }
}

/// Variant-specific details of a [`Sale`], discriminated by its `type`.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Details {
    /// Property sale or brokerage deal.
    #[serde(rename = "realestate", rename_all = "camelCase")]
    RealEstate {
        /// ID of the linked property.
        property_id: Option<property::Id>,

        /// Name of the property.
        property_name: sale::PropertyName,

        /// Sale price.
        sale_price: Money,

        /// Side of the brokerage in the deal.
        transaction_type: sale::TransactionType,

        /// Purchase price, for the seller side only.
        #[serde(skip_serializing_if = "Option::is_none")]
        purchase_price: Option<Money>,

        /// Commission, for the mediating side only.
        #[serde(skip_serializing_if = "Option::is_none")]
        commission: Option<Money>,

        /// Other expenses of the deal.
        other_expenses: Money,

        /// Settlement [`Date`].
        settlement_date: Date,

        /// Loan condition [`Date`].
        loan_condition_date: Option<Date>,
    },

    /// Renovation job.
    #[serde(rename_all = "camelCase")]
    Renovation {
        /// Name of the property.
        property_name: sale::PropertyName,

        /// Cost of the job.
        cost: Money,

        /// Price charged for the job.
        price: Money,

        /// Contractor doing the job.
        contractor: Option<sale::Contractor>,

        /// Content of the job.
        content: sale::Description,
    },

    /// Any other income.
    #[serde(rename_all = "camelCase")]
    Other {
        /// Kind of the income.
        sub_type: sale::SubKind,

        /// Amount of the income.
        amount: Money,

        /// Description of the income.
        description: sale::Description,
    },
}

impl From<&sale::Details> for Details {
    fn from(details: &sale::Details) -> Self {
        match details {
            sale::Details::RealEstate(d) => {
                let (purchase_price, commission) = match d.transaction {
                    Transaction::Seller { purchase_price } => {
                        (Some(purchase_price), None)
                    }
                    Transaction::Brokerage { commission } => {
                        (None, Some(commission))
                    }
                };
                Self::RealEstate {
                    property_id: d.property_id,
                    property_name: d.property_name.clone(),
                    sale_price: d.sale_price,
                    transaction_type: d.transaction.kind(),
                    purchase_price,
                    commission,
                    other_expenses: d.other_expenses,
                    settlement_date: d.settlement_date,
                    loan_condition_date: d.loan_condition_date,
                }
            }
            sale::Details::Renovation(d) => Self::Renovation {
                property_name: d.property_name.clone(),
                cost: d.cost,
                price: d.price,
                contractor: d.contractor.clone(),
                content: d.content.clone(),
            },
            sale::Details::Other(d) => Self::Other {
                sub_type: d.sub_kind,
                amount: d.amount,
                description: d.description.clone(),
            },
        }
    }
}

/// Result of a [`Sale`] mutation along with its side effects.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Outcome {
    /// Mutated [`Sale`].
    pub sale: Sale,

    /// Result of cascading onto the linked property.
    pub cascade: CascadeResult,

    /// Result of evaluating achievements.
    pub achievements: EvaluationResult,
}

impl From<command::Outcome> for Outcome {
    fn from(outcome: command::Outcome) -> Self {
        let command::Outcome {
            sale,
            cascade,
            achievements,
        } = outcome;

        Self {
            sale: sale.into(),
            cascade: cascade.into(),
            achievements: achievements.into(),
        }
    }
}

/// Result of cascading a [`Sale`] collection onto its linked property.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "result", rename_all = "camelCase")]
pub enum CascadeResult {
    /// No cascade was required.
    NotRequired,

    /// Property already had the required status.
    #[serde(rename_all = "camelCase")]
    Unchanged {
        /// ID of the linked property.
        property_id: property::Id,

        /// Status of the linked property.
        status: property::Status,
    },

    /// Property status was changed.
    #[serde(rename_all = "camelCase")]
    Applied {
        /// ID of the linked property.
        property_id: property::Id,

        /// Previous status of the linked property.
        from: property::Status,

        /// New status of the linked property.
        to: property::Status,
    },

    /// Cascade failed, while the [`Sale`] itself is saved.
    #[serde(rename_all = "camelCase")]
    Failed {
        /// ID of the linked property.
        property_id: property::Id,

        /// [`Error`] of the cascade.
        error: String,
    },
}

impl From<Cascade> for CascadeResult {
    fn from(cascade: Cascade) -> Self {
        match cascade {
            Cascade::NotRequired => Self::NotRequired,
            Cascade::Unchanged {
                property_id,
                status,
            } => Self::Unchanged {
                property_id,
                status,
            },
            Cascade::Applied {
                property_id,
                transition,
            } => Self::Applied {
                property_id,
                from: transition.from,
                to: transition.to,
            },
            Cascade::Failed { property_id, error } => Self::Failed {
                property_id,
                error: error.as_error().message,
            },
        }
    }
}

/// Result of evaluating achievements after a [`Sale`] mutation.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "result", rename_all = "camelCase")]
pub enum EvaluationResult {
    /// Evaluation was not performed.
    Skipped,

    /// Evaluation succeeded.
    Unlocked {
        /// Newly unlocked achievements.
        unlocked: Vec<api::Achievement>,
    },

    /// Evaluation failed, while the [`Sale`] itself is saved.
    Failed {
        /// [`Error`] of the evaluation.
        error: String,
    },
}

impl From<Evaluation> for EvaluationResult {
    fn from(evaluation: Evaluation) -> Self {
        match evaluation {
            Evaluation::Skipped => Self::Skipped,
            Evaluation::Unlocked(unlocked) => Self::Unlocked {
                unlocked: unlocked.into_iter().map(Into::into).collect(),
            },
            Evaluation::Failed(error) => Self::Failed {
                error: error.as_error().message,
            },
        }
    }
}

/// Agent making the current request, taken from the [`AGENT_HEADER`].
#[derive(Clone, Debug)]
pub struct Agent(pub sale::Agent);

#[async_trait]
impl<S> FromRequestParts<S> for Agent
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut http::request::Parts,
        _: &S,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AGENT_HEADER)
            .ok_or(AgentError::Required)?;
        header
            .to_str()
            .ok()
            .and_then(sale::Agent::new)
            .map(Self)
            .ok_or_else(|| AgentError::Invalid.into())
    }
}

/// Lists [`Sale`]s matching the provided [`Filter`], newest first.
///
/// # Errors
///
/// If the [`Service`] fails.
pub async fn list(
    Extension(service): Extension<Service>,
    WithRejection(Query(filter), _): WithRejection<Query<Filter>, Error>,
) -> Result<Json<Vec<Sale>>, Error> {
    let sales = service
        .execute(query::ListSales(filter))
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(sales.into_iter().map(Into::into).collect()))
}

/// Returns a single [`Sale`].
///
/// # Errors
///
/// With `SALE_NOT_EXISTS` code if there is no such [`Sale`].
pub async fn get(
    Extension(service): Extension<Service>,
    WithRejection(Path(id), _): WithRejection<Path<sale::Id>, Error>,
) -> Result<Json<Sale>, Error> {
    service
        .execute(query::sale::ById::by(id))
        .await
        .map_err(AsError::into_error)?
        .map(|s| Json(s.into()))
        .ok_or_else(|| SaleError::NotExists.into())
}

/// Records a new [`Sale`] made by the requesting [`Agent`].
///
/// # Errors
///
/// If the provided [`sale::Draft`] is invalid or references an unknown
/// property.
#[tracing::instrument(skip_all, fields(agent = agent.as_str()))]
pub async fn create(
    Extension(service): Extension<Service>,
    Agent(agent): Agent,
    WithRejection(Json(draft), _): WithRejection<Json<sale::Draft>, Error>,
) -> Result<(StatusCode, Json<Outcome>), Error> {
    let outcome = service
        .execute(command::CreateSale { agent, draft })
        .await
        .map_err(AsError::into_error)?;

    Ok((StatusCode::CREATED, Json(outcome.into())))
}

/// Partially updates a [`Sale`].
///
/// # Errors
///
/// If the [`Sale`] does not exist, or the provided [`sale::Patch`] is
/// invalid.
#[tracing::instrument(skip_all, fields(sale.id = %id))]
pub async fn update(
    Extension(service): Extension<Service>,
    WithRejection(Path(id), _): WithRejection<Path<sale::Id>, Error>,
    WithRejection(Json(patch), _): WithRejection<Json<sale::Patch>, Error>,
) -> Result<Json<Outcome>, Error> {
    service
        .execute(command::UpdateSale { sale_id: id, patch })
        .await
        .map(|o| Json(o.into()))
        .map_err(AsError::into_error)
}

/// Deletes a [`Sale`].
///
/// # Errors
///
/// If the [`Sale`] does not exist.
#[tracing::instrument(skip_all, fields(sale.id = %id))]
pub async fn delete(
    Extension(service): Extension<Service>,
    WithRejection(Path(id), _): WithRejection<Path<sale::Id>, Error>,
) -> Result<StatusCode, Error> {
    service
        .execute(command::DeleteSale { sale_id: id })
        .await
        .map_err(AsError::into_error)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Toggles the collection status of a [`Sale`].
///
/// # Errors
///
/// If the [`Sale`] does not exist, or its linked property is gone.
#[tracing::instrument(skip_all, fields(sale.id = %id))]
pub async fn toggle(
    Extension(service): Extension<Service>,
    WithRejection(Path(id), _): WithRejection<Path<sale::Id>, Error>,
) -> Result<Json<Outcome>, Error> {
    service
        .execute(command::ToggleCollectionStatus { sale_id: id })
        .await
        .map(|o| Json(o.into()))
        .map_err(AsError::into_error)
}

define_error! {
    enum SaleError {
        #[code = "SALE_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Sale` does not exist"]
        NotExists,
    }
}

define_error! {
    enum AgentError {
        #[code = "AGENT_REQUIRED"]
        #[status = BAD_REQUEST]
        #[message = "`X-Agent` header is required"]
        Required,

        #[code = "INVALID_AGENT"]
        #[status = BAD_REQUEST]
        #[message = "`X-Agent` header is not a valid agent name"]
        Invalid,
    }
}

#[cfg(test)]
mod spec {
    use common::{DateTime, Money};
    use serde_json::json;
    use service::domain::sale::{self, Collection, Draft};

    use super::Sale;

    #[test]
    fn serializes_flattened_details() {
        let draft: Draft = serde_json::from_value(json!({
            "type": "realestate",
            "date": "2024-06-10",
            "customerName": "Yamada",
            "propertyName": "Harbor Tower 12F",
            "salePrice": "30000000",
            "transactionType": "seller",
            "purchasePrice": "25000000",
            "otherExpenses": "500000",
            "settlementDate": "2024-06-30",
        }))
        .unwrap();
        let today = "2024-06-10".parse().unwrap();
        let (info, collection, details) = draft.validate(today).unwrap();
        assert_eq!(collection, Collection::Pending);
        let sale = sale::Sale::new(
            sale::Id::new(),
            sale::Agent::new("tanaka").unwrap(),
            info,
            collection,
            details,
            DateTime::UNIX_EPOCH.coerce(),
        );

        let json = serde_json::to_value(Sale::from(sale)).unwrap();

        assert_eq!(json["type"], "realestate");
        assert_eq!(json["title"], "Harbor Tower 12F");
        assert_eq!(json["transactionType"], "seller");
        assert_eq!(json["collectionStatus"], "pending");
        assert!(json.get("commission").is_none());
        let profit = serde_json::to_value(Money::from(4_500_000)).unwrap();
        assert_eq!(json["profit"], profit);
    }
}
