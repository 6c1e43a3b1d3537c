//! [`Sale`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, define_text, unit, Date, DateTimeOf, Money};
use derive_more::{Display, Error, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{nullable, property};

/// Recorded sale transaction of the brokerage.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Sale {
    /// ID of this [`Sale`].
    pub id: Id,

    /// Bookkeeping [`Number`] of this [`Sale`], if any.
    pub number: Option<Number>,

    /// [`DealName`] of this [`Sale`], if any.
    pub deal_name: Option<DealName>,

    /// [`Date`] this [`Sale`] is booked on.
    pub date: Date,

    /// [`CustomerName`] of this [`Sale`].
    pub customer_name: CustomerName,

    /// Free-form [`Notes`] of this [`Sale`], if any.
    pub notes: Option<Notes>,

    /// [`Agent`] who made this [`Sale`].
    pub agent: Agent,

    /// [`Collection`] state of this [`Sale`] proceeds.
    pub collection: Collection,

    /// Variant-specific [`Details`] of this [`Sale`].
    details: Details,

    /// Profit of this [`Sale`] derived from its [`Details`].
    profit: Money,

    /// [`DateTime`] when this [`Sale`] was created.
    pub created_at: CreationDateTime,
}

impl Sale {
    /// Creates a new [`Sale`] deriving its profit from the provided
    /// [`Details`].
    #[must_use]
    pub fn new(
        id: Id,
        agent: Agent,
        info: Info,
        collection: Collection,
        details: Details,
        created_at: CreationDateTime,
    ) -> Self {
        let profit = details.profit();
        Self::from_stored(
            id, agent, info, collection, details, profit, created_at,
        )
    }

    /// Restores a [`Sale`] with the already derived `profit`.
    #[must_use]
    pub fn from_stored(
        id: Id,
        agent: Agent,
        info: Info,
        collection: Collection,
        details: Details,
        profit: Money,
        created_at: CreationDateTime,
    ) -> Self {
        let Info {
            number,
            deal_name,
            date,
            customer_name,
            notes,
        } = info;

        Self {
            id,
            number,
            deal_name,
            date,
            customer_name,
            notes,
            agent,
            collection,
            details,
            profit,
            created_at,
        }
    }

    /// Returns the [`Details`] of this [`Sale`].
    #[must_use]
    pub fn details(&self) -> &Details {
        &self.details
    }

    /// Returns the stored profit of this [`Sale`].
    #[must_use]
    pub fn profit(&self) -> Money {
        self.profit
    }

    /// Returns the [`Kind`] of this [`Sale`].
    #[must_use]
    pub fn kind(&self) -> Kind {
        self.details.kind()
    }

    /// Returns the ID of the [`Property`] this [`Sale`] is linked to, if any.
    ///
    /// [`Property`]: crate::domain::Property
    #[must_use]
    pub fn property_id(&self) -> Option<property::Id> {
        match &self.details {
            Details::RealEstate(d) => d.property_id,
            Details::Renovation(_) | Details::Other(_) => None,
        }
    }

    /// Returns the [`CollectionStatus`] of this [`Sale`].
    #[must_use]
    pub fn collection_status(&self) -> CollectionStatus {
        self.collection.status()
    }

    /// Returns the human-readable title of this [`Sale`].
    #[must_use]
    pub fn title(&self) -> &str {
        if let Some(name) = &self.deal_name {
            return name.as_str();
        }
        match &self.details {
            Details::RealEstate(d) => d.property_name.as_str(),
            Details::Renovation(d) => d.property_name.as_str(),
            Details::Other(_) => self.customer_name.as_str(),
        }
    }

    /// Replaces the [`Details`] of this [`Sale`] re-deriving its profit.
    pub fn replace_details(&mut self, details: Details) {
        self.profit = details.profit();
        self.details = details;
    }

    /// Applies the provided [`Patch`] to this [`Sale`].
    ///
    /// `today` is used as the collection [`Date`] when the [`Sale`] is marked
    /// as collected without an explicit one.
    ///
    /// # Errors
    ///
    /// If the [`Patch`] contains malformed values.
    pub fn apply(
        &mut self,
        patch: Patch,
        today: Date,
    ) -> Result<(), ValidationError> {
        let Patch {
            number,
            deal_name,
            date,
            customer_name,
            notes,
            collection_date,
            collection_status,
            details,
        } = patch;

        let details = details
            .map(|patch| {
                let mut draft = DetailsDraft::from(&self.details);
                draft.overlay(patch)?;
                draft.validate()
            })
            .transpose()?;

        if let Some(number) = number {
            self.number = optional_text("saleNumber", number, Number::new)?;
        }
        if let Some(name) = deal_name {
            self.deal_name = optional_text("dealName", name, DealName::new)?;
        }
        if let Some(date) = date {
            self.date = date;
        }
        if let Some(name) = customer_name {
            self.customer_name =
                required_text("customerName", Some(name), CustomerName::new)?;
        }
        if let Some(notes) = notes {
            self.notes = optional_text("notes", notes, Notes::new)?;
        }

        self.collection = match (collection_date, collection_status) {
            (Some(Some(on)), _) => Collection::Collected { on },
            (Some(None), _) | (None, Some(CollectionStatus::Pending)) => {
                Collection::Pending
            }
            (None, Some(CollectionStatus::Collected)) => match self.collection
            {
                c @ Collection::Collected { .. } => c,
                Collection::Pending => Collection::Collected { on: today },
            },
            (None, None) => self.collection,
        };

        if let Some(details) = details {
            self.replace_details(details);
        }

        Ok(())
    }
}

/// Common descriptive fields of a [`Sale`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Info {
    /// Bookkeeping [`Number`], if any.
    pub number: Option<Number>,

    /// [`DealName`], if any.
    pub deal_name: Option<DealName>,

    /// Booking [`Date`].
    pub date: Date,

    /// [`CustomerName`].
    pub customer_name: CustomerName,

    /// Free-form [`Notes`], if any.
    pub notes: Option<Notes>,
}

/// Collection state of [`Sale`] proceeds.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Collection {
    /// Proceeds are outstanding.
    Pending,

    /// Proceeds are received.
    Collected {
        /// [`Date`] the proceeds were received on.
        on: Date,
    },
}

impl Collection {
    /// Creates a new [`Collection`] out of its stored parts.
    ///
    /// [`None`] is returned if the parts are inconsistent with each other.
    #[must_use]
    pub fn from_parts(
        status: CollectionStatus,
        date: Option<Date>,
    ) -> Option<Self> {
        match (status, date) {
            (CollectionStatus::Pending, None) => Some(Self::Pending),
            (CollectionStatus::Collected, Some(on)) => {
                Some(Self::Collected { on })
            }
            (CollectionStatus::Pending, Some(_))
            | (CollectionStatus::Collected, None) => None,
        }
    }

    /// Returns the [`CollectionStatus`] of this [`Collection`].
    #[must_use]
    pub const fn status(self) -> CollectionStatus {
        match self {
            Self::Pending => CollectionStatus::Pending,
            Self::Collected { .. } => CollectionStatus::Collected,
        }
    }

    /// Returns the collection [`Date`], if collected.
    #[must_use]
    pub const fn date(self) -> Option<Date> {
        match self {
            Self::Pending => None,
            Self::Collected { on } => Some(on),
        }
    }

    /// Returns the toggled [`Collection`]: collected `today` if pending, and
    /// pending otherwise.
    #[must_use]
    pub const fn toggled(self, today: Date) -> Self {
        match self {
            Self::Pending => Self::Collected { on: today },
            Self::Collected { .. } => Self::Pending,
        }
    }
}

/// Variant-specific details of a [`Sale`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Details {
    /// Property sale or brokerage deal.
    RealEstate(RealEstate),

    /// Renovation job.
    Renovation(Renovation),

    /// Any other income.
    Other(OtherIncome),
}

impl Details {
    /// Returns the [`Kind`] of these [`Details`].
    #[must_use]
    pub const fn kind(&self) -> Kind {
        match self {
            Self::RealEstate(_) => Kind::RealEstate,
            Self::Renovation(_) => Kind::Renovation,
            Self::Other(_) => Kind::Other,
        }
    }

    /// Derives the profit out of these [`Details`].
    #[must_use]
    pub fn profit(&self) -> Money {
        match self {
            Self::RealEstate(d) => match d.transaction {
                Transaction::Seller { purchase_price } => {
                    d.sale_price - purchase_price - d.other_expenses
                }
                Transaction::Brokerage { commission } => {
                    commission - d.other_expenses
                }
            },
            Self::Renovation(d) => d.price - d.cost,
            Self::Other(d) => d.amount,
        }
    }
}

/// [`Details`] of a property sale or brokerage deal.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RealEstate {
    /// ID of the linked [`Property`], if any.
    ///
    /// [`Property`]: crate::domain::Property
    pub property_id: Option<property::Id>,

    /// [`PropertyName`] the deal is about.
    pub property_name: PropertyName,

    /// Price the property is sold for.
    pub sale_price: Money,

    /// [`Transaction`] side of the brokerage.
    pub transaction: Transaction,

    /// Other expenses of the deal.
    pub other_expenses: Money,

    /// [`Date`] of the deal settlement.
    pub settlement_date: Date,

    /// [`Date`] of the loan condition deadline, if any.
    pub loan_condition_date: Option<Date>,
}

/// Side of the brokerage in a [`RealEstate`] deal.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Transaction {
    /// The brokerage owned and resold the property.
    Seller {
        /// Price the property was purchased for.
        purchase_price: Money,
    },

    /// The brokerage mediated the deal.
    Brokerage {
        /// Commission earned.
        commission: Money,
    },
}

impl Transaction {
    /// Returns the [`TransactionType`] of this [`Transaction`].
    #[must_use]
    pub const fn kind(self) -> TransactionType {
        match self {
            Self::Seller { .. } => TransactionType::Seller,
            Self::Brokerage { .. } => TransactionType::Other,
        }
    }
}

/// [`Details`] of a renovation job.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Renovation {
    /// [`PropertyName`] the job is done on.
    pub property_name: PropertyName,

    /// Cost of the job.
    pub cost: Money,

    /// Price charged for the job.
    pub price: Money,

    /// [`Contractor`] doing the job, if any.
    pub contractor: Option<Contractor>,

    /// [`Description`] of the job content.
    pub content: Description,
}

/// [`Details`] of any other income.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OtherIncome {
    /// [`SubKind`] of the income.
    pub sub_kind: SubKind,

    /// Amount of the income.
    pub amount: Money,

    /// [`Description`] of the income.
    pub description: Description,
}

/// ID of a [`Sale`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

define_text! {
    #[doc = "Bookkeeping number of a [`Sale`]."]
    struct Number(max = 64);
}

define_text! {
    #[doc = "Deal name of a [`Sale`]."]
    struct DealName(max = 512);
}

define_text! {
    #[doc = "Customer name of a [`Sale`]."]
    struct CustomerName(max = 512);
}

define_text! {
    #[doc = "Notes of a [`Sale`]."]
    struct Notes(max = 4096);
}

define_text! {
    #[doc = "Identity of an agent who made a [`Sale`]."]
    struct Agent(max = 128);
}

define_text! {
    #[doc = "Name of a property a [`Sale`] is about."]
    struct PropertyName(max = 512);
}

define_text! {
    #[doc = "Name of a renovation contractor."]
    struct Contractor(max = 512);
}

define_text! {
    #[doc = "Description of a [`Sale`] content."]
    struct Description(max = 4096);
}

define_kind! {
    #[doc = "Kind of a [`Sale`]."]
    enum Kind {
        #[doc = "Property sale or brokerage deal."]
        RealEstate = 1 => "realestate",

        #[doc = "Renovation job."]
        Renovation = 2 => "renovation",

        #[doc = "Any other income."]
        Other = 3 => "other",
    }
}

define_kind! {
    #[doc = "Status of a [`Sale`] proceeds collection."]
    enum CollectionStatus {
        #[doc = "Proceeds are outstanding."]
        Pending = 1 => "pending",

        #[doc = "Proceeds are received."]
        Collected = 2 => "collected",
    }
}

define_kind! {
    #[doc = "Type of a [`RealEstate`] [`Transaction`]."]
    enum TransactionType {
        #[doc = "The brokerage owned and resold the property."]
        Seller = 1 => "seller",

        #[doc = "The brokerage mediated the deal."]
        Other = 2 => "other",
    }
}

define_kind! {
    #[doc = "Kind of [`OtherIncome`]."]
    enum SubKind {
        #[doc = "Consulting fee."]
        Consulting = 1 => "consulting",

        #[doc = "Referral fee."]
        Referral = 2 => "referral",

        #[doc = "Management fee."]
        Management = 3 => "management",

        #[doc = "Anything else."]
        Other = 4 => "other",
    }
}

/// [`DateTime`] when a [`Sale`] was created.
pub type CreationDateTime = DateTimeOf<(Sale, unit::Creation)>;

/// Input for recording a new [`Sale`].
///
/// Values are validated by [`Draft::validate()`].
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    /// Bookkeeping number.
    #[serde(rename = "saleNumber")]
    pub number: Option<String>,

    /// Deal name.
    pub deal_name: Option<String>,

    /// Booking [`Date`].
    pub date: Option<Date>,

    /// Customer name.
    pub customer_name: Option<String>,

    /// Free-form notes.
    pub notes: Option<String>,

    /// Collection [`Date`], marking the [`Sale`] as collected if present.
    pub collection_date: Option<Date>,

    /// Explicit [`CollectionStatus`].
    pub collection_status: Option<CollectionStatus>,

    /// Variant-specific details.
    #[serde(flatten)]
    pub details: DetailsDraft,
}

impl Draft {
    /// Validates this [`Draft`].
    ///
    /// `today` is used as the collection [`Date`] when the [`Draft`] is marked
    /// as collected without an explicit one.
    ///
    /// # Errors
    ///
    /// If any required field is missing or malformed.
    pub fn validate(
        self,
        today: Date,
    ) -> Result<(Info, Collection, Details), ValidationError> {
        let Self {
            number,
            deal_name,
            date,
            customer_name,
            notes,
            collection_date,
            collection_status,
            details,
        } = self;

        let info = Info {
            number: optional_text("saleNumber", number, Number::new)?,
            deal_name: optional_text("dealName", deal_name, DealName::new)?,
            date: date.ok_or(ValidationError::Missing("date"))?,
            customer_name: required_text(
                "customerName",
                customer_name,
                CustomerName::new,
            )?,
            notes: optional_text("notes", notes, Notes::new)?,
        };
        let collection = match (collection_date, collection_status) {
            (Some(on), _) => Collection::Collected { on },
            (None, Some(CollectionStatus::Collected)) => {
                Collection::Collected { on: today }
            }
            (None, Some(CollectionStatus::Pending) | None) => {
                Collection::Pending
            }
        };

        Ok((info, collection, details.validate()?))
    }
}

/// Unvalidated variant-specific details of a [`Sale`], discriminated by its
/// `type`.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DetailsDraft {
    /// Property sale or brokerage deal.
    #[serde(rename = "realestate", rename_all = "camelCase")]
    RealEstate {
        /// ID of the linked property.
        property_id: Option<property::Id>,

        /// Name of the property.
        property_name: Option<String>,

        /// Sale price.
        sale_price: Option<Money>,

        /// [`TransactionType`].
        transaction_type: Option<TransactionType>,

        /// Purchase price, required for [`TransactionType::Seller`].
        purchase_price: Option<Money>,

        /// Commission, required for [`TransactionType::Other`].
        commission: Option<Money>,

        /// Other expenses, zero if absent.
        other_expenses: Option<Money>,

        /// Settlement [`Date`].
        settlement_date: Option<Date>,

        /// Loan condition [`Date`].
        loan_condition_date: Option<Date>,
    },

    /// Renovation job.
    #[serde(rename_all = "camelCase")]
    Renovation {
        /// Name of the property.
        property_name: Option<String>,

        /// Cost of the job.
        cost: Option<Money>,

        /// Price of the job.
        price: Option<Money>,

        /// Contractor name.
        contractor: Option<String>,

        /// Content description.
        content: Option<String>,
    },

    /// Any other income.
    #[serde(rename_all = "camelCase")]
    Other {
        /// [`SubKind`] of the income.
        sub_type: Option<SubKind>,

        /// Amount of the income.
        amount: Option<Money>,

        /// Description of the income.
        description: Option<String>,
    },
}

impl DetailsDraft {
    /// Returns the [`Kind`] of this [`DetailsDraft`].
    #[must_use]
    pub const fn kind(&self) -> Kind {
        match self {
            Self::RealEstate { .. } => Kind::RealEstate,
            Self::Renovation { .. } => Kind::Renovation,
            Self::Other { .. } => Kind::Other,
        }
    }

    /// Validates this [`DetailsDraft`] into [`Details`].
    ///
    /// # Errors
    ///
    /// If any required field is missing or malformed.
    pub fn validate(self) -> Result<Details, ValidationError> {
        use ValidationError as E;

        Ok(match self {
            Self::RealEstate {
                property_id,
                property_name,
                sale_price,
                transaction_type,
                purchase_price,
                commission,
                other_expenses,
                settlement_date,
                loan_condition_date,
            } => {
                let transaction = match transaction_type
                    .ok_or(E::Missing("transactionType"))?
                {
                    TransactionType::Seller => Transaction::Seller {
                        purchase_price: amount(
                            "purchasePrice",
                            purchase_price,
                        )?,
                    },
                    TransactionType::Other => Transaction::Brokerage {
                        commission: amount("commission", commission)?,
                    },
                };
                Details::RealEstate(RealEstate {
                    property_id,
                    property_name: required_text(
                        "propertyName",
                        property_name,
                        PropertyName::new,
                    )?,
                    sale_price: amount("salePrice", sale_price)?,
                    transaction,
                    other_expenses: amount(
                        "otherExpenses",
                        Some(other_expenses.unwrap_or(Money::ZERO)),
                    )?,
                    settlement_date: settlement_date
                        .ok_or(E::Missing("settlementDate"))?,
                    loan_condition_date,
                })
            }
            Self::Renovation {
                property_name,
                cost,
                price,
                contractor,
                content,
            } => Details::Renovation(Renovation {
                property_name: required_text(
                    "propertyName",
                    property_name,
                    PropertyName::new,
                )?,
                cost: amount("cost", cost)?,
                price: amount("price", price)?,
                contractor: optional_text(
                    "contractor",
                    contractor,
                    Contractor::new,
                )?,
                content: required_text("content", content, Description::new)?,
            }),
            Self::Other {
                sub_type,
                amount: value,
                description,
            } => Details::Other(OtherIncome {
                sub_kind: sub_type.ok_or(E::Missing("subType"))?,
                amount: amount("amount", value)?,
                description: required_text(
                    "description",
                    description,
                    Description::new,
                )?,
            }),
        })
    }

    /// Overlays the provided [`DetailsPatch`] onto this [`DetailsDraft`].
    ///
    /// # Errors
    ///
    /// If the [`DetailsPatch`] is of another [`Kind`].
    fn overlay(&mut self, patch: DetailsPatch) -> Result<(), ValidationError> {
        /// Replaces the `dst` value if the `src` one is provided.
        fn set<T>(dst: &mut T, src: Option<T>) {
            if let Some(v) = src {
                *dst = v;
            }
        }

        match (self, patch) {
            (
                Self::RealEstate {
                    property_id,
                    property_name,
                    sale_price,
                    transaction_type,
                    purchase_price,
                    commission,
                    other_expenses,
                    settlement_date,
                    loan_condition_date,
                },
                DetailsPatch::RealEstate {
                    property_id: new_property_id,
                    property_name: new_property_name,
                    sale_price: new_sale_price,
                    transaction_type: new_transaction_type,
                    purchase_price: new_purchase_price,
                    commission: new_commission,
                    other_expenses: new_other_expenses,
                    settlement_date: new_settlement_date,
                    loan_condition_date: new_loan_condition_date,
                },
            ) => {
                set(property_id, new_property_id);
                set(property_name, new_property_name.map(Some));
                set(sale_price, new_sale_price.map(Some));
                set(transaction_type, new_transaction_type.map(Some));
                set(purchase_price, new_purchase_price.map(Some));
                set(commission, new_commission.map(Some));
                set(other_expenses, new_other_expenses.map(Some));
                set(settlement_date, new_settlement_date.map(Some));
                set(loan_condition_date, new_loan_condition_date);
            }
            (
                Self::Renovation {
                    property_name,
                    cost,
                    price,
                    contractor,
                    content,
                },
                DetailsPatch::Renovation {
                    property_name: new_property_name,
                    cost: new_cost,
                    price: new_price,
                    contractor: new_contractor,
                    content: new_content,
                },
            ) => {
                set(property_name, new_property_name.map(Some));
                set(cost, new_cost.map(Some));
                set(price, new_price.map(Some));
                set(contractor, new_contractor);
                set(content, new_content.map(Some));
            }
            (
                Self::Other {
                    sub_type,
                    amount,
                    description,
                },
                DetailsPatch::Other {
                    sub_type: new_sub_type,
                    amount: new_amount,
                    description: new_description,
                },
            ) => {
                set(sub_type, new_sub_type.map(Some));
                set(amount, new_amount.map(Some));
                set(description, new_description.map(Some));
            }
            (this, patch) => {
                return Err(ValidationError::KindMismatch {
                    expected: this.kind(),
                    actual: patch.kind(),
                });
            }
        }

        Ok(())
    }
}

impl From<&Details> for DetailsDraft {
    fn from(details: &Details) -> Self {
        match details {
            Details::RealEstate(d) => {
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
                    property_name: Some(d.property_name.to_string()),
                    sale_price: Some(d.sale_price),
                    transaction_type: Some(d.transaction.kind()),
                    purchase_price,
                    commission,
                    other_expenses: Some(d.other_expenses),
                    settlement_date: Some(d.settlement_date),
                    loan_condition_date: d.loan_condition_date,
                }
            }
            Details::Renovation(d) => Self::Renovation {
                property_name: Some(d.property_name.to_string()),
                cost: Some(d.cost),
                price: Some(d.price),
                contractor: d.contractor.as_ref().map(ToString::to_string),
                content: Some(d.content.to_string()),
            },
            Details::Other(d) => Self::Other {
                sub_type: Some(d.sub_kind),
                amount: Some(d.amount),
                description: Some(d.description.to_string()),
            },
        }
    }
}

/// Partial update of a [`Sale`].
///
/// [`None`] fields are left untouched, while `Some(None)` clears the
/// optional ones.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patch {
    /// New bookkeeping number.
    #[serde(default, rename = "saleNumber", deserialize_with = "nullable")]
    pub number: Option<Option<String>>,

    /// New deal name.
    #[serde(default, deserialize_with = "nullable")]
    pub deal_name: Option<Option<String>>,

    /// New booking [`Date`].
    pub date: Option<Date>,

    /// New customer name.
    pub customer_name: Option<String>,

    /// New notes.
    #[serde(default, deserialize_with = "nullable")]
    pub notes: Option<Option<String>>,

    /// New collection [`Date`].
    ///
    /// Takes precedence over the [`Patch::collection_status`], so clearing it
    /// always leaves the [`Sale`] pending.
    #[serde(default, deserialize_with = "nullable")]
    pub collection_date: Option<Option<Date>>,

    /// New [`CollectionStatus`].
    pub collection_status: Option<CollectionStatus>,

    /// New variant-specific details.
    #[serde(flatten)]
    pub details: Option<DetailsPatch>,
}

/// Partial update of [`Details`], discriminated by its `type`.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DetailsPatch {
    /// Property sale or brokerage deal.
    #[serde(rename = "realestate", rename_all = "camelCase")]
    RealEstate {
        /// New linked property.
        #[serde(default, deserialize_with = "nullable")]
        property_id: Option<Option<property::Id>>,

        /// New property name.
        property_name: Option<String>,

        /// New sale price.
        sale_price: Option<Money>,

        /// New [`TransactionType`].
        transaction_type: Option<TransactionType>,

        /// New purchase price.
        purchase_price: Option<Money>,

        /// New commission.
        commission: Option<Money>,

        /// New other expenses.
        other_expenses: Option<Money>,

        /// New settlement [`Date`].
        settlement_date: Option<Date>,

        /// New loan condition [`Date`].
        #[serde(default, deserialize_with = "nullable")]
        loan_condition_date: Option<Option<Date>>,
    },

    /// Renovation job.
    #[serde(rename_all = "camelCase")]
    Renovation {
        /// New property name.
        property_name: Option<String>,

        /// New cost.
        cost: Option<Money>,

        /// New price.
        price: Option<Money>,

        /// New contractor.
        #[serde(default, deserialize_with = "nullable")]
        contractor: Option<Option<String>>,

        /// New content description.
        content: Option<String>,
    },

    /// Any other income.
    #[serde(rename_all = "camelCase")]
    Other {
        /// New [`SubKind`].
        sub_type: Option<SubKind>,

        /// New amount.
        amount: Option<Money>,

        /// New description.
        description: Option<String>,
    },
}

impl DetailsPatch {
    /// Returns the [`Kind`] of this [`DetailsPatch`].
    #[must_use]
    pub const fn kind(&self) -> Kind {
        match self {
            Self::RealEstate { .. } => Kind::RealEstate,
            Self::Renovation { .. } => Kind::Renovation,
            Self::Other { .. } => Kind::Other,
        }
    }
}

/// Error of validating [`Sale`] input.
#[derive(Clone, Copy, Debug, Display, Error, Eq, PartialEq)]
pub enum ValidationError {
    /// Required field is missing or blank.
    #[display("`{_0}` is required")]
    Missing(#[error(not(source))] &'static str),

    /// Field value is malformed.
    #[display("`{_0}` is malformed")]
    Invalid(#[error(not(source))] &'static str),

    /// Amount field is negative.
    #[display("`{_0}` cannot be negative")]
    Negative(#[error(not(source))] &'static str),

    /// Input of one [`Kind`] is applied to a [`Sale`] of another one.
    #[display("`{actual}` details cannot be applied to a `{expected}` sale")]
    KindMismatch {
        /// [`Kind`] of the [`Sale`].
        expected: Kind,

        /// [`Kind`] of the input.
        actual: Kind,
    },
}

/// Validates the provided optional text `raw` value.
///
/// Blank values are treated as absent.
fn optional_text<T>(
    field: &'static str,
    raw: Option<String>,
    new: impl FnOnce(String) -> Option<T>,
) -> Result<Option<T>, ValidationError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    new(trimmed.to_owned())
        .map(Some)
        .ok_or(ValidationError::Invalid(field))
}

/// Validates the provided required text `raw` value.
fn required_text<T>(
    field: &'static str,
    raw: Option<String>,
    new: impl FnOnce(String) -> Option<T>,
) -> Result<T, ValidationError> {
    optional_text(field, raw, new)?.ok_or(ValidationError::Missing(field))
}

/// Validates the provided required non-negative amount.
fn amount(
    field: &'static str,
    value: Option<Money>,
) -> Result<Money, ValidationError> {
    let value = value.ok_or(ValidationError::Missing(field))?;
    if value.is_negative() {
        return Err(ValidationError::Negative(field));
    }
    Ok(value)
}

#[cfg(test)]
mod spec {
    use common::{DateTime, Money};

    use super::{
        Agent, Collection, CollectionStatus, Details, DetailsDraft,
        DetailsPatch, Draft, Id, Kind, Patch, Sale, ValidationError,
    };

    fn money(n: i64) -> Money {
        Money::from(n)
    }

    fn seller_draft() -> Draft {
        Draft {
            number: None,
            deal_name: None,
            date: "2024-06-10".parse().ok(),
            customer_name: Some("Tanaka".into()),
            notes: None,
            collection_date: None,
            collection_status: None,
            details: DetailsDraft::RealEstate {
                property_id: None,
                property_name: Some("Harbor View 301".into()),
                sale_price: Some(money(30_000_000)),
                transaction_type: "seller".parse().ok(),
                purchase_price: Some(money(25_000_000)),
                commission: None,
                other_expenses: Some(money(500_000)),
                settlement_date: "2024-06-30".parse().ok(),
                loan_condition_date: None,
            },
        }
    }

    fn sale(draft: Draft) -> Sale {
        let today = "2024-06-15".parse().unwrap();
        let (info, collection, details) = draft.validate(today).unwrap();
        Sale::new(
            Id::new(),
            Agent::new("sato").unwrap(),
            info,
            collection,
            details,
            DateTime::now().coerce(),
        )
    }

    #[test]
    fn derives_seller_profit() {
        assert_eq!(sale(seller_draft()).profit(), money(4_500_000));
    }

    #[test]
    fn derives_brokerage_profit() {
        let mut draft = seller_draft();
        draft.details = DetailsDraft::RealEstate {
            property_id: None,
            property_name: Some("Maple House".into()),
            sale_price: Some(money(40_000_000)),
            transaction_type: "other".parse().ok(),
            purchase_price: None,
            commission: Some(money(1_200_000)),
            other_expenses: None,
            settlement_date: "2024-07-01".parse().ok(),
            loan_condition_date: None,
        };

        assert_eq!(sale(draft).profit(), money(1_200_000));
    }

    #[test]
    fn derives_renovation_and_other_profit() {
        let mut draft = seller_draft();
        draft.details = DetailsDraft::Renovation {
            property_name: Some("Maple House".into()),
            cost: Some(money(800_000)),
            price: Some(money(1_100_000)),
            contractor: Some("  ".into()),
            content: Some("Kitchen".into()),
        };
        let renovation = sale(draft.clone());

        assert_eq!(renovation.profit(), money(300_000));
        assert_eq!(renovation.kind(), Kind::Renovation);
        assert!(matches!(
            renovation.details(),
            Details::Renovation(d) if d.contractor.is_none(),
        ));

        draft.details = DetailsDraft::Other {
            sub_type: "referral".parse().ok(),
            amount: Some(money(50_000)),
            description: Some("Referral fee".into()),
        };

        assert_eq!(sale(draft).profit(), money(50_000));
    }

    #[test]
    fn rejects_invalid_drafts() {
        let today = "2024-06-15".parse().unwrap();

        let mut draft = seller_draft();
        draft.customer_name = Some("   ".into());
        assert_eq!(
            draft.validate(today).unwrap_err(),
            ValidationError::Missing("customerName"),
        );

        let mut draft = seller_draft();
        draft.details = DetailsDraft::Other {
            sub_type: "consulting".parse().ok(),
            amount: Some(money(-1)),
            description: Some("Fee".into()),
        };
        assert_eq!(
            draft.validate(today).unwrap_err(),
            ValidationError::Negative("amount"),
        );

        let mut draft = seller_draft();
        if let DetailsDraft::RealEstate { purchase_price, .. } =
            &mut draft.details
        {
            *purchase_price = None;
        }
        assert_eq!(
            draft.validate(today).unwrap_err(),
            ValidationError::Missing("purchasePrice"),
        );
    }

    #[test]
    fn collection_date_is_authoritative() {
        let today = "2024-06-15".parse().unwrap();

        let mut draft = seller_draft();
        draft.collection_status = Some(CollectionStatus::Pending);
        draft.collection_date = "2024-06-12".parse().ok();
        let (_, collection, _) = draft.validate(today).unwrap();
        assert_eq!(
            collection,
            Collection::Collected {
                on: "2024-06-12".parse().unwrap(),
            },
        );

        let mut draft = seller_draft();
        draft.collection_status = Some(CollectionStatus::Collected);
        let (_, collection, _) = draft.validate(today).unwrap();
        assert_eq!(collection, Collection::Collected { on: today });
    }

    #[test]
    fn patch_recomputes_profit() {
        let mut sale = sale(seller_draft());

        sale.apply(
            Patch {
                details: Some(DetailsPatch::RealEstate {
                    property_id: None,
                    property_name: None,
                    sale_price: Some(money(31_000_000)),
                    transaction_type: None,
                    purchase_price: None,
                    commission: None,
                    other_expenses: None,
                    settlement_date: None,
                    loan_condition_date: None,
                }),
                ..Patch::default()
            },
            "2024-06-15".parse().unwrap(),
        )
        .unwrap();

        assert_eq!(sale.profit(), money(5_500_000));
    }

    #[test]
    fn patch_keeps_collection_consistent() {
        let today = "2024-06-15".parse().unwrap();
        let mut sale = sale(seller_draft());

        sale.apply(
            Patch {
                collection_status: Some(CollectionStatus::Collected),
                ..Patch::default()
            },
            today,
        )
        .unwrap();
        assert_eq!(sale.collection, Collection::Collected { on: today });

        sale.apply(
            Patch {
                collection_status: Some(CollectionStatus::Pending),
                ..Patch::default()
            },
            today,
        )
        .unwrap();
        assert_eq!(sale.collection, Collection::Pending);
        assert_eq!(sale.collection.date(), None);
    }

    #[test]
    fn cleared_collection_date_overrides_status() {
        let today = "2024-06-15".parse().unwrap();
        let collected_on = "2024-06-12".parse().unwrap();
        let mut sale = sale(seller_draft());
        sale.apply(
            Patch {
                collection_date: Some(Some(collected_on)),
                ..Patch::default()
            },
            today,
        )
        .unwrap();
        assert_eq!(
            sale.collection,
            Collection::Collected { on: collected_on },
        );

        sale.apply(
            Patch {
                collection_date: Some(None),
                collection_status: Some(CollectionStatus::Collected),
                ..Patch::default()
            },
            today,
        )
        .unwrap();
        assert_eq!(sale.collection, Collection::Pending);
        assert_eq!(sale.collection.date(), None);
    }

    #[test]
    fn patch_of_other_kind_is_rejected() {
        let mut sale = sale(seller_draft());

        let err = sale
            .apply(
                Patch {
                    details: Some(DetailsPatch::Other {
                        sub_type: None,
                        amount: Some(money(1)),
                        description: None,
                    }),
                    ..Patch::default()
                },
                "2024-06-15".parse().unwrap(),
            )
            .unwrap_err();

        assert_eq!(
            err,
            ValidationError::KindMismatch {
                expected: Kind::RealEstate,
                actual: Kind::Other,
            },
        );
        assert_eq!(sale.profit(), money(4_500_000));
    }

    #[test]
    fn title_falls_back() {
        let mut draft = seller_draft();
        assert_eq!(sale(draft.clone()).title(), "Harbor View 301");

        draft.deal_name = Some("Harbor deal".into());
        assert_eq!(sale(draft).title(), "Harbor deal");
    }
}
