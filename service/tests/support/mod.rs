//! Shared helpers of the [`service`] integration tests.

#![allow(dead_code, reason = "not every test uses every helper")]

use common::{Date, Money};
use service::{
    clock::Fixed,
    domain::{
        property,
        sale::{self, DetailsDraft, SubKind, TransactionType},
    },
    infra::Memory,
    Config, Service,
};

/// [`Service`] over a fresh [`Memory`] database frozen on the provided day.
pub fn service(today: &str) -> (Service<Memory, Fixed>, Memory) {
    let db = Memory::new();
    let svc =
        Service::new(Config::default(), db.clone(), Fixed::on(date(today)));
    (svc, db)
}

pub fn date(s: &str) -> Date {
    s.parse().unwrap()
}

pub fn agent(name: &str) -> sale::Agent {
    sale::Agent::new(name).unwrap()
}

/// Draft of a pending sale with the provided details.
fn draft(on: &str, details: DetailsDraft) -> sale::Draft {
    sale::Draft {
        number: None,
        deal_name: None,
        date: Some(date(on)),
        customer_name: Some("Buyer".into()),
        notes: None,
        collection_date: None,
        collection_status: None,
        details,
    }
}

/// Draft of an `other` income of the provided `amount`.
pub fn other_draft(on: &str, amount: i64) -> sale::Draft {
    draft(
        on,
        DetailsDraft::Other {
            sub_type: Some(SubKind::Consulting),
            amount: Some(Money::from(amount)),
            description: Some("Consulting fee".into()),
        },
    )
}

/// Draft of a brokerage deal linked to the provided property.
pub fn brokerage_draft(
    on: &str,
    commission: i64,
    property_id: Option<property::Id>,
) -> sale::Draft {
    draft(
        on,
        DetailsDraft::RealEstate {
            property_id,
            property_name: Some("Harbor Tower 12F".into()),
            sale_price: Some(Money::from(60_000_000)),
            transaction_type: Some(TransactionType::Other),
            purchase_price: None,
            commission: Some(Money::from(commission)),
            other_expenses: None,
            settlement_date: Some(date(on)),
            loan_condition_date: None,
        },
    )
}

/// Draft of a property in the provided status.
pub fn property_draft(name: &str, status: property::Status) -> property::Draft {
    property::Draft {
        name: property::Name::new(name).unwrap(),
        mode: property::Mode::Exclusive,
        status,
        contract_started_on: None,
        contract_expires_on: None,
        reins_renewal_on: None,
        valuation: Money::from(50_000_000),
    }
}
