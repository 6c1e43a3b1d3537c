//! Read entities definitions.

pub mod achievement;
pub mod calendar;
pub mod deadline;
pub mod goal;
pub mod inventory;
pub mod ranking;
pub mod sale;
pub mod stats;

pub use self::{
    deadline::Alert, goal::Progress, inventory::Inventory, stats::Summary,
};

#[cfg(test)]
pub(crate) mod fixture {
    //! Builders of domain entities for tests.

    use common::{Date, DateTime, Money};

    use crate::domain::{
        property,
        sale::{
            self, Collection, Details, Info, OtherIncome, RealEstate,
            SubKind, Transaction,
        },
        Property, Sale,
    };

    fn info(date: Date, customer: &str) -> Info {
        Info {
            number: None,
            deal_name: None,
            date,
            customer_name: sale::CustomerName::new(customer).unwrap(),
            notes: None,
        }
    }

    /// Pending `other` income of the provided `amount` made by `alice`.
    pub(crate) fn other_sale(date: &str, amount: i64) -> Sale {
        agent_sale("alice", date, amount)
    }

    /// Pending `other` income of the provided `amount` made by `agent`.
    pub(crate) fn agent_sale(agent: &str, date: &str, amount: i64) -> Sale {
        let date: Date = date.parse().unwrap();
        Sale::new(
            sale::Id::new(),
            sale::Agent::new(agent).unwrap(),
            info(date, "Customer"),
            Collection::Pending,
            Details::Other(OtherIncome {
                sub_kind: SubKind::Consulting,
                amount: Money::from(amount),
                description: sale::Description::new("fee").unwrap(),
            }),
            DateTime::at_midnight(date).coerce(),
        )
    }

    /// Pending brokerage deal of the provided `commission`.
    pub(crate) fn brokerage_sale(
        date: &str,
        commission: i64,
        property_id: Option<property::Id>,
    ) -> Sale {
        let date: Date = date.parse().unwrap();
        Sale::new(
            sale::Id::new(),
            sale::Agent::new("alice").unwrap(),
            info(date, "Buyer"),
            Collection::Pending,
            Details::RealEstate(RealEstate {
                property_id,
                property_name: sale::PropertyName::new("Tower").unwrap(),
                sale_price: Money::from(commission * 30),
                transaction: Transaction::Brokerage {
                    commission: Money::from(commission),
                },
                other_expenses: Money::ZERO,
                settlement_date: date,
                loan_condition_date: None,
            }),
            DateTime::at_midnight(date).coerce(),
        )
    }

    /// [`Property`] in the provided [`property::Status`].
    pub(crate) fn property(
        name: &str,
        mode: property::Mode,
        status: property::Status,
        valuation: i64,
    ) -> Property {
        Property::new(
            property::Id::new(),
            property::Draft {
                name: property::Name::new(name).unwrap(),
                mode,
                status,
                contract_started_on: None,
                contract_expires_on: None,
                reins_renewal_on: None,
                valuation: Money::from(valuation),
            },
            DateTime::now().coerce(),
        )
    }
}
