//! [`Sale`]-related [`Database`] implementations.

use std::ops::RangeInclusive;

use common::{
    operations::{By, Delete, Insert, Select, Update},
    unit::All,
    Date, Money,
};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{
        property,
        sale::{
            self, Collection, Contractor, Description, Details, Info, Kind,
            OtherIncome, PropertyName, RealEstate, Renovation, SubKind,
            Transaction, TransactionType,
        },
        Sale,
    },
    infra::{
        database::{
            self,
            postgres::{self, Connection},
            Postgres,
        },
        Database,
    },
};

/// Columns of the `sales` table, in the order read by [`from_row()`].
const COLUMNS: &str = "\
    id, kind, number, deal_name, date, customer_name, notes, agent, \
    collection_status, collection_date, profit, \
    property_id, property_name, sale_price, transaction_type, \
    purchase_price, commission, other_expenses, \
    settlement_date, loan_condition_date, \
    cost, price, contractor, content, \
    sub_kind, amount, description, \
    created_at";

/// Reads a [`Sale`] from the provided [`Row`].
///
/// [`None`] is returned if any column cannot be decoded, or the
/// variant-specific columns are inconsistent with the [`Kind`].
fn from_row(row: &Row) -> Option<Sale> {
    let details = Variant::read(row)
        .ok()?
        .into_details(row.try_get("kind").ok()?)?;
    let collection = Collection::from_parts(
        row.try_get("collection_status").ok()?,
        row.try_get("collection_date").ok()?,
    )?;

    Some(Sale::from_stored(
        row.try_get("id").ok()?,
        row.try_get("agent").ok()?,
        Info {
            number: row.try_get("number").ok()?,
            deal_name: row.try_get("deal_name").ok()?,
            date: row.try_get("date").ok()?,
            customer_name: row.try_get("customer_name").ok()?,
            notes: row.try_get("notes").ok()?,
        },
        collection,
        details,
        row.try_get("profit").ok()?,
        row.try_get("created_at").ok()?,
    ))
}

/// Nullable variant-specific columns of a `sales` row.
#[derive(Debug, Default)]
struct Variant {
    property_id: Option<property::Id>,
    property_name: Option<PropertyName>,
    sale_price: Option<Money>,
    transaction_type: Option<TransactionType>,
    purchase_price: Option<Money>,
    commission: Option<Money>,
    other_expenses: Option<Money>,
    settlement_date: Option<Date>,
    loan_condition_date: Option<Date>,
    cost: Option<Money>,
    price: Option<Money>,
    contractor: Option<Contractor>,
    content: Option<Description>,
    sub_kind: Option<SubKind>,
    amount: Option<Money>,
    description: Option<Description>,
}

impl Variant {
    /// Reads the [`Variant`] columns from the provided [`Row`].
    fn read(row: &Row) -> Result<Self, postgres::connection::Error> {
        Ok(Self {
            property_id: row.try_get("property_id")?,
            property_name: row.try_get("property_name")?,
            sale_price: row.try_get("sale_price")?,
            transaction_type: row.try_get("transaction_type")?,
            purchase_price: row.try_get("purchase_price")?,
            commission: row.try_get("commission")?,
            other_expenses: row.try_get("other_expenses")?,
            settlement_date: row.try_get("settlement_date")?,
            loan_condition_date: row.try_get("loan_condition_date")?,
            cost: row.try_get("cost")?,
            price: row.try_get("price")?,
            contractor: row.try_get("contractor")?,
            content: row.try_get("content")?,
            sub_kind: row.try_get("sub_kind")?,
            amount: row.try_get("amount")?,
            description: row.try_get("description")?,
        })
    }

    /// Assembles [`Details`] of the provided [`Kind`] out of these columns.
    ///
    /// [`None`] is returned if a column required by the [`Kind`] is `NULL`.
    fn into_details(self, kind: Kind) -> Option<Details> {
        Some(match kind {
            Kind::RealEstate => Details::RealEstate(RealEstate {
                property_id: self.property_id,
                property_name: self.property_name?,
                sale_price: self.sale_price?,
                transaction: match self.transaction_type? {
                    TransactionType::Seller => Transaction::Seller {
                        purchase_price: self.purchase_price?,
                    },
                    TransactionType::Other => Transaction::Brokerage {
                        commission: self.commission?,
                    },
                },
                other_expenses: self.other_expenses.unwrap_or(Money::ZERO),
                settlement_date: self.settlement_date?,
                loan_condition_date: self.loan_condition_date,
            }),
            Kind::Renovation => Details::Renovation(Renovation {
                property_name: self.property_name?,
                cost: self.cost?,
                price: self.price?,
                contractor: self.contractor,
                content: self.content?,
            }),
            Kind::Other => Details::Other(OtherIncome {
                sub_kind: self.sub_kind?,
                amount: self.amount?,
                description: self.description?,
            }),
        })
    }
}

/// Reads all the [`Sale`]s from the provided [`Row`]s.
fn from_rows(rows: &[Row]) -> Result<Vec<Sale>, Traced<database::Error>> {
    rows.iter()
        .map(|row| {
            from_row(row).ok_or_else(|| {
                tracerr::new!(database::Error::from(
                    postgres::Error::MalformedRow("sales"),
                ))
            })
        })
        .collect()
}

impl<C> Database<Select<By<Option<Sale>, sale::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Sale>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Sale>, sale::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM sales \
             WHERE id = $1::UUID"
        );
        let rows = self
            .query(sql.as_str(), &[&id])
            .await
            .map_err(tracerr::wrap!())?;
        Ok(from_rows(&rows)?.pop())
    }
}

impl<C> Database<Select<By<Vec<Sale>, All>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Sale>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Sale>, All>>,
    ) -> Result<Self::Ok, Self::Err> {
        let sql = format!(
            "SELECT {COLUMNS} \
             FROM sales \
             ORDER BY date DESC, created_at DESC, id ASC"
        );
        let rows = self
            .query(sql.as_str(), &[])
            .await
            .map_err(tracerr::wrap!())?;
        from_rows(&rows)
    }
}

impl<C> Database<Select<By<Vec<Sale>, RangeInclusive<Date>>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Sale>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Sale>, RangeInclusive<Date>>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (from, to) = by.into_inner().into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM sales \
             WHERE date BETWEEN $1::DATE AND $2::DATE \
             ORDER BY date DESC, created_at DESC, id ASC"
        );
        let rows = self
            .query(sql.as_str(), &[&from, &to])
            .await
            .map_err(tracerr::wrap!())?;
        from_rows(&rows)
    }
}

impl<C> Database<Insert<Sale>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Sale>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(sale): Insert<Sale>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(sale)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Sale>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(sale): Update<Sale>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut real_estate = None;
        let mut renovation = None;
        let mut other = None;
        match sale.details() {
            Details::RealEstate(d) => real_estate = Some(d),
            Details::Renovation(d) => renovation = Some(d),
            Details::Other(d) => other = Some(d),
        }
        let (purchase_price, commission) =
            match real_estate.map(|d| d.transaction) {
                Some(Transaction::Seller { purchase_price }) => {
                    (Some(purchase_price), None)
                }
                Some(Transaction::Brokerage { commission }) => {
                    (None, Some(commission))
                }
                None => (None, None),
            };
        let property_name = real_estate
            .map(|d| &d.property_name)
            .or(renovation.map(|d| &d.property_name));

        const SQL: &str = "\
            INSERT INTO sales (\
                id, kind, number, deal_name, date, customer_name, notes, \
                agent, collection_status, collection_date, profit, \
                property_id, property_name, sale_price, transaction_type, \
                purchase_price, commission, other_expenses, \
                settlement_date, loan_condition_date, \
                cost, price, contractor, content, \
                sub_kind, amount, description, \
                created_at\
            ) VALUES (\
                $1::UUID, $2::INT2, $3::VARCHAR, $4::VARCHAR, $5::DATE, \
                $6::VARCHAR, $7::TEXT, \
                $8::VARCHAR, $9::INT2, $10::DATE, $11::NUMERIC, \
                $12::UUID, $13::VARCHAR, $14::NUMERIC, $15::INT2, \
                $16::NUMERIC, $17::NUMERIC, $18::NUMERIC, \
                $19::DATE, $20::DATE, \
                $21::NUMERIC, $22::NUMERIC, $23::VARCHAR, $24::TEXT, \
                $25::INT2, $26::NUMERIC, $27::TEXT, \
                $28::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET kind = EXCLUDED.kind, \
                number = EXCLUDED.number, \
                deal_name = EXCLUDED.deal_name, \
                date = EXCLUDED.date, \
                customer_name = EXCLUDED.customer_name, \
                notes = EXCLUDED.notes, \
                agent = EXCLUDED.agent, \
                collection_status = EXCLUDED.collection_status, \
                collection_date = EXCLUDED.collection_date, \
                profit = EXCLUDED.profit, \
                property_id = EXCLUDED.property_id, \
                property_name = EXCLUDED.property_name, \
                sale_price = EXCLUDED.sale_price, \
                transaction_type = EXCLUDED.transaction_type, \
                purchase_price = EXCLUDED.purchase_price, \
                commission = EXCLUDED.commission, \
                other_expenses = EXCLUDED.other_expenses, \
                settlement_date = EXCLUDED.settlement_date, \
                loan_condition_date = EXCLUDED.loan_condition_date, \
                cost = EXCLUDED.cost, \
                price = EXCLUDED.price, \
                contractor = EXCLUDED.contractor, \
                content = EXCLUDED.content, \
                sub_kind = EXCLUDED.sub_kind, \
                amount = EXCLUDED.amount, \
                description = EXCLUDED.description";
        self.exec(
            SQL,
            &[
                &sale.id,
                &sale.kind(),
                &sale.number,
                &sale.deal_name,
                &sale.date,
                &sale.customer_name,
                &sale.notes,
                &sale.agent,
                &sale.collection_status(),
                &sale.collection.date(),
                &sale.profit(),
                &real_estate.and_then(|d| d.property_id),
                &property_name,
                &real_estate.map(|d| d.sale_price),
                &real_estate.map(|d| d.transaction.kind()),
                &purchase_price,
                &commission,
                &real_estate.map(|d| d.other_expenses),
                &real_estate.map(|d| d.settlement_date),
                &real_estate.and_then(|d| d.loan_condition_date),
                &renovation.map(|d| d.cost),
                &renovation.map(|d| d.price),
                &renovation.and_then(|d| d.contractor.as_ref()),
                &renovation.map(|d| &d.content),
                &other.map(|d| d.sub_kind),
                &other.map(|d| d.amount),
                &other.map(|d| &d.description),
                &sale.created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Delete<By<Sale, sale::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = bool;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Sale, sale::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM sales \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(|affected| affected > 0)
    }
}

#[cfg(test)]
mod spec {
    use common::{Date, Money};

    use crate::domain::sale::{
        Details, Kind, PropertyName, Transaction, TransactionType,
    };

    use super::Variant;

    fn real_estate() -> Variant {
        Variant {
            property_name: PropertyName::new("Sunrise 301"),
            sale_price: Some(Money::from(50_000_000)),
            transaction_type: Some(TransactionType::Seller),
            purchase_price: Some(Money::from(45_000_000)),
            settlement_date: Some("2024-06-30".parse::<Date>().unwrap()),
            ..Variant::default()
        }
    }

    #[test]
    fn assembles_real_estate_details() {
        let Some(Details::RealEstate(details)) =
            real_estate().into_details(Kind::RealEstate)
        else {
            panic!("expected real estate details");
        };

        assert_eq!(details.sale_price, Money::from(50_000_000));
        assert_eq!(details.other_expenses, Money::ZERO);
        assert_eq!(
            details.transaction,
            Transaction::Seller {
                purchase_price: Money::from(45_000_000),
            },
        );
    }

    #[test]
    fn rejects_null_required_column() {
        let variant = Variant {
            sale_price: None,
            ..real_estate()
        };
        assert!(variant.into_details(Kind::RealEstate).is_none());

        let variant = Variant {
            purchase_price: None,
            ..real_estate()
        };
        assert!(variant.into_details(Kind::RealEstate).is_none());
    }

    #[test]
    fn rejects_columns_of_other_kind() {
        assert!(real_estate().into_details(Kind::Other).is_none());
        assert!(real_estate().into_details(Kind::Renovation).is_none());
    }
}
