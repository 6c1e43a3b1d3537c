mod support;

use common::{Money, Percent, YearMonth};
use service::{
    command::{
        Cascade, CreateProperty, CreateSale, DeleteProperty, Evaluation,
        SaveGoal, ToggleCollectionStatus, UpdateSale,
    },
    domain::{
        achievement::{Key, Rule},
        property::{self, Status},
        sale::{self, CollectionStatus},
    },
    infra::database::memory::Table,
    query::{self, GoalProgress, MonthlyStats},
    Categorize as _, Command as _, ErrorKind,
};

use self::support::{
    agent, brokerage_draft, date, other_draft, property_draft, service,
};

#[tokio::test]
async fn records_seller_deal_profit() {
    let (svc, _) = service("2024-06-30");
    let draft = serde_json::from_value::<sale::Draft>(serde_json::json!({
        "type": "realestate",
        "date": "2024-06-15",
        "customerName": "Tanaka",
        "propertyName": "Harbor Tower 12F",
        "salePrice": 30_000_000,
        "transactionType": "seller",
        "purchasePrice": 25_000_000,
        "otherExpenses": 500_000,
        "settlementDate": "2024-06-15",
    }))
    .unwrap();

    let outcome = svc
        .execute(CreateSale {
            agent: agent("alice"),
            draft,
        })
        .await
        .unwrap();

    assert_eq!(outcome.sale.profit(), Money::from(4_500_000));
    assert_eq!(outcome.sale.collection_status(), CollectionStatus::Pending);
    assert!(matches!(outcome.cascade, Cascade::NotRequired));

    let june = YearMonth::from_parts(2024, time::Month::June);
    let stats = svc.execute(MonthlyStats(june)).await.unwrap();
    assert_eq!(stats.total_revenue, Money::from(4_500_000));
    assert_eq!(stats.deal_count, 1);
    assert_eq!(stats.real_estate.count, 1);
}

#[tokio::test]
async fn toggle_round_trip_cascades_onto_property() {
    let (svc, _) = service("2024-06-30");
    let property = svc
        .execute(CreateProperty {
            draft: property_draft("Harbor Tower 12F", Status::Contracted),
        })
        .await
        .unwrap();
    let created = svc
        .execute(CreateSale {
            agent: agent("alice"),
            draft: brokerage_draft("2024-06-10", 1_800_000, Some(property.id)),
        })
        .await
        .unwrap();

    let collected = svc
        .execute(ToggleCollectionStatus {
            sale_id: created.sale.id,
        })
        .await
        .unwrap();
    assert_eq!(collected.sale.collection.date(), Some(date("2024-06-30")));
    assert!(matches!(
        collected.cascade,
        Cascade::Applied { transition, .. }
            if transition.to == Status::Completed
    ));
    assert!(matches!(collected.achievements, Evaluation::Skipped));
    let stored = svc
        .execute(query::property::ById::by(property.id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, Status::Completed);

    let pending = svc
        .execute(ToggleCollectionStatus {
            sale_id: created.sale.id,
        })
        .await
        .unwrap();
    assert_eq!(pending.sale.collection_status(), CollectionStatus::Pending);
    assert_eq!(pending.sale.collection.date(), None);
    let stored = svc
        .execute(query::property::ById::by(property.id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, Status::Contracted);
}

#[tokio::test]
async fn update_of_collection_cascades_and_is_noop_when_settled() {
    let (svc, _) = service("2024-06-30");
    let property = svc
        .execute(CreateProperty {
            draft: property_draft("Harbor Tower 12F", Status::Negotiating),
        })
        .await
        .unwrap();
    let created = svc
        .execute(CreateSale {
            agent: agent("alice"),
            draft: brokerage_draft("2024-06-10", 1_800_000, Some(property.id)),
        })
        .await
        .unwrap();

    let patch = sale::Patch {
        collection_date: Some(Some(date("2024-06-20"))),
        ..sale::Patch::default()
    };
    let updated = svc
        .execute(UpdateSale {
            sale_id: created.sale.id,
            patch: patch.clone(),
        })
        .await
        .unwrap();
    assert_eq!(updated.sale.collection.date(), Some(date("2024-06-20")));
    assert!(matches!(updated.cascade, Cascade::Applied { .. }));

    let again = svc
        .execute(UpdateSale {
            sale_id: created.sale.id,
            patch,
        })
        .await
        .unwrap();
    assert!(matches!(again.cascade, Cascade::NotRequired));
}

#[tokio::test]
async fn rejects_sale_linked_to_unknown_property() {
    let (svc, _) = service("2024-06-30");

    let err = svc
        .execute(CreateSale {
            agent: agent("alice"),
            draft: brokerage_draft("2024-06-10", 1, Some(property::Id::new())),
        })
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    let sales = svc
        .execute(query::sales::ListSales::default())
        .await
        .unwrap();
    assert!(sales.is_empty());
}

#[tokio::test]
async fn rejects_invalid_draft() {
    let (svc, _) = service("2024-06-30");
    let mut draft = other_draft("2024-06-10", 100);
    draft.customer_name = Some("   ".into());

    let err = svc
        .execute(CreateSale {
            agent: agent("alice"),
            draft,
        })
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn toggle_of_sale_with_deleted_property_applies_nothing() {
    let (svc, _) = service("2024-06-30");
    let property = svc
        .execute(CreateProperty {
            draft: property_draft("Harbor Tower 12F", Status::Contracted),
        })
        .await
        .unwrap();
    let created = svc
        .execute(CreateSale {
            agent: agent("alice"),
            draft: brokerage_draft("2024-06-10", 1_000, Some(property.id)),
        })
        .await
        .unwrap();
    svc.execute(DeleteProperty {
        property_id: property.id,
    })
    .await
    .unwrap();

    let err = svc
        .execute(ToggleCollectionStatus {
            sale_id: created.sale.id,
        })
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InconsistentState);
    let stored = svc
        .execute(query::sale::ById::by(created.sale.id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.collection_status(), CollectionStatus::Pending);
}

#[tokio::test]
async fn failed_cascade_keeps_sale_change() {
    let (svc, db) = service("2024-06-30");
    let property = svc
        .execute(CreateProperty {
            draft: property_draft("Harbor Tower 12F", Status::Contracted),
        })
        .await
        .unwrap();
    let created = svc
        .execute(CreateSale {
            agent: agent("alice"),
            draft: brokerage_draft("2024-06-10", 1_000, Some(property.id)),
        })
        .await
        .unwrap();
    db.set_read_only(Table::Properties, true).await;

    let outcome = svc
        .execute(ToggleCollectionStatus {
            sale_id: created.sale.id,
        })
        .await
        .unwrap();

    assert!(matches!(
        outcome.cascade,
        Cascade::Failed { property_id, .. } if property_id == property.id
    ));
    let stored = svc
        .execute(query::sale::ById::by(created.sale.id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.collection_status(), CollectionStatus::Collected);

    db.set_read_only(Table::Properties, false).await;
    let stored = svc
        .execute(query::property::ById::by(property.id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, Status::Contracted);
}

#[tokio::test]
async fn first_sale_unlocks_exactly_once() {
    let (svc, _) = service("2024-06-30");
    let first_sale = Key::once(Rule::FirstSale).unwrap();

    let first = svc
        .execute(CreateSale {
            agent: agent("alice"),
            draft: other_draft("2024-06-01", 100),
        })
        .await
        .unwrap();
    let Evaluation::Unlocked(unlocked) = first.achievements else {
        panic!("evaluation failed");
    };
    assert_eq!(
        unlocked.iter().map(|a| a.key).collect::<Vec<_>>(),
        [first_sale],
    );

    let second = svc
        .execute(CreateSale {
            agent: agent("bob"),
            draft: other_draft("2024-06-02", 100),
        })
        .await
        .unwrap();
    assert!(matches!(
        second.achievements,
        Evaluation::Unlocked(ref v) if v.is_empty()
    ));

    let all = svc
        .execute(query::achievements::List::by(common::unit::All))
        .await
        .unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].key, first_sale);
}

#[tokio::test]
async fn failed_evaluation_keeps_sale() {
    let (svc, db) = service("2024-06-30");
    db.set_offline(Table::Achievements, true).await;

    let outcome = svc
        .execute(CreateSale {
            agent: agent("alice"),
            draft: other_draft("2024-06-01", 100),
        })
        .await
        .unwrap();

    assert!(matches!(outcome.achievements, Evaluation::Failed(_)));
    let stored = svc
        .execute(query::sale::ById::by(outcome.sale.id))
        .await
        .unwrap();
    assert!(stored.is_some());
}

#[tokio::test]
async fn over_achieved_goal_is_perfect_month() {
    let (svc, _) = service("2024-06-30");
    let june = "2024-06".parse().unwrap();
    _ = svc
        .execute(SaveGoal {
            period: june,
            target_amount: Money::from(5_000_000),
            target_count: 3,
        })
        .await
        .unwrap();

    _ = svc
        .execute(CreateSale {
            agent: agent("alice"),
            draft: other_draft("2024-06-03", 3_000_000),
        })
        .await
        .unwrap();
    let last = svc
        .execute(CreateSale {
            agent: agent("alice"),
            draft: other_draft("2024-06-20", 2_200_000),
        })
        .await
        .unwrap();

    let progress = svc.execute(GoalProgress(june)).await.unwrap().unwrap();
    assert_eq!(progress.revenue, Money::from(5_200_000));
    assert_eq!(progress.percent, "104".parse::<Percent>().unwrap());
    assert_eq!(progress.display_percent, Percent::HUNDRED);
    assert!(progress.achieved);

    let Evaluation::Unlocked(unlocked) = last.achievements else {
        panic!("evaluation failed");
    };
    assert_eq!(
        unlocked.iter().map(|a| a.key).collect::<Vec<_>>(),
        [Key::per(Rule::PerfectMonth, june).unwrap()],
    );
}

#[tokio::test]
async fn goal_is_replaced_per_period() {
    let (svc, _) = service("2024-06-30");
    let june = "2024-06".parse().unwrap();

    let first = svc
        .execute(SaveGoal {
            period: june,
            target_amount: Money::from(1_000),
            target_count: 1,
        })
        .await
        .unwrap();
    let second = svc
        .execute(SaveGoal {
            period: june,
            target_amount: Money::from(2_000),
            target_count: 2,
        })
        .await
        .unwrap();
    _ = svc
        .execute(SaveGoal {
            period: "2024".parse().unwrap(),
            target_amount: Money::from(9_000),
            target_count: 9,
        })
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    let goals = svc
        .execute(query::goals::List::by(common::unit::All))
        .await
        .unwrap();
    assert_eq!(goals.len(), 2);
    assert!(goals.iter().any(|g| g.target_count == 2));

    let err = svc
        .execute(SaveGoal {
            period: june,
            target_amount: Money::ZERO,
            target_count: 1,
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn cleared_collection_date_wins_over_status() {
    let (svc, _) = service("2024-06-30");
    let created = svc
        .execute(CreateSale {
            agent: agent("alice"),
            draft: other_draft("2024-06-01", 100),
        })
        .await
        .unwrap();
    let collected = svc
        .execute(UpdateSale {
            sale_id: created.sale.id,
            patch: sale::Patch {
                collection_date: Some(Some(date("2024-06-12"))),
                ..sale::Patch::default()
            },
        })
        .await
        .unwrap();
    assert_eq!(collected.sale.collection.date(), Some(date("2024-06-12")));

    let patch = serde_json::from_value::<sale::Patch>(serde_json::json!({
        "collectionDate": null,
        "collectionStatus": "collected",
    }))
    .unwrap();
    let updated = svc
        .execute(UpdateSale {
            sale_id: created.sale.id,
            patch,
        })
        .await
        .unwrap();

    assert_eq!(updated.sale.collection_status(), CollectionStatus::Pending);
    assert_eq!(updated.sale.collection.date(), None);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_toggles_of_same_sale_lose_no_update() {
    let (svc, _) = service("2024-06-30");
    let property = svc
        .execute(CreateProperty {
            draft: property_draft("Harbor Tower 12F", Status::Contracted),
        })
        .await
        .unwrap();
    let sale_id = svc
        .execute(CreateSale {
            agent: agent("alice"),
            draft: brokerage_draft("2024-06-10", 1_000, Some(property.id)),
        })
        .await
        .unwrap()
        .sale
        .id;

    let tasks = (0..20)
        .map(|_| {
            let svc = svc.clone();
            tokio::spawn(async move {
                svc.execute(ToggleCollectionStatus { sale_id })
                    .await
                    .map(|o| o.sale.collection_status())
            })
        })
        .collect::<Vec<_>>();
    let mut statuses = vec![];
    for task in tasks {
        statuses.push(task.await.unwrap().unwrap());
    }

    let collected = statuses
        .iter()
        .filter(|s| **s == CollectionStatus::Collected)
        .count();
    assert_eq!(collected, 10);
    let stored = svc
        .execute(query::sale::ById::by(sale_id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.collection_status(), CollectionStatus::Pending);
    assert_eq!(stored.collection.date(), None);
    let stored = svc
        .execute(query::property::ById::by(property.id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, Status::Contracted);
}
