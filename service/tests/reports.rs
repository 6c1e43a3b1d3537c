mod support;

use common::{Granularity, Money, Year};
use service::{
    clock::Fixed,
    command::{
        ClearNotifications, CreateProperty, CreateSale, MarkNotificationAsRead,
        RefreshNotifications,
    },
    domain::{
        achievement::Rule,
        notification,
        property::{self, Deadline, Mode, Status},
    },
    infra::Memory,
    query::{
        self, AchievementCatalog, MonthlyStats, PropertyStats, Rankings,
        RevenueTrend, SalesCalendar, UpcomingDeadlines, YearlyStats,
    },
    Categorize as _, Command as _, ErrorKind, Service,
};

use self::support::{agent, date, other_draft, property_draft, service};

/// Records `other` incomes on both sides of the June/July 2024 boundary and
/// of the 2023/2024 one.
async fn record_around_boundaries(svc: &Service<Memory, Fixed>) {
    for (who, on, amount) in [
        ("alice", "2024-06-30", 500),
        ("bob", "2024-07-01", 300),
        ("bob", "2024-07-01", 100),
        ("carol", "2023-12-31", 1_000),
    ] {
        _ = svc
            .execute(CreateSale {
                agent: agent(who),
                draft: other_draft(on, amount),
            })
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn rankings_follow_clock_month_and_year() {
    let (svc, _) = service("2024-07-01");
    record_around_boundaries(&svc).await;

    let monthly = svc.execute(Rankings(Granularity::Monthly)).await.unwrap();
    assert_eq!(monthly.len(), 1);
    assert_eq!(monthly[0].agent.as_str(), "bob");
    assert_eq!(monthly[0].revenue, Money::from(400));
    assert_eq!(monthly[0].deal_count, 2);

    let yearly = svc.execute(Rankings(Granularity::Yearly)).await.unwrap();
    assert_eq!(
        yearly
            .iter()
            .map(|e| (e.rank, e.agent.as_str(), e.revenue))
            .collect::<Vec<_>>(),
        [
            (1, "alice", Money::from(500)),
            (2, "bob", Money::from(400)),
        ],
    );
}

#[tokio::test]
async fn rankings_on_last_day_of_month_exclude_next_month() {
    let (svc, _) = service("2024-06-30");
    _ = svc
        .execute(CreateSale {
            agent: agent("alice"),
            draft: other_draft("2024-06-30", 500),
        })
        .await
        .unwrap();
    _ = svc
        .execute(CreateSale {
            agent: agent("bob"),
            draft: other_draft("2024-07-01", 900),
        })
        .await
        .unwrap();

    let monthly = svc.execute(Rankings(Granularity::Monthly)).await.unwrap();

    assert_eq!(monthly.len(), 1);
    assert_eq!(monthly[0].agent.as_str(), "alice");
}

#[tokio::test]
async fn trend_ends_with_clock_month() {
    let (svc, _) = service("2024-07-01");
    record_around_boundaries(&svc).await;

    let trend = svc.execute(RevenueTrend { months: 2 }).await.unwrap();

    assert_eq!(trend.len(), 2);
    assert_eq!(trend[0].total_revenue, Money::from(500));
    assert_eq!(trend[0].deal_count, 1);
    assert_eq!(trend[1].total_revenue, Money::from(400));
    assert_eq!(trend[1].deal_count, 2);

    let trend = svc.execute(RevenueTrend { months: 0 }).await.unwrap();
    assert!(trend.is_empty());
}

#[tokio::test]
async fn stats_split_on_month_and_year_boundaries() {
    let (svc, _) = service("2024-07-01");
    record_around_boundaries(&svc).await;

    let june = svc
        .execute(MonthlyStats("2024-06".parse().unwrap()))
        .await
        .unwrap();
    assert_eq!(june.total_revenue, Money::from(500));
    assert_eq!(june.deal_count, 1);
    let july = svc
        .execute(MonthlyStats("2024-07".parse().unwrap()))
        .await
        .unwrap();
    assert_eq!(july.total_revenue, Money::from(400));
    assert_eq!(july.other.count, 2);

    let this_year = svc.execute(YearlyStats(Year(2024))).await.unwrap();
    assert_eq!(this_year.total_revenue, Money::from(900));
    assert_eq!(this_year.deal_count, 3);
    let last_year = svc.execute(YearlyStats(Year(2023))).await.unwrap();
    assert_eq!(last_year.total_revenue, Money::from(1_000));
    assert_eq!(last_year.deal_count, 1);
}

#[tokio::test]
async fn calendar_lays_out_requested_month_only() {
    let (svc, _) = service("2024-07-01");
    record_around_boundaries(&svc).await;

    let days = svc
        .execute(SalesCalendar("2024-07".parse().unwrap()))
        .await
        .unwrap();

    assert_eq!(days.len(), 1);
    assert_eq!(days[0].date, date("2024-07-01"));
    assert_eq!(days[0].deal_count, 2);
    assert_eq!(days[0].revenue, Money::from(400));
}

#[tokio::test]
async fn catalog_reports_unlocked_rules() {
    let (svc, _) = service("2024-07-01");
    record_around_boundaries(&svc).await;

    let catalog = svc.execute(AchievementCatalog).await.unwrap();

    let first_sale = catalog.iter().find(|e| e.rule == Rule::FirstSale);
    assert_eq!(first_sale.map(|e| e.unlocked.len()), Some(1));
    let million = catalog.iter().find(|e| e.rule == Rule::MillionDeal);
    assert_eq!(million.map(|e| e.unlocked.len()), Some(0));
}

async fn create_property(
    svc: &Service<Memory, Fixed>,
    draft: property::Draft,
) -> property::Id {
    svc.execute(CreateProperty { draft }).await.unwrap().id
}

#[tokio::test]
async fn inventory_counts_modes_and_active_value() {
    let (svc, _) = service("2024-07-01");
    _ = create_property(&svc, property_draft("A", Status::Active)).await;
    _ = create_property(
        &svc,
        property::Draft {
            mode: Mode::Seller,
            ..property_draft("B", Status::Negotiating)
        },
    )
    .await;
    _ = create_property(
        &svc,
        property::Draft {
            mode: Mode::Seller,
            ..property_draft("C", Status::Contracted)
        },
    )
    .await;

    let inventory = svc.execute(PropertyStats).await.unwrap();

    assert_eq!(inventory.total, 3);
    assert_eq!(inventory.active_count, 2);
    assert_eq!(inventory.by_mode[&Mode::Seller], 2);
    assert_eq!(inventory.by_status[&Status::Contracted], 1);
    assert_eq!(inventory.seller_value, Money::from(50_000_000));
    assert_eq!(inventory.active_value, Money::from(100_000_000));
}

/// Creates two properties with deadlines around a 2024-07-01 clock.
async fn create_deadlines(
    svc: &Service<Memory, Fixed>,
) -> (property::Id, property::Id) {
    let a = create_property(
        svc,
        property::Draft {
            contract_expires_on: Some(date("2024-07-31")),
            reins_renewal_on: Some(date("2024-06-30")),
            ..property_draft("A", Status::Active)
        },
    )
    .await;
    let b = create_property(
        svc,
        property::Draft {
            contract_expires_on: Some(date("2024-08-01")),
            reins_renewal_on: Some(date("2024-07-02")),
            ..property_draft("B", Status::Negotiating)
        },
    )
    .await;
    (a, b)
}

#[tokio::test]
async fn deadlines_use_configured_window_by_default() {
    let (svc, _) = service("2024-07-01");
    let (a, b) = create_deadlines(&svc).await;

    let alerts = svc.execute(UpcomingDeadlines::default()).await.unwrap();

    assert_eq!(
        alerts
            .iter()
            .map(|e| (e.property_id, e.kind, e.days_remaining, e.urgent))
            .collect::<Vec<_>>(),
        [
            (b, Deadline::ReinsRenewal, 1, true),
            (a, Deadline::ContractExpiration, 30, false),
        ],
    );

    let alerts = svc
        .execute(UpcomingDeadlines {
            notification_days: Some(31),
        })
        .await
        .unwrap();
    assert_eq!(alerts.len(), 3);
    assert_eq!(alerts[2].property_id, b);
    assert_eq!(alerts[2].kind, Deadline::ContractExpiration);
}

#[tokio::test]
async fn notifications_are_recorded_once_per_deadline() {
    let (svc, _) = service("2024-07-01");
    let (a, b) = create_deadlines(&svc).await;

    let fresh = svc.execute(RefreshNotifications::default()).await.unwrap();
    assert_eq!(
        fresh
            .iter()
            .map(|n| (n.property_id, n.kind, n.read))
            .collect::<Vec<_>>(),
        [
            (b, Deadline::ReinsRenewal, false),
            (a, Deadline::ContractExpiration, false),
        ],
    );

    let again = svc.execute(RefreshNotifications::default()).await.unwrap();
    assert!(again.is_empty());

    let wider = svc
        .execute(RefreshNotifications {
            notification_days: Some(31),
        })
        .await
        .unwrap();
    assert_eq!(wider.len(), 1);
    assert_eq!(wider[0].property_id, b);
    assert_eq!(wider[0].kind, Deadline::ContractExpiration);

    let all = svc
        .execute(query::notifications::List::by(common::unit::All))
        .await
        .unwrap();
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn notification_is_marked_read_and_cleared() {
    let (svc, _) = service("2024-07-01");
    _ = create_deadlines(&svc).await;
    let fresh = svc.execute(RefreshNotifications::default()).await.unwrap();

    let read = svc
        .execute(MarkNotificationAsRead {
            notification_id: fresh[0].id,
        })
        .await
        .unwrap();
    assert!(read.read);
    let read_again = svc
        .execute(MarkNotificationAsRead {
            notification_id: fresh[0].id,
        })
        .await
        .unwrap();
    assert_eq!(read_again, read);

    let all = svc
        .execute(query::notifications::List::by(common::unit::All))
        .await
        .unwrap();
    assert_eq!(all.iter().filter(|n| n.read).count(), 1);

    let err = svc
        .execute(MarkNotificationAsRead {
            notification_id: notification::Id::new(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let deleted = svc.execute(ClearNotifications).await.unwrap();
    assert_eq!(deleted, 2);
    let all = svc
        .execute(query::notifications::List::by(common::unit::All))
        .await
        .unwrap();
    assert!(all.is_empty());

    let fresh = svc.execute(RefreshNotifications::default()).await.unwrap();
    assert_eq!(fresh.len(), 2);
}
