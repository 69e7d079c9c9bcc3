use chrono::NaiveDate;

use adpulse_core::goals::{CreateGoalRequest, GoalCategory, UpdateGoalRequest};
use adpulse_core::reporting::{AmountRow, DateRange, ReportingStore};
use adpulse_metadata::{
    CreateActionItemParams, CreateClientParams, CreateManagerParams, UpdateActionItemParams,
    UpdateClientParams,
};
use adpulse_duckdb::DuckDbBackend;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("date")
}

#[tokio::test]
async fn client_assignment_round_trip() {
    let db = DuckDbBackend::open_in_memory().expect("db");

    let manager = db
        .create_manager(CreateManagerParams {
            name: "Kim".to_string(),
            email: Some("kim@example.com".to_string()),
        })
        .await
        .expect("manager");

    let client = db
        .create_client(CreateClientParams {
            name: "Acme".to_string(),
            manager_id: None,
        })
        .await
        .expect("client");
    assert!(client.manager_id.is_none());

    let updated = db
        .update_client(
            &client.id,
            UpdateClientParams {
                name: None,
                manager_id: Some(Some(manager.id.clone())),
            },
        )
        .await
        .expect("update")
        .expect("client found");
    assert_eq!(updated.manager_id.as_deref(), Some(manager.id.as_str()));

    // Clearing the assignment via Some(None).
    let cleared = db
        .update_client(
            &client.id,
            UpdateClientParams {
                name: None,
                manager_id: Some(None),
            },
        )
        .await
        .expect("update")
        .expect("client found");
    assert!(cleared.manager_id.is_none());
}

#[tokio::test]
async fn deleting_manager_unassigns_clients() {
    let db = DuckDbBackend::open_in_memory().expect("db");

    let manager = db
        .create_manager(CreateManagerParams {
            name: "Kim".to_string(),
            email: None,
        })
        .await
        .expect("manager");
    let client = db
        .create_client(CreateClientParams {
            name: "Acme".to_string(),
            manager_id: Some(manager.id.clone()),
        })
        .await
        .expect("client");

    assert!(db.delete_manager(&manager.id).await.expect("delete"));
    let client = db
        .get_client(&client.id)
        .await
        .expect("get")
        .expect("client still exists");
    assert!(client.manager_id.is_none());
}

#[tokio::test]
async fn deleting_client_cascades_to_dependents() {
    let db = DuckDbBackend::open_in_memory().expect("db");

    let client = db
        .create_client(CreateClientParams {
            name: "Acme".to_string(),
            manager_id: None,
        })
        .await
        .expect("client");

    db.upsert_amounts(&[AmountRow {
        client_id: client.id.clone(),
        date: date(2024, 5, 13),
        amount: 100.0,
    }])
    .await
    .expect("amounts");
    db.create_goal(CreateGoalRequest {
        client_id: client.id.clone(),
        name: "May push".to_string(),
        category: GoalCategory::MonthlyRevenue,
        start_date: date(2024, 5, 1),
        end_date: date(2024, 5, 31),
        target_revenue: 1000.0,
        start_revenue: None,
    })
    .await
    .expect("goal");
    db.create_action_item(CreateActionItemParams {
        client_id: Some(client.id.clone()),
        title: "Kickoff call".to_string(),
        due_date: None,
    })
    .await
    .expect("item");

    assert!(db.delete_client(&client.id).await.expect("delete"));
    assert!(db.list_goals(Some(&client.id)).await.expect("goals").is_empty());
    assert!(db
        .list_action_items(Some(&client.id))
        .await
        .expect("items")
        .is_empty());
    let sum = db
        .sum_amounts(
            &client.id,
            DateRange {
                start: date(2024, 5, 1),
                end: date(2024, 5, 31),
            },
        )
        .await
        .expect("sum");
    assert_eq!(sum, 0.0);
}

#[tokio::test]
async fn goal_crud_round_trip() {
    let db = DuckDbBackend::open_in_memory().expect("db");

    let goal = db
        .create_goal(CreateGoalRequest {
            client_id: "cl_x".to_string(),
            name: "May push".to_string(),
            category: GoalCategory::WeeklyRevenue,
            start_date: date(2024, 5, 1),
            end_date: date(2024, 5, 31),
            target_revenue: 1000.0,
            start_revenue: Some(200.0),
        })
        .await
        .expect("create");
    assert_eq!(goal.category, GoalCategory::WeeklyRevenue);
    assert_eq!(goal.start_revenue, 200.0);

    assert_eq!(db.count_goals("cl_x").await.expect("count"), 1);
    assert!(db
        .goal_name_exists("cl_x", "May push", None)
        .await
        .expect("exists"));
    assert!(!db
        .goal_name_exists("cl_x", "May push", Some(&goal.id))
        .await
        .expect("exists excluding self"));

    let updated = db
        .update_goal(
            &goal.id,
            UpdateGoalRequest {
                name: None,
                end_date: Some(date(2024, 6, 15)),
                target_revenue: Some(1500.0),
            },
        )
        .await
        .expect("update")
        .expect("found");
    assert_eq!(updated.end_date, date(2024, 6, 15));
    assert_eq!(updated.target_revenue, 1500.0);
    assert_eq!(updated.name, "May push");

    assert!(db.delete_goal(&goal.id).await.expect("delete"));
    assert!(db.get_goal(&goal.id).await.expect("get").is_none());
}

#[tokio::test]
async fn action_item_done_toggle() {
    let db = DuckDbBackend::open_in_memory().expect("db");

    let item = db
        .create_action_item(CreateActionItemParams {
            client_id: None,
            title: "Prepare weekly review".to_string(),
            due_date: Some(date(2024, 5, 17)),
        })
        .await
        .expect("create");
    assert!(!item.done);

    let done = db
        .update_action_item(
            &item.id,
            UpdateActionItemParams {
                title: None,
                due_date: None,
                done: Some(true),
            },
        )
        .await
        .expect("update")
        .expect("found");
    assert!(done.done);
    assert_eq!(done.due_date, Some(date(2024, 5, 17)));

    assert!(db.delete_action_item(&item.id).await.expect("delete"));
}
