use serde_json::{json, Value};
use uuid::Uuid;

use crate::helpers::TestApp;

fn subscription(user_id: Uuid, service_name: &str, cost: i64, from: &str, to: Option<&str>) -> Value {
    let mut body = json!({
        "service_name": service_name,
        "cost": cost,
        "user_id": user_id.to_string(),
        "start_date": from,
    });

    if let Some(to) = to {
        body["end_date"] = json!(to);
    }

    body
}

async fn total(test_app: &TestApp, query: &[(&str, &str)]) -> i64 {
    let response = test_app.get_cost(query).await;

    assert_eq!(200, response.status().as_u16(), "query: {:?}", query);

    let body: Value = response.json().await.unwrap();

    body["total"].as_i64().unwrap()
}

#[tokio::test]
async fn cost_is_prorated_over_the_period() {
    let test_app = TestApp::spawn_app().await;
    let user_id = Uuid::new_v4();

    test_app
        .create_subscription(subscription(user_id, "Yandex Plus", 400, "07-2025", Some("12-2025")))
        .await;

    let period = [("start_date", "08-2025"), ("end_date", "09-2025")];

    assert_eq!(total(&test_app, &period).await, 800);
}

#[tokio::test]
async fn cost_for_a_single_month() {
    let test_app = TestApp::spawn_app().await;

    test_app
        .create_subscription(subscription(Uuid::new_v4(), "Spotify", 299, "07-2025", Some("07-2025")))
        .await;

    let period = [("start_date", "07-2025"), ("end_date", "07-2025")];

    assert_eq!(total(&test_app, &period).await, 299);
}

#[tokio::test]
async fn cost_excludes_subscriptions_outside_the_period() {
    let test_app = TestApp::spawn_app().await;

    test_app
        .create_subscription(subscription(Uuid::new_v4(), "Old", 1_000, "01-2025", Some("02-2025")))
        .await;

    let period = [("start_date", "08-2025"), ("end_date", "09-2025")];

    assert_eq!(total(&test_app, &period).await, 0);
}

#[tokio::test]
async fn cost_with_mixed_filters() {
    let test_app = TestApp::spawn_app().await;
    let user_a = Uuid::new_v4();
    let user_b = Uuid::new_v4();

    test_app
        .create_subscription(subscription(user_a, "Skillbox", 10_000, "08-2025", None))
        .await;
    test_app
        .create_subscription(subscription(user_a, "Netflix", 499, "06-2025", Some("08-2025")))
        .await;
    test_app
        .create_subscription(subscription(user_b, "Spotify", 299, "06-2025", None))
        .await;

    let user_a = user_a.to_string();
    let everyone = [("start_date", "08-2025"), ("end_date", "09-2025")];
    let only_a = [
        ("start_date", "08-2025"),
        ("end_date", "09-2025"),
        ("user_id", user_a.as_str()),
    ];
    let only_spotify = [
        ("start_date", "08-2025"),
        ("end_date", "09-2025"),
        ("service_name", "Spotify"),
    ];
    let paginated = [
        ("start_date", "08-2025"),
        ("end_date", "09-2025"),
        ("limit", "1"),
        ("offset", "1"),
    ];

    assert_eq!(total(&test_app, &everyone).await, 20_000 + 499 + 598);
    assert_eq!(total(&test_app, &only_a).await, 20_000 + 499);
    assert_eq!(total(&test_app, &only_spotify).await, 598);
    assert_eq!(total(&test_app, &paginated).await, 20_000 + 499 + 598);
}

#[tokio::test]
async fn cost_requires_both_bounds() {
    let test_app = TestApp::spawn_app().await;

    let test_cases: Vec<(Vec<(&str, &str)>, &str)> = vec![
        (vec![], "no period"),
        (vec![("start_date", "08-2025")], "missing end_date"),
        (vec![("end_date", "09-2025")], "missing start_date"),
        (
            vec![("start_date", "09-2025"), ("end_date", "08-2025")],
            "reversed period",
        ),
        (
            vec![("start_date", "2025/08"), ("end_date", "09-2025")],
            "malformed start_date",
        ),
    ];

    for (query, error_message) in test_cases {
        let response = test_app.get_cost(&query).await;

        assert_eq!(
            422,
            response.status().as_u16(),
            "The API did not fail with 422 status when query was {}",
            error_message
        );

        let body: Value = response.json().await.unwrap();

        assert!(
            body["error"].as_str().unwrap().starts_with("invalid period"),
            "{}",
            error_message
        );
    }
}
