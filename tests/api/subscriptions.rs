use crate::helpers::{subscription_body, TestApp};
use serde_json::{json, Value};
use uuid::Uuid;

#[tokio::test]
async fn create_returns_a_201_with_the_stored_subscription() {
    // given
    let app = TestApp::spawn().await;
    let user_id = Uuid::new_v4();
    let body = json!({
        "service_name": "Yandex Plus",
        "price": 400,
        "user_id": user_id,
        "start_date": "07-2025",
        "end_date": "12-2025",
    });

    // when
    let response = app.post_subscription(&body).await;

    // then
    assert_eq!(response.status().as_u16(), 201);
    let envelope: Value = response.json().await.unwrap();
    assert_eq!(envelope["success"], true);
    assert_eq!(envelope["message"], "subscription created");
    assert_eq!(envelope["data"]["service_name"], "Yandex Plus");
    assert_eq!(envelope["data"]["price"], 400);
    assert_eq!(envelope["data"]["user_id"], user_id.to_string());
    assert_eq!(envelope["data"]["start_date"], "07-2025");
    assert_eq!(envelope["data"]["end_date"], "12-2025");
    assert!(envelope["data"]["created_at"].is_string());
    assert_eq!(app.repository.len().await, 1);
}

#[tokio::test]
async fn create_omits_an_absent_end_date() {
    // given
    let app = TestApp::spawn().await;

    // when
    let response = app
        .post_subscription(&subscription_body(Uuid::new_v4(), "Netflix", 0, "01-2024"))
        .await;

    // then
    assert_eq!(response.status().as_u16(), 201);
    let envelope: Value = response.json().await.unwrap();
    assert!(envelope["data"].get("end_date").is_none());
    assert_eq!(envelope["data"]["price"], 0);
}

#[tokio::test]
async fn prices_beyond_32_bits_are_stored_and_summed() {
    // given
    let app = TestApp::spawn().await;
    let user_id = Uuid::new_v4();
    let price = i64::from(i32::MAX) + 1;

    // when
    let response = app
        .post_subscription(&subscription_body(user_id, "Enterprise", price, "01-2024"))
        .await;
    app.create_subscription(&subscription_body(user_id, "Enterprise", price, "02-2024"))
        .await;

    // then
    assert_eq!(response.status().as_u16(), 201);
    let envelope: Value = response.json().await.unwrap();
    assert_eq!(envelope["data"]["price"], price);

    let total: Value = app
        .get_total_price(&[("user-id", user_id.to_string().as_str())])
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(total["data"], price * 2);
}

#[tokio::test]
async fn create_returns_a_422_for_invalid_subscriptions() {
    // given
    let app = TestApp::spawn().await;
    let user_id = Uuid::new_v4();
    let test_cases = vec![
        (
            json!({
                "service_name": "Netflix",
                "price": 100,
                "user_id": user_id,
                "start_date": "06-2024",
                "end_date": "05-2024",
            }),
            "end date cannot be before start date",
        ),
        (
            subscription_body(user_id, "Netflix", -1, "06-2024"),
            "price cannot be negative",
        ),
        (
            subscription_body(user_id, "  ", 100, "06-2024"),
            "service name cannot be empty",
        ),
    ];

    for (body, message) in test_cases {
        // when
        let response = app.post_subscription(&body).await;

        // then
        assert_eq!(
            response.status().as_u16(),
            422,
            "The API did not fail with 422 Unprocessable Entity when the error was {message}"
        );
        let envelope: Value = response.json().await.unwrap();
        assert_eq!(envelope["success"], false);
        assert_eq!(envelope["message"], message);
    }
    assert!(app.repository.is_empty().await);
}

#[tokio::test]
async fn create_returns_a_400_for_malformed_bodies() {
    // given
    let app = TestApp::spawn().await;
    let test_cases = vec![
        (r#"{"service_name": "Netflix""#, "truncated json"),
        (
            r#"{"service_name": "Netflix", "price": 1, "user_id": "00000000-0000-0000-0000-000000000000", "start_date": "2024-01"}"#,
            "storage formatted start date",
        ),
        (
            r#"{"service_name": "Netflix", "price": 1, "user_id": "00000000-0000-0000-0000-000000000000", "start_date": "13-2024"}"#,
            "month out of range",
        ),
        (r#"{"service_name": "Netflix", "price": 1}"#, "missing fields"),
    ];

    for (body, description) in test_cases {
        // when
        let response = app.post_raw_subscription(body).await;

        // then
        assert_eq!(
            response.status().as_u16(),
            400,
            "The API did not return a 400 BAD_REQUEST when the payload was {description}"
        );
        let envelope: Value = response.json().await.unwrap();
        assert_eq!(envelope["success"], false);
    }
    assert!(app.repository.is_empty().await);
}

#[tokio::test]
async fn get_returns_a_created_subscription() {
    // given
    let app = TestApp::spawn().await;
    let id = app
        .create_subscription(&subscription_body(Uuid::new_v4(), "Netflix", 599, "03-2024"))
        .await;

    // when
    let response = app.get_subscription(&id).await;

    // then
    assert_eq!(response.status().as_u16(), 200);
    let envelope: Value = response.json().await.unwrap();
    assert_eq!(envelope["data"]["id"], id);
    assert_eq!(envelope["data"]["start_date"], "03-2024");
}

#[tokio::test]
async fn get_returns_a_400_for_a_malformed_id() {
    // given
    let app = TestApp::spawn().await;

    // when
    let response = app.get_subscription("not-a-uuid").await;

    // then
    assert_eq!(response.status().as_u16(), 400);
    let envelope: Value = response.json().await.unwrap();
    assert_eq!(envelope["message"], "invalid subscription ID format");
}

#[tokio::test]
async fn get_returns_a_404_for_an_unknown_id() {
    // given
    let app = TestApp::spawn().await;

    // when
    let response = app.get_subscription(&Uuid::new_v4().to_string()).await;

    // then
    assert_eq!(response.status().as_u16(), 404);
    let envelope: Value = response.json().await.unwrap();
    assert_eq!(envelope["success"], false);
}

#[tokio::test]
async fn list_returns_only_the_users_subscriptions() {
    // given
    let app = TestApp::spawn().await;
    let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
    app.create_subscription(&subscription_body(alice, "Netflix", 100, "01-2024"))
        .await;
    app.create_subscription(&subscription_body(alice, "Spotify", 200, "02-2024"))
        .await;
    app.create_subscription(&subscription_body(bob, "Netflix", 300, "01-2024"))
        .await;

    // when
    let response = app
        .get_subscriptions(&[("user-id", alice.to_string().as_str())])
        .await;

    // then
    assert_eq!(response.status().as_u16(), 200);
    let envelope: Value = response.json().await.unwrap();
    let subscriptions = envelope["data"].as_array().unwrap();
    assert_eq!(subscriptions.len(), 2);
    assert!(subscriptions
        .iter()
        .all(|subscription| subscription["user_id"] == alice.to_string()));
}

#[tokio::test]
async fn list_returns_a_400_without_a_valid_user_id() {
    // given
    let app = TestApp::spawn().await;
    let test_cases = vec![
        (vec![], "user-id query parameter is required"),
        (vec![("user-id", "")], "user-id query parameter is required"),
        (vec![("user-id", "42")], "invalid user-id format"),
    ];

    for (query, message) in test_cases {
        // when
        let response = app.get_subscriptions(&query).await;

        // then
        assert_eq!(response.status().as_u16(), 400);
        let envelope: Value = response.json().await.unwrap();
        assert_eq!(envelope["message"], message);
    }
}

#[tokio::test]
async fn update_merges_the_patch() {
    // given
    let app = TestApp::spawn().await;
    let id = app
        .create_subscription(&json!({
            "service_name": "A",
            "price": 10,
            "user_id": Uuid::new_v4(),
            "start_date": "01-2024",
            "end_date": "06-2024",
        }))
        .await;

    // when
    let response = app
        .put_subscription(&id, &json!({"price": 0, "end_date": "06-2024"}))
        .await;

    // then
    assert_eq!(response.status().as_u16(), 200);
    let envelope: Value = response.json().await.unwrap();
    assert_eq!(envelope["message"], "subscription updated");
    assert_eq!(envelope["data"]["price"], 0);
    assert_eq!(envelope["data"]["service_name"], "A");
    assert_eq!(envelope["data"]["start_date"], "01-2024");
    assert_eq!(envelope["data"]["end_date"], "06-2024");
}

#[tokio::test]
async fn update_without_an_end_date_clears_it() {
    // given
    let app = TestApp::spawn().await;
    let id = app
        .create_subscription(&json!({
            "service_name": "A",
            "price": 10,
            "user_id": Uuid::new_v4(),
            "start_date": "01-2024",
            "end_date": "06-2024",
        }))
        .await;

    // when
    let response = app
        .put_subscription(&id, &json!({"service_name": null, "end_date": null}))
        .await;

    // then
    assert_eq!(response.status().as_u16(), 200);
    let envelope: Value = response.json().await.unwrap();
    assert!(envelope["data"].get("end_date").is_none());
    assert_eq!(envelope["data"]["service_name"], "A");
}

#[tokio::test]
async fn update_returns_a_422_and_keeps_the_subscription_for_an_invalid_patch() {
    // given
    let app = TestApp::spawn().await;
    let id = app
        .create_subscription(&subscription_body(Uuid::new_v4(), "A", 10, "01-2024"))
        .await;

    // when
    let response = app.put_subscription(&id, &json!({"price": -5})).await;

    // then
    assert_eq!(response.status().as_u16(), 422);
    let stored: Value = app.get_subscription(&id).await.json().await.unwrap();
    assert_eq!(stored["data"]["price"], 10);
}

#[tokio::test]
async fn update_returns_a_404_for_an_unknown_id() {
    // given
    let app = TestApp::spawn().await;

    // when
    let response = app
        .put_subscription(&Uuid::new_v4().to_string(), &json!({"price": 1}))
        .await;

    // then
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn a_deleted_subscription_is_gone() {
    // given
    let app = TestApp::spawn().await;
    let id = app
        .create_subscription(&subscription_body(Uuid::new_v4(), "A", 10, "01-2024"))
        .await;

    // when
    let response = app.delete_subscription(&id).await;

    // then
    assert_eq!(response.status().as_u16(), 200);
    let envelope: Value = response.json().await.unwrap();
    assert_eq!(envelope["message"], "subscription deleted");
    assert!(envelope.get("data").is_none());
    assert_eq!(app.get_subscription(&id).await.status().as_u16(), 404);
    assert_eq!(app.delete_subscription(&id).await.status().as_u16(), 404);
}

#[tokio::test]
async fn total_price_is_zero_without_matches() {
    // given
    let app = TestApp::spawn().await;

    // when
    let response = app
        .get_total_price(&[("user-id", Uuid::new_v4().to_string().as_str())])
        .await;

    // then
    assert_eq!(response.status().as_u16(), 200);
    let envelope: Value = response.json().await.unwrap();
    assert_eq!(envelope["message"], "total price calculated");
    assert_eq!(envelope["data"], 0);
}

#[tokio::test]
async fn total_price_combines_its_filters() {
    // given
    let app = TestApp::spawn().await;
    let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
    for (user_id, service_name, price, start) in [
        (alice, "Netflix", 100, "01-2024"),
        (alice, "Netflix", 200, "04-2024"),
        (alice, "Netflix", 400, "09-2024"),
        (alice, "Spotify", 800, "04-2024"),
        (bob, "Netflix", 1600, "04-2024"),
    ] {
        app.create_subscription(&subscription_body(user_id, service_name, price, start))
            .await;
    }
    let alice = alice.to_string();
    let test_cases: Vec<(Vec<(&str, &str)>, i64)> = vec![
        (vec![("user-id", alice.as_str())], 1500),
        (vec![("user-id", alice.as_str()), ("service-name", "Netflix")], 700),
        (vec![("user-id", alice.as_str()), ("service-name", "")], 1500),
        (
            vec![
                ("user-id", alice.as_str()),
                ("service-name", "Netflix"),
                ("from", "02-2024"),
                ("to", "09-2024"),
            ],
            600,
        ),
        (vec![("user-id", alice.as_str()), ("to", "04-2024")], 1100),
        (vec![("user-id", alice.as_str()), ("from", "10-2024")], 0),
    ];

    for (query, expected) in test_cases {
        // when
        let response = app.get_total_price(&query).await;

        // then
        assert_eq!(response.status().as_u16(), 200);
        let envelope: Value = response.json().await.unwrap();
        assert_eq!(envelope["data"], expected, "Unexpected total for {query:?}");
    }
}

#[tokio::test]
async fn total_price_returns_a_400_for_malformed_parameters() {
    // given
    let app = TestApp::spawn().await;
    let user_id = Uuid::new_v4().to_string();
    let test_cases = vec![
        (vec![], "user-id query parameter is required"),
        (vec![("user-id", "abc")], "invalid user-id format"),
        (
            vec![("user-id", user_id.as_str()), ("from", "2024-01")],
            "invalid from date format",
        ),
        (
            vec![("user-id", user_id.as_str()), ("to", "13-2024")],
            "invalid to date format",
        ),
    ];

    for (query, message) in test_cases {
        // when
        let response = app.get_total_price(&query).await;

        // then
        assert_eq!(response.status().as_u16(), 400);
        let envelope: Value = response.json().await.unwrap();
        assert_eq!(envelope["message"], message);
    }
}
