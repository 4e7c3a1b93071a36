use super::models::{self, WellReading};
use crate::config::test_helpers::{
    create_test_microplate, get_json, post_json, setup_test_app, setup_test_app_with_db,
};
use axum::http::StatusCode;
use chrono::{TimeZone, Utc};
use rstest::rstest;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait};
use serde_json::{Value, json};

async fn insert_reading(
    db: &DatabaseConnection,
    microplate_id: i64,
    row: i32,
    column: i32,
    confluency_percentage: f64,
    hour: u32,
) -> models::Model {
    WellReading {
        row,
        column,
        confluency_percentage,
    }
    .into_active_model(
        i32::try_from(microplate_id).unwrap(),
        Utc.with_ymd_and_hms(2025, 3, 1, hour, 0, 0).unwrap(),
    )
    .insert(db)
    .await
    .expect("Failed to insert reading")
}

fn wells(body: &Value) -> Vec<(i64, i64)> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|m| (m["row"].as_i64().unwrap(), m["column"].as_i64().unwrap()))
        .collect()
}

#[tokio::test]
async fn test_plate_a_walkthrough() {
    let app = setup_test_app().await;
    let id = create_test_microplate(&app, "Plate-A", 1, 2).await;
    let uri = format!("/api/microplates/{id}/measurements");

    let (status, created) = post_json(
        &app,
        &uri,
        &json!({"row": 0, "column": 0, "confluency_percentage": 55.5}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "Failed to create: {created:?}");
    assert_eq!(created["microplate_id"], id);
    assert_eq!(created["row"], 0);
    assert_eq!(created["column"], 0);
    assert_eq!(created["confluency_percentage"], 55.5);
    assert!(created["id"].is_i64());
    let timestamp = created["timestamp"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());

    let (status, body) = post_json(
        &app,
        &uri,
        &json!({"row": 0, "column": 5, "confluency_percentage": 10}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Column must be between 0 and 1");

    let (status, body) = get_json(&app, &format!("{uri}/latest")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(wells(&body), vec![(0, 0)]);
    assert_eq!(body[0]["id"], created["id"]);
    assert_eq!(body[0]["confluency_percentage"], 55.5);
}

#[rstest]
#[case(json!({"row": 2, "column": 0, "confluency_percentage": 50}), "Row must be between 0 and 1")]
#[case(json!({"row": -1, "column": 0, "confluency_percentage": 50}), "Row must be between 0 and 1")]
#[case(json!({"row": 0, "column": 3, "confluency_percentage": 50}), "Column must be between 0 and 2")]
#[case(json!({"row": 0, "column": -1, "confluency_percentage": 50}), "Column must be between 0 and 2")]
#[case(json!({"row": 0, "column": 0, "confluency_percentage": -0.1}), "Confluency percentage must be between 0 and 100")]
#[case(json!({"row": 0, "column": 0, "confluency_percentage": 100.01}), "Confluency percentage must be between 0 and 100")]
#[case(json!({"row": 0, "column": 0, "confluency_percentage": "abc"}), "Invalid number format")]
#[case(json!({"row": 0.5, "column": 0, "confluency_percentage": 50}), "Invalid number format")]
#[case(json!({"column": 0, "confluency_percentage": 50}), "row is required")]
#[case(json!({"row": 0, "confluency_percentage": 50}), "column is required")]
#[case(json!({"row": 0, "column": 0}), "confluency_percentage is required")]
#[tokio::test]
async fn test_invalid_measurement_rejected(#[case] payload: Value, #[case] expected: &str) {
    let (app, db) = setup_test_app_with_db().await;
    let id = create_test_microplate(&app, "Plate-Bounds", 2, 3).await;

    let (status, body) = post_json(&app, &format!("/api/microplates/{id}/measurements"), &payload).await;

    assert_eq!(status, StatusCode::BAD_REQUEST, "payload {payload}");
    assert_eq!(body["error"], expected);
    assert_eq!(models::Entity::find().count(&db).await.unwrap(), 0);
}

#[rstest]
#[case(0, 0, json!(0))]
#[case(1, 2, json!(100))]
#[case(1, 0, json!("42.25"))]
#[tokio::test]
async fn test_boundary_measurements_accepted(
    #[case] row: i32,
    #[case] column: i32,
    #[case] confluency: Value,
) {
    let app = setup_test_app().await;
    let id = create_test_microplate(&app, "Plate-Edges", 2, 3).await;

    let (status, body) = post_json(
        &app,
        &format!("/api/microplates/{id}/measurements"),
        &json!({"row": row, "column": column, "confluency_percentage": confluency}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "Failed to create: {body:?}");

    let (_, latest) = get_json(&app, &format!("/api/microplates/{id}/measurements/latest")).await;
    assert_eq!(wells(&latest), vec![(i64::from(row), i64::from(column))]);
    assert_eq!(latest[0]["id"], body["id"]);
}

#[tokio::test]
async fn test_measurement_for_unknown_plate_not_found() {
    let app = setup_test_app().await;

    let (status, body) = post_json(
        &app,
        "/api/microplates/999/measurements",
        &json!({"row": 0, "column": 0, "confluency_percentage": 50}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Microplate with id '999' not found");
}

#[tokio::test]
async fn test_missing_fields_checked_before_plate_lookup() {
    let app = setup_test_app().await;

    let (status, body) = post_json(&app, "/api/microplates/999/measurements", &json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "row is required");
}

#[tokio::test]
async fn test_latest_for_unknown_plate_is_not_found() {
    let app = setup_test_app().await;

    let (status, body) = get_json(&app, "/api/microplates/12345/measurements/latest").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());

    let (status, body) = get_json(&app, "/api/microplates/not-a-number/measurements/latest").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Resource not found");
}

#[tokio::test]
async fn test_latest_for_empty_plate_is_empty() {
    let app = setup_test_app().await;
    let id = create_test_microplate(&app, "Plate-Empty", 2, 3).await;

    let (status, body) = get_json(&app, &format!("/api/microplates/{id}/measurements/latest")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_latest_picks_newest_per_well_in_row_major_order() {
    let (app, db) = setup_test_app_with_db().await;
    let id = create_test_microplate(&app, "Plate-Latest", 2, 3).await;

    // Inserted out of both time and grid order
    insert_reading(&db, id, 1, 2, 10.0, 9).await;
    let newest_b3 = insert_reading(&db, id, 1, 2, 30.0, 11).await;
    insert_reading(&db, id, 1, 2, 20.0, 10).await;
    let only_a2 = insert_reading(&db, id, 0, 1, 75.0, 8).await;
    insert_reading(&db, id, 0, 0, 5.0, 7).await;
    let newest_a1 = insert_reading(&db, id, 0, 0, 15.0, 12).await;

    let (status, body) = get_json(&app, &format!("/api/microplates/{id}/measurements/latest")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(wells(&body), vec![(0, 0), (0, 1), (1, 2)]);

    let ids: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_i64().unwrap())
        .collect();
    assert_eq!(
        ids,
        vec![
            i64::from(newest_a1.id),
            i64::from(only_a2.id),
            i64::from(newest_b3.id)
        ]
    );
    assert_eq!(body[2]["confluency_percentage"], 30.0);
}

#[tokio::test]
async fn test_latest_returns_one_reading_on_timestamp_tie() {
    let (app, db) = setup_test_app_with_db().await;
    let id = create_test_microplate(&app, "Plate-Tie", 1, 1).await;

    insert_reading(&db, id, 0, 0, 40.0, 9).await;
    insert_reading(&db, id, 0, 0, 60.0, 9).await;

    let (_, body) = get_json(&app, &format!("/api/microplates/{id}/measurements/latest")).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_latest_is_scoped_to_plate() {
    let (app, db) = setup_test_app_with_db().await;
    let plate_a = create_test_microplate(&app, "Plate-Scope-A", 2, 2).await;
    let plate_b = create_test_microplate(&app, "Plate-Scope-B", 2, 2).await;

    insert_reading(&db, plate_a, 0, 0, 10.0, 8).await;
    insert_reading(&db, plate_b, 1, 1, 90.0, 9).await;

    let (_, body) = get_json(&app, &format!("/api/microplates/{plate_a}/measurements/latest")).await;
    assert_eq!(wells(&body), vec![(0, 0)]);
    assert_eq!(body[0]["microplate_id"], plate_a);
}

#[tokio::test]
async fn test_well_history_newest_first() {
    let (app, db) = setup_test_app_with_db().await;
    let id = create_test_microplate(&app, "Plate-History", 2, 3).await;

    insert_reading(&db, id, 1, 1, 20.0, 8).await;
    insert_reading(&db, id, 1, 1, 45.0, 10).await;
    insert_reading(&db, id, 1, 1, 30.0, 9).await;
    insert_reading(&db, id, 0, 1, 99.0, 11).await;

    let (status, body) = get_json(&app, &format!("/api/microplates/{id}/measurements/well/1/1")).await;
    assert_eq!(status, StatusCode::OK);
    let percentages: Vec<f64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["confluency_percentage"].as_f64().unwrap())
        .collect();
    assert_eq!(percentages, vec![45.0, 30.0, 20.0]);

    let (status, body) = get_json(&app, &format!("/api/microplates/{id}/measurements/well/1/0")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_well_history_validates_position() {
    let app = setup_test_app().await;
    let id = create_test_microplate(&app, "Plate-History-Bounds", 2, 3).await;

    let (status, body) = get_json(&app, &format!("/api/microplates/{id}/measurements/well/2/0")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Row must be between 0 and 1");

    let (status, body) = get_json(&app, &format!("/api/microplates/{id}/measurements/well/0/-1")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Column must be between 0 and 2");

    let (status, _) = get_json(&app, "/api/microplates/999/measurements/well/0/0").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
