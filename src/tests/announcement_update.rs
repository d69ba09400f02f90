use axum::http::StatusCode;
use serde_json::Map;
use serde_json::Value;

use crate::tests::helper;
use crate::tests::helper::STAFF;

fn update(fields: &[(&str, Value)]) -> Map<String, Value> {
    fields
        .iter()
        .map(|(field, value)| ((*field).to_string(), value.clone()))
        .collect()
}

#[tokio::test]
async fn test_announcement_update() {
    let mut app = helper::setup_test_app().await;

    let payload =
        helper::announcement_payload("Bake sale", Some("low"), Some("2099-01-01"), "2099-01-31");
    let id = helper::create_announcement(&mut app, &payload).await;
    let original = helper::single_announcement(&mut app, &id).await.unwrap();

    let (status_code, error) = helper::maybe_update_announcement(
        &mut app,
        Some(STAFF),
        &id,
        &update(&[
            ("title", Value::String("Bake sale (rescheduled)".to_string())),
            ("priority", Value::String("high".to_string())),
            ("end_date", Value::String("2099-02-28".to_string())),
        ]),
    )
    .await;
    assert_eq!(StatusCode::OK, status_code, "{error:?}");

    let announcement = helper::single_announcement(&mut app, &id).await.unwrap();
    assert_eq!("Bake sale (rescheduled)", announcement.title);
    assert_eq!("high", announcement.priority);
    assert_eq!("2099-02-28", announcement.end_date);

    // untouched
    assert_eq!(original.message, announcement.message);
    assert_eq!(original.start_date, announcement.start_date);
    assert_eq!(original.is_active, announcement.is_active);
    assert_eq!(original.created_by, announcement.created_by);
    assert_eq!(original.created_at, announcement.created_at);
}

#[tokio::test]
async fn test_announcement_update_skips_null_fields() {
    let mut app = helper::setup_test_app().await;

    let payload = helper::announcement_payload("Book fair", None, None, "2099-01-31");
    let id = helper::create_announcement(&mut app, &payload).await;

    let (status_code, _) = helper::maybe_update_announcement(
        &mut app,
        Some(STAFF),
        &id,
        &update(&[
            ("title", Value::Null),
            ("message", Value::String("In the gym this year".to_string())),
            ("end_date", Value::Null),
        ]),
    )
    .await;
    assert_eq!(StatusCode::OK, status_code);

    let announcement = helper::single_announcement(&mut app, &id).await.unwrap();
    assert_eq!("Book fair", announcement.title);
    assert_eq!("In the gym this year", announcement.message);
    assert_eq!("2099-01-31", announcement.end_date);
}

#[tokio::test]
async fn test_announcement_update_nothing_to_update() {
    let mut app = helper::setup_test_app().await;

    let payload = helper::announcement_payload("Picture day", None, None, "2099-01-31");
    let id = helper::create_announcement(&mut app, &payload).await;
    let original = helper::single_announcement(&mut app, &id).await.unwrap();

    for payload in [
        Map::new(),
        update(&[("title", Value::Null), ("is_active", Value::Null)]),
        update(&[("unknown", Value::String("field".to_string()))]),
    ] {
        let (status_code, error) =
            helper::maybe_update_announcement(&mut app, Some(STAFF), &id, &payload).await;
        assert_eq!(StatusCode::BAD_REQUEST, status_code);
        assert_eq!("No valid fields to update".to_string(), error.unwrap().error);
    }

    assert_eq!(
        Some(original),
        helper::single_announcement(&mut app, &id).await
    );
}

#[tokio::test]
async fn test_announcement_update_invalid_dates() {
    let mut app = helper::setup_test_app().await;

    let payload = helper::announcement_payload("Science fair", None, None, "2099-01-31");
    let id = helper::create_announcement(&mut app, &payload).await;
    let original = helper::single_announcement(&mut app, &id).await.unwrap();

    let (status_code, error) = helper::maybe_update_announcement(
        &mut app,
        Some(STAFF),
        &id,
        &update(&[
            ("title", Value::String("Science fair 2099".to_string())),
            ("start_date", Value::String("2099-02-30".to_string())),
        ]),
    )
    .await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!(
        "Invalid start_date format. Use YYYY-MM-DD".to_string(),
        error.unwrap().error
    );

    for end_date in ["2099-13-01", ""] {
        let (status_code, error) = helper::maybe_update_announcement(
            &mut app,
            Some(STAFF),
            &id,
            &update(&[("end_date", Value::String(end_date.to_string()))]),
        )
        .await;
        assert_eq!(StatusCode::BAD_REQUEST, status_code);
        assert_eq!(
            "Invalid end_date format. Use YYYY-MM-DD".to_string(),
            error.unwrap().error
        );
    }

    // no partial updates
    assert_eq!(
        Some(original),
        helper::single_announcement(&mut app, &id).await
    );
}

#[tokio::test]
async fn test_announcement_update_clear_start_date() {
    let mut app = helper::setup_test_app().await;

    let payload =
        helper::announcement_payload("Open house", None, Some("2099-01-10"), "2099-01-31");
    let id = helper::create_announcement(&mut app, &payload).await;

    let (status_code, _) = helper::maybe_update_announcement(
        &mut app,
        Some(STAFF),
        &id,
        &update(&[("start_date", Value::String(String::new()))]),
    )
    .await;
    assert_eq!(StatusCode::OK, status_code);

    let announcement = helper::single_announcement(&mut app, &id).await.unwrap();
    assert_eq!(None, announcement.start_date);
    assert_eq!(vec!["Open house"], helper::list_active_titles(&mut app).await);
}

#[tokio::test]
async fn test_announcement_update_unchanged_values() {
    let mut app = helper::setup_test_app().await;

    let payload = helper::announcement_payload("Spirit week", Some("high"), None, "2099-01-31");
    let id = helper::create_announcement(&mut app, &payload).await;

    let (status_code, error) = helper::maybe_update_announcement(
        &mut app,
        Some(STAFF),
        &id,
        &update(&[
            ("title", Value::String("Spirit week".to_string())),
            ("priority", Value::String("high".to_string())),
        ]),
    )
    .await;
    assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, status_code);
    assert_eq!(
        "Failed to update announcement".to_string(),
        error.unwrap().error
    );
}

#[tokio::test]
async fn test_announcement_update_unknown_announcement() {
    let mut app = helper::setup_test_app().await;

    let payload = update(&[("title", Value::String("Anything".to_string()))]);

    let (status_code, error) = helper::maybe_update_announcement(
        &mut app,
        Some(STAFF),
        "67e55044-10b1-426f-9247-bb680e5fe0c8",
        &payload,
    )
    .await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);
    assert_eq!("Announcement not found".to_string(), error.unwrap().error);

    let (status_code, error) =
        helper::maybe_update_announcement(&mut app, Some(STAFF), "some-id", &payload).await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!("Invalid announcement ID".to_string(), error.unwrap().error);
}

#[tokio::test]
async fn test_announcement_update_checks_announcement_before_dates() {
    let mut app = helper::setup_test_app().await;

    let (status_code, error) = helper::maybe_update_announcement(
        &mut app,
        Some(STAFF),
        "67e55044-10b1-426f-9247-bb680e5fe0c8",
        &update(&[("end_date", Value::String("not-a-date".to_string()))]),
    )
    .await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);
    assert_eq!("Announcement not found".to_string(), error.unwrap().error);
}
