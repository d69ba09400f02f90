use axum::http::StatusCode;

use crate::tests::helper;

#[tokio::test]
async fn test_invalid_json() {
    let mut app = helper::setup_test_app().await;

    // missing data
    let body = r"{}";
    let (status_code, error) =
        helper::maybe_create_announcement_with_raw_body(&mut app, body, true).await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert!(error.is_some());
    let error = error.unwrap();
    assert_eq!("Data error".to_string(), error.error);
    assert_eq!(
        Some(
            "Failed to deserialize the JSON body into the target type: missing field `title` at line 1 column 2"
                .to_string()
        ),
        error.description
    );

    // syntax error
    let body = r#"{"}"#;
    let (status_code, error) =
        helper::maybe_create_announcement_with_raw_body(&mut app, body, true).await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert!(error.is_some());
    let error = error.unwrap();
    assert_eq!("JSON syntax error".to_string(), error.error);
    assert_eq!(
        Some("EOF while parsing a string at line 1 column 3".to_string()),
        error.description
    );

    // wrong type
    let body = r#"{"title":"Recess","message":"Inside","end_date":"2099-01-01","is_active":"yes"}"#;
    let (status_code, error) =
        helper::maybe_create_announcement_with_raw_body(&mut app, body, true).await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!("Data error".to_string(), error.unwrap().error);

    // missing content type
    let body = r#"{"title":"Recess","message":"Inside","end_date":"2099-01-01"}"#;
    let (status_code, error) =
        helper::maybe_create_announcement_with_raw_body(&mut app, body, false).await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert!(error.is_some());
    let error = error.unwrap();
    assert_eq!(
        "Missing `application/json` content type".to_string(),
        error.error
    );

    assert!(helper::list_announcements(&mut app).await.is_empty());
}
