use serde_json::Value;

use crate::tests::helper;
use crate::tests::helper::days_from_today;

#[tokio::test]
async fn test_announcements_newest_first() {
    let mut app = helper::setup_test_app().await;

    let mut inactive = helper::announcement_payload("Inactive", None, None, "2099-01-31");
    inactive.insert("is_active".to_string(), Value::Bool(false));

    let payloads = [
        helper::announcement_payload("Expired", Some("high"), None, &days_from_today(-30)),
        inactive,
        helper::announcement_payload("Upcoming", Some("low"), Some("2099-01-01"), "2099-01-31"),
        helper::announcement_payload("Current", None, None, &days_from_today(30)),
    ];

    let mut ids = Vec::new();

    for payload in &payloads {
        ids.push(helper::create_announcement(&mut app, payload).await);
        helper::tick();
    }

    let announcements = helper::list_announcements(&mut app).await;

    ids.reverse();
    assert_eq!(
        ids,
        announcements
            .iter()
            .map(|announcement| announcement.id.clone())
            .collect::<Vec<_>>()
    );

    assert_eq!(
        vec!["Current", "Upcoming", "Inactive", "Expired"],
        announcements
            .iter()
            .map(|announcement| announcement.title.as_str())
            .collect::<Vec<_>>()
    );
}

#[tokio::test]
async fn test_announcements_round_trip() {
    let mut app = helper::setup_test_app().await;

    let mut payload = helper::announcement_payload(
        "Graduation rehearsal",
        Some("low"),
        Some("2099-05-01"),
        "2099-05-20",
    );
    payload.insert("is_active".to_string(), Value::Bool(false));

    let id = helper::create_announcement(&mut app, &payload).await;

    let announcements = helper::list_announcements(&mut app).await;
    assert_eq!(1, announcements.len());

    let announcement = &announcements[0];
    assert_eq!(id, announcement.id);
    assert_eq!(payload["title"].as_str(), Some(announcement.title.as_str()));
    assert_eq!(
        payload["message"].as_str(),
        Some(announcement.message.as_str())
    );
    assert_eq!("low", announcement.priority);
    assert_eq!(Some("2099-05-01".to_string()), announcement.start_date);
    assert_eq!("2099-05-20", announcement.end_date);
    assert!(!announcement.is_active);
    assert_eq!(helper::STAFF, announcement.created_by);
    assert!(announcement.created_at.starts_with("20"));
}
