use city_info::adapters::mail_service_from_config;
use city_info::config::MailConfig;
use city_info::domain::model::sample_cities;
use city_info::domain::ports::MailService;
use city_info::{CityDataStore, CityInfoError, PointsOfInterestService, WebhookMailService};
use httpmock::prelude::*;
use std::sync::Arc;

fn mail_config(webhook_url: Option<String>) -> MailConfig {
    MailConfig {
        to: "admin@mycompany.com".to_string(),
        from: "noreply@mycompany.com".to_string(),
        webhook_url,
    }
}

#[tokio::test]
async fn test_webhook_posts_mail_as_json() {
    let server = MockServer::start();
    let hook = server.mock(|when, then| {
        when.method(POST)
            .path("/mail")
            .header("content-type", "application/json")
            .json_body_partial(
                r#"{
                    "to": "admin@mycompany.com",
                    "from": "noreply@mycompany.com",
                    "subject": "Hello",
                    "message": "World"
                }"#,
            );
        then.status(202);
    });

    let service = WebhookMailService::new(server.url("/mail"), &mail_config(None));
    service.send("Hello", "World").await.unwrap();

    hook.assert();
}

#[tokio::test]
async fn test_webhook_failure_status_is_notification_error() {
    let server = MockServer::start();
    let hook = server.mock(|when, then| {
        when.method(POST).path("/mail");
        then.status(503);
    });

    let service = WebhookMailService::new(server.url("/mail"), &mail_config(None));
    let err = service.send("Hello", "World").await.unwrap_err();

    hook.assert();
    assert!(matches!(err, CityInfoError::NotificationError { .. }));
}

#[tokio::test]
async fn test_delete_notifies_configured_webhook() {
    let server = MockServer::start();
    let hook = server.mock(|when, then| {
        when.method(POST).path("/mail").json_body_partial(
            r#"{
                "subject": "Point of interest deleted.",
                "message": "Point of interest The Louvre with id 6 deleted."
            }"#,
        );
        then.status(200);
    });

    let mail_service = mail_service_from_config(&mail_config(Some(server.url("/mail"))));
    let service = PointsOfInterestService::new(
        Arc::new(CityDataStore::in_memory(sample_cities())),
        mail_service,
    );

    service.delete_point_of_interest(3, 6).await.unwrap();

    hook.assert_hits(1);
}

#[tokio::test]
async fn test_unreachable_webhook_does_not_fail_delete() {
    // 沒有服務在此埠口監聽
    let mail_service = mail_service_from_config(&mail_config(Some(
        "http://127.0.0.1:9/mail".to_string(),
    )));
    let service = PointsOfInterestService::new(
        Arc::new(CityDataStore::in_memory(sample_cities())),
        mail_service,
    );

    assert!(service.delete_point_of_interest(1, 1).await.is_ok());
    assert!(service.get_point_of_interest(1, 1).await.is_err());
}
