use serde_json::Value;
use uuid::Uuid;

use crate::TestServer;

#[tokio::test]
async fn delete_by_email_removes_exactly_one_record() {
    let server = TestServer::spawn().await;
    server.create("a@b.com").await;
    server.create("c@d.com").await;

    let response = server.delete_subscriber("a@b.com").await;
    assert_eq!(response.status().as_u16(), 200);
    let body = response.json::<Value>().await.unwrap();
    assert_eq!(body["message"], "Email a@b.com successfully deleted");

    let body = server.list_subscribers().await.json::<Value>().await.unwrap();
    let users = body["users"].as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["email"], "c@d.com");
}

#[tokio::test]
async fn delete_by_id_removes_the_record() {
    let server = TestServer::spawn().await;
    let created = server.create("a@b.com").await;
    let id = created["id"].as_str().unwrap();

    let response = server.delete_subscriber(id).await;
    assert_eq!(response.status().as_u16(), 200);
    let body = response.json::<Value>().await.unwrap();
    assert_eq!(body["message"], format!("{} successfully deleted.", id));
    assert_eq!(server.get_subscriber(id).await.status().as_u16(), 404);
}

#[tokio::test]
async fn delete_returns_404_for_unknown_subscriber() {
    let server = TestServer::spawn().await;
    assert_eq!(server.delete_subscriber("a@b.com").await.status().as_u16(), 404);
    assert_eq!(
        server
            .delete_subscriber(&Uuid::new_v4().to_string())
            .await
            .status()
            .as_u16(),
        404
    );
}

#[tokio::test]
async fn delete_returns_422_for_invalid_email() {
    let server = TestServer::spawn().await;
    let response = server.delete_subscriber("bad-email").await;
    assert_eq!(response.status().as_u16(), 422);
    let body = response.json::<Value>().await.unwrap();
    assert_eq!(body["message"], "Invalid email format");
}
