//! End-to-end tests against the live server.
//!
//! # Design
//! Starts the server with an in-memory store on a random port, then exercises
//! every client operation over real HTTP. Timeout and cancellation are checked
//! against a listener that accepts connections and never answers.

use std::sync::Arc;
use std::time::{Duration, Instant};

use rest_client::{
    ApiClient, ClientError, CreatePost, CreateUser, HttpMethod, PatchUser, Post, SuccessResponse,
    UpdateUser, User,
};
use rest_server::{AppState, BearerToken, MemoryStore};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const TOKEN: &str = "integration-token";

async fn spawn_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = AppState::new(Arc::new(MemoryStore::new()), BearerToken::new(TOKEN));
    tokio::spawn(rest_server::run(listener, state, std::future::pending()));
    format!("http://{addr}")
}

/// A server that accepts connections and never writes a byte.
async fn spawn_silent_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    format!("http://{addr}")
}

/// A server that answers every request with `200 OK` and a plain-text body.
async fn spawn_plain_text_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match socket.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }
            let _ = socket
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\nOK")
                .await;
            let _ = socket.shutdown().await;
        }
    });
    format!("http://{addr}")
}

fn client(base_url: &str) -> ApiClient {
    ApiClient::new(base_url, TOKEN, Duration::from_secs(5))
}

#[tokio::test]
async fn user_crud_lifecycle() {
    let client = client(&spawn_server().await);

    // Step 1: create.
    let input = CreateUser {
        name: "Jane Smith".to_string(),
        email: "jane.smith@example.com".to_string(),
        username: "janesmith".to_string(),
    };
    let created: User = client.post("/users", &input).await.unwrap().unwrap();
    assert!(created.id > 0);
    assert_eq!(created.name, "Jane Smith");
    assert!(created.created_at.is_some(), "server timestamps should decode");
    let path = format!("/users/{}", created.id);

    // Step 2: get.
    let fetched: User = client.get(&path).await.unwrap().unwrap();
    assert_eq!(fetched, created);

    // Step 3: full update.
    let update = UpdateUser {
        name: "John Updated".to_string(),
        email: "john.updated@example.com".to_string(),
        username: "johnupdated".to_string(),
    };
    let updated: User = client.put(&path, &update).await.unwrap().unwrap();
    assert_eq!(updated.name, "John Updated");
    assert_eq!(updated.username, "johnupdated");

    // Step 4: patch name only.
    let patch = PatchUser {
        name: Some("John Patched".to_string()),
        email: None,
    };
    let patched: User = client.patch(&path, &patch).await.unwrap().unwrap();
    assert_eq!(patched.name, "John Patched");
    assert_eq!(patched.email, "john.updated@example.com");

    // Step 5: delete, keeping the acknowledgement.
    let ack: SuccessResponse = client
        .request::<(), _>(HttpMethod::Delete, &path, None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(ack.message, "User deleted successfully");
    assert_eq!(ack.data.unwrap()["id"], created.id);

    // Step 6: get after delete.
    let err = client.get::<User>(&path).await.unwrap_err();
    assert!(err.is_not_found());
    match err {
        ClientError::Status { body, .. } => assert!(body.contains("User not found")),
        other => panic!("unexpected error: {other:?}"),
    }

    // Step 7: delete again.
    let err = client.delete(&path).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn post_crud_lifecycle() {
    let client = client(&spawn_server().await);

    let input = CreatePost {
        user_id: 1,
        title: "New Post Title".to_string(),
        body: "This is the body of the new post created via API".to_string(),
    };
    let created: Post = client.post("/posts", &input).await.unwrap().unwrap();
    assert_eq!(created.user_id, 1);
    let path = format!("/posts/{}", created.id);

    let update = CreatePost {
        user_id: 1,
        title: "Updated Post Title".to_string(),
        body: "This post has been updated via PUT request".to_string(),
    };
    let updated: Post = client.put(&path, &update).await.unwrap().unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.title, "Updated Post Title");

    client.delete(&path).await.unwrap();
    let err = client.get::<Post>(&path).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn duplicate_user_surfaces_conflict_status() {
    let client = client(&spawn_server().await);
    let input = CreateUser {
        name: "Jane".to_string(),
        email: "jane@example.com".to_string(),
        username: "jane".to_string(),
    };
    let _: Option<User> = client.post("/users", &input).await.unwrap();
    let err = client.post::<_, User>("/users", &input).await.unwrap_err();
    assert_eq!(err.status(), Some(409));
}

#[tokio::test]
async fn wrong_token_is_rejected() {
    let base_url = spawn_server().await;
    let client = ApiClient::new(&base_url, "wrong", Duration::from_secs(5));

    let err = client.get::<User>("/users/1").await.unwrap_err();
    match err {
        ClientError::Status { status, body } => {
            assert_eq!(status, 401);
            assert!(body.contains("Invalid token"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn health_is_reachable() {
    let client = client(&spawn_server().await);
    let health: serde_json::Value = client.get("/health").await.unwrap().unwrap();
    assert_eq!(health["status"], "ok");
}

#[tokio::test]
async fn delete_ignores_plain_text_success_body() {
    let client = client(&spawn_plain_text_server().await);
    client.delete("/posts/1").await.unwrap();
}

#[tokio::test]
async fn timeout_aborts_promptly() {
    let base_url = spawn_silent_server().await;
    let client = ApiClient::new(&base_url, TOKEN, Duration::from_millis(200));

    let started = Instant::now();
    let err = client.get::<User>("/users/1").await.unwrap_err();
    assert!(matches!(err, ClientError::Timeout(_)), "got {err:?}");
    assert!(err.is_transport());
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn cancellation_aborts_promptly() {
    let base_url = spawn_silent_server().await;
    let client = ApiClient::new(&base_url, TOKEN, Duration::from_secs(60));

    let started = Instant::now();
    let err = client
        .request_until::<(), User, _>(
            HttpMethod::Get,
            "/users/1",
            None,
            tokio::time::sleep(Duration::from_millis(100)),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Cancelled), "got {err:?}");
    assert!(err.is_transport());
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn connection_refused_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client(&format!("http://{addr}"));
    let err = client.get::<User>("/users/1").await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)), "got {err:?}");
}
