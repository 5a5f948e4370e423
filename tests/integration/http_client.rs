//! Integration tests for the HTTP task client against a mock service.
//!
//! Covers request shape (paths, query strings, headers, bodies) and the
//! mapping of every failure class onto `RemoteError`.
//!
//! Verification command: `cargo test --test http_client`

use std::io::{Read, Write};
use std::net::TcpListener;
use std::time::Duration;

use serde_json::{Value, json};
use wiremock::matchers::{body_json, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use taskdeck::api::http::HttpTaskApi;
use taskdeck::api::{RemoteError, TaskApi, TaskQuery};
use taskdeck::filter::{Filter, FilterState};
use taskdeck_proto::{
    CommentId, CommentPatch, NewComment, NewTask, Priority, TaskId, TaskPatch, TaskStatus,
};

// =============================================================================
// Test helpers
// =============================================================================

fn task_json(id: u64, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": null,
        "status": "pending",
        "priority": "medium",
        "due_date": null,
        "created_at": "2025-03-01T09:00:00",
        "updated_at": "2025-03-01T09:00:00",
        "comments_count": 0
    })
}

fn comment_json(id: u64, task_id: u64, content: &str) -> Value {
    json!({
        "id": id,
        "task_id": task_id,
        "content": content,
        "author": "alice",
        "created_at": "2025-03-01T10:00:00",
        "updated_at": null
    })
}

fn client(server: &MockServer) -> HttpTaskApi {
    HttpTaskApi::new(&format!("{}/api", server.uri()), Duration::from_secs(5))
        .expect("client should build")
}

// =============================================================================
// Listing and filters
// =============================================================================

#[tokio::test]
async fn list_without_filters_sends_no_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tasks"))
        .and(query_param_is_missing("status"))
        .and(query_param_is_missing("priority"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "tasks": [task_json(1, "A"), task_json(2, "B")],
            "count": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tasks = client(&server)
        .list_tasks(TaskQuery::default())
        .await
        .unwrap();

    let titles: Vec<&str> = tasks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, ["A", "B"]);
}

#[tokio::test]
async fn list_with_priority_filter_omits_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tasks"))
        .and(query_param("priority", "high"))
        .and(query_param_is_missing("status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "tasks": [task_json(3, "Urgent")],
            "count": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let query = FilterState::new(Filter::All, Filter::Only(Priority::High));
    let tasks = client(&server).list_tasks(query).await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, TaskId::new(3));
}

#[tokio::test]
async fn list_with_both_filters_sends_both() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tasks"))
        .and(query_param("status", "in_progress"))
        .and(query_param("priority", "low"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "success": true, "tasks": [] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let query = FilterState::new(
        Filter::Only(TaskStatus::InProgress),
        Filter::Only(Priority::Low),
    );
    let tasks = client(&server).list_tasks(query).await.unwrap();
    assert!(tasks.is_empty());
}

#[tokio::test]
async fn requests_carry_json_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tasks"))
        .and(header("accept", "application/json"))
        .and(header("content-type", "application/json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "success": true, "tasks": [] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .list_tasks(TaskQuery::default())
        .await
        .unwrap();
}

#[tokio::test]
async fn unknown_enum_values_decode_to_defaults() {
    let server = MockServer::start().await;
    let mut raw = task_json(5, "Odd");
    raw["status"] = json!("archived");
    raw["priority"] = json!(null);
    Mock::given(method("GET"))
        .and(path("/api/tasks/5"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "success": true, "task": raw })),
        )
        .mount(&server)
        .await;

    let task = client(&server).get_task(TaskId::new(5)).await.unwrap();
    assert_eq!(task.status, TaskStatus::Pending);
    assert_eq!(task.priority, Priority::Medium);
}

// =============================================================================
// Mutations
// =============================================================================

#[tokio::test]
async fn create_posts_only_set_fields() {
    let server = MockServer::start().await;
    let mut created = task_json(9, "Write docs");
    created["priority"] = json!("high");
    Mock::given(method("POST"))
        .and(path("/api/tasks"))
        .and(body_json(json!({ "title": "Write docs", "priority": "high" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "success": true,
            "task": created,
            "message": "Task created successfully"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let payload = NewTask {
        priority: Some(Priority::High),
        ..NewTask::titled("Write docs")
    };
    let task = client(&server).create_task(payload).await.unwrap();
    assert_eq!(task.id, TaskId::new(9));
    assert_eq!(task.priority, Priority::High);
}

#[tokio::test]
async fn update_puts_patch_and_returns_canonical_task() {
    let server = MockServer::start().await;
    let mut updated = task_json(4, "Renamed by server");
    updated["status"] = json!("completed");
    Mock::given(method("PUT"))
        .and(path("/api/tasks/4"))
        .and(body_json(json!({ "status": "completed", "due_date": null })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "success": true, "task": updated })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let patch = TaskPatch {
        status: Some(TaskStatus::Completed),
        due_date: Some(None),
        ..TaskPatch::default()
    };
    let task = client(&server)
        .update_task(TaskId::new(4), patch)
        .await
        .unwrap();
    assert_eq!(task.title, "Renamed by server");
    assert_eq!(task.status, TaskStatus::Completed);
}

#[tokio::test]
async fn delete_succeeds_on_no_content() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/tasks/2"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .delete_task(TaskId::new(2))
        .await
        .unwrap();
}

#[tokio::test]
async fn stats_are_decoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tasks/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "stats": {
                "total_tasks": 6,
                "by_status": { "pending": 3, "in_progress": 2, "completed": 1 },
                "by_priority": { "high": 1, "medium": 4, "low": 1 }
            }
        })))
        .mount(&server)
        .await;

    let stats = client(&server).task_stats().await.unwrap();
    assert_eq!(stats.total_tasks, 6);
    assert_eq!(stats.status_count(TaskStatus::InProgress), 2);
    assert_eq!(stats.priority_count(Priority::Medium), 4);
}

// =============================================================================
// Comments
// =============================================================================

#[tokio::test]
async fn comments_are_listed_for_a_task() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tasks/7/comments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "comments": [comment_json(2, 7, "second"), comment_json(1, 7, "first")],
            "count": 2
        })))
        .mount(&server)
        .await;

    let comments = client(&server)
        .list_comments(TaskId::new(7))
        .await
        .unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0].content, "second");
}

#[tokio::test]
async fn comment_with_blank_author_is_sent_as_anonymous() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/tasks/7/comments"))
        .and(body_json(json!({ "content": "Ship it", "author": "Anonymous" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "success": true,
            "comment": comment_json(11, 7, "Ship it")
        })))
        .expect(1)
        .mount(&server)
        .await;

    let comment = client(&server)
        .create_comment(TaskId::new(7), NewComment::new("  Ship it ", "   "))
        .await
        .unwrap();
    assert_eq!(comment.id, CommentId::new(11));
}

#[tokio::test]
async fn single_comment_operations_use_comment_paths() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/comments/11"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "comment": comment_json(11, 7, "original")
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/comments/11"))
        .and(body_json(json!({ "content": "edited" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "comment": comment_json(11, 7, "edited")
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/comments/11"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let api = client(&server);
    let id = CommentId::new(11);
    assert_eq!(api.get_comment(id).await.unwrap().content, "original");
    let patch = CommentPatch {
        content: Some("edited".to_string()),
        author: None,
    };
    assert_eq!(api.update_comment(id, patch).await.unwrap().content, "edited");
    api.delete_comment(id).await.unwrap();
}

// =============================================================================
// Failure mapping
// =============================================================================

#[tokio::test]
async fn validation_errors_are_joined_into_the_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/tasks"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "success": false,
            "error": "Validation failed",
            "validation_errors": ["Title is required"]
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .create_task(NewTask::titled(""))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        RemoteError::Http {
            status: 400,
            message: "Validation failed; Title is required".to_string(),
        }
    );
}

#[tokio::test]
async fn not_found_uses_error_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tasks/99"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({ "success": false, "error": "Task not found" })),
        )
        .mount(&server)
        .await;

    let err = client(&server)
        .get_task(TaskId::new(99))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.to_string(), "Task not found (HTTP 404)");
}

#[tokio::test]
async fn non_json_error_body_falls_back_to_raw_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tasks"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad gateway from proxy\n"))
        .mount(&server)
        .await;

    let err = client(&server)
        .list_tasks(TaskQuery::default())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        RemoteError::Http {
            status: 502,
            message: "Bad gateway from proxy".to_string(),
        }
    );
}

#[tokio::test]
async fn empty_error_body_falls_back_to_status_reason() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/tasks/1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client(&server)
        .delete_task(TaskId::new(1))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        RemoteError::Http {
            status: 500,
            message: "Internal Server Error".to_string(),
        }
    );
}

#[tokio::test]
async fn truncated_error_body_falls_back_to_status_reason() {
    // The service promises a longer body than it sends, then hangs up.
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let service = std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut request = [0u8; 4096];
        let _ = stream.read(&mut request).unwrap();
        stream
            .write_all(
                b"HTTP/1.1 500 Internal Server Error\r\n\
                  Content-Type: application/json\r\n\
                  Content-Length: 64\r\n\r\n{\"error\":",
            )
            .unwrap();
    });

    let api = HttpTaskApi::new(&format!("http://{addr}/api"), Duration::from_secs(5))
        .expect("client should build");
    let err = api.delete_task(TaskId::new(1)).await.unwrap_err();
    service.join().unwrap();

    assert_eq!(
        err,
        RemoteError::Http {
            status: 500,
            message: "Internal Server Error".to_string(),
        }
    );
}

#[tokio::test]
async fn malformed_success_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tasks/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client(&server).task_stats().await.unwrap_err();
    assert!(matches!(err, RemoteError::Decode(_)), "got {err:?}");
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tasks"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": true, "tasks": [] }))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let api = HttpTaskApi::new(&format!("{}/api", server.uri()), Duration::from_millis(100))
        .unwrap();
    let err = api.list_tasks(TaskQuery::default()).await.unwrap_err();
    assert_eq!(err, RemoteError::Timeout);
}

#[tokio::test]
async fn refused_connection_is_a_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = HttpTaskApi::new(&format!("http://{addr}/api"), Duration::from_secs(2)).unwrap();
    let err = api.list_tasks(TaskQuery::default()).await.unwrap_err();
    assert!(matches!(err, RemoteError::Network(_)), "got {err:?}");
}
