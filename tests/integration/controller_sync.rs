//! Integration tests for keeping the local collection in sync with the
//! remote service.
//!
//! Drives the `Controller` through the request worker against a mock
//! service: filtered refreshes, create/update/delete folding, two-phase
//! delete, stale list responses and worker shutdown.
//!
//! Verification command: `cargo test --test controller_sync`

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use tokio::sync::mpsc;
use wiremock::matchers::{body_json, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use taskdeck::api::http::HttpTaskApi;
use taskdeck::controller::{Controller, Intent, LoadState, Modal};
use taskdeck::filter::{Filter, FilterState};
use taskdeck::net::{self, ApiCommand, ApiEvent};
use taskdeck_proto::{NewTask, Priority, TaskId, TaskStatus};

// =============================================================================
// Test helpers
// =============================================================================

fn task_json(id: u64, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "status": "pending",
        "priority": "medium",
        "created_at": "2025-03-01T09:00:00",
        "updated_at": "2025-03-01T09:00:00",
        "comments_count": 0
    })
}

fn api(server: &MockServer) -> HttpTaskApi {
    HttpTaskApi::new(&format!("{}/api", server.uri()), Duration::from_secs(5))
        .expect("client should build")
}

async fn mount_list(server: &MockServer, tasks: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path("/api/tasks"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "success": true, "tasks": tasks })),
        )
        .mount(server)
        .await;
}

/// Run `cmd` to completion and apply its event.
async fn run(controller: &mut Controller, api: &HttpTaskApi, cmd: ApiCommand) {
    if let Some(event) = net::execute(api, cmd).await {
        controller.apply(event);
    }
}

fn titles(controller: &Controller) -> Vec<String> {
    controller.tasks().iter().map(|t| t.title.clone()).collect()
}

/// Receive the next event or fail after a generous timeout.
async fn next_event(rx: &mut mpsc::Receiver<ApiEvent>) -> ApiEvent {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for event")
        .expect("worker channel closed")
}

// =============================================================================
// Filtered refresh
// =============================================================================

#[tokio::test]
async fn priority_filter_requests_only_that_priority() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tasks"))
        .and(query_param("priority", "high"))
        .and(query_param_is_missing("status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "tasks": [task_json(3, "Hotfix")]
        })))
        .expect(1)
        .mount(&server)
        .await;
    let api = api(&server);

    let mut controller = Controller::default();
    let cmd = controller
        .set_priority_filter(Filter::Only(Priority::High))
        .expect("filter change should refresh");
    run(&mut controller, &api, cmd).await;

    assert_eq!(titles(&controller), ["Hotfix"]);
    assert_eq!(controller.load_state(), LoadState::Ready);
    assert_eq!(
        controller.filters(),
        FilterState::new(Filter::All, Filter::Only(Priority::High))
    );
}

#[tokio::test]
async fn failed_refresh_keeps_previous_tasks() {
    let server = MockServer::start().await;
    let api = api(&server);
    mount_list(&server, vec![task_json(1, "A")]).await;

    let mut controller = Controller::default();
    let cmd = controller.refresh();
    run(&mut controller, &api, cmd).await;

    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/api/tasks"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "success": false,
            "error": "database unavailable"
        })))
        .mount(&server)
        .await;

    let cmd = controller.refresh();
    run(&mut controller, &api, cmd).await;

    assert_eq!(titles(&controller), ["A"]);
    assert_eq!(controller.load_state(), LoadState::Error);
    let banner = controller.error().expect("banner should be set");
    assert!(banner.contains("database unavailable"), "banner: {banner}");
}

#[tokio::test]
async fn only_latest_list_response_is_applied() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tasks"))
        .and(query_param("status", "completed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "tasks": [task_json(7, "Done thing")]
        })))
        .mount(&server)
        .await;
    mount_list(&server, vec![task_json(1, "Everything")]).await;
    let api = api(&server);

    let mut controller = Controller::default();
    let first = controller.refresh();
    let second = controller
        .set_status_filter(Filter::Only(TaskStatus::Completed))
        .expect("filter change should refresh");

    // Completions arrive out of order.
    let late = net::execute(&api, second).await.unwrap();
    let stale = net::execute(&api, first).await.unwrap();
    controller.apply(late);
    controller.apply(stale);

    assert_eq!(titles(&controller), ["Done thing"]);
}

// =============================================================================
// Mutations
// =============================================================================

#[tokio::test]
async fn created_task_is_prepended() {
    let server = MockServer::start().await;
    mount_list(&server, vec![task_json(1, "A")]).await;
    Mock::given(method("POST"))
        .and(path("/api/tasks"))
        .and(body_json(json!({ "title": "B" })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({ "success": true, "task": task_json(2, "B") })),
        )
        .expect(1)
        .mount(&server)
        .await;
    let api = api(&server);

    let mut controller = Controller::default();
    let cmd = controller.refresh();
    run(&mut controller, &api, cmd).await;

    let cmd = controller.create(NewTask::titled("B"));
    run(&mut controller, &api, cmd).await;

    assert_eq!(titles(&controller), ["B", "A"]);
}

#[tokio::test]
async fn editor_submission_round_trip_closes_the_editor() {
    let server = MockServer::start().await;
    mount_list(&server, vec![task_json(1, "A")]).await;
    Mock::given(method("POST"))
        .and(path("/api/tasks"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({ "success": true, "task": task_json(5, "From form") })),
        )
        .mount(&server)
        .await;
    let api = api(&server);

    let mut controller = Controller::default();
    let cmd = controller.refresh();
    run(&mut controller, &api, cmd).await;

    assert!(controller.dispatch(Intent::NewTask).is_none());
    let Modal::Create(editor) = controller.modal_mut() else {
        panic!("expected create form");
    };
    for c in "From form".chars() {
        editor.title.insert(c);
    }
    let cmd = controller.submit_editor().unwrap();
    run(&mut controller, &api, cmd).await;

    assert_eq!(controller.modal(), &Modal::None);
    assert_eq!(titles(&controller), ["From form", "A"]);
}

#[tokio::test]
async fn status_change_replaces_task_in_place() {
    let server = MockServer::start().await;
    mount_list(&server, vec![task_json(1, "A"), task_json(2, "B")]).await;
    let mut done = task_json(2, "B");
    done["status"] = json!("in_progress");
    Mock::given(method("PUT"))
        .and(path("/api/tasks/2"))
        .and(body_json(json!({ "status": "in_progress" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "success": true, "task": done })),
        )
        .expect(1)
        .mount(&server)
        .await;
    let api = api(&server);

    let mut controller = Controller::default();
    let cmd = controller.refresh();
    run(&mut controller, &api, cmd).await;

    let cmd = controller
        .dispatch(Intent::StatusChange(TaskId::new(2), TaskStatus::InProgress))
        .expect("status change should send");
    run(&mut controller, &api, cmd).await;

    assert_eq!(titles(&controller), ["A", "B"]);
    assert_eq!(controller.tasks()[1].status, TaskStatus::InProgress);
}

#[tokio::test]
async fn confirmed_delete_removes_task() {
    let server = MockServer::start().await;
    mount_list(&server, vec![task_json(2, "B"), task_json(1, "A")]).await;
    Mock::given(method("DELETE"))
        .and(path("/api/tasks/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;
    let api = api(&server);

    let mut controller = Controller::default();
    let cmd = controller.refresh();
    run(&mut controller, &api, cmd).await;

    assert!(controller.dispatch(Intent::DeleteTask(TaskId::new(1))).is_none());
    let cmd = controller.confirm_delete().expect("confirmed delete sends");
    run(&mut controller, &api, cmd).await;

    assert_eq!(titles(&controller), ["B"]);
}

#[tokio::test]
async fn cancelled_delete_sends_nothing() {
    let server = MockServer::start().await;
    mount_list(&server, vec![task_json(2, "B"), task_json(1, "A")]).await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let api = api(&server);

    let mut controller = Controller::default();
    let cmd = controller.refresh();
    run(&mut controller, &api, cmd).await;

    controller.dispatch(Intent::DeleteTask(TaskId::new(1)));
    controller.cancel_delete();

    assert_eq!(controller.modal(), &Modal::None);
    assert!(controller.confirm_delete().is_none());
    assert_eq!(titles(&controller), ["B", "A"]);
}

// =============================================================================
// Worker
// =============================================================================

#[tokio::test]
async fn worker_round_trip_and_shutdown() {
    let server = MockServer::start().await;
    mount_list(&server, vec![task_json(1, "A")]).await;
    Mock::given(method("GET"))
        .and(path("/api/tasks/1/comments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "comments": [{
                "id": 4,
                "task_id": 1,
                "content": "On it",
                "author": "",
                "created_at": "2025-03-01T10:00:00"
            }]
        })))
        .mount(&server)
        .await;

    let (tx, mut rx) = net::spawn_worker(Arc::new(api(&server)), 8);
    let mut controller = Controller::default();

    tx.send(controller.refresh()).await.unwrap();
    controller.apply(next_event(&mut rx).await);
    assert_eq!(titles(&controller), ["A"]);

    let cmd = controller
        .dispatch(Intent::ViewTask(TaskId::new(1)))
        .expect("opening details loads comments");
    tx.send(cmd).await.unwrap();
    controller.apply(next_event(&mut rx).await);

    let Modal::Details(view) = controller.modal() else {
        panic!("expected detail view");
    };
    assert!(!view.is_loading());
    assert_eq!(view.comments().len(), 1);
    assert_eq!(view.comments()[0].author, "Anonymous");

    tx.send(ApiCommand::Shutdown).await.unwrap();
    let closed = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("worker should stop");
    assert!(closed.is_none());
}
