//! HTTP service integration tests.
//!
//! Starts the axum router on an ephemeral port and exercises it with reqwest.

mod support;

use reqwest::header::{ACCESS_CONTROL_ALLOW_ORIGIN, ORIGIN};
use reqwest::StatusCode;
use serde_json::{json, Value};

use support::{start_server, students_url, ALLOWED_ORIGIN};

async fn list(client: &reqwest::Client, base: &str) -> Value {
    let resp = client.get(students_url(base)).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    resp.json().await.unwrap()
}

async fn create(client: &reqwest::Client, base: &str, body: Value) -> Value {
    let resp = client
        .post(students_url(base))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    resp.json().await.unwrap()
}

#[tokio::test]
async fn list_starts_empty_in_envelope() {
    let base = start_server().await;
    let client = reqwest::Client::new();

    assert_eq!(list(&client, &base).await, json!({ "students": [] }));
}

#[tokio::test]
async fn create_returns_stored_record() {
    let base = start_server().await;
    let client = reqwest::Client::new();

    let created = create(
        &client,
        &base,
        json!({ "name": "Ann", "age": 21, "course": "Math" }),
    )
    .await;

    let id = created["id"].as_str().unwrap();
    assert!(!id.is_empty());
    assert_eq!(created["name"], "Ann");
    assert_eq!(created["age"], 21);
    assert_eq!(created["course"], "Math");

    let body = list(&client, &base).await;
    assert_eq!(body["students"], json!([created]));
}

#[tokio::test]
async fn create_update_delete_scenario() {
    let base = start_server().await;
    let client = reqwest::Client::new();

    let created = create(
        &client,
        &base,
        json!({ "name": "Ann", "age": 21, "course": "Math" }),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();

    let students = list(&client, &base).await["students"].clone();
    assert_eq!(students.as_array().unwrap().len(), 1);
    assert_eq!(students[0]["id"], id.as_str());

    let resp = client
        .put(format!("{}/{id}", students_url(&base)))
        .json(&json!({ "name": "Ann", "age": 22, "course": "Math" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = resp.json().await.unwrap();
    assert_eq!(
        updated,
        json!({ "id": id, "name": "Ann", "age": 22, "course": "Math" })
    );

    let students = list(&client, &base).await["students"].clone();
    assert_eq!(students[0]["age"], 22);
    assert_eq!(students[0]["id"], id.as_str());

    let resp = client
        .delete(format!("{}/{id}", students_url(&base)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let ack: Value = resp.json().await.unwrap();
    assert_eq!(ack, json!({ "message": "Student deleted" }));

    assert_eq!(list(&client, &base).await, json!({ "students": [] }));
}

#[tokio::test]
async fn update_unknown_id_returns_null() {
    let base = start_server().await;
    let client = reqwest::Client::new();
    let existing = create(
        &client,
        &base,
        json!({ "name": "Bo", "age": 30, "course": "Art" }),
    )
    .await;

    let unknown = rollbook::StudentId::generate();
    let resp = client
        .put(format!("{}/{unknown}", students_url(&base)))
        .json(&json!({ "name": "Zed", "age": 40, "course": "History" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert!(body.is_null());

    assert_eq!(list(&client, &base).await["students"], json!([existing]));
}

#[tokio::test]
async fn delete_unknown_and_repeated_ids_are_acknowledged() {
    let base = start_server().await;
    let client = reqwest::Client::new();
    let keep = create(
        &client,
        &base,
        json!({ "name": "Bo", "age": 30, "course": "Art" }),
    )
    .await;
    let gone = create(
        &client,
        &base,
        json!({ "name": "Ann", "age": 21, "course": "Math" }),
    )
    .await;
    let gone_url = format!("{}/{}", students_url(&base), gone["id"].as_str().unwrap());

    for _ in 0..2 {
        let resp = client.delete(&gone_url).send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let ack: Value = resp.json().await.unwrap();
        assert_eq!(ack["message"], "Student deleted");
    }

    let unknown = rollbook::StudentId::generate();
    let resp = client
        .delete(format!("{}/{unknown}", students_url(&base)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    assert_eq!(list(&client, &base).await["students"], json!([keep]));
}

#[tokio::test]
async fn get_single_record() {
    let base = start_server().await;
    let client = reqwest::Client::new();
    let created = create(
        &client,
        &base,
        json!({ "name": "Ann", "age": 21, "course": "Math" }),
    )
    .await;

    let resp = client
        .get(format!(
            "{}/{}",
            students_url(&base),
            created["id"].as_str().unwrap()
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, created);

    let unknown = rollbook::StudentId::generate();
    let resp = client
        .get(format!("{}/{unknown}", students_url(&base)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn malformed_bodies_are_validation_errors() {
    let base = start_server().await;
    let client = reqwest::Client::new();

    let bodies = [
        json!({ "name": "Ann", "age": 21 }),
        json!({ "name": "Ann", "age": "twenty", "course": "Math" }),
        json!({ "name": "Ann", "age": -1, "course": "Math" }),
        json!({ "name": "   ", "age": 21, "course": "Math" }),
        json!({ "name": "Ann", "age": 400, "course": "Math" }),
        json!([]),
    ];

    for body in bodies {
        let resp = client
            .post(students_url(&base))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body: {body}");
        let err: Value = resp.json().await.unwrap();
        assert_eq!(err["error"], "validation_error", "body: {body}");
        assert!(err["message"].is_string());
    }

    let resp = client
        .post(students_url(&base))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    assert_eq!(list(&client, &base).await, json!({ "students": [] }));
}

#[tokio::test]
async fn malformed_id_is_validation_error() {
    let base = start_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .delete(format!("{}/64f1c0ffee", students_url(&base)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let err: Value = resp.json().await.unwrap();
    assert_eq!(err["error"], "validation_error");
}

#[tokio::test]
async fn health_reports_count() {
    let base = start_server().await;
    let client = reqwest::Client::new();
    create(
        &client,
        &base,
        json!({ "name": "Ann", "age": 21, "course": "Math" }),
    )
    .await;

    let resp = client.get(format!("{base}/health")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "ok": true, "students": 1 }));
}

#[tokio::test]
async fn listed_origin_gets_cors_headers() {
    let base = start_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .get(students_url(&base))
        .header(ORIGIN, ALLOWED_ORIGIN)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        ALLOWED_ORIGIN
    );
}

#[tokio::test]
async fn unlisted_origin_is_rejected() {
    let base = start_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(students_url(&base))
        .header(ORIGIN, "http://evil.example")
        .json(&json!({ "name": "Eve", "age": 30, "course": "Crime" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert!(resp.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    let err: Value = resp.json().await.unwrap();
    assert_eq!(err["error"], "forbidden");

    assert_eq!(list(&client, &base).await, json!({ "students": [] }));
}

#[tokio::test]
async fn preflight_from_listed_origin() {
    let base = start_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .request(reqwest::Method::OPTIONS, students_url(&base))
        .header(ORIGIN, ALLOWED_ORIGIN)
        .header("access-control-request-method", "PUT")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let methods = resp
        .headers()
        .get("access-control-allow-methods")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(methods.contains("PUT"));
    assert!(methods.contains("DELETE"));
}
