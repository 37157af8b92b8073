//! HTTP integration tests for the students resource.
//!
//! The router is served on a random port backed by the in-memory store (or a
//! store that always fails) and exercised with reqwest.

mod support;

use serde_json::{json, Value};
use std::sync::Arc;
use student_api::{InMemoryStudentStore, API_PREFIX};
use support::{spawn_app, FailingStore};

struct Api {
    client: reqwest::Client,
    base: String,
}

impl Api {
    async fn with_store(store: InMemoryStudentStore) -> Self {
        let base = spawn_app(Arc::new(store)).await;
        Api {
            client: reqwest::Client::new(),
            base,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}{}", self.base, API_PREFIX, path)
    }

    async fn create(&self, body: Value) -> (u16, Value) {
        let resp = self.client.post(self.url("/students")).json(&body).send().await.unwrap();
        (resp.status().as_u16(), resp.json().await.unwrap())
    }

    async fn get(&self, path: &str) -> (u16, Value) {
        let resp = self.client.get(self.url(path)).send().await.unwrap();
        (resp.status().as_u16(), resp.json().await.unwrap())
    }

    async fn put(&self, path: &str, body: Value) -> (u16, Value) {
        let resp = self.client.put(self.url(path)).json(&body).send().await.unwrap();
        (resp.status().as_u16(), resp.json().await.unwrap())
    }

    async fn delete(&self, path: &str) -> (u16, Value) {
        let resp = self.client.delete(self.url(path)).send().await.unwrap();
        (resp.status().as_u16(), resp.json().await.unwrap())
    }

    async fn seed(&self, n: usize) -> Vec<i64> {
        let mut ids = Vec::with_capacity(n);
        for i in 0..n {
            let (status, body) = self.create(json!({ "name": format!("student-{}", i) })).await;
            assert_eq!(status, 201);
            ids.push(body["id"].as_i64().unwrap());
        }
        ids
    }
}

fn ids_of(body: &Value) -> Vec<i64> {
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_i64().unwrap())
        .collect()
}

// ============================================================================
// create / getById
// ============================================================================

#[tokio::test]
async fn create_then_get_returns_same_fields() {
    let api = Api::with_store(InMemoryStudentStore::new()).await;
    let (status, created) = api
        .create(json!({ "name": "Ada", "email": "ada@example.com", "age": 36 }))
        .await;
    assert_eq!(status, 201);
    let id = created["id"].as_i64().unwrap();

    let (status, fetched) = api.get(&format!("/students/{}", id)).await;
    assert_eq!(status, 200);
    assert_eq!(fetched["name"], "Ada");
    assert_eq!(fetched["email"], "ada@example.com");
    assert_eq!(fetched["age"], 36);
    // read always eager-loads courses
    assert_eq!(fetched["courses"], json!([]));
}

#[tokio::test]
async fn create_rejects_unknown_fields_and_missing_name() {
    let api = Api::with_store(InMemoryStudentStore::new()).await;
    let (status, body) = api.create(json!({ "name": "Ada", "role": "admin" })).await;
    assert_eq!(status, 422);
    assert!(body.get("error").is_some());

    let (status, _) = api.create(json!({ "email": "a@b.io" })).await;
    assert_eq!(status, 422);

    let (status, _) = api.create(json!({ "name": "Ada", "email": "nope" })).await;
    assert_eq!(status, 422);
}

#[tokio::test]
async fn malformed_bodies_get_json_error() {
    let api = Api::with_store(InMemoryStudentStore::new()).await;
    let student_url = api.url("/students");

    let broken_json = api
        .client
        .post(&student_url)
        .header("content-type", "application/json")
        .body("{name:")
        .send()
        .await
        .unwrap();
    let no_content_type = api
        .client
        .post(&student_url)
        .body(r#"{"name":"Ada"}"#)
        .send()
        .await
        .unwrap();
    let array_body = api.client.post(&student_url).json(&json!(["Ada"])).send().await.unwrap();

    for resp in [broken_json, no_content_type, array_body] {
        assert_eq!(resp.status(), 400);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["error"]["code"], "bad_request");
    }

    let ids = api.seed(1).await;
    let resp = api
        .client
        .put(api.url(&format!("/students/{}", ids[0])))
        .header("content-type", "application/json")
        .body("not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body.get("error").is_some());
}

#[tokio::test]
async fn get_missing_is_404_with_message() {
    let api = Api::with_store(InMemoryStudentStore::new()).await;
    let (status, body) = api.get("/students/42").await;
    assert_eq!(status, 404);
    assert_eq!(body, json!({ "message": "Not found" }));
}

#[tokio::test]
async fn non_numeric_id_is_400() {
    let api = Api::with_store(InMemoryStudentStore::new()).await;
    let (status, body) = api.get("/students/abc").await;
    assert_eq!(status, 400);
    assert!(body.get("error").is_some());
}

// ============================================================================
// list: pagination, sort, populate
// ============================================================================

#[tokio::test]
async fn list_defaults_to_desc_with_ten_rows() {
    let api = Api::with_store(InMemoryStudentStore::new()).await;
    api.seed(12).await;

    let (status, body) = api.get("/students").await;
    assert_eq!(status, 200);
    let ids = ids_of(&body);
    assert_eq!(ids.len(), 10);
    assert!(ids.windows(2).all(|w| w[0] >= w[1]));
    assert_eq!(body["pagination"], json!({ "total": 12, "limit": 10, "page": 1 }));
}

#[tokio::test]
async fn consecutive_pages_are_disjoint() {
    let api = Api::with_store(InMemoryStudentStore::new()).await;
    api.seed(8).await;

    let (_, first) = api.get("/students?limit=4&page=1").await;
    let (_, second) = api.get("/students?limit=4&page=2").await;
    let a = ids_of(&first);
    let b = ids_of(&second);
    assert_eq!(a.len(), 4);
    assert_eq!(b.len(), 4);
    assert!(a.iter().all(|id| !b.contains(id)));
    assert_eq!(second["pagination"]["page"], 2);
}

#[tokio::test]
async fn sort_asc_is_non_decreasing() {
    let api = Api::with_store(InMemoryStudentStore::new()).await;
    api.seed(5).await;
    let (_, body) = api.get("/students?sort=asc").await;
    let ids = ids_of(&body);
    assert_eq!(ids.len(), 5);
    assert!(ids.windows(2).all(|w| w[0] <= w[1]));
}

#[tokio::test]
async fn populate_courses_is_opt_in() {
    let store = InMemoryStudentStore::new();
    let api = Api::with_store(store.clone()).await;
    let ids = api.seed(2).await;
    store.add_course(ids[0], "Algebra", Some("MATH101")).unwrap();

    let (_, body) = api.get("/students?populate=courses&sort=asc").await;
    let data = body["data"].as_array().unwrap();
    assert_eq!(data[0]["courses"][0]["title"], "Algebra");
    assert_eq!(data[1]["courses"], json!([]));

    let (_, body) = api.get("/students?populate=No").await;
    assert!(body["data"]
        .as_array()
        .unwrap()
        .iter()
        .all(|s| s.get("courses").is_none()));
}

#[tokio::test]
async fn bad_list_params_are_400() {
    let api = Api::with_store(InMemoryStudentStore::new()).await;
    for query in ["page=0", "page=-1", "limit=abc", "sort=sideways"] {
        let (status, body) = api.get(&format!("/students?{}", query)).await;
        assert_eq!(status, 400, "query {}", query);
        assert!(body.get("error").is_some());
    }
}

// ============================================================================
// update / delete
// ============================================================================

#[tokio::test]
async fn update_changes_only_given_field() {
    let api = Api::with_store(InMemoryStudentStore::new()).await;
    let (_, created) = api
        .create(json!({ "name": "Ada", "email": "ada@example.com", "age": 36 }))
        .await;
    let id = created["id"].as_i64().unwrap();

    let (status, updated) = api.put(&format!("/students/{}", id), json!({ "name": "X" })).await;
    assert_eq!(status, 200);
    assert_eq!(updated["id"], id);
    assert_eq!(updated["name"], "X");
    assert_eq!(updated["email"], "ada@example.com");
    assert_eq!(updated["age"], 36);

    let resp = api
        .client
        .patch(api.url(&format!("/students/{}", id)))
        .json(&json!({ "age": 37 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let patched: Value = resp.json().await.unwrap();
    assert_eq!(patched["name"], "X");
    assert_eq!(patched["age"], 37);
}

#[tokio::test]
async fn update_missing_is_404() {
    let api = Api::with_store(InMemoryStudentStore::new()).await;
    let (status, body) = api.put("/students/7", json!({ "name": "X" })).await;
    assert_eq!(status, 404);
    assert_eq!(body["message"], "Not found");
}

#[tokio::test]
async fn delete_then_get_is_404() {
    let api = Api::with_store(InMemoryStudentStore::new()).await;
    let ids = api.seed(1).await;
    let path = format!("/students/{}", ids[0]);

    let (status, body) = api.delete(&path).await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "message": "Deleted" }));

    let (status, _) = api.get(&path).await;
    assert_eq!(status, 404);

    let (status, body) = api.delete(&path).await;
    assert_eq!(status, 404);
    assert_eq!(body["message"], "Not found");
}

// ============================================================================
// store failures
// ============================================================================

#[tokio::test]
async fn store_failures_are_500_with_error_key() {
    let base = spawn_app(Arc::new(FailingStore)).await;
    let client = reqwest::Client::new();
    let url = |p: &str| format!("{}{}{}", base, API_PREFIX, p);

    let responses = vec![
        client.post(url("/students")).json(&json!({ "name": "Ada" })).send().await.unwrap(),
        client.get(url("/students")).send().await.unwrap(),
        client.get(url("/students/1")).send().await.unwrap(),
        client.put(url("/students/1")).json(&json!({ "name": "X" })).send().await.unwrap(),
        client.delete(url("/students/1")).send().await.unwrap(),
    ];
    for resp in responses {
        assert_eq!(resp.status(), 500);
        let body: Value = resp.json().await.unwrap();
        let message = body["error"]["message"].as_str().unwrap();
        assert!(message.contains("connection refused"));
    }
}

#[tokio::test]
async fn readiness_reflects_store_health() {
    let client = reqwest::Client::new();

    let base = spawn_app(Arc::new(InMemoryStudentStore::new())).await;
    let resp = client.get(format!("{}/ready", base)).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let resp = client.get(format!("{}/health", base)).send().await.unwrap();
    assert_eq!(resp.status(), 200);

    let base = spawn_app(Arc::new(FailingStore)).await;
    let resp = client.get(format!("{}/ready", base)).send().await.unwrap();
    assert_eq!(resp.status(), 503);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["database"], "unavailable");
}
