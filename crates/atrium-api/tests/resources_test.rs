//! Resource API integration tests: list protocol, CRUD and the auth gate.
//!
//! Run with: `cargo test -p atrium-api --test resources_test`

mod helpers;

use helpers::auth::{admin_bearer, jwt_bearer};
use helpers::{api_path, setup_test_app};
use serde_json::{json, Value};

fn content_range(response: &axum_test::TestResponse) -> Option<String> {
    response
        .headers()
        .get("content-range")
        .map(|v| v.to_str().unwrap().to_string())
}

#[tokio::test]
async fn test_empty_list_reports_default_window() {
    let app = setup_test_app().await;

    let response = app.client().get(&api_path("docs", None)).await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.json::<Value>(), json!([]));
    assert_eq!(content_range(&response).as_deref(), Some("docs 0-9/0"));
}

#[tokio::test]
async fn test_pagination_reports_total_of_all_matches() {
    let app = setup_test_app().await;
    for i in 0..12 {
        app.create("groups", json!({ "title": format!("group {:02}", i) }))
            .await;
    }

    let response = app
        .client()
        .get(&api_path("groups", None))
        .add_query_param("range", "[0,4]")
        .add_query_param("sort", r#"["id","ASC"]"#)
        .await;
    let page = response.json::<Vec<Value>>();
    assert_eq!(page.len(), 5);
    assert_eq!(page[0]["id"], 1);
    assert_eq!(content_range(&response).as_deref(), Some("groups 0-4/12"));

    let response = app
        .client()
        .get(&api_path("groups", None))
        .add_query_param("range", "[10,14]")
        .add_query_param("sort", r#"["id","ASC"]"#)
        .await;
    let page = response.json::<Vec<Value>>();
    assert_eq!(page.len(), 2);
    assert_eq!(page[1]["id"], 12);
    assert_eq!(content_range(&response).as_deref(), Some("groups 10-14/12"));
}

#[tokio::test]
async fn test_all_returns_everything_without_header() {
    let app = setup_test_app().await;
    for title in ["a", "b", "c"] {
        app.create("groups", json!({ "title": title })).await;
    }

    let response = app
        .client()
        .get(&api_path("groups", None))
        .add_query_param("all", "true")
        .add_query_param("range", "[0,0]")
        .await;

    assert_eq!(response.status_code(), 200);
    assert!(content_range(&response).is_none());
    let ids: Vec<i64> = response
        .json::<Vec<Value>>()
        .iter()
        .map(|g| g["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![3, 2, 1]);
}

#[tokio::test]
async fn test_sort_direction_is_case_insensitive() {
    let app = setup_test_app().await;
    for title in ["beta", "alpha", "gamma"] {
        app.create("projects", json!({ "title": title, "type": "research" }))
            .await;
    }

    let titles = |response: axum_test::TestResponse| -> Vec<String> {
        response
            .json::<Vec<Value>>()
            .iter()
            .map(|p| p["title"].as_str().unwrap().to_string())
            .collect()
    };

    let asc = app
        .client()
        .get(&api_path("projects", None))
        .add_query_param("sort", r#"["title","asc"]"#)
        .await;
    assert_eq!(titles(asc), vec!["alpha", "beta", "gamma"]);

    let desc = app
        .client()
        .get(&api_path("projects", None))
        .add_query_param("sort", r#"["title","DESC"]"#)
        .await;
    assert_eq!(titles(desc), vec!["gamma", "beta", "alpha"]);
}

#[tokio::test]
async fn test_documents_filter_by_group_title() {
    let app = setup_test_app().await;
    let engineering = app.create("groups", json!({ "title": "Engineering" })).await;
    let finance = app.create("groups", json!({ "title": "Finance" })).await;

    app.create(
        "docs",
        json!({ "title": "Spec", "src": "/docs/spec.pdf", "groupId": engineering["id"] }),
    )
    .await;
    app.create(
        "docs",
        json!({ "title": "Budget", "src": "/docs/budget.pdf", "groupId": finance["id"].to_string() }),
    )
    .await;
    app.create("docs", json!({ "title": "Loose", "src": "/docs/loose.pdf" }))
        .await;

    let response = app
        .client()
        .get(&api_path("docs", None))
        .add_query_param("filter", r#"{"groupTitle":"eng"}"#)
        .await;

    let docs = response.json::<Vec<Value>>();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0]["title"], "Spec");
    assert_eq!(docs[0]["Group"]["title"], "Engineering");
    assert_eq!(content_range(&response).as_deref(), Some("docs 0-9/1"));
}

#[tokio::test]
async fn test_id_array_filter_fetches_many() {
    let app = setup_test_app().await;
    for i in 0..4 {
        app.create(
            "news",
            json!({ "title": format!("n{}", i), "date": format!("2024-03-0{}", i + 1) }),
        )
        .await;
    }

    let response = app
        .client()
        .get(&api_path("news", None))
        .add_query_param("filter", r#"{"id":[1,3]}"#)
        .add_query_param("sort", r#"["id","ASC"]"#)
        .await;

    let ids: Vec<i64> = response
        .json::<Vec<Value>>()
        .iter()
        .map(|n| n["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 3]);
}

#[tokio::test]
async fn test_support_measures_header_uses_own_name() {
    let app = setup_test_app().await;
    app.create(
        "supportMeasures",
        json!({ "header": "Grants", "title": "Start-up grant", "type": "financial" }),
    )
    .await;

    let response = app.client().get(&api_path("supportMeasures", None)).await;

    assert_eq!(
        content_range(&response).as_deref(),
        Some("supportMeasures 0-9/1")
    );
}

#[tokio::test]
async fn test_malformed_list_parameters_are_rejected() {
    let app = setup_test_app().await;

    for (key, value) in [
        ("range", "[0,"),
        ("range", "[-1,5]"),
        ("sort", r#"["title","up"]"#),
        ("sort", r#"["nope","ASC"]"#),
        ("filter", "[]"),
    ] {
        let response = app
            .client()
            .get(&api_path("news", None))
            .add_query_param(key, value)
            .await;
        assert_eq!(response.status_code(), 400, "{}={}", key, value);
        assert_eq!(response.json::<Value>()["code"], "INVALID_INPUT");
    }
}

#[tokio::test]
async fn test_create_and_get_news_with_pending_images() {
    let app = setup_test_app().await;

    let created = app
        .create(
            "news",
            json!({
                "title": "Opening",
                "date": "2024-05-01",
                "text": "We are open",
                "images": ["/uploads/a.webp", { "rawFile": { "path": "b.webp" } }]
            }),
        )
        .await;

    assert_eq!(created["date"], "2024-05-01T00:00:00Z");
    assert_eq!(
        created["images"],
        json!(["/uploads/a.webp", "/uploads/b.webp"])
    );

    let id = created["id"].as_i64().unwrap();
    let response = app.client().get(&api_path("news", Some(id))).await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.json::<Value>()["title"], "Opening");
    assert!(response.json::<Value>()["createdAt"].is_string());
}

#[tokio::test]
async fn test_document_source_is_normalized() {
    let app = setup_test_app().await;

    let created = app
        .create(
            "docs",
            json!({ "title": "Statute", "src": [{ "rawFile": { "path": "statute.pdf" } }] }),
        )
        .await;

    assert_eq!(created["src"], "/docs/statute.pdf");
    assert!(created["Group"].is_null());
}

#[tokio::test]
async fn test_missing_required_fields_are_rejected() {
    let app = setup_test_app().await;

    for (resource, body) in [
        ("news", json!({ "title": "No date" })),
        ("docs", json!({ "title": "No source" })),
        ("projects", json!({ "title": "" })),
        ("news", json!({ "title": "Bad date", "date": "yesterday" })),
    ] {
        let response = app
            .client()
            .post(&api_path(resource, None))
            .add_header("Authorization", admin_bearer())
            .json(&body)
            .await;
        assert_eq!(response.status_code(), 400, "{} {}", resource, body);
    }
}

#[tokio::test]
async fn test_unknown_group_reference_is_rejected() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post(&api_path("docs", None))
        .add_header("Authorization", admin_bearer())
        .json(&json!({ "title": "Orphan", "src": "/docs/o.pdf", "groupId": 42 }))
        .await;

    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_update_writes_only_present_fields() {
    let app = setup_test_app().await;
    let created = app
        .create(
            "projects",
            json!({ "title": "Bridge", "type": "infrastructure", "text": "Long text" }),
        )
        .await;
    let id = created["id"].as_i64().unwrap();

    let response = app
        .client()
        .put(&api_path("projects", Some(id)))
        .add_header("Authorization", admin_bearer())
        .json(&json!({ "title": "Bridge II" }))
        .await;

    assert_eq!(response.status_code(), 200);
    let updated = response.json::<Value>();
    assert_eq!(updated["title"], "Bridge II");
    assert_eq!(updated["type"], "infrastructure");
    assert_eq!(updated["text"], "Long text");
}

#[tokio::test]
async fn test_missing_record_returns_not_found_message() {
    let app = setup_test_app().await;

    let response = app.client().get(&api_path("projects", Some(999))).await;
    assert_eq!(response.status_code(), 404);
    let body = response.json::<Value>();
    assert_eq!(body["message"], "Project not found!");
    assert_eq!(body["code"], "NOT_FOUND");

    let response = app
        .client()
        .put(&api_path("news", Some(999)))
        .add_header("Authorization", admin_bearer())
        .json(&json!({ "title": "Ghost" }))
        .await;
    assert_eq!(response.status_code(), 404);
    assert_eq!(response.json::<Value>()["message"], "News not found!");
}

#[tokio::test]
async fn test_non_integer_id_is_bad_request() {
    let app = setup_test_app().await;

    let response = app.client().get("/api/docs/abc").await;

    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_delete_twice() {
    let app = setup_test_app().await;
    let created = app
        .create("supportMeasures", json!({ "title": "Voucher" }))
        .await;
    let path = api_path("supportMeasures", created["id"].as_i64());

    let first = app
        .client()
        .delete(&path)
        .add_header("Authorization", admin_bearer())
        .await;
    assert_eq!(first.status_code(), 200);
    assert_eq!(
        first.json::<Value>(),
        json!({ "message": "SupportMeasure deleted!" })
    );

    let second = app
        .client()
        .delete(&path)
        .add_header("Authorization", admin_bearer())
        .await;
    assert_eq!(second.status_code(), 404);
    assert_eq!(
        second.json::<Value>()["message"],
        "SupportMeasure not found!"
    );
}

#[tokio::test]
async fn test_writes_require_authentication() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post(&api_path("news", None))
        .json(&json!({ "title": "Sneaky", "date": "2024-01-01" }))
        .await;
    assert_eq!(response.status_code(), 401);
    assert_eq!(response.json::<Value>()["code"], "UNAUTHORIZED");

    let response = app
        .client()
        .delete(&api_path("news", Some(1)))
        .add_header("Authorization", "Bearer not-the-key")
        .await;
    assert_eq!(response.status_code(), 401);

    let response = app
        .client()
        .put(&api_path("news", Some(1)))
        .add_header("Authorization", "Basic abc")
        .json(&json!({ "title": "Sneaky" }))
        .await;
    assert_eq!(response.status_code(), 401);

    // Reads stay public.
    let response = app.client().get(&api_path("news", None)).await;
    assert_eq!(response.status_code(), 200);
}

#[tokio::test]
async fn test_jwt_bearer_is_accepted_until_expiry() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post(&api_path("groups", None))
        .add_header("Authorization", jwt_bearer(600))
        .json(&json!({ "title": "Board" }))
        .await;
    assert_eq!(response.status_code(), 200);

    let response = app
        .client()
        .post(&api_path("groups", None))
        .add_header("Authorization", jwt_bearer(-3600))
        .json(&json!({ "title": "Board" }))
        .await;
    assert_eq!(response.status_code(), 401);
}

#[tokio::test]
async fn test_cors_exposes_content_range() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .get(&api_path("docs", None))
        .add_header("Origin", "http://admin.example.com")
        .await;

    let exposed = response
        .headers()
        .get("access-control-expose-headers")
        .expect("expose header missing")
        .to_str()
        .unwrap()
        .to_lowercase();
    assert!(exposed.contains("content-range"));
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = setup_test_app().await;

    let response = app.client().get("/health/live").await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.json::<Value>()["status"], "alive");

    let response = app.client().get("/health").await;
    assert_eq!(response.status_code(), 200);
    let body = response.json::<Value>();
    assert_eq!(body["database"], "healthy");
    assert_eq!(body["storage"], "healthy");
}
