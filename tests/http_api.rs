//! HTTP-level tests for the router: probes and the GraphQL endpoint

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tower::ServiceExt;

use movies_api::db::Database;
use movies_api::graphql::build_schema;
use movies_api::services::MovieService;
use movies_api::{AppState, build_app};

async fn app() -> (Database, Router) {
    let db = Database::in_memory().await.unwrap();
    let state = AppState {
        db: db.clone(),
        schema: build_schema(MovieService::new(Arc::new(db.clone()))),
    };
    (db, build_app(state))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn graphql_post(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/graphql")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_healthz() {
    let (_db, app) = app().await;

    let response = app
        .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], json!("healthy"));
}

#[tokio::test]
async fn test_readyz_reports_database() {
    let (_db, app) = app().await;

    let response = app
        .oneshot(Request::get("/readyz").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "ready": true, "database": true })
    );
}

#[tokio::test]
async fn test_readyz_unavailable_after_close() {
    let (db, app) = app().await;
    db.close().await;

    let response = app
        .oneshot(Request::get("/readyz").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_json(response).await["ready"], json!(false));
}

#[tokio::test]
async fn test_graphql_get_without_html_is_rejected() {
    let (_db, app) = app().await;

    let response = app
        .oneshot(Request::get("/graphql").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_graphiql_for_browsers() {
    let (_db, app) = app().await;

    let response = app
        .oneshot(
            Request::get("/graphql")
                .header(header::ACCEPT, "text/html")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_graphql_post_create_and_delete() {
    let (db, app) = app().await;

    let create = json!({
        "query": r#"mutation Create($data: CreateMovieInput!) {
            createAMovie(data: $data) { id title { title } }
        }"#,
        "variables": {
            "data": {
                "status": "released",
                "userName": "erin",
                "filmDescription": "A boy and a fish-girl.",
                "duration": 101,
                "title": "Ponyo",
                "originalTitle": "崖の上のポニョ"
            }
        }
    });
    let response = app.clone().oneshot(graphql_post(create)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["createAMovie"]["title"]["title"], json!("Ponyo"));
    let id = body["data"]["createAMovie"]["id"].as_str().unwrap().to_string();

    let delete = json!({
        "query": "mutation Delete($id: String!) { deleteMovie(id: $id) }",
        "variables": { "id": id }
    });
    let response = app.oneshot(graphql_post(delete)).await.unwrap();
    let body = body_json(response).await;

    assert_eq!(
        body["data"]["deleteMovie"],
        json!(format!("The Movie with {} Id was deleted", id))
    );
    assert_eq!(db.movies().count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_graphql_error_carries_code() {
    let (_db, app) = app().await;

    let request = json!({
        "query": r#"mutation { deleteMovie(id: "12x") }"#
    });
    let response = app.oneshot(graphql_post(request)).await.unwrap();
    let body = body_json(response).await;

    assert_eq!(body["errors"][0]["message"], json!("Invalid movie ID: \"12x\""));
    assert_eq!(body["errors"][0]["extensions"]["code"], json!("BAD_REQUEST"));
}
