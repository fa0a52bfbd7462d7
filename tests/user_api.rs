//! HTTP-level tests for the /users endpoints, driven through the production
//! router with tower::ServiceExt.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, post_json, test_app};
use serde_json::json;

fn ana() -> serde_json::Value {
    json!({
        "first_name": "Ana",
        "last_name": "Lee",
        "email": "ana@x.com",
        "minimum_fee": 100
    })
}

fn ana_with_film() -> serde_json::Value {
    json!({
        "first_name": "Ana",
        "last_name": "Lee",
        "email": "ana@x.com",
        "minimum_fee": 100,
        "films": [
            {"role": "writer", "film": {"title": "Dune Part 3", "release_year": 2025, "budget": 100}}
        ]
    })
}

#[tokio::test]
async fn create_user_returns_created_entity() {
    let app = test_app().await;

    let response = post_json(app, "/users", ana()).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let user = body_json(response).await;
    assert!(user["id"].is_number());
    assert_eq!(user["email"], "ana@x.com");
    assert_eq!(user["films"], json!([]));
    assert_eq!(user["companies"], json!([]));
}

#[tokio::test]
async fn create_user_with_film_credit() {
    let app = test_app().await;

    let response = post_json(app, "/users", ana_with_film()).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let user = body_json(response).await;
    let films = user["films"].as_array().unwrap();
    assert_eq!(films.len(), 1);
    assert_eq!(films[0]["role"], "writer");
    assert_eq!(films[0]["film"]["title"], "Dune Part 3");
    assert!(films[0]["film"]["id"].is_number());
}

#[tokio::test]
async fn get_user_round_trips() {
    let app = test_app().await;

    let created = body_json(post_json(app.clone(), "/users", ana()).await).await;
    let id = created["id"].as_i64().unwrap();

    let response = get(app, &format!("/users/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, created);
}

#[tokio::test]
async fn get_missing_user_returns_404() {
    let app = test_app().await;

    let response = get(app, "/users/999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[tokio::test]
async fn get_user_by_email() {
    let app = test_app().await;

    let created = body_json(post_json(app.clone(), "/users", ana()).await).await;

    let response = get(app.clone(), "/users/email/ana@x.com").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["id"], created["id"]);

    let response = get(app, "/users/email/nobody@x.com").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let app = test_app().await;

    post_json(app.clone(), "/users", ana()).await;
    let response = post_json(app, "/users", ana()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "ALREADY_REGISTERED");
}

#[tokio::test]
async fn list_users_is_paginated() {
    let app = test_app().await;

    for i in 1..=3 {
        let user = json!({
            "first_name": format!("User{i}"),
            "last_name": "Lee",
            "email": format!("user{i}@x.com"),
            "minimum_fee": 100
        });
        post_json(app.clone(), "/users", user).await;
    }

    let page = body_json(get(app.clone(), "/users?skip=1&limit=1").await).await;
    let page = page.as_array().unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0]["first_name"], "User2");

    let all = body_json(get(app, "/users").await).await;
    assert_eq!(all.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn update_edits_scalars_link_role_and_film_fields() {
    let app = test_app().await;

    let created = body_json(post_json(app.clone(), "/users", ana_with_film()).await).await;
    let id = created["id"].as_i64().unwrap();
    let film_id = created["films"][0]["film"]["id"].as_i64().unwrap();

    let update = json!({
        "id": id,
        "first_name": "Ana",
        "last_name": "Lee-Park",
        "minimum_fee": 250,
        "films": [
            {"role": "director", "film": {
                "id": film_id,
                "title": "Dune Part 3",
                "release_year": 2025,
                "budget": 150
            }}
        ]
    });
    let response = post_json(app, &format!("/users/{id}"), update).await;
    assert_eq!(response.status(), StatusCode::OK);

    let user = body_json(response).await;
    assert_eq!(user["last_name"], "Lee-Park");
    assert_eq!(user["minimum_fee"], 250);
    assert_eq!(user["films"][0]["role"], "director");
    assert_eq!(user["films"][0]["film"]["budget"], 150);
}

#[tokio::test]
async fn update_with_empty_list_clears_links() {
    let app = test_app().await;

    let created = body_json(post_json(app.clone(), "/users", ana_with_film()).await).await;
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["films"].as_array().unwrap().len(), 1);

    let update = json!({
        "id": id,
        "first_name": "Ana",
        "last_name": "Lee",
        "minimum_fee": 100,
        "films": []
    });
    let user = body_json(post_json(app, &format!("/users/{id}"), update).await).await;
    assert_eq!(user["films"], json!([]));
}

#[tokio::test]
async fn update_rejects_film_the_user_never_held() {
    let app = test_app().await;

    let user = body_json(post_json(app.clone(), "/users", ana()).await).await;
    let id = user["id"].as_i64().unwrap();

    let film = json!({"title": "Arrival", "release_year": 2016, "budget": 47});
    let film = body_json(post_json(app.clone(), "/films", film).await).await;
    let film_id = film["id"].as_i64().unwrap();

    let update = json!({
        "id": id,
        "first_name": "Ana",
        "last_name": "Lee",
        "minimum_fee": 100,
        "films": [
            {"role": "writer", "film": {
                "id": film_id,
                "title": "Hijacked",
                "release_year": 2016,
                "budget": 1
            }}
        ]
    });
    let response = post_json(app.clone(), &format!("/users/{id}"), update).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "UNKNOWN_LINK");

    // Nothing moved: no link was added and the film kept its fields
    let user = body_json(get(app.clone(), &format!("/users/{id}")).await).await;
    assert_eq!(user["films"], json!([]));
    let film = body_json(get(app, &format!("/films/{film_id}")).await).await;
    assert_eq!(film["title"], "Arrival");
    assert_eq!(film["budget"], 47);
}

#[tokio::test]
async fn update_id_mismatch_is_rejected() {
    let app = test_app().await;

    let user = body_json(post_json(app.clone(), "/users", ana()).await).await;
    let id = user["id"].as_i64().unwrap();

    let update = json!({
        "id": id,
        "first_name": "Ana",
        "last_name": "Lee",
        "minimum_fee": 100
    });
    let response = post_json(app, &format!("/users/{}", id + 1), update).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "ID_MISMATCH");
}

#[tokio::test]
async fn update_missing_user_returns_404() {
    let app = test_app().await;

    let update = json!({
        "id": 4242,
        "first_name": "Ana",
        "last_name": "Lee",
        "minimum_fee": 100
    });
    let response = post_json(app, "/users/4242", update).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn nested_film_release_year_is_bounded() {
    for year in [1850, 2999] {
        let app = test_app().await;
        let payload = json!({
            "first_name": "Ana",
            "last_name": "Lee",
            "email": "ana@x.com",
            "minimum_fee": 100,
            "films": [
                {"role": "writer", "film": {"title": "Lost Reel", "release_year": year, "budget": 10}}
            ]
        });
        let response = post_json(app, "/users", payload).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    }
}

#[tokio::test]
async fn minimum_fee_must_be_positive() {
    let app = test_app().await;

    let payload = json!({
        "first_name": "Ana",
        "last_name": "Lee",
        "email": "ana@x.com",
        "minimum_fee": 0
    });
    let response = post_json(app, "/users", payload).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
