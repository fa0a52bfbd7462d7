//! HTTP-level tests for the /companies endpoints, including staff
//! reconciliation through updates.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, post_json, test_app};
use serde_json::json;

fn a24() -> serde_json::Value {
    json!({
        "name": "A24",
        "contact_email": "films@a24.com",
        "phone": "5550100"
    })
}

fn staffed_a24() -> serde_json::Value {
    json!({
        "name": "A24",
        "contact_email": "films@a24.com",
        "phone": "5550100",
        "staff": [
            {"role": "owner", "user": {
                "first_name": "Ana", "last_name": "Lee",
                "email": "ana@x.com", "minimum_fee": 100
            }},
            {"role": "member", "user": {
                "first_name": "Bob", "last_name": "Ray",
                "email": "bob@x.com", "minimum_fee": 100
            }}
        ]
    })
}

#[tokio::test]
async fn create_company_round_trips() {
    let app = test_app().await;

    let response = post_json(app.clone(), "/companies", a24()).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let company = body_json(response).await;
    assert!(company["id"].is_number());
    assert_eq!(company["name"], "A24");
    assert_eq!(company["films"], json!([]));
    assert_eq!(company["staff"], json!([]));

    let id = company["id"].as_i64().unwrap();
    let fetched = body_json(get(app, &format!("/companies/{id}")).await).await;
    assert_eq!(fetched, company);
}

#[tokio::test]
async fn create_company_with_films_and_staff() {
    let app = test_app().await;

    let payload = json!({
        "name": "A24",
        "contact_email": "films@a24.com",
        "phone": "5550100",
        "films": [
            {"title": "Past Lives", "budget": 12, "release_year": 2023}
        ],
        "staff": [
            {"role": "owner", "user": {
                "first_name": "Daniel", "last_name": "Katz",
                "email": "dk@a24.com", "minimum_fee": 900
            }}
        ]
    });
    let response = post_json(app.clone(), "/companies", payload).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let company = body_json(response).await;
    let id = company["id"].as_i64().unwrap();
    // Nested films land under the new company whatever their payload says
    assert_eq!(company["films"][0]["company_id"], json!(id));
    assert_eq!(company["staff"][0]["role"], "owner");

    // The new staff member is a real user, affiliated from their side
    let user_id = company["staff"][0]["user"]["id"].as_i64().unwrap();
    let user = body_json(get(app, &format!("/users/{user_id}")).await).await;
    assert_eq!(user["email"], "dk@a24.com");
    assert_eq!(user["companies"][0]["role"], "owner");
    assert_eq!(user["companies"][0]["company"]["id"], json!(id));
}

#[tokio::test]
async fn duplicate_name_is_rejected() {
    let app = test_app().await;

    post_json(app.clone(), "/companies", a24()).await;
    let response = post_json(app, "/companies", a24()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "ALREADY_REGISTERED");
}

#[tokio::test]
async fn get_company_by_name() {
    let app = test_app().await;

    let created = body_json(post_json(app.clone(), "/companies", a24()).await).await;

    let response = get(app.clone(), "/companies/name/A24").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["id"], created["id"]);

    let response = get(app, "/companies/name/Nope").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_reconciles_staff() {
    let app = test_app().await;

    let company = body_json(post_json(app.clone(), "/companies", staffed_a24()).await).await;
    let id = company["id"].as_i64().unwrap();
    let staff = company["staff"].as_array().unwrap();
    assert_eq!(staff.len(), 2);
    let ana_id = staff[0]["user"]["id"].as_i64().unwrap();
    let bob_id = staff[1]["user"]["id"].as_i64().unwrap();

    let update = json!({
        "id": id,
        "name": "A24",
        "contact_email": "films@a24.com",
        "phone": "5550100",
        "staff": [
            {"role": "member", "user": {
                "id": ana_id, "first_name": "Ana", "last_name": "Lee", "minimum_fee": 150
            }}
        ]
    });
    let response = post_json(app.clone(), &format!("/companies/{id}"), update).await;
    assert_eq!(response.status(), StatusCode::OK);

    let company = body_json(response).await;
    let staff = company["staff"].as_array().unwrap();
    assert_eq!(staff.len(), 1);
    assert_eq!(staff[0]["role"], "member");
    assert_eq!(staff[0]["user"]["minimum_fee"], 150);

    // Bob lost the affiliation but not the account
    let bob = body_json(get(app, &format!("/users/{bob_id}")).await).await;
    assert_eq!(bob["companies"], json!([]));
    assert_eq!(bob["email"], "bob@x.com");
}

#[tokio::test]
async fn staff_email_is_fixed_after_signup() {
    let app = test_app().await;

    let company = body_json(post_json(app.clone(), "/companies", staffed_a24()).await).await;
    let id = company["id"].as_i64().unwrap();
    let ana_id = company["staff"][0]["user"]["id"].as_i64().unwrap();

    let update = json!({
        "id": id,
        "name": "A24",
        "contact_email": "films@a24.com",
        "phone": "5550100",
        "staff": [
            {"role": "owner", "user": {
                "id": ana_id, "email": "other@x.com",
                "first_name": "Ana", "last_name": "Lee", "minimum_fee": 100
            }}
        ]
    });
    let company = body_json(post_json(app.clone(), &format!("/companies/{id}"), update).await).await;
    assert_eq!(company["staff"][0]["user"]["email"], "ana@x.com");

    let ana = body_json(get(app, &format!("/users/{ana_id}")).await).await;
    assert_eq!(ana["email"], "ana@x.com");
}

#[tokio::test]
async fn update_rejects_user_never_on_staff() {
    let app = test_app().await;

    let company = body_json(post_json(app.clone(), "/companies", a24()).await).await;
    let id = company["id"].as_i64().unwrap();

    let outsider = json!({
        "first_name": "Eve", "last_name": "Out", "email": "eve@x.com", "minimum_fee": 100
    });
    let outsider = body_json(post_json(app.clone(), "/users", outsider).await).await;
    let outsider_id = outsider["id"].as_i64().unwrap();

    let update = json!({
        "id": id,
        "name": "A24",
        "contact_email": "films@a24.com",
        "phone": "5550100",
        "staff": [
            {"role": "member", "user": {
                "id": outsider_id, "first_name": "Eve", "last_name": "Out", "minimum_fee": 100
            }}
        ]
    });
    let response = post_json(app.clone(), &format!("/companies/{id}"), update).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "UNKNOWN_LINK");

    let company = body_json(get(app, &format!("/companies/{id}")).await).await;
    assert_eq!(company["staff"], json!([]));
}

#[tokio::test]
async fn new_staff_entry_requires_email() {
    let app = test_app().await;

    let company = body_json(post_json(app.clone(), "/companies", a24()).await).await;
    let id = company["id"].as_i64().unwrap();

    let update = json!({
        "id": id,
        "name": "A24",
        "contact_email": "films@a24.com",
        "phone": "5550100",
        "staff": [
            {"role": "member", "user": {
                "first_name": "Ghost", "last_name": "Hand", "minimum_fee": 100
            }}
        ]
    });
    let response = post_json(app, &format!("/companies/{id}"), update).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn update_missing_company_returns_404() {
    let app = test_app().await;

    let update = json!({
        "id": 77,
        "name": "Ghost Studio",
        "contact_email": "x@x.com",
        "phone": "5550100"
    });
    let response = post_json(app, "/companies/77", update).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_id_mismatch_is_rejected() {
    let app = test_app().await;

    let company = body_json(post_json(app.clone(), "/companies", a24()).await).await;
    let id = company["id"].as_i64().unwrap();

    let update = json!({
        "id": id,
        "name": "A24",
        "contact_email": "films@a24.com",
        "phone": "5550100"
    });
    let response = post_json(app, &format!("/companies/{}", id + 9), update).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "ID_MISMATCH");
}
