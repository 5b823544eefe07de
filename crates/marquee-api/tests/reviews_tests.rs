mod common;

use serde_json::json;

async fn movie_with_token() -> (marquee_core::TestApp, i64) {
    let app = common::spawn_app().await;
    let tokens = app.signup("editor", "secret123").await;
    let movie_id = common::create_movie(
        &app,
        &tokens.access_token,
        &common::movie_body("Heat", "heat"),
    )
    .await;
    (app, movie_id)
}

#[tokio::test]
async fn test_create_review() {
    let (app, movie_id) = movie_with_token().await;

    let body = json!({"email": "v@example.com", "name": "Vera", "text": "Great heist"});
    let res = app
        .client
        .post(
            &app.url(&format!("/api/reviews?movie_id={}", movie_id)),
            &body.to_string(),
        )
        .await;

    assert_eq!(res.status, 201);
    let data = res.data();
    assert_eq!(data["name"], "Vera");
    assert_eq!(data["text"], "Great heist");
    assert_eq!(data["parent"], serde_json::Value::Null);
    assert_eq!(data["movie"], "Heat");
}

#[tokio::test]
async fn test_create_review_empty_fields() {
    let (app, movie_id) = movie_with_token().await;

    let body = json!({"email": "", "name": "Vera", "text": "Great"});
    let res = app
        .client
        .post(
            &app.url(&format!("/api/reviews?movie_id={}", movie_id)),
            &body.to_string(),
        )
        .await;

    assert_eq!(res.status, 400);
    assert!(res
        .error_message()
        .contains("Email, name, and text must not be empty."));
}

#[tokio::test]
async fn test_create_review_unknown_movie() {
    let app = common::spawn_app().await;

    let body = json!({"email": "v@example.com", "name": "Vera", "text": "Great"});
    let res = app
        .client
        .post(&app.url("/api/reviews?movie_id=404"), &body.to_string())
        .await;

    assert_eq!(res.status, 404);
}

#[tokio::test]
async fn test_create_review_bad_movie_id_uses_envelope() {
    let app = common::spawn_app().await;
    let body = json!({"email": "v@example.com", "name": "Vera", "text": "Great"});

    for path in ["/api/reviews", "/api/reviews?movie_id=heat"] {
        let res = app.client.post(&app.url(path), &body.to_string()).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.error_code(), "BAD_REQUEST");
        assert!(res.error_message().contains("Invalid query string"));
    }
}

#[tokio::test]
async fn test_reply_tree() {
    let (app, movie_id) = movie_with_token().await;
    let url = app.url(&format!("/api/reviews?movie_id={}", movie_id));

    let top = json!({"email": "a@example.com", "name": "Ann", "text": "Loved it"});
    app.client.post(&url, &top.to_string()).await;
    let reply = json!({"email": "b@example.com", "name": "Ben", "text": "Agreed", "parent": 1});
    let res = app.client.post(&url, &reply.to_string()).await;
    assert_eq!(res.status, 201);
    assert_eq!(res.data()["parent"], 1);

    let res = app
        .client
        .get(&app.url(&format!("/api/movies/{}/reviews", movie_id)))
        .await;
    assert_eq!(res.status, 200);
    let tree = res.data();
    let tree = tree.as_array().unwrap();
    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0]["name"], "Ann");
    assert_eq!(tree[0]["children"][0]["name"], "Ben");

    let detail = app
        .client
        .get(&app.url(&format!("/api/movies/{}", movie_id)))
        .await;
    assert_eq!(detail.data()["reviews"][0]["children"][0]["text"], "Agreed");
}

#[tokio::test]
async fn test_reply_to_review_of_other_movie_rejected() {
    let (app, first_movie) = movie_with_token().await;
    let tokens = app.login("editor", "secret123").await;
    let second_movie = common::create_movie(
        &app,
        &tokens.access_token,
        &common::movie_body("Ronin", "ronin"),
    )
    .await;

    let top = json!({"email": "a@example.com", "name": "Ann", "text": "Loved it"});
    app.client
        .post(
            &app.url(&format!("/api/reviews?movie_id={}", first_movie)),
            &top.to_string(),
        )
        .await;

    let reply = json!({"email": "b@example.com", "name": "Ben", "text": "?", "parent": 1});
    let res = app
        .client
        .post(
            &app.url(&format!("/api/reviews?movie_id={}", second_movie)),
            &reply.to_string(),
        )
        .await;

    assert_eq!(res.status, 400);
}

#[tokio::test]
async fn test_reviews_of_unknown_movie() {
    let app = common::spawn_app().await;

    let res = app.client.get(&app.url("/api/movies/77/reviews")).await;

    assert_eq!(res.status, 404);
}
