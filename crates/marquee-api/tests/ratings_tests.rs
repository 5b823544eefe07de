mod common;

use marquee_api::models::{rating, rating_star};
use sea_orm::{EntityTrait, PaginatorTrait, QueryOrder};
use serde_json::json;

async fn app_with_movie() -> (marquee_core::TestApp, i64) {
    let app = common::spawn_app().await;
    let tokens = app.signup("editor", "secret123").await;
    let movie_id = common::create_movie(
        &app,
        &tokens.access_token,
        &common::movie_body("Alien", "alien"),
    )
    .await;
    (app, movie_id)
}

#[tokio::test]
async fn test_rating_stars_seeded() {
    let app = common::spawn_app().await;

    let values: Vec<i32> = rating_star::Entity::find()
        .order_by_asc(rating_star::Column::Value)
        .all(&app.db)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.value)
        .collect();

    assert_eq!(values, vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn test_create_rating() {
    let (app, movie_id) = app_with_movie().await;

    let body = json!({"ip": "192.0.2.1", "star_id": 4, "movie_id": movie_id});
    let res = app
        .client
        .post(&app.url("/api/ratings"), &body.to_string())
        .await;

    assert_eq!(res.status, 201);
    assert_eq!(res.data()["ip"], "192.0.2.1");
    assert_eq!(res.data()["star_id"], 4);
    assert_eq!(res.data()["movie_id"], movie_id);
}

#[tokio::test]
async fn test_rerating_replaces_star() {
    let (app, movie_id) = app_with_movie().await;
    let url = app.url("/api/ratings");

    let first = json!({"ip": "192.0.2.1", "star_id": 2, "movie_id": movie_id});
    app.client.post(&url, &first.to_string()).await;
    let second = json!({"ip": "192.0.2.1", "star_id": 5, "movie_id": movie_id});
    let res = app.client.post(&url, &second.to_string()).await;

    assert_eq!(res.status, 201);
    assert_eq!(res.data()["star_id"], 5);
    assert_eq!(rating::Entity::find().count(&app.db).await.unwrap(), 1);
}

#[tokio::test]
async fn test_rating_unknown_star_or_movie() {
    let (app, movie_id) = app_with_movie().await;
    let url = app.url("/api/ratings");

    let bad_star = json!({"ip": "192.0.2.1", "star_id": 9, "movie_id": movie_id});
    let res = app.client.post(&url, &bad_star.to_string()).await;
    assert_eq!(res.status, 404);

    let bad_movie = json!({"ip": "192.0.2.1", "star_id": 3, "movie_id": 999});
    let res = app.client.post(&url, &bad_movie.to_string()).await;
    assert_eq!(res.status, 404);
}

#[tokio::test]
async fn test_rating_requires_ip() {
    let (app, movie_id) = app_with_movie().await;

    let body = json!({"ip": " ", "star_id": 3, "movie_id": movie_id});
    let res = app
        .client
        .post(&app.url("/api/ratings"), &body.to_string())
        .await;

    assert_eq!(res.status, 400);
}
