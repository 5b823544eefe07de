#![allow(dead_code)]

use marquee_api::migrations::Migrator;
use marquee_api::models::{category, genre};
use marquee_core::TestApp;
use sea_orm::{ActiveModelTrait, Set};
use serde_json::{json, Value};

pub async fn spawn_app() -> TestApp {
    TestApp::with_routes::<Migrator>(marquee_api::routes()).await
}

pub async fn seed_category(app: &TestApp, name: &str, url: &str) -> category::Model {
    category::ActiveModel {
        name: Set(name.to_string()),
        description: Set(format!("{} description", name)),
        url: Set(url.to_string()),
        ..Default::default()
    }
    .insert(&app.db)
    .await
    .expect("insert category")
}

pub async fn seed_genre(app: &TestApp, name: &str, url: &str) -> genre::Model {
    genre::ActiveModel {
        name: Set(name.to_string()),
        description: Set(format!("{} description", name)),
        url: Set(url.to_string()),
        ..Default::default()
    }
    .insert(&app.db)
    .await
    .expect("insert genre")
}

/// Create an actor through the API and return its id.
pub async fn create_actor(app: &TestApp, name: &str) -> i64 {
    let body = json!({
        "name": name,
        "age": 40,
        "description": format!("{} is an actor", name),
        "image": format!("{}.jpg", name.to_lowercase()),
    });
    let res = app
        .client
        .post(&app.url("/api/actors"), &body.to_string())
        .await;
    assert_eq!(res.status, 201, "create actor failed: {}", res.body);
    res.data()["id"].as_i64().unwrap()
}

pub fn movie_body(title: &str, url: &str) -> Value {
    json!({
        "title": title,
        "tagline": format!("{} tagline", title),
        "description": format!("{} description", title),
        "poster": format!("{}.png", url),
        "year": 1999,
        "country": "USA",
        "world_premiere": "1999-03-31",
        "budget": 63000000,
        "fees_in_usa": 171479930,
        "fees_in_world": 463517383,
        "url": url,
    })
}

/// Create a movie through the API as `token` and return its id.
pub async fn create_movie(app: &TestApp, token: &str, body: &Value) -> i64 {
    let res = app
        .client
        .post_with_auth(&app.url("/api/movies"), token, &body.to_string())
        .await;
    assert_eq!(res.status, 201, "create movie failed: {}", res.body);
    res.data()["id"].as_i64().unwrap()
}
