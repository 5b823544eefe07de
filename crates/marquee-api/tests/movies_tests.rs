mod common;

use marquee_api::models::{movie, movie_actor, movie_director, movie_genre, rating, review};
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::json;

#[tokio::test]
async fn test_create_movie_requires_auth() {
    let app = common::spawn_app().await;

    let body = common::movie_body("The Matrix", "the-matrix");
    let res = app
        .client
        .post(&app.url("/api/movies"), &body.to_string())
        .await;

    assert_eq!(res.status, 401);
}

#[tokio::test]
async fn test_create_movie_with_credits() {
    let app = common::spawn_app().await;
    let tokens = app.signup("editor", "secret123").await;

    let category = common::seed_category(&app, "Feature film", "feature").await;
    let action = common::seed_genre(&app, "Action", "action").await;
    let scifi = common::seed_genre(&app, "Sci-Fi", "sci-fi").await;
    let keanu = common::create_actor(&app, "Keanu").await;
    let carrie = common::create_actor(&app, "Carrie").await;
    let lana = common::create_actor(&app, "Lana").await;

    let mut body = common::movie_body("The Matrix", "the-matrix");
    body["category"] = json!(category.id);
    body["actors"] = json!([keanu, carrie, keanu]);
    body["directors"] = json!([lana]);
    body["genres"] = json!([action.id, scifi.id]);

    let res = app
        .client
        .post_with_auth(&app.url("/api/movies"), &tokens.access_token, &body.to_string())
        .await;

    assert_eq!(res.status, 201, "{}", res.body);
    let data = res.data();
    assert_eq!(data["title"], "The Matrix");
    assert_eq!(data["category"], "Feature film");
    assert_eq!(data["world_premiere"], "1999-03-31");
    assert_eq!(data["genres"], json!(["Action", "Sci-Fi"]));
    assert_eq!(data["actors"].as_array().unwrap().len(), 2);
    assert_eq!(data["directors"][0]["name"], "Lana");
    assert_eq!(data["directors"][0]["image"], "lana.jpg");
    assert_eq!(data["reviews"], json!([]));

    let id = data["id"].as_i64().unwrap();
    let res = app
        .client
        .get(&app.url(&format!("/api/movies/{}", id)))
        .await;
    assert_eq!(res.status, 200);
    assert_eq!(res.data()["url"], "the-matrix");
    assert_eq!(res.data()["fees_in_world"], 463517383);
}

#[tokio::test]
async fn test_create_movie_missing_title() {
    let app = common::spawn_app().await;
    let tokens = app.signup("editor", "secret123").await;

    let body = common::movie_body("", "untitled");
    let res = app
        .client
        .post_with_auth(&app.url("/api/movies"), &tokens.access_token, &body.to_string())
        .await;

    assert_eq!(res.status, 400);
}

#[tokio::test]
async fn test_create_movie_duplicate_url() {
    let app = common::spawn_app().await;
    let tokens = app.signup("editor", "secret123").await;

    let body = common::movie_body("The Matrix", "the-matrix");
    common::create_movie(&app, &tokens.access_token, &body).await;

    let again = common::movie_body("The Matrix Reloaded", "the-matrix");
    let res = app
        .client
        .post_with_auth(&app.url("/api/movies"), &tokens.access_token, &again.to_string())
        .await;

    assert_eq!(res.status, 409);
}

#[tokio::test]
async fn test_create_movie_unknown_references() {
    let app = common::spawn_app().await;
    let tokens = app.signup("editor", "secret123").await;
    let url = app.url("/api/movies");

    let mut body = common::movie_body("A", "a");
    body["category"] = json!(42);
    let res = app
        .client
        .post_with_auth(&url, &tokens.access_token, &body.to_string())
        .await;
    assert_eq!(res.status, 404);

    let mut body = common::movie_body("B", "b");
    body["actors"] = json!([42]);
    let res = app
        .client
        .post_with_auth(&url, &tokens.access_token, &body.to_string())
        .await;
    assert_eq!(res.status, 404);

    let mut body = common::movie_body("C", "c");
    body["genres"] = json!([42]);
    let res = app
        .client
        .post_with_auth(&url, &tokens.access_token, &body.to_string())
        .await;
    assert_eq!(res.status, 404);

    assert_eq!(movie::Entity::find().count(&app.db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_get_missing_movie() {
    let app = common::spawn_app().await;

    let res = app.client.get(&app.url("/api/movies/999")).await;

    assert_eq!(res.status, 404);
}

#[tokio::test]
async fn test_list_hides_drafts() {
    let app = common::spawn_app().await;
    let tokens = app.signup("editor", "secret123").await;

    common::create_movie(&app, &tokens.access_token, &common::movie_body("Out", "out")).await;
    let mut draft = common::movie_body("Soon", "soon");
    draft["draft"] = json!(true);
    common::create_movie(&app, &tokens.access_token, &draft).await;

    let res = app.client.get(&app.url("/api/movies")).await;

    assert_eq!(res.status, 200);
    let items = res.data();
    let items = items.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "Out");
    assert_eq!(items[0]["category"], "");
    assert_eq!(items[0]["middle_star"], 0);
    assert_eq!(items[0]["rating_user"], false);
}

#[tokio::test]
async fn test_list_reports_average_star_and_caller_rating() {
    let app = common::spawn_app().await;
    let tokens = app.signup("editor", "secret123").await;
    let movie_id =
        common::create_movie(&app, &tokens.access_token, &common::movie_body("M", "m")).await;

    for (ip, star) in [("10.0.0.1", 4), ("10.0.0.2", 5)] {
        let body = json!({"ip": ip, "star_id": star, "movie_id": movie_id});
        let res = app
            .client
            .post(&app.url("/api/ratings"), &body.to_string())
            .await;
        assert_eq!(res.status, 201, "{}", res.body);
    }

    let res = reqwest::Client::new()
        .get(app.url("/api/movies"))
        .header("x-forwarded-for", "10.0.0.1")
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["data"][0]["middle_star"], 5);
    assert_eq!(body["data"][0]["rating_user"], true);

    let anonymous = app.client.get(&app.url("/api/movies")).await;
    assert_eq!(anonymous.data()[0]["rating_user"], false);
}

#[tokio::test]
async fn test_deleting_movie_cascades() {
    let app = common::spawn_app().await;
    let tokens = app.signup("editor", "secret123").await;
    let genre = common::seed_genre(&app, "Drama", "drama").await;
    let actor = common::create_actor(&app, "Dana").await;

    let mut body = common::movie_body("Gone", "gone");
    body["actors"] = json!([actor]);
    body["directors"] = json!([actor]);
    body["genres"] = json!([genre.id]);
    let movie_id = common::create_movie(&app, &tokens.access_token, &body).await;

    let rating = json!({"ip": "10.0.0.9", "star_id": 3, "movie_id": movie_id});
    app.client
        .post(&app.url("/api/ratings"), &rating.to_string())
        .await;
    let review = json!({"email": "r@example.com", "name": "R", "text": "ok"});
    app.client
        .post(
            &app.url(&format!("/api/reviews?movie_id={}", movie_id)),
            &review.to_string(),
        )
        .await;

    movie::Entity::delete_by_id(movie_id as i32)
        .exec(&app.db)
        .await
        .unwrap();

    assert_eq!(movie_actor::Entity::find().count(&app.db).await.unwrap(), 0);
    assert_eq!(movie_director::Entity::find().count(&app.db).await.unwrap(), 0);
    assert_eq!(movie_genre::Entity::find().count(&app.db).await.unwrap(), 0);
    assert_eq!(rating::Entity::find().count(&app.db).await.unwrap(), 0);
    assert_eq!(review::Entity::find().count(&app.db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_categories_and_genres_lists() {
    let app = common::spawn_app().await;
    common::seed_category(&app, "Series", "series").await;
    common::seed_category(&app, "Feature film", "feature").await;
    common::seed_genre(&app, "Comedy", "comedy").await;

    let res = app.client.get(&app.url("/api/categories")).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.data()[0]["name"], "Feature film");
    assert_eq!(res.data()[1]["url"], "series");

    let res = app.client.get(&app.url("/api/genres")).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.data().as_array().unwrap().len(), 1);
}
