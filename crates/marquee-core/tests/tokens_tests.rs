use chrono::{Duration, Utc};
use marquee_core::models::{token, user};
use marquee_core::{TestApp, TokenError, TokenHandler, TokenSettings};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};
use sea_orm_migration::MigratorTrait;

async fn setup_db() -> DatabaseConnection {
    let db = marquee_core::db::connect(&TestApp::test_config())
        .await
        .expect("connect");
    marquee_core::migrations::Migrator::up(&db, None)
        .await
        .expect("migrate");
    db
}

fn handler(db: &DatabaseConnection, enforce_access_expiry: bool) -> TokenHandler {
    TokenHandler::new(
        db.clone(),
        TokenSettings::new("test-secret", 60, 43_200, enforce_access_expiry),
    )
}

async fn create_user(db: &DatabaseConnection, username: &str) -> user::Model {
    let now = Utc::now().naive_utc();
    user::ActiveModel {
        username: Set(username.to_string()),
        email: Set(format!("{}@example.com", username)),
        password_hash: Set("not-a-real-hash".to_string()),
        first_name: Set(None),
        last_name: Set(None),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert user")
}

async fn token_rows_for(db: &DatabaseConnection, user_id: i32) -> u64 {
    token::Entity::find()
        .filter(token::Column::UserId.eq(user_id))
        .count(db)
        .await
        .expect("count tokens")
}

#[tokio::test]
async fn test_generate_twice_keeps_one_row_with_new_values() {
    let db = setup_db().await;
    let tokens = handler(&db, true);
    let carol = create_user(&db, "carol").await;

    let first = tokens.generate_tokens(&carol).await.unwrap();
    let second = tokens.generate_tokens(&carol).await.unwrap();

    assert_eq!(token_rows_for(&db, carol.id).await, 1);
    assert_eq!(first.id, second.id);
    assert_ne!(first.access_token, second.access_token);
    assert_ne!(first.refresh_token, second.refresh_token);
}

#[tokio::test]
async fn test_generate_sets_expiries_from_settings() {
    let db = setup_db().await;
    let tokens = handler(&db, true);
    let dave = create_user(&db, "dave").await;

    let before = Utc::now().naive_utc();
    let issued = tokens.generate_tokens(&dave).await.unwrap();
    let after = Utc::now().naive_utc();

    let slack = Duration::seconds(1);
    assert!(issued.access_token_expires_at >= before + Duration::minutes(60) - slack);
    assert!(issued.access_token_expires_at <= after + Duration::minutes(60) + slack);
    assert!(issued.refresh_token_expires_at >= before + Duration::minutes(43_200) - slack);
    assert!(issued.refresh_token_expires_at <= after + Duration::minutes(43_200) + slack);
}

#[tokio::test]
async fn test_old_tokens_stop_resolving_after_reissue() {
    let db = setup_db().await;
    let tokens = handler(&db, true);
    let erin = create_user(&db, "erin").await;

    let first = tokens.generate_tokens(&erin).await.unwrap();
    let second = tokens.generate_tokens(&erin).await.unwrap();

    assert!(tokens
        .get_user_from_token(&first.access_token)
        .await
        .unwrap()
        .is_none());
    let resolved = tokens
        .get_user_from_token(&second.access_token)
        .await
        .unwrap()
        .expect("current token resolves");
    assert_eq!(resolved.id, erin.id);
}

#[tokio::test]
async fn test_refresh_rotates_access_token_only() {
    let db = setup_db().await;
    let tokens = handler(&db, true);
    let frank = create_user(&db, "frank").await;

    let issued = tokens.generate_tokens(&frank).await.unwrap();
    let refreshed = tokens.refresh_tokens(&issued.refresh_token).await.unwrap();

    assert_ne!(refreshed.access_token, issued.access_token);
    assert_eq!(refreshed.refresh_token, issued.refresh_token);
    assert_eq!(
        refreshed.refresh_token_expires_at,
        issued.refresh_token_expires_at
    );
    assert!(refreshed.access_token_expires_at >= issued.access_token_expires_at);
}

#[tokio::test]
async fn test_repeated_refresh_yields_distinct_access_tokens() {
    let db = setup_db().await;
    let tokens = handler(&db, true);
    let gina = create_user(&db, "gina").await;

    let issued = tokens.generate_tokens(&gina).await.unwrap();
    let a = tokens.refresh_tokens(&issued.refresh_token).await.unwrap();
    let b = tokens.refresh_tokens(&issued.refresh_token).await.unwrap();

    assert_ne!(a.access_token, b.access_token);
    assert_eq!(token_rows_for(&db, gina.id).await, 1);
}

#[tokio::test]
async fn test_refresh_unknown_token_is_not_found() {
    let db = setup_db().await;
    let tokens = handler(&db, true);

    let err = tokens.refresh_tokens("no-such-token").await.unwrap_err();
    assert!(matches!(err, TokenError::NotFound));
}

#[tokio::test]
async fn test_resolve_unknown_token_is_none() {
    let db = setup_db().await;
    let tokens = handler(&db, true);

    let resolved = tokens.get_user_from_token("no-such-token").await.unwrap();
    assert!(resolved.is_none());
}

#[tokio::test]
async fn test_resolve_valid_token_returns_owner() {
    let db = setup_db().await;
    let tokens = handler(&db, true);
    let hank = create_user(&db, "hank").await;

    let issued = tokens.generate_tokens(&hank).await.unwrap();
    let resolved = tokens
        .get_user_from_token(&issued.access_token)
        .await
        .unwrap()
        .expect("token resolves");

    assert_eq!(resolved.id, hank.id);
    assert_eq!(resolved.username, "hank");
}

#[tokio::test]
async fn test_refresh_token_is_not_an_access_token() {
    let db = setup_db().await;
    let tokens = handler(&db, true);
    let ivy = create_user(&db, "ivy").await;

    let issued = tokens.generate_tokens(&ivy).await.unwrap();
    let resolved = tokens
        .get_user_from_token(&issued.refresh_token)
        .await
        .unwrap();
    assert!(resolved.is_none());
}

#[tokio::test]
async fn test_alice_refresh_then_resolve() {
    let db = setup_db().await;
    let tokens = handler(&db, true);
    let alice = create_user(&db, "alice").await;

    let issued = tokens.generate_tokens(&alice).await.unwrap();
    let refreshed = tokens.refresh_tokens(&issued.refresh_token).await.unwrap();

    let current = tokens
        .get_user_from_token(&refreshed.access_token)
        .await
        .unwrap()
        .expect("new access token resolves");
    assert_eq!(current.username, "alice");

    let stale = tokens
        .get_user_from_token(&issued.access_token)
        .await
        .unwrap();
    assert!(stale.is_none());
}

#[tokio::test]
async fn test_bob_expired_refresh_token() {
    let db = setup_db().await;
    let tokens = handler(&db, true);
    let bob = create_user(&db, "bob").await;

    let issued = tokens.generate_tokens(&bob).await.unwrap();
    let refresh_token = issued.refresh_token.clone();

    let mut active: token::ActiveModel = issued.into();
    active.refresh_token_expires_at = Set(Utc::now().naive_utc() - Duration::seconds(1));
    active.update(&db).await.unwrap();

    let err = tokens.refresh_tokens(&refresh_token).await.unwrap_err();
    assert!(matches!(err, TokenError::ExpiredRefreshToken));
}

#[tokio::test]
async fn test_expired_access_token_rejected_when_enforced() {
    let db = setup_db().await;
    let tokens = handler(&db, true);
    let jane = create_user(&db, "jane").await;

    let issued = tokens.generate_tokens(&jane).await.unwrap();
    let access_token = issued.access_token.clone();

    let mut active: token::ActiveModel = issued.into();
    active.access_token_expires_at = Set(Utc::now().naive_utc() - Duration::seconds(1));
    active.update(&db).await.unwrap();

    assert!(tokens
        .get_user_from_token(&access_token)
        .await
        .unwrap()
        .is_none());

    let lenient = handler(&db, false);
    let resolved = lenient
        .get_user_from_token(&access_token)
        .await
        .unwrap()
        .expect("expiry not enforced");
    assert_eq!(resolved.id, jane.id);
}

#[tokio::test]
async fn test_refresh_revives_expired_access() {
    let db = setup_db().await;
    let tokens = handler(&db, true);
    let kim = create_user(&db, "kim").await;

    let issued = tokens.generate_tokens(&kim).await.unwrap();
    let refresh_token = issued.refresh_token.clone();

    let mut active: token::ActiveModel = issued.into();
    active.access_token_expires_at = Set(Utc::now().naive_utc() - Duration::minutes(5));
    active.update(&db).await.unwrap();

    let refreshed = tokens.refresh_tokens(&refresh_token).await.unwrap();
    assert!(refreshed.access_token_expires_at > Utc::now().naive_utc());
    assert!(tokens
        .get_user_from_token(&refreshed.access_token)
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_deleting_user_removes_token_row() {
    let db = setup_db().await;
    let tokens = handler(&db, true);
    let leo = create_user(&db, "leo").await;

    let issued = tokens.generate_tokens(&leo).await.unwrap();
    assert_eq!(token_rows_for(&db, leo.id).await, 1);

    user::Entity::delete_by_id(leo.id).exec(&db).await.unwrap();

    assert_eq!(token_rows_for(&db, leo.id).await, 0);
    assert!(tokens
        .get_user_from_token(&issued.access_token)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_users_get_independent_rows() {
    let db = setup_db().await;
    let tokens = handler(&db, true);
    let mia = create_user(&db, "mia").await;
    let ned = create_user(&db, "ned").await;

    let mia_tokens = tokens.generate_tokens(&mia).await.unwrap();
    let ned_tokens = tokens.generate_tokens(&ned).await.unwrap();

    assert_ne!(mia_tokens.id, ned_tokens.id);
    assert_eq!(token::Entity::find().count(&db).await.unwrap(), 2);

    let resolved = tokens
        .get_user_from_token(&ned_tokens.access_token)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(resolved.id, ned.id);
}

#[tokio::test]
async fn test_concurrent_first_logins_share_one_row() {
    let db = setup_db().await;
    let tokens = handler(&db, true);
    let erin = create_user(&db, "erin").await;
    assert_eq!(token_rows_for(&db, erin.id).await, 0);

    let (first, second) = tokio::join!(tokens.generate_tokens(&erin), tokens.generate_tokens(&erin));
    let first = first.unwrap();
    let second = second.unwrap();

    assert_eq!(token_rows_for(&db, erin.id).await, 1);

    let stored = token::Entity::find()
        .filter(token::Column::UserId.eq(erin.id))
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    let resolved = tokens
        .get_user_from_token(&stored.access_token)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(resolved.id, erin.id);

    for issued in [&first, &second] {
        if issued.access_token != stored.access_token {
            assert!(tokens
                .get_user_from_token(&issued.access_token)
                .await
                .unwrap()
                .is_none());
        }
    }
}

#[tokio::test]
async fn test_mint_rejects_unrepresentable_expiry() {
    use marquee_core::auth::jwt::{mint_token, TokenType};

    let err = mint_token(TokenType::Access, 1, Duration::MAX, "test-secret").unwrap_err();
    assert!(matches!(err, TokenError::ExpiryOutOfRange));
}
