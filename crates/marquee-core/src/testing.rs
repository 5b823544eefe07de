use axum::Router;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::auth::TokenHandler;
use crate::config::Config;
use crate::controllers::AppState;

/// A test application backed by an in-memory SQLite database.
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_register() {
///     let app = TestApp::new().await;
///     let res = app.register_user("bob", "bob@example.com", "secret123").await;
///     assert_eq!(res.status, 201);
/// }
/// ```
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: TestClient,
    pub db: DatabaseConnection,
    pub config: Config,
    pub tokens: TokenHandler,
}

/// Tokens and user returned by a successful login.
#[derive(Debug, Clone)]
pub struct LoginTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub user: serde_json::Value,
}

impl TestApp {
    /// Serve the account endpoints only.
    pub async fn new() -> Self {
        Self::with_config(Self::test_config()).await
    }

    /// Serve the account endpoints with a custom config.
    pub async fn with_config(config: Config) -> Self {
        Self::build::<crate::migrations::Migrator>(config, None).await
    }

    /// Serve the account endpoints plus `routes`, migrating with `M`.
    pub async fn with_routes<M: MigratorTrait>(routes: Router<AppState>) -> Self {
        Self::build::<M>(Self::test_config(), Some(routes)).await
    }

    /// Configuration used by every test app unless one is given.
    pub fn test_config() -> Config {
        Config {
            database_url: "sqlite::memory:".to_string(),
            token_secret: "test-secret-key-for-testing".to_string(),
            access_token_lifetime_minutes: 60,
            refresh_token_lifetime_minutes: 43_200,
            enforce_access_token_expiry: true,
            min_password_length: 6,
            server_host: "127.0.0.1".to_string(),
            server_port: 0,
            environment: "test".to_string(),
        }
    }

    async fn build<M: MigratorTrait>(config: Config, routes: Option<Router<AppState>>) -> Self {
        let mut app = crate::App::with_config(config)
            .await
            .expect("Failed to create test app");

        app.run_migrations::<M>()
            .await
            .expect("Failed to run migrations");

        if let Some(routes) = routes {
            app = app.routes(routes);
        }

        let tokens = app.state().tokens;
        let router = app.router();
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test server");
        let addr = listener.local_addr().expect("Failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        TestApp {
            addr,
            client: TestClient::new(),
            db: app.db,
            config: app.config,
            tokens,
        }
    }

    /// Absolute URL for a path on the test server.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Register an account. The response is returned as-is.
    pub async fn register_user(&self, username: &str, email: &str, password: &str) -> TestResponse {
        let body = serde_json::json!({
            "username": username,
            "email": email,
            "password": password,
        });
        self.client
            .post(&self.url("/api/auth/register"), &body.to_string())
            .await
    }

    /// Log in and return the issued tokens, panicking on failure.
    pub async fn login(&self, username: &str, password: &str) -> LoginTokens {
        let body = serde_json::json!({
            "username": username,
            "password": password,
        });
        let res = self
            .client
            .post(&self.url("/api/auth/login"), &body.to_string())
            .await;
        assert_eq!(res.status, 200, "Login failed: {}", res.body);

        let data = res.data();
        LoginTokens {
            access_token: data["access_token"].as_str().unwrap().to_string(),
            refresh_token: data["refresh_token"].as_str().unwrap().to_string(),
            user: data["user"].clone(),
        }
    }

    /// Register then log in.
    pub async fn signup(&self, username: &str, password: &str) -> LoginTokens {
        let email = format!("{}@example.com", username);
        let res = self.register_user(username, &email, password).await;
        assert_eq!(res.status, 201, "Register failed: {}", res.body);
        self.login(username, password).await
    }
}

/// A thin reqwest wrapper that sends JSON bodies and bearer headers.
#[derive(Clone, Default)]
pub struct TestClient {
    inner: reqwest::Client,
}

impl TestClient {
    pub fn new() -> Self {
        TestClient {
            inner: reqwest::Client::new(),
        }
    }

    async fn send(
        &self,
        method: reqwest::Method,
        url: &str,
        token: Option<&str>,
        body: Option<&str>,
    ) -> TestResponse {
        let mut req = self.inner.request(method.clone(), url);
        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }
        if let Some(body) = body {
            req = req
                .header("Content-Type", "application/json")
                .body(body.to_string());
        }
        let res = req
            .send()
            .await
            .unwrap_or_else(|e| panic!("{} {} failed: {}", method, url, e));
        TestResponse::from_response(res).await
    }

    pub async fn get(&self, url: &str) -> TestResponse {
        self.send(reqwest::Method::GET, url, None, None).await
    }

    pub async fn get_with_auth(&self, url: &str, token: &str) -> TestResponse {
        self.send(reqwest::Method::GET, url, Some(token), None).await
    }

    pub async fn post(&self, url: &str, body: &str) -> TestResponse {
        self.send(reqwest::Method::POST, url, None, Some(body)).await
    }

    pub async fn post_with_auth(&self, url: &str, token: &str, body: &str) -> TestResponse {
        self.send(reqwest::Method::POST, url, Some(token), Some(body))
            .await
    }

    pub async fn patch_with_auth(&self, url: &str, token: &str, body: &str) -> TestResponse {
        self.send(reqwest::Method::PATCH, url, Some(token), Some(body))
            .await
    }

    pub async fn put_with_auth(&self, url: &str, token: &str, body: &str) -> TestResponse {
        self.send(reqwest::Method::PUT, url, Some(token), Some(body))
            .await
    }

    pub async fn delete(&self, url: &str) -> TestResponse {
        self.send(reqwest::Method::DELETE, url, None, None).await
    }

    pub async fn delete_with_auth(&self, url: &str, token: &str) -> TestResponse {
        self.send(reqwest::Method::DELETE, url, Some(token), None)
            .await
    }
}

/// Status and raw body of a test request.
#[derive(Debug)]
pub struct TestResponse {
    pub status: u16,
    pub body: String,
}

impl TestResponse {
    async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let body = res.text().await.unwrap_or_default();
        TestResponse { status, body }
    }

    /// Parse the body as JSON (`Null` for an empty body).
    pub fn json(&self) -> serde_json::Value {
        if self.body.is_empty() {
            return serde_json::Value::Null;
        }
        serde_json::from_str(&self.body)
            .unwrap_or_else(|e| panic!("Invalid JSON body ({}): {}", e, self.body))
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The `data` field of the response envelope.
    pub fn data(&self) -> serde_json::Value {
        self.json()["data"].clone()
    }

    /// The `error.code` field of the response envelope.
    pub fn error_code(&self) -> String {
        self.json()["error"]["code"]
            .as_str()
            .unwrap_or_default()
            .to_string()
    }

    /// The `error.message` field of the response envelope.
    pub fn error_message(&self) -> String {
        self.json()["error"]["message"]
            .as_str()
            .unwrap_or_default()
            .to_string()
    }
}
