use marquee_core::TestApp;

#[tokio::test]
async fn test_welcome_page() {
    let app = TestApp::new().await;

    let res = app.client.get(&app.url("/")).await;

    assert_eq!(res.status, 200);
    assert_eq!(res.json()["status"], "running");
}

#[tokio::test]
async fn test_openapi_json_endpoint() {
    let app = TestApp::new().await;

    let res = app.client.get(&app.url("/api-docs/openapi.json")).await;

    assert_eq!(res.status, 200);
    let json = res.json();
    assert_eq!(json["info"]["title"], "Marquee API");
    assert!(json["paths"].is_object());
}

#[tokio::test]
async fn test_openapi_has_auth_paths() {
    let app = TestApp::new().await;

    let json = app
        .client
        .get(&app.url("/api-docs/openapi.json"))
        .await
        .json();

    for path in [
        "/api/auth/register",
        "/api/auth/login",
        "/api/auth/refresh",
        "/api/auth/profile",
        "/api/auth/update_password",
        "/api/auth/delete-account",
    ] {
        assert!(json["paths"][path].is_object(), "Missing {} in OpenAPI spec", path);
    }
}

#[tokio::test]
async fn test_openapi_has_security_scheme() {
    let app = TestApp::new().await;

    let json = app
        .client
        .get(&app.url("/api-docs/openapi.json"))
        .await
        .json();

    assert!(json["components"]["securitySchemes"]["bearer_auth"].is_object());
}

#[tokio::test]
async fn test_scalar_docs_served() {
    let app = TestApp::new().await;

    let res = app.client.get(&app.url("/api-docs")).await;

    assert_eq!(res.status, 200);
    assert!(res.body.contains("<html") || res.body.contains("<!doctype") || res.body.contains("<!DOCTYPE"));
}
