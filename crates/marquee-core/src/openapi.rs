use utoipa::OpenApi;

use crate::controllers::auth::{
    LoginRequest, LoginResponse, MessageResponse, RefreshRequest, RefreshResponse,
    RegisterRequest, UpdatePasswordRequest, UpdateProfileRequest,
};
use crate::error::ErrorDetail;
use crate::models::user::UserResponse;

/// OpenAPI documentation for the account endpoints.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Marquee API",
        version = "0.1.0",
        description = "Movie catalog with bearer-token accounts."
    ),
    paths(
        crate::controllers::auth::register,
        crate::controllers::auth::login,
        crate::controllers::auth::refresh,
        crate::controllers::auth::update_profile,
        crate::controllers::auth::update_password,
        crate::controllers::auth::delete_account,
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            RefreshRequest,
            RefreshResponse,
            UpdateProfileRequest,
            UpdatePasswordRequest,
            MessageResponse,
            UserResponse,
            ErrorDetail,
        )
    ),
    tags(
        (name = "auth", description = "Registration, login and token refresh")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Add the bearer security scheme to the OpenAPI spec.
pub struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::Http::new(
                        utoipa::openapi::security::HttpAuthScheme::Bearer,
                    ),
                ),
            );
        }
    }
}

/// Merge an application's spec into the account docs.
pub fn merge_openapi(
    mut base: utoipa::openapi::OpenApi,
    other: utoipa::openapi::OpenApi,
) -> utoipa::openapi::OpenApi {
    base.merge(other);
    base
}
