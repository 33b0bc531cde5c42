use atrium_api::auth::{issue_token, Claims};

/// Admin key configured for every test app.
pub const TEST_ADMIN_API_KEY: &str = "test-admin-api-key-at-least-32-characters-long";

/// HS256 secret configured for every test app.
pub const TEST_JWT_SECRET: &str = "test-jwt-secret-at-least-32-characters-long";

pub fn admin_bearer() -> String {
    format!("Bearer {}", TEST_ADMIN_API_KEY)
}

/// Bearer header with a token that expires `expires_in` seconds from now.
pub fn jwt_bearer(expires_in: i64) -> String {
    let claims = Claims {
        sub: "editor@example.com".to_string(),
        exp: chrono::Utc::now().timestamp() + expires_in,
    };
    let token = issue_token(TEST_JWT_SECRET, &claims).expect("Failed to sign test token");
    format!("Bearer {}", token)
}
