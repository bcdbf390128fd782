/// API service configuration loaded from environment variables.
#[derive(Debug)]
pub struct ApiConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// HMAC secret for signing session credentials. Required — there is no
    /// fallback value; a missing secret aborts startup.
    pub jwt_secret: String,
    /// Public base URL used to build magic-link verification URLs
    /// (e.g. "https://booking.example.com").
    pub base_url: String,
    /// Whether to set the `Secure` attribute on the session cookie
    /// (default true; disable for local HTTP development). Env var: `COOKIE_SECURE`.
    pub cookie_secure: bool,
    /// TCP port to listen on (default 3114). Env var: `API_PORT`.
    pub api_port: u16,
}

impl ApiConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            jwt_secret: std::env::var("JWT_SECRET").expect("JWT_SECRET"),
            base_url: std::env::var("BASE_URL").expect("BASE_URL"),
            cookie_secure: std::env::var("COOKIE_SECURE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            api_port: std::env::var("API_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3114),
        }
    }
}
