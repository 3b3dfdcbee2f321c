use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// Secrets (JWT, payment provider, LLM) are required and fail fast when
/// missing; everything else has defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Public base URL used for checkout redirect targets.
    pub public_base_url: String,
    /// JWT validation configuration (shared secret with the auth provider).
    pub jwt: JwtConfig,
    /// Payment provider configuration.
    pub payments: PaymentConfig,
    /// LLM provider configuration.
    pub llm: LlmConfig,
}

/// Payment provider (checkout + webhook) configuration.
#[derive(Debug, Clone)]
pub struct PaymentConfig {
    /// Secret API key for server-to-provider calls.
    pub secret_key: String,
    /// Shared secret for verifying inbound webhook signatures.
    pub webhook_secret: String,
    /// Provider REST API base URL (default: `https://api.stripe.com/v1`).
    pub api_base: String,
    /// Webhook signature timestamp tolerance in seconds (default: `300`).
    pub tolerance_secs: i64,
    /// Outbound request timeout in seconds (default: `30`).
    pub timeout_secs: u64,
}

/// LLM provider (chat/dictionary/pronunciation proxy) configuration.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// API key for the OpenAI-compatible endpoint.
    pub api_key: String,
    /// API base URL (default: `https://api.openai.com/v1`).
    pub base_url: String,
    /// Model name (default: `gpt-4o-mini`).
    pub model: String,
    /// Outbound request timeout in seconds (default: `30`).
    pub timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Required | Default                     |
    /// |----------------------------|----------|-----------------------------|
    /// | `HOST`                     | no       | `0.0.0.0`                   |
    /// | `PORT`                     | no       | `3000`                      |
    /// | `CORS_ORIGINS`             | no       | `http://localhost:3001`     |
    /// | `REQUEST_TIMEOUT_SECS`     | no       | `30`                        |
    /// | `PUBLIC_BASE_URL`          | no       | `http://localhost:3000`     |
    /// | `JWT_SECRET`               | **yes**  | --                          |
    /// | `PAYMENT_SECRET_KEY`       | **yes**  | --                          |
    /// | `PAYMENT_WEBHOOK_SECRET`   | **yes**  | --                          |
    /// | `PAYMENT_API_BASE`         | no       | `https://api.stripe.com/v1` |
    /// | `WEBHOOK_TOLERANCE_SECS`   | no       | `300`                       |
    /// | `LLM_API_KEY`              | **yes**  | --                          |
    /// | `LLM_BASE_URL`             | no       | `https://api.openai.com/v1` |
    /// | `LLM_MODEL`                | no       | `gpt-4o-mini`               |
    /// | `UPSTREAM_TIMEOUT_SECS`    | no       | `30`                        |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3001".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let public_base_url = std::env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".into());

        let upstream_timeout_secs: u64 = std::env::var("UPSTREAM_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("UPSTREAM_TIMEOUT_SECS must be a valid u64");

        let payments = PaymentConfig {
            secret_key: std::env::var("PAYMENT_SECRET_KEY")
                .expect("PAYMENT_SECRET_KEY must be set in the environment"),
            webhook_secret: std::env::var("PAYMENT_WEBHOOK_SECRET")
                .expect("PAYMENT_WEBHOOK_SECRET must be set in the environment"),
            api_base: std::env::var("PAYMENT_API_BASE")
                .unwrap_or_else(|_| "https://api.stripe.com/v1".into()),
            tolerance_secs: std::env::var("WEBHOOK_TOLERANCE_SECS")
                .unwrap_or_else(|_| lingua_core::signature::DEFAULT_TOLERANCE_SECS.to_string())
                .parse()
                .expect("WEBHOOK_TOLERANCE_SECS must be a valid i64"),
            timeout_secs: upstream_timeout_secs,
        };

        let llm = LlmConfig {
            api_key: std::env::var("LLM_API_KEY")
                .expect("LLM_API_KEY must be set in the environment"),
            base_url: std::env::var("LLM_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".into()),
            model: std::env::var("LLM_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into()),
            timeout_secs: upstream_timeout_secs,
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            public_base_url,
            jwt: JwtConfig::from_env(),
            payments,
            llm,
        }
    }
}
