use serde::Deserialize;
use std::env;

// Top-level configuration container
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub api: ApiConfig,
}

// Application-wide settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub rust_log: String,
}

// Remote events API settings
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub client_secret: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Config {
            app: AppConfig {
                rust_log: env::var("RUST_LOG")
                    .unwrap_or_else(|_| "boleteria=debug".to_string()),
            },
            api: ApiConfig {
                base_url: env::var("BASE_URL").expect("BASE_URL must be set"),
                client_secret: env::var("CLIENT_SECRET").expect("CLIENT_SECRET must be set"),
                connect_timeout_secs: env::var("CONNECT_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .expect("CONNECT_TIMEOUT_SECS must be a valid number"),
                request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .expect("REQUEST_TIMEOUT_SECS must be a valid number"),
            },
        }
    }
}
