use std::{env, path::PathBuf};

use crate::errors::AppError;

const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8080";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_STORAGE_DIR: &str = "./storage";
const DEFAULT_PUBLIC_STORAGE_URL: &str = "http://127.0.0.1:8080/storage";

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    pub database_url: String,
    pub max_connections: u32,
    pub admin_jwt_secret: String,
    pub user_jwt_secret: String,
    pub storage_dir: PathBuf,
    pub public_storage_url: String,
    /// Admin signup is closed when unset.
    pub admin_signup_key: Option<String>,
}

impl Config {
    /// Reads the process environment. Call `dotenv()` first to pick up `.env`.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let required = |key: &str| {
            lookup(key)
                .filter(|val| !val.trim().is_empty())
                .ok_or_else(|| AppError::Config(format!("{} must be set", key)))
        };

        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(val) => val
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| AppError::Config("DATABASE_MAX_CONNECTIONS must be a positive integer".to_string()))?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let public_storage_url = lookup("PUBLIC_STORAGE_URL")
            .unwrap_or_else(|| DEFAULT_PUBLIC_STORAGE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Config {
            bind_address: lookup("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            database_url: required("DATABASE_URL")?,
            max_connections,
            admin_jwt_secret: required("ADMIN_JWT_PASSWORD")?,
            user_jwt_secret: required("USER_JWT_PASSWORD")?,
            storage_dir: PathBuf::from(lookup("STORAGE_DIR").unwrap_or_else(|| DEFAULT_STORAGE_DIR.to_string())),
            public_storage_url,
            admin_signup_key: lookup("ADMIN_SIGNUP_KEY").filter(|key| !key.trim().is_empty()),
        })
    }
}
