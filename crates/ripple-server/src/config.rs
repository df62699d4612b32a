use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};

/// Placeholder JWT secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &[
    "change-me-to-a-random-string",
    "dev-secret-change-me",
];

/// Process configuration, read once at startup. No hot reload.
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub jwt_secret: String,
    pub public_dir: PathBuf,
    pub seed: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let jwt_secret = env::var("RIPPLE_JWT_SECRET").unwrap_or_default();
        if jwt_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
            bail!("RIPPLE_JWT_SECRET is unset or still a placeholder; set it in .env and restart");
        }

        let host = env::var("RIPPLE_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port: u16 = env::var("RIPPLE_PORT")
            .unwrap_or_else(|_| "6001".into())
            .parse()
            .context("invalid RIPPLE_PORT")?;
        let db_path: PathBuf = env::var("RIPPLE_DB_PATH")
            .unwrap_or_else(|_| "ripple.db".into())
            .into();
        let public_dir: PathBuf = env::var("RIPPLE_PUBLIC_DIR")
            .unwrap_or_else(|_| "./public".into())
            .into();
        let seed = env::var("RIPPLE_SEED").map(|v| v == "1").unwrap_or(false);

        Ok(Self {
            host,
            port,
            db_path,
            jwt_secret,
            public_dir,
            seed,
        })
    }

    /// Uploads land here and are served back under /assets.
    pub fn assets_dir(&self) -> PathBuf {
        self.public_dir.join("assets")
    }
}
