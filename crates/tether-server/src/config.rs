use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};

/// Access tokens that ship in docs and sample env files.
const PLACEHOLDER_TOKENS: &[&str] = &["change-me", "aaaa-bbb-cc"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub access_token: String,
    pub db_path: PathBuf,
    pub addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let access_token = lookup("TETHER_ACCESS_TOKEN").unwrap_or_default();
        if access_token.trim().is_empty() || PLACEHOLDER_TOKENS.contains(&access_token.as_str()) {
            bail!("TETHER_ACCESS_TOKEN is unset or still a placeholder");
        }

        let db_path = lookup("TETHER_DB_PATH").unwrap_or_else(|| "tether.db".into()).into();
        let host = lookup("TETHER_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = lookup("TETHER_PORT")
            .unwrap_or_else(|| "8080".into())
            .parse()
            .context("TETHER_PORT is not a valid port")?;
        let addr = format!("{}:{}", host, port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", host, port))?;

        Ok(Self {
            access_token,
            db_path,
            addr,
        })
    }
}
