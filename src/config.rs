use std::net::IpAddr;
use std::path::PathBuf;

/// Origins allowed to receive their own value back in
/// `Access-Control-Allow-Origin`. The first entry is the fallback.
pub const ALLOWED_ORIGINS: &[&str] = &[
    "https://leancompanion.com",
    "https://www.leancompanion.com",
    "http://localhost:5173",
];

pub const NOTION_PAGES_URL: &str = "https://api.notion.com/v1/pages";
pub const NOTION_VERSION: &str = "2022-06-28";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub max_body_size: usize,
    pub log_level: String,
    pub allowed_origins: Vec<String>,
    pub forms_file: Option<PathBuf>,
    pub notion: NotionConfig,
}

#[derive(Debug, Clone)]
pub struct NotionConfig {
    pub api_url: String,
    pub token: Option<String>,
    pub database_id: Option<String>,
}

/// Credentials needed for a page-creation call.
#[derive(Debug, Clone, Copy)]
pub struct NotionCredentials<'a> {
    pub token: &'a str,
    pub database_id: &'a str,
}

impl NotionConfig {
    /// Both the token and the database id, or `None` if either is unset.
    pub fn credentials(&self) -> Option<NotionCredentials<'_>> {
        Some(NotionCredentials {
            token: self.token.as_deref()?,
            database_id: self.database_id.as_deref()?,
        })
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let host: IpAddr = env_or("FORMRELAY_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid FORMRELAY_HOST: {e}"))?;

        let port = std::env::var("FORMRELAY_PORT")
            .or_else(|_| std::env::var("PORT"))
            .unwrap_or_else(|_| "3000".to_string());
        let port: u16 = port
            .parse()
            .map_err(|e| format!("Invalid FORMRELAY_PORT: {e}"))?;

        let max_body_size: usize = env_or("FORMRELAY_MAX_BODY_SIZE", "1048576")
            .parse()
            .map_err(|e| format!("Invalid FORMRELAY_MAX_BODY_SIZE: {e}"))?;

        let log_level = env_or("FORMRELAY_LOG_LEVEL", "info");
        let forms_file = env_optional("FORMRELAY_FORMS_FILE").map(PathBuf::from);

        let notion = NotionConfig {
            api_url: env_or("NOTION_API_URL", NOTION_PAGES_URL),
            token: env_optional("NOTION_TOKEN"),
            database_id: env_optional("NOTION_DB_ID"),
        };

        Ok(Config {
            host,
            port,
            max_body_size,
            log_level,
            allowed_origins: default_allowed_origins(),
            forms_file,
            notion,
        })
    }
}

pub fn default_allowed_origins() -> Vec<String> {
    ALLOWED_ORIGINS.iter().map(|s| s.to_string()).collect()
}

fn env_optional(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
