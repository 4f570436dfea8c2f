use std::env;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub timezone: TimeZoneConfig,
    pub upload: UploadConfig,
    pub swagger: SwaggerConfig,
    pub admin: AdminConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub max_request_body_size: usize,
    /// Base URL encoded into restroom QR labels (`<base>?r=<restroom id>`)
    pub qr_base_url: String,
    /// Upsert the built-in restroom list at startup
    pub seed_default_restrooms: bool,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// `None` runs the service against the in-memory store
    pub url: Option<String>,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

#[derive(Debug, Clone)]
pub struct TimeZoneConfig {
    /// Zone used when a request carries no usable `tz`
    pub default_zone: String,
}

#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub folder: PathBuf,
    pub max_file_size: usize,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

/// Basic auth credentials for catalog writes. Without both parts the
/// `PUT`/`DELETE /api/restrooms/{id}` routes are not mounted.
#[derive(Debug, Clone, Default)]
pub struct AdminConfig {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                tracing::warn!("Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            timezone: TimeZoneConfig::from_env(),
            upload: UploadConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
            admin: AdminConfig::from_env(),
        })
    }
}

impl AppConfig {
    const DEFAULT_MAX_REQUEST_BODY_SIZE: usize = 4 * 1024 * 1024; // 4MB

    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port: u16 = parse_var("PORT", 8000)?;

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let qr_base_url =
            env::var("QR_BASE_URL").unwrap_or_else(|_| format!("http://localhost:{}/qr", port));

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            max_request_body_size: parse_var(
                "MAX_REQUEST_BODY_SIZE",
                Self::DEFAULT_MAX_REQUEST_BODY_SIZE,
            )?,
            qr_base_url,
            seed_default_restrooms: parse_bool_var("SEED_DEFAULT_RESTROOMS", false)?,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    pub fn from_env() -> Result<Self, String> {
        // DB_URL is a local override for DATABASE_URL
        let url = env::var("DB_URL")
            .or_else(|_| env::var("DATABASE_URL"))
            .ok()
            .and_then(|raw| normalize_database_url(&raw));

        Ok(Self {
            url,
            max_connections: parse_var("DB_MAX_CONNECTIONS", Self::DEFAULT_MAX_CONNECTIONS)?,
            min_connections: parse_var("DB_MIN_CONNECTIONS", Self::DEFAULT_MIN_CONNECTIONS)?,
            acquire_timeout_secs: parse_var(
                "DB_ACQUIRE_TIMEOUT_SECS",
                Self::DEFAULT_ACQUIRE_TIMEOUT_SECS,
            )?,
            idle_timeout_secs: parse_var("DB_IDLE_TIMEOUT_SECS", Self::DEFAULT_IDLE_TIMEOUT_SECS)?,
            max_lifetime_secs: parse_var("DB_MAX_LIFETIME_SECS", Self::DEFAULT_MAX_LIFETIME_SECS)?,
        })
    }
}

impl TimeZoneConfig {
    pub const FALLBACK_ZONE: &'static str = "America/Mexico_City";

    pub fn from_env() -> Self {
        let default_zone = env::var("DEFAULT_TZ")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| Self::FALLBACK_ZONE.to_string());

        Self { default_zone }
    }
}

impl UploadConfig {
    const DEFAULT_MAX_FILE_SIZE: usize = 3 * 1024 * 1024; // 3MB

    pub fn from_env() -> Result<Self, String> {
        let folder = env::var("UPLOAD_FOLDER").unwrap_or_else(|_| "uploads".to_string());

        Ok(Self {
            folder: PathBuf::from(folder),
            max_file_size: parse_var("MAX_UPLOAD_SIZE", Self::DEFAULT_MAX_FILE_SIZE)?,
        })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title =
            env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Restroom Reports API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION").unwrap_or_else(|_| {
            "QR-based restroom maintenance reports and dashboard KPIs".to_string()
        });

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

impl AdminConfig {
    pub fn from_env() -> Self {
        Self {
            username: env::var("ADMIN_USERNAME").ok().filter(|s| !s.is_empty()),
            password: env::var("ADMIN_PASSWORD").ok().filter(|s| !s.is_empty()),
        }
    }

    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

/// Accepts Heroku/Render style `postgres://` URLs as well as `postgresql://`.
/// Blank values mean "no database configured".
pub fn normalize_database_url(raw: &str) -> Option<String> {
    let url = raw.trim();
    if url.is_empty() {
        return None;
    }

    if let Some(rest) = url.strip_prefix("postgresql+psycopg2://") {
        return Some(format!("postgres://{}", rest));
    }

    Some(url.to_string())
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse::<T>()
            .map_err(|_| format!("{} must be a valid number", name)),
        _ => Ok(default),
    }
}

fn parse_bool_var(name: &str, default: bool) -> Result<bool, String> {
    match env::var(name) {
        Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" | "" => Ok(false),
            other => Err(format!("{} must be a boolean, got '{}'", name, other)),
        },
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_database_url_blank_means_memory() {
        assert_eq!(normalize_database_url(""), None);
        assert_eq!(normalize_database_url("   "), None);
    }

    #[test]
    fn test_normalize_database_url_keeps_postgres_urls() {
        assert_eq!(
            normalize_database_url(" postgres://u:p@db:5432/app ").as_deref(),
            Some("postgres://u:p@db:5432/app")
        );
        assert_eq!(
            normalize_database_url("postgresql://u:p@db/app").as_deref(),
            Some("postgresql://u:p@db/app")
        );
    }

    #[test]
    fn test_normalize_database_url_strips_python_driver() {
        assert_eq!(
            normalize_database_url("postgresql+psycopg2://u:p@db/app").as_deref(),
            Some("postgres://u:p@db/app")
        );
    }

    #[test]
    fn test_swagger_credentials_require_both_parts() {
        let mut swagger = SwaggerConfig {
            username: Some("admin".to_string()),
            password: None,
            title: String::new(),
            version: String::new(),
            description: String::new(),
        };
        assert_eq!(swagger.credentials(), None);

        swagger.password = Some("secret".to_string());
        assert_eq!(swagger.credentials().as_deref(), Some("admin:secret"));
    }

    #[test]
    fn test_admin_credentials_default_to_disabled() {
        assert_eq!(AdminConfig::default().credentials(), None);

        let admin = AdminConfig {
            username: Some("ops".to_string()),
            password: Some("hunter2".to_string()),
        };
        assert_eq!(admin.credentials().as_deref(), Some("ops:hunter2"));
    }
}
