use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub images: ImageConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub max_request_body_size: usize,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
    /// Inline PEM certificate authority. Takes precedence over `ca_cert_path`.
    pub ca_cert: Option<String>,
    /// Local PEM file consulted when no inline certificate is configured
    pub ca_cert_path: PathBuf,
}

/// Image upload and normalization settings
#[derive(Debug, Clone)]
pub struct ImageConfig {
    /// When false the image stage is not wired in and attachments are ignored
    pub enabled: bool,
    /// Directory artifacts are written to, relative to the working directory
    pub upload_dir: PathBuf,
    /// URL prefix the upload directory is served under
    pub public_route: String,
    /// Longest side of a normalized artifact, in pixels
    pub max_dimension: u32,
    /// JPEG quality used when re-encoding (1-100)
    pub jpeg_quality: u8,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            images: ImageConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
        })
    }
}

impl AppConfig {
    const DEFAULT_MAX_REQUEST_BODY_SIZE: usize = 10 * 1024 * 1024; // 10MB

    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_request_body_size = env::var("MAX_REQUEST_BODY_SIZE")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_REQUEST_BODY_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| "MAX_REQUEST_BODY_SIZE must be a valid number".to_string())?;

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            max_request_body_size,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_MIN_CONNECTIONS: u32 = 0;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes
    const DEFAULT_CA_CERT_PATH: &'static str = "ca.pem";

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MAX_CONNECTIONS must be a valid number".to_string())?;

        let min_connections = env::var("DB_MIN_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MIN_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MIN_CONNECTIONS must be a valid number".to_string())?;

        let acquire_timeout_secs = env::var("DB_ACQUIRE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_ACQUIRE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_ACQUIRE_TIMEOUT_SECS must be a valid number".to_string())?;

        let idle_timeout_secs = env::var("DB_IDLE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_IDLE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_IDLE_TIMEOUT_SECS must be a valid number".to_string())?;

        let max_lifetime_secs = env::var("DB_MAX_LIFETIME_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_LIFETIME_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_MAX_LIFETIME_SECS must be a valid number".to_string())?;

        let ca_cert = env::var("DATABASE_CA_CERT")
            .ok()
            .filter(|s| !s.trim().is_empty());

        let ca_cert_path = env::var("DATABASE_CA_CERT_PATH")
            .unwrap_or_else(|_| Self::DEFAULT_CA_CERT_PATH.to_string())
            .into();

        Ok(Self {
            url,
            max_connections,
            min_connections,
            acquire_timeout_secs,
            idle_timeout_secs,
            max_lifetime_secs,
            ca_cert,
            ca_cert_path,
        })
    }
}

impl ImageConfig {
    const DEFAULT_UPLOAD_DIR: &'static str = "uploads";
    const DEFAULT_PUBLIC_ROUTE: &'static str = "/uploads";
    pub const DEFAULT_MAX_DIMENSION: u32 = 1024;
    pub const DEFAULT_JPEG_QUALITY: u8 = 80;

    pub fn from_env() -> Result<Self, String> {
        let enabled = match env::var("IMAGE_UPLOADS_ENABLED") {
            Ok(value) => parse_bool(&value)
                .ok_or_else(|| "IMAGE_UPLOADS_ENABLED must be true or false".to_string())?,
            Err(_) => true,
        };

        let upload_dir = env::var("UPLOAD_DIR")
            .unwrap_or_else(|_| Self::DEFAULT_UPLOAD_DIR.to_string())
            .into();

        let public_route = env::var("UPLOADS_ROUTE")
            .unwrap_or_else(|_| Self::DEFAULT_PUBLIC_ROUTE.to_string());
        if !public_route.starts_with('/') || public_route.len() < 2 {
            return Err("UPLOADS_ROUTE must start with '/' and name a path".to_string());
        }

        let max_dimension = env::var("IMAGE_MAX_DIMENSION")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_DIMENSION.to_string())
            .parse::<u32>()
            .ok()
            .filter(|d| *d > 0)
            .ok_or_else(|| "IMAGE_MAX_DIMENSION must be a positive number".to_string())?;

        let jpeg_quality = env::var("IMAGE_JPEG_QUALITY")
            .unwrap_or_else(|_| Self::DEFAULT_JPEG_QUALITY.to_string())
            .parse::<u8>()
            .ok()
            .filter(|q| (1..=100).contains(q))
            .ok_or_else(|| "IMAGE_JPEG_QUALITY must be between 1 and 100".to_string())?;

        Ok(Self {
            enabled,
            upload_dir,
            public_route: public_route.trim_end_matches('/').to_string(),
            max_dimension,
            jpeg_quality,
        })
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            upload_dir: Self::DEFAULT_UPLOAD_DIR.into(),
            public_route: Self::DEFAULT_PUBLIC_ROUTE.to_string(),
            max_dimension: Self::DEFAULT_MAX_DIMENSION,
            jpeg_quality: Self::DEFAULT_JPEG_QUALITY,
        }
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Moodular API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "Citizen incident report intake".to_string());

        Ok(Self {
            title,
            version,
            description,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
