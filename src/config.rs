use anyhow::{Context, Result};
use clap::Parser;
use std::{env, str::FromStr};

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub storage_dir: String,
    pub database_url: String,
    /// Prefix of every public object URL handed out to clients.
    pub public_base_url: String,
    pub max_upload_bytes: usize,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Hero-image carousel and QR-code admin backend")]
pub struct Args {
    /// Host to bind to (overrides CAROUSEL_ADMIN_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides CAROUSEL_ADMIN_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Directory where uploaded objects are stored (overrides CAROUSEL_ADMIN_STORAGE_DIR)
    #[arg(long)]
    pub storage_dir: Option<String>,

    /// Database URL (overrides CAROUSEL_ADMIN_DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Base URL used to build public object URLs (overrides CAROUSEL_ADMIN_PUBLIC_BASE_URL)
    #[arg(long)]
    pub public_base_url: Option<String>,

    /// Maximum accepted request body in bytes (overrides CAROUSEL_ADMIN_MAX_UPLOAD_BYTES)
    #[arg(long)]
    pub max_upload_bytes: Option<usize>,

    /// Run migrations and exit
    #[arg(long)]
    pub migrate: bool,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig and migrate flag.
    pub fn from_env_and_args() -> Result<(Self, bool)> {
        let args = Args::parse();
        let migrate = args.migrate;
        Ok((Self::merge(args)?, migrate))
    }

    /// Merge already-parsed CLI args over the environment.
    pub fn merge(args: Args) -> Result<Self> {
        let env_host = env::var("CAROUSEL_ADMIN_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let env_port = env_parse("CAROUSEL_ADMIN_PORT", 3000u16)?;
        let env_storage =
            env::var("CAROUSEL_ADMIN_STORAGE_DIR").unwrap_or_else(|_| "./data/objects".into());
        let env_db = env::var("CAROUSEL_ADMIN_DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://./data/meta/carousel_admin.db".into());
        let env_public = env::var("CAROUSEL_ADMIN_PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".into());
        let env_max_upload = env_parse("CAROUSEL_ADMIN_MAX_UPLOAD_BYTES", 10 * 1024 * 1024usize)?;

        let public_base_url = args.public_base_url.unwrap_or(env_public);

        Ok(Self {
            host: args.host.unwrap_or(env_host),
            port: args.port.unwrap_or(env_port),
            storage_dir: args.storage_dir.unwrap_or(env_storage),
            database_url: args.database_url.unwrap_or(env_db),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
            max_upload_bytes: args.max_upload_bytes.unwrap_or(env_max_upload),
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn env_parse<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(value) => value
            .parse::<T>()
            .with_context(|| format!("parsing {} value `{}`", name, value)),
        Err(env::VarError::NotPresent) => Ok(default),
        Err(err) => Err(err).with_context(|| format!("reading {}", name)),
    }
}
