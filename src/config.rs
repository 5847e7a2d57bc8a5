//! Layered application configuration.
//!
//! Priority, lowest to highest: built-in defaults, config file, `LANGRAG_`
//! environment variables (`LANGRAG_SERVER__PORT=8000`), CLI flags (and the
//! environment variables `clap` binds to them).

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::session::DEFAULT_SESSION_TIMEOUT;
use crate::upload::{
    DEFAULT_ACCEPTED_TYPES, DEFAULT_MAX_FILE_SIZE, DEFAULT_MAX_FILES, UploadPolicy,
};

/// Backend URL used by debug builds when nothing else is configured.
pub const LOCAL_API_URL: &str = "http://localhost:5000/api";

/// Placeholder backend URL used by release builds when nothing else is configured.
pub const PRODUCTION_API_URL: &str = "https://your-aws-lambda-url.amazonaws.com/api";

/// Config file picked up from the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "langrag.yaml";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Address to bind
    #[arg(long, env = "LANGRAG_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Base URL of the document backend (e.g. http://localhost:5000/api)
    #[arg(long, env = "LANGRAG_API_URL")]
    pub api_url: Option<String>,

    /// Directory served under /static
    #[arg(long, env = "LANGRAG_STATIC_DIR")]
    pub static_dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    pub upload: UploadConfig,
    pub session: SessionConfig,
    pub static_dir: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// `host:port` for binding.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct BackendConfig {
    /// Explicit backend URL; see [`BackendConfig::resolved_api_url`].
    #[serde(default)]
    pub api_url: Option<String>,
}

impl BackendConfig {
    /// Backend URL: configured value, else the build-time `LANGRAG_API_URL`,
    /// else the local default (debug) or production placeholder (release).
    #[must_use]
    pub fn resolved_api_url(&self) -> String {
        self.api_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| {
                fallback_api_url(option_env!("LANGRAG_API_URL"), cfg!(debug_assertions))
            })
    }
}

fn fallback_api_url(build_time: Option<&str>, debug: bool) -> String {
    match build_time.map(str::trim).filter(|url| !url.is_empty()) {
        Some(url) => url.to_string(),
        None if debug => LOCAL_API_URL.to_string(),
        None => PRODUCTION_API_URL.to_string(),
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct UploadConfig {
    pub max_files: usize,
    pub accepted_types: Vec<String>,
    pub max_file_size: u64,
    /// Body limit for the staging endpoint; must exceed one full batch.
    pub max_request_bytes: usize,
}

impl UploadConfig {
    #[must_use]
    pub fn policy(&self) -> UploadPolicy {
        UploadPolicy {
            max_files: self.max_files,
            accepted_types: self.accepted_types.clone(),
            max_file_size: self.max_file_size,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    pub idle_timeout_secs: u64,
    pub sweep_interval_secs: u64,
}

impl SessionConfig {
    #[must_use]
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    #[must_use]
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Self::from_cli(&cli)
    }

    pub fn from_cli(cli: &Cli) -> Result<Self, config::ConfigError> {
        let accepted: Vec<String> = DEFAULT_ACCEPTED_TYPES
            .iter()
            .map(|s| (*s).to_string())
            .collect();

        // 1. Defaults
        let mut builder = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("upload.max_files", DEFAULT_MAX_FILES as u64)?
            .set_default("upload.accepted_types", accepted)?
            .set_default("upload.max_file_size", DEFAULT_MAX_FILE_SIZE)?
            .set_default("upload.max_request_bytes", 64 * 1024 * 1024_u64)?
            .set_default("session.idle_timeout_secs", DEFAULT_SESSION_TIMEOUT.as_secs())?
            .set_default("session.sweep_interval_secs", 60_u64)?
            .set_default("static_dir", "static")?;

        // 2. Config file: explicit path must exist, the cwd default is optional
        match &cli.config {
            Some(path) => builder = builder.add_source(File::from(path.as_path())),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.exists() {
                    builder = builder.add_source(File::from(fallback));
                }
            }
        }

        // 3. Prefixed environment, e.g. LANGRAG_UPLOAD__MAX_FILES=3
        builder = builder.add_source(
            Environment::with_prefix("LANGRAG")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("upload.accepted_types")
                .try_parsing(true),
        );

        // 4. CLI flags (and their bound env vars)
        if let Some(host) = &cli.host {
            builder = builder.set_override("server.host", host.as_str())?;
        }
        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", u64::from(port))?;
        }
        if let Some(url) = &cli.api_url {
            builder = builder.set_override("backend.api_url", url.as_str())?;
        }
        if let Some(dir) = &cli.static_dir {
            builder = builder.set_override("static_dir", dir.to_string_lossy().into_owned())?;
        }

        let cfg: Self = builder.build()?.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), config::ConfigError> {
        if self.upload.max_files == 0 {
            return Err(config::ConfigError::Message(
                "upload.max_files must be at least 1".into(),
            ));
        }
        if self.upload.accepted_types.is_empty() {
            return Err(config::ConfigError::Message(
                "upload.accepted_types cannot be empty".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_api_url() {
        assert_eq!(fallback_api_url(None, true), LOCAL_API_URL);
        assert_eq!(fallback_api_url(None, false), PRODUCTION_API_URL);
        assert_eq!(fallback_api_url(Some(" "), true), LOCAL_API_URL);
        assert_eq!(
            fallback_api_url(Some("https://rag.example.com/api"), false),
            "https://rag.example.com/api"
        );
    }

    #[test]
    fn test_configured_api_url_wins() {
        let backend = BackendConfig {
            api_url: Some(" http://10.0.0.5:5000/api ".into()),
        };
        assert_eq!(backend.resolved_api_url(), "http://10.0.0.5:5000/api");
    }

    #[test]
    fn test_upload_policy_from_config() {
        let upload = UploadConfig {
            max_files: 2,
            accepted_types: vec![".md".into()],
            max_file_size: 1024,
            max_request_bytes: 4096,
        };
        let policy = upload.policy();
        assert_eq!(policy.max_files, 2);
        assert!(policy.accepts_extension("md"));
        assert_eq!(policy.max_file_size, 1024);
    }
}
