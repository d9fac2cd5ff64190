// # phonebookd - Phonebook Daemon
//
// Thin integration layer: all directory rules live in phonebook-core and
// the REST surface lives in phonebook-http. This binary only:
// 1. Reads configuration from environment variables
// 2. Initializes logging and the runtime
// 3. Builds the configured store and the directory around it
// 4. Serves HTTP until SIGTERM/SIGINT
//
// ## Configuration
//
// - `PORT`: TCP port to listen on (default 3002)
// - `PHONEBOOK_STORE_TYPE`: Store variant (memory, file; default memory)
// - `PHONEBOOK_STORE_PATH`: Path to the directory file (required for file)
// - `PHONEBOOK_MIN_NAME_LEN`: File store minimum name length (default 5, 0 disables)
// - `PHONEBOOK_UNIQUE_FIELDS`: Override duplicate guarding (true, false)
// - `PHONEBOOK_ALLOWED_ORIGINS`: Comma-separated origin allow-list
// - `PHONEBOOK_LOG_LEVEL`: trace, debug, info, warn, error (default info)
//
// ## Example
//
// ```bash
// export PHONEBOOK_STORE_TYPE=file
// export PHONEBOOK_STORE_PATH=/var/lib/phonebook/contacts.json
// export PORT=3001
//
// phonebookd
// ```

use anyhow::Result;
use phonebook_core::{
    Directory, DirectoryRules, OriginFirewall, PhonebookConfig, ServerConfig, StoreConfig,
    StoreRegistry,
};
use std::env;
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum PhonebookExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<PhonebookExitCode> for ExitCode {
    fn from(code: PhonebookExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Raw settings as read from the environment
struct Config {
    port: String,
    store_type: String,
    store_path: Option<String>,
    min_name_len: Option<String>,
    unique_fields: Option<String>,
    allowed_origins: Option<String>,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Self {
        Self {
            port: env::var("PORT").unwrap_or_else(|_| "3002".to_string()),
            store_type: env::var("PHONEBOOK_STORE_TYPE").unwrap_or_else(|_| "memory".to_string()),
            store_path: env::var("PHONEBOOK_STORE_PATH").ok(),
            min_name_len: env::var("PHONEBOOK_MIN_NAME_LEN").ok(),
            unique_fields: env::var("PHONEBOOK_UNIQUE_FIELDS").ok(),
            allowed_origins: env::var("PHONEBOOK_ALLOWED_ORIGINS").ok(),
            log_level: env::var("PHONEBOOK_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        }
    }

    /// Turn the raw settings into a validated [`PhonebookConfig`]
    fn resolve(&self) -> Result<PhonebookConfig> {
        let port: u16 = self.port.trim().parse().map_err(|_| {
            anyhow::anyhow!("PORT must be a number between 0 and 65535. Got: {}", self.port)
        })?;

        let store = match self.store_type.as_str() {
            "memory" => StoreConfig::Memory,
            "file" => {
                let path = match self.store_path.as_deref() {
                    Some(path) if !path.is_empty() => path.to_string(),
                    _ => anyhow::bail!(
                        "PHONEBOOK_STORE_PATH is required when PHONEBOOK_STORE_TYPE=file. \
                        Set it via: export PHONEBOOK_STORE_PATH=/var/lib/phonebook/contacts.json"
                    ),
                };
                let mut store = StoreConfig::file(path);
                if let Some(raw) = self.min_name_len.as_deref()
                    && let StoreConfig::File { min_name_len, .. } = &mut store
                {
                    let len: usize = raw.trim().parse().map_err(|_| {
                        anyhow::anyhow!("PHONEBOOK_MIN_NAME_LEN must be a number. Got: {}", raw)
                    })?;
                    *min_name_len = (len > 0).then_some(len);
                }
                store
            }
            other => anyhow::bail!(
                "PHONEBOOK_STORE_TYPE '{}' is not supported. \
                Supported types: memory, file",
                other
            ),
        };

        let rules = match self.unique_fields.as_deref() {
            None => None,
            Some(raw) => match raw.trim().to_lowercase().as_str() {
                "true" | "1" | "yes" => Some(DirectoryRules {
                    unique_fields: true,
                }),
                "false" | "0" | "no" => Some(DirectoryRules {
                    unique_fields: false,
                }),
                _ => anyhow::bail!(
                    "PHONEBOOK_UNIQUE_FIELDS must be true or false. Got: {}",
                    raw
                ),
            },
        };

        let mut server = ServerConfig {
            port,
            ..ServerConfig::default()
        };
        if let Some(raw) = self.allowed_origins.as_deref() {
            server.allowed_origins = raw
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        let config = PhonebookConfig {
            server,
            store,
            rules,
        };
        config.validate()?;
        Ok(config)
    }

    fn level(&self) -> Result<Level> {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Ok(Level::TRACE),
            "debug" => Ok(Level::DEBUG),
            "info" => Ok(Level::INFO),
            "warn" => Ok(Level::WARN),
            "error" => Ok(Level::ERROR),
            _ => anyhow::bail!(
                "PHONEBOOK_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }
    }
}

fn main() -> ExitCode {
    let raw = Config::from_env();

    let config = match raw.resolve() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return PhonebookExitCode::ConfigError.into();
        }
    };

    let log_level = match raw.level() {
        Ok(level) => level,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return PhonebookExitCode::ConfigError.into();
        }
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return PhonebookExitCode::ConfigError.into();
    }

    info!("Starting phonebookd");
    info!(
        "Configuration loaded: {} store, port {}",
        config.store.type_name(),
        config.server.port
    );

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return PhonebookExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run_daemon(config).await {
            error!("Daemon error: {}", e);
            PhonebookExitCode::RuntimeError
        } else {
            PhonebookExitCode::CleanShutdown
        }
    });

    result.into()
}

/// Run the daemon
async fn run_daemon(config: PhonebookConfig) -> Result<()> {
    let registry = StoreRegistry::with_builtin();
    let store = registry.create_store(&config.store).await?;

    let rules = config.effective_rules();
    info!(
        "Directory store: {} (duplicate guard {})",
        store.kind(),
        if rules.unique_fields { "on" } else { "off" }
    );

    let directory = Directory::new(store, rules);

    let firewall = OriginFirewall::new(config.server.allowed_origins.iter());
    let state = phonebook_http::AppState::new(directory, firewall);
    let directory = state.directory.clone();

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.server.port))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind port {}: {}", config.server.port, e))?;

    let shutdown = async {
        match wait_for_shutdown().await {
            Ok(signal) => info!("Received shutdown signal: {}", signal),
            Err(e) => error!("Shutdown error: {}", e),
        }
    };

    phonebook_http::serve(listener, state, shutdown).await?;

    info!("Shutting down daemon");
    directory.flush().await?;

    Ok(())
}

/// Wait for shutdown signals (SIGTERM, SIGINT)
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    let signal = tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    };
    Ok(signal)
}

/// Wait for shutdown signals (SIGINT only)
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {}", e))?;
    Ok("SIGINT")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(store_type: &str) -> Config {
        Config {
            port: "3002".to_string(),
            store_type: store_type.to_string(),
            store_path: None,
            min_name_len: None,
            unique_fields: None,
            allowed_origins: None,
            log_level: "info".to_string(),
        }
    }

    #[test]
    fn test_memory_defaults() {
        let config = raw("memory").resolve().unwrap();
        assert_eq!(config.server.port, 3002);
        assert_eq!(config.store, StoreConfig::Memory);
        assert!(config.effective_rules().unique_fields);
    }

    #[test]
    fn test_file_store_needs_path() {
        assert!(raw("file").resolve().is_err());

        let mut cfg = raw("file");
        cfg.store_path = Some("/tmp/contacts.json".to_string());
        cfg.min_name_len = Some("0".to_string());
        let config = cfg.resolve().unwrap();
        assert_eq!(
            config.store,
            StoreConfig::File {
                path: "/tmp/contacts.json".to_string(),
                min_name_len: None,
            }
        );
        assert!(!config.effective_rules().unique_fields);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(raw("mongo").resolve().is_err());

        let mut cfg = raw("memory");
        cfg.port = "http".to_string();
        assert!(cfg.resolve().is_err());

        let mut cfg = raw("memory");
        cfg.unique_fields = Some("maybe".to_string());
        assert!(cfg.resolve().is_err());

        let mut cfg = raw("memory");
        cfg.allowed_origins = Some("localhost:5173".to_string());
        assert!(cfg.resolve().is_err());

        let mut cfg = raw("memory");
        cfg.log_level = "verbose".to_string();
        assert!(cfg.level().is_err());
    }

    #[test]
    fn test_origin_list_parsing() {
        let mut cfg = raw("memory");
        cfg.allowed_origins = Some(" https://a.example , ,http://b.example".to_string());
        cfg.unique_fields = Some("false".to_string());
        let config = cfg.resolve().unwrap();
        assert_eq!(
            config.server.allowed_origins,
            vec!["https://a.example", "http://b.example"]
        );
        assert!(!config.effective_rules().unique_fields);
    }
}
