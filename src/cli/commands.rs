//! CLI command implementations
//!
//! `serve` boots in a fixed order: config, schema, store, HTTP listener.
//! Any step failing aborts startup before the port is bound.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::http_server::{AppState, HttpServer, HttpServerConfig};
use crate::observability::{Event, Logger, ObservationScope, Severity};
use crate::schema::{FormSchema, FormValidator, SchemaLoader};
use crate::submissions::{FileSubmissionStore, MemorySubmissionStore, SubmissionRepository};

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{read_payload, write_json};

/// Where submissions are kept
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// Lost on exit
    #[default]
    Memory,
    /// Mirrored to `data_file`
    File,
}

/// Configuration file structure. Every key is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// host, port, cors_origins, max_page_limit
    #[serde(flatten)]
    pub http: HttpServerConfig,

    /// Form schema file; the built-in schema when absent
    #[serde(default)]
    pub schema_path: Option<PathBuf>,

    #[serde(default)]
    pub storage: StorageKind,

    /// Backing file for `storage: "file"`
    #[serde(default = "default_data_file")]
    pub data_file: Option<PathBuf>,

    /// Minimum log severity written (default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_data_file() -> Option<PathBuf> {
    Some(PathBuf::from("./submissions.json"))
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http: HttpServerConfig::default(),
            schema_path: None,
            storage: StorageKind::default(),
            data_file: default_data_file(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        Self::parse(&content)
    }

    /// Parse and validate configuration JSON
    pub fn parse(content: &str) -> CliResult<Self> {
        let config: Config = serde_json::from_str(content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.storage == StorageKind::File && self.data_file.is_none() {
            return Err(CliError::config_error(
                "data_file is required when storage is 'file'",
            ));
        }

        if self.http.max_page_limit == 0 {
            return Err(CliError::config_error("max_page_limit must be > 0"));
        }

        self.severity()?;

        Ok(())
    }

    /// Parsed `log_level`
    pub fn severity(&self) -> CliResult<Severity> {
        self.log_level
            .parse::<Severity>()
            .map_err(CliError::config_error)
    }

    fn schema_loader(&self) -> SchemaLoader {
        SchemaLoader::new(self.schema_path.clone())
    }

    /// Open the configured submission store
    pub fn open_store(&self) -> CliResult<Arc<dyn SubmissionRepository>> {
        match (self.storage, &self.data_file) {
            (StorageKind::Memory, _) => Ok(Arc::new(MemorySubmissionStore::new())),
            (StorageKind::File, Some(path)) => Ok(Arc::new(FileSubmissionStore::open(path)?)),
            (StorageKind::File, None) => Err(CliError::config_error(
                "data_file is required when storage is 'file'",
            )),
        }
    }
}

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run a parsed command
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config, port } => serve(config.as_deref(), port),
        Command::Validate { schema, input } => validate(schema, input.as_deref()),
        Command::CheckSchema { schema, output } => check_schema(schema, output.as_deref()),
    }
}

/// Boot the HTTP API and serve until interrupted
pub fn serve(config_path: Option<&Path>, port: Option<u16>) -> CliResult<()> {
    let mut config = match config_path {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(port) = port {
        config.http.port = port;
    }
    Logger::set_min_severity(config.severity()?);

    Logger::event(Event::ConfigLoaded)
        .field(
            "path",
            config_path
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<defaults>".to_string()),
        )
        .field("port", config.http.port)
        .emit();

    let schema = load_schema(&config.schema_loader())?;

    let scope = ObservationScope::new("STORE_OPEN").field(
        "storage",
        match config.storage {
            StorageKind::Memory => "memory",
            StorageKind::File => "file",
        },
    );
    let repository = match config.open_store() {
        Ok(repository) => repository,
        Err(e) => {
            scope.fail(&e);
            return Err(e);
        }
    };
    let existing = repository.count()?;
    scope.complete();
    Logger::event(Event::StoreOpened)
        .field("submissions", existing)
        .emit();

    let state = AppState::new(FormValidator::new(Arc::new(schema)), repository);
    state.metrics.set_submissions(existing as u64);
    let server = HttpServer::new(config.http.clone(), state);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server error: {}", e)))
    })
}

/// Validate one payload, print the result, and fail when it is invalid
pub fn validate(schema_path: Option<PathBuf>, input: Option<&Path>) -> CliResult<()> {
    let schema = SchemaLoader::new(schema_path).load()?;
    let payload = read_payload(input)?;

    let result = FormValidator::new(Arc::new(schema)).validate(&payload);
    write_json(&result)?;

    if result.is_valid {
        Ok(())
    } else {
        Err(CliError::validation_failed(result.errors.len()))
    }
}

/// Load and integrity-check a schema, printing it in wire form
pub fn check_schema(schema_path: Option<PathBuf>, output: Option<&Path>) -> CliResult<()> {
    let schema = SchemaLoader::new(schema_path).load()?;
    write_json(&schema)?;

    if let Some(path) = output {
        SchemaLoader::save_schema(&schema, path)?;
    }
    Ok(())
}

fn load_schema(loader: &SchemaLoader) -> CliResult<FormSchema> {
    let scope = ObservationScope::new("SCHEMA_LOAD").field("source", loader.source_name());
    match loader.load() {
        Ok(schema) => {
            scope.complete();
            Logger::event(Event::SchemaLoaded)
                .field("name", &schema.name)
                .field("fields", schema.fields.len())
                .emit();
            Ok(schema)
        }
        Err(e) => {
            scope.fail(&e);
            Logger::event(Event::SchemaLoadFailed)
                .field("code", e.code())
                .field("source", loader.source_name())
                .emit();
            Err(e.into())
        }
    }
}
