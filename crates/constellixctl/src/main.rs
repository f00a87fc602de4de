// # constellixctl - Constellix resource CLI
//
// Thin host over the resource adapters. It is responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing tracing and the runtime
// 3. Registering record kinds
// 4. Running one lifecycle operation and persisting the resulting state
//
// All record logic lives in constellix-core and constellix-resources.
//
// ## Configuration
//
// ### API
// - `CONSTELLIX_API_KEY`: API key (required for every operation)
// - `CONSTELLIX_SECRET_KEY`: Secret key (required for every operation)
// - `CONSTELLIX_BASE_URL`: API endpoint (default https://api.dns.constellix.com)
// - `CONSTELLIX_TIMEOUT_SECS`: Request timeout (default 30)
// - `CONSTELLIX_MODE`: `live` (default) or `dry-run`
//
// ### State
// - `CONSTELLIX_STATE_PATH`: Path to the state file (default ./constellix-state.json)
//
// ### Logging
// - `CONSTELLIX_LOG_LEVEL`: trace, debug, info, warn, error (default info)
//
// ## Example
//
// ```bash
// export CONSTELLIX_API_KEY=...
// export CONSTELLIX_SECRET_KEY=...
//
// constellixctl create constellix_srv_record sip --config sip.json
// constellixctl read constellix_srv_record sip
// constellixctl import constellix_mx_record mail domains:555:42
// constellixctl delete constellix_srv_record sip
// ```

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use constellix_client::ConstellixClient;
use constellix_core::config::{ClientConfig, DEFAULT_BASE_URL};
use constellix_core::traits::{StateDocument, StateStore};
use constellix_core::{FileStateStore, ResourceRegistry};
use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Default location of the state file
const DEFAULT_STATE_PATH: &str = "constellix-state.json";

/// Exit codes for different termination scenarios
///
/// - 0: Operation succeeded
/// - 1: Configuration or startup error
/// - 2: Operation failed
#[derive(Debug, Clone, Copy)]
enum CtlExitCode {
    /// Operation completed
    Success = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// The lifecycle operation failed
    OperationError = 2,
}

impl From<CtlExitCode> for ExitCode {
    fn from(code: CtlExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, rename_all = "kebab-case")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
#[command(rename_all = "kebab-case")]
enum Command {
    /// Create the remote record and store its state
    Create(Target),
    /// Refresh stored state from the remote record
    Read(Target),
    /// Push stored (or given) attributes to the remote record
    Update(Target),
    /// Delete the remote record and forget its state
    Delete(Target),
    /// Adopt an existing remote record
    Import {
        /// Resource type (see list-types)
        resource_type: String,
        /// Local name of the resource
        name: String,
        /// `recordId` for pools, `sourceType:domainId:recordId` otherwise
        key: String,
    },
    /// List the supported resource types
    ListTypes,
}

#[derive(clap::Args, Debug)]
struct Target {
    /// Resource type (see list-types)
    resource_type: String,
    /// Local name of the resource
    name: String,
    /// JSON file with the resource attributes
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Application configuration
struct Config {
    api_key: String,
    secret_key: String,
    base_url: String,
    timeout_secs: u64,
    mode: String,
    state_path: PathBuf,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        let timeout_secs = match env::var("CONSTELLIX_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("CONSTELLIX_TIMEOUT_SECS is not a number: {}", raw))?,
            Err(_) => 30,
        };

        Ok(Self {
            api_key: env::var("CONSTELLIX_API_KEY").unwrap_or_default(),
            secret_key: env::var("CONSTELLIX_SECRET_KEY").unwrap_or_default(),
            base_url: env::var("CONSTELLIX_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            timeout_secs,
            mode: env::var("CONSTELLIX_MODE").unwrap_or_else(|_| "live".to_string()),
            state_path: env::var("CONSTELLIX_STATE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_STATE_PATH)),
            log_level: env::var("CONSTELLIX_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Validate the configuration
    ///
    /// Credentials are checked when the API client is built, so commands
    /// that never talk to the API run without them.
    fn validate(&self) -> Result<()> {
        match self.mode.to_lowercase().as_str() {
            "live" | "dry-run" => {}
            _ => bail!(
                "CONSTELLIX_MODE '{}' is not valid. Valid modes: live, dry-run",
                self.mode
            ),
        }

        if !(1..=300).contains(&self.timeout_secs) {
            bail!(
                "CONSTELLIX_TIMEOUT_SECS must be between 1 and 300 seconds. Got: {}",
                self.timeout_secs
            );
        }

        if self.state_path.as_os_str().is_empty() {
            bail!("CONSTELLIX_STATE_PATH cannot be empty");
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => bail!(
                "CONSTELLIX_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        Ok(())
    }

    fn dry_run(&self) -> bool {
        self.mode.eq_ignore_ascii_case("dry-run")
    }

    /// Build the API client configuration
    fn client_config(&self) -> ClientConfig {
        ClientConfig::new(self.api_key.clone(), self.secret_key.clone())
            .with_base_url(self.base_url.clone())
            .with_timeout_secs(self.timeout_secs)
            .with_dry_run(self.dry_run())
    }

    fn log_level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return CtlExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {:#}", e);
        return CtlExitCode::ConfigError.into();
    }

    // Logs go to stderr, resource state to stdout
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level())
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return CtlExitCode::ConfigError.into();
    }

    let registry = ResourceRegistry::new();
    constellix_resources::register(&registry);

    if let Command::ListTypes = cli.command {
        for name in registry.list_resources() {
            println!("{}", name);
        }
        return CtlExitCode::Success.into();
    }

    let client = match ConstellixClient::new(&config.client_config()) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create Constellix client: {}", e);
            return CtlExitCode::ConfigError.into();
        }
    };

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return CtlExitCode::OperationError.into();
        }
    };

    rt.block_on(async {
        match run(cli.command, &config, &registry, Arc::new(client)).await {
            Ok(()) => CtlExitCode::Success,
            Err(e) => {
                error!("{:#}", e);
                CtlExitCode::OperationError
            }
        }
    })
    .into()
}

/// Run one lifecycle operation
async fn run(
    command: Command,
    config: &Config,
    registry: &ResourceRegistry,
    client: Arc<ConstellixClient>,
) -> Result<()> {
    let store = FileStateStore::new(&config.state_path).await?;

    match command {
        Command::Create(target) => {
            let resource = registry.create_resource(&target.resource_type, client)?;
            let address = address(&target.resource_type, &target.name);

            if let Some(existing) = store.get(&address).await?
                && existing.is_present()
            {
                bail!(
                    "{} already exists as record {}; use update instead",
                    address,
                    existing.id
                );
            }

            let path = target
                .config
                .as_deref()
                .context("--config is required for create")?;
            let mut document = StateDocument::new(&target.resource_type, load_attributes(path)?);

            let outcome = resource.create(&mut document).await;
            if document.is_present() {
                store.put(&address, &document).await?;
            }
            outcome?;
            info!("{} created as record {}", address, document.id);
            print_document(&document)
        }
        Command::Read(target) => {
            let resource = registry.create_resource(&target.resource_type, client)?;
            let address = address(&target.resource_type, &target.name);
            let mut document = stored(&store, &address).await?;

            resource.read(&mut document).await?;
            if document.is_present() {
                store.put(&address, &document).await?;
                print_document(&document)
            } else {
                warn!("{} no longer exists remotely; forgetting it", address);
                store.remove(&address).await?;
                Ok(())
            }
        }
        Command::Update(target) => {
            let resource = registry.create_resource(&target.resource_type, client)?;
            let address = address(&target.resource_type, &target.name);
            let mut document = stored(&store, &address).await?;

            if let Some(path) = target.config.as_deref() {
                document.attributes = load_attributes(path)?;
            }

            resource.update(&mut document).await?;
            store.put(&address, &document).await?;
            print_document(&document)
        }
        Command::Delete(target) => {
            let resource = registry.create_resource(&target.resource_type, client)?;
            let address = address(&target.resource_type, &target.name);
            let mut document = stored(&store, &address).await?;

            resource.delete(&mut document).await?;
            store.remove(&address).await?;
            info!("{} deleted", address);
            Ok(())
        }
        Command::Import {
            resource_type,
            name,
            key,
        } => {
            let resource = registry.create_resource(&resource_type, client)?;
            let address = address(&resource_type, &name);

            let document = resource.import(&key).await?;
            store.put(&address, &document).await?;
            info!("{} imported from {}", address, key);
            print_document(&document)
        }
        Command::ListTypes => Ok(()),
    }
}

/// State address of a named resource
fn address(resource_type: &str, name: &str) -> String {
    format!("{}.{}", resource_type, name)
}

async fn stored(store: &FileStateStore, address: &str) -> Result<StateDocument> {
    store
        .get(address)
        .await?
        .with_context(|| format!("{} is not in the state file; create or import it first", address))
}

fn load_attributes(path: &Path) -> Result<serde_json::Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let attributes: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;
    if !attributes.is_object() {
        bail!("{} must contain a JSON object", path.display());
    }
    Ok(attributes)
}

fn print_document(document: &StateDocument) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(document)?);
    Ok(())
}
