use anyhow::{anyhow, Context, Result};
use authz_data::{AuthzDataConfig, AuthzDataModule, MODULE_NAME};
use clap::{Parser, Subcommand};
use keyset_db::{ConnectOpts, DbHandle};
use mimalloc::MiMalloc;
use runtime::{AppConfig, CliArgs, DatabaseConfig};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

mod http;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Expand a sqlite DSN into an absolute-path DSN using a base directory.
/// In-memory DSNs are returned unchanged.
fn absolutize_sqlite_dsn(dsn: &str, base_dir: &Path) -> Result<String> {
    if dsn.contains(":memory:") || dsn.contains("mode=memory") {
        return Ok(dsn.to_string());
    }
    let db_path = dsn
        .strip_prefix("sqlite://")
        .or_else(|| dsn.strip_prefix("sqlite:"))
        .ok_or_else(|| anyhow!("DSN must start with sqlite: (got: {})", dsn))?;

    let (path_str, query) = match db_path.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (db_path, None),
    };

    let mut p = PathBuf::from(path_str);
    if p.as_os_str().is_empty() {
        return Err(anyhow!("Empty SQLite path in DSN"));
    }
    if p.is_relative() {
        p = base_dir.join(p);
    }

    let mut out = String::from("sqlite://");
    out.push_str(&p.to_string_lossy().replace('\\', "/"));
    if let Some(q) = query {
        out.push('?');
        out.push_str(q);
    }
    Ok(out)
}

/// Warden - authorization data service
#[derive(Parser)]
#[command(name = "warden-server")]
#[command(about = "Warden - users, tenants, roles and permissions over HTTP")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
    /// Apply database migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
    };

    // home_dir is normalized and created while loading
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    if args.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    let logging_config = config.logging.clone().unwrap_or_default();
    runtime::init_logging_from_config(&logging_config, Path::new(&config.server.home_dir));
    tracing::info!("Warden server starting");

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config).await,
        Commands::Check => check_config(config),
        Commands::Migrate => migrate(config).await,
    }
}

fn database_config(config: &AppConfig) -> Result<&DatabaseConfig> {
    let db = config
        .database
        .as_ref()
        .context("database section is not configured")?;
    if db.url.trim().is_empty() {
        return Err(anyhow!("Database URL not configured"));
    }
    Ok(db)
}

fn final_dsn(config: &AppConfig) -> Result<String> {
    let raw = database_config(config)?.url.trim().to_owned();
    if raw.starts_with("sqlite:") {
        absolutize_sqlite_dsn(&raw, Path::new(&config.server.home_dir))
    } else {
        Ok(raw)
    }
}

async fn connect(config: &AppConfig) -> Result<DbHandle> {
    let db_config = database_config(config)?;
    let defaults = ConnectOpts::default();
    let opts = ConnectOpts {
        max_conns: db_config.max_conns.or(defaults.max_conns),
        acquire_timeout: db_config.acquire_timeout.or(defaults.acquire_timeout),
        ..defaults
    };
    let dsn = final_dsn(config)?;
    let db = DbHandle::connect(&dsn, opts)
        .await
        .context("database connection failed")?;
    tracing::info!(engine = ?db.engine(), "connected");
    Ok(db)
}

fn module_config(config: &AppConfig) -> Result<AuthzDataConfig> {
    let cfg: AuthzDataConfig = config.module_config(MODULE_NAME)?;
    cfg.validate()?;
    Ok(cfg)
}

async fn run_server(config: AppConfig) -> Result<()> {
    let module_cfg = module_config(&config)?;
    let db = connect(&config).await?;
    AuthzDataModule::migrate(db.seaorm()).await?;

    let module = AuthzDataModule::new(db.sea(), &module_cfg)?;
    let router = http::build_router(module.router(), config.server.request_timeout);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| format!("invalid bind address {}", config.server.host))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("HTTP server bound on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow!(e))?;

    db.close().await?;
    tracing::info!("Warden server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("HTTP server shutting down gracefully");
}

fn check_config(config: AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");

    let dsn = final_dsn(&config)?;
    let engine = DbHandle::detect(&dsn)?;
    module_config(&config)?;
    if config.server.request_timeout == Duration::ZERO {
        return Err(anyhow!("server.request_timeout must be positive"));
    }

    tracing::info!(engine = ?engine, "Configuration is valid");
    println!("Configuration check passed");
    println!("{}", config.to_yaml()?);
    Ok(())
}

async fn migrate(config: AppConfig) -> Result<()> {
    let db = connect(&config).await?;
    AuthzDataModule::migrate(db.seaorm()).await?;
    db.close().await?;
    println!("Migrations applied");
    Ok(())
}
