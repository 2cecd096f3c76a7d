//! Demo test-target service entry point.

use std::net::SocketAddr;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use demo_target::api::{create_router, AppState};
use demo_target::config::Config;
use demo_target::metrics;
use demo_target::smoke::{run_checks, PollConfig, TargetClient};
use demo_target::utils::{resolve_hostname, shutdown_signal};

/// Demo test-target HTTP service and smoke-test probe.
#[derive(Parser, Debug)]
#[command(name = "demo-target")]
#[command(about = "Demo HTTP service with health, info, and echo endpoints")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// HTTP listen port (overrides PORT).
    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the target service (default).
    Serve {
        /// HTTP listen port (overrides PORT).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Run the smoke-test suite against a running target.
    Smoke {
        /// Base URL of the target service.
        #[arg(long)]
        base_url: Option<String>,

        /// Seconds to wait for the target to become healthy.
        #[arg(long)]
        timeout: Option<u64>,

        /// Milliseconds between health polls.
        #[arg(long)]
        interval: Option<u64>,
    },

    /// Check configuration validity.
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("demo_target=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    // Handle subcommands
    match args.command {
        Some(Command::CheckConfig) => cmd_check_config().await,
        Some(Command::Smoke {
            base_url,
            timeout,
            interval,
        }) => cmd_smoke(base_url, timeout, interval).await,
        Some(Command::Serve { port }) => cmd_serve(port).await,
        None => cmd_serve(args.port).await,
    }
}

/// Check configuration validity.
async fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("DEMO TEST TARGET - CONFIGURATION CHECK");
    println!("======================================================================");

    // Load configuration
    print!("Loading configuration... ");
    let config = match Config::load() {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    // Validate configuration
    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    // Show configuration summary
    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Environment: {}", config.app_env);
    println!("  Port: {}", config.port);
    println!(
        "  Metrics: {}",
        if config.metrics_enabled {
            format!("enabled on port {}", config.metrics_port)
        } else {
            "disabled".to_string()
        }
    );
    println!("  Smoke Base URL: {}", config.smoke_base_url);
    println!("  Smoke Timeout: {}s", config.smoke_timeout_seconds);
    println!("  Smoke Interval: {}ms", config.smoke_interval_ms);
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Run the target service.
async fn cmd_serve(port_override: Option<u16>) -> anyhow::Result<()> {
    // Load configuration
    info!("Loading configuration...");
    let mut config = Config::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    // Override with CLI args if provided
    if let Some(port) = port_override {
        config.port = port;
    }

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
    }

    // Initialize metrics
    if config.metrics_enabled {
        metrics::install_recorder(config.metrics_port)?;
    } else {
        metrics::init_metrics();
    }

    let host = resolve_hostname();

    info!("Configuration loaded successfully");
    info!("Environment: {}", config.app_env);
    info!("Host: {}", host);

    // Create app state and router
    let app_state = AppState::new(host, config.app_env.clone());
    let router = create_router(app_state);

    // Start HTTP server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");

    Ok(())
}

/// Run the smoke-test suite against a running target.
async fn cmd_smoke(
    base_url: Option<String>,
    timeout: Option<u64>,
    interval: Option<u64>,
) -> anyhow::Result<()> {
    // Load configuration, then apply CLI overrides
    let mut config = Config::load()?;

    if let Some(base_url) = base_url {
        config.smoke_base_url = base_url;
    }
    if let Some(timeout) = timeout {
        config.smoke_timeout_seconds = timeout;
    }
    if let Some(interval) = interval {
        config.smoke_interval_ms = interval;
    }

    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    metrics::init_metrics();

    println!("======================================================================");
    println!("DEMO TEST TARGET - SMOKE TEST");
    println!("======================================================================");
    println!("Target: {}", config.smoke_base_url);
    println!(
        "Deadline: {}s, poll interval: {}ms",
        config.smoke_timeout_seconds, config.smoke_interval_ms
    );
    println!("----------------------------------------------------------------------");

    let client = TargetClient::new(
        &config.smoke_base_url,
        Duration::from_millis(config.http_timeout_ms),
    )?;
    let poll = PollConfig::from_config(&config);

    print!("Waiting for target to become healthy... ");
    let report = match run_checks(&client, &poll).await {
        Ok(report) => {
            println!("OK");
            report
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Target never became healthy"));
        }
    };

    println!("----------------------------------------------------------------------");
    for check in &report.checks {
        match &check.detail {
            None => println!("  {:<8} PASS", check.name),
            Some(detail) => println!("  {:<8} FAIL  {}", check.name, detail),
        }
    }

    println!("----------------------------------------------------------------------");
    println!(
        "{} passed, {} failed",
        report.passed_count(),
        report.failed_count()
    );

    if report.all_passed() {
        println!("======================================================================");
        println!("SMOKE TEST PASSED");
        println!("======================================================================");
        Ok(())
    } else {
        println!("======================================================================");
        println!("SMOKE TEST FAILED");
        println!("======================================================================");
        Err(anyhow::anyhow!(
            "{} smoke check(s) failed",
            report.failed_count()
        ))
    }
}
