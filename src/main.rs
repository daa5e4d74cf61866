use clap::Parser;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{info, warn};

use scim_provisioning::config::{AppConfig, AuthType};
use scim_provisioning::startup;

#[derive(Parser, Debug)]
#[command(name = "scim-provisioning")]
#[command(about = "SCIM 2.0 User and Group provisioning endpoint")]
struct Args {
    /// Configuration file path (default: config.yaml)
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Port to listen on (overrides config file)
    #[arg(short, long)]
    port: Option<u16>,

    /// Host to bind to (overrides config file)
    #[arg(long)]
    host: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt::init();

    let mut app_config =
        if args.config == "config.yaml" && !std::path::Path::new("config.yaml").exists() {
            warn!("no config.yaml found; using in-memory SQLite with anonymous access at /scim/v2");
            AppConfig::default_config()
        } else {
            AppConfig::load_from_file(&args.config)?
        };

    if let Some(port) = args.port {
        app_config.server.port = port;
    }
    if let Some(host) = args.host {
        app_config.server.host = host;
    }

    let host: std::net::IpAddr = app_config.server.host.parse().unwrap_or_else(|_| {
        warn!(host = %app_config.server.host, "invalid host address, using 127.0.0.1");
        [127, 0, 0, 1].into()
    });
    let addr = SocketAddr::from((host, app_config.server.port));
    let base_path = app_config.base_path()?;

    match app_config.scim.auth.auth_type {
        AuthType::Bearer => info!("authentication: bearer token"),
        AuthType::Basic => info!(
            user = app_config.scim.auth.basic.as_ref().map(|b| b.username.as_str()).unwrap_or("-"),
            "authentication: HTTP basic"
        ),
        AuthType::Unauthenticated => warn!("authentication disabled"),
    }

    let app = startup::build_app(app_config).await?;

    info!(%addr, users = %format!("{}/Users", base_path), groups = %format!("{}/Groups", base_path), "SCIM provisioning listening");
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
