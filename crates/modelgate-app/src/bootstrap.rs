//! Environment loading and service wiring for the modelgate binary.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use modelgate_api::{AdminAuth, ApiServer};
use modelgate_config::ConfigService;
use modelgate_telemetry::{LoggingConfig, Metrics, init_logging};
use modelgate_upstream::{DEFAULT_COMPLETIONS_URL, OpenRouterClient};
use tracing::{info, warn};

use crate::error::{AppError, AppResult};

/// Port used when neither `MODELGATE_HTTP_PORT` nor `PORT` is set.
const DEFAULT_HTTP_PORT: u16 = 8000;

/// Dependencies required to bootstrap the modelgate application.
pub(crate) struct BootstrapDependencies {
    logging: LoggingConfig<'static>,
    config: ConfigService,
    auth: AdminAuth,
    telemetry: Metrics,
    upstream_endpoint: String,
    upstream_api_key: Option<String>,
    bind_addr: SocketAddr,
}

impl BootstrapDependencies {
    /// Construct production dependencies from the environment.
    pub(crate) async fn from_env() -> AppResult<Self> {
        let logging = LoggingConfig::default();

        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| AppError::MissingEnv {
                name: "DATABASE_URL",
            })?;
        let config = ConfigService::new(database_url)
            .await
            .map_err(|err| AppError::config("config_service.new", &err))?;

        let auth = AdminAuth::new(std::env::var("ADMIN_TOKEN").ok());
        let upstream_api_key = std::env::var("OPENROUTER_API_KEY")
            .ok()
            .filter(|key| !key.is_empty());
        let upstream_endpoint = std::env::var("OPENROUTER_BASE_URL")
            .ok()
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_COMPLETIONS_URL.to_string());

        let port = http_port(
            std::env::var("MODELGATE_HTTP_PORT")
                .or_else(|_| std::env::var("PORT"))
                .ok(),
        )?;
        let bind_addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port);

        let telemetry =
            Metrics::new().map_err(|err| AppError::telemetry("telemetry.metrics", err))?;

        Ok(Self {
            logging,
            config,
            auth,
            telemetry,
            upstream_endpoint,
            upstream_api_key,
            bind_addr,
        })
    }
}

/// Entry point for the modelgate application boot sequence.
///
/// # Errors
///
/// Returns an error if dependency construction or application startup fails.
pub async fn run_app() -> AppResult<()> {
    let dependencies = BootstrapDependencies::from_env().await?;
    run_app_with(dependencies).await
}

/// Boot sequence that relies entirely on injected dependencies.
pub(crate) async fn run_app_with(dependencies: BootstrapDependencies) -> AppResult<()> {
    init_logging(&dependencies.logging)
        .map_err(|err| AppError::telemetry("telemetry.init", err))?;

    info!("modelgate application bootstrap starting");

    let BootstrapDependencies {
        logging: _,
        config,
        auth,
        telemetry,
        upstream_endpoint,
        upstream_api_key,
        bind_addr,
    } = dependencies;

    if auth.is_open() {
        warn!("ADMIN_TOKEN is not configured; configuration mutations are ungated");
    }
    if upstream_api_key.is_none() {
        warn!("OPENROUTER_API_KEY is not configured; completion calls will be rejected upstream");
    }

    let completion = OpenRouterClient::new(upstream_endpoint, upstream_api_key)
        .map_err(|err| AppError::upstream("upstream_client.new", err))?;

    let server = ApiServer::new(Arc::new(config), Arc::new(completion), auth, telemetry);

    server
        .serve(bind_addr)
        .await
        .map_err(|err| AppError::api_server("api.serve", err))
}

fn http_port(raw: Option<String>) -> AppResult<u16> {
    match raw {
        None => Ok(DEFAULT_HTTP_PORT),
        Some(raw) => match raw.parse::<u16>() {
            Ok(port) if port > 0 => Ok(port),
            _ => Err(AppError::InvalidConfig {
                field: "PORT",
                reason: "must be a TCP port between 1 and 65535",
                value: Some(raw),
            }),
        },
    }
}
