//! jobtrail-server

use anyhow::{anyhow, Result};
use axum::{body::Body, headers::HeaderName, Router};
use axum_server::Handle;
use clap::Parser;
use http::{header, Request};
use jobtrail_server::{
    app_state::{AppState, AppStateBuilder},
    db,
    docs::ApiDoc,
    middleware::{request_ulid::MakeRequestUlid, runtime},
    router,
    settings::{AppEnvironment, Settings},
    setups::{
        local::{LocalSetup, MemoryRecordStore, MemorySessions},
        prod::{PgRecordStore, PgSessions, ProdSetup},
        ServerSetup,
    },
};
use std::{
    io,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
    process::exit,
};
use tokio::signal::{
    self,
    unix::{signal, SignalKind},
};
use tokio_util::sync::CancellationToken;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer, sensitive_headers::SetSensitiveHeadersLayer,
    timeout::TimeoutLayer, trace::TraceLayer, ServiceBuilderExt,
};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Request identifier field.
const REQUEST_ID: &str = "x-request-id";

/// Track your job applications
#[derive(Debug, Parser)]
#[command(name = "jobtrail-server", version, about)]
struct Cli {
    /// Settings file to load instead of the bundled config/settings.toml
    #[arg(long)]
    config_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (stdout_writer, _stdout_guard) = tracing_appender::non_blocking(io::stdout());

    let settings = Settings::load(cli.config_path)?;

    setup_tracing(stdout_writer, settings.server.environment)?;

    info!(
        subject = "app_settings",
        category = "init",
        "starting with settings: {:?}",
        settings,
    );

    let cancellation_token = CancellationToken::new();

    tokio::spawn({
        let cancellation_token = cancellation_token.clone();
        async move {
            capture_sigterm().await;

            cancellation_token.cancel();
            println!("\nCtrl+C received, shutting down. Press Ctrl+C again to force shutdown.");

            capture_sigterm().await;

            exit(130)
        }
    });

    match settings.server.environment {
        AppEnvironment::Local => {
            let sessions = MemorySessions::from_pairs(&settings.local.sessions)?;
            info!(sessions = sessions.len(), "Using in-memory record store");

            let app_state = AppStateBuilder::<LocalSetup>::default()
                .with_record_store(MemoryRecordStore::default())
                .with_authenticator(sessions)
                .finalize()?;

            serve_app(app_state, &settings, cancellation_token).await
        }
        _ => {
            db::migrations::run(&settings.database.url).await?;

            let db_pool = db::pool(
                &settings.database.url,
                settings.database.connect_timeout,
            )
            .await?;

            let app_state = AppStateBuilder::<ProdSetup>::default()
                .with_record_store(PgRecordStore::new(db_pool.clone()))
                .with_authenticator(PgSessions::new(db_pool))
                .finalize()?;

            serve_app(app_state, &settings, cancellation_token).await
        }
    }
}

async fn serve_app<S: ServerSetup>(
    app_state: AppState<S>,
    settings: &Settings,
    token: CancellationToken,
) -> Result<()> {
    let req_id = HeaderName::from_static(REQUEST_ID);

    let router = router::setup_app_router(app_state)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or_default();

                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id,
                )
            }),
        )
        // Set and propagate "x-request-id" (as a ulid) per request.
        .layer(
            ServiceBuilder::new()
                .set_request_id(req_id.clone(), MakeRequestUlid)
                .propagate_request_id(req_id),
        )
        // Applies the `tower_http::timeout::Timeout` middleware which
        // applies a timeout to requests.
        .layer(TimeoutLayer::new(settings.server.timeout()))
        // Catches runtime panics and converts them into
        // `500 Internal Server` responses.
        .layer(CatchPanicLayer::custom(runtime::catch_panic))
        // Mark headers as sensitive on both requests and responses.
        .layer(SetSensitiveHeadersLayer::new([header::AUTHORIZATION]))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()));

    let server = serve("Application", router, settings.server.port).await?;

    token.cancelled().await;
    server.graceful_shutdown(None);

    Ok(())
}

async fn serve(name: &str, app: Router, port: u16) -> Result<Handle> {
    let bind_addr: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port);

    let handle = Handle::new();

    tokio::spawn({
        let handle = handle.clone();
        async move {
            if let Err(err) = axum_server::bind(bind_addr)
                .handle(handle)
                .serve(app.into_make_service())
                .await
            {
                tracing::error!(?err, "Server stopped with an error");
            }
        }
    });

    let addr = handle
        .listening()
        .await
        .ok_or_else(|| anyhow!("{name} server failed to bind to {bind_addr}"))?;

    info!(
        subject = "app_start",
        category = "init",
        "{} server listening on {}",
        name,
        addr
    );

    Ok(handle)
}

/// Captures and waits for system signals.
async fn capture_sigterm() {
    let term = async {
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(?err, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await
            }
        }
    };

    tokio::select! {
        _ = signal::ctrl_c() => {},
        _ = term => {}
    };
}

/// Setup [tracing][tracing] output: human-readable locally, JSON lines
/// everywhere else.
fn setup_tracing(
    writer: tracing_appender::non_blocking::NonBlocking,
    environment: AppEnvironment,
) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("jobtrail_server=info,jobtrail_core=info,tower_http=info")
    });

    let registry = tracing_subscriber::registry().with(filter);

    match environment {
        AppEnvironment::Local => registry
            .with(fmt::layer().with_writer(writer).with_target(true))
            .try_init()?,
        _ => registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_writer(writer),
            )
            .try_init()?,
    }

    Ok(())
}
