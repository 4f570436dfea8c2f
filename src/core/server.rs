use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::{middleware::from_fn_with_state, Router};
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::core::config::Config;
use crate::core::middleware;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::features::health;
use crate::features::kpis::{routes as kpis_routes, KpiService};
use crate::features::reports::{routes as reports_routes, ReportService};
use crate::features::restrooms::{routes as restrooms_routes, RestroomService};
use crate::modules::storage::{LocalPhotoStorage, UPLOADS_URL_PREFIX};
use crate::modules::store::ReportStore;
use crate::shared::timezone::TimeZoneResolver;

/// Services shared by every route, all backed by the same report store
#[derive(Clone)]
pub struct AppServices {
    pub store: Arc<dyn ReportStore>,
    pub restrooms: Arc<RestroomService>,
    pub reports: Arc<ReportService>,
    pub kpis: Arc<KpiService>,
    pub photos: Arc<LocalPhotoStorage>,
}

impl AppServices {
    pub fn new(
        store: Arc<dyn ReportStore>,
        resolver: TimeZoneResolver,
        photos: Arc<LocalPhotoStorage>,
        qr_base_url: &str,
    ) -> Self {
        Self {
            restrooms: Arc::new(RestroomService::new(Arc::clone(&store), qr_base_url)),
            reports: Arc::new(ReportService::new(Arc::clone(&store), resolver.clone())),
            kpis: Arc::new(KpiService::new(Arc::clone(&store), resolver)),
            photos,
            store,
        }
    }
}

fn swagger_router(config: &Config) -> Router {
    let mut openapi = ApiDoc::openapi();
    SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    }
    .modify(&mut openapi);

    let swagger =
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi));

    match config.swagger.credentials() {
        Some(credentials) => {
            tracing::info!("Swagger UI basic auth enabled");
            swagger.layer(from_fn_with_state(
                Arc::new(middleware::BasicAuth::new(credentials, "Swagger UI")),
                middleware::basic_auth,
            ))
        }
        None => {
            tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
            swagger
        }
    }
}

/// Full application router with the HTTP layers applied
pub fn build_router(config: &Config, services: &AppServices) -> Router {
    Router::new()
        .merge(swagger_router(config))
        .merge(reports_routes::routes(
            Arc::clone(&services.reports),
            Arc::clone(&services.photos),
        ))
        .merge(kpis_routes::routes(Arc::clone(&services.kpis)))
        .merge(restrooms_routes::routes(
            Arc::clone(&services.restrooms),
            config.admin.credentials(),
        ))
        .merge(health::routes(Arc::clone(&services.store)))
        .nest_service(UPLOADS_URL_PREFIX, ServeDir::new(services.photos.folder()))
        .layer(DefaultBodyLimit::max(config.app.max_request_body_size))
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid))
}

/// TCP listener tuned through socket2
pub fn bind_listener(addr: &str) -> anyhow::Result<tokio::net::TcpListener> {
    let socket_addr: SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address {}: {}", addr, e))?;

    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    socket.set_nodelay(true)?;
    socket.set_tcp_keepalive(&socket2::TcpKeepalive::new().with_time(Duration::from_secs(60)))?;
    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;

    Ok(tokio::net::TcpListener::from_std(socket.into())?)
}

/// Resolves on Ctrl+C or SIGTERM so in-flight requests can drain
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    tracing::info!("Shutdown signal received");
}
