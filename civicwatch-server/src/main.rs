use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod config;
mod events;
mod feed;
mod models;
mod routes;
mod seed;
mod services;
mod store;

use config::AppConfig;
use events::EventBus;
use models::Champion;
use services::{NotificationService, ProjectService, ReportService};
use store::FileStore;

pub struct AppState {
    pub bus: EventBus,
    pub notifications: Arc<NotificationService>,
    pub projects: Arc<ProjectService>,
    pub reports: ReportService,
    pub champions: Vec<Champion>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    civicwatch_shared::middleware::init_tracing("civicwatch-server");

    let config = AppConfig::load()?;
    let port = config.port;

    // Set JWT_SECRET env var for the auth extractor middleware
    std::env::set_var("JWT_SECRET", &config.jwt_secret);

    let bus = EventBus::with_capacity(config.bus_capacity);
    let store = FileStore::open(&config.data_dir)?;
    let notifications = Arc::new(NotificationService::new(store, bus.clone()));
    let projects = Arc::new(ProjectService::new(seed::projects()));
    let reports = ReportService::new(notifications.clone(), projects.clone());
    let champions = seed::champions();

    // Trace every event published on the bus.
    tokio::spawn(events::log_events(bus.clone()));

    let state = Arc::new(AppState {
        bus,
        notifications,
        projects,
        reports,
        champions,
    });

    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        .route(
            "/notifications",
            get(routes::notifications::list_notifications)
                .post(routes::notifications::create_notification)
                .delete(routes::notifications::clear_notifications),
        )
        .route("/notifications/unread-count", get(routes::notifications::unread_count))
        .route("/notifications/:id/read", post(routes::notifications::mark_read))
        .route(
            "/notifications/subscription",
            put(routes::subscriptions::put_subscription).get(routes::subscriptions::get_subscription),
        )
        .route("/notifications/stream", get(routes::stream::notification_stream))
        .route(
            "/projects",
            get(routes::projects::list_projects).post(routes::projects::create_project),
        )
        .route(
            "/projects/:id",
            get(routes::projects::get_project).patch(routes::projects::update_project),
        )
        .route("/projects/:id/reports", get(routes::reports::project_reports))
        .route(
            "/reports",
            get(routes::reports::list_reports).post(routes::reports::submit_report),
        )
        .route("/reports/:id/verify", post(routes::reports::verify_report))
        .route("/champions", get(routes::champions::list_champions))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!(addr = %addr, "civicwatch-server starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
