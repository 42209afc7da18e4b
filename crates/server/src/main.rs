//! Videotube server entry point.

use std::sync::Arc;

use axum::{Router, extract::DefaultBodyLimit, middleware};
use tokio::signal;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use videotube_api::{
    middleware::{AppState, auth_middleware, panic_response},
    route_not_found, router as api_router,
};
use videotube_common::{Config, LocalStorage, StorageBackend};
use videotube_core::{
    CommentService, DashboardService, LikeService, PlaylistService, SubscriptionService,
    TweetService, UserService, VideoService,
};
use videotube_db::repositories::{
    CommentRepository, LikeRepository, PlaylistRepository, SubscriptionRepository,
    TweetRepository, UserRepository, VideoRepository,
};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "videotube=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting videotube server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = videotube_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    videotube_db::migrate(&db).await?;
    info!("Migrations completed");

    let db = Arc::new(db);

    // Initialize repositories
    let user_repo = UserRepository::new(Arc::clone(&db));
    let tweet_repo = TweetRepository::new(Arc::clone(&db));
    let like_repo = LikeRepository::new(Arc::clone(&db));
    let comment_repo = CommentRepository::new(Arc::clone(&db));
    let video_repo = VideoRepository::new(Arc::clone(&db));
    let playlist_repo = PlaylistRepository::new(Arc::clone(&db));
    let subscription_repo = SubscriptionRepository::new(Arc::clone(&db));

    // Media storage
    let storage: Arc<dyn StorageBackend> = Arc::new(LocalStorage::from_settings(&config.storage));
    info!(path = %config.storage.base_path.display(), url = %config.storage.base_url, "Media storage ready");

    // Initialize services
    let state = AppState {
        user_service: UserService::new(user_repo.clone()),
        tweet_service: TweetService::new(tweet_repo.clone(), user_repo.clone(), like_repo.clone()),
        playlist_service: PlaylistService::new(
            playlist_repo.clone(),
            video_repo.clone(),
            user_repo.clone(),
        ),
        like_service: LikeService::new(
            like_repo.clone(),
            video_repo.clone(),
            comment_repo.clone(),
            tweet_repo,
            user_repo.clone(),
        ),
        comment_service: CommentService::new(
            comment_repo.clone(),
            video_repo.clone(),
            user_repo.clone(),
            like_repo.clone(),
        ),
        video_service: VideoService::new(
            video_repo.clone(),
            user_repo.clone(),
            like_repo.clone(),
            comment_repo,
            playlist_repo,
            subscription_repo.clone(),
            storage,
        ),
        subscription_service: SubscriptionService::new(
            subscription_repo.clone(),
            user_repo,
            video_repo.clone(),
        ),
        dashboard_service: DashboardService::new(video_repo, like_repo, subscription_repo),
        pagination: config.pagination,
    };

    // Build router
    let app = Router::new()
        .nest("/api/v1", api_router())
        .nest_service(
            &config.storage.base_url,
            ServeDir::new(&config.storage.base_path),
        )
        .fallback(route_not_found)
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.server.body_limit))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Listening on {} ({})", addr, config.server.url);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
