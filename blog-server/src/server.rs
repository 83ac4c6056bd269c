use std::sync::Arc;

use actix_cors::Cors;
use actix_web::middleware::{DefaultHeaders, Logger};
use actix_web::{App, HttpResponse, HttpServer, Responder, web};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use tracing::info;

use crate::application::auth_service::AuthService;
use crate::application::comment_service::CommentService;
use crate::application::feed_service::FeedService;
use crate::application::post_service::PostService;
use crate::data::category_repository::PostgresCategoryRepository;
use crate::data::comment_repository::PostgresCommentRepository;
use crate::data::location_repository::PostgresLocationRepository;
use crate::data::post_repository::PostgresPostRepository;
use crate::data::user_repository::PostgresUserRepository;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::security::JwtKeys;
use crate::presentation::handlers;
use crate::presentation::middleware::{RequestIdMiddleware, TimingMiddleware, ViewerMiddleware};

/// Everything the handlers pull out of app data.
#[derive(Clone)]
pub struct AppServices {
    pub auth: AuthService,
    pub posts: PostService,
    pub comments: CommentService,
    pub feed: FeedService,
}

impl AppServices {
    pub fn postgres(pool: PgPool, keys: JwtKeys) -> Self {
        let users = Arc::new(PostgresUserRepository::new(pool.clone()));
        let categories = Arc::new(PostgresCategoryRepository::new(pool.clone()));
        let locations = Arc::new(PostgresLocationRepository::new(pool.clone()));
        let posts = Arc::new(PostgresPostRepository::new(pool.clone()));
        let comments = Arc::new(PostgresCommentRepository::new(pool));

        Self {
            auth: AuthService::new(users.clone(), keys),
            posts: PostService::new(
                posts.clone(),
                comments.clone(),
                categories.clone(),
                locations,
            ),
            comments: CommentService::new(posts.clone(), comments),
            feed: FeedService::new(posts, categories, users),
        }
    }

    pub fn register(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::new(self.auth.clone()))
            .app_data(web::Data::new(self.posts.clone()))
            .app_data(web::Data::new(self.comments.clone()))
            .app_data(web::Data::new(self.feed.clone()));
    }
}

pub async fn start_rest_server(config: AppConfig, services: AppServices) -> anyhow::Result<()> {
    let bind_address = (config.host.clone(), config.port);

    info!(host = %bind_address.0, port = bind_address.1, "HTTP server starting");

    HttpServer::new(move || {
        let cors = build_cors(&config);

        App::new()
            .wrap(ViewerMiddleware)
            .wrap(TimingMiddleware)
            .wrap(RequestIdMiddleware)
            .wrap(Logger::default())
            .wrap(
                DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("Referrer-Policy", "no-referrer"))
                    .add(("Permissions-Policy", "geolocation=()"))
                    .add(("Cross-Origin-Opener-Policy", "same-origin")),
            )
            .wrap(cors)
            .configure(|cfg| services.register(cfg))
            .route("/health", web::get().to(health))
            .configure(handlers::configure)
    })
    .bind(bind_address)?
    .run()
    .await?;

    info!("HTTP server stopped");
    Ok(())
}

fn build_cors(config: &AppConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST"])
        .allowed_headers(vec![
            actix_web::http::header::CONTENT_TYPE,
            actix_web::http::header::AUTHORIZATION,
        ])
        .supports_credentials()
        .max_age(3600);

    for origin in &config.cors_origins {
        cors = cors.allowed_origin(origin);
    }

    cors
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        timestamp: Utc::now(),
    })
}
