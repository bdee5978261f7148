use axum::{
    http::HeaderValue,
    middleware,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::{AuthorizationGuard, CredentialVerifier, StubCodeVerifier, TokenCodec};
use crate::config::{AppConfig, Environment};
use crate::database::{
    DogStore, IdentityStore, MemoryDogStore, MemoryIdentityStore, PgDogStore, PgIdentityStore,
};
use crate::handlers;
use crate::middleware::require_auth;
use crate::services::{AuthService, DogService};

/// Shared, immutable-after-startup application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub tokens: Arc<TokenCodec>,
    pub identities: Arc<dyn IdentityStore>,
    pub guard: AuthorizationGuard,
    pub auth: AuthService,
    pub dogs: DogService,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        identities: Arc<dyn IdentityStore>,
        dogs: Arc<dyn DogStore>,
        verifier: Arc<dyn CredentialVerifier>,
    ) -> Self {
        let tokens = Arc::new(TokenCodec::new(&config.security.secret_key, config.token_ttl()));

        Self {
            guard: AuthorizationGuard::new(tokens.clone(), identities.clone()),
            auth: AuthService::new(identities.clone(), verifier, tokens.clone()),
            dogs: DogService::new(dogs),
            config: Arc::new(config),
            tokens,
            identities,
        }
    }

    /// State backed by PostgreSQL
    pub fn postgres(config: AppConfig, pool: PgPool) -> Self {
        Self::new(
            config,
            Arc::new(PgIdentityStore::new(pool.clone())),
            Arc::new(PgDogStore::new(pool)),
            Arc::new(StubCodeVerifier::default()),
        )
    }

    /// State backed by process memory; nothing survives a restart
    pub fn in_memory(config: AppConfig) -> Self {
        Self::new(
            config,
            Arc::new(MemoryIdentityStore::new()),
            Arc::new(MemoryDogStore::new()),
            Arc::new(StubCodeVerifier::default()),
        )
    }
}

pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        // Public
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .merge(auth_public_routes())
        // Bearer token required
        .merge(protected_routes(state.clone()))
        .with_state(state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors))
}

fn auth_public_routes() -> Router<AppState> {
    use handlers::auth;

    Router::new()
        .route("/auth/send-code", post(auth::send_code))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use handlers::{auth, dogs};

    Router::new()
        .route("/auth/me", get(auth::me))
        .route("/dogs", get(dogs::list).post(dogs::create))
        .route(
            "/dogs/:dog_id",
            get(dogs::show).put(dogs::update).delete(dogs::delete),
        )
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let security = &config.security;
    if !security.enable_cors {
        return CorsLayer::new();
    }

    if config.environment == Environment::Development || security.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}
