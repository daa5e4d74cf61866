use axum::{
    middleware,
    routing::get,
    Router,
};
use std::sync::Arc;
use tracing::info;

use crate::auth;
use crate::backend::{BackendFactory, ScimBackend};
use crate::config::AppConfig;
use crate::error::AppResult;
use crate::logging;
use crate::provisioning::ScimProvisioning;
use crate::resource::{self, AppState};

/// Connect the configured store and create its tables
pub async fn setup_backend(config: &AppConfig) -> AppResult<Arc<dyn ScimBackend>> {
    let backend_config = config.database_backend_config()?;
    info!(
        database = ?backend_config.database_type,
        url = %backend_config.connection_url,
        max_connections = backend_config.max_connections,
        "setting up backend"
    );
    BackendFactory::create(&backend_config).await
}

pub fn build_router(provisioning: Arc<ScimProvisioning>, config: Arc<AppConfig>) -> Router {
    let base_path = provisioning.assembler.base_path().to_string();
    let state: AppState = (provisioning, config.clone());

    let scim_routes = Router::new()
        .route("/Schemas", get(resource::schema::schemas))
        .route(
            "/Users",
            get(resource::user::search_users).post(resource::user::create_user),
        )
        .route(
            "/Users/{id}",
            get(resource::user::get_user)
                .put(resource::user::update_user)
                .patch(resource::user::patch_user)
                .delete(resource::user::delete_user),
        )
        .route(
            "/Groups",
            get(resource::group::search_groups).post(resource::group::create_group),
        )
        .route(
            "/Groups/{id}",
            get(resource::group::get_group)
                .put(resource::group::update_group)
                .patch(resource::group::patch_group)
                .delete(resource::group::delete_group),
        );

    let app = if base_path.is_empty() {
        scim_routes
    } else {
        Router::new().nest(&base_path, scim_routes)
    };

    app.route("/health", get(resource::health::health))
        .layer(middleware::from_fn_with_state(config, auth::auth_middleware))
        .layer(middleware::from_fn(logging::logging_middleware))
        .with_state(state)
}

/// Backend plus router, ready to serve
pub async fn build_app(config: AppConfig) -> AppResult<Router> {
    let backend = setup_backend(&config).await?;
    let provisioning = Arc::new(ScimProvisioning::new(backend, &config.base_path()?));
    Ok(build_router(provisioning, Arc::new(config)))
}
