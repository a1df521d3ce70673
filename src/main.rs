use axum::{
    extract::FromRef,
    routing::{get, post},
    Router,
};
use std::env;
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod db;
mod error;
mod handlers;
mod middleware;
mod pipeline;
mod session;
mod views;

mod models;


#[derive(OpenApi)]
#[openapi(
    paths(handlers::clients::api_update_kanban),
    components(schemas(models::UpdateKanbanRequest, models::KanbanResponse)),
    modifiers(&SecurityAddon),
    tags(
        (name = "kanban", description = "Atualização de status via drag & drop")
    )
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session",
                utoipa::openapi::security::SecurityScheme::ApiKey(
                    utoipa::openapi::security::ApiKey::Cookie(
                        utoipa::openapi::security::ApiKeyValue::new(session::SESSION_COOKIE),
                    ),
                ),
            );
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub pool: sqlx::SqlitePool,
    pub config: config::Config,
}

impl FromRef<AppState> for sqlx::SqlitePool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for config::Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Inicializar tracing (logging)
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            env::var("RUST_LOG").unwrap_or_else(|_| "info,crm_vendas=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Carregar configuração (.env + variáveis de ambiente)
    let config = config::Config::load()?;

    // Conectar ao banco e aplicar migrações
    let pool = db::establish_connection(&config.database_url).await?;

    // Montar app
    let app = create_app(AppState { pool, config });

    // Iniciar servidor
    let addr = SocketAddr::from(([0, 0, 0, 0], 8000));
    tracing::info!("listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Rotas públicas
        .route("/", get(handlers::auth::home))
        .route(
            "/register",
            get(handlers::auth::register_form).post(handlers::auth::register),
        )
        .route(
            "/login",
            get(handlers::auth::login_form).post(handlers::auth::login),
        )
        .route("/logout", get(handlers::auth::logout))
        // Rotas protegidas
        .route(
            "/dashboard",
            get(handlers::clients::dashboard).post(handlers::clients::criar_cliente),
        )
        .route("/oportunidades", get(handlers::clients::oportunidades))
        .route("/clientes", get(handlers::clients::clientes))
        .route(
            "/update_status/:id/:new_status",
            get(handlers::clients::update_status),
        )
        .route("/api/update_kanban", post(handlers::clients::api_update_kanban))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
