use actix_web::{web, App, HttpServer};
use milsim_backend::config::app::AppConfig;
use milsim_backend::config::db::RuntimeEnv;
use milsim_backend::infra::state::build_state;
use milsim_backend::middleware::{
    cors_middleware, JwtExtract, RequestTrace, StructuredLogger, TraceSpan,
};
use milsim_backend::routes;
use milsim_backend::state::security_config::SecurityConfig;
use milsim_backend::telemetry;
use tracing::{error, info};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment
    // (docker env_file, or `set -a; . ./.env; set +a` locally).
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };

    let security = SecurityConfig::new(config.jwt_secret.as_bytes())
        .with_token_ttl(config.token_ttl)
        .with_cookie_secure(config.cookie_secure);

    let app_state = match build_state()
        .with_env(RuntimeEnv::Prod)
        .with_db(config.db_kind)
        .with_security(security)
        .build()
        .await
    {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "Failed to build application state");
            std::process::exit(1);
        }
    };

    info!(host = %config.host, port = config.port, db_kind = ?config.db_kind, "Starting milsim backend");

    let data = web::Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .wrap(JwtExtract)
            .wrap(cors_middleware())
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
