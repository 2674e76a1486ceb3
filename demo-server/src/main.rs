use axum::{Router, routing::get};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use oauth2_password_axum::{AuthConfig, AuthService, auth_router};

const DEFAULT_PORT: u16 = 3001;

async fn index() -> &'static str {
    "This is the index page."
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "demo_server=debug,oauth2_password=debug,oauth2_password_axum=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AuthConfig::from_env()?;
    let service = AuthService::init(config).await?;

    let app = Router::new()
        .route("/", get(index))
        .merge(auth_router(service));

    let port = match std::env::var("PORT") {
        Ok(port) => port.parse()?,
        Err(_) => DEFAULT_PORT,
    };
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {addr}");
    axum_server::bind(addr)
        .serve(app.into_make_service())
        .await?;
    Ok(())
}
