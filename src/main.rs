use anyhow::Context;
use axum::http::{header, HeaderValue, Method};
use mongodb::{bson::doc, options::ClientOptions, Client};
use std::{env, sync::Arc};
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;

use cartelera_api::app;
use cartelera_api::store::{DynStore, MongoStore};

const DATABASE: &str = "cartelera";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let database_url = env::var("MONGODB_URI").context("MONGODB_URI must be set")?;
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(4000);

    let client_options = ClientOptions::parse(&database_url)
        .await
        .context("failed to parse MONGODB_URI")?;
    let client = Client::with_options(client_options)?;

    client
        .database(DATABASE)
        .run_command(doc! {"ping": 1}, None)
        .await
        .context("failed to reach MongoDB")?;
    tracing::info!("connected to MongoDB");

    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];
    let cors = match env::var("APP_URL") {
        Ok(origin) => CorsLayer::new()
            .allow_methods(methods)
            .allow_origin(origin.parse::<HeaderValue>().context("invalid APP_URL")?)
            .allow_headers([header::CONTENT_TYPE]),
        Err(_) => CorsLayer::new()
            .allow_methods(methods)
            .allow_origin(Any)
            .allow_headers([header::CONTENT_TYPE]),
    };

    let store: DynStore = Arc::new(MongoStore::new(client, DATABASE));
    let router = app(store).layer(cors);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!(port, "listening");
    axum::serve(listener, router).await?;
    Ok(())
}
