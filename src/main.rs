use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use config::Config;
use dotenv::dotenv;
use errors::AppError;
use sqlx::{postgres::PgPoolOptions, Pool, Postgres};
use storage::{BlobStore, LocalBlobStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod config;
mod errors;
mod handlers;
mod issuance;
mod middlewares;
mod models;
mod routes;
mod schema;
mod storage;
mod utils;
#[cfg(test)]
mod test_init_app;

pub struct GlobalState{
    pool: Pool<Postgres>,
    config: Config,
    storage: Arc<dyn BlobStore>,
}

#[actix_web::main]
async fn main() -> Result<(), AppError> {

    dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let pool = PgPoolOptions::new()
    .max_connections(config.max_connections)
    .connect(&config.database_url)
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "database connection failed");
        AppError::DbConnect
    })?;

    sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "migrations failed");
        AppError::Migrate
    })?;

    let storage = Arc::new(LocalBlobStore::new(config.storage_dir.clone(), config.public_storage_url.clone()));

    let address = config.bind_address.clone();

    let global_state = GlobalState{pool, config, storage};

    let app_data = web::Data::new(global_state);

    tracing::info!(%address, "The Server is running");

    HttpServer::new(
        move||{
            App::new()
            .wrap(Logger::default())
            .app_data(app_data.clone())
            .configure(routes::configure)
        }
    ).bind(&address)
    .map_err(|_e|AppError::SocketBind)?
    .run()
    .await
    .map_err(|_e|AppError::ServerStart)?;

    Ok(())
    
}
