use std::io;

use actix_web::{middleware, web, App, HttpServer};

mod auth;
mod config;
mod db;
mod error;
mod handlers;
mod models;
mod query;
mod read_model;
mod schema;
mod serializers;
#[cfg(test)]
mod test_util;

use crate::config::Config;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env().map_err(io::Error::other)?;

    // set up database connection pool
    let pool = db::init_pool(&config.database_url, config.pool_size).map_err(io::Error::other)?;
    db::run_migrations(&pool).map_err(io::Error::other)?;

    log::info!(
        "starting HTTP server at http://{}:{} (database: {})",
        config.host,
        config.port,
        config.database_url
    );

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .wrap(middleware::Logger::default())
            .configure(handlers::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
