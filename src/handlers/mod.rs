use actix_web::web;

use crate::error::ApiError;

pub(crate) mod meal;
pub(crate) mod restaurant;

/// Registers every resource route. Used by `main` and by the handler tests.
pub(crate) fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(path_config())
        .service(restaurant::create)
        .service(restaurant::list)
        .service(restaurant::retrieve)
        .service(restaurant::favorite)
        .service(restaurant::unfavorite)
        .service(meal::create)
        .service(meal::list)
        .service(meal::retrieve)
        .service(meal::create_rating)
        .service(meal::update_rating)
        .service(meal::favorite)
        .service(meal::unfavorite);
}

/// Malformed or incomplete bodies are a validation failure, answered with
/// the same `{"reason": ...}` shape as every other error.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| ApiError::Validation(err.to_string()).into())
}

/// An id that does not parse can never match a row.
fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|err, _req| ApiError::NotFound(err.to_string()).into())
}
