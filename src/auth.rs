use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;

use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::User;
use crate::query;

const TOKEN_SCHEME: &str = "Token";

/// The user a request acts on behalf of. Extracting it rejects the request
/// with 401 unless it carries `Authorization: Token <key>` for a known key.
#[derive(Debug)]
pub(crate) struct AuthUser(pub User);

impl AuthUser {
    pub(crate) fn id(&self) -> i32 {
        self.0.id
    }

    pub(crate) fn username(&self) -> &str {
        &self.0.username
    }
}

impl FromRequest for AuthUser {
    type Error = ApiError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let pool = req.app_data::<web::Data<DbPool>>().cloned();
        let token = token_from_header(req);

        Box::pin(async move {
            let token = token.ok_or(ApiError::Unauthorized)?;
            let pool = pool.ok_or(ApiError::Internal("database pool is not registered"))?;

            let user = web::block(move || {
                let mut conn = pool.get()?;
                Ok::<_, ApiError>(query::find_user_by_token(&mut conn, &token)?)
            })
            .await??;

            match user {
                Some(user) => Ok(AuthUser(user)),
                None => {
                    log::debug!("rejected unknown token");
                    Err(ApiError::Unauthorized)
                }
            }
        })
    }
}

fn token_from_header(req: &HttpRequest) -> Option<String> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, key) = value.trim().split_once(' ')?;
    let key = key.trim();
    (scheme == TOKEN_SCHEME && !key.is_empty()).then(|| key.to_string())
}
