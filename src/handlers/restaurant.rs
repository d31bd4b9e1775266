use actix_web::{delete, get, post, web, HttpResponse};
use diesel::sqlite::SqliteConnection;

use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::{Restaurant, RestaurantPayload};
use crate::query;
use crate::read_model::{self, RestaurantFavorites};
use crate::serializers::{MessageView, RestaurantView};

fn load_restaurant(conn: &mut SqliteConnection, id: i32) -> Result<Restaurant, ApiError> {
    query::find_restaurant(conn, id)?.ok_or_else(|| ApiError::not_found("Restaurant", id))
}

#[post("/restaurants")]
pub(crate) async fn create(
    _user: AuthUser,
    pool: web::Data<DbPool>,
    payload: web::Json<RestaurantPayload>,
) -> Result<HttpResponse, ApiError> {
    let new = payload.into_inner().validate()?;
    let restaurant = web::block(move || {
        let mut conn = pool.get()?;
        if query::restaurant_name_taken(&mut conn, &new.name)? {
            return Err(ApiError::Validation(format!(
                "restaurant with name {:?} already exists.",
                new.name
            )));
        }
        Ok::<_, ApiError>(query::insert_restaurant(&mut conn, &new)?)
    })
    .await??;

    log::info!("created restaurant {} ({})", restaurant.id, restaurant.name);
    // nobody can have favorited it yet
    Ok(HttpResponse::Created().json(RestaurantView::new(restaurant, false)))
}

#[get("/restaurants/{id}")]
pub(crate) async fn retrieve(
    user: AuthUser,
    id: web::Path<i32>,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ApiError> {
    let id = id.into_inner();
    let view = web::block(move || {
        let mut conn = pool.get()?;
        let restaurant = load_restaurant(&mut conn, id)?;
        let is_favorite = read_model::restaurant_is_favorite(&mut conn, user.id(), id)?;
        Ok::<_, ApiError>(RestaurantView::new(restaurant, is_favorite))
    })
    .await??;
    Ok(HttpResponse::Ok().json(view))
}

#[get("/restaurants")]
pub(crate) async fn list(
    user: AuthUser,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ApiError> {
    let views = web::block(move || {
        let mut conn = pool.get()?;
        let favorites = RestaurantFavorites::load(&mut conn, user.id())?;
        let views: Vec<RestaurantView> = query::find_all_restaurants(&mut conn)?
            .into_iter()
            .map(|restaurant| {
                let is_favorite = favorites.contains(restaurant.id);
                RestaurantView::new(restaurant, is_favorite)
            })
            .collect();
        Ok::<_, ApiError>(views)
    })
    .await??;
    Ok(HttpResponse::Ok().json(views))
}

#[post("/restaurants/{id}/favorite")]
pub(crate) async fn favorite(
    user: AuthUser,
    id: web::Path<i32>,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ApiError> {
    let id = id.into_inner();
    let username = user.username().to_string();
    web::block(move || {
        let mut conn = pool.get()?;
        load_restaurant(&mut conn, id)?;
        query::add_favorite_restaurant(&mut conn, user.id(), id)?;
        Ok::<_, ApiError>(())
    })
    .await??;

    log::info!("{username} favorited restaurant {id}");
    Ok(HttpResponse::Created().json(MessageView::new("favorite added")))
}

#[delete("/restaurants/{id}/unfavorite")]
pub(crate) async fn unfavorite(
    user: AuthUser,
    id: web::Path<i32>,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ApiError> {
    let id = id.into_inner();
    let username = user.username().to_string();
    let removed = web::block(move || {
        let mut conn = pool.get()?;
        load_restaurant(&mut conn, id)?;
        Ok::<_, ApiError>(query::remove_favorite_restaurant(&mut conn, user.id(), id)?)
    })
    .await??;

    log::info!("{username} unfavorited restaurant {id} ({removed} removed)");
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use serde_json::{json, Value};

    use super::*;
    use crate::handlers;
    use crate::test_util;

    #[actix_web::test]
    async fn create_then_retrieve() {
        let pool = test_util::pool();
        test_util::seed_user(&pool, "alice", "alice-token");
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(pool.clone()))
                .configure(handlers::configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/restaurants")
            .insert_header(test_util::token("alice-token"))
            .set_json(json!({"name": "Prince's", "address": "5814 Nolensville Pike"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: Value = test::read_body_json(resp).await;
        assert_eq!(created["name"], "Prince's");
        assert_eq!(created["is_favorite"], false);

        let req = test::TestRequest::get()
            .uri(&format!("/restaurants/{}", created["id"]))
            .insert_header(test_util::token("alice-token"))
            .to_request();
        let fetched: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(fetched, created);
    }

    #[actix_web::test]
    async fn create_rejects_bad_input() {
        let pool = test_util::pool();
        test_util::seed_user(&pool, "alice", "alice-token");
        test_util::seed_restaurant(&mut pool.get().unwrap(), "Prince's");
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(pool.clone()))
                .configure(handlers::configure),
        )
        .await;

        for body in [
            json!({"name": "No Address"}),
            json!({"name": "  ", "address": "somewhere"}),
            json!({"name": "Prince's", "address": "duplicate name"}),
        ] {
            let req = test::TestRequest::post()
                .uri("/restaurants")
                .insert_header(test_util::token("alice-token"))
                .set_json(body)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            let error: Value = test::read_body_json(resp).await;
            assert!(error["reason"].is_string());
        }
    }

    #[actix_web::test]
    async fn retrieve_missing_is_404() {
        let pool = test_util::pool();
        test_util::seed_user(&pool, "alice", "alice-token");
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(pool.clone()))
                .configure(handlers::configure),
        )
        .await;

        for req in [
            test::TestRequest::get().uri("/restaurants/42"),
            test::TestRequest::post().uri("/restaurants/42/favorite"),
            test::TestRequest::delete().uri("/restaurants/42/unfavorite"),
        ] {
            let req = req.insert_header(test_util::token("alice-token")).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        }
    }

    #[actix_web::test]
    async fn favorite_round_trip() {
        let pool = test_util::pool();
        test_util::seed_user(&pool, "alice", "alice-token");
        test_util::seed_user(&pool, "bob", "bob-token");
        let id = test_util::seed_restaurant(&mut pool.get().unwrap(), "Prince's");
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(pool.clone()))
                .configure(handlers::configure),
        )
        .await;
        let detail = format!("/restaurants/{id}");

        let req = test::TestRequest::get()
            .uri(&detail)
            .insert_header(test_util::token("alice-token"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["is_favorite"], false);

        // favoriting twice is harmless
        for _ in 0..2 {
            let req = test::TestRequest::post()
                .uri(&format!("/restaurants/{id}/favorite"))
                .insert_header(test_util::token("alice-token"))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::CREATED);
        }

        let req = test::TestRequest::get()
            .uri(&detail)
            .insert_header(test_util::token("alice-token"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["is_favorite"], true);

        let req = test::TestRequest::get()
            .uri("/restaurants")
            .insert_header(test_util::token("bob-token"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body[0]["is_favorite"], false);

        let req = test::TestRequest::delete()
            .uri(&format!("/restaurants/{id}/unfavorite"))
            .insert_header(test_util::token("alice-token"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let req = test::TestRequest::get()
            .uri(&detail)
            .insert_header(test_util::token("alice-token"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["is_favorite"], false);
    }

    #[actix_web::test]
    async fn unfavorite_without_favorite_succeeds() {
        let pool = test_util::pool();
        test_util::seed_user(&pool, "alice", "alice-token");
        let id = test_util::seed_restaurant(&mut pool.get().unwrap(), "Prince's");
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(pool.clone()))
                .configure(handlers::configure),
        )
        .await;

        let req = test::TestRequest::delete()
            .uri(&format!("/restaurants/{id}/unfavorite"))
            .insert_header(test_util::token("alice-token"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    }

    #[actix_web::test]
    async fn list_marks_only_own_favorites() {
        let pool = test_util::pool();
        let alice = test_util::seed_user(&pool, "alice", "alice-token");
        {
            let mut conn = pool.get().unwrap();
            let first = test_util::seed_restaurant(&mut conn, "Prince's");
            test_util::seed_restaurant(&mut conn, "Loveless Cafe");
            query::add_favorite_restaurant(&mut conn, alice, first).unwrap();
        }
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(pool.clone()))
                .configure(handlers::configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/restaurants")
            .insert_header(test_util::token("alice-token"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let flags: Vec<bool> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["is_favorite"].as_bool().unwrap())
            .collect();
        assert_eq!(flags, vec![true, false]);
    }

    #[actix_web::test]
    async fn requires_token() {
        let pool = test_util::pool();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(pool.clone()))
                .configure(handlers::configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/restaurants").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
