use actix_web::{delete, get, post, put, web, HttpResponse};
use diesel::sqlite::SqliteConnection;

use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::{MealPayload, NewMealRating, RatingPayload};
use crate::query;
use crate::read_model::{self, MealStats, MealStatsIndex, RestaurantFavorites};
use crate::serializers::{MealView, MessageView, RestaurantView};

fn ensure_meal(conn: &mut SqliteConnection, id: i32) -> Result<(), ApiError> {
    if query::meal_exists(conn, id)? {
        Ok(())
    } else {
        Err(ApiError::not_found("Meal", id))
    }
}

#[post("/meals")]
pub(crate) async fn create(
    user: AuthUser,
    pool: web::Data<DbPool>,
    payload: web::Json<MealPayload>,
) -> Result<HttpResponse, ApiError> {
    let new = payload.into_inner().validate()?;
    let view = web::block(move || {
        let mut conn = pool.get()?;
        let restaurant = query::find_restaurant(&mut conn, new.restaurant_id)?.ok_or_else(|| {
            ApiError::Validation(format!(
                "restaurant {} does not exist.",
                new.restaurant_id
            ))
        })?;
        let is_favorite = read_model::restaurant_is_favorite(&mut conn, user.id(), restaurant.id)?;
        let meal = query::insert_meal(&mut conn, &new)?;
        Ok::<_, ApiError>(MealView::new(
            meal,
            RestaurantView::new(restaurant, is_favorite),
            MealStats::fresh(),
        ))
    })
    .await??;

    log::info!("created meal {} ({})", view.id, view.name);
    Ok(HttpResponse::Created().json(view))
}

#[get("/meals/{id}")]
pub(crate) async fn retrieve(
    user: AuthUser,
    id: web::Path<i32>,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ApiError> {
    let id = id.into_inner();
    let view = web::block(move || {
        let mut conn = pool.get()?;
        let (meal, restaurant) =
            query::find_meal(&mut conn, id)?.ok_or_else(|| ApiError::not_found("Meal", id))?;
        let stats = read_model::meal_stats(&mut conn, user.id(), id)?;
        let is_favorite = read_model::restaurant_is_favorite(&mut conn, user.id(), restaurant.id)?;
        Ok::<_, ApiError>(MealView::new(
            meal,
            RestaurantView::new(restaurant, is_favorite),
            stats,
        ))
    })
    .await??;
    Ok(HttpResponse::Ok().json(view))
}

#[get("/meals")]
pub(crate) async fn list(
    user: AuthUser,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ApiError> {
    let views = web::block(move || {
        let mut conn = pool.get()?;
        let stats = MealStatsIndex::load(&mut conn, user.id())?;
        let favorite_restaurants = RestaurantFavorites::load(&mut conn, user.id())?;
        let views: Vec<MealView> = query::find_all_meals(&mut conn)?
            .into_iter()
            .map(|(meal, restaurant)| {
                let meal_stats = stats.get(meal.id);
                let is_favorite = favorite_restaurants.contains(restaurant.id);
                MealView::new(meal, RestaurantView::new(restaurant, is_favorite), meal_stats)
            })
            .collect();
        Ok::<_, ApiError>(views)
    })
    .await??;
    log::debug!("listed {} meals", views.len());
    Ok(HttpResponse::Ok().json(views))
}

/// First rating of a meal by the requesting user. A second POST is refused;
/// changing a rating goes through PUT.
#[post("/meals/{id}/rate")]
pub(crate) async fn create_rating(
    user: AuthUser,
    id: web::Path<i32>,
    pool: web::Data<DbPool>,
    payload: web::Json<RatingPayload>,
) -> Result<HttpResponse, ApiError> {
    let id = id.into_inner();
    let rating = payload.into_inner().validate()?;
    let username = user.username().to_string();
    web::block(move || {
        let mut conn = pool.get()?;
        ensure_meal(&mut conn, id)?;
        if query::find_rating(&mut conn, user.id(), id)?.is_some() {
            return Err(ApiError::Validation(format!(
                "meal {id} is already rated; use PUT to change the rating."
            )));
        }
        query::insert_rating(
            &mut conn,
            &NewMealRating {
                user_id: user.id(),
                meal_id: id,
                rating,
            },
        )?;
        Ok::<_, ApiError>(())
    })
    .await??;

    log::info!("{username} rated meal {id}: {rating}");
    Ok(HttpResponse::Created().json(MessageView::new("rating added")))
}

#[put("/meals/{id}/rate")]
pub(crate) async fn update_rating(
    user: AuthUser,
    id: web::Path<i32>,
    pool: web::Data<DbPool>,
    payload: web::Json<RatingPayload>,
) -> Result<HttpResponse, ApiError> {
    let id = id.into_inner();
    let rating = payload.into_inner().validate()?;
    let username = user.username().to_string();
    web::block(move || {
        let mut conn = pool.get()?;
        ensure_meal(&mut conn, id)?;
        let existing = query::find_rating(&mut conn, user.id(), id)?
            .ok_or_else(|| ApiError::NotFound(format!("meal {id} has no rating to update.")))?;
        query::update_rating(&mut conn, existing.id, rating)?;
        Ok::<_, ApiError>(())
    })
    .await??;

    log::info!("{username} changed rating of meal {id} to {rating}");
    Ok(HttpResponse::NoContent().finish())
}

#[post("/meals/{id}/favorite")]
pub(crate) async fn favorite(
    user: AuthUser,
    id: web::Path<i32>,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ApiError> {
    let id = id.into_inner();
    let username = user.username().to_string();
    web::block(move || {
        let mut conn = pool.get()?;
        ensure_meal(&mut conn, id)?;
        query::add_favorite_meal(&mut conn, user.id(), id)?;
        Ok::<_, ApiError>(())
    })
    .await??;

    log::info!("{username} favorited meal {id}");
    Ok(HttpResponse::Created().json(MessageView::new("favorite added")))
}

#[delete("/meals/{id}/unfavorite")]
pub(crate) async fn unfavorite(
    user: AuthUser,
    id: web::Path<i32>,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ApiError> {
    let id = id.into_inner();
    let username = user.username().to_string();
    let removed = web::block(move || {
        let mut conn = pool.get()?;
        ensure_meal(&mut conn, id)?;
        Ok::<_, ApiError>(query::remove_favorite_meal(&mut conn, user.id(), id)?)
    })
    .await??;

    log::info!("{username} unfavorited meal {id} ({removed} removed)");
    Ok(HttpResponse::NoContent().finish())
}
