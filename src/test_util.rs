//! Fixtures shared by the unit tests. Users and tokens belong to the auth
//! provider in production, so tests insert them directly.

use actix_web::http::header::{HeaderName, AUTHORIZATION};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::db::{self, DbPool};
use crate::models::{NewMeal, NewMealRating, NewRestaurant};
use crate::query;
use crate::schema::{auth_tokens, users};

/// A single-connection in-memory database with the schema applied. The
/// pool must stay at one connection or each checkout sees an empty database.
pub(crate) fn pool() -> DbPool {
    let pool = db::init_pool(":memory:", 1).unwrap();
    db::run_migrations(&pool).unwrap();
    pool
}

pub(crate) fn seed_user(pool: &DbPool, username: &str, token: &str) -> i32 {
    let mut conn = pool.get().unwrap();
    let user_id: i32 = diesel::insert_into(users::table)
        .values(users::username.eq(username))
        .returning(users::id)
        .get_result(&mut *conn)
        .unwrap();
    diesel::insert_into(auth_tokens::table)
        .values((auth_tokens::key.eq(token), auth_tokens::user_id.eq(user_id)))
        .execute(&mut *conn)
        .unwrap();
    user_id
}

pub(crate) fn seed_restaurant(conn: &mut SqliteConnection, name: &str) -> i32 {
    query::insert_restaurant(
        conn,
        &NewRestaurant {
            name: name.to_string(),
            address: format!("{name} street"),
        },
    )
    .unwrap()
    .id
}

/// Inserts a new restaurant and one meal served there; returns both ids.
pub(crate) fn seed_meal(conn: &mut SqliteConnection, meal: &str, restaurant: &str) -> (i32, i32) {
    let restaurant_id = seed_restaurant(conn, restaurant);
    let meal_id = query::insert_meal(
        conn,
        &NewMeal {
            name: meal.to_string(),
            restaurant_id,
        },
    )
    .unwrap()
    .id;
    (meal_id, restaurant_id)
}

pub(crate) fn seed_rating(conn: &mut SqliteConnection, user_id: i32, meal_id: i32, rating: i32) {
    query::insert_rating(
        conn,
        &NewMealRating {
            user_id,
            meal_id,
            rating,
        },
    )
    .unwrap();
}

pub(crate) fn token(key: &str) -> (HeaderName, String) {
    (AUTHORIZATION, format!("Token {key}"))
}
