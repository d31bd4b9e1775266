use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::models::{Meal, MealRating, NewMeal, NewMealRating, NewRestaurant, Restaurant, User};

pub(crate) fn find_user_by_token(
    conn: &mut SqliteConnection,
    token: &str,
) -> QueryResult<Option<User>> {
    use crate::schema::{auth_tokens, users};

    auth_tokens::table
        .inner_join(users::table)
        .filter(auth_tokens::key.eq(token))
        .select(User::as_select())
        .first(conn)
        .optional()
}

pub(crate) fn find_restaurant(
    conn: &mut SqliteConnection,
    restaurant_id: i32,
) -> QueryResult<Option<Restaurant>> {
    use crate::schema::restaurants::dsl::*;

    restaurants
        .find(restaurant_id)
        .select(Restaurant::as_select())
        .first(conn)
        .optional()
}

pub(crate) fn find_all_restaurants(conn: &mut SqliteConnection) -> QueryResult<Vec<Restaurant>> {
    use crate::schema::restaurants::dsl::*;

    restaurants
        .order(id)
        .select(Restaurant::as_select())
        .load(conn)
}

pub(crate) fn restaurant_name_taken(
    conn: &mut SqliteConnection,
    restaurant_name: &str,
) -> QueryResult<bool> {
    use crate::schema::restaurants::dsl::*;

    diesel::select(diesel::dsl::exists(
        restaurants.filter(name.eq(restaurant_name)),
    ))
    .get_result(conn)
}

pub(crate) fn insert_restaurant(
    conn: &mut SqliteConnection,
    new: &NewRestaurant,
) -> QueryResult<Restaurant> {
    use crate::schema::restaurants;

    diesel::insert_into(restaurants::table)
        .values(new)
        .returning(Restaurant::as_returning())
        .get_result(conn)
}

pub(crate) fn add_favorite_restaurant(
    conn: &mut SqliteConnection,
    user: i32,
    restaurant: i32,
) -> QueryResult<usize> {
    use crate::schema::favorite_restaurants::dsl::*;

    // the (user_id, restaurant_id) unique constraint makes a repeat a no-op
    diesel::insert_or_ignore_into(favorite_restaurants)
        .values((user_id.eq(user), restaurant_id.eq(restaurant)))
        .execute(conn)
}

pub(crate) fn remove_favorite_restaurant(
    conn: &mut SqliteConnection,
    user: i32,
    restaurant: i32,
) -> QueryResult<usize> {
    use crate::schema::favorite_restaurants::dsl::*;

    diesel::delete(favorite_restaurants.filter(user_id.eq(user).and(restaurant_id.eq(restaurant))))
        .execute(conn)
}

pub(crate) fn meal_exists(conn: &mut SqliteConnection, meal: i32) -> QueryResult<bool> {
    use crate::schema::meals::dsl::*;

    diesel::select(diesel::dsl::exists(meals.find(meal))).get_result(conn)
}

/// A meal together with the restaurant serving it.
pub(crate) fn find_meal(
    conn: &mut SqliteConnection,
    meal_id: i32,
) -> QueryResult<Option<(Meal, Restaurant)>> {
    use crate::schema::{meals, restaurants};

    meals::table
        .inner_join(restaurants::table)
        .filter(meals::id.eq(meal_id))
        .select((Meal::as_select(), Restaurant::as_select()))
        .first(conn)
        .optional()
}

pub(crate) fn find_all_meals(conn: &mut SqliteConnection) -> QueryResult<Vec<(Meal, Restaurant)>> {
    use crate::schema::{meals, restaurants};

    meals::table
        .inner_join(restaurants::table)
        .order(meals::id)
        .select((Meal::as_select(), Restaurant::as_select()))
        .load(conn)
}

pub(crate) fn insert_meal(conn: &mut SqliteConnection, new: &NewMeal) -> QueryResult<Meal> {
    use crate::schema::meals;

    diesel::insert_into(meals::table)
        .values(new)
        .returning(Meal::as_returning())
        .get_result(conn)
}

pub(crate) fn add_favorite_meal(
    conn: &mut SqliteConnection,
    user: i32,
    meal: i32,
) -> QueryResult<usize> {
    use crate::schema::favorite_meals::dsl::*;

    diesel::insert_or_ignore_into(favorite_meals)
        .values((user_id.eq(user), meal_id.eq(meal)))
        .execute(conn)
}

pub(crate) fn remove_favorite_meal(
    conn: &mut SqliteConnection,
    user: i32,
    meal: i32,
) -> QueryResult<usize> {
    use crate::schema::favorite_meals::dsl::*;

    diesel::delete(favorite_meals.filter(user_id.eq(user).and(meal_id.eq(meal)))).execute(conn)
}

pub(crate) fn find_rating(
    conn: &mut SqliteConnection,
    user: i32,
    meal: i32,
) -> QueryResult<Option<MealRating>> {
    use crate::schema::meal_ratings::dsl::*;

    meal_ratings
        .filter(user_id.eq(user).and(meal_id.eq(meal)))
        .select(MealRating::as_select())
        .first(conn)
        .optional()
}

pub(crate) fn insert_rating(
    conn: &mut SqliteConnection,
    new: &NewMealRating,
) -> QueryResult<MealRating> {
    use crate::schema::meal_ratings;

    diesel::insert_into(meal_ratings::table)
        .values(new)
        .returning(MealRating::as_returning())
        .get_result(conn)
}

pub(crate) fn update_rating(
    conn: &mut SqliteConnection,
    rating_id: i32,
    value: i32,
) -> QueryResult<usize> {
    use crate::schema::meal_ratings::dsl::*;

    diesel::update(meal_ratings.find(rating_id))
        .set(rating.eq(value))
        .execute(conn)
}
