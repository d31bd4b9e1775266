//! Per-viewer values derived from the favorite and rating tables.
//!
//! Nothing here is persisted. The single-entity functions back `retrieve`,
//! the `*Index` types load everything a list response needs up front so the
//! list handlers do a fixed number of queries regardless of row count.

use std::collections::{HashMap, HashSet};

use diesel::prelude::*;
use diesel::sql_types::{Double, Integer, Nullable};
use diesel::sqlite::SqliteConnection;

/// Reported as `rating` when the viewer has not rated the meal.
pub(crate) const NO_RATING: i32 = 0;

#[derive(QueryableByName)]
struct Average {
    #[diesel(sql_type = Nullable<Double>)]
    avg_rating: Option<f64>,
}

#[derive(QueryableByName)]
struct MealAverage {
    #[diesel(sql_type = Integer)]
    meal_id: i32,
    #[diesel(sql_type = Double)]
    avg_rating: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct MealStats {
    pub is_favorite: bool,
    pub rating: i32,
    pub avg_rating: Option<f64>,
}

impl MealStats {
    /// Stats for a meal nobody has touched yet.
    pub(crate) fn fresh() -> Self {
        MealStats {
            is_favorite: false,
            rating: NO_RATING,
            avg_rating: None,
        }
    }
}

pub(crate) fn restaurant_is_favorite(
    conn: &mut SqliteConnection,
    viewer: i32,
    restaurant: i32,
) -> QueryResult<bool> {
    use crate::schema::favorite_restaurants::dsl::*;

    diesel::select(diesel::dsl::exists(
        favorite_restaurants.filter(user_id.eq(viewer).and(restaurant_id.eq(restaurant))),
    ))
    .get_result(conn)
}

pub(crate) fn meal_stats(
    conn: &mut SqliteConnection,
    viewer: i32,
    meal: i32,
) -> QueryResult<MealStats> {
    use crate::schema::{favorite_meals, meal_ratings};

    let is_favorite: bool = diesel::select(diesel::dsl::exists(
        favorite_meals::table.filter(
            favorite_meals::user_id
                .eq(viewer)
                .and(favorite_meals::meal_id.eq(meal)),
        ),
    ))
    .get_result(conn)?;

    let own: Option<i32> = meal_ratings::table
        .filter(
            meal_ratings::user_id
                .eq(viewer)
                .and(meal_ratings::meal_id.eq(meal)),
        )
        .select(meal_ratings::rating)
        .first(conn)
        .optional()?;

    // AVG over no rows yields a single NULL row
    let average: Average = diesel::sql_query(
        "SELECT AVG(rating) AS avg_rating FROM meal_ratings WHERE meal_id = ?",
    )
    .bind::<Integer, _>(meal)
    .get_result(conn)?;

    Ok(MealStats {
        is_favorite,
        rating: own.unwrap_or(NO_RATING),
        avg_rating: average.avg_rating,
    })
}

/// Ids of every restaurant the viewer has favorited.
#[derive(Debug)]
pub(crate) struct RestaurantFavorites(HashSet<i32>);

impl RestaurantFavorites {
    pub(crate) fn load(conn: &mut SqliteConnection, viewer: i32) -> QueryResult<Self> {
        use crate::schema::favorite_restaurants::dsl::*;

        let ids = favorite_restaurants
            .filter(user_id.eq(viewer))
            .select(restaurant_id)
            .load::<i32>(conn)?;
        Ok(RestaurantFavorites(ids.into_iter().collect()))
    }

    pub(crate) fn contains(&self, restaurant: i32) -> bool {
        self.0.contains(&restaurant)
    }
}

/// Everything needed to build `MealStats` for any meal, for one viewer.
#[derive(Debug)]
pub(crate) struct MealStatsIndex {
    favorites: HashSet<i32>,
    own_ratings: HashMap<i32, i32>,
    averages: HashMap<i32, f64>,
}

impl MealStatsIndex {
    pub(crate) fn load(conn: &mut SqliteConnection, viewer: i32) -> QueryResult<Self> {
        use crate::schema::{favorite_meals, meal_ratings};

        let favorites = favorite_meals::table
            .filter(favorite_meals::user_id.eq(viewer))
            .select(favorite_meals::meal_id)
            .load::<i32>(conn)?;
        let own_ratings = meal_ratings::table
            .filter(meal_ratings::user_id.eq(viewer))
            .select((meal_ratings::meal_id, meal_ratings::rating))
            .load::<(i32, i32)>(conn)?;
        let averages = diesel::sql_query(
            "SELECT meal_id, AVG(rating) AS avg_rating FROM meal_ratings GROUP BY meal_id",
        )
        .load::<MealAverage>(conn)?;

        Ok(MealStatsIndex {
            favorites: favorites.into_iter().collect(),
            own_ratings: own_ratings.into_iter().collect(),
            averages: averages
                .into_iter()
                .map(|row| (row.meal_id, row.avg_rating))
                .collect(),
        })
    }

    pub(crate) fn get(&self, meal: i32) -> MealStats {
        MealStats {
            is_favorite: self.favorites.contains(&meal),
            rating: self.own_ratings.get(&meal).copied().unwrap_or(NO_RATING),
            avg_rating: self.averages.get(&meal).copied(),
        }
    }
}
