use diesel::prelude::*;
use serde::Deserialize;

use crate::error::ApiError;
use crate::schema::{meal_ratings, meals, restaurants, users};

const NAME_MAX_LEN: usize = 55;
const ADDRESS_MAX_LEN: usize = 255;
pub(crate) const RATING_RANGE: std::ops::RangeInclusive<i32> = 1..=5;

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct User {
    pub id: i32,
    pub username: String,
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = restaurants)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct Restaurant {
    pub id: i32,
    pub name: String,
    pub address: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = restaurants)]
pub(crate) struct NewRestaurant {
    pub name: String,
    pub address: String,
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = meals)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct Meal {
    pub id: i32,
    pub name: String,
    pub restaurant_id: i32,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = meals)]
pub(crate) struct NewMeal {
    pub name: String,
    pub restaurant_id: i32,
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = meal_ratings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[allow(dead_code)]
pub(crate) struct MealRating {
    pub id: i32,
    pub user_id: i32,
    pub meal_id: i32,
    pub rating: i32,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = meal_ratings)]
pub(crate) struct NewMealRating {
    pub user_id: i32,
    pub meal_id: i32,
    pub rating: i32,
}

// request bodies

#[derive(Debug, Deserialize)]
pub(crate) struct RestaurantPayload {
    pub name: String,
    pub address: String,
}

impl RestaurantPayload {
    pub(crate) fn validate(self) -> Result<NewRestaurant, ApiError> {
        Ok(NewRestaurant {
            name: required("name", self.name, NAME_MAX_LEN)?,
            address: required("address", self.address, ADDRESS_MAX_LEN)?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct MealPayload {
    pub name: String,
    pub restaurant_id: i32,
}

impl MealPayload {
    /// Checks the fields that need no database access; the restaurant
    /// reference is resolved by the handler.
    pub(crate) fn validate(self) -> Result<NewMeal, ApiError> {
        Ok(NewMeal {
            name: required("name", self.name, NAME_MAX_LEN)?,
            restaurant_id: self.restaurant_id,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RatingPayload {
    pub rating: i32,
}

impl RatingPayload {
    pub(crate) fn validate(self) -> Result<i32, ApiError> {
        if RATING_RANGE.contains(&self.rating) {
            Ok(self.rating)
        } else {
            Err(ApiError::Validation(format!(
                "rating must be between {} and {}, got {}.",
                RATING_RANGE.start(),
                RATING_RANGE.end(),
                self.rating
            )))
        }
    }
}

fn required(field: &str, value: String, max_len: usize) -> Result<String, ApiError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ApiError::Validation(format!("{field} may not be blank.")));
    }
    if value.chars().count() > max_len {
        return Err(ApiError::Validation(format!(
            "{field} may not be longer than {max_len} characters."
        )));
    }
    Ok(value.to_string())
}
