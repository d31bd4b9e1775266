use serde::Serialize;

use crate::models::{Meal, Restaurant};
use crate::read_model::MealStats;

#[derive(Debug, Serialize)]
pub(crate) struct RestaurantView {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub is_favorite: bool,
}

impl RestaurantView {
    pub(crate) fn new(restaurant: Restaurant, is_favorite: bool) -> Self {
        RestaurantView {
            id: restaurant.id,
            name: restaurant.name,
            address: restaurant.address,
            is_favorite,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct MealView {
    pub id: i32,
    pub name: String,
    pub restaurant: RestaurantView,
    pub is_favorite: bool,
    pub rating: i32,
    pub avg_rating: Option<f64>,
}

impl MealView {
    pub(crate) fn new(meal: Meal, restaurant: RestaurantView, stats: MealStats) -> Self {
        MealView {
            id: meal.id,
            name: meal.name,
            restaurant,
            is_favorite: stats.is_favorite,
            rating: stats.rating,
            avg_rating: stats.avg_rating,
        }
    }
}

/// Body of the action endpoints that answer with 201.
#[derive(Debug, Serialize)]
pub(crate) struct MessageView {
    pub message: &'static str,
}

impl MessageView {
    pub(crate) fn new(message: &'static str) -> Self {
        MessageView { message }
    }
}
