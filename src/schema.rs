diesel::table! {
    users (id) {
        id -> Integer,
        username -> Text,
    }
}

diesel::table! {
    auth_tokens (key) {
        key -> Text,
        user_id -> Integer,
    }
}

diesel::table! {
    restaurants (id) {
        id -> Integer,
        name -> Text,
        address -> Text,
    }
}

diesel::table! {
    meals (id) {
        id -> Integer,
        name -> Text,
        restaurant_id -> Integer,
    }
}

diesel::table! {
    favorite_restaurants (id) {
        id -> Integer,
        user_id -> Integer,
        restaurant_id -> Integer,
    }
}

diesel::table! {
    favorite_meals (id) {
        id -> Integer,
        user_id -> Integer,
        meal_id -> Integer,
    }
}

diesel::table! {
    meal_ratings (id) {
        id -> Integer,
        user_id -> Integer,
        meal_id -> Integer,
        rating -> Integer,
    }
}

diesel::joinable!(auth_tokens -> users (user_id));
diesel::joinable!(meals -> restaurants (restaurant_id));
diesel::joinable!(favorite_restaurants -> restaurants (restaurant_id));
diesel::joinable!(favorite_restaurants -> users (user_id));
diesel::joinable!(favorite_meals -> meals (meal_id));
diesel::joinable!(favorite_meals -> users (user_id));
diesel::joinable!(meal_ratings -> meals (meal_id));
diesel::joinable!(meal_ratings -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    auth_tokens,
    restaurants,
    meals,
    favorite_restaurants,
    favorite_meals,
    meal_ratings,
);
