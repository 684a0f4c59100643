// Diesel table definitions. Must match the DDL in `db::schema_manager`.

diesel::table! {
    user (id) {
        id -> Text,
        username -> Text,
        email -> Text,
        password -> Text,
        profile_picture_data -> Nullable<Binary>,
    }
}

diesel::table! {
    badge (id) {
        id -> Text,
        name -> Text,
        description -> Text,
        image_name -> Text,
        goal_count_required -> Integer,
    }
}

diesel::table! {
    goal (id) {
        id -> Text,
        user_id -> Text,
        title -> Text,
        description -> Nullable<Text>,
        category -> Nullable<Text>,
        deadline -> Nullable<Date>,
        is_completed -> Bool,
        progress -> Double,
        progress_diary -> Binary,
    }
}

diesel::table! {
    user_badge (user_id, badge_id) {
        user_id -> Text,
        badge_id -> Text,
        date_earned -> Timestamp,
    }
}

diesel::table! {
    quote (id) {
        id -> Integer,
        #[sql_name = "quote"]
        text -> Text,
        author -> Text,
        html -> Nullable<Text>,
    }
}

diesel::joinable!(goal -> user (user_id));
diesel::joinable!(user_badge -> user (user_id));
diesel::joinable!(user_badge -> badge (badge_id));

diesel::allow_tables_to_appear_in_same_query!(user, badge, goal, user_badge, quote,);
