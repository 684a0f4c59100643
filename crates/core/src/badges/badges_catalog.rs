use crate::badges::Badge;

fn badge(id: &str, name: &str, description: &str, goal_count_required: i32) -> Badge {
    Badge {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        image_name: format!("badge_{}", id),
        goal_count_required,
    }
}

/// The fixed tiers written into an empty store on first start.
pub fn default_badge_catalog() -> Vec<Badge> {
    vec![
        badge("beginner", "Beginner", "Complete your first goal", 1),
        badge("achiever", "Achiever", "Complete 5 goals", 5),
        badge("goal_getter", "Goal Getter", "Complete 10 goals", 10),
        badge("champion", "Champion", "Complete 25 goals", 25),
        badge("legend", "Legend", "Complete 50 goals", 50),
    ]
}
