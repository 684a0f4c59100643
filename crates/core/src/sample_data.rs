//! Development seed data: one demo user with a handful of goals, and a few
//! quotes. Only written when sample data is enabled and the store is empty.

use chrono::{Duration, NaiveDate, Utc};

use crate::goals::Goal;
use crate::quotes::Quote;
use crate::users::User;

pub const SAMPLE_USER_ID: &str = "00000000-0000-4000-8000-000000000001";

pub fn sample_user() -> User {
    User {
        id: SAMPLE_USER_ID.to_string(),
        username: "demo".to_string(),
        email: "demo@example.com".to_string(),
        password: "demo".to_string(),
        profile_picture_data: None,
    }
}

fn in_days(today: NaiveDate, days: i64) -> Option<NaiveDate> {
    today.checked_add_signed(Duration::days(days))
}

pub fn sample_goals(user_id: &str) -> Vec<Goal> {
    let today = Utc::now().date_naive();
    let goal = |n: u32, title: &str, category: &str, days: i64, progress: f64| Goal {
        id: format!("00000000-0000-4000-8000-1000000000{:02}", n),
        user_id: user_id.to_string(),
        title: title.to_string(),
        description: None,
        category: Some(category.to_string()),
        deadline: in_days(today, days),
        progress,
        is_completed: progress >= 1.0,
        progress_diary: Vec::new(),
    };

    vec![
        Goal {
            description: Some("Three runs a week, building up distance".to_string()),
            progress_diary: vec![
                "Ran 2k without stopping".to_string(),
                "First 3k run".to_string(),
            ],
            ..goal(1, "Run a 5k", "Health", 30, 0.6)
        },
        goal(2, "Read 12 books this year", "Learning", 200, 0.25),
        goal(3, "Set up an emergency fund", "Finance", 90, 1.0),
        goal(4, "Learn to cook five new dishes", "Lifestyle", 60, 0.4),
    ]
}

pub fn sample_quotes() -> Vec<Quote> {
    vec![
        Quote::new(
            "The secret of getting ahead is getting started.",
            "Mark Twain",
        ),
        Quote::new("Well begun is half done.", "Aristotle"),
        Quote::new(
            "It does not matter how slowly you go as long as you do not stop.",
            "Confucius",
        ),
        Quote::new(
            "A journey of a thousand miles begins with a single step.",
            "Lao Tzu",
        ),
    ]
}
