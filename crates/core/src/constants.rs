/// Progress value at which a goal counts as done
pub const PROGRESS_COMPLETE: f64 = 1.0;

/// Number of badges shown in the "recently earned" strip
pub const RECENT_BADGES_LIMIT: i64 = 3;

/// Upper bound on a single diary entry, in characters
pub const MAX_DIARY_ENTRY_CHARS: usize = 2000;
