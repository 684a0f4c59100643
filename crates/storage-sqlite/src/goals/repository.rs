use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use std::sync::Arc;

use goalpost_core::errors::{Error, Result, ValidationError};
use goalpost_core::goals::{Goal, GoalChange, GoalRepositoryTrait};

use super::model::GoalDB;
use crate::db::{read_snapshot, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::goal;

pub struct GoalRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl GoalRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        GoalRepository { pool, writer }
    }

    fn find(conn: &mut SqliteConnection, goal_id: &str) -> Result<GoalDB> {
        goal::table
            .find(goal_id)
            .select(GoalDB::as_select())
            .first(conn)
            .optional()
            .into_core()?
            .ok_or_else(|| Error::GoalNotFound(goal_id.to_string()))
    }
}

#[async_trait]
impl GoalRepositoryTrait for GoalRepository {
    fn list_goals(&self, user_id: Option<&str>) -> Result<Vec<Goal>> {
        read_snapshot(&self.pool, |conn| {
            let mut query = goal::table.select(GoalDB::as_select()).into_boxed();
            if let Some(user_id) = user_id {
                query = query.filter(goal::user_id.eq(user_id));
            }
            // Open goals first, then soonest deadline (undated last), then title.
            let goals_db = query
                .order((
                    goal::is_completed.asc(),
                    goal::deadline.is_null().asc(),
                    goal::deadline.asc(),
                    goal::title.asc(),
                ))
                .load::<GoalDB>(conn)
                .into_core()?;
            goals_db.into_iter().map(Goal::try_from).collect()
        })
    }

    fn get_goal(&self, goal_id: &str) -> Result<Goal> {
        read_snapshot(&self.pool, |conn| Goal::try_from(Self::find(conn, goal_id)?))
    }

    /// Stores the goal as given. Completion is never derived from progress here.
    async fn upsert_goal(&self, goal_update: Goal) -> Result<Goal> {
        if goal_update.title.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "title".to_string(),
            )));
        }
        let goal_db = GoalDB::try_from(goal_update)?;

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Goal> {
                let stored = diesel::insert_into(goal::table)
                    .values(&goal_db)
                    .on_conflict(goal::id)
                    .do_update()
                    .set(&goal_db)
                    .returning(GoalDB::as_returning())
                    .get_result(conn)
                    .into_core()?;
                Goal::try_from(stored)
            })
            .await
    }

    async fn modify_goal(&self, goal_id: &str, change: GoalChange) -> Result<Goal> {
        let goal_id = goal_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Goal> {
                let mut goal = Goal::try_from(Self::find(conn, &goal_id)?)?;
                change(&mut goal)?;
                if goal.id != goal_id {
                    return Err(Error::Validation(ValidationError::InvalidInput(
                        "goal id cannot be changed".to_string(),
                    )));
                }
                if goal.title.trim().is_empty() {
                    return Err(Error::Validation(ValidationError::MissingField(
                        "title".to_string(),
                    )));
                }

                let goal_db = GoalDB::try_from(goal)?;
                let stored = diesel::update(goal::table.find(goal_id.as_str()))
                    .set(&goal_db)
                    .returning(GoalDB::as_returning())
                    .get_result(conn)
                    .into_core()?;
                Goal::try_from(stored)
            })
            .await
    }

    async fn delete_goal(&self, goal_id: &str) -> Result<usize> {
        let goal_id = goal_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                diesel::delete(goal::table.find(goal_id))
                    .execute(conn)
                    .into_core()
            })
            .await
    }

    async fn delete_all(&self, user_id: Option<&str>) -> Result<usize> {
        let user_id = user_id.map(str::to_string);
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                match user_id {
                    Some(user_id) => diesel::delete(goal::table.filter(goal::user_id.eq(user_id)))
                        .execute(conn)
                        .into_core(),
                    None => diesel::delete(goal::table).execute(conn).into_core(),
                }
            })
            .await
    }

    fn count_completed(&self, user_id: &str) -> Result<i64> {
        read_snapshot(&self.pool, |conn| {
            goal::table
                .filter(goal::user_id.eq(user_id))
                .filter(goal::is_completed.eq(true))
                .count()
                .get_result::<i64>(conn)
                .into_core()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{SeedOptions, Storage};
    use crate::users::UserRepository;
    use crate::badges::BadgeRepository;
    use chrono::NaiveDate;
    use goalpost_core::badges::BadgeEngine;
    use goalpost_core::goals::{GoalService, GoalServiceTrait};
    use goalpost_core::users::{NewUser, UserRepositoryTrait};
    use tempfile::tempdir;

    async fn create_test_repository() -> (GoalRepository, UserRepository, tempfile::TempDir) {
        let temp_dir = tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");
        let storage = Storage::open(&db_path.to_string_lossy(), &SeedOptions::default())
            .expect("Failed to open storage");
        let goals = GoalRepository::new(storage.pool(), storage.writer());
        let users = UserRepository::new(storage.pool(), storage.writer());
        (goals, users, temp_dir)
    }

    async fn create_test_user(users: &UserRepository, username: &str) -> String {
        users
            .create(NewUser {
                username: username.to_string(),
                email: format!("{}@example.com", username),
                password: "pw".to_string(),
                ..Default::default()
            })
            .await
            .unwrap()
            .id
    }

    fn test_goal(id: &str, user_id: &str, title: &str) -> Goal {
        Goal {
            id: id.to_string(),
            user_id: user_id.to_string(),
            title: title.to_string(),
            description: None,
            category: None,
            deadline: None,
            progress: 0.0,
            is_completed: false,
            progress_diary: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_upsert_inserts_then_updates() {
        let (repo, users, _temp_dir) = create_test_repository().await;
        let user_id = create_test_user(&users, "ana").await;

        let mut goal = test_goal("g1", &user_id, "Run a 5k");
        goal.description = Some("Three runs a week".to_string());
        goal.progress_diary = vec!["first run".to_string()];
        let stored = repo.upsert_goal(goal.clone()).await.unwrap();
        assert_eq!(stored, goal);

        goal.description = None;
        goal.progress = 0.4;
        goal.progress_diary.push("second run".to_string());
        repo.upsert_goal(goal.clone()).await.unwrap();

        let loaded = repo.get_goal("g1").unwrap();
        assert_eq!(loaded, goal);
        assert_eq!(repo.list_goals(None).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_upsert_does_not_derive_completion() {
        let (repo, users, _temp_dir) = create_test_repository().await;
        let user_id = create_test_user(&users, "ana").await;

        let mut goal = test_goal("g1", &user_id, "Full but open");
        goal.progress = 1.0;
        repo.upsert_goal(goal.clone()).await.unwrap();
        assert!(!repo.get_goal("g1").unwrap().is_completed);
        assert_eq!(repo.count_completed(&user_id).unwrap(), 0);

        goal.is_completed = true;
        repo.upsert_goal(goal).await.unwrap();
        assert_eq!(repo.count_completed(&user_id).unwrap(), 1);
    }

    #[tokio::test]
    async fn test_upsert_rejects_blank_title_and_unknown_user() {
        let (repo, users, _temp_dir) = create_test_repository().await;
        let user_id = create_test_user(&users, "ana").await;

        let err = repo
            .upsert_goal(test_goal("g1", &user_id, "   "))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        assert!(repo
            .upsert_goal(test_goal("g2", "nobody", "Orphan"))
            .await
            .is_err());
        assert!(repo.list_goals(None).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_missing_goal() {
        let (repo, _users, _temp_dir) = create_test_repository().await;
        assert!(matches!(
            repo.get_goal("missing"),
            Err(Error::GoalNotFound(id)) if id == "missing"
        ));
    }

    #[tokio::test]
    async fn test_list_goals_order_and_filter() {
        let (repo, users, _temp_dir) = create_test_repository().await;
        let ana = create_test_user(&users, "ana").await;
        let bob = create_test_user(&users, "bob").await;

        let mut done = test_goal("g1", &ana, "Already done");
        done.is_completed = true;
        done.progress = 1.0;
        let undated = test_goal("g2", &ana, "Someday");
        let mut later = test_goal("g3", &ana, "Later");
        later.deadline = NaiveDate::from_ymd_opt(2030, 6, 1);
        let mut sooner = test_goal("g4", &ana, "Sooner");
        sooner.deadline = NaiveDate::from_ymd_opt(2030, 1, 1);
        let other = test_goal("g5", &bob, "Not mine");

        for goal in [done, undated, later, sooner, other] {
            repo.upsert_goal(goal).await.unwrap();
        }

        let ids: Vec<String> = repo
            .list_goals(Some(&ana))
            .unwrap()
            .into_iter()
            .map(|g| g.id)
            .collect();
        assert_eq!(ids, vec!["g4", "g3", "g2", "g1"]);
        assert_eq!(repo.list_goals(None).unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_deletes() {
        let (repo, users, _temp_dir) = create_test_repository().await;
        let ana = create_test_user(&users, "ana").await;
        let bob = create_test_user(&users, "bob").await;
        for (id, owner) in [("g1", &ana), ("g2", &ana), ("g3", &ana), ("g4", &bob)] {
            repo.upsert_goal(test_goal(id, owner, id)).await.unwrap();
        }

        assert_eq!(repo.delete_goal("g1").await.unwrap(), 1);
        assert_eq!(repo.delete_goal("g1").await.unwrap(), 0);
        assert_eq!(repo.delete_all(Some(&ana)).await.unwrap(), 2);
        assert_eq!(repo.list_goals(Some(&bob)).unwrap().len(), 1);
        assert_eq!(repo.delete_all(None).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_goals_cascade_with_their_user() {
        let (repo, users, _temp_dir) = create_test_repository().await;
        let ana = create_test_user(&users, "ana").await;
        repo.upsert_goal(test_goal("g1", &ana, "Cascade me"))
            .await
            .unwrap();

        users.delete_all().await.unwrap();
        assert!(repo.list_goals(None).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_modify_goal_applies_change_in_place() {
        let (repo, users, _temp_dir) = create_test_repository().await;
        let user_id = create_test_user(&users, "ana").await;
        let mut goal = test_goal("g1", &user_id, "Learn piano");
        goal.category = Some("music".to_string());
        repo.upsert_goal(goal).await.unwrap();

        let updated = repo
            .modify_goal(
                "g1",
                Box::new(|goal: &mut Goal| {
                    goal.progress = 0.25;
                    goal.progress_diary.push("scales".to_string());
                    Ok(())
                }),
            )
            .await
            .unwrap();
        assert_eq!(updated.progress, 0.25);
        assert_eq!(updated.category.as_deref(), Some("music"));
        assert_eq!(repo.get_goal("g1").unwrap(), updated);
    }

    #[tokio::test]
    async fn test_modify_goal_failures_leave_row_untouched() {
        let (repo, users, _temp_dir) = create_test_repository().await;
        let user_id = create_test_user(&users, "ana").await;
        let original = repo
            .upsert_goal(test_goal("g1", &user_id, "Stay put"))
            .await
            .unwrap();

        let err = repo
            .modify_goal("missing", Box::new(|_: &mut Goal| Ok(())))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::GoalNotFound(id) if id == "missing"));

        let err = repo
            .modify_goal(
                "g1",
                Box::new(|goal: &mut Goal| {
                    goal.progress_diary.push("never stored".to_string());
                    Err(Error::Unexpected("rejected".to_string()))
                }),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Unexpected(_)));

        let err = repo
            .modify_goal(
                "g1",
                Box::new(|goal: &mut Goal| {
                    goal.id = "g2".to_string();
                    Ok(())
                }),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        assert_eq!(repo.get_goal("g1").unwrap(), original);
        assert_eq!(repo.list_goals(None).unwrap().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_modifications_are_not_lost() {
        let (repo, users, _temp_dir) = create_test_repository().await;
        let user_id = create_test_user(&users, "ana").await;
        repo.upsert_goal(test_goal("g1", &user_id, "Write daily"))
            .await
            .unwrap();
        let repo = Arc::new(repo);

        let mut handles = Vec::new();
        for i in 0..8 {
            let repo = Arc::clone(&repo);
            handles.push(tokio::spawn(async move {
                repo.modify_goal(
                    "g1",
                    Box::new(move |goal: &mut Goal| {
                        goal.progress += 0.1;
                        goal.progress_diary.push(format!("entry {}", i));
                        Ok(())
                    }),
                )
                .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let goal = repo.get_goal("g1").unwrap();
        let mut entries = goal.progress_diary.clone();
        entries.sort();
        let expected: Vec<String> = (0..8).map(|i| format!("entry {}", i)).collect();
        assert_eq!(entries, expected);
        assert!((goal.progress - 0.8).abs() < 1e-9);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_record_progress_keeps_every_diary_entry() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let storage =
            Storage::open(&db_path.to_string_lossy(), &SeedOptions::default()).unwrap();
        let users = UserRepository::new(storage.pool(), storage.writer());
        let goals = Arc::new(GoalRepository::new(storage.pool(), storage.writer()));
        let badges = Arc::new(BadgeRepository::new(storage.pool(), storage.writer()));
        let engine = Arc::new(BadgeEngine::new(goals.clone(), badges));
        let service = Arc::new(GoalService::new(goals.clone(), engine));
        let user_id = create_test_user(&users, "ana").await;
        goals
            .upsert_goal(test_goal("g1", &user_id, "Journal"))
            .await
            .unwrap();

        let rounds = 10;
        let tasks = 4;
        for round in 0..rounds {
            let mut handles = Vec::new();
            for task in 0..tasks {
                let service = Arc::clone(&service);
                handles.push(tokio::spawn(async move {
                    service
                        .record_progress("g1", 0.1, Some(format!("r{} e{}", round, task)))
                        .await
                }));
            }
            for handle in handles {
                handle.await.unwrap().unwrap();
            }

            let diary = goals.get_goal("g1").unwrap().progress_diary;
            assert_eq!(diary.len(), (round + 1) * tasks, "round {}", round);
            for task in 0..tasks {
                assert!(diary.contains(&format!("r{} e{}", round, task)));
            }
        }

        let outcome = service
            .record_progress("g1", 1.0, Some("done".to_string()))
            .await
            .unwrap();
        assert!(outcome.goal.is_completed);
        assert_eq!(outcome.goal.progress_diary.len(), rounds * tasks + 1);
        assert_eq!(outcome.new_badges.len(), 1);
    }
}
