//! Command dispatch. Every command returns a JSON value for stdout.

use std::sync::Arc;

use anyhow::{bail, Context};
use serde_json::{json, Value};

use goalpost_core::constants::{PROGRESS_COMPLETE, RECENT_BADGES_LIMIT};
use goalpost_core::errors::Error;
use goalpost_core::goals::NewGoal;
use goalpost_core::quotes::Quote;
use goalpost_core::users::{NewUser, User, UserUpdate};

use crate::cli::Commands;
use crate::main_lib::AppState;

pub struct CommandRunner {
    state: Arc<AppState>,
}

impl CommandRunner {
    pub fn new(state: Arc<AppState>) -> Self {
        CommandRunner { state }
    }

    fn user_by_name(&self, username: &str) -> anyhow::Result<User> {
        self.state
            .user_repository
            .get_by_username(username)?
            .ok_or_else(|| Error::UserNotFound(username.to_string()).into())
    }

    pub async fn run(&self, command: Commands) -> anyhow::Result<Value> {
        let state = &self.state;

        let output = match command {
            Commands::Init => json!({
                "database": state.storage.db_path(),
                "badges": state.badge_repository.all_badges()?,
            }),

            Commands::Register {
                username,
                email,
                password,
                picture,
            } => {
                let profile_picture_data = picture.map(read_picture).transpose()?;
                let user = state
                    .user_service
                    .register(NewUser {
                        id: None,
                        username,
                        email,
                        password,
                        profile_picture_data,
                    })
                    .await?;
                serde_json::to_value(user)?
            }

            Commands::Login { username, password } => {
                let user = state.user_service.login(&username, &password)?;
                json!({
                    "user": user,
                    "quote": state.quote_repository.random_one()?,
                })
            }

            Commands::Profile {
                user,
                new_username,
                email,
                password,
                picture,
                clear_picture,
            } => {
                let current = self.user_by_name(&user)?;
                let profile_picture_data = match (picture, clear_picture) {
                    (Some(path), _) => Some(Some(read_picture(path)?)),
                    (None, true) => Some(None),
                    (None, false) => None,
                };
                let updated = state
                    .user_service
                    .update_profile(
                        &current.id,
                        UserUpdate {
                            username: new_username,
                            email,
                            password,
                            profile_picture_data,
                        },
                    )
                    .await?;
                serde_json::to_value(updated)?
            }

            Commands::AddGoal {
                user,
                title,
                description,
                category,
                deadline,
                progress,
            } => {
                let owner = self.user_by_name(&user)?;
                let outcome = state
                    .goal_service
                    .create_goal(NewGoal {
                        user_id: owner.id,
                        title,
                        description,
                        category,
                        deadline,
                        progress,
                        ..Default::default()
                    })
                    .await?;
                serde_json::to_value(outcome)?
            }

            Commands::Progress {
                goal_id,
                progress,
                note,
            } => {
                let outcome = state
                    .goal_service
                    .record_progress(&goal_id, progress, note)
                    .await?;
                serde_json::to_value(outcome)?
            }

            Commands::Complete { goal_id, note } => {
                let outcome = state
                    .goal_service
                    .record_progress(&goal_id, PROGRESS_COMPLETE, note)
                    .await?;
                serde_json::to_value(outcome)?
            }

            Commands::Goals { user } => {
                let owner = self.user_by_name(&user)?;
                serde_json::to_value(state.goal_service.get_goals(&owner.id)?)?
            }

            Commands::DeleteGoal { goal_id } => {
                json!({ "deleted": state.goal_service.delete_goal(&goal_id).await? })
            }

            Commands::ClearGoals { user } => {
                let owner = self.user_by_name(&user)?;
                json!({ "deleted": state.goal_service.clear_goals(&owner.id).await? })
            }

            Commands::Badges { user } => {
                let owner = self.user_by_name(&user)?;
                json!({
                    "progress": state.badge_engine.progress(&owner.id)?,
                    "recent": state
                        .badge_repository
                        .recently_earned(&owner.id, RECENT_BADGES_LIMIT)?,
                })
            }

            Commands::CheckBadges { user } => {
                let owner = self.user_by_name(&user)?;
                json!({ "newBadges": state.badge_engine.check_and_award(&owner.id).await? })
            }

            Commands::Quote => serde_json::to_value(state.quote_repository.random_one()?)?,

            Commands::ImportQuotes { file } => {
                let raw = std::fs::read_to_string(&file)
                    .with_context(|| format!("reading quotes from {}", file))?;
                let quotes: Vec<Quote> = serde_json::from_str(&raw)
                    .with_context(|| format!("{} is not a JSON array of quotes", file))?;
                json!({ "imported": state.quote_repository.save_many(quotes).await? })
            }

            Commands::Wipe { yes } => {
                if !yes {
                    bail!("refusing to wipe all data without --yes");
                }
                json!({ "deleted": state.user_service.wipe_all_data().await? })
            }
        };

        Ok(output)
    }
}

fn read_picture(path: String) -> anyhow::Result<Vec<u8>> {
    std::fs::read(&path).with_context(|| format!("reading picture {}", path))
}
