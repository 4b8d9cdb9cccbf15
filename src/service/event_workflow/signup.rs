//! Interest and signup changes on published posts.

use std::collections::BTreeMap;

use crate::{
    data::guild_store::{Scope, EVENT_POSTS},
    error::{workflow::WorkflowError, AppError},
    model::event_post::{PublishedPost, RoleOption},
};

use super::EventWorkflow;

/// A member's role selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleChoice {
    /// Role ID, name, or `division/name`.
    Role(String),
    Withdraw,
}

/// Outcome of a role selection.
#[derive(Debug, Clone)]
pub struct Signup {
    pub post: PublishedPost,
    /// Role now held, `None` after a withdrawal.
    pub role: Option<RoleOption>,
    /// Role ID held before the change.
    pub previous: Option<String>,
}

type Posts = BTreeMap<String, PublishedPost>;

impl EventWorkflow {
    /// All published posts of a guild, oldest first.
    pub async fn list_posts(&self, guild_id: u64) -> Result<Vec<PublishedPost>, AppError> {
        let posts: Posts = self.store.get(Scope::Guild(guild_id), EVENT_POSTS).await?;
        let mut posts: Vec<PublishedPost> = posts.into_values().collect();
        posts.sort_by_key(|p| p.published_at);

        Ok(posts)
    }

    /// Gets a published post.
    ///
    /// # Returns
    /// - `Ok(PublishedPost)` - Stored record
    /// - `Err(WorkflowError::EventNotTracked)` - No post with this ID
    pub async fn get_post(&self, guild_id: u64, post_id: &str) -> Result<PublishedPost, AppError> {
        let mut posts: Posts = self.store.get(Scope::Guild(guild_id), EVENT_POSTS).await?;

        posts
            .remove(post_id)
            .ok_or_else(|| WorkflowError::EventNotTracked(post_id.to_string()).into())
    }

    /// Adds or removes `user_id` from the post's interested set.
    ///
    /// # Returns
    /// - `Ok((true, post))` - User is now interested
    /// - `Ok((false, post))` - User is no longer interested
    /// - `Err(WorkflowError::EventNotTracked)` - No post with this ID
    pub async fn toggle_interest(
        &self,
        guild_id: u64,
        post_id: &str,
        user_id: u64,
    ) -> Result<(bool, PublishedPost), AppError> {
        let (interested, mut post) = self
            .store
            .update(Scope::Guild(guild_id), EVENT_POSTS, |posts: &mut Posts| {
                let post = tracked(posts, post_id)?;
                let interested = if post.interested.remove(&user_id) {
                    false
                } else {
                    post.interested.insert(user_id);
                    true
                };
                Ok((interested, post.clone()))
            })
            .await?;

        self.refresh_public(&mut post).await;

        Ok((interested, post))
    }

    /// Signs `user_id` up for a role, or withdraws their signup.
    ///
    /// The capacity check counts the role's signups excluding the user's own, so picking
    /// the role already held never fails. Check and write happen in one store update.
    ///
    /// # Arguments
    /// - `guild_id` - Guild the post belongs to
    /// - `post_id` - Published post ID
    /// - `user_id` - Member making the choice
    /// - `choice` - Role to take, or `Withdraw`
    ///
    /// # Returns
    /// - `Ok(Signup)` - Updated post and the role now held
    /// - `Err(WorkflowError::RoleFull)` - Role at capacity; nothing changed
    /// - `Err(WorkflowError::UnknownRole)` - No role matches the choice
    /// - `Err(WorkflowError::EventNotTracked)` - No post with this ID
    pub async fn choose_role(
        &self,
        guild_id: u64,
        post_id: &str,
        user_id: u64,
        choice: RoleChoice,
    ) -> Result<Signup, AppError> {
        let mut signup = self
            .store
            .update(Scope::Guild(guild_id), EVENT_POSTS, |posts: &mut Posts| {
                let post = tracked(posts, post_id)?;

                let role = match &choice {
                    RoleChoice::Withdraw => None,
                    RoleChoice::Role(query) => {
                        let role = post
                            .find_role(query)
                            .cloned()
                            .ok_or_else(|| WorkflowError::UnknownRole(query.clone()))?;

                        if let Some(capacity) = role.capacity {
                            let current = post.occupancy_excluding(&role.id, user_id);
                            if current >= capacity as usize {
                                return Err(WorkflowError::RoleFull {
                                    role: role.name.clone(),
                                    current,
                                    capacity,
                                }
                                .into());
                            }
                        }
                        Some(role)
                    }
                };

                let previous = match &role {
                    Some(role) => post.signups.insert(user_id, role.id.clone()),
                    None => post.signups.remove(&user_id),
                };

                Ok(Signup {
                    post: post.clone(),
                    role,
                    previous,
                })
            })
            .await?;

        self.refresh_public(&mut signup.post).await;

        Ok(signup)
    }

    /// Deletes a published post and, best-effort, its rendered message.
    pub async fn delete_post(
        &self,
        guild_id: u64,
        post_id: &str,
        actor: u64,
    ) -> Result<PublishedPost, AppError> {
        let post = self
            .store
            .update(Scope::Guild(guild_id), EVENT_POSTS, |posts: &mut Posts| {
                posts
                    .remove(post_id)
                    .ok_or_else(|| WorkflowError::EventNotTracked(post_id.to_string()).into())
            })
            .await?;

        if let Some(message) = post.message {
            if let Err(e) = self.renderer.delete_messages(&[message]).await {
                self.report(&format!("Failed to delete message of post {}", post.id), &e)
                    .await;
            }
        }

        tracing::info!("Post {} deleted by {}", post.id, actor);
        self.log
            .append(&format!("Deleted event post {} '{}' (by {})", post.id, post.title, actor))
            .await;

        Ok(post)
    }

    /// Stores the rendered message reference of a post that still exists.
    pub(super) async fn store_message_ref(&self, post: &PublishedPost) -> Result<(), AppError> {
        self.store
            .update(
                Scope::Guild(post.guild_id),
                EVENT_POSTS,
                |posts: &mut Posts| {
                    if let Some(stored) = posts.get_mut(&post.id) {
                        stored.message = post.message;
                    }
                    Ok(())
                },
            )
            .await
    }
}

fn tracked<'a>(posts: &'a mut Posts, post_id: &str) -> Result<&'a mut PublishedPost, WorkflowError> {
    posts
        .get_mut(post_id)
        .ok_or_else(|| WorkflowError::EventNotTracked(post_id.to_string()))
}
