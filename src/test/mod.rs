#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        comment::{model::InsertComment, repository::CommentRepository, schema::CommentEntity},
        friend::{repository::FriendRepository, schema::FriendLinkEntity},
        post::{
            model::{InsertPost, toggle_like},
            repository::PostRepository,
            schema::PostEntity,
        },
        user::{
            model::{InsertUser, UpdateUser},
            repository::UserRepository,
            schema::{Status, UserEntity, UserRole},
        },
    },
};

#[derive(Default)]
struct State {
    clock: i64,
    users: HashMap<Uuid, UserEntity>,
    posts: HashMap<Uuid, PostEntity>,
    links: Vec<FriendLinkEntity>,
    comments: HashMap<Uuid, CommentEntity>,
}

impl State {
    /// Strictly increasing timestamps so "newest first" is deterministic.
    fn tick(&mut self) -> DateTime<Utc> {
        self.clock += 1;
        DateTime::<Utc>::UNIX_EPOCH + chrono::Duration::milliseconds(self.clock)
    }

    fn with_owner(&self, mut post: PostEntity) -> PostEntity {
        if let Some(user) = self.users.get(&post.user_id) {
            post.username = user.username.clone();
        }
        post
    }

    fn newest_first(&self, filter: impl Fn(&PostEntity) -> bool) -> Vec<PostEntity> {
        let mut posts: Vec<PostEntity> =
            self.posts.values().filter(|p| filter(p)).cloned().map(|p| self.with_owner(p)).collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        posts
    }

    fn username_taken(&self, username: &str, except: Option<&Uuid>) -> bool {
        self.users
            .values()
            .any(|u| Some(&u.id) != except && u.username.eq_ignore_ascii_case(username))
    }

    fn email_taken(&self, email: &str, except: Option<&Uuid>) -> bool {
        self.users.values().any(|u| Some(&u.id) != except && u.email.eq_ignore_ascii_case(email))
    }
}

fn unique_violation(constraint: &str) -> error::SystemError {
    error::SystemError::Conflict(Some(error::DbErrorMeta {
        code: Some("23505".to_string()),
        constraint: Some(constraint.to_string()),
        message: format!("duplicate key value violates unique constraint \"{constraint}\""),
    }))
}

/// In-memory stand-in for every repository, shared by the service tests.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    fn insert_user(&self, username: &str, role: UserRole) -> UserEntity {
        let mut state = self.state();
        let now = state.tick();
        let user = UserEntity {
            id: Uuid::now_v7(),
            username: username.to_string(),
            email: format!("{username}@example.com"),
            hash_password: String::new(),
            role,
            first_name: username.to_string(),
            last_name: "Tester".to_string(),
            bio: None,
            status: Status::Active,
            created_at: now,
            updated_at: now,
        };
        state.users.insert(user.id, user.clone());
        user
    }

    pub fn seed_user(&self, username: &str) -> UserEntity {
        self.insert_user(username, UserRole::User)
    }

    pub fn seed_admin(&self, username: &str) -> UserEntity {
        self.insert_user(username, UserRole::Admin)
    }

    /// Changes only the user row, posts are left alone.
    pub fn set_user_status(&self, id: &Uuid, status: Status) {
        if let Some(user) = self.state().users.get_mut(id) {
            user.status = status;
        }
    }

    pub fn post_status(&self, id: &Uuid) -> Option<Status> {
        self.state().posts.get(id).map(|p| p.status)
    }

    pub fn set_post_status(&self, id: &Uuid, status: Status) {
        if let Some(post) = self.state().posts.get_mut(id) {
            post.status = status;
        }
    }

    pub fn post_likes(&self, id: &Uuid) -> Option<i32> {
        self.state().posts.get(id).map(|p| p.likes)
    }

    /// Acceptance flag of the directed `(first, second)` link, if any.
    pub fn link_accepted(&self, first: &Uuid, second: &Uuid) -> Option<bool> {
        self.state()
            .links
            .iter()
            .find(|l| l.first_user_id == *first && l.second_user_id == *second)
            .map(|l| l.is_accepted)
    }

    /// Links between `a` and `b` in either direction.
    pub fn link_count(&self, a: &Uuid, b: &Uuid) -> usize {
        self.state()
            .links
            .iter()
            .filter(|l| {
                (l.first_user_id == *a && l.second_user_id == *b)
                    || (l.first_user_id == *b && l.second_user_id == *a)
            })
            .count()
    }
}

#[async_trait::async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<UserEntity>, error::SystemError> {
        Ok(self.state().users.get(id).cloned())
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserEntity>, error::SystemError> {
        let state = self.state();
        Ok(state.users.values().find(|u| u.username.eq_ignore_ascii_case(username)).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<UserEntity>, error::SystemError> {
        let state = self.state();
        Ok(ids.iter().filter_map(|id| state.users.get(id).cloned()).collect())
    }

    async fn find_all(&self) -> Result<Vec<UserEntity>, error::SystemError> {
        let mut users: Vec<UserEntity> = self.state().users.values().cloned().collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }

    async fn create(&self, user: &InsertUser) -> Result<UserEntity, error::SystemError> {
        let mut state = self.state();
        if state.username_taken(&user.username, None) {
            return Err(unique_violation("users_username_key"));
        }
        if state.email_taken(&user.email, None) {
            return Err(unique_violation("users_email_key"));
        }

        let now = state.tick();
        let entity = UserEntity {
            id: Uuid::now_v7(),
            username: user.username.clone(),
            email: user.email.clone(),
            hash_password: user.hash_password.clone(),
            role: UserRole::User,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            bio: None,
            status: Status::Active,
            created_at: now,
            updated_at: now,
        };
        state.users.insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn update(&self, id: &Uuid, user: &UpdateUser) -> Result<UserEntity, error::SystemError> {
        let mut state = self.state();
        if user.email.as_deref().is_some_and(|email| state.email_taken(email, Some(id))) {
            return Err(unique_violation("users_email_key"));
        }

        let now = state.tick();
        let entity = state
            .users
            .get_mut(id)
            .ok_or_else(|| error::SystemError::user_not_found(format!("User not found: {id}")))?;

        if let Some(email) = &user.email {
            entity.email = email.clone();
        }
        if let Some(first_name) = &user.first_name {
            entity.first_name = first_name.clone();
        }
        if let Some(last_name) = &user.last_name {
            entity.last_name = last_name.clone();
        }
        if let Some(bio) = &user.bio {
            entity.bio = bio.clone();
        }
        entity.updated_at = now;
        Ok(entity.clone())
    }

    async fn set_status_cascade(
        &self,
        id: &Uuid,
        status: Status,
    ) -> Result<UserEntity, error::SystemError> {
        let mut state = self.state();
        let now = state.tick();

        let user = state
            .users
            .get_mut(id)
            .ok_or_else(|| error::SystemError::user_not_found(format!("User not found: {id}")))?;
        user.status = status;
        user.updated_at = now;
        let user = user.clone();

        for post in state.posts.values_mut().filter(|p| p.user_id == *id) {
            post.status = status;
            post.updated_at = now;
        }
        Ok(user)
    }
}

#[async_trait::async_trait]
impl FriendRepository for MemoryStore {
    async fn find_link(
        &self,
        first_user_id: &Uuid,
        second_user_id: &Uuid,
    ) -> Result<Option<FriendLinkEntity>, error::SystemError> {
        let state = self.state();
        Ok(state
            .links
            .iter()
            .find(|l| l.first_user_id == *first_user_id && l.second_user_id == *second_user_id)
            .cloned())
    }

    async fn create_link_if_absent(
        &self,
        first_user_id: &Uuid,
        second_user_id: &Uuid,
    ) -> Result<bool, error::SystemError> {
        let mut state = self.state();
        let exists = state
            .links
            .iter()
            .any(|l| l.first_user_id == *first_user_id && l.second_user_id == *second_user_id);
        if exists {
            return Ok(false);
        }

        let now = state.tick();
        state.links.push(FriendLinkEntity {
            id: Uuid::now_v7(),
            first_user_id: *first_user_id,
            second_user_id: *second_user_id,
            is_accepted: false,
            created_at: now,
        });
        Ok(true)
    }

    async fn accept_link(
        &self,
        first_user_id: &Uuid,
        second_user_id: &Uuid,
    ) -> Result<Option<FriendLinkEntity>, error::SystemError> {
        let mut state = self.state();
        let link = state
            .links
            .iter_mut()
            .find(|l| l.first_user_id == *first_user_id && l.second_user_id == *second_user_id);

        Ok(link.map(|l| {
            l.is_accepted = true;
            l.clone()
        }))
    }

    async fn list_links_where_first(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendLinkEntity>, error::SystemError> {
        let state = self.state();
        Ok(state.links.iter().filter(|l| l.first_user_id == *user_id).cloned().collect())
    }

    async fn list_links_where_second(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendLinkEntity>, error::SystemError> {
        let state = self.state();
        Ok(state.links.iter().filter(|l| l.second_user_id == *user_id).cloned().collect())
    }
}

#[async_trait::async_trait]
impl PostRepository for MemoryStore {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<PostEntity>, error::SystemError> {
        let state = self.state();
        Ok(state.posts.get(id).cloned().map(|p| state.with_owner(p)))
    }

    async fn find_by_owner(&self, user_id: &Uuid) -> Result<Vec<PostEntity>, error::SystemError> {
        Ok(self.state().newest_first(|p| p.user_id == *user_id))
    }

    async fn find_by_owners_with_status(
        &self,
        user_ids: &[Uuid],
        status: Status,
    ) -> Result<Vec<PostEntity>, error::SystemError> {
        Ok(self.state().newest_first(|p| p.status == status && user_ids.contains(&p.user_id)))
    }

    async fn find_all_with_status(
        &self,
        status: Status,
    ) -> Result<Vec<PostEntity>, error::SystemError> {
        Ok(self.state().newest_first(|p| p.status == status))
    }

    async fn create(&self, post: &InsertPost) -> Result<PostEntity, error::SystemError> {
        let mut state = self.state();
        let now = state.tick();
        let entity = PostEntity {
            id: Uuid::now_v7(),
            user_id: post.user_id,
            username: String::new(),
            caption: post.caption.clone(),
            likes: 0,
            liked_users: Vec::new(),
            status: Status::Active,
            created_at: now,
            updated_at: now,
        };
        state.posts.insert(entity.id, entity.clone());
        Ok(state.with_owner(entity))
    }

    async fn update_caption(
        &self,
        id: &Uuid,
        caption: &str,
    ) -> Result<Option<PostEntity>, error::SystemError> {
        let mut state = self.state();
        let now = state.tick();
        let updated = state.posts.get_mut(id).map(|p| {
            p.caption = caption.to_string();
            p.updated_at = now;
            p.clone()
        });
        Ok(updated.map(|p| state.with_owner(p)))
    }

    async fn set_status(
        &self,
        id: &Uuid,
        status: Status,
    ) -> Result<Option<PostEntity>, error::SystemError> {
        let mut state = self.state();
        let now = state.tick();
        let updated = state.posts.get_mut(id).map(|p| {
            p.status = status;
            p.updated_at = now;
            p.clone()
        });
        Ok(updated.map(|p| state.with_owner(p)))
    }

    async fn toggle_like(
        &self,
        id: &Uuid,
        username: &str,
    ) -> Result<Option<PostEntity>, error::SystemError> {
        let mut state = self.state();
        let now = state.tick();
        let updated = state.posts.get_mut(id).map(|p| {
            let next = toggle_like(&p.liked_users, username);
            p.likes = next.likes;
            p.liked_users = next.liked_users;
            p.updated_at = now;
            p.clone()
        });
        Ok(updated.map(|p| state.with_owner(p)))
    }
}

#[async_trait::async_trait]
impl CommentRepository for MemoryStore {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<CommentEntity>, error::SystemError> {
        Ok(self.state().comments.get(id).cloned())
    }

    async fn find_by_post_with_status(
        &self,
        post_id: &Uuid,
        status: Status,
    ) -> Result<Vec<CommentEntity>, error::SystemError> {
        let mut comments: Vec<CommentEntity> = self
            .state()
            .comments
            .values()
            .filter(|c| c.post_id == *post_id && c.status == status)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(comments)
    }

    async fn create(&self, comment: &InsertComment) -> Result<CommentEntity, error::SystemError> {
        let mut state = self.state();
        let now = state.tick();
        let entity = CommentEntity {
            id: Uuid::now_v7(),
            post_id: comment.post_id,
            user_id: comment.user_id,
            username: comment.username.clone(),
            message: comment.message.clone(),
            status: Status::Active,
            created_at: now,
        };
        state.comments.insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn set_status(
        &self,
        id: &Uuid,
        status: Status,
    ) -> Result<Option<CommentEntity>, error::SystemError> {
        let mut state = self.state();
        Ok(state.comments.get_mut(id).map(|c| {
            c.status = status;
            c.clone()
        }))
    }
}
