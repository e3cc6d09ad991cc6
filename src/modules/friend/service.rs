use log::info;
use std::collections::HashSet;
use std::sync::Arc;

use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        friend::{model::FriendResponse, repository::FriendRepository, schema::FriendLinkEntity},
        user::{
            model::UserResponse,
            repository::UserRepository,
            schema::{Status, UserEntity},
            service::{find_user_by_username, resolve_current_user},
        },
        visibility::{Audience, is_visible},
    },
};

#[derive(Clone)]
pub struct FriendService<F, U>
where
    F: FriendRepository + Send + Sync,
    U: UserRepository + Send + Sync,
{
    friend_repo: Arc<F>,
    user_repo: Arc<U>,
}

impl<F, U> FriendService<F, U>
where
    F: FriendRepository + Send + Sync,
    U: UserRepository + Send + Sync,
{
    pub fn with_dependencies(friend_repo: Arc<F>, user_repo: Arc<U>) -> Self {
        info!("FriendService initialized with dependencies");
        FriendService { friend_repo, user_repo }
    }

    pub fn user_repo(&self) -> &U {
        self.user_repo.as_ref()
    }

    /// Both directed links between `a` and `b`, as `((a, b), (b, a))`.
    pub async fn links_between(
        &self,
        a: &Uuid,
        b: &Uuid,
    ) -> Result<(Option<FriendLinkEntity>, Option<FriendLinkEntity>), error::SystemError> {
        tokio::try_join!(self.friend_repo.find_link(a, b), self.friend_repo.find_link(b, a))
    }

    pub async fn are_friends(&self, a: &Uuid, b: &Uuid) -> Result<bool, error::SystemError> {
        let (forward, backward) = self.links_between(a, b).await?;
        Ok(forward.is_some_and(|l| l.is_accepted) || backward.is_some_and(|l| l.is_accepted))
    }

    pub async fn audience(&self, viewer: &Uuid, owner: &Uuid) -> Result<Audience, error::SystemError> {
        if viewer == owner {
            return Ok(Audience::Owner);
        }
        if self.are_friends(viewer, owner).await? {
            return Ok(Audience::Friend);
        }
        Ok(Audience::Stranger)
    }

    /// Applies the visibility policy, only consulting the friend graph when the
    /// status makes the relation matter.
    pub async fn can_view(
        &self,
        viewer: &Uuid,
        owner: &Uuid,
        status: Status,
    ) -> Result<bool, error::SystemError> {
        match status {
            Status::Active => Ok(true),
            Status::Inactive => Ok(false),
            Status::Closed => Ok(is_visible(status, self.audience(viewer, owner).await?)),
        }
    }

    pub async fn send_request(
        &self,
        sender_id: Uuid,
        username: &str,
    ) -> Result<FriendResponse, error::SystemError> {
        let sender = resolve_current_user(self.user_repo.as_ref(), &sender_id).await?;
        let target = self.find_reachable_user(username).await?;

        if sender.id == target.id {
            return Err(error::SystemError::bad_request("Cannot send friend request to yourself"));
        }

        if self.friend_repo.create_link_if_absent(&sender.id, &target.id).await? {
            info!("Sending Friend Request from {} to {}", sender.username, target.username);
        }

        Ok(FriendResponse::from(target))
    }

    /// Accepts the request `requester -> accepter`. Only the original sender's
    /// link can be accepted; a link the accepter sent themselves does not count.
    pub async fn accept_request(
        &self,
        accepter_id: Uuid,
        username: &str,
    ) -> Result<FriendResponse, error::SystemError> {
        let accepter = resolve_current_user(self.user_repo.as_ref(), &accepter_id).await?;
        let requester = self.find_reachable_user(username).await?;

        self.friend_repo.accept_link(&requester.id, &accepter.id).await?.ok_or_else(|| {
            error::SystemError::friend_request_not_found(format!(
                "Friend Request from {} to {} not found",
                requester.username, accepter.username
            ))
        })?;

        info!("Accepted Friend Request from {} to {}", requester.username, accepter.username);
        Ok(FriendResponse::from(requester))
    }

    /// Union of the accepted links in both directions, first occurrence wins.
    pub async fn friends_of(&self, user_id: &Uuid) -> Result<Vec<UserEntity>, error::SystemError> {
        let (sent, received) = tokio::try_join!(
            self.friend_repo.list_links_where_first(user_id),
            self.friend_repo.list_links_where_second(user_id),
        )?;

        let ids = sent
            .iter()
            .filter(|l| l.is_accepted)
            .map(|l| l.second_user_id)
            .chain(received.iter().filter(|l| l.is_accepted).map(|l| l.first_user_id));

        self.load_users(ids).await
    }

    pub async fn friends(&self, user_id: Uuid) -> Result<Vec<FriendResponse>, error::SystemError> {
        let user = resolve_current_user(self.user_repo.as_ref(), &user_id).await?;
        info!("Getting friends of current user: {}", user.username);
        let friends = self.friends_of(&user.id).await?;
        Ok(friends.into_iter().map(FriendResponse::from).collect())
    }

    /// Another user's friend list, shown to that user and their friends only.
    pub async fn friends_of_user(
        &self,
        viewer_id: Uuid,
        username: &str,
    ) -> Result<Vec<FriendResponse>, error::SystemError> {
        let viewer = resolve_current_user(self.user_repo.as_ref(), &viewer_id).await?;
        let target = self.find_reachable_user(username).await?;

        if viewer.id != target.id && !self.are_friends(&viewer.id, &target.id).await? {
            return Err(error::SystemError::forbidden(format!(
                "Friends of {} are visible only to their friends",
                target.username
            )));
        }

        info!("Getting friends of user: {}", target.username);
        let friends = self.friends_of(&target.id).await?;
        Ok(friends.into_iter().map(FriendResponse::from).collect())
    }

    pub async fn sent_requests(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<FriendResponse>, error::SystemError> {
        let user = resolve_current_user(self.user_repo.as_ref(), &user_id).await?;
        let links = self.friend_repo.list_links_where_first(&user.id).await?;

        info!("Getting sent friend requests of user: {}", user.username);
        let users = self
            .load_users(links.iter().filter(|l| !l.is_accepted).map(|l| l.second_user_id))
            .await?;
        Ok(users.into_iter().map(FriendResponse::from).collect())
    }

    pub async fn received_requests(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<FriendResponse>, error::SystemError> {
        let user = resolve_current_user(self.user_repo.as_ref(), &user_id).await?;
        let links = self.friend_repo.list_links_where_second(&user.id).await?;

        info!("Getting received friend requests of user: {}", user.username);
        let users = self
            .load_users(links.iter().filter(|l| !l.is_accepted).map(|l| l.first_user_id))
            .await?;
        Ok(users.into_iter().map(FriendResponse::from).collect())
    }

    /// Profile lookup under the visibility policy. Hidden profiles are
    /// reported exactly like missing ones.
    pub async fn view_user(
        &self,
        viewer_id: Uuid,
        username: &str,
    ) -> Result<UserResponse, error::SystemError> {
        let viewer = resolve_current_user(self.user_repo.as_ref(), &viewer_id).await?;
        let target = find_user_by_username(self.user_repo.as_ref(), username).await?;

        if !self.can_view(&viewer.id, &target.id, target.status).await? {
            return Err(error::SystemError::user_not_found(format!("User not found: {username}")));
        }

        Ok(UserResponse::from(target))
    }

    /// The user directory as `viewer_id` may see it: everyone else, with
    /// `Closed` accounts limited to friends.
    pub async fn list_users(&self, viewer_id: Uuid) -> Result<Vec<UserResponse>, error::SystemError> {
        let viewer = resolve_current_user(self.user_repo.as_ref(), &viewer_id).await?;
        let (users, friends) =
            tokio::try_join!(self.user_repo.find_all(), self.friends_of(&viewer.id))?;
        let friend_ids: HashSet<Uuid> = friends.into_iter().map(|u| u.id).collect();

        info!("Listing users for {}", viewer.username);
        Ok(users
            .into_iter()
            .filter(|u| u.id != viewer.id)
            .filter(|u| {
                let audience =
                    if friend_ids.contains(&u.id) { Audience::Friend } else { Audience::Stranger };
                is_visible(u.status, audience)
            })
            .map(UserResponse::from)
            .collect())
    }

    async fn find_reachable_user(&self, username: &str) -> Result<UserEntity, error::SystemError> {
        let user = find_user_by_username(self.user_repo.as_ref(), username).await?;
        if user.status == Status::Inactive {
            return Err(error::SystemError::user_not_found(format!("User not found: {username}")));
        }
        Ok(user)
    }

    /// Fetches users keeping the order of `ids`, dropping repeats and
    /// deactivated accounts.
    async fn load_users(
        &self,
        ids: impl Iterator<Item = Uuid>,
    ) -> Result<Vec<UserEntity>, error::SystemError> {
        let mut seen = HashSet::new();
        let ids: Vec<Uuid> = ids.filter(|id| seen.insert(*id)).collect();

        let mut users: Vec<UserEntity> = self
            .user_repo
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .filter(|u| u.status != Status::Inactive)
            .collect();
        users.sort_by_key(|u| ids.iter().position(|id| *id == u.id));
        Ok(users)
    }
}
