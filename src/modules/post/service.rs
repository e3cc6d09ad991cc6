use log::info;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        friend::{repository::FriendRepository, service::FriendService},
        post::{
            model::{InsertPost, PostResponse},
            repository::PostRepository,
            schema::PostEntity,
        },
        user::{
            repository::UserRepository,
            schema::{Status, UserRole},
            service::{find_user_by_username, resolve_current_user},
        },
    },
};

#[derive(Clone)]
pub struct PostService<P, F, U>
where
    P: PostRepository + Send + Sync,
    F: FriendRepository + Send + Sync,
    U: UserRepository + Send + Sync,
{
    post_repo: Arc<P>,
    friend_service: FriendService<F, U>,
}

fn post_not_found(post_id: &Uuid) -> error::SystemError {
    error::SystemError::post_not_found(format!("Post not found with ID {post_id}"))
}

fn into_responses(posts: Vec<PostEntity>) -> Vec<PostResponse> {
    posts.into_iter().map(PostResponse::from).collect()
}

impl<P, F, U> PostService<P, F, U>
where
    P: PostRepository + Send + Sync,
    F: FriendRepository + Send + Sync,
    U: UserRepository + Send + Sync,
{
    pub fn with_dependencies(post_repo: Arc<P>, friend_service: FriendService<F, U>) -> Self {
        info!("PostService initialized with dependencies");
        PostService { post_repo, friend_service }
    }

    pub fn user_repo(&self) -> &U {
        self.friend_service.user_repo()
    }

    pub async fn create_post(
        &self,
        user_id: Uuid,
        caption: String,
    ) -> Result<PostResponse, error::SystemError> {
        let user = resolve_current_user(self.friend_service.user_repo(), &user_id).await?;

        let post = self.post_repo.create(&InsertPost { user_id: user.id, caption }).await?;
        info!("Saving Post {} for User: {}", post.id, user.username);
        Ok(PostResponse::from(post))
    }

    pub async fn update_caption(
        &self,
        user_id: Uuid,
        post_id: Uuid,
        caption: String,
    ) -> Result<PostResponse, error::SystemError> {
        let post = self.owned_post(&user_id, &post_id).await?;

        let updated = self
            .post_repo
            .update_caption(&post.id, &caption)
            .await?
            .ok_or_else(|| post_not_found(&post_id))?;

        info!("Updating Post: {}", updated.id);
        Ok(PostResponse::from(updated))
    }

    /// Moderation: hides a post for everyone. Allowed for its owner and admins.
    pub async fn inactivate_post(
        &self,
        user_id: Uuid,
        role: &UserRole,
        post_id: Uuid,
    ) -> Result<(), error::SystemError> {
        let user = resolve_current_user(self.friend_service.user_repo(), &user_id).await?;
        let post = self.post_repo.find_by_id(&post_id).await?.ok_or_else(|| post_not_found(&post_id))?;

        if post.user_id != user.id && *role != UserRole::Admin {
            return Err(error::SystemError::forbidden("You are not allowed to delete this post"));
        }

        self.post_repo.set_status(&post.id, Status::Inactive).await?;
        info!("Banning Post: {} by {}", post_id, user.username);
        Ok(())
    }

    /// A post as seen by `viewer_id`. Hidden posts are reported as missing.
    pub async fn visible_post(
        &self,
        viewer_id: &Uuid,
        post_id: &Uuid,
    ) -> Result<PostEntity, error::SystemError> {
        let post = self.post_repo.find_by_id(post_id).await?.ok_or_else(|| post_not_found(post_id))?;

        if !self.friend_service.can_view(viewer_id, &post.user_id, post.status).await? {
            return Err(post_not_found(post_id));
        }
        Ok(post)
    }

    pub async fn get_post(
        &self,
        viewer_id: Uuid,
        post_id: Uuid,
    ) -> Result<PostResponse, error::SystemError> {
        let viewer = resolve_current_user(self.friend_service.user_repo(), &viewer_id).await?;
        let post = self.visible_post(&viewer.id, &post_id).await?;
        Ok(PostResponse::from(post))
    }

    pub async fn my_posts(&self, user_id: Uuid) -> Result<Vec<PostResponse>, error::SystemError> {
        let user = resolve_current_user(self.friend_service.user_repo(), &user_id).await?;
        info!("Getting posts of current user {}", user.username);
        let posts = self.post_repo.find_by_owner(&user.id).await?;
        Ok(into_responses(posts))
    }

    pub async fn my_post(
        &self,
        user_id: Uuid,
        post_id: Uuid,
    ) -> Result<PostResponse, error::SystemError> {
        let post = self.owned_post(&user_id, &post_id).await?;
        Ok(PostResponse::from(post))
    }

    /// Posts of `username` for a viewer connected to them.
    ///
    /// No link row in either direction is a `FriendRequestNotFound`, unlike
    /// `are_friends` which just answers `false`. Rows without acceptance give
    /// an empty list.
    pub async fn posts_by_username(
        &self,
        viewer_id: Uuid,
        username: &str,
    ) -> Result<Vec<PostResponse>, error::SystemError> {
        let viewer = resolve_current_user(self.friend_service.user_repo(), &viewer_id).await?;
        let target = find_user_by_username(self.friend_service.user_repo(), username).await?;

        if viewer.id == target.id {
            return self.my_posts(viewer.id).await;
        }

        let (forward, backward) = self.friend_service.links_between(&viewer.id, &target.id).await?;
        if forward.is_none() && backward.is_none() {
            return Err(error::SystemError::friend_request_not_found(format!(
                "There is no friendship between user {} and {}",
                viewer.username, target.username
            )));
        }

        let accepted = forward.is_some_and(|l| l.is_accepted) || backward.is_some_and(|l| l.is_accepted);
        if !accepted {
            return Ok(Vec::new());
        }

        info!("Getting posts of user {} for {}", target.username, viewer.username);
        let posts = self.post_repo.find_by_owner(&target.id).await?;
        Ok(into_responses(posts.into_iter().filter(|p| p.status != Status::Inactive).collect()))
    }

    pub async fn all_posts(&self) -> Result<Vec<PostResponse>, error::SystemError> {
        info!("Getting all posts");
        let posts = self.post_repo.find_all_with_status(Status::Active).await?;
        Ok(into_responses(posts))
    }

    /// Active posts of every friend. Closed posts stay out of the feed even
    /// though a friend could open them one by one.
    pub async fn feed_of_friends(
        &self,
        viewer_id: Uuid,
    ) -> Result<Vec<PostResponse>, error::SystemError> {
        let viewer = resolve_current_user(self.friend_service.user_repo(), &viewer_id).await?;
        let friend_ids: Vec<Uuid> =
            self.friend_service.friends_of(&viewer.id).await?.into_iter().map(|u| u.id).collect();

        info!("Getting friends posts of user {}", viewer.username);
        let posts =
            self.post_repo.find_by_owners_with_status(&friend_ids, Status::Active).await?;
        Ok(into_responses(posts))
    }

    /// Likes the post for the caller, or takes the like back if already given.
    pub async fn like_toggle(
        &self,
        viewer_id: Uuid,
        post_id: Uuid,
    ) -> Result<PostResponse, error::SystemError> {
        let viewer = resolve_current_user(self.friend_service.user_repo(), &viewer_id).await?;
        let post = self.visible_post(&viewer.id, &post_id).await?;

        let updated = self
            .post_repo
            .toggle_like(&post.id, &viewer.username)
            .await?
            .ok_or_else(|| post_not_found(&post_id))?;

        info!("User {} toggled like on post {}", viewer.username, post_id);
        Ok(PostResponse::from(updated))
    }

    async fn owned_post(
        &self,
        user_id: &Uuid,
        post_id: &Uuid,
    ) -> Result<PostEntity, error::SystemError> {
        let user = resolve_current_user(self.friend_service.user_repo(), user_id).await?;
        info!("Getting Post {} of user {}", post_id, user.username);

        self.post_repo
            .find_by_id(post_id)
            .await?
            .filter(|p| p.user_id == user.id)
            .ok_or_else(|| {
                error::SystemError::post_not_found(format!(
                    "Post not found with ID {post_id} and user {}",
                    user.username
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::account::service::AccountService;
    use crate::test::MemoryStore;

    type Svc = PostService<MemoryStore, MemoryStore, MemoryStore>;

    struct Fixture {
        store: Arc<MemoryStore>,
        posts: Svc,
        friends: FriendService<MemoryStore, MemoryStore>,
        account: AccountService<MemoryStore>,
    }

    fn fixture() -> Fixture {
        let store = MemoryStore::new();
        let friends = FriendService::with_dependencies(store.clone(), store.clone());
        let posts = PostService::with_dependencies(store.clone(), friends.clone());
        let account = AccountService::with_dependencies(store.clone());
        Fixture { store, posts, friends, account }
    }

    async fn befriend(f: &Fixture, from: Uuid, to: Uuid, to_name: &str, from_name: &str) {
        f.friends.send_request(from, to_name).await.unwrap();
        f.friends.accept_request(to, from_name).await.unwrap();
    }

    #[actix_web::test]
    async fn closing_an_account_hides_posts_from_strangers_until_befriended() {
        let f = fixture();
        let alice = f.store.seed_user("alice");
        let bob = f.store.seed_user("bob");

        let p1 = f.posts.create_post(alice.id, "hello".into()).await.unwrap();
        assert_eq!(f.posts.get_post(bob.id, p1.id).await.unwrap().caption, "hello");

        f.account.close(alice.id).await.unwrap();
        assert_eq!(f.store.post_status(&p1.id), Some(Status::Closed));

        let err = f.posts.get_post(bob.id, p1.id).await.unwrap_err();
        assert!(matches!(err, error::SystemError::PostNotFound(_)));

        befriend(&f, bob.id, alice.id, "alice", "bob").await;
        assert_eq!(f.posts.get_post(bob.id, p1.id).await.unwrap().status, Status::Closed);
    }

    #[actix_web::test]
    async fn inactive_posts_are_hidden_but_listed_for_the_owner() {
        let f = fixture();
        let alice = f.store.seed_user("alice");
        let bob = f.store.seed_user("bob");
        befriend(&f, alice.id, bob.id, "bob", "alice").await;

        let post = f.posts.create_post(alice.id, "gone soon".into()).await.unwrap();
        f.posts.inactivate_post(alice.id, &UserRole::User, post.id).await.unwrap();

        assert!(f.posts.get_post(bob.id, post.id).await.is_err());
        assert!(f.posts.get_post(alice.id, post.id).await.is_err());

        let mine = f.posts.my_posts(alice.id).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].status, Status::Inactive);
        assert!(f.posts.my_post(alice.id, post.id).await.is_ok());
    }

    #[actix_web::test]
    async fn only_owner_or_admin_may_inactivate() {
        let f = fixture();
        let alice = f.store.seed_user("alice");
        let bob = f.store.seed_user("bob");
        let admin = f.store.seed_admin("root");

        let post = f.posts.create_post(alice.id, "hi".into()).await.unwrap();

        let err = f.posts.inactivate_post(bob.id, &UserRole::User, post.id).await.unwrap_err();
        assert!(matches!(err, error::SystemError::Forbidden(_)));

        f.posts.inactivate_post(admin.id, &UserRole::Admin, post.id).await.unwrap();
        assert_eq!(f.store.post_status(&post.id), Some(Status::Inactive));

        let err = f.posts.inactivate_post(alice.id, &UserRole::User, Uuid::now_v7()).await.unwrap_err();
        assert!(matches!(err, error::SystemError::PostNotFound(_)));
    }

    #[actix_web::test]
    async fn captions_are_owner_scoped() {
        let f = fixture();
        let alice = f.store.seed_user("alice");
        let bob = f.store.seed_user("bob");

        let post = f.posts.create_post(alice.id, "draft".into()).await.unwrap();

        let err = f.posts.update_caption(bob.id, post.id, "mine now".into()).await.unwrap_err();
        assert!(matches!(err, error::SystemError::PostNotFound(_)));

        let updated = f.posts.update_caption(alice.id, post.id, "final".into()).await.unwrap();
        assert_eq!(updated.caption, "final");
        assert!(f.posts.my_post(bob.id, post.id).await.is_err());
    }

    #[actix_web::test]
    async fn feed_only_contains_active_posts_of_friends() {
        let f = fixture();
        let alice = f.store.seed_user("alice");
        let bob = f.store.seed_user("bob");
        let carol = f.store.seed_user("carol");
        befriend(&f, alice.id, bob.id, "bob", "alice").await;

        let open = f.posts.create_post(bob.id, "open".into()).await.unwrap();
        let closed = f.posts.create_post(bob.id, "closed".into()).await.unwrap();
        f.store.set_post_status(&closed.id, Status::Closed);
        f.posts.create_post(carol.id, "stranger".into()).await.unwrap();
        f.posts.create_post(alice.id, "own".into()).await.unwrap();

        let feed = f.posts.feed_of_friends(alice.id).await.unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].id, open.id);

        // still reachable one by one
        assert!(f.posts.get_post(alice.id, closed.id).await.is_ok());
    }

    #[actix_web::test]
    async fn all_posts_lists_active_posts_newest_first() {
        let f = fixture();
        let alice = f.store.seed_user("alice");

        let first = f.posts.create_post(alice.id, "first".into()).await.unwrap();
        let second = f.posts.create_post(alice.id, "second".into()).await.unwrap();
        let hidden = f.posts.create_post(alice.id, "hidden".into()).await.unwrap();
        f.store.set_post_status(&hidden.id, Status::Closed);

        let ids: Vec<Uuid> = f.posts.all_posts().await.unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[actix_web::test]
    async fn posts_by_username_without_any_link_is_an_error() {
        let f = fixture();
        let alice = f.store.seed_user("alice");
        let bob = f.store.seed_user("bob");
        f.posts.create_post(alice.id, "hi".into()).await.unwrap();

        // are_friends answers plainly while the listing reports the missing relation
        assert!(!f.friends.are_friends(&bob.id, &alice.id).await.unwrap());
        let err = f.posts.posts_by_username(bob.id, "alice").await.unwrap_err();
        assert!(matches!(err, error::SystemError::FriendRequestNotFound(_)));
    }

    #[actix_web::test]
    async fn posts_by_username_with_pending_link_is_empty() {
        let f = fixture();
        let alice = f.store.seed_user("alice");
        let bob = f.store.seed_user("bob");
        f.posts.create_post(alice.id, "hi".into()).await.unwrap();

        f.friends.send_request(alice.id, "bob").await.unwrap();

        assert!(f.posts.posts_by_username(bob.id, "alice").await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn posts_by_username_for_friends_skips_inactive_posts() {
        let f = fixture();
        let alice = f.store.seed_user("alice");
        let bob = f.store.seed_user("bob");
        befriend(&f, alice.id, bob.id, "bob", "alice").await;

        let kept = f.posts.create_post(alice.id, "kept".into()).await.unwrap();
        let closed = f.posts.create_post(alice.id, "closed".into()).await.unwrap();
        let banned = f.posts.create_post(alice.id, "banned".into()).await.unwrap();
        f.store.set_post_status(&closed.id, Status::Closed);
        f.store.set_post_status(&banned.id, Status::Inactive);

        let ids: Vec<Uuid> = f
            .posts
            .posts_by_username(bob.id, "alice")
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![closed.id, kept.id]);

        // the accepted row is (alice, bob); bob's posts reach alice through it too
        let bobs = f.posts.create_post(bob.id, "from bob".into()).await.unwrap();
        let reverse: Vec<Uuid> = f
            .posts
            .posts_by_username(alice.id, "bob")
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(reverse, vec![bobs.id]);
    }

    #[actix_web::test]
    async fn liking_twice_restores_the_post() {
        let f = fixture();
        let alice = f.store.seed_user("alice");
        let bob = f.store.seed_user("bob");
        let post = f.posts.create_post(bob.id, "like me".into()).await.unwrap();

        let liked = f.posts.like_toggle(alice.id, post.id).await.unwrap();
        assert_eq!(liked.likes, 1);
        assert_eq!(liked.liked_users, vec!["alice".to_string()]);

        let unliked = f.posts.like_toggle(alice.id, post.id).await.unwrap();
        assert_eq!(unliked.likes, 0);
        assert!(unliked.liked_users.is_empty());
    }

    #[actix_web::test]
    async fn like_count_tracks_distinct_users() {
        let f = fixture();
        let owner = f.store.seed_user("owner");
        let post = f.posts.create_post(owner.id, "popular".into()).await.unwrap();

        let mut last = None;
        for name in ["a1", "b1", "c1"] {
            let user = f.store.seed_user(name);
            last = Some(f.posts.like_toggle(user.id, post.id).await.unwrap());
        }
        let last = last.unwrap();
        assert_eq!(last.likes as usize, last.liked_users.len());
        assert_eq!(last.likes, 3);
    }

    #[actix_web::test]
    async fn hidden_posts_cannot_be_liked() {
        let f = fixture();
        let alice = f.store.seed_user("alice");
        let bob = f.store.seed_user("bob");
        let post = f.posts.create_post(alice.id, "private".into()).await.unwrap();
        f.account.close(alice.id).await.unwrap();

        let err = f.posts.like_toggle(bob.id, post.id).await.unwrap_err();
        assert!(matches!(err, error::SystemError::PostNotFound(_)));
        assert_eq!(f.store.post_likes(&post.id), Some(0));
    }
}
