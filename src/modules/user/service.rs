use log::info;
use std::sync::Arc;
use uuid::Uuid;

use crate::ENV;
use crate::api::error;
use crate::configs::RedisCache;
use crate::constants::refresh_session_key;
use crate::modules::user::model::{
    InsertUser, SignInModel, SignUpModel, UpdateUserModel, UserResponse,
};
use crate::modules::user::repository::UserRepository;
use crate::modules::user::schema::{Status, UserEntity};
use crate::utils::{Claims, TypeClaims, hash_password, verify_password};

/// Resolves the authenticated principal to a live user.
///
/// Deactivated accounts no longer resolve, so nothing can act on their behalf.
pub async fn resolve_current_user<U>(repo: &U, id: &Uuid) -> Result<UserEntity, error::SystemError>
where
    U: UserRepository + Send + Sync + ?Sized,
{
    match repo.find_by_id(id).await? {
        Some(user) if user.status != Status::Inactive => Ok(user),
        _ => Err(error::SystemError::user_not_found(format!("User not found with id {id}"))),
    }
}

pub async fn find_user_by_username<U>(
    repo: &U,
    username: &str,
) -> Result<UserEntity, error::SystemError>
where
    U: UserRepository + Send + Sync + ?Sized,
{
    repo.find_by_username(username)
        .await?
        .ok_or_else(|| error::SystemError::user_not_found(format!("User not found: {username}")))
}

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository + Send + Sync>,
    cache: Arc<RedisCache>,
}

impl UserService {
    pub fn with_dependencies(
        repo: Arc<dyn UserRepository + Send + Sync>,
        cache: Arc<RedisCache>,
    ) -> Self {
        info!("UserService initialized with dependencies");
        UserService { repo, cache }
    }

    pub async fn get_current_user(&self, id: Uuid) -> Result<UserResponse, error::SystemError> {
        let user = resolve_current_user(self.repo.as_ref(), &id).await?;
        Ok(UserResponse::from(user))
    }

    pub async fn update_profile(
        &self,
        id: Uuid,
        user: UpdateUserModel,
    ) -> Result<UserResponse, error::SystemError> {
        if user.is_empty() {
            return Err(error::SystemError::bad_request("No fields to update"));
        }

        let current = resolve_current_user(self.repo.as_ref(), &id).await?;

        let updated = match self.repo.update(&current.id, &user.into()).await {
            Err(error::SystemError::Conflict(_)) => {
                return Err(error::SystemError::user_already_exists(
                    "Another account already uses this email",
                ));
            }
            other => other?,
        };

        info!("Updated profile of user {}", updated.username);
        Ok(UserResponse::from(updated))
    }

    pub async fn sign_up(&self, user: SignUpModel) -> Result<Uuid, error::SystemError> {
        let hash_password = hash_password(&user.password)?;

        let new_user = InsertUser {
            username: user.username,
            email: user.email,
            hash_password,
            first_name: user.first_name,
            last_name: user.last_name,
        };

        match self.repo.create(&new_user).await {
            Ok(created) => {
                info!("Registered user {}", created.username);
                Ok(created.id)
            }
            Err(error::SystemError::Conflict(meta)) => {
                log::error!("Error during registration of {}: {:?}", new_user.username, meta);
                Err(error::SystemError::user_already_exists(format!(
                    "The user {} already exists. Please check credentials",
                    new_user.username
                )))
            }
            Err(e) => Err(e),
        }
    }

    pub async fn sign_in(&self, user: SignInModel) -> Result<(String, String), error::SystemError> {
        let user_entity = self
            .repo
            .find_by_username(&user.username)
            .await?
            .filter(|u| u.status != Status::Inactive)
            .ok_or_else(|| error::SystemError::unauthorized("Invalid username or password"))?;

        let valid = verify_password(&user_entity.hash_password, &user.password)?;
        if !valid {
            return Err(error::SystemError::unauthorized("Invalid username or password"));
        }

        let tokens = self.issue_tokens(&user_entity).await?;
        info!("User {} signed in", user_entity.username);
        Ok(tokens)
    }

    pub async fn refresh(
        &self,
        refresh_token: Option<String>,
    ) -> Result<(String, String), error::SystemError> {
        let token =
            refresh_token.ok_or_else(|| error::SystemError::unauthorized("Missing refresh token"))?;

        let claims = Claims::decode(&token, ENV.jwt_secret.as_ref())
            .map_err(|_| error::SystemError::unauthorized("Refresh token invalid or expired"))?;

        let jti = match (claims.is_refresh(), claims.jti) {
            (true, Some(jti)) => jti,
            _ => return Err(error::SystemError::unauthorized("Refresh token invalid or expired")),
        };

        let key = refresh_session_key(&jti);
        let session = self.cache.get::<Uuid>(&key).await?;
        if session != Some(claims.sub) {
            return Err(error::SystemError::unauthorized("Refresh token invalid or expired"));
        }
        self.cache.delete(&key).await?;

        let user = resolve_current_user(self.repo.as_ref(), &claims.sub)
            .await
            .map_err(|_| error::SystemError::unauthorized("Refresh token invalid or expired"))?;

        self.issue_tokens(&user).await
    }

    pub async fn sign_out(&self, refresh_token: Option<String>) -> Result<(), error::SystemError> {
        let Some(token) = refresh_token else {
            return Ok(());
        };

        if let Ok(claims) = Claims::decode(&token, ENV.jwt_secret.as_ref()) {
            if let Some(jti) = claims.jti {
                self.cache.delete(&refresh_session_key(&jti)).await?;
                info!("Refresh session {} revoked", jti);
            }
        }
        Ok(())
    }

    async fn issue_tokens(&self, user: &UserEntity) -> Result<(String, String), error::SystemError> {
        let access_token = Claims::new(&user.id, &user.role, ENV.access_token_expiration)
            .with_type(TypeClaims::AccessToken)
            .encode(ENV.jwt_secret.as_ref())?;

        let jti = Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext));

        let refresh_token = Claims::new(&user.id, &user.role, ENV.refresh_token_expiration)
            .with_jti(jti)
            .with_type(TypeClaims::RefreshToken)
            .encode(ENV.jwt_secret.as_ref())?;

        self.cache
            .set(&refresh_session_key(&jti), &user.id, ENV.refresh_token_expiration)
            .await?;

        Ok((access_token, refresh_token))
    }
}
