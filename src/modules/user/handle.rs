use actix_web::{
    HttpRequest,
    cookie::{Cookie, time},
    get, patch, post, web,
};

use crate::modules::friend::handle::FriendSvc;
use crate::modules::user::{model, service::UserService};
use crate::{
    ENV,
    api::{error, success},
    constants::REFRESH_TOKEN_COOKIE,
    middlewares::get_claims,
    utils::ValidatedJson,
};

fn refresh_cookie(token: String) -> Cookie<'static> {
    Cookie::build(REFRESH_TOKEN_COOKIE, token)
        .path("/")
        .http_only(true)
        .max_age(time::Duration::seconds(ENV.refresh_token_expiration as i64))
        .finish()
}

#[get("/profile")]
pub async fn get_profile(
    user_service: web::Data<UserService>,
    req: HttpRequest,
) -> Result<success::Success<model::UserResponse>, error::Error> {
    let id = get_claims(&req)?.sub;
    let user = user_service.get_current_user(id).await?;
    Ok(success::Success::ok(Some(user)).message("Profile retrieved successfully"))
}

#[patch("/profile")]
pub async fn update_profile(
    user_service: web::Data<UserService>,
    user_data: ValidatedJson<model::UpdateUserModel>,
    req: HttpRequest,
) -> Result<success::Success<model::UserResponse>, error::Error> {
    let id = get_claims(&req)?.sub;
    let user = user_service.update_profile(id, user_data.0).await?;
    Ok(success::Success::ok(Some(user)).message("User updated successfully"))
}

#[get("/all")]
pub async fn list_users(
    friend_service: web::Data<FriendSvc>,
    req: HttpRequest,
) -> Result<success::Success<Vec<model::UserResponse>>, error::Error> {
    let id = get_claims(&req)?.sub;
    let users = friend_service.list_users(id).await?;
    Ok(success::Success::ok(Some(users)).message("Users retrieved successfully"))
}

#[get("/{username}")]
pub async fn get_user(
    friend_service: web::Data<FriendSvc>,
    username: web::Path<String>,
    req: HttpRequest,
) -> Result<success::Success<model::UserResponse>, error::Error> {
    let id = get_claims(&req)?.sub;
    let user = friend_service.view_user(id, &username).await?;
    Ok(success::Success::ok(Some(user)).message("User retrieved successfully"))
}

#[post("/signup")]
pub async fn sign_up(
    user_service: web::Data<UserService>,
    user_data: ValidatedJson<model::SignUpModel>,
) -> Result<success::Success<model::SignUpResponse>, error::Error> {
    let user_id = user_service.sign_up(user_data.0).await?;
    Ok(success::Success::created(Some(model::SignUpResponse { id: user_id }))
        .message("User registered successfully"))
}

#[post("/signin")]
pub async fn sign_in(
    user_service: web::Data<UserService>,
    user_data: ValidatedJson<model::SignInModel>,
) -> Result<success::Success<model::SignInResponse>, error::Error> {
    let (access_token, refresh_token) = user_service.sign_in(user_data.0).await?;
    let response = model::SignInResponse { access_token };

    Ok(success::Success::ok(Some(response))
        .message("Signin successful")
        .cookies(vec![refresh_cookie(refresh_token)]))
}

#[get("/signout")]
pub async fn sign_out(
    user_service: web::Data<UserService>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let refresh_token = req.cookie(REFRESH_TOKEN_COOKIE).map(|c| c.value().to_string());
    user_service.sign_out(refresh_token).await?;
    let cleared = Cookie::build(REFRESH_TOKEN_COOKIE, "")
        .path("/")
        .http_only(true)
        .max_age(time::Duration::seconds(0))
        .expires(time::OffsetDateTime::UNIX_EPOCH)
        .finish();

    Ok(success::Success::no_content().cookies(vec![cleared]))
}

#[post("/refresh")]
pub async fn refresh(
    user_service: web::Data<UserService>,
    req: HttpRequest,
) -> Result<success::Success<model::SignInResponse>, error::Error> {
    let refresh_token = req.cookie(REFRESH_TOKEN_COOKIE).map(|c| c.value().to_string());
    let (access_token, refresh_token) = user_service.refresh(refresh_token).await?;
    let response = model::SignInResponse { access_token };

    Ok(success::Success::ok(Some(response))
        .message("Refresh successful")
        .cookies(vec![refresh_cookie(refresh_token)]))
}
