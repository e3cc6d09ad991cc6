use actix_web::{HttpRequest, post, web};

use crate::{
    api::{error, success},
    middlewares::get_claims,
    modules::{
        account::service::AccountService, user::model::UserResponse,
        user::repository_pg::UserRepositoryPg,
    },
};

pub type AccountSvc = AccountService<UserRepositoryPg>;

#[post("/open")]
pub async fn open_account(
    account_service: web::Data<AccountSvc>,
    req: HttpRequest,
) -> Result<success::Success<UserResponse>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let user = account_service.open(user_id).await?;
    let message = format!("Account {} is visible for everyone", user.username);
    Ok(success::Success::ok(Some(user)).message(message))
}

#[post("/close")]
pub async fn close_account(
    account_service: web::Data<AccountSvc>,
    req: HttpRequest,
) -> Result<success::Success<UserResponse>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let user = account_service.close(user_id).await?;
    let message = format!("Account {} is visible only for friends", user.username);
    Ok(success::Success::ok(Some(user)).message(message))
}

#[post("/deactivate")]
pub async fn deactivate_account(
    account_service: web::Data<AccountSvc>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    account_service.deactivate(user_id).await?;
    Ok(success::Success::ok(None).message("Account is deleted"))
}
