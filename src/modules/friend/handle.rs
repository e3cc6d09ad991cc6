use actix_web::{HttpRequest, get, post, web};

use crate::{
    api::{error, success},
    middlewares::get_claims,
    modules::{
        friend::{model::FriendResponse, repository_pg::FriendRepositoryPg, service::FriendService},
        user::repository_pg::UserRepositoryPg,
    },
};

pub type FriendSvc = FriendService<FriendRepositoryPg, UserRepositoryPg>;

#[post("/{username}/request")]
pub async fn send_friend_request(
    friend_service: web::Data<FriendSvc>,
    username: web::Path<String>,
    req: HttpRequest,
) -> Result<success::Success<FriendResponse>, error::Error> {
    let sender_id = get_claims(&req)?.sub;
    let target = friend_service.send_request(sender_id, &username).await?;
    let message = format!("Friend request sent to user {}", target.username);
    Ok(success::Success::ok(Some(target)).message(message))
}

#[post("/{username}/accept")]
pub async fn accept_friend_request(
    friend_service: web::Data<FriendSvc>,
    username: web::Path<String>,
    req: HttpRequest,
) -> Result<success::Success<FriendResponse>, error::Error> {
    let receiver_id = get_claims(&req)?.sub;
    let requester = friend_service.accept_request(receiver_id, &username).await?;
    let message = format!("Accepted friend request from user {}", requester.username);
    Ok(success::Success::ok(Some(requester)).message(message))
}

#[get("")]
pub async fn list_friends(
    friend_service: web::Data<FriendSvc>,
    req: HttpRequest,
) -> Result<success::Success<Vec<FriendResponse>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let friends = friend_service.friends(user_id).await?;
    Ok(success::Success::ok(Some(friends)).message("Friends retrieved successfully"))
}

#[get("/of/{username}")]
pub async fn list_friends_of_user(
    friend_service: web::Data<FriendSvc>,
    username: web::Path<String>,
    req: HttpRequest,
) -> Result<success::Success<Vec<FriendResponse>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let friends = friend_service.friends_of_user(user_id, &username).await?;
    Ok(success::Success::ok(Some(friends)).message("Friends retrieved successfully"))
}

#[get("/sent")]
pub async fn list_sent_requests(
    friend_service: web::Data<FriendSvc>,
    req: HttpRequest,
) -> Result<success::Success<Vec<FriendResponse>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let requests = friend_service.sent_requests(user_id).await?;
    Ok(success::Success::ok(Some(requests)).message("Sent friend requests retrieved successfully"))
}

#[get("/received")]
pub async fn list_received_requests(
    friend_service: web::Data<FriendSvc>,
    req: HttpRequest,
) -> Result<success::Success<Vec<FriendResponse>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let requests = friend_service.received_requests(user_id).await?;
    Ok(success::Success::ok(Some(requests))
        .message("Received friend requests retrieved successfully"))
}
