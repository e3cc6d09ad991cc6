pub mod account;
pub mod comment;
pub mod friend;
pub mod post;
pub mod user;
pub mod visibility;
