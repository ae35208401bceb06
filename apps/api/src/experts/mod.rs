// Industry experts and referral requests.

pub mod handlers;
pub mod models;
pub mod repository;
