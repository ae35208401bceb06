pub mod handlers;
pub mod question;
pub mod transcript;
