pub mod auth;
pub mod catalog;
pub mod companies;
pub mod fees;
pub mod media;
pub mod secretaries;
pub mod specialists;
pub mod users;
