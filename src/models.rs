pub mod auth;
pub mod catalog;
pub mod company;
pub mod fees;
pub mod media;
pub mod secretary;
pub mod specialist;
