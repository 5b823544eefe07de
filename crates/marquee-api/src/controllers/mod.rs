pub mod actors;
pub mod catalog;
pub mod movies;
pub mod ratings;
pub mod reviews;
