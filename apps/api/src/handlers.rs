pub mod catalog;
pub mod dishes;
pub mod game;
pub mod health;
pub mod users;
