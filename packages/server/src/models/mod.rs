pub mod auth;
pub mod competition;
pub mod content;
pub mod dashboard;
pub mod fish;
pub mod shared;
