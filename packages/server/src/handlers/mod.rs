pub mod auth;
pub mod competition;
pub mod dashboard;
pub mod fish;
pub mod notice;
pub mod question;
pub mod report;
