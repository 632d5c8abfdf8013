
mod auth;
mod competition;
mod fish;
