pub mod answer_comment;
pub mod competition;
pub mod diary_comment;
pub mod fish;
pub mod fish_image;
pub mod fish_type;
pub mod notice;
pub mod notice_type;
pub mod profile;
pub mod question;
pub mod report;
pub mod role;
pub mod role_permission;
pub mod user;
pub mod user_competition;
pub mod user_record;
