pub mod competition_mode;
pub mod fish_status;
pub mod question_status;
pub mod ranking;
pub mod scoring;

pub use competition_mode::{CompetitionMode, RecordOrder};
pub use fish_status::FishStatus;
pub use question_status::QuestionStatus;
