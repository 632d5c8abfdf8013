use utoipa_axum::{router::OpenApiRouter, routes};

use crate::handlers::{auth, competition, dashboard, fish, notice, question, report};
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .merge(auth_routes())
        .merge(competition_routes())
        .merge(fish_routes())
        .merge(user_routes())
        .merge(notice_routes())
        .merge(question_routes())
        .merge(report_routes())
        .merge(dashboard_routes())
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(auth::register))
        .routes(routes!(auth::login))
        .routes(routes!(auth::me))
}

fn competition_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            competition::list_competitions,
            competition::create_competition
        ))
        .routes(routes!(competition::list_upcoming))
        .routes(routes!(competition::list_in_progress))
        .routes(routes!(competition::list_ranked))
        .routes(routes!(competition::list_quests))
        .routes(routes!(competition::search_competitions))
        .routes(routes!(
            competition::get_competition,
            competition::update_competition,
            competition::delete_competition
        ))
        .routes(routes!(competition::get_competition_ranking))
        .routes(routes!(competition::join_competition))
        .routes(routes!(fish::list_competition_fish))
        .routes(routes!(fish::list_user_competition_fish))
}

fn fish_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(fish::list_fish, fish::commit_fish))
        .routes(routes!(fish::get_fish, fish::update_fish))
        .routes(routes!(fish::add_fish_image))
        .routes(routes!(fish::verify_fish))
        .routes(routes!(fish::add_diary_comment))
        .routes(routes!(fish::get_realtime_ranking))
}

fn user_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(competition::list_user_in_progress))
        .routes(routes!(competition::list_user_attended))
        .routes(routes!(fish::search_diary))
        .routes(routes!(report::list_reports_against))
        .routes(routes!(report::list_reports_filed_by))
}

fn notice_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(notice::list_notices, notice::create_notice))
        .routes(routes!(notice::list_recent_notices))
        .routes(routes!(
            notice::get_notice,
            notice::update_notice,
            notice::delete_notice
        ))
        .routes(routes!(
            notice::list_notice_types,
            notice::create_notice_type
        ))
        .routes(routes!(notice::delete_notice_type))
}

fn question_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(question::list_questions, question::create_question))
        .routes(routes!(
            question::get_question,
            question::update_question,
            question::delete_question
        ))
        .routes(routes!(question::answer_question))
        .routes(routes!(question::add_answer_comment))
}

fn report_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(report::list_reports, report::create_report))
        .routes(routes!(
            report::get_report,
            report::update_report,
            report::delete_report
        ))
}

fn dashboard_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(dashboard::count_users))
        .routes(routes!(dashboard::count_users_today))
        .routes(routes!(dashboard::list_top_level_users))
}
