use serde_json::json;

use crate::common::{TestApp, millis_from_now, routes};

mod management {
    use super::*;

    #[tokio::test]
    async fn admin_can_register_a_competition() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin().await;

        let id = app.create_competition(&admin, json!({})).await;

        let res = app.get_without_token(&routes::competition(id)).await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["result"]["name"], "Spring Bass Open");
        assert_eq!(res.body["result"]["mode"], 1);
        assert_eq!(res.body["result"]["user_count"], 0);
        assert_eq!(res.body["my_status"], false);
    }

    #[tokio::test]
    async fn angler_cannot_register_a_competition() {
        let app = TestApp::spawn().await;
        let angler = app.create_authenticated_user("alice", "securepass").await;

        let res = app
            .post_with_token(
                routes::COMPETITIONS,
                &json!({
                    "name": "Spring Bass Open",
                    "mode": 1,
                    "start_date": millis_from_now(-60),
                    "end_date": millis_from_now(60),
                    "rank_fish_number": 3,
                }),
                &angler,
            )
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn end_before_start_is_rejected() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin().await;

        let res = app
            .post_with_token(
                routes::COMPETITIONS,
                &json!({
                    "name": "Backwards",
                    "mode": 2,
                    "start_date": millis_from_now(60),
                    "end_date": millis_from_now(-60),
                }),
                &admin,
            )
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "REJECTED");
        assert_eq!(res.body["result"], "COMPETITION.INVALID_DATES");
    }

    #[tokio::test]
    async fn unknown_mode_is_a_validation_error() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin().await;

        let res = app
            .post_with_token(
                routes::COMPETITIONS,
                &json!({
                    "name": "Mystery",
                    "mode": 9,
                    "start_date": millis_from_now(-60),
                    "end_date": millis_from_now(60),
                }),
                &admin,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn patch_changes_only_the_given_fields() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin().await;
        let id = app.create_competition(&admin, json!({})).await;

        let res = app
            .patch_with_token(
                &routes::competition(id),
                &json!({"name": "Autumn Bass Open", "rank_fish_number": 5}),
                &admin,
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["result"], "COMPETITION.UPDATE_SUCCESS");

        let res = app.get_without_token(&routes::competition(id)).await;
        assert_eq!(res.body["result"]["name"], "Autumn Bass Open");
        assert_eq!(res.body["result"]["rank_fish_number"], 5);
        assert_eq!(res.body["result"]["description"], "Bass only");
    }

    #[tokio::test]
    async fn patch_is_checked_against_stored_dates() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin().await;
        let id = app.create_competition(&admin, json!({})).await;

        let res = app
            .patch_with_token(
                &routes::competition(id),
                &json!({"start_date": millis_from_now(120)}),
                &admin,
            )
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["result"], "COMPETITION.INVALID_DATES");
    }

    #[tokio::test]
    async fn empty_competition_can_be_deleted() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin().await;
        let angler = app.create_authenticated_user("alice", "securepass").await;
        let id = app.create_competition(&admin, json!({})).await;
        app.join_competition(id, &angler).await;

        let res = app.delete_with_token(&routes::competition(id), &admin).await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["result"], 1);

        let res = app.get_without_token(&routes::competition(id)).await;
        assert_eq!(res.status, 404);
        assert_eq!(res.body["result"], "COMPETITION.NOT_FOUND");
    }

    #[tokio::test]
    async fn competition_with_fish_cannot_be_deleted() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin().await;
        let angler = app.create_authenticated_user("alice", "securepass").await;
        let id = app.create_competition(&admin, json!({})).await;
        app.commit_fish(id, &angler).await;

        let res = app.delete_with_token(&routes::competition(id), &admin).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["result"], "COMPETITION.HAS_FISH");
    }
}

mod listing {
    use super::*;

    async fn seed_calendar(app: &TestApp, admin: &str) -> (i32, i32, i32) {
        let running = app.create_competition(admin, json!({"name": "Running"})).await;
        let upcoming = app
            .create_competition(
                admin,
                json!({
                    "name": "Upcoming",
                    "mode": 3,
                    "start_date": millis_from_now(60),
                    "end_date": millis_from_now(120),
                }),
            )
            .await;
        let ended = app
            .create_competition(
                admin,
                json!({
                    "name": "Ended",
                    "mode": 5,
                    "competition_type": 2,
                    "quest_special_width": 30.0,
                    "start_date": millis_from_now(-120),
                    "end_date": millis_from_now(-60),
                }),
            )
            .await;
        (running, upcoming, ended)
    }

    fn ids(body: &serde_json::Value) -> Vec<i64> {
        body["result"]
            .as_array()
            .expect("result should be an array")
            .iter()
            .map(|c| c["id"].as_i64().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn lists_split_competitions_by_window_and_mode() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin().await;
        let (running, upcoming, ended) = seed_calendar(&app, &admin).await;

        let all = app.get_without_token(routes::COMPETITIONS).await;
        assert_eq!(all.status, 200, "{}", all.text);
        assert_eq!(ids(&all.body), vec![running as i64, upcoming as i64, ended as i64]);
        assert_eq!(all.body["total_count"], 3);

        let res = app.get_without_token(routes::COMPETITIONS_UPCOMING).await;
        assert_eq!(ids(&res.body), vec![upcoming as i64]);

        let res = app.get_without_token(routes::COMPETITIONS_IN_PROGRESS).await;
        assert_eq!(ids(&res.body), vec![running as i64]);

        let res = app.get_without_token(routes::COMPETITIONS_RANKED).await;
        assert_eq!(ids(&res.body), vec![running as i64]);

        let res = app.get_without_token(routes::COMPETITIONS_QUESTS).await;
        assert_eq!(ids(&res.body), vec![upcoming as i64, ended as i64]);
    }

    #[tokio::test]
    async fn list_window_reports_the_full_count() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin().await;
        seed_calendar(&app, &admin).await;

        let res = app
            .get_without_token(&format!("{}?limit=1&offset=1", routes::COMPETITIONS))
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["result"].as_array().unwrap().len(), 1);
        assert_eq!(res.body["total_count"], 3);
    }

    #[tokio::test]
    async fn zero_limit_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .get_without_token(&format!("{}?limit=0", routes::COMPETITIONS))
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["result"], "QUERY.INVALID_LIMIT");
    }

    #[tokio::test]
    async fn search_combines_type_mode_and_status() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin().await;
        let (running, _, ended) = seed_calendar(&app, &admin).await;

        let res = app
            .get_without_token(&format!("{}?type=2", routes::COMPETITIONS_SEARCH))
            .await;
        assert_eq!(ids(&res.body), vec![ended as i64]);

        let res = app
            .get_without_token(&format!("{}?mode=1&status=2", routes::COMPETITIONS_SEARCH))
            .await;
        assert_eq!(ids(&res.body), vec![running as i64]);

        let res = app
            .get_without_token(&format!("{}?mode=2&status=1", routes::COMPETITIONS_SEARCH))
            .await;
        assert_eq!(ids(&res.body), vec![ended as i64]);
    }

    #[tokio::test]
    async fn search_rejects_unknown_filter_values() {
        let app = TestApp::spawn().await;

        let res = app
            .get_without_token(&format!("{}?status=7", routes::COMPETITIONS_SEARCH))
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["result"], "COMPETITION.INVALID_FILTER");
    }
}

mod participation {
    use super::*;

    #[tokio::test]
    async fn joining_marks_the_caller_as_participant() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin().await;
        let angler = app.create_authenticated_user("alice", "securepass").await;
        let id = app.create_competition(&admin, json!({})).await;

        let res = app
            .post_with_token(&routes::competition_join(id), &json!({}), &angler)
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["result"], "COMPETITION.JOIN_SUCCESS");

        let res = app.get_with_token(&routes::competition(id), &angler).await;
        assert_eq!(res.body["my_status"], true);
        assert_eq!(res.body["result"]["user_count"], 1);
    }

    #[tokio::test]
    async fn joining_twice_conflicts() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin().await;
        let angler = app.create_authenticated_user("alice", "securepass").await;
        let id = app.create_competition(&admin, json!({})).await;
        app.join_competition(id, &angler).await;

        let res = app
            .post_with_token(&routes::competition_join(id), &json!({}), &angler)
            .await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["result"], "COMPETITION.ALREADY_JOINED");
    }

    #[tokio::test]
    async fn joining_a_missing_competition_is_not_found() {
        let app = TestApp::spawn().await;
        let angler = app.create_authenticated_user("alice", "securepass").await;

        let res = app
            .post_with_token(&routes::competition_join(9999), &json!({}), &angler)
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn user_lists_split_running_and_ended_participations() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin().await;
        let angler = app.create_authenticated_user("alice", "securepass").await;
        let user_id = app.user_id(&angler).await;

        let running = app.create_competition(&admin, json!({})).await;
        let ended = app
            .create_competition(
                &admin,
                json!({
                    "name": "Winter Cup",
                    "start_date": millis_from_now(-120),
                    "end_date": millis_from_now(-60),
                }),
            )
            .await;
        app.join_competition(running, &angler).await;
        app.join_competition(ended, &angler).await;

        let res = app
            .get_without_token(&routes::user_in_progress(user_id))
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        let rows = res.body["result"].as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["competition"]["id"], running);
        assert!(rows[0]["record"].is_null());

        let res = app.get_without_token(&routes::user_attended(user_id)).await;
        let rows = res.body["result"].as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["competition"]["name"], "Winter Cup");
    }

    #[tokio::test]
    async fn user_without_participations_gets_an_empty_list() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(&routes::user_attended(42)).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["result"], json!([]));
        assert_eq!(res.body["total_count"], 0);
    }
}
