use catchboard::config::ScoringConfig;
use serde_json::{Value, json};

use crate::common::{TestApp, millis_from_now, routes};

/// Admin, one joined angler and a running competition built from `overrides`.
struct Field {
    admin: String,
    angler: String,
    angler_id: i32,
    competition_id: i32,
    bass: i32,
}

async fn field(app: &TestApp, overrides: Value) -> Field {
    let admin = app.create_admin().await;
    let angler = app.create_authenticated_user("alice", "securepass").await;
    let angler_id = app.user_id(&angler).await;
    let bass = app.create_fish_type("Bass").await;
    let competition_id = app.create_competition(&admin, overrides).await;
    app.join_competition(competition_id, &angler).await;
    Field {
        admin,
        angler,
        angler_id,
        competition_id,
        bass,
    }
}

async fn record_of(app: &TestApp, competition_id: i32) -> Value {
    let res = app
        .get_without_token(&routes::competition_ranking(competition_id))
        .await;
    assert_eq!(res.status, 200, "{}", res.text);
    res.body["result"][0]["record"].clone()
}

mod submission {
    use super::*;

    #[tokio::test]
    async fn angler_can_submit_during_the_competition() {
        let app = TestApp::spawn().await;
        let f = field(&app, json!({})).await;

        let res = app
            .post_with_token(
                routes::FISH,
                &json!({"competition_id": f.competition_id, "fish_width": 12.5}),
                &f.angler,
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["result"], "DIARY_FISH_COMMIT_SUCCESS");
        let fish_id = res.data_id();

        let res = app.get_without_token(&routes::fish(fish_id)).await;
        assert_eq!(res.body["result"]["status"], 0);
        assert_eq!(res.body["result"]["user"]["id"], f.angler_id);
        assert_eq!(res.body["result"]["competition_name"], "Spring Bass Open");
    }

    #[tokio::test]
    async fn submission_outside_the_window_is_rejected_and_not_stored() {
        let app = TestApp::spawn().await;
        let f = field(
            &app,
            json!({
                "start_date": millis_from_now(60),
                "end_date": millis_from_now(120),
            }),
        )
        .await;

        let res = app
            .post_with_token(
                routes::FISH,
                &json!({"competition_id": f.competition_id}),
                &f.angler,
            )
            .await;
        assert_eq!(res.status, 404);
        assert_eq!(res.body["result"], "COMPETITION_DURATION_ERROR");

        let res = app
            .get_with_token(
                &format!("{}?competition_id={}", routes::FISH, f.competition_id),
                &f.admin,
            )
            .await;
        assert_eq!(res.body["total_count"], 0);
    }

    #[tokio::test]
    async fn submission_requires_a_token() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::FISH, &json!({"competition_id": 1}))
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn owner_can_attach_images_but_others_cannot() {
        let app = TestApp::spawn().await;
        let f = field(&app, json!({})).await;
        let fish_id = app.commit_fish(f.competition_id, &f.angler).await;
        let stranger = app.create_authenticated_user("bob", "securepass").await;

        let res = app
            .post_with_token(
                &routes::fish_images(fish_id),
                &json!({"image": "catches/alice-1.jpg"}),
                &f.angler,
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["result"], "DIARY_FISH_IMAGE_ADD_SUCCESS");

        let res = app
            .post_with_token(
                &routes::fish_images(fish_id),
                &json!({"image": "catches/bob.jpg"}),
                &stranger,
            )
            .await;
        assert_eq!(res.status, 403);

        let res = app.get_without_token(&routes::fish(fish_id)).await;
        let images = res.body["result"]["images"].as_array().unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0]["image"], "catches/alice-1.jpg");
    }

    #[tokio::test]
    async fn fish_list_is_limited_to_reviewers() {
        let app = TestApp::spawn().await;
        let f = field(&app, json!({})).await;
        let pending = app.commit_fish(f.competition_id, &f.angler).await;
        app.land_fish(f.competition_id, &f.angler, &f.admin, f.bass, 20.0)
            .await;

        let res = app.get_with_token(routes::FISH, &f.angler).await;
        assert_eq!(res.status, 403);

        let res = app
            .get_with_token(&format!("{}?status=0", routes::FISH), &f.admin)
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        let rows = res.body["result"].as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], pending);

        let res = app
            .get_with_token(&format!("{}?status=4", routes::FISH), &f.admin)
            .await;
        assert_eq!(res.status, 404);
        assert_eq!(res.body["result"], "FISH.INVALID_STATUS");
    }
}

mod verification {
    use super::*;

    #[tokio::test]
    async fn verified_fish_carries_species_and_width() {
        let app = TestApp::spawn().await;
        let f = field(&app, json!({})).await;
        let fish_id = app
            .land_fish(f.competition_id, &f.angler, &f.admin, f.bass, 21.5)
            .await;

        let res = app.get_without_token(&routes::fish(fish_id)).await;

        assert_eq!(res.body["result"]["status"], 1);
        assert_eq!(res.body["result"]["fish_type_name"], "Bass");
        assert_eq!(res.body["result"]["fish_width"], 21.5);
    }

    #[tokio::test]
    async fn angler_cannot_verify() {
        let app = TestApp::spawn().await;
        let f = field(&app, json!({})).await;
        let fish_id = app.commit_fish(f.competition_id, &f.angler).await;

        let res = app
            .post_with_token(
                &routes::fish_verify(fish_id),
                &json!({"fish_type_id": f.bass, "fish_width": 40.0}),
                &f.angler,
            )
            .await;

        assert_eq!(res.status, 403);
        assert!(record_of(&app, f.competition_id).await.is_null());
    }

    #[tokio::test]
    async fn second_verification_is_rejected_without_rescoring() {
        let app = TestApp::spawn().await;
        let f = field(&app, json!({})).await;
        let fish_id = app
            .land_fish(f.competition_id, &f.angler, &f.admin, f.bass, 10.0)
            .await;

        let res = app
            .post_with_token(
                &routes::fish_verify(fish_id),
                &json!({"fish_type_id": f.bass, "fish_width": 50.0}),
                &f.admin,
            )
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["result"], "FISH_ALREADY_VERIFIED");
        assert_eq!(record_of(&app, f.competition_id).await, 10.0);
    }

    #[tokio::test]
    async fn unknown_species_aborts_the_verification() {
        let app = TestApp::spawn().await;
        let f = field(&app, json!({})).await;
        let fish_id = app.commit_fish(f.competition_id, &f.angler).await;

        let res = app
            .post_with_token(
                &routes::fish_verify(fish_id),
                &json!({"fish_type_id": 9999, "fish_width": 10.0}),
                &f.admin,
            )
            .await;
        assert_eq!(res.status, 404);
        assert_eq!(res.body["result"], "FISH_TYPE_NOT_FOUND");

        let res = app.get_without_token(&routes::fish(fish_id)).await;
        assert_eq!(res.body["result"]["status"], 0);
    }

    #[tokio::test]
    async fn missing_fish_is_not_found() {
        let app = TestApp::spawn().await;
        let f = field(&app, json!({})).await;

        let res = app
            .post_with_token(
                &routes::fish_verify(9999),
                &json!({"fish_type_id": f.bass, "fish_width": 10.0}),
                &f.admin,
            )
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["result"], "FISH_NOT_FOUND");
    }

    #[tokio::test]
    async fn owner_edits_pending_fish_but_not_verified_ones() {
        let app = TestApp::spawn().await;
        let f = field(&app, json!({})).await;
        let pending = app.commit_fish(f.competition_id, &f.angler).await;
        let verified = app
            .land_fish(f.competition_id, &f.angler, &f.admin, f.bass, 10.0)
            .await;

        let res = app
            .patch_with_token(&routes::fish(pending), &json!({"fish_width": 7.5}), &f.angler)
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["result"], "FISH_UPDATE_SUCCESS");

        let stranger = app.create_authenticated_user("mallory", "securepass").await;
        let res = app
            .patch_with_token(&routes::fish(pending), &json!({"fish_width": 1.0}), &stranger)
            .await;
        assert_eq!(res.status, 403);

        let res = app
            .patch_with_token(&routes::fish(verified), &json!({"fish_width": 99.0}), &f.angler)
            .await;
        assert_eq!(res.status, 404);
        assert_eq!(res.body["result"], "FISH_ALREADY_VERIFIED");
    }

    #[tokio::test]
    async fn verified_fish_is_frozen_even_for_reviewers() {
        let app = TestApp::spawn().await;
        let f = field(&app, json!({"mode": 2})).await;
        let pike = app.create_fish_type("Pike").await;
        let verified = app
            .land_fish(f.competition_id, &f.angler, &f.admin, f.bass, 30.0)
            .await;

        for patch in [json!({"fish_width": 10.0}), json!({"fish_type_id": pike})] {
            let res = app
                .patch_with_token(&routes::fish(verified), &patch, &f.admin)
                .await;
            assert_eq!(res.status, 404, "{}", res.text);
            assert_eq!(res.body["result"], "FISH_ALREADY_VERIFIED");
        }

        let res = app.get_without_token(&routes::fish(verified)).await;
        assert_eq!(res.body["result"]["fish_width"], 30.0);
        assert_eq!(res.body["result"]["fish_type_id"], f.bass);
        assert_eq!(record_of(&app, f.competition_id).await, 30.0);
        let res = app.get_without_token(routes::REALTIME_RANKING).await;
        assert_eq!(res.body["result"][0]["record"], 30.0);
    }
}

mod scoring_modes {
    use super::*;

    async fn land_all(app: &TestApp, f: &Field, widths: &[f64]) -> Vec<Value> {
        let mut records = Vec::new();
        for &width in widths {
            app.land_fish(f.competition_id, &f.angler, &f.admin, f.bass, width)
                .await;
            records.push(record_of(app, f.competition_id).await);
        }
        records
    }

    #[tokio::test]
    async fn top_sum_adds_the_widest_fish() {
        let app = TestApp::spawn().await;
        let f = field(&app, json!({"mode": 1, "rank_fish_number": 2})).await;

        let records = land_all(&app, &f, &[5.0, 9.0, 3.0]).await;

        assert_eq!(records, vec![json!(5.0), json!(14.0), json!(14.0)]);
    }

    #[tokio::test]
    async fn max_width_keeps_the_widest_fish() {
        let app = TestApp::spawn().await;
        let f = field(&app, json!({"mode": 2})).await;

        let records = land_all(&app, &f, &[12.0, 30.0, 18.0]).await;

        assert_eq!(records, vec![json!(12.0), json!(30.0), json!(30.0)]);
    }

    #[tokio::test]
    async fn count_adds_one_per_fish() {
        let app = TestApp::spawn().await;
        let f = field(&app, json!({"mode": 3})).await;

        let records = land_all(&app, &f, &[1.0, 2.0, 3.0]).await;

        assert_eq!(records, vec![json!(1.0), json!(2.0), json!(3.0)]);
    }

    #[tokio::test]
    async fn threshold_count_ignores_short_fish() {
        let app = TestApp::spawn().await;
        let f = field(&app, json!({"mode": 4, "quest_fish_width": 30.0})).await;

        let records = land_all(&app, &f, &[20.0, 30.0, 45.0]).await;

        assert_eq!(records, vec![Value::Null, json!(1.0), json!(2.0)]);
    }

    #[tokio::test]
    async fn closest_to_target_keeps_the_smallest_deviation() {
        let app = TestApp::spawn().await;
        let f = field(&app, json!({"mode": 5, "quest_special_width": 10.0})).await;

        let records = land_all(&app, &f, &[15.0, 8.0, 12.0]).await;

        assert_eq!(records, vec![json!(5.0), json!(-2.0), json!(-2.0)]);
    }

    #[tokio::test]
    async fn unranked_competition_has_no_leaderboard() {
        let app = TestApp::spawn().await;
        let f = field(&app, json!({"mode": 0})).await;
        app.land_fish(f.competition_id, &f.angler, &f.admin, f.bass, 10.0)
            .await;

        let res = app
            .get_without_token(&routes::competition_ranking(f.competition_id))
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["result"], json!([]));
    }

    #[tokio::test]
    async fn pending_fish_do_not_count() {
        let app = TestApp::spawn().await;
        let f = field(&app, json!({"mode": 1, "rank_fish_number": 3})).await;
        app.commit_fish(f.competition_id, &f.angler).await;
        app.land_fish(f.competition_id, &f.angler, &f.admin, f.bass, 8.0)
            .await;

        assert_eq!(record_of(&app, f.competition_id).await, 8.0);
    }
}

mod enrollment {
    use super::*;

    #[tokio::test]
    async fn non_participant_fish_leaves_the_leaderboard_alone_by_default() {
        let app = TestApp::spawn().await;
        let f = field(&app, json!({})).await;
        let outsider = app.create_authenticated_user("bob", "securepass").await;

        app.land_fish(f.competition_id, &outsider, &f.admin, f.bass, 25.0)
            .await;

        let res = app
            .get_without_token(&routes::competition_ranking(f.competition_id))
            .await;
        let rows = res.body["result"].as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["user"]["id"], f.angler_id);
    }

    #[tokio::test]
    async fn auto_enroll_creates_the_participant_on_verification() {
        let app = TestApp::spawn_with(ScoringConfig { auto_enroll: true }).await;
        let admin = app.create_admin().await;
        let angler = app.create_authenticated_user("alice", "securepass").await;
        let bass = app.create_fish_type("Bass").await;
        let competition_id = app.create_competition(&admin, json!({})).await;

        app.land_fish(competition_id, &angler, &admin, bass, 25.0)
            .await;

        let res = app.get_with_token(&routes::competition(competition_id), &angler).await;
        assert_eq!(res.body["my_status"], true);
        assert_eq!(res.body["ranking"][0]["record"], 25.0);
    }

    #[tokio::test]
    async fn auto_enroll_tolerates_a_concurrent_join() {
        let app = TestApp::spawn_with(ScoringConfig { auto_enroll: true }).await;
        let admin = app.create_admin().await;
        let angler = app.create_authenticated_user("alice", "securepass").await;
        let bass = app.create_fish_type("Bass").await;
        let competition_id = app.create_competition(&admin, json!({})).await;
        let fish_id = app.commit_fish(competition_id, &angler).await;

        let join_route = routes::competition_join(competition_id);
        let join_body = json!({});
        let verify_route = routes::fish_verify(fish_id);
        let verify_body = json!({"fish_type_id": bass, "fish_width": 25.0});
        let (joined, verified) = tokio::join!(
            app.post_with_token(&join_route, &join_body, &angler),
            app.post_with_token(&verify_route, &verify_body, &admin),
        );

        assert!(
            joined.status == 200 || joined.status == 409,
            "{}",
            joined.text
        );
        assert_eq!(verified.status, 200, "{}", verified.text);
        assert_eq!(record_of(&app, competition_id).await, 25.0);
    }
}

mod leaderboards {
    use super::*;

    #[tokio::test]
    async fn competition_ranking_orders_by_record_and_reports_the_caller() {
        let app = TestApp::spawn().await;
        let f = field(&app, json!({"mode": 2})).await;
        let bob = app.create_authenticated_user("bob", "securepass").await;
        let carol = app.create_authenticated_user("carol", "securepass").await;
        app.join_competition(f.competition_id, &bob).await;
        app.join_competition(f.competition_id, &carol).await;

        app.land_fish(f.competition_id, &f.angler, &f.admin, f.bass, 20.0)
            .await;
        app.land_fish(f.competition_id, &bob, &f.admin, f.bass, 35.0)
            .await;

        let res = app
            .get_with_token(&routes::competition_ranking(f.competition_id), &f.angler)
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        let names: Vec<&str> = res.body["result"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["user"]["username"].as_str().unwrap())
            .collect();
        // Carol has no record yet and sorts last.
        assert_eq!(names, vec!["bob", "alice", "carol"]);
        assert_eq!(res.body["my_ranking"], 2);
        assert_eq!(res.body["participating"], true);
    }

    #[tokio::test]
    async fn caller_outside_the_window_has_no_rank() {
        let app = TestApp::spawn().await;
        let f = field(&app, json!({"mode": 2})).await;
        let bob = app.create_authenticated_user("bob", "securepass").await;
        app.join_competition(f.competition_id, &bob).await;
        app.land_fish(f.competition_id, &bob, &f.admin, f.bass, 35.0)
            .await;

        let res = app
            .get_with_token(
                &format!("{}?limit=1", routes::competition_ranking(f.competition_id)),
                &f.angler,
            )
            .await;

        assert_eq!(res.body["result"].as_array().unwrap().len(), 1);
        assert!(res.body["my_ranking"].is_null());
        assert_eq!(res.body["participating"], false);
    }

    #[tokio::test]
    async fn closest_to_target_ranks_by_absolute_deviation() {
        let app = TestApp::spawn().await;
        let f = field(&app, json!({"mode": 5, "quest_special_width": 10.0})).await;
        let bob = app.create_authenticated_user("bob", "securepass").await;
        app.join_competition(f.competition_id, &bob).await;

        app.land_fish(f.competition_id, &f.angler, &f.admin, f.bass, 13.0)
            .await;
        app.land_fish(f.competition_id, &bob, &f.admin, f.bass, 9.0)
            .await;

        let res = app
            .get_without_token(&routes::competition_ranking(f.competition_id))
            .await;
        assert_eq!(res.body["result"][0]["user"]["username"], "bob");
        assert_eq!(res.body["result"][0]["record"], -1.0);
        assert_eq!(res.body["result"][1]["record"], 3.0);
    }

    #[tokio::test]
    async fn realtime_ranking_uses_strictly_better_personal_bests() {
        let app = TestApp::spawn().await;
        let f = field(&app, json!({})).await;
        let pike = app.create_fish_type("Pike").await;
        let first = app
            .land_fish(f.competition_id, &f.angler, &f.admin, f.bass, 30.0)
            .await;
        // An equal width does not replace the stored best.
        app.land_fish(f.competition_id, &f.angler, &f.admin, pike, 30.0)
            .await;

        let res = app
            .get_with_token(routes::REALTIME_RANKING, &f.angler)
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["result"].as_array().unwrap().len(), 1);
        assert_eq!(res.body["result"][0]["fish_id"], first);
        assert_eq!(res.body["result"][0]["fish_type_name"], "Bass");
        assert_eq!(res.body["my_ranking"], 1);
        assert_eq!(res.body["my_fish"]["record"], 30.0);

        let res = app
            .get_without_token(&format!("{}?fish_type_id={pike}", routes::REALTIME_RANKING))
            .await;
        assert_eq!(res.body["result"], json!([]));

        let res = app
            .get_without_token(&format!("{}?fish_type_id=0", routes::REALTIME_RANKING))
            .await;
        assert_eq!(res.body["result"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn realtime_rank_counts_skipped_entries() {
        let app = TestApp::spawn().await;
        let f = field(&app, json!({})).await;
        let bob = app.create_authenticated_user("bob", "securepass").await;
        let carol = app.create_authenticated_user("carol", "securepass").await;
        app.join_competition(f.competition_id, &bob).await;
        app.join_competition(f.competition_id, &carol).await;
        for (token, width) in [(&f.angler, 30.0), (&bob, 20.0), (&carol, 10.0)] {
            app.land_fish(f.competition_id, token, &f.admin, f.bass, width)
                .await;
        }

        let res = app
            .get_with_token(&format!("{}?offset=1&limit=1", routes::REALTIME_RANKING), &bob)
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["result"].as_array().unwrap().len(), 1);
        assert_eq!(res.body["result"][0]["user"]["username"], "bob");
        assert_eq!(res.body["my_ranking"], 2);
        assert_eq!(res.body["my_fish"]["record"], 20.0);
    }

    #[tokio::test]
    async fn personal_best_carries_the_first_image() {
        let app = TestApp::spawn().await;
        let f = field(&app, json!({})).await;
        let fish_id = app.commit_fish(f.competition_id, &f.angler).await;
        for image in ["catches/a.jpg", "catches/b.jpg"] {
            let res = app
                .post_with_token(&routes::fish_images(fish_id), &json!({"image": image}), &f.angler)
                .await;
            assert_eq!(res.status, 200, "{}", res.text);
        }
        app.verify_fish(fish_id, f.bass, 18.0, &f.admin).await;

        let res = app.get_without_token(routes::REALTIME_RANKING).await;

        assert_eq!(res.body["result"][0]["fish_image"], "catches/a.jpg");
        assert!(res.body["my_ranking"].is_null());
    }
}

mod diary {
    use super::*;

    #[tokio::test]
    async fn comments_appear_on_the_fish_detail() {
        let app = TestApp::spawn().await;
        let f = field(&app, json!({})).await;
        let fish_id = app
            .land_fish(f.competition_id, &f.angler, &f.admin, f.bass, 18.0)
            .await;

        let res = app
            .post_with_token(
                &routes::fish_comments(fish_id),
                &json!({"comment": "Nice one!"}),
                &f.admin,
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["result"], "DIARY_COMMENT_REGISTER_SUCCESS");

        let res = app.get_without_token(&routes::fish(fish_id)).await;
        let comments = res.body["result"]["comments"].as_array().unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0]["comment"], "Nice one!");
        assert_eq!(comments[0]["user"]["username"], "admin");
    }

    #[tokio::test]
    async fn competition_and_user_fish_lists_show_verified_fish_only() {
        let app = TestApp::spawn().await;
        let f = field(&app, json!({})).await;
        app.commit_fish(f.competition_id, &f.angler).await;
        app.land_fish(f.competition_id, &f.angler, &f.admin, f.bass, 12.0)
            .await;
        app.land_fish(f.competition_id, &f.angler, &f.admin, f.bass, 19.0)
            .await;

        let res = app
            .get_without_token(&routes::competition_fish(f.competition_id))
            .await;
        assert_eq!(res.body["total_count"], 2);

        let res = app
            .get_without_token(&routes::competition_user_fish(f.competition_id, f.angler_id))
            .await;
        let widths: Vec<f64> = res.body["result"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["fish_width"].as_f64().unwrap())
            .collect();
        assert_eq!(widths, vec![19.0, 12.0]);
    }

    #[tokio::test]
    async fn diary_search_matches_competition_names() {
        let app = TestApp::spawn().await;
        let f = field(&app, json!({"name": "Lake Trout Derby"})).await;
        let other = app
            .create_competition(&f.admin, json!({"name": "River Cup"}))
            .await;
        app.join_competition(other, &f.angler).await;
        app.land_fish(f.competition_id, &f.angler, &f.admin, f.bass, 12.0)
            .await;
        app.land_fish(other, &f.angler, &f.admin, f.bass, 14.0)
            .await;

        let res = app
            .get_without_token(&format!("{}?keyword=trout", routes::user_diary(f.angler_id)))
            .await;
        // LIKE is case-sensitive on PostgreSQL.
        assert_eq!(res.body["total_count"], 0);

        let res = app
            .get_without_token(&format!("{}?keyword=Trout", routes::user_diary(f.angler_id)))
            .await;
        assert_eq!(res.body["total_count"], 1);
        assert_eq!(res.body["result"][0]["competition_name"], "Lake Trout Derby");

        let res = app
            .get_without_token(&format!("{}?keyword=%25", routes::user_diary(f.angler_id)))
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["total_count"], 0);

        let res = app
            .get_without_token(&routes::user_diary(f.angler_id))
            .await;
        assert_eq!(res.body["total_count"], 2);
    }
}
