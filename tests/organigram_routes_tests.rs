mod common;

use actix_web::{http::StatusCode, test, web, App};
use club_organigram::organigram::routes::{self, SessionSnapshot};
use club_organigram::organigram::{Department, MemberSource, StaticSource};
use club_organigram::AppState;
use common::{member, sample_members};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

fn app_state(source: StaticSource) -> web::Data<AppState> {
    let source: Arc<dyn MemberSource + Send + Sync> = Arc::new(source);
    web::Data::new(AppState::with_source(
        source,
        Duration::from_secs(60),
        Duration::from_secs(60),
    ))
}

#[cfg(test)]
mod organigram_routes_tests {
    use super::*;

    #[actix_web::test]
    async fn test_summary_reports_counts_and_roots() {
        let app = test::init_service(
            App::new()
                .app_data(app_state(StaticSource::new(sample_members())))
                .configure(routes::config),
        )
        .await;

        let req = test::TestRequest::get().uri("/organigram").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["total"], 8);
        assert_eq!(body["roots"], json!(["club"]));
        assert_eq!(body["countsByDepartment"]["jeugdbestuur"], 3);
        assert_eq!(body["warnings"], json!([]));
    }

    #[actix_web::test]
    async fn test_filter_endpoint_applies_scope() {
        let app = test::init_service(
            App::new()
                .app_data(app_state(StaticSource::new(sample_members())))
                .configure(routes::config),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/organigram/filter?department=hoofdbestuur")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["visibleIds"], json!(["club", "pm", "sec", "vrij", "vz"]));
        assert_eq!(body["countsByDepartment"]["hoofdbestuur"], 2);
    }

    #[actix_web::test]
    async fn test_search_endpoint_returns_ranked_entries() {
        let app = test::init_service(
            App::new()
                .app_data(app_state(StaticSource::new(sample_members())))
                .configure(routes::config),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/organigram/search?q=ans")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body[0]["id"], "jv");
        assert_eq!(body[0]["tier"], "namePrefix");
        assert_eq!(body[0]["path"][0]["label"], "VV De Meeuwen");
        assert_eq!(body[1]["id"], "sec");

        let req = test::TestRequest::get().uri("/organigram/search").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!([]));
    }

    #[actix_web::test]
    async fn test_cyclic_members_yield_assertive_error() {
        let app = test::init_service(
            App::new()
                .app_data(app_state(StaticSource::new(vec![
                    member("x", Some("y"), Department::General),
                    member("y", Some("x"), Department::General),
                ])))
                .configure(routes::config),
        )
        .await;

        let req = test::TestRequest::get().uri("/organigram").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "InvalidOrganigram");
        assert_eq!(body["announcement"]["politeness"], "assertive");
    }

    #[actix_web::test]
    async fn test_session_flow_across_views() {
        let app = test::init_service(
            App::new()
                .app_data(app_state(StaticSource::new(sample_members())))
                .configure(routes::config),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/organigram/sessions")
            .set_json(json!({ "deepLink": "#lid-pm" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: SessionSnapshot = test::read_body_json(resp).await;
        let id = created.session_id;
        assert_eq!(created.focused.as_ref().map(|f| f.as_str()), Some("pm"));
        assert_eq!(created.rendered_count, 6);

        let req = test::TestRequest::post()
            .uri(&format!("/organigram/sessions/{}/scope", id))
            .set_json(json!({ "department": "jeugdbestuur" }))
            .to_request();
        let snapshot: SessionSnapshot = test::call_and_read_body_json(&app, req).await;
        assert_eq!(snapshot.focused, None);
        assert_eq!(
            snapshot.announcement.map(|a| a.message),
            Some("Filter Jeugdbestuur: 5 leden zichtbaar".to_string())
        );

        let req = test::TestRequest::get()
            .uri(&format!("/organigram/sessions/{}/cards", id))
            .to_request();
        let cards: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(cards[0]["id"], "club");
        assert_eq!(cards[0]["children"][0]["id"], "vz");
        let board_children = &cards[0]["children"][0]["children"];
        assert_eq!(board_children.as_array().map(Vec::len), Some(1));
        assert_eq!(board_children[0]["id"], "sec");
        assert_eq!(board_children[0]["department"], "general");
        assert_eq!(board_children[0]["childCount"], 0);
        assert_eq!(cards[0]["children"][1]["expanded"], false);

        let req = test::TestRequest::get()
            .uri(&format!("/organigram/sessions/{}/diagram", id))
            .to_request();
        let diagram: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(diagram["nodes"].as_array().map(Vec::len), Some(5));
        assert_eq!(diagram["edges"].as_array().map(Vec::len), Some(4));
    }

    #[actix_web::test]
    async fn test_session_transitions_and_finder() {
        let app = test::init_service(
            App::new()
                .app_data(app_state(StaticSource::new(sample_members())))
                .configure(routes::config),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/organigram/sessions")
            .set_json(json!({}))
            .to_request();
        let created: SessionSnapshot = test::call_and_read_body_json(&app, req).await;
        let id = created.session_id;

        let req = test::TestRequest::post()
            .uri(&format!("/organigram/sessions/{}/toggle/club", id))
            .to_request();
        let snapshot: SessionSnapshot = test::call_and_read_body_json(&app, req).await;
        assert_eq!(snapshot.expanded.len(), 1);
        assert_eq!(snapshot.rendered_count, 4);

        let req = test::TestRequest::post()
            .uri(&format!("/organigram/sessions/{}/expand-path/sch", id))
            .to_request();
        let snapshot: SessionSnapshot = test::call_and_read_body_json(&app, req).await;
        assert_eq!(snapshot.expanded.len(), 2);

        let req = test::TestRequest::post()
            .uri(&format!("/organigram/sessions/{}/query", id))
            .set_json(json!({ "query": "sponsor" }))
            .to_request();
        let snapshot: SessionSnapshot = test::call_and_read_body_json(&app, req).await;
        assert_eq!(snapshot.query, "sponsor");

        let req = test::TestRequest::get()
            .uri(&format!("/organigram/sessions/{}/finder", id))
            .to_request();
        let finder: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(finder[0]["id"], "pm");
        assert_eq!(finder[0]["tier"], "responsibility");

        let req = test::TestRequest::post()
            .uri(&format!("/organigram/sessions/{}/navigate", id))
            .set_json(json!({ "key": "end" }))
            .to_request();
        let snapshot: SessionSnapshot = test::call_and_read_body_json(&app, req).await;
        assert_eq!(snapshot.focused.map(|f| f.0), Some("vrij".to_string()));

        let req = test::TestRequest::post()
            .uri(&format!("/organigram/sessions/{}/collapse-all", id))
            .to_request();
        let snapshot: SessionSnapshot = test::call_and_read_body_json(&app, req).await;
        assert!(snapshot.expanded.is_empty());
        assert_eq!(snapshot.rendered_count, 1);
    }

    #[actix_web::test]
    async fn test_unknown_member_and_session_are_not_found() {
        let app = test::init_service(
            App::new()
                .app_data(app_state(StaticSource::new(sample_members())))
                .configure(routes::config),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/organigram/sessions")
            .set_json(json!({}))
            .to_request();
        let created: SessionSnapshot = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::post()
            .uri("/organigram/sessions")
            .set_json(json!({ "deepLink": "#lid-" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/organigram/sessions")
            .set_json(json!({ "deepLink": "#lid-ghost" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::post()
            .uri(&format!(
                "/organigram/sessions/{}/toggle/ghost",
                created.session_id
            ))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::delete()
            .uri(&format!("/organigram/sessions/{}", created.session_id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let req = test::TestRequest::get()
            .uri(&format!("/organigram/sessions/{}", created.session_id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_announcement_is_delivered_once() {
        let app = test::init_service(
            App::new()
                .app_data(app_state(StaticSource::new(sample_members())))
                .configure(routes::config),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/organigram/sessions")
            .set_json(json!({}))
            .to_request();
        let created: SessionSnapshot = test::call_and_read_body_json(&app, req).await;
        let id = created.session_id;

        let req = test::TestRequest::post()
            .uri(&format!("/organigram/sessions/{}/toggle/club", id))
            .to_request();
        let snapshot: SessionSnapshot = test::call_and_read_body_json(&app, req).await;
        assert_eq!(
            snapshot.announcement.map(|a| a.message),
            Some("VV De Meeuwen uitgeklapt, 4 leden zichtbaar".to_string())
        );

        for expected in ["club", "vz"] {
            let req = test::TestRequest::post()
                .uri(&format!("/organigram/sessions/{}/navigate", id))
                .set_json(json!({ "key": "down" }))
                .to_request();
            let snapshot: SessionSnapshot = test::call_and_read_body_json(&app, req).await;
            assert_eq!(snapshot.focused.map(|f| f.0), Some(expected.to_string()));
            assert_eq!(snapshot.announcement, None);
        }

        let req = test::TestRequest::get()
            .uri(&format!("/organigram/sessions/{}", id))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["announcement"], Value::Null);
    }
}
