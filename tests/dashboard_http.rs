mod common;

use axum::http::StatusCode;
use serde_json::Value;

use common::app::{spawn_empty_app, spawn_test_app, spawn_unloaded_app};
use common::http::{assert_json_error, assert_status_ok_json, get_json, post_json};

fn missions_named<'a>(missions: &'a [Value], name: &str) -> Vec<&'a Value> {
    missions.iter().filter(|m| m["mission"] == name).collect()
}

#[tokio::test]
async fn lists_every_loaded_record_with_dense_ranks() {
    let app = spawn_test_app().await;
    let (status, body) = get_json(&app.app, "/api/missions").await;
    assert_status_ok_json(status, &body);

    assert_eq!(body["data"]["total"], 6);
    let missions = body["data"]["missions"].as_array().expect("missions array");

    let magic = missions_named(missions, "Mechanical Magic");
    assert_eq!(magic.len(), 3);
    let ranks: Vec<u64> = magic.iter().map(|m| m["rank"].as_u64().unwrap()).collect();
    assert_eq!(ranks, vec![1, 1, 2]);
    assert_eq!(magic[0]["map"], "Mechengine");
    assert_eq!(magic[0]["time"], "0:21:25");
    assert_eq!(magic[0]["isWorldRecord"], true);
    assert_eq!(magic[2]["isWorldRecord"], false);

    let wave = missions_named(missions, "Wave 666");
    assert_eq!(wave.len(), 2);
    assert_eq!(wave[0]["difficulty"], "Advanced");
    assert_eq!(wave[0]["totalPlayers"], 2);
    assert_eq!(wave[0]["date"], "03/01/2024");
    assert_eq!(wave[1]["rank"], 2);
}

#[tokio::test]
async fn records_carry_title_and_prompt() {
    let app = spawn_test_app().await;
    let (_, body) = get_json(&app.app, "/api/missions").await;
    let missions = body["data"]["missions"].as_array().expect("missions array");

    let oil = missions_named(missions, "Oil Spill")[0];
    let title = oil["title"].as_str().unwrap();
    assert!(title.contains("Oil spill - Intermediate"));
    assert!(title.ends_with("[0:03:20]"));

    let prompt = oil["aiPrompt"].as_str().unwrap();
    assert!(prompt.starts_with(&format!("**Title:** {title}")));
    assert!(prompt.contains("- **Mission:** Oil Spill"));
    assert!(prompt.contains("- **Players:** Sporeling"));
    assert!(prompt.contains("- **Date:** 03/05/2024"));
}

#[tokio::test]
async fn filters_missions_by_player_name() {
    let app = spawn_test_app().await;
    let (_, body) = get_json(&app.app, "/api/missions?player=googlayz").await;

    assert_eq!(body["data"]["total"], 1);
    let record = &body["data"]["missions"][0];
    assert_eq!(record["mission"], "Mechanical Magic");
    assert_eq!(record["players"][0]["personaName"], "Googlayz");
}

#[tokio::test]
async fn search_falls_back_to_nearest_date() {
    let app = spawn_test_app().await;
    let (status, body) = get_json(&app.app, "/api/missions/search?date=2024-03-07").await;
    assert_status_ok_json(status, &body);

    let data = &body["data"];
    assert_eq!(data["exact"], false);
    assert_eq!(data["matchedDate"], "03/05/2024");
    assert_eq!(
        data["notice"],
        "No data found for 03/07/2024. Showing results for the nearest date: 03/05/2024"
    );
    assert_eq!(data["records"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn search_exact_date_with_record_type() {
    let app = spawn_test_app().await;
    let (_, body) = get_json(
        &app.app,
        "/api/missions/search?date=03/10/2024&recordType=world_record",
    )
    .await;

    let data = &body["data"];
    assert_eq!(data["exact"], true);
    assert!(data["notice"].is_null());
    let records = data["records"].as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r["isWorldRecord"] == true));

    let (_, body) = get_json(
        &app.app,
        "/api/missions/search?date=2024-03-10&recordType=personal_best",
    )
    .await;
    assert_eq!(body["data"]["matchedDate"], "03/05/2024");
}

#[tokio::test]
async fn search_without_matches_reports_notice() {
    let app = spawn_test_app().await;
    let (_, body) = get_json(&app.app, "/api/missions/search?date=2024-03-07&player=nobody").await;

    assert_eq!(body["data"]["notice"], "No data found for 03/07/2024.");
    assert!(body["data"]["records"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn search_rejects_bad_dates() {
    let app = spawn_test_app().await;
    let (status, body) = get_json(&app.app, "/api/missions/search?date=yesterday").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_json_error(&body, "INVALID_DATE");
    assert!(body["traceId"].is_string());
}

#[tokio::test]
async fn search_requires_date_param() {
    let app = spawn_test_app().await;
    let (status, body) = get_json(&app.app, "/api/missions/search").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_json_error(&body, "INVALID_QUERY");
}

#[tokio::test]
async fn players_are_sorted_by_world_records() {
    let app = spawn_test_app().await;
    let (status, body) = get_json(&app.app, "/api/players").await;
    assert_status_ok_json(status, &body);

    let players = body["data"].as_array().unwrap();
    let ids: Vec<&str> = players.iter().map(|p| p["steamId"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["1", "3", "2", "4"]);
    let held: Vec<u64> = players
        .iter()
        .map(|p| p["worldRecordsHeld"].as_u64().unwrap())
        .collect();
    assert_eq!(held, vec![2, 2, 1, 0]);

    let (_, body) = get_json(&app.app, "/api/players?name=SPORE").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn top_players_use_full_avatars() {
    let app = spawn_test_app().await;
    let (status, body) = get_json(&app.app, "/api/players/top?count=10").await;
    assert_status_ok_json(status, &body);

    let top = body["data"].as_array().unwrap();
    assert_eq!(top.len(), 4);
    assert_eq!(top[0]["avatarUrl"], "https://avatars.example/1_full.jpg");
    assert!(top[0].get("description").is_none());
}

#[tokio::test]
async fn top_players_with_enrich_skips_missing_profiles() {
    let app = spawn_test_app().await;
    let (status, body) = get_json(&app.app, "/api/players/top?enrich=true").await;
    assert_status_ok_json(status, &body);
    assert!(body["data"][0].get("backgroundUrl").is_none());
}

#[tokio::test]
async fn top_players_rejects_unsupported_count() {
    let app = spawn_test_app().await;
    let (status, body) = get_json(&app.app, "/api/players/top?count=7").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_json_error(&body, "INVALID_COUNT");
}

#[tokio::test]
async fn clusters_cover_every_mission_name() {
    let app = spawn_test_app().await;
    let (status, body) = get_json(&app.app, "/api/clusters").await;
    assert_status_ok_json(status, &body);

    let mut names: Vec<String> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .flat_map(|c| c["missions"].as_array().unwrap().clone())
        .map(|m| m.as_str().unwrap().to_lowercase())
        .collect();
    names.sort();
    assert_eq!(names, vec!["mechanical magic", "oil spill", "wave 666"]);
}

#[tokio::test]
async fn status_reports_partial_load() {
    let app = spawn_test_app().await;
    let (status, body) = get_json(&app.app, "/api/status").await;
    assert_status_ok_json(status, &body);

    let data = &body["data"];
    assert_eq!(data["loaded"], true);
    assert_eq!(data["missions"], 6);
    assert_eq!(data["players"], 4);
    assert_eq!(data["report"]["mapsRequested"], 4);
    assert_eq!(data["report"]["mapsLoaded"], 2);
    let warnings = data["report"]["warnings"].as_array().unwrap();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].as_str().unwrap().starts_with("mvm_broken"));
}

#[tokio::test]
async fn refresh_endpoint_loads_snapshot() {
    let app = spawn_unloaded_app().await;

    let (status, body) = get_json(&app.app, "/api/missions").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_json_error(&body, "DASHBOARD_UNAVAILABLE");

    let (_, body) = get_json(&app.app, "/api/status").await;
    assert_eq!(body["data"]["loaded"], false);

    let (status, body) = post_json(&app.app, "/api/refresh").await;
    assert_status_ok_json(status, &body);
    assert_eq!(body["data"]["missions"], 6);

    let (status, _) = get_json(&app.app, "/api/missions").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn empty_map_list_answers_unavailable_with_notice() {
    let app = spawn_empty_app().await;
    let (status, body) = get_json(&app.app, "/api/missions").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_json_error(&body, "DASHBOARD_UNAVAILABLE");
    assert_eq!(body["message"], "No map names were found.");

    let (_, body) = get_json(&app.app, "/api/status").await;
    assert_eq!(body["data"]["report"]["notice"], "No map names were found.");
}

#[tokio::test]
async fn top_players_enriched_from_profile_pages() {
    use axum::response::Html;
    use axum::routing::get;
    use std::sync::Arc;

    let profile = axum::Router::new().route(
        "/id/shroomer",
        get(|| async {
            Html(
                r#"<div class="no_header profile_page has_profile_background" style="background-image: url('https://cdn.example/spores.jpg');">
                   <div class="profile_summary">Spore hunter<br>Shroom fan</div></div>"#,
            )
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, profile).await.unwrap();
    });

    let source = common::fixtures::source_with_profile(&format!("http://{addr}/id/shroomer"));
    let app = common::app::spawn_with_source(Arc::new(source), true).await;

    let (status, body) = get_json(&app.app, "/api/players/top?count=20&enrich=true").await;
    assert_status_ok_json(status, &body);
    let top = &body["data"][0];
    assert_eq!(top["steamId"], "1");
    assert_eq!(top["description"], "Spore hunter<br>Shroom fan");
    assert_eq!(top["backgroundUrl"], "https://cdn.example/spores.jpg");
    assert_eq!(app.state.dashboard().enricher().cached().await, 1);
}
