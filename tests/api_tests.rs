mod common;

use reqwest::StatusCode;
use serde_json::json;
use uuid::Uuid;

use common::{approx, id_of, spawn_app};

// ── Health ───────────────────────────────────────────────────────

#[tokio::test]
async fn health_check() {
    let app = spawn_app().await;
    let resp = app.client.get(app.url("/health")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "ok");
}

// ── Roster ───────────────────────────────────────────────────────

#[tokio::test]
async fn project_crud() {
    let app = spawn_app().await;
    let project = app.create_project("Website Redesign").await;
    let id = id_of(&project);
    assert_eq!(project["status"], "active");
    assert_eq!(project["created_by"], "admin");

    let (body, status) = app.get(&format!("/api/v1/projects/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Website Redesign");

    let (body, status) = app
        .put(
            &format!("/api/v1/projects/{id}"),
            &json!({ "name": "Website v2", "status": "on-hold" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated"], true);

    let (body, _) = app.get(&format!("/api/v1/projects/{id}")).await;
    assert_eq!(body["name"], "Website v2");
    assert_eq!(body["status"], "on-hold");
    assert_eq!(body["created_by"], "admin");

    let (_, status) = app.delete(&format!("/api/v1/projects/{id}")).await;
    assert_eq!(status, StatusCode::OK);

    let (_, status) = app.get(&format!("/api/v1/projects/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn project_requires_name_and_ordered_dates() {
    let app = spawn_app().await;

    let (_, status) = app.post("/api/v1/projects", &json!({ "name": "  " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, status) = app
        .post(
            "/api/v1/projects",
            &json!({ "name": "Late", "start_date": "2024-03-01", "end_date": "2024-01-01" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn updating_unknown_records_is_a_no_op() {
    let app = spawn_app().await;
    let missing = Uuid::now_v7();

    let (body, status) = app
        .put(&format!("/api/v1/projects/{missing}"), &json!({ "name": "Ghost" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated"], false);

    let (body, status) = app
        .put(
            &format!("/api/v1/time-entries/{missing}"),
            &json!({
                "resource_id": Uuid::now_v7(),
                "project_id": Uuid::now_v7(),
                "date": "2024-01-02",
                "forecast_hours": 8.0,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated"], false);

    let (body, status) = app.delete(&format!("/api/v1/time-entries/{missing}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Deleted");
}

#[tokio::test]
async fn deleting_a_resource_removes_its_links() {
    let app = spawn_app().await;
    let project = id_of(&app.create_project("Apollo").await);
    let resource = id_of(&app.create_resource("Alex", None).await);
    let (_, status) = app.link(&project, &resource, 60.0).await;
    assert_eq!(status, StatusCode::OK);

    let (_, status) = app.delete(&format!("/api/v1/resources/{resource}")).await;
    assert_eq!(status, StatusCode::OK);

    let (links, _) = app.get("/api/v1/links").await;
    assert_eq!(links.as_array().unwrap().len(), 0);
}

// ── Viewer scope ─────────────────────────────────────────────────

#[tokio::test]
async fn managers_only_see_their_own_resources() {
    let app = spawn_app().await;
    let sarah = id_of(&app.create_manager("Sarah").await);
    let michael = id_of(&app.create_manager("Michael").await);
    app.create_resource("Alex", Some(&sarah)).await;
    app.create_resource("Jordan", Some(&michael)).await;

    let (all, _) = app.get("/api/v1/resources").await;
    assert_eq!(all.as_array().unwrap().len(), 2);

    let sarah_id: Uuid = sarah.parse().unwrap();
    let (mine, status) = app.get_as(sarah_id, "/api/v1/resources").await;
    assert_eq!(status, StatusCode::OK);
    let mine = mine.as_array().unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["name"], "Alex");

    // Admins can narrow by manager explicitly
    let (narrowed, _) = app
        .get(&format!("/api/v1/resources?manager_id={michael}"))
        .await;
    assert_eq!(narrowed.as_array().unwrap()[0]["name"], "Jordan");
}

#[tokio::test]
async fn manager_cannot_delete_another_managers_resource() {
    let app = spawn_app().await;
    let sarah = id_of(&app.create_manager("Sarah").await);
    let michael = id_of(&app.create_manager("Michael").await);
    let jordan = id_of(&app.create_resource("Jordan", Some(&michael)).await);

    let (body, status) = app
        .delete_as(sarah.parse().unwrap(), &format!("/api/v1/resources/{jordan}"))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].as_str().is_some());

    let (_, status) = app
        .delete_as(michael.parse().unwrap(), &format!("/api/v1/resources/{jordan}"))
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn managers_cannot_change_another_managers_links_or_entries() {
    let app = spawn_app().await;
    let sarah: Uuid = id_of(&app.create_manager("Sarah").await).parse().unwrap();
    let michael: Uuid = id_of(&app.create_manager("Michael").await).parse().unwrap();
    let apollo = id_of(&app.create_project("Apollo").await);
    let jordan = id_of(&app.create_resource("Jordan", Some(&michael.to_string())).await);

    let (link, status) = app
        .post_as(
            michael,
            "/api/v1/links",
            &json!({ "project_id": apollo, "resource_id": jordan, "allocation_percentage": 50 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let link_path = format!("/api/v1/links/{}", id_of(&link));

    let (_, status) = app
        .put_as(sarah, &link_path, &json!({ "allocation_percentage": 10 }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (_, status) = app.delete_as(sarah, &link_path).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let entry_body = json!({
        "resource_id": jordan,
        "project_id": apollo,
        "date": "2024-01-02",
        "forecast_hours": 8,
        "actual_hours": 6,
    });
    let (entry, status) = app
        .post_as(michael, "/api/v1/time-entries", &entry_body)
        .await;
    assert_eq!(status, StatusCode::OK);
    let entry_path = format!("/api/v1/time-entries/{}", id_of(&entry));

    let (_, status) = app.put_as(sarah, &entry_path, &entry_body).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (_, status) = app.delete_as(sarah, &entry_path).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (body, status) = app.put(&entry_path, &entry_body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated"], true);

    let (entries, _) = app.get_as(michael, "/api/v1/time-entries").await;
    assert_eq!(entries.as_array().unwrap().len(), 1);
    assert_eq!(entries[0]["manager_id"], michael.to_string());

    let (links, _) = app.get_as(michael, "/api/v1/links").await;
    assert_eq!(links[0]["allocation_percentage"], 50.0);
    let (_, status) = app.delete_as(michael, &link_path).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn resources_created_by_a_manager_belong_to_them() {
    let app = spawn_app().await;
    let sarah: Uuid = id_of(&app.create_manager("Sarah").await).parse().unwrap();

    let (body, status) = app
        .post_as(sarah, "/api/v1/resources", &json!({ "name": "Casey" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["manager_id"], sarah.to_string());
}

#[tokio::test]
async fn malformed_manager_header_is_rejected() {
    let app = spawn_app().await;
    let resp = app
        .client
        .get(app.url("/api/v1/resources"))
        .header("x-manager-id", "not-a-uuid")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn only_admins_manage_project_managers() {
    let app = spawn_app().await;
    let sarah: Uuid = id_of(&app.create_manager("Sarah").await).parse().unwrap();

    let (_, status) = app
        .post_as(sarah, "/api/v1/managers", &json!({ "name": "Eve" }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

// ── Allocation ledger ────────────────────────────────────────────

#[tokio::test]
async fn sixty_plus_forty_fills_a_resource() {
    let app = spawn_app().await;
    let apollo = id_of(&app.create_project("Apollo").await);
    let gemini = id_of(&app.create_project("Gemini").await);
    let alex = id_of(&app.create_resource("Alex", None).await);

    let (_, status) = app.link(&apollo, &alex, 60.0).await;
    assert_eq!(status, StatusCode::OK);
    let (_, status) = app.link(&gemini, &alex, 40.0).await;
    assert_eq!(status, StatusCode::OK);

    let (summary, status) = app.get(&format!("/api/v1/resources/{alex}/allocation")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["total_allocation"], 100.0);
    assert_eq!(summary["available_allocation"], 0.0);
    assert_eq!(summary["over_allocated"], false);
    assert_eq!(summary["weekly_hours"], 40.0);
}

#[tokio::test]
async fn over_allocation_is_recorded_and_flagged() {
    let app = spawn_app().await;
    let apollo = id_of(&app.create_project("Apollo").await);
    let gemini = id_of(&app.create_project("Gemini").await);
    let alex = id_of(&app.create_resource("Alex", None).await);

    app.link(&apollo, &alex, 80.0).await;
    let (_, status) = app.link(&gemini, &alex, 50.0).await;
    assert_eq!(status, StatusCode::OK);

    let (summary, _) = app.get(&format!("/api/v1/resources/{alex}/allocation")).await;
    assert_eq!(summary["total_allocation"], 130.0);
    assert_eq!(summary["available_allocation"], 0.0);
    assert_eq!(summary["over_allocated"], true);
}

#[tokio::test]
async fn duplicate_link_is_a_conflict() {
    let app = spawn_app().await;
    let apollo = id_of(&app.create_project("Apollo").await);
    let alex = id_of(&app.create_resource("Alex", None).await);

    let (_, status) = app.link(&apollo, &alex, 30.0).await;
    assert_eq!(status, StatusCode::OK);
    let (_, status) = app.link(&apollo, &alex, 20.0).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn link_rejects_bad_percentages_and_unknown_ids() {
    let app = spawn_app().await;
    let apollo = id_of(&app.create_project("Apollo").await);
    let alex = id_of(&app.create_resource("Alex", None).await);

    let (_, status) = app.link(&apollo, &alex, 0.0).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (_, status) = app.link(&apollo, &alex, -10.0).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, status) = app.link(&Uuid::now_v7().to_string(), &alex, 10.0).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unlink_twice_is_idempotent() {
    let app = spawn_app().await;
    let apollo = id_of(&app.create_project("Apollo").await);
    let alex = id_of(&app.create_resource("Alex", None).await);
    let (link, _) = app.link(&apollo, &alex, 50.0).await;
    let link_id = id_of(&link);

    for _ in 0..2 {
        let (body, status) = app.delete(&format!("/api/v1/links/{link_id}")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Deleted");
    }

    let (summary, _) = app.get(&format!("/api/v1/resources/{alex}/allocation")).await;
    assert_eq!(summary["total_allocation"], 0.0);
    assert_eq!(summary["available_allocation"], 100.0);
}

#[tokio::test]
async fn update_allocation_changes_percentage_in_place() {
    let app = spawn_app().await;
    let apollo = id_of(&app.create_project("Apollo").await);
    let alex = id_of(&app.create_resource("Alex", None).await);
    let (link, _) = app.link(&apollo, &alex, 50.0).await;
    let link_id = id_of(&link);

    let (body, status) = app
        .put(
            &format!("/api/v1/links/{link_id}"),
            &json!({ "allocation_percentage": 75.0 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated"], true);
    assert_eq!(body["link"]["id"], link_id);
    assert_eq!(body["link"]["allocation_percentage"], 75.0);

    let (summary, _) = app.get(&format!("/api/v1/resources/{alex}/allocation")).await;
    assert_eq!(summary["total_allocation"], 75.0);
}

#[tokio::test]
async fn capacity_hours_per_period() {
    let app = spawn_app().await;

    let (body, status) = app.get("/api/v1/capacity-hours?percentage=50&period=day").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["hours"], 4.0);

    let (body, _) = app.get("/api/v1/capacity-hours?percentage=50").await;
    assert_eq!(body["period"], "week");
    assert_eq!(body["hours"], 20.0);

    let (body, _) = app.get("/api/v1/capacity-hours?percentage=50&period=month").await;
    assert!(approx(body["hours"].as_f64().unwrap(), 86.6));
}

// ── Time ledger ──────────────────────────────────────────────────

#[tokio::test]
async fn time_entries_filter_by_resource_and_window() {
    let app = spawn_app().await;
    let apollo = id_of(&app.create_project("Apollo").await);
    let alex = id_of(&app.create_resource("Alex", None).await);
    let jordan = id_of(&app.create_resource("Jordan", None).await);

    app.log_hours(&alex, &apollo, "2024-01-02", 8.0, 7.0).await;
    app.log_hours(&alex, &apollo, "2024-01-09", 8.0, 8.0).await;
    app.log_hours(&jordan, &apollo, "2024-01-02", 8.0, 6.0).await;

    let (body, status) = app
        .get(&format!(
            "/api/v1/time-entries?resource_id={alex}&start_date=2024-01-01&end_date=2024-01-07"
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["actual_hours"], 7.0);

    let (body, _) = app.get("/api/v1/time-entries").await;
    assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn time_entries_reject_negative_hours() {
    let app = spawn_app().await;
    let (_, status) = app
        .post(
            "/api/v1/time-entries",
            &json!({
                "resource_id": Uuid::now_v7(),
                "project_id": Uuid::now_v7(),
                "date": "2024-01-02",
                "forecast_hours": 8.0,
                "actual_hours": -1.0,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn forecast_plan_can_be_committed_in_bulk() {
    let app = spawn_app().await;
    let apollo = id_of(&app.create_project("Apollo").await);
    let alex = id_of(&app.create_resource("Alex", None).await);
    app.link(&apollo, &alex, 50.0).await;

    let (plan, status) = app
        .get(&format!(
            "/api/v1/forecast-plan?resource_id={alex}&project_id={apollo}&month=2024-01"
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(plan["granularity"], "day");
    let days = plan["days"].as_array().unwrap();
    assert_eq!(days.len(), 23);
    assert_eq!(days[0]["date"], "2024-01-01");
    assert_eq!(days[0]["forecast_hours"], 4.0);

    let entries: Vec<_> = days
        .iter()
        .map(|d| {
            json!({
                "resource_id": alex,
                "project_id": apollo,
                "date": d["date"],
                "forecast_hours": d["forecast_hours"],
            })
        })
        .collect();
    let (added, status) = app
        .post("/api/v1/time-entries/bulk", &json!(entries))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(added.as_array().unwrap().len(), 23);
    assert!(added[0]["actual_hours"].is_null());

    let (weekly, _) = app
        .get(&format!(
            "/api/v1/forecast-plan?resource_id={alex}&project_id={apollo}&month=2024-01&granularity=week"
        ))
        .await;
    let weeks = weekly["weeks"].as_array().unwrap();
    assert_eq!(weeks.len(), 5);
    assert_eq!(weeks[0]["key"], "2024-W01");
    assert_eq!(weeks[0]["forecast_hours"], 20.0);
    assert_eq!(weeks[4]["working_days"], 3);
    assert_eq!(weeks[4]["forecast_hours"], 12.0);
}

#[tokio::test]
async fn forecast_plan_needs_an_existing_link() {
    let app = spawn_app().await;
    let apollo = id_of(&app.create_project("Apollo").await);
    let alex = id_of(&app.create_resource("Alex", None).await);

    let (_, status) = app
        .get(&format!(
            "/api/v1/forecast-plan?resource_id={alex}&project_id={apollo}&month=2024-01"
        ))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    app.link(&apollo, &alex, 50.0).await;
    let (_, status) = app
        .get(&format!(
            "/api/v1/forecast-plan?resource_id={alex}&project_id={apollo}&month=January"
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ── Reports ──────────────────────────────────────────────────────

#[tokio::test]
async fn utilization_report_for_one_week_at_half_allocation() {
    let app = spawn_app().await;
    let apollo = id_of(&app.create_project("Apollo").await);
    let alex = id_of(&app.create_resource("Alex", None).await);
    app.link(&apollo, &alex, 50.0).await;
    app.log_hours(&alex, &apollo, "2024-01-02", 10.0, 10.0).await;
    app.log_hours(&alex, &apollo, "2024-01-03", 10.0, 10.0).await;

    let (report, status) = app
        .get("/api/v1/reports/utilization?start_date=2024-01-01&end_date=2024-01-07")
        .await;
    assert_eq!(status, StatusCode::OK);

    let row = &report["resources"][0];
    assert_eq!(row["name"], "Alex");
    assert_eq!(row["expected_capacity"], 20.0);
    assert_eq!(row["utilization"], 100.0);
    assert_eq!(row["efficiency"], 100.0);
    assert_eq!(row["variance"], 0.0);
    assert_eq!(row["status"], "high");

    assert_eq!(report["summary"]["total"], 1);
    assert_eq!(report["summary"]["high"], 1);
}

#[tokio::test]
async fn utilization_report_filters_by_status() {
    let app = spawn_app().await;
    let apollo = id_of(&app.create_project("Apollo").await);
    let alex = id_of(&app.create_resource("Alex", None).await);
    app.create_resource("Idle", None).await;
    app.link(&apollo, &alex, 50.0).await;
    app.log_hours(&alex, &apollo, "2024-01-02", 20.0, 20.0).await;

    let (report, _) = app
        .get("/api/v1/reports/utilization?start_date=2024-01-01&end_date=2024-01-07&status=available")
        .await;
    let rows = report["resources"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], "Idle");
}

#[tokio::test]
async fn inverted_window_is_rejected() {
    let app = spawn_app().await;
    let (body, status) = app
        .get("/api/v1/reports/utilization?start_date=2024-02-01&end_date=2024-01-01")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("start_date"));
}

#[tokio::test]
async fn report_windows_are_capped_at_a_year() {
    let app = spawn_app().await;
    app.create_resource("Alex", None).await;

    for report in ["heatmap", "utilization", "analytics"] {
        let (body, status) = app
            .get(&format!(
                "/api/v1/reports/{report}?start_date=0001-01-01&end_date=9999-12-31"
            ))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{report}");
        assert!(body["error"].as_str().unwrap().contains("366"));
    }

    let (_, status) = app
        .get("/api/v1/reports/heatmap?start_date=2024-01-01&end_date=2024-12-31")
        .await;
    assert_eq!(status, StatusCode::OK);
    let (_, status) = app
        .get("/api/v1/reports/heatmap?start_date=2024-01-01&end_date=2025-01-01")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn burnout_and_predictions_reports() {
    let app = spawn_app().await;
    let apollo = id_of(&app.create_project("Apollo").await);
    let alex = id_of(&app.create_resource("Alex", None).await);
    app.link(&apollo, &alex, 50.0).await;
    // 19h logged against 25h forecast on a 20h week: 95% utilization, 76% efficiency
    app.log_hours(&alex, &apollo, "2024-01-02", 25.0, 19.0).await;

    let window = "start_date=2024-01-01&end_date=2024-01-07";
    let (risks, status) = app.get(&format!("/api/v1/reports/burnout?{window}")).await;
    assert_eq!(status, StatusCode::OK);
    let risks = risks.as_array().unwrap();
    assert_eq!(risks.len(), 1);
    assert_eq!(risks[0]["risk_level"], "high");
    assert_eq!(risks[0]["risk_score"], 50);

    let (predictions, _) = app
        .get(&format!("/api/v1/reports/predictions?{window}"))
        .await;
    let prediction = &predictions[0];
    assert_eq!(prediction["name"], "Apollo");
    assert_eq!(prediction["remaining_hours"], 6.0);
    assert_eq!(prediction["on_track"], false);
    assert_eq!(prediction["confidence_level"], 66.0);
}

#[tokio::test]
async fn analytics_and_heatmap_reports() {
    let app = spawn_app().await;
    let apollo = id_of(&app.create_project("Apollo").await);
    let alex = id_of(&app.create_resource("Alex", None).await);
    app.link(&apollo, &alex, 100.0).await;
    app.log_hours(&alex, &apollo, "2024-01-02", 8.0, 4.0).await;

    let window = "start_date=2024-01-01&end_date=2024-01-07";
    let (report, status) = app
        .get(&format!("/api/v1/reports/analytics?{window}"))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["total_forecast"], 8.0);
    assert_eq!(report["total_actual"], 4.0);
    assert_eq!(report["accuracy"], 50.0);
    assert_eq!(report["daily_trends"].as_array().unwrap().len(), 1);
    assert_eq!(report["recommendations"][0]["kind"], "optimization");

    let (heatmap, status) = app.get(&format!("/api/v1/reports/heatmap?{window}")).await;
    assert_eq!(status, StatusCode::OK);
    let cells = heatmap[0]["cells"].as_array().unwrap();
    assert_eq!(cells.len(), 7);
    assert_eq!(cells[1]["date"], "2024-01-02");
    assert_eq!(cells[1]["utilization"], 50);
    assert_eq!(cells[0]["utilization"], 0);
}

#[tokio::test]
async fn dashboard_depends_on_viewer() {
    let app = spawn_app().await;
    let sarah = id_of(&app.create_manager("Sarah").await);
    app.create_project("Apollo").await;
    app.create_resource("Alex", Some(&sarah)).await;

    let (admin, status) = app.get("/api/v1/dashboard").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(admin["stats"]["scope"], "admin");
    assert_eq!(admin["stats"]["active_projects"], 1);
    assert_eq!(admin["stats"]["project_managers"], 1);
    assert_eq!(admin["stats"]["total_resources"], 1);

    let (mine, _) = app.get_as(sarah.parse().unwrap(), "/api/v1/dashboard").await;
    assert_eq!(mine["stats"]["scope"], "manager");
    assert_eq!(mine["stats"]["my_resources"], 1);
}

// ── Sync surface without a mirror ────────────────────────────────

#[tokio::test]
async fn sync_endpoints_without_a_mirror() {
    let app = spawn_app().await;

    let (health, status) = app.get("/api/v1/sync/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["configured"], false);
    assert_eq!(health["connected"], false);

    let (_, status) = app.post("/api/v1/sync/pull", &json!({})).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    let (_, status) = app.post("/api/v1/sync/push", &json!({})).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (health, status) = app
        .put("/api/v1/sync/auto", &json!({ "enabled": false }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["auto_sync"], false);
}
