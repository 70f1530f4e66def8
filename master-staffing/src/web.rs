use actix_files::NamedFile;
use actix_web::{middleware, web, App, HttpResponse, HttpServer, Result};
use chrono::Weekday;
use log::info;
use serde::Deserialize;
use std::sync::{Mutex, MutexGuard};

use crate::config::AppConfig;
use crate::coverage::{generate_coverage, CoverageReport};
use crate::editor::{self, ShiftField};
use crate::loader::{load_demand, load_or_empty, load_staff_schedules};
use crate::model::{parse_day_name, DemandRecord, StaffSchedule, ROTA_WEEKS};

/// In-memory state shared by all workers; nothing here outlives the process
pub struct AppState {
    pub staff: Mutex<Vec<StaffSchedule>>,
    pub demand: Mutex<Vec<DemandRecord>>,
    pub report: Mutex<Option<CoverageReport>>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(config: AppConfig, staff: Vec<StaffSchedule>, demand: Vec<DemandRecord>) -> Self {
        Self {
            staff: Mutex::new(staff),
            demand: Mutex::new(demand),
            report: Mutex::new(None),
            config,
        }
    }

    /// Loads both input files once; a failed load leaves that collection empty
    pub fn load(config: AppConfig) -> Self {
        let staff = load_or_empty("staff schedules", &config.staff_path, |p| {
            load_staff_schedules(p)
        });
        let demand = load_or_empty("demand data", &config.demand_path, |p| load_demand(p));
        Self::new(config, staff, demand)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| actix_web::error::ErrorInternalServerError("state lock poisoned"))
}

fn bad_request(error: impl ToString) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({"success": false, "error": error.to_string()}))
}

fn not_found(error: &str) -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({"success": false, "error": error}))
}

#[derive(Deserialize)]
pub struct EditRequest {
    staff_index: usize,
    day: String,
    field: String,
    value: String,
}

#[derive(Deserialize)]
pub struct SeriesQuery {
    day: String,
    week: u8,
}

impl SeriesQuery {
    fn resolve(&self) -> std::result::Result<(Weekday, u8), String> {
        let weekday = parse_day_name(&self.day).ok_or_else(|| format!("Invalid day: {}", self.day))?;
        if !ROTA_WEEKS.contains(&self.week) {
            return Err(format!("Invalid week: {}", self.week));
        }
        Ok((weekday, self.week))
    }
}

// Raw input files, as the browser pages fetch them
async fn staff_file(state: web::Data<AppState>) -> Result<NamedFile> {
    Ok(NamedFile::open(&state.config.staff_path)?)
}

async fn demand_file(state: web::Data<AppState>) -> Result<NamedFile> {
    Ok(NamedFile::open(&state.config.demand_path)?)
}

async fn get_schedules(state: web::Data<AppState>) -> Result<HttpResponse> {
    let staff = lock(&state.staff)?;
    Ok(HttpResponse::Ok().json(&*staff))
}

async fn edit_schedule(
    req: web::Json<EditRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let field = match req.field.parse::<ShiftField>() {
        Ok(field) => field,
        Err(e) => return Ok(bad_request(e)),
    };

    let mut staff = lock(&state.staff)?;
    match editor::set_shift_field(&staff, req.staff_index, &req.day, field, &req.value) {
        Ok(updated) => {
            *staff = updated;
            Ok(HttpResponse::Ok().json(&staff[req.staff_index]))
        }
        Err(e) => Ok(bad_request(e)),
    }
}

async fn save_schedules(state: web::Data<AppState>) -> Result<HttpResponse> {
    let staff = lock(&state.staff)?;
    let receipt = editor::save(&staff)
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?;
    Ok(HttpResponse::Ok().json(receipt))
}

// Recomputes only when asked; edits do not refresh the chart on their own
async fn generate(state: web::Data<AppState>) -> Result<HttpResponse> {
    let report = {
        let staff = lock(&state.staff)?;
        let demand = lock(&state.demand)?;
        generate_coverage(&staff, &demand, state.config.coverage)
    };

    info!("Generated {} coverage rows", report.rows.len());

    let response = serde_json::json!({
        "success": true,
        "rows": report.rows.len(),
        "spend": report.spend,
    });
    *lock(&state.report)? = Some(report);

    Ok(HttpResponse::Ok().json(response))
}

async fn get_coverage(
    query: web::Query<SeriesQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let (weekday, week) = match query.resolve() {
        Ok(selection) => selection,
        Err(e) => return Ok(bad_request(e)),
    };

    let report = lock(&state.report)?;
    match report.as_ref().filter(|r| !r.is_empty()) {
        Some(report) => Ok(HttpResponse::Ok().json(report.series(weekday, week))),
        None => Ok(not_found("Chart data not generated")),
    }
}

async fn get_area(
    query: web::Query<SeriesQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let (weekday, week) = match query.resolve() {
        Ok(selection) => selection,
        Err(e) => return Ok(bad_request(e)),
    };

    let report = lock(&state.report)?;
    match report.as_ref().filter(|r| !r.is_empty()) {
        Some(report) => Ok(HttpResponse::Ok().json(report.area_points(weekday, week))),
        None => Ok(not_found("Chart data not generated")),
    }
}

async fn get_spend(state: web::Data<AppState>) -> Result<HttpResponse> {
    let report = lock(&state.report)?;
    match report.as_ref().and_then(|r| r.spend.as_ref()) {
        Some(spend) => Ok(HttpResponse::Ok().json(spend)),
        None => Ok(not_found("Spend summary not available")),
    }
}

// HTML page handlers
async fn index() -> Result<HttpResponse> {
    let html = include_str!("../templates/index.html");
    Ok(HttpResponse::Ok().content_type("text/html").body(html))
}

async fn editor_page() -> Result<HttpResponse> {
    let html = include_str!("../templates/editor.html");
    Ok(HttpResponse::Ok().content_type("text/html").body(html))
}

async fn chart_page() -> Result<HttpResponse> {
    let html = include_str!("../templates/chart.html");
    Ok(HttpResponse::Ok().content_type("text/html").body(html))
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/editor", web::get().to(editor_page))
        .route("/chart", web::get().to(chart_page))
        .route("/staff_schedule.json", web::get().to(staff_file))
        .route("/demand_data_filtered.json", web::get().to(demand_file))
        .route("/api/schedules", web::get().to(get_schedules))
        .route("/api/schedules/edit", web::post().to(edit_schedule))
        .route("/api/schedules/save", web::post().to(save_schedules))
        .route("/api/coverage/generate", web::post().to(generate))
        .route("/api/coverage", web::get().to(get_coverage))
        .route("/api/coverage/area", web::get().to(get_area))
        .route("/api/spend", web::get().to(get_spend));
}

pub async fn start_server(config: AppConfig, bind: &str, port: u16) -> std::io::Result<()> {
    let app_state = web::Data::new(AppState::load(config));

    info!("Serving on http://{}:{}", bind, port);

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .configure(routes)
    })
    .bind((bind, port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, DataArgs};
    use crate::loader::{DEMAND_FILE, STAFF_FILE};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::Value;

    const STAFF_JSON: &str = r#"[
        {"Colleague": "Ada", "Line Manager": "Grace",
         "Schedule": {"Mon 1": {"start": "09:00", "end": "17:00"}}},
        {"Colleague": "Bo",
         "Schedule": {"Mon 1": {"start": "09:00", "end": "09:30"}}}
    ]"#;

    const DEMAND_JSON: &str = r#"[
        {"Time": "09:00", "Monday Demand": 3},
        {"Time": "09:30", "Monday Demand": 1},
        {"Time": "10:00", "Monday Demand": null}
    ]"#;

    fn config_with_spend(dir: &std::path::Path, spend_summary: bool) -> AppConfig {
        let data = DataArgs {
            data_dir: dir.to_path_buf(),
            staff_file: STAFF_FILE.to_string(),
            demand_file: DEMAND_FILE.to_string(),
        };
        AppConfig::new(&data, spend_summary)
    }

    fn config_in(dir: &std::path::Path) -> AppConfig {
        config_with_spend(dir, true)
    }

    fn seeded_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(STAFF_FILE), STAFF_JSON).unwrap();
        std::fs::write(dir.path().join(DEMAND_FILE), DEMAND_JSON).unwrap();
        dir
    }

    #[actix_web::test]
    async fn pages_render() {
        let dir = seeded_dir();
        let state = web::Data::new(AppState::load(config_in(dir.path())));
        let app = test::init_service(App::new().app_data(state).configure(routes)).await;

        for path in ["/", "/editor", "/chart"] {
            let resp = test::call_service(&app, test::TestRequest::get().uri(path).to_request()).await;
            assert_eq!(resp.status(), StatusCode::OK, "{path}");
        }
    }

    #[actix_web::test]
    async fn serves_raw_input_files() {
        let dir = seeded_dir();
        let state = web::Data::new(AppState::load(config_in(dir.path())));
        let app = test::init_service(App::new().app_data(state).configure(routes)).await;

        let req = test::TestRequest::get().uri("/staff_schedule.json").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body[0]["Colleague"], "Ada");
    }

    #[actix_web::test]
    async fn coverage_requires_generate_first() {
        let dir = seeded_dir();
        let state = web::Data::new(AppState::load(config_in(dir.path())));
        let app = test::init_service(App::new().app_data(state).configure(routes)).await;

        let req = test::TestRequest::get()
            .uri("/api/coverage?day=Monday&week=1")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::post().uri("/api/coverage/generate").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["rows"], 4);
        assert_eq!(body["spend"]["total_hours"], 1.5);

        let req = test::TestRequest::get()
            .uri("/api/coverage?day=Monday&week=1")
            .to_request();
        let series: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(series[0]["scheduled"], 2);
        assert_eq!(series[0]["variance"], -1.0);
        assert_eq!(series[1]["scheduled"], 1);
        assert_eq!(series[0]["label"], "Monday Week 1");
    }

    #[actix_web::test]
    async fn coverage_rejects_bad_selection() {
        let dir = seeded_dir();
        let state = web::Data::new(AppState::load(config_in(dir.path())));
        let app = test::init_service(App::new().app_data(state).configure(routes)).await;

        for uri in ["/api/coverage?day=Someday&week=1", "/api/coverage/area?day=Monday&week=3"] {
            let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
        }
    }

    #[actix_web::test]
    async fn edit_then_regenerate_changes_coverage() {
        let dir = seeded_dir();
        let state = web::Data::new(AppState::load(config_in(dir.path())));
        let app =
            test::init_service(App::new().app_data(state.clone()).configure(routes)).await;

        let req = test::TestRequest::post()
            .uri("/api/schedules/edit")
            .set_json(serde_json::json!({
                "staff_index": 1, "day": "Mon 1", "field": "end", "value": "10:00"
            }))
            .to_request();
        let updated: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(updated["Schedule"]["Mon 1"]["end"], "10:00");
        assert_eq!(state.staff.lock().unwrap()[0].schedule["Mon 1"].end, "17:00");

        let req = test::TestRequest::post().uri("/api/coverage/generate").to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::get()
            .uri("/api/coverage/area?day=Monday&week=1")
            .to_request();
        let points: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(points[1]["actual"], 2);
        assert_eq!(points[1]["required"], 1.0);
    }

    #[actix_web::test]
    async fn edit_rejects_unknown_staff_and_field() {
        let dir = seeded_dir();
        let state = web::Data::new(AppState::load(config_in(dir.path())));
        let app = test::init_service(App::new().app_data(state).configure(routes)).await;

        for payload in [
            serde_json::json!({"staff_index": 9, "day": "Mon 1", "field": "end", "value": "10:00"}),
            serde_json::json!({"staff_index": 0, "day": "Mon 1", "field": "lunch", "value": "10:00"}),
        ] {
            let req = test::TestRequest::post()
                .uri("/api/schedules/edit")
                .set_json(payload)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[actix_web::test]
    async fn save_acknowledges_without_writing() {
        let dir = seeded_dir();
        let state = web::Data::new(AppState::load(config_in(dir.path())));
        let app = test::init_service(App::new().app_data(state).configure(routes)).await;

        let req = test::TestRequest::post().uri("/api/schedules/save").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Schedules saved!");
        assert_eq!(body["staff_count"], 2);

        let on_disk = std::fs::read_to_string(dir.path().join(STAFF_FILE)).unwrap();
        assert_eq!(on_disk, STAFF_JSON);
    }

    #[actix_web::test]
    async fn spend_route_is_missing_when_summary_disabled() {
        let dir = seeded_dir();
        let state = web::Data::new(AppState::load(config_with_spend(dir.path(), false)));
        let app = test::init_service(App::new().app_data(state).configure(routes)).await;

        let req = test::TestRequest::post().uri("/api/coverage/generate").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["rows"], 4);
        assert!(body["spend"].is_null());

        let req = test::TestRequest::get().uri("/api/spend").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::get()
            .uri("/api/coverage?day=Monday&week=1")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn missing_inputs_leave_state_empty() {
        let dir = tempfile::tempdir().unwrap();
        let state = web::Data::new(AppState::load(config_in(dir.path())));
        let app = test::init_service(App::new().app_data(state).configure(routes)).await;

        let req = test::TestRequest::get().uri("/api/schedules").to_request();
        let staff: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(staff, serde_json::json!([]));

        let req = test::TestRequest::post().uri("/api/coverage/generate").to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::get().uri("/api/spend").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::get().uri("/staff_schedule.json").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
