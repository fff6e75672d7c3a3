use actix_web::{web, App, HttpServer, HttpResponse, Result, middleware};
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_files::Files;
use serde::Deserialize;
use std::sync::Mutex;

use crate::config::AppConfig;
use crate::error::ConfigError;
use crate::flow::{load_active, reset_active, save_active, ArrivalSlot, FloorFlow, FlowRow, Scenario};
use crate::form::{export_spreadsheet, resolve_speed, SpreadsheetFormat};
use crate::lab::persist;
use crate::lab::WindowSettings;
use crate::mock::{self, history};
use crate::parser::import_spreadsheet;
use crate::schedule::fleet::{default_elevators, find_config, load_fleet, upsert_config};
use crate::schedule::floors::{all_floors, default_service_floors};
use crate::schedule::{derive_time_ranges, label_ranges, Breakpoint, DraftEdit, ScheduleDraft};
use crate::store::JsonStore;
use crate::templates::TemplateLibrary;

/// Shared by all workers; the lock makes each read-modify-write of a stored key atomic
pub struct AppState {
    pub store: Mutex<JsonStore>,
}

impl AppState {
    pub fn new(store: JsonStore) -> Self {
        Self { store: Mutex::new(store) }
    }
}

fn with_store<T>(
    state: &AppState,
    f: impl FnOnce(&JsonStore) -> Result<T, ConfigError>,
) -> Result<T, ConfigError> {
    let store = state.store.lock().map_err(|_| ConfigError::Poisoned)?;
    f(&store)
}

/// Runs `$body` with `$row` bound to the flow row type of the scenario
macro_rules! with_rows {
    ($scenario:expr, $row:ident => $body:expr) => {
        match $scenario {
            Scenario::Lab => {
                type $row = ArrivalSlot;
                $body
            }
            Scenario::Elevator => {
                type $row = FloorFlow;
                $body
            }
        }
    };
}

fn success() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({"success": true}))
}

fn check_elevator(id: &str) -> Result<String, ConfigError> {
    default_elevators()
        .into_iter()
        .find(|e| e.id == id)
        .map(|e| e.name)
        .ok_or_else(|| ConfigError::not_found("elevator", id))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeriveRequest {
    breakpoints: Vec<Breakpoint>,
    #[serde(default)]
    last_floors: Vec<String>,
}

#[derive(Deserialize)]
pub struct DraftEditRequest {
    draft: ScheduleDraft,
    edit: DraftEdit,
}

#[derive(Deserialize)]
pub struct SaveTemplateRequest {
    name: String,
    data: serde_json::Value,
}

#[derive(Deserialize)]
pub struct NameRequest {
    name: String,
}

#[derive(Deserialize)]
pub struct PositionRequest {
    x: f64,
    y: f64,
}

#[derive(Deserialize)]
pub struct RatioRequest {
    ratio: f64,
}

#[derive(Deserialize)]
pub struct SpeedRequest {
    scenario: Scenario,
    speed: Option<u32>,
}

#[derive(Deserialize)]
pub struct NoteRequest {
    note: String,
}

// Elevator endpoints
async fn get_elevators(state: web::Data<AppState>) -> Result<HttpResponse> {
    let fleet = with_store(&state, |store| Ok(load_fleet(store)))?;
    Ok(HttpResponse::Ok().json(fleet))
}

async fn get_draft(id: web::Path<String>, state: web::Data<AppState>) -> Result<HttpResponse> {
    check_elevator(&id)?;
    let draft = with_store(&state, |store| {
        Ok(find_config(store, &id)
            .map(|config| ScheduleDraft::from_config(&config))
            .unwrap_or_default())
    })?;
    Ok(HttpResponse::Ok().json(draft))
}

async fn edit_draft(
    id: web::Path<String>,
    req: web::Json<DraftEditRequest>,
) -> Result<HttpResponse> {
    check_elevator(&id)?;
    let DraftEditRequest { mut draft, edit } = req.into_inner();
    draft.apply(edit)?;
    Ok(HttpResponse::Ok().json(draft))
}

async fn save_elevator_config(
    id: web::Path<String>,
    draft: web::Json<ScheduleDraft>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let name = check_elevator(&id)?;
    let mut config = draft.into_inner().into_config(&id)?;
    config.name = name;

    with_store(&state, |store| upsert_config(store, &config))?;
    tracing::info!(elevator = %config.id, ranges = config.time_ranges.len(), "saved elevator schedule");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "config": config,
        "labels": label_ranges(&config.time_ranges),
    })))
}

async fn get_floors() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "floors": all_floors(),
        "defaultFloors": default_service_floors(),
    })))
}

async fn derive_ranges(req: web::Json<DeriveRequest>) -> Result<HttpResponse> {
    let ranges = derive_time_ranges(&req.breakpoints, &req.last_floors);
    Ok(HttpResponse::Ok().json(label_ranges(&ranges)))
}

// Flow tables and templates
async fn get_flow(kind: web::Path<String>, state: web::Data<AppState>) -> Result<HttpResponse> {
    let scenario: Scenario = kind.parse()?;
    let response = with_store(&state, |store| {
        Ok(with_rows!(scenario, R => HttpResponse::Ok().json(load_active::<R>(store))))
    })?;
    Ok(response)
}

async fn put_flow(
    kind: web::Path<String>,
    body: web::Bytes,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let scenario: Scenario = kind.parse()?;
    with_store(&state, |store| {
        with_rows!(scenario, R => {
            let rows: Vec<R> = serde_json::from_slice(&body)?;
            save_active(store, &rows)
        })
    })?;
    Ok(success())
}

async fn reset_flow(kind: web::Path<String>, state: web::Data<AppState>) -> Result<HttpResponse> {
    let scenario: Scenario = kind.parse()?;
    let response = with_store(&state, |store| {
        with_rows!(scenario, R => Ok(HttpResponse::Ok().json(reset_active::<R>(store)?)))
    })?;
    Ok(response)
}

async fn list_templates(kind: web::Path<String>, state: web::Data<AppState>) -> Result<HttpResponse> {
    let scenario: Scenario = kind.parse()?;
    let response = with_store(&state, |store| {
        Ok(with_rows!(scenario, R => {
            HttpResponse::Ok().json(TemplateLibrary::<R>::new(store).list())
        }))
    })?;
    Ok(response)
}

async fn apply_template(
    path: web::Path<(String, String)>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let (kind, id) = path.into_inner();
    let scenario: Scenario = kind.parse()?;
    let response = with_store(&state, |store| {
        with_rows!(scenario, R => {
            let rows = TemplateLibrary::<R>::new(store).apply(&id)?;
            Ok(HttpResponse::Ok().json(rows))
        })
    })?;
    Ok(response)
}

async fn save_template(
    kind: web::Path<String>,
    req: web::Json<SaveTemplateRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let scenario: Scenario = kind.parse()?;
    let SaveTemplateRequest { name, data } = req.into_inner();
    let response = with_store(&state, |store| {
        with_rows!(scenario, R => {
            let rows: Vec<R> = serde_json::from_value(data)?;
            let template = TemplateLibrary::<R>::new(store).save_custom(&name, rows)?;
            Ok(HttpResponse::Ok().json(template))
        })
    })?;
    Ok(response)
}

async fn delete_template(
    path: web::Path<(String, String)>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let (kind, id) = path.into_inner();
    let scenario: Scenario = kind.parse()?;
    with_store(&state, |store| {
        with_rows!(scenario, R => TemplateLibrary::<R>::new(store).delete(&id))
    })?;
    Ok(success())
}

// Spreadsheet exchange
#[derive(Deserialize)]
struct ExportQuery {
    #[serde(default)]
    format: SpreadsheetFormat,
}

fn spreadsheet_attachment<R: FlowRow>(format: SpreadsheetFormat, bytes: Vec<u8>) -> HttpResponse {
    let file_name = format!("{}.{}", R::FILE_STEM, format.extension());
    HttpResponse::Ok()
        .content_type(format.content_type())
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(file_name)],
        })
        .body(bytes)
}

async fn export_flow(
    kind: web::Path<String>,
    query: web::Query<ExportQuery>,
    body: web::Bytes,
) -> Result<HttpResponse> {
    let scenario: Scenario = kind.parse()?;
    let format = query.format;
    let response = with_rows!(scenario, R => {
        let rows: Vec<R> = serde_json::from_slice(&body).map_err(ConfigError::from)?;
        spreadsheet_attachment::<R>(format, export_spreadsheet(&rows, format)?)
    });
    Ok(response)
}

/// Accepts an .xlsx workbook or a CSV file as the raw request body
async fn import_flow(kind: web::Path<String>, body: web::Bytes) -> Result<HttpResponse> {
    let scenario: Scenario = kind.parse()?;
    let response = with_rows!(scenario, R => {
        let rows: Vec<R> = import_spreadsheet(body.as_ref())?;
        HttpResponse::Ok().json(rows)
    });
    Ok(response)
}

// Lab endpoints
async fn get_special_types(state: web::Data<AppState>) -> Result<HttpResponse> {
    let (types, summary) = with_store(&state, |store| {
        Ok((persist::load_special_types(store), persist::load_special_summary(store)))
    })?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "types": types,
        "active": summary,
    })))
}

async fn add_special_type(req: web::Json<NameRequest>, state: web::Data<AppState>) -> Result<HttpResponse> {
    let added = with_store(&state, |store| persist::create_special_type(store, &req.name))?;
    Ok(HttpResponse::Ok().json(added))
}

async fn delete_special_type(id: web::Path<String>, state: web::Data<AppState>) -> Result<HttpResponse> {
    with_store(&state, |store| persist::delete_special_type(store, &id))?;
    Ok(success())
}

async fn get_windows(state: web::Data<AppState>) -> Result<HttpResponse> {
    let windows = with_store(&state, |store| Ok(persist::load_windows(store)))?;
    Ok(HttpResponse::Ok().json(windows))
}

async fn put_window(
    id: web::Path<String>,
    settings: web::Json<WindowSettings>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let saved = with_store(&state, |store| {
        persist::save_window_settings(store, &id, settings.into_inner())
    })?;
    Ok(HttpResponse::Ok().json(saved))
}

async fn get_temporary_windows(state: web::Data<AppState>) -> Result<HttpResponse> {
    let windows = with_store(&state, |store| Ok(persist::load_temporary_windows(store)))?;
    Ok(HttpResponse::Ok().json(windows))
}

async fn add_temporary_window(state: web::Data<AppState>) -> Result<HttpResponse> {
    let window = with_store(&state, persist::open_temporary_window)?;
    Ok(HttpResponse::Ok().json(window))
}

async fn place_temporary_window(
    id: web::Path<String>,
    req: web::Json<PositionRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let window = with_store(&state, |store| {
        persist::place_temporary_window(store, &id, req.x, req.y)
    })?;
    Ok(HttpResponse::Ok().json(window))
}

async fn delete_temporary_window(id: web::Path<String>, state: web::Data<AppState>) -> Result<HttpResponse> {
    with_store(&state, |store| persist::close_temporary_window(store, &id))?;
    Ok(success())
}

async fn get_patient_ratios(state: web::Data<AppState>) -> Result<HttpResponse> {
    let overview = with_store(&state, |store| Ok(persist::RatioOverview::from(persist::load_ratios(store))))?;
    Ok(HttpResponse::Ok().json(overview))
}

async fn put_patient_ratio(
    type_id: web::Path<String>,
    req: web::Json<RatioRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let overview = with_store(&state, |store| persist::update_ratio(store, &type_id, req.ratio))?;
    Ok(HttpResponse::Ok().json(overview))
}

async fn put_speed(req: web::Json<SpeedRequest>) -> Result<HttpResponse> {
    let speed = resolve_speed(req.scenario, req.speed)?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "scenario": req.scenario,
        "speed": speed,
    })))
}

// Dashboards
async fn get_elevator_utilization() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(mock::elevator_utilization(&mut rand::thread_rng())))
}

async fn get_inspection_utilization() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(mock::inspection_utilization(&mut rand::thread_rng())))
}

async fn get_elevator_overview() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(mock::elevator_overview()))
}

async fn get_lab_overview() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(mock::lab_overview()))
}

async fn get_history(state: web::Data<AppState>) -> Result<HttpResponse> {
    let records = with_store(&state, |store| Ok(history::load_history(store)))?;
    let entries: Vec<history::HistoryEntry> = records.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(entries))
}

async fn put_history_note(
    id: web::Path<String>,
    req: web::Json<NoteRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let record = with_store(&state, |store| history::update_note(store, &id, &req.note))?;
    Ok(HttpResponse::Ok().json(history::HistoryEntry::from(record)))
}

async fn delete_history(id: web::Path<String>, state: web::Data<AppState>) -> Result<HttpResponse> {
    with_store(&state, |store| history::delete_record(store, &id))?;
    Ok(success())
}

// HTML page handler
async fn index() -> Result<HttpResponse> {
    let html = include_str!("../templates/index.html");
    Ok(HttpResponse::Ok().content_type("text/html; charset=utf-8").body(html))
}

/// All API routes, shared by the server and the handler tests
pub fn api_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/elevators", web::get().to(get_elevators))
        .route("/api/elevators/{id}/draft", web::get().to(get_draft))
        .route("/api/elevators/{id}/draft/edit", web::post().to(edit_draft))
        .route("/api/elevators/{id}/config", web::put().to(save_elevator_config))
        .route("/api/floors", web::get().to(get_floors))
        .route("/api/time-ranges/derive", web::post().to(derive_ranges))
        .service(
            web::resource("/api/flows/{kind}")
                .route(web::get().to(get_flow))
                .route(web::put().to(put_flow))
                .route(web::delete().to(reset_flow)),
        )
        .service(
            web::resource("/api/templates/{kind}")
                .route(web::get().to(list_templates))
                .route(web::post().to(save_template)),
        )
        .service(
            web::resource("/api/templates/{kind}/{id}")
                .route(web::get().to(apply_template))
                .route(web::delete().to(delete_template)),
        )
        .route("/api/export/{kind}", web::post().to(export_flow))
        .route("/api/import/{kind}", web::post().to(import_flow))
        .service(
            web::resource("/api/lab/special-types")
                .route(web::get().to(get_special_types))
                .route(web::post().to(add_special_type)),
        )
        .route("/api/lab/special-types/{id}", web::delete().to(delete_special_type))
        .route("/api/lab/windows", web::get().to(get_windows))
        .route("/api/lab/windows/{id}", web::put().to(put_window))
        .service(
            web::resource("/api/lab/temporary-windows")
                .route(web::get().to(get_temporary_windows))
                .route(web::post().to(add_temporary_window)),
        )
        .route("/api/lab/temporary-windows/{id}/position", web::put().to(place_temporary_window))
        .route("/api/lab/temporary-windows/{id}", web::delete().to(delete_temporary_window))
        .route("/api/lab/patient-ratios", web::get().to(get_patient_ratios))
        .route("/api/lab/patient-ratios/{type_id}", web::put().to(put_patient_ratio))
        .route("/api/settings/speed", web::put().to(put_speed))
        .route("/api/mock/elevator-utilization", web::get().to(get_elevator_utilization))
        .route("/api/mock/inspection-utilization", web::get().to(get_inspection_utilization))
        .route("/api/mock/elevator-overview", web::get().to(get_elevator_overview))
        .route("/api/mock/lab-overview", web::get().to(get_lab_overview))
        .route("/api/history", web::get().to(get_history))
        .route("/api/history/{id}/note", web::put().to(put_history_note))
        .route("/api/history/{id}", web::delete().to(delete_history));
}

pub async fn start_server(config: AppConfig, store: JsonStore) -> std::io::Result<()> {
    let app_state = web::Data::new(AppState::new(store));
    let static_dir = config.static_dir.clone();

    tracing::info!(bind = %config.bind, port = config.port, "starting web server");

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .service(Files::new("/static", static_dir.clone()))
            .route("/", web::get().to(index))
            .configure(api_routes)
    })
    .bind((config.bind.as_str(), config.port))?
    .run()
    .await
}

#[cfg(test)]
#[path = "web_test.rs"]
mod tests;
