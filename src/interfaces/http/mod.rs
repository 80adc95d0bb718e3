// ============================================================
// HTTP INTERFACE
// ============================================================
// Route dispatch for tasks, flows, reports, pivots, and static assets

mod static_files;

use std::fs;
use std::sync::{Arc, Mutex};

use actix_cors::Cors;
use actix_web::http::StatusCode;
use actix_web::{
    dev::Server, get, post, put, web, App, HttpRequest, HttpResponse, HttpServer, Responder, Scope,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::application::{build_pivot, AggregateLimits, FlowCatalog, ReportAggregator};
use crate::domain::error::AppError;
use crate::domain::pivot::PivotSpec;
use crate::infrastructure::config::ServiceConfig;
use crate::infrastructure::storage::{PivotConfigStore, TaskStore};

pub use static_files::{content_type_for, resolve_static_asset};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LogEntry {
    pub time: String,
    pub level: String,
    pub source: String,
    pub message: String,
}

pub struct HttpState {
    pub config: ServiceConfig,
    pub task_store: Arc<TaskStore>,
    pub pivot_config: Arc<PivotConfigStore>,
    pub flow_catalog: Arc<FlowCatalog>,
    pub logs: Arc<Mutex<Vec<LogEntry>>>,
}

impl HttpState {
    pub fn new(config: ServiceConfig, logs: Arc<Mutex<Vec<LogEntry>>>) -> Self {
        let task_store = Arc::new(TaskStore::new(&config.task_file));
        let pivot_config = Arc::new(PivotConfigStore::new(&config.pivot_config_file));
        let flow_catalog = Arc::new(FlowCatalog::new(&config.data_dir));
        Self {
            config,
            task_store,
            pivot_config,
            flow_catalog,
            logs,
        }
    }

    fn limits(&self) -> AggregateLimits {
        AggregateLimits {
            max_csv_files: self.config.max_csv_files,
            max_total_bytes: self.config.max_total_bytes,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Serialize)]
struct OkBody {
    status: &'static str,
}

fn status_for(err: &AppError) -> StatusCode {
    match err {
        AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        AppError::Forbidden(_) => StatusCode::FORBIDDEN,
        AppError::NotFound(_)
        | AppError::DirectoryAccess(_)
        | AppError::NoMatch(_)
        | AppError::NoFilesFound(_) => StatusCode::NOT_FOUND,
        AppError::ResourceLimit(_) => StatusCode::PAYLOAD_TOO_LARGE,
        AppError::CorruptState(_) | AppError::IoError(_) | AppError::Internal(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn error_response(err: &AppError) -> HttpResponse {
    HttpResponse::build(status_for(err)).json(ErrorBody {
        error: err.to_string(),
    })
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    pub base_dir: String,
    #[serde(default)]
    pub start_keyword: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotRequest {
    pub base_dir: String,
    #[serde(default)]
    pub start_keyword: String,
    pub spec: PivotSpec,
}

#[derive(Deserialize)]
pub struct PivotQuery {
    pub format: Option<String>,
}

#[get("/tasks")]
async fn get_tasks(data: web::Data<HttpState>) -> impl Responder {
    match data.task_store.read_tasks() {
        Ok(tasks) => HttpResponse::Ok().json(tasks),
        Err(e) => {
            add_log(
                &data.logs,
                "ERROR",
                "Tasks",
                &format!("Failed to read tasks: {}", e),
            );
            error_response(&e)
        }
    }
}

#[put("/tasks")]
async fn replace_tasks(data: web::Data<HttpState>, payload: web::Json<Value>) -> impl Responder {
    match data.task_store.replace_tasks(&payload) {
        Ok(()) => {
            add_log(&data.logs, "INFO", "Tasks", "Task list replaced");
            HttpResponse::Ok().json(OkBody { status: "ok" })
        }
        Err(e) => {
            add_log(
                &data.logs,
                "ERROR",
                "Tasks",
                &format!("Failed to replace tasks: {}", e),
            );
            error_response(&e)
        }
    }
}

#[get("/flows")]
async fn list_flows(data: web::Data<HttpState>) -> impl Responder {
    match data.flow_catalog.list_flows() {
        Ok(flows) => HttpResponse::Ok().json(flows),
        Err(e) => {
            add_log(
                &data.logs,
                "ERROR",
                "Flows",
                &format!("Failed to list flows: {}", e),
            );
            error_response(&e)
        }
    }
}

#[get("/flows/{name}/columns")]
async fn flow_columns(data: web::Data<HttpState>, name: web::Path<String>) -> impl Responder {
    match data.flow_catalog.flow_columns(&name) {
        Ok(columns) => HttpResponse::Ok().json(columns),
        Err(e) => {
            add_log(
                &data.logs,
                "ERROR",
                "Flows",
                &format!("Failed to read columns for '{}': {}", name, e),
            );
            error_response(&e)
        }
    }
}

#[post("/report")]
async fn build_report(data: web::Data<HttpState>, req: web::Json<ReportRequest>) -> impl Responder {
    let ReportRequest {
        base_dir,
        start_keyword,
    } = req.into_inner();

    add_log(
        &data.logs,
        "INFO",
        "Report",
        &format!(
            "Building report (baseDir={} keyword={})",
            base_dir, start_keyword
        ),
    );

    let aggregator = ReportAggregator::new(data.limits());
    let result = web::block(move || aggregator.aggregate(&base_dir, &start_keyword)).await;

    match result {
        Ok(Ok(report)) => HttpResponse::Ok().json(report),
        Ok(Err(e)) => {
            add_log(
                &data.logs,
                "ERROR",
                "Report",
                &format!("Report failed: {}", e),
            );
            error_response(&e)
        }
        Err(e) => {
            let err = AppError::Internal(e.to_string());
            add_log(
                &data.logs,
                "ERROR",
                "Report",
                &format!("Report worker failed: {}", err),
            );
            error_response(&err)
        }
    }
}

#[post("/pivot")]
async fn pivot_report(
    data: web::Data<HttpState>,
    req: web::Json<PivotRequest>,
    query: web::Query<PivotQuery>,
) -> impl Responder {
    let PivotRequest {
        base_dir,
        start_keyword,
        spec,
    } = req.into_inner();

    add_log(
        &data.logs,
        "INFO",
        "Pivot",
        &format!(
            "Building pivot (baseDir={} keyword={} aggfunc={:?})",
            base_dir, start_keyword, spec.aggfunc
        ),
    );

    let aggregator = ReportAggregator::new(data.limits());
    let result = web::block(move || {
        let report = aggregator.aggregate(&base_dir, &start_keyword)?;
        build_pivot(&report, &spec)
    })
    .await;

    match result {
        Ok(Ok(table)) => {
            if query.format.as_deref() == Some("csv") {
                HttpResponse::Ok()
                    .content_type("text/csv; charset=utf-8")
                    .body(table.to_csv())
            } else {
                HttpResponse::Ok().json(table)
            }
        }
        Ok(Err(e)) => {
            add_log(
                &data.logs,
                "ERROR",
                "Pivot",
                &format!("Pivot failed: {}", e),
            );
            error_response(&e)
        }
        Err(e) => {
            let err = AppError::Internal(e.to_string());
            add_log(
                &data.logs,
                "ERROR",
                "Pivot",
                &format!("Pivot worker failed: {}", err),
            );
            error_response(&err)
        }
    }
}

#[get("/pivot/config")]
async fn get_pivot_config(data: web::Data<HttpState>) -> impl Responder {
    match data.pivot_config.read_spec() {
        Ok(spec) => HttpResponse::Ok().json(spec),
        Err(e) => {
            add_log(
                &data.logs,
                "ERROR",
                "Pivot",
                &format!("Failed to read pivot config: {}", e),
            );
            error_response(&e)
        }
    }
}

#[put("/pivot/config")]
async fn put_pivot_config(
    data: web::Data<HttpState>,
    spec: web::Json<PivotSpec>,
) -> impl Responder {
    match data.pivot_config.write_spec(&spec) {
        Ok(()) => {
            add_log(&data.logs, "INFO", "Pivot", "Pivot config saved");
            HttpResponse::Ok().json(OkBody { status: "ok" })
        }
        Err(e) => {
            add_log(
                &data.logs,
                "ERROR",
                "Pivot",
                &format!("Failed to save pivot config: {}", e),
            );
            error_response(&e)
        }
    }
}

#[get("/logs")]
async fn get_logs(data: web::Data<HttpState>) -> impl Responder {
    let logs = data.logs.lock().unwrap();
    HttpResponse::Ok().json(&*logs)
}

async fn serve_static(req: HttpRequest, data: web::Data<HttpState>) -> HttpResponse {
    match resolve_static_asset(&data.config.web_root, req.path()) {
        Ok(path) => match fs::read(&path) {
            Ok(bytes) => HttpResponse::Ok()
                .content_type(content_type_for(&path))
                .body(bytes),
            Err(e) => {
                let err = AppError::IoError(format!("Failed to read {}: {}", path.display(), e));
                error_response(&err)
            }
        },
        Err(e) => {
            if matches!(e, AppError::Forbidden(_)) {
                add_log(
                    &data.logs,
                    "WARN",
                    "Static",
                    &format!("Rejected path {}", req.path()),
                );
            }
            error_response(&e)
        }
    }
}

/// All `/api` routes, shared between the server and the handler tests.
pub fn api_scope() -> Scope {
    web::scope("/api")
        .service(get_tasks)
        .service(replace_tasks)
        .service(list_flows)
        .service(flow_columns)
        .service(build_report)
        .service(pivot_report)
        .service(get_pivot_config)
        .service(put_pivot_config)
        .service(get_logs)
}

pub fn start_server(
    config: ServiceConfig,
    logs: Arc<Mutex<Vec<LogEntry>>>,
) -> std::io::Result<Server> {
    let bind_addr = (config.host.clone(), config.port);
    let state = web::Data::new(HttpState::new(config, logs));

    let server = HttpServer::new(move || {
        let cors = Cors::permissive(); // Allow all origins for local tool

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .service(api_scope())
            .default_service(web::route().to(serve_static))
    })
    .bind((bind_addr.0.as_str(), bind_addr.1))?
    .run();

    Ok(server)
}

pub fn add_log_entry(
    logs: &Mutex<Vec<LogEntry>>,
    level: &str,
    source: &str,
    message: &str,
) -> LogEntry {
    let entry = LogEntry {
        time: Local::now().format("%H:%M:%S").to_string(),
        level: level.to_string(),
        source: source.to_string(),
        message: message.to_string(),
    };
    let mut logs = logs.lock().unwrap();
    logs.push(entry.clone());
    if logs.len() > 100 {
        logs.remove(0);
    }
    entry
}

pub fn add_log(logs: &Mutex<Vec<LogEntry>>, level: &str, source: &str, message: &str) {
    add_log_entry(logs, level, source, message);
}
