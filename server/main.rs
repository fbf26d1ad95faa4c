use actix_web::{get, middleware, post, web, App, HttpResponse, HttpServer, Responder};
use anyhow::Context;
use rail_scheduler::{SchedulerApi, SchedulerConfig};
use serde::Deserialize;
use std::env;
use std::sync::Mutex;

const JSON: &str = "application/json";

type SharedApi = web::Data<Mutex<SchedulerApi>>;

#[derive(Deserialize)]
struct EventsQuery {
    max: Option<usize>,
}

fn lock_failed() -> HttpResponse {
    HttpResponse::InternalServerError().json(serde_json::json!({
        "success": false,
        "error_message": "scheduler state poisoned",
    }))
}

#[post("/api/conflicts")]
async fn detect_conflicts(api: SharedApi, body: String) -> impl Responder {
    let Ok(mut api) = api.lock() else {
        return lock_failed();
    };
    HttpResponse::Ok()
        .content_type(JSON)
        .body(api.detect_conflicts_json(&body))
}

#[post("/api/optimize")]
async fn optimize(api: SharedApi, body: String) -> impl Responder {
    let Ok(mut api) = api.lock() else {
        return lock_failed();
    };
    HttpResponse::Ok().content_type(JSON).body(api.optimize_json(&body))
}

#[get("/api/statistics")]
async fn statistics(api: SharedApi) -> impl Responder {
    let Ok(api) = api.lock() else {
        return lock_failed();
    };
    HttpResponse::Ok().content_type(JSON).body(api.get_statistics_json())
}

#[get("/api/events")]
async fn events(api: SharedApi, query: web::Query<EventsQuery>) -> impl Responder {
    let Ok(api) = api.lock() else {
        return lock_failed();
    };
    let max = query.max.unwrap_or(100);
    HttpResponse::Ok().json(api.scheduler().get_event_log(max))
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "version": SchedulerApi::version(),
    }))
}

fn load_config() -> anyhow::Result<SchedulerConfig> {
    match env::var("RAIL_SCHEDULER_CONFIG") {
        Ok(path) => SchedulerConfig::from_file(&path)
            .with_context(|| format!("Failed to load scheduler config from {path}")),
        Err(_) => Ok(SchedulerConfig::default()),
    }
}

fn default_log_filter(config: &SchedulerConfig) -> &'static str {
    if config.verbose {
        "debug"
    } else {
        "info"
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_log_filter(&config)))
        .init();

    // Get port from environment or default to 8080
    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    let mut api = SchedulerApi::default();
    if !api.initialize(config) {
        log::warn!("Scheduler started without a model; using heuristic resolution");
    }
    let api = web::Data::new(Mutex::new(api));

    log::info!("Starting server on 0.0.0.0:{port}");

    HttpServer::new(move || {
        App::new()
            .app_data(api.clone())
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .service(detect_conflicts)
            .service(optimize)
            .service(statistics)
            .service(events)
            .service(health)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await?;

    Ok(())
}
