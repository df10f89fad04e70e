//! Stateless engine service: the tournament orchestrator posts a full snapshot and gets
//! back the next matches or the leaderboard. Nothing is stored between requests.
//! Run with: cargo run --bin web
//! Override the bind address with env: HOST (e.g. 0.0.0.0), PORT (e.g. 8080).

use actix_web::{
    get, post,
    web::{self, Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use bot_tournament_engine::{
    build_leaderboard, match_tree, FormatGenerator, GenerationState, MatchGenerator,
    OngoingConfig, TreeKind,
};
use serde::Deserialize;

/// Largest bracket the tree endpoint will build on request.
const MAX_TREE_PARTICIPANTS: usize = 4096;

/// Snapshots carry the full match history, so allow bodies well above the 32 KiB default.
const MAX_SNAPSHOT_BYTES: usize = 8 * 1024 * 1024;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

/// Path segments: bracket kind and participant count (e.g. /api/trees/double_elimination/6)
#[derive(Deserialize)]
struct TreePath {
    kind: String,
    participants: usize,
}

/// Matchmaking knobs for ongoing tournaments, read once at startup.
fn ongoing_config() -> OngoingConfig {
    let mut config = OngoingConfig::default();
    if let Some(window) = std::env::var("ONGOING_CANDIDATE_WINDOW")
        .ok()
        .and_then(|w| w.parse().ok())
    {
        config.candidate_window = window;
    }
    config
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "bot-tournament-engine",
    })
}

/// Next matches for a tournament snapshot. 409 when the snapshot contradicts its bracket.
#[post("/api/generate")]
async fn api_generate(
    config: Data<OngoingConfig>,
    body: Json<GenerationState>,
) -> HttpResponse {
    let state = body.into_inner();
    let generator = FormatGenerator::with_ongoing_config(state.format, config.get_ref().clone());
    match generator.generate(&state) {
        Ok(generation) => HttpResponse::Ok().json(generation),
        Err(e) => HttpResponse::Conflict().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Standings for a tournament snapshot.
#[post("/api/leaderboard")]
async fn api_leaderboard(body: Json<GenerationState>) -> HttpResponse {
    match build_leaderboard(&body) {
        Ok(leaderboard) => HttpResponse::Ok().json(leaderboard),
        Err(e) => HttpResponse::Conflict().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Bracket skeleton for rendering, straight from the tree cache.
#[get("/api/trees/{kind}/{participants}")]
async fn api_tree(path: Path<TreePath>) -> HttpResponse {
    let Some(kind) = TreeKind::from_slug(&path.kind) else {
        return HttpResponse::NotFound().json(serde_json::json!({ "error": "Unknown bracket kind" }));
    };
    if path.participants > MAX_TREE_PARTICIPANTS {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": format!("At most {} participants", MAX_TREE_PARTICIPANTS)
        }));
    }
    let tree = match_tree(kind, path.participants);
    HttpResponse::Ok().json(tree.as_ref())
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let bind = (host.as_str(), port);
    let config = Data::new(ongoing_config());
    log::info!(
        "Starting engine service at http://{}:{} (ongoing candidate window {})",
        bind.0,
        bind.1,
        config.candidate_window
    );

    HttpServer::new(move || {
        App::new()
            .app_data(config.clone())
            .app_data(web::JsonConfig::default().limit(MAX_SNAPSHOT_BYTES))
            .service(api_health)
            .service(api_generate)
            .service(api_leaderboard)
            .service(api_tree)
    })
    .bind(bind)?
    .run()
    .await
}
