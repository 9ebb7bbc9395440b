use actix_cors::Cors;
use actix_multipart::Multipart;
use actix_web::http::StatusCode;
use actix_web::{error, web, App, HttpResponse, HttpServer, Result as ActixResult};
use futures_util::StreamExt;
use networth_core::{
    estimate, rank, EmbeddingError, EmbeddingProvider, Error, Match, NetWorthPipeline, ProfileStore,
    RankerConfig, Vector,
};
use networth_storage::{ProfileStoreLoader, SharedStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use crate::format::{format_estimate, match_caption};

/// Multipart field carrying the uploaded photo
pub const IMAGE_FIELD: &str = "image";

/// Uploads larger than this are rejected before embedding
pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Everything a request handler needs, shared across workers
pub struct AppState {
    store: SharedStore,
    loader: ProfileStoreLoader,
    pipeline: NetWorthPipeline<Arc<dyn EmbeddingProvider>>,
}

impl AppState {
    pub fn new(
        store: ProfileStore,
        loader: ProfileStoreLoader,
        provider: Arc<dyn EmbeddingProvider>,
        config: RankerConfig,
    ) -> networth_core::Result<Self> {
        Ok(Self {
            store: SharedStore::new(store),
            loader,
            pipeline: NetWorthPipeline::new(provider, config)?,
        })
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    pub fn ranker_config(&self) -> &RankerConfig {
        self.pipeline.ranker().config()
    }
}

#[derive(Deserialize)]
struct RankRequest {
    vector: Vec<f32>,
    threshold: Option<f32>,
    limit: Option<usize>,
}

#[derive(Serialize)]
struct ProfileInfo {
    name: String,
    net_worth_usd: f64,
    image_path: String,
}

#[derive(Serialize)]
struct MatchResult {
    name: String,
    net_worth_usd: f64,
    image_path: String,
    score: f32,
    caption: String,
}

impl From<&Match<'_>> for MatchResult {
    fn from(m: &Match<'_>) -> Self {
        Self {
            name: m.profile.name.clone(),
            net_worth_usd: m.profile.net_worth,
            image_path: m.profile.image_reference.clone(),
            score: m.score,
            caption: match_caption(&m.profile.name, m.score),
        }
    }
}

#[derive(Serialize)]
struct EstimateResponse {
    estimate: Option<f64>,
    estimate_display: String,
    matches: Vec<MatchResult>,
}

impl EstimateResponse {
    fn build(matches: &[Match<'_>], estimate: Option<f64>) -> Self {
        Self {
            estimate,
            estimate_display: format_estimate(estimate),
            matches: matches.iter().map(MatchResult::from).collect(),
        }
    }
}

pub struct RestApi;

impl RestApi {
    pub async fn start(state: Arc<AppState>, port: u16) -> std::io::Result<()> {
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(web::Data::new(state.clone()))
                .configure(RestApi::configure)
        })
        .bind(("0.0.0.0", port))?
        .run()
        .await
    }

    /// Route table, shared by the server and the handler tests
    pub fn configure(cfg: &mut web::ServiceConfig) {
        cfg.route("/healthz", web::get().to(health))
            .route("/profiles", web::get().to(list_profiles))
            .route("/estimate", web::post().to(estimate_upload))
            .route("/rank", web::post().to(rank_vector))
            .route("/store/reload", web::post().to(reload_store));
    }
}

fn error_status(e: &Error) -> StatusCode {
    match e {
        Error::DimensionMismatch { .. } | Error::InvalidConfig(_) => StatusCode::BAD_REQUEST,
        Error::Embedding(EmbeddingError::EmptyImage) => StatusCode::BAD_REQUEST,
        Error::Embedding(_) => StatusCode::UNPROCESSABLE_ENTITY,
        Error::DatasetNotFound { .. } => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(e: &Error) -> HttpResponse {
    let status = error_status(e);
    if status.is_server_error() {
        warn!("Request failed: {}", e);
    }
    HttpResponse::build(status).json(serde_json::json!({
        "error": e.to_string()
    }))
}

async fn health(state: web::Data<Arc<AppState>>) -> ActixResult<HttpResponse> {
    let store = state.store.snapshot();
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "profiles": store.len(),
        "dimension": store.dim(),
    })))
}

async fn list_profiles(state: web::Data<Arc<AppState>>) -> ActixResult<HttpResponse> {
    let store = state.store.snapshot();
    let profiles: Vec<ProfileInfo> = store
        .iter()
        .map(|p| ProfileInfo {
            name: p.name.clone(),
            net_worth_usd: p.net_worth,
            image_path: p.image_reference.clone(),
        })
        .collect();
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "result": profiles
    })))
}

/// Pull the bytes of the `image` field out of a multipart body
async fn read_image_field(payload: &mut Multipart) -> ActixResult<Option<Vec<u8>>> {
    while let Some(field) = payload.next().await {
        let mut field = field?;
        let is_image = field.name() == Some(IMAGE_FIELD);

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk?;
            if !is_image {
                continue;
            }
            if bytes.len() + chunk.len() > MAX_UPLOAD_BYTES {
                return Err(error::ErrorPayloadTooLarge("Uploaded image is too large."));
            }
            bytes.extend_from_slice(&chunk);
        }

        if is_image {
            return Ok(Some(bytes));
        }
    }
    Ok(None)
}

async fn estimate_upload(
    state: web::Data<Arc<AppState>>,
    mut payload: Multipart,
) -> ActixResult<HttpResponse> {
    let image = match read_image_field(&mut payload).await? {
        Some(image) => image,
        None => {
            return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "error": "No image provided."
            })));
        }
    };

    let state = state.into_inner();
    // Embedding is CPU-bound; keep it off the async workers
    let result = web::block(move || {
        let store = state.store.snapshot();
        state
            .pipeline
            .estimate_image(&image, &store)
            .map(|estimation| EstimateResponse::build(&estimation.matches, estimation.estimate))
    })
    .await
    .map_err(error::ErrorInternalServerError)?;

    match result {
        Ok(response) => Ok(HttpResponse::Ok().json(response)),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn rank_vector(
    state: web::Data<Arc<AppState>>,
    req: web::Json<RankRequest>,
) -> ActixResult<HttpResponse> {
    let defaults = *state.ranker_config();
    let config = RankerConfig {
        threshold: req.threshold.or(defaults.threshold),
        top_k: req.limit.unwrap_or(defaults.top_k),
    };
    if let Err(e) = config.validate() {
        return Ok(error_response(&e));
    }

    let store = state.store.snapshot();
    let query = Vector::from_slice(&req.vector);
    match rank(&query, &store, config.threshold, config.top_k) {
        Ok(matches) => {
            let estimate = estimate(&matches);
            Ok(HttpResponse::Ok().json(EstimateResponse::build(&matches, estimate)))
        }
        Err(e) => Ok(error_response(&e)),
    }
}

async fn reload_store(state: web::Data<Arc<AppState>>) -> ActixResult<HttpResponse> {
    let state = state.into_inner();
    // File read and JSON parsing block; same treatment as embedding
    let result = web::block(move || {
        state.store.reload(&state.loader).map(|store| {
            info!("Reloaded dataset from {:?}", state.loader.path());
            store.len()
        })
    })
    .await
    .map_err(error::ErrorInternalServerError)?;

    match result {
        Ok(profiles) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "result": true,
            "profiles": profiles,
        }))),
        Err(e) => Ok(error_response(&e)),
    }
}
