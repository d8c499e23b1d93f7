use std::{net::SocketAddr, time::Instant};

use axum::{
    body::Body,
    extract::{rejection::JsonRejection, ConnectInfo, Path, Query, State},
    http::{header, HeaderMap, HeaderValue, Request, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post, put},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::net::TcpListener;
use uuid::Uuid;

use crate::{
    app_state::AppState,
    live_metadata::{LiveMetadata, LiveMetadataPayload},
    logging::logger,
    programs::{ImagePayload, Program, ProgramFilter, ProgramPayload},
    schedule::{format_time_of_day, ScheduleInstant},
    seed::{import_timetable, ImportTarget},
    stations::{is_valid_station_id, SocialLinksPayload, Station, StationPayload, StorageError},
};

const INVALID_QUERY_ERROR: &str = "Invalid query parameters supplied.";
const INVALID_BODY_ERROR: &str = "Invalid request body.";
const STATION_NOT_FOUND: &str = "Station not found";
const PROGRAM_NOT_FOUND: &str = "Program not found";

type ApiResponse = Result<Response, ApiError>;

fn extract_request_id(headers: &HeaderMap) -> String {
    headers
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.trim().is_empty())
        .map(|value| value.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

fn extract_client_ip(headers: &HeaderMap, remote: Option<&SocketAddr>) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|raw| raw.split(',').next())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .or_else(|| remote.map(|addr| addr.ip().to_string()))
}

async fn log_requests(request: Request<Body>, next: Next) -> Response {
    let request_id = extract_request_id(request.headers());
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let remote = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| &info.0);
    let client_ip = extract_client_ip(request.headers(), remote);
    let started_at = Instant::now();

    logger().debug(
        "request.received",
        json!({
            "requestId": request_id,
            "method": method.as_str(),
            "path": path,
            "clientIp": client_ip,
        }),
    );

    let mut response = next.run(request).await;
    let status = response.status().as_u16();
    let duration_ms = started_at.elapsed().as_secs_f64() * 1000.0;

    logger().info(
        "request.completed",
        json!({
            "requestId": request_id,
            "method": method.as_str(),
            "path": path,
            "statusCode": status,
            "durationMs": duration_ms,
            "clientIp": client_ip,
        }),
    );

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response
            .headers_mut()
            .insert(header::HeaderName::from_static("x-request-id"), value);
    }

    response
}

fn json_response<T>(status: StatusCode, payload: T) -> Response
where
    T: Serialize,
{
    (status, Json(payload)).into_response()
}

#[derive(Debug)]
enum ApiError {
    Internal(anyhow::Error),
    Unauthorized(&'static str),
    Forbidden(&'static str),
    BadRequest(&'static str),
    BadRequestWithDetails {
        message: &'static str,
        details: Vec<String>,
    },
    NotFound(&'static str),
    Conflict(String),
}

impl ApiError {
    fn internal(error: impl Into<anyhow::Error>) -> Self {
        ApiError::Internal(error.into())
    }

    fn invalid_body(details: Vec<String>) -> Self {
        ApiError::BadRequestWithDetails {
            message: INVALID_BODY_ERROR,
            details,
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::Conflict(message) => ApiError::Conflict(message),
            StorageError::MissingStation(_) => ApiError::invalid_body(vec![error.to_string()]),
            other => ApiError::internal(other),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse<'a> {
    error: &'a str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Unauthorized(message) => {
                let mut response = json_response(
                    StatusCode::UNAUTHORIZED,
                    ErrorResponse { error: message },
                );
                response.headers_mut().insert(
                    header::WWW_AUTHENTICATE,
                    HeaderValue::from_static("Bearer"),
                );
                response
            }
            ApiError::Forbidden(message) => {
                json_response(StatusCode::FORBIDDEN, ErrorResponse { error: message })
            }
            ApiError::BadRequest(message) => {
                json_response(StatusCode::BAD_REQUEST, ErrorResponse { error: message })
            }
            ApiError::BadRequestWithDetails { message, details } => json_response(
                StatusCode::BAD_REQUEST,
                json!({
                    "error": message,
                    "details": details,
                }),
            ),
            ApiError::NotFound(message) => {
                json_response(StatusCode::NOT_FOUND, ErrorResponse { error: message })
            }
            ApiError::Conflict(message) => {
                json_response(StatusCode::CONFLICT, ErrorResponse { error: &message })
            }
            ApiError::Internal(error) => {
                logger().error(
                    "internal.error",
                    json!({
                        "error": {
                            "message": error.to_string(),
                            "debug": format!("{:?}", error),
                        }
                    }),
                );
                json_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Internal Server Error",
                    },
                )
            }
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/internal/status", get(internal_status))
        .route("/stations", get(list_stations).post(create_station))
        .route(
            "/stations/{station_id}",
            get(get_station).put(update_station).delete(delete_station),
        )
        .route(
            "/stations/{station_id}/social-links",
            get(get_social_links).put(put_social_links),
        )
        .route("/programs", get(list_programs).post(create_program))
        .route(
            "/programs/{program_id}",
            put(update_program).delete(delete_program),
        )
        .route("/programs/{program_id}/image", patch(patch_program_image))
        .route(
            "/live-metadata",
            get(get_live_metadata).post(post_live_metadata),
        )
        .route("/live-metadata/{station_id}", delete(delete_live_metadata))
        .route("/schedule/import", post(import_schedule))
        .with_state(state)
        .layer(middleware::from_fn(log_requests))
}

pub async fn serve(state: AppState) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], state.config.port));
    let router = build_router(state);

    let listener = TcpListener::bind(addr).await?;
    logger().info(
        "server.listening",
        json!({
            "address": addr.to_string()
        }),
    );

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

fn ensure_admin(headers: &HeaderMap, expected_token: &str) -> Result<(), ApiError> {
    let Some(provided) = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
    else {
        return Err(ApiError::Unauthorized("Missing bearer token"));
    };
    match provided.strip_prefix("Bearer ") {
        Some(token) if constant_time_eq(token.trim().as_bytes(), expected_token.as_bytes()) => {
            Ok(())
        }
        _ => Err(ApiError::Forbidden("Invalid admin token")),
    }
}

fn constant_time_eq(left: &[u8], right: &[u8]) -> bool {
    if left.len() != right.len() {
        return false;
    }
    left.iter()
        .zip(right)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

fn parse_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::invalid_body(vec![rejection.body_text()]))
}

fn parse_station_id(raw: &str) -> Result<String, ApiError> {
    let trimmed = raw.trim();
    if is_valid_station_id(trimmed) {
        Ok(trimmed.to_string())
    } else {
        Err(ApiError::NotFound(STATION_NOT_FOUND))
    }
}

fn parse_program_id(raw: &str) -> Result<i64, ApiError> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or(ApiError::BadRequest("Program id must be a positive integer."))
}

fn parse_flag(value: Option<&str>) -> Result<bool, &'static str> {
    match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        None | Some("") | Some("false") | Some("0") => Ok(false),
        Some("true") | Some("1") => Ok(true),
        Some(_) => Err("flag must be true or false"),
    }
}

#[derive(Serialize)]
struct HealthResponse<'a> {
    status: &'a str,
}

async fn healthz(State(state): State<AppState>) -> Response {
    match state.ping_postgres().await {
        Ok(_) => json_response(StatusCode::OK, HealthResponse { status: "ok" }),
        Err(error) => json_response(
            StatusCode::SERVICE_UNAVAILABLE,
            json!({
                "status": "error",
                "message": error.to_string(),
            }),
        ),
    }
}

async fn internal_status(State(state): State<AppState>) -> Response {
    let postgres_ok = state.ping_postgres().await.is_ok();
    let (stations, programs) = if postgres_ok {
        (
            state.stations.count_active().await.ok(),
            state.programs.count_active().await.ok(),
        )
    } else {
        (None, None)
    };
    let overall_ok = postgres_ok && stations.is_some() && programs.is_some();
    let body = json!({
        "status": if overall_ok { "ok" } else { "error" },
        "timestamp": Utc::now().to_rfc3339(),
        "checks": {
            "postgres": if postgres_ok { "ok" } else { "error" },
        },
        "counts": {
            "activeStations": stations,
            "activePrograms": programs,
        },
    });
    let code = if overall_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    json_response(code, body)
}

#[derive(Serialize)]
struct ListMeta {
    total: usize,
}

#[derive(Serialize)]
struct ListResponse<T> {
    meta: ListMeta,
    items: Vec<T>,
}

impl<T> ListResponse<T> {
    fn new(items: Vec<T>) -> Self {
        Self {
            meta: ListMeta { total: items.len() },
            items,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct StationsQuery {
    #[serde(default)]
    active: Option<String>,
}

impl StationsQuery {
    fn normalized(self) -> Result<Option<bool>, Vec<String>> {
        match self.active.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some("true") => Ok(Some(true)),
            Some("false") => Ok(Some(false)),
            Some(_) => Err(vec!["active must be true or false".into()]),
        }
    }
}

async fn list_stations(
    State(state): State<AppState>,
    Query(query): Query<StationsQuery>,
) -> ApiResponse {
    let active = query
        .normalized()
        .map_err(|details| ApiError::BadRequestWithDetails {
            message: INVALID_QUERY_ERROR,
            details,
        })?;
    let stations = state.stations.list(active).await?;
    let mut reply = Json(ListResponse::new(stations)).into_response();
    reply.headers_mut().insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("public, max-age=30, stale-while-revalidate=120"),
    );
    Ok(reply)
}

async fn get_station(
    State(state): State<AppState>,
    Path(station_id): Path<String>,
) -> ApiResponse {
    let station_id = parse_station_id(&station_id)?;
    let station = state
        .stations
        .get(&station_id)
        .await?
        .ok_or(ApiError::NotFound(STATION_NOT_FOUND))?;
    Ok(Json(station).into_response())
}

async fn create_station(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<StationPayload>, JsonRejection>,
) -> ApiResponse {
    ensure_admin(&headers, &state.config.admin_token)?;
    let record = parse_body(payload)?
        .into_new(state.config.allow_insecure_transports)
        .map_err(ApiError::invalid_body)?;
    let station = state.stations.create(&record).await?;
    logger().info("station.created", json!({ "stationId": station.id }));
    Ok(json_response(StatusCode::CREATED, station))
}

async fn update_station(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(station_id): Path<String>,
    payload: Result<Json<StationPayload>, JsonRejection>,
) -> ApiResponse {
    ensure_admin(&headers, &state.config.admin_token)?;
    let station_id = parse_station_id(&station_id)?;
    let record = parse_body(payload)?
        .into_update(&station_id, state.config.allow_insecure_transports)
        .map_err(ApiError::invalid_body)?;
    let station: Station = state
        .stations
        .update(&record)
        .await?
        .ok_or(ApiError::NotFound(STATION_NOT_FOUND))?;
    logger().info("station.updated", json!({ "stationId": station.id }));
    Ok(Json(station).into_response())
}

#[derive(Debug, Default, Deserialize)]
struct DeleteQuery {
    #[serde(default)]
    hard: Option<String>,
}

impl DeleteQuery {
    fn hard(&self) -> Result<bool, ApiError> {
        parse_flag(self.hard.as_deref()).map_err(|message| ApiError::BadRequestWithDetails {
            message: INVALID_QUERY_ERROR,
            details: vec![format!("hard: {message}")],
        })
    }
}

async fn delete_station(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(station_id): Path<String>,
    Query(query): Query<DeleteQuery>,
) -> ApiResponse {
    ensure_admin(&headers, &state.config.admin_token)?;
    let station_id = parse_station_id(&station_id)?;
    let hard = query.hard()?;
    let found = if hard {
        state.stations.delete(&station_id).await?
    } else {
        state.stations.deactivate(&station_id).await?
    };
    if !found {
        return Err(ApiError::NotFound(STATION_NOT_FOUND));
    }
    logger().info(
        "station.deleted",
        json!({ "stationId": station_id, "hard": hard }),
    );
    Ok(json_response(
        StatusCode::OK,
        json!({ "id": station_id, "deleted": if hard { "hard" } else { "soft" } }),
    ))
}

async fn get_social_links(
    State(state): State<AppState>,
    Path(station_id): Path<String>,
) -> ApiResponse {
    let station_id = parse_station_id(&station_id)?;
    let links = state
        .stations
        .social_links(&station_id)
        .await?
        .ok_or(ApiError::NotFound("Social links not found"))?;
    Ok(Json(links).into_response())
}

async fn put_social_links(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(station_id): Path<String>,
    payload: Result<Json<SocialLinksPayload>, JsonRejection>,
) -> ApiResponse {
    ensure_admin(&headers, &state.config.admin_token)?;
    let station_id = parse_station_id(&station_id)?;
    let links = parse_body(payload)?
        .into_links(&station_id)
        .map_err(ApiError::invalid_body)?;
    let saved = state
        .stations
        .upsert_social_links(&links)
        .await
        .map_err(|error| match error {
            StorageError::MissingStation(_) => ApiError::NotFound(STATION_NOT_FOUND),
            other => other.into(),
        })?;
    logger().info("social_links.saved", json!({ "stationId": station_id }));
    Ok(Json(saved).into_response())
}

async fn list_programs(
    State(state): State<AppState>,
    Query(query): Query<ProgramFilter>,
) -> ApiResponse {
    let filter = query
        .normalized()
        .map_err(|details| ApiError::BadRequestWithDetails {
            message: INVALID_QUERY_ERROR,
            details,
        })?;
    let programs = state.programs.list(&filter).await?;
    Ok(Json(ListResponse::new(programs)).into_response())
}

async fn create_program(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ProgramPayload>, JsonRejection>,
) -> ApiResponse {
    ensure_admin(&headers, &state.config.admin_token)?;
    let record = parse_body(payload)?
        .validate()
        .map_err(ApiError::invalid_body)?;
    let program = state.programs.create(&record).await?;
    logger().info(
        "program.created",
        json!({ "programId": program.id, "stationId": program.station_id }),
    );
    Ok(json_response(StatusCode::CREATED, program))
}

async fn update_program(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(program_id): Path<String>,
    payload: Result<Json<ProgramPayload>, JsonRejection>,
) -> ApiResponse {
    ensure_admin(&headers, &state.config.admin_token)?;
    let program_id = parse_program_id(&program_id)?;
    let record = parse_body(payload)?
        .validate()
        .map_err(ApiError::invalid_body)?;
    let program: Program = state
        .programs
        .update(program_id, &record)
        .await?
        .ok_or(ApiError::NotFound(PROGRAM_NOT_FOUND))?;
    logger().info("program.updated", json!({ "programId": program.id }));
    Ok(Json(program).into_response())
}

async fn patch_program_image(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(program_id): Path<String>,
    payload: Result<Json<ImagePayload>, JsonRejection>,
) -> ApiResponse {
    ensure_admin(&headers, &state.config.admin_token)?;
    let program_id = parse_program_id(&program_id)?;
    let image = parse_body(payload)?
        .validate()
        .map_err(ApiError::invalid_body)?;
    if !state.programs.update_image(program_id, &image).await? {
        return Err(ApiError::NotFound(PROGRAM_NOT_FOUND));
    }
    Ok(json_response(
        StatusCode::OK,
        json!({ "id": program_id, "image": image }),
    ))
}

async fn delete_program(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(program_id): Path<String>,
    Query(query): Query<DeleteQuery>,
) -> ApiResponse {
    ensure_admin(&headers, &state.config.admin_token)?;
    let program_id = parse_program_id(&program_id)?;
    let hard = query.hard()?;
    let found = if hard {
        state.programs.delete(program_id).await?
    } else {
        state.programs.deactivate(program_id).await?
    };
    if !found {
        return Err(ApiError::NotFound(PROGRAM_NOT_FOUND));
    }
    logger().info(
        "program.deleted",
        json!({ "programId": program_id, "hard": hard }),
    );
    Ok(json_response(
        StatusCode::OK,
        json!({ "id": program_id, "deleted": if hard { "hard" } else { "soft" } }),
    ))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LiveMetadataQuery {
    #[serde(default)]
    station_id: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LiveMetadataResponse {
    station_id: String,
    current_program: Option<Program>,
    live_metadata: Option<LiveMetadata>,
    current_time: String,
    day_type: &'static str,
}

async fn get_live_metadata(
    State(state): State<AppState>,
    Query(query): Query<LiveMetadataQuery>,
) -> ApiResponse {
    let station_id = query
        .station_id
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(ApiError::BadRequest("stationId is required"))?;
    if !is_valid_station_id(station_id) {
        return Err(ApiError::BadRequestWithDetails {
            message: INVALID_QUERY_ERROR,
            details: vec!["stationId is not a valid station id".into()],
        });
    }

    let instant: ScheduleInstant = state.clock.instant();
    let current_program = state
        .programs
        .current_program(station_id, &instant)
        .await?;
    let live_metadata = state.live_metadata.get(station_id).await?;

    let mut reply = Json(LiveMetadataResponse {
        station_id: station_id.to_string(),
        current_program,
        live_metadata,
        current_time: format_time_of_day(&instant.time),
        day_type: instant.day_type.as_str(),
    })
    .into_response();
    reply
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    Ok(reply)
}

async fn post_live_metadata(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<LiveMetadataPayload>, JsonRejection>,
) -> ApiResponse {
    ensure_admin(&headers, &state.config.admin_token)?;
    let record = parse_body(payload)?
        .validate()
        .map_err(ApiError::invalid_body)?;
    let saved = state.live_metadata.upsert(&record).await?;
    logger().info(
        "live_metadata.saved",
        json!({
            "stationId": saved.station_id,
            "programName": saved.program_name,
        }),
    );
    Ok(Json(saved).into_response())
}

async fn delete_live_metadata(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(station_id): Path<String>,
) -> ApiResponse {
    ensure_admin(&headers, &state.config.admin_token)?;
    let station_id = parse_station_id(&station_id)?;
    if !state.live_metadata.delete(&station_id).await? {
        return Err(ApiError::NotFound("Live metadata not found"));
    }
    logger().info("live_metadata.cleared", json!({ "stationId": station_id }));
    Ok(StatusCode::NO_CONTENT.into_response())
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportQuery {
    #[serde(default)]
    station_id: Option<String>,
    #[serde(default)]
    all: Option<String>,
    #[serde(default)]
    clear: Option<String>,
}

impl ImportQuery {
    fn normalized(self) -> Result<(ImportTarget, bool), Vec<String>> {
        let mut errors = Vec::new();
        let all = parse_flag(self.all.as_deref()).unwrap_or_else(|message| {
            errors.push(format!("all: {message}"));
            false
        });
        let clear = parse_flag(self.clear.as_deref()).unwrap_or_else(|message| {
            errors.push(format!("clear: {message}"));
            false
        });
        let station_id = self
            .station_id
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        let target = match (station_id, all) {
            (Some(_), true) => {
                errors.push("use either stationId or all=true, not both".into());
                None
            }
            (Some(id), false) if is_valid_station_id(&id) => Some(ImportTarget::Station(id)),
            (Some(_), false) => {
                errors.push("stationId is not a valid station id".into());
                None
            }
            (None, true) => Some(ImportTarget::AllActive),
            (None, false) => {
                errors.push("stationId or all=true is required".into());
                None
            }
        };

        match target {
            Some(target) if errors.is_empty() => Ok((target, clear)),
            _ => Err(errors),
        }
    }
}

async fn import_schedule(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ImportQuery>,
) -> ApiResponse {
    ensure_admin(&headers, &state.config.admin_token)?;
    let (target, clear) = query
        .normalized()
        .map_err(|details| ApiError::BadRequestWithDetails {
            message: INVALID_QUERY_ERROR,
            details,
        })?;
    let outcomes = import_timetable(&state.stations, &state.programs, &target, clear)
        .await
        .map_err(|error| match error {
            StorageError::MissingStation(_) => ApiError::NotFound(STATION_NOT_FOUND),
            other => other.into(),
        })?;
    let items: Vec<_> = outcomes
        .into_iter()
        .map(|(station_id, outcome)| {
            json!({
                "stationId": station_id,
                "removed": outcome.removed,
                "inserted": outcome.inserted,
            })
        })
        .collect();
    Ok(Json(ListResponse::new(items)).into_response())
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            logger().error(
                "shutdown.signal_failed",
                json!({ "signal": "ctrl_c", "error": error.to_string() }),
            );
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(error) => {
                logger().error(
                    "shutdown.signal_failed",
                    json!({ "signal": "sigterm", "error": error.to_string() }),
                );
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    logger().info("shutdown.requested", json!({}));
}
