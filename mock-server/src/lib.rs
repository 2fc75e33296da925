//! In-memory stand-in for the dashboard REST API.
//!
//! Reproduces the behaviors the client core is built around: token auth,
//! trailing-slash routes, page-number pagination with the `ids` ordering
//! key, exact-match filters where a present-but-blank value matches
//! nothing, and a multipart echo endpoint for upload submissions.

use std::{cmp::Reverse, collections::HashMap, sync::Arc};

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i64,
    pub title: String,
    pub company: String,
    pub status: i32,
    pub source: i32,
    pub applied_date: Option<String>,
    pub notes: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJob {
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub status: i32,
    #[serde(default)]
    pub source: i32,
    pub applied_date: Option<String>,
    #[serde(default)]
    pub notes: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJob {
    pub title: Option<String>,
    pub company: Option<String>,
    pub status: Option<i32>,
    pub source: Option<i32>,
    pub applied_date: Option<String>,
    pub notes: Option<String>,
}

/// Paginated list payload, mirroring the real backend's camelCase shape.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse {
    pub results: Vec<Job>,
    pub count: usize,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub current_page: usize,
    pub total_pages: usize,
    pub ids: Vec<i64>,
}

#[derive(Default)]
pub struct Board {
    next_id: i64,
    jobs: HashMap<i64, Job>,
}

pub type Db = Arc<RwLock<Board>>;

type ApiError = (StatusCode, Json<Value>);

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Board::default()));
    Router::new()
        .route("/jobs/", get(list_jobs).post(create_job))
        .route(
            "/jobs/{id}/",
            get(get_job).patch(update_job).delete(delete_job),
        )
        .route("/documents/", post(upload_document))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Every route wants `Authorization: Token <key>`, like the real backend.
fn authorized(headers: &HeaderMap) -> Result<(), ApiError> {
    let present = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("Token "));
    if present {
        Ok(())
    } else {
        Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Authentication credentials were not provided."})),
        ))
    }
}

fn not_found() -> ApiError {
    (StatusCode::NOT_FOUND, Json(json!({"detail": "Not found."})))
}

/// Exact-match filters. A filter key that arrives with a blank value
/// matches nothing; clients are expected to drop blank pairs before the
/// request reaches us.
fn matches_filters(job: &Job, params: &HashMap<String, String>) -> bool {
    params.iter().all(|(key, target)| match key.as_str() {
        "status" => job.status.to_string() == *target,
        "source" => job.source.to_string() == *target,
        "search" => job.title.contains(target.as_str()) || job.company.contains(target.as_str()),
        _ => true,
    })
}

async fn list_jobs(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<PageResponse>, ApiError> {
    authorized(&headers)?;
    let board = db.read().await;

    let mut jobs: Vec<Job> = board
        .jobs
        .values()
        .filter(|job| matches_filters(job, &params))
        .cloned()
        .collect();
    // Newest first, the dashboard's default ordering.
    jobs.sort_by_key(|job| Reverse(job.id));

    let page_size = params
        .get("page_size")
        .and_then(|value| value.parse().ok())
        .unwrap_or(10)
        .max(1);
    let page = params
        .get("page")
        .and_then(|value| value.parse().ok())
        .unwrap_or(1)
        .max(1);

    let count = jobs.len();
    let total_pages = count.div_ceil(page_size).max(1);
    let results: Vec<Job> = jobs
        .into_iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .collect();
    let ids = results.iter().map(|job| job.id).collect();

    let next = (page < total_pages).then(|| format!("/jobs/?page={}", page + 1));
    let previous = (page > 1).then(|| format!("/jobs/?page={}", page - 1));

    Ok(Json(PageResponse {
        results,
        count,
        next,
        previous,
        current_page: page,
        total_pages,
        ids,
    }))
}

async fn create_job(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<CreateJob>,
) -> Result<(StatusCode, Json<Job>), ApiError> {
    authorized(&headers)?;
    let mut board = db.write().await;
    board.next_id += 1;
    let job = Job {
        id: board.next_id,
        title: input.title,
        company: input.company,
        status: input.status,
        source: input.source,
        applied_date: input.applied_date,
        notes: input.notes,
    };
    board.jobs.insert(job.id, job.clone());
    Ok((StatusCode::CREATED, Json(job)))
}

async fn get_job(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<Job>, ApiError> {
    authorized(&headers)?;
    let board = db.read().await;
    board.jobs.get(&id).cloned().map(Json).ok_or_else(not_found)
}

async fn update_job(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(input): Json<UpdateJob>,
) -> Result<Json<Job>, ApiError> {
    authorized(&headers)?;
    let mut board = db.write().await;
    let job = board.jobs.get_mut(&id).ok_or_else(not_found)?;
    if let Some(title) = input.title {
        job.title = title;
    }
    if let Some(company) = input.company {
        job.company = company;
    }
    if let Some(status) = input.status {
        job.status = status;
    }
    if let Some(source) = input.source {
        job.source = source;
    }
    if let Some(applied_date) = input.applied_date {
        job.applied_date = Some(applied_date);
    }
    if let Some(notes) = input.notes {
        job.notes = notes;
    }
    Ok(Json(job.clone()))
}

async fn delete_job(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    authorized(&headers)?;
    let mut board = db.write().await;
    board
        .jobs
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(not_found)
}

/// Echo back the multipart form fields we received, so clients can verify
/// what their encoding actually carried.
async fn upload_document(
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    authorized(&headers)?;
    let mut received = serde_json::Map::new();
    while let Some(field) = multipart.next_field().await.map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({"detail": "malformed multipart body"})),
        )
    })? {
        let name = field.name().unwrap_or_default().to_string();
        let text = field.text().await.unwrap_or_default();
        received.insert(name, Value::String(text));
    }
    Ok((StatusCode::CREATED, Json(json!({"received": received}))))
}
