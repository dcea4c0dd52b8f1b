use crate::candidate::Candidate;
use crate::directory::{CandidateDirectory, DirectoryError};
use crate::dynamo::Table;
use crate::s3::Storage;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::error;

type SharedDirectory<T, S> = State<Arc<CandidateDirectory<T, S>>>;

/// Candidate as returned over HTTP, with a presigned link when it has an image
#[derive(Debug, Serialize)]
pub struct CandidateView {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub image_link: Option<String>,
}

/// Router exposing the service banner routes and the candidate directory
pub fn router<T, S>(directory: CandidateDirectory<T, S>) -> Router
where
    T: Table,
    S: Storage,
{
    Router::new()
        .route("/", get(home))
        .route("/api/example", get(example))
        .route(
            "/candidates",
            get(list_handler::<T, S>).post(create_handler::<T, S>),
        )
        .route("/candidates/:uin/image", get(image_link_handler::<T, S>))
        .with_state(Arc::new(directory))
}

pub(crate) async fn home() -> Json<serde_json::Value> {
    Json(json!({ "message": "Welcome to the Recruitment Tool Backend!" }))
}

pub(crate) async fn example() -> Json<serde_json::Value> {
    Json(json!({ "message": "This is an example endpoint." }))
}

pub(crate) async fn list_handler<T, S>(State(directory): SharedDirectory<T, S>) -> Response
where
    T: Table,
    S: Storage,
{
    let candidates = match directory.list_candidates().await {
        Ok(candidates) => candidates,
        Err(err) => return error_response(err),
    };

    let mut views = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let image_link = if candidate.has_image() {
            match directory.presigned_image_url_default(candidate.uin).await {
                Ok(link) => link,
                Err(err) => return error_response(err),
            }
        } else {
            None
        };
        views.push(CandidateView {
            candidate,
            image_link,
        });
    }

    (StatusCode::OK, Json(views)).into_response()
}

pub(crate) async fn create_handler<T, S>(
    State(directory): SharedDirectory<T, S>,
    Json(candidate): Json<Candidate>,
) -> Response
where
    T: Table,
    S: Storage,
{
    // Only the directory and CLI may read local image files
    if candidate.has_image() {
        let payload = json!({
            "error": "image_url cannot be set over HTTP; upload images separately"
        });
        return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
    }

    match directory.create_candidate(&candidate).await {
        Ok(mapping) => (StatusCode::CREATED, Json(mapping)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn image_link_handler<T, S>(
    State(directory): SharedDirectory<T, S>,
    Path(uin): Path<i64>,
) -> Response
where
    T: Table,
    S: Storage,
{
    match directory.presigned_image_url_default(uin).await {
        Ok(url) => (StatusCode::OK, Json(json!({ "uin": uin, "url": url }))).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: DirectoryError) -> Response {
    error!("Request failed: {}", err);

    let payload = json!({ "error": err.to_string() });
    (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
}
