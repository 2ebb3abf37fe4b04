use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};
use bson::Document as Fields;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use docgate_core::{
    document::{ID_FIELD, RawDocument},
    error::DocumentStoreError,
    params::RawParams,
    projection::project,
    response::{QueryResponse, SuccessResponse},
};

use super::Data;
use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

type DocumentResponse = Json<SuccessResponse<Data<Fields>>>;

fn respond_with(document: &RawDocument) -> DocumentResponse {
    Json(SuccessResponse::new(Data {
        data: project(document, None),
    }))
}

/// Converts a JSON request body into document fields.
fn body_fields(body: Result<Json<Value>, JsonRejection>) -> ApiResult<Fields> {
    let Json(value) = body.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let Value::Object(map) = value else {
        return Err(ApiError::BadRequest("Request body must be a JSON object".into()));
    };

    bson::ser::serialize_to_document(&map).map_err(|err| ApiError::BadRequest(err.to_string()))
}

pub async fn query(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    params: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> ApiResult<Json<QueryResponse>> {
    let Query(pairs) = params.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let params = pairs.into_iter().collect::<RawParams>();

    let response = state
        .orchestrator
        .run(state.backend.as_ref(), &collection, &params)
        .await?;

    Ok(Json(response))
}

pub async fn create(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<DocumentResponse> {
    let fields = body_fields(body)?;
    let id = match fields.get_str(ID_FIELD) {
        Ok(id) if !id.is_empty() => id.to_string(),
        _ => Uuid::new_v4().to_string(),
    };

    state
        .backend
        .insert_document(&id, fields.clone(), &collection)
        .await?;
    info!(%collection, %id, "created document");

    Ok(respond_with(&RawDocument::new(id, fields)))
}

pub async fn read(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
) -> ApiResult<DocumentResponse> {
    state
        .backend
        .get_document(&id, &collection)
        .await?
        .map(|document| respond_with(&document))
        .ok_or(ApiError::NotFound("Not found"))
}

pub async fn update(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<DocumentResponse> {
    let fields = body_fields(body)?;

    match state.backend.merge_document(&id, fields, &collection).await {
        Ok(document) => {
            info!(%collection, %id, "updated document");
            Ok(respond_with(&document))
        }
        Err(DocumentStoreError::DocumentNotFound(..)) => Err(ApiError::NotFound("Document not found")),
        Err(err) => Err(err.into()),
    }
}

pub async fn delete(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
) -> ApiResult<Json<SuccessResponse<Data<Fields>>>> {
    state.backend.delete_document(&id, &collection).await?;
    info!(%collection, %id, "deleted document");

    Ok(Json(SuccessResponse::new(Data {
        data: bson::doc! { ID_FIELD: id },
    })))
}
