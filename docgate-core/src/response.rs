//! JSON bodies returned to clients.
//!
//! Every body carries a `status` of `"success"` or `"error"`.

use bson::Document as Fields;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// A page of query results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResponse {
    pub status: Status,
    pub data: Vec<Fields>,
    pub limit: usize,
    pub offset: usize,
    pub count: usize,
}

impl QueryResponse {
    pub fn new(data: Vec<Fields>, limit: usize, offset: usize) -> Self {
        Self {
            status: Status::Success,
            count: data.len(),
            data,
            limit,
            offset,
        }
    }
}

/// A single document or a plain message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuccessResponse<T> {
    pub status: Status,
    #[serde(flatten)]
    pub body: T,
}

impl<T> SuccessResponse<T> {
    pub fn new(body: T) -> Self {
        Self { status: Status::Success, body }
    }
}

/// The body of every failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub status: Status,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { status: Status::Error, message: message.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use serde_json::json;

    #[test]
    fn query_response_counts_its_data() {
        let response = QueryResponse::new(vec![doc! { "name": "Y", "id": "b" }], 2, 1);

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "status": "success",
                "data": [{ "name": "Y", "id": "b" }],
                "limit": 2,
                "offset": 1,
                "count": 1,
            })
        );
    }

    #[test]
    fn success_response_flattens_its_body() {
        #[derive(Serialize)]
        struct Message {
            message: &'static str,
        }

        let response = SuccessResponse::new(Message { message: "ok" });
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({ "status": "success", "message": "ok" })
        );
    }

    #[test]
    fn error_response_shape() {
        assert_eq!(
            serde_json::to_value(ErrorResponse::new("Not found")).unwrap(),
            json!({ "status": "error", "message": "Not found" })
        );
    }
}
