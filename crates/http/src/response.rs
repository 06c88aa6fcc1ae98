//! Success envelope: `{ "status": "success", "message"?, "data"? }`

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct SuccessBody<T> {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// A successful response carrying a status code and the success envelope.
#[derive(Debug)]
pub struct ApiResponse<T = ()> {
    status: StatusCode,
    body: SuccessBody<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 200 with a data payload and no message
    pub fn ok(data: T) -> Self {
        Self {
            status: StatusCode::OK,
            body: SuccessBody {
                status: "success",
                message: None,
                data: Some(data),
            },
        }
    }

    /// 201 with both a message and a data payload
    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            body: SuccessBody {
                status: "success",
                message: Some(message.into()),
                data: Some(data),
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &SuccessBody<T> {
        &self.body
    }
}

impl ApiResponse<()> {
    /// 200 with a confirmation message only
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            body: SuccessBody {
                status: "success",
                message: Some(message.into()),
                data: None,
            },
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
