//! JSON envelope for the accounts API.
//!
//! Every `/api` response carries `{flag, code, msg, data}`; the HTTP status
//! mirrors `code`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T = serde_json::Value> {
    pub flag: bool,
    pub code: u16,
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn ok(code: StatusCode, msg: impl Into<String>, data: Option<T>) -> Self {
        Self {
            flag: true,
            code: code.as_u16(),
            msg: msg.into(),
            data,
        }
    }

    pub fn fail(code: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            flag: false,
            code: code.as_u16(),
            msg: msg.into(),
            data: None,
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mirrors_code() {
        let response = Envelope::<()>::fail(StatusCode::NOT_FOUND, "nope").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = Envelope::ok(StatusCode::CREATED, "user created", None::<()>).into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[test]
    fn test_data_omitted_when_absent() {
        let json = serde_json::to_value(Envelope::<()>::fail(StatusCode::BAD_REQUEST, "bad")).unwrap();
        assert_eq!(json, serde_json::json!({"flag": false, "code": 400, "msg": "bad"}));
    }

    #[derive(Debug, PartialEq, Deserialize)]
    struct Ticket {
        id: u32,
    }

    #[test]
    fn test_typed_data_deserializes() {
        let envelope: Envelope<Ticket> =
            serde_json::from_str(r#"{"flag": true, "code": 200, "msg": "student", "data": {"id": 9}}"#).unwrap();
        assert_eq!(envelope.data, Some(Ticket { id: 9 }));

        let envelope: Envelope<Ticket> =
            serde_json::from_str(r#"{"flag": false, "code": 404, "msg": "nope"}"#).unwrap();
        assert_eq!(envelope.data, None);
    }
}
