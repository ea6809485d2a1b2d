use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
#[error("{message} (code {code})")]
pub struct Error {
    pub code: i32,
    pub message: String,
}

impl Error {
    pub fn status(&self) -> StatusCode {
        match self.code {
            4 => StatusCode::BAD_GATEWAY,
            1..=99 => StatusCode::INTERNAL_SERVER_ERROR,
            102..=104 => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        reqwest_error(err)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            "Internal Server Error"
        } else {
            self.message.as_str()
        };

        let body = Json(json!({
            "code": self.code,
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

pub fn invalid_input_error() -> Error {
    Error {
        code: 101,
        message: "invalid input".into(),
    }
}

pub fn address_not_found_error(address: &str) -> Error {
    Error {
        code: 102,
        message: format!("address not found: {}", address),
    }
}

pub fn route_not_found_error() -> Error {
    Error {
        code: 103,
        message: "no route available between the selected points".into(),
    }
}

pub fn unknown_vehicle_error(id: &str) -> Error {
    Error {
        code: 104,
        message: format!("unknown vehicle model: {}", id),
    }
}

pub fn invalid_coordinates_error() -> Error {
    Error {
        code: 105,
        message: "invalid coordinates".into(),
    }
}

pub fn config_error(key: &str) -> Error {
    Error {
        code: 2,
        message: format!("invalid configuration value for {}", key),
    }
}

pub fn reqwest_error(err: reqwest::Error) -> Error {
    if err.is_timeout() || err.is_connect() || err.is_decode() {
        return upstream_error();
    }

    Error {
        code: 3,
        message: "reqwest error".into(),
    }
}

pub fn upstream_error() -> Error {
    Error {
        code: 4,
        message: "upstream service unavailable".into(),
    }
}

pub fn unexpected_error() -> Error {
    Error {
        code: 5,
        message: "unexpected error".into(),
    }
}

#[test]
fn error_status_test() {
    assert_eq!(upstream_error().status(), StatusCode::BAD_GATEWAY);
    assert_eq!(unexpected_error().status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(config_error("X").status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(invalid_input_error().status(), StatusCode::BAD_REQUEST);
    assert_eq!(invalid_coordinates_error().status(), StatusCode::BAD_REQUEST);
    assert_eq!(address_not_found_error("x").status(), StatusCode::NOT_FOUND);
    assert_eq!(route_not_found_error().status(), StatusCode::NOT_FOUND);
    assert_eq!(unknown_vehicle_error("x").status(), StatusCode::NOT_FOUND);
}

#[test]
fn error_display_test() {
    let err = address_not_found_error("Atlantis");
    assert!(err.to_string().contains("Atlantis"));
    assert!(err.to_string().contains("102"));
}
