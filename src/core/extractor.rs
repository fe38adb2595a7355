use axum::{
    body::Body,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::JsonRejection,
        FromRequest, Request,
    },
    http::StatusCode,
    Json,
};
use serde::de::DeserializeOwned;

use crate::core::error::AppError;

/// Custom JSON extractor that provides consistent error responses
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(value) => Ok(Self(value.0)),
            Err(rejection) => Err(json_rejection(rejection)),
        }
    }
}

fn json_rejection(rejection: JsonRejection) -> AppError {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            AppError::BadRequest(format!("Invalid JSON data: {}", err))
        }
        JsonRejection::JsonSyntaxError(err) => {
            AppError::BadRequest(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(err) => {
            AppError::UnsupportedMediaType(format!("Missing JSON content type: {}", err))
        }
        JsonRejection::BytesRejection(err) if err.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            AppError::PayloadTooLarge(err.body_text())
        }
        _ => AppError::BadRequest("Failed to parse JSON body".to_string()),
    }
}

pub fn multipart_rejection(rejection: MultipartRejection) -> AppError {
    AppError::BadRequest(format!("Invalid multipart body: {}", rejection.body_text()))
}

pub fn multipart_error(error: MultipartError) -> AppError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(error.body_text())
    } else {
        AppError::BadRequest(format!("Failed to read multipart data: {}", error.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Multipart;
    use axum::http::header;

    #[tokio::test]
    async fn test_multipart_without_boundary_is_bad_request() {
        let req = Request::builder()
            .method("POST")
            .uri("/api/reports")
            .header(header::CONTENT_TYPE, "multipart/form-data")
            .body(Body::from("--x\r\n"))
            .unwrap();

        let rejection = Multipart::from_request(req, &()).await.err().unwrap();
        assert!(matches!(
            multipart_rejection(rejection),
            AppError::BadRequest(_)
        ));
    }

    #[tokio::test]
    async fn test_truncated_multipart_is_bad_request() {
        let req = Request::builder()
            .method("POST")
            .uri("/api/reports")
            .header(header::CONTENT_TYPE, "multipart/form-data; boundary=XYZ")
            .body(Body::from(
                "--XYZ\r\nContent-Disposition: form-data; name=\"description\"\r\n\r\nPothole",
            ))
            .unwrap();

        let mut multipart = Multipart::from_request(req, &()).await.unwrap();
        let error = match multipart.next_field().await {
            Ok(Some(field)) => field.text().await.err().unwrap(),
            Ok(None) => panic!("expected a field"),
            Err(e) => e,
        };
        assert!(matches!(multipart_error(error), AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_json_without_content_type_is_unsupported() {
        let req = Request::builder()
            .method("POST")
            .uri("/api/reports")
            .body(Body::from("{}"))
            .unwrap();

        let result = AppJson::<serde_json::Value>::from_request(req, &()).await;
        assert!(matches!(result, Err(AppError::UnsupportedMediaType(_))));
    }
}
