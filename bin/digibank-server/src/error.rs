use std::borrow::Cow;

use axum::{
    Json,
    extract::{FromRequest, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use digibank_engine::{DigibankEngineError, request::RequestError};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub(crate) enum AppError {
    #[error(transparent)]
    Engine(Box<DigibankEngineError>),

    #[error(transparent)]
    Request(#[from] RequestError),

    #[error("{0}")]
    Unauthenticated(Cow<'static, str>),

    #[error("{0}")]
    InvalidInput(Cow<'static, str>),

    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    pub fn unauthenticated<E>(err: E) -> Self
    where
        Cow<'static, str>: From<E>,
    {
        Self::Unauthenticated(err.into())
    }

    pub fn invalid_input<E>(err: E) -> Self
    where
        Cow<'static, str>: From<E>,
    {
        Self::InvalidInput(err.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Engine(err) => match err.as_ref() {
                DigibankEngineError::Account(_)
                | DigibankEngineError::Request(_)
                | DigibankEngineError::InvalidInput(_)
                | DigibankEngineError::DuplicateEmail
                | DigibankEngineError::DuplicateNationalId => StatusCode::BAD_REQUEST,
                DigibankEngineError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                DigibankEngineError::Unauthorized => StatusCode::FORBIDDEN,
                DigibankEngineError::AccountNotFound | DigibankEngineError::ClientNotFound => {
                    StatusCode::NOT_FOUND
                },
                DigibankEngineError::CompensationFailed(_)
                | DigibankEngineError::Store(_)
                | DigibankEngineError::Credential(_)
                | DigibankEngineError::Join(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::Request(_) | AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::Token(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DigibankEngineError> for AppError {
    fn from(err: DigibankEngineError) -> Self {
        Self::Engine(err.into())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidInput(rejection.body_text().into())
    }
}

#[derive(Serialize)]
struct ErrorPayload {
    message: Cow<'static, str>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.status_code();

        let message = if code.is_server_error() {
            tracing::error!("server error: {self}");
            Cow::Borrowed("internal server error")
        } else {
            if code == StatusCode::NOT_FOUND {
                tracing::info!("not found: {self}");
            } else {
                tracing::warn!("client error: {self}");
            }
            Cow::Owned(self.to_string())
        };

        (code, Json(ErrorPayload { message })).into_response()
    }
}

/// [`Json`] extractor reporting malformed bodies as an [`AppError`].
#[derive(FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub(crate) struct AppJson<T>(pub(crate) T);
