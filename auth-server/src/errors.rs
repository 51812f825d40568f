use axum::{http::StatusCode, response::IntoResponse, Json};
use common::{models::ErrorResponse, AddressError, KeyError};
use std::net::AddrParseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("server error")]
    Server(#[from] std::io::Error),

    #[error("failed to parse address")]
    AddressParse(#[from] AddrParseError),

    #[error("invalid configuration: {0}")]
    Config(String),
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Signature not verified")]
    SignatureMismatch,
    #[error("Invalid session")]
    MalformedSession,
    #[error("Nonce already used")]
    NonceReplayed,
    #[error("{0} is empty")]
    EmptyField(&'static str),
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(#[from] KeyError),
    #[error("Invalid address: {0}")]
    InvalidAddress(#[from] AddressError),
    #[error("Address does not match public key")]
    AddressMismatch,
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Destination must differ from the source account")]
    SelfPayment,
    #[error("Token error")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error("Invalid cookie value")]
    InvalidCookie,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized | ApiError::MalformedSession | ApiError::NonceReplayed => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::SignatureMismatch
            | ApiError::EmptyField(_)
            | ApiError::InvalidPublicKey(_)
            | ApiError::InvalidAddress(_)
            | ApiError::AddressMismatch
            | ApiError::InvalidAmount(_)
            | ApiError::SelfPayment => StatusCode::BAD_REQUEST,
            ApiError::Token(_) | ApiError::InvalidCookie => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{:?}", self);
        }
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
