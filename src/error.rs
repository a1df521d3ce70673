use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// Cadastro com e-mail já existente. As rotas de página convertem
    /// este erro em flash + redirect; nunca chega ao IntoResponse.
    #[error("Email já existe.")]
    DuplicateEmail,
    /// E-mail desconhecido ou senha incorreta.
    #[error("Login inválido.")]
    InvalidCredentials,
    /// Sessão ausente ou inválida na rota de API.
    #[error("Unauthorized")]
    Unauthenticated,
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("Erro de banco de dados")]
    Sqlx(#[from] sqlx::Error),
    #[error("Erro interno")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::DuplicateEmail | AppError::Validation(_) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            AppError::InvalidCredentials | AppError::Unauthenticated => {
                (StatusCode::UNAUTHORIZED, self.to_string())
            }
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::Sqlx(ref e) => {
                tracing::error!("erro de banco de dados: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            AppError::Internal(ref msg) => {
                tracing::error!("erro interno: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
