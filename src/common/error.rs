// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// Cada variante mapeia para um status HTTP e um código legível por máquina.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Entrada inválida: {0}")]
    InvalidInput(String),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Violação de chave única: {0}")]
    UniqueConstraintViolation(String),

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Token expirado")]
    ExpiredToken,

    #[error("Token de redefinição inválido ou expirado")]
    InvalidOrExpiredResetToken,

    #[error("Acesso negado: {0}")]
    Forbidden(String),

    #[error("{0} não encontrado(a)")]
    NotFound(&'static str),

    #[error("Falha no upload: {0}")]
    UploadFailed(String),

    // Variante para erros de banco de dados (sqlx)
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    // `anyhow::Error` é ótimo para capturar o contexto do erro.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    // Reclassifica violações de unicidade vindas do Postgres em erros de
    // domínio (409), em vez de vazar o erro cru do banco.
    pub fn from_unique_violation(e: sqlx::Error) -> Self {
        if let Some(db_err) = e.as_database_error() {
            if db_err.is_unique_violation() {
                return match db_err.constraint() {
                    Some("users_email_key") => AppError::EmailAlreadyExists,
                    Some(constraint) => {
                        AppError::UniqueConstraintViolation(constraint.to_string())
                    }
                    None => AppError::UniqueConstraintViolation("registro duplicado".into()),
                };
            }
        }
        AppError::DatabaseError(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "success": false,
                    "error": {
                        "code": "VALIDATION_ERROR",
                        "message": "Um ou mais campos são inválidos.",
                        "details": details,
                    },
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::InvalidInput(reason) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", reason)
            }
            AppError::EmailAlreadyExists => (
                StatusCode::CONFLICT,
                "CONFLICT",
                "Este e-mail já está em uso.".to_string(),
            ),
            AppError::UniqueConstraintViolation(detail) => (
                StatusCode::CONFLICT,
                "CONFLICT",
                format!("Registro duplicado: {}.", detail),
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "E-mail ou senha inválidos.".to_string(),
            ),
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Token de autenticação inválido ou ausente.".to_string(),
            ),
            AppError::ExpiredToken => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Token de autenticação expirado.".to_string(),
            ),
            AppError::InvalidOrExpiredResetToken => (
                StatusCode::BAD_REQUEST,
                "INVALID_RESET_TOKEN",
                "Token de redefinição de senha inválido ou expirado.".to_string(),
            ),
            AppError::Forbidden(reason) => (StatusCode::FORBIDDEN, "FORBIDDEN", reason),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{} não encontrado(a).", resource),
            ),
            AppError::UploadFailed(reason) => (
                StatusCode::BAD_GATEWAY,
                "UPLOAD_ERROR",
                format!("Falha no serviço de armazenamento: {}.", reason),
            ),

            // Todos os outros erros (DatabaseError, InternalServerError...) viram 500.
            // O detalhe fica no log; o chamador recebe só a mensagem genérica.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_SERVER_ERROR",
                    "Ocorreu um erro inesperado.".to_string(),
                )
            }
        };

        let body = Json(json!({
            "success": false,
            "error": { "code": code, "message": error_message },
        }));
        (status, body).into_response()
    }
}
