use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// O pipeline de filtros nunca gera erro; tudo aqui vem da API ou do banco.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Posição {0} não encontrada")]
    PositionNotFound(i32),

    #[error("Produto {0} não encontrado")]
    ProductNotFound(i32),

    #[error("A posição {row}{slot} já existe")]
    PositionAlreadyExists { row: String, slot: i32 },

    #[error("A posição {0} está desabilitada")]
    PositionDisabled(i32),

    #[error("A posição {0} ainda possui produtos")]
    PositionNotEmpty(i32),

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
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
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            ref e @ (AppError::PositionNotFound(_) | AppError::ProductNotFound(_)) => {
                (StatusCode::NOT_FOUND, e.to_string())
            }
            ref e @ (AppError::PositionAlreadyExists { .. }
            | AppError::PositionDisabled(_)
            | AppError::PositionNotEmpty(_)) => (StatusCode::CONFLICT, e.to_string()),

            // DatabaseError e InternalServerError viram 500.
            // O detalhe vai para o log, nunca para o cliente.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocorreu um erro inesperado.".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_domain_errors_to_status_codes() {
        assert_eq!(
            AppError::PositionNotFound(7).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::ProductNotFound(7).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::PositionNotEmpty(3).into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::PositionAlreadyExists { row: "S".into(), slot: 14 }
                .into_response()
                .status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::InternalServerError(anyhow::anyhow!("boom"))
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn validation_errors_are_bad_request() {
        let errors = validator::ValidationErrors::new();
        assert_eq!(
            AppError::ValidationError(errors).into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn messages_name_the_position() {
        let err = AppError::PositionAlreadyExists { row: "S".into(), slot: 14 };
        assert_eq!(err.to_string(), "A posição S14 já existe");
    }
}
