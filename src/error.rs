//! Erros da biblioteca

use thiserror::Error;

/// Falha ao decodificar uma mensagem de trade.
///
/// A mensagem é descartada; o estado anterior permanece intacto.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("JSON inválido: {0}")]
    Json(#[from] serde_json::Error),

    #[error("campo `{field}` não é um número: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("timestamp fora do intervalo: {0}")]
    InvalidTimestamp(i64),
}

/// Falha ao abrir a conexão com o feed.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("erro ao conectar em {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: tokio_tungstenite::tungstenite::Error,
    },
}
