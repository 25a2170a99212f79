//! Extração de Dados do JSON

use chrono::DateTime;
use serde::Deserialize;

use crate::error::DecodeError;
use crate::types::TradeEvent;

/// Payload bruto do stream `<symbol>@trade` da Binance.
///
/// Somente os campos usados pelo ticker; o resto (`e`, `E`, `s`, `t`, ...) é ignorado.
#[derive(Debug, Deserialize)]
struct RawTrade {
    #[serde(rename = "p")]
    price: String,
    #[serde(rename = "q")]
    quantity: String,
    #[serde(rename = "T")]
    trade_time: i64,
    #[serde(rename = "m")]
    is_buyer_maker: bool,
}

/// Decodifica uma mensagem de texto do WebSocket em um [`TradeEvent`].
///
/// # Argumentos
/// * `text` - String JSON da mensagem do WebSocket
///
/// # Retorno
/// O trade decodificado, ou o erro que fez a mensagem ser descartada.
pub fn decode_trade(text: &str) -> Result<TradeEvent, DecodeError> {
    let raw: RawTrade = serde_json::from_str(text)?;

    let price = parse_decimal("p", &raw.price)?;
    let volume = parse_decimal("q", &raw.quantity)?;
    let timestamp = DateTime::from_timestamp_millis(raw.trade_time)
        .ok_or(DecodeError::InvalidTimestamp(raw.trade_time))?;

    Ok(TradeEvent {
        price,
        volume,
        timestamp,
        is_buyer_maker: raw.is_buyer_maker,
    })
}

fn parse_decimal(field: &'static str, value: &str) -> Result<f64, DecodeError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| DecodeError::InvalidNumber {
            field,
            value: value.to_string(),
        })
}
