//! Tipos e estruturas de dados

use chrono::{DateTime, Local, Utc};

use crate::format::{price_with_suffix, to_fixed};

/// Lado do trade, derivado do flag `m` (buyer is maker) da Binance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// `m == false` → compra, `m == true` → venda.
    pub fn from_maker_flag(is_buyer_maker: bool) -> Self {
        if is_buyer_maker {
            Side::Sell
        } else {
            Side::Buy
        }
    }

    /// Rótulo exibido na tabela de ordens.
    pub fn label(self) -> &'static str {
        match self {
            Side::Buy => "Compra",
            Side::Sell => "Venda",
        }
    }
}

/// Trade decodificado de uma mensagem do WebSocket.
///
/// Efêmero: existe apenas enquanto o estado de exibição é derivado dele.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeEvent {
    pub price: f64,
    pub volume: f64,
    pub timestamp: DateTime<Utc>, // Horário do trade (campo "T")
    pub is_buyer_maker: bool,
}

impl TradeEvent {
    pub fn side(&self) -> Side {
        Side::from_maker_flag(self.is_buyer_maker)
    }

    /// Timestamp em milissegundos desde a época (eixo X do gráfico).
    pub fn timestamp_ms(&self) -> i64 {
        self.timestamp.timestamp_millis()
    }

    /// Hora local do trade, formato `HH:MM:SS`.
    pub fn local_time(&self) -> String {
        self.timestamp
            .with_timezone(&Local)
            .format("%H:%M:%S")
            .to_string()
    }
}

/// Linha já formatada da tabela de ordens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRow {
    pub side: Side,
    pub time: String,
    pub price: String,
    pub volume: String,
}

impl LogRow {
    pub fn from_trade(trade: &TradeEvent, quote_suffix: &str) -> Self {
        Self {
            side: trade.side(),
            time: trade.local_time(),
            price: price_with_suffix(trade.price, quote_suffix),
            volume: to_fixed(trade.volume, 6),
        }
    }

    /// Células na ordem da tabela: lado, hora, preço, volume.
    pub fn cells(&self) -> [&str; 4] {
        [self.side.label(), &self.time, &self.price, &self.volume]
    }
}
