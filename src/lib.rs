//! Ticker de Preço em Tempo Real - Binance WebSocket Trades
//!
//! Recebe os trades de BTC/USDT, guarda uma janela limitada de preços,
//! desenha o gráfico e mostra as últimas ordens numa tabela.
//!
//! Fluxo: feed (task tokio) → canal → [`updater::DisplayUpdater`] (dono único
//! do estado) → gráfico, no máximo uma vez por intervalo.

pub mod chart;
pub mod config;
pub mod error;
pub mod extract;
pub mod feed;
pub mod format;
pub mod history;
pub mod log_table;
pub mod telemetry;
pub mod throttle;
pub mod tui;
pub mod types;
pub mod updater;

pub use config::Config;
pub use error::{DecodeError, FeedError};
pub use types::{LogRow, Side, TradeEvent};
pub use updater::DisplayUpdater;
