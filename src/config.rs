//! Configuração
//!
//! Constantes fixas na inicialização. Apenas o endpoint e o modo de exibição
//! podem ser trocados via variáveis de ambiente:
//!
//!   FEED_URL=wss://stream.binance.com:9443/ws/btcusdt@trade ./target/release/btc-ticker
//!   TICKER_TUI=0 RUST_LOG=debug ./target/release/btc-ticker

use std::time::Duration;

pub const DEFAULT_FEED_URL: &str = "wss://testnet.binance.vision/ws/btcusdt@trade";
pub const DEFAULT_MAX_DATA_POINTS: usize = 60;
pub const DEFAULT_MAX_LOG_ROWS: usize = 10;
pub const DEFAULT_REDRAW_INTERVAL: Duration = Duration::from_millis(1000);
pub const QUOTE_SUFFIX: &str = "USDT";

/// Margens internas do gráfico, em pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// Dimensões e estilo do gráfico.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    pub width: f64,
    pub height: f64,
    pub margin: Margin,
    pub line_color: String,
    pub line_width: f64,
    /// Espaço adicional no eixo Y, em unidades de preço.
    pub y_padding: f64,
    /// Deslocamento do texto do marcador em relação ao ponto.
    pub marker_offset: f64,
    pub marker_radius: f64,
}

impl ChartLayout {
    pub fn inner_width(&self) -> f64 {
        self.width - self.margin.left - self.margin.right
    }

    pub fn inner_height(&self) -> f64 {
        self.height - self.margin.top - self.margin.bottom
    }
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 400.0,
            margin: Margin {
                top: 20.0,
                right: 60.0,
                bottom: 30.0,
                left: 50.0,
            },
            line_color: "blue".to_string(),
            line_width: 2.0,
            y_padding: 100.0,
            marker_offset: 5.0,
            marker_radius: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub feed_url: String,
    pub max_data_points: usize,
    pub max_log_rows: usize,
    pub redraw_interval: Duration,
    pub quote_suffix: String,
    pub chart: ChartLayout,
    /// `false` = modo sem tela: cada trade vira uma linha de log.
    pub tui: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            max_data_points: DEFAULT_MAX_DATA_POINTS,
            max_log_rows: DEFAULT_MAX_LOG_ROWS,
            redraw_interval: DEFAULT_REDRAW_INTERVAL,
            quote_suffix: QUOTE_SUFFIX.to_string(),
            chart: ChartLayout::default(),
            tui: true,
        }
    }
}

impl Config {
    /// Lê as variáveis de ambiente do processo.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Aplica os overrides encontrados por `lookup` sobre os valores padrão.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("FEED_URL").filter(|u| !u.trim().is_empty()) {
            config.feed_url = url.trim().to_string();
        }
        config.tui = lookup("TICKER_TUI").map_or(true, |v| v.trim() != "0");

        config
    }
}
