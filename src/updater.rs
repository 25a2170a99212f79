//! Atualização do Estado de Exibição
//!
//! Um único dono para todo o estado mutável: histórico, tabela, rótulo de
//! preço e controle de redesenho. Cada trade é processado até o fim antes do
//! próximo, então nada aqui precisa de lock.

use std::time::Instant;

use tracing::{debug, trace};

use crate::chart::{render_chart, ChartScene, LineSink};
use crate::config::{ChartLayout, Config};
use crate::format::price_with_suffix;
use crate::history::PriceHistory;
use crate::log_table::{push_row, RowSink, VisibleLog};
use crate::throttle::RedrawThrottle;
use crate::types::{LogRow, TradeEvent};

pub struct DisplayUpdater<R = VisibleLog, L = ChartScene> {
    history: PriceHistory,
    rows: R,
    chart: L,
    label: Option<String>,
    throttle: RedrawThrottle,
    layout: ChartLayout,
    quote_suffix: String,
    max_log_rows: usize,
    trades_seen: u64,
}

impl DisplayUpdater {
    /// Estado vazio com a tabela e o gráfico em memória.
    pub fn new(config: &Config, started_at: Instant) -> Self {
        Self::with_sinks(config, started_at, VisibleLog::new(), ChartScene::new())
    }
}

impl<R: RowSink, L: LineSink> DisplayUpdater<R, L> {
    pub fn with_sinks(config: &Config, started_at: Instant, rows: R, chart: L) -> Self {
        Self {
            history: PriceHistory::with_capacity(config.max_data_points),
            rows,
            chart,
            label: None,
            throttle: RedrawThrottle::new(config.redraw_interval, started_at),
            layout: config.chart.clone(),
            quote_suffix: config.quote_suffix.clone(),
            max_log_rows: config.max_log_rows,
            trades_seen: 0,
        }
    }

    /// Aplica um trade: rótulo, histórico, tabela e, se já for hora, o gráfico.
    ///
    /// # Retorno
    /// `true` se o gráfico foi redesenhado neste trade.
    pub fn on_trade(&mut self, trade: &TradeEvent, now: Instant) -> bool {
        self.trades_seen += 1;

        // PASSO 1: rótulo do preço atual
        self.label = Some(format!(
            "Preço Atual: {}",
            price_with_suffix(trade.price, &self.quote_suffix)
        ));

        // PASSO 2: preço e timestamp entram juntos no histórico
        self.history.push(trade.timestamp_ms(), trade.price);

        // PASSO 3 e 4: nova linha no topo da tabela
        let row = LogRow::from_trade(trade, &self.quote_suffix);
        trace!(side = row.side.label(), price = %row.price, volume = %row.volume, "nova linha");
        push_row(&mut self.rows, row, self.max_log_rows);

        // PASSO 5: gráfico em intervalos controlados
        if self.throttle.try_fire(now) {
            let drawn = render_chart(&self.history, &self.layout, &self.quote_suffix, &mut self.chart);
            debug!(points = self.history.len(), drawn, "gráfico redesenhado");
            drawn
        } else {
            false
        }
    }

    /// Texto do rótulo; `None` até o primeiro trade.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn rows(&self) -> &R {
        &self.rows
    }

    pub fn chart(&self) -> &L {
        &self.chart
    }

    pub fn history(&self) -> &PriceHistory {
        &self.history
    }

    pub fn layout(&self) -> &ChartLayout {
        &self.layout
    }

    pub fn trades_seen(&self) -> u64 {
        self.trades_seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Side;
    use chrono::{TimeZone, Utc};
    use std::time::Duration;

    const T0: i64 = 1_700_000_000_000;

    fn trade(ts: i64, price: f64, m: bool) -> TradeEvent {
        TradeEvent {
            price,
            volume: 0.5,
            timestamp: Utc.timestamp_millis_opt(ts).unwrap(),
            is_buyer_maker: m,
        }
    }

    #[test]
    fn label_and_rows_update_on_every_trade() {
        let start = Instant::now();
        let mut updater = DisplayUpdater::new(&Config::default(), start);
        assert_eq!(updater.label(), None);

        updater.on_trade(&trade(T0, 100.0, false), start);
        updater.on_trade(&trade(T0 + 1, 99.456, true), start);

        assert_eq!(updater.label(), Some("Preço Atual: 99.46 USDT"));
        assert_eq!(updater.rows().len(), 2);
        let top = updater.rows().top().unwrap();
        assert_eq!(top.side, Side::Sell);
        assert_eq!(top.price, "99.46 USDT");
        assert_eq!(top.volume, "0.500000");
        assert_eq!(updater.history().len(), 2);
        assert_eq!(updater.trades_seen(), 2);
    }

    #[test]
    fn label_and_marker_round_exact_ties_up() {
        let start = Instant::now();
        let mut updater = DisplayUpdater::new(&Config::default(), start);
        assert!(updater.on_trade(&trade(T0, 101.125, false), start + Duration::from_secs(1)));

        assert_eq!(updater.label(), Some("Preço Atual: 101.13 USDT"));
        assert_eq!(updater.chart().marker.as_ref().unwrap().text, "101.13 USDT");
    }

    #[test]
    fn first_redraw_waits_for_interval() {
        let start = Instant::now();
        let mut updater = DisplayUpdater::new(&Config::default(), start);

        assert!(!updater.on_trade(&trade(T0, 100.0, false), start + Duration::from_millis(10)));
        assert!(updater.chart().is_blank());

        assert!(updater.on_trade(&trade(T0 + 1_000, 101.0, false), start + Duration::from_millis(1000)));
        assert_eq!(updater.chart().redraws, 1);
        assert_eq!(updater.chart().line.len(), 2);
    }

    #[test]
    fn log_and_history_stay_bounded() {
        let start = Instant::now();
        let config = Config::default();
        let mut updater = DisplayUpdater::new(&config, start);
        for i in 0..200 {
            updater.on_trade(&trade(T0 + i, 100.0 + i as f64, i % 2 == 0), start);
        }
        assert_eq!(updater.rows().len(), config.max_log_rows);
        assert_eq!(updater.history().len(), config.max_data_points);
        assert_eq!(updater.rows().top().unwrap().price, "299.00 USDT");
    }
}
