//! Ticker de Preço - Binance WebSocket Trades
//!
//! Conecta ao WebSocket da Binance, recebe trades de BTC/USDT em tempo real e
//! mostra o preço atual, um gráfico dos últimos pontos e as últimas ordens.
//!
//! Uso:
//!   ./target/release/btc-ticker
//!   FEED_URL=wss://stream.binance.com:9443/ws/btcusdt@trade ./target/release/btc-ticker
//!   TICKER_TUI=0 RUST_LOG=debug ./target/release/btc-ticker

use std::io;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc::{self, error::TryRecvError};
use tracing::info;

use btc_ticker::feed::{forward_trades, BinanceFeed};
use btc_ticker::log_table::RowSink;
use btc_ticker::{telemetry, tui, Config, DisplayUpdater, TradeEvent};

/// Trades em trânsito entre o feed e a tela.
const CHANNEL_CAPACITY: usize = 1024;

/// Espera por teclado a cada volta do loop da tela.
const INPUT_POLL: Duration = Duration::from_millis(10);

fn main() -> Result<()> {
    // ========================================================================
    // Configuração via Variáveis de Ambiente
    // ========================================================================

    let config = Config::from_env();

    // Logs no terminal corromperiam a tela alternativa
    if !config.tui {
        telemetry::init_tracing("info");
    }

    let runtime = tokio::runtime::Runtime::new().context("erro ao criar runtime tokio")?;

    // ========================================================================
    // Conexão WebSocket
    // ========================================================================

    let feed = runtime
        .block_on(BinanceFeed::connect(&config.feed_url))
        .with_context(|| format!("erro ao conectar em {}", config.feed_url))?;

    let status = feed.url().to_string();

    // Produtor único (feed) → consumidor único (tela)
    let (tx, rx) = mpsc::channel::<TradeEvent>(CHANNEL_CAPACITY);
    runtime.spawn(forward_trades(feed, tx));

    let mut app = DisplayUpdater::new(&config, Instant::now());

    let result = if config.tui {
        run_tui(&mut app, rx, &status)
    } else {
        runtime.block_on(run_headless(&mut app, rx))
    };

    // A leitura do socket pode estar parada para sempre; não espera por ela.
    runtime.shutdown_background();
    result
}

// ============================================================================
// Modo Tela (TUI)
// ============================================================================

fn run_tui(app: &mut DisplayUpdater, rx: mpsc::Receiver<TradeEvent>, status: &str) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = tui_loop(&mut terminal, app, rx, status);

    // Restaura o terminal mesmo se o loop falhou
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn tui_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut DisplayUpdater,
    mut rx: mpsc::Receiver<TradeEvent>,
    status: &str,
) -> Result<()> {
    loop {
        // Processa tudo que chegou, um trade por vez.
        // Feed encerrado: a tela simplesmente para de mudar.
        loop {
            match rx.try_recv() {
                Ok(trade) => {
                    app.on_trade(&trade, Instant::now());
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }

        terminal.draw(|frame| tui::draw(frame, app, status))?;

        if event::poll(INPUT_POLL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press
                    && matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
                {
                    return Ok(());
                }
            }
        }
    }
}

// ============================================================================
// Modo Sem Tela
// ============================================================================

async fn run_headless(app: &mut DisplayUpdater, mut rx: mpsc::Receiver<TradeEvent>) -> Result<()> {
    info!("modo sem tela, Ctrl+C para sair");

    loop {
        tokio::select! {
            next = rx.recv() => {
                let Some(trade) = next else {
                    // Sem reconexão: apenas espera o Ctrl+C.
                    tokio::signal::ctrl_c().await?;
                    break;
                };
                let redrawn = app.on_trade(&trade, Instant::now());

                if let (Some(label), Some(row)) = (app.label(), app.rows().top()) {
                    info!(
                        side = row.side.label(),
                        time = %row.time,
                        price = %row.price,
                        volume = %row.volume,
                        rows = app.rows().row_count(),
                        "{}",
                        label
                    );
                }
                if redrawn {
                    if let Some(marker) = &app.chart().marker {
                        info!(points = app.history().len(), marker = %marker.text, "gráfico atualizado");
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    info!(trades = app.trades_seen(), "finalizado");
    Ok(())
}
