//! Tela do Terminal
//!
//! Cabeçalho com o preço atual, gráfico e tabela das últimas ordens.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Circle, Line as Segment},
        Block, Borders, Cell, Paragraph, Row, Table,
    },
    Frame,
};

use crate::chart::ChartScene;
use crate::config::ChartLayout;
use crate::types::Side;
use crate::updater::DisplayUpdater;

/// Desenha a tela inteira.
pub fn draw(frame: &mut Frame, app: &DisplayUpdater, status: &str) {
    let table_height = app.rows().len().max(1) as u16 + 3; // bordas + cabeçalho
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),            // Preço atual
            Constraint::Min(8),               // Gráfico
            Constraint::Length(table_height), // Ordens
            Constraint::Length(1),            // Rodapé
        ])
        .split(frame.area());

    draw_header(frame, app, chunks[0]);
    let title = format!(" Preço ({}/{}) ", app.history().len(), app.history().capacity());
    draw_chart(frame, app.chart(), app.layout(), &title, chunks[1]);
    draw_orders(frame, app, chunks[2]);
    draw_footer(frame, app, status, chunks[3]);
}

fn draw_header(frame: &mut Frame, app: &DisplayUpdater, area: Rect) {
    let text = app.label().unwrap_or("Aguardando trades...");
    let header = Paragraph::new(text)
        .style(Style::default().add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL).title(" BTC/USDT "));
    frame.render_widget(header, area);
}

fn draw_chart(frame: &mut Frame, scene: &ChartScene, layout: &ChartLayout, title: &str, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(title);
    if scene.is_blank() {
        frame.render_widget(Paragraph::new(" Sem dados no gráfico ainda.").block(block), area);
        return;
    }

    let inner_w = layout.inner_width();
    let inner_h = layout.inner_height();
    let line_color = scene.line_color.parse::<Color>().unwrap_or(Color::Blue);
    let x_ticks = scene.x_ticks();
    let y_ticks = scene.y_ticks();

    let canvas = Canvas::default()
        .block(block)
        .marker(symbols::Marker::Braille)
        .x_bounds([-layout.margin.left, inner_w + layout.margin.right])
        .y_bounds([-layout.margin.bottom, inner_h + layout.margin.top])
        .paint(move |ctx| {
            // Eixos
            ctx.draw(&Segment::new(0.0, 0.0, inner_w, 0.0, Color::DarkGray));
            ctx.draw(&Segment::new(0.0, 0.0, 0.0, inner_h, Color::DarkGray));
            for (px, label) in &x_ticks {
                ctx.print(*px, -layout.margin.bottom, label.clone());
            }
            for (py, label) in &y_ticks {
                ctx.print(-layout.margin.left, to_canvas_y(*py, inner_h), label.clone());
            }

            // Traçado
            for pair in scene.line.windows(2) {
                let (x1, y1) = pair[0];
                let (x2, y2) = pair[1];
                ctx.draw(&Segment::new(
                    x1,
                    to_canvas_y(y1, inner_h),
                    x2,
                    to_canvas_y(y2, inner_h),
                    line_color,
                ));
            }

            // Marcador do último preço
            if let Some(marker) = &scene.marker {
                ctx.draw(&Circle {
                    x: marker.cx,
                    y: to_canvas_y(marker.cy, inner_h),
                    radius: marker.radius,
                    color: Color::Red,
                });
                ctx.print(
                    marker.text_x,
                    to_canvas_y(marker.text_y, inner_h),
                    Span::styled(marker.text.clone(), Style::default().add_modifier(Modifier::BOLD)),
                );
            }
        });

    frame.render_widget(canvas, area);
}

fn draw_orders(frame: &mut Frame, app: &DisplayUpdater, area: Rect) {
    let header = Row::new(vec!["Lado", "Hora", "Preço", "Volume"])
        .style(Style::default().add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = app
        .rows()
        .rows()
        .map(|row| {
            let color = match row.side {
                Side::Buy => Color::Green,
                Side::Sell => Color::Red,
            };
            Row::new(row.cells().map(|c| Cell::from(c.to_string()))).style(Style::default().fg(color))
        })
        .collect();

    let widths = [
        Constraint::Length(8),
        Constraint::Length(10),
        Constraint::Length(18),
        Constraint::Length(12),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(" Últimas ordens "));
    frame.render_widget(table, area);
}

fn draw_footer(frame: &mut Frame, app: &DisplayUpdater, status: &str, area: Rect) {
    let text = Line::from(vec![
        Span::raw(format!(" {} | trades: {} | ", status, app.trades_seen())),
        Span::styled("q=sair", Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(text), area);
}

/// Pixels crescem para baixo; o canvas cresce para cima.
fn to_canvas_y(pixel_y: f64, inner_height: f64) -> f64 {
    inner_height - pixel_y
}
