//! Gráfico de Linha do Preço
//!
//! O desenho é uma função pura do histórico + layout: calcula as escalas, o
//! traçado e o marcador, e entrega tudo a um [`LineSink`]. A tela do terminal
//! pinta o [`ChartScene`] resultante; os testes inspecionam o mesmo objeto.

use chrono::{DateTime, Local};

use crate::config::ChartLayout;
use crate::format::price_with_suffix;
use crate::history::PriceHistory;

/// Número de marcas pedido a cada eixo.
pub const AXIS_TICKS: usize = 6;

// ============================================================================
// Escalas
// ============================================================================

/// Escala linear `domínio → pixels`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Domínio degenerado (d0 == d1) cai no meio do range.
    pub fn map(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        let t = if span == 0.0 { 0.5 } else { (value - d0) / span };
        r0 + t * (r1 - r0)
    }

    /// Marcas "redondas" (passo 1, 2 ou 5 × 10^k) dentro do domínio.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        self.ticks_with_min_step(count, 0.0)
    }

    fn ticks_with_min_step(&self, count: usize, min_step: f64) -> Vec<f64> {
        let (lo, hi) = ordered(self.domain);
        if lo == hi {
            return vec![lo];
        }
        let Some(step) = tick_step(lo, hi, count).map(|s| s.max(min_step)) else {
            return Vec::new();
        };
        let start = (lo / step).ceil() as i64;
        let stop = (hi / step).floor() as i64;
        (start..=stop).map(|i| i as f64 * step).collect()
    }

    /// Texto de uma marca com as casas decimais que o passo exige.
    pub fn tick_label(&self, value: f64, count: usize) -> String {
        let (lo, hi) = ordered(self.domain);
        let decimals = tick_step(lo, hi, count)
            .map(|step| (-step.log10().floor()).max(0.0) as usize)
            .unwrap_or(0);
        format!("{:.*}", decimals, value)
    }
}

/// Escala de tempo: timestamps em ms mapeados linearmente.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    inner: LinearScale,
}

impl TimeScale {
    pub fn new(domain_ms: (i64, i64), range: (f64, f64)) -> Self {
        Self {
            inner: LinearScale::new((domain_ms.0 as f64, domain_ms.1 as f64), range),
        }
    }

    pub fn domain_ms(&self) -> (i64, i64) {
        let (d0, d1) = self.inner.domain();
        (d0 as i64, d1 as i64)
    }

    pub fn range(&self) -> (f64, f64) {
        self.inner.range()
    }

    pub fn map(&self, timestamp_ms: i64) -> f64 {
        self.inner.map(timestamp_ms as f64)
    }

    /// Passo mínimo de 1 ms: timestamps são inteiros.
    pub fn ticks(&self, count: usize) -> Vec<i64> {
        self.inner
            .ticks_with_min_step(count, 1.0)
            .into_iter()
            .map(|t| t as i64)
            .collect()
    }

    /// `HH:MM:SS` no fuso local.
    pub fn tick_label(timestamp_ms: i64) -> String {
        DateTime::from_timestamp_millis(timestamp_ms)
            .map(|t| t.with_timezone(&Local).format("%H:%M:%S").to_string())
            .unwrap_or_default()
    }
}

fn ordered((a, b): (f64, f64)) -> (f64, f64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

fn tick_step(lo: f64, hi: f64, count: usize) -> Option<f64> {
    let span = hi - lo;
    if count == 0 || !span.is_finite() || span <= 0.0 {
        return None;
    }
    let raw = span / count as f64;
    let power = 10f64.powf(raw.log10().floor());
    let error = raw / power;
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    Some(factor * power)
}

// ============================================================================
// Destino do desenho
// ============================================================================

/// Ponto do último preço + texto deslocado para legibilidade.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub cx: f64,
    pub cy: f64,
    pub radius: f64,
    pub text_x: f64,
    pub text_y: f64,
    pub text: String,
}

/// Superfície onde o gráfico é desenhado.
///
/// Coordenadas em pixels da área interna: x cresce para a direita, y para baixo.
pub trait LineSink {
    fn draw_line(&mut self, points: &[(f64, f64)], color: &str, width: f64);

    fn draw_axes(&mut self, x: &TimeScale, y: &LinearScale);

    fn place_marker(&mut self, marker: Marker);
}

/// Último quadro desenhado, guardado em memória.
#[derive(Debug, Clone, Default)]
pub struct ChartScene {
    pub line: Vec<(f64, f64)>,
    pub line_color: String,
    pub line_width: f64,
    pub x_scale: Option<TimeScale>,
    pub y_scale: Option<LinearScale>,
    pub marker: Option<Marker>,
    /// Quantas vezes o traçado foi redesenhado.
    pub redraws: u64,
}

impl ChartScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_blank(&self) -> bool {
        self.redraws == 0
    }

    /// Marcas do eixo X como `(pixel, texto)`.
    pub fn x_ticks(&self) -> Vec<(f64, String)> {
        self.x_scale
            .map(|scale| {
                scale
                    .ticks(AXIS_TICKS)
                    .into_iter()
                    .map(|t| (scale.map(t), TimeScale::tick_label(t)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Marcas do eixo Y como `(pixel, texto)`.
    pub fn y_ticks(&self) -> Vec<(f64, String)> {
        self.y_scale
            .map(|scale| {
                scale
                    .ticks(AXIS_TICKS)
                    .into_iter()
                    .map(|v| (scale.map(v), scale.tick_label(v, AXIS_TICKS)))
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl LineSink for ChartScene {
    fn draw_line(&mut self, points: &[(f64, f64)], color: &str, width: f64) {
        self.line.clear();
        self.line.extend_from_slice(points);
        self.line_color = color.to_string();
        self.line_width = width;
        self.redraws += 1;
    }

    fn draw_axes(&mut self, x: &TimeScale, y: &LinearScale) {
        self.x_scale = Some(*x);
        self.y_scale = Some(*y);
    }

    fn place_marker(&mut self, marker: Marker) {
        self.marker = Some(marker);
    }
}

// ============================================================================
// Renderização
// ============================================================================

/// Escalas do quadro atual, ou `None` com histórico vazio.
pub fn scales_for(history: &PriceHistory, layout: &ChartLayout) -> Option<(TimeScale, LinearScale)> {
    let (t_min, t_max) = history.time_extent()?;
    let (p_min, p_max) = history.price_extent()?;

    let x = TimeScale::new((t_min, t_max), (0.0, layout.inner_width()));
    let y = LinearScale::new(
        (p_min - layout.y_padding, p_max + layout.y_padding),
        (layout.inner_height(), 0.0),
    );
    Some((x, y))
}

/// Redesenha o gráfico a partir do histórico.
///
/// # Retorno
/// `false` (e nada é desenhado) se o histórico estiver vazio.
pub fn render_chart<S: LineSink + ?Sized>(
    history: &PriceHistory,
    layout: &ChartLayout,
    quote_suffix: &str,
    sink: &mut S,
) -> bool {
    if history.is_empty() {
        return false;
    }
    let (Some((x, y)), Some((last_ts, last_price))) =
        (scales_for(history, layout), history.latest())
    else {
        return false;
    };

    let points: Vec<(f64, f64)> = history
        .points()
        .map(|(ts, price)| (x.map(ts), y.map(price)))
        .collect();
    sink.draw_line(&points, &layout.line_color, layout.line_width);

    sink.draw_axes(&x, &y);

    let cx = x.map(last_ts);
    let cy = y.map(last_price);
    sink.place_marker(Marker {
        cx,
        cy,
        radius: layout.marker_radius,
        text_x: cx + layout.marker_offset,
        text_y: cy - layout.marker_offset,
        text: price_with_suffix(last_price, quote_suffix),
    });

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: i64 = 1_700_000_000_000;

    fn history_of(points: &[(i64, f64)]) -> PriceHistory {
        let mut history = PriceHistory::with_capacity(60);
        for (ts, price) in points {
            history.push(*ts, *price);
        }
        history
    }

    #[derive(Default)]
    struct CountingSink {
        calls: usize,
    }

    impl LineSink for CountingSink {
        fn draw_line(&mut self, _: &[(f64, f64)], _: &str, _: f64) {
            self.calls += 1;
        }
        fn draw_axes(&mut self, _: &TimeScale, _: &LinearScale) {
            self.calls += 1;
        }
        fn place_marker(&mut self, _: Marker) {
            self.calls += 1;
        }
    }

    #[test]
    fn empty_history_draws_nothing() {
        let history = PriceHistory::with_capacity(60);
        let mut sink = CountingSink::default();
        assert!(!render_chart(&history, &ChartLayout::default(), "USDT", &mut sink));
        assert_eq!(sink.calls, 0);
    }

    #[test]
    fn domains_and_marker_follow_history() {
        let layout = ChartLayout::default();
        let history = history_of(&[(T0, 100.0), (T0 + 1_000, 102.0), (T0 + 2_000, 98.0)]);
        let mut scene = ChartScene::new();

        assert!(render_chart(&history, &layout, "USDT", &mut scene));

        let x = scene.x_scale.unwrap();
        let y = scene.y_scale.unwrap();
        assert_eq!(x.domain_ms(), (T0, T0 + 2_000));
        assert_eq!(y.domain(), (98.0 - layout.y_padding, 102.0 + layout.y_padding));
        assert_eq!(y.range(), (layout.inner_height(), 0.0));

        let marker = scene.marker.unwrap();
        assert_eq!(marker.cx, x.map(T0 + 2_000));
        assert_eq!(marker.cy, y.map(98.0));
        assert_eq!(marker.cx, layout.inner_width());
        assert_eq!(marker.text_x, marker.cx + 5.0);
        assert_eq!(marker.text_y, marker.cy - 5.0);
        assert_eq!(marker.text, "98.00 USDT");

        assert_eq!(scene.line.len(), 3);
        assert_eq!(scene.line[0], (0.0, y.map(100.0)));
        assert_eq!(scene.line_color, "blue");
        assert_eq!(scene.redraws, 1);
    }

    #[test]
    fn redraw_is_idempotent() {
        let layout = ChartLayout::default();
        let history = history_of(&[(T0, 100.0), (T0 + 500, 101.0)]);
        let mut first = ChartScene::new();
        let mut second = ChartScene::new();
        render_chart(&history, &layout, "USDT", &mut first);
        render_chart(&history, &layout, "USDT", &mut second);
        render_chart(&history, &layout, "USDT", &mut second);

        assert_eq!(first.line, second.line);
        assert_eq!(first.marker, second.marker);
        assert_eq!(first.x_scale, second.x_scale);
        assert_eq!(first.y_scale, second.y_scale);
    }

    #[test]
    fn single_point_sits_mid_width() {
        let layout = ChartLayout::default();
        let history = history_of(&[(T0, 50_000.0)]);
        let mut scene = ChartScene::new();
        render_chart(&history, &layout, "USDT", &mut scene);

        let marker = scene.marker.unwrap();
        assert_eq!(marker.cx, layout.inner_width() / 2.0);
        assert_eq!(marker.cy, layout.inner_height() / 2.0);
    }

    #[test]
    fn y_scale_is_inverted() {
        let y = LinearScale::new((0.0, 100.0), (350.0, 0.0));
        assert_eq!(y.map(0.0), 350.0);
        assert_eq!(y.map(100.0), 0.0);
        assert_eq!(y.map(50.0), 175.0);
    }

    #[test]
    fn ticks_use_round_steps() {
        let y = LinearScale::new((-2.0, 202.0), (350.0, 0.0));
        assert_eq!(y.ticks(6), vec![0.0, 50.0, 100.0, 150.0, 200.0]);
        assert_eq!(y.tick_label(150.0, 6), "150");

        let fine = LinearScale::new((0.0, 1.0), (0.0, 1.0));
        assert_eq!(fine.tick_label(0.2, 5), "0.2");

        let x = TimeScale::new((T0, T0 + 10_000), (0.0, 1090.0));
        let ticks = x.ticks(5);
        assert_eq!(ticks.first(), Some(&T0));
        assert_eq!(ticks.last(), Some(&(T0 + 10_000)));
        assert_eq!(ticks.len(), 6);
    }

    #[test]
    fn time_ticks_never_go_below_one_ms() {
        let x = TimeScale::new((T0, T0 + 3), (0.0, 1090.0));
        assert_eq!(x.ticks(AXIS_TICKS), vec![T0, T0 + 1, T0 + 2, T0 + 3]);

        let x = TimeScale::new((T0, T0 + 5), (0.0, 1090.0));
        let ticks = x.ticks(AXIS_TICKS);
        let mut unique = ticks.clone();
        unique.dedup();
        assert_eq!(ticks, unique);
    }

    #[test]
    fn scene_exposes_labelled_ticks() {
        let layout = ChartLayout::default();
        let history = history_of(&[(T0, 100.0), (T0 + 5_000, 102.0)]);
        let mut scene = ChartScene::new();
        assert!(scene.x_ticks().is_empty());

        render_chart(&history, &layout, "USDT", &mut scene);
        let x_ticks = scene.x_ticks();
        assert!(!x_ticks.is_empty());
        assert!(x_ticks.iter().all(|(px, _)| (0.0..=layout.inner_width()).contains(px)));
        assert_eq!(x_ticks[0].1, TimeScale::tick_label(T0));
        assert!(!scene.y_ticks().is_empty());
    }
}
