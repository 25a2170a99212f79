//! Controle de Atualização do Gráfico

use std::time::{Duration, Instant};

/// Garante um intervalo mínimo entre redesenhos, medido em relógio monotônico.
///
/// O relógio começa na criação: o primeiro redesenho só acontece depois de
/// `interval` desde a inicialização.
#[derive(Debug, Clone)]
pub struct RedrawThrottle {
    interval: Duration,
    last: Instant,
}

impl RedrawThrottle {
    pub fn new(interval: Duration, started_at: Instant) -> Self {
        Self {
            interval,
            last: started_at,
        }
    }

    /// `true` se já passou `interval` desde o último redesenho; nesse caso
    /// `now` passa a ser o novo marco.
    pub fn try_fire(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last) >= self.interval {
            self.last = now;
            true
        } else {
            false
        }
    }

    pub fn last_fired(&self) -> Instant {
        self.last
    }
}
