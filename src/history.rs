//! Buffers de Histórico com Capacidade Fixa

use std::collections::VecDeque;

/// Sequência FIFO de capacidade fixa: ao passar do limite, descarta o mais antigo.
///
/// O espaço é pré-alocado na criação, então `push` nunca realoca.
#[derive(Debug, Clone)]
pub struct BoundedBuffer<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedBuffer<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Adiciona no fim; se o tamanho passar da capacidade, remove o primeiro.
    ///
    /// # Retorno
    /// O elemento descartado, se houve descarte.
    pub fn push(&mut self, value: T) -> Option<T> {
        self.items.push_back(value);
        if self.items.len() > self.capacity {
            self.items.pop_front()
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator + '_ {
        self.items.iter()
    }

    pub fn first(&self) -> Option<&T> {
        self.items.front()
    }

    pub fn last(&self) -> Option<&T> {
        self.items.back()
    }
}

impl<T: Clone> BoundedBuffer<T> {
    pub fn to_vec(&self) -> Vec<T> {
        self.items.iter().cloned().collect()
    }
}

/// Histórico de preços e timestamps, alinhados por índice.
///
/// A única forma de escrever é [`PriceHistory::push`], que grava o par nos dois
/// buffers no mesmo passo. Assim a entrada `i` de ambos descreve o mesmo trade.
#[derive(Debug, Clone)]
pub struct PriceHistory {
    prices: BoundedBuffer<f64>,
    timestamps: BoundedBuffer<i64>, // ms desde a época
}

impl PriceHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            prices: BoundedBuffer::with_capacity(capacity),
            timestamps: BoundedBuffer::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, timestamp_ms: i64, price: f64) {
        self.prices.push(price);
        self.timestamps.push(timestamp_ms);
    }

    pub fn prices(&self) -> &BoundedBuffer<f64> {
        &self.prices
    }

    pub fn timestamps(&self) -> &BoundedBuffer<i64> {
        &self.timestamps
    }

    /// Pares `(timestamp_ms, preço)` na ordem de chegada.
    pub fn points(&self) -> impl Iterator<Item = (i64, f64)> + '_ {
        self.timestamps.iter().copied().zip(self.prices.iter().copied())
    }

    /// Ponto mais recente.
    pub fn latest(&self) -> Option<(i64, f64)> {
        Some((*self.timestamps.last()?, *self.prices.last()?))
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    /// Vazio se qualquer um dos buffers estiver vazio.
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty() || self.timestamps.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.prices.capacity()
    }

    /// `(mínimo, máximo)` dos preços retidos.
    pub fn price_extent(&self) -> Option<(f64, f64)> {
        let mut iter = self.prices.iter().copied();
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
    }

    /// `(mínimo, máximo)` dos timestamps retidos.
    pub fn time_extent(&self) -> Option<(i64, i64)> {
        let lo = self.timestamps.iter().min()?;
        let hi = self.timestamps.iter().max()?;
        Some((*lo, *hi))
    }
}
