//! Tabela de Ordens Visível

use std::collections::VecDeque;

use crate::types::LogRow;

/// Destino das linhas da tabela de ordens.
///
/// Espelha as operações usadas sobre o corpo da tabela: inserir no topo,
/// contar linhas e remover a última.
pub trait RowSink {
    /// Insere a linha no topo (mais recente primeiro).
    fn prepend(&mut self, row: LogRow);

    fn row_count(&self) -> usize;

    /// Remove a linha de baixo (a mais antiga).
    fn delete_last_row(&mut self);
}

/// Tabela em memória, a mais recente no índice 0.
#[derive(Debug, Clone, Default)]
pub struct VisibleLog {
    rows: VecDeque<LogRow>,
}

impl VisibleLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> impl Iterator<Item = &LogRow> + '_ {
        self.rows.iter()
    }

    pub fn top(&self) -> Option<&LogRow> {
        self.rows.front()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl RowSink for VisibleLog {
    fn prepend(&mut self, row: LogRow) {
        self.rows.push_front(row);
    }

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn delete_last_row(&mut self) {
        self.rows.pop_back();
    }
}

/// Insere no topo e apara a tabela até `capacity` linhas.
pub fn push_row<R: RowSink + ?Sized>(sink: &mut R, row: LogRow, capacity: usize) {
    sink.prepend(row);
    if sink.row_count() > capacity {
        sink.delete_last_row();
    }
}
