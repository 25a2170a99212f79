//! Inicialização de Logs

use tracing_subscriber::EnvFilter;

/// Inicializa o tracing com filtro de `RUST_LOG` (ou `default_filter`).
///
/// Só é chamado no modo sem tela: escrever logs no terminal corromperia a TUI.
pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
