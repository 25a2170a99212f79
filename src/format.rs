//! Formatação de Números para Exibição

use rust_decimal::prelude::*;

/// Número com `decimals` casas fixas, empate arredondado para longe do zero.
///
/// O `{:.N}` do Rust arredonda empates exatos para o par (`101.125` → `101.12`);
/// na tela o empate sobe (`101.13`). O valor binário exato do `f64` é
/// convertido para `Decimal` antes do arredondamento.
///
/// # Argumentos
/// * `value` - Valor a formatar
/// * `decimals` - Casas decimais
pub fn to_fixed(value: f64, decimals: u32) -> String {
    match Decimal::from_f64_retain(value) {
        Some(exact) => {
            let mut rounded =
                exact.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
            rounded.rescale(decimals);
            rounded.to_string()
        }
        // NaN, infinito ou fora do alcance do Decimal
        None => format!("{:.*}", decimals as usize, value),
    }
}

/// Preço com 2 casas e o sufixo da moeda de cotação: `101.50 USDT`.
pub fn price_with_suffix(price: f64, quote_suffix: &str) -> String {
    format!("{} {}", to_fixed(price, 2), quote_suffix)
}
