use std::collections::HashSet;

/// Splits a raw input line into ticker symbols: upper-cased, de-duplicated,
/// first occurrence wins.
pub fn normalize_symbols(raw: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.split_whitespace()
        .map(normalize_symbol)
        .filter(|s| seen.insert(s.clone()))
        .collect()
}

fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uppercases_and_dedups_in_order() {
        assert_eq!(
            normalize_symbols("  aapl msft AAPL\tnvda msft "),
            vec!["AAPL", "MSFT", "NVDA"]
        );
    }

    #[test]
    fn blank_input_yields_nothing() {
        assert!(normalize_symbols("   \n").is_empty());
    }
}
