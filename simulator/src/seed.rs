//! Seed rate loading.

use std::path::Path;

use anyhow::Context;
use ratemesh_common::RateQuote;

/// Built-in seed rates.
pub fn default_quotes() -> Vec<RateQuote> {
    vec![
        RateQuote::new("USD", "CAD", 1.34),
        RateQuote::new("CAD", "GBP", 0.58),
        RateQuote::new("USD", "EUR", 0.86),
    ]
}

/// Load quotes from a file.
///
/// `.json` files hold an array of quotes; anything else is read as one
/// `BASE/QUOTE=RATE` per line.
pub fn load_quotes(path: &Path) -> anyhow::Result<Vec<RateQuote>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read rates file {}", path.display()))?;

    if path.extension().is_some_and(|ext| ext == "json") {
        serde_json::from_str(&text)
            .with_context(|| format!("Invalid JSON rates in {}", path.display()))
    } else {
        parse_quotes(&text).with_context(|| format!("Invalid rates in {}", path.display()))
    }
}

/// Parse line-oriented quotes. Blank lines and `#` comments are skipped.
pub fn parse_quotes(text: &str) -> anyhow::Result<Vec<RateQuote>> {
    text.lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line_no, line)| {
            line.parse::<RateQuote>()
                .with_context(|| format!("line {}", line_no))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quotes() {
        let text = "# seed rates\nUSD/CAD=1.34\n\n  CAD/GBP = 0.58\n";
        let quotes = parse_quotes(text).unwrap();

        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[1].rate, 0.58);
    }

    #[test]
    fn test_parse_quotes_reports_line() {
        let err = parse_quotes("USD/CAD=1.34\nbogus").unwrap_err();
        assert_eq!(err.to_string(), "line 2");
    }

    #[test]
    fn test_load_json_quotes() {
        let path = std::env::temp_dir().join(format!("ratemesh-seed-{}.json", std::process::id()));
        let json = serde_json::to_string(&default_quotes()).unwrap();
        std::fs::write(&path, json).unwrap();

        let quotes = load_quotes(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(quotes, default_quotes());
    }
}
