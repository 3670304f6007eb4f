//! Monetary cell parsing.
//!
//! Accepted shapes: `1234.5`, `-12.00`, `1,234.56`, `R$ 1,234.56`, `$5.82`,
//! `- $14.05`, `(12.50)`. The decimal separator is always `.`.

use anyhow::{Context, Result, bail};
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Compiled once per load; reused for every row.
pub struct AmountParser {
    re: Regex,
}

impl AmountParser {
    pub fn new() -> Result<Self, regex::Error> {
        let re = Regex::new(concat!(
            r"^(?P<neg>-)?\s*",
            r"(?:R\$|US\$|\$|€)?\s*",
            r"(?P<sign>-)?",
            r"(?P<num>\d[\d,]*(?:\.\d+)?|\.\d+)$"
        ))?;
        Ok(Self { re })
    }

    pub fn parse(&self, raw: &str) -> Result<Decimal> {
        let s = raw.trim();
        if s.is_empty() {
            bail!("empty amount");
        }

        let (inner, parenthesised) = match s.strip_prefix('(').and_then(|r| r.strip_suffix(')')) {
            Some(inner) => (inner.trim(), true),
            None => (s, false),
        };

        let Some(caps) = self.re.captures(inner) else {
            bail!("invalid amount '{raw}'");
        };

        let digits = caps["num"].replace(',', "");
        let value =
            Decimal::from_str(&digits).with_context(|| format!("invalid amount '{raw}'"))?;

        let negative =
            parenthesised || caps.name("neg").is_some() || caps.name("sign").is_some();
        Ok(if negative { -value } else { value })
    }
}

/// One-off parse; loaders should hold an `AmountParser` instead.
pub fn parse_amount(raw: &str) -> Result<Decimal> {
    AmountParser::new()?.parse(raw)
}
