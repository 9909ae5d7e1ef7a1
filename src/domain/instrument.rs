//! Tradable instrument identity.

use std::fmt;

/// Lookup form of an order book id: trimmed and uppercased. Universes and
/// sources compare keys in this form, so `000001.xshe` and `000001.XSHE`
/// name the same instrument.
pub fn canonical_key(key: &str) -> String {
    key.trim().to_uppercase()
}

/// A security identified by its display symbol and canonical order book id
/// (e.g. `000001.XSHE`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Instrument {
    pub symbol: String,
    pub order_book_id: String,
}

impl Instrument {
    pub fn new(symbol: impl Into<String>, order_book_id: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            order_book_id: order_book_id.into(),
        }
    }

    pub fn key(&self) -> String {
        canonical_key(&self.order_book_id)
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.order_book_id, self.symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_shows_book_id_and_symbol() {
        let inst = Instrument::new("PAYH", "000001.XSHE");
        assert_eq!(inst.to_string(), "000001.XSHE (PAYH)");
    }

    #[test]
    fn key_ignores_case_and_padding() {
        let inst = Instrument::new("PAYH", " 000001.xshe");
        assert_eq!(inst.key(), "000001.XSHE");
        assert_eq!(inst.order_book_id, " 000001.xshe");
        assert_eq!(canonical_key("000001.XsHe"), inst.key());
    }
}
