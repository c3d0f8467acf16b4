use std::{fmt, marker::PhantomData};

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{MapAccess, Visitor},
    ser::SerializeMap as _,
};

use super::ExchangeId;

/// Per-exchange prices for one asset, in the order the caller supplied them.
///
/// The order is significant: when several exchanges share the lowest or
/// highest price, the one listed first wins. Serialized as a map so the
/// document order of a JSON object is kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExchangeQuotes(Vec<(ExchangeId, f64)>);

impl ExchangeQuotes {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Sets the quote for `exchange`. A repeated exchange keeps its original
    /// position and takes the new price.
    pub fn insert(&mut self, exchange: impl Into<ExchangeId>, price: f64) {
        let exchange = exchange.into();
        match self.0.iter_mut().find(|(id, _)| *id == exchange) {
            Some((_, existing)) => *existing = price,
            None => self.0.push((exchange, price)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ExchangeId, f64)> {
        self.0.iter().map(|(id, price)| (id, *price))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<E: Into<ExchangeId>> FromIterator<(E, f64)> for ExchangeQuotes {
    fn from_iter<I: IntoIterator<Item = (E, f64)>>(iter: I) -> Self {
        let mut quotes = Self::new();
        for (exchange, price) in iter {
            quotes.insert(exchange, price);
        }
        quotes
    }
}

impl Serialize for ExchangeQuotes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (exchange, price) in &self.0 {
            map.serialize_entry(exchange, price)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ExchangeQuotes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct QuotesVisitor(PhantomData<ExchangeQuotes>);

        impl<'de> Visitor<'de> for QuotesVisitor {
            type Value = ExchangeQuotes;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of exchange id to price")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut quotes = ExchangeQuotes::new();
                while let Some((exchange, price)) = access.next_entry::<ExchangeId, f64>()? {
                    quotes.insert(exchange, price);
                }
                Ok(quotes)
            }
        }

        deserializer.deserialize_map(QuotesVisitor(PhantomData))
    }
}
