use serde::{Deserialize, Serialize};

/// A single quote.
///
/// Accepts both the long field names and the short `q`/`a`/`h` keys used by
/// the quote-of-the-day feed, so fetched payloads deserialize directly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Quote {
    #[serde(alias = "q")]
    pub quote: String,
    #[serde(alias = "a")]
    pub author: String,
    #[serde(alias = "h", default)]
    pub html: Option<String>,
}

impl Quote {
    pub fn new(quote: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            quote: quote.into(),
            author: author.into(),
            html: None,
        }
    }
}
