//! Database models for quotes.

use diesel::prelude::*;
use goalpost_core::quotes::Quote;

/// Database model for quotes. `id` is the rowid and never leaves this crate.
#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::quote)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct QuoteDB {
    pub id: i32,
    pub text: String,
    pub author: String,
    pub html: Option<String>,
}

/// Database model for inserting a quote; the rowid is assigned by SQLite
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::quote)]
pub struct NewQuoteDB {
    pub text: String,
    pub author: String,
    pub html: Option<String>,
}

/// Bound parameters per inserted row.
pub(crate) const NEW_QUOTE_COLUMNS: usize = 3;

impl From<QuoteDB> for Quote {
    fn from(db: QuoteDB) -> Self {
        Self {
            quote: db.text,
            author: db.author,
            html: db.html,
        }
    }
}

impl From<Quote> for NewQuoteDB {
    fn from(domain: Quote) -> Self {
        Self {
            text: domain.quote,
            author: domain.author,
            html: domain.html,
        }
    }
}
