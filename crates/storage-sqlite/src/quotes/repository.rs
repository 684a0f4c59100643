use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use log::debug;
use rand::Rng;
use std::sync::Arc;

use goalpost_core::errors::Result;
use goalpost_core::quotes::{Quote, QuoteRepositoryTrait};

use super::model::{NewQuoteDB, QuoteDB, NEW_QUOTE_COLUMNS};
use crate::db::{read_snapshot, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::quote;
use crate::utils::chunk_rows_for_insert;

pub struct QuoteRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl QuoteRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        QuoteRepository { pool, writer }
    }
}

#[async_trait]
impl QuoteRepositoryTrait for QuoteRepository {
    async fn save_many(&self, quotes: Vec<Quote>) -> Result<usize> {
        let total = quotes.len();
        let rows: Vec<NewQuoteDB> = quotes
            .into_iter()
            .filter(|q| !q.quote.trim().is_empty())
            .map(NewQuoteDB::from)
            .collect();
        if rows.len() < total {
            debug!("Skipping {} blank quotes", total - rows.len());
        }
        if rows.is_empty() {
            return Ok(0);
        }

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let mut inserted = 0;
                for chunk in chunk_rows_for_insert(&rows, NEW_QUOTE_COLUMNS) {
                    inserted += diesel::insert_into(quote::table)
                        .values(chunk)
                        .execute(conn)
                        .into_core()?;
                }
                Ok(inserted)
            })
            .await
    }

    /// Uniform over stored rows; the count and the pick share one snapshot.
    fn random_one(&self) -> Result<Option<Quote>> {
        read_snapshot(&self.pool, |conn| {
            let total = quote::table.count().get_result::<i64>(conn).into_core()?;
            if total == 0 {
                return Ok(None);
            }
            let offset = rand::thread_rng().gen_range(0..total);
            let picked = quote::table
                .select(QuoteDB::as_select())
                .order(quote::id.asc())
                .offset(offset)
                .first::<QuoteDB>(conn)
                .optional()
                .into_core()?;
            Ok(picked.map(Quote::from))
        })
    }

    fn count(&self) -> Result<i64> {
        read_snapshot(&self.pool, |conn| {
            quote::table.count().get_result::<i64>(conn).into_core()
        })
    }

    async fn delete_all(&self) -> Result<usize> {
        self.writer
            .exec(|conn: &mut SqliteConnection| -> Result<usize> {
                diesel::delete(quote::table).execute(conn).into_core()
            })
            .await
    }
}
