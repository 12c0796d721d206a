#[cfg(test)]
mod tests;

use pgvector::Vector;
use sqlx::postgres::PgPool;
use tracing::debug;

use crate::database::postgres::models::Movie;
use crate::{RecsError, Result};

pub const TABLE_NAME: &str = "movie_plots";

// `cast` is a reserved word, hence the quoting.
const COLUMNS: &str = r#"title, director, plot, year, wiki, "cast", genre, embedding"#;

pub struct MovieQueries;

#[derive(sqlx::FromRow)]
struct MovieRow {
    title: String,
    director: String,
    plot: String,
    year: i32,
    wiki: String,
    cast: Option<String>,
    genre: String,
    embedding: Vector,
}

impl From<MovieRow> for Movie {
    fn from(row: MovieRow) -> Self {
        Self {
            title: row.title,
            director: row.director,
            plot: row.plot,
            year: row.year,
            wiki: row.wiki,
            cast: row.cast,
            genre: row.genre,
            embedding: row.embedding.to_vec(),
        }
    }
}

impl MovieQueries {
    /// Bulk-write records in a single transaction, upserting by wiki URL.
    ///
    /// The transaction makes the write atomic: a failure part-way through
    /// persists nothing and the whole run can simply be repeated.
    #[inline]
    pub async fn insert_batch(pool: &PgPool, movies: &[Movie]) -> Result<u64> {
        if movies.is_empty() {
            debug!("No movies to insert");
            return Ok(0);
        }

        let sql = insert_sql();

        let mut transaction = pool
            .begin()
            .await
            .map_err(|e| RecsError::StoreQuery(format!("Failed to begin transaction: {e}")))?;

        for movie in movies {
            let embedding = Vector::from(movie.embedding.clone());
            sqlx::query(&sql)
                .bind(&movie.title)
                .bind(&movie.director)
                .bind(&movie.plot)
                .bind(movie.year)
                .bind(&movie.wiki)
                .bind(&movie.cast)
                .bind(&movie.genre)
                .bind(embedding)
                .execute(&mut *transaction)
                .await
                .map_err(|e| {
                    RecsError::StoreQuery(format!("Failed to insert {}: {e}", movie.wiki))
                })?;
        }

        transaction
            .commit()
            .await
            .map_err(|e| RecsError::StoreQuery(format!("Failed to commit insert: {e}")))?;

        debug!("Inserted {} movies", movies.len());
        Ok(movies.len() as u64)
    }

    /// The `limit` records whose embeddings are closest to `embedding` under
    /// the pgvector L2 operator, ordered nearest-first. The vector and the
    /// limit are bound parameters, never spliced into the SQL text.
    #[inline]
    pub async fn nearest(pool: &PgPool, embedding: &[f32], limit: usize) -> Result<Vec<Movie>> {
        let query_vector = Vector::from(embedding.to_vec());

        let rows: Vec<MovieRow> = sqlx::query_as(&nearest_sql())
            .bind(query_vector)
            .bind(limit as i64)
            .fetch_all(pool)
            .await
            .map_err(|e| RecsError::StoreQuery(format!("Nearest-neighbor query failed: {e}")))?;

        debug!("Nearest-neighbor query returned {} rows", rows.len());
        Ok(rows.into_iter().map(Movie::from).collect())
    }

    /// Total number of stored records.
    #[inline]
    pub async fn count(pool: &PgPool) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {TABLE_NAME}"))
            .fetch_one(pool)
            .await
            .map_err(|e| RecsError::StoreQuery(format!("Count query failed: {e}")))?;

        Ok(count)
    }
}

fn insert_sql() -> String {
    format!(
        "INSERT INTO {TABLE_NAME} ({COLUMNS}) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
         ON CONFLICT (wiki) DO UPDATE SET \
            title = EXCLUDED.title, \
            director = EXCLUDED.director, \
            plot = EXCLUDED.plot, \
            year = EXCLUDED.year, \
            \"cast\" = EXCLUDED.\"cast\", \
            genre = EXCLUDED.genre, \
            embedding = EXCLUDED.embedding"
    )
}

fn nearest_sql() -> String {
    format!("SELECT {COLUMNS} FROM {TABLE_NAME} ORDER BY embedding <-> $1 LIMIT $2")
}
