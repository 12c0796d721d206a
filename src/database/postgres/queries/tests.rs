use super::*;

#[test]
fn insert_upserts_by_wiki() {
    let sql = insert_sql();

    assert!(sql.starts_with("INSERT INTO movie_plots"));
    assert!(sql.contains("ON CONFLICT (wiki) DO UPDATE"));
    assert!(sql.contains("embedding = EXCLUDED.embedding"));
    // All eight columns are bound parameters
    assert!(sql.contains("VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"));
}

#[test]
fn nearest_orders_by_distance_with_bound_params() {
    let sql = nearest_sql();

    assert!(sql.contains("ORDER BY embedding <-> $1"));
    assert!(sql.contains("LIMIT $2"));
    // The reserved column name stays quoted in the select list
    assert!(sql.contains(r#""cast""#));
}

#[test]
fn row_converts_to_movie() {
    let row = MovieRow {
        title: "Alien".to_string(),
        director: "Ridley Scott".to_string(),
        plot: "The crew of a commercial spacecraft encounters a deadly lifeform.".to_string(),
        year: 1979,
        wiki: "https://en.wikipedia.org/wiki/Alien_(film)".to_string(),
        cast: Some("Sigourney Weaver".to_string()),
        genre: "science fiction".to_string(),
        embedding: pgvector::Vector::from(vec![0.0, 1.0]),
    };

    let movie = Movie::from(row);
    assert_eq!(movie.title, "Alien");
    assert_eq!(movie.year, 1979);
    assert_eq!(movie.embedding, vec![0.0, 1.0]);
}
