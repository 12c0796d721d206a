use super::*;
use crate::database::Movie;
use async_trait::async_trait;
use std::collections::HashMap;
use std::io::Write;
use std::sync::Mutex;

/// Provider double returning pinned vectors keyed by plot text.
struct PinnedProvider {
    vectors: HashMap<String, Vec<f32>>,
    batch_sizes: Mutex<Vec<usize>>,
}

impl PinnedProvider {
    fn new(pairs: &[(&str, [f32; 2])]) -> Self {
        Self {
            vectors: pairs
                .iter()
                .map(|(text, vector)| ((*text).to_string(), vector.to_vec()))
                .collect(),
            batch_sizes: Mutex::new(Vec::new()),
        }
    }
}

impl EmbeddingProvider for PinnedProvider {
    fn model(&self) -> &str {
        "pinned-test-model"
    }

    fn dimension(&self) -> usize {
        2
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.vectors
            .get(text)
            .cloned()
            .ok_or_else(|| RecsError::Embedding(format!("no pinned vector for {text:?}")))
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.batch_sizes
            .lock()
            .expect("batch size lock")
            .push(texts.len());
        texts.iter().map(|text| self.embed(text)).collect()
    }
}

/// Store double that records every insert call.
#[derive(Default)]
struct RecordingStore {
    insert_calls: Mutex<Vec<Vec<Movie>>>,
}

#[async_trait]
impl MovieStore for RecordingStore {
    async fn insert(&self, movies: &[Movie]) -> Result<u64> {
        self.insert_calls
            .lock()
            .expect("insert lock")
            .push(movies.to_vec());
        Ok(movies.len() as u64)
    }

    async fn nearest(&self, _embedding: &[f32], _limit: usize) -> Result<Vec<Movie>> {
        Ok(Vec::new())
    }
}

fn source_movie(title: &str, plot: &str) -> SourceMovie {
    SourceMovie {
        title: title.to_string(),
        director: "Jane Doe".to_string(),
        year: 2001,
        plot: plot.to_string(),
        cast: None,
        genre: "drama".to_string(),
        wiki: format!("https://en.wikipedia.org/wiki/{}", title.replace(' ', "_")),
    }
}

fn pipeline_with(
    provider: PinnedProvider,
    batch_size: usize,
) -> IngestionPipeline<RecordingStore> {
    IngestionPipeline::new(Arc::new(provider), RecordingStore::default(), batch_size)
}

#[tokio::test]
async fn batches_follow_configured_size_and_preserve_order() {
    let provider = PinnedProvider::new(&[
        ("plot one", [1.0, 0.0]),
        ("plot two", [0.9, 0.1]),
        ("plot three", [0.0, 1.0]),
        ("plot four", [0.1, 0.9]),
        ("plot five", [0.5, 0.5]),
    ]);
    let movies = vec![
        source_movie("One", "plot one"),
        source_movie("Two", "plot two"),
        source_movie("Three", "plot three"),
        source_movie("Four", "plot four"),
        source_movie("Five", "plot five"),
    ];

    let pipeline = pipeline_with(provider, 2);
    let inserted = pipeline.ingest(&movies).await.expect("ingest should succeed");

    assert_eq!(inserted, 5);

    let insert_calls = pipeline.store.insert_calls.lock().expect("insert lock");
    assert_eq!(insert_calls.len(), 1, "all records go in one insert");

    let written = &insert_calls[0];
    assert_eq!(written.len(), 5);
    assert_eq!(written[0].title, "One");
    assert_eq!(written[0].embedding, vec![1.0, 0.0]);
    assert_eq!(written[4].title, "Five");
    assert_eq!(written[4].embedding, vec![0.5, 0.5]);
}

#[tokio::test]
async fn provider_called_per_fixed_size_batch() {
    let provider = Arc::new(PinnedProvider::new(&[
        ("plot one", [1.0, 0.0]),
        ("plot two", [0.9, 0.1]),
        ("plot three", [0.0, 1.0]),
    ]));
    let movies = vec![
        source_movie("One", "plot one"),
        source_movie("Two", "plot two"),
        source_movie("Three", "plot three"),
    ];

    let pipeline = IngestionPipeline::new(
        Arc::clone(&provider) as Arc<dyn EmbeddingProvider>,
        RecordingStore::default(),
        2,
    );
    pipeline.ingest(&movies).await.expect("ingest should succeed");

    let batch_sizes = provider.batch_sizes.lock().expect("batch size lock");
    assert_eq!(*batch_sizes, vec![2, 1]);
}

#[tokio::test]
async fn invalid_record_fails_with_index_before_any_work() {
    let provider = PinnedProvider::new(&[("plot one", [1.0, 0.0])]);
    let movies = vec![
        source_movie("One", "plot one"),
        source_movie("Two", "   "),
    ];

    let pipeline = pipeline_with(provider, 2);
    let err = pipeline
        .ingest(&movies)
        .await
        .expect_err("blank plot should fail");

    match &err {
        RecsError::InvalidInput(msg) => {
            assert!(msg.contains("Record 1"), "missing index in: {msg}");
        }
        other => panic!("expected InvalidInput, got {other:?}"),
    }

    assert!(
        pipeline
            .store
            .insert_calls
            .lock()
            .expect("insert lock")
            .is_empty(),
        "nothing should reach the store"
    );
}

#[tokio::test]
async fn provider_failure_names_the_batch() {
    // Second batch contains a plot the provider does not know
    let provider = PinnedProvider::new(&[
        ("plot one", [1.0, 0.0]),
        ("plot two", [0.9, 0.1]),
    ]);
    let movies = vec![
        source_movie("One", "plot one"),
        source_movie("Two", "plot two"),
        source_movie("Three", "plot unknown"),
    ];

    let pipeline = pipeline_with(provider, 2);
    let err = pipeline
        .ingest(&movies)
        .await
        .expect_err("unknown plot should fail");

    match &err {
        RecsError::Embedding(msg) => {
            assert!(msg.contains("Batch 1"), "missing batch index in: {msg}");
        }
        other => panic!("expected Embedding, got {other:?}"),
    }

    assert!(
        pipeline
            .store
            .insert_calls
            .lock()
            .expect("insert lock")
            .is_empty(),
        "a failed batch must abort before the insert"
    );
}

#[tokio::test]
async fn empty_input_short_circuits() {
    let pipeline = pipeline_with(PinnedProvider::new(&[]), 2);
    let inserted = pipeline.ingest(&[]).await.expect("empty ingest is fine");

    assert_eq!(inserted, 0);
    assert!(
        pipeline
            .store
            .insert_calls
            .lock()
            .expect("insert lock")
            .is_empty()
    );
}

#[test]
fn load_movies_parses_dataset_records() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(
        file,
        r#"[{{
            "Release Year": 1975,
            "Title": "Jaws",
            "Director": "Steven Spielberg",
            "Cast": "Roy Scheider",
            "Genre": "thriller",
            "Wiki Page": "https://en.wikipedia.org/wiki/Jaws_(film)",
            "Plot": "A shark terrorizes a beach town."
        }}]"#
    )
    .expect("write temp file");

    let movies = load_movies(file.path()).expect("load should succeed");
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0].title, "Jaws");
}

#[test]
fn load_movies_rejects_malformed_json() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(file, "this is not json").expect("write temp file");

    let err = load_movies(file.path()).expect_err("malformed file should fail");
    assert!(matches!(err, RecsError::InvalidInput(_)), "got {err:?}");
}

#[test]
fn load_movies_missing_file_is_io_error() {
    let err = load_movies("/nonexistent/plots.json").expect_err("missing file should fail");
    assert!(matches!(err, RecsError::Io(_)), "got {err:?}");
}
