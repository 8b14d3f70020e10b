// Integration tests for animatch
use animatch::{
    compute_reference_vector, cosine_similarity, rank, rank_async, score, AnimeDocument, Catalog,
    EmbeddedItem, EmbeddingField, Error, ErrorKind, RankingConfig, RankingRequest,
    RecommendationResponse, Ranker, SortKey, Vector, WeightSet,
};
use std::io::Write;
use std::sync::Arc;

fn genres_item(id: u64, genres: Vec<f32>) -> EmbeddedItem {
    EmbeddedItem::new(id, format!("anime {}", id)).with_field(EmbeddingField::Genres, genres)
}

fn full_item(id: u64, seed: f32) -> EmbeddedItem {
    let mut item = EmbeddedItem::new(id, format!("anime {}", id));
    for (offset, field) in EmbeddingField::ALL.into_iter().enumerate() {
        let x = seed + offset as f32;
        item = item.with_field(field, vec![x.sin(), x.cos(), (x * 0.5).sin().abs()]);
    }
    item
}

#[test]
fn test_single_selection_scenario() {
    let catalog = vec![
        genres_item(1, vec![1.0, 0.0]),
        genres_item(2, vec![1.0, 0.0]),
        genres_item(3, vec![0.0, 1.0]),
    ];
    let weights = WeightSet::only(EmbeddingField::Genres);

    let results = rank(&RankingRequest::new(&[1], &catalog, &weights).top_n(2)).unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].id, 2);
    assert!((results[0].score - 1.0).abs() < 1e-6);
    assert_eq!(results[1].id, 3);
    assert!(results[1].score.abs() < 1e-6);
}

#[test]
fn test_unknown_selection_is_not_found() {
    let catalog = vec![genres_item(1, vec![1.0, 0.0])];
    let weights = WeightSet::default();

    let err = rank(&RankingRequest::new(&[77], &catalog, &weights)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn test_averaged_reference_scenario() {
    let catalog = vec![
        genres_item(1, vec![1.0, 0.0]),
        genres_item(2, vec![0.0, 1.0]),
        genres_item(3, vec![0.5, 0.5]),
        genres_item(4, vec![1.0, 0.0]),
    ];

    let reference = compute_reference_vector(&[1, 2], &catalog).unwrap();
    assert_eq!(
        reference.field(EmbeddingField::Genres).unwrap().as_slice(),
        &[0.5, 0.5]
    );

    let similarity = cosine_similarity(
        reference.field(EmbeddingField::Genres).unwrap(),
        catalog[2].field(EmbeddingField::Genres).unwrap(),
    )
    .unwrap();
    assert!((similarity - 1.0).abs() < 1e-6);

    let weights = WeightSet::only(EmbeddingField::Genres);
    let results = rank(&RankingRequest::new(&[1, 2], &catalog, &weights)).unwrap();
    assert_eq!(results.iter().map(|c| c.id).collect::<Vec<_>>(), vec![3, 4]);
}

#[test]
fn test_top_n_exceeding_candidates() {
    let catalog: Vec<EmbeddedItem> = (1..=5).map(|i| full_item(i, i as f32)).collect();
    let ranker = Ranker::new(WeightSet::default()).unwrap();

    let results = ranker.rank(&[2], &catalog, 30).unwrap();
    assert_eq!(results.len(), 4);
}

#[test]
fn test_ranking_properties() {
    let catalog: Vec<EmbeddedItem> = (0..300u64).map(|i| full_item(i, i as f32 * 0.37)).collect();
    let selected = [4, 90, 250];
    let ranker = Ranker::new(WeightSet::default()).unwrap();

    let results = ranker.rank(&selected, &catalog, 40).unwrap();

    assert!(results.len() <= 40);
    assert!(results.len() <= catalog.len() - selected.len());
    assert!(results.iter().all(|c| !selected.contains(&c.id)));
    assert!(results.windows(2).all(|w| w[0].score >= w[1].score));

    // Equal scores keep catalog order
    for w in results.windows(2) {
        if w[0].score == w[1].score {
            let pos = |id| catalog.iter().position(|item| item.id == id).unwrap();
            assert!(pos(w[0].id) < pos(w[1].id));
        }
    }
}

#[test]
fn test_duplicated_catalog_entries_tie_in_catalog_order() {
    let catalog = vec![
        genres_item(1, vec![1.0, 0.0]),
        genres_item(30, vec![0.6, 0.8]),
        genres_item(10, vec![0.6, 0.8]),
        genres_item(20, vec![0.6, 0.8]),
    ];
    let ranker = Ranker::new(WeightSet::only(EmbeddingField::Genres)).unwrap();
    let ids: Vec<u64> = ranker.rank(&[1], &catalog, 3).unwrap().iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![30, 10, 20]);
}

#[test]
fn test_score_is_linear_in_weights() {
    let reference = full_item(1, 0.3);
    let candidate = full_item(2, 1.9);
    let weights = WeightSet::default();

    let base = score(&reference, &candidate, &weights).unwrap();
    let doubled = score(&reference, &candidate, &weights.scaled(2.0)).unwrap();
    assert!((doubled - 2.0 * base).abs() < 1e-6);
}

#[test]
fn test_self_and_zero_similarity() {
    let v = Vector::new(vec![0.2, -0.4, 0.9]);
    assert!((cosine_similarity(&v, &v).unwrap() - 1.0).abs() < 1e-6);
    assert_eq!(cosine_similarity(&v, &Vector::new(vec![0.0; 3])).unwrap(), 0.0);
}

#[test]
fn test_dimension_mismatch_is_invalid_input() {
    let catalog = vec![
        genres_item(1, vec![1.0, 0.0]),
        genres_item(2, vec![1.0, 0.0, 0.0]),
    ];
    let err = Ranker::new(WeightSet::default())
        .unwrap()
        .rank(&[1], &catalog, 10)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert!(matches!(err, Error::FieldDimension { .. }));
}

#[test]
fn test_inputs_are_not_mutated() {
    let catalog: Vec<EmbeddedItem> = (0..10u64).map(|i| full_item(i, i as f32)).collect();
    let weights = WeightSet::default();
    let catalog_before = catalog.clone();
    let weights_before = weights.clone();

    rank(&RankingRequest::new(&[0, 1], &catalog, &weights)).unwrap();

    assert_eq!(catalog, catalog_before);
    assert_eq!(weights, weights_before);
}

#[test]
fn test_catalog_to_recommendations() {
    let mut features = tempfile::NamedTempFile::new().unwrap();
    write!(
        features,
        r#"[
            {{"anime_id": 1, "English": "Violet Evergarden", "Popularity": 40}},
            {{"anime_id": 2, "Japanese": "Shigatsu wa Kimi no Uso", "Popularity": 20}},
            {{"anime_id": 3, "Synonyms": "Clannad AS", "Popularity": 10}},
            {{"anime_id": 4, "Popularity": 30}}
        ]"#
    )
    .unwrap();
    let mut embeddings = tempfile::NamedTempFile::new().unwrap();
    write!(
        embeddings,
        r#"[
            {{"anime_id": 1, "bert_genres": [1.0, 0.0], "bert_themes": [0.0, 1.0]}},
            {{"anime_id": 2, "bert_genres": [0.9, 0.1], "bert_themes": [0.0, 1.0]}},
            {{"anime_id": 3, "bert_genres": [0.2, 0.8]}},
            {{"anime_id": 4, "bert_genres": [0.0, 1.0], "bert_themes": [1.0, 0.0]}}
        ]"#
    )
    .unwrap();

    let catalog = Catalog::from_json_files(features.path(), embeddings.path())
        .unwrap()
        .sorted(SortKey::Popularity);
    catalog.validate_dimensions().unwrap();
    assert_eq!(catalog.items()[0].id, 3);
    assert_eq!(catalog.get(4).unwrap().title, "Unknown Title");

    let config = RankingConfig::default();
    let ranker = config.ranker().unwrap();
    let ranked = ranker.rank_explained(&[1], catalog.items(), config.top_n).unwrap();

    assert_eq!(ranked.len(), 3);
    assert_eq!(ranked[0].id, 2);
    assert_eq!(catalog.metadata_for(ranked[0].id).unwrap().title, "Shigatsu wa Kimi no Uso");

    let response = RecommendationResponse::from_ranked(&[1], &ranked, ranker.weights(), 3);
    assert_eq!(response.stats.results_count, 3);
    // Item 3 has no themes vector
    let item3 = response.result.iter().find(|r| r.id == 3).unwrap();
    assert_eq!(item3.absent, vec![
        EmbeddingField::Description,
        EmbeddingField::Demographic,
        EmbeddingField::Rating,
        EmbeddingField::Themes,
    ]);
}

#[test]
fn test_documents_with_absent_vectors_rank() {
    let mut doc = AnimeDocument::new(11);
    doc.english = Some("Planetes".to_string());
    doc.bert_description = Some(vec![0.3, 0.3]);
    let mut other = AnimeDocument::new(12);
    other.bert_description = Some(vec![0.3, 0.31]);
    let bare = AnimeDocument::new(13);

    let catalog = Catalog::from_documents(vec![doc, other, bare]);
    let ranked = Ranker::new(WeightSet::default())
        .unwrap()
        .rank(&[11], catalog.items(), 10)
        .unwrap();

    assert_eq!(ranked.iter().map(|c| c.id).collect::<Vec<_>>(), vec![12, 13]);
    assert_eq!(ranked[1].score, 0.0);
}

#[tokio::test]
async fn test_rank_async_matches_sync() {
    let items: Vec<EmbeddedItem> = (0..64u64).map(|i| full_item(i, i as f32 * 0.11)).collect();
    let ranker = Ranker::new(WeightSet::default()).unwrap();

    let expected = ranker.rank(&[5, 6], &items, 10).unwrap();
    let actual = rank_async(ranker, vec![5, 6], Arc::new(items), 10).await.unwrap();

    assert_eq!(actual, expected);
}

#[tokio::test]
async fn test_rank_async_not_found() {
    let catalog = Arc::new(Catalog::from_items(vec![genres_item(1, vec![1.0])]));
    let ranker = Ranker::new(WeightSet::default()).unwrap();

    let err = rank_async(ranker, vec![2], catalog, 10).await.unwrap_err();
    let err = err.downcast_ref::<Error>().unwrap();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}
