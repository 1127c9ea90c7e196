// Unit tests for the keyword search — matcher scoring and the threshold
// semantics the dashboard relies on.

use kreide::model::artifact::{TopicInfo, TopicModelArtifact};
use kreide::model::search::{search_topics, KeywordMatcher, TopicMatcher};

// ============================================================
// Fixture
// ============================================================

fn artifact() -> TopicModelArtifact {
    TopicModelArtifact {
        generated_at: "2024-03-01T12:00:00Z".parse().unwrap(),
        topics: vec![
            TopicInfo {
                id: -1,
                name: "Outlier".to_string(),
                keywords: vec!["und".to_string(), "die".to_string()],
                count: 30,
                embedding: vec![],
            },
            TopicInfo {
                id: 0,
                name: "Netzwerkkommunikation und Verschlüsselung".to_string(),
                keywords: vec![
                    "netzwerk".to_string(),
                    "verschlüsselung".to_string(),
                    "protokoll".to_string(),
                ],
                count: 120,
                embedding: vec![],
            },
            TopicInfo {
                id: 1,
                name: "Datenbanken und SQL".to_string(),
                keywords: vec![
                    "datenbank".to_string(),
                    "sql".to_string(),
                    "tabelle".to_string(),
                ],
                count: 80,
                embedding: vec![],
            },
        ],
        probabilities: vec![],
    }
}

// ============================================================
// Matcher scoring
// ============================================================

#[tokio::test]
async fn matcher_scores_every_assigned_topic() {
    let artifact = artifact();
    let matcher = KeywordMatcher::new(&artifact);

    let matches = matcher.match_topics("datenbank").await.unwrap();

    assert_eq!(matches.len(), 2, "one score per assigned topic");
    assert!(matches.iter().all(|m| m.topic_id != -1), "outlier never matches");
}

#[tokio::test]
async fn top_keyword_query_hits_its_topic() {
    let artifact = artifact();
    let matcher = KeywordMatcher::new(&artifact);

    let matches = matcher.match_topics("datenbank").await.unwrap();
    let db = matches.iter().find(|m| m.topic_id == 1).unwrap();
    let net = matches.iter().find(|m| m.topic_id == 0).unwrap();

    assert!(db.score > 0.0, "matching keyword must score above zero");
    assert_eq!(net.score, 0.0, "disjoint topic must score zero");
}

#[tokio::test]
async fn scores_stay_within_unit_interval() {
    let artifact = artifact();
    let matcher = KeywordMatcher::new(&artifact);

    for query in ["sql", "netzwerk protokoll verschlüsselung", "quantencomputer"] {
        let matches = matcher.match_topics(query).await.unwrap();
        for m in matches {
            assert!(
                (0.0..=1.0).contains(&m.score),
                "score {} out of range for query {query:?}",
                m.score
            );
        }
    }
}

// ============================================================
// search_topics — threshold and ordering semantics
// ============================================================

#[tokio::test]
async fn results_strictly_exceed_the_threshold() {
    let artifact = artifact();
    let matcher = KeywordMatcher::new(&artifact);

    let hits = search_topics(&matcher, &artifact, "datenbank sql", 0.2)
        .await
        .unwrap();

    assert!(!hits.is_empty());
    assert!(hits.iter().all(|h| h.score > 0.2));
}

#[tokio::test]
async fn threshold_above_one_returns_empty() {
    let artifact = artifact();
    let matcher = KeywordMatcher::new(&artifact);

    let hits = search_topics(&matcher, &artifact, "datenbank sql tabelle", 1.1)
        .await
        .unwrap();

    assert!(hits.is_empty(), "scores are capped at 1.0");
}

#[tokio::test]
async fn results_sorted_best_first() {
    let artifact = artifact();
    let matcher = KeywordMatcher::new(&artifact);

    let hits = search_topics(&matcher, &artifact, "datenbank netzwerk sql", 0.0)
        .await
        .unwrap();

    for window in hits.windows(2) {
        assert!(window[0].score >= window[1].score);
    }
}

#[tokio::test]
async fn query_is_lowercased_before_matching() {
    let artifact = artifact();
    let matcher = KeywordMatcher::new(&artifact);

    let upper = search_topics(&matcher, &artifact, "DATENBANK", 0.0)
        .await
        .unwrap();
    let lower = search_topics(&matcher, &artifact, "datenbank", 0.0)
        .await
        .unwrap();

    assert_eq!(upper.len(), lower.len());
    assert!((upper[0].score - lower[0].score).abs() < 1e-12);
}

#[tokio::test]
async fn unrelated_query_matches_nothing_at_default_threshold() {
    let artifact = artifact();
    let matcher = KeywordMatcher::new(&artifact);

    let hits = search_topics(&matcher, &artifact, "quantencomputer", 0.5)
        .await
        .unwrap();

    assert!(hits.is_empty());
}

#[tokio::test]
async fn hits_serialize_with_german_table_columns() {
    let artifact = artifact();
    let matcher = KeywordMatcher::new(&artifact);

    let hits = search_topics(&matcher, &artifact, "sql", 0.0).await.unwrap();
    let json = serde_json::to_value(&hits[0]).unwrap();

    assert!(json.get("Thema").is_some());
    assert!(json.get("Schlüsselwörter").is_some());
    assert!(json.get("Anzahl").is_some());
    assert!(json.get("score").is_some());
}
