// Unit tests for the grouped means and derived chart views.
//
// The fixture covers the interesting shape of the real data: one region
// with both levels, one with only Sek I, one with only Sek II.

use kreide::analysis::aggregate::{
    curriculum_means, level_distribution, level_focus, level_radar, overall_distribution,
    region_matrix, LevelSelection,
};
use kreide::analysis::proportions::ProportionMatrix;
use kreide::data::models::{Document, SchoolLevel, SentenceRow};
use kreide::data::Corpus;
use kreide::model::artifact::{TopicInfo, TopicModelArtifact, OTHER_LABEL};

// ============================================================
// Fixture: 4 curricula, 2 topics, hand-checkable probabilities
// ============================================================

fn fixture() -> ProportionMatrix {
    let documents = vec![
        Document { id: 0, bundesland: "Berlin".into(), stufe: SchoolLevel::SekI },
        Document { id: 1, bundesland: "Berlin".into(), stufe: SchoolLevel::SekII },
        Document { id: 2, bundesland: "Bayern".into(), stufe: SchoolLevel::SekI },
        Document { id: 3, bundesland: "Hamburg".into(), stufe: SchoolLevel::SekII },
    ];

    // Two sentences per curriculum
    let rows = (0..4u32)
        .flat_map(|doc| {
            (0..2).map(move |j| SentenceRow {
                sentence: format!("satz {doc} {j}"),
                raw_sentence: format!("Satz {doc} {j}"),
                document: doc,
                titel: "Inhaltsfeld".to_string(),
            })
        })
        .collect();

    let corpus = Corpus::from_parts(documents, rows).unwrap();

    let topics = vec![
        TopicInfo {
            id: 0,
            name: "Algorithmen".to_string(),
            keywords: vec!["algorithmus".to_string()],
            count: 4,
            embedding: vec![],
        },
        TopicInfo {
            id: 1,
            name: "Datenbanken".to_string(),
            keywords: vec!["sql".to_string()],
            count: 4,
            embedding: vec![],
        },
    ];

    // Curriculum means (per group, after averaging the two rows):
    //   Berlin/SekI:   [0.5, 0.2] residual 0.3
    //   Berlin/SekII:  [0.1, 0.6] residual 0.3
    //   Bayern/SekI:   [0.4, 0.4] residual 0.2
    //   Hamburg/SekII: [0.2, 0.2] residual 0.6
    let probabilities = vec![
        vec![0.6, 0.1],
        vec![0.4, 0.3],
        vec![0.1, 0.5],
        vec![0.1, 0.7],
        vec![0.5, 0.3],
        vec![0.3, 0.5],
        vec![0.2, 0.1],
        vec![0.2, 0.3],
    ];

    let artifact = TopicModelArtifact {
        generated_at: "2024-03-01T12:00:00Z".parse().unwrap(),
        topics,
        probabilities,
    };

    ProportionMatrix::build(&corpus, &artifact).unwrap()
}

// ============================================================
// curriculum_means — grouping semantics
// ============================================================

#[test]
fn one_group_per_curriculum_no_imputation() {
    let means = curriculum_means(&fixture());

    // Bayern has no Sek II group and Hamburg no Sek I group — absent, not imputed
    let keys: Vec<(String, SchoolLevel)> = means
        .groups
        .iter()
        .map(|g| (g.bundesland.clone(), g.stufe))
        .collect();
    assert_eq!(
        keys,
        vec![
            ("Bayern".to_string(), SchoolLevel::SekI),
            ("Berlin".to_string(), SchoolLevel::SekI),
            ("Berlin".to_string(), SchoolLevel::SekII),
            ("Hamburg".to_string(), SchoolLevel::SekII),
        ]
    );
}

#[test]
fn group_means_average_their_sentences() {
    let means = curriculum_means(&fixture());
    let berlin_sek1 = means
        .groups
        .iter()
        .find(|g| g.bundesland == "Berlin" && g.stufe == SchoolLevel::SekI)
        .unwrap();

    assert_eq!(berlin_sek1.sentences, 2);
    assert!((berlin_sek1.means[0] - 0.5).abs() < 1e-12);
    assert!((berlin_sek1.means[1] - 0.2).abs() < 1e-12);
    assert!((berlin_sek1.means[2] - 0.3).abs() < 1e-12);
}

#[test]
fn group_means_sum_to_one() {
    let means = curriculum_means(&fixture());
    for group in &means.groups {
        let sum: f64 = group.means.iter().sum();
        assert!(
            (sum - 1.0).abs() < 1e-9,
            "{}/{} sums to {sum}",
            group.bundesland,
            group.stufe
        );
    }
}

#[test]
fn complete_regions_require_both_levels() {
    let means = curriculum_means(&fixture());
    assert_eq!(means.complete_regions(), vec!["Berlin".to_string()]);
}

// ============================================================
// Distributions — the pie inputs
// ============================================================

#[test]
fn overall_distribution_sums_to_one() {
    let means = curriculum_means(&fixture());
    let dist = overall_distribution(&means);

    assert_eq!(dist.len(), 3);
    assert_eq!(dist.last().unwrap().label, OTHER_LABEL);
    let sum: f64 = dist.iter().map(|s| s.share).sum();
    assert!((sum - 1.0).abs() < 1e-9, "total distribution sums to {sum}");
}

#[test]
fn level_distribution_averages_only_that_level() {
    let means = curriculum_means(&fixture());
    let sek1 = level_distribution(&means, SchoolLevel::SekI);

    // Sek I curricula: Berlin [0.5, 0.2, 0.3], Bayern [0.4, 0.4, 0.2]
    assert!((sek1[0].share - 0.45).abs() < 1e-12);
    assert!((sek1[1].share - 0.30).abs() < 1e-12);
    assert!((sek1[2].share - 0.25).abs() < 1e-12);

    let sum: f64 = sek1.iter().map(|s| s.share).sum();
    assert!((sum - 1.0).abs() < 1e-9);
}

// ============================================================
// Level focus and radar
// ============================================================

#[test]
fn level_focus_uses_complete_regions_only() {
    let means = curriculum_means(&fixture());
    let rows = level_focus(&means);

    // Only Berlin counts: Sek I [0.5, 0.2, 0.3], Sek II [0.1, 0.6, 0.3], in percent
    let algorithmen = rows.iter().find(|r| r.topic == "Algorithmen").unwrap();
    assert!((algorithmen.sek1 - 50.0).abs() < 1e-9);
    assert!((algorithmen.sek2 - 10.0).abs() < 1e-9);
    assert!((algorithmen.diff - 40.0).abs() < 1e-9);
}

#[test]
fn level_focus_sorted_by_diff_ascending() {
    let rows = level_focus(&curriculum_means(&fixture()));
    for window in rows.windows(2) {
        assert!(
            window[0].diff <= window[1].diff,
            "focus rows out of order: {} > {}",
            window[0].diff,
            window[1].diff
        );
    }
}

#[test]
fn level_focus_keeps_the_residual_topic() {
    let rows = level_focus(&curriculum_means(&fixture()));
    assert!(rows.iter().any(|r| r.topic == OTHER_LABEL));
}

#[test]
fn radar_drops_residual_and_orders_by_prominence() {
    let rows = level_radar(&curriculum_means(&fixture()));

    assert!(rows.iter().all(|r| r.topic != OTHER_LABEL));
    for window in rows.windows(2) {
        let a = window[0].sek1 + window[0].sek2;
        let b = window[1].sek1 + window[1].sek2;
        assert!(a >= b, "radar rows out of prominence order");
    }
    // Raw proportions, not percent
    assert!(rows.iter().all(|r| r.sek1 <= 1.0 && r.sek2 <= 1.0));
}

// ============================================================
// Region matrix — the heatmap input
// ============================================================

#[test]
fn region_matrix_single_level_lists_regions_with_that_level() {
    let means = curriculum_means(&fixture());
    let m = region_matrix(&means, LevelSelection::Single(SchoolLevel::SekI));

    assert_eq!(m.regions, vec!["Bayern".to_string(), "Berlin".to_string()]);
    assert_eq!(m.topics, vec!["Algorithmen".to_string(), "Datenbanken".to_string()]);

    // Percent values, residual dropped: Berlin Sek I = [50, 20]
    let berlin = &m.values[1];
    assert_eq!(berlin.len(), 2);
    assert!((berlin[0] - 50.0).abs() < 1e-9);
    assert!((berlin[1] - 20.0).abs() < 1e-9);
}

#[test]
fn region_matrix_combined_restricts_to_complete_regions() {
    let means = curriculum_means(&fixture());
    let m = region_matrix(&means, LevelSelection::Combined);

    assert_eq!(m.regions, vec!["Berlin".to_string()]);
    // Mean of Berlin's two levels: ([0.5, 0.2] + [0.1, 0.6]) / 2 * 100
    assert!((m.values[0][0] - 30.0).abs() < 1e-9);
    assert!((m.values[0][1] - 40.0).abs() < 1e-9);
}
