//! Mission-name clustering: skip-gram vectors, PCA, k-means.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use super::embedding::{self, SkipGramConfig};
use super::kmeans::{KMeans, KMeansConfig};
use super::pca;

#[derive(Debug, Clone)]
pub struct ClusterConfig {
    pub n_clusters: usize,
    pub variance: f64,
    pub n_init: usize,
    pub kmeans_seed: u64,
    pub embedding: SkipGramConfig,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            n_clusters: 30,
            variance: 0.95,
            n_init: 10,
            kmeans_seed: 0,
            embedding: SkipGramConfig::default(),
        }
    }
}

/// Mission name (lower-cased) to 0-indexed cluster id, rebuilt every run.
#[derive(Debug, Clone, Default)]
pub struct ClusterAssignment {
    by_mission: HashMap<String, usize>,
    members: BTreeMap<usize, Vec<String>>,
    components: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSummary {
    pub id: usize,
    pub theme: Option<String>,
    pub missions: Vec<String>,
}

impl ClusterAssignment {
    pub fn from_pairs(pairs: HashMap<String, usize>) -> Self {
        let mut assignment = Self::default();
        let mut sorted: Vec<(String, usize)> = pairs.into_iter().collect();
        sorted.sort();
        for (mission, cluster) in sorted {
            assignment.insert(mission, cluster);
        }
        assignment
    }

    fn insert(&mut self, mission: String, cluster: usize) {
        self.by_mission.insert(mission.to_lowercase(), cluster);
        self.members.entry(cluster).or_default().push(mission);
    }

    pub fn cluster_of(&self, mission: &str) -> Option<usize> {
        self.by_mission.get(&mission.to_lowercase()).copied()
    }

    pub fn members(&self) -> &BTreeMap<usize, Vec<String>> {
        &self.members
    }

    pub fn cluster_count(&self) -> usize {
        self.members.len()
    }

    pub fn len(&self) -> usize {
        self.by_mission.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_mission.is_empty()
    }

    /// Dimensions kept by the PCA step of the run that built this assignment.
    pub fn components(&self) -> usize {
        self.components
    }

    pub fn summaries(&self) -> Vec<ClusterSummary> {
        self.members
            .iter()
            .map(|(&id, missions)| ClusterSummary {
                id,
                theme: super::theme::theme(id).map(|t| t.name.to_string()),
                missions: missions.clone(),
            })
            .collect()
    }
}

/// Clusters the unique mission names of one batch.
pub fn cluster_missions(names: &[String], cfg: &ClusterConfig) -> ClusterAssignment {
    if names.is_empty() {
        return ClusterAssignment::default();
    }

    let sentences = embedding::tokenize_batch(names);
    let vectors = embedding::train(&sentences, &cfg.embedding);
    let mission_vectors: Vec<Vec<f64>> = names.iter().map(|n| vectors.mission_vector(n)).collect();

    let reduced = pca::reduce(&mission_vectors, cfg.variance);
    let km = KMeans::fit(
        &reduced.rows,
        &KMeansConfig {
            k: cfg.n_clusters,
            n_init: cfg.n_init,
            seed: cfg.kmeans_seed,
        },
    );

    tracing::debug!(
        missions = names.len(),
        vocabulary = vectors.len(),
        components = reduced.components,
        explained = reduced.explained_ratio,
        clusters = km.k,
        inertia = km.inertia,
        "Mission clustering finished"
    );

    let mut assignment = ClusterAssignment {
        components: reduced.components,
        ..ClusterAssignment::default()
    };
    for (name, &cluster) in names.iter().zip(&km.assignments) {
        assignment.insert(name.clone(), cluster);
    }
    assignment
}
