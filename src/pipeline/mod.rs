pub mod aggregate;
pub mod cluster;
pub mod compose;
pub mod embedding;
pub mod kmeans;
pub mod normalize;
pub mod pca;
pub mod theme;
pub mod types;

use rand::Rng;

use crate::services::record_source::MapBatch;

pub use cluster::{ClusterAssignment, ClusterConfig, ClusterSummary};
pub use types::{Difficulty, MissionRecord, PlayerRecord, PlayerRef};

#[derive(Debug, Clone, Default)]
pub struct PipelineOutput {
    pub missions: Vec<MissionRecord>,
    pub players: Vec<PlayerRecord>,
    pub assignment: ClusterAssignment,
}

/// Aggregates raw batches, clusters their mission names and decorates every
/// row. CPU bound; async callers run it on the blocking pool.
pub fn run<R: Rng + ?Sized>(batches: &[MapBatch], cfg: &ClusterConfig, rng: &mut R) -> PipelineOutput {
    let aggregated = aggregate::aggregate(batches);
    let names = aggregated.mission_names();
    let assignment = cluster::cluster_missions(&names, cfg);
    let resolver = theme::ThemeResolver::new(assignment);

    let mut missions = aggregated.missions;
    compose::decorate(&mut missions, &resolver, rng);

    tracing::info!(
        missions = missions.len(),
        players = aggregated.players.len(),
        unique_missions = names.len(),
        clusters = resolver.assignment().cluster_count(),
        "Pipeline run finished"
    );

    PipelineOutput {
        missions,
        players: aggregated.players,
        assignment: resolver.assignment().clone(),
    }
}
