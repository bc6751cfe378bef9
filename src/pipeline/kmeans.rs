//! Lloyd k-means with k-means++ seeding and several restarts; the run with the
//! lowest inertia wins.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const MAX_ITER: usize = 300;
const TOLERANCE: f64 = 1e-4;

#[derive(Debug, Clone)]
pub struct KMeansConfig {
    pub k: usize,
    pub n_init: usize,
    pub seed: u64,
}

#[derive(Debug, Clone)]
pub struct KMeans {
    pub k: usize,
    pub assignments: Vec<usize>,
    pub centroids: Vec<Vec<f64>>,
    pub inertia: f64,
}

impl KMeans {
    /// Fits `points`. The cluster count is clamped to the number of distinct
    /// points, so degenerate batches (0 or 1 mission) never fail.
    pub fn fit(points: &[Vec<f64>], cfg: &KMeansConfig) -> Self {
        let k = cfg.k.min(distinct_count(points));
        if k == 0 {
            return Self {
                k: 0,
                assignments: vec![0; points.len()],
                centroids: Vec::new(),
                inertia: 0.0,
            };
        }

        let mut rng = StdRng::seed_from_u64(cfg.seed);
        let mut best: Option<KMeans> = None;
        for _ in 0..cfg.n_init.max(1) {
            let run = lloyd(points, k, &mut rng);
            if best.as_ref().map_or(true, |b| run.inertia < b.inertia) {
                best = Some(run);
            }
        }
        best.unwrap_or_else(|| lloyd(points, k, &mut rng))
    }
}

fn lloyd(points: &[Vec<f64>], k: usize, rng: &mut StdRng) -> KMeans {
    let mut centroids = plus_plus_init(points, k, rng);
    let k = centroids.len();
    let mut assignments = vec![0usize; points.len()];

    for _ in 0..MAX_ITER {
        for (i, p) in points.iter().enumerate() {
            assignments[i] = nearest(p, &centroids).0;
        }

        let dim = centroids[0].len();
        let mut sums = vec![vec![0.0; dim]; k];
        let mut counts = vec![0usize; k];
        for (p, &c) in points.iter().zip(&assignments) {
            counts[c] += 1;
            for (s, x) in sums[c].iter_mut().zip(p) {
                *s += x;
            }
        }

        let mut shift = 0.0;
        for c in 0..k {
            if counts[c] == 0 {
                // Re-seed an empty cluster on the point farthest from its centroid.
                if let Some(far) = farthest_point(points, &assignments, &centroids) {
                    shift += sq_dist(&centroids[c], &points[far]);
                    centroids[c] = points[far].clone();
                    assignments[far] = c;
                }
                continue;
            }
            let n = counts[c] as f64;
            let updated: Vec<f64> = sums[c].iter().map(|s| s / n).collect();
            shift += sq_dist(&centroids[c], &updated);
            centroids[c] = updated;
        }

        if shift <= TOLERANCE * TOLERANCE {
            break;
        }
    }

    let mut inertia = 0.0;
    for (i, p) in points.iter().enumerate() {
        let (c, d) = nearest(p, &centroids);
        assignments[i] = c;
        inertia += d;
    }

    KMeans {
        k,
        assignments,
        centroids,
        inertia,
    }
}

fn plus_plus_init(points: &[Vec<f64>], k: usize, rng: &mut StdRng) -> Vec<Vec<f64>> {
    let mut centroids = Vec::with_capacity(k);
    centroids.push(points[rng.gen_range(0..points.len())].clone());

    while centroids.len() < k {
        let weights: Vec<f64> = points.iter().map(|p| nearest(p, &centroids).1).collect();
        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            break;
        }
        let mut target = rng.gen::<f64>() * total;
        let mut chosen = None;
        for (i, w) in weights.iter().enumerate() {
            if *w <= 0.0 {
                continue;
            }
            chosen = Some(i);
            if target < *w {
                break;
            }
            target -= w;
        }
        match chosen {
            Some(i) => centroids.push(points[i].clone()),
            None => break,
        }
    }
    centroids
}

fn nearest(p: &[f64], centroids: &[Vec<f64>]) -> (usize, f64) {
    centroids
        .iter()
        .enumerate()
        .map(|(i, c)| (i, sq_dist(p, c)))
        .fold((0, f64::INFINITY), |best, cur| if cur.1 < best.1 { cur } else { best })
}

fn farthest_point(points: &[Vec<f64>], assignments: &[usize], centroids: &[Vec<f64>]) -> Option<usize> {
    points
        .iter()
        .zip(assignments)
        .enumerate()
        .map(|(i, (p, &c))| (i, sq_dist(p, &centroids[c])))
        .filter(|(_, d)| *d > 0.0)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

fn sq_dist(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

fn distinct_count(points: &[Vec<f64>]) -> usize {
    let mut seen: Vec<&Vec<f64>> = Vec::new();
    for p in points {
        if !seen.iter().any(|s| *s == p) {
            seen.push(p);
        }
    }
    seen.len()
}
