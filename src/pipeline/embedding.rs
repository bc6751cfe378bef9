//! Local skip-gram (hierarchical softmax plus negative sampling) trained on the
//! mission-name batch itself.
//! Every token of the batch ends up in the vocabulary, so lookups for the same
//! batch never miss.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::normalize::tokenize;

const UNIGRAM_POWER: f64 = 0.75;
const MAX_EXP: f64 = 6.0;

#[derive(Debug, Clone)]
pub struct SkipGramConfig {
    pub vector_size: usize,
    pub window: usize,
    pub epochs: usize,
    pub alpha: f64,
    pub min_alpha: f64,
    pub negative: usize,
    /// Also train through a Huffman-coded hierarchical softmax.
    pub hs: bool,
    pub sample: f64,
    pub seed: Option<u64>,
}

impl Default for SkipGramConfig {
    fn default() -> Self {
        Self {
            vector_size: 200,
            window: 20,
            epochs: 20,
            alpha: 0.03,
            min_alpha: 0.0007,
            negative: 5,
            hs: true,
            sample: 1e-3,
            seed: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WordVectors {
    dim: usize,
    index: HashMap<String, usize>,
    vectors: Vec<f64>,
}

impl WordVectors {
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn get(&self, token: &str) -> Option<&[f64]> {
        let idx = *self.index.get(token)?;
        Some(&self.vectors[idx * self.dim..(idx + 1) * self.dim])
    }

    /// Mean of the known token vectors of `name`; all zeros when none are known.
    pub fn mission_vector(&self, name: &str) -> Vec<f64> {
        let mut acc = vec![0.0; self.dim];
        let mut count = 0usize;
        for token in tokenize(name) {
            if let Some(v) = self.get(&token) {
                for (a, x) in acc.iter_mut().zip(v) {
                    *a += x;
                }
                count += 1;
            }
        }
        if count > 0 {
            let n = count as f64;
            acc.iter_mut().for_each(|a| *a /= n);
        }
        acc
    }
}

struct Vocabulary {
    index: HashMap<String, usize>,
    counts: Vec<u64>,
}

impl Vocabulary {
    fn build(sentences: &[Vec<String>]) -> Self {
        let mut index = HashMap::new();
        let mut counts = Vec::new();
        for token in sentences.iter().flatten() {
            let next = counts.len();
            let idx = *index.entry(token.clone()).or_insert(next);
            if idx == next {
                counts.push(0);
            }
            counts[idx] += 1;
        }
        Self { index, counts }
    }

    fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Probability of keeping one occurrence under frequent-word subsampling.
    fn keep_probability(&self, idx: usize, sample: f64) -> f64 {
        if sample <= 0.0 {
            return 1.0;
        }
        let threshold = sample * self.total() as f64;
        let count = self.counts[idx] as f64;
        ((count / threshold).sqrt() + 1.0) * threshold / count
    }
}

/// Huffman path of one vocabulary entry: inner-node ids from the root down and
/// the branch taken at each.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct HuffmanPath {
    points: Vec<usize>,
    codes: Vec<u8>,
}

/// Huffman tree over token counts; frequent tokens get shorter paths. Fewer
/// than two tokens leave every path empty.
fn huffman_paths(counts: &[u64]) -> Vec<HuffmanPath> {
    let n = counts.len();
    let mut paths = vec![HuffmanPath::default(); n];
    if n < 2 {
        return paths;
    }

    let mut heap: BinaryHeap<Reverse<(u64, usize)>> = counts
        .iter()
        .enumerate()
        .map(|(i, &c)| Reverse((c, i)))
        .collect();
    let mut parent = vec![0usize; 2 * n - 1];
    let mut branch = vec![0u8; 2 * n - 1];
    let mut next = n;
    while heap.len() > 1 {
        let (Some(Reverse((c1, a))), Some(Reverse((c2, b)))) = (heap.pop(), heap.pop()) else {
            break;
        };
        parent[a] = next;
        parent[b] = next;
        branch[b] = 1;
        heap.push(Reverse((c1 + c2, next)));
        next += 1;
    }

    let root = 2 * n - 2;
    for (leaf, path) in paths.iter_mut().enumerate() {
        let mut node = leaf;
        while node != root {
            path.codes.push(branch[node]);
            path.points.push(parent[node] - n);
            node = parent[node];
        }
        path.codes.reverse();
        path.points.reverse();
    }
    paths
}

pub fn tokenize_batch(names: &[String]) -> Vec<Vec<String>> {
    names.iter().map(|n| tokenize(n).collect()).collect()
}

/// Trains token vectors over `sentences`.
pub fn train(sentences: &[Vec<String>], cfg: &SkipGramConfig) -> WordVectors {
    let vocab = Vocabulary::build(sentences);
    let dim = cfg.vector_size.max(1);
    let words = vocab.counts.len();

    let mut rng = match cfg.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let bound = 0.5 / dim as f64;
    let mut syn0: Vec<f64> = (0..words * dim)
        .map(|_| rng.gen_range(-bound..bound))
        .collect();
    let mut syn1neg = vec![0.0; words * dim];
    let mut syn1 = vec![0.0; words * dim];

    if words == 0 {
        return WordVectors {
            dim,
            index: vocab.index,
            vectors: syn0,
        };
    }

    let paths = if cfg.hs {
        huffman_paths(&vocab.counts)
    } else {
        Vec::new()
    };

    let noise = WeightedIndex::new(
        vocab
            .counts
            .iter()
            .map(|&c| (c as f64).powf(UNIGRAM_POWER)),
    )
    .ok();

    let encoded: Vec<Vec<usize>> = sentences
        .iter()
        .map(|s| s.iter().map(|t| vocab.index[t]).collect())
        .collect();

    let total_steps = (cfg.epochs.max(1) as u64 * vocab.total()).max(1) as f64;
    let mut processed = 0u64;
    let mut neu1e = vec![0.0; dim];
    // One positive draw plus the negatives; none at all when negative sampling is off.
    let negative_draws = if cfg.negative > 0 { cfg.negative + 1 } else { 0 };

    for _ in 0..cfg.epochs {
        for sentence in &encoded {
            let kept: Vec<usize> = sentence
                .iter()
                .copied()
                .filter(|&w| {
                    let p = vocab.keep_probability(w, cfg.sample);
                    p >= 1.0 || rng.gen::<f64>() < p
                })
                .collect();
            processed += sentence.len() as u64;

            let progress = processed as f64 / total_steps;
            let alpha = (cfg.alpha - (cfg.alpha - cfg.min_alpha) * progress).max(cfg.min_alpha);

            for (pos, &center) in kept.iter().enumerate() {
                let reduced = if cfg.window > 0 {
                    rng.gen_range(0..cfg.window)
                } else {
                    0
                };
                let span = cfg.window - reduced;
                let start = pos.saturating_sub(span);
                let end = (pos + span).min(kept.len().saturating_sub(1));

                for (ctx_pos, &context) in kept.iter().enumerate().take(end + 1).skip(start) {
                    if ctx_pos == pos {
                        continue;
                    }
                    neu1e.iter_mut().for_each(|x| *x = 0.0);
                    let l1 = context * dim;

                    if let Some(path) = paths.get(center) {
                        for (&point, &code) in path.points.iter().zip(&path.codes) {
                            let l2 = point * dim;
                            let f: f64 = (0..dim).map(|i| syn0[l1 + i] * syn1[l2 + i]).sum();
                            let g = (1.0 - f64::from(code) - sigmoid(f)) * alpha;
                            for i in 0..dim {
                                neu1e[i] += g * syn1[l2 + i];
                                syn1[l2 + i] += g * syn0[l1 + i];
                            }
                        }
                    }

                    for d in 0..negative_draws {
                        let (target, label) = if d == 0 {
                            (center, 1.0)
                        } else {
                            match &noise {
                                Some(dist) => {
                                    let t = dist.sample(&mut rng);
                                    if t == center {
                                        continue;
                                    }
                                    (t, 0.0)
                                }
                                None => continue,
                            }
                        };
                        let l2 = target * dim;
                        let f: f64 = (0..dim).map(|i| syn0[l1 + i] * syn1neg[l2 + i]).sum();
                        let g = (label - sigmoid(f)) * alpha;
                        for i in 0..dim {
                            neu1e[i] += g * syn1neg[l2 + i];
                            syn1neg[l2 + i] += g * syn0[l1 + i];
                        }
                    }

                    for i in 0..dim {
                        syn0[l1 + i] += neu1e[i];
                    }
                }
            }
        }
    }

    WordVectors {
        dim,
        index: vocab.index,
        vectors: syn0,
    }
}

fn sigmoid(x: f64) -> f64 {
    let x = x.clamp(-MAX_EXP, MAX_EXP);
    1.0 / (1.0 + (-x).exp())
}
