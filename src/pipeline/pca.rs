//! Principal component reduction that keeps just enough components to explain
//! a target share of the variance.

const MAX_SWEEPS: usize = 100;
const OFF_DIAGONAL_EPS: f64 = 1e-12;
const ZERO_VARIANCE_EPS: f64 = 1e-18;

#[derive(Debug, Clone)]
pub struct Reduction {
    pub components: usize,
    pub explained_ratio: f64,
    pub rows: Vec<Vec<f64>>,
}

/// Projects `rows` onto the leading principal components whose cumulative
/// explained-variance ratio first exceeds `variance` (a share in `(0, 1]`).
pub fn reduce(rows: &[Vec<f64>], variance: f64) -> Reduction {
    let n = rows.len();
    let d = rows.first().map_or(0, Vec::len);
    if n == 0 || d == 0 {
        return Reduction {
            components: 0,
            explained_ratio: 0.0,
            rows: vec![Vec::new(); n],
        };
    }

    let centered = center(rows, d);

    // Decompose whichever of X·Xᵀ or Xᵀ·X is smaller; the non-zero spectra match.
    let use_gram = n <= d;
    let size = if use_gram { n } else { d };
    let mut m = vec![0.0; size * size];
    for i in 0..size {
        for j in i..size {
            let v = if use_gram {
                dot(&centered[i], &centered[j])
            } else {
                centered.iter().map(|r| r[i] * r[j]).sum()
            };
            m[i * size + j] = v;
            m[j * size + i] = v;
        }
    }

    let (values, vectors) = jacobi_eigen(m, size);
    let mut order: Vec<usize> = (0..size).collect();
    order.sort_by(|&a, &b| values[b].total_cmp(&values[a]));

    let total: f64 = values.iter().map(|v| v.max(0.0)).sum();
    if total <= ZERO_VARIANCE_EPS {
        return Reduction {
            components: 1,
            explained_ratio: 0.0,
            rows: vec![vec![0.0]; n],
        };
    }

    let target = variance.clamp(f64::MIN_POSITIVE, 1.0);
    let mut keep = 0;
    let mut cumulative = 0.0;
    for &idx in &order {
        let value = values[idx].max(0.0);
        if value <= ZERO_VARIANCE_EPS {
            break;
        }
        cumulative += value / total;
        keep += 1;
        if cumulative > target {
            break;
        }
    }
    let keep = keep.max(1);

    let projected = centered
        .iter()
        .enumerate()
        .map(|(i, row)| {
            order[..keep]
                .iter()
                .map(|&k| {
                    if use_gram {
                        vectors[i * size + k] * values[k].max(0.0).sqrt()
                    } else {
                        (0..d).map(|j| row[j] * vectors[j * size + k]).sum()
                    }
                })
                .collect()
        })
        .collect();

    Reduction {
        components: keep,
        explained_ratio: cumulative.min(1.0),
        rows: projected,
    }
}

fn center(rows: &[Vec<f64>], d: usize) -> Vec<Vec<f64>> {
    let n = rows.len() as f64;
    let mut mean = vec![0.0; d];
    for row in rows {
        for (m, x) in mean.iter_mut().zip(row) {
            *m += x;
        }
    }
    mean.iter_mut().for_each(|m| *m /= n);
    rows.iter()
        .map(|row| row.iter().zip(&mean).map(|(x, m)| x - m).collect())
        .collect()
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Cyclic Jacobi rotations on a symmetric `n×n` matrix stored row-major.
/// Returns eigenvalues and the eigenvector matrix (eigenvectors in columns).
fn jacobi_eigen(mut a: Vec<f64>, n: usize) -> (Vec<f64>, Vec<f64>) {
    let mut v = vec![0.0; n * n];
    for i in 0..n {
        v[i * n + i] = 1.0;
    }

    let scale: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt().max(1.0);

    for _ in 0..MAX_SWEEPS {
        let off: f64 = (0..n)
            .flat_map(|p| ((p + 1)..n).map(move |q| (p, q)))
            .map(|(p, q)| a[p * n + q] * a[p * n + q])
            .sum();
        if off.sqrt() <= OFF_DIAGONAL_EPS * scale {
            break;
        }

        for p in 0..n {
            for q in (p + 1)..n {
                let apq = a[p * n + q];
                if apq.abs() <= f64::MIN_POSITIVE {
                    continue;
                }
                let theta = (a[q * n + q] - a[p * n + p]) / (2.0 * apq);
                let sign = if theta >= 0.0 { 1.0 } else { -1.0 };
                let t = sign / (theta.abs() + (theta * theta + 1.0).sqrt());
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;

                for k in 0..n {
                    let akp = a[k * n + p];
                    let akq = a[k * n + q];
                    a[k * n + p] = c * akp - s * akq;
                    a[k * n + q] = s * akp + c * akq;
                }
                for k in 0..n {
                    let apk = a[p * n + k];
                    let aqk = a[q * n + k];
                    a[p * n + k] = c * apk - s * aqk;
                    a[q * n + k] = s * apk + c * aqk;
                }
                for k in 0..n {
                    let vkp = v[k * n + p];
                    let vkq = v[k * n + q];
                    v[k * n + p] = c * vkp - s * vkq;
                    v[k * n + q] = s * vkp + c * vkq;
                }
            }
        }
    }

    let values = (0..n).map(|i| a[i * n + i]).collect();
    (values, v)
}
