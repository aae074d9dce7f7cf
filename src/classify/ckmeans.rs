/// Optimal 1-D k-means clustering (natural breaks by dynamic programming).
///
/// Partitions the finite entries of `values` into at most `k` clusters that are
/// contiguous in sorted order and minimize the total within-cluster sum of
/// squared deviations. Clusters are returned in ascending order, each non-empty
/// and sorted. When there are fewer distinct values than `k`, the number of
/// clusters drops to the distinct count; an empty input yields no clusters.
pub fn ckmeans(values: &[f64], k: usize) -> Vec<Vec<f64>> {
    let mut sorted = values.iter().copied()
        .filter(|v| v.is_finite())
        .collect::<Vec<_>>();
    sorted.sort_by(f64::total_cmp);

    if sorted.is_empty() || k == 0 { return Vec::new() }

    let distinct = 1 + sorted.windows(2).filter(|w| w[0] != w[1]).count();
    let k = k.min(distinct);
    if k == 1 { return vec![sorted] }

    let n = sorted.len();

    // Prefix sums give O(1) within-cluster cost for any contiguous range.
    let mut sum = vec![0.0; n + 1];
    let mut sum_sq = vec![0.0; n + 1];
    for (i, &v) in sorted.iter().enumerate() {
        sum[i + 1] = sum[i] + v;
        sum_sq[i + 1] = sum_sq[i] + v * v;
    }

    // Sum of squared deviations of sorted[j..=i].
    let ssq = |j: usize, i: usize| -> f64 {
        let count = (i - j + 1) as f64;
        let s = sum[i + 1] - sum[j];
        (sum_sq[i + 1] - sum_sq[j] - s * s / count).max(0.0)
    };

    // cost[c][i]: best cost of splitting sorted[0..=i] into c + 1 clusters.
    // first[c][i]: index where the last of those clusters begins.
    let mut cost = vec![vec![f64::INFINITY; n]; k];
    let mut first = vec![vec![0usize; n]; k];
    for i in 0..n { cost[0][i] = ssq(0, i) }

    for c in 1..k {
        for i in c..n {
            for j in c..=i {
                // Equal values never straddle a boundary.
                if sorted[j] == sorted[j - 1] { continue }
                let candidate = cost[c - 1][j - 1] + ssq(j, i);
                if candidate < cost[c][i] {
                    cost[c][i] = candidate;
                    first[c][i] = j;
                }
            }
        }
    }

    let mut clusters = Vec::with_capacity(k);
    let mut right = n - 1;
    for c in (0..k).rev() {
        let left = if c == 0 { 0 } else { first[c][right] };
        clusters.push(sorted[left..=right].to_vec());
        if c > 0 { right = left - 1 }
    }
    clusters.reverse();
    clusters
}
