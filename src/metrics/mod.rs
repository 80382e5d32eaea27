use crate::aggregate::mean;
use std::collections::BTreeMap;

/// Baseline time divided by the measured time.
pub fn speedup(baseline: f64, time: f64) -> f64 {
    baseline / time
}

/// Speedup divided by the number of workers.
pub fn efficiency(baseline: f64, time: f64, workers: u32) -> f64 {
    baseline / (time * workers as f64)
}

/// Averages `(workers, time)` pairs per worker count, ascending.
pub fn mean_by_workers(points: &[(u32, f64)]) -> Vec<(u32, f64)> {
    let mut groups: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
    for &(workers, time) in points {
        groups.entry(workers).or_default().push(time);
    }
    groups
        .into_iter()
        .filter_map(|(workers, times)| Some((workers, mean(times)?)))
        .collect()
}

/// Speedup curve against a fixed baseline.
pub fn speedup_curve(baseline: f64, points: &[(u32, f64)]) -> Vec<(u32, f64)> {
    mean_by_workers(points)
        .into_iter()
        .map(|(workers, time)| (workers, speedup(baseline, time)))
        .collect()
}

/// Efficiency curve against a fixed baseline.
pub fn efficiency_curve(baseline: f64, points: &[(u32, f64)]) -> Vec<(u32, f64)> {
    mean_by_workers(points)
        .into_iter()
        .map(|(workers, time)| (workers, efficiency(baseline, time, workers)))
        .collect()
}

/// Strong scalability: speedup of each node count over the 1-node time.
///
/// `points` are `(nodes, time)` pairs for one fixed problem size. Returns
/// `None` when there is no 1-node sample to normalise against.
pub fn strong_scaling(points: &[(u32, f64)]) -> Option<Vec<(u32, f64)>> {
    let grouped = mean_by_workers(points);
    let (_, t1) = grouped.iter().find(|(nodes, _)| *nodes == 1)?;
    let t1 = *t1;
    Some(
        grouped
            .into_iter()
            .map(|(nodes, time)| (nodes, speedup(t1, time)))
            .collect(),
    )
}

/// Powers of two up to and including `max_nodes`.
pub fn power_of_two_nodes(max_nodes: u32) -> Vec<u32> {
    std::iter::successors(Some(1u32), |n| n.checked_mul(2))
        .take_while(|&n| n <= max_nodes)
        .collect()
}

/// Weak scalability: time with `n` nodes on `base_size * n` elements divided
/// by the time with 1 node on `base_size` elements.
///
/// `points` are `(nodes, size, time)` triples. Only power-of-two node counts
/// are considered. Returns `None` when the 1-node sample is missing.
pub fn weak_scaling(points: &[(u32, u64, f64)], base_size: u64) -> Option<Vec<(u32, f64)>> {
    let max_nodes = points.iter().map(|&(nodes, _, _)| nodes).max()?;

    let mut times = Vec::new();
    for nodes in power_of_two_nodes(max_nodes) {
        let Some(scaled_size) = base_size.checked_mul(nodes as u64) else {
            break;
        };
        let matching = points
            .iter()
            .filter(|&&(n, size, _)| n == nodes && size == scaled_size)
            .map(|&(_, _, time)| time);
        if let Some(avg) = mean(matching) {
            times.push((nodes, avg));
        }
    }

    // Normalisation needs T(1)
    let &(first_nodes, t1) = times.first()?;
    if first_nodes != 1 {
        return None;
    }
    Some(times.into_iter().map(|(nodes, time)| (nodes, time / t1)).collect())
}
