use crate::aggregate::mean;
use crate::chart::{Figure, Panel, Reference, Series};
use crate::metrics::{efficiency_curve, power_of_two_nodes, speedup_curve, strong_scaling, weak_scaling};
use crate::parser::mergesort::{DistributedSort, ParallelSort, SequentialSort};
use std::collections::BTreeSet;

/// Distinct payloads, ascending.
fn payloads<I: IntoIterator<Item = u32>>(values: I) -> BTreeSet<u32> {
    values.into_iter().collect()
}

/// Per-payload curves of parallel runs against the sequential mean at `size`.
fn parallel_curves<F>(parallel: &[ParallelSort], sequential: &[SequentialSort], size: u64, metric: F) -> Option<Vec<Series>>
where
    F: Fn(f64, &[(u32, f64)]) -> Vec<(u32, f64)>,
{
    // Filter data for the selected size
    let par: Vec<&ParallelSort> = parallel.iter().filter(|r| r.size == size).collect();
    let seq: Vec<&SequentialSort> = sequential.iter().filter(|r| r.size == size).collect();
    if par.is_empty() || seq.is_empty() {
        log::warn!("No data found for size {}", size);
        return None;
    }

    let mut series = Vec::new();
    for payload in payloads(par.iter().map(|r| r.payload)) {
        let Some(seq_time) = mean(seq.iter().filter(|r| r.payload == payload).map(|r| r.time)) else {
            log::warn!("No sequential run for size {} and payload {}", size, payload);
            continue;
        };
        let points: Vec<(u32, f64)> = par
            .iter()
            .filter(|r| r.payload == payload)
            .map(|r| (r.threads, r.time))
            .collect();
        series.push(Series::new(format!("Payload {}", payload), &metric(seq_time, &points)));
    }
    Some(series)
}

/// Speedup of the parallel mergesort over the sequential one at a fixed size,
/// one series per payload.
pub fn parallel_speedup_by_payload(
    parallel: &[ParallelSort],
    sequential: &[SequentialSort],
    size: u64,
    ideal: bool,
) -> Figure {
    let Some(series) = parallel_curves(parallel, sequential, size, speedup_curve) else {
        return Figure::default();
    };

    let mut panel = Panel::new("Speedup", "Number of Threads", "Speedup");
    panel.series = series;
    if ideal {
        // Ideal linear speedup from 1 to the largest thread count
        let max_threads = parallel.iter().filter(|r| r.size == size).map(|r| r.threads).max().unwrap_or(1);
        panel.references.push(Reference::Identity {
            from: 1.0,
            to: max_threads as f64,
            label: "Ideal speedup (y=x)".to_string(),
        });
    }
    Figure::single(panel)
}

/// Efficiency (`speedup / threads`) of the parallel mergesort at a fixed size.
pub fn parallel_efficiency_by_payload(parallel: &[ParallelSort], sequential: &[SequentialSort], size: u64) -> Figure {
    let Some(series) = parallel_curves(parallel, sequential, size, efficiency_curve) else {
        return Figure::default();
    };

    let mut panel = Panel::new("Parallel Efficiency (1 Node)", "Number of Threads", "Efficiency");
    panel.series = series;
    Figure::single(panel)
}

/// Strong scalability of the distributed mergesort: speedup over the 1-node
/// time at fixed size and threads per node.
pub fn strong_scalability_by_payload(distributed: &[DistributedSort], size: u64, threads: u32, ideal: bool) -> Figure {
    let runs: Vec<&DistributedSort> = distributed
        .iter()
        .filter(|r| r.size == size && r.threads == threads)
        .collect();
    if runs.is_empty() {
        log::warn!("No distributed data found for size {} and threads {}", size, threads);
        return Figure::default();
    }

    let mut panel = Panel::new("Strong Scalability (Distributed)", "Number of Nodes", "Speedup (T1 / Tp)");
    for payload in payloads(runs.iter().map(|r| r.payload)) {
        let points: Vec<(u32, f64)> = runs
            .iter()
            .filter(|r| r.payload == payload)
            .map(|r| (r.nodes, r.time))
            .collect();
        match strong_scaling(&points) {
            Some(curve) => panel.series.push(Series::new(format!("Payload {}", payload), &curve)),
            None => log::warn!("No 1-node run for payload {}, cannot compute speedup", payload),
        }
    }

    if ideal {
        let max_nodes = runs.iter().map(|r| r.nodes).max().unwrap_or(1);
        panel.references.push(Reference::Identity {
            from: 1.0,
            to: max_nodes as f64,
            label: "Ideal speedup (linear)".to_string(),
        });
    }
    Figure::single(panel)
}

/// Weak scalability of the distributed mergesort: problem size grows with the
/// node count (`base_size * nodes`), time is normalised by the 1-node time.
pub fn weak_scalability_by_payload(distributed: &[DistributedSort], base_size: u64, threads: u32, ideal: bool) -> Figure {
    let runs: Vec<&DistributedSort> = distributed.iter().filter(|r| r.threads == threads).collect();
    let Some(max_nodes) = runs.iter().map(|r| r.nodes).max() else {
        log::warn!("No data found with threads={}", threads);
        return Figure::default();
    };

    let mut panel = Panel::new(
        "Weak Scalability (Distributed)",
        "Number of Nodes (Problem Size in Millions)",
        "Normalized Time (Tp / T1)",
    );
    for payload in payloads(runs.iter().map(|r| r.payload)) {
        let points: Vec<(u32, u64, f64)> = runs
            .iter()
            .filter(|r| r.payload == payload)
            .map(|r| (r.nodes, r.size, r.time))
            .collect();
        match weak_scaling(&points, base_size) {
            Some(curve) => panel.series.push(Series::new(format!("Payload {}", payload), &curve)),
            None => log::warn!("No 1-node run of size {} for payload {}, skipping", base_size, payload),
        }
    }

    // Tick labels carry the problem size of each node count
    let nodes = power_of_two_nodes(max_nodes);
    panel.x_ticks = nodes
        .iter()
        .filter_map(|&n| {
            let size = base_size.checked_mul(n as u64)?;
            Some((n as f64, format!("{} ({}M)", n, size / 1_000_000)))
        })
        .collect();

    if ideal {
        panel.references.push(Reference::Horizontal {
            y: 1.0,
            label: "Ideal (constant time)".to_string(),
        });
    }
    Figure::single(panel)
}
