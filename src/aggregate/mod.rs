use std::collections::BTreeMap;

/// A benchmark observation carrying one elapsed time.
pub trait Sample {
    /// Elapsed time in seconds.
    fn time(&self) -> f64;

    /// Replaces the elapsed time (used to store averages).
    fn set_time(&mut self, time: f64);
}

/// Arithmetic mean of `values`, `None` when there are none.
pub fn mean<I: IntoIterator<Item = f64>>(values: I) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Collapses repeated runs: one row per distinct `key`, with the time replaced
/// by the mean over every row sharing that key.
///
/// Rows come out in ascending key order. Fields outside the key are taken
/// from the first row of each group.
pub fn aggregate_by_mean<R, K, F>(rows: &[R], key: F) -> Vec<R>
where
    R: Sample + Clone,
    K: Ord,
    F: Fn(&R) -> K,
{
    // Group rows by key
    let mut groups: BTreeMap<K, (R, f64, usize)> = BTreeMap::new();
    for row in rows {
        groups
            .entry(key(row))
            .and_modify(|(_, sum, count)| {
                *sum += row.time();
                *count += 1;
            })
            .or_insert_with(|| (row.clone(), row.time(), 1));
    }

    // Store the averaged time in the representative row
    groups
        .into_values()
        .map(|(mut representative, sum, count)| {
            representative.set_time(sum / count as f64);
            representative
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[derive(Debug, Clone, PartialEq)]
    struct Run {
        workers: u32,
        label: &'static str,
        time: f64,
    }

    impl Sample for Run {
        fn time(&self) -> f64 {
            self.time
        }

        fn set_time(&mut self, time: f64) {
            self.time = time;
        }
    }

    fn run(workers: u32, label: &'static str, time: f64) -> Run {
        Run { workers, label, time }
    }

    fn sample_runs() -> Vec<Run> {
        vec![
            run(4, "a", 2.0),
            run(1, "a", 8.0),
            run(4, "a", 4.0),
            run(1, "b", 10.0),
            run(1, "a", 6.0),
        ]
    }

    #[test]
    fn averages_each_group() {
        let aggregated = aggregate_by_mean(&sample_runs(), |r| (r.workers, r.label));
        assert_eq!(
            aggregated,
            vec![run(1, "a", 7.0), run(1, "b", 10.0), run(4, "a", 3.0)]
        );
    }

    #[test]
    fn aggregation_is_idempotent() {
        let once = aggregate_by_mean(&sample_runs(), |r| (r.workers, r.label));
        let twice = aggregate_by_mean(&once, |r| (r.workers, r.label));
        assert_eq!(once, twice);
    }

    #[test]
    fn keeps_exactly_the_input_groups() {
        let runs = sample_runs();
        let input: BTreeSet<_> = runs.iter().map(|r| r.workers).collect();
        let output: Vec<_> = aggregate_by_mean(&runs, |r| r.workers)
            .iter()
            .map(|r| r.workers)
            .collect();
        assert_eq!(output, input.into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn mean_of_nothing() {
        assert_eq!(mean(Vec::new()), None);
        assert_eq!(mean(vec![1.0, 2.0, 6.0]), Some(3.0));
    }
}
