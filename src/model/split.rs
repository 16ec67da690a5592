//! Stratified train/test splitting.

use std::collections::BTreeMap;
use std::fmt::Display;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::error::{Result, SentixError};

/// Row indices of the two partitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainTestSplit {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Split `labels` into train and test partitions preserving class proportions.
///
/// The test partition holds `ceil(test_size * n)` rows. Each class
/// contributes the floor of its proportional share; the rows left over go to
/// the classes with the largest fractional remainders. Row choice within a
/// class and the final order of both partitions are shuffled with a
/// generator seeded by `seed`.
pub fn stratified_split<L>(labels: &[L], test_size: f64, seed: u64) -> Result<TrainTestSplit>
where
    L: Ord + Copy + Display,
{
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(SentixError::input(format!(
            "test_size must be in (0, 1), got {test_size}"
        )));
    }

    let n = labels.len();
    let n_test = (test_size * n as f64).ceil() as usize;
    let n_train = n.saturating_sub(n_test);
    if n_test == 0 || n_train == 0 {
        return Err(SentixError::data(format!(
            "cannot split {n} rows with test_size {test_size}: a partition would be empty"
        )));
    }

    let mut by_class: BTreeMap<L, Vec<usize>> = BTreeMap::new();
    for (i, &label) in labels.iter().enumerate() {
        by_class.entry(label).or_default().push(i);
    }

    if let Some((label, rows)) = by_class.iter().find(|(_, rows)| rows.len() < 2) {
        return Err(SentixError::data(format!(
            "class `{label}` has only {} member; every class needs at least 2 for a stratified split",
            rows.len()
        )));
    }

    let n_classes = by_class.len();
    if n_test < n_classes || n_train < n_classes {
        return Err(SentixError::data(format!(
            "train size {n_train} and test size {n_test} must each be at least the number of classes ({n_classes})"
        )));
    }

    let counts: Vec<usize> = by_class.values().map(Vec::len).collect();
    let test_counts = allocate(&counts, n_test);

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::with_capacity(n_train);
    let mut test = Vec::with_capacity(n_test);
    for (mut rows, take) in by_class.into_values().zip(test_counts) {
        rows.shuffle(&mut rng);
        test.extend_from_slice(&rows[..take]);
        train.extend_from_slice(&rows[take..]);
    }
    train.shuffle(&mut rng);
    test.shuffle(&mut rng);

    Ok(TrainTestSplit { train, test })
}

/// Distribute `total` draws over classes proportionally to `counts`.
fn allocate(counts: &[usize], total: usize) -> Vec<usize> {
    let n: usize = counts.iter().sum();
    let mut shares: Vec<usize> = Vec::with_capacity(counts.len());
    let mut remainders: Vec<(usize, usize)> = Vec::with_capacity(counts.len());

    for (class, &count) in counts.iter().enumerate() {
        let exact = count * total;
        shares.push(exact / n);
        remainders.push((exact % n, class));
    }

    let assigned: usize = shares.iter().sum();
    // Largest remainder first; larger classes, then lower class index, win ties.
    remainders.sort_by(|a, b| {
        b.0.cmp(&a.0)
            .then(counts[b.1].cmp(&counts[a.1]))
            .then(a.1.cmp(&b.1))
    });
    for &(_, class) in remainders.iter().take(total - assigned) {
        shares[class] += 1;
    }

    shares
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(spec: &[(&'static str, usize)]) -> Vec<&'static str> {
        spec.iter()
            .flat_map(|&(label, count)| std::iter::repeat_n(label, count))
            .collect()
    }

    #[test]
    fn test_partition_sizes_and_proportions() {
        let labels = labels(&[("negative", 10), ("neutral", 50), ("positive", 40)]);
        let split = stratified_split(&labels, 0.2, 42).unwrap();

        assert_eq!(split.test.len(), 20);
        assert_eq!(split.train.len(), 80);

        let count = |rows: &[usize], label: &str| rows.iter().filter(|&&i| labels[i] == label).count();
        assert_eq!(count(&split.test, "negative"), 2);
        assert_eq!(count(&split.test, "neutral"), 10);
        assert_eq!(count(&split.test, "positive"), 8);
    }

    #[test]
    fn test_partitions_cover_all_rows_once() {
        let labels = labels(&[("a", 7), ("b", 5), ("c", 3)]);
        let split = stratified_split(&labels, 0.2, 1).unwrap();

        let mut all: Vec<usize> = split.train.iter().chain(&split.test).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..labels.len()).collect::<Vec<_>>());
        assert_eq!(split.test.len(), 3);
    }

    #[test]
    fn test_same_seed_same_split() {
        let labels = labels(&[("a", 30), ("b", 20), ("c", 9)]);

        let first = stratified_split(&labels, 0.2, 42).unwrap();
        let second = stratified_split(&labels, 0.2, 42).unwrap();
        let other = stratified_split(&labels, 0.2, 7).unwrap();

        assert_eq!(first, second);
        assert_ne!(first, other);
    }

    #[test]
    fn test_singleton_class_is_named() {
        let labels = labels(&[("negative", 1), ("neutral", 10), ("positive", 10)]);
        let err = stratified_split(&labels, 0.2, 42).unwrap_err();

        assert!(err.is_data_error());
        assert!(err.to_string().contains("negative"));
    }

    #[test]
    fn test_too_small_partitions() {
        let labels = labels(&[("a", 2), ("b", 2), ("c", 2)]);
        let err = stratified_split(&labels, 0.2, 42).unwrap_err();
        assert!(err.is_data_error());

        assert!(stratified_split(&["a"], 0.2, 42).is_err());
        assert!(stratified_split(&labels, 1.5, 42).is_err());
    }

    #[test]
    fn test_allocate_largest_remainder() {
        assert_eq!(allocate(&[10, 50, 40], 20), vec![2, 10, 8]);
        assert_eq!(allocate(&[7, 5, 3], 3), vec![1, 1, 1]);
        assert_eq!(allocate(&[2, 2], 1), vec![1, 0]);
    }
}
