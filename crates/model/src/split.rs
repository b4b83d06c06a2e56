use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Row indices of a shuffled train/test split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Number of test rows for `n` rows: `ceil(test_fraction * n)`, clamped to `n`.
#[must_use]
pub fn test_size(n: usize, test_fraction: f64) -> usize {
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    let size = (test_fraction.clamp(0.0, 1.0) * n as f64).ceil() as usize;
    size.min(n)
}

/// Shuffles `0..n` with a seeded generator and splits off the test share.
///
/// The same `(n, test_fraction, seed)` always yields the same split.
#[must_use]
pub fn train_test_split(n: usize, test_fraction: f64, seed: u64) -> SplitIndices {
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let train = indices.split_off(test_size(n, test_fraction));
    SplitIndices {
        train,
        test: indices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_rounds_up() {
        assert_eq!(test_size(10, 0.2), 2);
        assert_eq!(test_size(11, 0.2), 3);
        assert_eq!(test_size(1, 0.2), 1);
        assert_eq!(test_size(0, 0.2), 0);
        assert_eq!(test_size(5, 1.5), 5);
    }

    #[test]
    fn split_is_a_partition() {
        let split = train_test_split(25, 0.2, 42);
        assert_eq!(split.test.len(), 5);
        assert_eq!(split.train.len(), 20);

        let mut all: Vec<usize> = split.train.iter().chain(&split.test).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..25).collect::<Vec<_>>());
    }

    #[test]
    fn same_seed_same_split() {
        assert_eq!(train_test_split(50, 0.2, 42), train_test_split(50, 0.2, 42));
        assert_ne!(
            train_test_split(50, 0.2, 42).test,
            train_test_split(50, 0.2, 7).test
        );
    }
}
