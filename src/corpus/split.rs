// Ordered train/validation split.

use anyhow::Result;

/// Fraction of rows used for training when none is configured.
pub const DEFAULT_TRAIN_RATIO: f64 = 0.8;

/// Split `rows` in order: the first `ceil(len * ratio)` go to training, the
/// rest to validation. No shuffling, so the split is reproducible.
pub fn split_train_validation<T>(mut rows: Vec<T>, ratio: f64) -> Result<(Vec<T>, Vec<T>)> {
    if !(ratio > 0.0 && ratio <= 1.0) {
        anyhow::bail!("train ratio must be in (0, 1], got {ratio}");
    }

    let split_index = split_index(rows.len(), ratio);
    let validation = rows.split_off(split_index);
    Ok((rows, validation))
}

/// Index of the first validation row.
pub fn split_index(len: usize, ratio: f64) -> usize {
    ((len as f64 * ratio).ceil() as usize).min(len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_rounds_up() {
        // ceil(5574 * 0.8) = 4460 (4459.2 rounded up)
        assert_eq!(split_index(5574, 0.8), 4460);
        assert_eq!(split_index(10, 0.8), 8);
        assert_eq!(split_index(3, 0.5), 2);
    }

    #[test]
    fn test_split_preserves_order() {
        let (train, val) = split_train_validation((0..10).collect(), 0.8).unwrap();
        assert_eq!(train, (0..8).collect::<Vec<_>>());
        assert_eq!(val, vec![8, 9]);
    }

    #[test]
    fn test_ratio_one_puts_everything_in_train() {
        let (train, val) = split_train_validation(vec!['a', 'b'], 1.0).unwrap();
        assert_eq!(train.len(), 2);
        assert!(val.is_empty());
    }

    #[test]
    fn test_invalid_ratio() {
        assert!(split_train_validation(vec![1], 0.0).is_err());
        assert!(split_train_validation(vec![1], 1.5).is_err());
        assert!(split_train_validation(vec![1], f64::NAN).is_err());
    }

    #[test]
    fn test_empty_input() {
        let (train, val) = split_train_validation(Vec::<u8>::new(), 0.8).unwrap();
        assert!(train.is_empty() && val.is_empty());
    }
}
