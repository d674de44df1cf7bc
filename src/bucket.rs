//! Fixed-width year intervals.
//!
//! Years are assigned to half-open buckets `[lo, lo + interval)` whose bounds
//! are multiples of the interval, so every year falls inside exactly one
//! bucket. Missing or non-numeric years count as `0` and land in the bucket
//! starting at `0`, which is labelled `N/A`.

use itertools::Itertools;

use crate::{ConvertError, Result};

/// Label of the bucket holding missing years.
pub const MISSING_LABEL: &str = "N/A";

/// Rewrites `years` into interval labels such as `"1990-1995"`.
///
/// # Errors
///
/// Returns [`ConvertError::InvalidBucketInterval`] if `interval <= 1`, and
/// [`ConvertError::YearOutOfRange`] if a bucket bound does not fit in `i64`.
///
/// # Examples
///
/// ```
/// use refscores::bucket::bucketize;
///
/// let labels = bucketize(&[Some(1990), Some(1995), Some(2001), None], 5).unwrap();
/// assert_eq!(labels, vec!["1990-1995", "1995-2000", "2000-2005", "N/A"]);
/// ```
pub fn bucketize(years: &[Option<i64>], interval: i64) -> Result<Vec<String>> {
    if interval <= 1 {
        return Err(ConvertError::InvalidBucketInterval(interval));
    }

    let labels = years
        .iter()
        .map(|year| {
            let year = year.unwrap_or(0);
            label(year, interval)
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(
        interval,
        buckets = labels.iter().unique().count(),
        "computed year buckets"
    );
    Ok(labels)
}

/// Largest multiple of `interval` that is not greater than `year`.
fn lower_bound(year: i64, interval: i64) -> Result<i64> {
    year.div_euclid(interval)
        .checked_mul(interval)
        .ok_or(ConvertError::YearOutOfRange(year))
}

fn label(year: i64, interval: i64) -> Result<String> {
    let lo = lower_bound(year, interval)?;
    if lo == 0 {
        return Ok(MISSING_LABEL.to_string());
    }
    let hi = lo
        .checked_add(interval)
        .ok_or(ConvertError::YearOutOfRange(year))?;
    Ok(format!("{lo}-{hi}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_bucketize_five_years() {
        let labels = bucketize(&[Some(1990), Some(1995), Some(2001)], 5).unwrap();
        assert_eq!(labels, vec!["1990-1995", "1995-2000", "2000-2005"]);
    }

    #[test]
    fn test_lower_bound_is_multiple_of_interval() {
        assert_eq!(lower_bound(1993, 10).unwrap(), 1990);
        assert_eq!(lower_bound(1990, 5).unwrap(), 1990);
        assert_eq!(lower_bound(2004, 1000).unwrap(), 2000);
        assert_eq!(lower_bound(-3, 5).unwrap(), -5);
    }

    #[test]
    fn test_missing_and_zero_years_are_na() {
        let labels = bucketize(&[None, Some(0), Some(2010)], 10).unwrap();
        assert_eq!(labels, vec!["N/A", "N/A", "2010-2020"]);
    }

    #[test]
    fn test_every_year_gets_a_bucket() {
        let years: Vec<Option<i64>> = (1950..2030).map(Some).collect();
        let labels = bucketize(&years, 7).unwrap();
        assert_eq!(labels.len(), years.len());
        assert!(labels.iter().all(|l| l.contains('-')));
        assert_eq!(labels[0], "1946-1953");
    }

    #[test]
    fn test_invalid_interval() {
        assert!(matches!(
            bucketize(&[Some(2000)], 1),
            Err(ConvertError::InvalidBucketInterval(1))
        ));
    }

    #[test]
    fn test_empty_input() {
        assert!(bucketize(&[], 5).unwrap().is_empty());
    }

    #[test]
    fn test_large_year_does_not_allocate_per_bucket() {
        let labels = bucketize(&[None, Some(99_999_999_999)], 10).unwrap();
        assert_eq!(labels, vec!["N/A", "99999999990-100000000000"]);
    }

    #[test]
    fn test_bound_overflow_is_an_error() {
        assert!(matches!(
            bucketize(&[Some(2001), Some(i64::MAX - 1)], 5),
            Err(ConvertError::YearOutOfRange(year)) if year == i64::MAX - 1
        ));
        assert!(matches!(
            bucketize(&[Some(i64::MIN)], 3),
            Err(ConvertError::YearOutOfRange(i64::MIN))
        ));
    }
}
