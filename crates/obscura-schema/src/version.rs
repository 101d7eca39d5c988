//! Dotted version ordering.
//!
//! Versions such as `2.1.4` or an OS release like `9.3.5` are compared
//! segment by segment as unsigned integers. A missing trailing segment
//! counts as `0` and so does a segment that does not parse, so `1.2` and
//! `1.2.0` are equal and `10.0` sorts after `9.9`.

use std::cmp::Ordering;

/// OS version used when a caller wants every version regardless of floor.
pub const ANY_OS_VERSION: &str = "99999999";

fn segment(part: &str) -> u64 {
    part.parse::<u64>().unwrap_or(0)
}

/// Compare two dotted version strings numerically.
///
/// # Example
///
/// ```
/// use std::cmp::Ordering;
/// use obscura_schema::version::compare;
///
/// assert_eq!(compare("10.0", "9.9"), Ordering::Greater);
/// assert_eq!(compare("1.2", "1.2.0"), Ordering::Equal);
/// ```
pub fn compare(a: &str, b: &str) -> Ordering {
    let mut left = a.split('.');
    let mut right = b.split('.');

    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (l, r) => {
                let lv = l.map_or(0, segment);
                let rv = r.map_or(0, segment);
                match lv.cmp(&rv) {
                    Ordering::Equal => {}
                    other => return other,
                }
            }
        }
    }
}

/// Returns true if `a` is strictly later than `b`.
pub fn is_later(a: &str, b: &str) -> bool {
    compare(a, b) == Ordering::Greater
}

/// Returns true if a release requiring `minimum_os` can run on `os`.
///
/// This is the compatibility gate used throughout the catalog: a floor
/// that is not later than the client OS is satisfied.
pub fn satisfies(minimum_os: &str, os: &str) -> bool {
    !is_later(minimum_os, os)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_to_self() {
        for v in ["0", "1.0", "2.1.4", "", "abc", "10.0.0.1"] {
            assert_eq!(compare(v, v), Ordering::Equal, "{v}");
        }
    }

    #[test]
    fn test_numeric_not_lexicographic() {
        assert!(is_later("10.0", "9.9"));
        assert!(!is_later("9.9", "10.0"));
        assert!(is_later("1.10", "1.9"));
    }

    #[test]
    fn test_trailing_zero_segments() {
        assert!(!is_later("1.2", "1.2.0"));
        assert!(!is_later("1.2.0", "1.2"));
        assert!(is_later("1.2.3", "1.2"));
        assert!(!is_later("1.2", "1.2.3"));
    }

    #[test]
    fn test_unparsable_segment_is_zero() {
        assert_eq!(compare("1.x", "1.0"), Ordering::Equal);
        assert_eq!(compare("beta", "0"), Ordering::Equal);
        assert!(is_later("1.1", "1.b"));
        assert_eq!(compare(" 5", "0"), Ordering::Equal);
        assert!(is_later("1.5", "1. 5"));
    }

    #[test]
    fn test_satisfies() {
        assert!(satisfies("6.0", "8.0"));
        assert!(satisfies("8.0", "8.0"));
        assert!(!satisfies("9.0", "8.0"));
        assert!(satisfies("17.0", ANY_OS_VERSION));
    }

    #[test]
    fn test_total_order_transitive() {
        let mut versions = vec!["10.0", "9.9", "1.2.3", "1.2", "1.10", "0.9", "2"];
        versions.sort_by(|a, b| compare(a, b));
        assert_eq!(versions, ["0.9", "1.2", "1.2.3", "1.10", "2", "9.9", "10.0"]);
    }
}
