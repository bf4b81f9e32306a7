use core::fmt;

use crate::error::{Error, Result};

/// The minimum degree `t` of a [`BTree`](crate::BTree).
///
/// Every node other than the root holds between `t - 1` and `2t - 1` keys; the root holds
/// at most `2t - 1`. A degree below 2 would allow empty non-root nodes, so it is rejected
/// up front.
///
/// # Examples
///
/// ```
/// use arbolb::MinDegree;
///
/// let t = MinDegree::new(3).unwrap();
/// assert_eq!(t.min_keys(), 2);
/// assert_eq!(t.max_keys(), 5);
///
/// assert!(MinDegree::new(1).is_err());
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct MinDegree(usize);

impl MinDegree {
    /// The smallest degree that keeps the occupancy rules meaningful.
    pub const MIN: Self = Self(2);

    /// Validates `t`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMinDegree`] if `t < 2`.
    pub const fn new(t: usize) -> Result<Self> {
        if t < Self::MIN.0 {
            return Err(Error::InvalidMinDegree(t));
        }
        Ok(Self(t))
    }

    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }

    /// Fewest keys a non-root node may hold: `t - 1`.
    #[must_use]
    pub const fn min_keys(self) -> usize {
        self.0 - 1
    }

    /// Most keys any node may hold: `2t - 1`.
    #[must_use]
    pub const fn max_keys(self) -> usize {
        2 * self.0 - 1
    }

    /// Most children an internal node may own: `2t`.
    #[must_use]
    pub const fn max_children(self) -> usize {
        2 * self.0
    }
}

impl TryFrom<usize> for MinDegree {
    type Error = Error;

    fn try_from(t: usize) -> Result<Self> {
        Self::new(t)
    }
}

impl From<MinDegree> for usize {
    fn from(t: MinDegree) -> Self {
        t.0
    }
}

impl fmt::Display for MinDegree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn degrees_below_two_are_rejected() {
        assert_eq!(MinDegree::new(0), Err(Error::InvalidMinDegree(0)));
        assert_eq!(MinDegree::try_from(1), Err(Error::InvalidMinDegree(1)));
        assert_eq!(MinDegree::new(2), Ok(MinDegree::MIN));
    }

    proptest! {
        #[test]
        fn capacities_follow_degree(t in 2usize..10_000) {
            let degree = MinDegree::new(t).unwrap();
            prop_assert_eq!(degree.get(), t);
            prop_assert_eq!(degree.min_keys(), t - 1);
            prop_assert_eq!(degree.max_keys(), 2 * t - 1);
            prop_assert_eq!(degree.max_children(), degree.max_keys() + 1);
            prop_assert_eq!(usize::from(degree), t);
        }
    }
}
