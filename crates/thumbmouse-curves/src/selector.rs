//! Active profile index shared between the input-edge handler and the
//! consumer.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use thumbmouse_errors::ValidationError;

use crate::profile::ProfileSet;

/// Cloneable handle to the active profile index.
///
/// Only the mode cycler writes; the shaper reads on every sample. Writes
/// use `Release`, reads `Acquire`.
#[derive(Debug, Clone)]
pub struct ProfileSelector {
    index: Arc<AtomicUsize>,
    count: usize,
}

impl ProfileSelector {
    /// Selector over `count` profiles, starting at `initial`.
    ///
    /// # Errors
    ///
    /// `count == 0`, or `initial >= count`.
    pub fn new(count: usize, initial: usize) -> Result<Self, ValidationError> {
        if count == 0 {
            return Err(ValidationError::zero("profile_count"));
        }
        if initial >= count {
            return Err(ValidationError::out_of_range(
                "initial_profile",
                initial,
                0,
                count - 1,
            ));
        }
        Ok(Self {
            index: Arc::new(AtomicUsize::new(initial)),
            count,
        })
    }

    /// Selector over every profile in `profiles`, starting at the first.
    pub fn for_profiles(profiles: &ProfileSet) -> Self {
        Self {
            index: Arc::new(AtomicUsize::new(0)),
            count: profiles.len(),
        }
    }

    /// Number of selectable profiles.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Active index.
    #[inline]
    pub fn current(&self) -> usize {
        self.index.load(Ordering::Acquire)
    }

    /// Move to the next profile, wrapping to the first. Returns the new
    /// index.
    pub fn advance(&self) -> usize {
        let next = (self.current() + 1) % self.count;
        self.index.store(next, Ordering::Release);
        next
    }

    /// Jump to `index`.
    ///
    /// # Errors
    ///
    /// `index >= count`.
    pub fn select(&self, index: usize) -> Result<(), ValidationError> {
        if index >= self.count {
            return Err(ValidationError::out_of_range(
                "profile_index",
                index,
                0,
                self.count - 1,
            ));
        }
        self.index.store(index, Ordering::Release);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_wraps() -> Result<(), ValidationError> {
        let selector = ProfileSelector::new(3, 0)?;
        assert_eq!(selector.advance(), 1);
        assert_eq!(selector.advance(), 2);
        assert_eq!(selector.advance(), 0);
        assert_eq!(selector.current(), 0);
        Ok(())
    }

    #[test]
    fn test_clones_share_index() -> Result<(), ValidationError> {
        let writer = ProfileSelector::new(3, 1)?;
        let reader = writer.clone();
        writer.advance();
        assert_eq!(reader.current(), 2);
        Ok(())
    }

    #[test]
    fn test_rejects_bad_bounds() {
        assert!(ProfileSelector::new(0, 0).is_err());
        assert!(ProfileSelector::new(3, 3).is_err());
    }

    #[test]
    fn test_select() -> Result<(), ValidationError> {
        let selector = ProfileSelector::new(2, 0)?;
        selector.select(1)?;
        assert_eq!(selector.current(), 1);
        assert!(selector.select(2).is_err());
        assert_eq!(selector.current(), 1);
        Ok(())
    }

    #[test]
    fn test_single_profile_stays_put() -> Result<(), ValidationError> {
        let selector = ProfileSelector::new(1, 0)?;
        assert_eq!(selector.advance(), 0);
        Ok(())
    }
}
