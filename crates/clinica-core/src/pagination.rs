//! # Pagination
//!
//! Limit/offset windows for list and search queries.
//!
//! ## Bounds
//! - `limit` in `1..=1000`
//! - `offset >= 0`
//!
//! The list screens move through pages of [`DEFAULT_PAGE_SIZE`] rows:
//! ```text
//!  page 0 ──► offset 0,  limit 20
//!  page 1 ──► offset 20, limit 20
//!  page 2 ──► offset 40, limit 20
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::{DEFAULT_PAGE_SIZE, DEFAULT_SEARCH_LIMIT, MAX_PAGE_LIMIT};

/// A checked limit/offset pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    limit: i64,
    offset: i64,
}

impl Page {
    /// Builds a page, rejecting out-of-range parameters.
    ///
    /// ## Example
    /// ```rust
    /// use clinica_core::Page;
    ///
    /// assert!(Page::new(20, 0).is_ok());
    /// assert!(Page::new(0, 0).is_err());
    /// assert!(Page::new(1001, 0).is_err());
    /// assert!(Page::new(20, -1).is_err());
    /// ```
    pub fn new(limit: i64, offset: i64) -> Result<Self, ValidationError> {
        if limit <= 0 {
            return Err(ValidationError::MustBePositive {
                field: "limit".to_string(),
            });
        }

        if limit > MAX_PAGE_LIMIT {
            return Err(ValidationError::OutOfRange {
                field: "limit".to_string(),
                min: 1,
                max: MAX_PAGE_LIMIT,
            });
        }

        if offset < 0 {
            return Err(ValidationError::OutOfRange {
                field: "offset".to_string(),
                min: 0,
                max: i64::MAX,
            });
        }

        Ok(Page { limit, offset })
    }

    /// The `index`-th page (zero-based) of `size` rows.
    pub fn nth(index: i64, size: i64) -> Result<Self, ValidationError> {
        if index < 0 {
            return Err(ValidationError::OutOfRange {
                field: "page".to_string(),
                min: 0,
                max: i64::MAX,
            });
        }

        // Check size before multiplying so the offset can't overflow
        let first = Page::new(size, 0)?;
        Page::new(size, index.saturating_mul(first.limit))
    }

    /// First page of the list screens.
    pub fn first() -> Self {
        Page {
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }

    /// Default window for searches.
    pub fn search() -> Self {
        Page {
            limit: DEFAULT_SEARCH_LIMIT,
            offset: 0,
        }
    }

    #[inline]
    pub fn limit(&self) -> i64 {
        self.limit
    }

    #[inline]
    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// Zero-based page index this window starts on.
    pub fn index(&self) -> i64 {
        self.offset / self.limit
    }

    /// The window right after this one.
    pub fn next(&self) -> Self {
        Page {
            limit: self.limit,
            offset: self.offset.saturating_add(self.limit),
        }
    }

    /// The window right before this one, or `None` on the first page.
    pub fn previous(&self) -> Option<Self> {
        if self.offset == 0 {
            return None;
        }
        Some(Page {
            limit: self.limit,
            offset: (self.offset - self.limit).max(0),
        })
    }
}

impl Default for Page {
    fn default() -> Self {
        Page::first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        assert!(Page::new(1, 0).is_ok());
        assert!(Page::new(1000, 0).is_ok());
        assert!(Page::new(20, 5000).is_ok());

        assert!(matches!(
            Page::new(0, 0),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(matches!(
            Page::new(-5, 0),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(matches!(
            Page::new(1001, 0),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(matches!(
            Page::new(10, -1),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_nth() {
        let page = Page::nth(2, 20).unwrap();
        assert_eq!(page.limit(), 20);
        assert_eq!(page.offset(), 40);
        assert_eq!(page.index(), 2);

        assert!(Page::nth(-1, 20).is_err());
        assert!(Page::nth(0, 0).is_err());
        assert!(Page::nth(i64::MAX, 20).is_ok());
    }

    #[test]
    fn test_navigation() {
        let first = Page::first();
        assert_eq!(first.previous(), None);

        let second = first.next();
        assert_eq!(second.offset(), DEFAULT_PAGE_SIZE);
        assert_eq!(second.previous(), Some(first));
    }
}
