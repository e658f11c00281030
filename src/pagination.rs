//! Page-index state machine.
//!
//! The page shows `page_size` shlokas at a time. [`Pager`] is the model the
//! page script follows: one page index, wrapping navigation in both
//! directions, and a jump to the page holding a given record.
//!
//! ```text
//! records: 0 1 | 2 3 | 4        page_size = 2, page_count = 3
//! pages:    0  |  1  | 2
//! next(2) = 0, previous(0) = 2, page_of(4) = 2
//! ```
//!
//! With no records the page count is zero and every transition stays on page 0.

use rand::Rng;
use std::ops::Range;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum PagerError {
    #[error("page size must be at least 1")]
    PageSizeZero,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pager {
    total: usize,
    page_size: usize,
    page: usize,
}

impl Pager {
    /// A pager over `total` records, starting on page 0.
    pub fn new(total: usize, page_size: usize) -> Result<Self, PagerError> {
        if page_size == 0 {
            return Err(PagerError::PageSizeZero);
        }
        Ok(Self {
            total,
            page_size,
            page: 0,
        })
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Current page index.
    pub fn page(&self) -> usize {
        self.page
    }

    /// `ceil(total / page_size)`.
    pub fn page_count(&self) -> usize {
        self.total.div_ceil(self.page_size)
    }

    /// Page holding record `index`.
    pub fn page_of(&self, index: usize) -> usize {
        index / self.page_size
    }

    /// Record indices shown on the current page.
    pub fn page_range(&self) -> Range<usize> {
        let start = (self.page * self.page_size).min(self.total);
        let end = (start + self.page_size).min(self.total);
        start..end
    }

    pub fn next(&mut self) -> usize {
        let count = self.page_count();
        if count > 0 {
            self.page = (self.page + 1) % count;
        }
        self.page
    }

    pub fn previous(&mut self) -> usize {
        let count = self.page_count();
        if count > 0 {
            self.page = (self.page + count - 1) % count;
        }
        self.page
    }

    /// Jump to a uniformly chosen page.
    pub fn random<R: Rng + ?Sized>(&mut self, rng: &mut R) -> usize {
        let count = self.page_count();
        if count > 0 {
            self.page = rng.gen_range(0..count);
        }
        self.page
    }

    /// Jump to the page holding record `index`. Out-of-range indices are ignored.
    pub fn jump_to_record(&mut self, index: usize) -> usize {
        if index < self.total {
            self.page = self.page_of(index);
        }
        self.page
    }

    /// Page label as shown under the records, e.g. `Page 1 / 3`.
    pub fn label(&self) -> String {
        format!("Page {} / {}", self.page + 1, self.page_count().max(1))
    }
}
