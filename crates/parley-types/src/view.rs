//! Sort and pagination parameters for derived list views.

use serde::{Deserialize, Serialize};

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Sortable fields of an interview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewSortKey {
    Title,
    Status,
    CreatedAt,
}

/// Sortable fields of a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseSortKey {
    CreatedAt,
    Summary,
}

/// A sort key plus direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec<K> {
    pub key: K,
    pub direction: SortDirection,
}

impl<K: Copy + PartialEq> SortSpec<K> {
    pub fn ascending(key: K) -> Self {
        Self {
            key,
            direction: SortDirection::Asc,
        }
    }

    pub fn descending(key: K) -> Self {
        Self {
            key,
            direction: SortDirection::Desc,
        }
    }

    /// The sort after a user requests sorting by `key`: the same key flips
    /// direction, a different key starts ascending.
    pub fn toggled(self, key: K) -> Self {
        if self.key == key {
            Self {
                key,
                direction: self.direction.flipped(),
            }
        } else {
            Self::ascending(key)
        }
    }
}

impl Default for SortSpec<InterviewSortKey> {
    /// Newest interviews first.
    fn default() -> Self {
        Self::descending(InterviewSortKey::CreatedAt)
    }
}

impl Default for SortSpec<ResponseSortKey> {
    fn default() -> Self {
        Self::descending(ResponseSortKey::CreatedAt)
    }
}

/// A 1-indexed page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub number: usize,
    pub size: usize,
}

impl PageRequest {
    pub fn new(number: usize, size: usize) -> Self {
        Self { number, size }
    }

    /// First page of the given size.
    pub fn first(size: usize) -> Self {
        Self::new(1, size)
    }
}

/// The visible slice of a filtered, sorted collection.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedView<T> {
    pub items: Vec<T>,
    /// Number of items that passed the filters, across all pages.
    pub total: usize,
    pub page: PageRequest,
}

impl<T> DerivedView<T> {
    /// Number of pages needed to show `total` items (at least 1).
    pub fn page_count(&self) -> usize {
        if self.page.size == 0 {
            return 1;
        }
        self.total.div_ceil(self.page.size).max(1)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
