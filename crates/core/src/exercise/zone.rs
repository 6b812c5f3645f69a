use std::fmt;

/// Where a draggable option can sit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DropZone {
    /// The pool of unplaced options.
    Pool,
    /// The blank at this index.
    Blank(usize),
}

impl DropZone {
    #[must_use]
    pub fn is_pool(self) -> bool {
        matches!(self, DropZone::Pool)
    }

    #[must_use]
    pub fn blank_index(self) -> Option<usize> {
        match self {
            DropZone::Pool => None,
            DropZone::Blank(index) => Some(index),
        }
    }
}

impl fmt::Display for DropZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropZone::Pool => f.write_str("pool"),
            DropZone::Blank(index) => write!(f, "blank {index}"),
        }
    }
}

/// A completed drag: what moved, from where, to where.
///
/// `destination` is `None` when the item was dropped outside every zone.
/// The indices only matter for reordering inside the pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveDescriptor {
    pub source: DropZone,
    pub destination: Option<DropZone>,
    pub item: String,
    pub source_index: usize,
    pub destination_index: usize,
}

impl MoveDescriptor {
    #[must_use]
    pub fn new(source: DropZone, destination: DropZone, item: impl Into<String>) -> Self {
        Self {
            source,
            destination: Some(destination),
            item: item.into(),
            source_index: 0,
            destination_index: 0,
        }
    }

    /// A drag that ended outside any drop zone.
    #[must_use]
    pub fn dropped_outside(source: DropZone, item: impl Into<String>) -> Self {
        Self {
            source,
            destination: None,
            item: item.into(),
            source_index: 0,
            destination_index: 0,
        }
    }

    #[must_use]
    pub fn pool_to_blank(item: impl Into<String>, blank: usize) -> Self {
        Self::new(DropZone::Pool, DropZone::Blank(blank), item)
    }

    #[must_use]
    pub fn blank_to_pool(blank: usize, item: impl Into<String>) -> Self {
        Self::new(DropZone::Blank(blank), DropZone::Pool, item)
    }

    #[must_use]
    pub fn blank_to_blank(from: usize, to: usize, item: impl Into<String>) -> Self {
        Self::new(DropZone::Blank(from), DropZone::Blank(to), item)
    }

    #[must_use]
    pub fn reorder_pool(item: impl Into<String>, from: usize, to: usize) -> Self {
        Self::new(DropZone::Pool, DropZone::Pool, item).with_indices(from, to)
    }

    #[must_use]
    pub fn with_indices(mut self, source_index: usize, destination_index: usize) -> Self {
        self.source_index = source_index;
        self.destination_index = destination_index;
        self
    }
}
