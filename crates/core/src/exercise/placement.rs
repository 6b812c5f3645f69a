use thiserror::Error;

use crate::model::FillBlankQuestion;

use super::zone::{DropZone, MoveDescriptor};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PlacementError {
    #[error("blank {index} does not exist (question has {blanks} blanks)")]
    BlankOutOfRange { index: usize, blanks: usize },

    #[error("option {item:?} is not in the pool")]
    UnknownItem { item: String },

    #[error("pool position {index} is out of range (pool has {len} options)")]
    PoolIndexOutOfRange { index: usize, len: usize },
}

/// Blank assignments plus the pool of options not placed anywhere.
///
/// Together they always hold exactly the question's options.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Placement {
    blanks: Vec<Option<String>>,
    pool: Vec<String>,
}

impl Placement {
    /// All blanks empty, every option in the pool in authored order.
    #[must_use]
    pub fn for_question(question: &FillBlankQuestion) -> Self {
        Self {
            blanks: vec![None; question.blank_count()],
            pool: question.options().to_vec(),
        }
    }

    #[must_use]
    pub fn blanks(&self) -> &[Option<String>] {
        &self.blanks
    }

    #[must_use]
    pub fn blank(&self, index: usize) -> Option<&str> {
        self.blanks.get(index).and_then(Option::as_deref)
    }

    #[must_use]
    pub fn pool(&self) -> &[String] {
        &self.pool
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.blanks.iter().all(Option::is_some)
    }

    #[must_use]
    pub fn empty_blanks(&self) -> usize {
        self.blanks.iter().filter(|slot| slot.is_none()).count()
    }

    fn check_blank(&self, index: usize) -> Result<(), PlacementError> {
        if index < self.blanks.len() {
            Ok(())
        } else {
            Err(PlacementError::BlankOutOfRange {
                index,
                blanks: self.blanks.len(),
            })
        }
    }
}

/// Compute the placement that results from a drag-and-drop move.
///
/// Pure: `current` is never modified, and on error the caller keeps its state.
/// A move without a destination yields an unchanged copy.
///
/// # Errors
///
/// Returns `PlacementError` when the move references a blank or pool position
/// that does not exist, or drags an option that is not in the pool.
pub fn resolve_move(current: &Placement, mv: &MoveDescriptor) -> Result<Placement, PlacementError> {
    let Some(destination) = mv.destination else {
        return Ok(current.clone());
    };

    let mut next = current.clone();
    match (mv.source, destination) {
        (DropZone::Pool, DropZone::Blank(dest)) => {
            next.check_blank(dest)?;
            let position = next
                .pool
                .iter()
                .position(|option| *option == mv.item)
                .ok_or_else(|| PlacementError::UnknownItem {
                    item: mv.item.clone(),
                })?;
            let moved = next.pool.remove(position);
            if let Some(displaced) = next.blanks[dest].take() {
                next.pool.push(displaced);
            }
            next.blanks[dest] = Some(moved);
        }
        (DropZone::Blank(src), DropZone::Pool) => {
            next.check_blank(src)?;
            if let Some(value) = next.blanks[src].take() {
                next.pool.push(value);
            }
        }
        (DropZone::Blank(src), DropZone::Blank(dest)) => {
            next.check_blank(src)?;
            next.check_blank(dest)?;
            next.blanks.swap(src, dest);
        }
        (DropZone::Pool, DropZone::Pool) => {
            if mv.source_index >= next.pool.len() {
                return Err(PlacementError::PoolIndexOutOfRange {
                    index: mv.source_index,
                    len: next.pool.len(),
                });
            }
            let moved = next.pool.remove(mv.source_index);
            let dest = mv.destination_index.min(next.pool.len());
            next.pool.insert(dest, moved);
        }
    }

    Ok(next)
}
