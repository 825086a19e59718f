//! Placeholder mutation
//!
//! The only writes ever made to a state sequence: insert a placeholder, or
//! delete one slot.

use seqsync_core::{EditKind, Patch, RecordId, SeqError, SeqResult};

/// Insert a placeholder directly after 1-based position `after`.
/// `after == 0` prepends, `after == len` appends.
pub fn insert_placeholder(state: &mut Vec<RecordId>, after: usize) -> SeqResult<()> {
    if after > state.len() {
        return Err(SeqError::EditOutOfBounds {
            position: after,
            len: state.len(),
        });
    }
    state.insert(after, RecordId::PLACEHOLDER);
    Ok(())
}

/// Remove the slot at 1-based `position`, returning what it held.
pub fn delete_at(state: &mut Vec<RecordId>, position: usize) -> SeqResult<RecordId> {
    if position == 0 || position > state.len() {
        return Err(SeqError::EditOutOfBounds {
            position,
            len: state.len(),
        });
    }
    Ok(state.remove(position - 1))
}

/// Apply a patch; returns the applied edit, `None` for [`Patch::NoEdit`].
pub fn apply(state: &mut Vec<RecordId>, patch: Patch) -> SeqResult<Option<(EditKind, usize)>> {
    match patch {
        Patch::InsertAt(after) => insert_placeholder(state, after)?,
        Patch::DeleteAt(position) => {
            delete_at(state, position)?;
        }
        Patch::NoEdit => {}
    }
    Ok(patch.edit())
}
