//! Patch definitions
//!
//! A patch is one edit to a state sequence. Intent is carried by the
//! variant, positions are always 1-based and never signed.

use std::fmt;

/// A single corrective edit for a state sequence
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Patch {
    /// Insert a placeholder directly after this 1-based position (0 prepends)
    InsertAt(usize),
    /// Delete the slot at this 1-based position
    DeleteAt(usize),
    /// The sequences need no further gap edits
    NoEdit,
}

impl Patch {
    #[inline]
    pub fn is_edit(&self) -> bool {
        !matches!(self, Patch::NoEdit)
    }

    /// Edit kind and position, `None` for [`Patch::NoEdit`]
    pub fn edit(&self) -> Option<(EditKind, usize)> {
        match *self {
            Patch::InsertAt(after) => Some((EditKind::Insert, after)),
            Patch::DeleteAt(position) => Some((EditKind::Delete, position)),
            Patch::NoEdit => None,
        }
    }
}

impl fmt::Display for Patch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Patch::InsertAt(0) => write!(f, "insert placeholder at head"),
            Patch::InsertAt(after) => write!(f, "insert placeholder after position {}", after),
            Patch::DeleteAt(position) => write!(f, "delete position {}", position),
            Patch::NoEdit => write!(f, "no edit"),
        }
    }
}

/// Kind of an applied edit
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EditKind {
    Insert,
    Delete,
}

impl fmt::Display for EditKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditKind::Insert => write!(f, "insert"),
            EditKind::Delete => write!(f, "delete"),
        }
    }
}
