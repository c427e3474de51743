use rustc_hash::FxHashMap;

use crate::{error::ConvertError, store::Value};

/// The `EXEMPT` player every bye is paired against.
pub const SENTINEL_REF: usize = 1;
pub const FIRST_PLAYER_REF: usize = 2;

/// Converts a position in the document's `players` array to a store reference.
#[must_use]
#[inline]
pub fn index_to_ref(index: usize) -> usize {
    index + FIRST_PLAYER_REF
}

/// Converts a store reference to a position in the document's `players` array.
///
/// Returns `None` for the sentinel and anything below it.
#[must_use]
#[inline]
pub fn ref_to_index(reference: usize) -> Option<usize> {
    reference.checked_sub(FIRST_PLAYER_REF)
}

/// The integer a reference is stored as.
///
/// # Errors
///
/// If the reference is too large for an integer column.
pub fn to_value(reference: usize) -> Result<Value, ConvertError> {
    i64::try_from(reference)
        .map(Value::Int)
        .map_err(|_| ConvertError::ReferenceRange(reference))
}

/// Reads a reference back, `None` for null, negative or non integer values.
#[must_use]
pub fn from_value(value: &Value) -> Option<usize> {
    value.as_int().and_then(|int| usize::try_from(int).ok())
}

/// Where each player's reference ends up in the exported `players` array.
///
/// Rows come out of the store in no particular order and references may have
/// gaps, so the positions are given by sorting the references.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RefIndex(FxHashMap<usize, usize>);

impl RefIndex {
    #[must_use]
    pub fn new<I: IntoIterator<Item = usize>>(references: I) -> Self {
        let mut references: Vec<_> = references.into_iter().collect();
        references.sort_unstable();

        Self(
            references
                .into_iter()
                .enumerate()
                .map(|(index, reference)| (reference, index))
                .collect(),
        )
    }

    #[must_use]
    pub fn index_of(&self, reference: usize) -> Option<usize> {
        self.0.get(&reference).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
