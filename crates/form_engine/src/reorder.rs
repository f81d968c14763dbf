//! Index-based reordering of a definition.
//!
//! Drag and drop lives in the front-end; all it has to supply is a pair of
//! indices.

use std::collections::HashMap;

use crate::model::{FieldDefinition, FieldId};

/// Move the element at `from` to position `to`. Out-of-range indices leave
/// the sequence unchanged.
pub fn reorder(sequence: &FieldDefinition, from: usize, to: usize) -> FieldDefinition {
    if from >= sequence.len() || to >= sequence.len() || from == to {
        return sequence.clone();
    }
    let mut fields = sequence.to_vec();
    let item = fields.remove(from);
    fields.insert(to, item);
    FieldDefinition::new(fields)
}

/// True if `candidate` holds exactly the ids of `original` (any order).
pub fn is_permutation(original: &FieldDefinition, candidate: &FieldDefinition) -> bool {
    if original.len() != candidate.len() {
        return false;
    }
    let mut counts: HashMap<&FieldId, isize> = HashMap::new();
    for f in original.iter() {
        *counts.entry(&f.id).or_default() += 1;
    }
    for f in candidate.iter() {
        *counts.entry(&f.id).or_default() -= 1;
    }
    counts.values().all(|c| *c == 0)
}
