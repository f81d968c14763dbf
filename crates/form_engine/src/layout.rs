//! Row layout for rendered forms.
//!
//! Headings take a full row. Input fields are laid out two per row in
//! definition order; a field that cannot be paired (last field, or followed by
//! a heading) gets a half-width row with an empty second column so it lines up
//! with the paired rows above it.

use std::collections::HashSet;

use crate::model::{FieldDescriptor, FieldId};

/// One display row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LayoutRow<T> {
    /// Header / subheader spanning the whole row.
    FullWidth(T),
    /// Two input fields side by side.
    Pair(T, T),
    /// Single input field in the left column, right column left empty.
    HalfWidth(T),
}

impl<T> LayoutRow<T> {
    /// The row's items, left to right.
    pub fn fields(&self) -> Vec<&T> {
        match self {
            LayoutRow::FullWidth(a) | LayoutRow::HalfWidth(a) => vec![a],
            LayoutRow::Pair(a, b) => vec![a, b],
        }
    }

    /// Transform the row's items, keeping its shape.
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> LayoutRow<U> {
        match self {
            LayoutRow::FullWidth(a) => LayoutRow::FullWidth(f(a)),
            LayoutRow::HalfWidth(a) => LayoutRow::HalfWidth(f(a)),
            LayoutRow::Pair(a, b) => {
                let a = f(a);
                LayoutRow::Pair(a, f(b))
            }
        }
    }
}

/// Lazy row iterator returned by [`pair_rows`].
pub struct LayoutRows<'a> {
    fields: &'a [FieldDescriptor],
    index: usize,
    placed: HashSet<&'a FieldId>,
}

/// Group `fields` into display rows, preserving their order.
pub fn pair_rows(fields: &[FieldDescriptor]) -> LayoutRows<'_> {
    LayoutRows {
        fields,
        index: 0,
        placed: HashSet::with_capacity(fields.len()),
    }
}

impl<'a> Iterator for LayoutRows<'a> {
    type Item = LayoutRow<&'a FieldDescriptor>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let field = self.fields.get(self.index)?;
            self.index += 1;

            // Already consumed as the right half of the previous pair.
            if !self.placed.insert(&field.id) {
                continue;
            }

            if field.kind.is_layout_only() {
                return Some(LayoutRow::FullWidth(field));
            }

            return match self.fields.get(self.index) {
                Some(next) if !next.kind.is_layout_only() && !self.placed.contains(&next.id) => {
                    self.placed.insert(&next.id);
                    Some(LayoutRow::Pair(field, next))
                }
                _ => Some(LayoutRow::HalfWidth(field)),
            };
        }
    }
}
