//! The Home screen: search, category filter, product list, delete.

use punguin_core::{Product, ProductKey};

use crate::viewmodel::{CategoryFilter, ProductListViewModel};

use super::Notice;

/// List, search, and delete state for the Home screen.
#[derive(Debug, Clone, Default)]
pub struct HomeScreen {
    pub view: ProductListViewModel,
    /// Highlighted row within the displayed list.
    pub selected_row: usize,
    /// Key awaiting delete confirmation.
    pub pending_delete: Option<ProductKey>,
    busy: bool,
    pub notice: Option<Notice>,
}

impl HomeScreen {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a delete is outstanding.
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.busy
    }

    /// Append a character to the search query.
    pub fn search_char(&mut self, ch: char) {
        self.view.query.push(ch);
        self.selected_row = 0;
    }

    /// Delete the last character of the search query.
    pub fn search_backspace(&mut self) {
        self.view.query.pop();
        self.selected_row = 0;
    }

    /// Step the category selector through `All` plus the given labels,
    /// wrapping at the ends.
    pub fn cycle_category(&mut self, labels: &[String], forward: bool) {
        // Position 0 is the All sentinel; labels follow.
        let count = labels.len() + 1;
        let current = match &self.view.selected {
            CategoryFilter::All => 0,
            CategoryFilter::Category(label) => labels
                .iter()
                .position(|l| l == label)
                .map_or(0, |i| i + 1),
        };
        let next = if forward {
            (current + 1) % count
        } else {
            (current + count - 1) % count
        };
        self.view.selected = if next == 0 {
            CategoryFilter::All
        } else {
            CategoryFilter::Category(labels[next - 1].clone())
        };
        self.selected_row = 0;
    }

    /// Move the row highlight within a list of the given length.
    pub fn move_selection(&mut self, len: usize, down: bool) {
        if len == 0 {
            self.selected_row = 0;
            return;
        }
        if down {
            self.selected_row = (self.selected_row + 1).min(len - 1);
        } else {
            self.selected_row = self.selected_row.saturating_sub(1);
        }
    }

    /// The highlighted product, if the displayed list has one.
    #[must_use]
    pub fn selected_product<'a>(&self, displayed: &[&'a Product]) -> Option<&'a Product> {
        displayed.get(self.selected_row.min(displayed.len().saturating_sub(1))).copied()
    }

    /// Ask for confirmation before deleting the highlighted product.
    pub fn request_delete(&mut self, displayed: &[&Product]) {
        if self.busy {
            return;
        }
        if let Some(product) = self.selected_product(displayed) {
            self.pending_delete = Some(product.key.clone());
            self.notice = None;
        }
    }

    /// Confirm the pending delete and take the key to remove.
    ///
    /// Returns `None` when nothing is pending or a delete is already
    /// outstanding.
    pub fn begin_delete(&mut self) -> Option<ProductKey> {
        if self.busy {
            return None;
        }
        let key = self.pending_delete.take()?;
        self.busy = true;
        Some(key)
    }

    /// Dismiss the pending delete without removing anything.
    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Record the outcome of a delete.
    pub fn complete_delete(&mut self, result: Result<(), String>) {
        self.busy = false;
        self.notice = Some(match result {
            Ok(()) => Notice::Success("product deleted".to_owned()),
            Err(message) => Notice::Error(message),
        });
    }
}
