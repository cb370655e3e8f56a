//! The add/edit product form.
//!
//! Holds a [`ProductDraft`] plus picker state. Validation runs locally
//! on submit; an invalid draft never produces a payload. The form
//! allows one outstanding write at a time.

use punguin_core::{Product, ProductDraft, ProductFields};

use crate::picker::GalleryEntry;

use super::Notice;

/// Category choices offered by the form's selector.
///
/// A convenience list only; the data model keeps categories free-form,
/// so products from other clients may carry labels outside this set.
pub const CATEGORY_CHOICES: &[&str] = &[
    "Đồ chơi trẻ em",
    "Thức ăn nhanh",
    "Hoa",
    "Quần áo",
    "Điện thoại",
    "Đồ gia dụng",
];

/// Which form input currently has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductFormField {
    #[default]
    Name,
    Category,
    Price,
    Image,
}

impl ProductFormField {
    const ORDER: [Self; 4] = [Self::Name, Self::Category, Self::Price, Self::Image];

    #[must_use]
    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    #[must_use]
    pub fn next(self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    #[must_use]
    pub fn previous(self) -> Self {
        let len = Self::ORDER.len();
        Self::ORDER[(self.position() + len - 1) % len]
    }
}

/// Form state for the add and edit product screens.
#[derive(Debug, Clone, Default)]
pub struct ProductForm {
    pub draft: ProductDraft,
    pub focus: ProductFormField,
    busy: bool,
    pub notice: Option<Notice>,
    /// Picker overlay contents while open, `None` when closed.
    pub gallery: Option<Vec<GalleryEntry>>,
    /// Highlighted picker row.
    pub gallery_index: usize,
}

impl ProductForm {
    /// An empty form for the add screen.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A form pre-filled from an existing product, for the edit screen.
    #[must_use]
    pub fn for_product(product: &Product) -> Self {
        Self {
            draft: ProductDraft::from_fields(&product.fields),
            ..Self::default()
        }
    }

    /// Whether a write is outstanding.
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.busy
    }

    /// Append a character to the focused text input.
    ///
    /// The category field is selector-driven and ignores typing; the
    /// image field is picker-driven.
    pub fn insert_char(&mut self, ch: char) {
        match self.focus {
            ProductFormField::Name => self.draft.name.push(ch),
            ProductFormField::Price => self.draft.price.push(ch),
            ProductFormField::Category | ProductFormField::Image => {}
        }
    }

    /// Delete the last character of the focused text input.
    pub fn backspace(&mut self) {
        match self.focus {
            ProductFormField::Name => {
                self.draft.name.pop();
            }
            ProductFormField::Price => {
                self.draft.price.pop();
            }
            ProductFormField::Category | ProductFormField::Image => {}
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_previous(&mut self) {
        self.focus = self.focus.previous();
    }

    /// Step the category selector forward or backward through
    /// [`CATEGORY_CHOICES`], wrapping at the ends.
    pub fn cycle_category(&mut self, forward: bool) {
        let current = CATEGORY_CHOICES
            .iter()
            .position(|c| *c == self.draft.category);
        let len = CATEGORY_CHOICES.len();
        let next = match current {
            Some(i) if forward => (i + 1) % len,
            Some(i) => (i + len - 1) % len,
            // Unknown or empty label: start from the first choice.
            None => 0,
        };
        self.draft.category = CATEGORY_CHOICES[next].to_owned();
    }

    /// Open the picker overlay with the given entries.
    pub fn open_gallery(&mut self, entries: Vec<GalleryEntry>) {
        self.gallery_index = 0;
        self.gallery = Some(entries);
    }

    /// Close the picker without selecting (Esc).
    pub fn cancel_gallery(&mut self) {
        self.gallery = None;
    }

    /// Move the picker highlight.
    pub fn gallery_move(&mut self, down: bool) {
        let Some(entries) = &self.gallery else { return };
        if entries.is_empty() {
            return;
        }
        if down {
            self.gallery_index = (self.gallery_index + 1).min(entries.len() - 1);
        } else {
            self.gallery_index = self.gallery_index.saturating_sub(1);
        }
    }

    /// Pick the highlighted image and close the overlay.
    pub fn pick_highlighted(&mut self) {
        if let Some(entries) = self.gallery.take() {
            if let Some(entry) = entries.get(self.gallery_index) {
                self.draft.image = Some(entry.uri.clone());
            } else {
                self.gallery = Some(entries);
            }
        }
    }

    /// Validate the draft and take the payload for submission.
    ///
    /// Returns `None` without touching the store when validation fails
    /// (the notice explains which field) or while a previous write is
    /// outstanding. The draft is preserved either way.
    pub fn begin_submit(&mut self) -> Option<ProductFields> {
        if self.busy {
            return None;
        }
        match self.draft.validate() {
            Ok(fields) => {
                self.busy = true;
                self.notice = None;
                Some(fields)
            }
            Err(err) => {
                self.notice = Some(Notice::Error(err.to_string()));
                None
            }
        }
    }

    /// Record the outcome of a write.
    ///
    /// On failure the draft stays as entered for a retry.
    pub fn complete(&mut self, result: Result<(), String>) {
        self.busy = false;
        if let Err(message) = result {
            self.notice = Some(Notice::Error(message));
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use punguin_core::{Price, ProductKey};

    fn entry(name: &str) -> GalleryEntry {
        GalleryEntry {
            name: name.to_owned(),
            uri: format!("file:///gallery/{name}"),
        }
    }

    fn filled() -> ProductForm {
        let mut form = ProductForm::new();
        for ch in "Gấu bông".chars() {
            form.insert_char(ch);
        }
        form.focus_next();
        form.cycle_category(true);
        form.focus_next();
        for ch in "150000".chars() {
            form.insert_char(ch);
        }
        form.focus_next();
        form.open_gallery(vec![entry("bear.png")]);
        form.pick_highlighted();
        form
    }

    #[test]
    fn test_filled_form_produces_payload() {
        let mut form = filled();
        let fields = form.begin_submit().unwrap();
        assert_eq!(fields.name, "Gấu bông");
        assert_eq!(fields.category, CATEGORY_CHOICES[0]);
        assert_eq!(fields.price, Price::parse("150000").unwrap());
        assert_eq!(fields.image, "file:///gallery/bear.png");
    }

    #[test]
    fn test_incomplete_form_fails_locally_with_notice() {
        let mut form = ProductForm::new();
        assert!(form.begin_submit().is_none());
        assert!(matches!(form.notice, Some(Notice::Error(_))));
        assert!(!form.is_busy());
    }

    #[test]
    fn test_second_submit_ignored_while_busy() {
        let mut form = filled();
        assert!(form.begin_submit().is_some());
        assert!(form.begin_submit().is_none());

        form.complete(Ok(()));
        assert!(form.begin_submit().is_some());
    }

    #[test]
    fn test_failure_preserves_draft() {
        let mut form = filled();
        form.begin_submit().unwrap();
        form.complete(Err("Permission denied".to_owned()));

        assert_eq!(form.draft.name, "Gấu bông");
        assert_eq!(form.draft.price, "150000");
        assert_eq!(
            form.notice,
            Some(Notice::Error("Permission denied".to_owned()))
        );
    }

    #[test]
    fn test_edit_form_prefills_from_product() {
        let product = Product {
            key: ProductKey::new("-N1"),
            fields: ProductFields {
                name: "Hoa hồng".to_owned(),
                category: "Hoa".to_owned(),
                price: Price::parse("20000").unwrap(),
                image: "file:///rose.png".to_owned(),
            },
        };
        let form = ProductForm::for_product(&product);
        assert_eq!(form.draft.name, "Hoa hồng");
        assert_eq!(form.draft.category, "Hoa");
        assert_eq!(form.draft.price, "20000");
        assert_eq!(form.draft.image.as_deref(), Some("file:///rose.png"));
    }

    #[test]
    fn test_category_cycles_through_choices() {
        let mut form = ProductForm::new();
        form.cycle_category(true);
        assert_eq!(form.draft.category, CATEGORY_CHOICES[0]);
        form.cycle_category(true);
        assert_eq!(form.draft.category, CATEGORY_CHOICES[1]);
        form.cycle_category(false);
        assert_eq!(form.draft.category, CATEGORY_CHOICES[0]);
    }

    #[test]
    fn test_unlisted_category_restarts_cycle_at_first_choice() {
        let mut form = ProductForm::new();
        form.draft.category = "Sách cũ".to_owned();
        form.cycle_category(true);
        assert_eq!(form.draft.category, CATEGORY_CHOICES[0]);
    }

    #[test]
    fn test_gallery_cancel_keeps_previous_image() {
        let mut form = filled();
        form.open_gallery(vec![entry("other.png")]);
        form.cancel_gallery();
        assert_eq!(form.draft.image.as_deref(), Some("file:///gallery/bear.png"));
    }

    #[test]
    fn test_gallery_navigation_clamps() {
        let mut form = ProductForm::new();
        form.open_gallery(vec![entry("a.png"), entry("b.png")]);
        form.gallery_move(true);
        form.gallery_move(true);
        assert_eq!(form.gallery_index, 1);
        form.gallery_move(false);
        form.gallery_move(false);
        assert_eq!(form.gallery_index, 0);
    }
}
