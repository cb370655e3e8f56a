//! Derivation of the product list presentation.
//!
//! Everything here is a pure function over the latest subscription
//! snapshot plus two pieces of UI state (search query, selected
//! category). Nothing is cached between snapshots; the Home screen
//! recomputes the view on every render.

use indexmap::{IndexMap, IndexSet};

use punguin_core::{OTHER_CATEGORY, Product};

/// The category selector state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// Sentinel showing the full search-filtered list.
    #[default]
    All,
    /// Show only one category bucket.
    Category(String),
}

/// Search and filter state for the Home screen.
#[derive(Debug, Clone, Default)]
pub struct ProductListViewModel {
    /// Case-insensitive name substring; empty matches everything.
    pub query: String,
    /// Which bucket to display.
    pub selected: CategoryFilter,
}

impl ProductListViewModel {
    /// The search-filtered list, in snapshot order.
    ///
    /// Matching is a case-insensitive substring test on the product
    /// name; an empty query matches every product.
    #[must_use]
    pub fn filtered<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        if self.query.is_empty() {
            return products.iter().collect();
        }
        let needle = self.query.to_lowercase();
        products
            .iter()
            .filter(|p| p.fields.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Category labels for the selector, enumerated from the raw list.
    ///
    /// First-appearance order, deduplicated; a label disappears as soon
    /// as no product carries it. The `All` sentinel is the selector's
    /// concern, not part of this list.
    #[must_use]
    pub fn categories(products: &[Product]) -> Vec<String> {
        let mut labels: IndexSet<&str> = IndexSet::new();
        for product in products {
            labels.insert(product.bucket_label());
        }
        labels.into_iter().map(str::to_owned).collect()
    }

    /// Partition of the search-filtered list into category buckets.
    ///
    /// Buckets appear in first-occurrence order; products with an empty
    /// category land in the [`OTHER_CATEGORY`] bucket. Every filtered
    /// product lands in exactly one bucket.
    #[must_use]
    pub fn grouped<'a>(&self, products: &'a [Product]) -> IndexMap<String, Vec<&'a Product>> {
        let mut buckets: IndexMap<String, Vec<&Product>> = IndexMap::new();
        for product in self.filtered(products) {
            buckets
                .entry(product.bucket_label().to_owned())
                .or_default()
                .push(product);
        }
        buckets
    }

    /// The list the Home screen actually renders.
    ///
    /// `All` shows the full search-filtered list; a selected category
    /// shows only its bucket. A category with no matching products
    /// yields an empty list, never stale data.
    #[must_use]
    pub fn displayed<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        match &self.selected {
            CategoryFilter::All => self.filtered(products),
            CategoryFilter::Category(label) => self
                .grouped(products)
                .shift_remove(label.as_str())
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use punguin_core::{Price, ProductFields, ProductKey};

    fn product(key: &str, name: &str, category: &str) -> Product {
        Product {
            key: ProductKey::new(key),
            fields: ProductFields {
                name: name.to_owned(),
                category: category.to_owned(),
                price: Price::parse("10000").unwrap(),
                image: "file:///img.png".to_owned(),
            },
        }
    }

    fn snapshot() -> Vec<Product> {
        vec![
            product("-N1", "Gấu bông", "Đồ chơi trẻ em"),
            product("-N2", "Hoa hồng", "Hoa"),
            product("-N3", "Hoa lan", "Hoa"),
            product("-N4", "Bánh mì", ""),
        ]
    }

    fn vm(query: &str, selected: CategoryFilter) -> ProductListViewModel {
        ProductListViewModel {
            query: query.to_owned(),
            selected,
        }
    }

    #[test]
    fn test_empty_query_is_identity() {
        let products = snapshot();
        let filtered = vm("", CategoryFilter::All).filtered(&products);
        let names: Vec<_> = filtered.iter().map(|p| &p.fields.name).collect();
        assert_eq!(names, vec!["Gấu bông", "Hoa hồng", "Hoa lan", "Bánh mì"]);
    }

    #[test]
    fn test_filter_is_case_insensitive_substring() {
        let products = snapshot();
        let filtered = vm("hoa", CategoryFilter::All).filtered(&products);
        let names: Vec<_> = filtered.iter().map(|p| &p.fields.name).collect();
        assert_eq!(names, vec!["Hoa hồng", "Hoa lan"]);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let products = snapshot();
        let view = vm("hoa", CategoryFilter::All);
        let once: Vec<Product> = view
            .filtered(&products)
            .into_iter()
            .cloned()
            .collect();
        let twice = view.filtered(&once);
        assert_eq!(once.len(), twice.len());
        for (a, b) in once.iter().zip(twice) {
            assert_eq!(a.key, b.key);
        }
    }

    #[test]
    fn test_grouping_partitions_filtered_list() {
        let products = snapshot();
        let view = vm("", CategoryFilter::All);
        let buckets = view.grouped(&products);

        let total: usize = buckets.values().map(Vec::len).sum();
        assert_eq!(total, view.filtered(&products).len());

        // Every product sits in the bucket its label names.
        for (label, members) in &buckets {
            for member in members {
                assert_eq!(member.bucket_label(), label);
            }
        }
    }

    #[test]
    fn test_empty_category_buckets_as_other() {
        let products = snapshot();
        let buckets = vm("", CategoryFilter::All).grouped(&products);
        let other = buckets.get(OTHER_CATEGORY).unwrap();
        assert_eq!(other.len(), 1);
        assert_eq!(other[0].fields.name, "Bánh mì");
    }

    #[test]
    fn test_categories_enumerate_raw_list_in_order() {
        let products = snapshot();
        assert_eq!(
            ProductListViewModel::categories(&products),
            vec!["Đồ chơi trẻ em", "Hoa", OTHER_CATEGORY]
        );
    }

    #[test]
    fn test_category_labels_disappear_with_last_product() {
        let mut products = snapshot();
        products.retain(|p| p.bucket_label() != "Hoa");
        assert_eq!(
            ProductListViewModel::categories(&products),
            vec!["Đồ chơi trẻ em", OTHER_CATEGORY]
        );
    }

    #[test]
    fn test_selected_category_shows_only_its_bucket() {
        let products = snapshot();
        let shown =
            vm("", CategoryFilter::Category("Hoa".to_owned())).displayed(&products);
        let names: Vec<_> = shown.iter().map(|p| &p.fields.name).collect();
        assert_eq!(names, vec!["Hoa hồng", "Hoa lan"]);
    }

    #[test]
    fn test_absent_category_yields_empty_not_error() {
        let products = snapshot();
        let shown =
            vm("", CategoryFilter::Category("Điện thoại".to_owned())).displayed(&products);
        assert!(shown.is_empty());
    }

    #[test]
    fn test_search_and_category_compose() {
        let products = snapshot();
        let shown = vm("lan", CategoryFilter::Category("Hoa".to_owned())).displayed(&products);
        let names: Vec<_> = shown.iter().map(|p| &p.fields.name).collect();
        assert_eq!(names, vec!["Hoa lan"]);
    }
}
