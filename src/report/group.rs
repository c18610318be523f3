use indexmap::IndexMap;

use super::order::{sort_by_priority, CATEGORY_ORDER, SUBCATEGORY_ORDER};
use crate::craft::CraftRecord;

#[derive(Debug, Clone)]
pub struct SubcategoryGroup {
    pub name: String,
    pub records: Vec<CraftRecord>,
}

#[derive(Debug, Clone)]
pub struct CategoryGroup {
    pub name: String,
    pub subcategories: Vec<SubcategoryGroup>,
}

impl CategoryGroup {
    pub fn records(&self) -> impl Iterator<Item = &CraftRecord> {
        self.subcategories.iter().flat_map(|s| &s.records)
    }
}

/// Stable group-by: keys in first-seen order, members in input order.
pub fn group_by<T, K, F>(items: impl IntoIterator<Item = T>, mut key: F) -> IndexMap<K, Vec<T>>
where
    K: std::hash::Hash + Eq,
    F: FnMut(&T) -> K,
{
    let mut groups: IndexMap<K, Vec<T>> = IndexMap::new();
    for item in items {
        groups.entry(key(&item)).or_default().push(item);
    }
    groups
}

/// Two-level grouping (category, then subcategory), both levels in priority order.
pub fn aggregate(records: Vec<CraftRecord>) -> Vec<CategoryGroup> {
    let mut categories: Vec<CategoryGroup> = group_by(records, |r| r.category.clone())
        .into_iter()
        .map(|(name, members)| {
            let mut subcategories: Vec<SubcategoryGroup> =
                group_by(members, |r| r.subcategory.clone())
                    .into_iter()
                    .map(|(name, records)| SubcategoryGroup { name, records })
                    .collect();
            sort_by_priority(&mut subcategories, SUBCATEGORY_ORDER, |s| s.name.as_str());
            CategoryGroup {
                name,
                subcategories,
            }
        })
        .collect();
    sort_by_priority(&mut categories, CATEGORY_ORDER, |c| c.name.as_str());
    categories
}
