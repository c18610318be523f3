use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;

/// A display price. Settings may spell it as a string ("10c") or a bare number.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "RawPrice")]
pub struct Price(pub String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPrice {
    Text(String),
    Number(serde_json::Number),
}

impl From<RawPrice> for Price {
    fn from(raw: RawPrice) -> Self {
        match raw {
            RawPrice::Text(s) => Price(s),
            RawPrice::Number(n) => Price(n.to_string()),
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Prices for one category: per-subcategory entries plus an optional `default`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryPrices {
    #[serde(default)]
    pub default: Option<Price>,
    #[serde(flatten)]
    pub subcategories: HashMap<String, Price>,
}

/// category → (subcategory → price), with a `default` at each level.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PriceTable {
    #[serde(default)]
    pub default: Option<Price>,
    #[serde(flatten)]
    pub categories: HashMap<String, CategoryPrices>,
}

impl PriceTable {
    /// Three-tier lookup: exact subcategory, then category default, then table default.
    pub fn resolve(&self, category: &str, subcategory: &str) -> Option<&Price> {
        let in_category = self.categories.get(category).and_then(|c| {
            c.subcategories.get(subcategory).or(c.default.as_ref())
        });
        in_category.or(self.default.as_ref())
    }

    /// Like [`resolve`](Self::resolve) but yields an empty string when nothing is priced.
    pub fn resolve_display(&self, category: &str, subcategory: &str) -> String {
        self.resolve(category, subcategory)
            .map(Price::to_string)
            .unwrap_or_default()
    }
}
