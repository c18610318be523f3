use crate::craft::{AUGMENT, CHANGE_RESISTS, RANDOMISE, REMOVE, REMOVE_ADD, REMOVE_NON_ADD, SPECIAL};

pub const CATEGORY_ORDER: &[&str] = &[
    SPECIAL,
    AUGMENT,
    REMOVE_ADD,
    REMOVE,
    REMOVE_NON_ADD,
    CHANGE_RESISTS,
    RANDOMISE,
];

pub const SUBCATEGORY_ORDER: &[&str] = &[
    "Fire -> Cold",
    "Fire -> Lightning",
    "Cold -> Fire",
    "Cold -> Lightning",
    "Lightning -> Fire",
    "Lightning -> Cold",
    "Fire",
    "Cold",
    "Lightning",
    "Chaos",
    "Attack",
    "Caster",
    "Physical",
    "Defence",
    "Life",
];

/// Sort weight of `key`: its index in `reference`, or `usize::MAX` when absent.
pub fn priority(key: &str, reference: &[&str]) -> usize {
    reference
        .iter()
        .position(|r| *r == key)
        .unwrap_or(usize::MAX)
}

/// Stable sort by `reference` position; items whose key is absent go last in
/// their original relative order.
pub fn sort_by_priority<T>(items: &mut [T], reference: &[&str], key: impl Fn(&T) -> &str) {
    items.sort_by_key(|item| priority(key(item), reference));
}
