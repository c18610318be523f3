use std::sync::LazyLock;

use regex::Regex;

use super::{Classification, AUGMENT, CHANGE_RESISTS, RANDOMISE, REMOVE, REMOVE_ADD, REMOVE_NON_ADD};
use crate::error::CraftError;

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<\w+>\{([^}]*)\}").unwrap());

/// Highlighted spans (`<white>{...}`) in order of appearance.
pub fn tokens(raw: &str) -> Vec<&str> {
    TOKEN_RE
        .captures_iter(raw)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .collect()
}

/// Positional classification from the highlighted tokens of the raw text.
/// This variant predates the `Special` category; those crafts land in `Other`.
pub fn classify(raw: &str, plain: &str) -> Result<Classification, CraftError> {
    let tokens = tokens(raw);

    let classification = match tokens.as_slice() {
        ["Augment", kind, ..] => Classification::new(AUGMENT, *kind),
        ["Randomise", kind, ..] => Classification::new(RANDOMISE, *kind),
        ["Change", from, to, ..] => Classification::new(CHANGE_RESISTS, format!("{} -> {}", from, to)),
        ["Remove", kind] => Classification::new(REMOVE, *kind),
        ["Remove", removed, _, added, ..] => {
            let category = if removed.starts_with("non-") {
                REMOVE_NON_ADD
            } else {
                REMOVE_ADD
            };
            Classification::new(category, *added)
        }
        ["Remove", ..] => {
            return Err(CraftError::malformed(raw, "Remove with unexpected highlight count"))
        }
        _ => Classification::other(plain),
    };
    Ok(classification)
}
