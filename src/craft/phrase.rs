use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::{
    Classification, AUGMENT, CHANGE_RESISTS, RANDOMISE, REMOVE, REMOVE_ADD, REMOVE_NON_ADD,
    SPECIAL,
};
use crate::error::CraftError;

/// What to do when a lead phrase matches but its pattern does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OnMismatch {
    /// Try the remaining rules (ends in `Other`).
    FallThrough,
    /// The text is malformed.
    Reject(&'static str),
}

struct Rule {
    lead: &'static str,
    pattern: Regex,
    on_mismatch: OnMismatch,
    build: fn(&Captures) -> Classification,
}

impl Rule {
    fn new(
        lead: &'static str,
        pattern: &str,
        on_mismatch: OnMismatch,
        build: fn(&Captures) -> Classification,
    ) -> Self {
        Self {
            lead,
            pattern: Regex::new(pattern).unwrap(),
            on_mismatch,
            build,
        }
    }
}

// Priority order; first lead that matches decides.
static RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        Rule::new(
            "Augment ",
            r"^Augment\b.*?\b(\w+) modifier\b",
            OnMismatch::FallThrough,
            |c| Classification::new(AUGMENT, &c[1]),
        ),
        Rule::new(
            "Randomise ",
            r"^Randomise\b.*?\b(\w+) modifiers\b",
            OnMismatch::FallThrough,
            |c| Classification::new(RANDOMISE, &c[1]),
        ),
        Rule::new(
            "Change ",
            r"^Change\b.*?\bgrants (\w+) Resistance into\b.*?\b(\w+) Resistance\b",
            OnMismatch::FallThrough,
            |c| Classification::new(CHANGE_RESISTS, format!("{} -> {}", &c[1], &c[2])),
        ),
        Rule::new(
            "Remove ",
            r"^Remove a random (non-)?(\w+) modifier\b(?:.*?\band add a new (\w+) modifier\b)?",
            OnMismatch::Reject("Remove without a modifier type"),
            build_remove,
        ),
        Rule::new(
            "Fracture ",
            r"^Fracture a random (\w+)",
            OnMismatch::FallThrough,
            |c| Classification::new(SPECIAL, format!("Fracture {}", &c[1])),
        ),
        Rule::new(
            "Synthesise ",
            r"^Synthesise\b",
            OnMismatch::FallThrough,
            |_| Classification::new(SPECIAL, "Synthesise an item"),
        ),
        Rule::new(
            "Add a random Influence ",
            r"\bRare (\w+) that\b",
            OnMismatch::FallThrough,
            |c| Classification::new(SPECIAL, format!("Influence {}", &c[1])),
        ),
    ]
});

fn build_remove(c: &Captures) -> Classification {
    let non = c.get(1).is_some();
    match c.get(3) {
        None => Classification::new(REMOVE, &c[2]),
        Some(added) if non => Classification::new(REMOVE_NON_ADD, added.as_str()),
        Some(added) => Classification::new(REMOVE_ADD, added.as_str()),
    }
}

/// Run the lead-phrase cascade over markup-free text. `raw` is only used for errors.
pub fn classify(raw: &str, plain: &str) -> Result<Classification, CraftError> {
    for rule in RULES.iter() {
        if !plain.starts_with(rule.lead) {
            continue;
        }
        match (rule.pattern.captures(plain), rule.on_mismatch) {
            (Some(caps), _) => return Ok((rule.build)(&caps)),
            (None, OnMismatch::Reject(reason)) => return Err(CraftError::malformed(raw, reason)),
            (None, OnMismatch::FallThrough) => {}
        }
    }
    Ok(Classification::other(plain))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(plain: &str) -> Classification {
        classify(plain, plain).unwrap()
    }

    #[test]
    fn augment() {
        let c = run("Augment a Magic or Rare item with a new Lightning modifier with Lucky values (84)");
        assert_eq!(c, Classification::new("Augment", "Lightning"));
    }

    #[test]
    fn randomise() {
        let c = run("Randomise the numeric values of the random Attack modifiers on a Magic or Rare item (77)");
        assert_eq!(c, Classification::new("Randomise", "Attack"));
    }

    #[test]
    fn change_resists() {
        let c = run("Change a modifier that grants Lightning Resistance into a similar-tier modifier that grants Fire Resistance (72)");
        assert_eq!(c, Classification::new("Change Resists", "Lightning -> Fire"));
    }

    #[test]
    fn remove_variants() {
        assert_eq!(
            run("Remove a random Life modifier from an item (68)"),
            Classification::new("Remove", "Life")
        );
        assert_eq!(
            run("Remove a random Physical modifier from an item and add a new Physical modifier (79)"),
            Classification::new("Remove/Add", "Physical")
        );
        assert_eq!(
            run("Remove a random non-Cold modifier from an item and add a new Cold modifier (81)"),
            Classification::new("Remove Non-/Add", "Cold")
        );
    }

    #[test]
    fn remove_without_type_is_rejected() {
        let err = classify("Remove the item (70)", "Remove the item (70)").unwrap_err();
        assert!(matches!(err, CraftError::MalformedInput { reason, .. } if reason.contains("Remove")));
    }

    #[test]
    fn remove_needs_a_modifier_type() {
        let text = "Remove a random modifier from an item (70)";
        assert!(matches!(
            classify(text, text),
            Err(CraftError::MalformedInput { .. })
        ));
    }

    #[test]
    fn special_crafts() {
        assert_eq!(
            run("Fracture a random Suffix on an item with at least 3 Suffixes (83)"),
            Classification::new("Special", "Fracture Suffix")
        );
        assert_eq!(
            run("Synthesise an item, giving random Synthesised implicits (80)"),
            Classification::new("Special", "Synthesise an item")
        );
        assert_eq!(
            run("Add a random Influence to a Normal, Magic or Rare Weapon that isn't influenced (75)"),
            Classification::new("Special", "Influence Weapon")
        );
    }

    #[test]
    fn unmatched_lead_falls_through_to_other() {
        let text = "Augment an item with nothing in particular (60)";
        assert_eq!(run(text), Classification::other(text));

        let text = "Add a random Influence to something odd (60)";
        assert_eq!(run(text), Classification::other(text));
    }

    #[test]
    fn unknown_phrase_is_other() {
        let text = "Sacrifice a Corrupted Gem to gain 20% of the gem's total experience (75)";
        assert_eq!(run(text), Classification::new("Other", text));
    }

    #[test]
    fn lead_must_be_a_prefix() {
        let text = "Do not Augment a Magic item with a new Fire modifier (70)";
        assert_eq!(run(text).category, "Other");
    }
}
