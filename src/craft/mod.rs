pub mod highlight;
pub mod phrase;

use std::sync::LazyLock;

use clap::ValueEnum;
use regex::Regex;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::CraftError;
use crate::price::PriceTable;

pub const SPECIAL: &str = "Special";
pub const AUGMENT: &str = "Augment";
pub const REMOVE_ADD: &str = "Remove/Add";
pub const REMOVE: &str = "Remove";
pub const REMOVE_NON_ADD: &str = "Remove Non-/Add";
pub const CHANGE_RESISTS: &str = "Change Resists";
pub const RANDOMISE: &str = "Randomise";
pub const OTHER: &str = "Other";

/// Marker word flagging a lucky outcome, anywhere in the text.
pub const LUCKY_MARKER: &str = "Lucky";

// Last "(N)", optionally followed by non-numeric tags such as "(Lucky)".
static LEVEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((\d+)\)(?:\s*\([^)\d]*\))*\s*$").unwrap());
static MARKUP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<\w+>").unwrap());

/// One classified crafting outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CraftRecord {
    /// Raw source text, untouched.
    pub text: String,
    pub level: u32,
    pub lucky: bool,
    pub category: String,
    pub subcategory: String,
    pub price: String,
}

impl CraftRecord {
    /// Source text without highlight markup.
    pub fn plaintext(&self) -> String {
        plaintext(&self.text)
    }
}

/// Category/subcategory pair produced by a classifier variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub category: String,
    pub subcategory: String,
}

impl Classification {
    pub fn new(category: &str, subcategory: impl Into<String>) -> Self {
        Self {
            category: category.to_string(),
            subcategory: subcategory.into(),
        }
    }

    pub fn other(plain: &str) -> Self {
        Self::new(OTHER, plain)
    }
}

/// Extraction strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Variant {
    /// Whole-phrase lead/pattern cascade.
    #[default]
    Phrase,
    /// Positional `<white>{...}` highlighted tokens (older stash markup).
    Highlight,
}

/// Classify one raw craft string and attach its price.
pub fn classify(
    text: &str,
    variant: Variant,
    prices: &PriceTable,
) -> Result<CraftRecord, CraftError> {
    let level = parse_level(text)
        .ok_or_else(|| CraftError::malformed(text, "missing trailing (level)"))?;
    let plain = plaintext(text);

    let Classification {
        category,
        subcategory,
    } = match variant {
        Variant::Phrase => phrase::classify(text, &plain)?,
        Variant::Highlight => highlight::classify(text, &plain)?,
    };
    let price = prices.resolve_display(&category, &subcategory);

    Ok(CraftRecord {
        text: text.to_string(),
        level,
        lucky: is_lucky(text),
        category,
        subcategory,
        price,
    })
}

/// Result of classifying a batch: records in input order, plus rejected inputs.
#[derive(Debug, Default)]
pub struct Classified {
    pub records: Vec<CraftRecord>,
    pub skipped: Vec<CraftError>,
}

/// Classify every input. In strict mode the first malformed record aborts the
/// batch; otherwise it is logged and skipped.
pub fn classify_all<S: AsRef<str>>(
    texts: &[S],
    variant: Variant,
    prices: &PriceTable,
    strict: bool,
) -> Result<Classified, CraftError> {
    let mut out = Classified {
        records: Vec::with_capacity(texts.len()),
        skipped: Vec::new(),
    };

    for text in texts {
        match classify(text.as_ref(), variant, prices) {
            Ok(record) => {
                debug!("{} / {} <- {}", record.category, record.subcategory, record.text);
                out.records.push(record);
            }
            Err(e) if strict => return Err(e),
            Err(e) => {
                warn!("Skipping record: {}", e);
                out.skipped.push(e);
            }
        }
    }

    Ok(out)
}

pub fn parse_level(text: &str) -> Option<u32> {
    LEVEL_RE.captures(text)?.get(1)?.as_str().parse().ok()
}

pub fn is_lucky(text: &str) -> bool {
    text.contains(LUCKY_MARKER)
}

/// Strip `<white>`-style tags and the braces around highlighted spans.
pub fn plaintext(text: &str) -> String {
    MARKUP_RE.replace_all(text, "").replace(['{', '}'], "")
}
