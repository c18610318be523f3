use thiserror::Error;

/// A raw craft string that cannot be turned into a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CraftError {
    #[error("Malformed craft text ({reason}): {text:?}")]
    MalformedInput { text: String, reason: &'static str },
}

impl CraftError {
    pub fn malformed(text: &str, reason: &'static str) -> Self {
        Self::MalformedInput {
            text: text.to_string(),
            reason,
        }
    }
}
