use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::price::{Price, PriceTable};
use crate::report::{ReportOptions, ATTRIBUTION};

pub const DEFAULT_LEAGUE: &str = "Harvest";
const UNSET_LUCKY_PRICE: &str = "?";

/// Contents of the JSON settings file (`config.json` by default).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub account_name: Option<String>,
    #[serde(default, rename = "POESESSID")]
    pub poesessid: Option<String>,
    #[serde(default)]
    pub league: Option<String>,
    #[serde(default, rename = "IGN")]
    pub ign: Option<String>,
    #[serde(default)]
    pub price: PriceTable,
    #[serde(default)]
    pub hide_categories: Vec<String>,
    #[serde(default)]
    pub hide_level_under: u32,
    #[serde(default)]
    pub lucky_price: Option<Price>,
    #[serde(default)]
    pub header: Option<String>,
    #[serde(default)]
    pub footer: Option<String>,
    /// Read only this stash tab instead of all of them.
    #[serde(default)]
    pub tab: Option<usize>,
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("Invalid settings in {}", path.display()))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn league(&self) -> &str {
        self.league.as_deref().unwrap_or(DEFAULT_LEAGUE)
    }

    /// Explicit header, else one derived from the in-game name.
    pub fn header_line(&self) -> Option<String> {
        self.header
            .clone()
            .or_else(|| self.ign.as_ref().map(|ign| format!("[HSC] IGN: @{}", ign)))
    }

    /// Borrow the summary-report knobs. `header` is passed in so the caller owns it.
    pub fn report_options<'a>(&'a self, header: Option<&'a str>) -> ReportOptions<'a> {
        ReportOptions {
            prices: &self.price,
            hide_categories: &self.hide_categories,
            min_level: self.hide_level_under,
            lucky_price: self
                .lucky_price
                .as_ref()
                .map(|p| p.0.as_str())
                .unwrap_or(UNSET_LUCKY_PRICE),
            header,
            footer: self.footer.as_deref().unwrap_or(ATTRIBUTION),
        }
    }
}
