pub mod group;
pub mod order;

use std::io::{self, Write};

use crate::price::PriceTable;
use group::{CategoryGroup, SubcategoryGroup};

/// Closing line of a summary report unless settings provide another.
pub const ATTRIBUTION: &str = "_Generated with hortiscan_";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Every record's text under `# <category>` headings.
    Full,
    /// Priced, level-filtered counts per subcategory.
    Summary,
}

impl RenderMode {
    pub fn from_full_flag(full: bool) -> Self {
        if full {
            Self::Full
        } else {
            Self::Summary
        }
    }
}

/// Summary-mode knobs. Full mode ignores all of them.
#[derive(Debug, Clone)]
pub struct ReportOptions<'a> {
    pub prices: &'a PriceTable,
    pub hide_categories: &'a [String],
    pub min_level: u32,
    pub lucky_price: &'a str,
    pub header: Option<&'a str>,
    pub footer: &'a str,
}

pub fn render(groups: &[CategoryGroup], mode: RenderMode, opts: &ReportOptions) -> Vec<String> {
    match mode {
        RenderMode::Full => render_full(groups),
        RenderMode::Summary => render_summary(groups, opts),
    }
}

fn render_full(groups: &[CategoryGroup]) -> Vec<String> {
    let mut lines = Vec::new();
    for group in groups {
        lines.push(format!("# {}", group.name));
        lines.extend(group.records().map(|r| r.plaintext()));
    }
    lines
}

fn render_summary(groups: &[CategoryGroup], opts: &ReportOptions) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(header) = opts.header {
        lines.push(header.to_string());
    }

    for group in groups {
        if opts.hide_categories.iter().any(|c| *c == group.name) {
            continue;
        }
        let body: Vec<String> = group
            .subcategories
            .iter()
            .filter_map(|sub| summary_line(&group.name, sub, opts))
            .collect();
        // Nothing left above the level threshold: no heading either.
        if body.is_empty() {
            continue;
        }
        lines.push(String::new());
        lines.push(format!("__**{}:**__", group.name));
        lines.extend(body);
    }

    lines.push(String::new());
    lines.push(opts.footer.to_string());
    lines
}

/// `"<sub> (<counts>): **<price>**"`, or `None` when nothing reaches the level threshold.
fn summary_line(category: &str, sub: &SubcategoryGroup, opts: &ReportOptions) -> Option<String> {
    let (total, lucky) = sub
        .records
        .iter()
        .filter(|r| r.level >= opts.min_level)
        .fold((0usize, 0usize), |(n, l), r| (n + 1, l + usize::from(r.lucky)));
    if total == 0 {
        return None;
    }
    let normal = total - lucky;

    let counts = match (normal, lucky) {
        (n, 0) => format!("x{}", n),
        (0, l) => format!("x{} Lucky", l),
        (n, l) => format!("x{} + x{} Lucky", n, l),
    };

    let base = opts.prices.resolve_display(category, &sub.name);
    let price = match (normal, lucky) {
        (_, 0) => base,
        (0, _) => format!("{} + {}", base, opts.lucky_price),
        _ => format!("{} (Lucky +{})", base, opts.lucky_price),
    };

    Some(format!("{} ({}): **{}**", sub.name, counts, price))
}

/// Write each line followed by a newline, then flush.
pub fn write_lines<W: Write>(mut out: W, lines: &[String]) -> io::Result<()> {
    for line in lines {
        writeln!(out, "{}", line)?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::craft::{classify, CraftRecord, Variant};
    use group::aggregate;

    fn prices() -> PriceTable {
        serde_json::from_str(
            r#"{"Augment": {"Fire": "20c", "default": "5c"}, "Remove": {"Cold": "3c"}, "default": "1c"}"#,
        )
        .unwrap()
    }

    fn groups(texts: &[&str]) -> Vec<CategoryGroup> {
        let prices = prices();
        let records: Vec<CraftRecord> = texts
            .iter()
            .map(|t| classify(t, Variant::Phrase, &prices).unwrap())
            .collect();
        aggregate(records)
    }

    fn summary(groups: &[CategoryGroup], min_level: u32, hide: &[String]) -> Vec<String> {
        let prices = prices();
        let opts = ReportOptions {
            prices: &prices,
            hide_categories: hide,
            min_level,
            lucky_price: "2c",
            header: Some("[HSC] IGN: @Someone"),
            footer: ATTRIBUTION,
        };
        render(groups, RenderMode::Summary, &opts)
    }

    #[test]
    fn lucky_only_line() {
        let g = groups(&["Augment a random item with a new Fire modifier (83) (Lucky)"]);
        let lines = summary(&g, 80, &[]);
        assert_eq!(
            lines,
            vec![
                "[HSC] IGN: @Someone",
                "",
                "__**Augment:**__",
                "Fire (x1 Lucky): **20c + 2c**",
                "",
                ATTRIBUTION,
            ]
        );
    }

    #[test]
    fn normal_and_lucky_line() {
        let g = groups(&[
            "Augment a Magic or Rare item with a new Cold modifier (82)",
            "Augment a Magic or Rare item with a new Cold modifier (84)",
            "Augment a Magic or Rare item with a new Cold modifier with Lucky values (85)",
            "Remove a random Cold modifier from an item (70)",
        ]);
        let lines = summary(&g, 0, &[]);
        assert!(lines.contains(&"Cold (x2 + x1 Lucky): **5c (Lucky +2c)**".to_string()));
        assert!(lines.contains(&"Cold (x1): **3c**".to_string()));
    }

    #[test]
    fn level_threshold_drops_empty_subcategories() {
        let g = groups(&[
            "Remove a random Fire modifier from an item (60)",
            "Remove a random Cold modifier from an item (60)",
            "Remove a random Cold modifier from an item (81)",
        ]);
        let lines = summary(&g, 75, &[]);
        assert!(lines.contains(&"Cold (x1): **3c**".to_string()));
        assert!(!lines.iter().any(|l| l.starts_with("Fire")));
    }

    #[test]
    fn level_threshold_drops_empty_categories() {
        let g = groups(&[
            "Remove a random Fire modifier from an item (40)",
            "Augment a Magic or Rare item with a new Fire modifier (90)",
        ]);
        let lines = summary(&g, 80, &[]);
        assert_eq!(
            lines,
            vec![
                "[HSC] IGN: @Someone",
                "",
                "__**Augment:**__",
                "Fire (x1): **20c**",
                "",
                ATTRIBUTION,
            ]
        );
    }

    #[test]
    fn hidden_categories_are_skipped() {
        let g = groups(&[
            "Remove a random Fire modifier from an item (80)",
            "Sacrifice a gem (80)",
        ]);
        let lines = summary(&g, 0, &["Other".to_string()]);
        assert!(lines.contains(&"__**Remove:**__".to_string()));
        assert!(!lines.iter().any(|l| l.contains("Other") || l.contains("Sacrifice")));
    }

    #[test]
    fn full_mode_lists_every_record() {
        let texts = [
            "<white>{Remove} a random <white>{Fire} modifier from an item (40)",
            "Sacrifice a gem (80)",
            "Augment a Magic or Rare item with a new Fire modifier (50)",
            "Remove a random Cold modifier from an item (41)",
        ];
        let g = groups(&texts);
        let prices = prices();
        let opts = ReportOptions {
            prices: &prices,
            hide_categories: &["Other".to_string()],
            min_level: 99,
            lucky_price: "2c",
            header: Some("header"),
            footer: "footer",
        };
        let lines = render(&g, RenderMode::Full, &opts);
        assert_eq!(
            lines,
            vec![
                "# Augment",
                "Augment a Magic or Rare item with a new Fire modifier (50)",
                "# Remove",
                "Remove a random Fire modifier from an item (40)",
                "Remove a random Cold modifier from an item (41)",
                "# Other",
                "Sacrifice a gem (80)",
            ]
        );
    }

    #[test]
    fn missing_price_renders_empty() {
        let g = groups(&["Sacrifice a gem (80)"]);
        let empty = PriceTable::default();
        let opts = ReportOptions {
            prices: &empty,
            hide_categories: &[],
            min_level: 0,
            lucky_price: "?",
            header: None,
            footer: ATTRIBUTION,
        };
        let lines = render(&g, RenderMode::Summary, &opts);
        assert_eq!(lines[0], "");
        assert_eq!(lines[2], "Sacrifice a gem (80) (x1): ****");
    }

    #[test]
    fn writes_one_line_each() {
        let mut buf = Vec::new();
        write_lines(&mut buf, &["a".to_string(), String::new(), "b".to_string()]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "a\n\nb\n");
    }
}
