//! Text styles.
//!
//! Frames carry a fully resolved [`TextStyle`]. Named, inheriting styles live in a
//! [`StyleSheet`] owned by whoever assembles the report; it hands out resolved copies.
//!
//! ```
//! use report_gen::{styles, StyleRule, StyleSheet};
//!
//! let mut sheet = StyleSheet::default();
//! sheet.insert("Warning", StyleRule::inherit(styles::BOLD).size_delta(2.0));
//!
//! let warning = sheet.resolve("Warning");
//! assert!(warning.bold);
//! assert_eq!(warning.size, 11.0);
//! ```

use crate::{colours, Colour};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Names of the styles every [`StyleSheet`] starts out with
pub mod styles {
    pub const NORMAL: &str = "Normal";
    pub const SMALL_NORMAL: &str = "SmallNormal";
    pub const HEADING1: &str = "Heading1";
    pub const HEADING2: &str = "Heading2";
    pub const HEADING3: &str = "Heading3";
    pub const HEADING4: &str = "Heading4";
    pub const BOLD: &str = "Bold";
    pub const SMALL_BOLD: &str = "SmallBold";
    pub const ITALIC: &str = "Italic";
    pub const UNDERLINE: &str = "Underline";
    pub const FOOTER: &str = "Footer";
    pub const HEADER: &str = "Header";
    pub const TABLE_HEADER: &str = "TableHeader";
    pub const TABLE_ROW: &str = "TableRow";
    pub const TABLE_SUBTOTAL: &str = "TableSubTotal";
    pub const TABLE_TOTAL: &str = "TableTotal";
}

/// A resolved text style: everything a backend needs to measure and draw text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub font_family: String,
    /// Font size in points
    pub size: f32,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub text_colour: Colour,
    /// Fill behind the text; white means no fill
    pub background: Colour,
}

impl Default for TextStyle {
    fn default() -> Self {
        TextStyle {
            font_family: "Helvetica".to_string(),
            size: 9.0,
            bold: false,
            italic: false,
            underline: false,
            text_colour: colours::BLACK,
            background: colours::WHITE,
        }
    }
}

/// A named style definition. Unset fields are inherited from the parent rule
/// (or the built-in defaults); an unset size is the parent's size plus
/// `size_delta`.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleRule {
    pub parent: Option<String>,
    pub font_family: Option<String>,
    pub size: Option<f32>,
    pub size_delta: f32,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    pub text_colour: Option<Colour>,
    pub background: Option<Colour>,
}

impl StyleRule {
    /// A rule inheriting everything from `parent`
    pub fn inherit<S: ToString>(parent: S) -> StyleRule {
        StyleRule {
            parent: Some(parent.to_string()),
            ..StyleRule::default()
        }
    }

    pub fn font_family<S: ToString>(mut self, family: S) -> Self {
        self.font_family = Some(family.to_string());
        self
    }

    pub fn size(mut self, size: f32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn size_delta(mut self, delta: f32) -> Self {
        self.size_delta = delta;
        self
    }

    pub fn bold(mut self, bold: bool) -> Self {
        self.bold = Some(bold);
        self
    }

    pub fn italic(mut self, italic: bool) -> Self {
        self.italic = Some(italic);
        self
    }

    pub fn underline(mut self, underline: bool) -> Self {
        self.underline = Some(underline);
        self
    }

    pub fn text_colour(mut self, colour: Colour) -> Self {
        self.text_colour = Some(colour);
        self
    }

    pub fn background(mut self, colour: Colour) -> Self {
        self.background = Some(colour);
        self
    }

    fn apply(&self, base: &TextStyle) -> TextStyle {
        TextStyle {
            font_family: self
                .font_family
                .clone()
                .unwrap_or_else(|| base.font_family.clone()),
            size: self.size.unwrap_or(base.size + self.size_delta),
            bold: self.bold.unwrap_or(base.bold),
            italic: self.italic.unwrap_or(base.italic),
            underline: self.underline.unwrap_or(base.underline),
            text_colour: self.text_colour.unwrap_or(base.text_colour),
            background: self.background.unwrap_or(base.background),
        }
    }
}

/// A table of named [`StyleRule`]s
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleSheet {
    rules: BTreeMap<String, StyleRule>,
}

impl Default for StyleSheet {
    fn default() -> Self {
        use styles::*;

        let normal = TextStyle::default();
        let mut sheet = StyleSheet::empty();
        sheet
            .insert(
                NORMAL,
                StyleRule::default()
                    .font_family(&normal.font_family)
                    .size(normal.size)
                    .bold(false)
                    .italic(false)
                    .underline(false)
                    .text_colour(normal.text_colour)
                    .background(normal.background),
            )
            .insert(SMALL_NORMAL, StyleRule::inherit(NORMAL).size_delta(-1.0))
            .insert(HEADING1, StyleRule::inherit(NORMAL).size_delta(9.0).bold(true))
            .insert(HEADING2, StyleRule::inherit(NORMAL).size_delta(6.0).bold(true))
            .insert(
                HEADING3,
                StyleRule::inherit(NORMAL).size_delta(3.0).bold(true).italic(true),
            )
            .insert(
                HEADING4,
                StyleRule::inherit(NORMAL).size_delta(1.0).bold(true).italic(true),
            )
            .insert(BOLD, StyleRule::inherit(NORMAL).bold(true))
            .insert(SMALL_BOLD, StyleRule::inherit(NORMAL).size_delta(-1.0).bold(true))
            .insert(ITALIC, StyleRule::inherit(NORMAL).italic(true))
            .insert(UNDERLINE, StyleRule::inherit(NORMAL).underline(true))
            .insert(FOOTER, StyleRule::inherit(NORMAL).size_delta(-1.0))
            .insert(HEADER, StyleRule::inherit(NORMAL).size_delta(-1.0))
            .insert(TABLE_HEADER, StyleRule::inherit(NORMAL).size_delta(-1.0).bold(true))
            .insert(TABLE_ROW, StyleRule::inherit(NORMAL).size_delta(-1.0))
            .insert(
                TABLE_SUBTOTAL,
                StyleRule::inherit(NORMAL).size_delta(-1.0).italic(true),
            )
            .insert(TABLE_TOTAL, StyleRule::inherit(NORMAL).size_delta(-1.0).bold(true));
        sheet
    }
}

impl StyleSheet {
    /// A sheet without any rules, not even `Normal`
    pub fn empty() -> StyleSheet {
        StyleSheet {
            rules: BTreeMap::new(),
        }
    }

    /// Add or replace a rule
    pub fn insert<S: ToString>(&mut self, name: S, rule: StyleRule) -> &mut Self {
        self.rules.insert(name.to_string(), rule);
        self
    }

    pub fn get(&self, name: &str) -> Option<&StyleRule> {
        self.rules.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut StyleRule> {
        self.rules.get_mut(name)
    }

    /// Resolve a style by name, following parents. Unknown names resolve as
    /// `Normal`; a parent chain that loops back on itself stops at the repeat.
    pub fn resolve(&self, name: &str) -> TextStyle {
        let start = if self.rules.contains_key(name) {
            name
        } else {
            styles::NORMAL
        };

        let mut chain: Vec<&StyleRule> = Vec::new();
        let mut visited: Vec<&str> = Vec::new();
        let mut next = Some(start);
        while let Some(current) = next {
            if visited.contains(&current) {
                log::warn!("style `{current}` inherits from itself");
                break;
            }
            let Some(rule) = self.rules.get(current) else {
                break;
            };
            visited.push(current);
            chain.push(rule);
            next = rule.parent.as_deref();
        }

        chain
            .iter()
            .rev()
            .fold(TextStyle::default(), |base, rule| rule.apply(&base))
    }
}
