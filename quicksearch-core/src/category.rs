//! The fixed registry of result categories.
//!
//! Every category maps to one remote index (`prefix + key`). The registry
//! order is the order queries are batched in and the order result groups
//! are rendered in.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::Hit;

/// Separator placed between section label fragments.
pub const SECTION_SEPARATOR: &str = " \u{b7} ";

/// Label used when a blog post carries no parseable date.
const INVALID_DATE: &str = "Invalid Date";

/// Derives section label fragments from a hit.
pub type SectionFn = fn(&Hit) -> Vec<String>;

/// A logical result group backed by one remote index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IndexCategory {
    Guides,
    Documentation,
    BlogPosts,
    Examples,
    Other,
}

impl IndexCategory {
    /// Returns every category in registry order.
    pub fn all() -> &'static [IndexCategory] {
        &[
            Self::Guides,
            Self::Documentation,
            Self::BlogPosts,
            Self::Examples,
            Self::Other,
        ]
    }

    /// Key appended to the index prefix, and used in normalized results.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Guides => "guides",
            Self::Documentation => "documentation",
            Self::BlogPosts => "blog-posts",
            Self::Examples => "examples",
            Self::Other => "other",
        }
    }

    /// Human-readable group title.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Guides => "Guides",
            Self::Documentation => "Documentation",
            Self::BlogPosts => "Blog Posts",
            Self::Examples => "Examples",
            Self::Other => "Other",
        }
    }

    /// CSS class applied to the rendered group.
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Guides => "guides",
            Self::Documentation => "docs",
            Self::BlogPosts | Self::Examples => "more",
            Self::Other => "other",
        }
    }

    /// Looks up a category by key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::all().iter().copied().find(|c| c.key() == key)
    }

    /// Section label function, if this category has one.
    pub fn section_fn(&self) -> Option<SectionFn> {
        match self {
            Self::Guides => Some(guide_section),
            Self::Documentation => Some(documentation_section),
            Self::BlogPosts => Some(blog_post_section),
            Self::Examples | Self::Other => None,
        }
    }

    /// Section label for a hit: fragments joined with [`SECTION_SEPARATOR`],
    /// or the empty string for categories without a section function.
    pub fn section_label(&self, hit: &Hit) -> String {
        match self.section_fn() {
            Some(section) => section(hit).join(SECTION_SEPARATOR),
            None => String::new(),
        }
    }
}

impl fmt::Display for IndexCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

fn guide_section(hit: &Hit) -> Vec<String> {
    let mut section = vec![hit.str_field("group").unwrap_or_default().to_owned()];
    if let Some(subgroup) = hit.str_field("subgroup").filter(|s| !s.is_empty()) {
        section.push(subgroup.to_owned());
    }
    section
}

fn documentation_section(hit: &Hit) -> Vec<String> {
    vec![hit.str_field("language").unwrap_or_default().to_owned()]
}

/// `posted` looks like `2024-03-04 10:15:00 +0000`; only the date is shown.
fn blog_post_section(hit: &Hit) -> Vec<String> {
    let label = hit
        .str_field("posted")
        .and_then(|posted| posted.split(' ').next())
        .filter(|date| !date.is_empty())
        .and_then(|date| NaiveDate::parse_from_str(date, "%Y-%m-%d").ok())
        .map(|date| date.format("%b %d %Y").to_string())
        .unwrap_or_else(|| INVALID_DATE.to_owned());
    vec![label]
}
