use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::slug::slugify;

/// One content block.
///
/// The set of variants is closed: every consumer inside this crate matches exhaustively, so a
/// new variant fails to compile until the validator, the link extractor, and any renderer
/// handle it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Section {
    Prose {
        text: String,
    },
    BulletList {
        items: Vec<String>,
    },
    NumberedList {
        items: Vec<String>,
    },
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
    },
    Callout {
        kind: CalloutKind,
        title: String,
        body: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum CalloutKind {
    Info,
    Tip,
    Warning,
    Example,
}

impl Section {
    pub fn prose(text: impl Into<String>) -> Self {
        Section::Prose { text: text.into() }
    }

    pub fn bullets<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Section::BulletList {
            items: items.into_iter().map(Into::into).collect(),
        }
    }

    pub fn table<H, S>(headers: H, rows: Vec<Vec<String>>) -> Self
    where
        H: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Section::Table {
            headers: headers.into_iter().map(Into::into).collect(),
            rows,
            caption: None,
        }
    }

    /// True when the block carries no content. Empty lists and tables are content errors.
    ///
    /// A table needs at least one header and one non-empty row; a callout needs a body.
    pub fn is_empty(&self) -> bool {
        match self {
            Section::Prose { text } => text.trim().is_empty(),
            Section::BulletList { items } | Section::NumberedList { items } => items.is_empty(),
            Section::Table { headers, rows, .. } => {
                headers.is_empty() || rows.iter().all(|row| row.is_empty())
            }
            Section::Callout { body, .. } => body.trim().is_empty(),
        }
    }

    /// Zero-based indices of table rows whose width differs from the header count.
    pub fn misshapen_rows(&self) -> Vec<usize> {
        match self {
            Section::Table { headers, rows, .. } => rows
                .iter()
                .enumerate()
                .filter(|(_, row)| row.len() != headers.len())
                .map(|(idx, _)| idx)
                .collect(),
            Section::Prose { .. }
            | Section::BulletList { .. }
            | Section::NumberedList { .. }
            | Section::Callout { .. } => Vec::new(),
        }
    }

    /// Text fields that may carry inline Markdown (and therefore links).
    pub fn inline_texts(&self) -> Vec<&str> {
        match self {
            Section::Prose { text } => vec![text.as_str()],
            Section::BulletList { items } | Section::NumberedList { items } => {
                items.iter().map(String::as_str).collect()
            }
            Section::Table { rows, caption, .. } => rows
                .iter()
                .flatten()
                .map(String::as_str)
                .chain(caption.as_deref())
                .collect(),
            Section::Callout { body, .. } => vec![body.as_str()],
        }
    }
}

/// A navigable, titled block of content.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SectionContainer {
    /// Anchor id, unique within the article.
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    pub title: String,
    #[serde(default)]
    pub body: Vec<Section>,
    /// Decorative containers are allowed to stay out of the table of contents.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub decorative: bool,
}

impl SectionContainer {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            icon: None,
            theme: None,
            title: title.into(),
            body: Vec::new(),
            decorative: false,
        }
    }

    /// Builds a container whose id is derived from its title.
    pub fn titled(title: impl Into<String>) -> Self {
        let title = title.into();
        let id = slugify(&title).unwrap_or_else(|| "section".to_string());
        Self::new(id, title)
    }

    pub fn with_block(mut self, block: Section) -> Self {
        self.body.push(block);
        self
    }

    pub fn decorative(mut self) -> Self {
        self.decorative = true;
        self
    }
}
