use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::section::SectionContainer;

/// One addressable long-form content unit.
///
/// Articles are authored once and never mutated while registered; updates go through
/// [`crate::Registry::replace`], which swaps the whole entity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// URL-safe identifier, immutable once published.
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    pub metadata: PageMetadata,
    pub category: String,
    /// Byline. Falls back to the site default author in structured data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub published: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<NaiveDate>,
    #[serde(default)]
    pub takeaways: Vec<String>,
    #[serde(default)]
    pub toc_items: Vec<TocEntry>,
    #[serde(default)]
    pub sections: Vec<SectionContainer>,
    #[serde(default)]
    pub faqs: Vec<FaqEntry>,
    /// Hand-maintained copy of the FAQ block as declared to search engines.
    ///
    /// Structured data is always synthesized from `faqs`; this field is only compared against
    /// `faqs` so that stale duplicates are caught while content migrates off it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structured_faqs: Option<Vec<FaqEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning_box: Option<WarningBox>,
    #[serde(default, alias = "goldBridge", skip_serializing_if = "Option::is_none")]
    pub promo: Option<PromoBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<ProductDeclaration>,
    #[serde(default)]
    pub related_articles: Vec<String>,
    #[serde(default)]
    pub related_guides: Vec<String>,
    #[serde(default)]
    pub related_tools: Vec<String>,
}

/// Page head metadata, passed through to the head generator untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TocEntry {
    pub id: String,
    pub label: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

impl FaqEntry {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct WarningBox {
    pub title: String,
    pub body: String,
}

/// Promotional call-to-action block rendered between sections.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PromoBlock {
    pub headline: String,
    #[serde(default)]
    pub body: String,
    pub cta_label: String,
    pub cta_href: String,
}

/// Source for the `Product` structured-data node on review-style articles.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductDeclaration {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<ProductRating>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductRating {
    pub value: f64,
    pub review_count: u32,
    #[serde(default = "default_best_rating")]
    pub best: f64,
}

fn default_best_rating() -> f64 {
    5.0
}

impl Article {
    /// Starts an article with empty content and metadata mirrored from the title.
    pub fn new(slug: impl Into<String>, title: impl Into<String>, published: NaiveDate) -> Self {
        let title = title.into();
        Self {
            slug: slug.into(),
            subtitle: String::new(),
            metadata: PageMetadata {
                title: title.clone(),
                description: String::new(),
                keywords: Vec::new(),
            },
            title,
            category: String::new(),
            author: None,
            published,
            modified: None,
            takeaways: Vec::new(),
            toc_items: Vec::new(),
            sections: Vec::new(),
            faqs: Vec::new(),
            structured_faqs: None,
            warning_box: None,
            promo: None,
            product: None,
            related_articles: Vec::new(),
            related_guides: Vec::new(),
            related_tools: Vec::new(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.metadata.description = description.into();
        self
    }

    /// Appends a section container together with its table-of-contents entry.
    pub fn with_section(mut self, section: SectionContainer) -> Self {
        if !section.decorative {
            self.toc_items.push(TocEntry {
                id: section.id.clone(),
                label: section.title.clone(),
            });
        }
        self.sections.push(section);
        self
    }

    pub fn with_faq(mut self, question: impl Into<String>, answer: impl Into<String>) -> Self {
        self.faqs.push(FaqEntry::new(question, answer));
        self
    }

    pub fn with_related(mut self, slug: impl Into<String>) -> Self {
        self.related_articles.push(slug.into());
        self
    }

    pub fn section(&self, id: &str) -> Option<&SectionContainer> {
        self.sections.iter().find(|section| section.id == id)
    }

    pub fn has_section(&self, id: &str) -> bool {
        self.section(id).is_some()
    }

    /// Last content change, falling back to the publication date.
    pub fn date_modified(&self) -> NaiveDate {
        self.modified.unwrap_or(self.published)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::Section;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[test]
    fn with_section_keeps_toc_in_step() {
        let article = Article::new("silver-ira-guide", "Silver IRA Guide", date())
            .with_section(SectionContainer::titled("Overview").with_block(Section::prose("Hi")))
            .with_section(SectionContainer::new("disclaimer", "Disclaimer").decorative());

        assert_eq!(article.sections.len(), 2);
        assert_eq!(article.toc_items.len(), 1);
        assert_eq!(article.toc_items[0].id, "overview");
        assert!(article.has_section("disclaimer"));
    }

    #[test]
    fn deserializes_camel_case_and_legacy_promo_alias() {
        let yaml = r#"
slug: is-401k-fdic-insured
title: Is a 401(k) FDIC Insured?
metadata:
  title: Is a 401(k) FDIC Insured?
  description: What protects your retirement savings.
category: retirement
published: 2024-01-15
tocItems:
  - { id: overview, label: Overview }
sections:
  - id: overview
    title: Overview
    body:
      - type: prose
        text: Short answer, no.
faqs:
  - question: "Is a 401(k) insured?"
    answer: "Not by the FDIC."
goldBridge:
  headline: Diversify
  ctaLabel: Get the kit
  ctaHref: /kit
relatedArticles: [silver-ira-guide]
"#;
        let article: Article = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(article.toc_items[0].id, "overview");
        assert_eq!(article.related_articles, vec!["silver-ira-guide"]);
        assert_eq!(article.promo.as_ref().unwrap().cta_href, "/kit");
        assert!(article.structured_faqs.is_none());
        assert_eq!(article.date_modified(), article.published);
    }
}
