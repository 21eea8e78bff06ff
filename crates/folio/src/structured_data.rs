//! JSON-LD projection of an article.
//!
//! The synthesizer is a pure function of an [`Article`] and the site identity it was built
//! with. FAQ questions come from `Article::faqs` only, the same field the page renders, so the
//! page and its structured data cannot drift apart.

use serde::Serialize;
use url::Url;

use crate::article::{Article, ProductDeclaration};
use crate::config::{Publisher, SiteConfig};
use crate::error::FolioError;

pub const SCHEMA_CONTEXT: &str = "https://schema.org";

/// Top-level JSON-LD document: `{ "@context": ..., "@graph": [...] }`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StructuredDataGraph {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@graph")]
    pub graph: Vec<GraphNode>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "@type")]
pub enum GraphNode {
    Article(ArticleNode),
    #[serde(rename = "FAQPage")]
    FaqPage(FaqPageNode),
    Product(ProductNode),
    BreadcrumbList(BreadcrumbListNode),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleNode {
    #[serde(rename = "@id")]
    pub id: String,
    pub headline: String,
    pub description: String,
    pub author: Person,
    pub publisher: Organization,
    pub date_published: String,
    pub date_modified: String,
    pub main_entity_of_page: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_section: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Person {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Organization {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<ImageObject>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ImageObject {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqPageNode {
    pub main_entity: Vec<Question>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: String,
    pub accepted_answer: Answer,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Answer {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductNode {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<Brand>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregate_rating: Option<AggregateRating>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Brand {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateRating {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub rating_value: f64,
    pub review_count: u32,
    pub best_rating: f64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreadcrumbListNode {
    pub item_list_element: Vec<ListItem>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ListItem {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub position: u32,
    pub name: String,
    pub item: String,
}

impl StructuredDataGraph {
    pub fn article(&self) -> Option<&ArticleNode> {
        self.graph.iter().find_map(|node| match node {
            GraphNode::Article(article) => Some(article),
            _ => None,
        })
    }

    pub fn faq_page(&self) -> Option<&FaqPageNode> {
        self.graph.iter().find_map(|node| match node {
            GraphNode::FaqPage(page) => Some(page),
            _ => None,
        })
    }

    pub fn product(&self) -> Option<&ProductNode> {
        self.graph.iter().find_map(|node| match node {
            GraphNode::Product(product) => Some(product),
            _ => None,
        })
    }

    pub fn breadcrumbs(&self) -> Option<&BreadcrumbListNode> {
        self.graph.iter().find_map(|node| match node {
            GraphNode::BreadcrumbList(list) => Some(list),
            _ => None,
        })
    }

    pub fn to_json_value(&self) -> Result<serde_json::Value, FolioError> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, FolioError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Builds structured-data graphs for one site.
#[derive(Clone, Debug)]
pub struct Synthesizer {
    site_name: String,
    home: Url,
    articles_root: Url,
    publisher: Publisher,
    default_author: String,
}

impl Synthesizer {
    /// Resolves the site's URLs once; fails when the base URL or route prefix is unusable.
    pub fn new(config: &SiteConfig) -> Result<Self, FolioError> {
        let base = config.base_url()?;
        let home = base
            .join("/")
            .map_err(|err| FolioError::Config(format!("cannot derive home URL: {err}")))?;
        let articles_root = base.join(&config.article_prefix()).map_err(|err| {
            FolioError::Config(format!(
                "route prefix '{}' does not form a URL: {err}",
                config.article_prefix()
            ))
        })?;

        Ok(Self {
            site_name: config.site.name.clone(),
            home,
            articles_root,
            publisher: config.publisher(),
            default_author: config.default_author().to_string(),
        })
    }

    /// Absolute canonical URL of an article page.
    pub fn canonical_url(&self, slug: &str) -> String {
        format!("{}{slug}", self.articles_root.as_str())
    }

    pub fn build(&self, article: &Article) -> StructuredDataGraph {
        let mut graph = vec![GraphNode::Article(self.article_node(article))];
        if let Some(page) = faq_page(article) {
            graph.push(GraphNode::FaqPage(page));
        }
        if let Some(product) = &article.product {
            graph.push(GraphNode::Product(product_node(product)));
        }
        graph.push(GraphNode::BreadcrumbList(self.breadcrumbs(article)));

        StructuredDataGraph {
            context: SCHEMA_CONTEXT,
            graph,
        }
    }

    fn article_node(&self, article: &Article) -> ArticleNode {
        let canonical = self.canonical_url(&article.slug);
        let keywords = &article.metadata.keywords;

        ArticleNode {
            id: format!("{canonical}#article"),
            headline: article.title.clone(),
            description: article.metadata.description.clone(),
            author: Person {
                kind: "Person",
                name: article
                    .author
                    .clone()
                    .unwrap_or_else(|| self.default_author.clone()),
            },
            publisher: Organization {
                kind: "Organization",
                name: self.publisher.name.clone(),
                logo: self.publisher.logo.clone().map(|url| ImageObject {
                    kind: "ImageObject",
                    url,
                }),
            },
            date_published: article.published.to_string(),
            date_modified: article.date_modified().to_string(),
            main_entity_of_page: canonical,
            keywords: (!keywords.is_empty()).then(|| keywords.join(", ")),
            article_section: (!article.category.is_empty()).then(|| article.category.clone()),
        }
    }

    fn breadcrumbs(&self, article: &Article) -> BreadcrumbListNode {
        BreadcrumbListNode {
            item_list_element: vec![
                ListItem {
                    kind: "ListItem",
                    position: 1,
                    name: self.site_name.clone(),
                    item: self.home.to_string(),
                },
                ListItem {
                    kind: "ListItem",
                    position: 2,
                    name: article.title.clone(),
                    item: self.canonical_url(&article.slug),
                },
            ],
        }
    }
}

fn faq_page(article: &Article) -> Option<FaqPageNode> {
    if article.faqs.is_empty() {
        return None;
    }
    let main_entity = article
        .faqs
        .iter()
        .map(|faq| Question {
            kind: "Question",
            name: faq.question.clone(),
            accepted_answer: Answer {
                kind: "Answer",
                text: faq.answer.clone(),
            },
        })
        .collect();
    Some(FaqPageNode { main_entity })
}

fn product_node(product: &ProductDeclaration) -> ProductNode {
    ProductNode {
        name: product.name.clone(),
        description: product.description.clone(),
        brand: product.brand.clone().map(|name| Brand {
            kind: "Brand",
            name,
        }),
        aggregate_rating: product.rating.as_ref().map(|rating| AggregateRating {
            kind: "AggregateRating",
            rating_value: rating.value,
            review_count: rating.review_count,
            best_rating: rating.best,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::{FaqEntry, ProductRating};
    use chrono::NaiveDate;

    fn config() -> SiteConfig {
        let mut config = SiteConfig::new("Example Finance", "https://www.example.com");
        config.routes.articles = "/learn/".into();
        config.site.publisher = Some(Publisher {
            name: "Example Media".into(),
            logo: Some("https://www.example.com/logo.png".into()),
        });
        config
    }

    fn article() -> Article {
        Article::new(
            "silver-ira-guide",
            "Silver IRA guide",
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        )
        .with_category("Precious Metals")
        .with_description("How silver fits in an IRA.")
    }

    #[test]
    fn article_node_carries_site_identity_and_dates() {
        let graph = Synthesizer::new(&config()).unwrap().build(&article());
        let node = graph.article().unwrap();

        assert_eq!(
            node.main_entity_of_page,
            "https://www.example.com/learn/silver-ira-guide"
        );
        assert_eq!(node.author.name, "Example Finance");
        assert_eq!(node.publisher.name, "Example Media");
        assert_eq!(node.date_published, "2024-02-01");
        assert_eq!(node.date_modified, "2024-02-01");
        assert_eq!(node.article_section.as_deref(), Some("Precious Metals"));
        assert!(graph.faq_page().is_none());
        assert!(graph.product().is_none());
    }

    #[test]
    fn faq_page_is_built_from_faqs_and_ignores_legacy_copy() {
        let mut article = article()
            .with_faq("Is silver volatile?", "More than gold.")
            .with_faq("Can I hold coins?", "Only approved ones.");
        article.structured_faqs = Some(vec![FaqEntry::new("Stale?", "Stale.")]);

        let graph = Synthesizer::new(&config()).unwrap().build(&article);
        let page = graph.faq_page().unwrap();
        assert_eq!(page.main_entity.len(), 2);
        for (question, faq) in page.main_entity.iter().zip(&article.faqs) {
            assert_eq!(question.name, faq.question);
            assert_eq!(question.accepted_answer.text, faq.answer);
        }
    }

    #[test]
    fn json_shape_follows_schema_org_graph_convention() {
        let article = article().with_faq("Q?", "A.");
        let value = Synthesizer::new(&config())
            .unwrap()
            .build(&article)
            .to_json_value()
            .unwrap();

        assert_eq!(value["@context"], "https://schema.org");
        let graph = value["@graph"].as_array().unwrap();
        let types: Vec<_> = graph.iter().map(|n| n["@type"].as_str().unwrap()).collect();
        assert_eq!(types, vec!["Article", "FAQPage", "BreadcrumbList"]);

        let question = &graph[1]["mainEntity"][0];
        assert_eq!(question["@type"], "Question");
        assert_eq!(question["name"], "Q?");
        assert_eq!(question["acceptedAnswer"]["@type"], "Answer");
        assert_eq!(question["acceptedAnswer"]["text"], "A.");
    }

    #[test]
    fn product_node_with_rating() {
        let mut article = article();
        article.product = Some(ProductDeclaration {
            name: "Silver IRA account".into(),
            description: "Self-directed IRA holding silver.".into(),
            brand: Some("Example Metals".into()),
            rating: Some(ProductRating {
                value: 4.6,
                review_count: 120,
                best: 5.0,
            }),
        });

        let value = Synthesizer::new(&config())
            .unwrap()
            .build(&article)
            .to_json_value()
            .unwrap();
        let product = &value["@graph"][1];
        assert_eq!(product["@type"], "Product");
        assert_eq!(product["brand"]["name"], "Example Metals");
        assert_eq!(product["aggregateRating"]["reviewCount"], 120);
    }

    #[test]
    fn build_is_idempotent() {
        let synthesizer = Synthesizer::new(&config()).unwrap();
        let article = article().with_faq("Q?", "A.");
        assert_eq!(
            synthesizer.build(&article).to_json_pretty().unwrap(),
            synthesizer.build(&article).to_json_pretty().unwrap()
        );
    }

    #[test]
    fn breadcrumbs_lead_from_home_to_article() {
        let graph = Synthesizer::new(&config()).unwrap().build(&article());
        let items = &graph.breadcrumbs().unwrap().item_list_element;
        assert_eq!(items[0].item, "https://www.example.com/");
        assert_eq!(items[1].position, 2);
        assert_eq!(items[1].item, "https://www.example.com/learn/silver-ira-guide");
    }
}
