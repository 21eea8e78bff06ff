use std::collections::{BTreeMap, BTreeSet};

use crate::article::Article;
use crate::registry::Registry;
use crate::slug::{is_path_shaped, is_valid_slug};

use super::links::{InlineTarget, inline_link_targets};
use super::{ValidationOptions, Violation};

/// Runs every per-article check. Checks are independent; none short-circuits another.
pub(super) fn check_article(
    article: &Article,
    registry: &Registry,
    options: &ValidationOptions,
) -> Vec<Violation> {
    let mut out = Vec::new();

    check_slug(article, &mut out);
    check_section_ids(article, &mut out);
    check_anchors(article, &mut out);
    check_unlisted_sections(article, &mut out);
    check_blocks(article, &mut out);
    check_faq_mirroring(article, &mut out);
    check_related_articles(article, registry, &mut out);
    check_external_paths(article, &mut out);
    check_inline_links(article, registry, options, &mut out);

    out
}

fn check_slug(article: &Article, out: &mut Vec<Violation>) {
    if !is_valid_slug(&article.slug) {
        out.push(Violation::InvalidSlug {
            slug: article.slug.clone(),
        });
    }
}

fn check_section_ids(article: &Article, out: &mut Vec<Violation>) {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for section in &article.sections {
        *counts.entry(section.id.as_str()).or_default() += 1;
        if !is_valid_slug(&section.id) {
            out.push(Violation::InvalidSectionId {
                slug: article.slug.clone(),
                id: section.id.clone(),
            });
        }
    }

    for (id, count) in counts {
        if count > 1 {
            out.push(Violation::DuplicateSectionId {
                slug: article.slug.clone(),
                id: id.to_string(),
            });
        }
    }
}

/// Every TOC entry must land on a section container of the same article.
fn check_anchors(article: &Article, out: &mut Vec<Violation>) {
    for entry in &article.toc_items {
        if !article.has_section(&entry.id) {
            out.push(Violation::DanglingAnchor {
                slug: article.slug.clone(),
                id: entry.id.clone(),
            });
        }
    }
}

fn check_unlisted_sections(article: &Article, out: &mut Vec<Violation>) {
    let listed: BTreeSet<&str> = article.toc_items.iter().map(|e| e.id.as_str()).collect();
    for section in article.sections.iter().filter(|s| !s.decorative) {
        if !listed.contains(section.id.as_str()) {
            out.push(Violation::UnlistedSection {
                slug: article.slug.clone(),
                id: section.id.clone(),
            });
        }
    }
}

fn check_blocks(article: &Article, out: &mut Vec<Violation>) {
    for section in &article.sections {
        for block in &section.body {
            if block.is_empty() {
                out.push(Violation::EmptyBlock {
                    slug: article.slug.clone(),
                    section_id: section.id.clone(),
                });
            }
            if !block.misshapen_rows().is_empty() {
                out.push(Violation::MalformedTable {
                    slug: article.slug.clone(),
                    section_id: section.id.clone(),
                });
            }
        }
    }
}

/// Compares the legacy structured-data FAQ copy against the page FAQs, pair by pair.
///
/// Indices present on only one side count as mismatches too.
fn check_faq_mirroring(article: &Article, out: &mut Vec<Violation>) {
    let Some(declared) = &article.structured_faqs else {
        return;
    };

    let len = declared.len().max(article.faqs.len());
    for index in 0..len {
        if article.faqs.get(index) != declared.get(index) {
            out.push(Violation::FaqMismatch {
                slug: article.slug.clone(),
                index,
            });
        }
    }
}

fn check_related_articles(article: &Article, registry: &Registry, out: &mut Vec<Violation>) {
    for target in &article.related_articles {
        if *target == article.slug {
            out.push(Violation::SelfReference {
                slug: article.slug.clone(),
            });
        } else if !registry.contains(target) {
            out.push(Violation::BrokenReference {
                slug: article.slug.clone(),
                target: target.clone(),
            });
        }
    }
}

fn check_external_paths(article: &Article, out: &mut Vec<Violation>) {
    for path in article.related_guides.iter().chain(&article.related_tools) {
        if !is_path_shaped(path) {
            out.push(Violation::MalformedPath {
                slug: article.slug.clone(),
                path: path.clone(),
            });
        }
    }
}

/// Inline links in copy: in-page fragments must hit a section, article links must resolve, and
/// fragments on article links must hit a section of the target.
fn check_inline_links(
    article: &Article,
    registry: &Registry,
    options: &ValidationOptions,
    out: &mut Vec<Violation>,
) {
    let texts = article
        .sections
        .iter()
        .flat_map(|section| section.body.iter())
        .flat_map(|block| block.inline_texts())
        .chain(article.faqs.iter().map(|faq| faq.answer.as_str()))
        .chain(article.takeaways.iter().map(String::as_str));

    for text in texts {
        for target in inline_link_targets(text, &options.article_prefix) {
            match target {
                InlineTarget::Fragment(id) => {
                    if !article.has_section(&id) {
                        out.push(Violation::DanglingAnchor {
                            slug: article.slug.clone(),
                            id,
                        });
                    }
                }
                InlineTarget::Article { slug, fragment } => match registry.lookup(&slug) {
                    Err(_) => out.push(Violation::BrokenReference {
                        slug: article.slug.clone(),
                        target: slug,
                    }),
                    Ok(linked) => {
                        if let Some(fragment) = fragment {
                            if !linked.has_section(&fragment) {
                                out.push(Violation::DanglingAnchor {
                                    slug: article.slug.clone(),
                                    id: format!("{slug}#{fragment}"),
                                });
                            }
                        }
                    }
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::{FaqEntry, TocEntry};
    use crate::section::{Section, SectionContainer};
    use chrono::NaiveDate;

    fn base(slug: &str) -> Article {
        Article::new(slug, slug, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
            .with_section(SectionContainer::titled("Overview").with_block(Section::prose("Body")))
    }

    fn run(article: &Article, registry: &Registry) -> Vec<Violation> {
        check_article(article, registry, &ValidationOptions::default())
    }

    #[test]
    fn clean_article_has_no_findings() {
        let article = base("gold-ira");
        assert!(run(&article, &Registry::new()).is_empty());
    }

    #[test]
    fn dangling_toc_entry() {
        let mut article = base("x");
        article.toc_items.push(TocEntry {
            id: "faq".into(),
            label: "FAQ".into(),
        });
        assert_eq!(
            run(&article, &Registry::new()),
            vec![Violation::DanglingAnchor {
                slug: "x".into(),
                id: "faq".into(),
            }]
        );
    }

    #[test]
    fn faq_mirroring_reports_each_differing_index() {
        let mut article = base("y").with_faq("A?", "1").with_faq("B?", "2");
        article.structured_faqs = Some(vec![
            FaqEntry::new("A?", "1"),
            FaqEntry::new("B?", "two"),
            FaqEntry::new("C?", "3"),
        ]);
        let indices: Vec<_> = run(&article, &Registry::new())
            .into_iter()
            .filter_map(|v| match v {
                Violation::FaqMismatch { index, .. } => Some(index),
                _ => None,
            })
            .collect();
        assert_eq!(indices, vec![1, 2]);
    }

    #[test]
    fn self_reference_is_not_also_broken() {
        let article = base("a").with_related("a");
        assert_eq!(
            run(&article, &Registry::new()),
            vec![Violation::SelfReference { slug: "a".into() }]
        );
    }

    #[test]
    fn duplicate_and_invalid_section_ids() {
        let article = base("a")
            .with_section(SectionContainer::new("overview", "Again").with_block(Section::prose("x")))
            .with_section(SectionContainer::new("Bad Id", "Bad").with_block(Section::prose("x")));
        let found = run(&article, &Registry::new());
        assert!(found.contains(&Violation::DuplicateSectionId {
            slug: "a".into(),
            id: "overview".into(),
        }));
        assert!(found.contains(&Violation::InvalidSectionId {
            slug: "a".into(),
            id: "Bad Id".into(),
        }));
    }

    #[test]
    fn empty_list_and_ragged_table_are_reported() {
        let article = base("a").with_section(
            SectionContainer::new("data", "Data")
                .with_block(Section::bullets(Vec::<String>::new()))
                .with_block(Section::table(
                    ["Metal", "Price"],
                    vec![vec!["Gold".into()]],
                )),
        );
        let found = run(&article, &Registry::new());
        assert!(found.contains(&Violation::EmptyBlock {
            slug: "a".into(),
            section_id: "data".into(),
        }));
        assert!(found.contains(&Violation::MalformedTable {
            slug: "a".into(),
            section_id: "data".into(),
        }));
    }

    #[test]
    fn headerless_table_is_an_empty_block() {
        let article = base("a").with_section(
            SectionContainer::new("data", "Data")
                .with_block(Section::table(Vec::<String>::new(), vec![Vec::new()])),
        );
        let found = run(&article, &Registry::new());
        assert!(found.contains(&Violation::EmptyBlock {
            slug: "a".into(),
            section_id: "data".into(),
        }));
        assert!(!found.iter().any(|v| matches!(v, Violation::MalformedTable { .. })));
    }

    #[test]
    fn guide_and_tool_paths_are_shape_checked_only() {
        let mut article = base("a");
        article.related_guides = vec!["/guides/never-registered".into(), "".into()];
        article.related_tools = vec!["tools/no-slash".into()];
        let paths: Vec<_> = run(&article, &Registry::new())
            .into_iter()
            .filter_map(|v| match v {
                Violation::MalformedPath { path, .. } => Some(path),
                _ => None,
            })
            .collect();
        assert_eq!(paths, vec!["".to_string(), "tools/no-slash".to_string()]);
    }

    #[test]
    fn decorative_sections_may_skip_the_toc() {
        let mut article = base("a");
        article
            .sections
            .push(SectionContainer::new("aside", "Aside").with_block(Section::prose("x")));
        article.sections.push(
            SectionContainer::new("banner", "Banner")
                .with_block(Section::prose("x"))
                .decorative(),
        );
        assert_eq!(
            run(&article, &Registry::new()),
            vec![Violation::UnlistedSection {
                slug: "a".into(),
                id: "aside".into(),
            }]
        );
    }

    #[test]
    fn inline_links_are_resolved_against_registry_and_sections() {
        let mut registry = Registry::new();
        registry.register(base("gold-ira")).unwrap();

        let article = base("a").with_section(SectionContainer::titled("Links").with_block(
            Section::prose(
                "[ok](/articles/gold-ira#overview) [gone](/articles/nope) \
                 [bad anchor](/articles/gold-ira#fees) [local](#missing)",
            ),
        ));
        let found = run(&article, &registry);
        assert_eq!(
            found,
            vec![
                Violation::BrokenReference {
                    slug: "a".into(),
                    target: "nope".into(),
                },
                Violation::DanglingAnchor {
                    slug: "a".into(),
                    id: "gold-ira#fees".into(),
                },
                Violation::DanglingAnchor {
                    slug: "a".into(),
                    id: "missing".into(),
                },
            ]
        );
    }
}
