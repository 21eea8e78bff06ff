use std::collections::BTreeMap;

use markdown::mdast::Node;

/// Where an inline Markdown link inside article copy points.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum InlineTarget {
    /// `#section-id` within the same article.
    Fragment(String),
    /// Another article page under the article route prefix.
    Article {
        slug: String,
        fragment: Option<String>,
    },
}

/// Extracts the link destinations in `text` that this crate can verify.
///
/// External URLs, guide/tool paths and anything else outside the article route are skipped.
pub(crate) fn inline_link_targets(text: &str, article_prefix: &str) -> Vec<InlineTarget> {
    if !text.contains('[') {
        return Vec::new();
    }
    let Ok(root) = markdown::to_mdast(text, &markdown::ParseOptions::default()) else {
        return Vec::new();
    };

    let definitions = collect_definitions(&root);
    let mut destinations = Vec::new();
    collect_destinations(&root, &definitions, &mut destinations);

    destinations
        .into_iter()
        .filter_map(|destination| classify(&destination, article_prefix))
        .collect()
}

fn collect_definitions(root: &Node) -> BTreeMap<String, String> {
    fn walk(node: &Node, defs: &mut BTreeMap<String, String>) {
        match node {
            Node::Definition(def) => {
                defs.insert(def.identifier.clone(), def.url.clone());
            }
            _ => {
                if let Some(children) = node.children() {
                    for child in children {
                        walk(child, defs);
                    }
                }
            }
        }
    }

    let mut defs = BTreeMap::new();
    walk(root, &mut defs);
    defs
}

fn collect_destinations(node: &Node, defs: &BTreeMap<String, String>, out: &mut Vec<String>) {
    match node {
        Node::Link(link) => out.push(link.url.clone()),
        Node::LinkReference(reference) => {
            if let Some(url) = defs.get(&reference.identifier) {
                out.push(url.clone());
            }
        }
        Node::Image(_) | Node::ImageReference(_) => {}
        _ => {
            if let Some(children) = node.children() {
                for child in children {
                    collect_destinations(child, defs, out);
                }
            }
        }
    }
}

fn classify(destination: &str, article_prefix: &str) -> Option<InlineTarget> {
    let destination = destination.trim();
    if let Some(fragment) = destination.strip_prefix('#') {
        return (!fragment.is_empty()).then(|| InlineTarget::Fragment(fragment.to_string()));
    }

    let rest = destination.strip_prefix(article_prefix)?;
    let (path, fragment) = match rest.split_once('#') {
        Some((path, fragment)) => (path, Some(fragment.to_string())),
        None => (rest, None),
    };
    let path = path.split('?').next().unwrap_or_default().trim_end_matches('/');
    if path.is_empty() || path.contains('/') {
        return None;
    }

    Some(InlineTarget::Article {
        slug: path.to_string(),
        fragment: fragment.filter(|f| !f.is_empty()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_fragment_and_article_links() {
        let text = "See [fees](#fees), the [gold guide](/learn/gold-ira/#costs) and \
                    [Roth rules](/learn/roth-ira?ref=body).";
        let targets = inline_link_targets(text, "/learn/");
        assert_eq!(
            targets,
            vec![
                InlineTarget::Fragment("fees".into()),
                InlineTarget::Article {
                    slug: "gold-ira".into(),
                    fragment: Some("costs".into()),
                },
                InlineTarget::Article {
                    slug: "roth-ira".into(),
                    fragment: None,
                },
            ]
        );
    }

    #[test]
    fn resolves_reference_style_links() {
        let text = "Read the [silver guide][s].\n\n[s]: /learn/silver-ira-guide\n";
        let targets = inline_link_targets(text, "/learn/");
        assert_eq!(
            targets,
            vec![InlineTarget::Article {
                slug: "silver-ira-guide".into(),
                fragment: None,
            }]
        );
    }

    #[test]
    fn ignores_external_guides_and_images() {
        let text = "[IRS](https://www.irs.gov) [calc](/tools/rmd) ![chart](/learn/chart.png) [index](/learn/)";
        assert!(inline_link_targets(text, "/learn/").is_empty());
    }
}
