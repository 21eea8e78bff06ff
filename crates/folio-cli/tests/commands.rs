use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::str::contains;
use tempfile::TempDir;

const CONFIG: &str = "\
site:
  name: Example Finance
  baseUrl: https://www.example.com
routes:
  articles: /learn/
";

const CLUSTER: &str = r#"
cluster: retirement
articles:
  - slug: roth-ira
    title: Roth IRA basics
    metadata:
      title: Roth IRA basics
      description: How a Roth IRA works.
    category: Retirement
    published: 2024-03-01
    tocItems:
      - id: overview
        label: Overview
    sections:
      - id: overview
        title: Overview
        body:
          - type: prose
            text: "Compare with the [gold guide](/learn/gold-ira)."
    faqs:
      - question: "Who can contribute?"
        answer: "Anyone with earned income under the limit."
    relatedArticles: [gold-ira]
  - slug: gold-ira
    title: Gold IRA guide
    metadata:
      title: Gold IRA guide
      description: Holding metals in an IRA.
    category: Metals
    published: 2024-05-10
    relatedArticles: [roth-ira]
    relatedGuides: [/guides/rollover]
"#;

fn cli() -> Command {
    Command::new(env!("CARGO_BIN_EXE_folio"))
}

fn workspace(cluster: &str) -> TempDir {
    let temp = TempDir::new().expect("tempdir");
    fs::write(temp.path().join("folio.yaml"), CONFIG).unwrap();
    fs::create_dir_all(temp.path().join("content")).unwrap();
    fs::write(temp.path().join("content/retirement.yaml"), cluster).unwrap();
    temp
}

fn run_in(root: &Path, args: &[&str]) -> assert_cmd::assert::Assert {
    cli().current_dir(root).args(args).assert()
}

#[test]
fn init_creates_a_workspace_that_checks_clean() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let target = temp.path().join("site");

    cli()
        .args(["init", target.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("Initialized workspace at"));
    assert!(target.join("folio.yaml").is_file());
    assert!(target.join("content/getting-started.yaml").is_file());

    run_in(&target, &["check"])
        .success()
        .stdout(contains("Validation: OK"));
    Ok(())
}

#[test]
fn init_dry_run_does_not_write() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let target = temp.path().join("dry");

    cli()
        .args(["init", target.to_str().unwrap(), "--dry-run"])
        .assert()
        .success()
        .stdout(contains("Dry run: would initialize workspace"));
    assert!(!target.join("folio.yaml").exists());
    Ok(())
}

#[test]
fn init_rejects_nested_workspace() -> Result<(), Box<dyn std::error::Error>> {
    let temp = workspace(CLUSTER);
    let child = temp.path().join("content/nested");

    cli()
        .args(["init", child.to_str().unwrap()])
        .assert()
        .failure()
        .code(64)
        .stderr(contains("ancestor workspace"));
    Ok(())
}

#[test]
fn check_passes_on_consistent_content() {
    let temp = workspace(CLUSTER);
    run_in(temp.path(), &["check"])
        .success()
        .stdout(contains("Validation: OK (2 articles"));
}

#[test]
fn check_fails_with_dataerr_on_broken_reference() {
    let broken = CLUSTER.replace("relatedArticles: [gold-ira]", "relatedArticles: [silver-ira]");
    let temp = workspace(&broken);

    run_in(temp.path(), &["check"])
        .failure()
        .code(65)
        .stdout(contains("BROKEN_REFERENCE"))
        .stdout(contains("silver-ira"));
}

#[test]
fn preview_reports_but_does_not_fail() {
    let broken = CLUSTER.replace("id: overview\n        title", "id: intro\n        title");
    let temp = workspace(&broken);

    run_in(temp.path(), &["check", "--preview"])
        .success()
        .stdout(contains("DANGLING_ANCHOR"))
        .stdout(contains("not fatal"));
}

#[test]
fn check_json_output_is_machine_readable() {
    let broken = CLUSTER.replace("relatedArticles: [gold-ira]", "relatedArticles: [silver-ira]");
    let temp = workspace(&broken);

    let output = cli()
        .current_dir(temp.path())
        .args(["--json", "check"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(65));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["type"], "check");
    assert_eq!(value["fatal"], true);
    assert_eq!(value["report"]["violations"][0]["kind"], "broken_reference");
}

#[test]
fn duplicate_slug_across_clusters_is_a_data_error() {
    let temp = workspace(CLUSTER);
    fs::write(
        temp.path().join("content/metals.yaml"),
        "articles:\n  - slug: gold-ira\n    title: Again\n    metadata: {title: Again, description: x}\n    category: Metals\n    published: 2024-01-01\n",
    )
    .unwrap();

    run_in(temp.path(), &["list"])
        .failure()
        .code(65)
        .stderr(contains("duplicate slug 'gold-ira'"));
}

#[test]
fn list_shows_sorted_articles() {
    let temp = workspace(CLUSTER);
    run_in(temp.path(), &["list"])
        .success()
        .stdout(contains("Articles (2):"))
        .stdout(contains("gold-ira [Metals] Gold IRA guide"));
}

#[test]
fn jsonld_prints_faq_page_from_faqs() {
    let temp = workspace(CLUSTER);
    run_in(temp.path(), &["jsonld", "roth-ira"])
        .success()
        .stdout(contains("\"@context\": \"https://schema.org\""))
        .stdout(contains("\"FAQPage\""))
        .stdout(contains("https://www.example.com/learn/roth-ira"));
}

#[test]
fn unknown_slug_is_a_usage_error() {
    let temp = workspace(CLUSTER);
    run_in(temp.path(), &["jsonld", "silver-ira"])
        .failure()
        .code(64)
        .stderr(contains("article not found"));
    run_in(temp.path(), &["links", "Not A Slug"])
        .failure()
        .code(64);
}

#[test]
fn links_include_backlinks_and_guides() {
    let temp = workspace(CLUSTER);
    run_in(temp.path(), &["links", "gold-ira"])
        .success()
        .stdout(contains("Roth IRA basics (roth-ira) /learn/roth-ira"))
        .stdout(contains("/guides/rollover"));
}

#[test]
fn graph_reports_mutual_cycle() {
    let temp = workspace(CLUSTER);
    run_in(temp.path(), &["graph"])
        .success()
        .stdout(contains("Orphans (0):"))
        .stdout(contains("gold-ira -> roth-ira -> gold-ira"));
}

#[test]
fn schema_needs_no_workspace() {
    let temp = TempDir::new().unwrap();
    run_in(temp.path(), &["schema"])
        .success()
        .stdout(contains("\"articles\""));
}

#[test]
fn missing_workspace_is_a_usage_error() {
    let temp = TempDir::new().unwrap();
    run_in(temp.path(), &["check"])
        .failure()
        .code(64)
        .stderr(contains("no folio.yaml found"));
}

#[test]
fn invalid_config_is_a_config_error() {
    let temp = workspace(CLUSTER);
    fs::write(
        temp.path().join("folio.yaml"),
        "site:\n  name: Example\n  baseUrl: not a url\n",
    )
    .unwrap();
    run_in(temp.path(), &["check"]).failure().code(78);
}

#[test]
fn short_config_name_is_discovered_from_subdirectories() {
    let temp = workspace(CLUSTER);
    fs::rename(temp.path().join("folio.yaml"), temp.path().join("folio.yml")).unwrap();

    run_in(&temp.path().join("content"), &["list"])
        .success()
        .stdout(contains("Articles (2):"));
    cli()
        .args(["init", temp.path().join("content/inner").to_str().unwrap()])
        .assert()
        .failure()
        .code(64)
        .stderr(contains("folio.yml"));
}
