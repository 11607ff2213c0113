//! End-to-end tests for the tree commands.

use lifespan_cli::cli::{ApplyArgs, RemoveArgs};
use lifespan_cli::commands::{apply_estimates, execute_apply, execute_remove};
use lifespan_cli::config::OutputFormat;
use lifespan_cli::{Config, Formatter};
use lifespan_domain::Date;
use lifespan_store::{MemoryStore, TreeBuilder};
use std::path::{Path, PathBuf};

fn apply_args(tree: PathBuf) -> ApplyArgs {
    ApplyArgs {
        tree,
        people: Vec::new(),
        output: None,
        source_text: None,
        birth: None,
        death: None,
        dates: None,
        keep_previous: false,
        dry_run: false,
    }
}

fn write_family(path: &Path) {
    let mut tree = TreeBuilder::new();
    let father = tree.person("John");
    let son = tree.person("Tom");
    tree.birth(&father, Date::from_year(1850));
    tree.family(Some(&father), None, &[&son]);
    tree.build().save(path).unwrap();
}

#[test]
fn test_apply_then_remove_restores_tree() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tree.json");
    write_family(&path);
    let original = MemoryStore::load(&path).unwrap();
    let formatter = Formatter::new(OutputFormat::Quiet, false);

    execute_apply(apply_args(path.clone()), &Config::default(), &formatter).unwrap();
    let applied = MemoryStore::load(&path).unwrap();
    assert!(applied.event_count() > original.event_count());
    assert_eq!(applied.sources().count(), 1);

    let remove = RemoveArgs {
        tree: path.clone(),
        people: Vec::new(),
        output: None,
        source_text: None,
    };
    execute_remove(remove, &Config::default(), &formatter).unwrap();

    let restored = MemoryStore::load(&path).unwrap();
    assert_eq!(restored.event_count(), original.event_count());
    assert_eq!(restored.sources().count(), 0);
    let tom = restored.people().find(|p| p.name == "Tom").unwrap();
    assert!(tom.birth_ref.is_none());
    assert!(tom.death_ref.is_none());
}

#[test]
fn test_reapply_for_one_person_then_remove_everyone() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tree.json");
    write_family(&path);
    let original = MemoryStore::load(&path).unwrap();
    let formatter = Formatter::new(OutputFormat::Quiet, false);

    execute_apply(apply_args(path.clone()), &Config::default(), &formatter).unwrap();
    let mut only_john = apply_args(path.clone());
    only_john.people = vec!["I0001".to_string()];
    execute_apply(only_john, &Config::default(), &formatter).unwrap();

    let applied = MemoryStore::load(&path).unwrap();
    assert_eq!(applied.sources().count(), 1);
    let tom = applied.people().find(|p| p.name == "Tom").unwrap();
    assert!(tom.birth_ref.is_some());

    let remove = RemoveArgs {
        tree: path.clone(),
        people: Vec::new(),
        output: None,
        source_text: None,
    };
    execute_remove(remove, &Config::default(), &formatter).unwrap();

    let restored = MemoryStore::load(&path).unwrap();
    assert_eq!(restored.event_count(), original.event_count());
    assert_eq!(restored.sources().count(), 0);
}

#[test]
fn test_custom_source_text_is_separate() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tree.json");
    write_family(&path);
    let mut store = MemoryStore::load(&path).unwrap();
    let config = Config::default();

    let mut first = apply_args(path.clone());
    first.source_text = Some("First pass".to_string());
    apply_estimates(&mut store, &first, &config).unwrap();

    let second = apply_estimates(&mut store, &apply_args(path), &config).unwrap();
    assert_eq!(second.metrics.events_removed, 0);
    assert!(second.rows.iter().all(|row| row.name != "Tom"));
    assert_eq!(store.sources().count(), 1);
}

#[test]
fn test_unknown_person_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tree.json");
    write_family(&path);

    let mut args = apply_args(path.clone());
    args.people = vec!["I4242".to_string()];
    let formatter = Formatter::new(OutputFormat::Table, false);
    let result = execute_apply(args, &Config::default(), &formatter);
    assert!(matches!(result, Err(lifespan_cli::CliError::InvalidInput(_))));
}

#[test]
fn test_missing_tree_file() {
    let dir = tempfile::tempdir().unwrap();
    let formatter = Formatter::new(OutputFormat::Table, false);
    let result = execute_apply(
        apply_args(dir.path().join("absent.json")),
        &Config::default(),
        &formatter,
    );
    assert!(matches!(result, Err(lifespan_cli::CliError::Store(_))));
}
