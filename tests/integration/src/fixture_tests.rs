//! Resolution of the `shop` fixture project
//!
//! Exercises the whole flow: include expansion -> reference resolution ->
//! package lookup in a nested `node_modules` tree -> routing binding.

use std::path::PathBuf;
use std::sync::Arc;

use modconf_core::{CollectingSink, Node, Resolver, ResolverOptions, load_config, load_routing};
use modconf_fs::NormalizedPath;
use pretty_assertions::assert_eq;

fn shop() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../test-fixtures/projects/shop")
}

fn options() -> ResolverOptions {
    ResolverOptions::default().with_project_root(shop())
}

fn json(value: serde_json::Value) -> Node {
    value.into()
}

#[test]
fn app_config_resolves_every_reference_kind() {
    let config = load_config(shop().join("config"), "app.yaml", options()).unwrap();

    assert_eq!(config.get("name"), Some(&Node::from("shop")));
    assert_eq!(
        config.get("server"),
        Some(&json(serde_json::json!({"host": "0.0.0.0", "port": 8080})))
    );
    assert_eq!(
        config.get("database"),
        Some(&json(serde_json::json!({"driver": "postgres", "pool": {"min": 1, "max": 10}})))
    );
    assert_eq!(
        config.get("locales"),
        Some(&json(serde_json::json!(["en", "de", "fr"])))
    );
    assert_eq!(config.get("geo"), Some(&json(serde_json::json!(["eu", "us"]))));
    assert!(config.get("analytics").unwrap().is_missing_package());

    let mailer = config.get("mailer").unwrap();
    assert_eq!(
        mailer.get("settings"),
        Some(&json(serde_json::json!({"from": "shop@example.com", "retries": 3})))
    );
}

#[test]
fn directory_references_become_absolute_paths() {
    let config = load_config(shop().join("config"), "app.yaml", options()).unwrap();
    let expected = NormalizedPath::absolute(shop().join("config/templates")).unwrap();

    let templates = config.get("templates").and_then(Node::as_str).unwrap();
    assert_eq!(templates, expected.as_str());

    let mail_templates = config
        .get("mailer")
        .and_then(|m| m.get("templates"))
        .and_then(Node::as_str)
        .unwrap();
    assert!(mail_templates.ends_with("node_modules/mailer/templates"));
    assert!(NormalizedPath::new(mail_templates).is_dir());
}

#[test]
fn loaded_package_content_is_taken_verbatim_unless_nested() {
    let flat = load_config(shop().join("config"), "app.yaml", options()).unwrap();
    assert_eq!(
        flat.get("payments"),
        Some(&json(serde_json::json!({"gateways": {"0": "stripe", "1": "paypal"}})))
    );

    let nested = load_config(
        shop().join("config"),
        "app.yaml",
        options().with_resolve_nested(true),
    )
    .unwrap();
    assert_eq!(
        nested.get("payments"),
        Some(&json(serde_json::json!({"gateways": ["stripe", "paypal"]})))
    );
}

#[test]
fn diagnostics_cover_connected_and_missing_packages() {
    let sink = Arc::new(CollectingSink::new());
    let resolver = Resolver::new(shop().join("config"))
        .with_options(options())
        .with_sink(sink.clone());
    let raw = modconf_core::read_tree(&NormalizedPath::new(shop().join("config/app.yaml"))).unwrap();

    resolver.resolve(&raw).unwrap();

    assert_eq!(sink.missing_packages(), vec!["analytics-not-installed"]);
    assert_eq!(sink.events().len(), 5);
}

#[test]
fn routing_table_binds_local_and_package_controllers() {
    let table = load_routing(shop().join("config"), "routing.yaml", options()).unwrap();

    let handlers: Vec<_> = table
        .iter()
        .map(|route| (route.name.as_str(), route.handler.as_str().unwrap()))
        .collect();
    assert_eq!(
        handlers,
        vec![
            ("home", "home#index"),
            ("product", "product#show"),
            ("checkout", "payments#checkout"),
        ]
    );
    assert_eq!(
        table.get("product").unwrap().entry.get("path"),
        Some(&Node::from("/product/:id"))
    );
}
