//! Resolve and routes command implementations

use std::sync::Arc;

use colored::Colorize;
use serde::Serialize;

use modconf_core::{CollectingSink, Diagnostic, Node, Resolver, ResolverOptions, bind_routes, read_tree};
use modconf_fs::NormalizedPath;

use crate::cli::{OutputFormat, ResolveArgs};
use crate::error::{CliError, Result};

/// Run the resolve command
pub fn run_resolve(args: &ResolveArgs) -> Result<()> {
    let resolved = resolve_file(args)?;
    print_output(&resolved, args.format)
}

/// Run the routes command
pub fn run_routes(args: &ResolveArgs) -> Result<()> {
    let table = bind_routes(resolve_file(args)?)?;
    tracing::debug!(routes = table.len(), "Bound routing table");
    print_output(&table, args.format)
}

/// Merge the options file (if any) with command-line overrides.
fn build_options(args: &ResolveArgs) -> Result<ResolverOptions> {
    let mut options = match &args.options {
        Some(path) => ResolverOptions::load(&NormalizedPath::absolute(path)?)?,
        None => ResolverOptions::default(),
    };
    if let Some(root) = &args.project_root {
        options.project_root = Some(root.clone());
    }
    if let Some(modules_dir) = &args.modules_dir {
        options.modules_dir = modules_dir.clone();
    }
    if args.nested {
        options.resolve_nested = true;
    }
    Ok(options)
}

fn resolve_file(args: &ResolveArgs) -> Result<Node> {
    let file = NormalizedPath::absolute(&args.file)?;
    let base_dir = match &args.base_dir {
        Some(dir) => NormalizedPath::absolute(dir)?,
        None => file
            .parent()
            .ok_or_else(|| CliError::user(format!("{} has no parent directory", file)))?,
    };

    let sink = Arc::new(CollectingSink::new());
    let resolver = Resolver::new(base_dir)
        .with_options(build_options(args)?)
        .with_sink(sink.clone());

    let raw = read_tree(&file)?;
    let resolved = resolver.resolve(&raw)?;

    if args.report {
        print_report(&sink.events());
    }
    Ok(resolved)
}

fn print_report(events: &[Diagnostic]) {
    for event in events {
        match event {
            Diagnostic::PackageConnected { .. } => {
                eprintln!("{} {}", "connected".green().bold(), event);
            }
            Diagnostic::PackageNotFound { .. } => {
                eprintln!("{} {}", "missing".yellow().bold(), event);
            }
        }
    }
}

fn print_output<T: Serialize>(value: &T, format: OutputFormat) -> Result<()> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
    };
    println!("{}", rendered.trim_end());
    Ok(())
}
