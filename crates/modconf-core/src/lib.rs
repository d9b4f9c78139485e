//! Resolution of configuration trees for modconf
//!
//! A configuration file is parsed into a [`Node`] tree, then a
//! [`Resolver`] replaces file and package references with the content
//! they point at and turns `"0"..="n-1"`-keyed mappings into sequences.
//!
//! # Reference forms
//!
//! - `./path/to/file.json` is relative to the base directory of the run.
//! - `[module] pkg/path/in/pkg` is looked up in the installed-dependencies
//!   directory (`node_modules` by default).
//!
//! A referenced file is replaced by its parsed content; a referenced
//! directory by its absolute path.

pub mod diagnostics;
pub mod error;
pub mod load;
pub mod locator;
pub mod node;
pub mod options;
pub mod reference;
pub mod resolver;
pub mod routing;

pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticSink, TracingSink};
pub use error::{Error, Result};
pub use load::{load_config, load_config_with, read_tree};
pub use locator::{ModulesDirSearch, PackageCache, PackageSearch};
pub use node::{Mapping, Node};
pub use options::ResolverOptions;
pub use reference::{PackageReference, PathReference};
pub use resolver::Resolver;
pub use routing::{Route, RoutingTable, bind_routes, load_routing, load_routing_with};
