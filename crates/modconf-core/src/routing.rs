//! Binding resolved routing files to handlers
//!
//! A routing file maps route names to entries of the form
//!
//! ```yaml
//! home:
//!   path: /
//!   controller: ./controllers/home.json
//!   action: index
//! ```
//!
//! Once resolved, `controller` is a mapping and the route's handler is
//! `controller[action]`.

use std::path::Path;

use indexmap::IndexMap;
use serde::Serialize;

use crate::load::load_config_with;
use crate::node::{Mapping, Node};
use crate::{Error, Resolver, ResolverOptions, Result};

/// A route with its handler bound.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub name: String,
    pub action: String,
    pub handler: Node,
    /// The resolved route entry, with `handler` added.
    pub entry: Mapping,
}

impl Route {
    pub fn controller(&self) -> Option<&Node> {
        self.entry.get("controller")
    }
}

/// Routes in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoutingTable {
    routes: IndexMap<String, Route>,
}

impl RoutingTable {
    pub fn get(&self, name: &str) -> Option<&Route> {
        self.routes.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.values()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl Serialize for RoutingTable {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.routes.iter().map(|(name, route)| (name, &route.entry)))
    }
}

/// Bind every top-level entry of a resolved routing tree.
pub fn bind_routes(resolved: Node) -> Result<RoutingTable> {
    let entries = match resolved {
        Node::Mapping(entries) => entries,
        other => {
            return Err(Error::InvalidRoute {
                route: "<root>".into(),
                message: format!("expected a mapping of routes, found {}", other.kind()),
            });
        }
    };

    let mut routes = IndexMap::with_capacity(entries.len());
    for (name, entry) in entries {
        let route = bind_route(&name, entry)?;
        routes.insert(name, route);
    }
    Ok(RoutingTable { routes })
}

fn bind_route(name: &str, entry: Node) -> Result<Route> {
    let invalid = |message: String| Error::InvalidRoute {
        route: name.to_string(),
        message,
    };

    let mut entry = match entry {
        Node::Mapping(entry) => entry,
        other => return Err(invalid(format!("expected a mapping, found {}", other.kind()))),
    };
    let action = match entry.get("action") {
        Some(Node::String(action)) => action.clone(),
        Some(other) => return Err(invalid(format!("action must be a string, found {}", other.kind()))),
        None => return Err(invalid("missing action".into())),
    };
    let handler = match entry.get("controller") {
        Some(Node::Mapping(controller)) => controller
            .get(&action)
            .cloned()
            .ok_or_else(|| invalid(format!("controller has no action {action:?}")))?,
        Some(other) => {
            return Err(invalid(format!("controller must resolve to a mapping, found {}", other.kind())));
        }
        None => return Err(invalid("missing controller".into())),
    };

    entry.insert("handler".to_string(), handler.clone());
    Ok(Route {
        name: name.to_string(),
        action,
        handler,
        entry,
    })
}

/// Load, resolve and bind a routing file.
pub fn load_routing(dir: impl AsRef<Path>, file: &str, options: ResolverOptions) -> Result<RoutingTable> {
    load_routing_with(Resolver::new(dir.as_ref()).with_options(options), file)
}

/// Like [`load_routing`] with a preconfigured resolver.
pub fn load_routing_with(resolver: Resolver, file: &str) -> Result<RoutingTable> {
    bind_routes(load_config_with(resolver, file)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route_entry(controller: Node, action: &str) -> Node {
        let mut entry = Mapping::new();
        entry.insert("controller".into(), controller);
        entry.insert("action".into(), Node::from(action));
        Node::Mapping(entry)
    }

    fn controller(actions: &[&str]) -> Node {
        Node::Mapping(
            actions
                .iter()
                .map(|a| (a.to_string(), Node::String(format!("{a}-handler"))))
                .collect(),
        )
    }

    #[test]
    fn handler_is_controller_action() {
        let mut root = Mapping::new();
        root.insert("home".into(), route_entry(controller(&["index", "show"]), "show"));

        let table = bind_routes(Node::Mapping(root)).unwrap();
        let route = table.get("home").unwrap();
        assert_eq!(route.action, "show");
        assert_eq!(route.handler, Node::from("show-handler"));
        assert_eq!(route.entry.get("handler"), Some(&Node::from("show-handler")));
    }

    #[test]
    fn unknown_action_is_rejected() {
        let mut root = Mapping::new();
        root.insert("home".into(), route_entry(controller(&["index"]), "missing"));

        let err = bind_routes(Node::Mapping(root)).unwrap_err();
        assert!(matches!(err, Error::InvalidRoute { ref route, .. } if route == "home"), "got {err:?}");
    }

    #[test]
    fn unresolved_controller_is_rejected() {
        let mut root = Mapping::new();
        root.insert(
            "home".into(),
            route_entry(Node::MissingPackage { name: "ctl".into() }, "index"),
        );

        let err = bind_routes(Node::Mapping(root)).unwrap_err();
        assert!(err.to_string().contains("missing package"), "got {err}");
    }

    #[test]
    fn sequence_root_is_rejected() {
        let err = bind_routes(Node::Sequence(vec![])).unwrap_err();
        assert!(matches!(err, Error::InvalidRoute { .. }));
    }
}
