//! Grammar of string values that point at files
//!
//! Two forms are recognised:
//!
//! - `./relative/path` is joined onto the base directory of the run.
//! - `[module] name/sub/path` looks up the installed package `name` and
//!   joins `sub/path` onto its root. Scoped names take two segments:
//!   `[module] @scope/name/sub/path`.
//!
//! Every other string is a literal.

use crate::{Error, Result};

/// Prefix of a reference relative to the base directory.
pub const RELATIVE_PREFIX: &str = "./";

/// Marker that starts a package reference.
pub const MODULE_MARKER: &str = "[module]";

/// A string value classified as a path reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathReference {
    /// The value verbatim, including the leading `./`.
    Relative(String),
    Package(PackageReference),
}

impl PathReference {
    /// Classify `value`.
    ///
    /// Returns `Ok(None)` for literals. A value carrying the module
    /// marker that does not parse is an error.
    pub fn classify(value: &str) -> Result<Option<Self>> {
        if value.starts_with(RELATIVE_PREFIX) {
            return Ok(Some(Self::Relative(value.to_string())));
        }
        let Some(rest) = value.strip_prefix(MODULE_MARKER) else {
            return Ok(None);
        };

        let Some(package_path) = rest.strip_prefix(' ') else {
            return Err(Error::malformed(value, "expected a single space after [module]"));
        };
        PackageReference::parse(package_path)
            .map(|package| Some(Self::Package(package)))
            .map_err(|reason| Error::malformed(value, reason))
    }
}

/// A package name and the path inside that package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageReference {
    name: String,
    subpath: String,
}

impl PackageReference {
    /// Parse `pkgName[/subpath]` or `@scope/pkgName[/subpath]`.
    fn parse(package_path: &str) -> std::result::Result<Self, &'static str> {
        if package_path.is_empty() {
            return Err("missing package name");
        }
        if package_path.chars().any(char::is_whitespace) {
            return Err("package path must not contain whitespace");
        }

        let name_segments = if package_path.starts_with('@') { 2 } else { 1 };
        let mut segments = package_path.splitn(name_segments + 1, '/');
        let name: Vec<&str> = segments.by_ref().take(name_segments).collect();

        if name.len() < name_segments {
            return Err("scoped package needs both @scope and name");
        }
        if name.iter().any(|segment| segment.is_empty()) || name[0] == "@" {
            return Err("empty package name segment");
        }
        if name
            .iter()
            .any(|segment| matches!(segment.trim_start_matches('@'), "." | ".."))
        {
            return Err("package name segment must not be . or ..");
        }

        let subpath = segments.next().unwrap_or("");
        if subpath.split('/').any(|segment| segment == "..") {
            return Err("subpath must stay inside the package");
        }

        Ok(Self {
            name: name.join("/"),
            subpath: subpath.to_string(),
        })
    }

    /// The package name, `@scope/name` for scoped packages.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path inside the package; empty when the package root itself is meant.
    pub fn subpath(&self) -> &str {
        &self.subpath
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn package(value: &str) -> PackageReference {
        match PathReference::classify(value).unwrap() {
            Some(PathReference::Package(package)) => package,
            other => panic!("expected package reference, got {other:?}"),
        }
    }

    #[rstest]
    #[case("[module] lodash", "lodash", "")]
    #[case("[module] lodash/fp/map.json", "lodash", "fp/map.json")]
    #[case("[module] @scope/name/lib/file.json", "@scope/name", "lib/file.json")]
    #[case("[module] @scope/name", "@scope/name", "")]
    #[case("[module] pkg/", "pkg", "")]
    fn parses_package_references(#[case] value: &str, #[case] name: &str, #[case] subpath: &str) {
        let package = package(value);
        assert_eq!(package.name(), name);
        assert_eq!(package.subpath(), subpath);
    }

    #[rstest]
    #[case("[module]")]
    #[case("[module] ")]
    #[case("[module]lodash")]
    #[case("[module]  lodash")]
    #[case("[module] @scope")]
    #[case("[module] @scope/")]
    #[case("[module] @/name")]
    #[case("[module] /lib")]
    #[case("[module] pkg extra")]
    #[case("[module] ../secret.json")]
    #[case("[module] ./pkg/file.json")]
    #[case("[module] ..")]
    #[case("[module] @scope/../x.json")]
    #[case("[module] @../name")]
    #[case("[module] @scope/.")]
    #[case("[module] pkg/../../secret.json")]
    fn rejects_malformed_package_references(#[case] value: &str) {
        let err = PathReference::classify(value).unwrap_err();
        assert!(matches!(err, Error::MalformedPackageReference { .. }), "got {err:?}");
    }

    #[rstest]
    #[case("literal")]
    #[case("../up.json")]
    #[case(".hidden")]
    #[case("/abs/path")]
    #[case(" ./leading-space")]
    #[case("module lodash")]
    #[case("")]
    fn literals_are_not_references(#[case] value: &str) {
        assert_eq!(PathReference::classify(value).unwrap(), None);
    }

    #[test]
    fn relative_reference_keeps_value() {
        assert_eq!(
            PathReference::classify("./sub/file.json").unwrap(),
            Some(PathReference::Relative("./sub/file.json".into()))
        );
    }
}
