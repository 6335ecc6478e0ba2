//! Logical identifiers for namespaces and tables.
//!
//! Namespaces are flat: a namespace identifier is exactly one segment and a
//! table identifier is exactly `<namespace>.<table>`.

use std::fmt;
use std::str::FromStr;

use snafu::ensure;

use crate::error::{Error, InvalidIdentifierSnafu, Result};

pub const SEPARATOR: char = '.';

/// A flat namespace name, backed by one metastore database.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NamespaceIdent(String);

impl NamespaceIdent {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        resolve_namespace_segments(&[name.into()])
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NamespaceIdent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NamespaceIdent {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for NamespaceIdent {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        resolve_namespace(s)
    }
}

/// A table reference: the owning namespace plus the table name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableIdent {
    namespace: NamespaceIdent,
    name: String,
}

impl TableIdent {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Result<Self> {
        resolve_segments(&[namespace.into(), name.into()])
    }

    #[must_use]
    pub const fn namespace(&self) -> &NamespaceIdent {
        &self.namespace
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for TableIdent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{SEPARATOR}{}", self.namespace, self.name)
    }
}

impl FromStr for TableIdent {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        resolve(s)
    }
}

/// Parses `<namespace>.<table>`.
pub fn resolve(identifier: &str) -> Result<TableIdent> {
    let segments = identifier.split(SEPARATOR).collect::<Vec<_>>();
    resolve_segments(&segments)
}

/// Parses a single-segment namespace name.
pub fn resolve_namespace(identifier: &str) -> Result<NamespaceIdent> {
    let segments = identifier.split(SEPARATOR).collect::<Vec<_>>();
    resolve_namespace_segments(&segments)
}

pub fn resolve_segments<S: AsRef<str>>(segments: &[S]) -> Result<TableIdent> {
    let identifier = join(segments);
    match segments {
        [namespace, name] => {
            let (namespace, name) = (namespace.as_ref(), name.as_ref());
            ensure!(
                !namespace.is_empty() && !name.is_empty(),
                InvalidIdentifierSnafu {
                    identifier,
                    reason: "namespace and table name must not be empty",
                }
            );
            ensure!(
                !namespace.contains(SEPARATOR) && !name.contains(SEPARATOR),
                InvalidIdentifierSnafu {
                    identifier,
                    reason: "hierarchical namespaces are not supported",
                }
            );
            Ok(TableIdent {
                namespace: NamespaceIdent(namespace.to_string()),
                name: name.to_string(),
            })
        }
        [] | [_] => InvalidIdentifierSnafu {
            identifier,
            reason: "expected <namespace>.<table>",
        }
        .fail(),
        _ => InvalidIdentifierSnafu {
            identifier,
            reason: "hierarchical namespaces are not supported",
        }
        .fail(),
    }
}

pub fn resolve_namespace_segments<S: AsRef<str>>(segments: &[S]) -> Result<NamespaceIdent> {
    let identifier = join(segments);
    match segments {
        [name] => {
            let name = name.as_ref();
            ensure!(
                !name.is_empty(),
                InvalidIdentifierSnafu {
                    identifier,
                    reason: "namespace must not be empty",
                }
            );
            ensure!(
                !name.contains(SEPARATOR),
                InvalidIdentifierSnafu {
                    identifier,
                    reason: "hierarchical namespaces are not supported",
                }
            );
            Ok(NamespaceIdent(name.to_string()))
        }
        [] => InvalidIdentifierSnafu {
            identifier,
            reason: "namespace must not be empty",
        }
        .fail(),
        _ => InvalidIdentifierSnafu {
            identifier,
            reason: "hierarchical namespaces are not supported",
        }
        .fail(),
    }
}

fn join<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(&SEPARATOR.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_table() {
        let ident = resolve("db.t1").expect("valid identifier");
        assert_eq!(ident.namespace().name(), "db");
        assert_eq!(ident.name(), "t1");
        assert_eq!(ident.to_string(), "db.t1");
        assert_eq!("db.t1".parse::<TableIdent>().unwrap(), ident);
    }

    #[test]
    fn test_resolve_table_rejects_malformed() {
        for identifier in ["", "t1", "db.", ".t1", "a.b.c", "a..b"] {
            let err = resolve(identifier).expect_err(identifier);
            assert!(
                matches!(err, Error::InvalidIdentifier { .. }),
                "{identifier}: {err}"
            );
        }
    }

    #[test]
    fn test_resolve_table_hierarchy_message() {
        let err = resolve("a.b.c").unwrap_err();
        insta::assert_snapshot!(err.to_string(), @"Invalid identifier 'a.b.c': hierarchical namespaces are not supported");
    }

    #[test]
    fn test_resolve_namespace() {
        assert_eq!(resolve_namespace("db").unwrap().name(), "db");
        assert!(matches!(
            resolve_namespace("").unwrap_err(),
            Error::InvalidIdentifier { .. }
        ));
        assert!(matches!(
            resolve_namespace("db.schema").unwrap_err(),
            Error::InvalidIdentifier { .. }
        ));
        let empty: [&str; 0] = [];
        assert!(resolve_namespace_segments(&empty).is_err());
    }

    #[test]
    fn test_segments_must_not_embed_separator() {
        assert!(TableIdent::new("a.b", "t").is_err());
        assert!(NamespaceIdent::new("a.b").is_err());
        assert!(TableIdent::new("db", "t").is_ok());
    }
}
