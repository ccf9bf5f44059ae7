//! Stable codes and the identity codec
//!
//! A [`StableCode`] is the durable identity of a target node: a
//! `(scope, namespace, value)` triple where the value is derived from the
//! node's logical type name and its source primary-key value. Within a
//! scope the value is unique, and the same `(type, container, key)` inputs
//! always produce the same code across runs — this is what lets repeated
//! alignment runs update nodes in place instead of inserting duplicates.
//!
//! ## Key-prefix dispatch
//!
//! One physical table can represent multiple logical types by key
//! convention: a key value beginning with a reserved prefix (for example
//! `"T-"` or `"P-"`) remaps the type name before the code value is built.
//! The prefix→type table is deployment configuration, not engine logic.

use crate::error::{CoreError, Result};
use crate::ids::{CodeNamespaceId, ContainerId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Durable node identity: `(scope, namespace, value)`
///
/// `scope` is the container (usually a model) the code lives under;
/// `namespace` partitions codes by mapping deployment; `value` is the
/// type-name-plus-key string produced by [`IdentityCodec::code_for`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StableCode {
    /// Container that scopes uniqueness of the value
    pub scope: ContainerId,
    /// Code namespace of the mapping deployment
    pub namespace: CodeNamespaceId,
    /// Deterministic identity string (`typeName + keyValue`)
    pub value: String,
}

impl StableCode {
    /// Create a code from its parts
    pub fn new(
        scope: ContainerId,
        namespace: CodeNamespaceId,
        value: impl Into<String>,
    ) -> Self {
        Self {
            scope,
            namespace,
            value: value.into(),
        }
    }
}

impl fmt::Display for StableCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}:{}", self.namespace, self.scope, self.value)
    }
}

/// A reserved key-prefix → override type name rule
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixRule {
    /// Reserved key prefix, e.g. `"T-"`
    pub prefix: String,
    /// Type name substituted when a key carries the prefix
    pub type_name: String,
}

impl PrefixRule {
    /// Create a prefix rule
    pub fn new(prefix: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            type_name: type_name.into(),
        }
    }
}

/// Derives stable codes from (type, container, key) triples
///
/// Pure function of its inputs: no I/O, and the only failure mode is an
/// empty key value, which is a caller error (the driver skips such rows
/// with a logged warning rather than propagating a fatal error).
#[derive(Clone, Debug, Default)]
pub struct IdentityCodec {
    namespace: CodeNamespaceId,
    prefix_rules: Vec<PrefixRule>,
}

impl IdentityCodec {
    /// Create a codec for a code namespace with no prefix rules
    pub fn new(namespace: CodeNamespaceId) -> Self {
        Self {
            namespace,
            prefix_rules: Vec::new(),
        }
    }

    /// Create a codec with key-prefix dispatch rules
    pub fn with_prefix_rules(namespace: CodeNamespaceId, rules: Vec<PrefixRule>) -> Self {
        Self {
            namespace,
            prefix_rules: rules,
        }
    }

    /// The codec's code namespace
    pub fn namespace(&self) -> CodeNamespaceId {
        self.namespace
    }

    /// Resolve the effective type name for a key value
    ///
    /// Applies the first matching prefix rule; without a match the declared
    /// type name is used unchanged.
    pub fn effective_type<'a>(&'a self, type_name: &'a str, key_value: &str) -> &'a str {
        self.prefix_rules
            .iter()
            .find(|rule| key_value.starts_with(rule.prefix.as_str()))
            .map(|rule| rule.type_name.as_str())
            .unwrap_or(type_name)
    }

    /// Derive the stable code for a node
    ///
    /// The code value is `effectiveTypeName + keyValue`, scoped to the
    /// given container. Empty keys are rejected.
    pub fn code_for(
        &self,
        type_name: &str,
        scope: ContainerId,
        key_value: &str,
    ) -> Result<StableCode> {
        if key_value.is_empty() {
            return Err(CoreError::empty_key(type_name));
        }
        let effective = self.effective_type(type_name, key_value);
        Ok(StableCode::new(
            scope,
            self.namespace,
            format!("{effective}{key_value}"),
        ))
    }
}
