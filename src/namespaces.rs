//! XML namespace handling
//!
//! Qualified names and the prefix mappings used to rewrite namespace URIs
//! into readable `prefix:local` path segments.

use indexmap::IndexMap;

/// XML Namespace URI
pub type NamespaceUri = String;

/// Namespace prefix
pub type Prefix = String;

/// Qualified name (QName) - combination of namespace and local name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    /// Namespace URI (None for no namespace)
    pub namespace: Option<NamespaceUri>,
    /// Local name
    pub local_name: String,
}

impl QName {
    /// Create a new QName
    pub fn new(namespace: Option<impl Into<String>>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.map(|s| s.into()),
            local_name: local_name.into(),
        }
    }

    /// Create a QName without a namespace
    pub fn local(local_name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            local_name: local_name.into(),
        }
    }

    /// Create a QName with a namespace
    pub fn namespaced(namespace: impl Into<String>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            local_name: local_name.into(),
        }
    }

    /// Get the name in Clark notation (`{uri}local`)
    pub fn to_clark(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{{{}}}{}", ns, self.local_name),
            None => self.local_name.clone(),
        }
    }
}

impl From<roxmltree::ExpandedName<'_, '_>> for QName {
    fn from(name: roxmltree::ExpandedName<'_, '_>) -> Self {
        QName::new(name.namespace(), name.name())
    }
}

/// Namespace context for mapping URIs back to their declared prefixes
///
/// Prefixes keep their declaration order so that a URI bound to several
/// prefixes always resolves to the same one.
#[derive(Debug, Clone, Default)]
pub struct NamespaceContext {
    /// Mapping from prefix to namespace URI
    prefixes: IndexMap<Prefix, NamespaceUri>,
    /// Default namespace (no prefix)
    default_namespace: Option<NamespaceUri>,
}

impl NamespaceContext {
    /// Create a new empty namespace context
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect the namespaces in scope at a parsed element
    pub fn in_scope(node: roxmltree::Node<'_, '_>) -> Self {
        let mut ctx = Self::new();
        for ns in node.namespaces() {
            match ns.name() {
                Some(prefix) => ctx.add_prefix(prefix, ns.uri()),
                None => ctx.set_default_namespace(ns.uri()),
            }
        }
        ctx
    }

    /// Add a namespace prefix mapping
    pub fn add_prefix(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.prefixes.insert(prefix.into(), namespace.into());
    }

    /// Set the default namespace
    pub fn set_default_namespace(&mut self, namespace: impl Into<String>) {
        self.default_namespace = Some(namespace.into());
    }

    /// Get the namespace for a prefix
    pub fn get_namespace(&self, prefix: &str) -> Option<&str> {
        self.prefixes.get(prefix).map(|s| s.as_str())
    }

    /// Get the default namespace
    pub fn get_default_namespace(&self) -> Option<&str> {
        self.default_namespace.as_deref()
    }

    /// Find the prefix declared for a URI; the default namespace maps to `""`
    pub fn prefix_for(&self, uri: &str) -> Option<&str> {
        self.prefixes
            .iter()
            .find(|(_, ns)| ns.as_str() == uri)
            .map(|(prefix, _)| prefix.as_str())
            .or_else(|| (self.get_default_namespace() == Some(uri)).then_some(""))
    }

    /// Render a name as a path segment, replacing its URI by the declared prefix
    ///
    /// Names whose URI has no declaration in scope fall back to Clark notation.
    pub fn prefixed(&self, qname: &QName) -> String {
        match &qname.namespace {
            None => qname.local_name.clone(),
            Some(uri) => match self.prefix_for(uri) {
                Some("") => qname.local_name.clone(),
                Some(prefix) => format!("{}:{}", prefix, qname.local_name),
                None => qname.to_clark(),
            },
        }
    }
}
