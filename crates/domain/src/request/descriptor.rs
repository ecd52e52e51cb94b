//! Request and result descriptors
//!
//! Descriptors are the static, catalog-supplied definitions of the requests
//! a run exercises. They are built once when the catalog is loaded and only
//! read afterwards.

use serde::{Deserialize, Serialize};

/// Expected structured-body contract attached to a request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResultDescriptor {
    /// Logical name of the result document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Schema reference; defaults to `<name>.xsd` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
}

impl ResultDescriptor {
    /// Creates a result descriptor with a logical name and the default schema.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            schema: None,
        }
    }

    /// Sets an explicit schema reference (builder pattern).
    #[must_use]
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Returns the schema the response body is validated against.
    ///
    /// Returns `None` when neither a schema nor a name is declared.
    #[must_use]
    pub fn schema_reference(&self) -> Option<String> {
        self.schema
            .clone()
            .or_else(|| self.name.as_ref().map(|name| format!("{name}.xsd")))
    }

    /// Returns a label suitable for narration.
    #[must_use]
    pub fn label(&self) -> &str {
        self.name
            .as_deref()
            .or(self.schema.as_deref())
            .unwrap_or("(unnamed)")
    }
}

/// A declared request: verb, host, path template and its parameters.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RequestDescriptor {
    /// HTTP verb as written in the catalog.
    pub verb: String,
    /// Declared host, possibly `name:port`.
    #[serde(default)]
    pub host: String,
    /// Path template with `<name>` placeholders.
    pub path: String,
    /// Ordered parameter names substituted into the path.
    #[serde(default)]
    pub parameters: Vec<String>,
    /// Optional expected-result contract.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<ResultDescriptor>,
}

impl RequestDescriptor {
    /// Creates a descriptor without parameters or result.
    #[must_use]
    pub fn new(verb: impl Into<String>, host: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            verb: verb.into(),
            host: host.into(),
            path: path.into(),
            parameters: Vec::new(),
            result: None,
        }
    }

    /// Adds a path parameter (builder pattern).
    #[must_use]
    pub fn with_parameter(mut self, name: impl Into<String>) -> Self {
        self.parameters.push(name.into());
        self
    }

    /// Attaches a result descriptor (builder pattern).
    #[must_use]
    pub fn with_result(mut self, result: ResultDescriptor) -> Self {
        self.result = Some(result);
        self
    }

    /// Returns the identity used to look the request up: `"<VERB> <path>"`.
    #[must_use]
    pub fn identity(&self) -> String {
        format!("{} {}", self.verb, self.path)
    }
}

/// Ordered, read-only collection of request descriptors.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestCatalog {
    requests: Vec<RequestDescriptor>,
}

impl RequestCatalog {
    /// Creates a catalog from descriptors in load order.
    #[must_use]
    pub const fn new(requests: Vec<RequestDescriptor>) -> Self {
        Self { requests }
    }

    /// Finds the first descriptor with the given identity.
    #[must_use]
    pub fn find(&self, identity: &str) -> Option<&RequestDescriptor> {
        self.requests.iter().find(|r| r.identity() == identity)
    }

    /// Returns all descriptors.
    #[must_use]
    pub fn requests(&self) -> &[RequestDescriptor] {
        &self.requests
    }

    /// Returns the number of descriptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// Returns true if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

impl FromIterator<RequestDescriptor> for RequestCatalog {
    fn from_iter<I: IntoIterator<Item = RequestDescriptor>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_schema_defaults_to_name() {
        let result = ResultDescriptor::named("item");
        assert_eq!(result.schema_reference().as_deref(), Some("item.xsd"));

        let result = ResultDescriptor::named("item").with_schema("schemas/item-v2.xsd");
        assert_eq!(
            result.schema_reference().as_deref(),
            Some("schemas/item-v2.xsd")
        );

        assert_eq!(ResultDescriptor::default().schema_reference(), None);
    }

    #[test]
    fn test_identity() {
        let request = RequestDescriptor::new("GET", "api.example.com", "/items/<id>")
            .with_parameter("id");
        assert_eq!(request.identity(), "GET /items/<id>");
    }

    #[test]
    fn test_catalog_find_first_match() {
        let catalog: RequestCatalog = [
            RequestDescriptor::new("GET", "a.example.com", "/status"),
            RequestDescriptor::new("GET", "b.example.com", "/status"),
            RequestDescriptor::new("POST", "a.example.com", "/status"),
        ]
        .into_iter()
        .collect();

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.find("GET /status").unwrap().host, "a.example.com");
        assert_eq!(catalog.find("POST /status").unwrap().verb, "POST");
        assert!(catalog.find("PUT /status").is_none());
    }

    #[test]
    fn test_descriptor_deserializes_with_defaults() {
        let json = r#"[{"verb": "GET", "host": "h", "path": "/a/<x>", "parameters": ["x"],
                        "result": {"name": "a"}}]"#;
        let catalog: RequestCatalog = serde_json::from_str(json).unwrap();
        let request = catalog.find("GET /a/<x>").unwrap();
        assert_eq!(request.parameters, vec!["x".to_string()]);
        assert_eq!(request.result, Some(ResultDescriptor::named("a")));
    }
}
