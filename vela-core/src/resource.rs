//! Resource - Representing resources and their state

use std::collections::HashMap;

/// Unique identifier for a resource
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceId {
    /// Resource type (e.g., "compute.target_ssl_proxy")
    pub resource_type: String,
    /// Resource name (identifier specified in the configuration)
    pub name: String,
}

impl ResourceId {
    pub fn new(resource_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            name: name.into(),
        }
    }
}

/// Attribute value of a resource
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Int(i64),
    Bool(bool),
    List(Vec<Value>),
    Map(HashMap<String, Value>),
    /// Reference to another resource's attribute (binding_name, attribute_name)
    ResourceRef(String, String),
}

impl Value {
    /// Borrow the inner string if this is a string value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

/// Desired state declared in the configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    pub id: ResourceId,
    pub attributes: HashMap<String, Value>,
}

impl Resource {
    pub fn new(resource_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: ResourceId::new(resource_type, name),
            attributes: HashMap::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    /// Declared string attribute, if present
    pub fn string_attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(Value::as_str)
    }

    /// Declared list-of-strings attribute, if present
    pub fn string_list_attr(&self, key: &str) -> Option<Vec<String>> {
        match self.attributes.get(key) {
            Some(Value::List(items)) => Some(
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(String::from))
                    .collect(),
            ),
            _ => None,
        }
    }
}

/// Current state fetched from actual infrastructure
#[derive(Debug, Clone, PartialEq)]
pub struct State {
    pub id: ResourceId,
    /// Remote identifier of the resource (e.g., the provider-side name)
    pub identifier: Option<String>,
    pub attributes: HashMap<String, Value>,
    /// Whether this state exists
    pub exists: bool,
}

impl State {
    pub fn not_found(id: ResourceId) -> Self {
        Self {
            id,
            identifier: None,
            attributes: HashMap::new(),
            exists: false,
        }
    }

    pub fn existing(id: ResourceId, attributes: HashMap<String, Value>) -> Self {
        Self {
            id,
            identifier: None,
            attributes,
            exists: true,
        }
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// Last-known string attribute, if present
    pub fn string_attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_attr_lookup() {
        let resource = Resource::new("compute.target_ssl_proxy", "proxy")
            .with_attribute("name", Value::String("proxy".to_string()))
            .with_attribute("count", Value::Int(3));

        assert_eq!(resource.string_attr("name"), Some("proxy"));
        assert_eq!(resource.string_attr("count"), None);
        assert_eq!(resource.string_attr("missing"), None);
    }

    #[test]
    fn string_list_attr_keeps_order() {
        let resource = Resource::new("compute.target_ssl_proxy", "proxy").with_attribute(
            "ssl_certificates",
            Value::List(vec![
                Value::String("cert-b".to_string()),
                Value::String("cert-a".to_string()),
            ]),
        );

        assert_eq!(
            resource.string_list_attr("ssl_certificates"),
            Some(vec!["cert-b".to_string(), "cert-a".to_string()])
        );
    }

    #[test]
    fn not_found_state_has_no_identifier() {
        let state = State::not_found(ResourceId::new("compute.target_ssl_proxy", "gone"));
        assert!(!state.exists);
        assert!(state.identifier.is_none());
        assert!(state.attributes.is_empty());
    }
}
