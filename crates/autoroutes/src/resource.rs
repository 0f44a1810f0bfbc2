//! Resource descriptors produced by route modules.
//!
//! A route module resolves to a [`Resource`]: an ordered table from HTTP
//! method to [`HandlerConfig`]. The handler type is generic; each host
//! adapter picks the concrete type its registration primitive consumes.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// HTTP methods a route module may bind handlers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Method {
    Delete,
    Get,
    Head,
    Patch,
    Post,
    Put,
    Options,
}

impl Method {
    /// Every supported method, in registration order.
    pub const ALL: [Method; 7] = [
        Method::Delete,
        Method::Get,
        Method::Head,
        Method::Patch,
        Method::Post,
        Method::Put,
        Method::Options,
    ];

    /// Upper-cased method name, as handed to the host's registration
    /// primitive.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Delete => "DELETE",
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Patch => "PATCH",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Options => "OPTIONS",
        }
    }

    /// Case-insensitive parse of a method name.
    ///
    /// # Examples
    ///
    /// ```
    /// use autoroutes::Method;
    ///
    /// assert_eq!(Method::parse("get"), Some(Method::Get));
    /// assert_eq!(Method::parse("DELETE"), Some(Method::Delete));
    /// assert_eq!(Method::parse("trace"), None);
    /// ```
    pub fn parse(name: &str) -> Option<Method> {
        Method::ALL
            .into_iter()
            .find(|method| method.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Framework-level schema attached to a handler and passed through verbatim
/// to the host. The binder never interprets it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteSchema {
    pub summary: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub security: Vec<BTreeMap<String, Vec<String>>>,
    pub consumes: Vec<String>,
    pub produces: Vec<String>,
    pub body: Option<Value>,
    pub querystring: Option<Value>,
    pub params: Option<Value>,
    pub headers: Option<Value>,
    pub response: BTreeMap<u16, Value>,
}

/// Per-method handler configuration inside a [`Resource`].
///
/// The handler is optional here so that malformed definitions can be
/// represented and rejected at registration time; a `None` handler is an
/// invalid route definition and aborts the discovery run.
#[derive(Clone)]
pub struct HandlerConfig<T> {
    pub handler: Option<T>,
    pub schema: Option<RouteSchema>,
    /// Additional host options, carried verbatim to the registration call.
    pub config: serde_json::Map<String, Value>,
}

impl<T> HandlerConfig<T> {
    pub fn new(handler: T) -> Self {
        Self {
            handler: Some(handler),
            schema: None,
            config: serde_json::Map::new(),
        }
    }

    /// A config without a handler. Only useful in tests exercising the
    /// invalid-route-definition policy.
    pub fn without_handler() -> Self {
        Self {
            handler: None,
            schema: None,
            config: serde_json::Map::new(),
        }
    }

    pub fn with_schema(mut self, schema: RouteSchema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Attaches one passthrough host option.
    pub fn with_config_value(mut self, key: impl Into<String>, value: Value) -> Self {
        self.config.insert(key.into(), value);
        self
    }
}

impl<T> From<T> for HandlerConfig<T> {
    fn from(handler: T) -> Self {
        HandlerConfig::new(handler)
    }
}

/// The object a route module produces: HTTP method -> handler config.
///
/// Methods are kept in a `BTreeMap`, so iteration (and therefore
/// registration) order is deterministic.
///
/// # Examples
///
/// ```
/// use autoroutes::{Method, Resource};
///
/// let resource: Resource<&str> = Resource::new()
///     .get("list-users")
///     .post("create-user");
///
/// assert_eq!(resource.len(), 2);
/// assert!(resource.contains(Method::Get));
/// ```
#[derive(Clone)]
pub struct Resource<T> {
    entries: BTreeMap<Method, HandlerConfig<T>>,
}

impl<T> Resource<T> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Binds a handler config to a method. Chainable; a later binding for
    /// the same method replaces the earlier one.
    pub fn route(mut self, method: Method, config: impl Into<HandlerConfig<T>>) -> Self {
        self.entries.insert(method, config.into());
        self
    }

    pub fn delete(self, config: impl Into<HandlerConfig<T>>) -> Self {
        self.route(Method::Delete, config)
    }

    pub fn get(self, config: impl Into<HandlerConfig<T>>) -> Self {
        self.route(Method::Get, config)
    }

    pub fn head(self, config: impl Into<HandlerConfig<T>>) -> Self {
        self.route(Method::Head, config)
    }

    pub fn patch(self, config: impl Into<HandlerConfig<T>>) -> Self {
        self.route(Method::Patch, config)
    }

    pub fn post(self, config: impl Into<HandlerConfig<T>>) -> Self {
        self.route(Method::Post, config)
    }

    pub fn put(self, config: impl Into<HandlerConfig<T>>) -> Self {
        self.route(Method::Put, config)
    }

    pub fn options(self, config: impl Into<HandlerConfig<T>>) -> Self {
        self.route(Method::Options, config)
    }

    pub fn contains(&self, method: Method) -> bool {
        self.entries.contains_key(&method)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Method, &HandlerConfig<T>)> {
        self.entries.iter().map(|(method, config)| (*method, config))
    }
}

impl<T> Default for Resource<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> IntoIterator for Resource<T> {
    type Item = (Method, HandlerConfig<T>);
    type IntoIter = std::collections::btree_map::IntoIter<Method, HandlerConfig<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Argument to the host's single-route-registration primitive: one method,
/// one pattern, one handler, plus the passthrough options.
pub struct RouteRegistration<T> {
    pub method: Method,
    pub url: String,
    pub handler: T,
    pub schema: Option<RouteSchema>,
    pub config: serde_json::Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_parse_is_case_insensitive() {
        for method in Method::ALL {
            assert_eq!(Method::parse(method.as_str()), Some(method));
            assert_eq!(Method::parse(&method.as_str().to_lowercase()), Some(method));
        }
        assert_eq!(Method::parse("TRACE"), None);
        assert_eq!(Method::parse(""), None);
    }

    #[test]
    fn resource_keeps_last_binding_per_method() {
        let resource: Resource<&str> = Resource::new().get("first").get("second");
        assert_eq!(resource.len(), 1);
        let (_, config) = resource.iter().next().unwrap();
        assert_eq!(config.handler, Some("second"));
    }

    #[test]
    fn resource_iterates_in_stable_order() {
        let resource: Resource<&str> = Resource::new()
            .options("o")
            .get("g")
            .delete("d");
        let methods: Vec<Method> = resource.iter().map(|(method, _)| method).collect();
        assert_eq!(methods, vec![Method::Delete, Method::Get, Method::Options]);
    }

    #[test]
    fn handler_config_builder_carries_options_verbatim() {
        let config = HandlerConfig::new("handler")
            .with_schema(RouteSchema {
                summary: Some("list users".to_string()),
                ..RouteSchema::default()
            })
            .with_config_value("version", serde_json::json!(2));

        assert_eq!(config.schema.unwrap().summary.as_deref(), Some("list users"));
        assert_eq!(config.config["version"], serde_json::json!(2));
    }
}
