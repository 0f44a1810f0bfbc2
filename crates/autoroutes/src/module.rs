//! Route module loading.
//!
//! A compiled crate has no script loader, so "load the code at this path"
//! becomes a capability: a [`ModuleSource`] resolves a discovered file to
//! the [`ModuleExport`] its module produced. The bundled [`StaticModules`]
//! source is a registry of exports keyed by routes-root-relative path.
//!
//! Loaded exports come in several community shapes. Rather than requiring
//! route authors to conform to one, the export is modeled as a tagged value
//! and [`ModuleExport::into_factory`] tries each recognized shape in a fixed
//! order:
//!
//! 1. the export is directly a factory;
//! 2. a namespace whose `default` entry is a factory;
//! 3. a namespace whose `default` is itself a namespace with a factory
//!    `default` (double-wrapped output of some build pipelines);
//! 4. a namespace whose `default` is a plain [`Resource`] value, used as-is
//!    with the host handle ignored;
//! 5. anything else fails with a diagnostic summary of what was found.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{AutorouteError, BoxError, Result};
use crate::host::HostContext;
use crate::path;
use crate::resource::Resource;

/// Callable produced by export resolution; invoked exactly once per
/// discovery run, handed the host's context, and expected to produce the
/// file's [`Resource`].
pub type ResourceFactory<T> = Arc<dyn Fn(&HostContext) -> Resource<T> + Send + Sync>;

/// The value a route module exported.
#[derive(Clone)]
pub enum ModuleExport<T> {
    /// The loaded value is directly callable.
    Factory(ResourceFactory<T>),
    /// The loaded value is a module namespace.
    Namespace(Namespace<T>),
}

/// A module-namespace object: an optional `default` entry plus the names of
/// its other entries, kept for diagnostics.
#[derive(Clone)]
pub struct Namespace<T> {
    default: Option<DefaultExport<T>>,
    keys: Vec<String>,
}

/// What a namespace's `default` entry holds.
#[derive(Clone)]
pub enum DefaultExport<T> {
    Factory(ResourceFactory<T>),
    /// Double-wrapped export: `default` is itself a namespace.
    Namespace(Box<Namespace<T>>),
    /// `default` is a plain resource value rather than a factory.
    Resource(Resource<T>),
}

impl<T> Namespace<T> {
    pub fn new() -> Self {
        Self {
            default: None,
            keys: Vec::new(),
        }
    }

    pub fn with_default(mut self, default: DefaultExport<T>) -> Self {
        if !self.keys.iter().any(|key| key == "default") {
            self.keys.push("default".to_string());
        }
        self.default = Some(default);
        self
    }

    /// Records a non-default entry name. Only used for diagnostics.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.keys.push(key.into());
        self
    }

    fn describe(&self) -> String {
        let default = match &self.default {
            None => "missing",
            Some(DefaultExport::Factory(_)) => "factory",
            Some(DefaultExport::Namespace(_)) => "namespace",
            Some(DefaultExport::Resource(_)) => "resource",
        };
        format!(
            "kind=namespace, default={default}, keys=[{}]",
            self.keys.join(", ")
        )
    }
}

impl<T> Default for Namespace<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ModuleExport<T> {
    /// An export that is directly callable.
    pub fn factory(factory: impl Fn(&HostContext) -> Resource<T> + Send + Sync + 'static) -> Self {
        ModuleExport::Factory(Arc::new(factory))
    }

    /// A namespace whose `default` entry is callable.
    pub fn default_factory(
        factory: impl Fn(&HostContext) -> Resource<T> + Send + Sync + 'static,
    ) -> Self {
        ModuleExport::Namespace(
            Namespace::new().with_default(DefaultExport::Factory(Arc::new(factory))),
        )
    }

    /// A namespace whose `default` is itself a namespace with a callable
    /// `default`.
    pub fn double_wrapped_factory(
        factory: impl Fn(&HostContext) -> Resource<T> + Send + Sync + 'static,
    ) -> Self {
        let inner = Namespace::new().with_default(DefaultExport::Factory(Arc::new(factory)));
        ModuleExport::Namespace(
            Namespace::new().with_default(DefaultExport::Namespace(Box::new(inner))),
        )
    }

    /// A namespace whose `default` is a plain resource value.
    pub fn resource(resource: Resource<T>) -> Self {
        ModuleExport::Namespace(Namespace::new().with_default(DefaultExport::Resource(resource)))
    }

    /// An arbitrary namespace, for exports that may not resolve.
    pub fn namespace(namespace: Namespace<T>) -> Self {
        ModuleExport::Namespace(namespace)
    }
}

impl<T: Clone + Send + Sync + 'static> ModuleExport<T> {
    /// Resolves the export to a resource factory, trying each recognized
    /// shape in order. Unrecognized shapes fail with the offending path and
    /// a summary of what was found.
    pub fn into_factory(self, name: &str, file: &Path) -> Result<ResourceFactory<T>> {
        let invalid = |found: String| AutorouteError::InvalidExport {
            name: name.to_string(),
            path: file.to_path_buf(),
            found,
        };

        match self {
            ModuleExport::Factory(factory) => Ok(factory),
            ModuleExport::Namespace(namespace) => {
                let description = namespace.describe();
                match namespace.default {
                    Some(DefaultExport::Factory(factory)) => Ok(factory),
                    Some(DefaultExport::Namespace(inner)) => match inner.default {
                        Some(DefaultExport::Factory(factory)) => Ok(factory),
                        _ => Err(invalid(format!(
                            "{description} (nested default is not callable)"
                        ))),
                    },
                    Some(DefaultExport::Resource(resource)) => {
                        Ok(Arc::new(move |_context: &HostContext| resource.clone()))
                    }
                    None => Err(invalid(description)),
                }
            }
        }
    }
}

/// Capability that loads the code at a path and returns its exported value.
///
/// `relative` is the routes-root-relative path of the file (forward
/// slashes, no leading slash); `absolute` is the enumerated path on disk.
#[async_trait]
pub trait ModuleSource<T>: Send + Sync {
    async fn load(&self, relative: &str, absolute: &Path) -> Result<ModuleExport<T>, BoxError>;
}

/// Registry module source: route modules are compiled into the binary and
/// registered here under their routes-root-relative path.
///
/// Lookup tries two strategies in order: the verbatim relative path, then a
/// normalized key (forward slashes, leading `./` and recognized extension
/// stripped), so `users/{userId}/index.rs`, `./users/{userId}/index.rs` and
/// `users/{userId}/index` all name the same module. Resolution is stateless;
/// repeated discovery runs observe identical exports.
pub struct StaticModules<T> {
    modules: HashMap<String, ModuleExport<T>>,
}

impl<T> StaticModules<T> {
    pub fn new() -> Self {
        Self {
            modules: HashMap::new(),
        }
    }

    pub fn with_module(mut self, key: impl Into<String>, export: ModuleExport<T>) -> Self {
        self.insert(key, export);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, export: ModuleExport<T>) {
        self.modules.insert(key.into(), export);
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    fn lookup(&self, relative: &str) -> Option<&ModuleExport<T>> {
        self.modules
            .get(relative)
            .or_else(|| self.modules.get(&normalize_key(relative)))
    }
}

impl<T> Default for StaticModules<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Clone + Send + Sync + 'static> ModuleSource<T> for StaticModules<T> {
    async fn load(&self, relative: &str, _absolute: &Path) -> Result<ModuleExport<T>, BoxError> {
        self.lookup(relative)
            .cloned()
            .ok_or_else(|| format!("no module registered for {relative}").into())
    }
}

/// Normalized registry key: forward slashes, no leading `./`, recognized
/// extension stripped.
fn normalize_key(key: &str) -> String {
    let normalized = path::normalize_separators(key);
    let trimmed = normalized.strip_prefix("./").unwrap_or(&normalized);
    path::strip_module_extension(trimmed).to_string()
}
