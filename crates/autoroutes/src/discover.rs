//! Discovery pipeline: one run from directory validation to registration.
//!
//! Control flow for a run: validate options, enumerate candidate files
//! through the glob capability, fan out per file (translate the path, load
//! the module, invoke its factory once), collect everything into a
//! [`RouteTable`], then walk the table and register each method/handler
//! pair on the host.
//!
//! All module loads are initiated together and polled concurrently on the
//! calling task: unordered fan-out with a strict barrier, so registration
//! never starts before every file has loaded, and the first failure aborts
//! the whole run with nothing registered. Completions interleave
//! cooperatively on one task, so the table needs no lock.

use std::collections::btree_map::{self, BTreeMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures_util::future::try_join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{AutorouteError, ConfigurationError, Result};
use crate::host::RouteHost;
use crate::module::ModuleSource;
use crate::path::{is_route_file, normalize_separators, translate, MODULE_EXTENSIONS};
use crate::resource::{Resource, RouteRegistration};

/// Activation options for one discovery run.
///
/// Deserializable with per-field defaults, so it can sit inside an
/// application's own configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AutorouteOptions {
    /// Root directory scanned for route files.
    pub dir: String,

    /// String prepended to every computed route pattern. The bare root
    /// pattern `/` is never prefixed.
    pub prefix: String,

    /// Base directory a relative `dir` is resolved against. There is no
    /// ambient fallback: a relative `dir` without a base directory is a
    /// configuration error.
    pub base_dir: Option<PathBuf>,
}

impl Default for AutorouteOptions {
    fn default() -> Self {
        Self {
            dir: "./routes".to_string(),
            prefix: String::new(),
            base_dir: None,
        }
    }
}

impl AutorouteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dir(mut self, dir: impl Into<String>) -> Self {
        self.dir = dir.into();
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(base_dir.into());
        self
    }
}

/// One entry of a [`RouteTable`]: the resource plus the file it came from,
/// kept for collision diagnostics.
pub struct RouteEntry<T> {
    pub file: PathBuf,
    pub resource: Resource<T>,
}

/// Per-run table from route pattern to resource.
///
/// Fully materialized before any registration happens and discarded after
/// the run. Keys are ordered, so registration order is deterministic for a
/// given file tree. Inserting a pattern twice is fatal and names both files.
pub struct RouteTable<T> {
    entries: BTreeMap<String, RouteEntry<T>>,
}

impl<T> RouteTable<T> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn insert(
        &mut self,
        pattern: String,
        file: PathBuf,
        resource: Resource<T>,
    ) -> Result<(), ConfigurationError> {
        match self.entries.entry(pattern) {
            btree_map::Entry::Occupied(occupied) => Err(ConfigurationError::DuplicateRoute {
                pattern: occupied.key().clone(),
                first: occupied.get().file.clone(),
                second: file,
            }),
            btree_map::Entry::Vacant(vacant) => {
                vacant.insert(RouteEntry { file, resource });
                Ok(())
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl<T> Default for RouteTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> IntoIterator for RouteTable<T> {
    type Item = (String, RouteEntry<T>);
    type IntoIter = btree_map::IntoIter<String, RouteEntry<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// The discovery pipeline: options plus the module-source capability.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> autoroutes::Result<()> {
/// use autoroutes::{Discovery, ModuleExport, Resource, StaticModules};
/// # use autoroutes::{BoxError, RouteHost, RouteRegistration};
/// # struct Host;
/// # impl RouteHost for Host {
/// #     type Handler = &'static str;
/// #     fn register_route(&mut self, _route: RouteRegistration<&'static str>) -> Result<(), BoxError> { Ok(()) }
/// # }
/// # let mut host = Host;
///
/// let modules = StaticModules::new()
///     .with_module("index.rs", ModuleExport::factory(|_| Resource::new().get("root")));
///
/// Discovery::new(modules)
///     .with_dir("/srv/app/routes")
///     .run(&mut host)
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct Discovery<T> {
    options: AutorouteOptions,
    modules: Arc<dyn ModuleSource<T>>,
}

impl<T: Clone + Send + Sync + 'static> Discovery<T> {
    pub fn new(modules: impl ModuleSource<T> + 'static) -> Self {
        Self {
            options: AutorouteOptions::default(),
            modules: Arc::new(modules),
        }
    }

    pub fn with_options(mut self, options: AutorouteOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_dir(mut self, dir: impl Into<String>) -> Self {
        self.options.dir = dir.into();
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.options.prefix = prefix.into();
        self
    }

    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.options.base_dir = Some(base_dir.into());
        self
    }

    /// Executes one discovery run against `host`.
    ///
    /// Either every discovered route is registered or the run fails with
    /// nothing registered; there is no partial state to clean up.
    pub async fn run<H>(&self, host: &mut H) -> Result<()>
    where
        H: RouteHost<Handler = T>,
    {
        let root = resolve_dir(&self.options)?;
        let is_dir = std::fs::metadata(&root)
            .map(|metadata| metadata.is_dir())
            .unwrap_or(false);
        if !is_dir {
            return Err(ConfigurationError::NotADirectory(root).into());
        }

        // Canonical form keeps enumerated paths prefix-compatible with the
        // root even through symlinks and `.` components.
        let root = root
            .canonicalize()
            .map_err(|_| ConfigurationError::NotADirectory(root.clone()))?;

        let root = normalize_separators(&root.to_string_lossy())
            .trim_end_matches('/')
            .to_string();

        let files = enumerate(&root)?;
        debug!(root = %root, files = files.len(), "scanned routes directory");

        let context = host.context();
        let loads = files.iter().map(|file| {
            let modules = Arc::clone(&self.modules);
            let context = context.clone();
            let prefix = self.options.prefix.as_str();
            let root = root.as_str();
            async move {
                let relative = relative_of(file, root);
                let name = translate(&format!("/{relative}"), prefix);
                let export = modules.load(&relative, file).await.map_err(|source| {
                    AutorouteError::ModuleLoad {
                        name: name.clone(),
                        path: file.clone(),
                        source,
                    }
                })?;
                let factory = export.into_factory(&name, file)?;
                let resource = factory(&context);
                debug!(url = %name, file = %file.display(), methods = resource.len(), "loaded route module");
                Ok::<_, AutorouteError>((name, file.clone(), resource))
            }
        });
        let loaded = try_join_all(loads).await?;

        let mut table = RouteTable::new();
        for (pattern, file, resource) in loaded {
            if resource.is_empty() {
                warn!(url = %pattern, file = %file.display(), "route module produced no methods");
            }
            table.insert(pattern, file, resource)?;
        }

        let mut registered = 0usize;
        for (url, entry) in table {
            for (method, config) in entry.resource {
                let handler =
                    config
                        .handler
                        .ok_or_else(|| AutorouteError::InvalidRouteDefinition {
                            method,
                            url: url.clone(),
                        })?;
                host.register_route(RouteRegistration {
                    method,
                    url: url.clone(),
                    handler,
                    schema: config.schema,
                    config: config.config,
                })
                .map_err(|source| AutorouteError::Registration {
                    method,
                    url: url.clone(),
                    source,
                })?;
                debug!(method = %method, url = %url, "registered route");
                registered += 1;
            }
        }

        info!(routes = registered, "route discovery complete");
        Ok(())
    }
}

/// Activation entry point: build a [`Discovery`] from `options` and run it
/// once against `host`.
pub async fn register<T, H>(
    host: &mut H,
    modules: impl ModuleSource<T> + 'static,
    options: AutorouteOptions,
) -> Result<()>
where
    T: Clone + Send + Sync + 'static,
    H: RouteHost<Handler = T>,
{
    Discovery::new(modules).with_options(options).run(host).await
}

fn resolve_dir(options: &AutorouteOptions) -> Result<PathBuf, ConfigurationError> {
    let dir = Path::new(&options.dir);
    if dir.is_absolute() {
        return Ok(dir.to_path_buf());
    }
    match &options.base_dir {
        Some(base_dir) => Ok(base_dir.join(dir)),
        None => Err(ConfigurationError::MissingBaseDir(dir.to_path_buf())),
    }
}

/// Enumerates candidate route files under `root` through the glob
/// capability, one pattern per recognized extension, filtered by the file
/// naming rules.
fn enumerate(root: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for extension in MODULE_EXTENSIONS {
        let pattern = format!("{}/**/*.{extension}", glob::Pattern::escape(root));
        let matches = glob::glob(&pattern).map_err(|source| AutorouteError::Scan {
            pattern: pattern.clone(),
            source: Box::new(source),
        })?;
        for entry in matches {
            let file = entry.map_err(|source| AutorouteError::Scan {
                pattern: pattern.clone(),
                source: Box::new(source),
            })?;
            let base_name = file
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or_default();
            if is_route_file(base_name) {
                files.push(file);
            }
        }
    }
    files.sort();
    Ok(files)
}

/// Routes-root-relative path of an enumerated file, forward slashes, no
/// leading slash.
fn relative_of(file: &Path, root: &str) -> String {
    let file = normalize_separators(&file.to_string_lossy());
    file.strip_prefix(root)
        .unwrap_or(&file)
        .trim_start_matches('/')
        .to_string()
}
