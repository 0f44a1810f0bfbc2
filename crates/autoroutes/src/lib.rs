//! # Autoroutes
//!
//! Filesystem-based route discovery and registration: scan a directory
//! tree, map file paths to URL route patterns, resolve each file's route
//! module to a resource factory, and register every method/handler pair on
//! a host framework. Registration ends the job; request dispatch stays with
//! the host.
//!
//! ## Features
//!
//! - **File-derived patterns** - `users/{userId}/index.rs` becomes
//!   `/users/:userId`, the root `index.rs` becomes `/`
//! - **Export-shape tolerance** - factories, `default` exports,
//!   double-wrapped defaults, and plain resource values all resolve
//! - **Concurrent loading** - all module loads of a run are in flight
//!   together, with a strict barrier before any registration
//! - **Fail-fast activation** - bad directory, unloadable module, duplicate
//!   pattern, or missing handler aborts the run with nothing registered
//! - **Host-agnostic** - the [`RouteHost`] trait is the only coupling;
//!   adapters pick the handler type their framework consumes
//!
//! ## File Naming Convention
//!
//! | File Path                    | Route Pattern    |
//! |------------------------------|------------------|
//! | `index.rs`                   | `/`              |
//! | `a/status.rs`                | `/a/status`      |
//! | `users/index.rs`             | `/users`         |
//! | `users/{userId}/index.rs`    | `/users/:userId` |
//! | `_private.rs` / `.hidden.rs` | excluded         |
//! | `smoke.test.rs`              | excluded         |
//!
//! ## Quick Start
//!
//! ```
//! use autoroutes::{translate, ModuleExport, Resource, StaticModules};
//!
//! // Patterns are derived from routes-root-relative paths.
//! assert_eq!(translate("/users/{userId}/index.rs", ""), "/users/:userId");
//!
//! // Route modules are compiled in and registered by relative path.
//! let modules = StaticModules::new().with_module(
//!     "users/{userId}/index.rs",
//!     ModuleExport::factory(|_| Resource::new().get("show-user")),
//! );
//! assert_eq!(modules.len(), 1);
//! ```
//!
//! A full run wires the registry to a host; see [`Discovery`] and
//! [`register`].

pub mod discover;
pub mod error;
pub mod host;
pub mod module;
pub mod path;
pub mod resource;

pub use discover::{register, AutorouteOptions, Discovery, RouteEntry, RouteTable};
pub use error::{AutorouteError, BoxError, ConfigurationError, Result, ERROR_LABEL};
pub use host::{HostContext, RouteHost};
pub use module::{
    DefaultExport, ModuleExport, ModuleSource, Namespace, ResourceFactory, StaticModules,
};
pub use path::{is_route_file, translate, MODULE_EXTENSIONS};
pub use resource::{HandlerConfig, Method, Resource, RouteRegistration, RouteSchema};
