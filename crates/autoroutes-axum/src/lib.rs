//! # Autoroutes Axum
//!
//! Axum host adapter for [`autoroutes`]: route modules hand back axum
//! handlers, the discovery pipeline registers them, and the finished
//! `axum::Router` comes out the other side. Request dispatch, method
//! matching, and `:param` extraction are all axum's; this crate only merges
//! registrations into the router.
//!
//! ## Quick Start
//!
//! ```no_run
//! # async fn example() -> autoroutes::Result<()> {
//! use autoroutes::{register, AutorouteOptions, ModuleExport, Resource, StaticModules};
//! use autoroutes_axum::{handler, AxumHost};
//! use axum::extract::Path;
//!
//! let modules = StaticModules::new()
//!     .with_module(
//!         "index.rs",
//!         ModuleExport::factory(|_| Resource::new().get(handler(|| async { "root" }))),
//!     )
//!     .with_module(
//!         "users/{userId}/index.rs",
//!         ModuleExport::factory(|_| {
//!             Resource::new().get(handler(|Path(user_id): Path<String>| async move { user_id }))
//!         }),
//!     );
//!
//! let mut host = AxumHost::new();
//! let options = AutorouteOptions::new().with_dir("/srv/app/routes");
//! register(&mut host, modules, options).await?;
//!
//! let app: axum::Router = host.into_router();
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use autoroutes::{BoxError, HostContext, Method, RouteHost, RouteRegistration};
use axum::handler::Handler;
use axum::routing::{on, MethodFilter, MethodRouter};
use axum::Router;
use tracing::debug;

/// Cloneable type-erased axum handler.
///
/// A route module binds handlers before the HTTP method is known, so the
/// handler is held as a closure that produces the `MethodRouter` once the
/// registration call supplies the method filter.
#[derive(Clone)]
pub struct RouteHandler {
    make: Arc<dyn Fn(MethodFilter) -> MethodRouter + Send + Sync>,
}

impl RouteHandler {
    fn method_router(&self, filter: MethodFilter) -> MethodRouter {
        (self.make)(filter)
    }
}

/// Wraps any axum handler into a [`RouteHandler`].
pub fn handler<H, T>(handler: H) -> RouteHandler
where
    H: Handler<T, ()> + Sync,
    T: 'static,
{
    RouteHandler {
        make: Arc::new(move |filter| on(filter, handler.clone())),
    }
}

/// Route host backed by an `axum::Router`.
///
/// Registrations for the same pattern with different methods merge into one
/// method router; duplicate method registrations panic inside axum, which
/// is the host-owned behavior. [`into_router`](AxumHost::into_router) hands
/// the finished router to the application once discovery is done.
#[derive(Default)]
pub struct AxumHost {
    router: Router,
    context: HostContext,
    registered: Vec<(Method, String)>,
}

impl AxumHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the context handle passed to every resource factory.
    pub fn with_context(mut self, context: HostContext) -> Self {
        self.context = context;
        self
    }

    /// Every (method, pattern) pair registered so far.
    pub fn registered(&self) -> &[(Method, String)] {
        &self.registered
    }

    pub fn into_router(self) -> Router {
        self.router
    }
}

impl RouteHost for AxumHost {
    type Handler = RouteHandler;

    fn context(&self) -> HostContext {
        self.context.clone()
    }

    fn register_route(&mut self, route: RouteRegistration<RouteHandler>) -> Result<(), BoxError> {
        let method_router = route.handler.method_router(method_filter(route.method));
        self.router = std::mem::take(&mut self.router).route(&route.url, method_router);

        if let Some(schema) = &route.schema {
            // axum has no schema registry; surface it for documentation
            // tooling listening on the log stream.
            debug!(
                method = %route.method,
                url = %route.url,
                summary = schema.summary.as_deref().unwrap_or(""),
                "route schema attached"
            );
        }

        self.registered.push((route.method, route.url));
        Ok(())
    }
}

fn method_filter(method: Method) -> MethodFilter {
    match method {
        Method::Delete => MethodFilter::DELETE,
        Method::Get => MethodFilter::GET,
        Method::Head => MethodFilter::HEAD,
        Method::Patch => MethodFilter::PATCH,
        Method::Post => MethodFilter::POST,
        Method::Put => MethodFilter::PUT,
        Method::Options => MethodFilter::OPTIONS,
    }
}
