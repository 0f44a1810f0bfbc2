//! Host collaborator contract.
//!
//! The binder never dispatches requests; it hands every discovered
//! method/pattern/handler triple to a [`RouteHost`] and steps aside. Hosts
//! also provide the opaque [`HostContext`] handle passed to each resource
//! factory, carrying whatever capabilities route modules may need.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::BoxError;
use crate::resource::RouteRegistration;

/// Opaque capability handle passed into each resource factory.
///
/// A cheaply-cloneable typed map: hosts stash shared state in it with
/// [`with_value`](HostContext::with_value) and route modules read it back by
/// type. The discovery pipeline itself never looks inside.
///
/// # Examples
///
/// ```
/// use autoroutes::HostContext;
///
/// #[derive(Clone)]
/// struct AppName(&'static str);
///
/// let context = HostContext::new().with_value(AppName("demo"));
/// assert_eq!(context.get::<AppName>().unwrap().0, "demo");
/// assert!(context.get::<String>().is_none());
/// ```
#[derive(Clone, Default)]
pub struct HostContext {
    values: Arc<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
}

impl HostContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a context extended with `value`, keyed by its type. A value
    /// of the same type already present is replaced.
    pub fn with_value<V: Send + Sync + 'static>(self, value: V) -> Self {
        let mut values = (*self.values).clone();
        values.insert(TypeId::of::<V>(), Arc::new(value));
        Self {
            values: Arc::new(values),
        }
    }

    pub fn get<V: Send + Sync + 'static>(&self) -> Option<&V> {
        self.values
            .get(&TypeId::of::<V>())
            .and_then(|value| value.downcast_ref::<V>())
    }
}

/// The external request-dispatch framework this binder registers routes on.
///
/// `Handler` is whatever the host's registration primitive consumes; the
/// core carries it through untouched. Behavior on duplicate registration is
/// host-owned, and registration failures bubble back out of the discovery
/// run untouched apart from method/url context.
pub trait RouteHost {
    type Handler;

    /// Handle passed to every resource factory of a discovery run.
    fn context(&self) -> HostContext {
        HostContext::default()
    }

    /// Registers one method + pattern + handler config.
    fn register_route(&mut self, route: RouteRegistration<Self::Handler>) -> Result<(), BoxError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, PartialEq, Debug)]
    struct Marker(u32);

    #[test]
    fn context_values_are_typed() {
        let context = HostContext::new().with_value(Marker(7)).with_value("label");
        assert_eq!(context.get::<Marker>(), Some(&Marker(7)));
        assert_eq!(context.get::<&str>(), Some(&"label"));
        assert!(context.get::<u32>().is_none());
    }

    #[test]
    fn later_values_replace_earlier_ones_of_the_same_type() {
        let context = HostContext::new().with_value(Marker(1)).with_value(Marker(2));
        assert_eq!(context.get::<Marker>(), Some(&Marker(2)));
    }

    #[test]
    fn clones_share_the_same_values() {
        let context = HostContext::new().with_value(Marker(9));
        let clone = context.clone();
        assert_eq!(clone.get::<Marker>(), Some(&Marker(9)));
    }
}
