//! Error taxonomy for the discovery pipeline.
//!
//! Every failure raised by this crate starts with [`ERROR_LABEL`], so host
//! startup logging can filter binder failures out of a mixed error stream.

use std::path::PathBuf;

use thiserror::Error;

use crate::resource::Method;

/// Fixed textual label embedded in every error message raised by this crate.
pub const ERROR_LABEL: &str = "autoroutes";

/// Boxed error type accepted from host and module-source collaborators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Convenience alias used throughout the crate.
pub type Result<T, E = AutorouteError> = std::result::Result<T, E>;

/// Configuration problems detected before or while assembling the route table.
///
/// All of these are fatal: activation aborts before any route is registered.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// The routes directory is missing or is not a directory.
    #[error("dir {} must be a directory", .0.display())]
    NotADirectory(PathBuf),

    /// A relative routes directory was given without a base directory to
    /// resolve it against.
    #[error("relative dir {} requires base_dir to be set", .0.display())]
    MissingBaseDir(PathBuf),

    /// Two route files resolve to the same route pattern.
    #[error("duplicate route pattern {pattern}: {} and {} both resolve to it", .first.display(), .second.display())]
    DuplicateRoute {
        pattern: String,
        first: PathBuf,
        second: PathBuf,
    },
}

/// Failures raised by a discovery run.
#[derive(Debug, Error)]
pub enum AutorouteError {
    #[error("autoroutes: {0}")]
    Configuration(#[from] ConfigurationError),

    /// The module-source capability failed to produce an export for a file.
    #[error("autoroutes: failed to load module ({name}) {}: {source}", .path.display())]
    ModuleLoad {
        name: String,
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    /// A loaded export matched none of the recognized shapes.
    #[error("autoroutes: invalid route module definition ({name}) {}: must export a resource factory; found {found}", .path.display())]
    InvalidExport {
        name: String,
        path: PathBuf,
        found: String,
    },

    /// A method entry in a resource carries no handler.
    #[error("autoroutes: invalid route definition for {method} {url}: handler is missing")]
    InvalidRouteDefinition { method: Method, url: String },

    /// The host's registration primitive failed; the underlying error is
    /// passed through untouched.
    #[error("autoroutes: route registration failed for {method} {url}: {source}")]
    Registration {
        method: Method,
        url: String,
        #[source]
        source: BoxError,
    },

    /// The file-matching capability failed while enumerating route files.
    #[error("autoroutes: failed to scan {pattern}: {source}")]
    Scan {
        pattern: String,
        #[source]
        source: BoxError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_the_error_label() {
        let err = AutorouteError::Configuration(ConfigurationError::NotADirectory(
            PathBuf::from("/missing/routes"),
        ));
        assert!(err.to_string().starts_with(ERROR_LABEL));

        let err = AutorouteError::InvalidRouteDefinition {
            method: Method::Get,
            url: "/users".to_string(),
        };
        assert!(err.to_string().starts_with(ERROR_LABEL));
    }

    #[test]
    fn duplicate_route_names_both_files() {
        let err = ConfigurationError::DuplicateRoute {
            pattern: "/users".to_string(),
            first: PathBuf::from("/app/routes/users.rs"),
            second: PathBuf::from("/app/routes/users/index.rs"),
        };
        let message = err.to_string();
        assert!(message.contains("/app/routes/users.rs"));
        assert!(message.contains("/app/routes/users/index.rs"));
        assert!(message.contains("/users"));
    }
}
