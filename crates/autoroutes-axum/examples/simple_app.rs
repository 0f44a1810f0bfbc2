//! Minimal application: a routes tree bound to an axum server.
//!
//! The route files are laid out in a scratch directory at startup so the
//! example is self-contained; a real application keeps them in its repo and
//! points `dir` at them.

use anyhow::Result;
use autoroutes::{register, AutorouteOptions, ModuleExport, Resource, StaticModules};
use autoroutes_axum::{handler, AxumHost};
use axum::extract::Path;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let scratch = tempfile::tempdir()?;
    for file in ["index.rs", "users/{userId}/index.rs"] {
        let path = scratch.path().join(file);
        std::fs::create_dir_all(path.parent().unwrap())?;
        std::fs::write(path, "")?;
    }

    let modules = StaticModules::new()
        .with_module(
            "index.rs",
            ModuleExport::factory(|_| Resource::new().get(handler(|| async { "root" }))),
        )
        .with_module(
            "users/{userId}/index.rs",
            ModuleExport::factory(|_| {
                Resource::new().get(handler(|Path(user_id): Path<String>| async move {
                    format!("user {user_id}")
                }))
            }),
        );

    let mut host = AxumHost::new();
    let options = AutorouteOptions::new().with_dir(scratch.path().to_string_lossy().into_owned());
    register(&mut host, modules, options).await?;

    for (method, url) in host.registered() {
        println!("{method} {url}");
    }

    let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
    println!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, host.into_router()).await?;
    Ok(())
}
