//! The expensive language-service client host and its deferred construction.

use std::rc::{Rc, Weak};

use camino::Utf8PathBuf;
use url::Url;

use crate::deferred::DeferredCell;
use crate::dispose::{DisposableAggregate, on_dispose};
use crate::errors::ClientHostError;
use crate::telemetry::CLIENT_HOST_TARGET;

/// Behaviour the activation gate needs from a live client host.
pub trait ClientHost {
    /// Resolves a resource to the path the analysis process knows it by.
    ///
    /// Returns `None` for resources the service cannot address.
    fn to_path(&self, resource: &Url) -> Option<Utf8PathBuf>;

    /// Shuts the host down. Called once, at extension teardown.
    fn dispose(&self) {}
}

/// Shared deferred cell holding the client host.
pub type LazyClientHost<H> = Rc<DeferredCell<H, ClientHostError>>;

/// Wraps `factory` in a deferred cell bound to the extension subscriptions.
///
/// Nothing is built until the cell is forced. The first successful build
/// registers the host's [`ClientHost::dispose`] with `subscriptions`, so the
/// host is torn down with the extension. Forcing the cell after the
/// subscriptions were released fails with [`ClientHostError::Deactivated`].
///
/// `services` is the bundle of supporting services the factory needs
/// (configuration, logging, telemetry, version and process factories,
/// command registration and so on); it is opaque here.
#[must_use]
pub fn create_lazy_client_host<H, S, F>(
    services: S,
    subscriptions: &Rc<DisposableAggregate>,
    factory: F,
) -> LazyClientHost<H>
where
    H: ClientHost + 'static,
    S: 'static,
    F: Fn(&S) -> Result<H, ClientHostError> + 'static,
{
    let subscriptions = Rc::clone(subscriptions);
    Rc::new_cyclic(move |weak_cell: &Weak<DeferredCell<H, ClientHostError>>| {
        let cell = Weak::clone(weak_cell);
        DeferredCell::new(move || {
            if subscriptions.is_disposed() {
                return Err(ClientHostError::Deactivated);
            }

            tracing::info!(
                target: CLIENT_HOST_TARGET,
                event = "client_host_starting",
                "building language-service client host"
            );
            let host = factory(&services).inspect_err(|error| {
                tracing::error!(
                    target: CLIENT_HOST_TARGET,
                    event = "client_host_failed",
                    %error,
                    "client host construction failed"
                );
            })?;

            let owner = Weak::clone(&cell);
            subscriptions.push(on_dispose(move || {
                let Some(forced) = owner.upgrade() else {
                    return;
                };
                if let Some(live) = forced.get() {
                    live.dispose();
                }
            }));
            Ok(host)
        })
    })
}
