//! TTL Expiry Watcher
//!
//! One-shot task that waits out a TTL and then invokes a callback. Watchers
//! are fire-and-forget: they are not tracked and cannot be cancelled.
//!
//! Unless the caller names a runtime, watchers run on one process-wide expiry
//! runtime with its own timer driver. It is built on first use and never shut
//! down, so a watcher outlives whatever runtime its cache was created in.

use std::sync::OnceLock;
use std::thread;
use std::time::Duration;

use tokio::runtime::{Builder, Handle, Runtime};
use tracing::{error, trace, warn};

const WATCHER_THREAD_NAME: &str = "mini-cache-expiry";

static EXPIRY_RUNTIME: OnceLock<Option<Runtime>> = OnceLock::new();

/// Returns the shared expiry runtime, building it on first call.
///
/// `None` only if the runtime could not be built; the error is logged once.
pub fn expiry_runtime() -> Option<&'static Handle> {
    EXPIRY_RUNTIME
        .get_or_init(|| {
            let built = Builder::new_multi_thread()
                .worker_threads(1)
                .thread_name(WATCHER_THREAD_NAME)
                .enable_time()
                .build();

            match built {
                Ok(runtime) => Some(runtime),
                Err(err) => {
                    error!("building expiry runtime failed: {}", err);
                    None
                }
            }
        })
        .as_ref()
        .map(Runtime::handle)
}

/// Spawns a detached watcher that runs `on_expiry` once `ttl` has elapsed.
///
/// The watcher is a Tokio task on `runtime` when one is given, which must
/// have timers enabled and stay alive until the watcher fires. Otherwise it
/// goes to the shared [`expiry_runtime`].
///
/// # Example
/// ```ignore
/// spawn_expiry_watcher(None, ttl, move || {
///     cache.expire(&key);
/// });
/// ```
pub fn spawn_expiry_watcher<F>(runtime: Option<&Handle>, ttl: Duration, on_expiry: F)
where
    F: FnOnce() + Send + 'static,
{
    trace!("starting expiry watcher for {:?}", ttl);

    let handle = match runtime {
        Some(handle) => handle,
        None => match expiry_runtime() {
            Some(handle) => handle,
            None => return spawn_thread_watcher(ttl, on_expiry),
        },
    };

    handle.spawn(async move {
        tokio::time::sleep(ttl).await;
        on_expiry();
    });
}

// Last resort when no runtime can be built.
fn spawn_thread_watcher<F>(ttl: Duration, on_expiry: F)
where
    F: FnOnce() + Send + 'static,
{
    let spawned = thread::Builder::new()
        .name(WATCHER_THREAD_NAME.to_string())
        .spawn(move || {
            thread::sleep(ttl);
            on_expiry();
        });

    if let Err(err) = spawned {
        warn!("starting expiry watcher thread failed: {}", err);
    }
}
