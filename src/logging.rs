//! Diagnostics setup.
//!
//! The subscriber is installed before bootstrap so folder resolution and
//! config loading are logged. Whether debug output is wanted is only fully
//! known once the config is loaded (`general.dev_mode`), so the filter sits
//! behind a reload layer and [`LogHandle::enable_debug`] raises it afterwards.

use tracing::Subscriber;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Registry, reload};

/// Handle to the live filter of an installed subscriber.
pub struct LogHandle(reload::Handle<EnvFilter, Registry>);

impl LogHandle {
    /// Switch the filter to `debug` for the rest of the run.
    pub fn enable_debug(&self) {
        self.0.reload(EnvFilter::new("debug")).ok();
    }
}

/// `debug` when forced, otherwise `RUST_LOG`, falling back to `warn`.
fn base_filter(debug: bool) -> EnvFilter {
    if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    }
}

/// Build a subscriber writing to `make_writer`, plus a handle to its filter.
pub fn build<W>(debug: bool, make_writer: W) -> (impl Subscriber + Send + Sync + 'static, LogHandle)
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let (filter, handle) = reload::Layer::new(base_filter(debug));
    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(make_writer));
    (subscriber, LogHandle(handle))
}

/// Install the stderr subscriber as the global default.
pub fn init(debug: bool) -> LogHandle {
    let (subscriber, handle) = build(debug, std::io::stderr);
    tracing::subscriber::set_global_default(subscriber).ok();
    handle
}
