//! Feed `tracing` events into a [`Logger`]'s outputs

use tracing::Subscriber;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::layer::Layer;
use tracing_subscriber::registry::LookupSpan;

use super::handle::{Logger, record_layer};
use super::level::Level;

/// Events from svclog's own diagnostics are never fed back into a logger.
const INTERNAL_TARGET: &str = "svclog::logger";

impl Logger {
    /// A `tracing` layer that encodes events like this logger's records and
    /// writes them to its outputs.
    ///
    /// The event target is nested under the handle's name scope, the `message`
    /// field becomes the record message and every other field a record field,
    /// after the handle's bound fields. Events below the logger's level are
    /// dropped.
    ///
    /// ```no_run
    /// use tracing_subscriber::layer::SubscriberExt;
    ///
    /// let logger = svclog::new_logger("/etc/my-service/service.yml")?;
    /// let subscriber = tracing_subscriber::registry().with(logger.layer());
    /// tracing::subscriber::set_global_default(subscriber).ok();
    ///
    /// tracing::info!(user = "ann", "signed in");
    /// # Ok::<(), svclog::Error>(())
    /// ```
    pub fn layer<S>(&self) -> impl Layer<S> + Send + Sync + 'static
    where
        S: Subscriber + for<'span> LookupSpan<'span> + 'static,
    {
        let core = self.core();
        let min = core.level;
        let encoder = core.encoder.scoped(self.scope());
        record_layer(encoder, core.outputs.clone()).with_filter(filter_fn(move |metadata| {
            !metadata.target().starts_with(INTERNAL_TARGET) && Level::from(*metadata.level()) >= min
        }))
    }
}
