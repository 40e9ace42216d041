//! Builder for configuring and creating a bus.

use std::fmt;
use std::io::Write;
use std::sync::Arc;

use crate::registry::Database;

use super::config::BusConfig;
use super::Bus;

/// Builder for creating a configured [`Bus`].
///
/// # Example
///
/// ```rust
/// use selectbus::Bus;
///
/// let bus = Bus::builder()
///     .debug_sink(std::io::stderr())
///     .prune_empty_groups(true)
///     .build();
/// bus.publish((1u32,));
/// ```
#[derive(Default)]
pub struct BusBuilder {
    config: BusConfig,
    debug_sink: Option<Box<dyn Write + Send>>,
}

impl BusBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit diagnostic lines (`added : <shape>`, `no subscriptions for
    /// <shape>`) to the given writer.
    pub fn debug_sink(mut self, sink: impl Write + Send + 'static) -> Self {
        self.debug_sink = Some(Box::new(sink));
        self
    }

    /// Enable or disable empty-group pruning on teardown
    pub fn prune_empty_groups(mut self, enable: bool) -> Self {
        self.config = self.config.prune_empty_groups(enable);
        self
    }

    /// Apply a configuration closure
    pub fn configure<F>(mut self, f: F) -> Self
    where
        F: FnOnce(BusConfig) -> BusConfig,
    {
        self.config = f(self.config);
        self
    }

    /// Build the bus
    pub fn build(self) -> Bus {
        Bus {
            data: Arc::new(Database::new(self.config.prune_empty_groups, self.debug_sink)),
        }
    }
}

impl fmt::Debug for BusBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BusBuilder")
            .field("config", &self.config)
            .field("debug_sink", &self.debug_sink.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Clone)]
    struct SharedSink(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedSink {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_builder_wires_debug_sink() {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let bus = Bus::builder()
            .debug_sink(SharedSink(buffer.clone()))
            .build();

        let _anchor = bus.subscribe(|_: &u32| {}, (1u32,));
        bus.publish((1u64,));

        let log = String::from_utf8(buffer.lock().clone()).unwrap();
        assert!(log.contains("added : "), "log was: {log}");
        assert!(log.contains("no subscriptions for "), "log was: {log}");
    }

    #[test]
    fn test_configure_closure() {
        let builder = BusBuilder::new().configure(|c| c.prune_empty_groups(true));
        assert!(builder.config.prune_empty_groups);
    }
}
