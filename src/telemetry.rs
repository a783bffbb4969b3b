use std::sync::Arc;

#[cfg(feature = "prometheus")]
use std::sync::atomic::{AtomicBool, Ordering};
#[cfg(feature = "prometheus")]
use std::sync::Mutex;
#[cfg(feature = "prometheus")]
use std::thread::JoinHandle;
#[cfg(feature = "prometheus")]
use std::time::Duration;

use crate::adaptive::AdaptiveKind;
use crate::error::CodecError;

/// Structured, in-process event hook for codec observability.
///
/// The library never prints. Callers that want visibility supply an
/// implementation forwarding these events to `tracing`, metrics, or custom
/// sinks; [`TracingEventListener`] covers the common case.
pub trait CodecEventListener: std::fmt::Debug + Send + Sync + 'static {
    fn on_event(&self, event: CodecEvent);
}

/// Structured events emitted by the adaptive encoder.
#[derive(Debug, Clone, PartialEq)]
pub enum CodecEvent {
    EncodingSelected {
        kind: AdaptiveKind,
        count: usize,
        unique_ratio: f64,
        range: u64,
        is_sorted: bool,
    },
    Encoded {
        kind: AdaptiveKind,
        values: usize,
        bytes: usize,
    },
    Decoded {
        kind: AdaptiveKind,
        values: usize,
    },
    /// `kind` is `None` when the tag byte itself could not be read.
    DecodeFailed {
        kind: Option<AdaptiveKind>,
        error: CodecError,
    },
}

#[derive(Debug)]
pub struct NoopEventListener;

impl CodecEventListener for NoopEventListener {
    #[inline]
    fn on_event(&self, _event: CodecEvent) {}
}

pub fn noop_event_listener() -> Arc<dyn CodecEventListener> {
    Arc::new(NoopEventListener)
}

/// Forwards events to `tracing` with structured fields. Failures log at
/// `warn`, everything else at `debug`.
#[derive(Debug, Default)]
pub struct TracingEventListener;

impl CodecEventListener for TracingEventListener {
    fn on_event(&self, event: CodecEvent) {
        match event {
            CodecEvent::EncodingSelected {
                kind,
                count,
                unique_ratio,
                range,
                is_sorted,
            } => tracing::debug!(
                kind = kind.name(),
                count,
                unique_ratio,
                range,
                is_sorted,
                "adaptive encoding selected"
            ),
            CodecEvent::Encoded { kind, values, bytes } => {
                tracing::debug!(kind = kind.name(), values, bytes, "encoded")
            }
            CodecEvent::Decoded { kind, values } => {
                tracing::debug!(kind = kind.name(), values, "decoded")
            }
            CodecEvent::DecodeFailed { kind, error } => tracing::warn!(
                kind = kind.map(AdaptiveKind::name).unwrap_or("unknown"),
                %error,
                "decode failed"
            ),
        }
    }
}

/// Metrics instrumentation for the codecs.
///
/// Emitting is effectively a no-op until a recorder is installed. With the
/// `prometheus` feature, [`codec_metrics::InProcessPrometheus`] renders the
/// exposition text in-process without starting a server.
pub mod codec_metrics {
    #[cfg(feature = "prometheus")]
    use super::*;

    use crate::adaptive::AdaptiveKind;

    use ::metrics::{describe_counter, describe_gauge, describe_histogram, Unit};

    #[cfg(feature = "prometheus")]
    use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

    // Counters are exposed as `<name>_total` by the Prometheus exporter.
    pub const ENCODES: &str = "varpack_adaptive_encodes";
    pub const INPUT_VALUES: &str = "varpack_input_values";
    pub const ENCODED_BYTES: &str = "varpack_encoded_bytes";
    pub const DECODED_VALUES: &str = "varpack_decoded_values";
    pub const DECODE_FAILURES: &str = "varpack_decode_failures";
    pub const COMPRESSION_RATIO: &str = "varpack_compression_ratio";
    pub const LAST_ENCODED_SIZE_BYTES: &str = "varpack_last_encoded_size_bytes";

    /// Handle to the in-process Prometheus recorder and scrape renderer.
    #[cfg(feature = "prometheus")]
    #[derive(Debug)]
    pub struct InProcessPrometheus {
        handle: PrometheusHandle,
        stop: Arc<AtomicBool>,
        upkeep_thread: Mutex<Option<JoinHandle<()>>>,
    }

    #[cfg(feature = "prometheus")]
    impl InProcessPrometheus {
        /// Installs a global Prometheus recorder (once per process) and starts
        /// an upkeep thread that keeps histograms bounded.
        pub fn install(upkeep_interval: Duration) -> Result<Self, MetricsInitError> {
            describe_all();

            let handle = PrometheusBuilder::new()
                .install_recorder()
                .map_err(MetricsInitError::from_build_error)?;

            let stop = Arc::new(AtomicBool::new(false));
            let stop_clone = stop.clone();
            let handle_clone = handle.clone();
            let upkeep_thread = std::thread::Builder::new()
                .name("varpack-metrics-upkeep".to_string())
                .spawn(move || {
                    while !stop_clone.load(Ordering::Relaxed) {
                        std::thread::sleep(upkeep_interval);
                        handle_clone.run_upkeep();
                    }
                })
                .map_err(|e| MetricsInitError::ThreadSpawn(e.to_string()))?;

            Ok(Self {
                handle,
                stop,
                upkeep_thread: Mutex::new(Some(upkeep_thread)),
            })
        }

        /// Current metrics in the Prometheus text exposition format.
        pub fn render(&self) -> String {
            self.handle.render()
        }
    }

    #[cfg(feature = "prometheus")]
    impl Drop for InProcessPrometheus {
        fn drop(&mut self) {
            self.stop.store(true, Ordering::Relaxed);
            if let Ok(mut guard) = self.upkeep_thread.lock() {
                if let Some(t) = guard.take() {
                    let _ = t.join();
                }
            }
        }
    }

    #[cfg(feature = "prometheus")]
    #[derive(Debug, thiserror::Error)]
    pub enum MetricsInitError {
        #[error("metrics recorder already installed")]
        AlreadyInstalled,
        #[error("failed to install prometheus recorder: {0}")]
        Install(String),
        #[error("failed to spawn upkeep thread: {0}")]
        ThreadSpawn(String),
    }

    #[cfg(feature = "prometheus")]
    impl MetricsInitError {
        fn from_build_error(e: BuildError) -> Self {
            match e {
                BuildError::FailedToSetGlobalRecorder(_) => MetricsInitError::AlreadyInstalled,
                other => MetricsInitError::Install(other.to_string()),
            }
        }
    }

    #[inline]
    pub fn record_encode(kind: AdaptiveKind, values: usize, bytes: usize) {
        ::metrics::counter!(ENCODES, "kind" => kind.name()).increment(1);
        if values > 0 {
            ::metrics::counter!(INPUT_VALUES).increment(values as u64);
            ::metrics::histogram!(COMPRESSION_RATIO, "kind" => kind.name())
                .record((values * 8) as f64 / bytes.max(1) as f64);
        }
        ::metrics::counter!(ENCODED_BYTES).increment(bytes as u64);
        ::metrics::gauge!(LAST_ENCODED_SIZE_BYTES).set(bytes as f64);
    }

    #[inline]
    pub fn record_decode(kind: AdaptiveKind, values: usize) {
        if values > 0 {
            ::metrics::counter!(DECODED_VALUES, "kind" => kind.name()).increment(values as u64);
        }
    }

    #[inline]
    pub fn record_decode_failure() {
        ::metrics::counter!(DECODE_FAILURES).increment(1);
    }

    /// Registers descriptions for every metric. Safe to call repeatedly.
    pub fn describe_all() {
        describe_counter!(
            ENCODES,
            Unit::Count,
            "Adaptive encodes, labelled by the selected kind."
        );
        describe_counter!(
            INPUT_VALUES,
            Unit::Count,
            "Values passed to the adaptive encoder."
        );
        describe_counter!(
            ENCODED_BYTES,
            Unit::Bytes,
            "Bytes produced by the adaptive encoder, tag byte included."
        );
        describe_counter!(
            DECODED_VALUES,
            Unit::Count,
            "Values restored by the adaptive decoder."
        );
        describe_counter!(
            DECODE_FAILURES,
            Unit::Count,
            "Adaptive decodes that returned an error."
        );

        describe_histogram!(
            COMPRESSION_RATIO,
            Unit::Count,
            "Raw size (8 bytes per value) over encoded size."
        );

        describe_gauge!(
            LAST_ENCODED_SIZE_BYTES,
            Unit::Bytes,
            "Size of the most recent adaptive encoding."
        );
    }
}
