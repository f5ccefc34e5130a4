//! Cache hit/miss counters (exported only with the `otel` feature).

#[cfg(feature = "otel")]
use std::sync::LazyLock;

#[cfg(feature = "otel")]
use opentelemetry::KeyValue;
#[cfg(feature = "otel")]
use opentelemetry::metrics::Counter;

#[cfg(feature = "otel")]
static CACHE_LOOKUPS: LazyLock<Counter<u64>> = LazyLock::new(|| {
    opentelemetry::global::meter("cinescope-api")
        .u64_counter("cinescope.cache.lookups")
        .with_description("TMDB response cache lookups by result")
        .build()
});

/// Records one cache lookup.
#[cfg(feature = "otel")]
pub(crate) fn record_cache_lookup(hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    CACHE_LOOKUPS.add(1, &[KeyValue::new("result", result)]);
}

/// Records one cache lookup.
#[cfg(not(feature = "otel"))]
pub(crate) const fn record_cache_lookup(_hit: bool) {}
