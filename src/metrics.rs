use axum::routing::get;
use axum_prometheus::PrometheusMetricLayer;
use once_cell::sync::Lazy;
use prometheus::{Encoder, Opts, TextEncoder};

/// Register additional metrics of our own structs by using this registry instance.
static REGISTRY: Lazy<Registry> = Lazy::new(|| Registry(prometheus::Registry::new()));

pub static SCHEDULED_COUNTER: Lazy<Counter> = Lazy::new(|| {
    Counter::new("announcements_scheduled", Opts::new("announcements_scheduled_total", "count of announcements accepted for delayed delivery"))
});
pub static SENT_COUNTER: Lazy<Counter> = Lazy::new(|| {
    Counter::new("announcements_sent", Opts::new("announcements_sent_total", "count of announcements delivered to the whole roster"))
});
pub static RECIPIENT_COUNTER: Lazy<Counter> = Lazy::new(|| {
    Counter::new("recipient_deliveries", Opts::new("recipient_deliveries_total", "count of per-recipient sends"))
});

pub fn init() -> axum::Router {
    let prometheus = REGISTRY
        .register(&SCHEDULED_COUNTER)
        .register(&SENT_COUNTER)
        .register(&RECIPIENT_COUNTER)
        .unwrap();

    let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();
    axum::Router::new()
        .route("/metrics", get(|| async move {
            let mut buffer = vec![];
            let metrics = prometheus.gather();
            TextEncoder::new().encode(&metrics, &mut buffer).unwrap();
            let custom_metrics = String::from_utf8(buffer).unwrap();

            metric_handle.render() + custom_metrics.as_str()
        }))
        .layer(prometheus_layer)
}

pub struct Counter {
    inner: prometheus::Counter,
    name: String
}
struct Registry(prometheus::Registry);

impl Counter {
    fn new(name: &str, opts: Opts) -> Counter {
        let c = prometheus::Counter::with_opts(opts)
            .unwrap_or_else(|e| panic!("unable to create {name} counter: {e}"));
        Counter { inner: c, name: name.to_string() }
    }

    pub fn inc(&self) {
        self.inner.inc()
    }
}

impl Registry {
    fn register(&self, counter: &Counter) -> &Self {
        self.0.register(Box::new(counter.inner.clone()))
            .unwrap_or_else(|e| panic!("unable to register the {} counter: {e}", counter.name));
        self
    }

    fn unwrap(&self) -> prometheus::Registry {
        self.0.clone()
    }
}
