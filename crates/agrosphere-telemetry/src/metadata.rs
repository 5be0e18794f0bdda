use agrosphere_config::TelemetryConfig;
use opentelemetry::KeyValue;
use opentelemetry_sdk::Resource;
use opentelemetry_semantic_conventions::resource as semconv;

/// OpenTelemetry resource describing this gateway instance
pub fn build_resource(config: &TelemetryConfig) -> Resource {
    let service_name = if config.service_name.is_empty() {
        "agrosphere".to_owned()
    } else {
        config.service_name.clone()
    };

    let attrs = [
        KeyValue::new(semconv::SERVICE_NAME, service_name),
        KeyValue::new(semconv::SERVICE_VERSION, env!("CARGO_PKG_VERSION")),
    ]
    .into_iter()
    .chain(
        config
            .resource_attributes
            .iter()
            .map(|(key, value)| KeyValue::new(key.clone(), value.clone())),
    );

    Resource::builder().with_attributes(attrs).build()
}
