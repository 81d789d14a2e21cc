use super::Hook;
use crate::domain::{DeliveryError, FieldValue, Fields, LogEvent, Severity};
use crate::sender::runtime::{DeliveryGuard, is_delivering};
use std::fmt;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

/// Receives delivery errors raised while handling `tracing` events.
pub type ErrorSink = Box<dyn Fn(&DeliveryError) + Send + Sync>;

/// `tracing` layer that hands qualifying events to a [`Hook`].
///
/// An event's level comes from its `tracing` level unless it carries a
/// `severity` field naming one (e.g. `severity = "fatal"`). Delivery runs
/// inline on the emitting thread.
pub struct HookLayer<H> {
    hook: H,
    on_error: ErrorSink,
}

impl<H: Hook> HookLayer<H> {
    pub fn new(hook: H) -> Self {
        Self {
            hook,
            on_error: Box::new(|err| eprintln!("logbeat: failed to deliver event: {err}")),
        }
    }

    pub fn with_error_sink<F>(mut self, sink: F) -> Self
    where
        F: Fn(&DeliveryError) + Send + Sync + 'static,
    {
        self.on_error = Box::new(sink);
        self
    }
}

impl<S, H> Layer<S> for HookLayer<H>
where
    S: Subscriber,
    H: Hook + 'static,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        // Events emitted by the transport while delivering are not reported.
        if is_delivering() {
            return;
        }

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let level = visitor
            .severity
            .unwrap_or_else(|| Severity::from(*event.metadata().level()));
        if !self.hook.interested_levels().contains(&level) {
            return;
        }

        let log_event = LogEvent::new(level, visitor.message.unwrap_or_default())
            .with_fields(visitor.fields);

        let _guard = DeliveryGuard::enter();
        if let Err(err) = self.hook.handle(&log_event) {
            (self.on_error)(&err);
        }
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: Option<String>,
    severity: Option<Severity>,
    fields: Fields,
}

impl FieldVisitor {
    fn record_value(&mut self, field: &Field, value: FieldValue) {
        match field.name() {
            "message" => self.message = Some(value.to_string()),
            "severity" => match value.as_str().and_then(|name| name.parse().ok()) {
                Some(severity) => self.severity = Some(severity),
                None => {
                    self.fields.insert("severity".to_string(), value);
                }
            },
            name => {
                self.fields.insert(name.to_string(), value);
            }
        }
    }
}

impl Visit for FieldVisitor {
    fn record_f64(&mut self, field: &Field, value: f64) {
        self.record_value(field, FieldValue::Float(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_value(field, FieldValue::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.record_value(field, FieldValue::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.record_value(field, FieldValue::from(value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.record_value(field, FieldValue::from(value));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.record_value(field, FieldValue::from(value.to_string()));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.record_value(field, FieldValue::from(format!("{value:?}")));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hook::{LogbeatHook, MockHook};
    use parking_lot::Mutex;
    use serde_json::json;
    use std::sync::Arc;
    use tracing_subscriber::prelude::*;

    fn mock_hook() -> MockHook {
        let mut hook = MockHook::new();
        hook.expect_interested_levels()
            .return_const(LogbeatHook::LEVELS);
        hook
    }

    fn with_layer<F: FnOnce()>(layer: HookLayer<MockHook>, f: F) {
        let subscriber = tracing_subscriber::registry().with(layer);
        tracing::subscriber::with_default(subscriber, f);
    }

    #[test]
    fn test_error_event_is_handled_with_typed_fields() {
        let mut hook = mock_hook();
        hook.expect_handle()
            .withf(|event| {
                event.level == Severity::Error
                    && event.message == "payment failed"
                    && event.fields["user"] == json!("alice")
                    && event.fields["attempts"] == json!(3)
                    && event.fields["retryable"] == json!(false)
            })
            .times(1)
            .returning(|_| Ok(()));

        with_layer(HookLayer::new(hook), || {
            tracing::error!(user = "alice", attempts = 3, retryable = false, "payment failed");
        });
    }

    #[test]
    fn test_lower_levels_are_ignored() {
        let mut hook = mock_hook();
        hook.expect_handle().times(0);

        with_layer(HookLayer::new(hook), || {
            tracing::warn!("disk almost full");
            tracing::info!("started");
            tracing::debug!(n = 1, "tick");
        });
    }

    #[test]
    fn test_severity_field_overrides_level() {
        let mut hook = mock_hook();
        hook.expect_handle()
            .withf(|event| {
                event.level == Severity::Panic
                    && event.message == "invariant broken"
                    && !event.fields.contains_key("severity")
            })
            .times(1)
            .returning(|_| Ok(()));

        with_layer(HookLayer::new(hook), || {
            tracing::error!(severity = "panic", "invariant broken");
        });
    }

    #[test]
    fn test_unknown_severity_field_is_kept_as_extra() {
        let mut hook = mock_hook();
        hook.expect_handle()
            .withf(|event| {
                event.level == Severity::Error && event.fields["severity"] == json!("sev1")
            })
            .times(1)
            .returning(|_| Ok(()));

        with_layer(HookLayer::new(hook), || {
            tracing::error!(severity = "sev1", "paged");
        });
    }

    #[test]
    fn test_float_fields_are_kept_unconverted() {
        let mut hook = mock_hook();
        hook.expect_handle()
            .withf(|event| {
                event.fields["ratio"] == json!(0.25)
                    && matches!(event.fields["score"], FieldValue::Float(v) if v.is_nan())
            })
            .times(1)
            .returning(|_| Ok(()));

        with_layer(HookLayer::new(hook), || {
            tracing::error!(ratio = 0.25, score = f64::NAN, "scoring failed");
        });
    }

    #[test]
    fn test_delivery_errors_go_to_sink() {
        let mut hook = mock_hook();
        hook.expect_handle()
            .times(1)
            .returning(|_| Err(DeliveryError::RequestConstruction("bad url".to_string())));

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let layer = HookLayer::new(hook).with_error_sink(move |err| sink.lock().push(err.to_string()));

        with_layer(layer, || {
            tracing::error!("boom");
        });

        assert_eq!(
            *seen.lock(),
            vec!["Request construction error: bad url".to_string()]
        );
    }

    #[test]
    fn test_events_raised_during_delivery_are_not_reported() {
        let mut hook = mock_hook();
        hook.expect_handle().times(1).returning(|_| {
            tracing::error!("emitted by the transport");
            Ok(())
        });

        with_layer(HookLayer::new(hook), || {
            tracing::error!("original");
        });
    }
}
