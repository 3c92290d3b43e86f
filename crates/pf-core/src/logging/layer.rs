//! Custom tracing layer for JSONL output.
//!
//! Produces machine-parseable JSONL logs on stderr while keeping stdout
//! clean for command payloads. Correlation fields (`run_id`, `host_id`,
//! `stage`) recorded on enclosing spans are lifted to the top level of
//! every event.

use std::io::{self, Write};
use std::sync::Mutex;

use chrono::Utc;
use serde_json::{json, Map, Value};
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

use super::events::Level;

/// Correlation fields stored on each span.
#[derive(Debug, Clone, Default)]
struct SpanContext {
    run_id: Option<String>,
    host_id: Option<String>,
    stage: Option<String>,
}

impl SpanContext {
    fn fill_from(&mut self, other: &SpanContext) {
        if self.run_id.is_none() {
            self.run_id.clone_from(&other.run_id);
        }
        if self.host_id.is_none() {
            self.host_id.clone_from(&other.host_id);
        }
        if self.stage.is_none() {
            self.stage.clone_from(&other.stage);
        }
    }
}

impl Visit for SpanContext {
    fn record_str(&mut self, field: &Field, value: &str) {
        let slot = match field.name() {
            "run_id" => &mut self.run_id,
            "host_id" => &mut self.host_id,
            "stage" => &mut self.stage,
            _ => return,
        };
        *slot = Some(value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.record_str(field, &format!("{:?}", value));
    }
}

/// Extracts event fields; correlation keys are routed into a [`SpanContext`].
#[derive(Default)]
struct JsonFieldVisitor {
    fields: Map<String, Value>,
    message: Option<String>,
    context: SpanContext,
}

impl JsonFieldVisitor {
    fn insert(&mut self, field: &Field, value: Value) {
        self.fields.insert(field.name().to_string(), value);
    }
}

impl Visit for JsonFieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => self.message = Some(value.to_string()),
            "run_id" | "host_id" | "stage" => self.context.record_str(field, value),
            _ => self.insert(field, Value::String(value.to_string())),
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        // `%value` arrives here too, as a Display wrapper whose Debug output
        // is the Display text.
        self.record_str(field, &format!("{:?}", value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, Value::Number(value.into()));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, Value::Number(value.into()));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        if let Some(n) = serde_json::Number::from_f64(value) {
            self.insert(field, Value::Number(n));
        }
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, Value::Bool(value));
    }
}

/// JSONL tracing layer, stderr by default.
pub struct JsonlLayer<W = io::Stderr> {
    writer: Mutex<W>,
}

impl JsonlLayer<io::Stderr> {
    pub fn stderr() -> Self {
        JsonlLayer {
            writer: Mutex::new(io::stderr()),
        }
    }
}

impl<W: Write> JsonlLayer<W> {
    /// Create a JSONL layer with a custom writer.
    pub fn new(writer: W) -> Self {
        JsonlLayer {
            writer: Mutex::new(writer),
        }
    }
}

impl<S, W> Layer<S> for JsonlLayer<W>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: Write + 'static,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let mut context = SpanContext::default();
        attrs.record(&mut context);
        if let Some(span) = ctx.span(id) {
            span.extensions_mut().insert(context);
        }
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let ts = Utc::now();

        let mut visitor = JsonFieldVisitor::default();
        event.record(&mut visitor);

        // Fields on the event win over the innermost span, which wins over outer spans.
        let mut context = std::mem::take(&mut visitor.context);
        if let Some(scope) = ctx.event_scope(event) {
            for span in scope {
                if let Some(span_ctx) = span.extensions().get::<SpanContext>() {
                    context.fill_from(span_ctx);
                }
            }
        }

        let level: Level = (*event.metadata().level()).into();
        let mut obj = Map::new();
        obj.insert("ts".to_string(), json!(ts.to_rfc3339()));
        obj.insert("level".to_string(), json!(level));
        obj.insert("event".to_string(), json!(event.metadata().target()));
        if let Some(id) = context.run_id {
            obj.insert("run_id".to_string(), json!(id));
        }
        if let Some(id) = context.host_id {
            obj.insert("host_id".to_string(), json!(id));
        }
        if let Some(stage) = context.stage {
            obj.insert("stage".to_string(), json!(stage));
        }
        if let Some(msg) = visitor.message {
            obj.insert("message".to_string(), json!(msg));
        }
        if !visitor.fields.is_empty() {
            obj.insert("fields".to_string(), Value::Object(visitor.fields));
        }

        let line = Value::Object(obj).to_string();
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tracing_subscriber::layer::SubscriberExt;

    struct BufWriter(Arc<Mutex<Vec<u8>>>);

    impl Write for BufWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture(f: impl FnOnce()) -> Vec<Value> {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let layer = JsonlLayer::new(BufWriter(buffer.clone()));
        let subscriber = tracing_subscriber::registry().with(layer);
        tracing::subscriber::with_default(subscriber, f);

        let output = buffer.lock().unwrap();
        String::from_utf8_lossy(&output)
            .lines()
            .map(|l| serde_json::from_str(l).expect("each line is valid JSON"))
            .collect()
    }

    #[test]
    fn event_has_core_fields() {
        let lines = capture(|| {
            tracing::info!(target: "test.event", message = "test message");
        });
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["level"], "info");
        assert_eq!(lines[0]["event"], "test.event");
        assert_eq!(lines[0]["message"], "test message");
        assert!(lines[0]["ts"].is_string());
    }

    #[test]
    fn extra_fields_are_typed() {
        let lines = capture(|| {
            tracing::warn!(target: "test.fields", paths = 42u64, ratio = 0.5, ok = true, asset = "SPX", "hi");
        });
        assert_eq!(lines[0]["level"], "warn");
        assert_eq!(lines[0]["fields"]["paths"], 42);
        assert_eq!(lines[0]["fields"]["ratio"], 0.5);
        assert_eq!(lines[0]["fields"]["ok"], true);
        assert_eq!(lines[0]["fields"]["asset"], "SPX");
        assert_eq!(lines[0]["message"], "hi");
    }

    #[test]
    fn span_context_is_lifted() {
        let lines = capture(|| {
            let span = tracing::info_span!("run", run_id = "run-1", host_id = "host-1", stage = "init");
            let _guard = span.enter();
            let inner = tracing::info_span!("step", stage = "aggregate");
            let _inner = inner.enter();
            tracing::error!(target: "test.span", "inside");
        });
        assert_eq!(lines[0]["run_id"], "run-1");
        assert_eq!(lines[0]["host_id"], "host-1");
        assert_eq!(lines[0]["stage"], "aggregate");
        assert_eq!(lines[0]["level"], "error");
    }

    #[test]
    fn event_correlation_fields_win() {
        let lines = capture(|| {
            let span = tracing::info_span!("run", run_id = "run-span");
            let _guard = span.enter();
            tracing::info!(target: "test.override", run_id = %"run-event", stage = %"render", "x");
        });
        assert_eq!(lines[0]["run_id"], "run-event");
        assert_eq!(lines[0]["stage"], "render");
        assert!(lines[0].get("fields").is_none());
    }
}
