#![forbid(unsafe_code)]

//! In-memory tracing capture for asserting on spans and events.
//!
//! ```
//! use modal_harness::capture_tracing;
//!
//! let capture = capture_tracing(|| {
//!     tracing::debug!(id = 7u64, "modal opened");
//! });
//! assert!(capture.has_event("modal opened"));
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

/// One captured span.
#[derive(Debug, Clone)]
pub struct CapturedSpan {
    /// Span name.
    pub name: String,
    /// Fields recorded at creation or later via `record`. Declared but
    /// unrecorded fields are present with an empty value.
    pub fields: HashMap<String, String>,
}

/// One captured event.
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    /// Event level.
    pub level: Level,
    /// Event target (module path).
    pub target: String,
    /// Rendered `message` field.
    pub message: String,
    /// All other fields.
    pub fields: HashMap<String, String>,
}

impl CapturedEvent {
    /// Field value by name.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

#[derive(Default)]
struct Store {
    spans: Vec<(u64, CapturedSpan)>,
    events: Vec<CapturedEvent>,
}

/// Results of a [`capture_tracing`] run.
#[derive(Clone, Default)]
pub struct TracingCapture {
    store: Arc<Mutex<Store>>,
}

impl std::fmt::Debug for TracingCapture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let store = self.lock();
        f.debug_struct("TracingCapture")
            .field("spans", &store.spans.len())
            .field("events", &store.events.len())
            .finish()
    }
}

impl TracingCapture {
    fn lock(&self) -> std::sync::MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Every captured span, in creation order.
    pub fn spans(&self) -> Vec<CapturedSpan> {
        self.lock().spans.iter().map(|(_, s)| s.clone()).collect()
    }

    /// Captured spans with the given name.
    pub fn spans_named(&self, name: &str) -> Vec<CapturedSpan> {
        self.lock()
            .spans
            .iter()
            .filter(|(_, s)| s.name == name)
            .map(|(_, s)| s.clone())
            .collect()
    }

    /// Every captured event, in emission order.
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.lock().events.clone()
    }

    /// Captured events whose message equals `message`.
    pub fn events_with_message(&self, message: &str) -> Vec<CapturedEvent> {
        self.lock()
            .events
            .iter()
            .filter(|e| e.message == message)
            .cloned()
            .collect()
    }

    /// Whether any event carried `message`.
    pub fn has_event(&self, message: &str) -> bool {
        self.lock().events.iter().any(|e| e.message == message)
    }

    /// Captured events at exactly `level`.
    pub fn events_at(&self, level: Level) -> Vec<CapturedEvent> {
        self.lock()
            .events
            .iter()
            .filter(|e| e.level == level)
            .cloned()
            .collect()
    }
}

struct FieldVisitor {
    message: Option<String>,
    fields: Vec<(String, String)>,
}

impl FieldVisitor {
    fn new() -> Self {
        Self {
            message: None,
            fields: Vec::new(),
        }
    }

    fn push(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            self.message = Some(value);
        } else {
            self.fields.push((field.name().to_string(), value));
        }
    }
}

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.push(field, format!("{value:?}"));
    }
    fn record_u64(&mut self, field: &Field, value: u64) {
        self.push(field, value.to_string());
    }
    fn record_i64(&mut self, field: &Field, value: i64) {
        self.push(field, value.to_string());
    }
    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, value.to_string());
    }
    fn record_bool(&mut self, field: &Field, value: bool) {
        self.push(field, value.to_string());
    }
}

struct CaptureLayer {
    store: Arc<Mutex<Store>>,
}

impl<S> Layer<S> for CaptureLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, _ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor::new();
        attrs.record(&mut visitor);
        let mut fields: HashMap<String, String> = visitor.fields.into_iter().collect();
        for field in attrs.metadata().fields() {
            fields.entry(field.name().to_string()).or_default();
        }
        let span = CapturedSpan {
            name: attrs.metadata().name().to_string(),
            fields,
        };
        self.store
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .spans
            .push((id.into_u64(), span));
    }

    fn on_record(&self, id: &Id, values: &Record<'_>, _ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor::new();
        values.record(&mut visitor);
        let mut store = self.store.lock().unwrap_or_else(PoisonError::into_inner);
        // Span ids are reused after close; the latest span with the id is live.
        if let Some((_, span)) = store
            .spans
            .iter_mut()
            .rev()
            .find(|(span_id, _)| *span_id == id.into_u64())
        {
            span.fields.extend(visitor.fields);
        }
    }

    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor::new();
        event.record(&mut visitor);
        let captured = CapturedEvent {
            level: *event.metadata().level(),
            target: event.metadata().target().to_string(),
            message: visitor.message.unwrap_or_default(),
            fields: visitor.fields.into_iter().collect(),
        };
        self.store
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .events
            .push(captured);
    }
}

/// Run `f` with a capturing subscriber installed as the thread default.
pub fn capture_tracing<F>(f: F) -> TracingCapture
where
    F: FnOnce(),
{
    let capture = TracingCapture::default();
    let layer = CaptureLayer {
        store: Arc::clone(&capture.store),
    };
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, f);
    capture
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_event_fields() {
        let capture = capture_tracing(|| {
            tracing::debug!(id = 3u64, key = "dialog", admitted = true, "modal open requested");
        });
        let events = capture.events_with_message("modal open requested");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].level, Level::DEBUG);
        assert_eq!(events[0].field("id"), Some("3"));
        assert_eq!(events[0].field("key"), Some("dialog"));
        assert_eq!(events[0].field("admitted"), Some("true"));
    }

    #[test]
    fn captures_recorded_span_fields() {
        let capture = capture_tracing(|| {
            let span = tracing::trace_span!("work", n = 1u64, late = tracing::field::Empty);
            span.record("late", 5u64);
        });
        let spans = capture.spans_named("work");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].fields.get("n").map(String::as_str), Some("1"));
        assert_eq!(spans[0].fields.get("late").map(String::as_str), Some("5"));
    }

    #[test]
    fn filters_by_level() {
        let capture = capture_tracing(|| {
            tracing::warn!("careful");
            tracing::debug!("detail");
        });
        assert_eq!(capture.events_at(Level::WARN).len(), 1);
        assert!(capture.has_event("detail"));
        assert!(!capture.has_event("absent"));
    }
}
