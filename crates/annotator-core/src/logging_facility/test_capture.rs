//! In-memory log capture for tests
//!
//! Installs a global registry with a layer that records every event. Each
//! field is kept as text; unsigned integer fields are also kept as `u64` so
//! tests can check generations and mutation sizes without parsing.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use annotator_core_types::schema::{
    FIELD_APPLIED_LEN, FIELD_DURATION_MS, FIELD_ERR_CODE, FIELD_EVENT, FIELD_GENERATION,
    FIELD_OP, FIELD_RECONCILE_ID, FIELD_REMOVED_LEN,
};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

/// One recorded event
#[derive(Clone, Debug, Default)]
pub struct LogEvent {
    pub level: Option<Level>,
    text: BTreeMap<String, String>,
    numbers: BTreeMap<String, u64>,
}

impl LogEvent {
    /// Any field rendered as text (`message` included)
    pub fn field(&self, key: &str) -> Option<&str> {
        self.text.get(key).map(String::as_str)
    }

    /// An unsigned integer field
    pub fn u64_field(&self, key: &str) -> Option<u64> {
        self.numbers.get(key).copied()
    }

    pub fn op(&self) -> Option<&str> {
        self.field(FIELD_OP)
    }

    /// `start`, `end` or `end_error` for op events
    pub fn event(&self) -> Option<&str> {
        self.field(FIELD_EVENT)
    }

    pub fn is(&self, op: &str, event: &str) -> bool {
        self.op() == Some(op) && self.event() == Some(event)
    }

    pub fn reconcile_id(&self) -> Option<&str> {
        self.field(FIELD_RECONCILE_ID)
    }

    pub fn err_code(&self) -> Option<&str> {
        self.field(FIELD_ERR_CODE)
    }

    pub fn generation(&self) -> Option<u64> {
        self.u64_field(FIELD_GENERATION)
    }

    pub fn removed_len(&self) -> Option<u64> {
        self.u64_field(FIELD_REMOVED_LEN)
    }

    pub fn applied_len(&self) -> Option<u64> {
        self.u64_field(FIELD_APPLIED_LEN)
    }

    pub fn duration_ms(&self) -> Option<u64> {
        self.u64_field(FIELD_DURATION_MS)
    }
}

impl Visit for LogEvent {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.text
            .insert(field.name().to_string(), format!("{:?}", value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.text.insert(field.name().to_string(), value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.numbers.insert(field.name().to_string(), value);
        self.text.insert(field.name().to_string(), value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        if let Ok(unsigned) = u64::try_from(value) {
            self.numbers.insert(field.name().to_string(), unsigned);
        }
        self.text.insert(field.name().to_string(), value.to_string());
    }
}

type Events = Arc<Mutex<Vec<LogEvent>>>;

struct CaptureLayer {
    events: Events,
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut recorded = LogEvent {
            level: Some(*event.metadata().level()),
            ..LogEvent::default()
        };
        event.record(&mut recorded);
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(recorded);
    }
}

/// Shared handle on everything recorded since the capture was installed
#[derive(Clone)]
pub struct LogCapture {
    events: Events,
}

impl LogCapture {
    pub fn events(&self) -> Vec<LogEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Events of one operation, in emission order
    pub fn events_for_op(&self, op: &str) -> Vec<LogEvent> {
        self.matching(|e| e.op() == Some(op))
    }

    /// Events of one reconcile pass, in emission order
    pub fn for_reconcile(&self, reconcile_id: &str) -> Vec<LogEvent> {
        self.matching(|e| e.reconcile_id() == Some(reconcile_id))
    }

    /// Events at `level` whose field `key` renders as `value`
    pub fn events_with_field(&self, level: Level, key: &str, value: &str) -> Vec<LogEvent> {
        self.matching(|e| e.level == Some(level) && e.field(key) == Some(value))
    }

    pub fn count_events<F>(&self, predicate: F) -> usize
    where
        F: Fn(&LogEvent) -> bool,
    {
        self.matching(predicate).len()
    }

    fn matching<F>(&self, predicate: F) -> Vec<LogEvent>
    where
        F: Fn(&LogEvent) -> bool,
    {
        self.events().into_iter().filter(|e| predicate(e)).collect()
    }
}

static GLOBAL_CAPTURE: OnceLock<LogCapture> = OnceLock::new();

/// Install the capture subscriber (first call) and return its handle
///
/// The subscriber is process-global and tests share it, so assertions should
/// filter on fields unique to the test.
///
/// ```
/// use annotator_core::logging_facility::test_capture::init_test_capture;
/// use annotator_core::log_op_end;
///
/// let capture = init_test_capture();
/// log_op_end!("doc_capture_op", duration_ms = 3, generation = 7u64);
///
/// let events = capture.events_for_op("doc_capture_op");
/// assert_eq!(events[0].generation(), Some(7));
/// ```
pub fn init_test_capture() -> LogCapture {
    GLOBAL_CAPTURE
        .get_or_init(|| {
            let events = Events::default();
            let layer = CaptureLayer {
                events: events.clone(),
            };
            tracing_subscriber::registry().with(layer).init();
            LogCapture { events }
        })
        .clone()
}
