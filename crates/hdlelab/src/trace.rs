//! Tracing infrastructure for debugging scope elaboration.
//!
//! # Design: zero-cost abstraction
//!
//! When `NoopTracer` is used, every trait method is `#[inline(always)]` and
//! empty, so the compiler can eliminate the call (and the arguments, once
//! those are themselves cheap) entirely. This replaces the original
//! elaborator's `debug_scopes`/`debug_elaborate` globals: the engine calls
//! a `Tracer` instead of guarding `cerr <<` with a flag.

/// Sink for scope-elaboration trace events.
///
/// Implementations decide what to do with each event; `NoopTracer` drops
/// them, `CollectingTracer` records a human-readable line per event.
pub trait Tracer {
    #[inline(always)]
    fn scope_entered(&mut self, _path: &str) {}

    #[inline(always)]
    fn parameter_replaced(&mut self, _path: &str, _name: &str) {}

    #[inline(always)]
    fn generate_iteration(&mut self, _label: &str, _value: i64) {}

    #[inline(always)]
    fn generate_condition(&mut self, _label: &str, _taken: bool) {}

    #[inline(always)]
    fn instance_created(&mut self, _path: &str, _parent: &str) {}
}

/// Tracer that discards every event. Use in production.
#[derive(Default, Clone, Copy)]
pub struct NoopTracer;

impl Tracer for NoopTracer {}

/// Tracer that records each event as a formatted line, for tests and
/// interactive debugging.
#[derive(Default, Debug, Clone)]
pub struct CollectingTracer {
    lines: Vec<String>,
}

impl CollectingTracer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl Tracer for CollectingTracer {
    fn scope_entered(&mut self, path: &str) {
        self.lines.push(format!("debug: elaborate scope {path}."));
    }

    fn parameter_replaced(&mut self, path: &str, name: &str) {
        self.lines
            .push(format!("debug: replace {path}.{name} from override"));
    }

    fn generate_iteration(&mut self, label: &str, value: i64) {
        self.lines
            .push(format!("debug: create generated scope {label}[{value}]"));
    }

    fn generate_condition(&mut self, label: &str, taken: bool) {
        self.lines.push(format!(
            "debug: generate condition {label}: {}",
            if taken { "generate" } else { "skip" }
        ));
    }

    fn instance_created(&mut self, path: &str, parent: &str) {
        self.lines
            .push(format!("debug: module instance {path} becomes child of {parent}"));
    }
}
