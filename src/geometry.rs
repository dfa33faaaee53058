//! Measured layout of the plan list.
//!
//! Each rendered date section publishes its vertical span, and the pinned
//! header publishes its height, into a [`SpanRegistry`]. Interested parties
//! implement [`GeometryObserver`] and are notified on [`SpanRegistry::flush`]
//! whenever something changed since the previous flush.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::timeline::PlanWindow;

/// Vertical extent of a date section, in the plan's shared coordinate space
/// (0 is the top edge of the pinned header).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionSpan {
    pub top: f32,
    pub bottom: f32,
}

impl SectionSpan {
    pub fn new(top: f32, bottom: f32) -> Self {
        Self { top, bottom }
    }
}

pub type SpanMap = BTreeMap<NaiveDate, SectionSpan>;

pub trait GeometryObserver {
    fn geometry_changed(&mut self, spans: &SpanMap);

    /// Called when a new header height is measured.
    fn header_measured(&mut self, _height: f32) {}
}

#[derive(Debug, Default)]
pub struct SpanRegistry {
    spans: SpanMap,
    header_height: f32,
    spans_dirty: bool,
    header_dirty: bool,
}

impl SpanRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the span of one section. The latest report for a date wins.
    pub fn report_section(&mut self, date: NaiveDate, span: SectionSpan) {
        if self.spans.insert(date, span) != Some(span) {
            self.spans_dirty = true;
        }
    }

    /// Record a header measurement. Non-positive values are ignored so a
    /// collapsed frame never discards the last real measurement.
    pub fn report_header(&mut self, height: f32) {
        if height > 0.0 && height != self.header_height {
            self.header_height = height;
            self.header_dirty = true;
        }
    }

    pub fn span(&self, date: NaiveDate) -> Option<SectionSpan> {
        self.spans.get(&date).copied()
    }

    pub fn spans(&self) -> &SpanMap {
        &self.spans
    }

    pub fn header_height(&self) -> Option<f32> {
        (self.header_height > 0.0).then_some(self.header_height)
    }

    /// Forget sections that are no longer part of `window`.
    pub fn retain_window(&mut self, window: &PlanWindow) {
        let before = self.spans.len();
        self.spans.retain(|date, _| window.contains(*date));
        if self.spans.len() != before {
            self.spans_dirty = true;
        }
    }

    /// Forget every measurement, e.g. after the catalog was reloaded.
    pub fn clear(&mut self) {
        if !self.spans.is_empty() {
            self.spans.clear();
            self.spans_dirty = true;
        }
    }

    /// Deliver pending changes. The header is delivered first so that the
    /// observer evaluates the spans against the newest selection line.
    ///
    /// Returns `true` when the observer was notified about spans.
    pub fn flush(&mut self, observer: &mut dyn GeometryObserver) -> bool {
        if self.header_dirty {
            self.header_dirty = false;
            observer.header_measured(self.header_height);
        }
        if !self.spans_dirty {
            return false;
        }
        self.spans_dirty = false;
        observer.geometry_changed(&self.spans);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        calls: usize,
        last_len: usize,
        header: Option<f32>,
    }

    impl GeometryObserver for Recorder {
        fn geometry_changed(&mut self, spans: &SpanMap) {
            self.calls += 1;
            self.last_len = spans.len();
        }

        fn header_measured(&mut self, height: f32) {
            self.header = Some(height);
        }
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, day).unwrap()
    }

    #[test]
    fn flush_only_notifies_on_change() {
        let mut registry = SpanRegistry::new();
        let mut rec = Recorder::default();

        registry.report_section(d(27), SectionSpan::new(0.0, 100.0));
        assert!(registry.flush(&mut rec));
        assert_eq!(rec.calls, 1);

        // identical report is not a change
        registry.report_section(d(27), SectionSpan::new(0.0, 100.0));
        assert!(!registry.flush(&mut rec));
        assert_eq!(rec.calls, 1);

        registry.report_section(d(27), SectionSpan::new(-10.0, 90.0));
        registry.report_section(d(28), SectionSpan::new(90.0, 200.0));
        assert!(registry.flush(&mut rec));
        assert_eq!(rec.calls, 2);
        assert_eq!(rec.last_len, 2);
        assert_eq!(registry.span(d(27)), Some(SectionSpan::new(-10.0, 90.0)));
    }

    #[test]
    fn header_keeps_latest_positive_measurement() {
        let mut registry = SpanRegistry::new();
        let mut rec = Recorder::default();
        assert_eq!(registry.header_height(), None);

        registry.report_header(0.0);
        registry.flush(&mut rec);
        assert_eq!(rec.header, None);

        registry.report_header(120.0);
        registry.flush(&mut rec);
        assert_eq!(rec.header, Some(120.0));

        registry.report_header(96.0);
        registry.report_header(-1.0);
        registry.flush(&mut rec);
        assert_eq!(rec.header, Some(96.0));
        assert_eq!(registry.header_height(), Some(96.0));
    }

    #[test]
    fn retain_window_drops_stale_dates() {
        let mut registry = SpanRegistry::new();
        let mut rec = Recorder::default();
        registry.report_section(d(20), SectionSpan::new(0.0, 50.0));
        registry.report_section(d(27), SectionSpan::new(50.0, 100.0));
        registry.flush(&mut rec);

        registry.retain_window(&PlanWindow::new(d(27)));
        assert!(registry.flush(&mut rec));
        assert_eq!(rec.last_len, 1);
        assert!(registry.span(d(20)).is_none());
    }
}
