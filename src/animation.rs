// Animated scrolling of the plan list
use chrono::NaiveDate;
use std::time::{Duration, Instant};

use crate::geometry::{SectionSpan, SpanRegistry};
use crate::scroll_sync::{ScrollController, ScrollTicket};

pub const DEFAULT_SCROLL_DURATION: Duration = Duration::from_millis(300);

/// Scroll state of the plan list as measured in the previous frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollViewport {
    pub offset: f32,
    pub max_offset: f32,
    /// Height of the whole plan area, header included.
    pub container_height: f32,
}

#[derive(Debug, Clone, Copy)]
struct ScrollRequest {
    date: NaiveDate,
    anchor_y: f32,
    ticket: ScrollTicket,
}

#[derive(Debug, Clone, Copy)]
struct Animation {
    from: f32,
    to: f32,
    started: Instant,
    ticket: ScrollTicket,
}

/// [`ScrollController`] for an egui scroll area.
///
/// Requests are resolved on the next frame against the measured section
/// spans, then the offset is eased towards the target. Finished (or
/// unresolvable) requests are reported through [`ScrollAnimator::take_finished`].
#[derive(Debug)]
pub struct ScrollAnimator {
    duration: Duration,
    pending: Option<ScrollRequest>,
    active: Option<Animation>,
    finished: Vec<ScrollTicket>,
}

impl Default for ScrollAnimator {
    fn default() -> Self {
        Self::new(DEFAULT_SCROLL_DURATION)
    }
}

impl ScrollController for ScrollAnimator {
    fn scroll_to(&mut self, date: NaiveDate, anchor_y: f32, ticket: ScrollTicket) {
        self.pending = Some(ScrollRequest {
            date,
            anchor_y,
            ticket,
        });
    }
}

impl ScrollAnimator {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            pending: None,
            active: None,
            finished: Vec::new(),
        }
    }

    pub fn set_duration(&mut self, duration: Duration) {
        self.duration = duration;
    }

    pub fn is_animating(&self) -> bool {
        self.pending.is_some() || self.active.is_some()
    }

    /// Drop any pending or running scroll without reporting it.
    pub fn cancel(&mut self) {
        self.pending = None;
        self.active = None;
        self.finished.clear();
    }

    /// Offset the scroll area should be forced to this frame, if a scroll is
    /// in progress.
    pub fn offset_for_frame(
        &mut self,
        registry: &SpanRegistry,
        viewport: &ScrollViewport,
        now: Instant,
    ) -> Option<f32> {
        if let Some(request) = self.pending.take() {
            match registry.span(request.date) {
                Some(span) => {
                    self.active = Some(Animation {
                        from: viewport.offset,
                        to: target_offset(viewport, span, request.anchor_y),
                        started: now,
                        ticket: request.ticket,
                    });
                }
                None => {
                    log::warn!("No layout for {} yet, skipping scroll", request.date);
                    self.finished.push(request.ticket);
                }
            }
        }

        let animation = self.active?;
        let progress = if self.duration.is_zero() {
            1.0
        } else {
            now.saturating_duration_since(animation.started).as_secs_f32()
                / self.duration.as_secs_f32()
        };
        let offset = animation.from + (animation.to - animation.from) * ease_in_out(progress);
        if progress >= 1.0 {
            self.active = None;
            self.finished.push(animation.ticket);
        }
        Some(offset)
    }

    /// Tickets of scrolls that completed since the last call.
    pub fn take_finished(&mut self) -> Vec<ScrollTicket> {
        std::mem::take(&mut self.finished)
    }
}

/// Scroll offset that puts `span.top` at `anchor_y` of the container.
pub fn target_offset(viewport: &ScrollViewport, span: SectionSpan, anchor_y: f32) -> f32 {
    let wanted = viewport.offset + span.top - anchor_y * viewport.container_height;
    wanted.clamp(0.0, viewport.max_offset.max(0.0))
}

/// Quadratic ease-in-out on `[0, 1]`.
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scroll_sync::{SyncConfig, VisibleDateSynchronizer};
    use crate::timeline::PlanWindow;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, day).unwrap()
    }

    fn viewport() -> ScrollViewport {
        ScrollViewport {
            offset: 0.0,
            max_offset: 2000.0,
            container_height: 800.0,
        }
    }

    #[test]
    fn easing_endpoints_and_midpoint() {
        assert_eq!(ease_in_out(0.0), 0.0);
        assert_eq!(ease_in_out(1.0), 1.0);
        assert!((ease_in_out(0.5) - 0.5).abs() < 1e-6);
        assert_eq!(ease_in_out(2.0), 1.0);
        assert!(ease_in_out(0.25) < 0.25);
    }

    #[test]
    fn target_lands_section_on_anchor() {
        // section 900 below the container top, anchor at 160px of 800
        let target = target_offset(&viewport(), SectionSpan::new(900.0, 1200.0), 0.2);
        assert!((target - 740.0).abs() < 1e-3);

        let clamped = target_offset(&viewport(), SectionSpan::new(100.0, 200.0), 0.2);
        assert_eq!(clamped, 0.0);

        let short = ScrollViewport {
            max_offset: 300.0,
            ..viewport()
        };
        assert_eq!(target_offset(&short, SectionSpan::new(900.0, 1200.0), 0.2), 300.0);
    }

    #[test]
    fn animation_reaches_target_and_reports_ticket() {
        let mut registry = SpanRegistry::new();
        registry.report_section(d(30), SectionSpan::new(900.0, 1200.0));

        let mut sync = VisibleDateSynchronizer::new(d(27), SyncConfig::default());
        let mut animator = ScrollAnimator::new(Duration::from_millis(300));
        let t0 = Instant::now();
        let ticket = sync
            .select_date(d(30), &PlanWindow::new(d(27)), 800.0, &mut animator, t0)
            .unwrap();
        assert!(animator.is_animating());

        let start = animator.offset_for_frame(&registry, &viewport(), t0).unwrap();
        assert_eq!(start, 0.0);
        assert!(animator.take_finished().is_empty());

        let mid = animator
            .offset_for_frame(&registry, &viewport(), t0 + Duration::from_millis(150))
            .unwrap();
        assert!(mid > 0.0);

        let end = animator
            .offset_for_frame(&registry, &viewport(), t0 + Duration::from_millis(300))
            .unwrap();
        let expected = target_offset(&viewport(), SectionSpan::new(900.0, 1200.0), sync.anchor_for(800.0));
        assert!((end - expected).abs() < 1e-3);
        assert_eq!(animator.take_finished(), vec![ticket]);
        assert!(!animator.is_animating());
        assert!(animator.offset_for_frame(&registry, &viewport(), t0).is_none());
    }

    #[test]
    fn unmeasured_target_is_reported_finished() {
        let registry = SpanRegistry::new();
        let mut sync = VisibleDateSynchronizer::new(d(27), SyncConfig::default());
        let mut animator = ScrollAnimator::default();
        let ticket = sync
            .select_date(d(28), &PlanWindow::new(d(27)), 800.0, &mut animator, Instant::now())
            .unwrap();

        assert!(animator.offset_for_frame(&registry, &viewport(), Instant::now()).is_none());
        assert_eq!(animator.take_finished(), vec![ticket]);
    }

    #[test]
    fn newer_request_replaces_pending_one() {
        let mut registry = SpanRegistry::new();
        registry.report_section(d(28), SectionSpan::new(400.0, 600.0));
        registry.report_section(d(29), SectionSpan::new(600.0, 800.0));
        let mut sync = VisibleDateSynchronizer::new(d(27), SyncConfig::default());
        let mut animator = ScrollAnimator::new(Duration::ZERO);
        let window = PlanWindow::new(d(27));
        let t0 = Instant::now();

        sync.select_date(d(28), &window, 800.0, &mut animator, t0);
        let last = sync.select_date(d(29), &window, 800.0, &mut animator, t0).unwrap();

        let offset = animator.offset_for_frame(&registry, &viewport(), t0).unwrap();
        let expected = target_offset(&viewport(), SectionSpan::new(600.0, 800.0), sync.anchor_for(800.0));
        assert!((offset - expected).abs() < 1e-3);
        assert_eq!(animator.take_finished(), vec![last]);
    }
}
