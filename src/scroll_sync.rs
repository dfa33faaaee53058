//! Keeps the week strip selection and the scrolling plan list in agreement.
//!
//! Two producers change the selected date:
//!
//! * a tap on a day of the week strip selects that day immediately and asks
//!   the [`ScrollController`] to bring its section under the header, and
//! * geometry updates from the list select whichever section sits on the
//!   selection line.
//!
//! While a tap-initiated scroll is in flight the second producer is muted,
//! otherwise the intermediate frames of the animation would overwrite the
//! tapped date. Every tap hands out a new [`ScrollTicket`]; settle deadlines
//! and completion signals that belong to an older ticket are ignored, so a
//! quick second tap cannot be unmuted by the first tap's timer.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::geometry::{GeometryObserver, SectionSpan, SpanMap};
use crate::timeline::PlanWindow;

pub const SETTLE_DELAY: Duration = Duration::from_millis(350);
/// Distance below the header at which a section counts as "in view".
pub const HEADER_VISIBILITY_BUFFER: f32 = 32.0;
/// Header height assumed until the first real measurement arrives.
pub const DEFAULT_HEADER_HEIGHT: f32 = 140.0;

/// What ends the muted phase after a tap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SettleMode {
    /// A fixed delay after the latest tap.
    #[default]
    Delay,
    /// The scroll controller reporting that the latest scroll finished.
    AnimationComplete,
}

/// Identifies one programmatic scroll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScrollTicket(u64);

/// Anything able to scroll the plan list to a date section.
///
/// `anchor_y` is the normalized viewport position (0 = top, 1 = bottom) the
/// section's top edge should land on. Calls must not block; completion is
/// reported back through [`VisibleDateSynchronizer::scroll_finished`].
pub trait ScrollController {
    fn scroll_to(&mut self, date: NaiveDate, anchor_y: f32, ticket: ScrollTicket);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyncConfig {
    pub settle_mode: SettleMode,
    pub settle_delay: Duration,
    pub header_buffer: f32,
    pub default_header_height: f32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            settle_mode: SettleMode::Delay,
            settle_delay: SETTLE_DELAY,
            header_buffer: HEADER_VISIBILITY_BUFFER,
            default_header_height: DEFAULT_HEADER_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// Geometry updates drive the selection.
    Idle,
    /// A tap-initiated scroll is running; geometry updates are ignored.
    ProgrammaticScroll {
        ticket: ScrollTicket,
        /// Only set in [`SettleMode::Delay`].
        settle_at: Option<Instant>,
    },
}

#[derive(Debug)]
pub struct VisibleDateSynchronizer {
    selected: NaiveDate,
    state: SyncState,
    next_ticket: u64,
    header_height: Option<f32>,
    config: SyncConfig,
}

impl VisibleDateSynchronizer {
    pub fn new(today: NaiveDate, config: SyncConfig) -> Self {
        Self {
            selected: today,
            state: SyncState::Idle,
            next_ticket: 0,
            header_height: None,
            config,
        }
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.selected
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn is_suppressed(&self) -> bool {
        matches!(self.state, SyncState::ProgrammaticScroll { .. })
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Apply new settings. A scroll in flight keeps the rules it started with.
    pub fn set_config(&mut self, config: SyncConfig) {
        self.config = config;
    }

    /// Select `today` again and drop any in-flight scroll, e.g. after the
    /// plan window moved.
    pub fn reset(&mut self, today: NaiveDate) {
        self.selected = today;
        self.state = SyncState::Idle;
    }

    /// Measured header height, or the default estimate.
    pub fn effective_header_height(&self) -> f32 {
        self.header_height
            .unwrap_or(self.config.default_header_height)
    }

    pub fn selection_line(&self) -> f32 {
        self.effective_header_height() + self.config.header_buffer
    }

    /// Anchor that puts a section's top edge on the selection line.
    pub fn anchor_for(&self, viewport_height: f32) -> f32 {
        anchor_point(self.selection_line(), viewport_height)
    }

    /// Handle a tap on the week strip.
    ///
    /// Dates outside `window` are ignored and leave all state untouched.
    pub fn select_date(
        &mut self,
        date: NaiveDate,
        window: &PlanWindow,
        viewport_height: f32,
        controller: &mut dyn ScrollController,
        now: Instant,
    ) -> Option<ScrollTicket> {
        if !window.contains(date) {
            log::debug!("Ignoring selection of {date}: outside the plan window");
            return None;
        }

        self.next_ticket += 1;
        let ticket = ScrollTicket(self.next_ticket);
        let settle_at = match self.config.settle_mode {
            SettleMode::Delay => Some(now + self.config.settle_delay),
            SettleMode::AnimationComplete => None,
        };
        self.state = SyncState::ProgrammaticScroll { ticket, settle_at };
        self.selected = date;
        log::debug!("Selected {date} from week strip");

        controller.scroll_to(date, self.anchor_for(viewport_height), ticket);
        Some(ticket)
    }

    /// Advance time. Returns `true` when the muted phase ended.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.state {
            SyncState::ProgrammaticScroll {
                settle_at: Some(at),
                ..
            } if now >= at => {
                self.state = SyncState::Idle;
                true
            }
            _ => false,
        }
    }

    /// Completion signal from the scroll controller. Only honoured in
    /// [`SettleMode::AnimationComplete`] and only for the latest ticket.
    pub fn scroll_finished(&mut self, finished: ScrollTicket) -> bool {
        match self.state {
            SyncState::ProgrammaticScroll {
                ticket,
                settle_at: None,
            } if ticket == finished => {
                self.state = SyncState::Idle;
                true
            }
            _ => false,
        }
    }

    /// Time left until the settle deadline, if one is pending.
    pub fn time_until_settle(&self, now: Instant) -> Option<Duration> {
        match self.state {
            SyncState::ProgrammaticScroll {
                settle_at: Some(at),
                ..
            } => Some(at.saturating_duration_since(now)),
            _ => None,
        }
    }
}

impl GeometryObserver for VisibleDateSynchronizer {
    fn geometry_changed(&mut self, spans: &SpanMap) {
        if self.is_suppressed() {
            return;
        }
        let Some(date) = top_visible_date(spans, self.selection_line()) else {
            return;
        };
        if date != self.selected {
            log::debug!("Scrolled to {date}");
            self.selected = date;
        }
    }

    fn header_measured(&mut self, height: f32) {
        if height > 0.0 {
            self.header_height = Some(height);
        }
    }
}

/// Pick the date considered visible for a given selection line.
///
/// Sections are ordered by their top edge (ties keep date order). The first
/// section straddling the line wins; failing that the first one below the
/// line; failing that the last one.
pub fn top_visible_date(spans: &SpanMap, selection_line: f32) -> Option<NaiveDate> {
    let mut sorted: Vec<(NaiveDate, SectionSpan)> =
        spans.iter().map(|(date, span)| (*date, *span)).collect();
    sorted.sort_by(|a, b| a.1.top.total_cmp(&b.1.top));

    sorted
        .iter()
        .find(|(_, s)| s.top <= selection_line && s.bottom > selection_line)
        .or_else(|| sorted.iter().find(|(_, s)| s.top > selection_line))
        .or_else(|| sorted.last())
        .map(|(date, _)| *date)
}

/// Normalized anchor for a programmatic scroll, clamped to `[0, 1]`.
/// A zero viewport height is treated as 1.
pub fn anchor_point(selection_line: f32, viewport_height: f32) -> f32 {
    (selection_line / viewport_height.max(1.0)).clamp(0.0, 1.0)
}
