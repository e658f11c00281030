//! Narration state machine.
//!
//! The page reads shlokas aloud either one at a time (Read, Next, Random) or
//! as a sequential walk (Start / Resume) that advances every dwell interval.
//! [`Player`] models that behavior as an explicit state object: every event
//! handler mutates `{page, cursor, state}` and returns the ordered list of
//! [`Effect`]s the host must perform. The page script implements the same
//! machine against the DOM; tests drive this one directly.
//!
//! ## States
//!
//! ```text
//!            start / resume
//!   Idle ───────────────────▶ Reading ──pause──▶ Paused
//!    ▲                          │  ▲                │
//!    │ stop, end of records,    │  └────resume──────┘
//!    │ random, read_single      │
//!    └──────────────────────────┘
//! ```
//!
//! ## Step Scheduling
//!
//! Sequential narration is a chain of deferred steps. Each step is identified
//! by a [`StepToken`] from the [`StepScheduler`]; scheduling a step supersedes
//! the pending one, and a firing token that is no longer pending is ignored.
//! This rules out two narration chains running at once.
//!
//! ## Ordering
//!
//! When the next record is on another page, [`Effect::ShowPage`] is emitted
//! before [`Effect::Highlight`], so the highlighted element exists when the
//! highlight is applied. Halting always emits `CancelStep`, `HaltAudio`,
//! `ClearHighlight` together.

use crate::config::LabelsConfig;
use crate::pagination::{Pager, PagerError};
use crate::serialize::{PLACEHOLDER, clean_text};
use crate::types::FlatRecord;
use rand::Rng;
use std::time::Duration;

/// Identifies one scheduled narration step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StepToken(u64);

/// Issues and cancels narration step tokens. At most one step is pending.
#[derive(Debug, Default)]
pub struct StepScheduler {
    issued: u64,
    pending: Option<StepToken>,
}

impl StepScheduler {
    /// Schedule a new step, superseding any pending one.
    pub fn schedule(&mut self) -> StepToken {
        self.issued += 1;
        let token = StepToken(self.issued);
        self.pending = Some(token);
        token
    }

    /// Cancel the pending step, if any, and return it.
    pub fn cancel(&mut self) -> Option<StepToken> {
        self.pending.take()
    }

    pub fn is_pending(&self, token: StepToken) -> bool {
        self.pending == Some(token)
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Consume `token` if it is the pending step. Stale tokens return false.
    fn fire(&mut self, token: StepToken) -> bool {
        if self.is_pending(token) {
            self.pending = None;
            true
        } else {
            false
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Reading,
    Paused,
}

/// Side effects requested by a [`Player`] event, to be applied in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Drop the pending step timer.
    CancelStep,
    /// Stop any audio in flight.
    HaltAudio,
    ClearHighlight,
    /// Render page `n`.
    ShowPage(usize),
    /// Highlight record `i` (already on the shown page).
    Highlight(usize),
    /// Narrate record `i`.
    Speak(usize),
    /// Call [`Player::fire`] with `token` after `after`.
    ScheduleStep { token: StepToken, after: Duration },
}

#[derive(Debug)]
pub struct Player {
    pager: Pager,
    state: PlaybackState,
    cursor: Option<usize>,
    scheduler: StepScheduler,
    dwell: Duration,
}

impl Player {
    pub fn new(total: usize, page_size: usize, dwell: Duration) -> Result<Self, PagerError> {
        Ok(Self {
            pager: Pager::new(total, page_size)?,
            state: PlaybackState::Idle,
            cursor: None,
            scheduler: StepScheduler::default(),
            dwell,
        })
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Record being narrated, or narrated last.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn page(&self) -> usize {
        self.pager.page()
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    pub fn has_pending_step(&self) -> bool {
        self.scheduler.has_pending()
    }

    fn total(&self) -> usize {
        self.pager.total()
    }

    // ------------------------------------------------------------------
    // Sequential narration
    // ------------------------------------------------------------------

    /// Restart the walk from the first record.
    pub fn start(&mut self) -> Vec<Effect> {
        let mut fx = Vec::new();
        self.halt(&mut fx);
        if self.total() == 0 {
            self.state = PlaybackState::Idle;
            return fx;
        }
        self.cursor = Some(0);
        self.state = PlaybackState::Reading;
        self.step(&mut fx);
        fx
    }

    /// Halt everything. The cursor is kept for [`resume`](Self::resume).
    pub fn stop(&mut self) -> Vec<Effect> {
        let mut fx = Vec::new();
        self.halt(&mut fx);
        self.state = PlaybackState::Idle;
        fx
    }

    /// Suspend the walk, keeping the highlight on the current record.
    pub fn pause(&mut self) -> Vec<Effect> {
        if self.state != PlaybackState::Reading {
            return Vec::new();
        }
        self.scheduler.cancel();
        self.state = PlaybackState::Paused;
        vec![Effect::CancelStep, Effect::HaltAudio]
    }

    /// Continue the walk from the cursor without resetting it.
    pub fn resume(&mut self) -> Vec<Effect> {
        let Some(cursor) = self.cursor else {
            return Vec::new();
        };
        if self.state == PlaybackState::Reading || cursor >= self.total() {
            return Vec::new();
        }
        let mut fx = Vec::new();
        self.scheduler.cancel();
        fx.push(Effect::CancelStep);
        self.state = PlaybackState::Reading;
        self.step(&mut fx);
        fx
    }

    /// A scheduled step came due.
    pub fn fire(&mut self, token: StepToken) -> Vec<Effect> {
        if self.state != PlaybackState::Reading || !self.scheduler.fire(token) {
            return Vec::new();
        }
        self.cursor = self.cursor.map(|c| c + 1);
        let mut fx = Vec::new();
        self.step(&mut fx);
        fx
    }

    // ------------------------------------------------------------------
    // Single-record narration
    // ------------------------------------------------------------------

    /// Advance by one record, wrapping past the end.
    ///
    /// While reading the walk continues from the new record; otherwise the
    /// record is narrated once.
    pub fn next(&mut self) -> Vec<Effect> {
        let total = self.total();
        if total == 0 {
            return Vec::new();
        }
        let index = self.cursor.map(|c| (c + 1) % total).unwrap_or(0);

        if self.state == PlaybackState::Reading {
            self.scheduler.cancel();
            let mut fx = vec![Effect::CancelStep, Effect::HaltAudio];
            self.cursor = Some(index);
            self.step(&mut fx);
            fx
        } else {
            self.narrate_once(index)
        }
    }

    /// Narrate one uniformly chosen record.
    pub fn random<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Vec<Effect> {
        let total = self.total();
        if total == 0 {
            return Vec::new();
        }
        let index = rng.gen_range(0..total);
        self.narrate_once(index)
    }

    /// Narrate record `index` once. Out-of-range indices are ignored.
    pub fn read_single(&mut self, index: usize) -> Vec<Effect> {
        if index >= self.total() {
            return Vec::new();
        }
        self.narrate_once(index)
    }

    // ------------------------------------------------------------------
    // Manual page navigation
    // ------------------------------------------------------------------

    pub fn next_page(&mut self) -> Vec<Effect> {
        vec![Effect::ShowPage(self.pager.next())]
    }

    pub fn previous_page(&mut self) -> Vec<Effect> {
        vec![Effect::ShowPage(self.pager.previous())]
    }

    pub fn random_page<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Vec<Effect> {
        vec![Effect::ShowPage(self.pager.random(rng))]
    }

    // ------------------------------------------------------------------

    fn halt(&mut self, fx: &mut Vec<Effect>) {
        self.scheduler.cancel();
        fx.extend([Effect::CancelStep, Effect::HaltAudio, Effect::ClearHighlight]);
    }

    fn show_record(&mut self, index: usize, fx: &mut Vec<Effect>) {
        let page = self.pager.page_of(index);
        if page != self.pager.page() {
            self.pager.jump_to_record(index);
            fx.push(Effect::ShowPage(page));
        }
        fx.push(Effect::Highlight(index));
        fx.push(Effect::Speak(index));
    }

    fn narrate_once(&mut self, index: usize) -> Vec<Effect> {
        let mut fx = Vec::new();
        self.halt(&mut fx);
        self.state = PlaybackState::Idle;
        self.cursor = Some(index);
        self.show_record(index, &mut fx);
        fx
    }

    /// Narrate the cursor record and schedule the next step, or finish the walk.
    fn step(&mut self, fx: &mut Vec<Effect>) {
        match self.cursor {
            Some(index) if index < self.total() => {
                self.show_record(index, fx);
                let token = self.scheduler.schedule();
                fx.push(Effect::ScheduleStep {
                    token,
                    after: self.dwell,
                });
            }
            _ => {
                self.scheduler.cancel();
                self.state = PlaybackState::Idle;
                self.cursor = None;
                fx.push(Effect::ClearHighlight);
            }
        }
    }
}

/// Text spoken for a record: source text, meaning, example, each after its
/// spoken label. Problem and reference are shown but not spoken; fields that
/// would only show the placeholder are left out.
pub fn narration_text(record: &FlatRecord, labels: &LabelsConfig) -> String {
    [
        (&labels.spoken_text, &record.text),
        (&labels.spoken_meaning, &record.meaning),
        (&labels.spoken_example, &record.example),
    ]
    .into_iter()
    .filter_map(|(label, value)| {
        let value = clean_text(value);
        (value != PLACEHOLDER).then(|| format!("{label}: {value}"))
    })
    .collect::<Vec<_>>()
    .join(". ")
}
