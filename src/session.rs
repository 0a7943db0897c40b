//! Spin orchestration: the Idle -> Spinning -> Settled state machine that
//! owns the item list, the accumulated rotation and the resolved winner.

use std::time::{Duration, Instant};

use log::{debug, info, warn};
use rand::Rng;

use crate::animator::{Sample, SpinAnimator, SpinPlan};
use crate::csv;
use crate::layout::{pointer_angle, Item, SectorLayout};
use crate::WheelError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Spinning,
    Settled,
}

/// Completion report from an external wheel renderer.
///
/// Index reports are authoritative. Label matching exists only for
/// renderers that report nothing else; it picks the first occurrence, so
/// with duplicate labels it deterministically picks the wrong item past
/// the first. Prefer `Index` whenever the renderer can supply one.
#[derive(Debug, Clone, PartialEq)]
pub enum SpinOutcome {
    Index(usize),
    Label(String),
}

/// What one animation frame produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// No spin in flight this frame.
    Quiet,
    Rotating { rotation_deg: f64, live_index: usize },
    Settled { winner: usize },
}

pub struct SpinSession {
    items: Vec<Item>,
    layout: SectorLayout,
    rotation_deg: f64,
    phase: Phase,
    winner: Option<usize>,
    live_index: Option<usize>,
    animator: Option<SpinAnimator>,
    duration: Duration,
}

impl SpinSession {
    pub fn new(items: Vec<Item>, duration: Duration) -> Result<Self, WheelError> {
        let layout = SectorLayout::compute(&items)?;
        Ok(Self {
            items,
            layout,
            rotation_deg: 0.0,
            phase: Phase::Idle,
            winner: None,
            live_index: None,
            animator: None,
            duration,
        })
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn layout(&self) -> &SectorLayout {
        &self.layout
    }

    pub fn rotation_deg(&self) -> f64 {
        self.rotation_deg
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_spinning(&self) -> bool {
        self.phase == Phase::Spinning
    }

    pub fn winner(&self) -> Option<usize> {
        self.winner
    }

    /// Sector currently under the pointer while spinning. Advisory UI
    /// feedback only; the final winner is resolved at completion.
    pub fn live_index(&self) -> Option<usize> {
        self.live_index
    }

    /// Starts a spin with a random plan. Silently ignored while one is
    /// already in flight.
    pub fn start_spin(&mut self, rng: &mut impl Rng, now: Instant) {
        self.start_spin_with_plan(SpinPlan::random(rng), now);
    }

    pub fn start_spin_with_plan(&mut self, plan: SpinPlan, now: Instant) {
        if self.is_spinning() {
            debug!("spin requested while already spinning; ignored");
            return;
        }
        self.winner = None;
        self.live_index = None;
        self.animator = Some(SpinAnimator::begin(self.rotation_deg, plan, self.duration, now));
        self.phase = Phase::Spinning;
        debug!(
            "spin started: total rotation {:.1} deg over {:?}",
            plan.total_rotation_deg, self.duration
        );
    }

    /// Advances the animation by one frame. On the terminal frame the
    /// winner is resolved from the final pointer angle and the session
    /// settles.
    pub fn tick(&mut self, now: Instant) -> TickOutcome {
        let Some(animator) = self.animator.as_mut() else {
            return TickOutcome::Quiet;
        };
        match animator.sample(now) {
            Sample::Rotating(deg) => {
                self.rotation_deg = deg;
                let live = self.layout.sector_at(pointer_angle(deg));
                self.live_index = Some(live);
                TickOutcome::Rotating {
                    rotation_deg: deg,
                    live_index: live,
                }
            }
            Sample::Finished(deg) => {
                self.rotation_deg = deg;
                self.animator = None;
                let winner = self.layout.sector_at(pointer_angle(deg));
                self.settle(winner);
                TickOutcome::Settled { winner }
            }
            Sample::Done => TickOutcome::Quiet,
        }
    }

    /// Settles a spin driven by an external renderer's completion
    /// callback, preferring an index report over label matching.
    pub fn settle_external(&mut self, outcome: SpinOutcome) -> Result<usize, WheelError> {
        if let Some(animator) = self.animator.as_mut() {
            animator.cancel();
            self.animator = None;
        }
        let winner = match outcome {
            SpinOutcome::Index(index) => {
                if index >= self.items.len() {
                    return Err(WheelError::BadIndex(index));
                }
                index
            }
            SpinOutcome::Label(label) => {
                let index = self
                    .items
                    .iter()
                    .position(|item| item.label == label)
                    .ok_or(WheelError::UnknownLabel(label.clone()))?;
                if self.items.iter().filter(|i| i.label == label).count() > 1 {
                    warn!("label {label:?} is duplicated; settling on first occurrence");
                }
                index
            }
        };
        self.settle(winner);
        Ok(winner)
    }

    fn settle(&mut self, winner: usize) {
        self.winner = Some(winner);
        self.live_index = None;
        self.phase = Phase::Settled;
        info!("wheel settled on {:?} (index {winner})", self.items[winner].label);
    }

    /// Tears down any in-flight animation. The pending completion is
    /// suppressed and the session returns to Idle; rotation is kept.
    pub fn cancel(&mut self) {
        if let Some(animator) = self.animator.as_mut() {
            animator.cancel();
        }
        self.animator = None;
        self.live_index = None;
        if self.phase == Phase::Spinning {
            self.phase = Phase::Idle;
        }
    }

    fn ensure_not_spinning(&self) -> Result<(), WheelError> {
        if self.is_spinning() {
            Err(WheelError::SpinInProgress)
        } else {
            Ok(())
        }
    }

    /// Any successful mutation resets the session to Idle with the winner
    /// cleared; the derived layout is recomputed in the same step.
    fn commit_items(&mut self, items: Vec<Item>) -> Result<(), WheelError> {
        let layout = SectorLayout::compute(&items)?;
        self.items = items;
        self.layout = layout;
        self.winner = None;
        self.live_index = None;
        self.phase = Phase::Idle;
        Ok(())
    }

    pub fn set_items(&mut self, items: Vec<Item>) -> Result<(), WheelError> {
        self.ensure_not_spinning()?;
        self.commit_items(items)
    }

    pub fn add_item(&mut self, item: Item) -> Result<(), WheelError> {
        self.ensure_not_spinning()?;
        let mut items = self.items.clone();
        items.push(item);
        self.commit_items(items)
    }

    pub fn remove_item(&mut self, index: usize) -> Result<Item, WheelError> {
        self.ensure_not_spinning()?;
        if index >= self.items.len() {
            return Err(WheelError::BadIndex(index));
        }
        if self.items.len() == 1 {
            return Err(WheelError::LastItem);
        }
        let mut items = self.items.clone();
        let removed = items.remove(index);
        self.commit_items(items)?;
        Ok(removed)
    }

    /// Removes the recorded winner from the wheel. Refused while spinning,
    /// without a recorded winner, or when only one item remains.
    pub fn exclude_winner(&mut self) -> Result<Item, WheelError> {
        self.ensure_not_spinning()?;
        let winner = self.winner.ok_or(WheelError::NoWinner)?;
        let removed = self.remove_item(winner)?;
        info!("excluded winner {:?}", removed.label);
        Ok(removed)
    }

    /// Replaces the item list from CSV text. Nothing is mutated unless at
    /// least one valid row survives parsing.
    pub fn import_csv(&mut self, text: &str) -> Result<usize, WheelError> {
        self.ensure_not_spinning()?;
        if text.trim().is_empty() {
            return Err(WheelError::EmptyCsv);
        }
        let items = csv::parse(text);
        if items.is_empty() {
            return Err(WheelError::NoValidRows);
        }
        let count = items.len();
        self.commit_items(items)?;
        info!("imported {count} items from CSV");
        Ok(count)
    }

    pub fn export_csv(&self) -> String {
        csv::serialize(&self.items)
    }
}
