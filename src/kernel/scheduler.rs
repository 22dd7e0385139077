use std::collections::BTreeMap;

use super::event::RequestId;
use super::time::Tick;

/// Every timer the simulator runs. Each name has at most one live deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimerId {
    Clock,
    HistorySample,
    HeartRateWalk,
    BurnoutWalk,
    OverloadRecovery,
    TravelCountdown,
    StatusRevert,
    NotificationDismiss,
    GestureReset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TimerEntry {
    deadline: Tick,
    period: Option<u64>,
}

/// Owns named, cancellable timers. Nothing fires unless `due` is asked.
#[derive(Debug, Default)]
pub struct Scheduler {
    timers: BTreeMap<TimerId, TimerEntry>,
}

/// Effects the driver executes on behalf of the kernel.
#[derive(Debug, Clone, PartialEq)]
pub enum SideEffect {
    Log(String),
    ClassifyTranscript { request: RequestId, text: String },
    GenerateNotification { request: RequestId, zone: String },
    StartRecognition,
    StopRecognition,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms a periodic timer. Re-arming an existing name replaces its deadline.
    pub fn every(&mut self, id: TimerId, period_ticks: u64, now: Tick) {
        let period = period_ticks.max(1);
        self.timers.insert(
            id,
            TimerEntry {
                deadline: now.plus(period),
                period: Some(period),
            },
        );
    }

    /// Arms a one-shot timer, restarting it if already armed.
    pub fn after(&mut self, id: TimerId, delay_ticks: u64, now: Tick) {
        self.timers.insert(
            id,
            TimerEntry {
                deadline: now.plus(delay_ticks.max(1)),
                period: None,
            },
        );
    }

    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.timers.remove(&id).is_some()
    }

    pub fn is_armed(&self, id: TimerId) -> bool {
        self.timers.contains_key(&id)
    }

    pub fn deadline(&self, id: TimerId) -> Option<Tick> {
        self.timers.get(&id).map(|t| t.deadline)
    }

    pub fn armed_count(&self) -> usize {
        self.timers.len()
    }

    /// Takes the next timer whose deadline has passed, in `TimerId` order.
    /// Periodic timers are rescheduled from their old deadline, one-shots are
    /// removed. Call until None; a timer cancelled by an earlier handler in the
    /// same tick is never returned.
    pub fn pop_due(&mut self, now: Tick) -> Option<TimerId> {
        let id = self
            .timers
            .iter()
            .find(|(_, entry)| entry.deadline <= now)
            .map(|(id, _)| *id)?;

        let entry = self.timers.get_mut(&id)?;
        match entry.period {
            Some(period) => {
                while entry.deadline <= now {
                    entry.deadline = entry.deadline.plus(period);
                }
            }
            None => {
                self.timers.remove(&id);
            }
        }
        Some(id)
    }

    /// Teardown: releases every timer.
    pub fn clear(&mut self) {
        self.timers.clear();
    }
}
