use std::collections::VecDeque;
use super::event::{TelemetryEvent, TravelEventKind, ViewCause};
use crate::kernel::overload::OverloadState;

#[derive(Debug, Clone, Default)]
pub struct TelemetrySnapshot {
    pub overload_stats: OverloadStats,
    pub view_stats: ViewStats,
    pub classification_stats: ClassificationStats,
    pub travel_stats: TravelStats,
    pub listening_stats: ListeningStats,
    pub feed_switches: u64,
}

#[derive(Debug, Clone, Default)]
pub struct OverloadStats {
    pub entered: u64,
    pub recovered: u64,
}

#[derive(Debug, Clone, Default)]
pub struct ViewStats {
    pub transitions: u64,
    pub escalations: u64,
}

#[derive(Debug, Clone, Default)]
pub struct ClassificationStats {
    pub completed: u64,
    pub aggressive: u64,
    pub degraded: u64,
    pub incidents: u64,
    pub net_adjustment: i64,
    pub avg_latency_ticks: f64,
}

#[derive(Debug, Clone, Default)]
pub struct TravelStats {
    pub started: u64,
    pub cancelled: u64,
    pub arrived: u64,
    pub rejected: u64,
    pub avg_travel_ticks: f64,
}

#[derive(Debug, Clone, Default)]
pub struct ListeningStats {
    pub enabled: u64,
    pub disabled: u64,
    pub restarts: u64,
}

pub fn compute_snapshot(events: &VecDeque<TelemetryEvent>) -> TelemetrySnapshot {
    let mut snap = TelemetrySnapshot::default();

    let mut total_latency = 0u64;
    let mut total_travel = 0u64;

    for event in events {
        match event {
            TelemetryEvent::OverloadTransition { to, .. } => match to {
                OverloadState::Overload => snap.overload_stats.entered += 1,
                OverloadState::Normal => snap.overload_stats.recovered += 1,
            },
            TelemetryEvent::ViewTransition { cause, .. } => {
                snap.view_stats.transitions += 1;
                if matches!(cause, ViewCause::StressEscalation | ViewCause::OverloadEscalation) {
                    snap.view_stats.escalations += 1;
                }
            }
            TelemetryEvent::ClassificationCompleted { aggressive, stress_adjustment, degraded, latency_ticks } => {
                snap.classification_stats.completed += 1;
                if *aggressive { snap.classification_stats.aggressive += 1; }
                if *degraded { snap.classification_stats.degraded += 1; }
                snap.classification_stats.net_adjustment += i64::from(*stress_adjustment);
                total_latency += latency_ticks;
            }
            TelemetryEvent::IncidentLogged => {
                snap.classification_stats.incidents += 1;
            }
            TelemetryEvent::Travel(kind) => match kind {
                TravelEventKind::Started { .. } => snap.travel_stats.started += 1,
                TravelEventKind::Cancelled { .. } => snap.travel_stats.cancelled += 1,
                TravelEventKind::Arrived { traveled_ticks } => {
                    snap.travel_stats.arrived += 1;
                    total_travel += traveled_ticks;
                }
                TravelEventKind::Rejected => snap.travel_stats.rejected += 1,
            },
            TelemetryEvent::ListeningToggled { enabled } => {
                if *enabled {
                    snap.listening_stats.enabled += 1;
                } else {
                    snap.listening_stats.disabled += 1;
                }
            }
            TelemetryEvent::RecognitionRestarted => {
                snap.listening_stats.restarts += 1;
            }
            TelemetryEvent::FeedModeChanged { .. } => {
                snap.feed_switches += 1;
            }
        }
    }

    // Compute Averages
    if snap.classification_stats.completed > 0 {
        snap.classification_stats.avg_latency_ticks = total_latency as f64 / snap.classification_stats.completed as f64;
    }

    if snap.travel_stats.arrived > 0 {
        snap.travel_stats.avg_travel_ticks = total_travel as f64 / snap.travel_stats.arrived as f64;
    }

    snap
}
