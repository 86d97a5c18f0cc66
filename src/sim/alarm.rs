//! Timer abstraction for phase transitions
//!
//! The session owns a single `Alarms` queue. Time only moves when the front
//! end calls `set_now`; alarms are popped one at a time so the reducer can
//! schedule or cancel in between. `cancel_all` starts a new epoch, and an
//! alarm armed in an older epoch never fires.

use serde::{Deserialize, Serialize};

/// What an alarm means when it goes off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlarmKind {
    /// One second of memorization elapsed
    CountdownTick,
    /// Overlay is fully opaque; rotate and hide puddles now
    FadeMidpoint,
    /// Overlay has cleared
    FadeComplete,
}

/// A pending alarm
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alarm {
    pub kind: AlarmKind,
    pub due_ms: f64,
    /// Re-arm period for interval alarms
    pub interval_ms: Option<f64>,
    pub epoch: u32,
}

/// Alarm queue with a monotonic clock
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Alarms {
    now_ms: f64,
    epoch: u32,
    pending: Vec<Alarm>,
}

impl Alarms {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current clock reading
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn epoch(&self) -> u32 {
        self.epoch
    }

    /// Number of live alarms
    pub fn len(&self) -> usize {
        self.pending.iter().filter(|a| a.epoch == self.epoch).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Arm a one-shot alarm at an absolute clock reading
    pub fn schedule_at(&mut self, kind: AlarmKind, due_ms: f64) {
        self.push(kind, due_ms, None);
    }

    /// Arm a repeating alarm, first firing `period_ms` from now
    pub fn schedule_every(&mut self, kind: AlarmKind, period_ms: f64) {
        self.push(kind, self.now_ms + period_ms, Some(period_ms));
    }

    /// Disarm every alarm of one kind
    pub fn cancel(&mut self, kind: AlarmKind) {
        self.pending.retain(|a| a.kind != kind);
    }

    /// Tear down: drop everything and start a new epoch
    pub fn cancel_all(&mut self) {
        self.pending.clear();
        self.epoch = self.epoch.wrapping_add(1);
    }

    /// Move the clock forward. Time never runs backwards.
    pub fn set_now(&mut self, now_ms: f64) {
        if now_ms > self.now_ms {
            self.now_ms = now_ms;
        }
    }

    /// Pop the earliest alarm due at or before the clock, re-arming intervals
    pub fn pop_due(&mut self) -> Option<Alarm> {
        let epoch = self.epoch;
        self.pending.retain(|a| a.epoch == epoch);

        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, a)| a.due_ms <= self.now_ms)
            .min_by(|(_, a), (_, b)| a.due_ms.total_cmp(&b.due_ms))
            .map(|(i, _)| i)?;

        let alarm = self.pending.remove(idx);
        if let Some(period) = alarm.interval_ms {
            self.push(alarm.kind, alarm.due_ms + period, Some(period));
        }
        Some(alarm)
    }

    fn push(&mut self, kind: AlarmKind, due_ms: f64, interval_ms: Option<f64>) {
        self.pending.push(Alarm {
            kind,
            due_ms,
            interval_ms,
            epoch: self.epoch,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(alarms: &mut Alarms) -> Vec<AlarmKind> {
        std::iter::from_fn(|| alarms.pop_due().map(|a| a.kind)).collect()
    }

    #[test]
    fn test_one_shot_fires_once() {
        let mut alarms = Alarms::new();
        alarms.schedule_at(AlarmKind::FadeMidpoint, 500.0);

        alarms.set_now(499.0);
        assert!(drain(&mut alarms).is_empty());

        alarms.set_now(500.0);
        assert_eq!(drain(&mut alarms), vec![AlarmKind::FadeMidpoint]);

        alarms.set_now(2000.0);
        assert!(drain(&mut alarms).is_empty());
        assert!(alarms.is_empty());
    }

    #[test]
    fn test_interval_catches_up_after_stall() {
        let mut alarms = Alarms::new();
        alarms.schedule_every(AlarmKind::CountdownTick, 1000.0);

        alarms.set_now(3500.0);
        assert_eq!(drain(&mut alarms).len(), 3);

        alarms.set_now(4000.0);
        assert_eq!(drain(&mut alarms), vec![AlarmKind::CountdownTick]);
    }

    #[test]
    fn test_fires_in_due_order() {
        let mut alarms = Alarms::new();
        alarms.schedule_at(AlarmKind::FadeComplete, 1000.0);
        alarms.schedule_at(AlarmKind::FadeMidpoint, 500.0);

        alarms.set_now(1000.0);
        assert_eq!(
            drain(&mut alarms),
            vec![AlarmKind::FadeMidpoint, AlarmKind::FadeComplete]
        );
    }

    #[test]
    fn test_cancel_all_bumps_epoch() {
        let mut alarms = Alarms::new();
        alarms.schedule_every(AlarmKind::CountdownTick, 1000.0);
        let before = alarms.epoch();

        alarms.cancel_all();
        assert_ne!(alarms.epoch(), before);

        alarms.set_now(10_000.0);
        assert!(drain(&mut alarms).is_empty());
    }

    #[test]
    fn test_clock_is_monotonic() {
        let mut alarms = Alarms::new();
        alarms.set_now(800.0);
        alarms.set_now(100.0);
        assert_eq!(alarms.now_ms(), 800.0);
    }

    #[test]
    fn test_cancel_single_kind() {
        let mut alarms = Alarms::new();
        alarms.schedule_every(AlarmKind::CountdownTick, 1000.0);
        alarms.schedule_at(AlarmKind::FadeMidpoint, 1000.0);
        alarms.cancel(AlarmKind::CountdownTick);

        alarms.set_now(1000.0);
        assert_eq!(drain(&mut alarms), vec![AlarmKind::FadeMidpoint]);
    }
}
