use serde::{Deserialize, Serialize};

/// A deferred piece of a multi-step ability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduledAction {
    /// One strike of the multi-hit combo, 0-based.
    ComboHit { step: u8 },
    /// One shot of the barrage ultimate, 0-based.
    BarrageShot { index: u8 },
    /// One lightning strike of the storm ultimate.
    StormStrike,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledEntry {
    /// Absolute match-clock time at which the action runs.
    pub at: f32,
    /// Insertion order; breaks ties between entries due at the same time.
    pub seq: u64,
    /// Slot of the fighter that scheduled it.
    pub source: usize,
    /// Life generation of the source when scheduled.
    pub life: u32,
    pub action: ScheduledAction,
}

/// Deferred sub-effects keyed by match-clock time.
///
/// The clock only advances while the match runs, so pausing freezes every
/// pending entry along with it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scheduler {
    entries: Vec<ScheduledEntry>,
    next_seq: u64,
}

impl Scheduler {
    pub fn schedule(&mut self, at: f32, source: usize, life: u32, action: ScheduledAction) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(ScheduledEntry {
            at,
            seq,
            source,
            life,
            action,
        });
    }

    /// Remove and return every entry due at or before `now`, earliest first.
    pub fn drain_due(&mut self, now: f32) -> Vec<ScheduledEntry> {
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.entries.drain(..).partition(|e| e.at <= now);
        self.entries = pending;
        due.sort_by(|a, b| a.at.total_cmp(&b.at).then(a.seq.cmp(&b.seq)));
        due
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
