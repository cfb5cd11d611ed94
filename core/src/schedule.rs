use crate::types::Tick;

/// When a deferred action becomes due.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FireAt {
    /// Due on the first tick whose number is at least this one.
    Tick(Tick),
    /// Due once the clock reaches this time (seconds).
    Time(f64),
}

/// Wait-then-act queue evaluated against the tick clock.
///
/// Scheduling is not guarded: the same action may be pending several
/// times and each copy fires independently.
#[derive(Clone, Debug)]
pub struct DeferredQueue<A> {
    pending: Vec<(A, FireAt)>,
}

impl<A> Default for DeferredQueue<A> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
        }
    }
}

impl<A> DeferredQueue<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, action: A, at: FireAt) {
        self.pending.push((action, at));
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drop everything still pending.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Remove and return every action due at `tick`/`now`, in scheduling order.
    pub fn drain_due(&mut self, tick: Tick, now: f64) -> Vec<A> {
        let mut due = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            let ready = match self.pending[i].1 {
                FireAt::Tick(t) => tick >= t,
                FireAt::Time(t) => now >= t,
            };
            if ready {
                due.push(self.pending.remove(i).0);
            } else {
                i += 1;
            }
        }
        due
    }
}
