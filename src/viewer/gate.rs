//! Single-writer guard over the rendered slot list
//!
//! Only one render pass may write slots at a time. Each full-render request
//! takes a ticket; what happens to a request that arrives while a pass is in
//! flight depends on the [`BusyPolicy`].

use std::cell::Cell;

use serde::{Deserialize, Serialize};
use tokio::sync::Notify;

/// What a render request does when a pass is already running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BusyPolicy {
    /// The request is discarded; the running pass finishes unchanged
    Drop,
    /// The running pass restarts with the latest state and the request
    /// waits for it to finish
    #[default]
    Restart,
}

impl BusyPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            BusyPolicy::Drop => "drop",
            BusyPolicy::Restart => "restart",
        }
    }

    /// Whether a running pass starts over when its inputs change
    pub fn restarts(&self) -> bool {
        *self == BusyPolicy::Restart
    }
}

impl std::str::FromStr for BusyPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "drop" => Ok(Self::Drop),
            "restart" => Ok(Self::Restart),
            other => Err(format!("unknown busy policy '{other}' (expected drop or restart)")),
        }
    }
}

/// Position of a render request in request order
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Outcome of presenting a ticket to the gate
#[derive(Debug)]
pub enum Admission<'a> {
    /// The caller owns the slot list until the pass is dropped
    Start(RenderPass<'a>),
    /// A pass is running and the policy discards this request
    Dropped,
    /// A pass is running and will pick this request up; wait for it
    Wait,
    /// A completed pass already covered this request
    Served,
}

#[derive(Debug)]
pub struct RenderGate {
    policy: BusyPolicy,
    busy: Cell<bool>,
    requested: Cell<u64>,
    served: Cell<u64>,
    idle: Notify,
}

impl RenderGate {
    #[must_use]
    pub fn new(policy: BusyPolicy) -> Self {
        Self {
            policy,
            busy: Cell::new(false),
            requested: Cell::new(0),
            served: Cell::new(0),
            idle: Notify::new(),
        }
    }

    pub fn policy(&self) -> BusyPolicy {
        self.policy
    }

    /// True while any pass holds the gate
    pub fn is_busy(&self) -> bool {
        self.busy.get()
    }

    /// Latest request number
    pub fn generation(&self) -> u64 {
        self.requested.get()
    }

    /// Record a new full-render request
    pub fn request(&self) -> Ticket {
        let next = self.requested.get() + 1;
        self.requested.set(next);
        Ticket(next)
    }

    pub fn admit(&self, ticket: Ticket) -> Admission<'_> {
        if self.served.get() >= ticket.0 {
            return Admission::Served;
        }
        if self.busy.get() {
            return match self.policy {
                BusyPolicy::Drop => Admission::Dropped,
                BusyPolicy::Restart => Admission::Wait,
            };
        }
        self.busy.set(true);
        Admission::Start(RenderPass { gate: self })
    }

    /// Take the gate without a ticket; `None` if a pass holds it
    pub fn try_acquire(&self) -> Option<RenderPass<'_>> {
        if self.busy.get() {
            return None;
        }
        self.busy.set(true);
        Some(RenderPass { gate: self })
    }

    /// Whether requests newer than `generation` should preempt a pass
    pub fn is_superseded(&self, generation: u64) -> bool {
        self.policy == BusyPolicy::Restart && self.requested.get() != generation
    }

    /// Mark every request up to `generation` as rendered
    pub fn mark_served(&self, generation: u64) {
        if generation > self.served.get() {
            self.served.set(generation);
        }
    }

    /// Resolve once no pass holds the gate
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.idle.notified();
            if !self.busy.get() {
                return;
            }
            notified.await;
        }
    }
}

/// Exclusive right to write the slot list; released on drop
#[derive(Debug)]
pub struct RenderPass<'a> {
    gate: &'a RenderGate,
}

impl Drop for RenderPass<'_> {
    fn drop(&mut self) {
        self.gate.busy.set(false);
        self.gate.idle.notify_waiters();
    }
}
