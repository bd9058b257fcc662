//! Document Transfer Queue
//!
//! A transfer is the flying document drawn when activity switches from one
//! desk to another. Transfers are bounded (a burst of rapid switching drops
//! the oldest first) and expire after a fixed display duration; expiry is
//! polled by the render consumer, never scheduled.

use std::time::{Duration, Instant};

use crate::geometry::{clamp01, lerp, Easing, Point};
use crate::ingest::ToolStamp;

/// One in-flight document.
#[derive(Clone, Debug)]
pub struct DocumentTransfer {
    /// Monotonic sequence id; creation order equals id order.
    pub id: u64,
    pub from_agent_id: String,
    pub to_agent_id: String,
    pub started_at: Instant,
    /// Stamp shown on the document, when the triggering tool is known.
    pub stamp: Option<ToolStamp>,
}

/// Bounded FIFO queue of in-flight documents.
#[derive(Debug)]
pub struct TransferQueue {
    transfers: Vec<DocumentTransfer>,
    next_id: u64,
    capacity: usize,
    duration: Duration,
    arc_height: f32,
}

impl TransferQueue {
    #[must_use]
    pub fn new(capacity: usize, duration: Duration, arc_height: f32) -> Self {
        Self {
            transfers: Vec::new(),
            next_id: 0,
            capacity: capacity.max(1),
            duration,
            arc_height,
        }
    }

    /// Append a transfer; evicts from the front when over capacity.
    ///
    /// FIFO eviction, not LRU: relevance follows creation time, not access.
    pub fn enqueue(
        &mut self,
        from_agent_id: impl Into<String>,
        to_agent_id: impl Into<String>,
        stamp: Option<ToolStamp>,
        now: Instant,
    ) -> u64 {
        let id = self.next_id;
        self.next_id += 1;

        self.transfers.push(DocumentTransfer {
            id,
            from_agent_id: from_agent_id.into(),
            to_agent_id: to_agent_id.into(),
            started_at: now,
            stamp,
        });

        while self.transfers.len() > self.capacity {
            self.transfers.remove(0);
        }
        id
    }

    /// Drop transfers whose display duration has elapsed.
    ///
    /// Builds a new survivor vector so a snapshot taken for the current
    /// frame stays valid through the draw.
    pub fn prune_expired(&mut self, now: Instant) {
        let duration = self.duration;
        if self
            .transfers
            .iter()
            .any(|t| now.saturating_duration_since(t.started_at) >= duration)
        {
            self.transfers = std::mem::take(&mut self.transfers)
                .into_iter()
                .filter(|t| now.saturating_duration_since(t.started_at) < duration)
                .collect();
        }
    }

    /// Normalized display progress of a transfer at `now`.
    #[must_use]
    pub fn progress(&self, transfer: &DocumentTransfer, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(transfer.started_at);
        clamp01(elapsed.as_secs_f32() / self.duration.as_secs_f32())
    }

    /// Position of the document along its arc.
    ///
    /// Horizontal travel is eased; the vertical lift follows a sine bump so
    /// the document rises and falls between the two desks.
    #[must_use]
    pub fn arc_position(&self, from: Point, to: Point, progress: f32) -> Point {
        let eased = Easing::OutCubic.apply(progress);
        let x = lerp(from.x, to.x, eased);
        let base_y = lerp(from.y, to.y, eased);
        let lift = (progress * std::f32::consts::PI).sin() * self.arc_height;
        Point::new(x, base_y - lift)
    }

    /// Stable view of the in-flight transfers for the current frame.
    #[must_use]
    pub fn snapshot(&self) -> &[DocumentTransfer] {
        &self.transfers
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transfers.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.transfers.len()
    }
}
