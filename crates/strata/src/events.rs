//! # World Events
//!
//! Bounded, non-blocking notification channel from the scheduler to
//! whoever renders or simulates the world.
//!
//! ```text
//! ┌────────────────┐   try_send   ┌─────────┐   drain   ┌────────────┐
//! │ WorldScheduler │─────────────>│ channel │──────────>│  consumers │
//! └────────────────┘              └─────────┘           └────────────┘
//! ```
//!
//! A full channel drops events rather than stall a tick.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use strata_shared::{BlockType, ChunkCoord, IVec3};

/// Things that happened during a tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WorldEvent {
    /// Terrain for a chunk finished.
    ChunkGenerated {
        /// Chunk.
        coord: ChunkCoord,
    },

    /// A chunk has a new render mesh.
    ChunkMeshed {
        /// Chunk.
        coord: ChunkCoord,
        /// Mesh revision.
        revision: u64,
        /// Quads emitted.
        faces: u32,
    },

    /// A collision mesh was installed.
    ColliderInstalled {
        /// Chunk.
        coord: ChunkCoord,
        /// Mesh revision it was baked from.
        revision: u64,
    },

    /// A chunk left the registry.
    ChunkEvicted {
        /// Chunk.
        coord: ChunkCoord,
    },

    /// A voxel was edited.
    BlockChanged {
        /// World voxel position.
        position: IVec3,
        /// Previous type.
        from: BlockType,
        /// New type.
        to: BlockType,
    },
}

/// Paired sender and receiver over one bounded channel.
pub struct EventBus {
    sender: Sender<WorldEvent>,
    receiver: Receiver<WorldEvent>,
}

impl EventBus {
    /// Creates a bus holding at most `capacity` undelivered events.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self { sender, receiver }
    }

    /// Creates a sender handle.
    #[must_use]
    pub fn sender(&self) -> EventSender {
        EventSender {
            sender: self.sender.clone(),
        }
    }

    /// Creates a receiver handle.
    #[must_use]
    pub fn receiver(&self) -> EventReceiver {
        EventReceiver {
            receiver: self.receiver.clone(),
        }
    }
}

/// Handle for publishing events.
#[derive(Clone)]
pub struct EventSender {
    sender: Sender<WorldEvent>,
}

impl EventSender {
    /// Publishes without blocking. Returns `false` if the event was dropped.
    #[inline]
    pub fn send(&self, event: WorldEvent) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                tracing::trace!("event channel full, dropped {event:?}");
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }
}

/// Handle for consuming events.
#[derive(Clone)]
pub struct EventReceiver {
    receiver: Receiver<WorldEvent>,
}

impl EventReceiver {
    /// Takes every pending event.
    pub fn drain(&self) -> Vec<WorldEvent> {
        self.receiver.try_iter().collect()
    }

    /// Takes one event if any is pending.
    #[inline]
    pub fn try_recv(&self) -> Option<WorldEvent> {
        self.receiver.try_recv().ok()
    }

    /// Number of pending events.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_and_drain() {
        let bus = EventBus::new(8);
        let sender = bus.sender();
        let receiver = bus.receiver();

        assert!(sender.send(WorldEvent::ChunkGenerated { coord: ChunkCoord::new(1, 0, 1) }));
        assert!(sender.send(WorldEvent::ChunkEvicted { coord: ChunkCoord::new(2, 0, 2) }));
        assert_eq!(receiver.pending_count(), 2);

        let events = receiver.drain();
        assert_eq!(events.len(), 2);
        assert!(receiver.try_recv().is_none());
    }

    #[test]
    fn test_full_channel_drops() {
        let bus = EventBus::new(1);
        let sender = bus.sender();
        let event = WorldEvent::ChunkGenerated { coord: ChunkCoord::new(0, 0, 0) };

        assert!(sender.send(event.clone()));
        assert!(!sender.send(event));
        assert_eq!(bus.receiver().pending_count(), 1);
    }
}
