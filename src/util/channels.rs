// Copyright (c) 2024 Mike Tsao

use crossbeam::channel::{Receiver, Sender};

/// Both halves of a crossbeam channel, unbounded unless made with
/// [CrossbeamChannel::new_bounded()]. The engine keeps one of these for its
/// notifications and hands out clones of the receiver to whoever displays
/// them.
#[derive(Debug)]
pub struct CrossbeamChannel<T> {
    #[allow(missing_docs)]
    pub sender: Sender<T>,
    #[allow(missing_docs)]
    pub receiver: Receiver<T>,
}
impl<T> Default for CrossbeamChannel<T> {
    fn default() -> Self {
        let (sender, receiver) = crossbeam::channel::unbounded();
        Self { sender, receiver }
    }
}
impl<T> CrossbeamChannel<T> {
    /// A channel that holds at most `capacity` messages. Once it's full,
    /// `send()` blocks and `try_send()` fails.
    pub fn new_bounded(capacity: usize) -> Self {
        let (sender, receiver) = crossbeam::channel::bounded(capacity);
        Self { sender, receiver }
    }

    /// Takes everything currently queued without blocking.
    pub fn drain(&self) -> Vec<T> {
        self.receiver.try_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crossbeam_channel() {
        let channel = CrossbeamChannel::default();

        let _ = channel.sender.send(42);
        let _ = channel.sender.send(43);

        assert_eq!(channel.drain(), vec![42, 43]);
        assert!(channel.drain().is_empty());
    }

    #[test]
    fn bounded_channel_refuses_overflow() {
        let channel = CrossbeamChannel::new_bounded(2);

        assert!(channel.sender.try_send(1).is_ok());
        assert!(channel.sender.try_send(2).is_ok());
        assert!(channel.sender.try_send(3).unwrap_err().is_full());
        assert_eq!(channel.receiver.len(), 2);

        assert_eq!(channel.drain(), vec![1, 2]);
        assert!(channel.sender.try_send(4).is_ok());
    }
}
