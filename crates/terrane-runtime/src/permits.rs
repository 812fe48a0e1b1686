use std::sync::atomic::{AtomicUsize, Ordering};

use crossbeam_channel::{Receiver, Sender, bounded};

/// Counting gate on concurrent chunk generation. Tokens circulate through a
/// bounded channel; holding a [`Permit`] means holding one token.
pub struct GenerationPermits {
    available_tx: Sender<()>,
    available_rx: Receiver<()>,
    in_use: AtomicUsize,
    capacity: usize,
}

impl GenerationPermits {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, rx) = bounded(capacity);
        for _ in 0..capacity {
            let _ = tx.send(());
        }
        Self {
            available_tx: tx,
            available_rx: rx,
            in_use: AtomicUsize::new(0),
            capacity,
        }
    }

    /// Blocks until a token is free.
    pub fn acquire(&self) -> Permit<'_> {
        // The pool keeps its own sender, so the channel never disconnects.
        let _ = self.available_rx.recv();
        self.in_use.fetch_add(1, Ordering::AcqRel);
        Permit { pool: self }
    }

    pub fn try_acquire(&self) -> Option<Permit<'_>> {
        self.available_rx.try_recv().ok()?;
        self.in_use.fetch_add(1, Ordering::AcqRel);
        Some(Permit { pool: self })
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn in_use(&self) -> usize {
        self.in_use.load(Ordering::Acquire)
    }

    #[inline]
    pub fn available(&self) -> usize {
        self.available_rx.len()
    }

    fn release(&self) {
        self.in_use.fetch_sub(1, Ordering::AcqRel);
        let _ = self.available_tx.send(());
    }
}

/// Returns its token on drop, unwinding included.
pub struct Permit<'pool> {
    pool: &'pool GenerationPermits,
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        self.pool.release();
    }
}
