//! Lock-free single-producer/single-consumer ring buffer used to move CAN
//! frames out of interrupt context without loss or corruption. Elements are
//! copied whole (`T: Copy`), so a preempted consumer can never observe a
//! half-written value; the head and tail indices are the only state touched
//! by both contexts.
use core::cell::UnsafeCell;
use core::mem::MaybeUninit;
use core::sync::atomic::{AtomicUsize, Ordering};

/// Fixed-capacity SPSC ring with exactly `N` usable slots.
///
/// `new()` is `const`, so a ring can live in a `static` and be split into
/// its two handles at startup: the [`Producer`] goes to the interrupt
/// handler, the [`Consumer`] stays with the application loop.
///
/// Indices follow the Lamport discipline: both live in `0..2N`, which keeps
/// "full" (`distance == N`) distinguishable from "empty" (`head == tail`)
/// without sacrificing a slot.
pub struct SpscRing<T: Copy, const N: usize> {
    slots: UnsafeCell<[MaybeUninit<T>; N]>,
    /// Producer-owned write index, `0..2N`.
    head: AtomicUsize,
    /// Consumer-owned read index, `0..2N`.
    tail: AtomicUsize,
}

// Slot contents are only ever accessed by the single handle that owns the
// corresponding index, with Acquire/Release ordering on the index stores.
unsafe impl<T: Copy + Send, const N: usize> Sync for SpscRing<T, N> {}

impl<T: Copy, const N: usize> SpscRing<T, N> {
    /// Create an empty ring.
    pub const fn new() -> Self {
        Self {
            slots: UnsafeCell::new([const { MaybeUninit::uninit() }; N]),
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
        }
    }

    /// Hand out the two endpoint handles. The `&mut` receiver guarantees no
    /// other handle is alive at that point, so the single-producer /
    /// single-consumer discipline holds by construction.
    pub fn split(&mut self) -> (Producer<'_, T, N>, Consumer<'_, T, N>) {
        let ring = &*self;
        (Producer { ring }, Consumer { ring })
    }

    /// Number of occupied slots.
    fn occupancy(&self) -> usize {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        (head + 2 * N - tail) % (2 * N)
    }
}

impl<T: Copy, const N: usize> Default for SpscRing<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Write endpoint; the only handle allowed in interrupt context.
pub struct Producer<'a, T: Copy, const N: usize> {
    ring: &'a SpscRing<T, N>,
}

impl<T: Copy, const N: usize> Producer<'_, T, N> {
    /// Copy `value` into the ring. Returns `false` and drops the value when
    /// the ring is full; never blocks or spins.
    pub fn put(&mut self, value: T) -> bool {
        let head = self.ring.head.load(Ordering::Relaxed);
        let tail = self.ring.tail.load(Ordering::Acquire);
        if (head + 2 * N - tail) % (2 * N) == N {
            #[cfg(feature = "defmt")]
            defmt::trace!("spsc ring full, value dropped");
            return false;
        }
        // Sole producer: the slot at `head` is invisible to the consumer
        // until the Release store below publishes it.
        unsafe {
            self.ring
                .slots
                .get()
                .cast::<MaybeUninit<T>>()
                .add(head % N)
                .write(MaybeUninit::new(value));
        }
        self.ring.head.store((head + 1) % (2 * N), Ordering::Release);
        true
    }

    /// Number of occupied slots at the time of the call.
    pub fn len(&self) -> usize {
        self.ring.occupancy()
    }

    /// True when no slot is occupied.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Read endpoint, owned by the application-loop context.
pub struct Consumer<'a, T: Copy, const N: usize> {
    ring: &'a SpscRing<T, N>,
}

impl<T: Copy, const N: usize> Consumer<'_, T, N> {
    /// Copy the oldest value out of the ring, or `None` when empty.
    /// Non-blocking.
    pub fn get(&mut self) -> Option<T> {
        let tail = self.ring.tail.load(Ordering::Relaxed);
        let head = self.ring.head.load(Ordering::Acquire);
        if head == tail {
            return None;
        }
        // The Acquire load above synchronizes with the producer's Release
        // store, so the slot at `tail` is fully written.
        let value = unsafe {
            self.ring
                .slots
                .get()
                .cast::<MaybeUninit<T>>()
                .add(tail % N)
                .read()
                .assume_init()
        };
        self.ring.tail.store((tail + 1) % (2 * N), Ordering::Release);
        Some(value)
    }

    /// Number of occupied slots at the time of the call.
    pub fn len(&self) -> usize {
        self.ring.occupancy()
    }

    /// True when no slot is occupied.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
