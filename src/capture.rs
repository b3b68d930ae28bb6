//! Capture-side plumbing: fixed-rate ticking and a latest-wins sample hand-off.
//!
//! When capture runs on its own thread, at most one sample is ever pending
//! between it and the classifier. Publishing while a sample is still pending
//! replaces it, so a slow consumer sees fresh poses instead of a backlog.

use crate::pose::{PoseSample, PoseSource};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TryRecvError, TrySendError};
use log::{debug, info};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Producer half of the latest-wins channel
pub struct SampleSender {
    tx: Sender<PoseSample>,
    evict: Receiver<PoseSample>,
    consumer_alive: Arc<AtomicBool>,
    dropped: u64,
}

/// Consumer half of the latest-wins channel
pub struct SampleReceiver {
    rx: Receiver<PoseSample>,
    consumer_alive: Arc<AtomicBool>,
}

/// Create a single-producer, single-consumer channel holding at most one sample
#[must_use]
pub fn channel() -> (SampleSender, SampleReceiver) {
    let (tx, rx) = bounded(1);
    let consumer_alive = Arc::new(AtomicBool::new(true));
    (
        SampleSender {
            tx,
            evict: rx.clone(),
            consumer_alive: Arc::clone(&consumer_alive),
            dropped: 0,
        },
        SampleReceiver { rx, consumer_alive },
    )
}

impl SampleSender {
    /// Publish a sample, replacing any sample still pending.
    ///
    /// Returns false once the consumer is gone.
    pub fn publish(&mut self, sample: PoseSample) -> bool {
        if !self.consumer_alive.load(Ordering::Acquire) {
            return false;
        }

        let mut sample = sample;
        loop {
            match self.tx.try_send(sample) {
                Ok(()) => return true,
                Err(TrySendError::Full(rejected)) => {
                    if self.evict.try_recv().is_ok() {
                        self.dropped += 1;
                    }
                    sample = rejected;
                }
                Err(TrySendError::Disconnected(_)) => return false,
            }
        }
    }

    /// Number of samples replaced before the consumer took them
    #[must_use]
    pub const fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl SampleReceiver {
    /// Wait up to `timeout` for the pending sample.
    ///
    /// # Errors
    ///
    /// `Timeout` if nothing arrived, `Disconnected` once the producer is gone
    /// and nothing is pending
    pub fn recv_timeout(&self, timeout: Duration) -> Result<PoseSample, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    /// Take the pending sample without waiting.
    ///
    /// # Errors
    ///
    /// `Empty` if nothing is pending, `Disconnected` once the producer is gone
    pub fn try_recv(&self) -> Result<PoseSample, TryRecvError> {
        self.rx.try_recv()
    }
}

impl Drop for SampleReceiver {
    fn drop(&mut self) {
        self.consumer_alive.store(false, Ordering::Release);
    }
}

/// Fixed-rate tick scheduler
pub struct Ticker {
    period: Duration,
    next: Instant,
}

impl Ticker {
    /// Create a ticker firing `fps` times per second
    #[must_use]
    pub fn new(fps: u32) -> Self {
        let period = Duration::from_secs(1) / fps.max(1);
        Self {
            period,
            next: Instant::now() + period,
        }
    }

    /// Tick period
    #[must_use]
    pub const fn period(&self) -> Duration {
        self.period
    }

    /// Sleep until the next tick.
    ///
    /// A tick that is already late is not slept for; after falling more than
    /// a full period behind the schedule restarts from now.
    pub fn wait(&mut self) {
        let now = Instant::now();
        if self.next > now {
            thread::sleep(self.next - now);
            self.next += self.period;
        } else if now - self.next > self.period {
            debug!("Tick overran by {:?}, resynchronising", now - self.next);
            self.next = now + self.period;
        } else {
            self.next += self.period;
        }
    }
}

/// Run `source` on its own thread at `fps`, publishing into a latest-wins channel.
///
/// The thread ends when the source is exhausted or the receiver is dropped,
/// and returns how many samples were replaced before being consumed.
pub fn spawn_capture(mut source: Box<dyn PoseSource>, fps: u32) -> (JoinHandle<u64>, SampleReceiver) {
    let (mut tx, rx) = channel();
    let handle = thread::spawn(move || {
        info!("Capture thread started for {} source at {} fps", source.name(), fps);
        let mut ticker = Ticker::new(fps);
        while let Some(sample) = source.next_sample() {
            if !tx.publish(sample) {
                break;
            }
            ticker.wait();
        }
        info!("Capture thread finished, {} stale samples replaced", tx.dropped());
        tx.dropped()
    });
    (handle, rx)
}
