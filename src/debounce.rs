//! Debounced element size measurements.
//!
//! A size observer produces a stream of timestamped [`Sample`]s. Resizes come
//! in bursts (window drags, layout shifts), and each distinct hint can make
//! the browser fetch another variant, so the stream is debounced: the latest
//! sample is held and only emitted once no newer sample has arrived for the
//! quiet period.
//!
//! Waiting a full quiet period before the *first* value would mean rendering
//! with no hint at all, so [`Debouncer::effective`] falls back to the raw
//! latest sample until a debounced value exists.
//!
//! Time is passed in explicitly as a [`Duration`] since an arbitrary origin,
//! which keeps the transform deterministic and testable. [`watch`] wires a
//! producer to a consumer over a channel; dropping the [`SizeWatcher`]
//! releases the observation and the [`SizeReporter`] sees it disconnected.

use crate::sizing::{Size, SizingMode, sizes_hint};
use crate::types::ResolvedImage;
use log::debug;
use std::str::FromStr;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::time::Duration;

/// Default quiet period before a size is considered settled.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(1000);

/// One measurement, taken `at` a time since the stream origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub at: Duration,
    pub size: Size,
}

impl Sample {
    pub fn new(at: Duration, size: Size) -> Self {
        Self { at, size }
    }
}

/// Parses `WIDTHxHEIGHT[@MILLIS]`. Without a timestamp the sample is taken
/// at the stream origin.
impl FromStr for Sample {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (size, at) = match value.split_once('@') {
            Some((size, millis)) => {
                let millis = millis
                    .trim()
                    .parse::<u64>()
                    .map_err(|e| format!("{value:?}: timestamp {millis:?}: {e}"))?;
                (size, Duration::from_millis(millis))
            }
            None => (value, Duration::ZERO),
        };
        Ok(Self::new(at, size.parse()?))
    }
}

/// Stateful debounce transform over [`Sample`]s.
#[derive(Debug, Clone)]
pub struct Debouncer {
    quiet: Duration,
    pending: Option<Sample>,
    raw: Option<Size>,
    debounced: Option<Size>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_PERIOD)
    }
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
            raw: None,
            debounced: None,
        }
    }

    /// Feed a sample. Returns the previously held size if it had already
    /// settled before this sample arrived.
    pub fn push(&mut self, sample: Sample) -> Option<Size> {
        let settled = self.poll(sample.at);
        self.raw = Some(sample.size);
        self.pending = Some(sample);
        settled
    }

    /// Emit the held size if the quiet period has elapsed by `now`.
    pub fn poll(&mut self, now: Duration) -> Option<Size> {
        let pending = self.pending?;
        if now.saturating_sub(pending.at) >= self.quiet {
            self.pending = None;
            self.debounced = Some(pending.size);
            Some(pending.size)
        } else {
            None
        }
    }

    /// Emit the held size regardless of timing (end of stream).
    pub fn flush(&mut self) -> Option<Size> {
        let pending = self.pending.take()?;
        self.debounced = Some(pending.size);
        Some(pending.size)
    }

    /// Latest raw measurement.
    pub fn raw(&self) -> Option<Size> {
        self.raw
    }

    /// Latest settled measurement.
    pub fn debounced(&self) -> Option<Size> {
        self.debounced
    }

    /// Debounced size once one exists, otherwise the latest raw size.
    pub fn effective(&self) -> Option<Size> {
        self.debounced.or(self.raw)
    }
}

/// Iterator adapter yielding the debounced sequence of a sample stream.
///
/// The final held sample is flushed when the source ends.
pub struct Debounced<I> {
    samples: I,
    state: Debouncer,
    done: bool,
}

impl<I: Iterator<Item = Sample>> Iterator for Debounced<I> {
    type Item = Size;

    fn next(&mut self) -> Option<Size> {
        if self.done {
            return None;
        }
        for sample in self.samples.by_ref() {
            if let Some(settled) = self.state.push(sample) {
                return Some(settled);
            }
        }
        self.done = true;
        self.state.flush()
    }
}

/// Debounce any sample stream with the given quiet period.
pub fn debounce<I>(samples: I, quiet: Duration) -> Debounced<I::IntoIter>
where
    I: IntoIterator<Item = Sample>,
{
    Debounced {
        samples: samples.into_iter(),
        state: Debouncer::new(quiet),
        done: false,
    }
}

/// Producer half of a size observation.
#[derive(Debug, Clone)]
pub struct SizeReporter {
    tx: Sender<Sample>,
}

impl SizeReporter {
    /// Deliver a measurement. Returns `false` once the watcher is gone.
    pub fn report(&self, sample: Sample) -> bool {
        self.tx.send(sample).is_ok()
    }
}

/// Consumer half of a size observation. Dropping it stops the observation.
#[derive(Debug)]
pub struct SizeWatcher {
    rx: Receiver<Sample>,
    state: Debouncer,
    connected: bool,
}

/// Start observing: returns the reporter to hand to the measuring side and
/// the watcher that owns the debounced state.
pub fn watch(quiet: Duration) -> (SizeReporter, SizeWatcher) {
    let (tx, rx) = mpsc::channel();
    (
        SizeReporter { tx },
        SizeWatcher {
            rx,
            state: Debouncer::new(quiet),
            connected: true,
        },
    )
}

impl SizeWatcher {
    /// Drain delivered samples and settle anything quiet by `now`.
    /// Returns the effective size.
    pub fn update(&mut self, now: Duration) -> Option<Size> {
        loop {
            match self.rx.try_recv() {
                Ok(sample) => {
                    self.state.push(sample);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.connected = false;
                    break;
                }
            }
        }
        self.state.poll(now);
        self.state.effective()
    }

    /// Effective size as of the last [`update`](Self::update).
    pub fn effective(&self) -> Option<Size> {
        self.state.effective()
    }

    /// `sizes` hint for `image` laid out in `mode`, as of `now`.
    pub fn sizes_hint(&mut self, mode: SizingMode, image: &ResolvedImage, now: Duration) -> f64 {
        let measured = self.update(now);
        sizes_hint(mode, image, measured)
    }

    /// Whether any reporter is still attached.
    pub fn is_connected(&self) -> bool {
        self.connected
    }
}

impl Drop for SizeWatcher {
    fn drop(&mut self) {
        debug!("size watcher released");
    }
}
