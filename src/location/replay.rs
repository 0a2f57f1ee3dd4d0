use std::{
    collections::HashMap,
    path::Path,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
        mpsc::Sender,
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use log::{debug, error, info, warn};

use crate::{
    HomeboundError,
    navigation::{Coordinate, NavigationEvent, NavigationOutput},
};

use super::{LocationEvent, LocationOptions, LocationProvider, PositionFix, WatchHandle};

const STOP_POLL_MS: u64 = 50;

struct ReplayWatch {
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl ReplayWatch {
    fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(thread) = self.thread.take()
            && thread.join().is_err()
        {
            error!("Replay thread panicked");
        }
    }
}

/// Replays a recorded position track as if it came from a GPS receiver.
///
/// Each subscription gets its own thread walking the track from the start.
/// The subscription's distance and interval filters are applied while
/// replaying, and a [`LocationEvent::Finished`] event marks the end of the
/// track.
pub struct ReplayLocationProvider {
    fixes: Arc<Vec<PositionFix>>,
    next_handle: u64,
    watches: HashMap<WatchHandle, ReplayWatch>,
}

impl ReplayLocationProvider {
    pub fn from_fixes(fixes: Vec<PositionFix>) -> Self {
        Self {
            fixes: Arc::new(fixes),
            next_handle: 1,
            watches: HashMap::new(),
        }
    }

    /// Load the position fixes of a navigation record written by
    /// [`crate::writer::write_navigation`]. Route entries are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or a line is not a valid
    /// navigation record entry.
    pub fn from_file(file: &Path) -> Result<Self, HomeboundError> {
        let fixes = serde_jsonlines::json_lines(file)
            .map_err(|e| HomeboundError::ReplayFileError { source: e })?
            .collect::<Result<Vec<NavigationOutput>, std::io::Error>>()
            .map_err(|e| HomeboundError::ReplayFileError { source: e })?
            .into_iter()
            .filter_map(|output| match output {
                NavigationOutput::Position(fix) => Some(fix),
                NavigationOutput::Route { .. } => None,
            })
            .collect::<Vec<_>>();

        let provider = Self::from_fixes(fixes);
        if provider.is_empty() {
            warn!("Replay file {:?} contains no position fixes", file);
        } else {
            info!("Loaded {} position fixes from {:?}", provider.len(), file);
        }
        Ok(provider)
    }

    pub fn len(&self) -> usize {
        self.fixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixes.is_empty()
    }
}

impl LocationProvider for ReplayLocationProvider {
    fn subscribe(
        &mut self,
        options: &LocationOptions,
        sink: Sender<NavigationEvent>,
    ) -> Result<WatchHandle, HomeboundError> {
        let handle = WatchHandle(self.next_handle);
        self.next_handle += 1;

        if !options.high_accuracy {
            debug!("Replay ignores the accuracy setting, fixes are replayed as recorded");
        }

        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = stop.clone();
        let fixes = self.fixes.clone();
        let options = options.clone();
        let thread = thread::Builder::new()
            .name(format!("replay-{}", handle.0))
            .spawn(move || replay_fixes(&fixes, &options, &thread_stop, &sink))
            .map_err(|e| HomeboundError::LocationSubscriptionError {
                reason: e.to_string(),
            })?;

        self.watches.insert(
            handle,
            ReplayWatch {
                stop,
                thread: Some(thread),
            },
        );
        Ok(handle)
    }

    fn unsubscribe(&mut self, handle: WatchHandle) -> Result<(), HomeboundError> {
        let mut watch =
            self.watches
                .remove(&handle)
                .ok_or(HomeboundError::LocationSubscriptionError {
                    reason: format!("unknown watch handle {}", handle.0),
                })?;
        watch.stop();
        Ok(())
    }
}

impl Drop for ReplayLocationProvider {
    fn drop(&mut self) {
        for (_, mut watch) in self.watches.drain() {
            watch.stop();
        }
    }
}

fn replay_fixes(
    fixes: &[PositionFix],
    options: &LocationOptions,
    stop: &AtomicBool,
    sink: &Sender<NavigationEvent>,
) {
    let mut last_emitted: Option<Coordinate> = None;

    for fix in fixes {
        if stop.load(Ordering::Relaxed) {
            return;
        }

        let coordinate = Coordinate::from(fix);
        if !coordinate.is_finite() {
            warn!("Skipping invalid recorded fix at {}", fix.timestamp_ms);
            let event = LocationEvent::Error(format!(
                "invalid coordinates in fix at {}",
                fix.timestamp_ms
            ));
            if sink.send(event.into()).is_err() {
                return;
            }
            continue;
        }

        if let Some(last) = last_emitted {
            if last.distance_m(&coordinate) < options.min_distance_m {
                continue;
            }
            if !wait_interval(options.min_interval_ms, stop) {
                return;
            }
        }

        if sink.send(LocationEvent::Fix(fix.clone()).into()).is_err() {
            debug!("Location receiver dropped, stopping replay");
            return;
        }
        last_emitted = Some(coordinate);
    }

    let _ = sink.send(LocationEvent::Finished.into());
}

/// Sleeps for `interval_ms` in short slices. Returns false when stopped early.
fn wait_interval(interval_ms: u64, stop: &AtomicBool) -> bool {
    let mut remaining = interval_ms;
    while remaining > 0 {
        if stop.load(Ordering::Relaxed) {
            return false;
        }
        let slice = remaining.min(STOP_POLL_MS);
        thread::sleep(Duration::from_millis(slice));
        remaining -= slice;
    }
    !stop.load(Ordering::Relaxed)
}
