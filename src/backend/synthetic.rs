/*
 * Copyright 2019 German Research Center for Artificial Intelligence (DFKI)
 * Author: Clemens Lutz <clemens.lutz@dfki.de>
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *   http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! A deterministic backend that reports fixed counts.
//!
//! Useful to exercise sessions and registries on machines without counter
//! hardware (CI, containers), and to check aggregation exactly: every stop
//! reports the configured count for each event.
//!
//!     use papi_observer::backend::synthetic::SyntheticBackend;
//!     use papi_observer::event::Event;
//!
//!     let backend = SyntheticBackend::new()
//!         .with_count(Event::TOT_CYC, 1000)
//!         .with_unsupported(Event::FSQ_INS);
//!

use super::Backend;
use crate::error::{ErrorKind, Result};
use crate::event::Event;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const ESYS: i32 = -3;
const ENOTRUN: i32 = -9;
const EISRUN: i32 = -10;

/// Backend reporting configured counts instead of hardware values.
#[derive(Debug, Default)]
pub struct SyntheticBackend {
    counts: BTreeMap<Event, i64>,
    default_count: i64,
    unsupported: BTreeSet<Event>,
    fail_create: bool,
    fail_start: bool,
    fail_stop: bool,
    registered_threads: AtomicUsize,
    unregistered_threads: AtomicUsize,
    live_event_sets: Arc<AtomicUsize>,
}

/// Event set handed out by `SyntheticBackend`.
#[derive(Debug)]
pub struct SyntheticEventSet {
    events: Vec<Event>,
    running: bool,
    live: Arc<AtomicUsize>,
}

impl SyntheticBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports `count` for `event` on every stop.
    pub fn with_count(mut self, event: Event, count: i64) -> Self {
        self.counts.insert(event, count);
        self
    }

    /// Reports `count` for every event without an explicit count.
    pub fn with_default_count(mut self, count: i64) -> Self {
        self.default_count = count;
        self
    }

    /// Rejects `event` as not countable on this "hardware".
    pub fn with_unsupported(mut self, event: Event) -> Self {
        self.unsupported.insert(event);
        self
    }

    pub fn failing_create(mut self) -> Self {
        self.fail_create = true;
        self
    }

    pub fn failing_start(mut self) -> Self {
        self.fail_start = true;
        self
    }

    pub fn failing_stop(mut self) -> Self {
        self.fail_stop = true;
        self
    }

    /// Number of `register_thread` calls so far.
    pub fn registered_threads(&self) -> usize {
        self.registered_threads.load(Ordering::SeqCst)
    }

    /// Number of `unregister_thread` calls so far.
    pub fn unregistered_threads(&self) -> usize {
        self.unregistered_threads.load(Ordering::SeqCst)
    }

    /// Number of event sets created and not yet dropped.
    pub fn live_event_sets(&self) -> usize {
        self.live_event_sets.load(Ordering::SeqCst)
    }

    fn count_of(&self, event: Event) -> i64 {
        self.counts
            .get(&event)
            .copied()
            .unwrap_or(self.default_count)
    }
}

impl Backend for SyntheticBackend {
    type EventSet = SyntheticEventSet;

    fn create_event_set(&self) -> Result<Self::EventSet> {
        if self.fail_create {
            Err(ErrorKind::BackendError(ESYS, "cannot create event set".into()))?;
        }

        self.live_event_sets.fetch_add(1, Ordering::SeqCst);
        Ok(SyntheticEventSet {
            events: Vec::new(),
            running: false,
            live: Arc::clone(&self.live_event_sets),
        })
    }

    fn add_event(&self, event_set: &mut Self::EventSet, event: Event) -> Result<()> {
        if event_set.running {
            Err(ErrorKind::BackendError(EISRUN, "event set is running".into()))?;
        }
        if self.unsupported.contains(&event) {
            Err(ErrorKind::UnsupportedEvent(event))?;
        }

        event_set.events.push(event);
        Ok(())
    }

    fn start(&self, event_set: &mut Self::EventSet) -> Result<()> {
        if self.fail_start {
            Err(ErrorKind::BackendError(ESYS, "cannot arm counters".into()))?;
        }
        if event_set.running {
            Err(ErrorKind::BackendError(EISRUN, "event set is running".into()))?;
        }

        event_set.running = true;
        Ok(())
    }

    fn stop(&self, event_set: &mut Self::EventSet, values: &mut [i64]) -> Result<()> {
        if self.fail_stop {
            Err(ErrorKind::BackendError(ESYS, "cannot disarm counters".into()))?;
        }
        if !event_set.running {
            Err(ErrorKind::BackendError(ENOTRUN, "event set is not running".into()))?;
        }
        if values.len() != event_set.events.len() {
            Err(ErrorKind::InvalidArgument(format!(
                "result buffer holds {} values, event set has {} events",
                values.len(),
                event_set.events.len()
            )))?;
        }

        for (value, event) in values.iter_mut().zip(event_set.events.iter()) {
            *value = self.count_of(*event);
        }
        event_set.running = false;

        Ok(())
    }

    fn register_thread(&self) -> Result<()> {
        self.registered_threads.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn unregister_thread(&self) -> Result<()> {
        self.unregistered_threads.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl Drop for SyntheticEventSet {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}
