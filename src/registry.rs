// Copyright 2019 German Research Center for Artificial Intelligence (DFKI)
// Author: Clemens Lutz <clemens.lutz@dfki.de>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Per-thread counter sessions aggregated into process-wide totals.
//!
//! An `AggregateRegistry` counts a fixed list of events on every worker of a
//! thread group. Each worker starts and stops its own slot; on `stop`, the
//! worker's counts are added to totals shared by the whole registry.
//!
//! # Thread Groups
//!
//! `create_thread_group(n)` prepares `n` idle slots. Each slot can run once
//! per group: after its `stop`, the slot is finished and rejects `start` with
//! `GroupExhausted` until the next `create_thread_group`. A new group does
//! not reset the totals; sums accumulate over the registry's lifetime until
//! `reset` is called.
//!
//! # Thread Safety
//!
//! Workers share `&AggregateRegistry` and only touch their own slot. A slot
//! must be stopped by the OS thread that started it. Creating a group and
//! resetting totals take `&mut self`, so they cannot overlap with workers.
//! Results should be read after all workers have been joined.
//!
//! Dropping a registry while a slot is still running releases that slot's
//! session on the dropping thread, and the thread that started it is never
//! unregistered from the backend. Stop every slot before dropping.
//!
//! # Examples
//!
//!      # use std::error::Error;
//!      # use std::result::Result;
//!      use papi_observer::backend::synthetic::SyntheticBackend;
//!      use papi_observer::event::Event;
//!      use papi_observer::registry::AggregateRegistry;
//!      use papi_observer::session::SessionOptions;
//!      use std::thread;
//!      #
//!      # fn main() -> Result<(), Box<dyn Error>> {
//!
//!      let backend = SyntheticBackend::new().with_count(Event::TOT_CYC, 100);
//!      let mut registry =
//!          AggregateRegistry::new(&backend, &[Event::TOT_CYC], SessionOptions::default())?;
//!
//!      registry.create_thread_group(2)?;
//!      thread::scope(|s| {
//!          for tid in 0..2 {
//!              let registry = &registry;
//!              s.spawn(move || -> papi_observer::Result<()> {
//!                  registry.start(tid)?;
//!                  // Do some work
//!                  registry.stop(tid)
//!              });
//!          }
//!      });
//!
//!      assert_eq!(registry.result(Event::TOT_CYC)?, 200);
//!      # Ok(())
//!      # }

use crate::backend::Backend;
use crate::error::{ErrorKind, Result};
use crate::event::Event;
use crate::session::{Session, SessionOptions};
use crate::Config;
use log::{debug, warn};
use std::collections::BTreeMap;
use std::fmt;
use std::mem;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};

enum Slot<'b, B: Backend> {
    Idle,
    Running {
        owner: ThreadId,
        session: Session<'b, B>,
    },
    Finished,
}

/// Aggregated value of one tracked event.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Total {
    /// No thread has stopped since creation or the last reset.
    Pending,
    Counted(i64),
    /// Every thread that stopped skipped the event as unsupported.
    Unsupported,
}

impl Total {
    /// Folds one thread's value into the total. `None` is a skipped event.
    fn merge(self, event: Event, value: Option<i64>) -> Result<Total> {
        match (self, value) {
            (Total::Counted(sum), Some(v)) => sum
                .checked_add(v)
                .map(Total::Counted)
                .ok_or_else(|| ErrorKind::TotalOverflow(event).into()),
            (_, Some(v)) => Ok(Total::Counted(v)),
            (Total::Pending, None) => Ok(Total::Unsupported),
            (total, None) => Ok(total),
        }
    }

    fn value(self) -> Option<i64> {
        match self {
            Total::Pending => Some(0),
            Total::Counted(sum) => Some(sum),
            Total::Unsupported => None,
        }
    }
}

/// Counts the same events on every worker of a thread group and sums them up.
pub struct AggregateRegistry<'b, B: Backend> {
    backend: &'b B,
    events: Vec<Event>,
    options: SessionOptions,
    slots: Vec<Mutex<Slot<'b, B>>>,
    totals: Mutex<BTreeMap<Event, Total>>,
}

// Slots stay consistent across a panicking worker; the lock only serves as a
// cell, so a poisoned lock is still usable.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<'b, B: Backend> AggregateRegistry<'b, B> {
    /// Creates a registry tracking `events`, with an empty thread group.
    ///
    /// Every tracked event starts with a total of zero.
    pub fn new(backend: &'b B, events: &[Event], options: SessionOptions) -> Result<Self> {
        if events.is_empty() {
            Err(ErrorKind::InvalidArgument(
                "Cannot create a registry without events!".into(),
            ))?;
        }
        if events.len() > options.max_events {
            Err(ErrorKind::CapacityExceeded(options.max_events))?;
        }

        let mut totals = BTreeMap::new();
        for &event in events {
            if totals.insert(event, Total::Pending).is_some() {
                Err(ErrorKind::DuplicateEvent(event))?;
            }
        }

        Ok(AggregateRegistry {
            backend,
            events: events.to_vec(),
            options,
            slots: Vec::new(),
            totals: Mutex::new(totals),
        })
    }

    /// Creates a registry tracking the events of a configured preset.
    pub fn from_preset(backend: &'b B, config: &Config, name: &str) -> Result<Self> {
        let events = config.preset(name)?;
        Self::new(backend, &events, config.options())
    }

    /// Replaces the current thread group by `n` idle slots.
    ///
    /// Totals are kept. Fails with `StillRunning` if a slot of the current
    /// group has been started but not stopped.
    pub fn create_thread_group(&mut self, n: usize) -> Result<()> {
        self.ensure_stopped()?;

        self.slots = (0..n).map(|_| Mutex::new(Slot::Idle)).collect();
        debug!("Created thread group of {} threads", n);

        Ok(())
    }

    /// Starts counting on slot `tid` from the calling OS thread.
    ///
    /// The calling thread is registered with the backend and gets its own
    /// session with the registry's events. If any step fails, the slot stays
    /// idle. An OS thread may run only one slot at a time, as the backend
    /// registers threads, not slots.
    pub fn start(&self, tid: usize) -> Result<()> {
        let current = thread::current().id();
        let slot = self.slot(tid)?;

        // Only the calling thread creates slots it owns, so checking before
        // locking our own slot cannot race.
        let owned = self.slots.iter().enumerate().find(|&(other, s)| {
            other != tid
                && match *lock(s) {
                    Slot::Running { owner, .. } => owner == current,
                    _ => false,
                }
        });
        if let Some((other, _)) = owned {
            Err(ErrorKind::InvalidState(format!(
                "this OS thread already runs thread {}",
                other
            )))?;
        }

        let mut slot = lock(slot);

        match *slot {
            Slot::Idle => {}
            Slot::Running { .. } => Err(ErrorKind::InvalidState(format!(
                "thread {} is already running",
                tid
            )))?,
            Slot::Finished => Err(ErrorKind::GroupExhausted(tid))?,
        }

        self.backend.register_thread()?;

        let started = Session::new(self.backend, self.options).and_then(|mut session| {
            session.register_events(&self.events)?;
            session.start()?;
            Ok(session)
        });

        match started {
            Ok(session) => {
                *slot = Slot::Running {
                    owner: current,
                    session,
                };
                debug!("Thread {} started counting", tid);
                Ok(())
            }
            Err(e) => {
                if let Err(unregister) = self.backend.unregister_thread() {
                    warn!("Failed to unregister thread {}: {}", tid, unregister);
                }
                Err(e)
            }
        }
    }

    /// Stops counting on slot `tid` and adds its counts to the totals.
    ///
    /// Must be called from the OS thread that started the slot. On success,
    /// the slot is finished for the current thread group. If the backend
    /// fails to stop, or a total would overflow, nothing is added and the
    /// slot goes back to idle.
    pub fn stop(&self, tid: usize) -> Result<()> {
        let mut slot = lock(self.slot(tid)?);
        let current = thread::current().id();

        let mut session = match mem::replace(&mut *slot, Slot::Idle) {
            Slot::Running { owner, session } if owner == current => session,
            Slot::Running { owner, session } => {
                *slot = Slot::Running { owner, session };
                return Err(ErrorKind::InvalidState(format!(
                    "thread {} must be stopped by the OS thread that started it",
                    tid
                ))
                .into());
            }
            other => {
                *slot = other;
                return Err(
                    ErrorKind::InvalidState(format!("thread {} is not running", tid)).into(),
                );
            }
        };

        let added = session.stop().and_then(|()| {
            let mut totals = lock(&self.totals);
            let merged = session
                .results()?
                .into_iter()
                .map(|(event, value)| -> Result<(Event, Total)> {
                    let total = totals
                        .get(&event)
                        .copied()
                        .ok_or_else(|| ErrorKind::UnknownEvent(event))?;
                    Ok((event, total.merge(event, value)?))
                })
                .collect::<Result<Vec<_>>>()?;

            totals.extend(merged);
            Ok(())
        });

        drop(session);

        if let Err(e) = added {
            if let Err(unregister) = self.backend.unregister_thread() {
                warn!("Failed to unregister thread {}: {}", tid, unregister);
            }
            return Err(e);
        }

        *slot = Slot::Finished;
        debug!("Thread {} finished counting", tid);

        self.backend.unregister_thread()
    }

    /// The sum of `event` over every thread that stopped since the registry
    /// was created or last reset.
    ///
    /// Fails with `UnknownEvent` if `event` is not tracked, or if every thread
    /// that stopped skipped it as unsupported.
    pub fn result(&self, event: Event) -> Result<i64> {
        self.ensure_stopped()?;

        lock(&self.totals)
            .get(&event)
            .and_then(|total| total.value())
            .ok_or_else(|| ErrorKind::UnknownEvent(event).into())
    }

    /// All tracked events with their sums, in tracking order; `None` marks an
    /// event no thread could count.
    pub fn results(&self) -> Result<Vec<(Event, Option<i64>)>> {
        self.ensure_stopped()?;

        let totals = lock(&self.totals);
        Ok(self
            .events
            .iter()
            .map(|event| {
                let value = totals.get(event).map_or(Some(0), |total| total.value());
                (*event, value)
            })
            .collect())
    }

    /// Sets all totals back to zero.
    pub fn reset(&mut self) -> Result<()> {
        self.ensure_stopped()?;

        lock(&self.totals)
            .values_mut()
            .for_each(|total| *total = Total::Pending);

        Ok(())
    }

    /// Size of the current thread group.
    pub fn thread_count(&self) -> usize {
        self.slots.len()
    }

    /// Tracked events in tracking order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn is_running(&self, tid: usize) -> bool {
        self.slots
            .get(tid)
            .map_or(false, |slot| matches!(*lock(slot), Slot::Running { .. }))
    }

    pub fn is_finished(&self, tid: usize) -> bool {
        self.slots
            .get(tid)
            .map_or(false, |slot| matches!(*lock(slot), Slot::Finished))
    }

    fn slot(&self, tid: usize) -> Result<&Mutex<Slot<'b, B>>> {
        self.slots.get(tid).ok_or_else(|| {
            ErrorKind::InvalidArgument(format!(
                "thread {} is not part of the thread group of {}",
                tid,
                self.slots.len()
            ))
            .into()
        })
    }

    fn ensure_stopped(&self) -> Result<()> {
        if (0..self.slots.len()).any(|tid| self.is_running(tid)) {
            Err(ErrorKind::StillRunning)?;
        }

        Ok(())
    }
}

impl<'b, B: Backend> Drop for AggregateRegistry<'b, B> {
    fn drop(&mut self) {
        for (tid, slot) in self.slots.iter_mut().enumerate() {
            let slot = slot.get_mut().unwrap_or_else(PoisonError::into_inner);
            if let Slot::Running { .. } = *slot {
                warn!(
                    "Dropping registry while thread {} is running; its counters are released without unregistering the thread",
                    tid
                );
            }
        }
    }
}

impl<B: Backend> fmt::Debug for AggregateRegistry<'_, B> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("AggregateRegistry")
            .field("events", &self.events)
            .field("options", &self.options)
            .field("threads", &self.slots.len())
            .field("totals", &*lock(&self.totals))
            .finish()
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::backend::synthetic::SyntheticBackend;
    use crate::event::CACHE_AND_IDLE;
    use crate::session::UnsupportedPolicy;

    fn run_group(registry: &AggregateRegistry<'_, SyntheticBackend>) {
        thread::scope(|s| {
            for tid in 0..registry.thread_count() {
                s.spawn(move || {
                    registry.start(tid).unwrap();
                    registry.stop(tid).unwrap();
                });
            }
        });
    }

    #[test]
    fn sums_over_threads() {
        let backend = SyntheticBackend::new().with_default_count(7);
        let mut registry =
            AggregateRegistry::new(&backend, &CACHE_AND_IDLE, SessionOptions::default()).unwrap();

        registry.create_thread_group(4).unwrap();
        run_group(&registry);

        for &event in CACHE_AND_IDLE.iter() {
            assert_eq!(registry.result(event).unwrap(), 4 * 7);
        }
        assert_eq!(backend.registered_threads(), 4);
        assert_eq!(backend.unregistered_threads(), 4);
        assert_eq!(backend.live_event_sets(), 0);
    }

    #[test]
    fn totals_persist_across_groups() {
        let backend = SyntheticBackend::new().with_count(Event::TOT_CYC, 5);
        let mut registry =
            AggregateRegistry::new(&backend, &[Event::TOT_CYC], SessionOptions::default())
                .unwrap();

        registry.create_thread_group(2).unwrap();
        run_group(&registry);
        assert_eq!(registry.result(Event::TOT_CYC).unwrap(), 10);

        registry.create_thread_group(1).unwrap();
        assert!(!registry.is_finished(0));
        run_group(&registry);
        assert_eq!(registry.result(Event::TOT_CYC).unwrap(), 15);
    }

    #[test]
    fn reset_clears_totals() {
        let backend = SyntheticBackend::new().with_count(Event::TOT_CYC, 5);
        let mut registry =
            AggregateRegistry::new(&backend, &[Event::TOT_CYC], SessionOptions::default())
                .unwrap();

        registry.create_thread_group(3).unwrap();
        run_group(&registry);
        registry.reset().unwrap();
        assert_eq!(registry.result(Event::TOT_CYC).unwrap(), 0);
    }

    #[test]
    fn finished_slot_rejects_start() {
        let backend = SyntheticBackend::new();
        let mut registry =
            AggregateRegistry::new(&backend, &[Event::TOT_CYC], SessionOptions::default())
                .unwrap();

        registry.create_thread_group(1).unwrap();
        registry.start(0).unwrap();
        registry.stop(0).unwrap();
        assert!(registry.is_finished(0));

        match registry.start(0).unwrap_err().kind() {
            ErrorKind::GroupExhausted(0) => {}
            other => panic!("unexpected error {:?}", other),
        }

        registry.create_thread_group(1).unwrap();
        registry.start(0).unwrap();
        registry.stop(0).unwrap();
    }

    #[test]
    fn result_while_running() {
        let backend = SyntheticBackend::new();
        let mut registry =
            AggregateRegistry::new(&backend, &[Event::TOT_CYC], SessionOptions::default())
                .unwrap();

        registry.create_thread_group(2).unwrap();
        registry.start(1).unwrap();
        assert!(registry.is_running(1));

        match registry.result(Event::TOT_CYC).unwrap_err().kind() {
            ErrorKind::StillRunning => {}
            other => panic!("unexpected error {:?}", other),
        }
        assert!(registry.results().is_err());
        assert!(registry.reset().is_err());
        assert!(registry.create_thread_group(2).is_err());

        registry.stop(1).unwrap();
        assert_eq!(registry.result(Event::TOT_CYC).unwrap(), 0);
    }

    #[test]
    fn unknown_event() {
        let backend = SyntheticBackend::new();
        let registry =
            AggregateRegistry::new(&backend, &[Event::TOT_CYC], SessionOptions::default())
                .unwrap();

        match registry.result(Event::L2_TCM).unwrap_err().kind() {
            ErrorKind::UnknownEvent(Event::L2_TCM) => {}
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn stop_without_start() {
        let backend = SyntheticBackend::new();
        let mut registry =
            AggregateRegistry::new(&backend, &[Event::TOT_CYC], SessionOptions::default())
                .unwrap();
        registry.create_thread_group(1).unwrap();

        match registry.stop(0).unwrap_err().kind() {
            ErrorKind::InvalidState(_) => {}
            other => panic!("unexpected error {:?}", other),
        }
        assert!(!registry.is_finished(0));
    }

    #[test]
    fn thread_out_of_range() {
        let backend = SyntheticBackend::new();
        let mut registry =
            AggregateRegistry::new(&backend, &[Event::TOT_CYC], SessionOptions::default())
                .unwrap();
        assert!(registry.start(0).is_err());

        registry.create_thread_group(2).unwrap();
        match registry.start(2).unwrap_err().kind() {
            ErrorKind::InvalidArgument(_) => {}
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn stop_from_other_thread() {
        let backend = SyntheticBackend::new();
        let mut registry =
            AggregateRegistry::new(&backend, &[Event::TOT_CYC], SessionOptions::default())
                .unwrap();
        registry.create_thread_group(1).unwrap();
        registry.start(0).unwrap();

        let registry = &registry;
        let stopped_elsewhere = thread::scope(|s| {
            s.spawn(move || registry.stop(0).map_err(|e| e.to_string()))
                .join()
                .unwrap()
        });
        assert!(stopped_elsewhere.is_err());
        assert!(registry.is_running(0));

        registry.stop(0).unwrap();
    }

    #[test]
    fn failed_start_leaves_slot_idle() {
        let backend = SyntheticBackend::new().failing_start();
        let mut registry =
            AggregateRegistry::new(&backend, &[Event::TOT_CYC], SessionOptions::default())
                .unwrap();
        registry.create_thread_group(1).unwrap();

        match registry.start(0).unwrap_err().kind() {
            ErrorKind::BackendError(_, _) => {}
            other => panic!("unexpected error {:?}", other),
        }
        assert!(!registry.is_running(0));
        assert!(!registry.is_finished(0));
        assert_eq!(backend.unregistered_threads(), 1);
        assert_eq!(backend.live_event_sets(), 0);
    }

    #[test]
    fn failed_stop_adds_nothing() {
        let backend = SyntheticBackend::new()
            .with_default_count(3)
            .failing_stop();
        let mut registry =
            AggregateRegistry::new(&backend, &[Event::TOT_CYC], SessionOptions::default())
                .unwrap();
        registry.create_thread_group(1).unwrap();
        registry.start(0).unwrap();

        assert!(registry.stop(0).is_err());
        assert!(!registry.is_running(0));
        assert_eq!(registry.result(Event::TOT_CYC).unwrap(), 0);
    }

    #[test]
    fn unsupported_events() {
        let backend = SyntheticBackend::new()
            .with_default_count(2)
            .with_unsupported(Event::MEM_WCY);

        let mut strict =
            AggregateRegistry::new(&backend, &CACHE_AND_IDLE, SessionOptions::default()).unwrap();
        strict.create_thread_group(1).unwrap();
        match strict.start(0).unwrap_err().kind() {
            ErrorKind::UnsupportedEvent(Event::MEM_WCY) => {}
            other => panic!("unexpected error {:?}", other),
        }

        let options = SessionOptions {
            on_unsupported: UnsupportedPolicy::Skip,
            ..SessionOptions::default()
        };
        let mut lenient = AggregateRegistry::new(&backend, &CACHE_AND_IDLE, options).unwrap();
        lenient.create_thread_group(2).unwrap();
        run_group(&lenient);

        match lenient.result(Event::MEM_WCY).unwrap_err().kind() {
            ErrorKind::UnknownEvent(Event::MEM_WCY) => {}
            other => panic!("unexpected error {:?}", other),
        }
        assert_eq!(lenient.result(Event::TOT_CYC).unwrap(), 4);
        assert_eq!(
            lenient.results().unwrap(),
            vec![
                (Event::L3_TCA, Some(4)),
                (Event::L3_TCM, Some(4)),
                (Event::RES_STL, Some(4)),
                (Event::MEM_WCY, None),
                (Event::TOT_CYC, Some(4)),
            ]
        );

        lenient.reset().unwrap();
        assert_eq!(lenient.result(Event::MEM_WCY).unwrap(), 0);
    }

    #[test]
    fn overflowing_total_is_rejected() {
        let backend = SyntheticBackend::new()
            .with_count(Event::TOT_CYC, i64::MAX)
            .with_count(Event::TOT_INS, 1);
        let mut registry = AggregateRegistry::new(
            &backend,
            &[Event::TOT_INS, Event::TOT_CYC],
            SessionOptions::default(),
        )
        .unwrap();

        registry.create_thread_group(1).unwrap();
        run_group(&registry);

        registry.create_thread_group(1).unwrap();
        registry.start(0).unwrap();
        match registry.stop(0).unwrap_err().kind() {
            ErrorKind::TotalOverflow(Event::TOT_CYC) => {}
            other => panic!("unexpected error {:?}", other),
        }

        assert!(!registry.is_running(0));
        assert!(!registry.is_finished(0));
        assert_eq!(registry.result(Event::TOT_INS).unwrap(), 1);
        assert_eq!(registry.result(Event::TOT_CYC).unwrap(), i64::MAX);
        assert_eq!(backend.registered_threads(), 2);
        assert_eq!(backend.unregistered_threads(), 2);
        assert_eq!(backend.live_event_sets(), 0);
    }

    #[test]
    fn one_slot_per_os_thread() {
        let backend = SyntheticBackend::new().with_default_count(1);
        let mut registry =
            AggregateRegistry::new(&backend, &[Event::TOT_CYC], SessionOptions::default())
                .unwrap();
        registry.create_thread_group(2).unwrap();

        registry.start(0).unwrap();
        match registry.start(1).unwrap_err().kind() {
            ErrorKind::InvalidState(_) => {}
            other => panic!("unexpected error {:?}", other),
        }
        assert!(!registry.is_running(1));
        assert_eq!(backend.registered_threads(), 1);

        registry.stop(0).unwrap();
        registry.start(1).unwrap();
        registry.stop(1).unwrap();
        assert_eq!(registry.result(Event::TOT_CYC).unwrap(), 2);
    }

    #[test]
    fn drop_releases_running_slots() {
        let backend = SyntheticBackend::new();
        let mut registry =
            AggregateRegistry::new(&backend, &[Event::TOT_CYC], SessionOptions::default())
                .unwrap();
        registry.create_thread_group(1).unwrap();
        registry.start(0).unwrap();
        assert_eq!(backend.live_event_sets(), 1);

        drop(registry);
        assert_eq!(backend.live_event_sets(), 0);
        assert_eq!(backend.unregistered_threads(), 0);
    }

    #[test]
    fn invalid_event_lists() {
        let backend = SyntheticBackend::new();
        assert!(AggregateRegistry::new(&backend, &[], SessionOptions::default()).is_err());

        match AggregateRegistry::new(
            &backend,
            &[Event::TOT_CYC, Event::TOT_CYC],
            SessionOptions::default(),
        )
        .unwrap_err()
        .kind()
        {
            ErrorKind::DuplicateEvent(Event::TOT_CYC) => {}
            other => panic!("unexpected error {:?}", other),
        }

        let options = SessionOptions {
            max_events: 2,
            ..SessionOptions::default()
        };
        match AggregateRegistry::new(&backend, &CACHE_AND_IDLE, options)
            .unwrap_err()
            .kind()
        {
            ErrorKind::CapacityExceeded(2) => {}
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn results_in_tracking_order() {
        let backend = SyntheticBackend::new()
            .with_count(Event::L3_TCM, 1)
            .with_count(Event::L3_TCA, 2);
        let mut registry = AggregateRegistry::new(
            &backend,
            &[Event::L3_TCM, Event::L3_TCA],
            SessionOptions::default(),
        )
        .unwrap();
        registry.create_thread_group(3).unwrap();
        run_group(&registry);

        assert_eq!(
            registry.results().unwrap(),
            vec![(Event::L3_TCM, Some(3)), (Event::L3_TCA, Some(6))]
        );
    }
}
