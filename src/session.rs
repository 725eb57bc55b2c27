// Copyright 2019 German Research Center for Artificial Intelligence (DFKI)
// Author: Clemens Lutz <clemens.lutz@dfki.de>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! A single-threaded counter session.
//!
//! A session owns one backend event set. Events are registered while the
//! session is idle, counted between `start` and `stop`, and read back once
//! the session is idle again.
//!
//! # Thread Safety
//!
//! A session must be driven from the thread that created it. Backends such
//! as PAPI keep per-thread state for their event sets. Use an
//! `AggregateRegistry` to count on several threads.
//!
//! # Examples
//!
//!      # use std::error::Error;
//!      # use std::result::Result;
//!      use papi_observer::backend::synthetic::SyntheticBackend;
//!      use papi_observer::event::Event;
//!      use papi_observer::session::{Session, SessionOptions};
//!      #
//!      # fn main() -> Result<(), Box<dyn Error>> {
//!
//!      let backend = SyntheticBackend::new().with_count(Event::TOT_CYC, 500);
//!
//!      let mut session = Session::new(&backend, SessionOptions::default())?;
//!      session.register_event(Event::TOT_CYC)?;
//!
//!      session.start()?;
//!      work();
//!      session.stop()?;
//!
//!      assert_eq!(session.result(Event::TOT_CYC)?, 500);
//!      # Ok(())
//!      # }
//!      #
//!      # fn work() {
//!      #     let collected: u32 = (0..100).map(|x| x * 2).filter(|x| x % 3 == 0).sum();
//!      #     println!("Summed up {}", collected);
//!      # }

use crate::backend::Backend;
use crate::error::{ErrorKind, Result};
use crate::event::Event;
use crate::Config;
use log::{debug, warn};
use std::fmt;

/// Upper bound of events per session unless configured otherwise.
pub const DEFAULT_MAX_EVENTS: usize = 16;

/// What to do when the hardware cannot count a registered event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnsupportedPolicy {
    /// Return `ErrorKind::UnsupportedEvent`.
    Fail,
    /// Record the event as not supported and leave it out of all reads.
    Skip,
}

impl Default for UnsupportedPolicy {
    fn default() -> Self {
        UnsupportedPolicy::Fail
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionOptions {
    /// Maximum number of accepted events.
    pub max_events: usize,
    pub on_unsupported: UnsupportedPolicy,
}

impl Default for SessionOptions {
    fn default() -> Self {
        SessionOptions {
            max_events: DEFAULT_MAX_EVENTS,
            on_unsupported: UnsupportedPolicy::default(),
        }
    }
}

/// A counter session over one backend event set.
pub struct Session<'b, B: Backend> {
    backend: &'b B,
    event_set: B::EventSet,
    options: SessionOptions,
    // Registration order; the index points into `values`, `None` marks an
    // event the hardware rejected.
    events: Vec<(Event, Option<usize>)>,
    values: Vec<i64>,
    running: bool,
}

impl<'b, B: Backend> Session<'b, B> {
    /// Creates an idle session without events.
    pub fn new(backend: &'b B, options: SessionOptions) -> Result<Self> {
        let event_set = backend.create_event_set()?;

        Ok(Session {
            backend,
            event_set,
            options,
            events: Vec::new(),
            values: Vec::new(),
            running: false,
        })
    }

    /// Creates an idle session and registers `events` in order.
    pub fn with_events(backend: &'b B, options: SessionOptions, events: &[Event]) -> Result<Self> {
        let mut session = Self::new(backend, options)?;
        session.register_events(events)?;
        Ok(session)
    }

    /// Adds an event to the session.
    ///
    /// Events can only be added while the session is idle. Events the
    /// hardware cannot count either fail the call or are skipped, depending on
    /// the session's `UnsupportedPolicy`. Skipped events do not count towards
    /// `max_events`.
    pub fn register_event(&mut self, event: Event) -> Result<()> {
        if self.running {
            Err(ErrorKind::InvalidState(
                "can't add events while counters are running".into(),
            ))?;
        }

        if self.events.iter().any(|&(e, _)| e == event) {
            Err(ErrorKind::DuplicateEvent(event))?;
        }

        if self.values.len() >= self.options.max_events {
            Err(ErrorKind::CapacityExceeded(self.options.max_events))?;
        }

        match self.backend.add_event(&mut self.event_set, event) {
            Ok(()) => {
                self.events.push((event, Some(self.values.len())));
                self.values.push(0);
                Ok(())
            }
            Err(e) => {
                let skip = match e.kind() {
                    ErrorKind::UnsupportedEvent(_) => {
                        self.options.on_unsupported == UnsupportedPolicy::Skip
                    }
                    _ => false,
                };
                if !skip {
                    return Err(e);
                }

                warn!("{} ({}) is not supported, skipping", event, event.description());
                self.events.push((event, None));
                Ok(())
            }
        }
    }

    pub fn register_events(&mut self, events: &[Event]) -> Result<()> {
        events
            .iter()
            .try_for_each(|&event| self.register_event(event))
    }

    /// Adds the events of a preset to the session.
    ///
    ///     # use std::error::Error;
    ///     # use std::result::Result;
    ///     use papi_observer::Config;
    ///     # use papi_observer::backend::synthetic::SyntheticBackend;
    ///     # use papi_observer::session::Session;
    ///
    ///     # fn main() -> Result<(), Box<dyn Error>> {
    ///     let config = Config::parse_str(r#"
    ///     [presets]
    ///     Branches = ["PAPI_BR_INS", "PAPI_BR_MSP"]
    ///     "#)?;
    ///
    ///     # let backend = SyntheticBackend::new();
    ///     let mut session = Session::new(&backend, config.options())?;
    ///     session.register_preset(&config, "Branches")?;
    ///     # assert_eq!(session.len(), 2);
    ///     # Ok(())
    ///     # }
    ///
    pub fn register_preset(&mut self, config: &Config, name: &str) -> Result<()> {
        let events = config.preset(name)?;
        self.register_events(&events)
    }

    /// Arms the counters. Counting starts from zero.
    pub fn start(&mut self) -> Result<()> {
        if self.running {
            Err(ErrorKind::InvalidState("counters are already running".into()))?;
        }

        if self.values.is_empty() {
            Err(ErrorKind::InvalidArgument(
                "Cannot start a session without events!".into(),
            ))?;
        }

        self.backend.start(&mut self.event_set)?;
        self.running = true;
        debug!("Started counting {} events", self.values.len());

        Ok(())
    }

    /// Disarms the counters and stores their values.
    ///
    /// If the backend fails to disarm, the session stays running.
    pub fn stop(&mut self) -> Result<()> {
        if !self.running {
            Err(ErrorKind::InvalidState("counters are not running".into()))?;
        }

        self.backend.stop(&mut self.event_set, &mut self.values)?;
        self.running = false;
        debug!("Stopped counting {} events", self.values.len());

        Ok(())
    }

    /// The count of `event` from the last `stop`, or zero before the first
    /// one.
    pub fn result(&self, event: Event) -> Result<i64> {
        if self.running {
            Err(ErrorKind::InvalidState(
                "can't get results while counters are running".into(),
            ))?;
        }

        self.events
            .iter()
            .find(|&&(e, _)| e == event)
            .and_then(|&(_, index)| index)
            .map(|index| self.values[index])
            .ok_or_else(|| ErrorKind::UnknownEvent(event).into())
    }

    /// All registered events in registration order, with `None` for events
    /// the hardware rejected.
    pub fn results(&self) -> Result<Vec<(Event, Option<i64>)>> {
        if self.running {
            Err(ErrorKind::InvalidState(
                "can't get results while counters are running".into(),
            ))?;
        }

        Ok(self
            .events
            .iter()
            .map(|&(event, index)| (event, index.map(|i| self.values[i])))
            .collect())
    }

    /// Registered events in registration order, including skipped ones.
    pub fn events(&self) -> impl Iterator<Item = Event> + '_ {
        self.events.iter().map(|&(event, _)| event)
    }

    pub fn is_supported(&self, event: Event) -> bool {
        self.events
            .iter()
            .any(|&(e, index)| e == event && index.is_some())
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Number of accepted events.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<B: Backend> fmt::Debug for Session<'_, B> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Session")
            .field("options", &self.options)
            .field("events", &self.events)
            .field("values", &self.values)
            .field("running", &self.running)
            .finish()
    }
}
