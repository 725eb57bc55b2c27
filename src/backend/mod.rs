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

//! Hardware counting backends.
//!
//! A backend value is the capability token of an initialized counting
//! library: it is created once by the caller (e.g. `Papi::init`), and
//! sessions and registries borrow it for their whole lifetime.
//!
//! Event set handles are owned by the caller and released by their `Drop`
//! implementation. They must be `Send` so that a registry can store them in
//! slots shared between worker threads, but every call on a handle is made
//! from the thread that created it.

use crate::error::Result;
use crate::event::Event;

#[cfg(feature = "papi")]
pub mod papi;
pub mod synthetic;

/// The primitives a counter session needs from a counting library.
pub trait Backend: Sync {
    /// A backend-side group of events that are counted together.
    type EventSet: Send;

    /// Creates an empty event set.
    fn create_event_set(&self) -> Result<Self::EventSet>;

    /// Adds an event to an idle event set.
    ///
    /// Returns `ErrorKind::UnsupportedEvent` if the hardware cannot count
    /// the event; any other failure is a `BackendError`.
    fn add_event(&self, event_set: &mut Self::EventSet, event: Event) -> Result<()>;

    /// Arms the event set. Counters start from zero.
    fn start(&self, event_set: &mut Self::EventSet) -> Result<()>;

    /// Disarms the event set and writes one value per added event into
    /// `values`, in the order the events were added.
    fn stop(&self, event_set: &mut Self::EventSet, values: &mut [i64]) -> Result<()>;

    /// Registers the calling thread for multi-threaded counting.
    fn register_thread(&self) -> Result<()>;

    /// Releases the calling thread's counting context.
    fn unregister_thread(&self) -> Result<()>;
}
