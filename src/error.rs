/*
 * Copyright 2018 German Research Center for Artificial Intelligence (DFKI)
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

//! Error types shared by sessions, registries and backends.
//!
//! None of these errors is fatal to the process; every failure is returned to
//! the caller.

use crate::event::Event;

error_chain! {
    foreign_links {
        Io(::std::io::Error);
        Toml(::toml::de::Error);
    }

    errors {
        BackendInitFailure(msg: String) {
            description("counter backend failed to initialize")
            display("Counter backend failed to initialize: {}", msg)
        }

        BackendError(code: i32, msg: String) {
            description("counter backend call failed")
            display("Counter backend call failed with code {}: {}", code, msg)
        }

        InvalidState(msg: String) {
            description("operation not allowed in the current state")
            display("Invalid state: {}", msg)
        }

        CapacityExceeded(max: usize) {
            description("too many events")
            display("Cannot register more than {} events", max)
        }

        UnsupportedEvent(event: Event) {
            description("event not supported by the hardware")
            display("Event {} is not supported on this hardware", event)
        }

        UnknownEvent(event: Event) {
            description("event was not registered")
            display("Event {} hasn't been registered", event)
        }

        DuplicateEvent(event: Event) {
            description("event registered twice")
            display("Event {} is already registered", event)
        }

        GroupExhausted(thread: usize) {
            description("thread already finished in this thread group")
            display("Thread {} already finished; create a new thread group first", thread)
        }

        TotalOverflow(event: Event) {
            description("aggregated total out of range")
            display("Total of event {} overflowed", event)
        }

        StillRunning {
            description("counters are still running")
            display("Can't get results while counters are running")
        }

        InvalidArgument(msg: String) {
            description("invalid argument")
            display("Invalid argument: {}", msg)
        }

        InvalidEventName(name: String) {
            description("unknown event name")
            display("Unknown event name '{}'", name)
        }

        InvalidEventCode(code: u32) {
            description("unknown event code")
            display("Unknown event code {:#x}", code)
        }
    }
}
