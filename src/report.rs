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

//! Textual reports of counter values.
//!
//! A report prints one line per event with its description and value,
//! followed by a single line starting with `MARKER` that lists the raw values
//! in registration order. Scripts can grep for the marker line:
//!
//! ```text
//! PAPI_L3_TCA (L3 total cache accesses): 5120
//! PAPI_FSQ_INS (FSq ins): NOT SUPPORTED
//! PAPI_TOT_CYC (Total cycles executed): 981234
//! For extracting the results (printed in the same order as registered):
//! @%@ 5120 981234
//! ```

use crate::backend::Backend;
use crate::error::Result;
use crate::event::Event;
use crate::registry::AggregateRegistry;
use crate::session::Session;
use std::fmt;

/// Prefix of the machine-parsable line.
pub const MARKER: &str = "@%@";

/// A snapshot of counter values, ready to print.
#[derive(Clone, Debug, PartialEq)]
pub struct Report {
    entries: Vec<(Event, Option<i64>)>,
    ratios: bool,
}

impl Report {
    /// Builds a report from events in registration order; `None` marks an
    /// event that is not supported.
    pub fn new(entries: Vec<(Event, Option<i64>)>) -> Self {
        Report {
            entries,
            ratios: false,
        }
    }

    /// Snapshots an idle session.
    pub fn from_session<B: Backend>(session: &Session<'_, B>) -> Result<Self> {
        Ok(Self::new(session.results()?))
    }

    /// Snapshots the totals of a registry with no running thread.
    pub fn from_registry<B: Backend>(registry: &AggregateRegistry<'_, B>) -> Result<Self> {
        Ok(Self::new(registry.results()?))
    }

    /// Also prints the L3 miss ratio and the stall ratio, where the report
    /// holds the events they are derived from.
    pub fn with_ratios(mut self) -> Self {
        self.ratios = true;
        self
    }

    pub fn get(&self, event: Event) -> Option<i64> {
        self.entries
            .iter()
            .find(|&&(e, _)| e == event)
            .and_then(|&(_, value)| value)
    }

    /// Values of the supported events, in registration order.
    pub fn values(&self) -> Vec<i64> {
        self.entries.iter().filter_map(|&(_, value)| value).collect()
    }

    /// Derived ratios whose events are present and whose denominator is
    /// non-zero.
    pub fn ratios(&self) -> Vec<(&'static str, f64)> {
        [
            ("L3 miss/access ratio", Event::L3_TCM, Event::L3_TCA),
            ("stall ratio", Event::RES_STL, Event::TOT_CYC),
        ]
        .iter()
        .filter_map(|&(label, numerator, denominator)| {
            match (self.get(numerator), self.get(denominator)) {
                (Some(n), Some(d)) if d != 0 => Some((label, n as f64 / d as f64)),
                _ => None,
            }
        })
        .collect()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for &(event, value) in &self.entries {
            write!(f, "{} ({}): ", event, event.description())?;
            match value {
                Some(v) => writeln!(f, "{}", v)?,
                None => writeln!(f, "NOT SUPPORTED")?,
            }
        }

        if self.ratios {
            for (label, ratio) in self.ratios() {
                writeln!(f, "{}: {}", label, ratio)?;
            }
        }

        writeln!(
            f,
            "For extracting the results (printed in the same order as registered):"
        )?;
        write!(f, "{}", MARKER)?;
        self.values()
            .iter()
            .try_for_each(|value| write!(f, " {}", value))?;
        writeln!(f)
    }
}
