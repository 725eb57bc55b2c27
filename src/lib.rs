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

//! Hardware counter observers.
//!
//! Count hardware events around a piece of code, either on a single thread
//! with a `Session`, or on every worker of a thread group with an
//! `AggregateRegistry` that sums up the per-thread counts.
//!
//! The counting library is hidden behind the `Backend` trait. With the `papi`
//! feature, `Papi` counts real hardware events; `SyntheticBackend` reports
//! fixed values and runs anywhere.

#![recursion_limit = "1024"]

#[cfg(feature = "papi")]
extern crate libc;
#[cfg(feature = "papi")]
extern crate papi_sys;
extern crate serde;
extern crate toml;

#[macro_use]
extern crate error_chain;

#[macro_use]
extern crate serde_derive;

pub mod backend;
pub mod error;
pub mod event;
pub mod registry;
pub mod report;
pub mod session;

pub use crate::backend::Backend;
#[cfg(feature = "papi")]
pub use crate::backend::papi::Papi;
pub use crate::error::{Error, ErrorKind, Result};
pub use crate::event::Event;
pub use crate::registry::AggregateRegistry;
pub use crate::report::Report;
pub use crate::session::{Session, SessionOptions, UnsupportedPolicy};

use crate::event::CACHE_AND_IDLE;
use crate::session::DEFAULT_MAX_EVENTS;
use std::collections::BTreeMap;
use std::fs;
use std::io::Read;
use std::path;

/// Name of the built-in preset holding `event::CACHE_AND_IDLE`.
pub const CACHE_AND_IDLE_PRESET: &str = "cache_and_idle";

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    presets: Option<BTreeMap<String, Vec<String>>>,
    max_events: Option<usize>,
    on_unsupported: Option<UnsupportedPolicy>,
}

impl Config {
    /// Load configuration file in TOML format
    ///
    pub fn from_path(config: &path::Path) -> Result<Self> {
        let mut input = String::new();

        fs::File::open(config).and_then(|mut f| f.read_to_string(&mut input))?;

        Self::parse_str(&input)
    }

    /// Load configuration from a string in TOML format
    ///
    ///     # use papi_observer::Config;
    ///     let config_str = r#"
    ///     max_events = 4
    ///     on_unsupported = "skip"
    ///
    ///     [presets]
    ///     Test1 = ["PAPI_TOT_INS", "PAPI_TOT_CYC"]
    ///     Test2 = ["PAPI_L3_TCA", "PAPI_L3_TCM"]
    ///     "#;
    ///
    ///     let config = Config::parse_str(&config_str);
    ///     assert!(config.is_ok());
    ///
    pub fn parse_str(config: &str) -> Result<Self> {
        let deserialized: Self = toml::from_str(config)?;

        if deserialized.max_events == Some(0) {
            Err(ErrorKind::InvalidArgument(
                "max_events must be at least 1".into(),
            ))?;
        }

        Ok(deserialized)
    }

    /// Session options, with defaults for everything not configured.
    pub fn options(&self) -> SessionOptions {
        SessionOptions {
            max_events: self.max_events.unwrap_or(DEFAULT_MAX_EVENTS),
            on_unsupported: self.on_unsupported.unwrap_or_default(),
        }
    }

    /// Resolves the events of a preset.
    ///
    /// Configured presets take precedence over the built-in
    /// `cache_and_idle` preset.
    pub fn preset(&self, name: &str) -> Result<Vec<Event>> {
        let configured = self.presets.as_ref().and_then(|presets| presets.get(name));

        match configured {
            Some(names) => names.iter().map(|n| n.parse()).collect(),
            None if name == CACHE_AND_IDLE_PRESET => Ok(CACHE_AND_IDLE.to_vec()),
            None => Err(ErrorKind::InvalidArgument(format!("Preset {} doesn't exist", name)).into()),
        }
    }
}
