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

//! The PAPI low-level API as a counting backend.

use super::Backend;
use crate::error::{ErrorKind, Result};
use crate::event::Event;
use log::{error, info};
use papi_sys as ffi;
use std::ffi::CStr;
use std::os::raw::c_int;
use std::ptr;

// Event exists, but cannot be counted due to hardware resource limits
const PAPI_ECNFLCT: c_int = -8;
// Event does not exist
const PAPI_ENOEVNT: c_int = -7;

/// An initialized PAPI library with thread support.
#[derive(Debug)]
pub struct Papi {
    _initialized: (),
}

/// A PAPI event set handle.
#[derive(Debug)]
pub struct PapiEventSet {
    handle: c_int,
    running: bool,
}

fn check(code: c_int) -> Result<()> {
    if code == ffi::PAPI_OK as c_int {
        return Ok(());
    }

    let msg = unsafe {
        let str_ptr = ffi::PAPI_strerror(code);
        if str_ptr.is_null() {
            String::from("unknown PAPI error")
        } else {
            CStr::from_ptr(str_ptr).to_string_lossy().into_owned()
        }
    };

    Err(ErrorKind::BackendError(code, msg).into())
}

impl Papi {
    /// Initializes the PAPI library with parallelism support.
    ///
    /// Initializing more than once is allowed; PAPI keeps the library state
    /// of the first initialization.
    pub fn init() -> Result<Self> {
        let version = unsafe { ffi::PAPI_library_init(ffi::_papi_ver_current) };
        if version != ffi::_papi_ver_current {
            Err(ErrorKind::BackendInitFailure(format!(
                "PAPI library version mismatch (returned {})",
                version
            )))?;
        }

        if unsafe { ffi::PAPI_thread_init(Some(libc::pthread_self)) } != ffi::PAPI_OK as c_int {
            Err(ErrorKind::BackendInitFailure(
                "Unable to initialize PAPI threads".into(),
            ))?;
        }

        info!("PAPI library initialized with thread support");

        Ok(Papi { _initialized: () })
    }
}

impl Backend for Papi {
    type EventSet = PapiEventSet;

    fn create_event_set(&self) -> Result<Self::EventSet> {
        let mut handle = ffi::PAPI_NULL;

        unsafe {
            check(ffi::PAPI_create_eventset(&mut handle))?;
        }

        Ok(PapiEventSet {
            handle,
            running: false,
        })
    }

    fn add_event(&self, event_set: &mut Self::EventSet, event: Event) -> Result<()> {
        let code = unsafe { ffi::PAPI_query_event(event.code()) };
        if code == PAPI_ENOEVNT {
            Err(ErrorKind::UnsupportedEvent(event))?;
        }
        check(code)?;

        match unsafe { ffi::PAPI_add_event(event_set.handle, event.code()) } {
            PAPI_ENOEVNT | PAPI_ECNFLCT => Err(ErrorKind::UnsupportedEvent(event).into()),
            code => check(code),
        }
    }

    fn start(&self, event_set: &mut Self::EventSet) -> Result<()> {
        unsafe {
            check(ffi::PAPI_start(event_set.handle))?;
        }
        event_set.running = true;

        Ok(())
    }

    fn stop(&self, event_set: &mut Self::EventSet, values: &mut [i64]) -> Result<()> {
        let num_events = unsafe { ffi::PAPI_num_events(event_set.handle) };
        if num_events < 0 {
            check(num_events)?;
        } else if num_events as usize != values.len() {
            Err(ErrorKind::InvalidArgument(format!(
                "result buffer holds {} values, event set has {} events",
                values.len(),
                num_events
            )))?;
        }

        unsafe {
            check(ffi::PAPI_stop(event_set.handle, values.as_mut_ptr()))?;
        }
        event_set.running = false;

        Ok(())
    }

    fn register_thread(&self) -> Result<()> {
        unsafe { check(ffi::PAPI_register_thread()) }
    }

    fn unregister_thread(&self) -> Result<()> {
        unsafe { check(ffi::PAPI_unregister_thread()) }
    }
}

impl Drop for PapiEventSet {
    fn drop(&mut self) {
        unsafe {
            if self.running {
                if let Err(e) = check(ffi::PAPI_stop(self.handle, ptr::null_mut())) {
                    error!("Failed to stop PAPI counters: {}", e);
                }
            }
            if let Err(e) = check(ffi::PAPI_cleanup_eventset(self.handle)) {
                error!("Failed to cleanup PAPI event set: {}", e);
            }
            if let Err(e) = check(ffi::PAPI_destroy_eventset(&mut self.handle)) {
                error!("Failed to destroy PAPI event set: {}", e);
            }
        }
    }
}
