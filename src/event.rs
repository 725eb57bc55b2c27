// Copyright 2019 German Research Center for Artificial Intelligence (DFKI)
// Author: Clemens Lutz <clemens.lutz@dfki.de>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Preset hardware event identifiers.
//!
//! An `Event` is an opaque key naming one PAPI preset metric, e.g. total
//! cycles or L3 cache misses. Each key carries a symbolic name and a short
//! human-readable description taken from a static table.
//!
//!      use papi_observer::event::Event;
//!
//!      let event: Event = "PAPI_TOT_CYC".parse().unwrap();
//!      assert_eq!(event, Event::TOT_CYC);
//!      assert_eq!(event.description(), "Total cycles executed");

use crate::error::{Error, ErrorKind, Result};
use std::fmt;
use std::str::FromStr;

/// Marks a native PAPI event code as a preset.
const PRESET_MASK: u32 = 0x8000_0000;

/// Identifier of a preset hardware event.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Event(u8);

macro_rules! presets {
    ($($name:ident => $desc:literal,)*) => {
        #[allow(non_camel_case_types, dead_code)]
        #[repr(u8)]
        enum Index {
            $($name,)*
        }

        impl Event {
            $(
                #[doc = $desc]
                pub const $name: Event = Event(Index::$name as u8);
            )*
        }

        static PRESETS: &[(&str, &str)] = &[
            $((concat!("PAPI_", stringify!($name)), $desc),)*
        ];
    };
}

presets! {
    L1_DCM => "Level 1 data cache misses",
    L1_ICM => "Level 1 instruction cache misses",
    L2_DCM => "Level 2 data cache misses",
    L2_ICM => "Level 2 instruction cache misses",
    L3_DCM => "Level 3 data cache misses",
    L3_ICM => "Level 3 instruction cache misses",
    L1_TCM => "Level 1 total cache misses",
    L2_TCM => "Level 2 total cache misses",
    L3_TCM => "Level 3 total cache misses",
    CA_SNP => "Snoops",
    CA_SHR => "Request for shared cache line (SMP)",
    CA_CLN => "Request for clean cache line (SMP)",
    CA_INV => "Request for cache line Invalidation (SMP)",
    CA_ITV => "Request for cache line Intervention (SMP)",
    L3_LDM => "Level 3 load misses",
    L3_STM => "Level 3 store misses",
    BRU_IDL => "Cycles branch units are idle",
    FXU_IDL => "Cycles integer units are idle",
    FPU_IDL => "Cycles floating point units are idle",
    LSU_IDL => "Cycles load/store units are idle",
    TLB_DM => "Data translation lookaside buffer misses",
    TLB_IM => "Instr translation lookaside buffer misses",
    TLB_TL => "Total translation lookaside buffer misses",
    L1_LDM => "Level 1 load misses",
    L1_STM => "Level 1 store misses",
    L2_LDM => "Level 2 load misses",
    L2_STM => "Level 2 store misses",
    BTAC_M => "BTAC miss",
    PRF_DM => "Prefetch data instruction caused a miss",
    L3_DCH => "Level 3 Data Cache Hit",
    TLB_SD => "Xlation lookaside buffer shootdowns (SMP)",
    CSR_FAL => "Failed store conditional instructions",
    CSR_SUC => "Successful store conditional instructions",
    CSR_TOT => "Total store conditional instructions",
    MEM_SCY => "Cycles Stalled Waiting for Memory Access",
    MEM_RCY => "Cycles Stalled Waiting for Memory Read",
    MEM_WCY => "Cycles Stalled Waiting for Memory Write",
    STL_ICY => "Cycles with No Instruction Issue",
    FUL_ICY => "Cycles with Maximum Instruction Issue",
    STL_CCY => "Cycles with No Instruction Completion",
    FUL_CCY => "Cycles with Maximum Instruction Completion",
    HW_INT => "Hardware interrupts",
    BR_UCN => "Unconditional branch instructions executed",
    BR_CN => "Conditional branch instructions executed",
    BR_TKN => "Conditional branch instructions taken",
    BR_NTK => "Conditional branch instructions not taken",
    BR_MSP => "Conditional branch instructions mispred",
    BR_PRC => "Conditional branch instructions corr. pred",
    FMA_INS => "FMA instructions completed",
    TOT_IIS => "Total instructions issued",
    TOT_INS => "Total instructions executed",
    INT_INS => "Integer instructions executed",
    FP_INS => "Floating point instructions executed",
    LD_INS => "Load instructions executed",
    SR_INS => "Store instructions executed",
    BR_INS => "Total branch instructions executed",
    VEC_INS => "Vector/SIMD instructions executed (could include integer)",
    RES_STL => "Cycles processor is stalled on resource",
    FP_STAL => "Cycles any FP units are stalled",
    TOT_CYC => "Total cycles executed",
    LST_INS => "Total load/store inst. executed",
    SYC_INS => "Sync. inst. executed",
    L1_DCH => "L1 D Cache Hit",
    L2_DCH => "L2 D Cache Hit",
    L1_DCA => "L1 D Cache Access",
    L2_DCA => "L2 D Cache Access",
    L3_DCA => "L3 D Cache Access",
    L1_DCR => "L1 D Cache Read",
    L2_DCR => "L2 D Cache Read",
    L3_DCR => "L3 D Cache Read",
    L1_DCW => "L1 D Cache Write",
    L2_DCW => "L2 D Cache Write",
    L3_DCW => "L3 D Cache Write",
    L1_ICH => "L1 instruction cache hits",
    L2_ICH => "L2 instruction cache hits",
    L3_ICH => "L3 instruction cache hits",
    L1_ICA => "L1 instruction cache accesses",
    L2_ICA => "L2 instruction cache accesses",
    L3_ICA => "L3 instruction cache accesses",
    L1_ICR => "L1 instruction cache reads",
    L2_ICR => "L2 instruction cache reads",
    L3_ICR => "L3 instruction cache reads",
    L1_ICW => "L1 instruction cache writes",
    L2_ICW => "L2 instruction cache writes",
    L3_ICW => "L3 instruction cache writes",
    L1_TCH => "L1 total cache hits",
    L2_TCH => "L2 total cache hits",
    L3_TCH => "L3 total cache hits",
    L1_TCA => "L1 total cache accesses",
    L2_TCA => "L2 total cache accesses",
    L3_TCA => "L3 total cache accesses",
    L1_TCR => "L1 total cache reads",
    L2_TCR => "L2 total cache reads",
    L3_TCR => "L3 total cache reads",
    L1_TCW => "L1 total cache writes",
    L2_TCW => "L2 total cache writes",
    L3_TCW => "L3 total cache writes",
    FML_INS => "FM ins",
    FAD_INS => "FA ins",
    FDV_INS => "FD ins",
    FSQ_INS => "FSq ins",
    FNV_INS => "Finv ins",
    FP_OPS => "Floating point operations executed",
    SP_OPS => "Floating point operations executed: optimized to count scaled single precision vector operations",
    DP_OPS => "Floating point operations executed: optimized to count scaled double precision vector operations",
    VEC_SP => "Single precision vector/SIMD instructions",
    VEC_DP => "Double precision vector/SIMD instructions",
    REF_CYC => "Reference clock cycles",
}

/// L3 cache traffic and stall cycles; the events behind the derived ratios
/// of a `Report`.
pub const CACHE_AND_IDLE: [Event; 5] = [
    Event::L3_TCA,
    Event::L3_TCM,
    Event::RES_STL,
    Event::MEM_WCY,
    Event::TOT_CYC,
];

impl Event {
    /// Looks up an event by its position in the preset table.
    pub fn from_index(index: usize) -> Option<Event> {
        if index < PRESETS.len() {
            Some(Event(index as u8))
        } else {
            None
        }
    }

    /// Looks up an event by its native PAPI preset code.
    ///
    ///     # use papi_observer::event::Event;
    ///     let event = Event::from_code(Event::TOT_CYC.code()).unwrap();
    ///     assert_eq!(event, Event::TOT_CYC);
    ///
    pub fn from_code(code: i32) -> Result<Event> {
        let raw = code as u32;
        if raw & PRESET_MASK == 0 {
            Err(ErrorKind::InvalidEventCode(raw))?;
        }

        Self::from_index((raw & !PRESET_MASK) as usize)
            .ok_or_else(|| ErrorKind::InvalidEventCode(raw).into())
    }

    /// Iterates over all preset events in table order.
    pub fn all() -> impl Iterator<Item = Event> {
        (0..PRESETS.len()).map(|i| Event(i as u8))
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// The native PAPI preset code.
    pub fn code(self) -> i32 {
        (PRESET_MASK | u32::from(self.0)) as i32
    }

    /// The symbolic name, e.g. `PAPI_TOT_CYC`.
    pub fn name(self) -> &'static str {
        PRESETS[self.index()].0
    }

    pub fn description(self) -> &'static str {
        PRESETS[self.index()].1
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Event({})", self.name())
    }
}

/// Parses a symbolic name, with or without the `PAPI_` prefix.
impl FromStr for Event {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        let short = name.trim();
        let short = if short.starts_with("PAPI_") {
            &short[5..]
        } else {
            short
        };

        PRESETS
            .iter()
            .position(|(symbol, _)| &symbol[5..] == short)
            .map(|i| Event(i as u8))
            .ok_or_else(|| ErrorKind::InvalidEventName(name.to_string()).into())
    }
}
