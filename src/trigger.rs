//! Debug-trigger (Sdtrig) hooks consulted around instruction fetch.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// When the armed triggers want to be asked.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CheckTimings: u8 {
        const BEFORE = 1 << 0;
        const AFTER = 1 << 1;
    }
}

bitflags! {
    /// Kind of access being matched; `TIMING` marks the after-fetch query.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub struct TriggerOp: u8 {
        const EXECUTE = 1 << 0;
        const LOAD = 1 << 1;
        const STORE = 1 << 2;
        const TIMING = 1 << 3;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerAction {
    #[default]
    None,
    BreakpointException,
    DebugMode,
}

pub trait TriggerModule {
    fn check_timings(&self) -> CheckTimings;
    fn check_hit(&mut self, op: TriggerOp, addr: u64, value: Option<u64>) -> TriggerAction;
    fn handle(&mut self, action: TriggerAction);
}

/// Runs the before-fetch query for `pc`.
pub(crate) fn before_fetch(tm: &mut dyn TriggerModule, pc: u64) {
    let mut action = TriggerAction::None;
    if tm.check_timings().contains(CheckTimings::BEFORE) {
        action = tm.check_hit(TriggerOp::EXECUTE, pc, None);
    }
    tm.handle(action);
}

/// Runs the after-fetch query for `pc` with the fetched word.
pub(crate) fn after_fetch(tm: &mut dyn TriggerModule, pc: u64, raw: u32) {
    let mut action = TriggerAction::None;
    if tm.check_timings().contains(CheckTimings::AFTER) {
        action = tm.check_hit(TriggerOp::EXECUTE | TriggerOp::TIMING, pc, Some(raw as u64));
    }
    tm.handle(action);
}
