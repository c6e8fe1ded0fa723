pub mod classify;
pub mod decoder;
pub mod disasm;
pub mod fetch;
pub mod format;
pub mod instructions;
pub mod memory;
pub mod pattern;
pub mod trigger;

pub mod isa;

pub use decoder::{DecodeContext, Decoder, InstrType, Op, Operand};
pub use fetch::{fetch_decode, Trap};
pub use isa::{FpuMode, IsaConfig, Rv64Decoder};
pub use memory::{Bus, LinearMemory};
pub use pattern::TableError;
pub use trigger::{CheckTimings, TriggerAction, TriggerModule, TriggerOp};
