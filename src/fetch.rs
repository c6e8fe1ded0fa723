use anyhow::Error;
use tracing::trace;

use crate::decoder::{DecodeContext, Decoder, Op};
use crate::memory::Bus;
use crate::trigger::{self, TriggerModule};

#[derive(thiserror::Error, Debug)]
pub enum Trap {
    #[error("instruction access fault at {addr:#x}: {source}")]
    InstrAccessFault {
        addr: u64,
        #[source]
        source: Error,
    },
}

impl Trap {
    pub fn addr(&self) -> u64 {
        match self {
            Trap::InstrAccessFault { addr, .. } => *addr,
        }
    }
}

/// Fetch `len` bytes (2 or 4) at `*snpc` and advance it.
pub fn instr_fetch<B: Bus + ?Sized>(bus: &mut B, snpc: &mut u64, len: u8) -> Result<u32, Trap> {
    let addr = *snpc;
    let word = if len == 2 {
        bus.read_u16(addr).map(u32::from)
    } else {
        bus.read_u32(addr)
    }
    .map_err(|source| {
        trace!(addr, "instruction fetch failed");
        Trap::InstrAccessFault { addr, source }
    })?;
    *snpc = addr.wrapping_add(len as u64);
    Ok(word)
}

/// Fetch and decode the instruction at `s.pc`. Every other field of `s`
/// is reset first.
///
/// Fetch goes half-word by half-word; the second half is read only when the
/// quadrant bits say the word is full width. On `Err` the context is
/// partially filled and must not be consumed.
pub fn fetch_decode<B, D>(
    bus: &mut B,
    dec: &D,
    s: &mut DecodeContext,
    mut triggers: Option<&mut dyn TriggerModule>,
) -> Result<Op, Trap>
where
    B: Bus + ?Sized,
    D: Decoder + ?Sized,
{
    s.reset(s.pc);
    let hooks = dec.sdtrig();

    if hooks {
        if let Some(tm) = triggers.as_deref_mut() {
            trigger::before_fetch(tm, s.pc);
        }
    }

    let lo = instr_fetch(bus, &mut s.snpc, 2)?;
    let raw = if lo & 0b11 == 0b11 {
        let hi = instr_fetch(bus, &mut s.snpc, 2)?;
        (hi << 16) | lo
    } else {
        lo
    };
    s.raw = raw;
    s.width = s.snpc.wrapping_sub(s.pc) as u8;

    if hooks {
        if let Some(tm) = triggers.as_deref_mut() {
            trigger::after_fetch(tm, s.pc, s.raw);
        }
    }

    Ok(dec.decode(s))
}
