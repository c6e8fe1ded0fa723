use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Instruction-side view of the address space. Fetch only needs half-words;
/// the wider reads are for tools that inspect data.
pub trait Bus {
    fn read_u8(&mut self, addr: u64) -> Result<u8>;
    fn read_u16(&mut self, addr: u64) -> Result<u16>;
    fn read_u32(&mut self, addr: u64) -> Result<u32>;
    fn write_u8(&mut self, addr: u64, val: u8) -> Result<()>;
    fn write_u16(&mut self, addr: u64, val: u16) -> Result<()>;
    fn write_u32(&mut self, addr: u64, val: u32) -> Result<()>;
}

#[derive(Clone, Serialize, Deserialize)]
pub struct LinearMemory {
    pub mem: Vec<u8>,
    pub base: u64,
}

impl LinearMemory {
    pub fn new(size: usize) -> Self {
        Self {
            mem: vec![0; size],
            base: 0,
        }
    }

    /// Memory initialised from an image mapped at `base`.
    pub fn with_image(base: u64, image: &[u8]) -> Self {
        Self {
            mem: image.to_vec(),
            base,
        }
    }

    /// Little-endian load of a sequence of 32-bit and 16-bit words.
    pub fn load_words(&mut self, addr: u64, words: &[u32]) -> Result<()> {
        let mut at = addr;
        for &w in words {
            if w & 0b11 == 0b11 {
                self.write_u32(at, w)?;
                at += 4;
            } else {
                self.write_u16(at, w as u16)?;
                at += 2;
            }
        }
        Ok(())
    }

    fn range(&self, addr: u64, len: usize) -> Result<std::ops::Range<usize>> {
        let off = addr.checked_sub(self.base).map(|o| o as usize);
        match off {
            Some(off) if off.checked_add(len).map_or(false, |end| end <= self.mem.len()) => {
                Ok(off..off + len)
            }
            _ => bail!("address {addr:#x} (+{len}) outside memory"),
        }
    }
}

impl Bus for LinearMemory {
    fn read_u8(&mut self, addr: u64) -> Result<u8> {
        let r = self.range(addr, 1)?;
        Ok(self.mem[r.start])
    }
    fn read_u16(&mut self, addr: u64) -> Result<u16> {
        let r = self.range(addr, 2)?;
        Ok(u16::from_le_bytes([self.mem[r.start], self.mem[r.start + 1]]))
    }
    fn read_u32(&mut self, addr: u64) -> Result<u32> {
        let r = self.range(addr, 4)?;
        let mut b = [0u8; 4];
        b.copy_from_slice(&self.mem[r]);
        Ok(u32::from_le_bytes(b))
    }
    fn write_u8(&mut self, addr: u64, val: u8) -> Result<()> {
        let r = self.range(addr, 1)?;
        self.mem[r.start] = val;
        Ok(())
    }
    fn write_u16(&mut self, addr: u64, val: u16) -> Result<()> {
        let r = self.range(addr, 2)?;
        self.mem[r].copy_from_slice(&val.to_le_bytes());
        Ok(())
    }
    fn write_u32(&mut self, addr: u64, val: u32) -> Result<()> {
        let r = self.range(addr, 4)?;
        self.mem[r].copy_from_slice(&val.to_le_bytes());
        Ok(())
    }
}
