use anyhow::{bail, Result};
use riscv_rs::Bus;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct Segment {
    pub name: String,
    pub base: u64,
    pub bytes: Vec<u8>,
    pub perms: &'static str, // e.g., "r-x"
    pub kind: &'static str,  // e.g., "raw"
}

impl Segment {
    pub fn end(&self) -> u64 {
        self.base.wrapping_add(self.bytes.len() as u64)
    }

    fn contains(&self, addr: u64) -> bool {
        addr >= self.base && addr < self.end()
    }
}

/// Loaded program image; read-only from the decoder's point of view.
#[derive(Debug, Clone)]
pub struct Image {
    pub segments: Vec<Segment>,
}

impl Image {
    pub fn from_bytes(base: u64, bytes: &[u8]) -> Self {
        let seg = Segment {
            name: "segment0".into(),
            base,
            bytes: bytes.to_vec(),
            perms: "r-x",
            kind: "raw",
        };
        Self { segments: vec![seg] }
    }

    pub fn first_base(&self) -> Option<u64> {
        self.segments.first().map(|s| s.base)
    }
}

pub fn load_raw_bin(path: &Path, base: u64, skip: usize, len: Option<usize>) -> Result<Image> {
    let file = std::fs::read(path)?;
    anyhow::ensure!(skip <= file.len(), "--skip exceeds file size");
    let mut payload = &file[skip..];
    if let Some(lim) = len {
        anyhow::ensure!(lim <= payload.len(), "--len exceeds remaining file size after skip");
        payload = &payload[..lim];
    }
    Ok(Image::from_bytes(base, payload))
}

pub fn read_u8(img: &Image, addr: u64) -> Option<u8> {
    img.segments
        .iter()
        .find(|s| s.contains(addr))
        .map(|s| s.bytes[(addr - s.base) as usize])
}

pub fn read_bytes(img: &Image, addr: u64, len: usize) -> Option<Vec<u8>> {
    (0..len as u64).map(|i| read_u8(img, addr.wrapping_add(i))).collect()
}

pub fn is_mapped(img: &Image, addr: u64) -> bool {
    img.segments.iter().any(|s| s.contains(addr))
}

impl Bus for Image {
    fn read_u8(&mut self, addr: u64) -> Result<u8> {
        match read_u8(self, addr) {
            Some(b) => Ok(b),
            None => bail!("{addr:#x} is not mapped"),
        }
    }
    fn read_u16(&mut self, addr: u64) -> Result<u16> {
        match read_bytes(self, addr, 2) {
            Some(b) => Ok(u16::from_le_bytes([b[0], b[1]])),
            None => bail!("{addr:#x} is not mapped"),
        }
    }
    fn read_u32(&mut self, addr: u64) -> Result<u32> {
        match read_bytes(self, addr, 4) {
            Some(b) => Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]])),
            None => bail!("{addr:#x} is not mapped"),
        }
    }
    fn write_u8(&mut self, addr: u64, _val: u8) -> Result<()> {
        bail!("image is read-only (write at {addr:#x})")
    }
    fn write_u16(&mut self, addr: u64, _val: u16) -> Result<()> {
        bail!("image is read-only (write at {addr:#x})")
    }
    fn write_u32(&mut self, addr: u64, _val: u32) -> Result<()> {
        bail!("image is read-only (write at {addr:#x})")
    }
}
