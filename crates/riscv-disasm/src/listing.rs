use riscv_rs::disasm::fmt_decoded;
use riscv_rs::{fetch_decode, DecodeContext, Op, Rv64Decoder, Trap};

use crate::analyze::Block;
use crate::model::{read_bytes, Image};

#[derive(Debug, Clone, serde::Serialize)]
pub struct BlockOut {
    pub start: u64,
    pub end: u64,
    pub insns: Vec<String>,
}

/// Decode the instruction at `pc` straight from the image.
pub fn decode_at(img: &mut Image, dec: &Rv64Decoder, pc: u64) -> Result<DecodeContext, Trap> {
    let mut s = DecodeContext::new(pc);
    fetch_decode(img, dec, &mut s, None)?;
    Ok(s)
}

/// One listing line. Unmatched words print as data.
pub fn render(img: &Image, s: &DecodeContext, show_bytes: bool) -> String {
    let text = match (s.op, s.width) {
        (Op::Inv, 2) => format!(".half {:#06x}", s.raw),
        (Op::Inv, _) => format!(".word {:#010x}", s.raw),
        _ => fmt_decoded(s),
    };
    if !show_bytes {
        return format!("{:#010x}: {text}", s.pc);
    }
    let bytes = read_bytes(img, s.pc, usize::from(s.width)).unwrap_or_default();
    let mut line = format!("{:#010x}: ", s.pc);
    for b in bytes {
        line.push_str(&format!("{b:02x} "));
    }
    // keep text aligned across 2- and 4-byte forms
    for _ in s.width..4 {
        line.push_str("   ");
    }
    line.push_str("  ");
    line.push_str(&text);
    line
}

pub fn enrich_blocks_with_mnemonics(
    img: &mut Image,
    dec: &Rv64Decoder,
    blocks: &[Block],
    show_bytes: bool,
) -> Vec<BlockOut> {
    blocks
        .iter()
        .map(|b| {
            let mut insns = Vec::new();
            let mut pc = b.start;
            while pc < b.end {
                let Ok(s) = decode_at(img, dec, pc) else { break };
                insns.push(render(img, &s, show_bytes));
                pc = s.snpc;
            }
            BlockOut {
                start: b.start,
                end: b.end,
                insns,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use riscv_rs::IsaConfig;

    #[test]
    fn renders_code_and_data() {
        let dec = Rv64Decoder::new(IsaConfig::default()).unwrap();
        // addi x1, x2, -1 ; reserved half-word
        let mut bytes = 0xFFF1_0093u32.to_le_bytes().to_vec();
        bytes.extend_from_slice(&[0, 0]);
        let mut img = Image::from_bytes(0x100, &bytes);

        let s = decode_at(&mut img, &dec, 0x100).unwrap();
        assert_eq!(s.snpc, 0x104);
        assert!(render(&img, &s, false).ends_with(fmt_decoded(&s).as_str()));
        assert!(render(&img, &s, true).starts_with("0x00000100: 93 00 f1 ff"));

        let s = decode_at(&mut img, &dec, 0x104).unwrap();
        assert_eq!(render(&img, &s, false), "0x00000104: .half 0x0000");
        assert!(decode_at(&mut img, &dec, 0x106).is_err());
    }

    #[test]
    fn blocks_carry_their_instructions() {
        let dec = Rv64Decoder::new(IsaConfig::default()).unwrap();
        // c.li a0, 5 ; ret
        let mut bytes = 0x4515u16.to_le_bytes().to_vec();
        bytes.extend_from_slice(&0x0000_8067u32.to_le_bytes());
        let mut img = Image::from_bytes(0, &bytes);
        let out = enrich_blocks_with_mnemonics(&mut img, &dec, &[Block { start: 0, end: 6 }], false);
        assert_eq!(out[0].insns.len(), 2);
        assert_eq!(out[0].insns[0], "0x00000000: c.li x10, 5");
    }
}
