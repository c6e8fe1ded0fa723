use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};

use riscv_rs::{fetch_decode, DecodeContext, InstrType, Op, Rv64Decoder};

use crate::model::{is_mapped, Image};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    Fallthrough,
    Branch,
    CondBranch,
    Call,
}

impl EdgeKind {
    pub fn short(self) -> &'static str {
        match self {
            EdgeKind::Fallthrough => "ft",
            EdgeKind::Branch => "br",
            EdgeKind::CondBranch => "cbr",
            EdgeKind::Call => "call",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub from: u64,
    pub to: u64,
    pub kind: EdgeKind,
}

/// Everything a reachability sweep learns about an image.
#[derive(Debug, Default)]
pub struct Analysis {
    pub visited: HashSet<u64>,
    pub widths: HashMap<u64, u8>,
    pub edges: Vec<Edge>,
    /// Instructions that leave through a register (ret, jr, trap entry/return).
    pub rets: HashSet<u64>,
    /// Words that matched nothing; the sweep stops there.
    pub invalid: HashSet<u64>,
}

/// Link register of a jump, if it writes one.
fn links(s: &DecodeContext) -> bool {
    s.dest.reg().map_or(false, |r| r != 0)
}

pub fn analyze_entries(
    img: &mut Image,
    dec: &Rv64Decoder,
    entries: &[u64],
    max_instr: usize,
) -> Analysis {
    let mut a = Analysis::default();
    let mut queue: VecDeque<u64> = entries.iter().copied().filter(|&e| is_mapped(img, e)).collect();
    let mut steps = 0usize;

    while let Some(pc) = queue.pop_front() {
        if steps >= max_instr {
            tracing::debug!(steps, "instruction limit reached");
            break;
        }
        if !a.visited.insert(pc) {
            continue;
        }
        let mut s = DecodeContext::new(pc);
        if let Err(trap) = fetch_decode(img, dec, &mut s, None) {
            tracing::trace!(pc, %trap, "fetch failed during sweep");
            a.visited.remove(&pc);
            continue;
        }
        steps += 1;
        a.widths.insert(pc, s.width);
        if s.op == Op::Inv {
            a.invalid.insert(pc);
            continue;
        }

        let ft = s.snpc;
        let follow = |a: &mut Analysis, to: u64, kind: EdgeKind, q: &mut VecDeque<u64>| {
            a.edges.push(Edge { from: pc, to, kind });
            if is_mapped(img, to) && !a.visited.contains(&to) {
                q.push_back(to);
            }
        };
        match s.ty {
            InstrType::Jump if links(&s) => {
                follow(&mut a, s.jnpc, EdgeKind::Call, &mut queue);
                follow(&mut a, ft, EdgeKind::Fallthrough, &mut queue);
            }
            InstrType::Jump => follow(&mut a, s.jnpc, EdgeKind::Branch, &mut queue),
            InstrType::Branch => {
                follow(&mut a, s.jnpc, EdgeKind::CondBranch, &mut queue);
                follow(&mut a, ft, EdgeKind::Fallthrough, &mut queue);
            }
            // Indirect call: target unknown, but control comes back.
            InstrType::Indirect if links(&s) => {
                follow(&mut a, ft, EdgeKind::Fallthrough, &mut queue)
            }
            InstrType::Indirect => {
                a.rets.insert(pc);
            }
            InstrType::Normal => {
                if is_mapped(img, ft) && !a.visited.contains(&ft) {
                    queue.push_back(ft);
                }
            }
        }
    }
    a
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Block {
    pub start: u64,
    pub end: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct EdgeOut {
    pub from: u64,
    pub to: u64,
    pub kind: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FunctionOut {
    pub entry: u64,
    pub blocks: Vec<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Label {
    pub addr: u64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report<Blk = Block> {
    pub entries: Vec<u64>,
    pub blocks: Vec<Blk>,
    pub edges: Vec<EdgeOut>,
    pub functions: Vec<FunctionOut>,
    pub labels: Vec<Label>,
}

/// Basic blocks plus a pc -> block-start map. Blocks open at every seed and
/// edge target and close after a jump, an exit, or before the next start.
pub fn build_blocks(a: &Analysis, seeds: &[u64]) -> (Vec<Block>, HashMap<u64, u64>) {
    let mut starts: Vec<u64> = seeds.iter().copied().chain(a.edges.iter().map(|e| e.to)).collect();
    starts.sort_unstable();
    starts.dedup();

    let ends_flow: HashSet<u64> = a
        .edges
        .iter()
        .filter(|e| e.kind == EdgeKind::Branch)
        .map(|e| e.from)
        .chain(a.rets.iter().copied())
        .chain(a.invalid.iter().copied())
        .collect();

    let mut blocks = Vec::new();
    let mut owner: HashMap<u64, u64> = HashMap::new();
    for &start in &starts {
        if !a.visited.contains(&start) || owner.contains_key(&start) {
            continue;
        }
        let mut cur = start;
        while let Some(&w) = a.widths.get(&cur) {
            owner.insert(cur, start);
            let next = cur.wrapping_add(u64::from(w));
            if ends_flow.contains(&cur)
                || !a.visited.contains(&next)
                || starts.binary_search(&next).is_ok()
            {
                blocks.push(Block { start, end: next });
                break;
            }
            cur = next;
        }
    }
    (blocks, owner)
}

pub fn block_edges(a: &Analysis, owner: &HashMap<u64, u64>) -> Vec<EdgeOut> {
    a.edges
        .iter()
        .map(|e| EdgeOut {
            from: owner.get(&e.from).copied().unwrap_or(e.from),
            to: e.to,
            kind: e.kind.short().to_string(),
        })
        .collect()
}

/// One function per seed: every block reachable from it over block edges.
pub fn functions(seeds: &[u64], edges: &[EdgeOut]) -> Vec<FunctionOut> {
    let mut adj: HashMap<u64, Vec<u64>> = HashMap::new();
    for e in edges {
        adj.entry(e.from).or_default().push(e.to);
    }
    seeds
        .iter()
        .map(|&entry| {
            let mut seen: HashSet<u64> = HashSet::new();
            let mut q = VecDeque::from([entry]);
            while let Some(b) = q.pop_front() {
                if seen.insert(b) {
                    q.extend(adj.get(&b).into_iter().flatten().copied());
                }
            }
            let mut blocks: Vec<u64> = seen.into_iter().collect();
            blocks.sort_unstable();
            FunctionOut { entry, blocks }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use riscv_rs::IsaConfig;

    fn image(base: u64, words: &[u32]) -> Image {
        let mut bytes = Vec::new();
        for &w in words {
            if w & 0b11 == 0b11 {
                bytes.extend_from_slice(&w.to_le_bytes());
            } else {
                bytes.extend_from_slice(&(w as u16).to_le_bytes());
            }
        }
        Image::from_bytes(base, &bytes)
    }

    fn sample() -> Image {
        image(
            0,
            &[
                0x0010_0093, // 0x00 addi x1, x0, 1
                0x0000_8463, // 0x04 beq x1, x0, 0x0c
                0x0080_00EF, // 0x08 jal x1, 0x10
                0x8082,      // 0x0c c.jr ra
                0x0001,      // 0x0e c.nop
                0x0000_8067, // 0x10 ret
            ],
        )
    }

    fn has(a: &Analysis, from: u64, to: u64, kind: EdgeKind) -> bool {
        a.edges.contains(&Edge { from, to, kind })
    }

    #[test]
    fn edges_follow_instruction_classes() {
        let dec = Rv64Decoder::new(IsaConfig::default()).unwrap();
        let mut img = sample();
        let a = analyze_entries(&mut img, &dec, &[0], 100);

        let mut seen: Vec<u64> = a.visited.iter().copied().collect();
        seen.sort_unstable();
        assert_eq!(seen, vec![0x00, 0x04, 0x08, 0x0C, 0x10]);
        assert_eq!(a.widths[&0x0C], 2);

        assert!(has(&a, 0x04, 0x0C, EdgeKind::CondBranch));
        assert!(has(&a, 0x04, 0x08, EdgeKind::Fallthrough));
        assert!(has(&a, 0x08, 0x10, EdgeKind::Call));
        assert!(has(&a, 0x08, 0x0C, EdgeKind::Fallthrough));
        assert_eq!(a.edges.len(), 4);
        assert_eq!(a.rets, HashSet::from([0x0C, 0x10]));
    }

    #[test]
    fn blocks_split_at_targets_and_exits() {
        let dec = Rv64Decoder::new(IsaConfig::default()).unwrap();
        let mut img = sample();
        let a = analyze_entries(&mut img, &dec, &[0], 100);
        let (mut blocks, owner) = build_blocks(&a, &[0]);
        blocks.sort_by_key(|b| b.start);
        assert_eq!(
            blocks,
            vec![
                Block { start: 0x00, end: 0x08 },
                Block { start: 0x08, end: 0x0C },
                Block { start: 0x0C, end: 0x0E },
                Block { start: 0x10, end: 0x14 },
            ]
        );
        assert_eq!(owner[&0x04], 0x00);

        let fns = functions(&[0], &block_edges(&a, &owner));
        assert_eq!(fns[0].blocks, vec![0x00, 0x08, 0x0C, 0x10]);
    }

    #[test]
    fn unconditional_jump_has_no_fallthrough() {
        let dec = Rv64Decoder::new(IsaConfig::default()).unwrap();
        // 0x1000: jal x0, 0x1008 ; 0x1004: unreachable ; 0x1008: ret
        let mut img = image(0x1000, &[0x0080_006F, 0x0000_0013, 0x0000_8067]);
        let a = analyze_entries(&mut img, &dec, &[0x1000], 100);
        assert!(has(&a, 0x1000, 0x1008, EdgeKind::Branch));
        assert!(!a.visited.contains(&0x1004));
        let (blocks, _) = build_blocks(&a, &[0x1000]);
        assert!(blocks.contains(&Block { start: 0x1000, end: 0x1004 }));
    }

    #[test]
    fn sweep_stops_at_invalid_and_unmapped() {
        let dec = Rv64Decoder::new(IsaConfig::default()).unwrap();
        // all-zero half-word is reserved; a branch target outside the image is not queued
        let mut img = image(0, &[0x0000_8463, 0x0000, 0x0000, 0x0000]);
        let a = analyze_entries(&mut img, &dec, &[0, 0x400], 100);
        assert!(a.invalid.contains(&0x04));
        assert!(a.visited.contains(&0x08));
        assert!(!a.visited.contains(&0x400));
    }
}
