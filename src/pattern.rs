//! Wildcard bit-pattern tables.
//!
//! A template has one symbol per bit, most significant first: `0` and `1` are
//! fixed bits, `?` is a don't-care. Whitespace is ignored so templates can be
//! grouped by field. Templates are compiled once into a `(mask, value)` pair;
//! lookup is first match in declaration order, and an entry may delegate to a
//! sub-table that refines the same word further.

use thiserror::Error;
use tracing::debug;

use crate::decoder::Op;
use crate::format::Format;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("template `{template}`: unexpected symbol {symbol:?}")]
    BadSymbol { template: String, symbol: char },
    #[error("table `{table}`: template `{template}` has {found} bits, expected {expected}")]
    WidthMismatch {
        table: &'static str,
        template: String,
        expected: u8,
        found: usize,
    },
    #[error("table `{table}`: entry `{template}` is unreachable behind entry #{shadowed_by}")]
    Unreachable {
        table: &'static str,
        template: String,
        shadowed_by: usize,
    },
    #[error("table `{table}` cannot delegate to `{target}`")]
    BadDelegate {
        table: &'static str,
        target: &'static str,
    },
    #[error("no table with id {0}")]
    UnknownTable(usize),
}

/// Compiled template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pattern {
    pub mask: u32,
    pub value: u32,
    pub width: u8,
}

impl Pattern {
    pub fn parse(template: &str) -> Result<Self, TableError> {
        let mut mask: u64 = 0;
        let mut value: u64 = 0;
        let mut width = 0usize;
        for ch in template.chars().filter(|c| !c.is_whitespace()) {
            mask <<= 1;
            value <<= 1;
            match ch {
                '0' => mask |= 1,
                '1' => {
                    mask |= 1;
                    value |= 1;
                }
                '?' => {}
                symbol => {
                    return Err(TableError::BadSymbol {
                        template: template.to_string(),
                        symbol,
                    })
                }
            }
            width += 1;
            if width > 32 {
                break;
            }
        }
        Ok(Self {
            mask: mask as u32,
            value: value as u32,
            width: width.min(33) as u8,
        })
    }

    #[inline]
    pub fn matches(&self, word: u32) -> bool {
        word & self.mask == self.value
    }

    /// True when every word matched by `other` is also matched by `self`.
    pub fn covers(&self, other: &Pattern) -> bool {
        self.mask & !other.mask == 0 && other.value & self.mask == self.value
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TableId(usize);

impl TableId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Op(Op),
    Table(TableId),
}

impl From<Op> for Target {
    fn from(op: Op) -> Self {
        Target::Op(op)
    }
}

impl From<TableId> for Target {
    fn from(id: TableId) -> Self {
        Target::Table(id)
    }
}

#[derive(Debug, Clone)]
pub struct Entry {
    pub pattern: Pattern,
    pub template: &'static str,
    pub format: Option<Format>,
    pub target: Target,
}

#[derive(Debug, Clone)]
pub struct Table {
    pub name: &'static str,
    pub width: u8,
    pub entries: Vec<Entry>,
}

impl Table {
    #[inline]
    fn find(&self, word: u32) -> Option<(usize, &Entry)> {
        self.entries
            .iter()
            .enumerate()
            .find(|(_, e)| e.pattern.matches(word))
    }
}

/// Result of a lookup: the identity and the innermost format on the way to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub op: Op,
    pub format: Option<Format>,
}

impl Match {
    pub const INVALID: Match = Match {
        op: Op::Inv,
        format: None,
    };
}

/// Builds tables once; every template is validated here, never at lookup.
#[derive(Debug, Default)]
pub struct TableBuilder {
    tables: Vec<Table>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(&mut self, name: &'static str, width: u8) -> TableId {
        self.tables.push(Table {
            name,
            width,
            entries: Vec::new(),
        });
        TableId(self.tables.len() - 1)
    }

    pub fn len(&self, id: TableId) -> usize {
        self.tables.get(id.0).map_or(0, |t| t.entries.len())
    }

    pub fn is_empty(&self, id: TableId) -> bool {
        self.len(id) == 0
    }

    pub fn push(
        &mut self,
        id: TableId,
        template: &'static str,
        format: Option<Format>,
        target: impl Into<Target>,
    ) -> Result<(), TableError> {
        let pattern = Pattern::parse(template)?;
        let entry = Entry {
            pattern,
            template,
            format,
            target: target.into(),
        };
        self.append(id, entry)
    }

    /// New table holding the entries of `parts`, in order.
    pub fn concat(&mut self, name: &'static str, parts: &[TableId]) -> Result<TableId, TableError> {
        let mut entries = Vec::new();
        let mut width = None;
        for &part in parts {
            let table = self.tables.get(part.0).ok_or(TableError::UnknownTable(part.0))?;
            if *width.get_or_insert(table.width) != table.width {
                return Err(TableError::BadDelegate {
                    table: name,
                    target: table.name,
                });
            }
            entries.extend(table.entries.iter().cloned());
        }
        let id = self.table(name, width.unwrap_or(32));
        for entry in entries {
            self.append(id, entry)?;
        }
        Ok(id)
    }

    fn append(&mut self, id: TableId, entry: Entry) -> Result<(), TableError> {
        let table = self.tables.get(id.0).ok_or(TableError::UnknownTable(id.0))?;
        if entry.pattern.width != table.width {
            return Err(TableError::WidthMismatch {
                table: table.name,
                template: entry.template.to_string(),
                expected: table.width,
                found: entry.pattern.width as usize,
            });
        }
        if let Target::Table(sub) = entry.target {
            // Only tables created earlier may be delegated to, so lookups cannot loop.
            let target = self.tables.get(sub.0).ok_or(TableError::UnknownTable(sub.0))?;
            if sub.0 >= id.0 || target.width != table.width {
                return Err(TableError::BadDelegate {
                    table: table.name,
                    target: target.name,
                });
            }
        }
        if let Some(i) = table
            .entries
            .iter()
            .position(|e| e.pattern.covers(&entry.pattern))
        {
            return Err(TableError::Unreachable {
                table: table.name,
                template: entry.template.to_string(),
                shadowed_by: i,
            });
        }
        self.tables[id.0].entries.push(entry);
        Ok(())
    }

    pub fn finish(self) -> DecodeTables {
        for table in &self.tables {
            debug!(table = table.name, entries = table.entries.len(), "decode table built");
        }
        DecodeTables {
            tables: self.tables,
        }
    }
}

/// Immutable set of compiled tables; safe to share between harts.
#[derive(Debug, Clone)]
pub struct DecodeTables {
    tables: Vec<Table>,
}

impl DecodeTables {
    pub fn get(&self, id: TableId) -> Option<&Table> {
        self.tables.get(id.0)
    }

    pub fn lookup(&self, root: TableId, word: u32) -> Match {
        let mut format = None;
        let mut table = match self.tables.get(root.0) {
            Some(t) => t,
            None => return Match::INVALID,
        };
        loop {
            let Some((_, entry)) = table.find(word) else {
                return Match::INVALID;
            };
            if entry.format.is_some() {
                format = entry.format;
            }
            match entry.target {
                Target::Op(Op::Inv) => return Match::INVALID,
                Target::Op(op) => return Match { op, format },
                Target::Table(sub) => table = &self.tables[sub.0],
            }
        }
    }

    /// The chain of `(table, entry index)` a lookup walks through.
    pub fn path(&self, root: TableId, word: u32) -> Vec<(TableId, usize)> {
        let mut out = Vec::new();
        let mut id = root;
        while let Some((i, entry)) = self.tables.get(id.0).and_then(|t| t.find(word)) {
            out.push((id, i));
            match entry.target {
                Target::Table(sub) => id = sub,
                Target::Op(_) => break,
            }
        }
        out
    }

    pub fn entry(&self, id: TableId, index: usize) -> Option<&Entry> {
        self.tables.get(id.0)?.entries.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_sets_mask_and_value() {
        let p = Pattern::parse("??????? ????? ????? 000 ????? 00100 11").unwrap();
        assert_eq!(p.width, 32);
        assert_eq!(p.mask, 0x0000_707F);
        assert_eq!(p.value, 0x0000_0013);
        assert!(p.matches(0x0000_0013));
        assert!(p.matches(0xFFF0_8093)); // addi x1, x1, -1
        assert!(!p.matches(0x0000_1013));
    }

    #[test]
    fn parse_rejects_unknown_symbols() {
        let err = Pattern::parse("0000 x000 0000 0000").unwrap_err();
        assert!(matches!(err, TableError::BadSymbol { symbol: 'x', .. }));
    }

    #[test]
    fn width_is_checked_against_table() {
        let mut b = TableBuilder::new();
        let t = b.table("rvc", 16);
        let err = b
            .push(t, "??????? ????? ????? 000 ????? 00100 11", None, Op::Addi)
            .unwrap_err();
        assert!(matches!(err, TableError::WidthMismatch { expected: 16, found: 32, .. }));
    }

    #[test]
    fn shadowed_entries_are_rejected() {
        let mut b = TableBuilder::new();
        let t = b.table("t", 16);
        b.push(t, "000 ? ????? ????? 01", None, Op::CAddi).unwrap();
        let err = b.push(t, "000 0 00000 00000 01", None, Op::CNop).unwrap_err();
        assert!(matches!(err, TableError::Unreachable { shadowed_by: 0, .. }));
        // Exact duplicates are shadowed too.
        let err = b.push(t, "000 ? ????? ????? 01", None, Op::CAddi).unwrap_err();
        assert!(matches!(err, TableError::Unreachable { .. }));
    }

    #[test]
    fn first_match_wins_and_refines() {
        let mut b = TableBuilder::new();
        let t = b.table("t", 16);
        b.push(t, "000 ? 00000 ????? 01", None, Op::CNop).unwrap();
        b.push(t, "000 ? ????? ????? 01", None, Op::CAddi).unwrap();
        let tables = b.finish();
        assert_eq!(tables.lookup(t, 0x0001).op, Op::CNop);
        assert_eq!(tables.lookup(t, 0x0085).op, Op::CAddi);
        assert_eq!(tables.lookup(t, 0x0002).op, Op::Inv);
    }

    #[test]
    fn delegation_keeps_innermost_format() {
        let mut b = TableBuilder::new();
        let sub = b.table("sub", 32);
        b.push(sub, "??????? ????? ????? 000 ????? ????? ??", None, Op::Addi).unwrap();
        b.push(sub, "??????? ????? ????? 001 ????? ????? ??", Some(Format::R), Op::Slli).unwrap();
        let main = b.table("main", 32);
        b.push(main, "??????? ????? ????? ??? ????? 00100 11", Some(Format::I), sub).unwrap();
        let tables = b.finish();

        let m = tables.lookup(main, 0x0000_0013);
        assert_eq!(m, Match { op: Op::Addi, format: Some(Format::I) });
        let m = tables.lookup(main, 0x0000_1013);
        assert_eq!(m, Match { op: Op::Slli, format: Some(Format::R) });
        // Falls through the sub-table: invalid, and no format survives.
        assert_eq!(tables.lookup(main, 0x0000_2013), Match::INVALID);
        assert_eq!(tables.path(main, 0x0000_1013).len(), 2);
    }

    #[test]
    fn delegation_must_point_backwards() {
        let mut b = TableBuilder::new();
        let main = b.table("main", 32);
        let later = b.table("later", 32);
        let err = b
            .push(main, "??????? ????? ????? ??? ????? ????? ??", None, later)
            .unwrap_err();
        assert!(matches!(err, TableError::BadDelegate { .. }));
    }

    #[test]
    fn concat_preserves_order_and_checks_overlap() {
        let mut b = TableBuilder::new();
        let f = b.table("f", 32);
        b.push(f, "??????? ????? ????? 010 ????? ????? ??", None, Op::Flw).unwrap();
        let d = b.table("d", 32);
        b.push(d, "??????? ????? ????? 011 ????? ????? ??", None, Op::Fld).unwrap();
        let both = b.concat("fload", &[f, d]).unwrap();
        assert_eq!(b.len(both), 2);

        let dup = b.concat("dup", &[f, f]).unwrap_err();
        assert!(matches!(dup, TableError::Unreachable { .. }));
    }
}
