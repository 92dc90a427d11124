//! Verbose memory display: one colored line of memory per step.
//!
//! This is debug tooling layered on the [`Observer`] capability; the
//! execution core knows nothing about it. Each step prints every cell
//! left-justified in a fixed-width column, highlighting the cell at the
//! program counter in green and the decoded `a`/`b`/`c` operand cells in
//! red, yellow, and cyan. An optional selector restricts which addresses
//! are shown (it never affects execution).

use crate::error::VmError;
use crate::inst::{INST_SZ, decode};
use crate::memory::Memory;
use crate::observer::Observer;

const DISPLAY_SPACING: usize = 10;

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const RESET: &str = "\x1b[0m";

/// Parse a comma-separated address selector like `13,14,15`.
pub fn parse_selectors(s: &str) -> Result<Vec<usize>, VmError> {
    if !s.chars().all(|ch| ch.is_ascii_digit() || ch == ',') {
        return Err(VmError::Config(format!("bad dump format string '{s}'")));
    }
    s.split(',')
        .map(|part| {
            part.parse()
                .map_err(|_| VmError::Config(format!("bad dump format string '{s}'")))
        })
        .collect()
}

/// Observer that prints a memory dump line before every step.
pub struct MemoryDump {
    selectors: Option<Vec<usize>>,
}

impl MemoryDump {
    pub fn new(selectors: Option<Vec<usize>>) -> Self {
        Self { selectors }
    }

    fn shown(&self, i: usize) -> bool {
        match &self.selectors {
            Some(sel) => sel.contains(&i),
            None => true,
        }
    }

    /// Render one dump line. Operand comparisons use the raw decoded
    /// addresses, so a negative `a` highlights no cell, matching the
    /// reference display.
    fn line(&self, mem: &Memory, pc: usize) -> String {
        let (a, b, c) = decode(mem.cells()[pc], INST_SZ);
        let mut out = String::new();
        for (i, &value) in mem.cells().iter().enumerate() {
            if !self.shown(i) {
                continue;
            }
            let i = i as i64;
            let special = i == pc as i64 || i == a || i == b || i == c;
            let cell = if special {
                format!("{value:<w$}", w = DISPLAY_SPACING - 3)
            } else {
                format!("{value:<DISPLAY_SPACING$}")
            };
            if i == pc as i64 {
                out.push_str(&format!("{GREEN}PC:{cell}{RESET}"));
            } else if i == a {
                out.push_str(&format!("{RED}A: {cell}{RESET}"));
            } else if i == b {
                out.push_str(&format!("{YELLOW}B: {cell}{RESET}"));
            } else if i == c {
                out.push_str(&format!("{CYAN}C: {cell}{RESET}"));
            } else {
                out.push_str(&cell);
            }
        }
        out
    }
}

impl Observer for MemoryDump {
    fn init(&mut self, mem: &Memory) {
        // Column header, only useful when a selector narrows the view.
        if let Some(sel) = &self.selectors {
            let header: String = (0..mem.len())
                .filter(|i| sel.contains(i))
                .map(|i| format!("{i:<DISPLAY_SPACING$}"))
                .collect();
            println!("{header}");
        }
    }

    fn observe(&mut self, mem: &Memory, pc: usize) {
        println!("{}", self.line(mem, pc));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inst::encode;

    #[test]
    fn test_parse_selectors() {
        assert_eq!(parse_selectors("13,14,15").unwrap(), vec![13, 14, 15]);
        assert_eq!(parse_selectors("0").unwrap(), vec![0]);
    }

    #[test]
    fn test_parse_selectors_rejects_junk() {
        assert!(matches!(parse_selectors("1,x"), Err(VmError::Config(_))));
        assert!(matches!(parse_selectors("1,,2"), Err(VmError::Config(_))));
        assert!(matches!(parse_selectors("-3"), Err(VmError::Config(_))));
    }

    #[test]
    fn test_line_highlights_pc_and_operands() {
        let mut mem = Memory::new(8);
        mem.write(0, encode(3, 4, 6, INST_SZ)).unwrap();
        let dump = MemoryDump::new(None);
        let line = dump.line(&mem, 0);
        assert!(line.contains("PC:"));
        assert!(line.contains("A: "));
        assert!(line.contains("B: "));
        assert!(line.contains("C: "));
    }

    #[test]
    fn test_line_respects_selector() {
        let mut mem = Memory::new(8);
        mem.write(5, 42).unwrap();
        let dump = MemoryDump::new(Some(vec![5]));
        let line = dump.line(&mem, 0);
        assert!(line.contains("42"));
        assert!(!line.contains("PC:"));
    }
}
