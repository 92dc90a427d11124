//! The subleq machine: loader, decode/execute step, memory-mapped output,
//! halt detection, and the run loop.
//!
//! The whole instruction set is one operation:
//!
//!   mem[a] -= mem[b]; if mem[a] <= 0 { goto c } else { goto pc + 1 }
//!
//! with `(a, b, c)` unpacked from the word at the program counter. Code
//! and data share one address space, so programs are self-modifying by
//! construction. The program counter is always taken modulo the memory
//! length after a step, so it can never leave the address space even
//! though the operands it points at can.

use std::io::{self, Write};
use std::time::Duration;

use tracing::trace;

use crate::error::VmError;
use crate::image::Image;
use crate::inst::{INST_SZ, decode};
use crate::memory::{Memory, SYS_LEN};
use crate::observer::Observer;

/// Construction parameters for a machine.
pub struct VmConfig {
    /// Memory size in words. Minimum 2: the reserved output cell plus at
    /// least one addressable word.
    pub size: usize,
    /// Cooperative inter-step delay in seconds, for human-observable
    /// execution. Pacing only; never affects program semantics.
    pub delay: f64,
}

impl Default for VmConfig {
    fn default() -> Self {
        Self {
            size: 16,
            delay: 0.0,
        }
    }
}

/// A subleq virtual machine over a single fixed-size memory.
pub struct Vm {
    mem: Memory,
    pc: usize,
    halted: bool,
    delay: Option<Duration>,
    out: Box<dyn Write>,
}

impl std::fmt::Debug for Vm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vm")
            .field("mem", &self.mem)
            .field("pc", &self.pc)
            .field("halted", &self.halted)
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}


impl Vm {
    /// Build a machine writing program output to stdout.
    pub fn new(config: VmConfig) -> Result<Self, VmError> {
        Self::with_output(config, io::stdout())
    }

    /// Build a machine writing program output to `out`.
    pub fn with_output(config: VmConfig, out: impl Write + 'static) -> Result<Self, VmError> {
        if config.size < 2 {
            return Err(VmError::Config(
                "memory size must be at least 2 words".into(),
            ));
        }
        if !config.delay.is_finite() || config.delay < 0.0 {
            return Err(VmError::Config(
                "inter-step delay must be a non-negative number of seconds".into(),
            ));
        }
        let delay = (config.delay > 0.0).then(|| Duration::from_secs_f64(config.delay));
        Ok(Self {
            mem: Memory::new(config.size),
            pc: 0,
            halted: false,
            delay,
            out: Box::new(out),
        })
    }

    pub fn memory(&self) -> &Memory {
        &self.mem
    }

    /// Mutable memory access, for external fill policies (e.g. the seeded
    /// random-fill mode) and test setup.
    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.mem
    }

    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Place a program image into memory.
    ///
    /// Text goes at address 0 upward; data bytes are concatenated and
    /// written right-aligned against the reserved system cell, leaving the
    /// middle of memory (and any stack reservation) at its zero fill. The
    /// stack reservation counts toward the capacity check but never moves
    /// the data segment: data always sits flush below the system cell.
    /// This mirrors the reference loader exactly; see DESIGN.md before
    /// "fixing" it.
    ///
    /// The capacity check runs before any write, so memory is untouched on
    /// a capacity fault. The program counter is not touched either way.
    pub fn load(&mut self, image: &Image) -> Result<(), VmError> {
        if image.text.is_empty() {
            return Err(VmError::Format(
                "program does not contain a text section".into(),
            ));
        }
        let required = image.required_words();
        if required > self.mem.len() {
            return Err(VmError::Capacity { required });
        }

        for (i, &word) in image.text.iter().enumerate() {
            self.mem.write(i as i64, word)?;
        }

        let base = self.mem.len() - image.data_len() - SYS_LEN;
        for (i, &byte) in image.data.iter().flatten().enumerate() {
            self.mem.write((base + i) as i64, i64::from(byte))?;
        }
        Ok(())
    }

    /// One subleq cycle: the instruction itself, then the output
    /// side-channel, then halt detection, then optional pacing.
    pub fn step(&mut self) -> Result<(), VmError> {
        self.subleq()?;

        // Memory-mapped write: the reserved cell, when positive, emits one
        // character (value mod 127) per step. Flushed immediately so output
        // is observable in step order. This runs on every step, including
        // the one that triggers halt.
        let sys = self.mem.read(-1)?;
        if sys > 0 {
            let ch = sys.rem_euclid(127) as u8 as char;
            write!(self.out, "{ch}")?;
            self.out.flush()?;
        }

        // Level-triggered halt: re-evaluated after every step. The step
        // that establishes the condition still ran in full; the flag only
        // stops the run loop from taking the next one.
        if self.pc == 0 && self.mem.read(0)? == 0 {
            self.halted = true;
        }

        if let Some(d) = self.delay {
            std::thread::sleep(d);
        }
        Ok(())
    }

    fn subleq(&mut self) -> Result<(), VmError> {
        let n = self.mem.len() as i64;
        let (a, b, c) = decode(self.mem.read(self.pc as i64)?, INST_SZ);
        trace!(a, b, c, "decoded instruction");

        let aa = self.mem.read(a)?;
        let bb = self.mem.read(b)?;

        let sub = aa.wrapping_sub(bb);
        self.mem.write(a, sub)?;

        // The jump target is never bounds-checked: the modular wrap makes
        // any next pc addressable, which programs exploit deliberately.
        let next = if sub <= 0 { c } else { self.pc as i64 + 1 };
        self.pc = next.rem_euclid(n) as usize;
        trace!(aa, bb, sub, nxt = self.pc, "subleq");
        Ok(())
    }

    /// Drive the machine until it halts, offering each pre-step state to
    /// the observer. No internal step budget: an image that never reaches
    /// the halt condition runs forever, which is valid subleq behavior.
    pub fn run(&mut self, observer: &mut impl Observer) -> Result<(), VmError> {
        observer.init(&self.mem);
        while !self.halted {
            observer.observe(&self.mem, self.pc);
            self.step()?;
        }
        Ok(())
    }
}
