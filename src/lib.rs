//! Intel 8080 / Zilog Z80 emulator core
//!
//! A cycle-level interpreter for the 8080 and Z80 microprocessors, exact
//! enough for the CRC-based diagnostic suites (cpudiag, the 8080
//! exerciser, zexdoc/zexall) and complete enough to run the Space
//! Invaders cabinet.
//!
//! # Architecture
//!
//! - `memory`: flat 64 KiB memory with little-endian word access
//! - `cpu`: register file, flag tables, ALU primitives and the opcode
//!   decoders (primary table plus the CB/DD/ED/FD extensions)
//! - `harness`: the collaborator shells - a CP/M diagnostic runner and
//!   the Space Invaders machine
//! - `disasm`: one-instruction disassembler backing the trace mode
//!
//! The CPU owns its memory; collaborators inspect and mutate state only
//! between `step()` calls.
//!
//! # Example
//!
//! ```
//! use emu80::{Cpu, Mode};
//!
//! // LD A,5; ADD A,3; DAA; HALT
//! let mut cpu = Cpu::new(Mode::I8080);
//! cpu.load(0, &[0x3E, 0x05, 0xC6, 0x03, 0x27, 0x76]).unwrap();
//! while !cpu.step().halted {}
//! assert_eq!(cpu.a, 0x08);
//! ```

pub mod cpu;
pub mod disasm;
pub mod harness;
pub mod memory;

pub use cpu::{Cpu, InHandler, Mode, OutHandler, StepResult};
pub use memory::{MemError, Mmu};
