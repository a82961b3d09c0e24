//! CPU test suite
//!
//! - `instructions`: instruction-family tests for both modes, including
//!   the prefix tables and the undocumented index-half forms
//! - `alu`: exhaustive flag-footprint sweeps over the ALU primitives and
//!   the round-trip properties of the architectural state
//! - `scenarios`: encoded end-to-end programs checked against documented
//!   results

use super::*;

mod scenarios;

// ========== Test Helpers ==========

/// Load `program` at 0, run until HALT, return the machine
fn run_program(mode: Mode, program: &[u8]) -> Cpu {
    let mut cpu = Cpu::new(mode);
    cpu.load(0, program).unwrap();
    run_to_halt(&mut cpu);
    cpu
}

/// Step until HALT with a runaway guard
fn run_to_halt(cpu: &mut Cpu) {
    for _ in 0..1_000_000 {
        if cpu.step().halted {
            return;
        }
    }
    panic!("program did not halt; {}", cpu.dump_registers());
}

/// Shorthand for Z80-mode programs
fn z80(program: &[u8]) -> Cpu {
    run_program(Mode::Z80, program)
}

/// Shorthand for 8080-mode programs
fn i8080(program: &[u8]) -> Cpu {
    run_program(Mode::I8080, program)
}

/// Assert the full flag byte with a readable breakdown on mismatch
fn assert_flags(cpu: &Cpu, expected: u8, context: &str) {
    assert_eq!(
        cpu.f, expected,
        "{}: flags mismatch. Expected {:08b}, got {:08b} \
         (S={} Z={} U5={} AC={} U3={} PV={} N={} CY={})",
        context,
        expected,
        cpu.f,
        cpu.flag_s() as u8,
        cpu.flag_z() as u8,
        (cpu.f & flags::U5 != 0) as u8,
        cpu.flag_ac() as u8,
        (cpu.f & flags::U3 != 0) as u8,
        cpu.flag_pv() as u8,
        cpu.flag_n() as u8,
        cpu.flag_cy() as u8,
    );
}
