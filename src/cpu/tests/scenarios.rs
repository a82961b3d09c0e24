//! End-to-end encoded programs
//!
//! Short machine-code sequences with documented final states, exercising
//! the decoder, the ALU and the driver together.

use super::*;

/// LD A,5; ADD A,3; DAA; HALT - a BCD add with no corrections needed
#[test]
fn test_bcd_add_program() {
    let cpu = i8080(&[0x3E, 0x05, 0xC6, 0x03, 0x27, 0x76]);
    assert_eq!(cpu.a, 0x08);
    assert!(!cpu.flag_cy());
    assert!(!cpu.flag_ac());
    assert!(!cpu.flag_n());
    assert!(!cpu.flag_z());
    assert!(!cpu.flag_s());
    assert!(!cpu.flag_pv());
}

/// LD HL,2000h; LD DE,2001h; LD BC,07FFh; LD (HL),AAh; LDIR - the
/// classic memory-fill idiom: the written byte chases itself through the
/// block
#[test]
fn test_ldir_fill_program() {
    let mut cpu = Cpu::new(Mode::Z80);
    cpu.load(
        0x0100,
        &[
            0x21, 0x00, 0x20, 0x11, 0x01, 0x20, 0x01, 0xFF, 0x07, 0x36, 0xAA, 0xED, 0xB0, 0x76,
        ],
    )
    .unwrap();
    cpu.pc = 0x0100;
    run_to_halt(&mut cpu);

    for addr in 0x2000..0x2800u16 {
        assert_eq!(cpu.read8(addr), 0xAA, "fill byte at {:#06x}", addr);
    }
    assert_eq!(cpu.read8(0x2800), 0x00);
    assert_eq!(cpu.bc, 0);
    assert!(!cpu.flag_pv());
    assert_eq!(cpu.hl, 0x2800);
    assert_eq!(cpu.de, 0x2801);
}

/// LD IX,1234h; PUSH IX; POP HL - index registers travel through the
/// stack like any pair
#[test]
fn test_push_ix_pop_hl_program() {
    let mut cpu = Cpu::new(Mode::Z80);
    let initial_sp = cpu.sp;
    cpu.load(0, &[0xDD, 0x21, 0x34, 0x12, 0xDD, 0xE5, 0xE1, 0x76]).unwrap();
    run_to_halt(&mut cpu);
    assert_eq!(cpu.hl, 0x1234);
    assert_eq!(cpu.ix, 0x1234);
    assert_eq!(cpu.sp, initial_sp);
}

/// A fibonacci loop: register traffic, 16-bit adds and DJNZ together
#[test]
fn test_fibonacci_program() {
    // LD B,10; LD HL,1; LD DE,0
    // loop: PUSH HL; ADD HL,DE; POP DE; DJNZ loop
    let cpu = z80(&[
        0x31, 0x00, 0x90, // LD SP,9000h
        0x06, 0x0A, // LD B,10
        0x21, 0x01, 0x00, // LD HL,1
        0x11, 0x00, 0x00, // LD DE,0
        0xE5, // loop: PUSH HL
        0x19, // ADD HL,DE
        0xD1, // POP DE
        0x10, 0xFB, // DJNZ loop
        0x76,
    ]);
    // After 10 iterations HL = fib(11) = 89, DE = fib(10) = 55
    assert_eq!(cpu.hl, 89);
    assert_eq!(cpu.de, 55);
}

/// The interrupt cadence of the Space Invaders driver: EI, spin, and an
/// injected RST lands on its vector with the spin address on the stack
#[test]
fn test_injected_rst_program() {
    let mut cpu = Cpu::new(Mode::I8080);
    let mut program = vec![
        0x31, 0x00, 0x80, // LD SP,8000h
        0xFB, // EI
        0xC3, 0x04, 0x00, // spin: JP 0004h
    ];
    program.resize(0x10, 0x00);
    program.extend_from_slice(&[0x3E, 0x42, 0x76]); // at 0x10: LD A,42h; HALT
    cpu.load(0, &program).unwrap();

    for _ in 0..10 {
        cpu.step();
    }
    cpu.request_interrupt(0xD7); // RST 2
    run_to_halt(&mut cpu);
    assert_eq!(cpu.a, 0x42);
    // The spin loop's address was pushed as the return point
    assert_eq!(cpu.read16(0x7FFE), 0x0004);
}

/// T-states across a mixed sequence, per the documented tables
#[test]
fn test_cycle_total_program() {
    let mut cpu = Cpu::new(Mode::Z80);
    // LD A,5 (7); ADD A,3 (7); DAA (4); HALT (4)
    cpu.load(0, &[0x3E, 0x05, 0xC6, 0x03, 0x27, 0x76]).unwrap();
    run_to_halt(&mut cpu);
    assert_eq!(cpu.cycles, 22);
}

/// The cycle counter only ever moves forward
#[test]
fn test_cycles_monotonic() {
    let mut cpu = Cpu::new(Mode::Z80);
    cpu.load(0, &[0x18, 0xFE]).unwrap(); // JR -2: spin forever
    let mut last = 0;
    for _ in 0..100 {
        cpu.step();
        assert!(cpu.cycles > last);
        last = cpu.cycles;
    }
}
