//! CP/M diagnostic harness
//!
//! Runs the historical CPU test ROMs: cpudiag, the 8080 instruction
//! exerciser and the Z80 exercisers (zexdoc/zexall). They are CP/M .COM
//! programs, so they load at 0x0100 and talk to the world through two
//! BDOS calls: `CALL 0x0005` with C=9 prints the `$`-terminated string at
//! DE, with C=2 prints the character in E. `CALL 0x0000` (or a jump to 0)
//! is program termination.
//!
//! The harness watches the opcode at PC between steps and services those
//! calls itself; the CPU core performs no interception. Depending on the
//! workload a small sentinel is installed at the BDOS entry points so the
//! intercepted `CALL 5` still has something sane to execute through.

use crate::cpu::{Cpu, Mode};
use crate::disasm;
use crate::memory::MemError;
use std::io::{self, Write};

/// Which diagnostic ROM is being run; selects CPU mode, sentinels and
/// termination behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Workload {
    /// cpudiag.bin - the CP/M 8080 diagnostic; prints one verdict string
    Cpudiag,
    /// 8080EXER/8080EX1 style instruction exercisers
    Exerciser8080,
    /// zexdoc/zexall Z80 instruction exercisers
    ExerciserZ80,
}

/// Load address of CP/M .COM images
const COM_BASE: u16 = 0x0100;
/// BDOS entry observed for console output
const BDOS: u16 = 0x0005;

pub struct DiagHarness {
    pub cpu: Cpu,
    workload: Workload,
    output: String,
    /// Stream BDOS output to stdout as it arrives
    pub echo: bool,
    /// Print every instruction to stderr before it executes
    pub trace: bool,
}

impl DiagHarness {
    /// Load a diagnostic ROM at 0x0100 and prepare the machine for it
    pub fn new(workload: Workload, rom: &[u8]) -> Result<Self, MemError> {
        let mode = match workload {
            Workload::ExerciserZ80 => Mode::Z80,
            _ => Mode::I8080,
        };
        let mut cpu = Cpu::new(mode);
        cpu.load(COM_BASE, rom)?;
        cpu.pc = COM_BASE;

        match workload {
            Workload::Cpudiag => {}
            Workload::Exerciser8080 => {
                // Plain RET at the BDOS entry
                cpu.write8(BDOS, 0xC9);
            }
            Workload::ExerciserZ80 => {
                // OUT (0),A at the warm-boot vector and IN A,(0); RET at
                // the BDOS entry, so the exerciser's own calls land on a
                // recognisable instruction
                cpu.write8(0x0000, 0xD3);
                cpu.write8(0x0001, 0x00);
                cpu.write8(BDOS, 0xDB);
                cpu.write8(BDOS + 1, 0x00);
                cpu.write8(BDOS + 2, 0xC9);
            }
        }

        Ok(Self {
            cpu,
            workload,
            output: String::new(),
            echo: false,
            trace: false,
        })
    }

    /// Everything the ROM has printed so far
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Run until the ROM terminates. Returns the collected output.
    pub fn run(&mut self) -> &str {
        loop {
            let pc = self.cpu.pc;
            let op = self.cpu.read8(pc);

            if op == 0xCD {
                let target = self.cpu.read16(pc.wrapping_add(1));
                if target == BDOS {
                    self.bdos_call();
                    if self.workload == Workload::Cpudiag {
                        // cpudiag prints its verdict and spins; one
                        // message is the whole story
                        break;
                    }
                } else if target == 0 {
                    break;
                }
            }

            if self.trace {
                let (text, _) = disasm::disassemble(&self.cpu.mem, pc);
                eprintln!("{:04X}  {}", pc, text);
            }

            self.cpu.step();

            if self.cpu.pc == 0 {
                break;
            }
            if self.cpu.halted {
                break;
            }
        }
        &self.output
    }

    /// Service the BDOS console calls the diagnostics use
    fn bdos_call(&mut self) {
        match self.cpu.c() {
            2 => self.emit(self.cpu.e()),
            9 => {
                // cpudiag's message buffers carry a three-byte prefix
                // before the text proper
                let skip = if self.workload == Workload::Cpudiag { 3 } else { 0 };
                let start = self.cpu.de.wrapping_add(skip);
                let span = self.cpu.mem.addr(start);
                let bytes: Vec<u8> = span.iter().copied().take_while(|&b| b != b'$').collect();
                for b in bytes {
                    self.emit(b);
                }
            }
            _ => {}
        }
    }

    fn emit(&mut self, byte: u8) {
        self.output.push(byte as char);
        if self.echo {
            print!("{}", byte as char);
            let _ = io::stdout().flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    /// Hand-assembled stand-in for a diagnostic ROM: prints a character,
    /// then a string, then terminates through CALL 0.
    ///
    /// ```text
    /// 0100  0E 02        LD C,2
    /// 0102  1E 4F        LD E,'O'
    /// 0104  CD 05 00     CALL 0005
    /// 0107  0E 09        LD C,9
    /// 0109  11 13 01     LD DE,0113
    /// 010C  CD 05 00     CALL 0005
    /// 010F  CD 00 00     CALL 0000
    /// 0112  76           HALT
    /// 0113  "K THEN$"
    /// ```
    #[test]
    fn test_bdos_calls() {
        let mut rom = vec![
            0x0E, 0x02, 0x1E, b'O', 0xCD, 0x05, 0x00, 0x0E, 0x09, 0x11, 0x13, 0x01, 0xCD, 0x05,
            0x00, 0xCD, 0x00, 0x00, 0x76,
        ];
        rom.extend_from_slice(b"K THEN$");

        let mut harness = DiagHarness::new(Workload::Exerciser8080, &rom).unwrap();
        assert_eq!(harness.run(), "OK THEN");
    }

    #[test]
    fn test_terminates_on_jump_to_zero() {
        // JP 0000 - the exercisers end this way when warm-booting
        let rom = [0xC3, 0x00, 0x00];
        let mut harness = DiagHarness::new(Workload::Exerciser8080, &rom).unwrap();
        harness.run();
        assert_eq!(harness.cpu.pc, 0);
    }

    #[test]
    fn test_sentinels_installed() {
        let rom = [0x76];
        let harness = DiagHarness::new(Workload::ExerciserZ80, &rom).unwrap();
        assert_eq!(harness.cpu.read8(0x0000), 0xD3);
        assert_eq!(harness.cpu.read8(0x0005), 0xDB);
        assert_eq!(harness.cpu.read8(0x0007), 0xC9);

        let harness = DiagHarness::new(Workload::Exerciser8080, &rom).unwrap();
        assert_eq!(harness.cpu.read8(0x0005), 0xC9);
    }

    /// Scenario: the real cpudiag.bin, when present under roms/
    #[test]
    fn test_cpudiag_rom() {
        let path = Path::new("roms/cpudiag.bin");
        let Ok(rom) = fs::read(path) else {
            return;
        };
        let mut harness = DiagHarness::new(Workload::Cpudiag, &rom).unwrap();
        let output = harness.run();
        assert!(
            output.contains("CPU IS OPERATIONAL"),
            "cpudiag verdict: {:?}",
            output
        );
    }

    /// Scenario: the 8080 instruction exerciser. Takes billions of
    /// T-states, so it only runs on request.
    #[test]
    #[ignore]
    fn test_8080_exerciser_rom() {
        let Ok(rom) = fs::read("roms/8080EXER.COM") else {
            return;
        };
        let mut harness = DiagHarness::new(Workload::Exerciser8080, &rom).unwrap();
        let output = harness.run().to_string();
        assert!(!output.contains("ERROR"), "exerciser output: {}", output);
    }

    /// Scenario: zexdoc/zexall. Takes billions of T-states, so it only
    /// runs on request.
    #[test]
    #[ignore]
    fn test_zex_roms() {
        for name in ["roms/zexdoc.com", "roms/zexall.com"] {
            let Ok(rom) = fs::read(name) else {
                continue;
            };
            let mut harness = DiagHarness::new(Workload::ExerciserZ80, &rom).unwrap();
            let output = harness.run().to_string();
            assert!(!output.contains("ERROR"), "{} output: {}", name, output);
        }
    }
}
