//! Instruction disassembler
//!
//! One-instruction decode to text, used by the trace mode of the
//! diagnostic harness. Follows the same x-y-z decomposition as the
//! executor, so the two stay in step on operand lengths. Z80 mnemonics
//! are produced for the whole opcode space, including the prefix tables;
//! unprefixed bytes always decode as one instruction, so 8080-mode traces
//! simply read as their Z80 spellings.

use crate::memory::Mmu;

const R: [&str; 8] = ["B", "C", "D", "E", "H", "L", "(HL)", "A"];
const RP: [&str; 4] = ["BC", "DE", "HL", "SP"];
const RP2: [&str; 4] = ["BC", "DE", "HL", "AF"];
const CC: [&str; 8] = ["NZ", "Z", "NC", "C", "PO", "PE", "P", "M"];
const ALU: [&str; 8] = ["ADD A,", "ADC A,", "SUB ", "SBC A,", "AND ", "XOR ", "OR ", "CP "];
const ROT: [&str; 8] = ["RLC", "RRC", "RL", "RR", "SLA", "SRA", "SLL", "SRL"];
const BLI: [[&str; 4]; 4] = [
    ["LDI", "CPI", "INI", "OUTI"],
    ["LDD", "CPD", "IND", "OUTD"],
    ["LDIR", "CPIR", "INIR", "OTIR"],
    ["LDDR", "CPDR", "INDR", "OTDR"],
];

/// Disassemble the instruction at `addr`. Returns the text and the
/// number of bytes it occupies.
pub fn disassemble(mem: &Mmu, addr: u16) -> (String, u16) {
    let op = mem.read8(addr);
    match op {
        0xCB => {
            let (text, len) = cb(mem.read8(addr.wrapping_add(1)), None);
            (text, len + 1)
        }
        0xED => ed(mem, addr),
        0xDD => index(mem, addr, "IX"),
        0xFD => index(mem, addr, "IY"),
        _ => primary(mem, addr),
    }
}

fn imm8(mem: &Mmu, addr: u16) -> String {
    format!("{:02X}h", mem.read8(addr))
}

fn imm16(mem: &Mmu, addr: u16) -> String {
    format!("{:04X}h", mem.read16(addr))
}

fn rel(mem: &Mmu, addr: u16) -> String {
    let d = mem.read8(addr) as i8;
    // Target relative to the byte after the displacement
    format!("{:04X}h", addr.wrapping_add(1).wrapping_add_signed(d as i16))
}

fn primary(mem: &Mmu, addr: u16) -> (String, u16) {
    let op = mem.read8(addr);
    let x = (op >> 6) & 0x03;
    let y = ((op >> 3) & 0x07) as usize;
    let z = (op & 0x07) as usize;
    let p = y >> 1;
    let q = y & 0x01;

    match x {
        0 => match z {
            0 => match y {
                0 => ("NOP".into(), 1),
                1 => ("EX AF,AF'".into(), 1),
                2 => (format!("DJNZ {}", rel(mem, addr.wrapping_add(1))), 2),
                3 => (format!("JR {}", rel(mem, addr.wrapping_add(1))), 2),
                _ => (
                    format!("JR {},{}", CC[y - 4], rel(mem, addr.wrapping_add(1))),
                    2,
                ),
            },
            1 => {
                if q == 0 {
                    (
                        format!("LD {},{}", RP[p], imm16(mem, addr.wrapping_add(1))),
                        3,
                    )
                } else {
                    (format!("ADD HL,{}", RP[p]), 1)
                }
            }
            2 => match (p, q) {
                (0, 0) => ("LD (BC),A".into(), 1),
                (1, 0) => ("LD (DE),A".into(), 1),
                (2, 0) => (format!("LD ({}),HL", imm16(mem, addr.wrapping_add(1))), 3),
                (3, 0) => (format!("LD ({}),A", imm16(mem, addr.wrapping_add(1))), 3),
                (0, 1) => ("LD A,(BC)".into(), 1),
                (1, 1) => ("LD A,(DE)".into(), 1),
                (2, 1) => (format!("LD HL,({})", imm16(mem, addr.wrapping_add(1))), 3),
                _ => (format!("LD A,({})", imm16(mem, addr.wrapping_add(1))), 3),
            },
            3 => {
                if q == 0 {
                    (format!("INC {}", RP[p]), 1)
                } else {
                    (format!("DEC {}", RP[p]), 1)
                }
            }
            4 => (format!("INC {}", R[y]), 1),
            5 => (format!("DEC {}", R[y]), 1),
            6 => (
                format!("LD {},{}", R[y], imm8(mem, addr.wrapping_add(1))),
                2,
            ),
            _ => (
                ["RLCA", "RRCA", "RLA", "RRA", "DAA", "CPL", "SCF", "CCF"][y].into(),
                1,
            ),
        },
        1 => {
            if y == 6 && z == 6 {
                ("HALT".into(), 1)
            } else {
                (format!("LD {},{}", R[y], R[z]), 1)
            }
        }
        2 => (format!("{}{}", ALU[y], R[z]), 1),
        _ => match z {
            0 => (format!("RET {}", CC[y]), 1),
            1 => {
                if q == 0 {
                    (format!("POP {}", RP2[p]), 1)
                } else {
                    match p {
                        0 => ("RET".into(), 1),
                        1 => ("EXX".into(), 1),
                        2 => ("JP (HL)".into(), 1),
                        _ => ("LD SP,HL".into(), 1),
                    }
                }
            }
            2 => (
                format!("JP {},{}", CC[y], imm16(mem, addr.wrapping_add(1))),
                3,
            ),
            3 => match y {
                0 => (format!("JP {}", imm16(mem, addr.wrapping_add(1))), 3),
                2 => (format!("OUT ({}),A", imm8(mem, addr.wrapping_add(1))), 2),
                3 => (format!("IN A,({})", imm8(mem, addr.wrapping_add(1))), 2),
                4 => ("EX (SP),HL".into(), 1),
                5 => ("EX DE,HL".into(), 1),
                6 => ("DI".into(), 1),
                _ => ("EI".into(), 1),
            },
            4 => (
                format!("CALL {},{}", CC[y], imm16(mem, addr.wrapping_add(1))),
                3,
            ),
            5 => {
                if q == 0 {
                    (format!("PUSH {}", RP2[p]), 1)
                } else {
                    (format!("CALL {}", imm16(mem, addr.wrapping_add(1))), 3)
                }
            }
            6 => (
                format!("{}{}", ALU[y], imm8(mem, addr.wrapping_add(1))),
                2,
            ),
            _ => (format!("RST {:02X}h", y * 8), 1),
        },
    }
}

/// CB-prefixed operation; `indexed` carries the "(IX+d)" operand text for
/// the DDCB/FDCB forms
fn cb(op: u8, indexed: Option<&str>) -> (String, u16) {
    let x = (op >> 6) & 0x03;
    let y = ((op >> 3) & 0x07) as usize;
    let z = (op & 0x07) as usize;

    let operand = match indexed {
        Some(idx) => {
            if z == 6 {
                idx.to_string()
            } else {
                // The undocumented side-copy forms
                format!("{},{}", idx, R[z])
            }
        }
        None => R[z].to_string(),
    };

    let text = match x {
        0 => format!("{} {}", ROT[y], operand),
        1 => format!("BIT {},{}", y, if let Some(idx) = indexed { idx.to_string() } else { operand }),
        2 => format!("RES {},{}", y, operand),
        _ => format!("SET {},{}", y, operand),
    };
    (text, 1)
}

fn ed(mem: &Mmu, addr: u16) -> (String, u16) {
    let op = mem.read8(addr.wrapping_add(1));
    let x = (op >> 6) & 0x03;
    let y = ((op >> 3) & 0x07) as usize;
    let z = (op & 0x07) as usize;
    let p = y >> 1;
    let q = y & 0x01;

    let (text, len) = match x {
        1 => match z {
            0 => {
                if y == 6 {
                    ("IN (C)".into(), 2)
                } else {
                    (format!("IN {},(C)", R[y]), 2)
                }
            }
            1 => {
                if y == 6 {
                    ("OUT (C),0".into(), 2)
                } else {
                    (format!("OUT (C),{}", R[y]), 2)
                }
            }
            2 => {
                if q == 0 {
                    (format!("SBC HL,{}", RP[p]), 2)
                } else {
                    (format!("ADC HL,{}", RP[p]), 2)
                }
            }
            3 => {
                let nn = imm16(mem, addr.wrapping_add(2));
                if q == 0 {
                    (format!("LD ({}),{}", nn, RP[p]), 4)
                } else {
                    (format!("LD {},({})", RP[p], nn), 4)
                }
            }
            4 => ("NEG".into(), 2),
            5 => (if y == 1 { "RETI" } else { "RETN" }.into(), 2),
            6 => (
                format!("IM {}", match y & 0x03 {
                    2 => 1,
                    3 => 2,
                    _ => 0,
                }),
                2,
            ),
            _ => (
                match y {
                    0 => "LD I,A",
                    1 => "LD R,A",
                    2 => "LD A,I",
                    3 => "LD A,R",
                    4 => "RRD",
                    5 => "RLD",
                    _ => "NOP",
                }
                .into(),
                2,
            ),
        },
        2 if z <= 3 && y >= 4 => (BLI[y - 4][z].into(), 2),
        _ => ("NOP".into(), 2),
    };
    (text, len)
}

fn index(mem: &Mmu, addr: u16, ir: &str) -> (String, u16) {
    let op = mem.read8(addr.wrapping_add(1));
    match op {
        // Chained prefixes restart; report this byte as a lone prefix
        0xDD | 0xFD => (format!("{} prefix", ir), 1),
        0xED => {
            let (text, len) = ed(mem, addr.wrapping_add(1));
            (text, len + 1)
        }
        0xCB => {
            let d = mem.read8(addr.wrapping_add(2)) as i8;
            let idx = format!("({}{:+})", ir, d);
            let (text, _) = cb(mem.read8(addr.wrapping_add(3)), Some(&idx));
            (text, 4)
        }
        _ => {
            let x = (op >> 6) & 0x03;
            let y = ((op >> 3) & 0x07) as usize;
            let z = (op & 0x07) as usize;
            let p = y >> 1;
            let q = y & 0x01;

            // Substituted register-column names
            let ir_h = format!("{}H", ir);
            let ir_l = format!("{}L", ir);
            let sub = |i: usize, d: i8| -> String {
                match i {
                    4 => ir_h.clone(),
                    5 => ir_l.clone(),
                    6 => format!("({}{:+})", ir, d),
                    _ => R[i].to_string(),
                }
            };

            match x {
                0 => match z {
                    1 if q == 1 => {
                        let rp = if p == 2 { ir } else { RP[p] };
                        (format!("ADD {},{}", ir, rp), 2)
                    }
                    1 if p == 2 => (
                        format!("LD {},{}", ir, imm16(mem, addr.wrapping_add(2))),
                        4,
                    ),
                    2 if p == 2 => {
                        let nn = imm16(mem, addr.wrapping_add(2));
                        if q == 0 {
                            (format!("LD ({}),{}", nn, ir), 4)
                        } else {
                            (format!("LD {},({})", ir, nn), 4)
                        }
                    }
                    3 if p == 2 => (
                        format!("{} {}", if q == 0 { "INC" } else { "DEC" }, ir),
                        2,
                    ),
                    4 | 5 if y >= 4 => {
                        let verb = if z == 4 { "INC" } else { "DEC" };
                        if y == 6 {
                            let d = mem.read8(addr.wrapping_add(2)) as i8;
                            (format!("{} {}", verb, sub(6, d)), 3)
                        } else {
                            (format!("{} {}", verb, sub(y, 0)), 2)
                        }
                    }
                    6 if y >= 4 => {
                        if y == 6 {
                            let d = mem.read8(addr.wrapping_add(2)) as i8;
                            let n = imm8(mem, addr.wrapping_add(3));
                            (format!("LD {},{}", sub(6, d), n), 4)
                        } else {
                            (
                                format!("LD {},{}", sub(y, 0), imm8(mem, addr.wrapping_add(2))),
                                3,
                            )
                        }
                    }
                    _ => {
                        let (text, len) = primary(mem, addr.wrapping_add(1));
                        (text, len + 1)
                    }
                },
                1 if y == 6 && z == 6 => ("HALT".into(), 2),
                1 if y == 6 || z == 6 => {
                    let d = mem.read8(addr.wrapping_add(2)) as i8;
                    if y == 6 {
                        (format!("LD {},{}", sub(6, d), R[z]), 3)
                    } else {
                        (format!("LD {},{}", R[y], sub(6, d)), 3)
                    }
                }
                1 => (format!("LD {},{}", sub(y, 0), sub(z, 0)), 2),
                2 => {
                    if z == 6 {
                        let d = mem.read8(addr.wrapping_add(2)) as i8;
                        (format!("{}{}", ALU[y], sub(6, d)), 3)
                    } else {
                        (format!("{}{}", ALU[y], sub(z, 0)), 2)
                    }
                }
                _ => match (z, q, p) {
                    (1, 0, 2) => (format!("POP {}", ir), 2),
                    (1, 1, 2) => (format!("JP ({})", ir), 2),
                    (1, 1, 3) => (format!("LD SP,{}", ir), 2),
                    (3, 0, 2) => (format!("EX (SP),{}", ir), 2),
                    (5, 0, 2) => (format!("PUSH {}", ir), 2),
                    _ => {
                        let (text, len) = primary(mem, addr.wrapping_add(1));
                        (text, len + 1)
                    }
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disasm_bytes(bytes: &[u8]) -> (String, u16) {
        let mut mem = Mmu::new();
        mem.load(0x100, bytes).unwrap();
        disassemble(&mem, 0x100)
    }

    #[test]
    fn test_primary_forms() {
        assert_eq!(disasm_bytes(&[0x00]), ("NOP".into(), 1));
        assert_eq!(disasm_bytes(&[0x3E, 0x42]), ("LD A,42h".into(), 2));
        assert_eq!(disasm_bytes(&[0x21, 0x34, 0x12]), ("LD HL,1234h".into(), 3));
        assert_eq!(disasm_bytes(&[0x76]), ("HALT".into(), 1));
        assert_eq!(disasm_bytes(&[0x41]), ("LD B,C".into(), 1));
        assert_eq!(disasm_bytes(&[0x86]), ("ADD A,(HL)".into(), 1));
        assert_eq!(disasm_bytes(&[0xC6, 0x03]), ("ADD A,03h".into(), 2));
        assert_eq!(disasm_bytes(&[0xFE, 0x31]), ("CP 31h".into(), 2));
        assert_eq!(disasm_bytes(&[0xEF]), ("RST 28h".into(), 1));
    }

    #[test]
    fn test_branch_targets() {
        // JR from 0x100: displacement relative to the following byte
        assert_eq!(disasm_bytes(&[0x18, 0x02]), ("JR 0104h".into(), 2));
        assert_eq!(disasm_bytes(&[0x10, 0xFE]), ("DJNZ 0100h".into(), 2));
        assert_eq!(
            disasm_bytes(&[0xC2, 0x00, 0x20]),
            ("JP NZ,2000h".into(), 3)
        );
        assert_eq!(
            disasm_bytes(&[0xCD, 0x05, 0x00]),
            ("CALL 0005h".into(), 3)
        );
    }

    #[test]
    fn test_cb_forms() {
        assert_eq!(disasm_bytes(&[0xCB, 0x00]), ("RLC B".into(), 2));
        assert_eq!(disasm_bytes(&[0xCB, 0x7E]), ("BIT 7,(HL)".into(), 2));
        assert_eq!(disasm_bytes(&[0xCB, 0xC7]), ("SET 0,A".into(), 2));
        assert_eq!(disasm_bytes(&[0xCB, 0x37]), ("SLL A".into(), 2));
    }

    #[test]
    fn test_ed_forms() {
        assert_eq!(disasm_bytes(&[0xED, 0xB0]), ("LDIR".into(), 2));
        assert_eq!(disasm_bytes(&[0xED, 0x44]), ("NEG".into(), 2));
        assert_eq!(disasm_bytes(&[0xED, 0x4A]), ("ADC HL,BC".into(), 2));
        assert_eq!(
            disasm_bytes(&[0xED, 0x73, 0x00, 0x40]),
            ("LD (4000h),SP".into(), 4)
        );
        assert_eq!(disasm_bytes(&[0xED, 0x5E]), ("IM 2".into(), 2));
        assert_eq!(disasm_bytes(&[0xED, 0x67]), ("RRD".into(), 2));
    }

    #[test]
    fn test_indexed_forms() {
        assert_eq!(
            disasm_bytes(&[0xDD, 0x21, 0x34, 0x12]),
            ("LD IX,1234h".into(), 4)
        );
        assert_eq!(disasm_bytes(&[0xDD, 0x7E, 0x05]), ("LD A,(IX+5)".into(), 3));
        assert_eq!(
            disasm_bytes(&[0xFD, 0x86, 0xFE]),
            ("ADD A,(IY-2)".into(), 3)
        );
        assert_eq!(
            disasm_bytes(&[0xDD, 0x36, 0x03, 0xAB]),
            ("LD (IX+3),ABh".into(), 4)
        );
        assert_eq!(disasm_bytes(&[0xDD, 0x26, 0x77]), ("LD IXH,77h".into(), 3));
        assert_eq!(disasm_bytes(&[0xDD, 0xE5]), ("PUSH IX".into(), 2));
        assert_eq!(disasm_bytes(&[0xDD, 0xE9]), ("JP (IX)".into(), 2));
    }

    #[test]
    fn test_indexed_cb_forms() {
        assert_eq!(
            disasm_bytes(&[0xDD, 0xCB, 0x05, 0x46]),
            ("BIT 0,(IX+5)".into(), 4)
        );
        assert_eq!(
            disasm_bytes(&[0xDD, 0xCB, 0x05, 0x06]),
            ("RLC (IX+5)".into(), 4)
        );
        // Undocumented side-copy spelling
        assert_eq!(
            disasm_bytes(&[0xFD, 0xCB, 0xFF, 0x00]),
            ("RLC (IY-1),B".into(), 4)
        );
    }

    #[test]
    fn test_prefix_fallthrough_length() {
        // A discarded prefix still advances one byte past itself
        assert_eq!(disasm_bytes(&[0xDD, 0x00]), ("NOP".into(), 2));
        assert_eq!(disasm_bytes(&[0xDD, 0xDD, 0x21]), ("IX prefix".into(), 1));
    }

    #[test]
    fn test_every_unprefixed_byte_decodes() {
        let mut mem = Mmu::new();
        for op in 0..=255u8 {
            mem.write8(0x200, op);
            let (text, len) = disassemble(&mem, 0x200);
            assert!(!text.is_empty());
            assert!((1..=4).contains(&len), "{:#04x} length {}", op, len);
        }
    }
}
