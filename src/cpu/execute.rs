//! Instruction execution
//!
//! Opcodes are decoded through the x-y-z/p-q decomposition: bits 7-6 pick
//! a quadrant, bits 5-3 and 2-0 the row and column within it. Operand
//! bytes are consumed with `fetch_byte`/`fetch_word`, which advance PC as
//! they go; control transfers write PC directly. Every arm returns the
//! documented T-state cost of the instruction it executed, with the
//! taken/not-taken split on conditional branches and per-mode costs where
//! the 8080 and Z80 tables differ.
//!
//! Layout:
//! - `execute`: quadrant dispatch for one (possibly injected) opcode
//! - `execute_x0` / `execute_x3`: the non-uniform quadrants
//! - `execute_alu`: the eight accumulator operations
//! - `execute_cb`: rotate/shift, BIT, RES, SET
//! - `execute_ed`: the extended table, including the block operations
//! - `execute_index` / `execute_index_cb`: DD/FD and DDCB/FDCB
//!
//! In 8080 mode the prefix byte values fall through to their documented
//! alias meanings (0xCB = JMP, 0xD9 = RET, 0xDD/0xED/0xFD = CALL, the
//! 0x08..0x38 column = NOP) and nothing else changes.

use super::flags;
use super::Cpu;
use super::InterruptMode;

impl Cpu {
    /// Execute one opcode and return its T-state cost
    pub(crate) fn execute(&mut self, op: u8) -> u32 {
        let x = (op >> 6) & 0x03;
        let y = (op >> 3) & 0x07;
        let z = op & 0x07;
        let p = (y >> 1) & 0x03;
        let q = y & 0x01;

        match x {
            0 => self.execute_x0(y, z, p, q),
            1 => {
                if y == 6 && z == 6 {
                    // HALT
                    self.halted = true;
                    if self.is_z80() {
                        4
                    } else {
                        7
                    }
                } else {
                    // LD r,r'
                    let val = self.get_reg8(z);
                    self.set_reg8(y, val);
                    if y == 6 || z == 6 {
                        7
                    } else if self.is_z80() {
                        4
                    } else {
                        5
                    }
                }
            }
            2 => {
                // ALU A,r
                let val = self.get_reg8(z);
                self.execute_alu(y, val);
                if z == 6 {
                    7
                } else {
                    4
                }
            }
            _ => self.execute_x3(y, z, p, q),
        }
    }

    /// Quadrant x=0: relative jumps, 16-bit loads/arithmetic, 8-bit
    /// inc/dec/load, the accumulator rotates and flag instructions
    fn execute_x0(&mut self, y: u8, z: u8, p: u8, q: u8) -> u32 {
        match z {
            0 => {
                // The whole column is NOP on the 8080
                if !self.is_z80() {
                    return 4;
                }
                match y {
                    0 => 4, // NOP
                    1 => {
                        // EX AF,AF'
                        self.ex_af();
                        4
                    }
                    2 => {
                        // DJNZ d
                        let d = self.fetch_byte() as i8;
                        self.set_b(self.b().wrapping_sub(1));
                        if self.b() != 0 {
                            self.pc = self.pc.wrapping_add_signed(d as i16);
                            13
                        } else {
                            8
                        }
                    }
                    3 => {
                        // JR d
                        let d = self.fetch_byte() as i8;
                        self.pc = self.pc.wrapping_add_signed(d as i16);
                        12
                    }
                    _ => {
                        // JR cc,d
                        let d = self.fetch_byte() as i8;
                        if self.check_cc(y - 4) {
                            self.pc = self.pc.wrapping_add_signed(d as i16);
                            12
                        } else {
                            7
                        }
                    }
                }
            }
            1 => {
                if q == 0 {
                    // LD rp,nn
                    let nn = self.fetch_word();
                    self.set_rp(p, nn);
                    10
                } else {
                    // ADD HL,rp
                    let rp = self.get_rp(p);
                    self.hl = self.add16(self.hl, rp);
                    if self.is_z80() {
                        11
                    } else {
                        10
                    }
                }
            }
            2 => match (p, q) {
                (0, 0) => {
                    // LD (BC),A
                    self.mem.write8(self.bc, self.a);
                    7
                }
                (1, 0) => {
                    // LD (DE),A
                    self.mem.write8(self.de, self.a);
                    7
                }
                (2, 0) => {
                    // LD (nn),HL
                    let nn = self.fetch_word();
                    self.mem.write16(nn, self.hl);
                    16
                }
                (3, 0) => {
                    // LD (nn),A
                    let nn = self.fetch_word();
                    self.mem.write8(nn, self.a);
                    13
                }
                (0, 1) => {
                    // LD A,(BC)
                    self.a = self.mem.read8(self.bc);
                    7
                }
                (1, 1) => {
                    // LD A,(DE)
                    self.a = self.mem.read8(self.de);
                    7
                }
                (2, 1) => {
                    // LD HL,(nn)
                    let nn = self.fetch_word();
                    self.hl = self.mem.read16(nn);
                    16
                }
                _ => {
                    // LD A,(nn)
                    let nn = self.fetch_word();
                    self.a = self.mem.read8(nn);
                    13
                }
            },
            3 => {
                if q == 0 {
                    // INC rp
                    self.set_rp(p, self.get_rp(p).wrapping_add(1));
                } else {
                    // DEC rp
                    self.set_rp(p, self.get_rp(p).wrapping_sub(1));
                }
                if self.is_z80() {
                    6
                } else {
                    5
                }
            }
            4 => {
                // INC r
                let val = self.get_reg8(y);
                let result = self.alu_inc(val);
                self.set_reg8(y, result);
                if y == 6 {
                    if self.is_z80() {
                        11
                    } else {
                        10
                    }
                } else if self.is_z80() {
                    4
                } else {
                    5
                }
            }
            5 => {
                // DEC r
                let val = self.get_reg8(y);
                let result = self.alu_dec(val);
                self.set_reg8(y, result);
                if y == 6 {
                    if self.is_z80() {
                        11
                    } else {
                        10
                    }
                } else if self.is_z80() {
                    4
                } else {
                    5
                }
            }
            6 => {
                // LD r,n
                let n = self.fetch_byte();
                self.set_reg8(y, n);
                if y == 6 {
                    10
                } else {
                    7
                }
            }
            _ => {
                match y {
                    0..=3 => self.rot_a(y), // RLCA RRCA RLA RRA
                    4 => self.daa(),
                    5 => {
                        // CPL
                        self.a = !self.a;
                        self.set_flag(flags::AC, true);
                        self.set_flag(flags::N, true);
                        self.copy_u53(self.a);
                    }
                    6 => {
                        // SCF
                        self.set_flag(flags::CY, true);
                        self.set_flag(flags::AC, false);
                        self.set_flag(flags::N, false);
                        self.copy_u53(self.a);
                    }
                    _ => {
                        // CCF
                        let cy = self.flag_cy();
                        self.set_flag(flags::AC, cy);
                        self.set_flag(flags::CY, !cy);
                        self.set_flag(flags::N, false);
                        self.copy_u53(self.a);
                    }
                }
                4
            }
        }
    }

    /// The eight accumulator operations selected by decode row y
    pub(crate) fn execute_alu(&mut self, y: u8, val: u8) {
        match y {
            0 => self.alu_add(val, false),
            1 => self.alu_add(val, true),
            2 => self.alu_sub(val, false),
            3 => self.alu_sub(val, true),
            4 => self.alu_and(val),
            5 => self.alu_xor(val),
            6 => self.alu_or(val),
            _ => self.alu_cp(val),
        }
    }

    /// Quadrant x=3: control flow, stack, I/O and the prefixes
    fn execute_x3(&mut self, y: u8, z: u8, p: u8, q: u8) -> u32 {
        match z {
            0 => {
                // RET cc
                if self.check_cc(y) {
                    self.pc = self.pop16();
                    11
                } else {
                    5
                }
            }
            1 => {
                if q == 0 {
                    // POP rp2
                    let val = self.pop16();
                    self.set_rp2(p, val);
                    10
                } else {
                    match p {
                        0 => {
                            // RET
                            self.pc = self.pop16();
                            10
                        }
                        1 => {
                            if self.is_z80() {
                                // EXX
                                self.exx();
                                4
                            } else {
                                // 0xD9 aliases RET on the 8080
                                self.pc = self.pop16();
                                10
                            }
                        }
                        2 => {
                            // JP (HL)
                            self.pc = self.hl;
                            if self.is_z80() {
                                4
                            } else {
                                5
                            }
                        }
                        _ => {
                            // LD SP,HL
                            self.sp = self.hl;
                            if self.is_z80() {
                                6
                            } else {
                                5
                            }
                        }
                    }
                }
            }
            2 => {
                // JP cc,nn
                let nn = self.fetch_word();
                if self.check_cc(y) {
                    self.pc = nn;
                }
                10
            }
            3 => match y {
                0 => {
                    // JP nn
                    self.pc = self.fetch_word();
                    10
                }
                1 => {
                    if self.is_z80() {
                        self.execute_cb()
                    } else {
                        // 0xCB aliases JMP on the 8080
                        self.pc = self.fetch_word();
                        10
                    }
                }
                2 => {
                    // OUT (n),A
                    let n = self.fetch_byte();
                    self.out_port(n, self.a);
                    if self.is_z80() {
                        11
                    } else {
                        10
                    }
                }
                3 => {
                    // IN A,(n); with no device attached A is left alone
                    let n = self.fetch_byte();
                    if let Some(val) = self.in_port_opt(n) {
                        self.a = val;
                    }
                    if self.is_z80() {
                        11
                    } else {
                        10
                    }
                }
                4 => {
                    // EX (SP),HL
                    let val = self.mem.read16(self.sp);
                    self.mem.write16(self.sp, self.hl);
                    self.hl = val;
                    if self.is_z80() {
                        19
                    } else {
                        18
                    }
                }
                5 => {
                    // EX DE,HL
                    self.ex_de_hl();
                    4
                }
                6 => {
                    // DI
                    self.iff1 = false;
                    self.iff2 = false;
                    self.cancel_ei();
                    4
                }
                _ => {
                    // EI takes effect after the next instruction
                    self.schedule_ei();
                    4
                }
            },
            4 => {
                // CALL cc,nn
                let nn = self.fetch_word();
                if self.check_cc(y) {
                    self.push16(self.pc);
                    self.pc = nn;
                    17
                } else if self.is_z80() {
                    10
                } else {
                    11
                }
            }
            5 => {
                if q == 0 {
                    // PUSH rp2
                    let val = self.get_rp2(p);
                    self.push16(val);
                    11
                } else if p == 0 || !self.is_z80() {
                    // CALL nn; on the 8080 the DD/ED/FD bytes alias CALL
                    let nn = self.fetch_word();
                    self.push16(self.pc);
                    self.pc = nn;
                    17
                } else {
                    match p {
                        1 => self.execute_index(true),  // DD prefix (IX)
                        2 => self.execute_ed(),         // ED prefix
                        _ => self.execute_index(false), // FD prefix (IY)
                    }
                }
            }
            6 => {
                // ALU A,n
                let n = self.fetch_byte();
                self.execute_alu(y, n);
                7
            }
            _ => {
                // RST y*8
                self.push16(self.pc);
                self.pc = (y as u16) * 8;
                11
            }
        }
    }

    // ========== CB Prefix (Rotates and Bit Operations) ==========

    fn execute_cb(&mut self) -> u32 {
        let op = self.fetch_byte();
        self.bump_r();
        let x = (op >> 6) & 0x03;
        let y = (op >> 3) & 0x07;
        let z = op & 0x07;

        match x {
            0 => {
                // Rotate/shift family
                let val = self.get_reg8(z);
                let result = self.rot(y, val);
                self.set_reg8(z, result);
                if z == 6 {
                    15
                } else {
                    8
                }
            }
            1 => {
                // BIT y,r; the memory form leaks the high byte of the
                // address into U3/U5
                let val = self.get_reg8(z);
                let internal = if z == 6 { (self.hl >> 8) as u8 } else { val };
                self.bit_test(val, y, internal);
                if z == 6 {
                    12
                } else {
                    8
                }
            }
            2 => {
                // RES y,r
                let val = self.get_reg8(z);
                self.set_reg8(z, val & !(1 << y));
                if z == 6 {
                    15
                } else {
                    8
                }
            }
            _ => {
                // SET y,r
                let val = self.get_reg8(z);
                self.set_reg8(z, val | (1 << y));
                if z == 6 {
                    15
                } else {
                    8
                }
            }
        }
    }

    // ========== ED Prefix (Extended Instructions) ==========

    fn execute_ed(&mut self) -> u32 {
        let op = self.fetch_byte();
        self.bump_r();
        let x = (op >> 6) & 0x03;
        let y = (op >> 3) & 0x07;
        let z = op & 0x07;
        let p = (y >> 1) & 0x03;
        let q = y & 0x01;

        match x {
            1 => self.execute_ed_x1(y, z, p, q),
            2 => {
                if z <= 3 && y >= 4 {
                    self.execute_bli(y, z)
                } else {
                    8
                }
            }
            // The rest of the ED space is NONI: no operation
            _ => 8,
        }
    }

    fn execute_ed_x1(&mut self, y: u8, z: u8, p: u8, q: u8) -> u32 {
        match z {
            0 => {
                // IN r,(C); y=6 is the flags-only IN (C)
                let val = self.in_port(self.c());
                if y != 6 {
                    self.set_reg8(y, val);
                }
                self.in_flags(val);
                12
            }
            1 => {
                // OUT (C),r; y=6 is the undocumented OUT (C),0
                let val = if y == 6 { 0 } else { self.get_reg8(y) };
                self.out_port(self.c(), val);
                12
            }
            2 => {
                if q == 0 {
                    // SBC HL,rp
                    let rp = self.get_rp(p);
                    self.hl = self.sbc16(self.hl, rp);
                } else {
                    // ADC HL,rp
                    let rp = self.get_rp(p);
                    self.hl = self.adc16(self.hl, rp);
                }
                15
            }
            3 => {
                let nn = self.fetch_word();
                if q == 0 {
                    // LD (nn),rp
                    self.mem.write16(nn, self.get_rp(p));
                } else {
                    // LD rp,(nn)
                    let val = self.mem.read16(nn);
                    self.set_rp(p, val);
                }
                20
            }
            4 => {
                // NEG occupies all eight encodings
                self.neg();
                8
            }
            5 => {
                // RETN (and RETI at y=1); RETN restores IFF1 from IFF2
                self.pc = self.pop16();
                if y != 1 {
                    self.iff1 = self.iff2;
                }
                14
            }
            6 => {
                // IM 0/1/2
                self.im = match y & 0x03 {
                    2 => InterruptMode::Mode1,
                    3 => InterruptMode::Mode2,
                    _ => InterruptMode::Mode0,
                };
                8
            }
            _ => match y {
                0 => {
                    // LD I,A
                    self.i = self.a;
                    9
                }
                1 => {
                    // LD R,A
                    self.r = self.a;
                    9
                }
                2 => {
                    // LD A,I
                    self.a = self.i;
                    let iff2 = self.iff2;
                    self.set_flags_no_cy(self.a);
                    self.set_flag(flags::PV, iff2);
                    self.set_flag(flags::AC, false);
                    self.set_flag(flags::N, false);
                    9
                }
                3 => {
                    // LD A,R
                    self.a = self.r;
                    let iff2 = self.iff2;
                    self.set_flags_no_cy(self.a);
                    self.set_flag(flags::PV, iff2);
                    self.set_flag(flags::AC, false);
                    self.set_flag(flags::N, false);
                    9
                }
                4 => {
                    self.rrd();
                    18
                }
                5 => {
                    self.rld();
                    18
                }
                _ => 8,
            },
        }
    }

    /// Block transfer/search/IO family (ED x=2). The repeat variants run
    /// to completion inside one step; a counter of zero behaves as 65536.
    fn execute_bli(&mut self, y: u8, z: u8) -> u32 {
        // Row y: 4 = increment form, 5 = decrement, 6/7 = repeating
        let delta: i8 = if y & 1 == 0 { 1 } else { -1 };
        let repeat = y >= 6;

        match z {
            0 => {
                // LDI / LDD / LDIR / LDDR
                let mut cycles = 0;
                loop {
                    self.block_ld(delta);
                    if !repeat || self.bc == 0 {
                        cycles += 16;
                        return cycles;
                    }
                    cycles += 21;
                }
            }
            1 => {
                // CPI / CPD / CPIR / CPDR; repeats also stop on a match
                let mut cycles = 0;
                loop {
                    self.block_cp(delta);
                    if !repeat || self.bc == 0 || self.flag_z() {
                        cycles += 16;
                        return cycles;
                    }
                    cycles += 21;
                }
            }
            2 => {
                // INI / IND / INIR / INDR; the counter is B
                let mut cycles = 0;
                loop {
                    self.block_in(delta);
                    if !repeat || self.b() == 0 {
                        cycles += 16;
                        return cycles;
                    }
                    cycles += 21;
                }
            }
            _ => {
                // OUTI / OUTD / OTIR / OTDR
                let mut cycles = 0;
                loop {
                    self.block_out(delta);
                    if !repeat || self.b() == 0 {
                        cycles += 16;
                        return cycles;
                    }
                    cycles += 21;
                }
            }
        }
    }

    // ========== DD/FD Prefix (IX/IY Instructions) ==========

    /// Execute a DD/FD prefixed instruction. Second bytes with no indexed
    /// meaning discard the prefix: its fetch cost is charged and the byte
    /// executes as an unprefixed opcode.
    fn execute_index(&mut self, use_ix: bool) -> u32 {
        let mut use_ix = use_ix;
        let mut prefix_cost = 4u32;

        // Chained prefixes: only the last DD/FD wins
        let op = loop {
            let op = self.fetch_byte();
            match op {
                0xDD => {
                    self.bump_r();
                    use_ix = true;
                    prefix_cost += 4;
                }
                0xFD => {
                    self.bump_r();
                    use_ix = false;
                    prefix_cost += 4;
                }
                _ => break op,
            }
        };
        self.bump_r();

        if op == 0xCB {
            return prefix_cost + self.execute_index_cb(use_ix);
        }
        if op == 0xED {
            // ED ignores a preceding index prefix
            return prefix_cost + self.execute_ed();
        }

        let x = (op >> 6) & 0x03;
        let y = (op >> 3) & 0x07;
        let z = op & 0x07;
        let p = (y >> 1) & 0x03;
        let q = y & 0x01;

        prefix_cost
            + match x {
                0 => self.execute_index_x0(y, z, p, q, use_ix),
                1 => {
                    if y == 6 && z == 6 {
                        // HALT is unaffected by the prefix
                        self.halted = true;
                        4
                    } else if y == 6 {
                        // LD (IX+d),r; the source register is never
                        // substituted
                        let d = self.fetch_byte() as i8;
                        let addr = self.index_addr(use_ix, d);
                        let src = self.get_reg8(z);
                        self.mem.write8(addr, src);
                        15
                    } else if z == 6 {
                        // LD r,(IX+d); the destination is never substituted
                        let d = self.fetch_byte() as i8;
                        let addr = self.index_addr(use_ix, d);
                        let val = self.mem.read8(addr);
                        self.set_reg8(y, val);
                        15
                    } else {
                        // LD r,r' over the index halves
                        let val = self.get_reg8_index(z, use_ix);
                        self.set_reg8_index(y, val, use_ix);
                        4
                    }
                }
                2 => {
                    if z == 6 {
                        // ALU A,(IX+d)
                        let d = self.fetch_byte() as i8;
                        let addr = self.index_addr(use_ix, d);
                        let val = self.mem.read8(addr);
                        self.execute_alu(y, val);
                        15
                    } else {
                        // ALU A over the index halves
                        let val = self.get_reg8_index(z, use_ix);
                        self.execute_alu(y, val);
                        4
                    }
                }
                _ => self.execute_index_x3(y, z, p, q, use_ix),
            }
    }

    /// Effective address of an indexed memory operand
    #[inline]
    fn index_addr(&self, use_ix: bool, d: i8) -> u16 {
        let base = if use_ix { self.ix } else { self.iy };
        base.wrapping_add_signed(d as i16)
    }

    fn index_reg(&self, use_ix: bool) -> u16 {
        if use_ix {
            self.ix
        } else {
            self.iy
        }
    }

    fn set_index_reg(&mut self, use_ix: bool, val: u16) {
        if use_ix {
            self.ix = val;
        } else {
            self.iy = val;
        }
    }

    fn execute_index_x0(&mut self, y: u8, z: u8, p: u8, q: u8, use_ix: bool) -> u32 {
        match z {
            1 if q == 1 => {
                // ADD IX,rp; rp index 2 names IX itself here
                let rp = if p == 2 {
                    self.index_reg(use_ix)
                } else {
                    self.get_rp(p)
                };
                let result = self.add16(self.index_reg(use_ix), rp);
                self.set_index_reg(use_ix, result);
                11
            }
            1 if p == 2 => {
                // LD IX,nn
                let nn = self.fetch_word();
                self.set_index_reg(use_ix, nn);
                10
            }
            2 if p == 2 => {
                if q == 0 {
                    // LD (nn),IX
                    let nn = self.fetch_word();
                    self.mem.write16(nn, self.index_reg(use_ix));
                } else {
                    // LD IX,(nn)
                    let nn = self.fetch_word();
                    let val = self.mem.read16(nn);
                    self.set_index_reg(use_ix, val);
                }
                16
            }
            3 if p == 2 => {
                // INC IX / DEC IX
                let val = if q == 0 {
                    self.index_reg(use_ix).wrapping_add(1)
                } else {
                    self.index_reg(use_ix).wrapping_sub(1)
                };
                self.set_index_reg(use_ix, val);
                6
            }
            4 if y >= 4 => {
                // INC (IX+d) / INC IXH / INC IXL
                if y == 6 {
                    let d = self.fetch_byte() as i8;
                    let addr = self.index_addr(use_ix, d);
                    let val = self.mem.read8(addr);
                    let result = self.alu_inc(val);
                    self.mem.write8(addr, result);
                    19
                } else {
                    let val = self.get_reg8_index(y, use_ix);
                    let result = self.alu_inc(val);
                    self.set_reg8_index(y, result, use_ix);
                    4
                }
            }
            5 if y >= 4 => {
                // DEC (IX+d) / DEC IXH / DEC IXL
                if y == 6 {
                    let d = self.fetch_byte() as i8;
                    let addr = self.index_addr(use_ix, d);
                    let val = self.mem.read8(addr);
                    let result = self.alu_dec(val);
                    self.mem.write8(addr, result);
                    19
                } else {
                    let val = self.get_reg8_index(y, use_ix);
                    let result = self.alu_dec(val);
                    self.set_reg8_index(y, result, use_ix);
                    4
                }
            }
            6 if y >= 4 => {
                // LD (IX+d),n / LD IXH,n / LD IXL,n
                if y == 6 {
                    let d = self.fetch_byte() as i8;
                    let n = self.fetch_byte();
                    let addr = self.index_addr(use_ix, d);
                    self.mem.write8(addr, n);
                    15
                } else {
                    let n = self.fetch_byte();
                    self.set_reg8_index(y, n, use_ix);
                    7
                }
            }
            // No indexed meaning: the prefix was a no-op
            _ => self.execute_x0(y, z, p, q),
        }
    }

    fn execute_index_x3(&mut self, y: u8, z: u8, p: u8, q: u8, use_ix: bool) -> u32 {
        match (z, q, p) {
            (1, 0, 2) => {
                // POP IX
                let val = self.pop16();
                self.set_index_reg(use_ix, val);
                10
            }
            (1, 1, 2) => {
                // JP (IX)
                self.pc = self.index_reg(use_ix);
                4
            }
            (1, 1, 3) => {
                // LD SP,IX
                self.sp = self.index_reg(use_ix);
                6
            }
            (3, _, 2) if q == 0 => {
                // EX (SP),IX
                let val = self.mem.read16(self.sp);
                self.mem.write16(self.sp, self.index_reg(use_ix));
                self.set_index_reg(use_ix, val);
                19
            }
            (5, 0, 2) => {
                // PUSH IX
                let val = self.index_reg(use_ix);
                self.push16(val);
                11
            }
            _ => self.execute_x3(y, z, p, q),
        }
    }

    // ========== DDCB/FDCB (Indexed Bit Operations) ==========

    /// The displacement byte comes before the operation byte. Every
    /// non-BIT operation writes the memory result back and, unless the
    /// low three bits select column 6, copies it to that register too.
    fn execute_index_cb(&mut self, use_ix: bool) -> u32 {
        let d = self.fetch_byte() as i8;
        let op = self.fetch_byte();
        let x = (op >> 6) & 0x03;
        let y = (op >> 3) & 0x07;
        let z = op & 0x07;

        let addr = self.index_addr(use_ix, d);
        let val = self.mem.read8(addr);

        match x {
            0 => {
                // Rotate/shift on (IX+d)
                let result = self.rot(y, val);
                self.mem.write8(addr, result);
                if z != 6 {
                    self.set_reg8(z, result);
                }
                19
            }
            1 => {
                // BIT y,(IX+d); U3/U5 leak the high byte of the address
                self.bit_test(val, y, (addr >> 8) as u8);
                16
            }
            2 => {
                // RES y,(IX+d)
                let result = val & !(1 << y);
                self.mem.write8(addr, result);
                if z != 6 {
                    self.set_reg8(z, result);
                }
                19
            }
            _ => {
                // SET y,(IX+d)
                let result = val | (1 << y);
                self.mem.write8(addr, result);
                if z != 6 {
                    self.set_reg8(z, result);
                }
                19
            }
        }
    }
}
