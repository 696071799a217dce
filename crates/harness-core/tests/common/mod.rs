//! Test doubles for the device-under-test seam.
//!
//! `TransportCore` is a cycle-stepped behavioural model of the
//! transport-triggered processor: it fetches header and operand words over
//! the instruction port (one word per bus cycle), resolves the source
//! unit, and commits the destination transport, raising data-port
//! transactions for the memory units. It exists so the end-to-end
//! scenarios exercise the real driver loop, not to model the production
//! core's internals.

use std::collections::VecDeque;

use harness_core::{
    decode_header, BusRequest, BusResponse, ControlLines, Dut, HeaderFields, Unit, WSTRB_ALL,
};

const REGISTER_COUNT: usize = 16;
const STACK_SLOTS: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Boot,
    AwaitHeader,
    AwaitSoperand,
    AwaitDoperand,
    AwaitLoad,
}

/// Behavioural transport-core model implementing [`Dut`].
#[derive(Debug)]
pub struct TransportCore {
    prev_clk: bool,
    stage: Stage,
    pc: u32,
    regs: [u32; REGISTER_COUNT],
    stack: [u32; STACK_SLOTS],
    sp: usize,
    alu_left: u32,
    alu_right: u32,
    alu_operator: u32,
    header: HeaderFields,
    soperand: u32,
    doperand: u32,
    instr_req: BusRequest,
    instr_resp: BusResponse,
    data_req: BusRequest,
    data_resp: BusResponse,
}

impl Default for TransportCore {
    fn default() -> Self {
        Self::new()
    }
}

impl TransportCore {
    pub fn new() -> Self {
        Self {
            prev_clk: false,
            stage: Stage::Boot,
            pc: 0,
            regs: [0; REGISTER_COUNT],
            stack: [0; STACK_SLOTS],
            sp: 0,
            alu_left: 0,
            alu_right: 0,
            alu_operator: 0,
            header: HeaderFields {
                src_unit: Unit::None,
                si: 0,
                dst_unit: Unit::None,
                di: 0,
            },
            soperand: 0,
            doperand: 0,
            instr_req: BusRequest::idle(),
            instr_resp: BusResponse::idle(),
            data_req: BusRequest::idle(),
            data_resp: BusResponse::idle(),
        }
    }

    pub fn register(&self, index: usize) -> u32 {
        self.regs[index]
    }

    pub fn pc(&self) -> u32 {
        self.pc
    }

    fn apply_reset(&mut self) {
        self.stage = Stage::Boot;
        self.pc = 0;
        self.regs = [0; REGISTER_COUNT];
        self.stack = [0; STACK_SLOTS];
        self.sp = 0;
        self.alu_left = 0;
        self.alu_right = 0;
        self.alu_operator = 0;
        self.instr_req = BusRequest::idle();
        self.instr_resp = BusResponse::idle();
        self.data_req = BusRequest::idle();
        self.data_resp = BusResponse::idle();
    }

    fn fetch(&mut self, addr: u32) {
        self.instr_req = BusRequest::read(addr);
    }

    fn on_rising_edge(&mut self) {
        let instr_resp = self.instr_resp;
        let data_resp = self.data_resp;
        self.instr_req = BusRequest::idle();
        self.data_req = BusRequest::idle();

        match self.stage {
            Stage::Boot => {
                self.fetch(self.pc);
                self.stage = Stage::AwaitHeader;
            }
            Stage::AwaitHeader => {
                if !instr_resp.ready {
                    self.fetch(self.pc);
                    return;
                }
                match decode_header(instr_resp.read_data) {
                    Some(header) => {
                        self.header = header;
                        self.pc += 1;
                        self.after_header();
                    }
                    None => {
                        // Reserved unit selector: skip the word.
                        self.pc += 1;
                        self.fetch(self.pc);
                    }
                }
            }
            Stage::AwaitSoperand => {
                self.soperand = instr_resp.read_data;
                self.pc += 1;
                if self.header.dst_unit.needs_operand() {
                    self.fetch(self.pc);
                    self.stage = Stage::AwaitDoperand;
                } else {
                    self.resolve_source();
                }
            }
            Stage::AwaitDoperand => {
                self.doperand = instr_resp.read_data;
                self.pc += 1;
                self.resolve_source();
            }
            Stage::AwaitLoad => {
                self.commit(data_resp.read_data);
            }
        }
    }

    fn after_header(&mut self) {
        if self.header.src_unit.needs_operand() {
            self.fetch(self.pc);
            self.stage = Stage::AwaitSoperand;
        } else if self.header.dst_unit.needs_operand() {
            self.fetch(self.pc);
            self.stage = Stage::AwaitDoperand;
        } else {
            self.resolve_source();
        }
    }

    /// Produces the source value, raising a data-port read for the memory
    /// units (the value then arrives on the next bus cycle).
    fn resolve_source(&mut self) {
        let si_index = (self.header.si as u16 as usize) % REGISTER_COUNT;
        match self.header.src_unit {
            Unit::None => self.commit(0),
            Unit::AbsImmediate => self.commit(self.header.si as i32 as u32),
            Unit::AbsOperand => self.commit(self.soperand),
            Unit::Register => self.commit(self.regs[si_index]),
            Unit::AluLeft => self.commit(self.alu_left),
            Unit::AluRight => self.commit(self.alu_right),
            Unit::AluOperator => self.commit(self.alu_operator),
            Unit::AluResult => {
                let result = self.alu_result();
                self.commit(result);
            }
            Unit::Pc => self.commit(self.pc),
            Unit::StackPushPop => {
                self.sp = self.sp.saturating_sub(1);
                self.commit(self.stack[self.sp]);
            }
            Unit::StackIndex => {
                let slot = self.stack_slot(self.header.si);
                self.commit(self.stack[slot]);
            }
            Unit::MemoryImmediate => self.load(self.header.si as i32 as u32),
            Unit::MemoryOperand => self.load(self.soperand),
            Unit::RegisterPointer => self.load(self.regs[si_index]),
        }
    }

    fn load(&mut self, addr: u32) {
        self.data_req = BusRequest::read(addr);
        self.stage = Stage::AwaitLoad;
    }

    /// Routes `value` into the destination unit and starts the next fetch.
    fn commit(&mut self, value: u32) {
        let di_index = (self.header.di as u16 as usize) % REGISTER_COUNT;
        match self.header.dst_unit {
            Unit::None | Unit::AluResult => {}
            Unit::Register => self.regs[di_index] = value,
            Unit::AluLeft => self.alu_left = value,
            Unit::AluRight => self.alu_right = value,
            Unit::AluOperator => self.alu_operator = value,
            Unit::MemoryImmediate => {
                self.data_req = BusRequest::write(self.header.di as i32 as u32, value, WSTRB_ALL);
            }
            Unit::MemoryOperand => {
                self.data_req = BusRequest::write(self.doperand, value, WSTRB_ALL);
            }
            Unit::RegisterPointer => {
                self.data_req = BusRequest::write(self.regs[di_index], value, WSTRB_ALL);
            }
            Unit::Pc => self.pc = value,
            Unit::StackPushPop => {
                if self.sp < STACK_SLOTS {
                    self.stack[self.sp] = value;
                    self.sp += 1;
                }
            }
            Unit::StackIndex => {
                let slot = self.stack_slot(self.header.di);
                self.stack[slot] = value;
            }
            Unit::AbsImmediate | Unit::AbsOperand => {}
        }

        self.fetch(self.pc);
        self.stage = Stage::AwaitHeader;
    }

    fn stack_slot(&self, displacement: i16) -> usize {
        self.sp
            .saturating_sub(1)
            .saturating_sub(displacement as u16 as usize)
            % STACK_SLOTS
    }

    fn alu_result(&self) -> u32 {
        use harness_core::AluOp;

        let left = self.alu_left;
        let right = self.alu_right;
        match AluOp::from_u16(self.alu_operator as u16) {
            None | Some(AluOp::Nop) => left,
            Some(AluOp::Add) => left.wrapping_add(right),
            Some(AluOp::Sub) => left.wrapping_sub(right),
            Some(AluOp::Mul) => left.wrapping_mul(right),
            Some(AluOp::Div) => left.checked_div(right).unwrap_or(0),
            Some(AluOp::Mod) => left.checked_rem(right).unwrap_or(0),
            Some(AluOp::Eql) => u32::from(left == right),
            Some(AluOp::Sl) => left << (right & 31),
            Some(AluOp::Sr) => left >> (right & 31),
            Some(AluOp::Sra) => ((left as i32) >> (right & 31)) as u32,
            Some(AluOp::Not) => !left,
            Some(AluOp::And) => left & right,
            Some(AluOp::Or) => left | right,
            Some(AluOp::Xor) => left ^ right,
            Some(AluOp::Gt) => u32::from((left as i32) > (right as i32)),
            Some(AluOp::Lt) => u32::from((left as i32) < (right as i32)),
        }
    }
}

impl Dut for TransportCore {
    fn eval(&mut self, lines: ControlLines) {
        if lines.reset {
            self.apply_reset();
            self.prev_clk = lines.clk;
            return;
        }

        let rising = lines.clk && !self.prev_clk;
        self.prev_clk = lines.clk;
        if rising {
            self.on_rising_edge();
        }
    }

    fn instr_request(&self) -> BusRequest {
        self.instr_req
    }

    fn set_instr_response(&mut self, resp: BusResponse) {
        self.instr_resp = resp;
    }

    fn data_request(&self) -> BusRequest {
        self.data_req
    }

    fn set_data_response(&mut self, resp: BusResponse) {
        self.data_resp = resp;
    }
}

/// A device whose only activity is shifting framed bytes out on the
/// serial transmit line, one bit per bus cycle.
#[derive(Debug)]
pub struct SerialSource {
    bits: VecDeque<bool>,
    level: bool,
    prev_clk: bool,
}

impl SerialSource {
    pub fn new(bytes: &[u8]) -> Self {
        let mut bits = VecDeque::new();
        for byte in bytes {
            bits.push_back(false); // start
            for position in 0..8 {
                bits.push_back((byte >> position) & 1 != 0);
            }
            bits.push_back(true); // stop
        }
        Self {
            bits,
            level: true,
            prev_clk: false,
        }
    }

    pub fn done(&self) -> bool {
        self.bits.is_empty()
    }
}

impl Dut for SerialSource {
    fn eval(&mut self, lines: ControlLines) {
        let rising = lines.clk && !self.prev_clk;
        self.prev_clk = lines.clk;
        if rising && !lines.reset {
            self.level = self.bits.pop_front().unwrap_or(true);
        }
    }

    fn instr_request(&self) -> BusRequest {
        BusRequest::idle()
    }

    fn set_instr_response(&mut self, _resp: BusResponse) {}

    fn data_request(&self) -> BusRequest {
        BusRequest::idle()
    }

    fn set_data_response(&mut self, _resp: BusResponse) {}

    fn tx_line(&self) -> bool {
        self.level
    }
}
