use tracing::{debug, trace};

use crate::Error;

use super::{
    inst::{address, decode_inst, Instruction, Opcode},
    io::Stream,
    mem::Memory,
    parse_int_code,
};

/// What instructions see of the running computer.
pub trait ExecutionContext {
    fn read_mem(&self, ind: usize) -> i64;
    fn write_mem(&mut self, ind: usize, value: i64);
    fn input(&mut self) -> Result<i64, Error>;
    fn output(&mut self, value: i64) -> Result<(), Error>;
    fn inst_p_mut(&mut self) -> &mut usize;
    fn rel_base(&self) -> i64;
    fn rel_base_mut(&mut self) -> &mut i64;
    fn halt(&mut self);
}

/// State of the computer after a step.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ExecutionState {
    Running,
    PausedOnOutput,
    Halted,
}

/// An intcode computer running one program, talking to the outside world through `S`.
///
/// A computer is never reset, running the same program again needs a new one.
pub struct IntCodeComputer<S: Stream> {
    mem: Memory,
    inst_p: usize,
    rel_base: i64,
    halted: bool,
    step_count: usize,
    stream: S,
}

impl<S: Stream> IntCodeComputer<S> {
    /// Creates a computer with a copy of `image` as its memory.
    pub fn new(image: &[i64], stream: S) -> Self {
        Self {
            mem: Memory::new(image),
            inst_p: 0,
            rel_base: 0,
            halted: false,
            step_count: 0,
            stream,
        }
    }

    pub fn from_text(text: &str, stream: S) -> Result<Self, Error> {
        let image = parse_int_code(text)?;
        Ok(Self::new(&image, stream))
    }

    /// Reads memory at `addr`, cells beyond the allocated memory are zero.
    pub fn load(&self, addr: i64) -> Result<i64, Error> {
        Ok(self.mem.read(address(addr)?))
    }

    /// Writes memory at `addr`, growing the memory when needed.
    pub fn store(&mut self, addr: i64, value: i64) -> Result<(), Error> {
        self.mem.write(address(addr)?, value);
        Ok(())
    }

    pub fn decode(&self, inst_p: usize) -> Result<Box<dyn Instruction>, Error> {
        decode_inst(&self.mem, inst_p)
    }

    /// Executes one instruction.
    ///
    /// A halted computer executes nothing and stays halted. On error, nothing of the computer
    /// has changed, so a step which failed for lack of input can be retried once input is there.
    pub fn step(&mut self) -> Result<ExecutionState, Error> {
        if self.halted {
            return Ok(ExecutionState::Halted);
        }

        let inst = self.decode(self.inst_p)?;
        trace!(
            step = self.step_count,
            inst_p = self.inst_p,
            rel_base = self.rel_base,
            "{:?}",
            inst
        );
        if let Err(e) = inst.execute(self) {
            if matches!(e, Error::NotEnoughInput) {
                debug!(inst_p = self.inst_p, "blocked by requiring input");
            }
            return Err(e);
        }
        self.step_count += 1;

        if self.halted {
            debug!(steps = self.step_count, "halt");
            Ok(ExecutionState::Halted)
        } else if inst.opcode() == Opcode::Output {
            Ok(ExecutionState::PausedOnOutput)
        } else {
            Ok(ExecutionState::Running)
        }
    }

    /// Runs until an output is produced or the program halts, returns which one happened.
    pub fn run_to_pause(&mut self) -> Result<ExecutionState, Error> {
        loop {
            match self.step()? {
                ExecutionState::Running => (),
                state => return Ok(state),
            }
        }
    }

    /// Runs until the program halts, outputs don't pause it.
    pub fn run_to_halt(&mut self) -> Result<(), Error> {
        while self.step()? != ExecutionState::Halted {}

        Ok(())
    }

    /// Dense memory from address 0, see `far_cells` for cells written far beyond it.
    pub fn dump(&self) -> &[i64] {
        self.mem.as_slice()
    }

    pub fn far_cells(&self) -> impl Iterator<Item = (usize, i64)> + '_ {
        self.mem.far_cells()
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn inst_p(&self) -> usize {
        self.inst_p
    }

    pub fn rel_base(&self) -> i64 {
        self.rel_base
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub fn stream(&self) -> &S {
        &self.stream
    }

    pub fn stream_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    pub fn into_stream(self) -> S {
        self.stream
    }
}

impl<S: Stream> ExecutionContext for IntCodeComputer<S> {
    fn read_mem(&self, ind: usize) -> i64 {
        self.mem.read(ind)
    }

    fn write_mem(&mut self, ind: usize, value: i64) {
        self.mem.write(ind, value)
    }

    fn input(&mut self) -> Result<i64, Error> {
        self.stream.read()
    }

    fn output(&mut self, value: i64) -> Result<(), Error> {
        self.stream.write(value)
    }

    fn inst_p_mut(&mut self) -> &mut usize {
        &mut self.inst_p
    }

    fn rel_base(&self) -> i64 {
        self.rel_base
    }

    fn rel_base_mut(&mut self) -> &mut i64 {
        &mut self.rel_base
    }

    fn halt(&mut self) {
        self.halted = true;
    }
}
