use std::{collections::HashMap, fmt::Debug};

use int_enum::IntEnum;
use once_cell::sync::Lazy;

use crate::Error;

use super::{com::ExecutionContext, mem::Memory};

#[repr(u8)]
#[derive(Debug, Default, Clone, Copy, IntEnum, PartialEq, Eq)]
pub enum ParameterMode {
    #[default]
    Position = 0,
    Immediate = 1,
    Relative = 2,
}

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntEnum, Hash)]
pub enum Opcode {
    Add = 1,
    Multiply = 2,
    Input = 3,
    Output = 4,
    JumpIfTrue = 5,
    JumpIfFalse = 6,
    LessThan = 7,
    Equals = 8,
    AdjustRelativeBase = 9,
    Halt = 99,
}

pub(crate) fn address(value: i64) -> Result<usize, Error> {
    usize::try_from(value).map_err(|_| Error::NegativeAddress(value))
}

/// A decoded instruction: its opcode, raw parameters and one addressing mode per parameter.
pub trait Instruction: Debug {
    fn opcode(&self) -> Opcode;
    fn length(&self) -> usize;
    fn params(&self) -> &[i64];
    fn params_mut(&mut self) -> &mut [i64];
    fn param_modes(&self) -> &[ParameterMode];
    fn param_modes_mut(&mut self) -> &mut [ParameterMode];
    fn execute(&self, context: &mut dyn ExecutionContext) -> Result<(), Error>;

    fn forward_inst_p(&self, context: &mut dyn ExecutionContext) {
        *context.inst_p_mut() += self.length();
    }

    /// Value of the `ind`th parameter, resolved through its mode.
    fn read_param(&self, context: &dyn ExecutionContext, ind: usize) -> Result<i64, Error> {
        let param = self.params()[ind];
        match self.param_modes()[ind] {
            ParameterMode::Position => Ok(context.read_mem(address(param)?)),
            ParameterMode::Immediate => Ok(param),
            ParameterMode::Relative => Ok(context.read_mem(address(
                context.rel_base().wrapping_add(param),
            )?)),
        }
    }

    /// Address the `ind`th parameter points to when it's the destination of a write.
    ///
    /// Immediate mode still yields an address here, destinations are never dereferenced.
    fn target_addr(&self, context: &dyn ExecutionContext, ind: usize) -> Result<usize, Error> {
        let param = self.params()[ind];
        match self.param_modes()[ind] {
            ParameterMode::Position | ParameterMode::Immediate => address(param),
            ParameterMode::Relative => address(context.rel_base().wrapping_add(param)),
        }
    }
}

type ParseFunc = fn(&Memory, usize) -> Result<Box<dyn Instruction>, Error>;
static INST_PARSE_MAP: Lazy<HashMap<Opcode, ParseFunc>> = Lazy::new(|| {
    let mut map = HashMap::new();
    map.insert(Opcode::Add, parse_inst::<Add> as ParseFunc);
    map.insert(Opcode::Multiply, parse_inst::<Multiply> as ParseFunc);
    map.insert(Opcode::Input, parse_inst::<Input> as ParseFunc);
    map.insert(Opcode::Output, parse_inst::<Output> as ParseFunc);
    map.insert(Opcode::JumpIfTrue, parse_inst::<JumpIfTrue> as ParseFunc);
    map.insert(Opcode::JumpIfFalse, parse_inst::<JumpIfFalse> as ParseFunc);
    map.insert(Opcode::LessThan, parse_inst::<LessThan> as ParseFunc);
    map.insert(Opcode::Equals, parse_inst::<Equals> as ParseFunc);
    map.insert(
        Opcode::AdjustRelativeBase,
        parse_inst::<AdjustRelativeBase> as ParseFunc,
    );
    map.insert(Opcode::Halt, parse_inst::<Halt> as ParseFunc);

    map
});

/// Decodes the instruction starting at `inst_p`.
///
/// Parameter cells past the end of memory read as zero.
pub fn decode_inst(mem: &Memory, inst_p: usize) -> Result<Box<dyn Instruction>, Error> {
    let opcode = parse_opcode(mem.read(inst_p))?;
    let parse_func = INST_PARSE_MAP
        .get(&opcode)
        .ok_or(Error::InvalidOpcode(opcode.int_value() as i64))?;
    parse_func(mem, inst_p)
}

fn parse_inst<I>(mem: &Memory, inst_p: usize) -> Result<Box<dyn Instruction>, Error>
where
    I: Instruction + Default + 'static,
{
    let mut inst = I::default();
    parse_param_modes(mem.read(inst_p), inst.param_modes_mut())?;
    for (i, param) in inst.params_mut().iter_mut().enumerate() {
        // Skip operation code
        *param = mem.read(inst_p + i + 1);
    }

    Ok(Box::new(inst))
}

fn parse_opcode(raw: i64) -> Result<Opcode, Error> {
    if raw < 0 {
        return Err(Error::InvalidOpcode(raw));
    }

    let ind = raw % 100;
    u8::try_from(ind)
        .ok()
        .and_then(|n| Opcode::from_int(n).ok())
        .ok_or(Error::InvalidOpcode(ind))
}

// Hundreds digit is the mode of the first parameter, thousands digit the second, and so on.
fn parse_param_modes(raw: i64, param_modes: &mut [ParameterMode]) -> Result<(), Error> {
    let mut cur_ratio = 100;
    for mode in param_modes.iter_mut() {
        let cur_digit = raw / cur_ratio % 10;
        *mode = u8::try_from(cur_digit)
            .ok()
            .and_then(|d| ParameterMode::from_int(d).ok())
            .ok_or(Error::UnknownParameterMode(cur_digit))?;

        cur_ratio *= 10;
    }

    Ok(())
}

macro_rules! def_instruction {
    (
        name=$name:ident, length=$length:literal, opcode=$opcode:expr;
        execute($inst_var:ident, $context_var:ident) => $exe_block:block
    ) => {
        #[derive(Debug, Default)]
        pub struct $name {
            params: [i64; $length - 1],
            param_modes: [ParameterMode; $length - 1],
        }

        impl Instruction for $name {
            #[inline]
            fn length(&self) -> usize {
                $length
            }

            #[inline]
            fn opcode(&self) -> Opcode {
                $opcode
            }

            fn params(&self) -> &[i64] {
                &self.params
            }

            fn params_mut(&mut self) -> &mut [i64] {
                &mut self.params
            }

            fn param_modes(&self) -> &[ParameterMode] {
                &self.param_modes
            }

            fn param_modes_mut(&mut self) -> &mut [ParameterMode] {
                &mut self.param_modes
            }

            fn execute(&self, context: &mut dyn ExecutionContext) -> Result<(), Error> {
                let $inst_var = self;
                let $context_var = context;

                $exe_block
            }
        }
    };
}

def_instruction!(name=Add, length=4, opcode=Opcode::Add; execute(inst, context) => {
    let input0 = inst.read_param(context, 0)?;
    let input1 = inst.read_param(context, 1)?;
    let target = inst.target_addr(context, 2)?;
    context.write_mem(target, input0.wrapping_add(input1));
    inst.forward_inst_p(context);

    Ok(())
});

def_instruction!(name=Multiply, length=4, opcode=Opcode::Multiply; execute(inst, context) => {
    let input0 = inst.read_param(context, 0)?;
    let input1 = inst.read_param(context, 1)?;
    let target = inst.target_addr(context, 2)?;
    context.write_mem(target, input0.wrapping_mul(input1));
    inst.forward_inst_p(context);

    Ok(())
});

// Pointer stays on the halt cell.
def_instruction!(name=Halt, length=1, opcode=Opcode::Halt; execute(_inst, context) => {
    context.halt();

    Ok(())
});

def_instruction!(name=Input, length=2, opcode=Opcode::Input; execute(inst, context) => {
    let target = inst.target_addr(context, 0)?;
    let input = context.input()?;
    context.write_mem(target, input);
    inst.forward_inst_p(context);

    Ok(())
});

def_instruction!(name=Output, length=2, opcode=Opcode::Output; execute(inst, context) => {
    let value = inst.read_param(context, 0)?;
    context.output(value)?;
    inst.forward_inst_p(context);

    Ok(())
});

def_instruction!(name=JumpIfTrue, length=3, opcode=Opcode::JumpIfTrue; execute(inst, context) => {
    let condition = inst.read_param(context, 0)?;
    if condition != 0 {
        let target = inst.read_param(context, 1)?;
        *context.inst_p_mut() = address(target)?;
    } else {
        inst.forward_inst_p(context);
    }

    Ok(())
});

def_instruction!(name=JumpIfFalse, length=3, opcode=Opcode::JumpIfFalse; execute(inst, context) => {
    let condition = inst.read_param(context, 0)?;
    if condition == 0 {
        let target = inst.read_param(context, 1)?;
        *context.inst_p_mut() = address(target)?;
    } else {
        inst.forward_inst_p(context);
    }

    Ok(())
});

def_instruction!(name=LessThan, length=4, opcode=Opcode::LessThan; execute(inst, context) => {
    let input0 = inst.read_param(context, 0)?;
    let input1 = inst.read_param(context, 1)?;
    let target = inst.target_addr(context, 2)?;
    context.write_mem(target, if input0 < input1 { 1 } else { 0 });
    inst.forward_inst_p(context);

    Ok(())
});

def_instruction!(name=Equals, length=4, opcode=Opcode::Equals; execute(inst, context) => {
    let input0 = inst.read_param(context, 0)?;
    let input1 = inst.read_param(context, 1)?;
    let target = inst.target_addr(context, 2)?;
    context.write_mem(target, if input0 == input1 { 1 } else { 0 });
    inst.forward_inst_p(context);

    Ok(())
});

def_instruction!(
    name=AdjustRelativeBase, length=2, opcode=Opcode::AdjustRelativeBase;
    execute(inst, context) => {
        let offset = inst.read_param(context, 0)?;
        let rel_base = context.rel_base().wrapping_add(offset);
        *context.rel_base_mut() = rel_base;
        inst.forward_inst_p(context);

        Ok(())
    }
);
