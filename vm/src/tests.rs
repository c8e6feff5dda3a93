use {
    super::*,
    alloc::{vec, vec::Vec},
    uvmbytecode::{Instruction, Kind},
};

fn program(source: &[(Kind, [i128; 2])]) -> Program {
    source
        .iter()
        .map(|&(kind, operands)| Instruction::new(kind, &operands).unwrap())
        .collect()
}

fn reg(n: i128) -> Reg {
    Reg::new(n, uvmbytecode::Field::Reg).unwrap()
}

#[test]
fn empty_program() {
    let mut vm = Vm::with_config(Program::default(), &VmConfig::default());
    assert_eq!(vm.state(), VmState::Halted);
    assert_eq!(vm.run(), Ok(()));
    assert_eq!(vm.pc(), 0);
    assert_eq!(vm.registers(), &[0; REGISTER_COUNT]);
}

#[test]
fn load_const() {
    let mut vm = Vm::with_config(
        program(&[(Kind::LoadConst, [3, 0x10]), (Kind::LoadConst, [31, 0xFF_FFFF])]),
        &VmConfig::default(),
    );
    assert_eq!(vm.state(), VmState::Loaded);
    assert_eq!(vm.run(), Ok(()));
    assert_eq!(vm.state(), VmState::Halted);
    assert_eq!(vm.read_reg(reg(3)), 16);
    assert_eq!(vm.read_reg(reg(31)), 0xFF_FFFF);
}

#[test]
fn write_then_read_memory() {
    let mut vm = Vm::with_config(
        program(&[
            (Kind::LoadConst, [0, 5]),
            (Kind::LoadConst, [1, 0x100]),
            (Kind::WriteMem, [0, 1]),
            (Kind::ReadMem, [2, 1]),
        ]),
        &VmConfig::default(),
    );
    assert_eq!(vm.run(), Ok(()));
    assert_eq!(vm.memory().load(256), Ok(5));
    assert_eq!(vm.read_reg(reg(2)), 5);
    assert_eq!(vm.dump(255..258), Ok(vec![(255, 0), (256, 5), (257, 0)]));
}

#[test]
fn shift_right_is_logical() {
    let mut vm = Vm::new(
        program(&[
            (Kind::LoadConst, [7, 0xFF_FFFF]),
            (Kind::ShiftRight, [7, 0]),
            (Kind::ShiftRight, [7, 0]),
            (Kind::ShiftRight, [8, 1]),
        ]),
        vec![u32::MAX; 4],
    );
    assert_eq!(vm.run(), Ok(()));
    // Repeated shifts write the same value, the cell is not re-read
    assert_eq!(vm.dump(0..4), Ok(vec![(0, 0x7F_FFFF), (1, 0), (2, u32::MAX), (3, u32::MAX)]));
    assert_eq!(vm.read_reg(reg(7)), 0xFF_FFFF);
}

#[test]
fn shift_right_of_full_word() {
    let mut vm = Vm::new(
        program(&[(Kind::LoadConst, [1, 0]), (Kind::ReadMem, [4, 1]), (Kind::ShiftRight, [4, 1])]),
        vec![u32::MAX, 0],
    );
    assert_eq!(vm.run(), Ok(()));
    assert_eq!(vm.read_reg(reg(4)), u32::MAX);
    assert_eq!(vm.memory().load(1), Ok(0x7FFF_FFFF));
}

#[test]
fn read_out_of_bounds() {
    let mut vm = Vm::new(
        program(&[(Kind::LoadConst, [1, 64]), (Kind::ReadMem, [2, 1]), (Kind::LoadConst, [3, 1])]),
        vec![0_u32; 64],
    );
    let err = vm.run().unwrap_err();
    assert_eq!(err, VmRunError::LoadAccessEx { pc: 1, address: 64 });
    assert_eq!((err.pc(), err.address()), (1, 64));
    assert_eq!(vm.pc(), 1);
    assert_eq!(vm.state(), VmState::Loaded);
    assert_eq!(vm.read_reg(reg(3)), 0);
}

#[test]
fn write_out_of_bounds() {
    let mut vm = Vm::with_config(
        program(&[(Kind::LoadConst, [1, 0x10_0000]), (Kind::WriteMem, [0, 1])]),
        &VmConfig { memory_size: 0x10_0000 },
    );
    assert_eq!(vm.run(), Err(VmRunError::StoreAccessEx { pc: 1, address: 0x10_0000 }));
}

#[test]
fn shift_right_past_smaller_memory() {
    let mut vm = Vm::new(program(&[(Kind::ShiftRight, [0, 1_000_000])]), vec![0_u32; 1024]);
    assert_eq!(vm.run(), Err(VmRunError::StoreAccessEx { pc: 0, address: 1_000_000 }));
}

#[test]
fn step_by_step() {
    let mut vm = Vm::new(
        program(&[(Kind::LoadConst, [0, 1]), (Kind::LoadConst, [0, 2])]),
        Vec::<u32>::new(),
    );
    assert_eq!(vm.step(), Ok(VmState::Loaded));
    assert_eq!((vm.pc(), vm.read_reg(reg(0))), (1, 1));
    assert_eq!(vm.step(), Ok(VmState::Halted));
    assert_eq!((vm.pc(), vm.read_reg(reg(0))), (2, 2));
    assert_eq!(vm.step(), Ok(VmState::Halted));
    assert_eq!(vm.pc(), 2);
}

#[test]
fn deterministic() {
    let bytes = program(&[
        (Kind::LoadConst, [0, 0xABCDE]),
        (Kind::LoadConst, [1, 12]),
        (Kind::WriteMem, [0, 1]),
        (Kind::ShiftRight, [0, 13]),
        (Kind::LoadConst, [1, 13]),
        (Kind::ReadMem, [5, 1]),
    ])
    .encode();

    let snapshot = || {
        let mut vm = Vm::load(&bytes, &VmConfig::default()).unwrap();
        vm.run().unwrap();
        (*vm.registers(), vm.dump(0..32).unwrap())
    };

    let first = snapshot();
    assert_eq!(first, snapshot());
    assert_eq!(first.0[5], 0xABCDE >> 1);
}

#[test]
fn load_rejects_bad_bytecode() {
    assert!(Vm::load(&[uvmbytecode::opcode::LOAD_CONST, 1], &VmConfig::default()).is_err());
}
