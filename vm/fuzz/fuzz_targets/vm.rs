#![no_main]

use {
    libfuzzer_sys::fuzz_target,
    uvm::Vm,
    uvmbytecode::Program,
};

fuzz_target!(|data: &[u8]| {
    if let Ok(program) = Program::decode(data) {
        // Accepted bytecode has exactly one encoding
        assert_eq!(program.encode(), data);

        let mut vm = Vm::new(program, vec![0_u32; 4096]);
        let _ = vm.run();
    }
});
