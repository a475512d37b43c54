use crate::error::VmError;

/// An enum with a variant for each instruction within the CHIP-8 instruction set.
///
/// Decoding is a pure function from the 16-bit opcode word to one of these variants; all
/// effects live in the interpreter.  Register indices are extracted as `usize` so variants
/// can index the register file directly, and a nibble can only name registers 0x0 to 0xF.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Instruction {
    Sys { nnn: u16 },                      // 0NNN machine code routine (ignored)
    ClearScreen,                           // 00E0
    Return,                                // 00EE
    Jump { nnn: u16 },                     // 1NNN
    Call { nnn: u16 },                     // 2NNN
    SkipEqImm { x: usize, nn: u8 },        // 3XNN
    SkipNeImm { x: usize, nn: u8 },        // 4XNN
    SkipEqReg { x: usize, y: usize },      // 5XY0
    SetImm { x: usize, nn: u8 },           // 6XNN
    AddImm { x: usize, nn: u8 },           // 7XNN, no carry flag
    Copy { x: usize, y: usize },           // 8XY0
    Or { x: usize, y: usize },             // 8XY1
    And { x: usize, y: usize },            // 8XY2
    Xor { x: usize, y: usize },            // 8XY3
    Add { x: usize, y: usize },            // 8XY4, VF = carry
    Sub { x: usize, y: usize },            // 8XY5, VF = no borrow
    ShiftRight { x: usize },               // 8XY6, VF = shifted-out bit
    SubReverse { x: usize, y: usize },     // 8XY7, VF = no borrow
    ShiftLeft { x: usize },                // 8XYE, VF = shifted-out bit
    SkipNeReg { x: usize, y: usize },      // 9XY0
    SetIndex { nnn: u16 },                 // ANNN
    JumpOffset { nnn: u16 },               // BNNN, target NNN + V0
    Random { x: usize, nn: u8 },           // CXNN
    Draw { x: usize, y: usize, n: u8 },    // DXYN
    SkipKeyPressed { x: usize },           // EX9E
    SkipKeyNotPressed { x: usize },        // EXA1
    ReadDelay { x: usize },                // FX07
    WaitKey { x: usize },                  // FX0A
    SetDelay { x: usize },                 // FX15
    SetSound { x: usize },                 // FX18
    AddIndex { x: usize },                 // FX1E, VF unaffected
    FontGlyph { x: usize },                // FX29
    StoreBcd { x: usize },                 // FX33
    StoreRegisters { x: usize },           // FX55
    LoadRegisters { x: usize },            // FX65
}

impl Instruction {
    /// Parses the supplied two-byte opcode and returns the corresponding [Instruction]
    /// enum variant.  Returns [VmError::UnknownOpcode] if the opcode is not part of the
    /// CHIP-8 instruction set.
    ///
    /// # Arguments
    ///
    /// * `opcode` - a (big-endian) two-byte representation of the opcode to be parsed
    pub(crate) fn decode(opcode: u16) -> Result<Instruction, VmError> {
        // Divide the 16-bit opcode into four 4-bit nibbles.  Each top-level nibble is an
        // independent match arm; there is no fall-through between opcode families.
        let first_nibble = opcode >> 12;
        let second_nibble = (opcode & 0x0F00) >> 8;
        let third_nibble = (opcode & 0x00F0) >> 4;
        let fourth_nibble = opcode & 0x000F;
        let x = second_nibble as usize;
        let y = third_nibble as usize;
        let nn = (opcode & 0x00FF) as u8;
        let nnn = opcode & 0x0FFF;
        match (first_nibble, second_nibble, third_nibble, fourth_nibble) {
            (0x0, 0x0, 0xE, 0x0) => Ok(Instruction::ClearScreen),
            (0x0, 0x0, 0xE, 0xE) => Ok(Instruction::Return),
            (0x0, ..) => Ok(Instruction::Sys { nnn }),
            (0x1, ..) => Ok(Instruction::Jump { nnn }),
            (0x2, ..) => Ok(Instruction::Call { nnn }),
            (0x3, ..) => Ok(Instruction::SkipEqImm { x, nn }),
            (0x4, ..) => Ok(Instruction::SkipNeImm { x, nn }),
            (0x5, _, _, 0x0) => Ok(Instruction::SkipEqReg { x, y }),
            (0x6, ..) => Ok(Instruction::SetImm { x, nn }),
            (0x7, ..) => Ok(Instruction::AddImm { x, nn }),
            (0x8, _, _, 0x0) => Ok(Instruction::Copy { x, y }),
            (0x8, _, _, 0x1) => Ok(Instruction::Or { x, y }),
            (0x8, _, _, 0x2) => Ok(Instruction::And { x, y }),
            (0x8, _, _, 0x3) => Ok(Instruction::Xor { x, y }),
            (0x8, _, _, 0x4) => Ok(Instruction::Add { x, y }),
            (0x8, _, _, 0x5) => Ok(Instruction::Sub { x, y }),
            (0x8, _, _, 0x6) => Ok(Instruction::ShiftRight { x }),
            (0x8, _, _, 0x7) => Ok(Instruction::SubReverse { x, y }),
            (0x8, _, _, 0xE) => Ok(Instruction::ShiftLeft { x }),
            (0x9, _, _, 0x0) => Ok(Instruction::SkipNeReg { x, y }),
            (0xA, ..) => Ok(Instruction::SetIndex { nnn }),
            (0xB, ..) => Ok(Instruction::JumpOffset { nnn }),
            (0xC, ..) => Ok(Instruction::Random { x, nn }),
            (0xD, ..) => Ok(Instruction::Draw {
                x,
                y,
                n: fourth_nibble as u8,
            }),
            (0xE, _, 0x9, 0xE) => Ok(Instruction::SkipKeyPressed { x }),
            (0xE, _, 0xA, 0x1) => Ok(Instruction::SkipKeyNotPressed { x }),
            (0xF, _, 0x0, 0x7) => Ok(Instruction::ReadDelay { x }),
            (0xF, _, 0x0, 0xA) => Ok(Instruction::WaitKey { x }),
            (0xF, _, 0x1, 0x5) => Ok(Instruction::SetDelay { x }),
            (0xF, _, 0x1, 0x8) => Ok(Instruction::SetSound { x }),
            (0xF, _, 0x1, 0xE) => Ok(Instruction::AddIndex { x }),
            (0xF, _, 0x2, 0x9) => Ok(Instruction::FontGlyph { x }),
            (0xF, _, 0x3, 0x3) => Ok(Instruction::StoreBcd { x }),
            (0xF, _, 0x5, 0x5) => Ok(Instruction::StoreRegisters { x }),
            (0xF, _, 0x6, 0x5) => Ok(Instruction::LoadRegisters { x }),
            // If we have not matched by this point then the word decodes to nothing
            _ => Err(VmError::UnknownOpcode { opcode }),
        }
    }

    /// Returns the conventional four-character mnemonic of each variant, for log lines.
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Instruction::Sys { .. } => "0NNN",
            Instruction::ClearScreen => "00E0",
            Instruction::Return => "00EE",
            Instruction::Jump { .. } => "1NNN",
            Instruction::Call { .. } => "2NNN",
            Instruction::SkipEqImm { .. } => "3XNN",
            Instruction::SkipNeImm { .. } => "4XNN",
            Instruction::SkipEqReg { .. } => "5XY0",
            Instruction::SetImm { .. } => "6XNN",
            Instruction::AddImm { .. } => "7XNN",
            Instruction::Copy { .. } => "8XY0",
            Instruction::Or { .. } => "8XY1",
            Instruction::And { .. } => "8XY2",
            Instruction::Xor { .. } => "8XY3",
            Instruction::Add { .. } => "8XY4",
            Instruction::Sub { .. } => "8XY5",
            Instruction::ShiftRight { .. } => "8XY6",
            Instruction::SubReverse { .. } => "8XY7",
            Instruction::ShiftLeft { .. } => "8XYE",
            Instruction::SkipNeReg { .. } => "9XY0",
            Instruction::SetIndex { .. } => "ANNN",
            Instruction::JumpOffset { .. } => "BNNN",
            Instruction::Random { .. } => "CXNN",
            Instruction::Draw { .. } => "DXYN",
            Instruction::SkipKeyPressed { .. } => "EX9E",
            Instruction::SkipKeyNotPressed { .. } => "EXA1",
            Instruction::ReadDelay { .. } => "FX07",
            Instruction::WaitKey { .. } => "FX0A",
            Instruction::SetDelay { .. } => "FX15",
            Instruction::SetSound { .. } => "FX18",
            Instruction::AddIndex { .. } => "FX1E",
            Instruction::FontGlyph { .. } => "FX29",
            Instruction::StoreBcd { .. } => "FX33",
            Instruction::StoreRegisters { .. } => "FX55",
            Instruction::LoadRegisters { .. } => "FX65",
        }
    }
}
