use crate::memory::TypeAddr;

/// A fetched 16-bit instruction word and its fields.
///
/// Every field is a plain mask-and-shift, so any `u16` decodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawInstruction {
    code: u16,
}

impl RawInstruction {
    pub fn new(code: u16) -> Self {
        RawInstruction { code }
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    // n is starting digit (1-based, from the left), m is length
    pub fn nth_m_digits(&self, n: u8, m: u8) -> u16 {
        // 0110 1100 1111 0001
        // -------------------
        // 1111 1111 1111 1111
        //      1111 1111 1111
        //           1111 1111
        //                1111
        let shift_places = (4 - m - (n - 1)) * 4;
        let mask: u16 = (0xFFFF >> (16 - 4 * m as u32)) as u16;
        (self.code >> shift_places) & mask
    }

    /// bits 12-15
    pub fn class(&self) -> u8 {
        self.nth_m_digits(1, 1) as u8
    }

    /// bits 8-11
    pub fn x(&self) -> u8 {
        self.nth_m_digits(2, 1) as u8
    }

    /// bits 4-7
    pub fn y(&self) -> u8 {
        self.nth_m_digits(3, 1) as u8
    }

    /// bits 0-3
    pub fn n(&self) -> u8 {
        self.nth_m_digits(4, 1) as u8
    }

    /// bits 0-7
    pub fn kk(&self) -> u8 {
        self.nth_m_digits(3, 2) as u8
    }

    /// bits 0-11
    pub fn addr(&self) -> TypeAddr {
        self.nth_m_digits(2, 3)
    }
}

impl PartialEq<u16> for RawInstruction {
    fn eq(&self, ins: &u16) -> bool {
        ins.eq(&self.code)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpCodes {
    // 00E0
    ClearScreen,
    // 00EE
    PopSubroutine,
    // 1NNN
    Jump(TypeAddr),
    // 2NNN
    PushSubroutine(TypeAddr),

    // 3XNN
    SkipEqualConstant(u8, u8),
    // 4XNN
    SkipNotEqualConstant(u8, u8),
    // 5XY0
    SkipEqualRegister(u8, u8),
    // 9XY0
    SkipNotEqualRegister(u8, u8),

    // 6XNN
    SetRegister(u8, u8),
    // 7XNN, no carry flag
    AddToRegister(u8, u8),

    // 8XY0
    CopyRegister(u8, u8),
    // 8XY1
    Or(u8, u8),
    // 8XY2
    And(u8, u8),
    // 8XY3
    XOr(u8, u8),
    // 8XY4
    Add(u8, u8),
    // 8XY5
    SubtractForward(u8, u8),
    // 8XY6
    RightShift(u8, u8),
    // 8XY7
    SubtractBackward(u8, u8),
    // 8XYE
    LeftShift(u8, u8),

    // ANNN
    SetIndexRegister(TypeAddr),
    // BNNN, the register added depends on a quirk so x is carried along
    JumpWithOffset(u8, TypeAddr),
    // CXNN
    Random(u8, u8),
    // DXYN
    // XOR an N row sprite from I onto (VX, VY); VF = 1 if any pixel turned off
    Display(u8, u8, u8),

    // EX9E
    SkipIfPressed(u8),
    // EXA1
    SkipIfNotPressed(u8),

    // FX07
    CopyDelayToRegister(u8),
    // FX0A
    GetKey(u8),
    // FX15
    CopyRegisterToDelay(u8),
    // FX18
    CopyRegisterToSound(u8),
    // FX1E
    AddToIndex(u8),
    // FX29
    PointChar(u8),
    // FX33
    ToDecimal(u8),
    // FX55
    StoreRegisterToMemory(u8),
    // FX65
    LoadRegisterFromMemory(u8),

    /// Any pattern outside the 35 instructions. Executes as a no-op.
    Unimplemented(u16),
}

impl OpCodes {
    pub fn decode_raw(ins: u16) -> Self {
        let raw = RawInstruction::new(ins);
        let (x, y, n, kk, addr) = (raw.x(), raw.y(), raw.n(), raw.kk(), raw.addr());

        match raw.class() {
            0x0 => match ins {
                0x00E0 => Self::ClearScreen,
                0x00EE => Self::PopSubroutine,
                _ => Self::Unimplemented(ins),
            },
            0x1 => Self::Jump(addr),
            0x2 => Self::PushSubroutine(addr),
            0x3 => Self::SkipEqualConstant(x, kk),
            0x4 => Self::SkipNotEqualConstant(x, kk),
            0x5 if n == 0 => Self::SkipEqualRegister(x, y),
            0x6 => Self::SetRegister(x, kk),
            0x7 => Self::AddToRegister(x, kk),
            0x8 => match n {
                0x0 => Self::CopyRegister(x, y),
                0x1 => Self::Or(x, y),
                0x2 => Self::And(x, y),
                0x3 => Self::XOr(x, y),
                0x4 => Self::Add(x, y),
                0x5 => Self::SubtractForward(x, y),
                0x6 => Self::RightShift(x, y),
                0x7 => Self::SubtractBackward(x, y),
                0xE => Self::LeftShift(x, y),
                _ => Self::Unimplemented(ins),
            },
            0x9 if n == 0 => Self::SkipNotEqualRegister(x, y),
            0xA => Self::SetIndexRegister(addr),
            0xB => Self::JumpWithOffset(x, addr),
            0xC => Self::Random(x, kk),
            0xD => Self::Display(x, y, n),
            0xE => match kk {
                0x9E => Self::SkipIfPressed(x),
                0xA1 => Self::SkipIfNotPressed(x),
                _ => Self::Unimplemented(ins),
            },
            0xF => match kk {
                0x07 => Self::CopyDelayToRegister(x),
                0x0A => Self::GetKey(x),
                0x15 => Self::CopyRegisterToDelay(x),
                0x18 => Self::CopyRegisterToSound(x),
                0x1E => Self::AddToIndex(x),
                0x29 => Self::PointChar(x),
                0x33 => Self::ToDecimal(x),
                0x55 => Self::StoreRegisterToMemory(x),
                0x65 => Self::LoadRegisterFromMemory(x),
                _ => Self::Unimplemented(ins),
            },
            _ => Self::Unimplemented(ins),
        }
    }
}
