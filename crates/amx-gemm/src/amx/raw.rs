//! Raw AMX instruction issue.
//!
//! AMX instructions are not known to the assembler; each one is emitted as a
//! literal `.word` in the reserved `0x00201000` opcode space. The hardware
//! reads the instruction's operand from `x0`, so every issue site pins its
//! operand variable to that register — letting the register allocator pick
//! would silently corrupt the operand.
//!
//! # Safety
//!
//! All functions here require AMX to be enabled on the current thread (see
//! [`AmxGuard`](crate::AmxGuard)) and, for loads and stores, a valid operand
//! address. Issuing any of them outside an enabled scope is undefined
//! behaviour at the hardware level.

#![allow(clippy::missing_safety_doc)]

use std::arch::asm;

/// Base of the AMX opcode space.
const AMX_OP_BASE: u32 = 0x0020_1000;

/// Compose an opcode word: `base | (ordinal << 5) | low5`.
///
/// `low5` is 0 for every operation except CLR, which is the `| 1` variant
/// of the SET/CLR control ordinal.
const fn opcode(ordinal: u32, low5: u32) -> u32 {
    AMX_OP_BASE | (ordinal << 5) | low5
}

macro_rules! amx_op {
    ($(#[$meta:meta])* $name:ident, $ordinal:expr) => {
        $(#[$meta])*
        #[inline(always)]
        pub unsafe fn $name(operand: u64) {
            const OP: u32 = opcode($ordinal, 0);
            // No `nomem` option: the default memory clobber keeps the
            // compiler from reordering accesses across AMX state.
            asm!(
                ".word {op}",
                op = const OP,
                in("x0") operand,
                options(nostack)
            );
        }
    };
}

amx_op!(
    /// Load 64 bytes (128 with the pair flag) into an X register.
    ldx, 0
);
amx_op!(
    /// Load 64 bytes (128 with the pair flag) into a Y register.
    ldy, 1
);
amx_op!(
    /// Store an X register to memory.
    stx, 2
);
amx_op!(
    /// Store a Y register to memory.
    sty, 3
);
amx_op!(
    /// Load a Z register row from memory.
    ldz, 4
);
amx_op!(
    /// Store a Z register row to memory.
    stz, 5
);
amx_op!(
    /// Load a Z row, interleaved layout.
    ldzi, 6
);
amx_op!(
    /// Store a Z row, interleaved layout.
    stzi, 7
);
amx_op!(
    /// Extract a row from Z into X.
    extrx, 8
);
amx_op!(
    /// Extract a row from Z into Y.
    extry, 9
);
amx_op!(
    /// Fused multiply-add, f64.
    fma64, 10
);
amx_op!(
    /// Fused multiply-subtract, f64.
    fms64, 11
);
amx_op!(
    /// Fused multiply-add, f32.
    fma32, 12
);
amx_op!(
    /// Fused multiply-subtract, f32.
    fms32, 13
);
amx_op!(
    /// Integer multiply-accumulate, i16.
    mac16, 14
);
amx_op!(
    /// Fused multiply-add, f16.
    fma16, 15
);
amx_op!(
    /// Fused multiply-subtract, f16.
    fms16, 16
);
amx_op!(
    /// Vector integer operation.
    vecint, 18
);
amx_op!(
    /// Vector floating-point operation.
    vecfp, 19
);
amx_op!(
    /// Matrix integer operation.
    matint, 20
);
amx_op!(
    /// Matrix floating-point operation.
    matfp, 21
);
amx_op!(
    /// Generate a lookup table.
    genlut, 22
);

/// Ordinal of the SET/CLR control operation.
const CTRL: u32 = 17;

/// Enable the AMX coprocessor on the current core.
///
/// SET is pipeline-sensitive: three no-ops must immediately precede the
/// opcode word, emitted as distinct instructions so the assembler cannot
/// fold them away.
#[inline(always)]
pub unsafe fn set() {
    asm!(
        "nop",
        "nop",
        "nop",
        ".word {op}",
        op = const opcode(CTRL, 0),
        options(nostack)
    );
}

/// Disable the AMX coprocessor on the current core.
///
/// Same pipeline pad as [`set`]. Register-file contents are undefined after
/// this returns.
#[inline(always)]
pub unsafe fn clr() {
    asm!(
        "nop",
        "nop",
        "nop",
        ".word {op}",
        op = const opcode(CTRL, 1),
        options(nostack)
    );
}
