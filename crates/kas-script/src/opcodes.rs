//! Opcode definitions for the Kaspa script language.
//!
//! The numbering follows Bitcoin script for the shared range, with Kaspa's
//! hashing and signature opcodes in `0xa8..=0xac`.

// ---------------------------------------------------------------------------
// Push opcodes
// ---------------------------------------------------------------------------

/// Push an empty byte array (false).
pub const OP_0: u8 = 0x00;
/// Alias of `OP_0`.
pub const OP_FALSE: u8 = 0x00;
/// Push the next byte (smallest direct push).
pub const OP_DATA_1: u8 = 0x01;
/// Push the next 32 bytes.
pub const OP_DATA_32: u8 = 0x20;
/// Push the next 33 bytes.
pub const OP_DATA_33: u8 = 0x21;
/// Push the next 65 bytes.
pub const OP_DATA_65: u8 = 0x41;
/// Push the next 75 bytes (largest direct push).
pub const OP_DATA_75: u8 = 0x4b;
/// Next byte is the push length.
pub const OP_PUSHDATA1: u8 = 0x4c;
/// Next two bytes (LE) are the push length.
pub const OP_PUSHDATA2: u8 = 0x4d;
/// Next four bytes (LE) are the push length.
pub const OP_PUSHDATA4: u8 = 0x4e;
/// Push the number -1.
pub const OP_1NEGATE: u8 = 0x4f;
/// Reserved.
pub const OP_RESERVED: u8 = 0x50;
/// Push the number 1 (true).
pub const OP_1: u8 = 0x51;
/// Alias of `OP_1`.
pub const OP_TRUE: u8 = 0x51;
/// Push the number 2.
pub const OP_2: u8 = 0x52;
/// Push the number 3.
pub const OP_3: u8 = 0x53;
/// Push the number 16.
pub const OP_16: u8 = 0x60;

// ---------------------------------------------------------------------------
// Flow control
// ---------------------------------------------------------------------------

/// Do nothing.
pub const OP_NOP: u8 = 0x61;
/// Reserved.
pub const OP_VER: u8 = 0x62;
/// Execute the branch if the top stack item is true.
pub const OP_IF: u8 = 0x63;
/// Execute the branch if the top stack item is false.
pub const OP_NOTIF: u8 = 0x64;
/// Reserved conditional.
pub const OP_VERIF: u8 = 0x65;
/// Reserved conditional.
pub const OP_VERNOTIF: u8 = 0x66;
/// Else branch.
pub const OP_ELSE: u8 = 0x67;
/// End a conditional block.
pub const OP_ENDIF: u8 = 0x68;
/// Fail unless the top stack item is true.
pub const OP_VERIFY: u8 = 0x69;
/// Mark the output as unspendable.
pub const OP_RETURN: u8 = 0x6a;

// ---------------------------------------------------------------------------
// Stack
// ---------------------------------------------------------------------------

/// Move the top item to the alt stack.
pub const OP_TOALTSTACK: u8 = 0x6b;
/// Move the top alt stack item back.
pub const OP_FROMALTSTACK: u8 = 0x6c;
/// Drop the top two items.
pub const OP_2DROP: u8 = 0x6d;
/// Duplicate the top two items.
pub const OP_2DUP: u8 = 0x6e;
/// Duplicate the top item if non-zero.
pub const OP_IFDUP: u8 = 0x73;
/// Push the stack depth.
pub const OP_DEPTH: u8 = 0x74;
/// Drop the top item.
pub const OP_DROP: u8 = 0x75;
/// Duplicate the top item.
pub const OP_DUP: u8 = 0x76;
/// Remove the second item.
pub const OP_NIP: u8 = 0x77;
/// Copy the second item to the top.
pub const OP_OVER: u8 = 0x78;
/// Swap the top two items.
pub const OP_SWAP: u8 = 0x7c;
/// Push the size of the top item.
pub const OP_SIZE: u8 = 0x82;

// ---------------------------------------------------------------------------
// Bitwise / arithmetic
// ---------------------------------------------------------------------------

/// Push 1 if the top two items are equal.
pub const OP_EQUAL: u8 = 0x87;
/// `OP_EQUAL` followed by `OP_VERIFY`.
pub const OP_EQUALVERIFY: u8 = 0x88;
/// Add one.
pub const OP_1ADD: u8 = 0x8b;
/// Subtract one.
pub const OP_1SUB: u8 = 0x8c;
/// Negate.
pub const OP_NEGATE: u8 = 0x8f;
/// Absolute value.
pub const OP_ABS: u8 = 0x90;
/// Boolean not.
pub const OP_NOT: u8 = 0x91;
/// Add.
pub const OP_ADD: u8 = 0x93;
/// Subtract.
pub const OP_SUB: u8 = 0x94;
/// Numeric equality.
pub const OP_NUMEQUAL: u8 = 0x9c;
/// Less than.
pub const OP_LESSTHAN: u8 = 0x9f;
/// Greater than.
pub const OP_GREATERTHAN: u8 = 0xa0;
/// Minimum of two.
pub const OP_MIN: u8 = 0xa3;
/// Maximum of two.
pub const OP_MAX: u8 = 0xa4;
/// Range check.
pub const OP_WITHIN: u8 = 0xa5;

// ---------------------------------------------------------------------------
// Crypto
// ---------------------------------------------------------------------------

/// SHA-256 of the top item.
pub const OP_SHA256: u8 = 0xa8;
/// ECDSA multisig check.
pub const OP_CHECKMULTISIGECDSA: u8 = 0xa9;
/// Blake2b-256 of the top item.
pub const OP_BLAKE2B: u8 = 0xaa;
/// ECDSA signature check.
pub const OP_CHECKSIGECDSA: u8 = 0xab;
/// Schnorr signature check.
pub const OP_CHECKSIG: u8 = 0xac;
/// `OP_CHECKSIG` followed by `OP_VERIFY`.
pub const OP_CHECKSIGVERIFY: u8 = 0xad;
/// Schnorr multisig check.
pub const OP_CHECKMULTISIG: u8 = 0xae;
/// `OP_CHECKMULTISIG` followed by `OP_VERIFY`.
pub const OP_CHECKMULTISIGVERIFY: u8 = 0xaf;
/// Absolute lock-time check.
pub const OP_CHECKLOCKTIMEVERIFY: u8 = 0xb0;
/// Relative lock-time check.
pub const OP_CHECKSEQUENCEVERIFY: u8 = 0xb1;

/// Check whether an opcode pushes data (including the small-int pushes).
pub fn is_push_opcode(op: u8) -> bool {
    op <= OP_16 && op != OP_RESERVED
}

/// Return the value pushed by a small-int opcode (`OP_0`, `OP_1NEGATE`,
/// `OP_1..OP_16`), or `None` for anything else.
pub fn small_int_value(op: u8) -> Option<i64> {
    match op {
        OP_0 => Some(0),
        OP_1NEGATE => Some(-1),
        OP_1..=OP_16 => Some((op - OP_1 + 1) as i64),
        _ => None,
    }
}

/// Canonical name of an opcode, for diagnostics.
pub fn opcode_to_string(op: u8) -> String {
    let name = match op {
        OP_0 => "OP_0",
        OP_DATA_1..=OP_DATA_75 => return format!("OP_DATA_{}", op),
        OP_PUSHDATA1 => "OP_PUSHDATA1",
        OP_PUSHDATA2 => "OP_PUSHDATA2",
        OP_PUSHDATA4 => "OP_PUSHDATA4",
        OP_1NEGATE => "OP_1NEGATE",
        OP_RESERVED => "OP_RESERVED",
        OP_1..=OP_16 => return format!("OP_{}", op - OP_1 + 1),
        OP_NOP => "OP_NOP",
        OP_VER => "OP_VER",
        OP_IF => "OP_IF",
        OP_NOTIF => "OP_NOTIF",
        OP_VERIF => "OP_VERIF",
        OP_VERNOTIF => "OP_VERNOTIF",
        OP_ELSE => "OP_ELSE",
        OP_ENDIF => "OP_ENDIF",
        OP_VERIFY => "OP_VERIFY",
        OP_RETURN => "OP_RETURN",
        OP_TOALTSTACK => "OP_TOALTSTACK",
        OP_FROMALTSTACK => "OP_FROMALTSTACK",
        OP_2DROP => "OP_2DROP",
        OP_2DUP => "OP_2DUP",
        OP_IFDUP => "OP_IFDUP",
        OP_DEPTH => "OP_DEPTH",
        OP_DROP => "OP_DROP",
        OP_DUP => "OP_DUP",
        OP_NIP => "OP_NIP",
        OP_OVER => "OP_OVER",
        OP_SWAP => "OP_SWAP",
        OP_SIZE => "OP_SIZE",
        OP_EQUAL => "OP_EQUAL",
        OP_EQUALVERIFY => "OP_EQUALVERIFY",
        OP_1ADD => "OP_1ADD",
        OP_1SUB => "OP_1SUB",
        OP_NEGATE => "OP_NEGATE",
        OP_ABS => "OP_ABS",
        OP_NOT => "OP_NOT",
        OP_ADD => "OP_ADD",
        OP_SUB => "OP_SUB",
        OP_NUMEQUAL => "OP_NUMEQUAL",
        OP_LESSTHAN => "OP_LESSTHAN",
        OP_GREATERTHAN => "OP_GREATERTHAN",
        OP_MIN => "OP_MIN",
        OP_MAX => "OP_MAX",
        OP_WITHIN => "OP_WITHIN",
        OP_SHA256 => "OP_SHA256",
        OP_CHECKMULTISIGECDSA => "OP_CHECKMULTISIGECDSA",
        OP_BLAKE2B => "OP_BLAKE2B",
        OP_CHECKSIGECDSA => "OP_CHECKSIGECDSA",
        OP_CHECKSIG => "OP_CHECKSIG",
        OP_CHECKSIGVERIFY => "OP_CHECKSIGVERIFY",
        OP_CHECKMULTISIG => "OP_CHECKMULTISIG",
        OP_CHECKMULTISIGVERIFY => "OP_CHECKMULTISIGVERIFY",
        OP_CHECKLOCKTIMEVERIFY => "OP_CHECKLOCKTIMEVERIFY",
        OP_CHECKSEQUENCEVERIFY => "OP_CHECKSEQUENCEVERIFY",
        _ => return format!("OP_UNKNOWN{}", op),
    };
    name.to_string()
}
