/// Kaspa SDK - script assembly, addresses and standard script classes.
///
/// Provides opcode definitions, the `ScriptBuilder`, script chunk parsing,
/// `ScriptPublicKey`, the bech32-style address codec, network identifiers,
/// and the pay-to-pubkey / pay-to-script-hash helpers used by the wallet.

pub mod address;
pub mod builder;
pub mod chunk;
pub mod inscription;
pub mod network;
pub mod opcodes;
pub mod script_public_key;
pub mod standard;

mod error;
pub use address::{Address, Prefix, Version};
pub use builder::ScriptBuilder;
pub use chunk::ScriptChunk;
pub use error::TxScriptError;
pub use network::{NetworkId, NetworkType};
pub use script_public_key::ScriptPublicKey;
pub use standard::{
    extract_script_pub_key_address, pay_to_address_script, pay_to_script_hash_script,
    pay_to_script_hash_signature_script, ScriptClass,
};
