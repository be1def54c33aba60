//! Content-addressed registry of verification code

use cosmwasm_std::{Checksum, Order, Storage};
use ibc_client_host_types::{ensure, storage::prefix_end};

use crate::{config::WasmConfig, engine::WasmEngine, error::WasmError};

/// Store prefix of the checksum markers.
pub const CHECKSUMS_PREFIX: &[u8] = b"08-wasm/checksums/";

const MARKER: &[u8] = &[1];

fn checksum_key(checksum: &Checksum) -> Vec<u8> {
    [CHECKSUMS_PREFIX, checksum.to_hex().as_bytes()].concat()
}

/// Registers `code` with the engine and records its checksum.
///
/// # Errors
/// Fails if the code is empty, larger than the configured maximum, already
/// stored, or rejected by the engine.
pub fn store_code<E: WasmEngine>(
    engine: &E,
    config: &WasmConfig,
    store: &mut dyn Storage,
    code: &[u8],
) -> Result<Checksum, WasmError> {
    ensure!(!code.is_empty(), WasmError::EmptyCode);
    ensure!(
        code.len() <= config.max_code_size,
        WasmError::CodeTooLarge {
            size: code.len(),
            max: config.max_code_size,
        }
    );

    let checksum = Checksum::generate(code);
    ensure!(
        !has_checksum(store, &checksum),
        WasmError::CodeExists {
            checksum: checksum.to_hex(),
        }
    );

    engine.load_code(&checksum, code).map_err(WasmError::LoadCode)?;
    store.set(&checksum_key(&checksum), MARKER);

    tracing::info!(checksum = %checksum, size = code.len(), "stored wasm code");
    Ok(checksum)
}

/// Whether code with `checksum` has been stored.
#[must_use]
pub fn has_checksum(store: &dyn Storage, checksum: &Checksum) -> bool {
    store.get(&checksum_key(checksum)).is_some()
}

/// Every stored checksum, in ascending hex order.
///
/// # Errors
/// Fails if a stored marker key does not hold a hex checksum.
pub fn checksums(store: &dyn Storage) -> Result<Vec<Checksum>, WasmError> {
    let end = prefix_end(CHECKSUMS_PREFIX);
    store
        .range(Some(CHECKSUMS_PREFIX), end.as_deref(), Order::Ascending)
        .map(|(key, _)| {
            let hex = String::from_utf8_lossy(&key[CHECKSUMS_PREFIX.len()..]).into_owned();
            Checksum::from_hex(&hex).map_err(|err| WasmError::InvalidChecksum {
                reason: format!("{hex}: {err}"),
            })
        })
        .collect()
}

/// Parses a raw 32 byte checksum.
///
/// # Errors
/// Fails if `bytes` is not 32 bytes long.
pub fn parse_checksum(bytes: &[u8]) -> Result<Checksum, WasmError> {
    Checksum::try_from(bytes).map_err(|err| WasmError::InvalidChecksum {
        reason: err.to_string(),
    })
}
