//! An in-process [`WasmEngine`] whose behaviour is installed as closures.
//!
//! A handler is keyed by the message name: the top level key of a query or
//! sudo message, or `instantiate`.
#![allow(clippy::missing_panics_doc, missing_docs)]

use std::{
    cell::RefCell,
    collections::{HashMap, HashSet},
};

use cosmwasm_std::{Binary, Checksum, Env, Storage};

use crate::engine::{EntryPoint, Querier, VmContext, VmError, VmOutcome, WasmEngine};

/// What a handler is given for one call.
pub struct MockCall<'a> {
    pub entry_point: EntryPoint,
    /// The message body under its name
    pub msg: &'a serde_json::Value,
    pub env: &'a Env,
    pub store: &'a mut dyn Storage,
    pub querier: &'a dyn Querier,
}

type Handler = Box<dyn Fn(MockCall<'_>) -> Result<Binary, VmError>>;

#[derive(Default)]
pub struct MockEngine {
    handlers: HashMap<String, Handler>,
    loaded: RefCell<HashSet<Checksum>>,
    gas_per_call: u64,
}

impl MockEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_handler(
        mut self,
        name: &str,
        handler: impl Fn(MockCall<'_>) -> Result<Binary, VmError> + 'static,
    ) -> Self {
        self.handlers.insert(name.to_string(), Box::new(handler));
        self
    }

    /// Gas reported by every call that runs.
    #[must_use]
    pub const fn with_gas_per_call(mut self, gas: u64) -> Self {
        self.gas_per_call = gas;
        self
    }

    #[must_use]
    pub fn is_loaded(&self, checksum: &Checksum) -> bool {
        self.loaded.borrow().contains(checksum)
    }
}

fn split_message(entry_point: EntryPoint, msg: &[u8]) -> Result<(String, serde_json::Value), VmError> {
    let value: serde_json::Value =
        serde_json::from_slice(msg).map_err(|err| VmError::Contract(format!("invalid message: {err}")))?;
    if entry_point == EntryPoint::Instantiate {
        return Ok(("instantiate".to_string(), value));
    }
    match value {
        serde_json::Value::Object(map) if map.len() == 1 => Ok(map.into_iter().next().unwrap_or_default()),
        _ => Err(VmError::Contract("message is not a single variant".to_string())),
    }
}

impl WasmEngine for MockEngine {
    fn load_code(&self, checksum: &Checksum, code: &[u8]) -> Result<(), VmError> {
        if code.starts_with(b"invalid") {
            return Err(VmError::InvalidCode {
                reason: "rejected by mock engine".to_string(),
            });
        }
        self.loaded.borrow_mut().insert(*checksum);
        Ok(())
    }

    fn call(
        &self,
        entry_point: EntryPoint,
        checksum: &Checksum,
        msg: &[u8],
        ctx: VmContext<'_>,
    ) -> VmOutcome {
        if !self.is_loaded(checksum) {
            let err = VmError::CodeNotFound {
                checksum: checksum.to_hex(),
            };
            return VmOutcome::failed(err, 0);
        }
        if self.gas_per_call > ctx.gas_limit {
            return VmOutcome::failed(VmError::OutOfGas { limit: ctx.gas_limit }, ctx.gas_limit);
        }

        let result = split_message(entry_point, msg).and_then(|(name, body)| {
            let handler = self
                .handlers
                .get(&name)
                .ok_or_else(|| VmError::Contract(format!("no handler for {name}")))?;
            handler(MockCall {
                entry_point,
                msg: &body,
                env: ctx.env,
                store: ctx.store,
                querier: ctx.querier,
            })
        });
        VmOutcome {
            result,
            gas_used: self.gas_per_call,
        }
    }
}
