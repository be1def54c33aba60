//! Routing of queries issued by verification code back into the host

use std::cell::RefCell;

use cosmwasm_std::{Binary, Storage};
use ibc_client_host_types::{GasMeter, HostEnv};

use crate::{config::WasmConfig, engine::Querier, error::QuerierError, msg::QueryRequest};

const CUSTOM_QUERIES_NOT_ALLOWED: &str = "Custom queries are not allowed";

/// Handles opaque custom queries.
pub trait CustomQuerier {
    /// Answers `request` against the current branch of host state.
    ///
    /// # Errors
    /// Returns an error if the request is not understood.
    fn query(&self, request: &serde_json::Value, store: &dyn Storage) -> Result<Binary, QuerierError>;
}

impl<F> CustomQuerier for F
where
    F: Fn(&serde_json::Value, &dyn Storage) -> Result<Binary, QuerierError>,
{
    fn query(&self, request: &serde_json::Value, store: &dyn Storage) -> Result<Binary, QuerierError> {
        self(request, store)
    }
}

/// Query handlers supplied when the adapter is built.
#[derive(Default)]
pub struct QueryPlugins {
    custom: Option<Box<dyn CustomQuerier>>,
}

impl QueryPlugins {
    /// Installs the custom query handler.
    #[must_use]
    pub fn with_custom(mut self, custom: impl CustomQuerier + 'static) -> Self {
        self.custom = Some(Box::new(custom));
        self
    }

    fn custom(&self, request: &serde_json::Value, store: &dyn Storage) -> Result<Binary, QuerierError> {
        self.custom.as_ref().map_or_else(
            || Err(QuerierError::Unsupported(CUSTOM_QUERIES_NOT_ALLOWED.to_string())),
            |custom| custom.query(request, store),
        )
    }
}

/// Serves accepted stargate paths.
pub trait StargateRouter {
    /// Answers the typed request at `path`.
    ///
    /// `store` is the branch the calling code runs on, so re-entrant calls
    /// observe its speculative writes.
    ///
    /// # Errors
    /// Returns [`QuerierError::NoRoute`] for paths the router does not serve.
    fn route(
        &self,
        path: &str,
        data: &[u8],
        store: &dyn Storage,
        env: &HostEnv,
        meter: &mut GasMeter,
    ) -> Result<Binary, QuerierError>;
}

/// A router that serves nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoRoutes;

impl StargateRouter for NoRoutes {
    fn route(
        &self,
        path: &str,
        _data: &[u8],
        _store: &dyn Storage,
        _env: &HostEnv,
        _meter: &mut GasMeter,
    ) -> Result<Binary, QuerierError> {
        Err(QuerierError::NoRoute {
            path: path.to_string(),
        })
    }
}

/// The [`Querier`] handed to verification code for one invocation.
pub struct HostQuerier<'a> {
    plugins: &'a QueryPlugins,
    config: &'a WasmConfig,
    router: &'a dyn StargateRouter,
    store: &'a dyn Storage,
    env: &'a HostEnv,
    meter: RefCell<GasMeter>,
}

impl<'a> HostQuerier<'a> {
    /// A querier over `store` that may consume up to `gas_limit`.
    #[must_use]
    pub fn new(
        plugins: &'a QueryPlugins,
        config: &'a WasmConfig,
        router: &'a dyn StargateRouter,
        store: &'a dyn Storage,
        env: &'a HostEnv,
        gas_limit: u64,
    ) -> Self {
        Self {
            plugins,
            config,
            router,
            store,
            env,
            meter: RefCell::new(GasMeter::new(gas_limit)),
        }
    }

    /// Gas consumed by queries so far, including any failed charge.
    #[must_use]
    pub fn gas_consumed(&self) -> u64 {
        self.meter.borrow().consumed()
    }

    fn stargate(&self, path: &str, data: &[u8]) -> Result<Binary, QuerierError> {
        if !self.config.accepts(path) {
            tracing::warn!(path, "rejected stargate query from verification code");
            return Err(QuerierError::NotAllowed {
                path: path.to_string(),
            });
        }

        let mut sub_meter = GasMeter::new(self.meter.borrow().remaining());
        let result = self
            .router
            .route(path, data, self.store, self.env, &mut sub_meter);
        self.meter
            .borrow_mut()
            .consume(sub_meter.consumed(), path)?;
        result
    }
}

impl Querier for HostQuerier<'_> {
    fn query(&self, request: &QueryRequest) -> Result<Binary, QuerierError> {
        self.meter
            .borrow_mut()
            .consume(self.config.querier_flat, "wasm querier")?;

        match request {
            QueryRequest::Custom(request) => self.plugins.custom(request, self.store),
            QueryRequest::Stargate { path, data } => self.stargate(path, data),
        }
    }
}

#[cfg(test)]
mod tests {
    use cosmwasm_std::{MemoryStorage, Order};

    use super::*;

    const PATH: &str = "/ibc.core.client.v1.Query/ClientStatus";

    struct EchoStore;

    impl StargateRouter for EchoStore {
        fn route(
            &self,
            path: &str,
            data: &[u8],
            store: &dyn Storage,
            env: &HostEnv,
            meter: &mut GasMeter,
        ) -> Result<Binary, QuerierError> {
            if path != PATH {
                return NoRoutes.route(path, data, store, env, meter);
            }
            meter.consume(7, "echo")?;
            Ok(store.get(data).unwrap_or_default().into())
        }
    }

    fn config(paths: &[&str]) -> WasmConfig {
        WasmConfig {
            stargate_accepted_paths: paths.iter().map(ToString::to_string).collect(),
            ..WasmConfig::default()
        }
    }

    fn stargate(path: &str, data: &[u8]) -> QueryRequest {
        QueryRequest::Stargate {
            path: path.to_string(),
            data: data.to_vec().into(),
        }
    }

    #[test]
    fn custom_queries_are_denied_by_default() {
        let store = MemoryStorage::new();
        let (plugins, config, env) = (QueryPlugins::default(), config(&[]), HostEnv::new("host", 1, 1));
        let querier = HostQuerier::new(&plugins, &config, &NoRoutes, &store, &env, 1_000);

        let err = querier
            .query(&QueryRequest::Custom(serde_json::json!({"anything": {}})))
            .unwrap_err();
        assert_eq!(err.to_string(), "Custom queries are not allowed");
        assert_eq!(querier.gas_consumed(), 100);
    }

    #[test]
    fn custom_handler_sees_store() {
        let mut store = MemoryStorage::new();
        store.set(b"k", b"v");
        let plugins = QueryPlugins::default().with_custom(
            |_: &serde_json::Value, store: &dyn Storage| -> Result<Binary, QuerierError> {
                Ok(Binary::from(store.range(None, None, Order::Ascending).count().to_be_bytes()))
            },
        );
        let (config, env) = (config(&[]), HostEnv::new("host", 1, 1));
        let querier = HostQuerier::new(&plugins, &config, &NoRoutes, &store, &env, 1_000);

        let response = querier.query(&QueryRequest::Custom(serde_json::Value::Null)).unwrap();
        assert_eq!(response.as_slice(), 1usize.to_be_bytes());
    }

    #[rstest::rstest]
    #[case::not_listed(&[], PATH, QuerierError::NotAllowed { path: PATH.to_string() })]
    #[case::listed_without_route(&["/x.y/Z"], "/x.y/Z", QuerierError::NoRoute { path: "/x.y/Z".to_string() })]
    fn stargate_rejections_name_the_path(
        #[case] accepted: &[&str],
        #[case] path: &str,
        #[case] expected: QuerierError,
    ) {
        let store = MemoryStorage::new();
        let (plugins, config, env) = (QueryPlugins::default(), config(accepted), HostEnv::new("host", 1, 1));
        let querier = HostQuerier::new(&plugins, &config, &EchoStore, &store, &env, 1_000);

        let err = querier.query(&stargate(path, b"")).unwrap_err();
        assert!(err.to_string().contains(path));
        assert_eq!(err, expected);
    }

    #[test]
    fn accepted_path_is_routed_and_metered() {
        let mut store = MemoryStorage::new();
        store.set(b"key", b"value");
        let (plugins, config, env) = (QueryPlugins::default(), config(&[PATH]), HostEnv::new("host", 1, 1));
        let querier = HostQuerier::new(&plugins, &config, &EchoStore, &store, &env, 1_000);

        let response = querier.query(&stargate(PATH, b"key")).unwrap();
        assert_eq!(response.as_slice(), b"value");
        assert_eq!(querier.gas_consumed(), 107);
    }

    #[test]
    fn exhausted_budget_fails_the_query() {
        let store = MemoryStorage::new();
        let (plugins, config, env) = (QueryPlugins::default(), config(&[PATH]), HostEnv::new("host", 1, 1));
        let querier = HostQuerier::new(&plugins, &config, &EchoStore, &store, &env, 150);

        querier.query(&stargate(PATH, b"key")).unwrap();
        let err = querier.query(&stargate(PATH, b"key")).unwrap_err();
        assert!(matches!(err, QuerierError::OutOfGas(_)));
        assert_eq!(querier.gas_consumed(), 207);
    }
}
