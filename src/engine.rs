use crate::{Config, Own};

/// A compilation environment. Modules and stores created from the same
/// engine can be used together.
#[derive(Clone)]
pub struct Engine {
    engine: wasmtime::Engine,
    initial_fuel: Option<u64>,
}

impl Engine {
    /// Creates an engine from `config`, or an empty handle if `config` is
    /// empty or rejected by the engine.
    pub fn make(config: Own<Config>) -> Own<Engine> {
        let Some(config) = config.into_inner() else {
            log::warn!("cannot create an engine without a configuration");
            return Own::empty();
        };
        match wasmtime::Engine::new(&config.to_wasmtime()) {
            Ok(engine) => {
                log::trace!("created engine with {config:?}");
                Own::new(Engine {
                    engine,
                    initial_fuel: config.fuel_budget(),
                })
            }
            Err(e) => {
                log::warn!("failed to create engine: {e:#}");
                Own::empty()
            }
        }
    }

    /// Creates an engine with the default configuration.
    pub fn make_default() -> Own<Engine> {
        Engine::make(Config::make())
    }

    pub(crate) fn wasmtime(&self) -> &wasmtime::Engine {
        &self.engine
    }

    pub(crate) fn initial_fuel(&self) -> Option<u64> {
        self.initial_fuel
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("initial_fuel", &self.initial_fuel)
            .finish_non_exhaustive()
    }
}
