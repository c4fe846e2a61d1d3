//! Config registries.
//!
//! A [`ConfigMeta`] names a page property together with the keys of the
//! loader that produces its value and the compiler that post-processes it.
//! [`ConfigRegistry::compile`] resolves every meta into one JSON object.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Produces a config value
pub type LoaderFn = Box<dyn Fn() -> Value + Send + Sync>;

/// Compiles a loaded value. `None` keeps the loaded value.
pub type CompilerFn = Box<dyn Fn(&Value) -> Option<Value> + Send + Sync>;

/// Loader functions keyed by name
#[derive(Default)]
pub struct ConfigLoader {
    loaders: HashMap<String, LoaderFn>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `loader` under `key`, replacing any previous loader
    pub fn register_loader<F>(&mut self, key: impl Into<String>, loader: F)
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.loaders.insert(key.into(), Box::new(loader));
    }

    pub fn get_loader(&self, key: &str) -> Option<&LoaderFn> {
        self.loaders.get(key)
    }

    pub fn len(&self) -> usize {
        self.loaders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaders.is_empty()
    }
}

impl fmt::Debug for ConfigLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigLoader")
            .field("keys", &self.loaders.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Compiler functions keyed by name
#[derive(Default)]
pub struct ConfigCompiler {
    compilers: HashMap<String, CompilerFn>,
}

impl ConfigCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `compiler` under `key`, replacing any previous compiler
    pub fn register_compiler<F>(&mut self, key: impl Into<String>, compiler: F)
    where
        F: Fn(&Value) -> Option<Value> + Send + Sync + 'static,
    {
        self.compilers.insert(key.into(), Box::new(compiler));
    }

    pub fn get_compiler(&self, key: &str) -> Option<&CompilerFn> {
        self.compilers.get(key)
    }

    pub fn len(&self) -> usize {
        self.compilers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.compilers.is_empty()
    }
}

impl fmt::Debug for ConfigCompiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigCompiler")
            .field("keys", &self.compilers.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Describes how one config property is produced
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigMeta {
    /// Property name in the compiled output
    pub prop: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loader_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compiler_key: Option<String>,
}

impl ConfigMeta {
    pub fn new(prop: impl Into<String>) -> Self {
        Self {
            prop: prop.into(),
            ..Self::default()
        }
    }

    pub fn with_loader(mut self, key: impl Into<String>) -> Self {
        self.loader_key = Some(key.into());
        self
    }

    pub fn with_compiler(mut self, key: impl Into<String>) -> Self {
        self.compiler_key = Some(key.into());
        self
    }

    pub fn with_params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params = params.into_iter().map(Into::into).collect();
        self
    }
}

/// Loader and compiler registries plus the ordered list of config metas
#[derive(Debug, Default)]
pub struct ConfigRegistry {
    pub loader: ConfigLoader,
    pub compiler: ConfigCompiler,
    metas: Vec<ConfigMeta>,
}

impl ConfigRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_config_meta(&mut self, meta: ConfigMeta) {
        self.metas.push(meta);
    }

    pub fn config_metas(&self) -> &[ConfigMeta] {
        &self.metas
    }

    /// Resolve every meta into `{ prop: value }`.
    ///
    /// Metas without a loader key, or whose loader is not registered, are
    /// skipped. Without a registered compiler, or when the compiler returns
    /// `None`, the loaded value is used as is. A later meta with the same
    /// `prop` wins.
    pub fn compile(&self) -> Map<String, Value> {
        let mut result = Map::new();

        for meta in &self.metas {
            let Some(loader_key) = meta.loader_key.as_deref() else {
                continue;
            };
            let Some(load) = self.loader.get_loader(loader_key) else {
                tracing::debug!(prop = %meta.prop, loader_key, "compile: loader not registered");
                continue;
            };

            let value = load();
            let compiled = meta
                .compiler_key
                .as_deref()
                .and_then(|key| self.compiler.get_compiler(key))
                .and_then(|compile| compile(&value))
                .unwrap_or(value);

            result.insert(meta.prop.clone(), compiled);
        }

        result
    }
}
