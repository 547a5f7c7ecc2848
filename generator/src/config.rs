// Licensed under the Apache-2.0 license

//! Generator configuration.

/// How an item category flattens array instances.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlattenPolicy {
    /// Keep only the canonical (all-zero-index) element of each array:
    /// declaration tables need one entry per declared instance.
    Declaration,
    /// Keep every element: port and map generation needs each one.
    Full,
}

/// Knobs for context building and rendering.
///
/// # Example
///
/// ```
/// use regspace_generator::{FlattenPolicy, GeneratorConfig};
///
/// let config = GeneratorConfig::with_defaults()
///     .default_channel(0)
///     .reg_list_policy(FlattenPolicy::Full)
///     .with_recursion_limit(16);
/// assert_eq!(config.recursion_limit(), 16);
/// ```
#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    default_channel: Option<i64>,
    recursion_limit: usize,
    reg_list_policy: FlattenPolicy,
    mem_list_policy: FlattenPolicy,
    ext_list_policy: FlattenPolicy,
}

impl GeneratorConfig {
    /// Defaults: no fallback channel (a missing channel anchor is an
    /// error), recursion limit 64, registers flattened as declarations,
    /// memories and external references in full.
    pub fn with_defaults() -> Self {
        Self {
            default_channel: None,
            recursion_limit: 64,
            reg_list_policy: FlattenPolicy::Declaration,
            mem_list_policy: FlattenPolicy::Full,
            ext_list_policy: FlattenPolicy::Full,
        }
    }

    /// Fall back to this channel when no ancestor carries an
    /// `access_channel` property, instead of failing. Opt-in only; older
    /// flows relied on a silent channel 0.
    pub fn default_channel(mut self, channel: i64) -> Self {
        self.default_channel = Some(channel);
        self
    }

    pub fn with_recursion_limit(mut self, limit: usize) -> Self {
        self.recursion_limit = limit;
        self
    }

    pub fn reg_list_policy(mut self, policy: FlattenPolicy) -> Self {
        self.reg_list_policy = policy;
        self
    }

    pub fn mem_list_policy(mut self, policy: FlattenPolicy) -> Self {
        self.mem_list_policy = policy;
        self
    }

    pub fn ext_list_policy(mut self, policy: FlattenPolicy) -> Self {
        self.ext_list_policy = policy;
        self
    }

    pub fn configured_default_channel(&self) -> Option<i64> {
        self.default_channel
    }

    pub fn recursion_limit(&self) -> usize {
        self.recursion_limit
    }

    pub fn reg_policy(&self) -> FlattenPolicy {
        self.reg_list_policy
    }

    pub fn mem_policy(&self) -> FlattenPolicy {
        self.mem_list_policy
    }

    pub fn ext_policy(&self) -> FlattenPolicy {
        self.ext_list_policy
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}
