//! Centralized configuration for vldb0.
//!
//! Goals:
//! - Single place for tunables instead of scattered env lookups.
//! - VldbConfig::from_env() keeps the CLI configurable without flags.
//!
//! Defaults preserve the permissive behavior of the original tool:
//! no continuation-span validation, no chain-length bound.

#[derive(Clone, Debug, Default)]
pub struct VldbConfig {
    /// Require that every span skipped during a sequential scan is a known
    /// extent block (its address appears in the table anchored at SIT).
    /// Env: VL_STRICT_CONT (default false; "1|true|on|yes" => true)
    pub strict_cont: bool,

    /// Hard cap on chain traversal steps; None = unbounded. A corrupt
    /// database with a cyclic chain never terminates without this.
    /// Env: VL_MAX_CHAIN (default unset)
    pub max_chain: Option<u64>,
}

impl VldbConfig {
    pub fn from_env() -> Self {
        let strict_cont = std::env::var("VL_STRICT_CONT")
            .ok()
            .map(|s| {
                let s = s.to_ascii_lowercase();
                s == "1" || s == "true" || s == "on" || s == "yes"
            })
            .unwrap_or(false);
        let max_chain = std::env::var("VL_MAX_CHAIN")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|&n| n > 0);
        Self {
            strict_cont,
            max_chain,
        }
    }
}
