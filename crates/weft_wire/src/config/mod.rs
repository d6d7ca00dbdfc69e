//! Weave pass configuration.
//!
//! # Environment Variables
//!
//! `WeaveConfig::from_env` reads:
//! - `WEFT_UNWRITABLE`: `skip`, `warn` or `error`; what to do when a target
//!   is found but the member cannot be written.
//! - `WEFT_SIGNALS`: `0`, `off`, `false` or `no` disables the connect step.
//!
//! Unset or unrecognised values keep the defaults.

/// What the installer does with a found target it cannot write.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum UnwritablePolicy {
    /// Leave the member alone, tracing at debug level.
    #[default]
    Skip,
    /// Leave the member alone, tracing at warn level.
    Warn,
    /// Fail the pass with [`WireError::Unwritable`](crate::WireError::Unwritable).
    Error,
}

impl UnwritablePolicy {
    /// Parse a policy name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "skip" => Some(Self::Skip),
            "warn" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

/// Options for [`weave`](crate::weave) and the [`Weaver`](crate::Weaver) hook.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct WeaveConfig {
    /// Run the connect step after installing.
    pub signals: bool,
    pub unwritable: UnwritablePolicy,
}

impl Default for WeaveConfig {
    fn default() -> Self {
        WeaveConfig {
            signals: true,
            unwritable: UnwritablePolicy::Skip,
        }
    }
}

impl WeaveConfig {
    /// Defaults overridden by `WEFT_UNWRITABLE` and `WEFT_SIGNALS`.
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::var("WEFT_UNWRITABLE").ok().as_deref(),
            std::env::var("WEFT_SIGNALS").ok().as_deref(),
        )
    }

    /// Defaults overridden by raw variable values.
    pub fn from_vars(unwritable: Option<&str>, signals: Option<&str>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = unwritable {
            match UnwritablePolicy::parse(raw) {
                Some(policy) => config.unwritable = policy,
                None => tracing::warn!(value = raw, "ignoring unknown WEFT_UNWRITABLE"),
            }
        }

        if let Some(raw) = signals {
            let off = matches!(
                raw.trim().to_lowercase().as_str(),
                "0" | "off" | "false" | "no"
            );
            config.signals = !off;
        }

        config
    }

    #[must_use]
    pub fn with_signals(mut self, signals: bool) -> Self {
        self.signals = signals;
        self
    }

    #[must_use]
    pub fn with_unwritable(mut self, policy: UnwritablePolicy) -> Self {
        self.unwritable = policy;
        self
    }
}

#[cfg(test)]
mod tests;
