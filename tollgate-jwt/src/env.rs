// Environment variable loading for codec configuration

use crate::{JwtError, Result};
use std::env;
use std::str::FromStr;

/// Reads `PREFIX_KEY` style variables.
pub struct EnvLoader {
    prefix: Option<String>,
}

impl EnvLoader {
    pub fn new(prefix: Option<String>) -> Self {
        Self { prefix }
    }

    /// Load variables from a `.env` file in the working directory, if any.
    ///
    /// Variables already present in the process environment win.
    pub fn load_dotenv(&self) {
        dotenvy::dotenv().ok();
    }

    /// Full variable name for `key`, e.g. `TOLLGATE_SECRET`.
    pub fn var_name(&self, key: &str) -> String {
        match self.prefix {
            Some(ref prefix) => format!("{}_{}", prefix, key.to_uppercase()),
            None => key.to_uppercase(),
        }
    }

    /// Optional variable; unset and empty are both `None`.
    pub fn load_var(&self, key: &str) -> Option<String> {
        env::var(self.var_name(key))
            .ok()
            .filter(|value| !value.trim().is_empty())
    }

    pub fn require_var(&self, key: &str) -> Result<String> {
        self.load_var(key)
            .ok_or_else(|| JwtError::Config(format!("{} is not set", self.var_name(key))))
    }

    /// Parse an optional variable, reporting the variable name on failure.
    pub fn parse_var<T: FromStr>(&self, key: &str) -> Result<Option<T>>
    where
        T::Err: std::fmt::Display,
    {
        match self.load_var(key) {
            Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|e| {
                JwtError::Config(format!("{} is invalid: {}", self.var_name(key), e))
            }),
            None => Ok(None),
        }
    }
}

impl Default for EnvLoader {
    fn default() -> Self {
        Self::new(None)
    }
}
