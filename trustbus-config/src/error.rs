use thiserror::Error;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A type alias for a `Result` that uses `ConfigError` as the error type.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configured signing key could not be decoded.
    #[error("Invalid signing key: {0}")]
    InvalidSigningKey(#[from] trustbus_key::KeyError),

    /// The client name is empty or only whitespace.
    #[error("Client name must not be empty")]
    EmptyName,

    /// The configuration file could not be read.
    #[error("Io error: {0}")]
    IoError(#[from] std::io::Error),

    /// The configuration is not valid toml for its type.
    #[error("Toml deserialization error: {0}")]
    TomlError(#[from] toml::de::Error),
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Creates an `Ok` `ConfigResult`.
#[allow(non_snake_case)]
pub fn Ok<T>(value: T) -> ConfigResult<T> {
    Result::Ok(value)
}
