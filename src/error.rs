//! Unified error types for the tunnel, client, session, and setup layers.

use std::fmt;

// ---------------------------------------------------------------------------
// TunnelError
// ---------------------------------------------------------------------------

/// Errors from bringing up the ssh port-forward process.
#[derive(Debug)]
pub enum TunnelError {
    /// The ssh binary could not be started at all.
    Launch(std::io::Error),
    /// The process started but its exit status could not be read.
    Wait(std::io::Error),
    /// The forwarding process exited before the settle interval elapsed.
    SpawnFailed {
        /// Exit code, when the process exited normally.
        code: Option<i32>,
        /// Trailing stderr output captured from the process.
        stderr: String,
    },
}

impl fmt::Display for TunnelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Launch(e) => write!(f, "failed to launch ssh: {e}"),
            Self::Wait(e) => write!(f, "failed to check tunnel process: {e}"),
            Self::SpawnFailed { code, stderr } => {
                match code {
                    Some(code) => write!(f, "tunnel process exited with status {code}")?,
                    None => write!(f, "tunnel process terminated by signal")?,
                }
                let stderr = stderr.trim();
                if !stderr.is_empty() {
                    write!(f, ": {stderr}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for TunnelError {}

impl From<std::io::Error> for TunnelError {
    fn from(e: std::io::Error) -> Self {
        Self::Launch(e)
    }
}

// ---------------------------------------------------------------------------
// ClientError
// ---------------------------------------------------------------------------

/// Errors from HTTP calls made through the forwarded port.
#[derive(Debug)]
pub enum ClientError {
    /// Network / reqwest-level error (unreachable endpoint, timeout, bad body).
    Http(reqwest::Error),
    /// Non-2xx status from the remote service.
    Status { code: u16, body: String },
    /// Response parsed but did not carry the expected payload.
    InvalidResponse(String),
    /// Configured model is missing from the remote model list.
    ModelNotFound {
        model: String,
        available: Vec<String>,
    },
}

impl ClientError {
    /// HTTP status code carried by this error, when present.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// True when the request hit its client-side timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Http(inner) if inner.is_timeout())
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(e) => write!(f, "http: {e}"),
            Self::Status { code, body } => write!(f, "status {code}: {body}"),
            Self::InvalidResponse(msg) => write!(f, "invalid response: {msg}"),
            Self::ModelNotFound { model, available } => {
                write!(f, "model `{model}` not found")?;
                if !available.is_empty() {
                    write!(f, " (available: {})", available.join(", "))?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e)
    }
}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Errors when loading, validating, or persisting configuration.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Toml(toml::de::Error),
    TomlSer(toml::ser::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Toml(e) => write!(f, "toml: {e}"),
            Self::TomlSer(e) => write!(f, "toml: {e}"),
            Self::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml(e)
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(e: toml::ser::Error) -> Self {
        Self::TomlSer(e)
    }
}

// ---------------------------------------------------------------------------
// SubmitError
// ---------------------------------------------------------------------------

/// Reasons a chat submission was rejected before reaching the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// The tunnel is not active; the user has to reconnect first.
    NotConnected,
    /// Input was empty after trimming.
    EmptyInput,
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConnected => write!(
                f,
                "ssh tunnel not active; connect to the gpu host first (/connect)"
            ),
            Self::EmptyInput => write!(f, "nothing to send"),
        }
    }
}

impl std::error::Error for SubmitError {}

// ---------------------------------------------------------------------------
// SetupError
// ---------------------------------------------------------------------------

/// Failures from the one-time setup flow. Each variant stops the flow before
/// any configuration is written.
#[derive(Debug)]
pub enum SetupError {
    /// Plain ssh login check failed.
    SshFailed(String),
    /// Tunnel + endpoint check failed.
    EndpointFailed(String),
    /// Checks passed but the artifact could not be written.
    Config(ConfigError),
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SshFailed(msg) => write!(f, "ssh check failed: {msg}"),
            Self::EndpointFailed(msg) => write!(f, "endpoint check failed: {msg}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl std::error::Error for SetupError {}

impl From<ConfigError> for SetupError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}
