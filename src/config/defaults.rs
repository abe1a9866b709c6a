//! Default configuration constants.
//!
//! Callers share these constants instead of duplicating literals.

/// Default ssh daemon port on the gpu host.
pub const DEFAULT_SSH_PORT: u16 = 22;
/// Default Ollama port on the remote host.
pub const DEFAULT_OLLAMA_PORT: u16 = 11434;
/// Default local end of the port-forward used by chat sessions.
pub const DEFAULT_LOCAL_PORT: u16 = 11434;
/// Scratch local port used by the setup probe so it never collides with a
/// running chat session.
pub const PROBE_LOCAL_PORT: u16 = 11435;
/// Private key suggested by `tunnelchat setup`.
pub const DEFAULT_SSH_KEY_PATH: &str = "~/.ssh/id_rsa";
/// Remote model used when the config does not name one.
pub const DEFAULT_MODEL_ID: &str =
    "hf.co/bartowski/cognitivecomputations_Dolphin3.0-R1-Mistral-24B-GGUF:Q5_K_S";
/// Seed system message for new transcripts.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are Dobby, a witty assistant with a sarcastic streak \
who answers plainly and honestly. Wrap reasoning in <think>...</think>.";

/// Delay between spawning the chat tunnel and sampling its liveness.
pub const DEFAULT_SETTLE_SECS: u64 = 2;
/// Settle delay for the temporary setup tunnel.
pub const SETUP_SETTLE_SECS: u64 = 3;
/// Timeout for the endpoint liveness probe.
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 5;
/// Timeout for the OpenAI-compatible chat call.
pub const DEFAULT_CHAT_TIMEOUT_SECS: u64 = 120;
/// Timeout for the `/api/generate` fallback call.
pub const DEFAULT_GENERATE_TIMEOUT_SECS: u64 = 120;
/// Timeout for the model listing done by `tunnelchat setup`.
pub const SETUP_LIST_TIMEOUT_SECS: u64 = 10;
/// `ConnectTimeout` passed to the setup ssh check.
pub const SSH_CHECK_CONNECT_TIMEOUT_SECS: u64 = 10;
/// Overall bound on the setup ssh check process.
pub const SSH_CHECK_TIMEOUT_SECS: u64 = 15;

/// Config file name used for local and global lookups.
pub const CONFIG_FILE_NAME: &str = "tunnelchat.toml";
/// Directory under the config root holding the global config.
pub const CONFIG_DIR_NAME: &str = "tunnelchat";
