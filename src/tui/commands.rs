//! Slash-command metadata and parsing.

/// Static slash command metadata used by parsing and `/help`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlashCommand {
    pub name: &'static str,
    pub description: &'static str,
}

/// Built-in slash commands for the chat session.
pub const SLASH_COMMANDS: [SlashCommand; 10] = [
    SlashCommand {
        name: "/connect",
        description: "Open the ssh tunnel to the gpu host.",
    },
    SlashCommand {
        name: "/disconnect",
        description: "Close the ssh tunnel.",
    },
    SlashCommand {
        name: "/status",
        description: "Show tunnel, endpoint, and model details.",
    },
    SlashCommand {
        name: "/models",
        description: "List models installed on the remote service.",
    },
    SlashCommand {
        name: "/clear",
        description: "Reset the conversation to the system prompt.",
    },
    SlashCommand {
        name: "/history",
        description: "Reprint the visible conversation.",
    },
    SlashCommand {
        name: "/help",
        description: "List available slash commands.",
    },
    SlashCommand {
        name: "/quit",
        description: "Close the tunnel and exit.",
    },
    SlashCommand {
        name: "/exit",
        description: "Close the tunnel and exit.",
    },
    SlashCommand {
        name: "/q",
        description: "Short alias for exit.",
    },
];

/// Parsed slash command actions consumed by the main loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlashCommandAction {
    Connect,
    Disconnect,
    Status,
    Models,
    Clear,
    History,
    Help,
    Quit,
    Unknown(String),
}

/// Parse a slash command from user input.
///
/// Returns `None` if the input is not a slash command.
pub fn parse_slash_command(input: &str) -> Option<SlashCommandAction> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let token = trimmed
        .split_whitespace()
        .next()
        .unwrap_or("")
        .to_ascii_lowercase();

    let action = match token.as_str() {
        "/" | "/help" => SlashCommandAction::Help,
        "/connect" | "/reconnect" => SlashCommandAction::Connect,
        "/disconnect" => SlashCommandAction::Disconnect,
        "/status" => SlashCommandAction::Status,
        "/models" => SlashCommandAction::Models,
        "/clear" | "/reset" => SlashCommandAction::Clear,
        "/history" => SlashCommandAction::History,
        "/quit" | "/exit" | "/q" => SlashCommandAction::Quit,
        other => SlashCommandAction::Unknown(other.to_string()),
    };

    Some(action)
}
