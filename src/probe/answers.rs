//! Interactive prompts for the setup flow.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::config::defaults::{
    DEFAULT_LOCAL_PORT, DEFAULT_OLLAMA_PORT, DEFAULT_SSH_KEY_PATH, DEFAULT_SSH_PORT,
};
use crate::config::{expand_home, EndpointConfig};

/// Connection details collected from the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupAnswers {
    pub host: String,
    pub user: String,
    pub ssh_port: u16,
    pub ollama_port: u16,
    /// Always set; defaults to `~/.ssh/id_rsa`, expanded.
    pub key_path: PathBuf,
}

impl SetupAnswers {
    /// Ask for each field on `writer`, reading answers from `reader`.
    ///
    /// Host and user are required. Empty numeric answers take the default;
    /// unparsable ones are asked again. EOF aborts with `UnexpectedEof`.
    pub fn prompt<R: BufRead, W: Write>(reader: &mut R, writer: &mut W) -> io::Result<Self> {
        let host = ask_required(reader, writer, "Enter gpu host hostname/IP: ")?;
        let user = ask_required(reader, writer, "Enter SSH username: ")?;
        let ssh_port = ask_port(
            reader,
            writer,
            &format!("Enter SSH port (default {DEFAULT_SSH_PORT}): "),
            DEFAULT_SSH_PORT,
        )?;
        let ollama_port = ask_port(
            reader,
            writer,
            &format!("Enter Ollama port (default {DEFAULT_OLLAMA_PORT}): "),
            DEFAULT_OLLAMA_PORT,
        )?;
        let key = ask(
            reader,
            writer,
            &format!(
                "Enter path to SSH private key (or press Enter for default {DEFAULT_SSH_KEY_PATH}): "
            ),
        )?;
        let key = if key.is_empty() {
            DEFAULT_SSH_KEY_PATH.to_string()
        } else {
            key
        };

        Ok(Self {
            host,
            user,
            ssh_port,
            ollama_port,
            key_path: expand_home(&key),
        })
    }

    /// Endpoint settings for these answers with the default local port.
    pub fn to_endpoint(&self, model: &str) -> EndpointConfig {
        EndpointConfig {
            ssh_host: self.host.clone(),
            ssh_user: self.user.clone(),
            ssh_port: self.ssh_port,
            ssh_key_path: Some(self.key_path.clone()),
            ollama_port: self.ollama_port,
            local_port: DEFAULT_LOCAL_PORT,
            model: model.to_string(),
        }
    }
}

fn ask<R: BufRead, W: Write>(reader: &mut R, writer: &mut W, question: &str) -> io::Result<String> {
    write!(writer, "{question}")?;
    writer.flush()?;
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "input closed before setup finished",
        ));
    }
    Ok(line.trim().to_string())
}

fn ask_required<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    question: &str,
) -> io::Result<String> {
    loop {
        let answer = ask(reader, writer, question)?;
        if !answer.is_empty() {
            return Ok(answer);
        }
        writeln!(writer, "A value is required.")?;
    }
}

fn ask_port<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    question: &str,
    default: u16,
) -> io::Result<u16> {
    loop {
        let answer = ask(reader, writer, question)?;
        if answer.is_empty() {
            return Ok(default);
        }
        match answer.parse::<u16>() {
            Ok(port) if port != 0 => return Ok(port),
            _ => writeln!(writer, "`{answer}` is not a valid port (1-65535).")?,
        }
    }
}
