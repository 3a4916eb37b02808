// Conversation transcript exporter
// Standalone helper: collects messages in memory and writes a timestamped text file

use chrono::{Local, NaiveDateTime};
use std::fmt;
use std::fs;
use std::path::PathBuf;

use crate::error::Result;
use crate::models::CREATED_AT_FORMAT;
use crate::storage::AppPaths;

const TRANSCRIPT_HEADER: &str = "=== Daily Dock chat log ===";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    System,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => f.write_str("User"),
            Self::System => f.write_str("System"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub timestamp: NaiveDateTime,
    pub sender: Sender,
    pub message: String,
}

pub struct ChatExporter {
    export_dir: PathBuf,
    history: Vec<ChatMessage>,
}

impl ChatExporter {
    pub fn new(paths: &AppPaths) -> Result<Self> {
        fs::create_dir_all(&paths.chat_logs_dir)?;
        Ok(Self {
            export_dir: paths.chat_logs_dir.clone(),
            history: Vec::new(),
        })
    }

    pub fn add_message(&mut self, message: impl Into<String>, is_user: bool) {
        self.push(message.into(), is_user, Local::now().naive_local());
    }

    fn push(&mut self, message: String, is_user: bool, timestamp: NaiveDateTime) {
        self.history.push(ChatMessage {
            timestamp,
            sender: if is_user { Sender::User } else { Sender::System },
            message,
        });
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.history
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }

    /// Transcript text: header, then `[timestamp] sender:\nmessage` blocks
    pub fn render(&self) -> String {
        let mut out = format!("{TRANSCRIPT_HEADER}\n\n");
        for msg in &self.history {
            out.push_str(&format!(
                "[{}] {}:\n{}\n\n",
                msg.timestamp.format(CREATED_AT_FORMAT),
                msg.sender,
                msg.message
            ));
        }
        out
    }

    /// Write the transcript; `Ok(None)` when there is nothing to export
    pub fn export(&self) -> Result<Option<PathBuf>> {
        self.export_at(Local::now().naive_local())
    }

    fn export_at(&self, now: NaiveDateTime) -> Result<Option<PathBuf>> {
        if self.history.is_empty() {
            return Ok(None);
        }
        let path = self
            .export_dir
            .join(format!("chat_log_{}.txt", now.format("%Y%m%d_%H%M%S")));
        fs::write(&path, self.render())?;
        tracing::info!("[export_chat] Wrote {} messages to {}", self.history.len(), path.display());
        Ok(Some(path))
    }
}
