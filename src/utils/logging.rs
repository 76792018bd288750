use crate::core::message::{Message, Role};
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Plain-text transcript log: user lines prefixed with `You: `, assistant
/// text as-is, one blank line after every message.
#[derive(Debug, Default)]
pub struct LoggingState {
    file_path: Option<String>,
    is_active: bool,
}

impl LoggingState {
    pub fn new(log_file: Option<String>) -> Result<Self, Box<dyn std::error::Error>> {
        let mut logging = Self::disabled();
        if let Some(path) = log_file {
            logging.set_log_file(path)?;
        }
        Ok(logging)
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn set_log_file(&mut self, path: String) -> Result<String, Box<dyn std::error::Error>> {
        // Fail early if the file cannot be created
        OpenOptions::new().create(true).append(true).open(&path)?;

        self.file_path = Some(path.clone());
        self.is_active = true;

        Ok(format!("Logging enabled to: {path}"))
    }

    pub fn toggle_logging(&mut self) -> Result<String, Box<dyn std::error::Error>> {
        match &self.file_path {
            Some(path) => {
                self.is_active = !self.is_active;
                if self.is_active {
                    Ok(format!("Logging resumed to: {path}"))
                } else {
                    Ok(format!("Logging paused (file: {path})"))
                }
            }
            None => {
                Err("No log file specified. Use /log <filename> to enable logging first.".into())
            }
        }
    }

    pub fn log_message(&self, content: &str) -> Result<(), Box<dyn std::error::Error>> {
        let Some(file_path) = self.file_path.as_deref().filter(|_| self.is_active) else {
            return Ok(());
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(file_path)?;
        let mut writer = BufWriter::new(file);

        for line in content.lines() {
            writeln!(writer, "{line}")?;
        }
        writeln!(writer)?;

        writer.flush()?;
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn get_status_string(&self) -> String {
        match (&self.file_path, self.is_active) {
            (None, _) => "disabled".to_string(),
            (Some(path), true) => format!("active ({})", file_name(path)),
            (Some(path), false) => format!("paused ({})", file_name(path)),
        }
    }
}

fn file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .into_owned()
}

/// Write `messages` to `path` in transcript format, replacing the file
/// only once everything has been written.
pub fn dump_conversation(
    messages: &[Message],
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let parent = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut temp_file = NamedTempFile::new_in(parent)?;

    for message in messages {
        let text = match message.role {
            Role::User => format!("You: {}", message.content),
            Role::Assistant if message.content.is_empty() => continue,
            Role::Assistant => message.content.clone(),
        };
        for line in text.lines() {
            writeln!(temp_file, "{line}")?;
        }
        for attachment in message.attachments() {
            writeln!(temp_file, "  {}", attachment.marker())?;
        }
        writeln!(temp_file)?;
    }

    temp_file.flush()?;
    temp_file.as_file().sync_all()?;
    temp_file.persist(path)?;
    Ok(())
}
