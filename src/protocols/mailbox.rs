//! Filesystem-backed mailbox transport
//!
//! Turns a plain directory into a durable multi-producer/multi-consumer message
//! queue using only file creation, exclusive locks, and atomic renames, with
//! no external broker.
//!
//! Directory layout:
//! ```text
//! <directory>/
//!   msg_<token>.json              # pending message, JSON body
//!   processed_msg_<token>.json    # claimed message (left on disk)
//! ```
//!
//! # Claim discipline
//!
//! A consumer claims a pending file by opening it read-write, taking an
//! exclusive flock, and renaming it under the `processed_` prefix within the
//! same directory. The atomic rename is the sole arbiter of ownership: whichever
//! caller wins the rename owns the message, and a caller that finds the file
//! gone from under its original name has lost the race and moves on to the next
//! candidate. The lock held across the rename keeps a second consumer from
//! reading a half-claimed entry; the lock alone is not enough, because every
//! `receive` call snapshots its own candidate list up front.
//!
//! Lock acquisition blocks without a timeout, so a crashed holder of a claimed
//! file can stall other consumers on that file indefinitely. Claimed files are
//! retained on disk as a delivery record; nothing here deletes them.

use crate::{Config, ConnectivaError, Message, Result, SendOutcome, Transport};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info, warn};
use uuid::Uuid;

const DEFAULT_PREFIX: &str = "msg_";
const DEFAULT_PROCESSED_PREFIX: &str = "processed_";
const FILE_SUFFIX: &str = ".json";

/// Mailbox transport over a shared directory
///
/// Multiple instances, in any mix of threads and processes, may point at the
/// same directory; coordination happens entirely through the filesystem.
#[derive(Debug)]
pub struct MailboxTransport {
    directory: PathBuf,
    prefix: String,
    processed_prefix: String,
}

impl MailboxTransport {
    /// Create a mailbox from configuration
    ///
    /// Reads `directory`, `prefix`, and `processed_prefix`; all other keys are
    /// ignored. When `directory` is unset, the endpoint itself (minus any
    /// `file://` scheme) names the directory, falling back to the current
    /// directory for an empty endpoint.
    pub fn new(config: &Config) -> Self {
        let directory = config
            .directory
            .clone()
            .unwrap_or_else(|| default_directory(&config.endpoint));

        Self {
            directory,
            prefix: config
                .prefix
                .clone()
                .unwrap_or_else(|| DEFAULT_PREFIX.to_string()),
            processed_prefix: config
                .processed_prefix
                .clone()
                .unwrap_or_else(|| DEFAULT_PROCESSED_PREFIX.to_string()),
        }
    }

    /// The directory this mailbox reads and writes
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Generate a collision-resistant filename for one message
    ///
    /// The token is a random 128-bit UUID rendered as hex, so two concurrent
    /// `send` calls never produce the same name.
    fn generate_filename(&self) -> String {
        format!("{}{}{}", self.prefix, Uuid::new_v4().simple(), FILE_SUFFIX)
    }

    /// Write a message to a fresh file under an exclusive lock
    fn write_message(&self, path: &Path, message: &Message) -> Result<()> {
        // create_new refuses to clobber an existing file, so even a token
        // collision could not overwrite another producer's message
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)?;

        file.lock_exclusive()?;
        let result = write_locked(&mut file, message);
        let _ = fs2::FileExt::unlock(&file);
        result
    }

    /// List pending files, oldest first
    ///
    /// The returned list is this call's candidate snapshot: files written after
    /// the listing are never offered by this call, and files claimed by other
    /// consumers in the meantime simply fail their rename later.
    fn pending_candidates(&self) -> Result<Vec<Candidate>> {
        let mut candidates = Vec::new();

        for entry in fs::read_dir(&self.directory)? {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if !name.starts_with(&self.prefix) {
                continue;
            }

            // Another consumer may rename the file between the listing and
            // this stat; a vanished entry is a lost race, not a failure
            let metadata = match entry.metadata() {
                Ok(metadata) => metadata,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };
            // Creation time is the ordering key; fall back to mtime on
            // filesystems that do not report a birth time
            let created = metadata
                .created()
                .or_else(|_| metadata.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);

            candidates.push(Candidate {
                name: name.to_string(),
                created,
            });
        }

        candidates.sort_by(|a, b| a.created.cmp(&b.created).then_with(|| a.name.cmp(&b.name)));
        Ok(candidates)
    }

    /// Try to claim one candidate; `Ok(None)` means another consumer won the race
    fn try_claim(&self, candidate: &Candidate) -> Result<Option<Message>> {
        let pending_path = self.directory.join(&candidate.name);
        let claimed_path = self
            .directory
            .join(format!("{}{}", self.processed_prefix, candidate.name));

        let file = match OpenOptions::new().read(true).write(true).open(&pending_path) {
            Ok(file) => file,
            // Already claimed and renamed by someone else
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        file.lock_exclusive()?;

        // The rename is the claim. Losing it means another consumer got here
        // between our open and our lock; release and report the loss.
        if let Err(e) = fs::rename(&pending_path, &claimed_path) {
            let _ = fs2::FileExt::unlock(&file);
            if e.kind() == ErrorKind::NotFound {
                return Ok(None);
            }
            return Err(e.into());
        }
        debug!(path = %claimed_path.display(), "claimed mailbox file");

        let result = read_locked(&file);
        let _ = fs2::FileExt::unlock(&file);
        result.map(Some)
    }
}

/// One entry of a receive call's candidate snapshot
struct Candidate {
    name: String,
    created: SystemTime,
}

impl Transport for MailboxTransport {
    /// Ensure the mailbox directory exists, creating missing parents
    fn connect(&mut self) -> Result<()> {
        info!(directory = %self.directory.display(), "accessing mailbox directory");
        fs::create_dir_all(&self.directory).map_err(|e| {
            ConnectivaError::Connection(format!(
                "failed to create mailbox directory {}: {}",
                self.directory.display(),
                e
            ))
        })
    }

    /// Write the message to a uniquely named pending file
    fn send(&mut self, message: &Message) -> SendOutcome {
        let path = self.directory.join(self.generate_filename());
        debug!(path = %path.display(), "writing message file");

        match self.write_message(&path, message) {
            Ok(()) => SendOutcome::file_written(path),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to write message");
                SendOutcome::failed(e)
            }
        }
    }

    /// Claim and return the oldest pending message
    ///
    /// Returns at most one message per call. An empty queue, or losing every
    /// claim race, yields the `"No message found"` error message; unexpected
    /// I/O failures yield the same shape with the underlying cause.
    fn receive(&mut self) -> Message {
        let candidates = match self.pending_candidates() {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!(directory = %self.directory.display(), error = %e, "failed to scan mailbox");
                return Message::error(e.to_string());
            }
        };

        for candidate in &candidates {
            match self.try_claim(candidate) {
                Ok(Some(message)) => return message,
                Ok(None) => continue,
                Err(e) => {
                    warn!(file = %candidate.name, error = %e, "failed to read message");
                    return Message::error(e.to_string());
                }
            }
        }

        debug!(directory = %self.directory.display(), "no pending messages");
        Message::no_message_found()
    }

    /// No durable resource to release
    fn disconnect(&mut self) {
        debug!(directory = %self.directory.display(), "closing mailbox access");
    }
}

/// Resolve the mailbox directory from an endpoint string
fn default_directory(endpoint: &str) -> PathBuf {
    let path = endpoint.strip_prefix("file://").unwrap_or(endpoint);
    if path.is_empty() {
        PathBuf::from(".")
    } else {
        PathBuf::from(path)
    }
}

fn write_locked(file: &mut File, message: &Message) -> Result<()> {
    serde_json::to_writer(&mut *file, message)?;
    file.flush()?;
    Ok(())
}

/// Read the message body through the handle opened before the rename
fn read_locked(mut file: &File) -> Result<Message> {
    let mut body = String::new();
    file.read_to_string(&mut body)?;
    Ok(serde_json::from_str(&body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn create_test_mailbox() -> (MailboxTransport, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::new("").with_directory(temp_dir.path().join("mbox"));
        let mut mailbox = MailboxTransport::new(&config);
        mailbox.connect().unwrap();
        (mailbox, temp_dir)
    }

    fn pending_files(mailbox: &MailboxTransport) -> Vec<String> {
        fs::read_dir(mailbox.directory())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|n| n.starts_with("msg_"))
            .collect()
    }

    fn claimed_files(mailbox: &MailboxTransport) -> Vec<String> {
        fs::read_dir(mailbox.directory())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|n| n.starts_with("processed_"))
            .collect()
    }

    #[test]
    fn test_connect_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b").join("mbox");
        let config = Config::new("").with_directory(&nested);

        let mut mailbox = MailboxTransport::new(&config);
        assert!(!nested.exists());
        mailbox.connect().unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn test_send_writes_one_pending_file() {
        let (mut mailbox, _dir) = create_test_mailbox();

        let outcome = mailbox.send(&Message::new("send", json!({"k": "v"})));
        assert_eq!(outcome.status(), Some("file_written"));
        let path = outcome.file_path().unwrap();
        assert!(path.exists());

        let files = pending_files(&mailbox);
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with(".json"));
    }

    #[test]
    fn test_round_trip() {
        let (mut mailbox, _dir) = create_test_mailbox();

        let sent = Message::new("send", json!({"k": "v"}));
        assert!(mailbox.send(&sent).is_delivered());

        let received = mailbox.receive();
        assert_eq!(received.action, "send");
        assert_eq!(received.data, sent.data);
    }

    #[test]
    fn test_receive_on_empty_directory() {
        let (mut mailbox, _dir) = create_test_mailbox();

        let received = mailbox.receive();
        assert!(received.is_error());
        assert_eq!(received.error_reason(), Some("No message found"));
        assert_eq!(received.data, json!({}));
    }

    #[test]
    fn test_claimed_file_is_retained() {
        let (mut mailbox, _dir) = create_test_mailbox();

        mailbox.send(&Message::new("send", json!(1)));
        mailbox.receive();

        // The claim renames rather than deletes; the record stays on disk
        assert!(pending_files(&mailbox).is_empty());
        let claimed = claimed_files(&mailbox);
        assert_eq!(claimed.len(), 1);
        assert!(claimed[0].starts_with("processed_msg_"));
    }

    #[test]
    fn test_second_receive_reports_empty() {
        let (mut mailbox, _dir) = create_test_mailbox();

        mailbox.send(&Message::new("send", json!({"k": "v"})));
        assert!(!mailbox.receive().is_error());

        let second = mailbox.receive();
        assert!(second.is_error());
        assert_eq!(second.error_reason(), Some("No message found"));
    }

    #[test]
    fn test_oldest_first_ordering() {
        let (mut mailbox, _dir) = create_test_mailbox();

        for label in ["a", "b", "c"] {
            mailbox.send(&Message::new("send", json!({ "label": label })));
            // Space out creation timestamps beyond filesystem granularity
            std::thread::sleep(std::time::Duration::from_millis(30));
        }

        for expected in ["a", "b", "c"] {
            let received = mailbox.receive();
            assert_eq!(received.data, json!({ "label": expected }));
        }
    }

    #[test]
    fn test_custom_prefixes() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::new("")
            .with_directory(temp_dir.path())
            .with_prefix("q_")
            .with_processed_prefix("done_");
        let mut mailbox = MailboxTransport::new(&config);
        mailbox.connect().unwrap();

        mailbox.send(&Message::new("send", json!(1)));
        let names: Vec<String> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names.len(), 1);
        assert!(names[0].starts_with("q_"));

        mailbox.receive();
        let names: Vec<String> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert!(names[0].starts_with("done_q_"));
    }

    #[test]
    fn test_filename_tokens_are_unique() {
        let (mailbox, _dir) = create_test_mailbox();

        let mut names: Vec<String> = (0..256).map(|_| mailbox.generate_filename()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 256);
    }

    #[test]
    fn test_endpoint_path_used_as_directory() {
        let temp_dir = TempDir::new().unwrap();
        let endpoint = temp_dir.path().to_str().unwrap().to_string();

        let mailbox = MailboxTransport::new(&Config::new(endpoint.as_str()));
        assert_eq!(mailbox.directory(), temp_dir.path());

        let mailbox = MailboxTransport::new(&Config::new(format!("file://{}", endpoint)));
        assert_eq!(mailbox.directory(), temp_dir.path());

        let mailbox = MailboxTransport::new(&Config::new(""));
        assert_eq!(mailbox.directory(), Path::new("."));
    }

    #[test]
    fn test_disconnect_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::new("").with_directory(temp_dir.path());
        let mut mailbox = MailboxTransport::new(&config);

        // Before connect, and repeatedly
        mailbox.disconnect();
        mailbox.connect().unwrap();
        mailbox.disconnect();
        mailbox.disconnect();
    }

    #[test]
    fn test_corrupt_message_reports_error_value() {
        let (mut mailbox, _dir) = create_test_mailbox();

        fs::write(mailbox.directory().join("msg_corrupt.json"), b"not json").unwrap();

        let received = mailbox.receive();
        assert!(received.is_error());
        assert!(received.error_reason().is_some());
    }
}
