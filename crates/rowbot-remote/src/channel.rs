//! Line-oriented, prompt-delimited transport to the game process.
//!
//! The game writes blocks of text that end with a prompt (`": "` by default) and then
//! waits for one line of input. [`Transport::read_until_prompt`] returns everything
//! received since the previous prompt; [`Transport::write_line`] sends one command.
//!
//! [`ProcessChannel`] owns the subprocess. A background thread forwards its stdout in
//! chunks, which lets reads give up after a timeout and notice when the process exits.
//! The process is killed by [`Transport::terminate`] or, at the latest, when the channel
//! is dropped.

use std::{
    io::{self, Read as _, Write as _},
    process::{Child, ChildStdin, Command, Stdio},
    sync::mpsc::{self, Receiver, RecvTimeoutError},
    thread,
    time::{Duration, Instant},
};

use tracing::{debug, trace};

use crate::config::GameConfig;

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::IsVariant)]
pub enum ChannelError {
    #[display("failed to start game process {program}")]
    Spawn { program: String, source: io::Error },
    #[display("failed to communicate with game process")]
    Io(io::Error),
    #[display("game process exited before printing a prompt")]
    Exited { partial: String },
    #[display("no prompt received within {timeout:?}")]
    Timeout { timeout: Duration },
    #[display("channel already terminated")]
    Terminated,
}

/// Request/response transport to the game.
pub trait Transport {
    /// Sends `line` followed by a line break. Does not wait for a response.
    fn write_line(&mut self, line: &str) -> Result<(), ChannelError>;

    /// Blocks until the next prompt and returns the text received before it.
    fn read_until_prompt(&mut self) -> Result<String, ChannelError>;

    /// Stops the game process. Calling it more than once has no further effect.
    fn terminate(&mut self);
}

impl<T> Transport for &mut T
where
    T: Transport + ?Sized,
{
    fn write_line(&mut self, line: &str) -> Result<(), ChannelError> {
        (**self).write_line(line)
    }

    fn read_until_prompt(&mut self) -> Result<String, ChannelError> {
        (**self).read_until_prompt()
    }

    fn terminate(&mut self) {
        (**self).terminate();
    }
}

/// Opens a fresh transport for every game.
pub trait Launcher {
    type Transport: Transport;

    fn launch(&self, config: &GameConfig) -> Result<Self::Transport, ChannelError>;
}

/// Launches the configured executable as a subprocess.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessLauncher;

impl Launcher for ProcessLauncher {
    type Transport = ProcessChannel;

    fn launch(&self, config: &GameConfig) -> Result<Self::Transport, ChannelError> {
        ProcessChannel::spawn(config)
    }
}

/// Subprocess-backed [`Transport`].
#[derive(Debug)]
pub struct ProcessChannel {
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    chunks: Receiver<Vec<u8>>,
    pending: Vec<u8>,
    prompt: Vec<u8>,
    read_timeout: Option<Duration>,
}

impl ProcessChannel {
    /// Starts the configured executable with piped stdin and stdout.
    ///
    /// # Panics
    ///
    /// Panics if the configured prompt is empty.
    pub fn spawn(config: &GameConfig) -> Result<Self, ChannelError> {
        assert!(!config.prompt.is_empty(), "prompt must not be empty");
        let program = config.program.display().to_string();
        let spawn_error = |source| ChannelError::Spawn {
            program: program.clone(),
            source,
        };

        let mut child = Command::new(&config.program)
            .args(&config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(spawn_error)?;
        let stdin = child.stdin.take();
        let Some(mut stdout) = child.stdout.take() else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(spawn_error(io::Error::other("stdout not captured")));
        };

        let (sender, chunks) = mpsc::channel();
        let reader = thread::Builder::new()
            .name("game-stdout".to_owned())
            .spawn(move || {
                let mut buf = [0; 4096];
                loop {
                    match stdout.read(&mut buf) {
                        Ok(0) => break,
                        Ok(n) => {
                            if sender.send(buf[..n].to_vec()).is_err() {
                                break;
                            }
                        }
                        Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                        Err(_) => break,
                    }
                }
            });
        if let Err(source) = reader {
            let _ = child.kill();
            let _ = child.wait();
            return Err(spawn_error(source));
        }

        debug!(pid = child.id(), program = %program, "game process started");
        Ok(Self {
            child: Some(child),
            stdin,
            chunks,
            pending: vec![],
            prompt: config.prompt.as_bytes().to_vec(),
            read_timeout: config.read_timeout(),
        })
    }

    /// Returns the OS process id while the process is running.
    #[must_use]
    pub fn id(&self) -> Option<u32> {
        self.child.as_ref().map(Child::id)
    }

    fn take_through_prompt(&mut self) -> Option<String> {
        let pos = self
            .pending
            .windows(self.prompt.len())
            .position(|window| window == self.prompt.as_slice())?;
        let mut block: Vec<u8> = self.pending.drain(..pos + self.prompt.len()).collect();
        block.truncate(pos);
        Some(String::from_utf8_lossy(&block).into_owned())
    }
}

impl Transport for ProcessChannel {
    fn write_line(&mut self, line: &str) -> Result<(), ChannelError> {
        let stdin = self.stdin.as_mut().ok_or(ChannelError::Terminated)?;
        trace!(line, "write");
        stdin
            .write_all(line.as_bytes())
            .and_then(|()| stdin.write_all(b"\n"))
            .and_then(|()| stdin.flush())
            .map_err(|e| match e.kind() {
                io::ErrorKind::BrokenPipe => ChannelError::Exited {
                    partial: String::from_utf8_lossy(&self.pending).into_owned(),
                },
                _ => ChannelError::Io(e),
            })
    }

    fn read_until_prompt(&mut self) -> Result<String, ChannelError> {
        if self.child.is_none() {
            return Err(ChannelError::Terminated);
        }
        let deadline = self.read_timeout.map(|timeout| (timeout, Instant::now() + timeout));
        loop {
            if let Some(block) = self.take_through_prompt() {
                trace!(block, "read");
                return Ok(block);
            }
            let received = match deadline {
                Some((_, deadline)) => self
                    .chunks
                    .recv_timeout(deadline.saturating_duration_since(Instant::now())),
                None => self
                    .chunks
                    .recv()
                    .map_err(|_| RecvTimeoutError::Disconnected),
            };
            match received {
                Ok(chunk) => self.pending.extend_from_slice(&chunk),
                Err(RecvTimeoutError::Timeout) => {
                    let timeout = deadline.map_or(Duration::ZERO, |(timeout, _)| timeout);
                    return Err(ChannelError::Timeout { timeout });
                }
                Err(RecvTimeoutError::Disconnected) => {
                    let partial = String::from_utf8_lossy(&self.pending).into_owned();
                    self.pending.clear();
                    return Err(ChannelError::Exited { partial });
                }
            }
        }
    }

    fn terminate(&mut self) {
        self.stdin = None;
        let Some(mut child) = self.child.take() else {
            return;
        };
        match child.try_wait() {
            Ok(Some(status)) => debug!(%status, "game process already exited"),
            _ => {
                if let Err(e) = child.kill() {
                    debug!(error = %e, "failed to kill game process");
                }
                match child.wait() {
                    Ok(status) => debug!(%status, "game process terminated"),
                    Err(e) => debug!(error = %e, "failed to reap game process"),
                }
            }
        }
    }
}

impl Drop for ProcessChannel {
    fn drop(&mut self) {
        self.terminate();
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn shell(script: &str, timeout_ms: Option<u64>) -> GameConfig {
        GameConfig {
            program: "sh".into(),
            args: vec!["-c".to_owned(), script.to_owned()],
            read_timeout_ms: timeout_ms,
            ..GameConfig::default()
        }
    }

    #[test]
    fn test_prompt_delimited_exchange() {
        let config = shell(
            "printf 'Enter width: '; read w; printf '12\\nO.\\n.X\\nGot %s: ' \"$w\"; read c",
            Some(5_000),
        );
        let mut channel = ProcessChannel::spawn(&config).unwrap();
        assert_eq!(channel.read_until_prompt().unwrap(), "Enter width");
        channel.write_line("6").unwrap();
        assert_eq!(channel.read_until_prompt().unwrap(), "12\nO.\n.X\nGot 6");
        channel.terminate();
        channel.terminate();
        assert!(channel.id().is_none());
        assert!(channel.read_until_prompt().unwrap_err().is_terminated());
    }

    #[test]
    fn test_exit_reports_partial_output() {
        let config = shell("printf 'Width: '; read w; printf 'bye'", Some(5_000));
        let mut channel = ProcessChannel::spawn(&config).unwrap();
        assert_eq!(channel.read_until_prompt().unwrap(), "Width");
        channel.write_line("4").unwrap();
        match channel.read_until_prompt() {
            Err(ChannelError::Exited { partial }) => assert_eq!(partial, "bye"),
            other => panic!("expected exit, got {other:?}"),
        }
    }

    #[test]
    fn test_write_after_exit_fails() {
        let config = shell("exit 0", Some(5_000));
        let mut channel = ProcessChannel::spawn(&config).unwrap();
        assert!(channel.read_until_prompt().unwrap_err().is_exited());
        let err = channel.write_line("1").unwrap_err();
        assert!(err.is_exited() || err.is_io(), "unexpected error: {err:?}");
    }

    #[test]
    fn test_timeout_without_prompt() {
        let config = shell("exec sleep 5", Some(100));
        let mut channel = ProcessChannel::spawn(&config).unwrap();
        let err = channel.read_until_prompt().unwrap_err();
        assert!(
            matches!(err, ChannelError::Timeout { timeout } if timeout == Duration::from_millis(100))
        );
        channel.terminate();
    }

    #[test]
    fn test_missing_program() {
        let config = GameConfig {
            program: "./definitely-not-a-game".into(),
            ..GameConfig::default()
        };
        assert!(ProcessChannel::spawn(&config).unwrap_err().is_spawn());
    }
}
