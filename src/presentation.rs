//! Terminal presentation: status output and user commands.
//!
//! Nothing here classifies poses. The display pulls track info and logs from
//! the playback controller on a fixed cadence, and user commands are
//! forwarded to the controller one to one.

use crate::{playback::PlaybackController, pose::PoseSample, Error, Result};
use crossbeam_channel::{unbounded, Receiver};
use log::{info, warn};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::thread;

/// A user-initiated playback command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Previous track
    Previous,
    /// Next track
    Next,
    /// Toggle play/pause
    TogglePlayPause,
    /// Random track
    Shuffle,
    /// Volume in [0, 1]
    SetVolume(f32),
    /// Use another music folder
    SetMusicDir(PathBuf),
    /// Rescan the music folder
    Reload,
    /// Leave the application
    Quit,
}

/// Help text listing the terminal commands
pub const COMMAND_HELP: &str = "commands: p(rev) n(ext) t(oggle) s(huffle) v <0-100> dir <path> r(eload) q(uit)";

/// Parse one line of terminal input.
///
/// Blank lines yield `Ok(None)`.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] for unknown commands or bad arguments
pub fn parse_command(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_lowercase().as_str() {
        "p" | "prev" | "previous" => Command::Previous,
        "n" | "next" => Command::Next,
        "t" | "toggle" | "play" | "pause" => Command::TogglePlayPause,
        "s" | "shuffle" => Command::Shuffle,
        "r" | "reload" => Command::Reload,
        "q" | "quit" | "exit" => Command::Quit,
        "v" | "vol" | "volume" => {
            let percent: f32 = rest
                .parse()
                .map_err(|_| Error::InvalidInput(format!("Volume must be a number from 0 to 100, got `{rest}`")))?;
            if !(0.0..=100.0).contains(&percent) {
                return Err(Error::InvalidInput(format!("Volume must be from 0 to 100, got {percent}")));
            }
            Command::SetVolume(percent / 100.0)
        }
        "dir" | "folder" => {
            if rest.is_empty() {
                return Err(Error::InvalidInput("Missing folder path".to_string()));
            }
            Command::SetMusicDir(PathBuf::from(rest))
        }
        other => return Err(Error::InvalidInput(format!("Unknown command: {other}"))),
    };

    Ok(Some(command))
}

/// Forward a command to the controller.
///
/// Returns false for [`Command::Quit`].
pub fn apply_command(controller: &mut PlaybackController, command: Command) -> bool {
    match command {
        Command::Previous => controller.previous(),
        Command::Next => controller.next(),
        Command::TogglePlayPause => controller.toggle_play_pause(),
        Command::Shuffle => controller.shuffle(),
        Command::SetVolume(volume) => controller.set_volume(volume),
        Command::SetMusicDir(dir) => controller.set_music_dir(dir),
        Command::Reload => controller.reload_tracks(),
        Command::Quit => return false,
    }
    true
}

/// Read commands from stdin on a background thread.
///
/// The channel closes on end of input or after a quit command.
#[must_use]
pub fn spawn_stdin_commands() -> Receiver<Command> {
    let (tx, rx) = unbounded();
    thread::spawn(move || {
        info!("{}", COMMAND_HELP);
        for line in io::stdin().lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    warn!("Failed to read stdin: {}", e);
                    break;
                }
            };
            match parse_command(&line) {
                Ok(Some(command)) => {
                    let quit = command == Command::Quit;
                    if tx.send(command).is_err() || quit {
                        break;
                    }
                }
                Ok(None) => {}
                Err(e) => warn!("{} ({})", e, COMMAND_HELP),
            }
        }
    });
    rx
}

/// Periodic text rendering of the playback state
pub struct StatusDisplay<W: Write> {
    out: W,
    refresh_ticks: u64,
    show_pose: bool,
    shown_logs: u64,
    last_status: Option<String>,
}

impl<W: Write> StatusDisplay<W> {
    /// Create a display refreshing every `refresh_ticks` ticks
    pub fn new(out: W, refresh_ticks: u64, show_pose: bool) -> Self {
        Self {
            out,
            refresh_ticks: refresh_ticks.max(1),
            show_pose,
            shown_logs: 0,
            last_status: None,
        }
    }

    /// Refresh if `tick` falls on the display cadence
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the output fails
    pub fn tick(&mut self, tick: u64, controller: &PlaybackController, pose: Option<PoseSample>) -> io::Result<()> {
        if tick % self.refresh_ticks == 0 {
            self.render(controller, pose)?;
        }
        Ok(())
    }

    /// Print log lines not shown yet, then the status line if it changed
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the output fails
    pub fn render(&mut self, controller: &PlaybackController, pose: Option<PoseSample>) -> io::Result<()> {
        let total = controller.total_logged();
        let logs = controller.recent_logs();
        let unseen = usize::try_from(total - self.shown_logs.min(total)).unwrap_or(usize::MAX).min(logs.len());
        for line in &logs[logs.len() - unseen..] {
            writeln!(self.out, "  {line}")?;
        }
        self.shown_logs = total;

        let status = controller.current_track_info().to_string();
        if self.last_status.as_deref() != Some(status.as_str()) {
            writeln!(self.out, "♪ {status}")?;
            self.last_status = Some(status);
        }

        if self.show_pose {
            match pose {
                Some(sample) if sample.face_present => {
                    writeln!(self.out, "  pose: yaw {:.1} pitch {:.1}", sample.yaw, sample.pitch)?;
                }
                _ => writeln!(self.out, "  pose: no face")?,
            }
        }

        self.out.flush()
    }

    /// Consume the display and return its writer
    pub fn into_inner(self) -> W {
        self.out
    }
}
