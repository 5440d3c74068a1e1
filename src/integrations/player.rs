// src/integrations/player.rs
//
// External player launch through the host's default file handler.
//
// The launcher only starts the handler process. It does not persist
// anything or call services.

use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};

use crate::error::{AppError, AppResult};

#[cfg_attr(test, mockall::automock)]
pub trait MediaLauncher: Send + Sync {
    /// Open the file with the system's default application
    fn open(&self, path: &Path) -> AppResult<()>;
}

/// Uses `xdg-open` (Linux/BSD), `open` (macOS) or `start` (Windows)
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLauncher;

impl SystemLauncher {
    pub fn new() -> Self {
        Self
    }

    #[cfg(target_os = "macos")]
    fn handler_command(path: &Path) -> AppResult<Command> {
        let mut cmd = Command::new("open");
        cmd.arg(path);
        Ok(cmd)
    }

    #[cfg(target_os = "windows")]
    fn handler_command(path: &Path) -> AppResult<Command> {
        let mut cmd = Command::new("cmd");
        // Empty title argument, otherwise a quoted path is taken as the title
        cmd.args(["/C", "start", ""]).arg(path);
        Ok(cmd)
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    fn handler_command(path: &Path) -> AppResult<Command> {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(path);
        Ok(cmd)
    }

    #[cfg(not(any(unix, target_os = "windows")))]
    fn handler_command(_path: &Path) -> AppResult<Command> {
        Err(AppError::Player(
            "No default file handler is available on this platform".to_string(),
        ))
    }
}

impl MediaLauncher for SystemLauncher {
    fn open(&self, path: &Path) -> AppResult<()> {
        if !path.is_file() {
            return Err(AppError::Player(format!(
                "Movie file not found: {}",
                path.display()
            )));
        }

        let mut cmd = Self::handler_command(path)?;
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        let child = cmd.spawn().map_err(|e| {
            AppError::Player(format!(
                "Failed to launch default player for {}: {}",
                path.display(),
                e
            ))
        })?;
        reap_in_background(child)?;

        log::info!("Opened {} in the default player", path.display());
        Ok(())
    }
}

/// Wait for the handler process on a detached thread so it never lingers
/// as a zombie in a long-lived host. The handle yields the exit status.
fn reap_in_background(mut child: Child) -> AppResult<JoinHandle<Option<ExitStatus>>> {
    let pid = child.id();

    thread::Builder::new()
        .name(format!("player-reaper-{}", pid))
        .spawn(move || match child.wait() {
            Ok(status) => {
                if !status.success() {
                    log::warn!("Default player handler (pid {}) exited with {}", pid, status);
                }
                Some(status)
            }
            Err(e) => {
                log::warn!("Could not wait for player handler (pid {}): {}", pid, e);
                None
            }
        })
        .map_err(|e| AppError::Player(format!("Failed to watch player process: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_player_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = SystemLauncher::new().open(&dir.path().join("gone.mp4"));

        match result {
            Err(AppError::Player(msg)) => assert!(msg.contains("not found")),
            other => panic!("Expected player error, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_handler_process_is_reaped() {
        let child = Command::new("true").spawn().unwrap();

        let status = reap_in_background(child).unwrap().join().unwrap();

        assert!(status.unwrap().success());
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_handler_status_is_reported() {
        let child = Command::new("false").spawn().unwrap();

        let status = reap_in_background(child).unwrap().join().unwrap();

        assert!(!status.unwrap().success());
    }

    #[test]
    fn test_directory_is_not_a_movie_file() {
        let dir = tempfile::tempdir().unwrap();

        assert!(matches!(
            SystemLauncher::new().open(dir.path()),
            Err(AppError::Player(_))
        ));
    }
}
