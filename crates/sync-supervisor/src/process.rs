//! OS process primitives
//!
//! Signal delivery and liveness checks behind a trait so the termination
//! protocol can be exercised against fakes. The OS implementation shells
//! out to the platform tools rather than linking a process library.

use std::io;

use async_trait::async_trait;
use tokio::process::Command;

/// Signal delivery and liveness queries for worker pids
#[async_trait]
pub trait ProcessControl: Send + Sync {
    /// Request graceful shutdown (SIGINT on Unix)
    async fn interrupt(&self, pid: u32) -> io::Result<()>;
    /// Forcefully kill the process (SIGKILL on Unix)
    async fn force_kill(&self, pid: u32) -> io::Result<()>;
    /// Does a process with this pid currently exist?
    async fn is_alive(&self, pid: u32) -> bool;
}

/// Platform implementation of [`ProcessControl`]
#[derive(Debug, Default)]
pub struct OsProcessControl;

impl OsProcessControl {
    /// Create the platform process control
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessControl for OsProcessControl {
    async fn interrupt(&self, pid: u32) -> io::Result<()> {
        #[cfg(unix)]
        {
            run_signal_tool("kill", &["-INT", &pid.to_string()]).await
        }
        #[cfg(windows)]
        {
            // No interrupt equivalent; taskkill without /F requests close
            run_signal_tool("taskkill", &["/PID", &pid.to_string()]).await
        }
        #[cfg(not(any(unix, windows)))]
        {
            let _ = pid;
            Err(io::Error::other("no signal delivery on this platform"))
        }
    }

    async fn force_kill(&self, pid: u32) -> io::Result<()> {
        #[cfg(unix)]
        {
            run_signal_tool("kill", &["-KILL", &pid.to_string()]).await
        }
        #[cfg(windows)]
        {
            run_signal_tool("taskkill", &["/F", "/PID", &pid.to_string()]).await
        }
        #[cfg(not(any(unix, windows)))]
        {
            let _ = pid;
            Err(io::Error::other("no signal delivery on this platform"))
        }
    }

    async fn is_alive(&self, pid: u32) -> bool {
        #[cfg(unix)]
        {
            // kill -0 probes existence without delivering a signal
            Command::new("kill")
                .args(["-0", &pid.to_string()])
                .output()
                .await
                .map(|o| o.status.success())
                .unwrap_or(false)
        }
        #[cfg(windows)]
        {
            Command::new("tasklist")
                .args(["/FI", &format!("PID eq {}", pid), "/NH"])
                .output()
                .await
                .map(|o| String::from_utf8_lossy(&o.stdout).contains(&pid.to_string()))
                .unwrap_or(false)
        }
        #[cfg(not(any(unix, windows)))]
        {
            let _ = pid;
            false
        }
    }
}

#[cfg(any(unix, windows))]
async fn run_signal_tool(program: &str, args: &[&str]) -> io::Result<()> {
    let output = Command::new(program).args(args).output().await?;
    if output.status.success() {
        Ok(())
    } else {
        Err(io::Error::other(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_nonexistent_pid_is_dead() {
        // Pid max on Linux defaults to well below this
        let control = OsProcessControl::new();
        assert!(!control.is_alive(4_000_000).await);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_own_pid_is_alive() {
        let control = OsProcessControl::new();
        assert!(control.is_alive(std::process::id()).await);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_interrupt_unknown_pid_errors() {
        let control = OsProcessControl::new();
        assert!(control.interrupt(4_000_000).await.is_err());
    }
}
