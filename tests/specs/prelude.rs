//! Test helpers for behavioral specifications.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

/// How long to wait for the daemon to print READY or exit.
pub const DAEMON_WAIT_MAX: Duration = Duration::from_secs(10);

/// Returns the path to the convoyd binary.
/// Falls back to resolving relative to the test binary itself when
/// CARGO_MANIFEST_DIR is stale (e.g. compiled by a removed worktree
/// into a shared target directory).
pub fn convoyd_binary() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));

    // Standard target directory (works when CARGO_MANIFEST_DIR is correct)
    let standard = manifest_dir.join("target/debug/convoyd");
    if standard.exists() {
        return standard;
    }

    // Fallback: resolve relative to the test binary itself.
    // The test binary lives at target/debug/deps/specs-<hash>, so its
    // grandparent is target/debug/ where convoyd is built.
    if let Ok(exe) = std::env::current_exe() {
        if let Some(debug_dir) = exe.parent().and_then(|d| d.parent()) {
            let fallback = debug_dir.join("convoyd");
            if fallback.exists() {
                return fallback;
            }
        }
    }

    standard
}

/// A running convoyd with its own isolated state directory.
pub struct DaemonUnderTest {
    pub child: Child,
    pub state_dir: PathBuf,
}

impl DaemonUnderTest {
    /// Spawn convoyd against `state_dir` and wait for READY on stdout.
    pub fn spawn(state_dir: &Path) -> Self {
        let mut child = Command::new(convoyd_binary())
            .env("CONVOY_STATE_DIR", state_dir)
            .env("CONVOY_TOWN_ROOT", state_dir)
            // Long intervals so specs observe lifecycle, not loop noise.
            .env("CONVOY_SCAN_MS", "3600000")
            .env("CONVOY_POLL_MS", "3600000")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("failed to spawn convoyd");

        let stdout = child.stdout.take().expect("stdout piped");
        let mut reader = BufReader::new(stdout);
        let mut line = String::new();
        let n = reader.read_line(&mut line).expect("read from convoyd");
        assert!(n > 0, "convoyd exited without printing READY");
        assert_eq!(line.trim(), "READY", "unexpected startup line: {line}");

        Self {
            child,
            state_dir: state_dir.to_path_buf(),
        }
    }

    pub fn pid_file(&self) -> PathBuf {
        self.state_dir.join("convoyd.pid")
    }

    pub fn log_file(&self) -> PathBuf {
        self.state_dir.join("convoyd.log")
    }

    /// Send SIGTERM and wait for the process to exit.
    pub fn terminate(&mut self) {
        let status = Command::new("kill")
            .arg(self.child.id().to_string())
            .status()
            .expect("failed to run kill");
        assert!(status.success(), "kill failed");
        self.wait_for_exit();
    }

    /// Wait for the daemon to exit, with a bounded deadline.
    pub fn wait_for_exit(&mut self) {
        let deadline = Instant::now() + DAEMON_WAIT_MAX;
        loop {
            if let Some(_status) = self.child.try_wait().expect("try_wait") {
                return;
            }
            assert!(
                Instant::now() < deadline,
                "convoyd did not exit within {DAEMON_WAIT_MAX:?}"
            );
            std::thread::sleep(Duration::from_millis(20));
        }
    }
}

impl Drop for DaemonUnderTest {
    fn drop(&mut self) {
        // Best-effort cleanup if a spec failed before terminating.
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
