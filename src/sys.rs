//! Safe wrappers for platform-specific unsafe operations.
//!
//! Every `unsafe` block in the codebase lives here. Call sites use the safe
//! public API and never touch `unsafe` directly.

use crate::error::{Result, SightlineError};
use std::io::Read;

/// RAII guard that puts the controlling terminal into raw, non-blocking
/// single-key mode and restores the saved settings on drop.
///
/// With `VMIN = 0` and `VTIME = 0`, `read(2)` on stdin returns immediately
/// whether or not a key is buffered, which is what the in-mode key poll needs.
pub struct RawModeGuard {
    saved: libc::termios,
}

/// Enter raw single-key mode on stdin.
///
/// Fails when stdin is not a terminal (e.g. piped input), in which case the
/// caller should fall back to line-based input.
///
/// # Safety
/// `tcgetattr`/`tcsetattr` are standard POSIX calls; we pass a zeroed struct,
/// check return values, and only modify the struct we read back.
pub fn enter_raw_mode() -> Result<RawModeGuard> {
    // SAFETY: tcgetattr/tcsetattr on fd 0 with a zeroed termios struct;
    // return values are checked before the struct is used.
    unsafe {
        let mut term: libc::termios = std::mem::zeroed();
        if libc::tcgetattr(libc::STDIN_FILENO, &mut term) != 0 {
            return Err(SightlineError::Io(std::io::Error::last_os_error()));
        }
        let saved = term;
        term.c_lflag &= !(libc::ICANON | libc::ECHO);
        term.c_cc[libc::VMIN] = 0;
        term.c_cc[libc::VTIME] = 0;
        if libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, &term) != 0 {
            return Err(SightlineError::Io(std::io::Error::last_os_error()));
        }
        Ok(RawModeGuard { saved })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        // SAFETY: restores the termios settings captured by enter_raw_mode.
        unsafe {
            libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, &self.saved);
        }
    }
}

/// Read one byte from stdin without blocking.
///
/// Only meaningful while a [`RawModeGuard`] is alive; in canonical mode the
/// read would block until a full line arrives.
pub fn read_key_nonblocking() -> Option<char> {
    let mut buf = [0u8; 1];
    match std::io::stdin().read(&mut buf) {
        Ok(1) => Some(buf[0] as char),
        _ => None,
    }
}

/// Set an environment variable.
///
/// # Safety
/// Caller must ensure no other threads are reading environment variables concurrently.
pub fn set_env(key: &str, value: &str) {
    // SAFETY: Caller must ensure no other threads are reading environment
    // variables concurrently.
    #[allow(unsafe_code)]
    unsafe {
        std::env::set_var(key, value);
    }
}

/// Remove an environment variable.
///
/// # Safety
/// Caller must ensure no other threads are reading environment variables concurrently.
pub fn remove_env(key: &str) {
    // SAFETY: Caller must ensure no other threads are reading environment
    // variables concurrently.
    #[allow(unsafe_code)]
    unsafe {
        std::env::remove_var(key);
    }
}

/// Suppress noisy JACK/ALSA/PipeWire messages during audio backend probing.
///
/// Must be called before spawning threads.
pub fn suppress_audio_warnings() {
    // SAFETY: Called at startup before any threads are spawned.
    set_env("JACK_NO_START_SERVER", "1");
    set_env("JACK_NO_AUDIO_RESERVATION", "1");
    set_env("PIPEWIRE_DEBUG", "0");
    set_env("ALSA_DEBUG", "0");
    set_env("PW_LOG", "0");
}
