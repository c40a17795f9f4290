//! Process spawning helpers.
//!
//! Every external tool the pipeline runs goes through [`configure_tokio_command`]
//! so that invocations behave the same way: no inherited stdin, captured
//! stdout/stderr, and the child is killed if the awaiting future is dropped.
//! On Windows the console window is also suppressed.

use std::process::Stdio;

#[cfg(target_os = "windows")]
const CREATE_NO_WINDOW: u32 = 0x08000000;

/// Apply the pipeline's standard settings to a tokio process command.
pub fn configure_tokio_command(cmd: &mut tokio::process::Command) {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    #[cfg(target_os = "windows")]
    {
        cmd.creation_flags(CREATE_NO_WINDOW);
    }
}
