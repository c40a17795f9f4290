//! Shared test helpers: executable stand-ins for the external tools.

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Write an executable `sh` script into `dir` and return its path
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}

/// Fake ffmpeg that writes `count` frames using the output pattern passed as
/// its last argument, then exits with `exit_code`
pub fn fake_ffmpeg(dir: &Path, count: usize, exit_code: i32) -> PathBuf {
    let body = format!(
        r#"for last; do :; done
i=1
while [ "$i" -le {count} ]; do
  : > "$(printf "$last" "$i")"
  i=$((i + 1))
done
echo "frames written" 1>&2
exit {exit_code}"#
    );
    write_script(dir, "ffmpeg", &body)
}

/// Fake exiftool printing `stdout`/`stderr` and exiting with `exit_code`
pub fn fake_exiftool(dir: &Path, stdout: &str, stderr: &str, exit_code: i32) -> PathBuf {
    let body = format!(
        "printf '%s' '{}'\nprintf '%s' '{}' 1>&2\nexit {}",
        stdout, stderr, exit_code
    );
    write_script(dir, "exiftool", &body)
}
