//! Credentials file export for newly registered users.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Base name of the exported file.
pub const FILE_STEM: &str = "credentials";

/// Contents handed to the new user.
pub fn credentials_text(email: &str, password: &str) -> String {
    format!("Email: {email}\nPassword: {password}")
}

/// Candidate names in `dir`: `credentials.txt`, then `credentials (1).txt`, ...
fn candidate_paths(dir: &Path) -> impl Iterator<Item = PathBuf> + '_ {
    std::iter::once(dir.join(format!("{FILE_STEM}.txt")))
        .chain((1u32..).map(move |n| dir.join(format!("{FILE_STEM} ({n}).txt"))))
}

/// Write the credentials file into `dir` and return its path.
///
/// Existing files are never overwritten; a taken name moves on to the next number.
pub fn write_credentials(dir: &Path, email: &str, password: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let contents = credentials_text(email, password);
    for path in candidate_paths(dir) {
        let mut file = match private_options(false).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e.into()),
        };
        file.write_all(contents.as_bytes())?;
        file.flush()?;
        tracing::info!("Credentials written to {:?}", path);
        return Ok(path);
    }
    Err(std::io::Error::new(ErrorKind::AlreadyExists, "no free credentials file name").into())
}

/// Create or truncate a file readable by the owner only.
pub(crate) fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut file = private_options(true).open(path)?;
    file.write_all(contents)?;
    file.flush()
}

/// Owner-only write options; `truncate` replaces an existing file, otherwise it must be new.
fn private_options(truncate: bool) -> OpenOptions {
    let mut options = OpenOptions::new();
    options.write(true);
    if truncate {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options
}
