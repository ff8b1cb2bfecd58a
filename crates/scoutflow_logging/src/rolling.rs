//! Size-capped log files.
//!
//! One family per binary lives in the logs directory: `<app>.log` is written
//! to, `<app>.log.1` is the previous file, and so on up to the policy's
//! `keep` count. Older generations are deleted.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;

/// How many files a family keeps and how large each may grow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationPolicy {
    pub keep: usize,
    pub max_bytes: u64,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            keep: 5,
            max_bytes: 10 * 1024 * 1024,
        }
    }
}

#[derive(Debug)]
struct LogFamily {
    dir: PathBuf,
    stem: String,
}

impl LogFamily {
    /// Generation 0 is the live file.
    fn generation(&self, n: usize) -> PathBuf {
        if n == 0 {
            self.dir.join(format!("{}.log", self.stem))
        } else {
            self.dir.join(format!("{}.log.{}", self.stem, n))
        }
    }

    /// Move every generation up one slot, deleting whatever falls off the end.
    fn shift(&self, keep: usize) -> io::Result<()> {
        for n in (0..keep).rev() {
            let from = self.generation(n);
            if !from.exists() {
                continue;
            }
            if n + 1 >= keep {
                fs::remove_file(&from)?;
            } else {
                fs::rename(&from, self.generation(n + 1))?;
            }
        }
        Ok(())
    }
}

/// An append-only log file that rolls over when it would exceed its size cap.
#[derive(Debug)]
pub struct RollingFile {
    family: LogFamily,
    policy: RotationPolicy,
    file: Option<File>,
    written: u64,
}

impl RollingFile {
    pub fn open(dir: impl Into<PathBuf>, app_name: &str, policy: RotationPolicy) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        let mut rolling = Self {
            family: LogFamily {
                dir,
                stem: sanitize_name(app_name),
            },
            policy: RotationPolicy {
                keep: policy.keep.max(1),
                ..policy
            },
            file: None,
            written: 0,
        };
        rolling.reopen()?;
        if rolling.written > rolling.policy.max_bytes {
            rolling.roll()?;
        }
        Ok(rolling)
    }

    /// Path of the file currently written to.
    pub fn current_path(&self) -> PathBuf {
        self.family.generation(0)
    }

    fn reopen(&mut self) -> io::Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.family.generation(0))?;
        self.written = file.metadata()?.len();
        self.file = Some(file);
        Ok(())
    }

    fn roll(&mut self) -> io::Result<()> {
        // Close the live file before renaming it.
        if let Some(mut file) = self.file.take() {
            file.flush()?;
        }
        self.family.shift(self.policy.keep)?;
        self.reopen()
    }
}

impl Write for RollingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written > 0 && self.written + buf.len() as u64 > self.policy.max_bytes {
            self.roll()?;
        }
        if self.file.is_none() {
            self.reopen()?;
        }
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "log file unavailable"))?;
        let n = file.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

/// Keep file names portable: anything but `[A-Za-z0-9_-]` becomes `_`.
fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|ch| match ch {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' => ch,
            _ => '_',
        })
        .collect()
}
