//! Local filesystem storage for normalized images
//!
//! Files live under a single root directory which is also what the static
//! file route serves. Names are flat: no nested directories.

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// Flat file store rooted at one directory
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the root directory if it does not exist yet
    pub async fn ensure_root_exists(&self) -> io::Result<()> {
        fs::create_dir_all(&self.root).await?;
        info!("Upload directory ready: {}", self.root.display());
        Ok(())
    }

    /// Path a file named `name` is stored at, relative to the working directory
    pub fn path_for(&self, name: &str) -> io::Result<PathBuf> {
        validate_name(name)?;
        Ok(self.root.join(name))
    }

    /// Write `data` to a new file. Fails with `AlreadyExists` instead of
    /// overwriting when the name is taken.
    pub async fn write_new(&self, name: &str, data: &[u8]) -> io::Result<PathBuf> {
        let path = self.path_for(name)?;

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;

        if let Err(e) = write_all_and_sync(&mut file, data).await {
            drop(file);
            // Don't leave a truncated file behind
            let _ = fs::remove_file(&path).await;
            return Err(e);
        }

        debug!("Stored {} bytes at {}", data.len(), path.display());
        Ok(path)
    }

    /// Remove a previously stored file
    pub async fn delete(&self, path: &Path) -> io::Result<()> {
        if !path.starts_with(&self.root) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is outside the upload directory", path.display()),
            ));
        }

        fs::remove_file(path).await?;
        debug!("Removed {}", path.display());
        Ok(())
    }
}

async fn write_all_and_sync(file: &mut fs::File, data: &[u8]) -> io::Result<()> {
    file.write_all(data).await?;
    file.sync_all().await
}

fn validate_name(name: &str) -> io::Result<()> {
    let valid = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && !name.contains('\0');

    if valid {
        Ok(())
    } else {
        Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid file name: {:?}", name),
        ))
    }
}
