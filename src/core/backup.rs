use crate::db::log::ttlog;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};
use rusqlite::Connection;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use zip::ZipWriter;
use zip::write::FileOptions;

pub struct BackupLogic;

impl BackupLogic {
    /// Copy the alarm database to `dest_file`, optionally as a zip.
    /// An existing destination is only replaced with `force` or after
    /// the operator confirms.
    pub fn backup(db_path: &str, dest_file: &str, compress: bool, force: bool) -> AppResult<PathBuf> {
        let src = Path::new(db_path);
        let dest = Path::new(dest_file);

        // 1️⃣ Check DB exists
        if !src.exists() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Database not found: {}", src.display()),
            )
            .into());
        }

        // 2️⃣ Ensure destination folder exists
        if let Some(parent) = dest.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        // 3️⃣ Existing destination → ask confirmation
        if dest.exists() && !force && !confirm_overwrite(dest) {
            info("Backup cancelled.");
            return Ok(dest.to_path_buf());
        }

        // 4️⃣ Copy (or compress) database
        let final_path = if compress {
            let zip_path = dest.with_extension("zip");
            let entry = src
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "database.sqlite".to_string());
            zip_file(src, &zip_path, &entry)?;
            success(format!("📦 Compressed backup created: {}", zip_path.display()));
            zip_path
        } else {
            fs::copy(src, dest)?;
            success(format!("Backup created: {}", dest.display()));
            dest.to_path_buf()
        };

        // 5️⃣ Log in DB
        if let Ok(conn) = Connection::open(src) {
            let _ = ttlog(
                &conn,
                "backup",
                &final_path.to_string_lossy(),
                if compress {
                    "Backup created and compressed"
                } else {
                    "Backup created"
                },
            );
        }

        Ok(final_path)
    }
}

fn confirm_overwrite(dest: &Path) -> bool {
    warning(format!(
        "The file '{}' already exists. Overwrite it? [y/N]",
        dest.display()
    ));
    print!("> ");
    let _ = io::stdout().flush();

    let mut answer = String::new();
    if io::stdin().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Write `src` into a new zip archive at `dest` as a single entry.
pub fn zip_file(src: &Path, dest: &Path, entry_name: &str) -> AppResult<()> {
    let file = fs::File::create(dest)?;
    let mut zip = ZipWriter::new(file);

    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    zip.start_file(entry_name, options)
        .map_err(|e| AppError::Io(io::Error::other(format!("zip start_file: {}", e))))?;

    let mut f = fs::File::open(src)?;
    io::copy(&mut f, &mut zip)?;

    zip.finish()
        .map_err(|e| AppError::Io(io::Error::other(format!("zip finish: {}", e))))?;

    Ok(())
}
