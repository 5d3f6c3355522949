use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::resources::validator;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    /// Write a string to a file, replacing it atomically
    pub fn write_atomic<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Self::ensure_dir(&dir)?;

        let mut temp = tempfile::NamedTempFile::new_in(&dir)
            .with_context(|| format!("Failed to create temporary file in {:?}", dir))?;
        std::io::Write::write_all(&mut temp, content.as_bytes())
            .with_context(|| format!("Failed to write temporary file for {:?}", path))?;
        temp.persist(path)
            .with_context(|| format!("Failed to replace file: {:?}", path))?;
        Ok(())
    }

    /// Find XML files directly inside `dir` whose root element is `<resources>`
    ///
    /// Sorted by file name so discovery order is stable across platforms.
    pub fn find_resource_files<P: AsRef<Path>>(dir: P) -> Result<Vec<String>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).min_depth(1).max_depth(1).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            let is_xml = path
                .extension()
                .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case("xml"));
            if !path.is_file() || !is_xml {
                continue;
            }

            if Self::has_resources_root(path) {
                result.push(entry.file_name().to_string_lossy().to_string());
            } else {
                debug!("Ignoring {:?}: not a string resource file", path);
            }
        }

        result.sort();
        Ok(result)
    }

    // @checks: Well-formed XML with a <resources> root
    fn has_resources_root(path: &Path) -> bool {
        if validator::check_file(path).is_err() {
            return false;
        }
        match fs::read_to_string(path) {
            Ok(text) => crate::resources::parser::parse_str(&text, path, "").is_ok(),
            Err(_) => false,
        }
    }
}
