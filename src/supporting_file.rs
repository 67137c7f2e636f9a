//! Supporting documents attached to a questionnaire.
//!
//! Files are never scored. They only contribute a short summary to the
//! analysis prompt: text-like files are embedded in full, anything else is
//! reported by name and size.

use std::fs;
use std::path::Path;

use crate::utils::decode_utf8_dropping_invalid;

const TEXT_EXTENSIONS: &[&str] = &["txt", "csv", "json"];

/// A supporting file read fully into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportingFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SupportingFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Read a file from disk, naming it after the path's final component.
    pub fn from_path(path: &Path) -> Result<Self, std::io::Error> {
        let bytes = fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, bytes))
    }

    /// Whether the content is embedded verbatim in prompts.
    pub fn is_text(&self) -> bool {
        Path::new(&self.name)
            .extension()
            .map(|ext| {
                let ext = ext.to_string_lossy().to_ascii_lowercase();
                TEXT_EXTENSIONS.contains(&ext.as_str())
            })
            .unwrap_or(false)
    }

    /// Summary appended to the analysis prompt.
    pub fn summary(&self) -> String {
        if self.is_text() {
            format!(
                "File: {}\nContent:\n{}",
                self.name,
                decode_utf8_dropping_invalid(&self.bytes)
            )
        } else {
            format!(
                "File: {}\nSize: {} bytes\nType: supporting file (content not embedded)",
                self.name,
                self.bytes.len()
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn embeds_text_files() {
        let file = SupportingFile::new("ore-grades.CSV", b"pit,grade\nA,2.1".to_vec());
        let summary = file.summary();
        assert!(summary.starts_with("File: ore-grades.CSV\nContent:\n"));
        assert!(summary.contains("pit,grade\nA,2.1"));
    }

    #[test]
    fn invalid_utf8_in_text_files_is_dropped() {
        let file = SupportingFile::new("log.txt", b"dust \xfe\xffok".to_vec());
        let summary = file.summary();
        assert!(summary.ends_with("Content:\ndust ok"));
        assert!(!summary.contains('\u{FFFD}'));
    }

    #[test]
    fn reports_only_size_for_binary_files() {
        let bytes = vec![0x25, 0x50, 0x44, 0x46, 0x00, 0xff];
        let file = SupportingFile::new("permit.pdf", bytes);
        let summary = file.summary();
        assert!(summary.contains("File: permit.pdf"));
        assert!(summary.contains("Size: 6 bytes"));
        assert!(!summary.contains("PDF"));
    }

    #[test]
    fn files_without_extension_are_opaque() {
        let file = SupportingFile::new("README", b"hello".to_vec());
        assert!(!file.is_text());
    }

    #[test]
    fn reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        let mut handle = std::fs::File::create(&path).unwrap();
        handle.write_all(b"tailings dam inspected").unwrap();

        let file = SupportingFile::from_path(&path).unwrap();
        assert_eq!(file.name, "notes.txt");
        assert_eq!(file.bytes, b"tailings dam inspected");
    }
}
