//! In-memory file tree that a datapack is assembled in before it touches the disk.

use std::{collections::BTreeMap, fs, io, path::Path};

use zip::{
    write::{SimpleFileOptions, ZipWriter},
    CompressionMethod, DateTime,
};

/// Folder representation in virtual file system.
///
/// Entries are kept sorted by name so that placing and zipping a folder is
/// deterministic.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct VFolder {
    folders: BTreeMap<String, VFolder>,
    files: BTreeMap<String, VFile>,
}

impl VFolder {
    /// Create a new, empty virtual folder.
    #[must_use]
    pub fn new() -> VFolder {
        VFolder::default()
    }

    /// Get all direct subfolders in the folder.
    #[must_use]
    pub fn get_folders(&self) -> &BTreeMap<String, VFolder> {
        &self.folders
    }

    /// Get all direct files in the folder.
    #[must_use]
    pub fn get_files(&self) -> &BTreeMap<String, VFile> {
        &self.files
    }

    /// Check whether the folder contains no files, directly or in any subfolder.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.folders.values().all(VFolder::is_empty)
    }

    /// Recursively add a new folder to the folder. Existing folders are kept.
    pub fn add_folder(&mut self, path: &str) {
        let (head, tail) = split_path(path);
        let folder = self.folders.entry(head.to_string()).or_default();
        if let Some(tail) = tail {
            folder.add_folder(tail);
        }
    }

    /// Recursively add a new file to the folder, replacing any file at the same path.
    pub fn add_file(&mut self, path: &str, file: VFile) {
        match split_path(path) {
            (head, Some(tail)) => self
                .folders
                .entry(head.to_string())
                .or_default()
                .add_file(tail, file),
            (name, None) => {
                self.files.insert(name.to_string(), file);
            }
        }
    }

    /// Recursively get a subfolder by path.
    #[must_use]
    pub fn get_folder(&self, path: &str) -> Option<&VFolder> {
        match split_path(path) {
            (head, Some(tail)) => self.folders.get(head)?.get_folder(tail),
            (name, None) => self.folders.get(name),
        }
    }

    /// Recursively get a file by path.
    #[must_use]
    pub fn get_file(&self, path: &str) -> Option<&VFile> {
        match split_path(path) {
            (head, Some(tail)) => self.folders.get(head)?.get_file(tail),
            (name, None) => self.files.get(name),
        }
    }

    /// Place the folder and its contents on the file system.
    ///
    /// # Errors
    /// - If creating a directory or writing a file fails
    pub fn place(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)?;
        for (name, folder) in &self.folders {
            folder.place(&path.join(name))?;
        }
        for (name, file) in &self.files {
            fs::write(path.join(name), file.as_bytes())?;
        }
        Ok(())
    }

    /// Zip the folder and its contents into a deflated zip archive.
    ///
    /// Directory entries are written along with the files and every entry
    /// carries the same fixed timestamp, so zipping equal folders yields
    /// identical archives.
    ///
    /// # Errors
    /// - If the archive cannot be created or written
    pub fn zip(&self, path: &Path) -> zip::result::ZipResult<()> {
        use io::Write;

        let file = fs::File::create(path)?;
        let mut writer = ZipWriter::new(file);
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default());

        for entry in self.flatten() {
            match entry {
                FlatEntry::Folder(path) => writer.add_directory(path, options)?,
                FlatEntry::File(path, file) => {
                    writer.start_file(path, options)?;
                    writer.write_all(file.as_bytes())?;
                }
            }
        }

        writer.finish()?;

        Ok(())
    }

    /// Flatten the folder and its contents into a list of entries with full
    /// paths, each folder preceding its contents.
    fn flatten(&self) -> Vec<FlatEntry<'_>> {
        let mut entries = self
            .files
            .iter()
            .map(|(name, file)| FlatEntry::File(name.clone(), file))
            .collect::<Vec<_>>();

        for (name, folder) in &self.folders {
            entries.push(FlatEntry::Folder(format!("{name}/")));
            entries.extend(folder.flatten().into_iter().map(|entry| match entry {
                FlatEntry::Folder(path) => FlatEntry::Folder(format!("{name}/{path}")),
                FlatEntry::File(path, file) => FlatEntry::File(format!("{name}/{path}"), file),
            }));
        }

        entries
    }
}

impl TryFrom<&Path> for VFolder {
    type Error = io::Error;

    fn try_from(value: &Path) -> Result<Self, Self::Error> {
        let mut root_vfolder = VFolder::new();
        for dir_entry in fs::read_dir(value)? {
            let dir_entry = dir_entry?;
            let path = dir_entry.path();
            let name = dir_entry.file_name().into_string().map_err(|_| {
                io::Error::new(io::ErrorKind::InvalidInput, "Invalid file name")
            })?;
            if path.is_dir() {
                root_vfolder
                    .folders
                    .insert(name, VFolder::try_from(path.as_path())?);
            } else if path.is_file() {
                root_vfolder.files.insert(name, VFile::Binary(fs::read(path)?));
            }
        }

        Ok(root_vfolder)
    }
}

enum FlatEntry<'a> {
    Folder(String),
    File(String, &'a VFile),
}

fn split_path(path: &str) -> (&str, Option<&str>) {
    path.split_once('/')
        .map(|(h, t)| (h, (!t.is_empty()).then_some(t)))
        .unwrap_or((path, None))
}

/// File representation in virtual file system
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VFile {
    /// Text file
    Text(String),
    /// Binary file
    Binary(Vec<u8>),
}

impl VFile {
    /// Get the raw contents of the file.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            VFile::Text(text) => text.as_bytes(),
            VFile::Binary(data) => data,
        }
    }
}

impl From<String> for VFile {
    fn from(value: String) -> Self {
        VFile::Text(value)
    }
}
impl From<&str> for VFile {
    fn from(value: &str) -> Self {
        VFile::Text(value.to_string())
    }
}
impl Default for VFile {
    fn default() -> Self {
        VFile::Text(String::new())
    }
}
