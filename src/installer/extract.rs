//! Archive unpacking (zip and gzip-compressed tar)

use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::{Component, Path, PathBuf};

use flate2::read::GzDecoder;
use tracing::debug;
use zip::ZipArchive;

use crate::error::Result;
use crate::error::fs::{installation, read_failed, write_failed};

/// Supported archive formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    TarGz,
}

impl ArchiveFormat {
    /// Detect the format from the file name, falling back to magic bytes
    pub fn detect(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        if name.ends_with(".zip") {
            return Ok(ArchiveFormat::Zip);
        }
        if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            return Ok(ArchiveFormat::TarGz);
        }

        let mut magic = [0u8; 4];
        let mut file = File::open(path).map_err(|e| read_failed(path, e))?;
        let read = file.read(&mut magic).map_err(|e| read_failed(path, e))?;
        match &magic[..read] {
            [0x50, 0x4b, 0x03, 0x04] => Ok(ArchiveFormat::Zip),
            [0x1f, 0x8b, ..] => Ok(ArchiveFormat::TarGz),
            _ => Err(installation(format!(
                "unrecognised archive format: {}",
                path.display()
            ))),
        }
    }
}

/// Unpack `archive` into `target`
pub fn extract(archive: &Path, target: &Path) -> Result<()> {
    match ArchiveFormat::detect(archive)? {
        ArchiveFormat::Zip => extract_zip(archive, target),
        ArchiveFormat::TarGz => extract_tar_gz(archive, target),
    }
}

fn extract_tar_gz(source: &Path, target: &Path) -> Result<()> {
    let file = File::open(source).map_err(|e| read_failed(source, e))?;
    let mut archive = tar::Archive::new(GzDecoder::new(BufReader::new(file)));
    archive.set_preserve_mtime(true);
    archive
        .unpack(target)
        .map_err(|e| installation(format!("failed extracting {}: {e}", source.display())))
}

fn extract_zip(source: &Path, target: &Path) -> Result<()> {
    let file = File::open(source).map_err(|e| read_failed(source, e))?;
    let mut archive = ZipArchive::new(BufReader::new(file))?;

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        let entry_path = sanitize_archive_path(entry.name())?;
        let destination = target.join(&entry_path);

        if entry.is_dir() {
            fs::create_dir_all(&destination).map_err(|e| write_failed(&destination, e))?;
            continue;
        }

        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).map_err(|e| write_failed(parent, e))?;
        }

        let mut output = File::create(&destination).map_err(|e| write_failed(&destination, e))?;
        io::copy(&mut entry, &mut output).map_err(|e| write_failed(&destination, e))?;

        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&destination, fs::Permissions::from_mode(mode))
                .map_err(|e| write_failed(&destination, e))?;
        }
    }

    debug!(entries = archive.len(), "zip archive extracted");
    Ok(())
}

/// Reject absolute entries and entries escaping the target
fn sanitize_archive_path(entry: &str) -> Result<PathBuf> {
    let path = Path::new(entry);
    if path.is_absolute() {
        return Err(installation(format!("archive entry is absolute: {entry}")));
    }

    let mut sanitized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(segment) => sanitized.push(segment),
            Component::CurDir => {}
            _ => {
                return Err(installation(format!(
                    "archive entry escapes the target: {entry}"
                )));
            }
        }
    }

    Ok(sanitized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_zip_archive(archive: &Path, entries: &[(&str, &[u8])]) {
        let file = File::create(archive).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        let options = zip::write::FileOptions::default().unix_permissions(0o755);
        for (path, contents) in entries {
            zip.start_file(*path, options).unwrap();
            zip.write_all(contents).unwrap();
        }
        zip.finish().unwrap();
    }

    fn write_tar_gz_archive(archive: &Path, entries: &[(&str, &[u8])]) {
        let file = File::create(archive).unwrap();
        let encoder = flate2::write::GzEncoder::new(file, flate2::Compression::fast());
        let mut builder = tar::Builder::new(encoder);
        for (path, contents) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_size(contents.len() as u64);
            header.set_mode(0o755);
            header.set_cksum();
            builder.append_data(&mut header, path, *contents).unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap();
    }

    #[test]
    fn test_extract_zip_with_nested_dirs() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("a.zip");
        write_zip_archive(
            &archive,
            &[
                ("artifactory-pro-6.23.42/bin/artifactoryctl", b"#!/bin/sh\n"),
                ("artifactory-pro-6.23.42/etc/deep/nested.xml", b"<x/>"),
            ],
        );
        let target = temp.path().join("out");
        fs::create_dir(&target).unwrap();

        extract(&archive, &target).unwrap();

        assert!(target.join("artifactory-pro-6.23.42/bin/artifactoryctl").is_file());
        assert_eq!(
            fs::read_to_string(target.join("artifactory-pro-6.23.42/etc/deep/nested.xml")).unwrap(),
            "<x/>"
        );
    }

    #[test]
    fn test_extract_tar_gz_keeps_executable_bit() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("a.tar.gz");
        write_tar_gz_archive(
            &archive,
            &[("artifactory-pro-7.77.3/app/bin/artifactoryctl", b"#!/bin/sh\nexit 0\n")],
        );

        extract(&archive, temp.path()).unwrap();

        let script = temp.path().join("artifactory-pro-7.77.3/app/bin/artifactoryctl");
        assert!(script.is_file());
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&script).unwrap().permissions().mode();
            assert_ne!(mode & 0o100, 0);
        }
    }

    #[test]
    fn test_format_detected_from_magic_bytes() {
        let temp = TempDir::new().unwrap();
        let zip_path = temp.path().join("download");
        write_zip_archive(&zip_path, &[("x.txt", b"x")]);
        assert_eq!(ArchiveFormat::detect(&zip_path).unwrap(), ArchiveFormat::Zip);

        let tar_path = temp.path().join("download.bin");
        write_tar_gz_archive(&tar_path, &[("x.txt", b"x")]);
        assert_eq!(ArchiveFormat::detect(&tar_path).unwrap(), ArchiveFormat::TarGz);

        let junk = temp.path().join("junk");
        fs::write(&junk, "not an archive").unwrap();
        assert!(ArchiveFormat::detect(&junk).is_err());
    }

    #[test]
    fn test_corrupt_archive_fails() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("broken.zip");
        fs::write(&archive, "definitely not a zip").unwrap();

        assert!(extract(&archive, temp.path()).is_err());
    }

    #[test]
    fn test_sanitize_archive_path_rejects_unsafe_inputs() {
        assert!(sanitize_archive_path("/etc/passwd").is_err());
        assert!(sanitize_archive_path("../escape").is_err());
        assert!(sanitize_archive_path("a/../../escape").is_err());
        assert_eq!(
            sanitize_archive_path("./a/b").unwrap(),
            PathBuf::from("a/b")
        );
    }
}
