use super::*;

use std::fs::File;
use std::io::Write;

use flate2::Compression;
use flate2::write::GzEncoder;
use tempfile::TempDir;

fn write_zip(path: &Path, entries: &[(&str, &str)]) {
    let file = File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();
    for (name, content) in entries {
        if name.ends_with('/') {
            zip.add_directory(*name, options).unwrap();
        } else {
            zip.start_file(*name, options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
    }
    zip.finish().unwrap();
}

fn write_tar_gz(path: &Path, entries: &[(&str, &str)]) {
    let file = File::create(path).unwrap();
    let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
    for (name, content) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, name, content.as_bytes())
            .unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap();
}

fn write_tar_bz2(path: &Path, entries: &[(&str, &str)]) {
    let file = File::create(path).unwrap();
    let encoder = bzip2::write::BzEncoder::new(file, bzip2::Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for (name, content) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, name, content.as_bytes())
            .unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap();
}

/// Tar with names written straight into the header, bypassing the builder's
/// own path checks
fn write_raw_tar(path: &Path, entries: &[(&str, &str)]) {
    let file = File::create(path).unwrap();
    let mut builder = tar::Builder::new(file);
    for (name, content) in entries {
        let mut header = tar::Header::new_old();
        header.as_old_mut().name[..name.len()].copy_from_slice(name.as_bytes());
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_entry_type(tar::EntryType::Regular);
        header.set_cksum();
        builder.append(&header, content.as_bytes()).unwrap();
    }
    builder.finish().unwrap();
}

fn files_under(dir: &Path) -> Vec<String> {
    let mut files: Vec<String> = WalkDir::new(dir)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            crate::path_utils::relative_forward(e.path(), dir).unwrap()
        })
        .collect();
    files.sort();
    files
}

#[test]
fn test_is_supported_container() {
    let extractor = ArchiveExtractor::new();
    assert!(extractor.is_supported_container(Path::new("theme.zip")));
    assert!(extractor.is_supported_container(Path::new("theme.XPI")));
    assert!(extractor.is_supported_container(Path::new("theme.tar")));
    assert!(extractor.is_supported_container(Path::new("theme.tar.gz")));
    assert!(extractor.is_supported_container(Path::new("theme.tgz")));
    assert!(extractor.is_supported_container(Path::new("theme.tar.bz2")));
    assert!(extractor.is_supported_container(Path::new("theme.tbz2")));

    assert!(!extractor.is_supported_container(Path::new("theme.7z")));
    assert!(!extractor.is_supported_container(Path::new("theme.rar")));
    assert!(!extractor.is_supported_container(Path::new("theme.css")));
}

#[test]
fn test_extract_zip_into_scratch() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("theme.zip");
    write_zip(
        &archive,
        &[
            ("theme/", ""),
            ("theme/userChrome.css", "@import url(\"partials/a.css\");\n"),
            ("theme/partials/a.css", "#nav-bar { }\n"),
            ("theme/README.md", "readme"),
        ],
    );

    let extractor = ArchiveExtractor::new();
    let dest = extractor.extract(&archive, None).unwrap();
    assert!(dest.is_absolute());
    assert!(
        dest.file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with(EXTRACT_PREFIX)
    );
    assert_eq!(
        files_under(&dest),
        vec![
            "theme/README.md",
            "theme/partials/a.css",
            "theme/userChrome.css"
        ]
    );
    assert_eq!(find_stylesheet_files(&dest).len(), 2);

    fs::remove_dir_all(&dest).unwrap();
}

#[test]
fn test_extract_tar_gz_into_given_destination() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("theme.tgz");
    write_tar_gz(&archive, &[("repo-main/userChrome.css", "/* root */\n")]);

    let dest = temp.path().join("out");
    let extractor = ArchiveExtractor::new();
    let result = extractor.extract(&archive, Some(&dest)).unwrap();
    assert_eq!(result, dest);
    assert_eq!(files_under(&dest), vec!["repo-main/userChrome.css"]);
}

#[test]
fn test_extract_tar_bz2_both_suffixes() {
    let temp = TempDir::new().unwrap();
    let extractor = ArchiveExtractor::new();

    for name in ["theme.tar.bz2", "theme.tbz2"] {
        let archive = temp.path().join(name);
        write_tar_bz2(
            &archive,
            &[
                ("theme/userChrome.css", "@import url(\"tabs.css\");\n"),
                ("theme/tabs.css", "#tabbrowser-tabs { }\n"),
            ],
        );

        let dest = temp.path().join(format!("out-{name}"));
        extractor.extract(&archive, Some(&dest)).unwrap();
        assert_eq!(
            files_under(&dest),
            vec!["theme/tabs.css", "theme/userChrome.css"]
        );
        assert_eq!(
            fs::read_to_string(dest.join("theme/tabs.css")).unwrap(),
            "#tabbrowser-tabs { }\n"
        );
    }
}

#[test]
fn test_extract_xpi_as_zip() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("theme.xpi");
    write_zip(
        &archive,
        &[
            ("manifest.json", "{}"),
            ("chrome/userChrome.css", "#nav-bar { }\n"),
        ],
    );

    let dest = temp.path().join("out");
    ArchiveExtractor::new()
        .extract(&archive, Some(&dest))
        .unwrap();
    assert_eq!(
        files_under(&dest),
        vec!["chrome/userChrome.css", "manifest.json"]
    );
    assert_eq!(find_stylesheet_files(&dest).len(), 1);
}

#[test]
fn test_extract_rejects_parent_segment() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("evil.zip");
    write_zip(
        &archive,
        &[("good.css", "/* ok */"), ("../evil.css", "/* evil */")],
    );

    let dest = temp.path().join("nested").join("out");
    let err = ArchiveExtractor::new()
        .extract(&archive, Some(&dest))
        .unwrap_err();
    assert!(matches!(err, LoaderError::UnsafePath { .. }));

    assert!(!temp.path().join("nested").join("evil.css").exists());
    assert!(!dest.exists(), "fresh destination should be removed");
}

#[test]
fn test_extract_rejects_absolute_tar_entry() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("evil.tar");
    write_raw_tar(
        &archive,
        &[("ok.css", "/* ok */"), ("/etc/passwd", "root:x:0:0")],
    );

    let dest = temp.path().join("out");
    fs::create_dir(&dest).unwrap();
    let err = ArchiveExtractor::new()
        .extract(&archive, Some(&dest))
        .unwrap_err();
    assert!(matches!(err, LoaderError::UnsafePath { .. }));

    // Validation runs before writing, so even safe entries are absent
    assert!(files_under(&dest).is_empty());
    assert!(dest.exists(), "pre-existing destination is kept");
}

#[test]
fn test_extract_rejects_parent_segment_in_tar() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("evil.tar");
    write_raw_tar(&archive, &[("../evil.css", "/* evil */")]);

    let dest = temp.path().join("out");
    let err = ArchiveExtractor::new()
        .extract(&archive, Some(&dest))
        .unwrap_err();
    assert!(matches!(err, LoaderError::UnsafePath { .. }));
    assert!(!temp.path().join("evil.css").exists());
}

#[test]
fn test_extract_empty_archive() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("empty.zip");
    write_zip(&archive, &[("only-a-dir/", "")]);

    let dest = temp.path().join("out");
    let err = ArchiveExtractor::new()
        .extract(&archive, Some(&dest))
        .unwrap_err();
    assert!(matches!(err, LoaderError::EmptyArchive { .. }));
    assert!(!dest.exists());
}

#[test]
fn test_extract_corrupt_archive() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("broken.zip");
    fs::write(&archive, b"this is not a zip file").unwrap();

    let err = ArchiveExtractor::new()
        .extract(&archive, Some(&temp.path().join("out")))
        .unwrap_err();
    assert!(matches!(err, LoaderError::CorruptContainer { .. }));
}

#[test]
fn test_extract_unsupported_container() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("theme.rar");
    fs::write(&archive, b"Rar!").unwrap();

    let err = ArchiveExtractor::new().extract(&archive, None).unwrap_err();
    assert!(matches!(err, LoaderError::UnsupportedContainer { .. }));
}

struct FakeSevenZip;

impl ExtendedExtractor for FakeSevenZip {
    fn is_available(&self) -> bool {
        true
    }

    fn formats(&self) -> &[ContainerFormat] {
        &[ContainerFormat::SevenZip]
    }

    fn extract(&self, _archive: &Path, dest: &Path) -> Result<()> {
        fs::write(dest.join("userChrome.css"), "/* from 7z */").unwrap();
        Ok(())
    }
}

#[test]
fn test_extended_capability_adds_formats() {
    let extractor = ArchiveExtractor::with_extended(Box::new(FakeSevenZip));
    assert!(extractor.is_supported_container(Path::new("theme.7z")));
    assert!(!extractor.is_supported_container(Path::new("theme.rar")));
    assert_eq!(
        extractor.supported_formats().last(),
        Some(&ContainerFormat::SevenZip)
    );

    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("theme.7z");
    fs::write(&archive, b"7z").unwrap();
    let dest = extractor
        .extract(&archive, Some(&temp.path().join("out")))
        .unwrap();
    assert_eq!(files_under(&dest), vec!["userChrome.css"]);
}

#[test]
fn test_find_stylesheet_files_case_insensitive() {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("sub")).unwrap();
    fs::write(temp.path().join("a.css"), "").unwrap();
    fs::write(temp.path().join("sub/B.CSS"), "").unwrap();
    fs::write(temp.path().join("notes.txt"), "").unwrap();

    let files = find_stylesheet_files(temp.path());
    assert_eq!(files.len(), 2);
    assert!(files.iter().all(|f| f.starts_with(temp.path())));
}

#[test]
fn test_validate_extracted_content_without_stylesheets() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("README.md"), "").unwrap();
    let err = validate_extracted_content(temp.path()).unwrap_err();
    assert!(matches!(err, LoaderError::NoStylesheetFilesFound { .. }));
}
