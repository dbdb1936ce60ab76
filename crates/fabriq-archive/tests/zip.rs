use std::io::{Cursor, Read};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use fabriq_archive::{
    build_from_directory, build_from_structure, zip_directory, zip_structure, BuildOptions,
    CompressionLevel, Error,
};
use fabriq_parse::{ProjectFile, ProjectStructure, StrategyKind};
use time::OffsetDateTime;

fn sample_structure() -> ProjectStructure {
    ProjectStructure::new(
        "demo",
        vec![
            ProjectFile::new("Cargo.toml", "[package]\nname = \"demo\"\n"),
            ProjectFile::new("src/main.rs", "fn main() {\n    println!(\"hi\");\n}\n"),
            ProjectFile::new("src/util/helpers.rs", "pub fn noop() {}\n"),
        ],
        StrategyKind::Marker,
    )
}

fn build_in_memory(structure: &ProjectStructure, options: &BuildOptions) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    build_from_structure(structure, &mut buffer, options).expect("build should succeed");
    buffer.into_inner()
}

#[test]
fn structure_archive_round_trips() {
    let structure = sample_structure();
    let bytes = build_in_memory(&structure, &BuildOptions::default());

    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("archive should open");
    let names: Vec<String> = archive.file_names().map(str::to_string).collect();
    assert!(names.contains(&"demo/".to_string()), "root dir entry missing: {names:?}");
    assert!(names.contains(&"demo/src/".to_string()), "src dir entry missing");
    assert!(names.contains(&"demo/src/util/".to_string()), "nested dir entry missing");

    let mut entry = archive
        .by_name("demo/src/main.rs")
        .expect("file entry should exist");
    let mut content = String::new();
    entry.read_to_string(&mut content).expect("entry should read");
    assert!(content.contains("println!"));
}

#[test]
fn directory_entries_land_just_before_their_first_file() {
    let structure = ProjectStructure::new(
        "Demo",
        vec![
            ProjectFile::new("a.txt", "alpha"),
            ProjectFile::new("src/b.txt", "beta"),
        ],
        StrategyKind::Marker,
    );
    let bytes = build_in_memory(&structure, &BuildOptions::default());

    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("archive should open");
    let names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).expect("entry").name().to_string())
        .collect();
    assert_eq!(names, vec!["Demo/", "Demo/a.txt", "Demo/src/", "Demo/src/b.txt"]);
}

#[test]
fn flat_mode_omits_root_prefix() {
    let structure = sample_structure();
    let bytes = build_in_memory(&structure, &BuildOptions::default().flat());

    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("archive should open");
    assert!(archive.by_name("src/main.rs").is_ok());
    assert!(archive.by_name("demo/src/main.rs").is_err(), "prefixed name should not exist");
}

#[test]
fn report_counts_files_dirs_and_bytes() {
    let structure = sample_structure();
    let mut buffer = Cursor::new(Vec::new());
    let report = build_from_structure(&structure, &mut buffer, &BuildOptions::default())
        .expect("build should succeed");

    assert_eq!(report.entry_count, 3);
    // demo, demo/src, demo/src/util
    assert_eq!(report.dir_count, 3);
    assert_eq!(report.total_bytes, structure.meta.total_bytes);
    assert!(report.compressed_bytes > 0);
    assert_eq!(report.compressed_bytes, buffer.into_inner().len() as u64);
    assert!(report.is_clean());
}

#[test]
fn deflate_beats_stored_on_repetitive_content() {
    let structure = ProjectStructure::new(
        "logs",
        vec![ProjectFile::new("big.txt", "the same line again\n".repeat(500))],
        StrategyKind::Marker,
    );
    let stored = build_in_memory(&structure, &BuildOptions::default().compression(CompressionLevel::Stored));
    let best = build_in_memory(&structure, &BuildOptions::default().compression(CompressionLevel::Best));
    assert!(
        best.len() < stored.len(),
        "deflate ({}) should be smaller than stored ({})",
        best.len(),
        stored.len()
    );
}

#[test]
fn fixed_timestamp_is_stamped_on_entries() {
    // 2024-05-05 12:00:00 UTC
    let ts = OffsetDateTime::from_unix_timestamp(1_714_910_400).expect("valid timestamp");
    let structure = sample_structure();
    let bytes = build_in_memory(&structure, &BuildOptions::default().timestamp(ts));

    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("archive should open");
    let entry = archive.by_name("demo/Cargo.toml").expect("entry should exist");
    let modified = entry.last_modified().expect("mtime should be set");
    assert_eq!(modified.year(), 2024);
    assert_eq!(modified.month(), 5);
}

#[test]
fn progress_fires_once_per_file() {
    let hits = Arc::new(AtomicUsize::new(0));
    let hits_clone = hits.clone();
    let options = BuildOptions::default().on_progress(Arc::new(move |progress| {
        hits_clone.fetch_add(1, Ordering::SeqCst);
        assert_eq!(progress.entries_total, Some(3));
        assert!(progress.entries_done >= 1);
    }));

    build_in_memory(&sample_structure(), &options);
    assert_eq!(hits.load(Ordering::SeqCst), 3);
}

#[test]
fn preset_cancel_flag_aborts_build() {
    let flag = Arc::new(AtomicBool::new(true));
    let options = BuildOptions::default().cancel_flag(flag);
    let mut buffer = Cursor::new(Vec::new());
    let err = build_from_structure(&sample_structure(), &mut buffer, &options);
    assert!(matches!(err, Err(Error::Cancelled)));
}

#[test]
fn directory_tree_round_trips() {
    let temp = tempfile::Builder::new()
        .prefix("fabriq-zip-dir-")
        .tempdir()
        .expect("temp dir");
    let root = temp.path().join("site");
    std::fs::create_dir_all(root.join("css")).expect("mkdir");
    std::fs::write(root.join("index.html"), "<html></html>").expect("write");
    std::fs::write(root.join("css/site.css"), "body {}").expect("write");

    let dest = temp.path().join("site.zip");
    let report =
        zip_directory(&root, &dest, &BuildOptions::default()).expect("zip should succeed");
    assert_eq!(report.entry_count, 2);
    assert!(report.is_clean());

    let file = std::fs::File::open(&dest).expect("open zip");
    let mut archive = zip::ZipArchive::new(file).expect("archive should open");
    let mut entry = archive.by_name("site/css/site.css").expect("entry should exist");
    let mut content = String::new();
    entry.read_to_string(&mut content).expect("read");
    assert_eq!(content, "body {}");
}

#[test]
fn empty_directory_source_is_no_entries() {
    let temp = tempfile::Builder::new()
        .prefix("fabriq-zip-empty-")
        .tempdir()
        .expect("temp dir");
    let root = temp.path().join("bare");
    std::fs::create_dir(&root).expect("mkdir");

    let mut buffer = Cursor::new(Vec::new());
    let err = build_from_directory(&root, &mut buffer, &BuildOptions::default());
    assert!(matches!(err, Err(Error::NoEntries)));
}

#[test]
fn directory_source_must_be_a_directory() {
    let temp = tempfile::Builder::new()
        .prefix("fabriq-zip-file-")
        .tempdir()
        .expect("temp dir");
    let file_path = temp.path().join("plain.txt");
    std::fs::write(&file_path, "not a dir").expect("write");

    let mut buffer = Cursor::new(Vec::new());
    let err = build_from_directory(&file_path, &mut buffer, &BuildOptions::default());
    assert!(matches!(err, Err(Error::NotADirectory { .. })));
}

#[test]
fn unwritable_destination_is_an_io_error() {
    let temp = tempfile::Builder::new()
        .prefix("fabriq-zip-noexist-")
        .tempdir()
        .expect("temp dir");
    let dest = temp.path().join("missing").join("out.zip");
    let err = zip_structure(&sample_structure(), &dest, &BuildOptions::default());
    assert!(matches!(err, Err(Error::Io(_))));
}

#[test]
fn zip_structure_writes_a_readable_file() {
    let temp = tempfile::Builder::new()
        .prefix("fabriq-zip-out-")
        .tempdir()
        .expect("temp dir");
    let dest = temp.path().join("demo.zip");
    let report = zip_structure(&sample_structure(), &dest, &BuildOptions::default())
        .expect("zip should succeed");

    let on_disk = std::fs::metadata(&dest).expect("zip file should exist").len();
    assert_eq!(on_disk, report.compressed_bytes);

    let file = std::fs::File::open(&dest).expect("open zip");
    let archive = zip::ZipArchive::new(file).expect("archive should open");
    assert_eq!(archive.len(), 6); // 3 dirs + 3 files
}
