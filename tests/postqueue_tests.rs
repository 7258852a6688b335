//! Integration tests for placing finished downloads into the library.

use std::fs;
use std::path::Path;
use tempfile::TempDir;
use tvsort::core::postqueue::place;
use tvsort::core::session::Session;

// ========== TEST FIXTURES ==========

struct Fixture {
    _root: TempDir,
    downloads: std::path::PathBuf,
    library: std::path::PathBuf,
    archive: std::path::PathBuf,
}

fn fixture() -> Fixture {
    let root = TempDir::new().unwrap();
    let downloads = root.path().join("downloads");
    let library = root.path().join("tv");
    let archive = root.path().join("archive");
    for dir in [&downloads, &library, &archive] {
        fs::create_dir_all(dir).unwrap();
    }
    Fixture {
        downloads,
        library,
        archive,
        _root: root,
    }
}

impl Fixture {
    fn session(&self) -> Session {
        Session::new(vec![self.library.clone(), self.archive.clone()], 0.6)
    }
}

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

const PICARD: &str = "Star Trek Picard/Season 03/star.trek.picard.s03e09.1080p.web.h264-cakes.mkv";

// ========== PLACEMENT TESTS ==========

#[test]
fn test_place_release_directory() {
    let f = fixture();
    let release = f.downloads.join("Star.Trek.Picard.S03E09.1080p.WEB.H264-CAKES");
    write(&release.join("Star.Trek.Picard.S03E09.1080p.WEB.H264-CAKES.mkv"), "episode");
    write(&release.join("Sample/sample.mkv"), "s");
    write(&release.join("release.nfo"), "n");

    let placement = place(&mut f.session(), &release).unwrap();

    let expected = f.library.join(PICARD);
    assert_eq!(placement.destination, expected);
    assert_eq!(fs::read_to_string(&expected).unwrap(), "episode");
    assert_eq!(placement.removed.as_deref(), Some(release.as_path()));
    assert!(!release.exists());
}

#[test]
fn test_place_single_file() {
    let f = fixture();
    let file = f.downloads.join("Star.Trek.Picard.S03E09.1080p.WEB.H264-CAKES.mkv");
    write(&file, "episode");

    let placement = place(&mut f.session(), &file).unwrap();

    assert_eq!(placement.destination, f.library.join(PICARD));
    assert!(placement.removed.is_none());
    assert!(!file.exists());
    assert!(f.downloads.exists());
}

#[test]
fn test_place_obfuscated_payload() {
    let f = fixture();
    let release = f.downloads.join("Star.Trek.Picard.S03E09.1080p.WEB.H264-CAKES");
    write(&release.join("a8f7e6c1d2b3.mkv"), "episode");

    let placement = place(&mut f.session(), &release).unwrap();

    assert_eq!(placement.destination, f.library.join(PICARD));
    assert_eq!(placement.episode.title, "Star Trek Picard");
    assert!(f.library.join(PICARD).exists());
}

#[test]
fn test_place_into_existing_show_folder() {
    let f = fixture();
    fs::create_dir_all(f.archive.join("The Walking Dead")).unwrap();
    let file = f.downloads.join("The.Walking.Dead.S11E24.1080p.WEB.H264-CAKES.mkv");
    write(&file, "episode");

    let placement = place(&mut f.session(), &file).unwrap();

    assert_eq!(
        placement.destination,
        f.archive
            .join("The Walking Dead/Season 11/the.walking.dead.s11e24.1080p.web.h264-cakes.mkv")
    );
    assert!(!f.library.join("The Walking Dead").exists());
}

#[test]
fn test_place_never_overwrites() {
    let f = fixture();
    write(&f.library.join(PICARD), "existing");
    let release = f.downloads.join("Star.Trek.Picard.S03E09.1080p.WEB.H264-CAKES");
    write(&release.join("Star.Trek.Picard.S03E09.1080p.WEB.H264-CAKES.mkv"), "new");

    let result = place(&mut f.session(), &release);

    assert!(matches!(result, Err(tvsort::Error::DestinationExists(_))));
    assert_eq!(fs::read_to_string(f.library.join(PICARD)).unwrap(), "existing");
    assert!(release
        .join("Star.Trek.Picard.S03E09.1080p.WEB.H264-CAKES.mkv")
        .exists());
}

#[test]
fn test_place_unrecognized_download() {
    let f = fixture();
    let release = f.downloads.join("complete");
    write(&release.join("a8f7e6c1d2b3.mkv"), "episode");

    let result = place(&mut f.session(), &release);

    assert!(matches!(result, Err(tvsort::Error::Unrecognized(_))));
    assert!(release.join("a8f7e6c1d2b3.mkv").exists());
}

#[test]
fn test_place_empty_download() {
    let f = fixture();
    let release = f.downloads.join("Star.Trek.Picard.S03E09.1080p.WEB.H264-CAKES");
    fs::create_dir_all(&release).unwrap();

    let result = place(&mut f.session(), &release);
    assert!(matches!(result, Err(tvsort::Error::EmptyDownload(_))));
}

#[test]
fn test_placed_episode_is_recorded() {
    let f = fixture();
    let file = f.downloads.join("Star.Trek.Picard.S03E09.1080p.WEB.H264-CAKES.mkv");
    write(&file, "episode");
    let mut session = f.session();

    let placement = place(&mut session, &file).unwrap();
    assert!(session.is_found(&placement.episode));
}
