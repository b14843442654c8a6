//! End-to-end pairing over on-disk fixtures: two sets are selected, decodes
//! settle, diffs land in the export directory.

use std::path::Path;

use image::{Rgba, RgbaImage};
use redline_core::{Config, Exporter, SetId, SourceFile, StagingEngine, Tolerance};

fn write_png(path: &Path, width: u32, height: u32, color: [u8; 4]) {
    RgbaImage::from_pixel(width, height, Rgba(color))
        .save(path)
        .unwrap();
}

fn sources(dir: &Path) -> Vec<SourceFile> {
    let discovery = redline_core::FileDiscovery::new(Config::default().processing);
    discovery.discover(dir)
}

#[tokio::test]
async fn full_run_produces_exported_diffs() {
    let root = tempfile::tempdir().unwrap();
    let set1 = root.path().join("before");
    let set2 = root.path().join("after");
    let out = root.path().join("diffs");
    std::fs::create_dir_all(&set1).unwrap();
    std::fs::create_dir_all(&set2).unwrap();

    write_png(&set1.join("cat.png"), 4, 4, [10, 10, 10, 255]);
    write_png(&set1.join("dog.png"), 4, 4, [10, 10, 10, 255]);
    write_png(&set2.join("cat.png"), 4, 4, [200, 10, 10, 255]);
    write_png(&set2.join("dog.png"), 4, 4, [10, 10, 10, 255]);

    let mut engine = StagingEngine::new(&Config::default());
    engine.select(SetId::One, sources(&set1));
    engine.select(SetId::Two, sources(&set2));
    engine.settle().await;

    // Both names pair; completion order decides which comes first.
    assert_eq!(engine.results().len(), 2);
    let mut titles: Vec<_> = engine.results().iter().map(|r| r.title.clone()).collect();
    titles.sort();
    assert_eq!(titles, vec!["cat.png", "dog.png"]);

    let exporter = Exporter::new(&out);
    assert!(Exporter::bulk_available(engine.results()));
    let paths = exporter.export_all(engine.results()).unwrap();
    assert_eq!(paths.len(), 2);
    for path in &paths {
        let bytes = std::fs::read(path).unwrap();
        assert_eq!(&bytes[..4], b"\x89PNG");
    }

    // cat differs in red channel by 190: its diff is all highlight.
    let cat = engine
        .results()
        .iter()
        .find(|r| r.title == "cat.png")
        .unwrap();
    assert!(cat.pixels.chunks(4).all(|px| px == [255, 0, 0, 255]));

    // dog is identical on both sides: untouched base pixels.
    let dog = engine
        .results()
        .iter()
        .find(|r| r.title == "dog.png")
        .unwrap();
    assert!(dog.pixels.chunks(4).all(|px| px == [10, 10, 10, 255]));
}

#[tokio::test]
async fn lone_file_stays_unmatched_without_error() {
    let root = tempfile::tempdir().unwrap();
    let set1 = root.path().join("before");
    let set2 = root.path().join("after");
    std::fs::create_dir_all(&set1).unwrap();
    std::fs::create_dir_all(&set2).unwrap();

    write_png(&set1.join("cat.png"), 2, 2, [1, 1, 1, 255]);
    write_png(&set1.join("dog.png"), 2, 2, [1, 1, 1, 255]);
    write_png(&set2.join("cat.png"), 2, 2, [1, 1, 1, 255]);

    let mut engine = StagingEngine::new(&Config::default());
    engine.select(SetId::One, sources(&set1));
    engine.select(SetId::Two, sources(&set2));
    engine.settle().await;

    assert_eq!(engine.results().len(), 1);
    assert_eq!(engine.results()[0].title, "cat.png");
    assert_eq!(engine.unmatched(SetId::One), vec!["dog.png".to_string()]);
    // Every record is still Accepted; being unmatched is not an error state.
    assert!(engine
        .records(SetId::One)
        .iter()
        .all(|r| r.status == redline_core::FileStatus::Accepted));
}

#[tokio::test]
async fn emptying_a_selection_clears_results_and_bulk_export() {
    let root = tempfile::tempdir().unwrap();
    let set1 = root.path().join("before");
    let set2 = root.path().join("after");
    std::fs::create_dir_all(&set1).unwrap();
    std::fs::create_dir_all(&set2).unwrap();

    for name in ["x.png", "y.png"] {
        write_png(&set1.join(name), 2, 2, [0, 0, 0, 255]);
        write_png(&set2.join(name), 2, 2, [30, 30, 30, 255]);
    }

    let mut engine = StagingEngine::new(&Config::default());
    engine.select(SetId::One, sources(&set1));
    engine.select(SetId::Two, sources(&set2));
    engine.settle().await;
    assert_eq!(engine.results().len(), 2);
    assert!(Exporter::bulk_available(engine.results()));

    engine.select(SetId::One, Vec::new());
    engine.settle().await;
    assert!(engine.results().is_empty());
    assert!(!Exporter::bulk_available(engine.results()));
}

#[tokio::test]
async fn mismatched_dimensions_use_longer_buffer_as_base() {
    let root = tempfile::tempdir().unwrap();
    let set1 = root.path().join("before");
    let set2 = root.path().join("after");
    std::fs::create_dir_all(&set1).unwrap();
    std::fs::create_dir_all(&set2).unwrap();

    // Set 1 is 2x2, set 2 is 3x3: the diff buffer takes set 2's length
    // while the exported frame keeps set 1's dimensions.
    write_png(&set1.join("pic.png"), 2, 2, [5, 5, 5, 255]);
    write_png(&set2.join("pic.png"), 3, 3, [5, 5, 5, 255]);

    let mut engine = StagingEngine::new(&Config::default());
    engine.select(SetId::One, sources(&set1));
    engine.select(SetId::Two, sources(&set2));
    engine.settle().await;

    let result = &engine.results()[0];
    assert_eq!((result.width, result.height), (2, 2));
    assert_eq!(result.pixels.len(), 3 * 3 * 4);
    // Identical color everywhere within the shared extent: nothing flagged.
    assert!(result.pixels.chunks(4).all(|px| px == [5, 5, 5, 255]));

    let out = root.path().join("diffs");
    let path = Exporter::new(&out).export_one(result).unwrap();
    let reloaded = image::open(&path).unwrap().into_rgba8();
    assert_eq!(reloaded.dimensions(), (2, 2));
}

#[tokio::test]
async fn tolerance_rerun_is_monotonic_on_decoded_pairs() {
    let root = tempfile::tempdir().unwrap();
    let set1 = root.path().join("before");
    let set2 = root.path().join("after");
    std::fs::create_dir_all(&set1).unwrap();
    std::fs::create_dir_all(&set2).unwrap();

    write_png(&set1.join("pic.png"), 4, 4, [100, 100, 100, 255]);
    write_png(&set2.join("pic.png"), 4, 4, [140, 100, 100, 255]);

    let mut engine = StagingEngine::new(&Config::default());
    engine.select(SetId::One, sources(&set1));
    engine.select(SetId::Two, sources(&set2));
    engine.settle().await;

    let flagged = |engine: &StagingEngine| {
        engine.results()[0]
            .pixels
            .chunks(4)
            .filter(|px| *px == [255, 0, 0, 255])
            .count()
    };

    let at_default = flagged(&engine);
    assert_eq!(at_default, 16);

    engine.set_tolerance(Tolerance::from_percent(Some(50.0)));
    let at_fifty = flagged(&engine);
    assert!(at_fifty <= at_default);
    assert_eq!(at_fifty, 0);
}
