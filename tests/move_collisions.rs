use std::fs;

use phorg::{Config, NoCapture, run};
use tempfile::tempdir;

mod common;
use common::{capture_events, canonical, snapshot, write_file};

const DAY: (i32, u32, u32) = (2023, 6, 15);

#[test]
fn same_name_same_size_overwrites_and_counts_one_move() {
    let td = tempdir().unwrap();
    let base = canonical(td.path());
    let (src, out) = (base.join("src"), base.join("out"));
    write_file(&out.join("2023/20230615_trip/IMG_1.JPG"), 500, DAY);
    write_file(&src.join("20230615_trip/IMG_1.JPG"), 500, DAY);

    let cfg = Config::new(&src, &out);
    let (stats, lines) = capture_events(|| run(&cfg, &NoCapture).unwrap());

    assert_eq!(stats.files_moved, 1);
    assert_eq!(stats.files_renamed, 0);
    assert!(lines.contains(&format!(
        "OVERWRITE FILE: {} -> {}",
        src.join("20230615_trip/IMG_1.JPG").display(),
        out.join("2023/20230615_trip/IMG_1.JPG").display()
    )));
    assert_eq!(
        snapshot(&out),
        vec!["2023/", "2023/20230615_trip/", "2023/20230615_trip/IMG_1.JPG"]
    );
}

#[test]
fn same_name_different_size_gets_numbered_name() {
    let td = tempdir().unwrap();
    let base = canonical(td.path());
    let (src, out) = (base.join("src"), base.join("out"));
    write_file(&out.join("2023/20230615_trip/IMG_1.JPG"), 400, DAY);
    write_file(&src.join("20230615_trip/IMG_1.JPG"), 500, DAY);

    let cfg = Config::new(&src, &out);
    let (stats, lines) = capture_events(|| run(&cfg, &NoCapture).unwrap());

    assert_eq!(stats.files_moved, 0);
    assert_eq!(stats.files_renamed, 1);
    let dest = out.join("2023/20230615_trip/IMG_1-1.JPG");
    assert!(lines.contains(&format!(
        "RENAME FILE: {} -> {}",
        src.join("20230615_trip/IMG_1.JPG").display(),
        dest.display()
    )));
    assert_eq!(fs::metadata(&dest).unwrap().len(), 500);
    assert_eq!(
        fs::metadata(out.join("2023/20230615_trip/IMG_1.JPG")).unwrap().len(),
        400
    );
}

#[test]
fn two_sources_into_one_label() {
    let td = tempdir().unwrap();
    let base = canonical(td.path());
    let (src, out) = (base.join("src"), base.join("out"));
    // Both directories resolve to the label 20230615_trip.
    write_file(&src.join("2023-06-15_trip/a.jpg"), 100, DAY);
    write_file(&src.join("20230615_trip/a.jpg"), 200, DAY);

    let cfg = Config::new(&src, &out);
    let (stats, _) = capture_events(|| run(&cfg, &NoCapture).unwrap());

    assert_eq!(stats.files_moved, 1);
    assert_eq!(stats.files_renamed, 1);
    let dir = out.join("2023/20230615_trip");
    assert_eq!(fs::metadata(dir.join("a.jpg")).unwrap().len(), 100);
    assert_eq!(fs::metadata(dir.join("a-1.jpg")).unwrap().len(), 200);
}

#[test]
fn identical_twins_collapse_to_one_file() {
    let td = tempdir().unwrap();
    let base = canonical(td.path());
    let (src, out) = (base.join("src"), base.join("out"));
    write_file(&src.join("2023-06-15_trip/a.jpg"), 100, DAY);
    write_file(&src.join("20230615_trip/a.jpg"), 100, DAY);

    let cfg = Config::new(&src, &out);
    let (stats, lines) = capture_events(|| run(&cfg, &NoCapture).unwrap());

    assert_eq!(stats.files_moved, 2);
    assert_eq!(stats.files_renamed, 0);
    assert_eq!(lines.iter().filter(|l| l.starts_with("OVERWRITE FILE:")).count(), 1);
    assert_eq!(
        snapshot(&out),
        vec!["2023/", "2023/20230615_trip/", "2023/20230615_trip/a.jpg"]
    );
    assert!(!src.exists());
}
