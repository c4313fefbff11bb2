use std::fs;
use std::path::Path;

use chrono::NaiveDateTime;
use phorg::{CaptureTimestamp, Config, NoCapture, run};
use tempfile::tempdir;

mod common;
use common::{capture_events, canonical, snapshot, write_file};

struct FixedCapture(NaiveDateTime);

impl CaptureTimestamp for FixedCapture {
    fn read_capture_timestamp(&self, _path: &Path) -> Option<NaiveDateTime> {
        Some(self.0)
    }
}

/// `YYYY-MM-DD` folder dates are compacted, so `DCIM-2023-06-15_trip`
/// lands in `2023/20230615_trip`.
#[test]
fn dashed_dcim_folder_is_filed_under_compact_label_and_cleaned_up() {
    let td = tempdir().unwrap();
    let base = canonical(td.path());
    let (src, out) = (base.join("src"), base.join("out"));
    let trip = src.join("DCIM-2023-06-15_trip");
    write_file(&trip.join("IMG_0001.JPG"), 500, (2023, 6, 15));
    write_file(&trip.join("Thumbs.db"), 20, (2023, 6, 15));

    let cfg = Config::new(&src, &out);
    let (stats, lines) = capture_events(|| run(&cfg, &NoCapture).unwrap());

    let label_dir = out.join("2023").join("20230615_trip");
    let expected = vec![
        format!("CREATE DIR: {}", out.display()),
        format!("CREATE DIR: {}", label_dir.display()),
        format!(
            "MOVE FILE: {} -> {}",
            trip.join("IMG_0001.JPG").display(),
            label_dir.join("IMG_0001.JPG").display()
        ),
        format!("DELETE FILE: {}", trip.join("Thumbs.db").display()),
        format!("DELETE DIR: {}", trip.display()),
        format!("DELETE DIR: {}", src.display()),
    ];
    assert_eq!(lines, expected);

    assert_eq!(stats.files_moved, 1);
    assert_eq!(stats.files_deleted, 1);
    assert_eq!(stats.dirs_processed, 2);
    assert_eq!(stats.dirs_deleted, 2);
    assert_eq!(fs::metadata(label_dir.join("IMG_0001.JPG")).unwrap().len(), 500);
    assert!(!src.exists());
}

#[test]
fn meaningless_names_are_replaced_from_capture_time() {
    let td = tempdir().unwrap();
    let base = canonical(td.path());
    let (src, out) = (base.join("src"), base.join("out"));
    write_file(&src.join("phone/-99999999999999999999"), 10, (2024, 1, 1));

    let stamp = NaiveDateTime::parse_from_str("2021-01-02 03:04:05", "%Y-%m-%d %H:%M:%S").unwrap();
    let cfg = Config::new(&src, &out);
    let (stats, _) = capture_events(|| run(&cfg, &FixedCapture(stamp)).unwrap());

    assert_eq!(stats.files_renamed, 1);
    assert!(out.join("2021/20210102/img-20210102-030405").exists());
}

#[test]
fn date_filter_skips_old_media_but_moves_other_files() {
    let td = tempdir().unwrap();
    let base = canonical(td.path());
    let (src, out) = (base.join("src"), base.join("out"));
    write_file(&src.join("old/a.jpg"), 1, (2015, 5, 5));
    write_file(&src.join("old/notes.txt"), 1, (2015, 5, 5));
    write_file(&src.join("new/b.jpg"), 1, (2022, 5, 5));

    let mut cfg = Config::new(&src, &out);
    cfg.filter_date = chrono::NaiveDate::from_ymd_opt(2020, 1, 1);
    let (stats, lines) = capture_events(|| run(&cfg, &NoCapture).unwrap());

    assert_eq!(stats.files_skipped, 1);
    assert_eq!(stats.files_moved, 2);
    assert!(lines.contains(&format!(
        "SKIP FILE (date filter): {}",
        src.join("old/a.jpg").display()
    )));
    assert!(src.join("old/a.jpg").exists());
    assert_eq!(
        snapshot(&out),
        vec![
            "2015/",
            "2015/20150505/",
            "2015/20150505/notes.txt",
            "2022/",
            "2022/20220505/",
            "2022/20220505/b.jpg",
        ]
    );
}

#[test]
fn ignored_directory_is_reported_once() {
    let td = tempdir().unwrap();
    let base = canonical(td.path());
    let (src, out) = (base.join("src"), base.join("out"));
    write_file(&src.join("@eaDir/SYNOFILE_THUMB.jpg"), 1, (2020, 1, 1));
    write_file(&src.join("20200101/a.jpg"), 1, (2020, 1, 1));

    let mut cfg = Config::new(&src, &out);
    cfg.ignore = vec!["@eaDir".into()];
    let (stats, lines) = capture_events(|| run(&cfg, &NoCapture).unwrap());

    assert_eq!(stats.dirs_skipped, 1);
    assert_eq!(
        lines.iter().filter(|l| l.starts_with("SKIP DIR:")).collect::<Vec<_>>(),
        vec![&format!("SKIP DIR: {}", src.join("@eaDir").display())]
    );
    assert!(src.join("@eaDir/SYNOFILE_THUMB.jpg").exists());
}

#[cfg(unix)]
#[test]
fn symlinks_are_left_alone() {
    let td = tempdir().unwrap();
    let base = canonical(td.path());
    let (src, out) = (base.join("src"), base.join("out"));
    write_file(&base.join("elsewhere/real.jpg"), 3, (2020, 1, 1));
    write_file(&src.join("pics/a.jpg"), 3, (2020, 1, 1));
    std::os::unix::fs::symlink(base.join("elsewhere/real.jpg"), src.join("pics/link.jpg")).unwrap();
    std::os::unix::fs::symlink(base.join("elsewhere"), src.join("linked_dir")).unwrap();

    let cfg = Config::new(&src, &out);
    let (stats, _) = capture_events(|| run(&cfg, &NoCapture).unwrap());

    assert_eq!(stats.files_moved, 1);
    assert!(fs::symlink_metadata(src.join("pics/link.jpg")).unwrap().file_type().is_symlink());
    assert!(base.join("elsewhere/real.jpg").exists());
}
