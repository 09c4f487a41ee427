//! Test fixtures: three firmware images and one file shared by two of them.

use chrono::NaiveDate;
use firmscope_persistence::types::FirmwareRecord;

/// SHA-256 digest of the FRITZ!Box image.
pub const FRITZ_SHA256: &str = "aa11bb22";

/// SHA-256 digest of the busybox file.
pub const BUSYBOX_SHA256: &str = "cc33dd44";

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid fixture date")
}

/// Returns the seeded records.
pub fn records() -> Vec<FirmwareRecord> {
    vec![
        FirmwareRecord::firmware("fw-netgear", "Netgear", "R7000", "1.0.9")
            .with_device_class("Router")
            .with_file_name("r7000.chk")
            .with_release_date(date(2019, 11, 2)),
        FirmwareRecord::firmware("fw-avm", "AVM", "FRITZ!Box 7490", "7.21")
            .with_device_class("Router")
            .with_file_name("fritz.image")
            .with_release_date(date(2020, 3, 15))
            .with_hash("sha256", FRITZ_SHA256)
            .with_hash("md5", "ee55"),
        FirmwareRecord::firmware("fw-axis", "Axis", "M3045", "5.0")
            .with_device_class("IP Camera")
            .with_file_name("axis.bin")
            .with_release_date(date(2020, 3, 30)),
        FirmwareRecord::file("file-busybox", "busybox", "fw-avm")
            .with_parent("fw-netgear")
            .with_hash("sha256", BUSYBOX_SHA256),
    ]
}
