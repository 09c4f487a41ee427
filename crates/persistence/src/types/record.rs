//! Stored firmware and file records.

use std::borrow::Cow;
use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::query::Field;

/// Whether a record is a top-level firmware image or a file unpacked from one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// A firmware image uploaded for analysis.
    #[default]
    Firmware,
    /// A file extracted from one or more firmware images.
    File,
}

/// A firmware image or included file together with the attributes the
/// search front can filter on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FirmwareRecord {
    /// Unique identifier.
    pub uid: String,

    /// Firmware image or included file.
    #[serde(default)]
    pub kind: RecordKind,

    /// File name of the binary.
    #[serde(default)]
    pub file_name: String,

    /// Device class, e.g. "Router".
    #[serde(default)]
    pub device_class: String,

    /// Device name.
    #[serde(default)]
    pub device_name: String,

    /// Vendor name.
    #[serde(default)]
    pub vendor: String,

    /// Firmware version.
    #[serde(default)]
    pub version: String,

    /// Release date of the firmware.
    #[serde(default)]
    pub release_date: Option<NaiveDate>,

    /// Digests keyed by algorithm name.
    #[serde(default)]
    pub hashes: BTreeMap<String, String>,

    /// For files: the firmware images the file was found in.
    #[serde(default)]
    pub parent_firmware_uids: Vec<String>,

    /// Free-form tags shown next to the record in result lists.
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

impl FirmwareRecord {
    /// Creates a firmware record.
    pub fn firmware(
        uid: impl Into<String>,
        vendor: impl Into<String>,
        device_name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            uid: uid.into(),
            kind: RecordKind::Firmware,
            file_name: String::new(),
            device_class: String::new(),
            device_name: device_name.into(),
            vendor: vendor.into(),
            version: version.into(),
            release_date: None,
            hashes: BTreeMap::new(),
            parent_firmware_uids: Vec::new(),
            tags: BTreeMap::new(),
        }
    }

    /// Creates a file record found inside the given firmware.
    pub fn file(
        uid: impl Into<String>,
        file_name: impl Into<String>,
        parent_firmware_uid: impl Into<String>,
    ) -> Self {
        Self {
            uid: uid.into(),
            kind: RecordKind::File,
            file_name: file_name.into(),
            device_class: String::new(),
            device_name: String::new(),
            vendor: String::new(),
            version: String::new(),
            release_date: None,
            hashes: BTreeMap::new(),
            parent_firmware_uids: vec![parent_firmware_uid.into()],
            tags: BTreeMap::new(),
        }
    }

    /// Sets the file name.
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    /// Sets the device class.
    pub fn with_device_class(mut self, device_class: impl Into<String>) -> Self {
        self.device_class = device_class.into();
        self
    }

    /// Sets the release date.
    pub fn with_release_date(mut self, release_date: NaiveDate) -> Self {
        self.release_date = Some(release_date);
        self
    }

    /// Adds a digest.
    pub fn with_hash(mut self, algorithm: impl Into<String>, digest: impl Into<String>) -> Self {
        self.hashes.insert(algorithm.into(), digest.into());
        self
    }

    /// Adds a tag.
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Adds another firmware the file was found in.
    pub fn with_parent(mut self, firmware_uid: impl Into<String>) -> Self {
        self.parent_firmware_uids.push(firmware_uid.into());
        self
    }

    /// Returns `true` for top-level firmware images.
    pub fn is_firmware(&self) -> bool {
        self.kind == RecordKind::Firmware
    }

    /// Returns the label shown in result lists.
    ///
    /// Firmware images are labelled `"<vendor> <device_name> - <version>"`,
    /// files by their file name.
    pub fn label(&self) -> String {
        match self.kind {
            RecordKind::Firmware => {
                format!("{} {} - {}", self.vendor, self.device_name, self.version)
            }
            RecordKind::File => self.file_name.clone(),
        }
    }

    /// Returns the textual value of a field, if the record has one.
    pub fn field_value(&self, field: &Field) -> Option<Cow<'_, str>> {
        let text = match field {
            Field::DeviceClass => &self.device_class,
            Field::DeviceName => &self.device_name,
            Field::Vendor => &self.vendor,
            Field::Version => &self.version,
            Field::FileName => &self.file_name,
            Field::ReleaseDate => {
                return self
                    .release_date
                    .map(|date| Cow::Owned(date.format("%Y-%m-%d").to_string()));
            }
            Field::Hash(algorithm) => return self.hashes.get(algorithm).map(|d| Cow::Borrowed(d.as_str())),
        };
        if text.is_empty() {
            None
        } else {
            Some(Cow::Borrowed(text.as_str()))
        }
    }
}

/// A result row: `(uid, label, tags)`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MetaEntry {
    /// Record identifier.
    pub uid: String,
    /// Display label.
    pub label: String,
    /// Tags shown next to the label.
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

impl MetaEntry {
    /// Creates an entry without tags.
    pub fn new(uid: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            label: label.into(),
            tags: BTreeMap::new(),
        }
    }

    /// Adds a tag.
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }
}

impl From<&FirmwareRecord> for MetaEntry {
    fn from(record: &FirmwareRecord) -> Self {
        Self {
            uid: record.uid.clone(),
            label: record.label(),
            tags: record.tags.clone(),
        }
    }
}
