// tests/common/mod.rs
// Minimal TDMS writer used to build log fixtures for the integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

const TOC_META_DATA: u32 = 1 << 1;
const TOC_NEW_OBJ_LIST: u32 = 1 << 2;
const TOC_RAW_DATA: u32 = 1 << 3;
const TOC_INTERLEAVED_DATA: u32 = 1 << 5;
const TOC_BIG_ENDIAN: u32 = 1 << 6;

const TYPE_F64: u32 = 0x0A;
const TYPE_STRING: u32 = 0x20;

/// How an object's raw data index is written in a segment's metadata.
#[derive(Debug, Clone, Copy)]
pub enum Index {
    /// Full index for a double channel with this many values per chunk.
    F64(u64),
    /// Reuse the index from the previous segment.
    Same,
    /// Object has no raw data.
    NoData,
}

#[derive(Debug, Clone)]
pub struct Object {
    pub path: String,
    pub index: Index,
    pub properties: Vec<(String, String)>,
}

impl Object {
    pub fn root() -> Self {
        Self {
            path: "/".to_string(),
            index: Index::NoData,
            properties: Vec::new(),
        }
    }

    pub fn group(name: &str) -> Self {
        Self {
            path: format!("/'{}'", name),
            index: Index::NoData,
            properties: Vec::new(),
        }
    }

    pub fn channel(group: &str, name: &str, index: Index) -> Self {
        Self {
            path: format!("/'{}'/'{}'", group, name),
            index,
            properties: Vec::new(),
        }
    }

    pub fn with_property(mut self, name: &str, value: &str) -> Self {
        self.properties.push((name.to_string(), value.to_string()));
        self
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SegmentOptions {
    pub big_endian: bool,
    pub interleaved: bool,
    pub new_object_list: bool,
}

#[derive(Default)]
pub struct TdmsWriter {
    bytes: Vec<u8>,
}

struct Buf {
    bytes: Vec<u8>,
    big_endian: bool,
}

impl Buf {
    fn u32(&mut self, v: u32) {
        if self.big_endian {
            self.bytes.extend_from_slice(&v.to_be_bytes());
        } else {
            self.bytes.extend_from_slice(&v.to_le_bytes());
        }
    }

    fn u64(&mut self, v: u64) {
        if self.big_endian {
            self.bytes.extend_from_slice(&v.to_be_bytes());
        } else {
            self.bytes.extend_from_slice(&v.to_le_bytes());
        }
    }

    fn f64(&mut self, v: f64) {
        if self.big_endian {
            self.bytes.extend_from_slice(&v.to_be_bytes());
        } else {
            self.bytes.extend_from_slice(&v.to_le_bytes());
        }
    }

    fn string(&mut self, s: &str) {
        self.u32(s.len() as u32);
        self.bytes.extend_from_slice(s.as_bytes());
    }
}

impl TdmsWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one segment. `objects` may be empty to reuse the previous object list;
    /// `columns` hold the raw values of the active channels, in object-list order.
    pub fn segment(&mut self, options: SegmentOptions, objects: &[Object], columns: &[Vec<f64>]) -> &mut Self {
        let big_endian = options.big_endian;
        let mut meta = Buf {
            bytes: Vec::new(),
            big_endian,
        };
        if !objects.is_empty() {
            meta.u32(objects.len() as u32);
            for object in objects {
                meta.string(&object.path);
                match object.index {
                    Index::NoData => meta.u32(0xFFFF_FFFF),
                    Index::Same => meta.u32(0),
                    Index::F64(values) => {
                        meta.u32(20);
                        meta.u32(TYPE_F64);
                        meta.u32(1);
                        meta.u64(values);
                    }
                }
                meta.u32(object.properties.len() as u32);
                for (name, value) in &object.properties {
                    meta.string(name);
                    meta.u32(TYPE_STRING);
                    meta.string(value);
                }
            }
        }

        let mut raw = Buf {
            bytes: Vec::new(),
            big_endian,
        };
        if options.interleaved {
            let rows = columns.first().map_or(0, Vec::len);
            for row in 0..rows {
                for column in columns {
                    raw.f64(column[row]);
                }
            }
        } else {
            for column in columns {
                for &value in column {
                    raw.f64(value);
                }
            }
        }

        let mut toc = 0;
        if !objects.is_empty() {
            toc |= TOC_META_DATA;
        }
        if options.new_object_list {
            toc |= TOC_NEW_OBJ_LIST;
        }
        if !raw.bytes.is_empty() {
            toc |= TOC_RAW_DATA;
        }
        if options.interleaved {
            toc |= TOC_INTERLEAVED_DATA;
        }
        if big_endian {
            toc |= TOC_BIG_ENDIAN;
        }

        // The tag and table of contents are little-endian in every segment.
        self.bytes.extend_from_slice(b"TDSm");
        self.bytes.extend_from_slice(&toc.to_le_bytes());
        let mut lead_in = Buf {
            bytes: Vec::new(),
            big_endian,
        };
        lead_in.u32(4713);
        lead_in.u64((meta.bytes.len() + raw.bytes.len()) as u64);
        lead_in.u64(meta.bytes.len() as u64);
        self.bytes.extend(lead_in.bytes);
        self.bytes.extend(meta.bytes);
        self.bytes.extend(raw.bytes);
        self
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Writes the file to a fresh path in the system temp directory.
    pub fn write_temp(&self, name: &str) -> PathBuf {
        let path = temp_path(name);
        fs::write(&path, &self.bytes).expect("write TDMS fixture");
        path
    }
}

/// Unique per test process so parallel test binaries do not collide.
pub fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("bridge_beam_render_{}_{}", std::process::id(), name))
}

/// Channel objects `{side}-INC-BU{1..4}-01` with a full index of `values` per chunk.
pub fn beam_objects(side: &str, values: u64) -> Vec<Object> {
    (1..=4)
        .map(|i| Object::channel("Log", &format!("{}-INC-BU{}-01", side, i), Index::F64(values)))
        .collect()
}

/// One contiguous little-endian segment holding the four beam channels of `side`.
pub fn single_segment_log(side: &str, columns: &[Vec<f64>; 4]) -> TdmsWriter {
    let mut objects = vec![Object::root(), Object::group("Log")];
    objects.extend(beam_objects(side, columns[0].len() as u64));
    let mut writer = TdmsWriter::new();
    writer.segment(
        SegmentOptions {
            new_object_list: true,
            ..Default::default()
        },
        &objects,
        columns,
    );
    writer
}
