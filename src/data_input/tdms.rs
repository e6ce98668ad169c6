// src/data_input/tdms.rs

//! Reader for NI TDMS containers.
//!
//! A TDMS file is a sequence of segments. Each segment starts with a 28 byte lead-in,
//! optionally followed by metadata (object paths, raw data indices, properties) and a
//! block of raw channel data. Object lists and raw data indices carry over from one
//! segment to the next unless the segment says otherwise, so the decoder keeps that
//! state while walking the file.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::{debug, warn};

use crate::error::BridgeError;
use crate::types::BridgeResult;

const LEAD_IN_TAG: &[u8; 4] = b"TDSm";
const LEAD_IN_LEN: usize = 28;

// Table of contents flags
const TOC_META_DATA: u32 = 1 << 1;
const TOC_NEW_OBJ_LIST: u32 = 1 << 2;
const TOC_RAW_DATA: u32 = 1 << 3;
const TOC_INTERLEAVED_DATA: u32 = 1 << 5;
const TOC_BIG_ENDIAN: u32 = 1 << 6;
const TOC_DAQMX_RAW_DATA: u32 = 1 << 7;

// Raw data index markers
const NO_RAW_DATA: u32 = 0xFFFF_FFFF;
const SAME_RAW_INDEX: u32 = 0x0000_0000;
const DAQMX_FORMAT_CHANGING_SCALER: u32 = 0x6912_0000;
const DAQMX_DIGITAL_LINE_SCALER: u32 = 0x6913_0000;

const INCOMPLETE_SEGMENT: u64 = 0xFFFF_FFFF_FFFF_FFFF;
const TIMESTAMP_FRACTION_SCALE: f64 = 18_446_744_073_709_551_616.0; // 2^64

/// Channel element types this reader can decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    String,
    Bool,
    Timestamp,
}

impl DataType {
    pub fn from_code(code: u32) -> Option<Self> {
        let data_type = match code {
            0x01 => Self::I8,
            0x02 => Self::I16,
            0x03 => Self::I32,
            0x04 => Self::I64,
            0x05 => Self::U8,
            0x06 => Self::U16,
            0x07 => Self::U32,
            0x08 => Self::U64,
            0x09 | 0x19 => Self::F32, // 0x19: single float with unit
            0x0A | 0x1A => Self::F64, // 0x1A: double float with unit
            0x20 => Self::String,
            0x21 => Self::Bool,
            0x44 => Self::Timestamp,
            _ => return None,
        };
        Some(data_type)
    }

    /// Size of one element in raw data, `None` for variable-length strings.
    pub fn size(self) -> Option<usize> {
        match self {
            Self::I8 | Self::U8 | Self::Bool => Some(1),
            Self::I16 | Self::U16 => Some(2),
            Self::I32 | Self::U32 | Self::F32 => Some(4),
            Self::I64 | Self::U64 | Self::F64 => Some(8),
            Self::Timestamp => Some(16),
            Self::String => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
    Bool(bool),
    Timestamp { seconds: i64, fractions: u64 },
}

/// Parsed form of a TDMS object path such as `/'Log'/'AMR-INC-BU1-01'`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectPath {
    pub group: Option<String>,
    pub channel: Option<String>,
}

impl ObjectPath {
    pub fn parse(raw: &str) -> Option<Self> {
        if raw == "/" {
            return Some(Self {
                group: None,
                channel: None,
            });
        }

        let mut parts: Vec<String> = Vec::new();
        let mut chars = raw.chars().peekable();
        while let Some(separator) = chars.next() {
            if separator != '/' || chars.next() != Some('\'') {
                return None;
            }
            let mut name = String::new();
            loop {
                match chars.next() {
                    // A doubled quote is an escaped quote inside the name.
                    Some('\'') if chars.peek() == Some(&'\'') => {
                        chars.next();
                        name.push('\'');
                    }
                    Some('\'') => break,
                    Some(c) => name.push(c),
                    None => return None,
                }
            }
            parts.push(name);
        }

        let mut parts = parts.into_iter();
        match (parts.next(), parts.next(), parts.next()) {
            (Some(group), channel, None) => Some(Self {
                group: Some(group),
                channel,
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TdmsChannel {
    name: String,
    data_type: Option<DataType>,
    properties: Vec<(String, PropertyValue)>,
    data: Vec<f64>,
}

impl TdmsChannel {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data_type(&self) -> Option<DataType> {
        self.data_type
    }

    /// All samples of the channel, converted to `f64`.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }
}

#[derive(Debug, Clone)]
pub struct TdmsGroup {
    name: String,
    channels: Vec<TdmsChannel>,
}

impl TdmsGroup {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn channel(&self, name: &str) -> Option<&TdmsChannel> {
        self.channels.iter().find(|c| c.name == name)
    }

    pub fn channels(&self) -> &[TdmsChannel] {
        &self.channels
    }
}

/// Fully decoded TDMS file. All channel data is held in memory.
/// Only channel-level properties are kept.
#[derive(Debug, Clone, Default)]
pub struct TdmsFile {
    groups: Vec<TdmsGroup>,
}

impl TdmsFile {
    /// Reads and decodes the whole file. The file handle is released before decoding starts.
    pub fn open(path: impl AsRef<Path>) -> BridgeResult<Self> {
        let path = path.as_ref();
        let bytes = {
            let file = File::open(path)?;
            let mut reader = BufReader::new(file);
            let mut bytes = Vec::new();
            reader.read_to_end(&mut bytes)?;
            bytes
        }; // File handle is dropped here
        debug!("Read {} bytes from '{}'", bytes.len(), path.display());
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> BridgeResult<Self> {
        if bytes.is_empty() {
            return Err(BridgeError::malformed(0, "empty file"));
        }
        let mut decoder = Decoder::default();
        let mut offset = 0;
        let mut segment_count = 0;
        while offset < bytes.len() {
            offset = decoder.read_segment(bytes, offset)?;
            segment_count += 1;
        }
        debug!("Decoded {} TDMS segments", segment_count);
        Ok(decoder.finish())
    }

    pub fn group(&self, name: &str) -> Option<&TdmsGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn groups(&self) -> &[TdmsGroup] {
        &self.groups
    }
}

#[derive(Debug, Clone, Copy)]
enum Endian {
    Little,
    Big,
}

macro_rules! read_number {
    ($name:ident, $ty:ty) => {
        fn $name(&mut self) -> BridgeResult<$ty> {
            let bytes = self.array::<{ std::mem::size_of::<$ty>() }>()?;
            Ok(match self.endian {
                Endian::Little => <$ty>::from_le_bytes(bytes),
                Endian::Big => <$ty>::from_be_bytes(bytes),
            })
        }
    };
}

/// Bounds-checked reader over one region of the file. `base` is the file offset of
/// `bytes[0]` and is only used for error messages.
struct Cursor<'a> {
    bytes: &'a [u8],
    base: usize,
    pos: usize,
    endian: Endian,
}

impl<'a> Cursor<'a> {
    fn new(bytes: &'a [u8], base: usize, endian: Endian) -> Self {
        Self {
            bytes,
            base,
            pos: 0,
            endian,
        }
    }

    fn offset(&self) -> usize {
        self.base + self.pos
    }

    fn take(&mut self, len: usize) -> BridgeResult<&'a [u8]> {
        let remaining = self.bytes.len() - self.pos;
        if len > remaining {
            return Err(BridgeError::malformed(
                self.offset(),
                format!("needed {} bytes but only {} remain", len, remaining),
            ));
        }
        let slice = &self.bytes[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self) -> BridgeResult<[u8; N]> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.take(N)?);
        Ok(buf)
    }

    read_number!(i8, i8);
    read_number!(i16, i16);
    read_number!(i32, i32);
    read_number!(i64, i64);
    read_number!(u8, u8);
    read_number!(u16, u16);
    read_number!(u32, u32);
    read_number!(u64, u64);
    read_number!(f32, f32);
    read_number!(f64, f64);

    fn usize_from_u64(&mut self) -> BridgeResult<usize> {
        let offset = self.offset();
        let value = self.u64()?;
        usize::try_from(value)
            .map_err(|_| BridgeError::malformed(offset, format!("length {} does not fit in memory", value)))
    }

    fn string(&mut self) -> BridgeResult<String> {
        let offset = self.offset();
        let len = self.u32()? as usize;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|_| BridgeError::malformed(offset, "string is not valid UTF-8"))
    }

    fn timestamp(&mut self) -> BridgeResult<(i64, u64)> {
        match self.endian {
            Endian::Little => {
                let fractions = self.u64()?;
                let seconds = self.i64()?;
                Ok((seconds, fractions))
            }
            Endian::Big => {
                let seconds = self.i64()?;
                let fractions = self.u64()?;
                Ok((seconds, fractions))
            }
        }
    }

    fn sample(&mut self, data_type: DataType) -> BridgeResult<f64> {
        let value = match data_type {
            DataType::I8 => self.i8()? as f64,
            DataType::I16 => self.i16()? as f64,
            DataType::I32 => self.i32()? as f64,
            DataType::I64 => self.i64()? as f64,
            DataType::U8 => self.u8()? as f64,
            DataType::U16 => self.u16()? as f64,
            DataType::U32 => self.u32()? as f64,
            DataType::U64 => self.u64()? as f64,
            DataType::F32 => self.f32()? as f64,
            DataType::F64 => self.f64()?,
            DataType::Bool => f64::from(u8::from(self.u8()? != 0)),
            DataType::Timestamp => {
                let (seconds, fractions) = self.timestamp()?;
                seconds as f64 + fractions as f64 / TIMESTAMP_FRACTION_SCALE
            }
            DataType::String => {
                return Err(BridgeError::malformed(
                    self.offset(),
                    "string samples cannot be read as numbers",
                ))
            }
        };
        Ok(value)
    }

    fn property(&mut self) -> BridgeResult<PropertyValue> {
        let offset = self.offset();
        let code = self.u32()?;
        let data_type = DataType::from_code(code).ok_or_else(|| {
            BridgeError::malformed(offset, format!("unsupported property type 0x{:X}", code))
        })?;
        let value = match data_type {
            DataType::I8 => PropertyValue::Int(self.i8()?.into()),
            DataType::I16 => PropertyValue::Int(self.i16()?.into()),
            DataType::I32 => PropertyValue::Int(self.i32()?.into()),
            DataType::I64 => PropertyValue::Int(self.i64()?),
            DataType::U8 => PropertyValue::UInt(self.u8()?.into()),
            DataType::U16 => PropertyValue::UInt(self.u16()?.into()),
            DataType::U32 => PropertyValue::UInt(self.u32()?.into()),
            DataType::U64 => PropertyValue::UInt(self.u64()?),
            DataType::F32 => PropertyValue::Float(self.f32()?.into()),
            DataType::F64 => PropertyValue::Float(self.f64()?),
            DataType::String => PropertyValue::Text(self.string()?),
            DataType::Bool => PropertyValue::Bool(self.u8()? != 0),
            DataType::Timestamp => {
                let (seconds, fractions) = self.timestamp()?;
                PropertyValue::Timestamp { seconds, fractions }
            }
        };
        Ok(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RawIndex {
    data_type: DataType,
    values_per_chunk: usize,
    string_bytes: usize,
}

impl RawIndex {
    fn chunk_bytes(&self, offset: usize) -> BridgeResult<usize> {
        match self.data_type.size() {
            Some(size) => size.checked_mul(self.values_per_chunk).ok_or_else(|| {
                BridgeError::malformed(
                    offset,
                    format!("raw chunk of {} values overflows", self.values_per_chunk),
                )
            }),
            None => Ok(self.string_bytes),
        }
    }
}

struct DecodedObject {
    path: ObjectPath,
    data_type: Option<DataType>,
    properties: Vec<(String, PropertyValue)>,
    data: Vec<f64>,
}

#[derive(Default)]
struct Decoder {
    objects: Vec<DecodedObject>,
    lookup: HashMap<String, usize>,
    last_index: HashMap<usize, RawIndex>,
    // Object list of the current segment, in raw data order.
    active: Vec<(usize, Option<RawIndex>)>,
}

impl Decoder {
    /// Decodes one segment starting at `start` and returns the offset of the next one.
    fn read_segment(&mut self, bytes: &[u8], start: usize) -> BridgeResult<usize> {
        if bytes.len() - start < LEAD_IN_LEN {
            return Err(BridgeError::malformed(start, "truncated segment lead-in"));
        }
        let mut lead_in = Cursor::new(&bytes[start..start + LEAD_IN_LEN], start, Endian::Little);
        if lead_in.take(4)? != LEAD_IN_TAG {
            return Err(BridgeError::malformed(start, "missing TDSm segment tag"));
        }
        // The table of contents is always little-endian; it decides the rest.
        let toc = lead_in.u32()?;
        if toc & TOC_BIG_ENDIAN != 0 {
            lead_in.endian = Endian::Big;
        }
        let endian = lead_in.endian;
        let version = lead_in.u32()?;
        let next_segment_offset = lead_in.u64()?;
        let raw_data_offset = lead_in.u64()?;

        let data_start = start + LEAD_IN_LEN;
        let segment_end = if next_segment_offset == INCOMPLETE_SEGMENT {
            bytes.len()
        } else {
            match usize::try_from(next_segment_offset)
                .ok()
                .and_then(|len| data_start.checked_add(len))
            {
                Some(end) if end <= bytes.len() => end,
                _ => {
                    warn!(
                        "Segment at byte {} claims to extend past the end of the file; reading what is there",
                        start
                    );
                    bytes.len()
                }
            }
        };
        let raw_start = usize::try_from(raw_data_offset)
            .ok()
            .and_then(|len| data_start.checked_add(len))
            .filter(|&raw_start| raw_start <= segment_end)
            .ok_or_else(|| BridgeError::malformed(start, "raw data offset points past the segment"))?;

        debug!(
            "Segment at byte {}: toc=0x{:X} version={} raw data at {}..{}",
            start, toc, version, raw_start, segment_end
        );

        if toc & TOC_DAQMX_RAW_DATA != 0 {
            return Err(BridgeError::malformed(start, "DAQmx raw data is not supported"));
        }
        if toc & TOC_NEW_OBJ_LIST != 0 {
            self.active.clear();
        }
        if toc & TOC_META_DATA != 0 {
            let mut meta = Cursor::new(&bytes[data_start..raw_start], data_start, endian);
            self.read_metadata(&mut meta)?;
        }
        if toc & TOC_RAW_DATA != 0 {
            let mut raw = Cursor::new(&bytes[raw_start..segment_end], raw_start, endian);
            self.read_raw_data(&mut raw, toc & TOC_INTERLEAVED_DATA != 0)?;
        }
        Ok(segment_end)
    }

    fn object_id(&mut self, raw_path: &str, offset: usize) -> BridgeResult<usize> {
        if let Some(&id) = self.lookup.get(raw_path) {
            return Ok(id);
        }
        let path = ObjectPath::parse(raw_path)
            .ok_or_else(|| BridgeError::malformed(offset, format!("invalid object path {:?}", raw_path)))?;
        let id = self.objects.len();
        self.objects.push(DecodedObject {
            path,
            data_type: None,
            properties: Vec::new(),
            data: Vec::new(),
        });
        self.lookup.insert(raw_path.to_string(), id);
        Ok(id)
    }

    fn read_metadata(&mut self, cursor: &mut Cursor) -> BridgeResult<()> {
        let object_count = cursor.u32()?;
        for _ in 0..object_count {
            let path_offset = cursor.offset();
            let raw_path = cursor.string()?;
            let id = self.object_id(&raw_path, path_offset)?;

            let index_offset = cursor.offset();
            let index = match cursor.u32()? {
                NO_RAW_DATA => None,
                SAME_RAW_INDEX => Some(*self.last_index.get(&id).ok_or_else(|| {
                    BridgeError::malformed(
                        index_offset,
                        format!("object {} reuses a raw data index it never had", raw_path),
                    )
                })?),
                DAQMX_FORMAT_CHANGING_SCALER | DAQMX_DIGITAL_LINE_SCALER => {
                    return Err(BridgeError::malformed(index_offset, "DAQmx raw data is not supported"));
                }
                _ => Some(Self::read_raw_index(cursor)?),
            };

            if let Some(index) = index {
                let object = &mut self.objects[id];
                match object.data_type {
                    Some(existing) if existing != index.data_type => {
                        return Err(BridgeError::malformed(
                            index_offset,
                            format!("object {} changed data type between segments", raw_path),
                        ));
                    }
                    _ => object.data_type = Some(index.data_type),
                }
                self.last_index.insert(id, index);
            }
            match self.active.iter_mut().find(|(active_id, _)| *active_id == id) {
                Some(entry) => entry.1 = index,
                None => self.active.push((id, index)),
            }

            let property_count = cursor.u32()?;
            for _ in 0..property_count {
                let name = cursor.string()?;
                let value = cursor.property()?;
                let properties = &mut self.objects[id].properties;
                match properties.iter_mut().find(|(key, _)| *key == name) {
                    Some(existing) => existing.1 = value,
                    None => properties.push((name, value)),
                }
            }
        }
        Ok(())
    }

    fn read_raw_index(cursor: &mut Cursor) -> BridgeResult<RawIndex> {
        let offset = cursor.offset();
        let code = cursor.u32()?;
        let data_type = DataType::from_code(code).ok_or_else(|| {
            BridgeError::malformed(offset, format!("unsupported channel data type 0x{:X}", code))
        })?;
        let dimension = cursor.u32()?;
        if dimension != 1 {
            return Err(BridgeError::malformed(
                offset,
                format!("array dimension must be 1, found {}", dimension),
            ));
        }
        let values_per_chunk = cursor.usize_from_u64()?;
        let string_bytes = if data_type == DataType::String {
            cursor.usize_from_u64()?
        } else {
            0
        };
        Ok(RawIndex {
            data_type,
            values_per_chunk,
            string_bytes,
        })
    }

    fn read_raw_data(&mut self, cursor: &mut Cursor, interleaved: bool) -> BridgeResult<()> {
        let channels: Vec<(usize, RawIndex)> = self
            .active
            .iter()
            .filter_map(|&(id, index)| index.map(|index| (id, index)))
            .filter(|(_, index)| index.values_per_chunk > 0)
            .collect();
        let offset = cursor.offset();
        let chunk_bytes = channels.iter().try_fold(0usize, |total, (_, index)| {
            total
                .checked_add(index.chunk_bytes(offset)?)
                .ok_or_else(|| BridgeError::malformed(offset, "raw chunk size overflows"))
        })?;
        if chunk_bytes == 0 {
            return Ok(());
        }

        let available = cursor.bytes.len();
        let chunk_count = available / chunk_bytes;
        if available % chunk_bytes != 0 {
            warn!(
                "Ignoring {} trailing raw data bytes at byte {}",
                available % chunk_bytes,
                cursor.offset() + chunk_count * chunk_bytes
            );
        }

        // Bounded by `available`: every numeric chunk fits in the raw block.
        for (id, index) in channels.iter().filter(|(_, index)| index.data_type != DataType::String) {
            self.objects[*id]
                .data
                .reserve(chunk_count * index.values_per_chunk);
        }
        for _ in 0..chunk_count {
            if interleaved {
                self.read_interleaved_chunk(cursor, &channels)?;
            } else {
                self.read_contiguous_chunk(cursor, &channels)?;
            }
        }
        Ok(())
    }

    fn read_contiguous_chunk(&mut self, cursor: &mut Cursor, channels: &[(usize, RawIndex)]) -> BridgeResult<()> {
        for &(id, index) in channels {
            if index.data_type == DataType::String {
                // Text channels carry no numeric samples; skip their block.
                cursor.take(index.string_bytes)?;
                continue;
            }
            let data = &mut self.objects[id].data;
            for _ in 0..index.values_per_chunk {
                data.push(cursor.sample(index.data_type)?);
            }
        }
        Ok(())
    }

    fn read_interleaved_chunk(&mut self, cursor: &mut Cursor, channels: &[(usize, RawIndex)]) -> BridgeResult<()> {
        let values = channels[0].1.values_per_chunk;
        if channels
            .iter()
            .any(|(_, index)| index.data_type == DataType::String || index.values_per_chunk != values)
        {
            return Err(BridgeError::malformed(
                cursor.offset(),
                "interleaved data needs numeric channels of equal length",
            ));
        }
        for _ in 0..values {
            for &(id, index) in channels {
                let sample = cursor.sample(index.data_type)?;
                self.objects[id].data.push(sample);
            }
        }
        Ok(())
    }

    fn finish(self) -> TdmsFile {
        let mut file = TdmsFile::default();
        for object in self.objects {
            match object.path {
                ObjectPath { group: None, .. } => {}
                ObjectPath {
                    group: Some(group_name),
                    channel,
                } => {
                    let group = match file.groups.iter().position(|g| g.name == group_name) {
                        Some(position) => &mut file.groups[position],
                        None => {
                            file.groups.push(TdmsGroup {
                                name: group_name,
                                channels: Vec::new(),
                            });
                            let last = file.groups.len() - 1;
                            &mut file.groups[last]
                        }
                    };
                    if let Some(name) = channel {
                        group.channels.push(TdmsChannel {
                            name,
                            data_type: object.data_type,
                            properties: object.properties,
                            data: object.data,
                        });
                    }
                }
            }
        }
        file
    }
}


// src/data_input/tdms.rs
