//! CMOD Archive Codec: bit-exact `.cmod` packing/unpacking. Grounded on
//! the fixed-header + per-entry-header binary envelope pattern in
//! `dx-binary/protocol.rs`, adapted to the archive layout.

use std::collections::BTreeMap;
use std::io::{Read, Write};

use bytemuck::{Pod, Zeroable};

use crate::crc::crc32;
use crate::error::ArchiveError;
use crate::export::CMODExport;
use crate::info::CMODInfo;
use crate::module::CMODModule;
use crate::rle;

pub const MAGIC: [u8; 8] = *b"CHTLCMOD";
pub const VERSION: u32 = 1;
const FLAG_COMPRESSED: u32 = 0b1;

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct RawHeader {
    magic: [u8; 8],
    version: u32,
    file_count: u32,
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct RawEntryHeader {
    name_len: u32,
    data_len: u32,
    original_size: u32,
    checksum: u32,
}

struct Entry {
    name: String,
    payload: Vec<u8>,
}

/// Pack `module` into `writer`. The `info/<name>.chtl` entry (serialized
/// info + export) is synthesized first; every `source_files` entry
/// follows in sorted order.
pub fn pack(module: &CMODModule, writer: &mut impl Write, compress: bool) -> Result<(), ArchiveError> {
    let mut entries = Vec::new();

    let mut info_text = module.info.serialize();
    info_text.push('\n');
    info_text.push_str(&module.export.serialize());
    entries.push(Entry { name: format!("info/{}.chtl", module.info.name), payload: info_text.into_bytes() });

    for (path, text) in &module.source_files {
        entries.push(Entry { name: format!("src/{path}"), payload: text.clone().into_bytes() });
    }

    let header =
        RawHeader { magic: MAGIC, version: VERSION, file_count: entries.len() as u32 };
    writer.write_all(bytemuck::bytes_of(&header))?;
    let flags: u32 = if compress { FLAG_COMPRESSED } else { 0 };
    writer.write_all(&flags.to_le_bytes())?;

    for entry in &entries {
        let original_size = entry.payload.len() as u32;
        let payload = if compress { rle::compress(&entry.payload) } else { entry.payload.clone() };
        let checksum = crc32(&entry.payload);

        let entry_header = RawEntryHeader {
            name_len: entry.name.len() as u32,
            data_len: payload.len() as u32,
            original_size,
            checksum,
        };
        writer.write_all(bytemuck::bytes_of(&entry_header))?;
        writer.write_all(entry.name.as_bytes())?;
        writer.write_all(&payload)?;
    }

    Ok(())
}

/// Unpack a `.cmod` archive, verifying magic/version/CRC/decompressed
/// size as it goes.
pub fn unpack(reader: &mut impl Read) -> Result<CMODModule, ArchiveError> {
    let mut header_bytes = [0u8; std::mem::size_of::<RawHeader>()];
    reader.read_exact(&mut header_bytes)?;
    let header: RawHeader = bytemuck::pod_read_unaligned(&header_bytes);

    if header.magic != MAGIC {
        return Err(ArchiveError::BadMagic(header.magic.to_vec()));
    }
    if header.version != VERSION {
        return Err(ArchiveError::UnsupportedVersion(header.version));
    }

    let mut flags_bytes = [0u8; 4];
    reader.read_exact(&mut flags_bytes)?;
    let flags = u32::from_le_bytes(flags_bytes);
    let compressed = flags & FLAG_COMPRESSED != 0;

    let mut info: Option<CMODInfo> = None;
    let mut export = CMODExport::default();
    let mut source_files = BTreeMap::new();

    for _ in 0..header.file_count {
        let mut entry_header_bytes = [0u8; std::mem::size_of::<RawEntryHeader>()];
        reader.read_exact(&mut entry_header_bytes)?;
        let entry_header: RawEntryHeader = bytemuck::pod_read_unaligned(&entry_header_bytes);

        let mut name_bytes = vec![0u8; entry_header.name_len as usize];
        reader.read_exact(&mut name_bytes)?;
        let name = String::from_utf8_lossy(&name_bytes).to_string();

        let mut payload = vec![0u8; entry_header.data_len as usize];
        reader.read_exact(&mut payload)?;

        let decoded = if compressed { rle::decompress(&payload) } else { payload };
        if decoded.len() as u32 != entry_header.original_size {
            return Err(ArchiveError::SizeMismatch { name, expected: entry_header.original_size, actual: decoded.len() as u32 });
        }

        let checksum = crc32(&decoded);
        if checksum != entry_header.checksum {
            return Err(ArchiveError::CrcMismatch { name, expected: entry_header.checksum, actual: checksum });
        }

        let text = String::from_utf8_lossy(&decoded).to_string();
        if let Some(rel) = name.strip_prefix("info/") {
            if rel.ends_with(".chtl") {
                info = CMODInfo::parse(&text).ok();
                export = CMODExport::parse(&text);
            }
        } else if let Some(rel) = name.strip_prefix("src/") {
            source_files.insert(rel.to_string(), text);
        }
    }

    Ok(CMODModule { info: info.unwrap_or_default(), export, source_files, sub_modules: Vec::new(), structure_errors: Vec::new() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap as Map;
    use std::io::Cursor;

    fn sample_module() -> CMODModule {
        let mut source_files = Map::new();
        source_files.insert("Box.chtl".to_string(), "[Custom] @Style Box { color: red; }".to_string());
        CMODModule {
            info: CMODInfo {
                name: "Box".to_string(),
                version: "1.0.0".to_string(),
                author: "a".to_string(),
                min_chtl_version: "1.0.0".to_string(),
                max_chtl_version: "2.0.0".to_string(),
                ..Default::default()
            },
            export: CMODExport::default(),
            source_files,
            sub_modules: Vec::new(),
            structure_errors: Vec::new(),
        }
    }

    #[test]
    fn pack_then_unpack_round_trips() {
        let module = sample_module();
        let mut buffer = Vec::new();
        pack(&module, &mut buffer, false).unwrap();

        let unpacked = unpack(&mut Cursor::new(buffer)).unwrap();
        assert_eq!(unpacked.info.name, "Box");
        assert_eq!(unpacked.source_files.get("Box.chtl").unwrap(), "[Custom] @Style Box { color: red; }");
    }

    #[test]
    fn pack_then_unpack_round_trips_with_compression() {
        let module = sample_module();
        let mut buffer = Vec::new();
        pack(&module, &mut buffer, true).unwrap();

        let unpacked = unpack(&mut Cursor::new(buffer)).unwrap();
        assert_eq!(unpacked.source_files.get("Box.chtl").unwrap(), "[Custom] @Style Box { color: red; }");
    }

    #[test]
    fn bad_magic_is_rejected() {
        let mut buffer = vec![0u8; 20];
        buffer[..8].copy_from_slice(b"CHTLMOD?");
        let result = unpack(&mut Cursor::new(buffer));
        assert!(matches!(result, Err(ArchiveError::BadMagic(_))));
    }

    #[test]
    fn corrupted_payload_fails_crc_check() {
        let module = sample_module();
        let mut buffer = Vec::new();
        pack(&module, &mut buffer, false).unwrap();

        let last = buffer.len() - 1;
        buffer[last] ^= 0xFF;

        let result = unpack(&mut Cursor::new(buffer));
        assert!(matches!(result, Err(ArchiveError::CrcMismatch { .. })));
    }
}
