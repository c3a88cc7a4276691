//! On-disk puzzle level format: a fixed 32x32-cell framed, RLE-compressed
//! layout modeled on the classic tile-puzzle level set format.
//!
//! All integers are little-endian. See `SPEC_FULL.md` section 6 for the byte
//! layout; this module is a direct, faithful transcription of it using
//! `byteorder` the way the teacher crate uses it for its own binary formats
//! (the teacher itself doesn't need a codec, but `byteorder` is the ecosystem
//! tool the pack reaches for when a crate starts reading/writing raw bytes).

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Cursor, Read, Write};

use crate::error::LevelError;
use crate::tile::Tile;

pub const MAGIC: [u8; 4] = [0xAC, 0xAA, 0x02, 0x00];
pub const MAP_SIDE: usize = 32;

/// A decoded puzzle level: title, time limit, and a 32x32 tile grid (plus an
/// optional bottom layer, used when two entities coincide at write time).
#[derive(Clone, Debug)]
pub struct Level {
    pub title: String,
    pub time_limit: u16,
    pub tiles: Vec<Vec<Tile>>,
    pub subtiles: Option<Vec<Vec<Tile>>>,
}

impl Level {
    pub fn new(title: impl Into<String>, time_limit: u16) -> Self {
        Self {
            title: title.into(),
            time_limit,
            tiles: vec![vec![Tile::Floor; MAP_SIDE]; MAP_SIDE],
            subtiles: None,
        }
    }

    pub fn set(&mut self, x: usize, y: usize, tile: Tile) {
        self.tiles[y][x] = tile;
    }

    pub fn get(&self, x: usize, y: usize) -> Tile {
        self.tiles[y][x]
    }
}

/// Encodes `level` into the on-disk byte format.
pub fn encode(level: &Level) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&MAGIC);
    out.write_u16::<LittleEndian>(1).unwrap(); // nlevels

    let body = encode_body(level);
    out.write_u16::<LittleEndian>(body.len() as u16).unwrap();
    out.extend_from_slice(&body);
    out
}

fn encode_body(level: &Level) -> Vec<u8> {
    let mut body = Vec::new();
    body.write_u16::<LittleEndian>(1).unwrap(); // level number
    body.write_u16::<LittleEndian>(level.time_limit).unwrap();
    body.write_u16::<LittleEndian>(0).unwrap(); // chips
    body.write_u16::<LittleEndian>(1).unwrap(); // map start

    let top = encode_rle(level);
    body.write_u16::<LittleEndian>(top.len() as u16).unwrap();
    body.extend_from_slice(&top);

    let bottom = encode_bottom_layer();
    body
        .write_u16::<LittleEndian>(bottom.len() as u16)
        .unwrap();
    body.extend_from_slice(&bottom);

    let fields = encode_fields(&level.title);
    body
        .write_u16::<LittleEndian>(fields.len() as u16)
        .unwrap();
    body.extend_from_slice(&fields);

    body
}

fn encode_rle(level: &Level) -> Vec<u8> {
    let mut out = Vec::new();
    for y in 0..MAP_SIDE {
        let mut x = 0;
        while x < MAP_SIDE {
            let tile = level.tiles[y][x];
            let mut count = 1;
            while x + count < MAP_SIDE && level.tiles[y][x + count] == tile {
                count += 1;
            }
            let code = tile.encoding();
            if count > 3 {
                out.push(0xFF);
                out.push(count as u8);
                out.push(code);
            } else {
                for _ in 0..count {
                    out.push(code);
                }
            }
            x += count;
        }
    }
    out
}

// the bottom layer is ignored on read; the writer always emits an
// all-floor-with-trailing-marker layer, matching the original generator.
fn encode_bottom_layer() -> Vec<u8> {
    vec![
        0xFF, 0xFF, 0x00, 0xFF, 0xFF, 0x00, 0xFF, 0xFF, 0x00, 0xFF, 0xFF, 0x00, 0xFF, 0x04, 0x00,
    ]
}

fn encode_fields(title: &str) -> Vec<u8> {
    let mut out = Vec::new();

    // type 3: title
    out.push(3);
    let mut title_bytes = title.as_bytes().to_vec();
    title_bytes.push(0);
    out.push(title_bytes.len() as u8);
    out.extend_from_slice(&title_bytes);

    // type 6: password, always "MAZE" xor-masked with 0x99
    out.push(6);
    out.push(5);
    for b in b"MAZE" {
        out.push(b ^ 0x99);
    }
    out.push(0);

    out
}

/// Decodes a byte buffer into a [`Level`].
pub fn decode(bytes: &[u8]) -> Result<Level, LevelError> {
    let mut cursor = Cursor::new(bytes);

    let mut magic = [0u8; 4];
    cursor
        .read_exact(&mut magic)
        .map_err(|_| LevelError::UnexpectedEndOfFile)?;
    if magic != MAGIC {
        return Err(LevelError::InvalidMagic);
    }

    let nlevels = cursor
        .read_u16::<LittleEndian>()
        .map_err(|_| LevelError::UnexpectedEndOfFile)?;
    if nlevels == 0 {
        return Err(LevelError::LevelsetEmpty);
    }
    if nlevels != 1 {
        return Err(LevelError::UnsupportedMultiLevel);
    }

    let body_len = cursor
        .read_u16::<LittleEndian>()
        .map_err(|_| LevelError::UnexpectedEndOfFile)? as usize;
    let mut body = vec![0u8; body_len];
    cursor
        .read_exact(&mut body)
        .map_err(|_| LevelError::UnexpectedEndOfFile)?;

    let level = decode_body(&body)?;

    let mut trailing = Vec::new();
    cursor
        .read_to_end(&mut trailing)
        .map_err(|_| LevelError::UnexpectedEndOfFile)?;
    if !trailing.is_empty() {
        return Err(LevelError::GarbageAtEnd);
    }

    Ok(level)
}

fn decode_body(body: &[u8]) -> Result<Level, LevelError> {
    let mut cursor = Cursor::new(body);

    let level_number = cursor
        .read_u16::<LittleEndian>()
        .map_err(|_| LevelError::UnexpectedEndOfFile)?;
    if level_number != 1 {
        return Err(LevelError::MalformedLevel);
    }
    let time_limit = cursor
        .read_u16::<LittleEndian>()
        .map_err(|_| LevelError::UnexpectedEndOfFile)?;
    let _chips = cursor
        .read_u16::<LittleEndian>()
        .map_err(|_| LevelError::UnexpectedEndOfFile)?;
    let map_start = cursor
        .read_u16::<LittleEndian>()
        .map_err(|_| LevelError::UnexpectedEndOfFile)?;
    if map_start != 1 {
        return Err(LevelError::MalformedLevel);
    }

    let top_len = cursor
        .read_u16::<LittleEndian>()
        .map_err(|_| LevelError::UnexpectedEndOfFile)? as usize;
    let mut top = vec![0u8; top_len];
    cursor
        .read_exact(&mut top)
        .map_err(|_| LevelError::UnexpectedEndOfFile)?;

    let (tiles, title_placeholder) = decode_rle(&top)?;
    let _ = title_placeholder;

    let bottom_len = cursor
        .read_u16::<LittleEndian>()
        .map_err(|_| LevelError::UnexpectedEndOfFile)? as usize;
    cursor.set_position(cursor.position() + bottom_len as u64);

    let fields_len = cursor
        .read_u16::<LittleEndian>()
        .map_err(|_| LevelError::UnexpectedEndOfFile)? as usize;
    let mut fields = vec![0u8; fields_len];
    cursor
        .read_exact(&mut fields)
        .map_err(|_| LevelError::UnexpectedEndOfFile)?;
    let title = decode_fields(&fields)?;

    let mut trailing = Vec::new();
    cursor
        .read_to_end(&mut trailing)
        .map_err(|_| LevelError::UnexpectedEndOfFile)?;
    if !trailing.is_empty() {
        return Err(LevelError::MalformedLevel);
    }

    Ok(Level {
        title,
        time_limit,
        tiles,
        subtiles: None,
    })
}

fn decode_rle(top: &[u8]) -> Result<(Vec<Vec<Tile>>, ()), LevelError> {
    let mut tiles = vec![vec![Tile::Floor; MAP_SIDE]; MAP_SIDE];
    let mut cursor = Cursor::new(top);
    let mut i = 0usize;
    let mut warned = false;

    while i < MAP_SIDE * MAP_SIDE {
        let mut t = cursor
            .read_u8()
            .map_err(|_| LevelError::UnexpectedEndOfLayerData)?;
        let count = if t == 0xFF {
            let count = cursor
                .read_u8()
                .map_err(|_| LevelError::UnexpectedEndOfLayerData)?;
            t = cursor
                .read_u8()
                .map_err(|_| LevelError::UnexpectedEndOfLayerData)?;
            count
        } else {
            1
        };

        let tile = match Tile::from_code(t) {
            Some(tile) => tile,
            None => {
                if !warned {
                    log::warn!(
                        "unknown tile {:#x} at {},{} (only one warning will be shown per level)",
                        t,
                        i % MAP_SIDE,
                        i / MAP_SIDE
                    );
                    warned = true;
                }
                Tile::Floor
            }
        };

        for _ in 0..count {
            if i >= MAP_SIDE * MAP_SIDE {
                break;
            }
            let (x, y) = (i % MAP_SIDE, i / MAP_SIDE);
            tiles[y][x] = tile;
            i += 1;
        }
    }

    let mut trailing = Vec::new();
    cursor
        .read_to_end(&mut trailing)
        .map_err(|_| LevelError::UnexpectedEndOfLayerData)?;
    if !trailing.is_empty() {
        return Err(LevelError::GarbageAtEndOfLayer);
    }

    Ok((tiles, ()))
}

fn decode_fields(fields: &[u8]) -> Result<String, LevelError> {
    let mut cursor = Cursor::new(fields);
    let mut title = String::new();

    while (cursor.position() as usize) < fields.len() {
        let field_type = cursor
            .read_u8()
            .map_err(|_| LevelError::UnexpectedEndOfFile)?;
        let len = cursor
            .read_u8()
            .map_err(|_| LevelError::UnexpectedEndOfFile)? as usize;
        let mut payload = vec![0u8; len];
        cursor
            .read_exact(&mut payload)
            .map_err(|_| LevelError::UnexpectedEndOfFile)?;

        if field_type == 3 {
            let nul = payload.iter().position(|&b| b == 0).unwrap_or(payload.len());
            title = String::from_utf8_lossy(&payload[..nul]).into_owned();
        }
        // type 6 (password) and any other field types are read and discarded.
    }

    Ok(title)
}

/// Writes `level` as an encoded level file.
pub fn write<W: Write>(mut w: W, level: &Level) -> std::io::Result<()> {
    w.write_all(&encode(level))
}

/// Reads and decodes a level file from `r`.
pub fn read<R: Read>(mut r: R) -> Result<Level, LevelError> {
    let mut bytes = Vec::new();
    r.read_to_end(&mut bytes)
        .map_err(|_| LevelError::UnexpectedEndOfFile)?;
    decode(&bytes)
}
