//! BIFF8 record encoding for Excel 97-2003 workbooks.
//!
//! Only the records a plain value grid needs: workbook globals with one font
//! and the default XF table, BOUNDSHEET entries, and LABEL/NUMBER cells.

use std::io::{Cursor, Write};

pub const RECORD_BOF: u16 = 0x0809;
pub const RECORD_EOF: u16 = 0x000A;
pub const RECORD_CODEPAGE: u16 = 0x0042;
pub const RECORD_WINDOW1: u16 = 0x003D;
pub const RECORD_FONT: u16 = 0x0031;
pub const RECORD_XF: u16 = 0x00E0;
pub const RECORD_BOUNDSHEET: u16 = 0x0085;
pub const RECORD_DIMENSIONS: u16 = 0x0200;
pub const RECORD_NUMBER: u16 = 0x0203;
pub const RECORD_LABEL: u16 = 0x0204;
pub const RECORD_WINDOW2: u16 = 0x023E;

pub const BOF_VERSION_BIFF8: u16 = 0x0600;
pub const BOF_DT_WORKBOOK_GLOBALS: u16 = 0x0005;
pub const BOF_DT_WORKSHEET: u16 = 0x0010;

/// UTF-16LE; every string below is written uncompressed.
const CODEPAGE_UTF16: u16 = 1200;

const XF_FLAG_LOCKED: u16 = 0x0001;
const XF_FLAG_STYLE: u16 = 0x0004;
const STYLE_XF_COUNT: u16 = 16;
const CELL_XF: u16 = STYLE_XF_COUNT;

pub const MAX_SHEET_NAME_CHARS: usize = 31;
pub const MAX_LABEL_CHARS: usize = 255;

/// Wrap a workbook stream in a version 3 compound file (512-byte sectors),
/// the container Excel 97-2003 readers expect.
pub fn compound_file(stream: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut compound =
        cfb::CompoundFile::create_with_version(cfb::Version::V3, Cursor::new(Vec::new()))?;
    {
        let mut workbook = compound.create_stream("Workbook")?;
        workbook.write_all(stream)?;
    }
    compound.flush()?;
    Ok(compound.into_inner().into_inner())
}

/// Globals substream followed by `sheets`, with each BOUNDSHEET pointing at
/// its worksheet BOF. `names` and `sheets` pair up by position.
pub fn workbook_stream(names: &[String], sheets: &[Vec<u8>]) -> Vec<u8> {
    let mut globals = Vec::new();
    push_record(&mut globals, RECORD_BOF, &bof(BOF_DT_WORKBOOK_GLOBALS));
    push_record(&mut globals, RECORD_CODEPAGE, &CODEPAGE_UTF16.to_le_bytes());
    push_record(&mut globals, RECORD_WINDOW1, &window1());
    push_record(&mut globals, RECORD_FONT, &font("Arial"));
    for _ in 0..STYLE_XF_COUNT {
        push_record(&mut globals, RECORD_XF, &xf_record(true));
    }
    push_record(&mut globals, RECORD_XF, &xf_record(false));

    let mut offset_positions = Vec::with_capacity(names.len());
    for name in names {
        let mut boundsheet = Vec::new();
        boundsheet.extend_from_slice(&0u32.to_le_bytes()); // patched below
        boundsheet.extend_from_slice(&0u16.to_le_bytes()); // visible worksheet
        write_short_unicode_string(&mut boundsheet, name);
        offset_positions.push(globals.len() + 4);
        push_record(&mut globals, RECORD_BOUNDSHEET, &boundsheet);
    }
    push_record(&mut globals, RECORD_EOF, &[]);

    for (sheet, position) in sheets.iter().zip(offset_positions) {
        let offset = globals.len() as u32;
        globals[position..position + 4].copy_from_slice(&offset.to_le_bytes());
        globals.extend_from_slice(sheet);
    }
    globals
}

/// Worksheet BOF and DIMENSIONS for a `rows` by `columns` grid.
pub fn begin_sheet(rows: usize, columns: u16) -> Vec<u8> {
    let mut out = Vec::new();
    push_record(&mut out, RECORD_BOF, &bof(BOF_DT_WORKSHEET));
    push_record(&mut out, RECORD_DIMENSIONS, &dimensions(rows, columns));
    out
}

pub fn end_sheet(out: &mut Vec<u8>) {
    push_record(out, RECORD_WINDOW2, &window2());
    push_record(out, RECORD_EOF, &[]);
}

pub fn push_record(out: &mut Vec<u8>, id: u16, data: &[u8]) {
    out.extend_from_slice(&id.to_le_bytes());
    out.extend_from_slice(&(data.len() as u16).to_le_bytes());
    out.extend_from_slice(data);
}

pub fn push_label(out: &mut Vec<u8>, row: u16, column: u16, text: &str) {
    let mut data = Vec::with_capacity(9 + text.len() * 2);
    data.extend_from_slice(&row.to_le_bytes());
    data.extend_from_slice(&column.to_le_bytes());
    data.extend_from_slice(&CELL_XF.to_le_bytes());
    write_unicode_string(&mut data, text);
    push_record(out, RECORD_LABEL, &data);
}

pub fn push_number(out: &mut Vec<u8>, row: u16, column: u16, value: f64) {
    let mut data = [0u8; 14];
    data[0..2].copy_from_slice(&row.to_le_bytes());
    data[2..4].copy_from_slice(&column.to_le_bytes());
    data[4..6].copy_from_slice(&CELL_XF.to_le_bytes());
    data[6..14].copy_from_slice(&value.to_le_bytes());
    push_record(out, RECORD_NUMBER, &data);
}

fn bof(dt: u16) -> [u8; 16] {
    let mut out = [0u8; 16];
    out[0..2].copy_from_slice(&BOF_VERSION_BIFF8.to_le_bytes());
    out[2..4].copy_from_slice(&dt.to_le_bytes());
    out[4..6].copy_from_slice(&0x0DBBu16.to_le_bytes()); // build
    out[6..8].copy_from_slice(&0x07CCu16.to_le_bytes()); // year
    out
}

fn window1() -> [u8; 18] {
    let mut out = [0u8; 18];
    out[14..16].copy_from_slice(&1u16.to_le_bytes()); // cTabSel
    out[16..18].copy_from_slice(&600u16.to_le_bytes()); // wTabRatio
    out
}

fn window2() -> [u8; 18] {
    let mut out = [0u8; 18];
    out[0..2].copy_from_slice(&0x02B6u16.to_le_bytes());
    out
}

fn font(name: &str) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&200u16.to_le_bytes()); // 10pt
    out.extend_from_slice(&0u16.to_le_bytes()); // flags
    out.extend_from_slice(&0x7FFFu16.to_le_bytes()); // automatic colour
    out.extend_from_slice(&400u16.to_le_bytes()); // weight
    out.extend_from_slice(&0u16.to_le_bytes()); // escapement
    out.extend_from_slice(&[0, 0, 0, 0]); // underline, family, charset, reserved
    write_short_unicode_string(&mut out, name);
    out
}

fn xf_record(is_style_xf: bool) -> [u8; 20] {
    let mut out = [0u8; 20];
    // Font 0, number format 0 (General).
    let flags = XF_FLAG_LOCKED | if is_style_xf { XF_FLAG_STYLE } else { 0 };
    out[4..6].copy_from_slice(&flags.to_le_bytes());
    out[6] = 0x20; // general, bottom aligned
    out[9] = 0x3F;
    out
}

fn dimensions(rows: usize, columns: u16) -> [u8; 14] {
    let mut out = [0u8; 14];
    out[4..8].copy_from_slice(&(rows as u32).to_le_bytes()); // last row + 1
    let columns = if rows == 0 { 0 } else { columns };
    out[10..12].copy_from_slice(&columns.to_le_bytes()); // last column + 1
    out
}

/// Up to `limit` characters as UTF-16 code units, never splitting a surrogate pair.
fn utf16_units(text: &str, limit: usize) -> Vec<u16> {
    let mut units = Vec::new();
    for ch in text.chars() {
        let mut buf = [0u16; 2];
        let encoded = ch.encode_utf16(&mut buf);
        if units.len() + encoded.len() > limit {
            break;
        }
        units.extend_from_slice(encoded);
    }
    units
}

/// XLUnicodeString: u16 length, flags, UTF-16LE characters.
fn write_unicode_string(out: &mut Vec<u8>, text: &str) {
    let units = utf16_units(text, MAX_LABEL_CHARS);
    out.extend_from_slice(&(units.len() as u16).to_le_bytes());
    out.push(0x01);
    for unit in units {
        out.extend_from_slice(&unit.to_le_bytes());
    }
}

/// ShortXLUnicodeString: u8 length, flags, UTF-16LE characters.
fn write_short_unicode_string(out: &mut Vec<u8>, text: &str) {
    let units = utf16_units(text, MAX_SHEET_NAME_CHARS);
    out.push(units.len() as u8);
    out.push(0x01);
    for unit in units {
        out.extend_from_slice(&unit.to_le_bytes());
    }
}
