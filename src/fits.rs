//! Minimal HEALPix FITS map I/O: a binary-table extension holding one map
//! per column, RING ordering.

use std::{
    collections::HashMap,
    fs::{File, OpenOptions},
    io::{BufWriter, Read, Write},
    path::Path,
};

use log::{debug, info};

use crate::{
    error::{Result, SkyError},
    healpix::npix2nside,
};

const BLOCK_SIZE: usize = 2880;
const CARD_SIZE: usize = 80;

/// Blank-pixel value used by HEALPix tools; mapped to NaN on read.
pub const HEALPIX_UNSEEN: f64 = -1.6375e30;

enum CardValue<'a> {
    Logical(bool),
    Integer(i64),
    Text(&'a str),
}

fn format_card(keyword: &str, value: CardValue, comment: Option<&str>) -> [u8; CARD_SIZE] {
    let value = match value {
        CardValue::Logical(b) => format!("{:>20}", if b { "T" } else { "F" }),
        CardValue::Integer(i) => format!("{:>20}", i),
        CardValue::Text(s) => format!("{:<20}", format!("'{:<8}'", s)),
    };
    let mut text = format!("{:<8}= {}", keyword, value);
    if let Some(c) = comment {
        text.push_str(" / ");
        text.push_str(c);
    }
    let mut card = [b' '; CARD_SIZE];
    let len = text.len().min(CARD_SIZE);
    card[..len].copy_from_slice(&text.as_bytes()[..len]);
    card
}

fn end_card() -> [u8; CARD_SIZE] {
    let mut card = [b' '; CARD_SIZE];
    card[..3].copy_from_slice(b"END");
    card
}

fn pad_to_block(buf: &mut Vec<u8>, fill: u8) {
    let rem = buf.len() % BLOCK_SIZE;
    if rem != 0 {
        buf.resize(buf.len() + BLOCK_SIZE - rem, fill);
    }
}

fn padded_len(n: usize) -> usize {
    (n + BLOCK_SIZE - 1) / BLOCK_SIZE * BLOCK_SIZE
}

/// Writes `maps` (all the same RING-ordered resolution) as columns of a
/// HEALPix binary table.
pub fn write_map<P: AsRef<Path>>(path: P, maps: &[&[f64]], overwrite: bool) -> Result<()> {
    let npix = maps
        .first()
        .map(|m| m.len())
        .ok_or_else(|| SkyError::Fits("no map to write".to_string()))?;
    let nside = npix2nside(npix).ok_or(SkyError::InvalidPixelCount(npix))?;
    if let Some(m) = maps.iter().find(|m| m.len() != npix) {
        return Err(SkyError::SizeMismatch {
            expected: npix,
            found: m.len(),
        });
    }

    let mut header = Vec::new();
    header.extend_from_slice(&format_card("SIMPLE", CardValue::Logical(true), None));
    header.extend_from_slice(&format_card("BITPIX", CardValue::Integer(8), None));
    header.extend_from_slice(&format_card("NAXIS", CardValue::Integer(0), None));
    header.extend_from_slice(&format_card("EXTEND", CardValue::Logical(true), None));
    header.extend_from_slice(&end_card());
    pad_to_block(&mut header, b' ');

    let ncol = maps.len();
    let ext_cards = [
        ("XTENSION", CardValue::Text("BINTABLE"), Some("binary table extension")),
        ("BITPIX", CardValue::Integer(8), None),
        ("NAXIS", CardValue::Integer(2), None),
        ("NAXIS1", CardValue::Integer(8 * ncol as i64), Some("bytes per row")),
        ("NAXIS2", CardValue::Integer(npix as i64), Some("number of rows")),
        ("PCOUNT", CardValue::Integer(0), None),
        ("GCOUNT", CardValue::Integer(1), None),
        ("TFIELDS", CardValue::Integer(ncol as i64), None),
    ];
    for (k, v, c) in ext_cards {
        header.extend_from_slice(&format_card(k, v, c));
    }
    for i in 1..=ncol {
        let ttype = if ncol == 1 {
            "SIGNAL".to_string()
        } else {
            format!("MAP{}", i)
        };
        header.extend_from_slice(&format_card(&format!("TTYPE{}", i), CardValue::Text(&ttype), None));
        header.extend_from_slice(&format_card(&format!("TFORM{}", i), CardValue::Text("D"), None));
    }
    let hp_cards = [
        ("PIXTYPE", CardValue::Text("HEALPIX"), Some("HEALPIX pixelisation")),
        ("ORDERING", CardValue::Text("RING"), Some("pixel ordering scheme")),
        ("NSIDE", CardValue::Integer(nside as i64), Some("resolution parameter")),
        ("FIRSTPIX", CardValue::Integer(0), None),
        ("LASTPIX", CardValue::Integer(npix as i64 - 1), None),
        ("INDXSCHM", CardValue::Text("IMPLICIT"), None),
        ("OBJECT", CardValue::Text("FULLSKY"), None),
    ];
    for (k, v, c) in hp_cards {
        header.extend_from_slice(&format_card(k, v, c));
    }
    header.extend_from_slice(&end_card());
    pad_to_block(&mut header, b' ');

    let mut data = Vec::with_capacity(padded_len(8 * ncol * npix));
    for ipix in 0..npix {
        for m in maps {
            data.extend_from_slice(&m[ipix].to_be_bytes());
        }
    }
    pad_to_block(&mut data, 0);

    let path = path.as_ref();
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .create_new(!overwrite)
        .open(path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(&header)?;
    writer.write_all(&data)?;
    writer.flush()?;
    info!("wrote {} map(s) at nside {} to {}", ncol, nside, path.display());
    Ok(())
}

/// Parses header cards starting at `offset`; returns keyword values and the
/// offset of the data that follows.
fn parse_header(bytes: &[u8], offset: usize) -> Result<(HashMap<String, String>, usize)> {
    let mut values = HashMap::new();
    let mut pos = offset;
    loop {
        let card = bytes
            .get(pos..pos + CARD_SIZE)
            .ok_or_else(|| SkyError::Fits("header has no END card".to_string()))?;
        pos += CARD_SIZE;
        let keyword = String::from_utf8_lossy(&card[..8]).trim().to_string();
        if keyword == "END" {
            break;
        }
        if &card[8..10] == b"= " {
            values.insert(keyword, parse_value(&String::from_utf8_lossy(&card[10..])));
        }
    }
    Ok((values, offset + padded_len(pos - offset)))
}

fn parse_value(raw: &str) -> String {
    let raw = raw.trim_start();
    if let Some(rest) = raw.strip_prefix('\'') {
        rest.split('\'').next().unwrap_or("").trim_end().to_string()
    } else {
        raw.split('/').next().unwrap_or("").trim().to_string()
    }
}

fn int_value(header: &HashMap<String, String>, key: &str) -> Result<i64> {
    header
        .get(key)
        .ok_or_else(|| SkyError::Fits(format!("missing keyword {}", key)))?
        .parse()
        .map_err(|_| SkyError::Fits(format!("keyword {} is not an integer", key)))
}

/// Reads the first column of the first binary-table extension as a RING map.
pub fn read_map<P: AsRef<Path>>(path: P) -> Result<Vec<f64>> {
    let path = path.as_ref();
    let mut bytes = Vec::new();
    File::open(path)?.read_to_end(&mut bytes)?;

    let (primary, mut offset) = parse_header(&bytes, 0)?;
    let naxis = int_value(&primary, "NAXIS")?;
    if naxis > 0 {
        let bitpix = int_value(&primary, "BITPIX")?.unsigned_abs() as usize / 8;
        let mut size = bitpix;
        for i in 1..=naxis {
            size *= int_value(&primary, &format!("NAXIS{}", i))? as usize;
        }
        offset += padded_len(size);
    }

    let (ext, data_start) = parse_header(&bytes, offset)?;
    if ext.get("XTENSION").map(String::as_str) != Some("BINTABLE") {
        return Err(SkyError::Fits("first extension is not a BINTABLE".to_string()));
    }
    if let Some(ordering) = ext.get("ORDERING") {
        if ordering != "RING" {
            return Err(SkyError::Fits(format!("unsupported ORDERING {}", ordering)));
        }
    }
    let row_bytes = int_value(&ext, "NAXIS1")? as usize;
    let rows = int_value(&ext, "NAXIS2")? as usize;
    let tform = ext
        .get("TFORM1")
        .ok_or_else(|| SkyError::Fits("missing keyword TFORM1".to_string()))?;
    let split = tform.find(|c: char| !c.is_ascii_digit()).unwrap_or(tform.len());
    let repeat = if split == 0 {
        1
    } else {
        tform[..split]
            .parse::<usize>()
            .map_err(|_| SkyError::Fits(format!("bad TFORM1 {}", tform)))?
    };
    let width = match &tform[split..] {
        "E" => 4,
        "D" => 8,
        other => return Err(SkyError::Fits(format!("unsupported column type {}", other))),
    };
    if repeat * width > row_bytes {
        return Err(SkyError::Fits(format!("TFORM1 {} wider than a row", tform)));
    }
    if bytes.len() < data_start + row_bytes * rows {
        return Err(SkyError::Fits("truncated data".to_string()));
    }
    debug!("{}: {} rows of {} x {}", path.display(), rows, repeat, tform);

    let mut map = Vec::with_capacity(rows * repeat);
    for row in 0..rows {
        let row_start = data_start + row * row_bytes;
        for k in 0..repeat {
            let at = row_start + k * width;
            let v = if width == 4 {
                let mut b = [0_u8; 4];
                b.copy_from_slice(&bytes[at..at + 4]);
                f32::from_be_bytes(b) as f64
            } else {
                let mut b = [0_u8; 8];
                b.copy_from_slice(&bytes[at..at + 8]);
                f64::from_be_bytes(b)
            };
            map.push(if (v - HEALPIX_UNSEEN).abs() < 1e25 { f64::NAN } else { v });
        }
    }
    npix2nside(map.len()).ok_or(SkyError::InvalidPixelCount(map.len()))?;
    info!("read {} pixels from {}", map.len(), path.display());
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::healpix::nside2npix;

    #[test]
    fn cards_are_80_columns() {
        let c = format_card("NSIDE", CardValue::Integer(128), Some("resolution"));
        let text = String::from_utf8(c.to_vec()).unwrap();
        assert_eq!(text.len(), 80);
        assert!(text.starts_with("NSIDE   =                  128 / resolution"));
        let s = format_card("ORDERING", CardValue::Text("RING"), None);
        assert!(String::from_utf8(s.to_vec()).unwrap().starts_with("ORDERING= 'RING    '"));
    }

    #[test]
    fn value_parsing() {
        assert_eq!(parse_value(" 'RING    '           / ordering"), "RING");
        assert_eq!(parse_value("                 128 / comment"), "128");
        assert_eq!(parse_value("'a/b'"), "a/b");
    }

    #[test]
    fn write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.fits");
        let mut map: Vec<f64> = (0..nside2npix(8)).map(|i| i as f64 * 0.5).collect();
        map[3] = f64::NAN;
        write_map(&path, &[&map], false).unwrap();

        let len = std::fs::metadata(&path).unwrap().len() as usize;
        assert_eq!(len % BLOCK_SIZE, 0);

        let back = read_map(&path).unwrap();
        assert_eq!(back.len(), map.len());
        assert!(back[3].is_nan());
        for (i, (a, b)) in map.iter().zip(back.iter()).enumerate() {
            if i != 3 {
                assert_eq!(a, b);
            }
        }
    }

    #[test]
    fn refuses_to_clobber() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.fits");
        let map = vec![0.0; nside2npix(2)];
        write_map(&path, &[&map], false).unwrap();
        assert!(matches!(write_map(&path, &[&map], false), Err(SkyError::Io(_))));
        write_map(&path, &[&map], true).unwrap();
    }

    #[test]
    fn rejects_bad_maps() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.fits");
        assert!(matches!(write_map(&path, &[], true), Err(SkyError::Fits(_))));
        assert!(matches!(
            write_map(&path, &[&[0.0; 13]], true),
            Err(SkyError::InvalidPixelCount(13))
        ));
        let a = vec![0.0; 12];
        let b = vec![0.0; 48];
        assert!(matches!(
            write_map(&path, &[&a, &b], true),
            Err(SkyError::SizeMismatch { expected: 12, found: 48 })
        ));
    }

    #[test]
    fn reads_multi_element_rows() {
        // 1024 float32 values per row, the layout most HEALPix tools emit
        let nside = 16;
        let npix = nside2npix(nside);
        let rows = npix / 1024;
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&format_card("SIMPLE", CardValue::Logical(true), None));
        bytes.extend_from_slice(&format_card("BITPIX", CardValue::Integer(8), None));
        bytes.extend_from_slice(&format_card("NAXIS", CardValue::Integer(0), None));
        bytes.extend_from_slice(&end_card());
        pad_to_block(&mut bytes, b' ');
        for (k, v) in [
            ("XTENSION", CardValue::Text("BINTABLE")),
            ("BITPIX", CardValue::Integer(8)),
            ("NAXIS", CardValue::Integer(2)),
            ("NAXIS1", CardValue::Integer(4096)),
            ("NAXIS2", CardValue::Integer(rows as i64)),
            ("TFIELDS", CardValue::Integer(1)),
            ("TFORM1", CardValue::Text("1024E")),
            ("ORDERING", CardValue::Text("RING")),
        ] {
            bytes.extend_from_slice(&format_card(k, v, None));
        }
        bytes.extend_from_slice(&end_card());
        pad_to_block(&mut bytes, b' ');
        for i in 0..npix {
            let v = if i == 7 { HEALPIX_UNSEEN as f32 } else { i as f32 };
            bytes.extend_from_slice(&v.to_be_bytes());
        }
        pad_to_block(&mut bytes, 0);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("healpy.fits");
        std::fs::write(&path, &bytes).unwrap();
        let map = read_map(&path).unwrap();
        assert_eq!(map.len(), npix);
        assert_eq!(map[1000], 1000.0);
        assert!(map[7].is_nan());
    }

    #[test]
    fn rejects_nested() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.fits");
        let map = vec![1.0; nside2npix(2)];
        write_map(&path, &[&map], false).unwrap();
        let text = std::fs::read(&path).unwrap();
        let patched = String::from_utf8_lossy(&text[..2 * BLOCK_SIZE])
            .replace("ORDERING= 'RING    '", "ORDERING= 'NESTED  '");
        let mut bytes = patched.into_bytes();
        bytes.extend_from_slice(&text[2 * BLOCK_SIZE..]);
        std::fs::write(&path, &bytes).unwrap();
        assert!(matches!(read_map(&path), Err(SkyError::Fits(_))));
    }
}
