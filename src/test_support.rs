//! Shared fixtures for unit and end-to-end tests
//!
//! Provides minimal BDF documents, a tiny TrueType font, and stand-in
//! scripts for the external converters.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

const BDF_HEADER: &str = "STARTFONT 2.1\n\
FONT -test-font\n\
SIZE 16 100 100\n\
FONTBOUNDINGBOX 10 16 0 0\n\
STARTPROPERTIES 1\n\
FONT_ASCENT 16\n\
ENDPROPERTIES\n";

fn push_glyphs(doc: &mut String, encodings: &[u32]) {
    let _ = writeln!(doc, "CHARS {}", encodings.len());
    for (i, encoding) in encodings.iter().enumerate() {
        let _ = writeln!(doc, "STARTCHAR char{i}");
        let _ = writeln!(doc, "ENCODING {encoding}");
        doc.push_str("SWIDTH 500 0\nDWIDTH 10 0\nBBX 10 16 0 0\nBITMAP\n");
        doc.push_str(&"FF\n".repeat(16));
        doc.push_str("ENDCHAR\n");
    }
    doc.push_str("ENDFONT\n");
}

/// A BDF document whose glyphs carry the given ENCODING values
pub fn bdf_with_encodings(encodings: &[u32]) -> String {
    let mut doc = BDF_HEADER.to_string();
    push_glyphs(&mut doc, encodings);
    doc
}

/// A BDF document with Latin-1 metadata (© and ®) and sequential encodings
pub fn bdf_with_latin1_metadata(glyphs: u32) -> Vec<u8> {
    let mut doc = String::from("STARTFONT 2.1\n");
    doc.push_str("COMMENT Copyright \u{a9} 2025 Test Font\n");
    doc.push_str("FONT -TestFont\u{ae}-Regular\n");
    doc.push_str("SIZE 16 100 100\nFONTBOUNDINGBOX 10 16 0 0\nSTARTPROPERTIES 2\nFONT_ASCENT 16\n");
    doc.push_str("COPYRIGHT \"Test Font \u{a9} 2025\"\nENDPROPERTIES\n");
    push_glyphs(&mut doc, &(1..=glyphs).collect::<Vec<_>>());

    doc.chars().map(|c| c as u32 as u8).collect()
}

fn push_u16(buf: &mut Vec<u8>, value: u16) {
    buf.extend_from_slice(&value.to_be_bytes());
}

fn push_u32(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_be_bytes());
}

/// A minimal TrueType font mapping each code point to its own empty glyph
///
/// Glyph 0 is `.notdef`, so the font holds `code_points.len() + 1` glyphs.
pub fn test_font(code_points: &[u32]) -> Vec<u8> {
    let mut sorted = code_points.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    let num_glyphs = u16::try_from(sorted.len() + 1).expect("too many glyphs for a test font");

    // cmap: one format 12 subtable (Windows, Unicode full repertoire)
    let mut cmap = Vec::new();
    push_u16(&mut cmap, 0);
    push_u16(&mut cmap, 1);
    push_u16(&mut cmap, 3);
    push_u16(&mut cmap, 10);
    push_u32(&mut cmap, 12);
    push_u16(&mut cmap, 12);
    push_u16(&mut cmap, 0);
    push_u32(&mut cmap, 16 + 12 * sorted.len() as u32);
    push_u32(&mut cmap, 0);
    push_u32(&mut cmap, sorted.len() as u32);
    for (i, cp) in sorted.iter().enumerate() {
        push_u32(&mut cmap, *cp);
        push_u32(&mut cmap, *cp);
        push_u32(&mut cmap, i as u32 + 1);
    }

    let glyf = vec![0u8; 4];

    let mut head = Vec::new();
    push_u32(&mut head, 0x0001_0000);
    push_u32(&mut head, 0x0001_0000);
    push_u32(&mut head, 0);
    push_u32(&mut head, 0x5F0F_3CF5);
    push_u16(&mut head, 0);
    push_u16(&mut head, 1000);
    head.extend_from_slice(&[0u8; 16]);
    for _ in 0..4 {
        push_u16(&mut head, 0);
    }
    push_u16(&mut head, 0);
    push_u16(&mut head, 8);
    push_u16(&mut head, 2);
    push_u16(&mut head, 0);
    push_u16(&mut head, 0);

    let mut hhea = Vec::new();
    push_u32(&mut hhea, 0x0001_0000);
    push_u16(&mut hhea, 800);
    push_u16(&mut hhea, (-200i16) as u16);
    push_u16(&mut hhea, 0);
    push_u16(&mut hhea, 500);
    for _ in 0..10 {
        push_u16(&mut hhea, 0);
    }
    push_u16(&mut hhea, 0);
    push_u16(&mut hhea, num_glyphs);

    let mut hmtx = Vec::new();
    for _ in 0..num_glyphs {
        push_u16(&mut hmtx, 500);
        push_u16(&mut hmtx, 0);
    }

    let mut loca = Vec::new();
    for _ in 0..=num_glyphs {
        push_u16(&mut loca, 0);
    }

    let mut maxp = Vec::new();
    push_u32(&mut maxp, 0x0001_0000);
    push_u16(&mut maxp, num_glyphs);
    maxp.extend_from_slice(&[0u8; 26]);

    // Table records must be sorted by tag
    let tables: [(&[u8; 4], Vec<u8>); 7] = [
        (b"cmap", cmap),
        (b"glyf", glyf),
        (b"head", head),
        (b"hhea", hhea),
        (b"hmtx", hmtx),
        (b"loca", loca),
        (b"maxp", maxp),
    ];

    let mut font = Vec::new();
    push_u32(&mut font, 0x0001_0000);
    push_u16(&mut font, tables.len() as u16);
    push_u16(&mut font, 64);
    push_u16(&mut font, 2);
    push_u16(&mut font, 48);

    let mut offset = 12 + 16 * tables.len() as u32;
    for (tag, data) in &tables {
        font.extend_from_slice(*tag);
        push_u32(&mut font, 0);
        push_u32(&mut font, offset);
        push_u32(&mut font, data.len() as u32);
        offset += (data.len() as u32).next_multiple_of(4);
    }
    for (_, data) in &tables {
        font.extend_from_slice(data);
        font.resize(font.len().next_multiple_of(4), 0);
    }
    font
}

/// Write an executable shell script into `dir`
#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}")).expect("write script");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .expect("make script executable");
    path
}

/// Stand-in for pyftsubset: copies the source font to `--output-file`
#[cfg(unix)]
pub fn fake_subsetter(dir: &Path) -> PathBuf {
    write_script(
        dir,
        "fake-pyftsubset",
        r#"src="$1"
shift
for arg in "$@"; do
  case "$arg" in
    --output-file=*) out="${arg#--output-file=}" ;;
  esac
done
cp "$src" "$out"
"#,
    )
}

/// Stand-in for otf2bdf (`-p SIZE TTF -o BDF`), emitting `glyphs`
/// placeholder encodings 1..=glyphs
#[cfg(unix)]
pub fn fake_rasterizer(dir: &Path, glyphs: u32) -> PathBuf {
    let doc = bdf_with_encodings(&(1..=glyphs).collect::<Vec<_>>());
    write_script(
        dir,
        "fake-otf2bdf",
        &format!("cat > \"$5\" <<'BDF_EOF'\n{doc}BDF_EOF\n"),
    )
}

/// Stand-in for bdftopcf: copies the BDF to stdout
#[cfg(unix)]
pub fn fake_packer(dir: &Path) -> PathBuf {
    write_script(dir, "fake-bdftopcf", "cat \"$1\"\n")
}

/// A tool that always fails with a message on stderr
#[cfg(unix)]
pub fn failing_tool(dir: &Path, name: &str) -> PathBuf {
    write_script(dir, name, "echo \"conversion exploded\" >&2\nexit 2\n")
}
