//! SVG writing operations.

use std::{fs::File, io::{BufWriter, Write}, path::{Path, PathBuf}};

use anyhow::{Context, Result};

/// Buffered SVG output to a file.
pub(crate) struct SvgWriter {
    path: PathBuf,
    writer: BufWriter<File>,
}

/// In-memory SVG output.
pub(crate) struct SvgStringWriter {
    buffer: Vec<u8>,
}

impl SvgWriter {
    /// Create (or truncate) the file at `path`.
    pub(crate) fn new(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("[io::svg] Failed to create {}", path.display()))?;
        Ok(Self { path: path.to_path_buf(), writer: BufWriter::new(file) })
    }

    /// Flush buffered output to disk.
    pub(crate) fn finish(mut self) -> Result<()> {
        self.writer.flush()
            .with_context(|| format!("[io::svg] Failed to write {}", self.path.display()))
    }
}

impl Write for SvgWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> { self.writer.write(buf) }

    fn flush(&mut self) -> std::io::Result<()> { self.writer.flush() }
}

impl SvgStringWriter {
    pub(crate) fn new() -> Self { Self { buffer: Vec::with_capacity(64 * 1024) } }

    /// The document written so far.
    pub(crate) fn into_string(self) -> Result<String> {
        String::from_utf8(self.buffer).context("[io::svg] SVG output is not valid UTF-8")
    }
}

impl Write for SvgStringWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> { Ok(()) }
}

/// Write the XML declaration and opening <svg> tag.
pub(crate) fn write_svg_header<W: Write>(writer: &mut W, width: f64, height: f64) -> Result<()> {
    writeln!(writer, r##"<?xml version="1.0" encoding="UTF-8" standalone="no"?>"##)?;
    writeln!(writer, r##"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"##)?;
    writeln!(writer, r##"<rect width="100%" height="100%" fill="#ffffff"/>"##)?;
    Ok(())
}

/// Write the stylesheet for map, chart and label elements.
pub(crate) fn write_svg_styles<W: Write>(writer: &mut W) -> Result<()> {
    writeln!(writer, r##"<defs>
<style>
    .gratBackground {{ fill: #d5e7f2; }}
    .gratLines {{ fill: none; stroke: #999999; stroke-width: 0.5px; }}
    .countries {{ fill: #f2f0e6; stroke: #999999; stroke-width: 0.5px; }}
    .chartBackground {{ fill: #f8f8f8; }}
    .chartFrame {{ fill: none; stroke: #999999; stroke-width: 3px; }}
    .chartTitle {{ font: 20px sans-serif; font-weight: bold; }}
    .axis text {{ font: 10px sans-serif; }}
    .axis line, .axis path {{ stroke: #333333; fill: none; }}
    .selector {{ font: 14px sans-serif; }}
    .textContent {{ font: 12px sans-serif; fill: #555555; }}
    .infoLabel rect {{ fill: #ffffff; stroke: #aaaaaa; stroke-width: 2px; }}
    .infoLabel text {{ font: 14px sans-serif; }}
</style>
</defs>"##)?;
    Ok(())
}

/// Write the closing </svg> tag.
pub(crate) fn write_svg_footer<W: Write>(writer: &mut W) -> Result<()> {
    writeln!(writer, "</svg>")?;
    Ok(())
}

/// Escape text for use in SVG character data and attribute values.
pub(crate) fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}
