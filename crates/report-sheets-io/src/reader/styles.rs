//! Cell styles of `.xlsx` packages (zip + quick-xml)
//!
//! calamine exposes no formatting, so the style parts are read directly:
//! `xl/styles.xml` gives the cellXfs list in file order and every worksheet
//! part gives the `s` index of its cells.

use std::collections::HashMap;
use std::io::{BufReader, Read, Seek};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use report_sheets_core::style::{
    Alignment, BorderEdge, BorderLine, BorderStyle, Color, FillPattern, FillStyle, FontStyle,
    HorizontalAlignment, NumberFormat, Protection, VerticalAlignment,
};
use report_sheets_core::{CellRef, Style};

use crate::error::CodecResult;

/// Style index of every styled cell, keyed by position
pub(crate) type CellStyleMap = HashMap<(u32, u16), u32>;

/// Styles of a package: cellXfs in file order plus per-sheet cell indices
#[derive(Debug, Default)]
pub(crate) struct PackageStyles {
    pub cell_styles: Vec<Style>,
    /// Sheet name to its styled cells
    pub sheets: HashMap<String, CellStyleMap>,
}

/// Read styles.xml and the cell style indices of every worksheet
pub(crate) fn read_package_styles<R: Read + Seek>(reader: R) -> CodecResult<PackageStyles> {
    let mut archive = zip::ZipArchive::new(reader)?;

    let cell_styles = match archive.by_name("xl/styles.xml") {
        Ok(file) => read_styles_xml(file)?,
        Err(_) => vec![Style::default()],
    };

    let sheets = read_workbook_sheets(&mut archive)?;
    let rels = read_workbook_rels(&mut archive)?;

    let mut styled = HashMap::with_capacity(sheets.len());
    for (name, r_id) in sheets {
        let Some(target) = rels.get(&r_id) else {
            log::warn!("Sheet '{name}' has no relationship {r_id}");
            continue;
        };
        let part = part_path(target);
        match archive.by_name(&part) {
            Ok(file) => {
                styled.insert(name, read_cell_styles(file)?);
            }
            Err(err) => log::warn!("Sheet part {part} unreadable: {err}"),
        }
    }

    Ok(PackageStyles {
        cell_styles,
        sheets: styled,
    })
}

fn part_path(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("xl/{target}"),
    }
}

// === Workbook part ===

/// `(sheet name, relationship id)` in workbook order
fn read_workbook_sheets<R: Read + Seek>(
    archive: &mut zip::ZipArchive<R>,
) -> CodecResult<Vec<(String, String)>> {
    let file = archive.by_name("xl/workbook.xml")?;
    let mut xml_reader = Reader::from_reader(BufReader::new(file));
    xml_reader.trim_text(true);

    let mut buf = Vec::new();
    let mut sheets = Vec::new();
    loop {
        match xml_reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"sheet" => {
                let name = attr_string(&e, b"name");
                let r_id = attr_string(&e, b"r:id");
                if let (Some(name), Some(r_id)) = (name, r_id) {
                    sheets.push((name, r_id));
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(sheets)
}

/// Relationship id to target path
fn read_workbook_rels<R: Read + Seek>(
    archive: &mut zip::ZipArchive<R>,
) -> CodecResult<HashMap<String, String>> {
    let file = archive.by_name("xl/_rels/workbook.xml.rels")?;
    let mut xml_reader = Reader::from_reader(BufReader::new(file));
    xml_reader.trim_text(true);

    let mut buf = Vec::new();
    let mut rels = HashMap::new();
    loop {
        match xml_reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                if let (Some(id), Some(target)) = (attr_string(&e, b"Id"), attr_string(&e, b"Target"))
                {
                    rels.insert(id, target);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(rels)
}

// === Worksheet parts ===

/// Non-default `s` indices of the `<c>` elements of one worksheet
pub(crate) fn read_cell_styles<R: Read>(reader: R) -> CodecResult<CellStyleMap> {
    let mut xml_reader = Reader::from_reader(BufReader::new(reader));
    xml_reader.trim_text(true);

    let mut buf = Vec::new();
    let mut cells = CellStyleMap::new();
    loop {
        match xml_reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"c" => {
                let index = attr_parse::<u32>(&e, b"s").unwrap_or(0);
                if index > 0 {
                    match attr_string(&e, b"r").map(|r| CellRef::parse(&r)) {
                        Some(Ok(cell)) => {
                            cells.insert((cell.row, cell.col), index);
                        }
                        _ => log::debug!("Skipped styled cell without a usable reference"),
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(cells)
}

// === styles.xml ===

#[derive(Debug, Clone, Copy)]
enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

#[derive(Debug, Default)]
struct XfIds {
    num_fmt: u32,
    font: u32,
    fill: u32,
    border: u32,
    quote_prefix: bool,
    alignment: Alignment,
    protection: Protection,
}

/// Parser state for styles.xml; `<dxfs>` and `<cellStyleXfs>` are skipped
#[derive(Default)]
struct StylesParser {
    numfmts: HashMap<u32, String>,
    fonts: Vec<FontStyle>,
    fills: Vec<FillStyle>,
    borders: Vec<BorderStyle>,
    cell_xfs: Vec<Style>,

    skip_depth: usize,
    in_cell_xfs: bool,
    font: Option<FontStyle>,
    fill: Option<FillStyle>,
    border: Option<BorderStyle>,
    edge: Option<Edge>,
    xf: Option<XfIds>,
}

/// Cell styles (cellXfs) of a styles.xml part, in file order
pub(crate) fn read_styles_xml<R: Read>(reader: R) -> CodecResult<Vec<Style>> {
    let mut xml_reader = Reader::from_reader(BufReader::new(reader));
    xml_reader.trim_text(true);

    let mut parser = StylesParser::default();
    let mut buf = Vec::new();
    loop {
        match xml_reader.read_event_into(&mut buf)? {
            Event::Start(e) => parser.open(&e),
            Event::Empty(e) => {
                parser.open(&e);
                parser.close(e.local_name().as_ref());
            }
            Event::End(e) => parser.close(e.local_name().as_ref()),
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if parser.cell_xfs.is_empty() {
        return Ok(vec![Style::default()]);
    }
    Ok(parser.cell_xfs)
}

impl StylesParser {
    fn open(&mut self, e: &BytesStart<'_>) {
        let name = e.local_name();
        let name = name.as_ref();
        if self.skip_depth > 0 || matches!(name, b"dxfs" | b"cellStyleXfs" | b"extLst") {
            self.skip_depth += 1;
            return;
        }

        match name {
            b"numFmt" => {
                if let (Some(id), Some(code)) =
                    (attr_parse::<u32>(e, b"numFmtId"), attr_string(e, b"formatCode"))
                {
                    self.numfmts.insert(id, code);
                }
            }

            // === Fonts ===
            b"font" => self.font = Some(FontStyle::default()),
            b"b" | b"i" | b"strike" | b"u" => {
                if let Some(font) = self.font.as_mut() {
                    let on = attr_string(e, b"val")
                        .map_or(true, |v| !matches!(v.as_str(), "0" | "false" | "none"));
                    match name {
                        b"b" => font.bold = on,
                        b"i" => font.italic = on,
                        b"strike" => font.strikethrough = on,
                        _ => font.underline = on,
                    }
                }
            }
            b"sz" => {
                if let (Some(font), Some(size)) = (self.font.as_mut(), attr_parse::<f64>(e, b"val")) {
                    font.size = size;
                }
            }
            b"name" => {
                if let (Some(font), Some(family)) = (self.font.as_mut(), attr_string(e, b"val")) {
                    font.name = family;
                }
            }
            b"color" => {
                let color = parse_color(e);
                if let Some(font) = self.font.as_mut() {
                    font.color = color;
                } else if let (Some(border), Some(edge)) = (self.border.as_mut(), self.edge) {
                    edge_mut(border, edge).color = color;
                }
            }

            // === Fills ===
            b"fill" => self.fill = Some(FillStyle::default()),
            b"patternFill" => {
                if let Some(fill) = self.fill.as_mut() {
                    fill.pattern = attr_string(e, b"patternType")
                        .and_then(|p| pattern_of(&p))
                        .unwrap_or_default();
                }
            }
            b"fgColor" => {
                if let Some(fill) = self.fill.as_mut() {
                    fill.foreground = parse_color(e);
                }
            }
            b"bgColor" => {
                if let Some(fill) = self.fill.as_mut() {
                    fill.background = parse_color(e);
                }
            }

            // === Borders ===
            b"border" => self.border = Some(BorderStyle::default()),
            b"left" | b"right" | b"top" | b"bottom" => {
                if let Some(border) = self.border.as_mut() {
                    let edge = match name {
                        b"left" => Edge::Left,
                        b"right" => Edge::Right,
                        b"top" => Edge::Top,
                        _ => Edge::Bottom,
                    };
                    let line = attr_string(e, b"style")
                        .and_then(|s| border_line_of(&s))
                        .unwrap_or_default();
                    *edge_mut(border, edge) = BorderEdge::new(line, Color::Auto);
                    self.edge = Some(edge);
                }
            }

            // === Cell formats ===
            b"cellXfs" => self.in_cell_xfs = true,
            b"xf" if self.in_cell_xfs => {
                self.xf = Some(XfIds {
                    num_fmt: attr_parse(e, b"numFmtId").unwrap_or(0),
                    font: attr_parse(e, b"fontId").unwrap_or(0),
                    fill: attr_parse(e, b"fillId").unwrap_or(0),
                    border: attr_parse(e, b"borderId").unwrap_or(0),
                    quote_prefix: attr_string(e, b"quotePrefix").as_deref() == Some("1"),
                    ..XfIds::default()
                });
            }
            b"alignment" => {
                if let Some(xf) = self.xf.as_mut() {
                    read_alignment(e, &mut xf.alignment);
                }
            }
            b"protection" => {
                if let Some(xf) = self.xf.as_mut() {
                    if let Some(locked) = attr_string(e, b"locked") {
                        xf.protection.locked = locked == "1" || locked == "true";
                    }
                    if let Some(hidden) = attr_string(e, b"hidden") {
                        xf.protection.hidden = hidden == "1" || hidden == "true";
                    }
                }
            }
            _ => {}
        }
    }

    fn close(&mut self, name: &[u8]) {
        if self.skip_depth > 0 {
            self.skip_depth -= 1;
            return;
        }
        match name {
            b"font" => {
                if let Some(font) = self.font.take() {
                    self.fonts.push(font);
                }
            }
            b"fill" => {
                if let Some(fill) = self.fill.take() {
                    self.fills.push(fill);
                }
            }
            b"border" => {
                if let Some(border) = self.border.take() {
                    self.borders.push(border);
                }
                self.edge = None;
            }
            b"left" | b"right" | b"top" | b"bottom" => self.edge = None,
            b"xf" => {
                if let Some(xf) = self.xf.take() {
                    let style = self.resolve(xf);
                    self.cell_xfs.push(style);
                }
            }
            b"cellXfs" => self.in_cell_xfs = false,
            _ => {}
        }
    }

    fn resolve(&self, xf: XfIds) -> Style {
        let number_format = if xf.num_fmt == 0 {
            NumberFormat::General
        } else if let Some(code) = self.numfmts.get(&xf.num_fmt) {
            NumberFormat::from_pattern(code)
        } else {
            NumberFormat::BuiltIn(xf.num_fmt)
        };
        let mut fill = self.fills.get(xf.fill as usize).copied().unwrap_or_default();
        // the reserved gray125 fill renders as no fill
        if fill.pattern == FillPattern::Gray125 && xf.fill == 1 {
            fill = FillStyle::default();
        }

        Style {
            font: self.fonts.get(xf.font as usize).cloned().unwrap_or_default(),
            fill,
            border: self.borders.get(xf.border as usize).copied().unwrap_or_default(),
            alignment: xf.alignment,
            number_format,
            protection: xf.protection,
            quote_prefix: xf.quote_prefix,
        }
    }
}

fn edge_mut(border: &mut BorderStyle, edge: Edge) -> &mut BorderEdge {
    match edge {
        Edge::Left => &mut border.left,
        Edge::Right => &mut border.right,
        Edge::Top => &mut border.top,
        Edge::Bottom => &mut border.bottom,
    }
}

fn read_alignment(e: &BytesStart<'_>, alignment: &mut Alignment) {
    if let Some(h) = attr_string(e, b"horizontal") {
        alignment.horizontal = match h.as_str() {
            "left" => HorizontalAlignment::Left,
            "center" => HorizontalAlignment::Center,
            "right" => HorizontalAlignment::Right,
            "fill" => HorizontalAlignment::Fill,
            "justify" => HorizontalAlignment::Justify,
            "centerContinuous" => HorizontalAlignment::CenterContinuous,
            "distributed" => HorizontalAlignment::Distributed,
            _ => HorizontalAlignment::General,
        };
    }
    if let Some(v) = attr_string(e, b"vertical") {
        alignment.vertical = match v.as_str() {
            "top" => VerticalAlignment::Top,
            "center" => VerticalAlignment::Center,
            "justify" => VerticalAlignment::Justify,
            "distributed" => VerticalAlignment::Distributed,
            _ => VerticalAlignment::Bottom,
        };
    }
    if let Some(wrap) = attr_string(e, b"wrapText") {
        alignment.wrap_text = wrap == "1" || wrap == "true";
    }
    alignment.rotation = attr_parse(e, b"textRotation").unwrap_or(alignment.rotation);
    alignment.indent = attr_parse(e, b"indent").unwrap_or(alignment.indent);
}

/// Explicit `rgb` colors only; theme and indexed colors read as automatic
fn parse_color(e: &BytesStart<'_>) -> Color {
    attr_string(e, b"rgb")
        .and_then(|rgb| Color::from_hex(&rgb))
        .unwrap_or_default()
}

fn pattern_of(s: &str) -> Option<FillPattern> {
    Some(match s {
        "none" => FillPattern::None,
        "solid" => FillPattern::Solid,
        "mediumGray" => FillPattern::MediumGray,
        "darkGray" => FillPattern::DarkGray,
        "lightGray" => FillPattern::LightGray,
        "darkHorizontal" => FillPattern::DarkHorizontal,
        "darkVertical" => FillPattern::DarkVertical,
        "darkDown" => FillPattern::DarkDown,
        "darkUp" => FillPattern::DarkUp,
        "darkGrid" => FillPattern::DarkGrid,
        "darkTrellis" => FillPattern::DarkTrellis,
        "lightHorizontal" => FillPattern::LightHorizontal,
        "lightVertical" => FillPattern::LightVertical,
        "lightDown" => FillPattern::LightDown,
        "lightUp" => FillPattern::LightUp,
        "lightGrid" => FillPattern::LightGrid,
        "lightTrellis" => FillPattern::LightTrellis,
        "gray125" => FillPattern::Gray125,
        "gray0625" => FillPattern::Gray0625,
        _ => return None,
    })
}

fn border_line_of(s: &str) -> Option<BorderLine> {
    Some(match s {
        "none" => BorderLine::None,
        "thin" => BorderLine::Thin,
        "medium" => BorderLine::Medium,
        "dashed" => BorderLine::Dashed,
        "dotted" => BorderLine::Dotted,
        "thick" => BorderLine::Thick,
        "double" => BorderLine::Double,
        "hair" => BorderLine::Hair,
        "mediumDashed" => BorderLine::MediumDashed,
        "dashDot" => BorderLine::DashDot,
        "mediumDashDot" => BorderLine::MediumDashDot,
        "dashDotDot" => BorderLine::DashDotDot,
        "mediumDashDotDot" => BorderLine::MediumDashDotDot,
        "slantDashDot" => BorderLine::SlantDashDot,
        _ => return None,
    })
}

fn attr_string(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .and_then(|attr| {
            // Equivalent of `Attribute::unescape_value`, which quick-xml hides when
            // its `encoding` feature is enabled (calamine turns it on).
            std::str::from_utf8(&attr.value)
                .ok()
                .and_then(|v| quick_xml::escape::unescape(v).ok().map(|v| v.into_owned()))
        })
}

fn attr_parse<T: std::str::FromStr>(e: &BytesStart<'_>, key: &[u8]) -> Option<T> {
    attr_string(e, key).and_then(|v| v.parse().ok())
}
