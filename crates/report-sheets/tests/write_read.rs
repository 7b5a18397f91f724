//! Writing cells through the cursor and reading them back

use pretty_assertions::assert_eq;
use report_sheets::prelude::*;
use report_sheets::DocumentHandle;
use report_sheets_core::{CellValue, Color, FillPattern, Style, StyleId, StyleTable};
use serde_json::json;

fn contacts() -> SheetWriter {
    let mut writer = SheetWriter::new("Contacts", Options::default()).unwrap();
    let rows: [[Option<&str>; 3]; 3] = [
        [Some("Name"), Some("Phone"), Some("Email")],
        [Some("Ann"), Some("187-0000-0000"), Some("ann@example.com")],
        [Some("Bob"), Some("42"), None],
    ];
    for (index, values) in rows.iter().enumerate() {
        writer.row(index as u32).unwrap();
        for (col, value) in values.iter().enumerate() {
            writer.cell(col as u16).unwrap().write_text(*value).unwrap();
        }
    }
    writer
}

#[test]
fn test_null_write_keeps_style() {
    let mut writer = SheetWriter::new("Report", Options::default()).unwrap();
    writer
        .row(0)
        .unwrap()
        .cell(0)
        .unwrap()
        .append_style(&mut CellStyles::new().fill_color(Colors::Red))
        .unwrap()
        .write_text(Some("x"))
        .unwrap();
    let styled = writer.document().current_cell().unwrap().style;
    assert_ne!(styled, StyleId::DEFAULT);

    writer.write_text(None).unwrap();
    let cell = writer.document().current_cell().unwrap();
    assert_eq!(cell.value, CellValue::Blank);
    assert_eq!(cell.style, styled);
    assert!(writer.is_blank());
}

#[test]
fn test_style_cache_clones_once() {
    let mut source = StyleTable::new();
    source.push(Style::new().number_format("0.00%"));
    let mut writer = SheetWriter::new("Report", Options::default()).unwrap();
    writer.set_clone_styles(source);

    let data = Cell::new().with_sindex(1).with_type(DataType::Percent).with_value(0.25);
    writer.row(0).unwrap().cell(0).unwrap().write(&data).unwrap();
    writer.cell(1).unwrap().write(&data).unwrap();

    let sheet = writer.document().worksheet().unwrap();
    let first = sheet.cell(0, 0).unwrap().style;
    assert_ne!(first, StyleId::DEFAULT);
    assert_eq!(sheet.cell(0, 1).unwrap().style, first);
    assert_eq!(writer.document().style_cache().unwrap().len(), 1);

    writer.cell(0).unwrap();
    assert_eq!(writer.data_type(), Some(DataType::Percent));
    assert_eq!(writer.value(true), Some(json!("25.00%")));
}

#[test]
fn test_write_without_style_cache_skips_style() {
    let mut writer = SheetWriter::new("Report", Options::default()).unwrap();
    let data = Cell::new().with_sindex(3).with_text("plain");
    writer.row(0).unwrap().cell(0).unwrap().write(&data).unwrap();

    let cell = writer.document().current_cell().unwrap();
    assert_eq!(cell.style, StyleId::DEFAULT);
    assert_eq!(cell.value, CellValue::text("plain"));

    let err = writer.write_style_index(Some(3)).unwrap_err();
    assert!(matches!(err, Error::MissingRequiredCollaborator(_)));
}

#[test]
fn test_iteration_stops_after_last_row() {
    let mut writer = SheetWriter::new("Data", Options::default()).unwrap();
    writer.row(0).unwrap().cell(0).unwrap().write_text(Some("Id")).unwrap();
    for i in 1..=5 {
        writer.row(i).unwrap().cell(0).unwrap().write_number(Some(f64::from(i))).unwrap();
    }

    let mut reader = SheetReader::from_workbook(writer.into_workbook());
    reader.sheet(0).unwrap().row(0).unwrap();
    let mut count = 0;
    let mut last = None;
    while reader.has_next_or(|index| last = Some(index)).unwrap() {
        count += 1;
    }
    assert_eq!(count, 5);
    assert_eq!(last, Some(5));
    assert!(reader.has_end().unwrap());
}

#[test]
fn test_row_objects() {
    let mut reader = SheetReader::from_workbook(contacts().into_workbook());
    reader.sheet_by_name("Contacts").unwrap().row(0).unwrap();

    let headers = reader.headers().unwrap();
    let labels: Vec<_> = headers.iter().filter_map(|h| h.label.as_deref()).collect();
    assert_eq!(labels, vec!["Name", "Phone", "Email"]);

    let map = reader.map_headers().unwrap();
    assert_eq!(map.get("Email"), Some(&2));

    reader.next().unwrap().unwrap();
    let row = reader.row_object(&headers).unwrap();
    assert_eq!(row.cell_at(1).and_then(|c| c.text.as_deref()), Some("187-0000-0000"));
    let by_map = reader.row_object_by_map(&map).unwrap();
    assert_eq!(by_map.get("Name"), Some(&Some("Ann".to_string())));

    reader.next().unwrap().unwrap();
    assert_eq!(
        reader.row_json_object(&headers).unwrap(),
        json!({"Name": "Bob", "Phone": "42"})
    );
    assert!(reader.next().unwrap().is_none());
}

#[test]
fn test_save_and_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("contacts.xlsx");
    let saved = contacts().save_workbook(&path).unwrap();
    assert!(saved.exists());

    let mut reader = SheetReader::open(&saved, None).unwrap();
    assert_eq!(reader.sheet_count(), 1);
    reader.sheet(0).unwrap().row(0).unwrap();
    let headers = reader.headers().unwrap();

    let mut rows = Vec::new();
    while let Some(row) = reader.next().unwrap() {
        rows.push(row.row_json_object(&headers).unwrap());
    }
    assert_eq!(
        rows,
        vec![
            json!({"Name": "Ann", "Phone": "187-0000-0000", "Email": "ann@example.com"}),
            json!({"Name": "Bob", "Phone": "42"}),
        ]
    );
}

#[test]
fn test_rewriter_edits_opened_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = contacts().save_workbook(dir.path().join("contacts.xlsx")).unwrap();

    let mut rewriter = Rewriter::open(&path, Options::default(), None).unwrap();
    rewriter.sheet(0).unwrap().row(2).unwrap().cell(2).unwrap();
    assert!(rewriter.is_blank());
    rewriter.write_text(Some("bob@example.com")).unwrap();
    rewriter.row_of_new(3).unwrap().cell_of_new(0).unwrap().write_text(Some("Cid")).unwrap();
    rewriter.save_workbook(&path).unwrap();

    let mut reader = SheetReader::open(&path, None).unwrap();
    reader.sheet(0).unwrap().row(2).unwrap().cell(2).unwrap();
    assert_eq!(reader.string_value().as_deref(), Some("bob@example.com"));
    reader.row(3).unwrap().cell(0).unwrap();
    assert_eq!(reader.string_value().as_deref(), Some("Cid"));
}

fn styled_template(dir: &std::path::Path) -> std::path::PathBuf {
    let mut writer = SheetWriter::new("Template", Options::default()).unwrap();
    writer.row(0).unwrap().cell(0).unwrap().write_text(Some("plain")).unwrap();
    writer
        .cell(1)
        .unwrap()
        .append_style(&mut CellStyles::new().fill_color(Colors::Red))
        .unwrap()
        .write_text(Some("Total"))
        .unwrap();
    writer.save_workbook(dir.join("template.xlsx")).unwrap()
}

#[test]
fn test_clone_styles_from_saved_template() {
    let dir = tempfile::tempdir().unwrap();
    let template = styled_template(dir.path());

    let mut report = SheetWriter::new("Report", Options::default()).unwrap();
    report.set_clone_styles_from(&template).unwrap();
    report
        .row(0)
        .unwrap()
        .cell(0)
        .unwrap()
        .write(&Cell::new().with_sindex(1).with_text("42"))
        .unwrap();

    let document = report.document();
    let style = document.current_cell().unwrap().style;
    assert_ne!(style, StyleId::DEFAULT);
    let fill = document.workbook().styles().resolve(style).fill;
    assert_eq!(fill.pattern, FillPattern::Solid);
    assert_eq!(fill.foreground, Color::RED);
}

#[test]
fn test_rewriter_keeps_template_styles() {
    let dir = tempfile::tempdir().unwrap();
    let template = styled_template(dir.path());

    let mut rewriter = Rewriter::open(&template, Options::default(), None).unwrap();
    rewriter.sheet(0).unwrap().row(0).unwrap().cell(0).unwrap();
    assert_eq!(rewriter.style_index(), Some(0));
    rewriter.cell(1).unwrap();
    let sindex = rewriter.style_index().unwrap();
    assert_ne!(sindex, 0);
    rewriter.write_text(Some("Grand total")).unwrap();
    rewriter.save_workbook(&template).unwrap();

    let mut reader = SheetReader::open(&template, None).unwrap();
    reader.sheet(0).unwrap().row(0).unwrap().cell(1).unwrap();
    assert_eq!(reader.string_value().as_deref(), Some("Grand total"));
    assert_eq!(reader.style_index(), Some(sindex));
    let style = reader.document().current_cell().unwrap().style;
    let fill = reader.document().workbook().styles().resolve(style).fill;
    assert_eq!(fill.foreground, Color::RED);
}

#[test]
fn test_open_accepts_uppercase_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = contacts().save_workbook(dir.path().join("CONTACTS.XLSX")).unwrap();

    let mut reader = SheetReader::open(&path, None).unwrap();
    reader.sheet(0).unwrap().row(1).unwrap().cell(0).unwrap();
    assert_eq!(reader.string_value().as_deref(), Some("Ann"));
    assert!(Rewriter::open(&path, Options::default(), None).is_ok());
}

#[test]
fn test_open_rejects_unknown_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contacts.ods");
    std::fs::write(&path, b"not a workbook").unwrap();
    assert!(matches!(
        SheetReader::open(&path, None).unwrap_err(),
        Error::UnsupportedFormat(_)
    ));
}
