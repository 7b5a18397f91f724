//! Save a workbook and read it back

use pretty_assertions::assert_eq;
use report_sheets_core::{
    CellComment, CellRegion, CellValue, Color, DataValidation, FillPattern, SheetProtection, Style,
    StyleId, Workbook,
};
use report_sheets_io::{save, ReadOptions, WorkbookReader, WorkbookWriter};
use tempfile::TempDir;

fn sample() -> Workbook {
    let mut workbook = Workbook::new();
    let date = workbook
        .styles_mut()
        .intern(Style::new().number_format("yyyy-mm-dd"));
    let bold = workbook.styles_mut().intern(Style::new().bold(true));

    let sheet = workbook.worksheet_mut(0).unwrap();
    sheet.set_value(0, 0, CellValue::text("Name")).unwrap();
    sheet.set_style(0, 0, bold).unwrap();
    sheet.set_value(0, 1, CellValue::text("Score")).unwrap();
    sheet.set_value(1, 0, CellValue::text("Ann")).unwrap();
    sheet.set_value(1, 1, CellValue::Number(41.0)).unwrap();
    sheet
        .set_value(1, 2, CellValue::formula_with_result("B2*2", CellValue::Number(82.0)))
        .unwrap();
    sheet.set_value(2, 0, CellValue::Boolean(true)).unwrap();
    sheet.set_value(2, 1, CellValue::Number(45_292.0)).unwrap();
    sheet.set_style(2, 1, date).unwrap();
    sheet.set_value(3, 7, CellValue::text("merged")).unwrap();
    sheet.add_merged_region(CellRegion::parse("H4:I4").unwrap()).unwrap();
    sheet.set_comment(0, 1, CellComment::new("report", "points").anchored_at(0, 1));
    sheet.add_validation(
        DataValidation::list(["A", "B"]).on(CellRegion::parse("D2:D5").unwrap()),
    );
    sheet.set_freeze_panes(1, 0);
    sheet.protect(SheetProtection::new("secret"));

    let hidden = workbook.add_worksheet_with_name("Lists").unwrap();
    workbook
        .worksheet_mut(hidden)
        .unwrap()
        .set_value(0, 0, CellValue::text("A"))
        .unwrap();
    workbook.set_sheet_hidden(hidden, true).unwrap();
    workbook.define_name("Grades", "Lists!$A$1:$A$2").unwrap();
    workbook
}

#[test]
fn test_save_and_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out").join("report.xlsx");

    let written = save(&sample(), &path).unwrap();
    assert_eq!(written, path);

    let workbook = WorkbookReader::read_file(&path, &ReadOptions::default()).unwrap();
    assert_eq!(workbook.sheet_count(), 2);

    let sheet = workbook.worksheet(0).unwrap();
    assert_eq!(sheet.name(), "Sheet1");
    assert_eq!(sheet.cell(0, 0).unwrap().value, CellValue::text("Name"));
    assert_eq!(sheet.cell(1, 1).unwrap().value, CellValue::Number(41.0));
    assert_eq!(sheet.cell(2, 0).unwrap().value, CellValue::Boolean(true));

    let formula = &sheet.cell(1, 2).unwrap().value;
    assert_eq!(formula.formula_text(), Some("B2*2"));
    assert_eq!(formula.effective(), &CellValue::Number(82.0));

    let dated = sheet.cell(2, 1).unwrap();
    assert_eq!(dated.value, CellValue::Number(45_292.0));
    assert!(workbook
        .styles()
        .resolve(dated.style)
        .number_format
        .is_date_format());

    assert!(sheet.contains_merged_region(&CellRegion::parse("H4:I4").unwrap()));
    assert_eq!(sheet.cell(3, 7).unwrap().value, CellValue::text("merged"));

    let lists = workbook.worksheet(1).unwrap();
    assert_eq!(lists.name(), "Lists");
    assert!(!lists.is_visible());

    let grades = workbook.names().get("Grades").unwrap();
    assert_eq!(grades.refers_to, "Lists!$A$1:$A$2");
}

#[test]
fn test_cell_styles_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("styled.xlsx");
    save(&sample(), &path).unwrap();

    let workbook = WorkbookReader::read_file(&path, &ReadOptions::default()).unwrap();
    assert_eq!(workbook.styles().resolve(StyleId::DEFAULT), &Style::default());

    let sheet = workbook.worksheet(0).unwrap();
    let header = sheet.cell(0, 0).unwrap().style;
    assert_ne!(header, StyleId::DEFAULT);
    assert!(workbook.styles().resolve(header).font.bold);

    // a plain cell keeps the default entry
    assert_eq!(sheet.cell(1, 0).unwrap().style, StyleId::DEFAULT);
}

#[test]
fn test_styled_blank_cells_are_read() {
    let mut workbook = Workbook::new();
    let filled = workbook
        .styles_mut()
        .intern(Style::new().fill_color(Color::rgb(0xFF, 0xFF, 0x00)).locked(false));
    workbook.worksheet_mut(0).unwrap().set_style(4, 2, filled).unwrap();

    let dir = TempDir::new().unwrap();
    let path = save(&workbook, dir.path().join("blank.xlsx")).unwrap();
    let reopened = WorkbookReader::read_file(&path, &ReadOptions::default()).unwrap();

    let cell = reopened.worksheet(0).unwrap().cell(4, 2).unwrap();
    assert!(cell.value.is_blank());
    let style = reopened.styles().resolve(cell.style);
    assert_eq!(style.fill.pattern, FillPattern::Solid);
    assert_eq!(style.fill.foreground, Color::rgb(0xFF, 0xFF, 0x00));
    assert!(!style.protection.locked);
}

#[test]
fn test_to_buffer_writes_zip_container() {
    let bytes = WorkbookWriter::to_buffer(&sample()).unwrap();
    assert_eq!(&bytes[..2], b"PK");
}

#[test]
fn test_save_rejects_other_extensions() {
    let dir = TempDir::new().unwrap();
    assert!(save(&Workbook::new(), dir.path().join("report.xls")).is_err());
    assert!(save(&Workbook::new(), dir.path().join("report.txt")).is_err());
}

#[cfg(unix)]
#[test]
fn test_save_sets_file_mode() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mode.xlsx");
    report_sheets_io::save_with_mode(&Workbook::new(), &path, 0o600).unwrap();
    let mode = std::fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let result = WorkbookReader::read_file(dir.path().join("none.xlsx"), &ReadOptions::default());
    assert!(result.is_err());
}

fn sheet_xml(path: &std::path::Path) -> String {
    use std::io::Read;
    let mut archive = zip::ZipArchive::new(std::fs::File::open(path).unwrap()).unwrap();
    let mut xml = String::new();
    archive
        .by_name("xl/worksheets/sheet1.xml")
        .unwrap()
        .read_to_string(&mut xml)
        .unwrap();
    xml
}

/// Opening tag of the element that starts with `prefix`
fn element<'a>(xml: &'a str, prefix: &str) -> &'a str {
    let start = xml.find(prefix).unwrap_or_else(|| panic!("{prefix} not in sheet"));
    let end = xml[start..].find('>').unwrap() + start;
    &xml[start..=end]
}

#[test]
fn test_collapsed_groups_are_saved_hidden() {
    let mut workbook = Workbook::new();
    let sheet = workbook.worksheet_mut(0).unwrap();
    sheet.set_value(0, 0, CellValue::text("top")).unwrap();
    sheet.group_rows(2, 3, true).unwrap();
    sheet.group_rows(6, 7, false).unwrap();
    sheet.group_columns(1, 1, true).unwrap();

    let dir = TempDir::new().unwrap();
    let path = save(&workbook, dir.path().join("groups.xlsx")).unwrap();
    let xml = sheet_xml(&path);

    assert!(element(&xml, "<row r=\"3\"").contains("hidden=\"1\""));
    assert!(element(&xml, "<row r=\"4\"").contains("hidden=\"1\""));
    assert!(!xml.contains("<row r=\"7\""));
    assert!(element(&xml, "<col min=\"2\"").contains("hidden=\"1\""));
}
