//! Integration tests for decoding PDF pages into text units.

mod common;

use common::{pdf, pdf_with_specs, show, show_rgb, PageSpec};
use pdfdiff::error::Error;
use pdfdiff::{FontNameTable, PageSelection, ParseOptions, PdfParser, Rgb};

fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 0.01,
        "expected {}, got {}",
        expected,
        actual
    );
}

#[test]
fn test_open_reports_pages_and_version() {
    let data = pdf(&[&show("F1", 12.0, 72.0, 700.0, "One"), &show("F1", 12.0, 72.0, 700.0, "Two")]);
    let parser = PdfParser::from_bytes(&data).unwrap();

    assert_eq!(parser.page_count(), 2);
    assert_eq!(parser.page_numbers(), vec![1, 2]);
    assert_eq!(parser.version(), "1.5");
}

#[test]
fn test_extract_single_unit() {
    let data = pdf(&[&show("F1", 12.0, 72.0, 700.0, "Hello World")]);
    let parser = PdfParser::from_bytes(&data).unwrap();

    let units = parser.extract_units(1).unwrap();
    assert_eq!(units.len(), 1);
    let unit = &units[0];
    assert_eq!(unit.text, "Hello World");
    assert_eq!(unit.font_name, "Helvetica");
    assert_close(unit.font_size, 12.0);
    assert_eq!(unit.color, Rgb::BLACK);

    // Baseline 700 from the bottom of a 792pt page, ascent 0.8em
    assert_close(unit.bbox.x0, 72.0);
    assert_close(unit.bbox.y0, 792.0 - 700.0 - 9.6);
    assert_close(unit.bbox.y1, 792.0 - 700.0 + 2.4);
    // No Widths entry: 500/1000 em per glyph
    assert_close(unit.bbox.width(), 11.0 * 6.0);
}

#[test]
fn test_declared_widths_and_subset_names() {
    let data = pdf(&[&show("F3", 10.0, 100.0, 500.0, "abc")]);
    let parser = PdfParser::from_bytes(&data).unwrap();

    let unit = &parser.extract_units(1).unwrap()[0];
    assert_eq!(unit.font_name, "Courier");
    assert_close(unit.bbox.width(), 3.0 * 6.0);

    let verbatim = ParseOptions::new().with_font_names(FontNameTable::verbatim());
    let parser = PdfParser::from_bytes_with_options(&data, verbatim).unwrap();
    assert_eq!(parser.extract_units(1).unwrap()[0].font_name, "ABCDEF+Courier");
}

#[test]
fn test_fill_colour_and_graphics_state() {
    let content = format!(
        "{}{}",
        show_rgb("F1", 12.0, 72.0, 700.0, "Warning", [1.0, 0.0, 0.0]),
        show("F1", 12.0, 72.0, 600.0, "Normal")
    );
    let data = pdf(&[&content]);
    let units = PdfParser::from_bytes(&data).unwrap().extract_units(1).unwrap();

    assert_eq!(units[0].text, "Warning");
    assert_eq!(units[0].color, Rgb::new(1.0, 0.0, 0.0));
    // Q restores the fill colour
    assert_eq!(units[1].color, Rgb::BLACK);
}

#[test]
fn test_runs_on_one_line_coalesce() {
    let content = "BT /F1 10 Tf 72 700 Td (Total:) Tj ( 42) Tj ET\n";
    let data = pdf(&[content]);

    let units = PdfParser::from_bytes(&data).unwrap().extract_units(1).unwrap();
    assert_eq!(units.len(), 1);
    assert_eq!(units[0].text, "Total: 42");

    let per_run = ParseOptions::new().with_coalesce_runs(false);
    let units = PdfParser::from_bytes_with_options(&data, per_run)
        .unwrap()
        .extract_units(1)
        .unwrap();
    let texts: Vec<&str> = units.iter().map(|u| u.text.as_str()).collect();
    assert_eq!(texts, vec!["Total:", "42"]);
}

#[test]
fn test_tj_array_word_spacing() {
    let content = "BT /F1 10 Tf 72 700 Td [(Hello) -300 (World)] TJ ET\n";
    let data = pdf(&[content]);

    let units = PdfParser::from_bytes(&data).unwrap().extract_units(1).unwrap();
    assert_eq!(units[0].text, "Hello World");
}

#[test]
fn test_text_matrix_scales_font_size() {
    let content = "BT /F1 1 Tf 18 0 0 18 72 700 Tm (Heading) Tj ET\n";
    let data = pdf(&[content]);

    let unit = &PdfParser::from_bytes(&data).unwrap().extract_units(1).unwrap()[0];
    assert_close(unit.font_size, 18.0);
    assert_close(unit.bbox.x0, 72.0);
}

#[test]
fn test_media_box_inherited_or_overridden() {
    let data = pdf_with_specs(&[
        PageSpec::new(show("F1", 12.0, 72.0, 700.0, "Letter")),
        PageSpec::new(show("F1", 12.0, 72.0, 300.0, "Small")).with_media_box([0, 0, 400, 400]),
    ]);
    let parser = PdfParser::from_bytes(&data).unwrap();

    assert_eq!(parser.decode_page(1).unwrap().dimensions(), (612.0, 792.0));
    let small = parser.decode_page(2).unwrap();
    assert_eq!(small.dimensions(), (400.0, 400.0));
    assert_close(small.runs[0].bbox.y0, 400.0 - 300.0 - 9.6);
}

#[test]
fn test_empty_page_has_no_units() {
    let data = pdf(&[""]);
    let parser = PdfParser::from_bytes(&data).unwrap();
    assert!(parser.extract_units(1).unwrap().is_empty());
}

#[test]
fn test_page_out_of_range() {
    let data = pdf(&[&show("F1", 12.0, 72.0, 700.0, "Only")]);
    let parser = PdfParser::from_bytes(&data).unwrap();
    assert!(matches!(
        parser.extract_units(5),
        Err(Error::PageOutOfRange(5, 1))
    ));
}

#[test]
fn test_open_from_path_and_reader() {
    let dir = tempfile::tempdir().unwrap();
    let data = pdf(&[&show("F1", 12.0, 72.0, 700.0, "On disk")]);
    let path = common::write_pdf(dir.path(), "doc.pdf", &data);

    let parser = PdfParser::open(&path).unwrap();
    assert_eq!(parser.extract_units(1).unwrap()[0].text, "On disk");
    // Kept for rasterizers that render the real page
    assert_eq!(parser.source(), Some(data.as_slice()));

    let file = std::fs::File::open(&path).unwrap();
    let parser = PdfParser::from_reader(file).unwrap();
    assert_eq!(parser.page_count(), 1);
}

#[test]
fn test_rejects_non_pdf_input() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, "plain text, not a document").unwrap();

    let err = PdfParser::open(&path).err().unwrap();
    assert!(matches!(err, Error::UnknownFormat));
    assert!(err.is_input_error());
}

#[test]
fn test_page_selection_in_options() {
    let options = ParseOptions::new().with_pages(PageSelection::parse("2").unwrap());
    let data = pdf(&["", ""]);
    let parser = PdfParser::from_bytes_with_options(&data, options).unwrap();
    assert!(!parser.options().pages.includes(1));
    assert!(parser.options().pages.includes(2));
}
