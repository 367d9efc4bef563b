use report_gen::{
    colours, styles, BarcodeFrame, Border, BoxFrame, Extent, FixedFrame, HAlign, LineFrame,
    PageFormat, PdfBackend, Pen, RecordingBackend, Report, ReportError, RowType, SerialFrame,
    StyleSheet, TableFrame, TableRow, TextFrame,
};

#[test]
fn cyclic_reports_produce_nothing() {
    let mut report = Report::default();
    let outer = report.add_to_body(SerialFrame::vertical()).unwrap();
    let inner = report.tree.add(outer, BoxFrame::new()).unwrap();
    report.tree.attach(inner, outer).unwrap();

    let mut backend = RecordingBackend::new();
    let mut out = Vec::new();
    assert!(matches!(
        report.output(&mut backend, &mut out),
        Err(ReportError::Cycle)
    ));
    assert!(backend.ops().is_empty());
    assert!(out.is_empty());
}

#[test]
fn the_display_list_is_written_out() {
    let sheet = StyleSheet::default();
    let mut report = Report::default();
    report
        .add_to_body(TextFrame::new("Title", sheet.resolve(styles::HEADING1)))
        .unwrap();

    let mut backend = RecordingBackend::new();
    let mut out = Vec::new();
    assert_eq!(report.output(&mut backend, &mut out).unwrap(), 1);

    let listing = String::from_utf8(out).unwrap();
    assert!(listing.starts_with("BeginDocument"));
    assert!(listing.contains("Title"));
}

#[test]
fn page_formats_load_from_json() {
    let format: PageFormat = serde_json::from_str(
        r#"{
            "paper": "Letter",
            "orientation": "Landscape",
            "margins": {"top": 12.0, "right": 12.0, "bottom": 12.0, "left": 25.0},
            "mirror_margins": true
        }"#,
    )
    .unwrap();

    let even = format.printable_bounds(2);
    assert_eq!(even.left, 12.0);
    assert!((format.paper_size().width - 279.4).abs() < 0.01);
}

/// An invoice-like report touching every kind of frame the PDF backend draws
fn invoice() -> Report {
    let sheet = StyleSheet::default();
    let mut format = PageFormat::default();
    format.mirror_margins(true);
    let mut report = Report::new(format);
    report.count_pages = true;

    report
        .add_to_header(TextFrame::new("ACME Supplies", sheet.resolve(styles::HEADING2)))
        .unwrap();
    report
        .add_to_header(LineFrame::horizontal(Pen::solid(0.3)))
        .unwrap();
    let footer = report
        .add_to_footer(TextFrame::new(
            "Page [VAR_PAGE] of [VAR_TOTAL_PAGES]",
            sheet.resolve(styles::FOOTER),
        ))
        .unwrap();
    report.tree.base_mut(footer).h_align = HAlign::Right;

    let stamp = report.add_to_body(FixedFrame::overlay(150.0, 20.0)).unwrap();
    report
        .tree
        .add(stamp, BarcodeFrame::new("INV-0042", "code128", 40.0, 12.0))
        .unwrap();

    let address = report
        .add_to_body(
            BoxFrame::sized(80.0, Extent::Auto)
                .border(Border::all(Pen::solid(0.2)))
                .background(colours::SILVER),
        )
        .unwrap();
    report
        .tree
        .add(
            address,
            TextFrame::new("Someone\n1 Long Road\nSomewhere", sheet.resolve(styles::NORMAL)),
        )
        .unwrap();

    let mut table = TableFrame::with_styles(&sheet);
    table.add_column("item", "Item", 100.0, HAlign::Left, 0.0);
    table.add_column("qty", "Qty", 20.0, HAlign::Right, 0.0);
    table.add_column("price", "Price", 30.0, HAlign::Right, 0.0);
    for i in 0..80 {
        table.add_row(
            TableRow::detail()
                .cell("item", lipsum::lipsum_words(3 + i % 5))
                .cell("qty", i % 7 + 1)
                .cell("price", format!("{:.2}", i as f32 * 1.25)),
        );
    }
    table.add_row(
        TableRow::new(RowType::Total)
            .cell("item", "Total")
            .cell("price", "3950.00")
            .join_columns(0, 1),
    );
    report.add_to_body(table).unwrap();
    report
}

#[test]
fn invoices_render_to_pdf() {
    let mut report = invoice();
    let mut backend = PdfBackend::new();
    backend.info.title("Invoice").author("ACME");

    let mut pdf = Vec::new();
    let pages = report.output(&mut backend, &mut pdf).unwrap();
    assert!(pages >= 2);
    assert_eq!(backend.page_count(), pages);
    assert!(pdf.starts_with(b"%PDF-"));
    assert!(String::from_utf8_lossy(&pdf).contains("/Helvetica"));
}

#[test]
fn both_backends_agree_on_structure() {
    let mut recorded = RecordingBackend::new();
    let pages = invoice().render(&mut recorded).unwrap();
    assert_eq!(recorded.page_count(), pages);

    // rendering twice gives the same result
    let mut report = invoice();
    let mut again = RecordingBackend::new();
    report.render(&mut again).unwrap();
    let mut third = RecordingBackend::new();
    report.render(&mut third).unwrap();
    assert_eq!(again.ops(), third.ops());
    assert_eq!(again.ops(), recorded.ops());
}
