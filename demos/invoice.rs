use report_gen::{
    colours, styles, BarcodeFrame, Border, BoxFrame, Extent, FixedFrame, HAlign, LineFrame,
    PageFormat, PdfBackend, Pen, Report, RowType, StyleSheet, TableFrame, TableRow, TextFrame,
};

/// Lays out a long invoice and writes it to `invoice.pdf`.
///
/// Pass the path of a TrueType font to set the body in it instead of the
/// built-in Helvetica.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut backend = PdfBackend::new();
    backend
        .info
        .title("Invoice INV-0042")
        .author("ACME Supplies")
        .subject("Development Test / Example");

    let mut sheet = StyleSheet::default();
    if let Some(path) = std::env::args().nth(1) {
        let id = backend.load_font(&path)?;
        let family = backend.font(id).map(|f| f.family().to_string());
        if let Some(family) = family {
            let normal = sheet.get(styles::NORMAL).cloned().unwrap_or_default();
            sheet.insert(styles::NORMAL, normal.font_family(family));
        }
    }

    let mut format = PageFormat::default();
    format.mirror_margins(true);
    let mut report = Report::new(format);
    report.count_pages = true;

    report.add_to_header(TextFrame::new("ACME Supplies", sheet.resolve(styles::HEADING2)))?;
    report.add_to_header(LineFrame::horizontal(Pen::solid(0.3)))?;
    let footer = report.add_to_footer(TextFrame::new(
        "Page [VAR_PAGE] of [VAR_TOTAL_PAGES]",
        sheet.resolve(styles::FOOTER),
    ))?;
    report.tree.base_mut(footer).h_align = HAlign::Right;

    let stamp = report.add_to_body(FixedFrame::overlay(140.0, 0.0))?;
    report
        .tree
        .add(stamp, BarcodeFrame::new("INV-0042", "code128", 40.0, 12.0))?;

    let address = report.add_to_body(
        BoxFrame::sized(80.0, Extent::Auto)
            .border(Border::all(Pen::solid(0.2)))
            .background(colours::SILVER),
    )?;
    report.tree.add(
        address,
        TextFrame::new(
            "A. Customer\n1 Long Road\nSomewhere",
            sheet.resolve(styles::NORMAL),
        ),
    )?;
    report.add_to_body(TextFrame::new(
        format!("{}\n", lipsum::lipsum(48)),
        sheet.resolve(styles::ITALIC),
    ))?;

    let mut table = TableFrame::with_styles(&sheet);
    table.add_column("item", "Item", 110.0, HAlign::Left, 0.0);
    table.add_column("qty", "Qty", 20.0, HAlign::Right, 0.0);
    table.add_column("price", "Price", 30.0, HAlign::Right, 0.0);
    let mut total = 0.0;
    for i in 0..120 {
        let qty = i % 7 + 1;
        let price = (i % 13) as f32 * 2.5 + 0.99;
        total += qty as f32 * price;
        table.add_row(
            TableRow::detail()
                .cell("item", lipsum::lipsum_words(2 + i % 9))
                .cell("qty", qty)
                .cell("price", format!("{price:.2}")),
        );
    }
    table.add_row(
        TableRow::new(RowType::Total)
            .cell("item", "Total")
            .cell("price", format!("{total:.2}"))
            .join_columns(0, 1),
    );
    report.add_to_body(table)?;

    let out = std::fs::File::create("invoice.pdf")?;
    let pages = report.output(&mut backend, out)?;
    log::info!("wrote {pages} pages to invoice.pdf");
    Ok(())
}
