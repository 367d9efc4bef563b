use report_gen::{
    BoxFrame, BreakFrame, HAlign, Margins, OnPage, Op, PageFormat, PageFrame, RecordingBackend,
    Report, ReportError, SerialFrame, TableFrame, TableRow, TextFrame, TextStyle,
};

fn text(s: &str) -> TextFrame {
    TextFrame::new(s, TextStyle::default())
}

/// Seven lines of five millimetres each
fn paragraph(k: usize) -> String {
    let mut lines = vec![format!("para {k}")];
    lines.extend((1..7).map(|i| format!("line {i}")));
    lines.join("\n")
}

#[test]
fn paragraphs_flow_onto_as_many_pages_as_they_need() {
    let mut format = PageFormat::default();
    format.margins(Margins::trbl(10.0, 10.0, 7.0, 20.0));
    let mut report = Report::new(format);

    let column = report.add_to_body(SerialFrame::vertical()).unwrap();
    for k in 0..20 {
        report.tree.add(column, text(&paragraph(k))).unwrap();
    }

    let mut backend = RecordingBackend::new();
    let pages = report.render(&mut backend).unwrap();

    // 20 paragraphs of 35mm on pages with 280mm to spare
    assert_eq!(pages, 3);
    assert_eq!(backend.page_count(), 3);

    let placed: Vec<_> = backend
        .pages()
        .into_iter()
        .enumerate()
        .flat_map(|(page, ops)| {
            ops.iter().filter_map(move |op| match op {
                Op::Text { text, rect, .. } if text.starts_with("para") => Some((page, rect.top)),
                _ => None,
            })
        })
        .collect();
    assert_eq!(placed.len(), 20);
    for (k, (page, top)) in placed.into_iter().enumerate() {
        assert_eq!(page, k * 35 / 280);
        let expected = 10.0 + (k * 35 % 280) as f32;
        assert!((top - expected).abs() < 0.001, "paragraph {k} at {top}");
    }
}

#[test]
fn split_text_reassembles_into_the_original() {
    let original = (0..150)
        .map(|i| format!("line {i}"))
        .collect::<Vec<_>>()
        .join("\n");
    let mut report = Report::default();
    report.add_to_body(text(&original)).unwrap();

    let mut backend = RecordingBackend::new();
    assert_eq!(report.render(&mut backend).unwrap(), 3);

    let fragments: Vec<&str> = backend.texts().into_iter().map(|(t, _)| t).collect();
    assert_eq!(fragments.len(), 3);
    assert_eq!(fragments.join("\n"), original);
}

#[test]
fn oversized_keep_together_boxes_fail() {
    let mut report = Report::default();
    let tall = report.add_to_body(BoxFrame::sized(100.0, 400.0)).unwrap();
    report.tree.base_mut(tall).keep_together(true);
    report.tree.add(tall, text("inside")).unwrap();

    let mut backend = RecordingBackend::new();
    assert!(matches!(
        report.render(&mut backend),
        Err(ReportError::KeepTogether)
    ));
}

#[test]
fn mirrored_margins_swap_on_even_pages() {
    let mut format = PageFormat::default();
    format
        .margins(Margins::trbl(10.0, 10.0, 10.0, 20.0))
        .mirror_margins(true);
    let mut report = Report::new(format.clone());

    for page in 1..=4 {
        report.add_to_body(text(&format!("page {page}"))).unwrap();
        if page < 4 {
            report.add_to_body(BreakFrame::new(format.clone())).unwrap();
        }
    }

    let mut backend = RecordingBackend::new();
    assert_eq!(report.render(&mut backend).unwrap(), 4);

    let lefts: Vec<f32> = backend
        .texts()
        .into_iter()
        .map(|(_, rect)| rect.left)
        .collect();
    assert_eq!(lefts, vec![20.0, 10.0, 20.0, 10.0]);
}

#[test]
fn page_frames_pick_their_pages() {
    let mut report = Report::default();
    let odd = report.add_to_header(PageFrame::new(OnPage::Odd)).unwrap();
    report.tree.add(odd, text("odd header")).unwrap();
    let later = report
        .add_to_footer(PageFrame::new(OnPage::AllButFirst))
        .unwrap();
    report.tree.add(later, text("continued")).unwrap();
    report.add_to_body(text(&vec!["body"; 150].join("\n"))).unwrap();

    let mut backend = RecordingBackend::new();
    let pages = report.render(&mut backend).unwrap();
    assert!(pages >= 3);

    for (index, ops) in backend.pages().into_iter().enumerate() {
        let page = index + 1;
        let has = |wanted: &str| {
            ops.iter()
                .any(|op| matches!(op, Op::Text { text, .. } if text == wanted))
        };
        assert_eq!(has("odd header"), page % 2 == 1, "page {page}");
        assert_eq!(has("continued"), page > 1, "page {page}");
    }
}

#[test]
fn wide_tables_wrap_columns_into_sub_rows() {
    let mut table = TableFrame::new();
    for name in ["A", "B", "C", "D", "E"] {
        table.add_column(name, name, 50.0, HAlign::Left, 0.0);
    }
    for i in 0..3 {
        let mut row = TableRow::detail();
        for name in ["A", "B", "C", "D", "E"] {
            row.set(name, format!("{name}{i}"));
        }
        table.add_row(row);
    }

    // 180mm between the default margins
    let mut report = Report::default();
    report.add_to_body(table).unwrap();

    let mut backend = RecordingBackend::new();
    report.render(&mut backend).unwrap();

    let texts = backend.texts();
    let find = |wanted: &str| {
        texts
            .iter()
            .find(|(t, _)| *t == wanted)
            .map(|(_, rect)| *rect)
            .unwrap()
    };
    let (a, c, d) = (find("A"), find("C"), find("D"));
    // D starts the second sub-row, back at the left edge and lower down
    assert_eq!(a.left, d.left);
    assert!(d.top > a.top);
    assert_eq!(a.top, c.top);
    assert!(find("E0").top > find("A0").top);
}

#[test]
fn odd_and_even_footers_share_the_footer() {
    let mut report = Report::default();
    let odd = report.add_to_footer(PageFrame::new(OnPage::Odd)).unwrap();
    report.tree.add(odd, text("odd footer")).unwrap();
    let even = report.add_to_footer(PageFrame::new(OnPage::Even)).unwrap();
    report.tree.add(even, text("even footer")).unwrap();

    report.add_to_body(text("p1")).unwrap();
    report
        .add_to_body(BreakFrame::new(PageFormat::default()))
        .unwrap();
    report.add_to_body(text("p2")).unwrap();

    let mut backend = RecordingBackend::new();
    assert_eq!(report.render(&mut backend).unwrap(), 2);

    let texts: Vec<Vec<String>> = backend
        .pages()
        .into_iter()
        .map(|ops| {
            ops.iter()
                .filter_map(|op| match op {
                    Op::Text { text, .. } => Some(text.clone()),
                    _ => None,
                })
                .collect()
        })
        .collect();
    assert!(texts[0].contains(&"odd footer".to_string()));
    assert!(!texts[0].contains(&"even footer".to_string()));
    assert!(texts[1].contains(&"even footer".to_string()));
    assert!(!texts[1].contains(&"odd footer".to_string()));
}
