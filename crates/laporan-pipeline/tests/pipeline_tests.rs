//! End-to-end pipeline tests: in-memory worksheet ranges through the
//! scanner, mapper, translator, and renderer.

use calamine::{Data, Range};
use laporan_backend::scan_sheet;
use laporan_core::{LaporanError, ScalarValue};
use laporan_mapper::FieldMapper;
use laporan_pipeline::ReportPipeline;
use laporan_template::Dialect;

fn text(s: &str) -> Data {
    Data::String(s.to_string())
}

/// A workbook the way the source spreadsheets look: one label/value info
/// sheet and one participant roster sheet.
fn sample_tables() -> Vec<laporan_backend::Table> {
    let mut info = Range::new((0, 0), (2, 1));
    info.set_value((0, 0), text("Tajuk Program"));
    info.set_value((0, 1), text("Kursus Kepimpinan"));
    info.set_value((1, 0), text("Tarikh"));
    info.set_value((1, 1), text("1 Mac 2024"));
    info.set_value((2, 0), text("Tempat"));
    info.set_value((2, 1), text("Putrajaya"));

    let mut roster = Range::new((0, 0), (3, 2));
    roster.set_value((0, 0), text("Nama"));
    roster.set_value((0, 1), text("Organisasi"));
    roster.set_value((0, 2), text("Jawatan"));
    for (i, (n, o, p)) in [
        ("Aina", "JPN", "Pegawai"),
        ("Ben", "MOE", "Kerani"),
        ("Chong", "JPS", "Jurutera"),
    ]
    .iter()
    .enumerate()
    {
        roster.set_value(((i + 1) as u32, 0), text(n));
        roster.set_value(((i + 1) as u32, 1), text(o));
        roster.set_value(((i + 1) as u32, 2), text(p));
    }

    let mut tables = scan_sheet("Maklumat", &info);
    tables.extend(scan_sheet("Peserta", &roster));
    tables
}

#[test]
fn scanned_workbook_renders_section_template() {
    let tables = sample_tables();
    let model = FieldMapper::with_builtin_dictionary()
        .map_tables(&tables)
        .unwrap();

    assert_eq!(
        model.program_info["title"],
        ScalarValue::Text("Kursus Kepimpinan".to_string())
    );
    assert_eq!(model.participants.len(), 3);

    let pipeline = ReportPipeline::new();
    let template = "LAPORAN: {{program.title}}\n\
                    Tarikh: {{program.date}}\n\
                    {{#participants}}- {{name}} ({{organization}})\n{{/participants}}";
    let report = pipeline.render_with_model(&model, template).unwrap();

    assert_eq!(report.dialect, Dialect::Sections);
    assert!(report.unresolved.is_empty());
    assert_eq!(
        report.text,
        "LAPORAN: Kursus Kepimpinan\nTarikh: 1 Mac 2024\n\
         - Aina (JPN)\n- Ben (MOE)\n- Chong (JPS)\n"
    );
}

#[test]
fn control_tag_template_passes_through_normalization() {
    let tables = sample_tables();
    let model = FieldMapper::with_builtin_dictionary()
        .map_tables(&tables)
        .unwrap();

    let pipeline = ReportPipeline::new();
    let template =
        "{% for p in participants %}{{ p.name }};{% endfor %}{% if program.title %}*{% endif %}";
    let report = pipeline.render_with_model(&model, template).unwrap();

    assert_eq!(report.dialect, Dialect::ControlTags);
    assert_eq!(report.text, "Aina;Ben;Chong;*");
}

#[test]
fn missing_references_are_diagnostics_not_failures() {
    let model = FieldMapper::with_builtin_dictionary()
        .map_tables(&[])
        .unwrap();

    let pipeline = ReportPipeline::new();
    let report = pipeline
        .render_with_model(&model, "{{program.title}} / {{missing.field}}")
        .unwrap();

    // The artifact is complete; the failed placeholders are visible in it.
    assert!(report.text.contains("{{program.title}}"));
    assert!(report.text.contains("{{missing.field}}"));
    assert_eq!(report.unresolved.len(), 2);
    assert_eq!(report.unresolved[1].path, "missing.field");
}

#[test]
fn unbalanced_template_aborts_generation() {
    let model = FieldMapper::with_builtin_dictionary()
        .map_tables(&[])
        .unwrap();
    let pipeline = ReportPipeline::new();
    let err = pipeline
        .render_with_model(&model, "{{#items}}never closed")
        .unwrap_err();
    assert!(matches!(err, LaporanError::UnbalancedSectionTags { .. }));
}

#[test]
fn missing_workbook_is_unreadable() {
    let pipeline = ReportPipeline::new();
    let err = pipeline
        .extract("/no/such/workbook.xlsx")
        .unwrap_err();
    match err {
        LaporanError::UnreadableWorkbook { source_name, .. } => {
            assert!(source_name.contains("workbook.xlsx"));
        }
        other => panic!("expected UnreadableWorkbook, got {other}"),
    }
}

#[test]
fn garbage_bytes_are_unreadable() {
    let pipeline = ReportPipeline::new();
    let err = pipeline
        .extract_bytes(b"this is not a spreadsheet", "upload.xlsx")
        .unwrap_err();
    assert!(matches!(err, LaporanError::UnreadableWorkbook { .. }));
}
