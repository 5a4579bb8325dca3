// tests/section_extract.rs
use ptwc_notifier::bulletin::extract_section;
use ptwc_notifier::EngineConfig;

fn cfg(filter: bool) -> EngineConfig {
    EngineConfig {
        locality_filter: filter,
        ..EngineConfig::default()
    }
}

fn bulletin(rows_a: &[&str], rows_b: &[&str]) -> String {
    let mut lines = vec![
        "TSUNAMI THREAT MESSAGE".to_string(),
        String::new(),
        "ESTIMATED TIMES OF ARRIVAL".to_string(),
    ];
    lines.extend(rows_a.iter().map(|s| s.to_string()));
    lines.push(String::new());
    lines.extend(rows_b.iter().map(|s| s.to_string()));
    lines.push(String::new());
    lines.push(String::new());
    lines.push("POTENTIAL IMPACTS".to_string());
    lines.join("\n")
}

const ROWS_A: [&str; 5] = [
    "LOCATION         REGION       ETA(UTC)",
    "--------------------------------------",
    "HILO             HAWAII       0517 07/30",
    "APIA             SAMOA        0702 07/30",
    "CALLAO           PERU         1150 07/30",
];

#[test]
fn section_stops_at_double_blank() {
    let text = bulletin(&ROWS_A, &["SUVA FIJI 0730", "NUKUALOFA TONGA 0801", "PAGO PAGO 0715"]);
    let s = extract_section(&text, &cfg(false)).expect("section");
    assert_eq!(s.len(), 9);
    assert_eq!(s.lines[0], "ESTIMATED TIMES OF ARRIVAL");
    assert_eq!(s.lines[8], "PAGO PAGO 0715");
    assert!(!s.filtered);
    assert!(!s.to_text().contains("POTENTIAL IMPACTS"));
}

#[test]
fn locality_filter_keeps_matching_rows() {
    let text = bulletin(
        &ROWS_A,
        &[
            "ARICA            CHILE        1232 07/30",
            "VALPARAISO       CHILE        1313 07/30",
            "SUVA             FIJI         0730 07/30",
        ],
    );
    let s = extract_section(&text, &cfg(true)).expect("section");
    assert_eq!(
        s.lines,
        vec![
            "ARICA            CHILE        1232 07/30".to_string(),
            "VALPARAISO       CHILE        1313 07/30".to_string(),
        ]
    );
    assert!(s.filtered);
}

#[test]
fn locality_filter_without_hits_keeps_everything() {
    let text = bulletin(&ROWS_A, &["SUVA FIJI 0730", "NUKUALOFA TONGA 0801", "PAGO PAGO 0715"]);
    let s = extract_section(&text, &cfg(true)).expect("section");
    assert_eq!(s.len(), 9);
    assert!(!s.filtered);
}

#[test]
fn no_header_means_no_section() {
    let text = "TSUNAMI INFORMATION STATEMENT\nNO TSUNAMI THREAT\n";
    assert!(extract_section(text, &cfg(true)).is_none());
}

#[test]
fn header_match_is_case_insensitive_and_bom_tolerant() {
    let text = "\u{feff}Estimated Times of Arrival\n\u{feff}ARICA CHILE 1232\n\n\nrest";
    let s = extract_section(text, &cfg(false)).expect("section");
    assert_eq!(s.lines, vec!["Estimated Times of Arrival", "ARICA CHILE 1232"]);
}

#[test]
fn long_sections_are_capped() {
    let mut cfg = cfg(false);
    cfg.max_section_lines = 4;
    let text = bulletin(&ROWS_A, &["SUVA FIJI 0730"]);
    let s = extract_section(&text, &cfg).expect("section");
    assert_eq!(s.len(), 4);
}
