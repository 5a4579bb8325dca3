// tests/engine_e2e.rs
use ptwc_notifier::bulletin::BulletinEngine;
use ptwc_notifier::feed::parse_latest_entry;
use ptwc_notifier::fetch::StaticFetcher;
use ptwc_notifier::EngineConfig;

const ATOM: &str = include_str!("fixtures/ptwc_atom.xml");
const TEX: &str = include_str!("fixtures/phebtex.xml");
const CAP: &str = include_str!("fixtures/phebcap_deref.xml");

const BASE: &str = "https://tsunami.test/events/PHEB/2025/07/30/abc/1/WEPA40";

fn url(file: &str) -> String {
    format!("{BASE}/{file}")
}

#[test]
fn atom_fixture_yields_newest_entry() {
    let entry = parse_latest_entry(ATOM).unwrap().expect("entry");
    assert_eq!(entry.id, "urn:uuid:0d5a1c3e-2025-07-30-0100");
    assert_eq!(entry.title, "Tsunami Threat Message Number 1");
    assert_eq!(entry.updated, "2025-07-30T01:00:00Z");
    // links are split by <summary> in the fixture
    assert_eq!(
        entry.links,
        vec![
            url("PHEBCAP.xml"),
            url("PHEBTEX.xml"),
            "https://tsunami.test/events/PHEB/2025/07/30/abc/1/index.html".to_string(),
        ]
    );
}

#[tokio::test]
async fn text_bulletin_gives_filtered_eta_message() {
    let entry = parse_latest_entry(ATOM).unwrap().expect("entry");
    let fetcher = StaticFetcher::new().with_body(&url("PHEBTEX.xml"), TEX);
    let engine = BulletinEngine::new(EngineConfig::default());

    let out = engine.process(&fetcher, &entry).await;

    assert_eq!(
        out.candidates,
        vec![
            url("PHEBTEX.xml"),
            url("PHEBCAP.xml"),
            url("PHEBTEXT.xml"),
            url("TEX.xml"),
        ]
    );
    assert!(out.resolution.accepted);
    assert_eq!(fetcher.requested(), vec![url("PHEBTEX.xml")]);

    let section = out.section.expect("eta section");
    assert!(section.filtered);
    assert_eq!(section.len(), 3);
    assert!(section.lines.iter().all(|l| l.contains("CHILE")));

    assert!(out.message.starts_with(
        "🚨 PTWC NEW BULLETIN\n📰 Tsunami Threat Message Number 1\n🕒 2025-07-30T01:00:00Z\n\n⏱️ PTIME / ETA:\nARICA"
    ));
    assert!(out.message.contains("VALPARAISO       CHILE"));
    assert!(!out.message.contains("HILO"));
    assert!(out
        .message
        .ends_with(&format!("\n\nSource: {}", url("PHEBTEX.xml"))));
}

#[tokio::test]
async fn unfiltered_engine_keeps_the_whole_table() {
    let entry = parse_latest_entry(ATOM).unwrap().expect("entry");
    let fetcher = StaticFetcher::new().with_body(&url("PHEBTEX.xml"), TEX);
    let engine = BulletinEngine::new(EngineConfig {
        locality_filter: false,
        ..EngineConfig::default()
    });

    let out = engine.process(&fetcher, &entry).await;
    let section = out.section.expect("eta section");
    assert!(!section.filtered);
    assert_eq!(section.lines[0], "ESTIMATED TIMES OF ARRIVAL");
    assert!(out.message.contains("HILO"));
    assert!(out.message.contains("CALLAO"));
}

#[tokio::test]
async fn cap_is_used_when_text_bulletin_is_missing() {
    let entry = parse_latest_entry(ATOM).unwrap().expect("entry");
    let fetcher = StaticFetcher::new().with_body(&url("PHEBCAP.xml"), CAP);
    let engine = BulletinEngine::default();

    let out = engine.process(&fetcher, &entry).await;
    assert!(out.resolution.accepted);
    assert_eq!(out.resolution.source_url, Some(url("PHEBCAP.xml")));
    assert_eq!(
        fetcher.requested(),
        vec![url("PHEBTEX.xml"), url("PHEBCAP.xml")]
    );
    assert!(out.message.contains("VALPARAISO CHILE 1313 UTC"));
}

#[tokio::test]
async fn unreachable_bulletins_still_produce_a_message() {
    let entry = parse_latest_entry(ATOM).unwrap().expect("entry");
    let fetcher = StaticFetcher::new();
    let engine = BulletinEngine::default();

    let out = engine.process(&fetcher, &entry).await;
    assert!(!out.resolution.accepted);
    assert!(out.section.is_none());
    assert_eq!(fetcher.requested(), out.candidates);
    assert!(out
        .message
        .starts_with("🌊 PTWC: Tsunami Threat Message Number 1\n🕒 2025-07-30T01:00:00Z"));
    assert!(!out.message.contains("Source:"));
}
