//! Replays the bundled demo session end to end.

use wireframe_core::{EditorConfig, Point, SectionId, Size};
use wireframe_replay::{replay, ReplayScript};

const DEMO: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../demos/drag-session.json");
const HERO: &str = "0b9e4d27-8a61-4f3c-b2d5-71e0c6a4f958";

#[test]
fn test_demo_session_replays() {
    let script = ReplayScript::from_file(DEMO).expect("demo script parses");
    assert_eq!(script.events.len(), 8);

    let report = replay(script, EditorConfig::default());
    assert_eq!(report.events_applied, 8);
    assert_eq!(report.snapshot.sections.len(), 3);
    assert!(report.snapshot.viewport.zoom > 1.0);

    let hero_id = SectionId::parse(HERO).expect("valid id");
    let hero = report
        .snapshot
        .sections
        .iter()
        .find(|s| s.id == hero_id)
        .expect("hero survives");
    // Moved by (40, 33), snapped to the 20px grid, then shrunk with Shift held
    assert_eq!(hero.geometry.position, Point::new(40.0, 140.0));
    assert_eq!(hero.geometry.size, Size::new(1000.0, 500.0));

    let top = report.snapshot.sections.last().expect("non-empty");
    assert_eq!(top.content.name, "Hero (copy)");
    assert_eq!(top.geometry, hero.geometry);
}

#[test]
fn test_report_serializes() {
    let script = ReplayScript::from_file(DEMO).expect("demo script parses");
    let report = replay(script, EditorConfig::default());
    let json = serde_json::to_value(&report).expect("report serializes");
    assert_eq!(json["events_applied"], 8);
    assert!(json["changes"].as_array().is_some_and(|c| !c.is_empty()));
}
