//! # Wireframe Replay
//!
//! Headless driver for the wireframe engine: loads a recorded script of
//! input events, feeds them to an [`Editor`] and reports the result.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p wireframe-replay -- --script session.json --pretty
//! ```
//!
//! ## Script format
//!
//! ```json
//! {
//!   "document": { "sections": [] },
//!   "events": [
//!     { "type": "key", "data": { "key": "g", "pressed": true } }
//!   ]
//! }
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use clap::Parser;
use serde::{Deserialize, Serialize};
use wireframe_core::{Change, DocumentSnapshot, Editor, EditorConfig, EditorResult, InputEvent};

/// Command-line arguments for wireframe-replay.
#[derive(Debug, Clone, Parser)]
#[command(name = "wireframe-replay")]
#[command(about = "Replay recorded canvas input against the wireframe engine")]
#[command(version)]
pub struct CliArgs {
    /// Script file with an optional starting document and the events to replay
    #[arg(long)]
    pub script: PathBuf,

    /// Editor configuration file (JSON)
    #[arg(long, env = "WIREFRAME_CONFIG")]
    pub config: Option<PathBuf>,

    /// Pretty-print the report
    #[arg(long)]
    pub pretty: bool,
}

/// A recorded editing session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReplayScript {
    /// Document to load before replaying. Empty if absent.
    #[serde(default)]
    pub document: Option<DocumentSnapshot>,
    /// Events in the order they were received.
    #[serde(default)]
    pub events: Vec<InputEvent>,
}

impl ReplayScript {
    /// Parse a script and validate its document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the document has duplicate ids.
    pub fn from_json(json: &str) -> EditorResult<Self> {
        let script: Self = serde_json::from_str(json)?;
        if let Some(document) = &script.document {
            document.validate()?;
        }
        Ok(script)
    }

    /// Read and parse a script file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file can't be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> EditorResult<Self> {
        let path = path.as_ref();
        tracing::debug!("Loading replay script from {}", path.display());
        Self::from_json(&std::fs::read_to_string(path)?)
    }
}

/// Outcome of a replay.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    /// Number of events fed to the editor.
    pub events_applied: usize,
    /// Number of events that changed something.
    pub events_changed: usize,
    /// Every change notification, in order.
    pub changes: Vec<Change>,
    /// Final document and viewport.
    pub snapshot: DocumentSnapshot,
}

/// Replay `script` on a fresh editor.
#[must_use]
pub fn replay(script: ReplayScript, config: EditorConfig) -> ReplayReport {
    let mut editor = Editor::new(config);
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    editor.subscribe(move |change| sink.borrow_mut().push(*change));

    if let Some(document) = script.document {
        editor.load_snapshot(document);
    }

    let mut events_changed = 0;
    for (index, event) in script.events.iter().enumerate() {
        if editor.handle_event(event) {
            events_changed += 1;
        } else {
            tracing::trace!("Event {index} changed nothing");
        }
    }
    tracing::info!(
        "Replayed {} events, {} changed the editor",
        script.events.len(),
        events_changed
    );

    let changes = std::mem::take(&mut *log.borrow_mut());
    ReplayReport {
        events_applied: script.events.len(),
        events_changed,
        changes,
        snapshot: editor.snapshot(),
    }
}

/// Load the configuration named on the command line, or the defaults.
///
/// # Errors
///
/// Returns an error if the file can't be read, parsed or validated.
pub fn load_config(path: Option<&Path>) -> EditorResult<EditorConfig> {
    match path {
        Some(path) => EditorConfig::from_file(path),
        None => Ok(EditorConfig::default()),
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use wireframe_core::{NewSection, Point, SectionType};

    fn script_with_hero() -> (ReplayScript, wireframe_core::SectionId) {
        let mut editor = Editor::default();
        let id = editor.add_section(NewSection::new(SectionType::Hero).at(0.0, 0.0));
        let script = ReplayScript {
            document: Some(editor.snapshot()),
            events: Vec::new(),
        };
        (script, id)
    }

    #[test]
    fn test_cli_args_parse() {
        let args = CliArgs::parse_from(["wireframe-replay", "--script", "s.json", "--pretty"]);
        assert_eq!(args.script, PathBuf::from("s.json"));
        assert!(args.pretty);
    }

    #[test]
    fn test_replay_drag() {
        let (mut script, id) = script_with_hero();
        let events = format!(
            r#"[
                {{"type":"pointer","data":{{"phase":"down","x":10,"y":10,"target":{{"section":"{id}"}}}}}},
                {{"type":"pointer","data":{{"phase":"move","x":50,"y":30}}}},
                {{"type":"pointer","data":{{"phase":"up","x":50,"y":30}}}},
                {{"type":"key","data":{{"key":"q","pressed":true}}}}
            ]"#
        );
        script.events = serde_json::from_str(&events).expect("valid events");

        let report = replay(script, EditorConfig::default());
        assert_eq!(report.events_applied, 4);
        assert_eq!(report.events_changed, 3);
        assert_eq!(report.changes.first(), Some(&Change::DocumentLoaded));
        let section = &report.snapshot.sections[0];
        assert_eq!(section.geometry.position, Point::new(40.0, 20.0));
    }

    #[test]
    fn test_script_file_round_trip() {
        let (script, _) = script_with_hero();
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("script.json");
        std::fs::write(&path, serde_json::to_string(&script).expect("serializes"))
            .expect("write script");

        let loaded = ReplayScript::from_file(&path).expect("valid script");
        assert_eq!(loaded.document, script.document);
        assert!(loaded.events.is_empty());
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        let config = load_config(None).expect("defaults");
        assert_eq!(config.grid.size, 20.0);
        assert!(load_config(Some(Path::new("/nonexistent/editor.json"))).is_err());
    }
}
