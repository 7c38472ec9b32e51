//! Scripted editor input.
//!
//! A script is a JSON array of actions, each tagged with an `action` field:
//!
//! ```json
//! [
//!   { "action": "select_tool", "tool": "line" },
//!   { "action": "click_lon_lat", "lon": 100.5, "lat": 13.7 },
//!   { "action": "click_lon_lat", "lon": 100.51, "lat": 13.7 },
//!   { "action": "edit_length", "segment": 1, "text": "0.5" },
//!   { "action": "double_click" },
//!   { "action": "export" }
//! ]
//! ```
//!
//! Replaying drives a [`MapSession`] exactly as pointer and keyboard input
//! would. A failing action is reported and the replay carries on.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use mapsketch_core::{DrawTool, Point};
use mapsketch_designer::{EditOutcome, MapSession};

/// One scripted input event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    SelectTool { tool: String },
    Click { x: f64, y: f64 },
    ClickLonLat { lon: f64, lat: f64 },
    Move { x: f64, y: f64 },
    DoubleClick,
    Cancel,
    EditLength { segment: usize, text: String },
    Remove { id: u64 },
    Clear,
    SwitchBasemap { key: String },
    ToggleDistrict { name: String },
    Export,
}

/// What one replayed action did
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub step: usize,
    pub action: Action,
    /// Short description of the effect, or the error that stopped it
    pub result: std::result::Result<String, String>,
    /// Overlay labels mounted after the action
    pub overlays: Vec<String>,
}

impl StepReport {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Parse a script from JSON text
pub fn parse_script(json: &str) -> Result<Vec<Action>> {
    serde_json::from_str(json).context("Invalid replay script")
}

/// Read and parse a script file
pub fn load_script(path: &Path) -> Result<Vec<Action>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script {}", path.display()))?;
    parse_script(&json)
}

/// Replay `actions` into `map`
///
/// `export` actions write into `out_dir` when given, and only serialize
/// otherwise.
pub fn replay(map: &mut MapSession, actions: &[Action], out_dir: Option<&Path>) -> Vec<StepReport> {
    actions
        .iter()
        .enumerate()
        .map(|(step, action)| {
            let result = apply(map, action, out_dir).map_err(|e| format!("{:#}", e));
            let overlays: Vec<String> = map.overlays().into_iter().map(|o| o.display).collect();

            match &result {
                Ok(effect) => tracing::info!("#{} {:?}: {} {:?}", step, action, effect, overlays),
                Err(e) => tracing::warn!("#{} {:?} failed: {}", step, action, e),
            }

            StepReport {
                step,
                action: action.clone(),
                result,
                overlays,
            }
        })
        .collect()
}

fn apply(map: &mut MapSession, action: &Action, out_dir: Option<&Path>) -> Result<String> {
    let effect = match action {
        Action::SelectTool { tool } => {
            let tool: DrawTool = tool.parse().map_err(anyhow::Error::msg)?;
            map.select_tool(tool);
            format!("tool {}", tool)
        }
        Action::Click { x, y } => describe_click(map.click(Point::new(*x, *y))?),
        Action::ClickLonLat { lon, lat } => describe_click(map.click_lon_lat(*lon, *lat)?),
        Action::Move { x, y } => {
            map.pointer_move(Point::new(*x, *y))?;
            "moved".to_string()
        }
        Action::DoubleClick => format!("feature {} committed", map.double_click()?),
        Action::Cancel => {
            if map.cancel_drawing() {
                "sketch discarded".to_string()
            } else {
                "nothing to cancel".to_string()
            }
        }
        Action::EditLength { segment, text } => {
            let edit = map.begin_length_edit(*segment)?;
            match map.commit_length_edit(edit, text) {
                EditOutcome::Applied { index, length_m, .. } => {
                    format!("segment {} set to {:.3} m", index, length_m)
                }
                EditOutcome::Reverted { label, reason } => {
                    format!("reverted to {} ({})", label, reason)
                }
            }
        }
        Action::Remove { id } => {
            if map.remove_feature(*id) {
                format!("feature {} removed", id)
            } else {
                format!("no feature {}", id)
            }
        }
        Action::Clear => format!("{} features cleared", map.clear_all()),
        Action::SwitchBasemap { key } => {
            map.switch_basemap(key)?;
            format!("basemap {}", key)
        }
        Action::ToggleDistrict { name } => {
            let checked = map.toggle_district(name)?;
            format!("district {} {}", name, if checked { "shown" } else { "hidden" })
        }
        Action::Export => match out_dir {
            Some(dir) => export_into(map, dir)?.display().to_string(),
            None => format!("{} bytes", map.export_geojson()?.len()),
        },
    };
    Ok(effect)
}

fn export_into(map: &MapSession, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    map.export_to_dir(dir)
}

fn describe_click(finished: Option<u64>) -> String {
    match finished {
        Some(id) => format!("feature {} committed", id),
        None => "vertex added".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapsketch_settings::Config;

    #[test]
    fn test_parse_actions() {
        let actions = parse_script(
            r#"[
                {"action": "select_tool", "tool": "polygon"},
                {"action": "click", "x": 1.0, "y": 2.0},
                {"action": "edit_length", "segment": 1, "text": "0.5"},
                {"action": "double_click"}
            ]"#,
        )
        .unwrap();
        assert_eq!(actions.len(), 4);
        assert_eq!(
            actions[0],
            Action::SelectTool {
                tool: "polygon".to_string()
            }
        );
        assert_eq!(actions[3], Action::DoubleClick);
    }

    #[test]
    fn test_unknown_action_is_rejected() {
        assert!(parse_script(r#"[{"action": "fly"}]"#).is_err());
    }

    #[test]
    fn test_failed_step_does_not_stop_replay() {
        let mut map = MapSession::new(&Config::default()).unwrap();
        let actions = vec![
            Action::SelectTool {
                tool: "hexagon".to_string(),
            },
            Action::SelectTool {
                tool: "point".to_string(),
            },
            Action::Click { x: 0.0, y: 0.0 },
        ];
        let report = replay(&mut map, &actions, None);
        assert!(!report[0].is_ok());
        assert!(report[1].is_ok());
        assert_eq!(report[2].result.as_deref(), Ok("feature 1 committed"));
        assert_eq!(map.features().len(), 1);
    }
}
