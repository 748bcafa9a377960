use crate::simulation::{HistoryEntry, SimulationSession};
use itertools::Itertools;

/// Formats simulation histories into human-readable paths.
pub struct HistoryFormatter;

impl HistoryFormatter {
    /// One line per history entry, in the order they were recorded.
    ///
    /// Decisions read `Title › prompt => outcome`; arrivals at a step without sub-steps
    /// read `Title (end)`.
    pub fn format_history(session: &SimulationSession) -> String {
        session
            .history()
            .iter()
            .map(|entry| Self::format_entry(session, entry))
            .join("\n")
    }

    /// Describes the cursor position, or the end of the run.
    pub fn format_cursor(session: &SimulationSession) -> String {
        match (session.current_step(), session.cursor()) {
            (Some(step), Some(cursor)) if session.is_complete() => {
                format!("complete at {}", Self::step_label(&step.title, cursor.step_id.as_str()))
            }
            (Some(step), Some(cursor)) => {
                let prompt = session
                    .current_sub_step()
                    .map(|sub_step| Self::prompt_label(&sub_step.content))
                    .unwrap_or_default();
                format!(
                    "{} › {} (sub-step {} of {})",
                    Self::step_label(&step.title, cursor.step_id.as_str()),
                    prompt,
                    cursor.sub_step_index + 1,
                    step.sub_steps.len()
                )
            }
            _ if session.is_complete() => "complete".to_string(),
            // A cursor on a step that is not part of the snapshot.
            _ => "unresolved".to_string(),
        }
    }

    fn format_entry(session: &SimulationSession, entry: &HistoryEntry) -> String {
        let Some(step) = session.step(entry.step_id.as_str()) else {
            return format!("{} => {}", entry.step_id, entry.outcome);
        };
        let title = Self::step_label(&step.title, entry.step_id.as_str());
        match step.sub_steps.get(entry.sub_step_index) {
            Some(sub_step) => format!(
                "{} › {} => {}",
                title,
                Self::prompt_label(&sub_step.content),
                entry.outcome
            ),
            None => format!("{} (end)", title),
        }
    }

    fn step_label(title: &str, id: &str) -> String {
        if title.trim().is_empty() {
            id.to_string()
        } else {
            title.to_string()
        }
    }

    fn prompt_label(content: &str) -> String {
        if content.trim().is_empty() {
            "(no prompt)".to_string()
        } else {
            content.to_string()
        }
    }
}
