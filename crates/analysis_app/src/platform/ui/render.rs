use analysis_core::{AppViewModel, HealthLevel, JobPhase, Tab};

/// Renders the view model as plain text lines for the terminal.
pub fn render(view: &AppViewModel) -> Vec<String> {
    let mut lines = vec![nav_line(view)];
    match view.active_tab {
        Tab::Home => lines.extend(job_lines(view)),
        other => lines.push(format!("  ({} page)", other.label())),
    }
    lines
}

fn nav_line(view: &AppViewModel) -> String {
    let tabs = view
        .tabs
        .iter()
        .map(|tab| {
            if *tab == view.active_tab {
                format!("[{}]", tab.label())
            } else {
                tab.label().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    let dot = match view.health.level {
        HealthLevel::Healthy => "●",
        HealthLevel::Degraded => "◐",
        HealthLevel::Offline => "○",
        HealthLevel::Checking => "…",
    };
    format!(
        "{tabs} | {dot} {} ({})",
        view.health.label, view.health.tooltip
    )
}

fn job_lines(view: &AppViewModel) -> Vec<String> {
    let job = &view.job;
    let mut lines = Vec::new();
    if job.selected_files.is_empty() {
        lines.push("  No files selected".to_string());
    } else {
        lines.push(format!("  Files: {}", job.selected_files.join(", ")));
    }

    match job.phase {
        JobPhase::Submitting => {
            lines.push(format!("  Analysing... {}%", job.progress.unwrap_or(0)));
        }
        JobPhase::Failed => {
            if let Some(error) = &job.error {
                lines.push(format!("  Error: {}", error.message));
            }
        }
        JobPhase::Idle | JobPhase::FilesSelected | JobPhase::Succeeded => {}
    }

    if let Some(result) = &job.result {
        let pretty = serde_json::to_string_pretty(result.as_json())
            .unwrap_or_else(|_| result.as_json().to_string());
        lines.push("  Result:".to_string());
        lines.extend(pretty.lines().map(|line| format!("    {line}")));
    }
    lines
}
