use planner_core::{AppViewModel, IngestView, PlanView, StatusView};

/// Full rendering of the view, one entry per output line.
pub fn render(view: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push(status_line(&view.status));
    lines.extend(ingest_lines(&view.ingest));
    lines.extend(plan_lines(&view.plan));
    lines
}

/// Renders only the sections that differ from `previous`.
pub fn render_changes(previous: Option<&AppViewModel>, view: &AppViewModel) -> Vec<String> {
    let Some(previous) = previous else {
        return render(view);
    };

    let mut lines = Vec::new();
    if previous.status != view.status {
        lines.push(status_line(&view.status));
    }
    if ingest_changed(&previous.ingest, &view.ingest) {
        lines.extend(ingest_lines(&view.ingest));
    }
    if plan_changed(&previous.plan, &view.plan) {
        lines.extend(plan_lines(&view.plan));
    }
    lines
}

pub fn status_line(status: &StatusView) -> String {
    if status.refreshing && status.document_count.is_some() {
        format!("Status DB: {} (refreshing)", status.label())
    } else {
        format!("Status DB: {}", status.label())
    }
}

fn ingest_lines(ingest: &IngestView) -> Vec<String> {
    let mut lines = vec![format!(
        "Ingest [{}] {} chars{}",
        ingest.category,
        ingest.content.chars().count(),
        if ingest.in_flight() { ", indexing" } else { "" }
    )];
    if !ingest.message.is_empty() {
        lines.push(format!("  {}", ingest.message));
    }
    lines
}

fn plan_lines(plan: &PlanView) -> Vec<String> {
    let mut lines = vec![format!("Plan ({})", plan.target_date)];
    if !plan.guidance.is_empty() {
        lines.push(format!("  guidance: {}", plan.guidance));
    }
    lines.extend(plan.text.lines().map(|line| format!("  {line}")));
    lines
}

// Content edits are not echoed back.
fn ingest_changed(previous: &IngestView, next: &IngestView) -> bool {
    previous.phase != next.phase
        || previous.message != next.message
        || previous.category != next.category
}

fn plan_changed(previous: &PlanView, next: &PlanView) -> bool {
    previous.text != next.text || previous.in_flight != next.in_flight
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use planner_core::{update, AppState, Msg};

    use super::*;

    fn state() -> AppState {
        AppState::new(NaiveDate::from_ymd_opt(2024, 4, 1).unwrap())
    }

    #[test]
    fn zero_documents_is_not_loading() {
        let loading = StatusView {
            document_count: None,
            refreshing: true,
        };
        let empty = StatusView {
            document_count: Some(0),
            refreshing: false,
        };
        assert_eq!(status_line(&loading), "Status DB: Loading...");
        assert_eq!(status_line(&empty), "Status DB: 0 documents indexed");
    }

    #[test]
    fn full_render_includes_every_section() {
        let lines = render(&state().view());
        assert_eq!(lines[0], "Status DB: Loading...");
        assert_eq!(lines[1], "Ingest [email] 0 chars");
        assert_eq!(lines[2], "Plan (2024-04-02)");
        assert!(lines[3].starts_with("  No plan yet"));
    }

    #[test]
    fn changes_skip_untouched_sections() {
        let before = state().view();
        let (next, _) = update(state(), Msg::PlanSubmitted);
        let lines = render_changes(Some(&before), &next.view());

        assert_eq!(
            lines,
            vec![
                "Plan (2024-04-02)".to_string(),
                "  Generating plan, please wait...".to_string(),
            ]
        );
    }

    #[test]
    fn typing_content_is_not_echoed() {
        let before = state().view();
        let (next, _) = update(state(), Msg::IngestContentChanged("draft".into()));
        assert!(render_changes(Some(&before), &next.view()).is_empty());
    }
}
