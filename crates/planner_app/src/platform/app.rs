use std::sync::mpsc;

use chrono::NaiveDate;
use planner_core::{update, AppState, AppViewModel, Category, Msg, Phase};
use planner_engine::{BackendSettings, EngineError};

use super::effects::EffectRunner;

/// Owns the state machine and routes its effects through the engine.
pub struct Session {
    state: AppState,
    runner: EffectRunner,
    msg_rx: mpsc::Receiver<Msg>,
}

impl Session {
    pub fn connect(settings: &BackendSettings, today: NaiveDate) -> Result<Self, EngineError> {
        let (msg_tx, msg_rx) = mpsc::channel();
        let runner = EffectRunner::new(settings, msg_tx)?;
        Ok(Self {
            state: AppState::new(today),
            runner,
            msg_rx,
        })
    }

    /// Applies one message. Returns true when the view changed.
    pub fn dispatch(&mut self, msg: Msg) -> bool {
        let (state, effects) = update(self.state.clone(), msg);
        self.state = state;
        self.runner.enqueue(effects);
        self.state.consume_dirty()
    }

    /// Applies any engine results that have already arrived.
    pub fn pump(&mut self) -> bool {
        let mut changed = false;
        while let Ok(msg) = self.msg_rx.try_recv() {
            changed |= self.dispatch(msg);
        }
        changed
    }

    /// Blocks until no request is outstanding.
    pub fn settle(&mut self) {
        while self.state.is_busy() {
            match self.msg_rx.recv() {
                Ok(msg) => {
                    self.dispatch(msg);
                }
                // Engine is gone; nothing more will arrive.
                Err(_) => break,
            }
        }
    }

    pub fn is_busy(&self) -> bool {
        self.state.is_busy()
    }

    pub fn view(&self) -> AppViewModel {
        self.state.view()
    }
}

/// Outcome of a one-shot command: text for stdout on success, stderr on failure.
pub type CommandOutput = Result<String, String>;

pub fn run_status(session: &mut Session) -> CommandOutput {
    session.dispatch(Msg::Mounted);
    session.settle();
    let status = session.view().status;
    match status.document_count {
        Some(_) => Ok(status.label()),
        None => Err("Could not read the document count (see log for details)".to_string()),
    }
}

pub fn run_ingest(
    session: &mut Session,
    category: Category,
    content: String,
    now_millis: i64,
) -> CommandOutput {
    session.dispatch(Msg::IngestCategoryChanged(category));
    session.dispatch(Msg::IngestContentChanged(content));
    session.dispatch(Msg::IngestSubmitted { now_millis });
    session.settle();

    let view = session.view();
    match view.ingest.phase {
        Phase::Succeeded(_) if view.status.document_count.is_some() => Ok(format!(
            "{}\nStatus DB: {}",
            view.ingest.message,
            view.status.label()
        )),
        Phase::Succeeded(_) => Ok(view.ingest.message),
        _ => Err(view.ingest.message),
    }
}

pub fn run_plan(
    session: &mut Session,
    date: Option<NaiveDate>,
    guidance: String,
) -> CommandOutput {
    if let Some(date) = date {
        session.dispatch(Msg::PlanDateChanged(date));
    }
    session.dispatch(Msg::PlanGuidanceChanged(guidance));
    session.dispatch(Msg::PlanSubmitted);
    session.settle();

    let plan = session.view().plan;
    if plan.failed {
        Err(plan.text)
    } else {
        Ok(plan.text)
    }
}
