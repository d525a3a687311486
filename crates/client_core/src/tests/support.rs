use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use shared::{domain::EmployeeFields, protocol::Route};
use tokio::sync::Notify;

use crate::{
    dialog::{Dialog, Notifier, Prompt},
    error::ClientError,
    render::RenderTrigger,
    store::LoadState,
    transport::{RawResponse, Transport},
};

struct Scripted {
    response: Result<RawResponse, String>,
    gate: Option<Arc<Notify>>,
}

#[derive(Default)]
pub(crate) struct ScriptedTransport {
    script: Mutex<VecDeque<Scripted>>,
    calls: Mutex<Vec<(Route, Option<EmployeeFields>)>>,
    call_made: Notify,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn push(&self, scripted: Scripted) {
        self.script.lock().expect("script lock").push_back(scripted);
    }

    pub(crate) fn push_body(&self, body: impl Into<String>) {
        self.push(Scripted {
            response: Ok(RawResponse::ok(body)),
            gate: None,
        });
    }

    pub(crate) fn push_status(&self, status: u16, body: impl Into<String>) {
        self.push(Scripted {
            response: Ok(RawResponse {
                status,
                body: body.into(),
            }),
            gate: None,
        });
    }

    /// The response is held back until `gate` is notified.
    pub(crate) fn push_gated(&self, body: impl Into<String>, gate: Arc<Notify>) {
        self.push(Scripted {
            response: Ok(RawResponse::ok(body)),
            gate: Some(gate),
        });
    }

    pub(crate) fn push_transport_error(&self, message: impl Into<String>) {
        self.push(Scripted {
            response: Err(message.into()),
            gate: None,
        });
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().expect("calls lock").len()
    }

    pub(crate) fn routes(&self) -> Vec<Route> {
        self.calls
            .lock()
            .expect("calls lock")
            .iter()
            .map(|(route, _)| route.clone())
            .collect()
    }

    pub(crate) fn forms(&self) -> Vec<Option<EmployeeFields>> {
        self.calls
            .lock()
            .expect("calls lock")
            .iter()
            .map(|(_, form)| form.clone())
            .collect()
    }

    pub(crate) async fn wait_for_calls(&self, expected: usize) {
        loop {
            let notified = self.call_made.notified();
            if self.call_count() >= expected {
                return;
            }
            notified.await;
        }
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(
        &self,
        route: &Route,
        form: Option<&EmployeeFields>,
    ) -> Result<RawResponse, ClientError> {
        self.calls
            .lock()
            .expect("calls lock")
            .push((route.clone(), form.cloned()));
        self.call_made.notify_waiters();

        let next = self.script.lock().expect("script lock").pop_front();
        let Some(scripted) = next else {
            return Err(ClientError::Transport {
                route: route.to_string(),
                message: "script exhausted".to_string(),
            });
        };
        if let Some(gate) = scripted.gate {
            gate.notified().await;
        }
        scripted.response.map_err(|message| ClientError::Transport {
            route: route.to_string(),
            message,
        })
    }
}

#[derive(Default)]
pub(crate) struct RecordingRenderer {
    states: Mutex<Vec<LoadState>>,
}

impl RecordingRenderer {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn states(&self) -> Vec<LoadState> {
        self.states.lock().expect("states lock").clone()
    }
}

impl RenderTrigger for RecordingRenderer {
    fn render(&self, state: &LoadState) {
        self.states.lock().expect("states lock").push(state.clone());
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Notice {
    Toast(String),
    Error { title: String, message: String },
    Cleared,
}

#[derive(Default)]
pub(crate) struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn notices(&self) -> Vec<Notice> {
        self.notices.lock().expect("notices lock").clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str) {
        self.notices
            .lock()
            .expect("notices lock")
            .push(Notice::Toast(message.to_string()));
    }

    fn show_error(&self, title: &str, message: &str) {
        self.notices.lock().expect("notices lock").push(Notice::Error {
            title: title.to_string(),
            message: message.to_string(),
        });
    }

    fn clear_error(&self) {
        self.notices.lock().expect("notices lock").push(Notice::Cleared);
    }
}

pub(crate) struct ScriptedDialog {
    confirm: bool,
    input: Option<EmployeeFields>,
    prefill: bool,
    prompts: Mutex<Vec<(Prompt, Option<EmployeeFields>)>>,
}

impl ScriptedDialog {
    pub(crate) fn new(confirm: bool, input: Option<EmployeeFields>) -> Arc<Self> {
        Arc::new(Self {
            confirm,
            input,
            prefill: true,
            prompts: Mutex::new(Vec::new()),
        })
    }

    /// Answers edits from `input` alone, like a CLI given every field.
    pub(crate) fn without_prefill(input: EmployeeFields) -> Arc<Self> {
        Arc::new(Self {
            confirm: true,
            input: Some(input),
            prefill: false,
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn prompts(&self) -> Vec<(Prompt, Option<EmployeeFields>)> {
        self.prompts.lock().expect("prompts lock").clone()
    }
}

#[async_trait]
impl Dialog for ScriptedDialog {
    async fn confirm(&self, prompt: &Prompt) -> bool {
        self.prompts
            .lock()
            .expect("prompts lock")
            .push((prompt.clone(), None));
        self.confirm
    }

    fn needs_prefill(&self) -> bool {
        self.prefill
    }

    async fn input(
        &self,
        prompt: &Prompt,
        initial: Option<&EmployeeFields>,
    ) -> Option<EmployeeFields> {
        self.prompts
            .lock()
            .expect("prompts lock")
            .push((prompt.clone(), initial.cloned()));
        self.input.clone()
    }
}

pub(crate) fn employee_json(
    id: i64,
    first_name: &str,
    last_name: &str,
    shift_start: &str,
    shift_end: &str,
) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "first_name": first_name,
        "last_name": last_name,
        "shift_start": shift_start,
        "shift_end": shift_end,
    })
}

pub(crate) fn list_body(employees: &[serde_json::Value]) -> String {
    let map: serde_json::Map<String, serde_json::Value> = employees
        .iter()
        .enumerate()
        .map(|(index, employee)| (index.to_string(), employee.clone()))
        .collect();
    serde_json::Value::Object(map).to_string()
}

pub(crate) fn error_body(message: &str) -> String {
    serde_json::json!({ "error": message }).to_string()
}

pub(crate) fn fields(first_name: &str, last_name: &str, start: &str, end: &str) -> EmployeeFields {
    EmployeeFields::new(
        first_name,
        last_name,
        start.parse().expect("shift start"),
        end.parse().expect("shift end"),
    )
}
