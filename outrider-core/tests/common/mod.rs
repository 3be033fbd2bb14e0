// Scripted in-memory driver standing in for the browser in engine tests.
#![allow(dead_code)]

use outrider_core::selectors::{self, js};
use outrider_driver::error::{DriverError, Result};
use outrider_driver::Driver;
use serde_json::{json, Value};
use std::sync::Mutex;

pub const FAKE_ORIGIN: &str = "https://www.linkedin.com";

#[derive(Clone, Debug)]
pub enum FakeHandle {
    Profile(usize),
    NextButton,
    AddNote,
    NoteInput,
    SendInvitation,
    OverlayClose,
    SearchInput,
    Username,
    Password,
    LoginSubmit,
    ConversationLink(String),
    Editor,
    ConversationSend,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FailStep {
    AddNoteVisible,
    NoteInputVisible,
    SendVisible,
    SendClick,
}

#[derive(Clone, Debug)]
pub struct FakeProfile {
    pub name: String,
    pub href: String,
    pub control_text: String,
    pub clickable: bool,
    pub fail_step: Option<FailStep>,
}

impl FakeProfile {
    pub fn unconnected(name: &str, href: &str) -> Self {
        Self {
            name: name.to_string(),
            href: href.to_string(),
            control_text: "Connect".to_string(),
            clickable: true,
            fail_step: None,
        }
    }

    pub fn pending(name: &str, href: &str) -> Self {
        Self {
            control_text: "Pending".to_string(),
            ..Self::unconnected(name, href)
        }
    }

    pub fn following(name: &str, href: &str) -> Self {
        Self {
            control_text: "Follow".to_string(),
            ..Self::unconnected(name, href)
        }
    }

    pub fn unknown(name: &str, href: &str) -> Self {
        Self {
            control_text: String::new(),
            clickable: false,
            ..Self::unconnected(name, href)
        }
    }

    pub fn failing_at(name: &str, href: &str, step: FailStep) -> Self {
        Self {
            fail_step: Some(step),
            ..Self::unconnected(name, href)
        }
    }
}

#[derive(Clone, Debug)]
pub struct FakePage {
    pub profiles: Vec<FakeProfile>,
    pub renders: bool,
}

impl FakePage {
    pub fn of(profiles: Vec<FakeProfile>) -> Self {
        Self {
            profiles,
            renders: true,
        }
    }

    pub fn blank_never_renders() -> Self {
        Self {
            profiles: Vec::new(),
            renders: false,
        }
    }
}

#[derive(Clone, Debug)]
pub struct FakeConversation {
    pub id: String,
    pub name: String,
}

impl FakeConversation {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
        }
    }
}

#[derive(Debug, Default)]
struct State {
    pages: Vec<FakePage>,
    current_page: usize,
    active_profile: Option<usize>,
    modal_open: bool,
    session_valid: bool,
    logged_in: bool,
    next_visible: bool,
    next_disabled: bool,
    next_aria_disabled: bool,
    navigations: Vec<String>,
    invites_sent: Vec<String>,
    overlay_clicks: u32,
    escapes: u32,
    filled_note: Option<String>,
    conversation_batches: Vec<Vec<FakeConversation>>,
    revealed_batches: usize,
    opened_conversation: Option<String>,
    typed_messages: Vec<(String, String)>,
    slept_ms: u64,
}

pub struct FakeDriver {
    state: Mutex<State>,
}

impl FakeDriver {
    pub fn with_pages(pages: Vec<FakePage>) -> Self {
        Self {
            state: Mutex::new(State {
                pages,
                session_valid: true,
                next_visible: true,
                revealed_batches: 1,
                ..State::default()
            }),
        }
    }

    pub fn logged_out(pages: Vec<FakePage>) -> Self {
        let driver = Self::with_pages(pages);
        driver.state.lock().unwrap().session_valid = false;
        driver
    }

    pub fn with_conversations(batches: Vec<Vec<FakeConversation>>) -> Self {
        let driver = Self::with_pages(Vec::new());
        driver.state.lock().unwrap().conversation_batches = batches;
        driver
    }

    pub fn set_next_invisible(&self) {
        self.state.lock().unwrap().next_visible = false;
    }

    pub fn set_next_disabled(&self) {
        self.state.lock().unwrap().next_disabled = true;
    }

    pub fn set_next_aria_disabled(&self) {
        self.state.lock().unwrap().next_aria_disabled = true;
    }

    pub fn invites_sent(&self) -> Vec<String> {
        self.state.lock().unwrap().invites_sent.clone()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.state.lock().unwrap().navigations.clone()
    }

    pub fn overlay_dismissals(&self) -> u32 {
        let state = self.state.lock().unwrap();
        state.overlay_clicks + state.escapes
    }

    pub fn modal_open(&self) -> bool {
        self.state.lock().unwrap().modal_open
    }

    pub fn filled_note(&self) -> Option<String> {
        self.state.lock().unwrap().filled_note.clone()
    }

    pub fn typed_messages(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().typed_messages.clone()
    }

    pub fn current_page(&self) -> usize {
        self.state.lock().unwrap().current_page
    }

    fn active_fail_step(state: &State) -> Option<FailStep> {
        let page = state.pages.get(state.current_page)?;
        let profile = page.profiles.get(state.active_profile?)?;
        profile.fail_step
    }

    fn next_button_exists(state: &State) -> bool {
        state.current_page + 1 < state.pages.len()
    }

    fn conversation_exists(state: &State, id: &str) -> bool {
        state
            .conversation_batches
            .iter()
            .take(state.revealed_batches)
            .flatten()
            .any(|c| c.id == id)
    }
}

impl Driver for FakeDriver {
    type Handle = FakeHandle;

    async fn navigate(&self, url: &str) -> Result<()> {
        self.state.lock().unwrap().navigations.push(url.to_string());
        Ok(())
    }

    async fn wait_for_selector(&self, selector: &str, timeout_ms: u64) -> Result<()> {
        let timeout = || {
            Err(DriverError::WaitTimeout {
                selector: selector.to_string(),
                timeout_ms,
            })
        };
        let state = self.state.lock().unwrap();
        match selector {
            selectors::RESULT_TITLE_LINK => {
                let renders = state
                    .pages
                    .get(state.current_page)
                    .map(|p| p.renders)
                    .unwrap_or(false);
                if renders { Ok(()) } else { timeout() }
            }
            selectors::ADD_NOTE_BUTTON => {
                if Self::active_fail_step(&state) == Some(FailStep::AddNoteVisible) {
                    timeout()
                } else {
                    Ok(())
                }
            }
            selectors::NOTE_INPUT => {
                if Self::active_fail_step(&state) == Some(FailStep::NoteInputVisible) {
                    timeout()
                } else {
                    Ok(())
                }
            }
            selectors::SEND_INVITATION_BUTTON => {
                if Self::active_fail_step(&state) == Some(FailStep::SendVisible) {
                    timeout()
                } else {
                    Ok(())
                }
            }
            selectors::CONVERSATION_ITEM => {
                if state.conversation_batches.is_empty() {
                    timeout()
                } else {
                    Ok(())
                }
            }
            _ => Ok(()),
        }
    }

    async fn locate(&self, selector: &str) -> Result<Vec<FakeHandle>> {
        let state = self.state.lock().unwrap();
        let handles = match selector {
            selectors::RESULT_TITLE_LINK => {
                let page = state.pages.get(state.current_page);
                match page {
                    Some(page) if page.renders => {
                        (0..page.profiles.len()).map(FakeHandle::Profile).collect()
                    }
                    _ => Vec::new(),
                }
            }
            selectors::NEXT_PAGE_BUTTON => {
                if Self::next_button_exists(&state) {
                    vec![FakeHandle::NextButton]
                } else {
                    Vec::new()
                }
            }
            selectors::ADD_NOTE_BUTTON => vec![FakeHandle::AddNote],
            selectors::NOTE_INPUT => vec![FakeHandle::NoteInput],
            selectors::SEND_INVITATION_BUTTON => vec![FakeHandle::SendInvitation],
            selectors::OVERLAY_CLOSE => {
                if state.modal_open {
                    vec![FakeHandle::OverlayClose]
                } else {
                    Vec::new()
                }
            }
            selectors::SEARCH_INPUT => vec![FakeHandle::SearchInput],
            selectors::LOGIN_USERNAME => vec![FakeHandle::Username],
            selectors::LOGIN_PASSWORD => vec![FakeHandle::Password],
            selectors::LOGIN_SUBMIT => vec![FakeHandle::LoginSubmit],
            selectors::CONVERSATION_EDITOR => vec![FakeHandle::Editor],
            selectors::CONVERSATION_SEND_BUTTON => vec![FakeHandle::ConversationSend],
            other if other.contains(".msg-conversation-listitem__link") => {
                let id = other
                    .trim_start_matches("li#")
                    .trim_end_matches(" .msg-conversation-listitem__link")
                    .replace('\\', "");
                if Self::conversation_exists(&state, &id) {
                    vec![FakeHandle::ConversationLink(id)]
                } else {
                    Vec::new()
                }
            }
            _ => Vec::new(),
        };
        Ok(handles)
    }

    async fn is_visible(&self, handle: &FakeHandle, _timeout_ms: u64) -> bool {
        let state = self.state.lock().unwrap();
        match handle {
            FakeHandle::SearchInput => state.session_valid || state.logged_in,
            FakeHandle::NextButton => state.next_visible,
            FakeHandle::OverlayClose => state.modal_open,
            _ => true,
        }
    }

    async fn is_disabled(&self, handle: &FakeHandle) -> Result<bool> {
        let state = self.state.lock().unwrap();
        Ok(matches!(handle, FakeHandle::NextButton) && state.next_disabled)
    }

    async fn attribute(&self, handle: &FakeHandle, name: &str) -> Result<Option<String>> {
        let state = self.state.lock().unwrap();
        let value = match (handle, name) {
            (FakeHandle::Profile(i), "href") => state
                .pages
                .get(state.current_page)
                .and_then(|p| p.profiles.get(*i))
                .map(|p| p.href.clone()),
            (FakeHandle::NextButton, "aria-disabled") => {
                if state.next_aria_disabled {
                    Some("true".to_string())
                } else {
                    None
                }
            }
            _ => None,
        };
        Ok(value)
    }

    async fn text(&self, handle: &FakeHandle) -> Result<String> {
        let state = self.state.lock().unwrap();
        let text = match handle {
            FakeHandle::Profile(i) => state
                .pages
                .get(state.current_page)
                .and_then(|p| p.profiles.get(*i))
                .map(|p| p.name.clone())
                .unwrap_or_default(),
            _ => String::new(),
        };
        Ok(text)
    }

    async fn click(&self, handle: &FakeHandle) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        match handle {
            FakeHandle::NextButton => {
                if state.current_page + 1 < state.pages.len() {
                    state.current_page += 1;
                    state.active_profile = None;
                }
            }
            FakeHandle::OverlayClose => {
                state.modal_open = false;
                state.overlay_clicks += 1;
            }
            FakeHandle::SendInvitation => {
                if Self::active_fail_step(&state) == Some(FailStep::SendClick) {
                    return Err(DriverError::Browser("send click failed".to_string()));
                }
                let name = state
                    .active_profile
                    .and_then(|i| {
                        state
                            .pages
                            .get(state.current_page)
                            .and_then(|p| p.profiles.get(i))
                    })
                    .map(|p| p.name.clone())
                    .unwrap_or_default();
                state.invites_sent.push(name);
                state.modal_open = false;
            }
            FakeHandle::LoginSubmit => {
                state.logged_in = true;
            }
            FakeHandle::ConversationLink(id) => {
                state.opened_conversation = Some(id.clone());
            }
            _ => {}
        }
        Ok(())
    }

    async fn fill(&self, handle: &FakeHandle, text: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if let FakeHandle::NoteInput = handle {
            state.filled_note = Some(text.to_string());
        }
        Ok(())
    }

    async fn type_text(&self, handle: &FakeHandle, text: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if let FakeHandle::Editor = handle {
            let conversation = state.opened_conversation.clone().unwrap_or_default();
            state.typed_messages.push((conversation, text.to_string()));
        }
        Ok(())
    }

    async fn press_key(&self, _key: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.escapes += 1;
        state.modal_open = false;
        Ok(())
    }

    async fn evaluate_in_page(&self, handle: &FakeHandle, script: &str) -> Result<Value> {
        let mut state = self.state.lock().unwrap();
        let FakeHandle::Profile(i) = handle else {
            return Ok(Value::Null);
        };
        let Some(profile) = state
            .pages
            .get(state.current_page)
            .and_then(|p| p.profiles.get(*i))
            .cloned()
        else {
            return Ok(Value::Null);
        };
        if script == js::RELATIONSHIP_TEXT {
            Ok(json!(profile.control_text))
        } else if script == js::RELATIONSHIP_CLICK {
            if profile.clickable {
                state.active_profile = Some(*i);
                state.modal_open = true;
            }
            Ok(json!(profile.clickable))
        } else {
            Ok(Value::Null)
        }
    }

    async fn evaluate(&self, script: &str) -> Result<Value> {
        let mut state = self.state.lock().unwrap();
        if script.starts_with(js::DISCOVER_CONVERSATIONS_PREFIX) {
            let visible: Vec<Value> = state
                .conversation_batches
                .iter()
                .take(state.revealed_batches)
                .flatten()
                .map(|c| json!({ "id": c.id, "name": c.name }))
                .collect();
            return Ok(Value::Array(visible));
        }
        if script == js::CLICK_LOAD_MORE {
            return Ok(json!(false));
        }
        if script == js::SCROLL_CONVERSATION_LIST {
            if state.revealed_batches < state.conversation_batches.len() {
                state.revealed_batches += 1;
                return Ok(json!(true));
            }
            return Ok(json!(false));
        }
        Ok(Value::Null)
    }

    async fn current_url(&self) -> Result<String> {
        let state = self.state.lock().unwrap();
        if state.logged_in {
            return Ok(format!("{FAKE_ORIGIN}/feed/"));
        }
        Ok(state.navigations.last().cloned().unwrap_or_default())
    }

    async fn sleep(&self, ms: u64) {
        self.state.lock().unwrap().slept_ms += ms;
    }
}
