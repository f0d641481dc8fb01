//! In-memory engine with no platform window.
//!
//! Keeps the observable state the binding reads back (title, size,
//! document readiness) and records every native call in a shared
//! [`CallJournal`]. The run loop replays a scripted event
//! queue; an optional idle event keeps the loop alive forever, like a
//! window nobody closes. A drained queue ends the current run only, so
//! a later navigation can be run again. A close request or destroy
//! ends every run.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tracing::debug;

use intermask_common::{Color, EngineError};

use crate::events::{NativeEvent, PageLoadState};

use super::{CreateOptions, NativeEngine, NativeWindow, NavigationTarget, SizeHint};

/// Size a headless window starts with.
pub const DEFAULT_SIZE: (i32, i32) = (800, 600);

/// One call that reached the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeCall {
    Create(CreateOptions),
    SetTitle(String),
    Title,
    Navigate(NavigationTarget),
    SetSize {
        width: i32,
        height: i32,
        hint: SizeHint,
    },
    Size,
    Eval(String),
    SetBackgroundColor(Color),
    SetUserAgent(String),
    IsDocumentReady,
    NextEvent,
    Destroy,
}

/// Shared, append-only record of native calls.
#[derive(Debug, Clone, Default)]
pub struct CallJournal {
    calls: Arc<Mutex<Vec<NativeCall>>>,
}

impl CallJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, call: NativeCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }

    /// Snapshot of every call so far.
    pub fn calls(&self) -> Vec<NativeCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of recorded calls matching `pred`.
    pub fn count(&self, pred: impl Fn(&NativeCall) -> bool) -> usize {
        self.calls
            .lock()
            .map(|c| c.iter().filter(|call| pred(call)).count())
            .unwrap_or(0)
    }
}

/// Engine producing [`HeadlessWindow`]s.
#[derive(Debug, Default)]
pub struct HeadlessEngine {
    journal: CallJournal,
    events: Vec<NativeEvent>,
    idle_event: Option<NativeEvent>,
    create_failure: Option<String>,
    destroy_failure: Option<String>,
}

impl HeadlessEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events the run loop will report, in order.
    pub fn with_events(mut self, events: impl IntoIterator<Item = NativeEvent>) -> Self {
        self.events.extend(events);
        self
    }

    /// Event reported whenever the queue is empty. Without one, the loop
    /// ends (as if the window was closed) once the queue drains.
    pub fn with_idle_event(mut self, event: NativeEvent) -> Self {
        self.idle_event = Some(event);
        self
    }

    /// Make window creation fail with the given reason.
    pub fn failing_create(mut self, reason: impl Into<String>) -> Self {
        self.create_failure = Some(reason.into());
        self
    }

    /// Make window teardown fail with the given reason.
    pub fn failing_destroy(mut self, reason: impl Into<String>) -> Self {
        self.destroy_failure = Some(reason.into());
        self
    }

    /// Handle to the journal shared with every window this engine creates.
    pub fn journal(&self) -> CallJournal {
        self.journal.clone()
    }
}

impl NativeEngine for HeadlessEngine {
    fn create(&mut self, options: CreateOptions) -> Result<Box<dyn NativeWindow>, EngineError> {
        self.journal.record(NativeCall::Create(options));
        if let Some(reason) = &self.create_failure {
            return Err(EngineError::Create(reason.clone()));
        }
        debug!(debug = options.debug, "headless window created");
        Ok(Box::new(HeadlessWindow {
            journal: self.journal.clone(),
            queue: self.events.drain(..).collect(),
            idle_event: self.idle_event.clone(),
            title: String::new(),
            size: DEFAULT_SIZE,
            min_size: None,
            max_size: None,
            document_ready: false,
            closed: false,
            destroyed: false,
            destroy_failure: self.destroy_failure.clone(),
        }))
    }
}

/// A window that exists only in memory.
#[derive(Debug)]
pub struct HeadlessWindow {
    journal: CallJournal,
    queue: VecDeque<NativeEvent>,
    idle_event: Option<NativeEvent>,
    title: String,
    size: (i32, i32),
    min_size: Option<(i32, i32)>,
    max_size: Option<(i32, i32)>,
    document_ready: bool,
    closed: bool,
    destroyed: bool,
    destroy_failure: Option<String>,
}

impl HeadlessWindow {
    fn ensure_alive(&self) -> Result<(), EngineError> {
        if self.destroyed {
            Err(EngineError::Other("window handle was destroyed".into()))
        } else {
            Ok(())
        }
    }
}

impl NativeWindow for HeadlessWindow {
    fn set_title(&mut self, title: &str) -> Result<(), EngineError> {
        self.journal.record(NativeCall::SetTitle(title.to_string()));
        self.ensure_alive()?;
        self.title = title.to_string();
        Ok(())
    }

    fn title(&self) -> Result<String, EngineError> {
        self.journal.record(NativeCall::Title);
        self.ensure_alive()?;
        Ok(self.title.clone())
    }

    fn navigate(&mut self, target: &NavigationTarget) -> Result<(), EngineError> {
        self.journal.record(NativeCall::Navigate(target.clone()));
        self.ensure_alive()?;
        if target.as_str().trim().is_empty() {
            return Err(EngineError::Navigation("empty navigation target".into()));
        }

        let url = match target {
            NavigationTarget::Url(url) => url.clone(),
            NavigationTarget::Html(_) => "about:blank".to_string(),
        };
        self.document_ready = false;
        self.queue.push_back(NativeEvent::PageLoad {
            state: PageLoadState::Started,
            url: url.clone(),
        });
        self.queue.push_back(NativeEvent::PageLoad {
            state: PageLoadState::Finished,
            url,
        });
        Ok(())
    }

    fn set_size(&mut self, width: i32, height: i32, hint: SizeHint) -> Result<(), EngineError> {
        self.journal.record(NativeCall::SetSize {
            width,
            height,
            hint,
        });
        self.ensure_alive()?;
        if width <= 0 || height <= 0 {
            return Err(EngineError::Resize(format!(
                "invalid window size {width}x{height}"
            )));
        }

        match hint {
            SizeHint::None | SizeHint::Fixed => self.size = (width, height),
            SizeHint::Min => self.min_size = Some((width, height)),
            SizeHint::Max => self.max_size = Some((width, height)),
        }

        let (mut w, mut h) = self.size;
        if let Some((min_w, min_h)) = self.min_size {
            w = w.max(min_w);
            h = h.max(min_h);
        }
        if let Some((max_w, max_h)) = self.max_size {
            w = w.min(max_w);
            h = h.min(max_h);
        }
        self.size = (w, h);
        Ok(())
    }

    fn size(&self) -> Result<(i32, i32), EngineError> {
        self.journal.record(NativeCall::Size);
        self.ensure_alive()?;
        Ok(self.size)
    }

    fn eval(&mut self, script: &str) -> Result<(), EngineError> {
        self.journal.record(NativeCall::Eval(script.to_string()));
        self.ensure_alive()
    }

    fn set_background_color(&mut self, color: Color) -> Result<(), EngineError> {
        self.journal.record(NativeCall::SetBackgroundColor(color));
        self.ensure_alive()
    }

    fn set_user_agent(&mut self, agent: &str) -> Result<(), EngineError> {
        self.journal.record(NativeCall::SetUserAgent(agent.to_string()));
        self.ensure_alive()
    }

    fn is_document_ready(&self) -> bool {
        self.journal.record(NativeCall::IsDocumentReady);
        !self.destroyed && self.document_ready
    }

    fn next_event(&mut self) -> Result<Option<NativeEvent>, EngineError> {
        self.journal.record(NativeCall::NextEvent);
        self.ensure_alive()?;
        if self.closed {
            return Ok(None);
        }

        let event = match self.queue.pop_front() {
            Some(event) => event,
            None => match &self.idle_event {
                Some(idle) => idle.clone(),
                None => return Ok(None),
            },
        };

        match &event {
            NativeEvent::PageLoad {
                state: PageLoadState::Finished,
                ..
            } => self.document_ready = true,
            NativeEvent::TitleChanged { title } => self.title = title.clone(),
            NativeEvent::Resized { width, height } => self.size = (*width, *height),
            NativeEvent::CloseRequested => self.closed = true,
            _ => {}
        }
        Ok(Some(event))
    }

    fn destroy(&mut self) -> Result<(), EngineError> {
        self.journal.record(NativeCall::Destroy);
        self.ensure_alive()?;
        if let Some(reason) = &self.destroy_failure {
            return Err(EngineError::Other(reason.clone()));
        }
        self.destroyed = true;
        self.closed = true;
        debug!("headless window destroyed");
        Ok(())
    }
}
