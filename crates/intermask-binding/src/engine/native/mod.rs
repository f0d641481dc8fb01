//! Real window backend: a winit window hosting a wry webview.
//!
//! The webview is built on the first `navigate`, `eval` or `next_event`,
//! so the user agent can still be changed up to that point. The winit
//! loop is pumped from `next_event`; host callbacks run between pumps.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowAttributes, WindowId};
use wry::{WebView, WebViewBuilder};

use intermask_common::{Color, EngineError};

use crate::events::{NativeEvent, PageLoadState};
use crate::ipc::IPC_INIT_SCRIPT;

use self::handlers::EventQueue;

use super::{CreateOptions, NativeEngine, NativeWindow, NavigationTarget, SizeHint};

mod handlers;

/// How long one pump waits for OS events before checking webview events.
const PUMP_TIMEOUT: Duration = Duration::from_millis(16);

const INITIAL_SIZE: (f64, f64) = (800.0, 600.0);

/// Engine owning the process's winit event loop. Creates one window.
pub struct WryEngine {
    event_loop: Option<EventLoop<()>>,
}

impl WryEngine {
    pub fn new() -> Result<Self, EngineError> {
        #[cfg(target_os = "linux")]
        gtk::init().map_err(|e| EngineError::Create(format!("gtk init failed: {e}")))?;

        let event_loop = EventLoop::new().map_err(|e| EngineError::EventLoop(e.to_string()))?;
        Ok(Self {
            event_loop: Some(event_loop),
        })
    }
}

impl NativeEngine for WryEngine {
    fn create(&mut self, options: CreateOptions) -> Result<Box<dyn NativeWindow>, EngineError> {
        if options.parent.is_some() {
            return Err(EngineError::NotSupported(
                "embedding into a parent window".into(),
            ));
        }
        let event_loop = self.event_loop.take().ok_or_else(|| {
            EngineError::NotSupported("the event loop already drives a window".into())
        })?;

        let attrs = WindowAttributes::default()
            .with_title("")
            .with_visible(false)
            .with_inner_size(LogicalSize::new(INITIAL_SIZE.0, INITIAL_SIZE.1));
        #[allow(deprecated)]
        let window = event_loop
            .create_window(attrs)
            .map_err(|e| EngineError::Create(e.to_string()))?;

        info!(debug = options.debug, "native window created");
        Ok(Box::new(WryWindow {
            webview: None,
            window,
            event_loop,
            events: EventQueue::default(),
            title: String::new(),
            debug: options.debug,
            user_agent: None,
            background: None,
            document_ready: false,
            shown: false,
            closed: false,
            destroyed: false,
        }))
    }
}

/// A winit window plus its (lazily built) webview.
pub struct WryWindow {
    // Declared first: the webview must drop before its window.
    webview: Option<WebView>,
    window: Window,
    event_loop: EventLoop<()>,
    events: EventQueue,
    title: String,
    debug: bool,
    user_agent: Option<String>,
    background: Option<Color>,
    document_ready: bool,
    shown: bool,
    closed: bool,
    destroyed: bool,
}

impl WryWindow {
    fn ensure_alive(&self) -> Result<(), EngineError> {
        if self.destroyed {
            Err(EngineError::Other("window handle was destroyed".into()))
        } else {
            Ok(())
        }
    }

    fn logical_size(&self) -> (i32, i32) {
        to_logical(self.window.inner_size(), self.window.scale_factor())
    }

    /// Whole-window bounds for the child webview.
    fn bounds(&self) -> wry::Rect {
        let (width, height) = self.logical_size();
        wry::Rect {
            position: wry::dpi::Position::Logical(wry::dpi::LogicalPosition::new(0.0, 0.0)),
            size: wry::dpi::Size::Logical(wry::dpi::LogicalSize::new(
                f64::from(width),
                f64::from(height),
            )),
        }
    }

    fn ensure_webview(&mut self) -> Result<&mut WebView, EngineError> {
        let webview = match self.webview.take() {
            Some(webview) => webview,
            None => self.build_webview()?,
        };
        Ok(self.webview.insert(webview))
    }

    fn build_webview(&self) -> Result<WebView, EngineError> {
        let mut builder = WebViewBuilder::new()
            .with_bounds(self.bounds())
            .with_devtools(self.debug)
            .with_initialization_script(IPC_INIT_SCRIPT);

        if let Some(agent) = &self.user_agent {
            builder = builder.with_user_agent(agent.as_str());
        }
        if let Some(color) = self.background {
            builder = builder.with_background_color(color.to_tuple());
        }

        builder = handlers::attach_ipc_handler(builder, Arc::clone(&self.events));
        builder = handlers::attach_page_load_handler(builder, Arc::clone(&self.events));
        builder = handlers::attach_title_handler(builder, Arc::clone(&self.events));

        let webview = builder
            .build_as_child(&self.window)
            .map_err(|e| EngineError::Create(format!("webview: {e}")))?;
        debug!(devtools = self.debug, "webview created");
        Ok(webview)
    }

    fn sync_bounds(&self) {
        if let Some(webview) = &self.webview {
            if let Err(e) = webview.set_bounds(self.bounds()) {
                tracing::warn!(error = %e, "failed to resize webview");
            }
        }
    }

    fn pop_event(&self) -> Option<NativeEvent> {
        self.events.lock().ok().and_then(|mut queue| queue.pop_front())
    }

    /// Apply an event's side effects before it is handed out.
    fn observe(&mut self, event: &NativeEvent) {
        match event {
            NativeEvent::PageLoad { state, .. } => {
                self.document_ready = *state == PageLoadState::Finished;
            }
            NativeEvent::TitleChanged { title } => {
                self.window.set_title(title);
                self.title = title.clone();
            }
            NativeEvent::Resized { .. } => self.sync_bounds(),
            NativeEvent::CloseRequested => self.closed = true,
            NativeEvent::Message { .. } => {}
        }
    }

    /// Run the OS loop once, collecting window events.
    fn pump(&mut self) {
        let mut pump = Pump {
            window_id: self.window.id(),
            scale_factor: self.window.scale_factor(),
            events: &self.events,
        };
        let status = self
            .event_loop
            .pump_app_events(Some(PUMP_TIMEOUT), &mut pump);

        #[cfg(target_os = "linux")]
        {
            while gtk::events_pending() {
                gtk::main_iteration_do(false);
            }
        }

        if let PumpStatus::Exit(code) = status {
            debug!(code, "event loop exited");
            self.closed = true;
        }
    }
}

impl NativeWindow for WryWindow {
    fn set_title(&mut self, title: &str) -> Result<(), EngineError> {
        self.ensure_alive()?;
        self.window.set_title(title);
        self.title = title.to_string();
        Ok(())
    }

    fn title(&self) -> Result<String, EngineError> {
        self.ensure_alive()?;
        Ok(self.title.clone())
    }

    fn navigate(&mut self, target: &NavigationTarget) -> Result<(), EngineError> {
        self.ensure_alive()?;
        let webview = self.ensure_webview()?;
        let result = match target {
            NavigationTarget::Url(url) => webview.load_url(url),
            NavigationTarget::Html(html) => webview.load_html(html),
        };
        result.map_err(|e| EngineError::Navigation(e.to_string()))?;
        self.document_ready = false;
        Ok(())
    }

    fn set_size(&mut self, width: i32, height: i32, hint: SizeHint) -> Result<(), EngineError> {
        self.ensure_alive()?;
        if width <= 0 || height <= 0 {
            return Err(EngineError::Resize(format!(
                "invalid window size {width}x{height}"
            )));
        }

        let size = LogicalSize::new(f64::from(width), f64::from(height));
        match hint {
            SizeHint::None => {
                self.window.set_resizable(true);
                let _ = self.window.request_inner_size(size);
            }
            SizeHint::Min => self.window.set_min_inner_size(Some(size)),
            SizeHint::Max => self.window.set_max_inner_size(Some(size)),
            SizeHint::Fixed => {
                self.window.set_resizable(false);
                let _ = self.window.request_inner_size(size);
            }
        }
        self.sync_bounds();
        Ok(())
    }

    fn size(&self) -> Result<(i32, i32), EngineError> {
        self.ensure_alive()?;
        Ok(self.logical_size())
    }

    fn eval(&mut self, script: &str) -> Result<(), EngineError> {
        self.ensure_alive()?;
        self.ensure_webview()?
            .evaluate_script(script)
            .map_err(|e| EngineError::Script(e.to_string()))
    }

    fn set_background_color(&mut self, color: Color) -> Result<(), EngineError> {
        self.ensure_alive()?;
        self.background = Some(color);
        match &self.webview {
            Some(webview) => webview
                .set_background_color(color.to_tuple())
                .map_err(|e| EngineError::Other(e.to_string())),
            None => Ok(()),
        }
    }

    fn set_user_agent(&mut self, agent: &str) -> Result<(), EngineError> {
        self.ensure_alive()?;
        if self.webview.is_some() {
            return Err(EngineError::NotSupported(
                "the user agent can only be changed before content is loaded".into(),
            ));
        }
        self.user_agent = Some(agent.to_string());
        Ok(())
    }

    fn is_document_ready(&self) -> bool {
        !self.destroyed && self.document_ready
    }

    fn next_event(&mut self) -> Result<Option<NativeEvent>, EngineError> {
        self.ensure_alive()?;
        if !self.shown {
            self.ensure_webview()?;
            self.window.set_visible(true);
            self.shown = true;
        }

        loop {
            if let Some(event) = self.pop_event() {
                self.observe(&event);
                return Ok(Some(event));
            }
            if self.closed {
                return Ok(None);
            }
            self.pump();
        }
    }

    fn destroy(&mut self) -> Result<(), EngineError> {
        self.ensure_alive()?;
        self.webview = None;
        self.window.set_visible(false);
        self.destroyed = true;
        self.closed = true;
        info!("native window destroyed");
        Ok(())
    }
}

/// Per-pump `ApplicationHandler` forwarding window events to the queue.
struct Pump<'a> {
    window_id: WindowId,
    scale_factor: f64,
    events: &'a EventQueue,
}

impl ApplicationHandler for Pump<'_> {
    fn resumed(&mut self, _event_loop: &ActiveEventLoop) {}

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        if window_id != self.window_id {
            return;
        }
        match event {
            WindowEvent::Resized(size) if size.width > 0 && size.height > 0 => {
                let (width, height) = to_logical(size, self.scale_factor);
                handlers::push(self.events, NativeEvent::Resized { width, height });
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.scale_factor = scale_factor;
            }
            WindowEvent::CloseRequested => {
                info!("window close requested");
                handlers::push(self.events, NativeEvent::CloseRequested);
            }
            _ => {}
        }
    }
}

fn to_logical(size: PhysicalSize<u32>, scale_factor: f64) -> (i32, i32) {
    let logical: LogicalSize<f64> = size.to_logical(scale_factor);
    (logical.width.round() as i32, logical.height.round() as i32)
}
