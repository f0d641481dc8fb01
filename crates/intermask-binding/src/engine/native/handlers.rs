use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tracing::debug;
use wry::WebViewBuilder;

use crate::events::{NativeEvent, PageLoadState};

/// Events raised by webview callbacks, drained by `next_event`.
pub(super) type EventQueue = Arc<Mutex<VecDeque<NativeEvent>>>;

pub(super) fn push(events: &EventQueue, event: NativeEvent) {
    if let Ok(mut queue) = events.lock() {
        queue.push_back(event);
    }
}

pub(super) fn attach_ipc_handler<'a>(
    builder: WebViewBuilder<'a>,
    events: EventQueue,
) -> WebViewBuilder<'a> {
    builder.with_ipc_handler(move |request| {
        let body = request.body().to_string();
        debug!(body_len = body.len(), "message from document");
        push(&events, NativeEvent::Message { body });
    })
}

pub(super) fn attach_page_load_handler<'a>(
    builder: WebViewBuilder<'a>,
    events: EventQueue,
) -> WebViewBuilder<'a> {
    builder.with_on_page_load_handler(move |event, url| {
        let state = PageLoadState::from(event);
        debug!(?state, url = %url, "page load");
        push(&events, NativeEvent::PageLoad { state, url });
    })
}

pub(super) fn attach_title_handler<'a>(
    builder: WebViewBuilder<'a>,
    events: EventQueue,
) -> WebViewBuilder<'a> {
    builder.with_document_title_changed_handler(move |title| {
        debug!(title = %title, "document title changed");
        push(&events, NativeEvent::TitleChanged { title });
    })
}
