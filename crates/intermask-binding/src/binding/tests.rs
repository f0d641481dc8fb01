use std::cell::{Cell, RefCell};
use std::rc::Rc;

use intermask_common::{
    ArgumentError, BindingError, Color, EngineError, HostValue, LifecycleError, ValueKind,
    WindowState,
};

use crate::engine::{CallJournal, CreateOptions, HeadlessEngine, NativeCall, NavigationTarget, SizeHint};
use crate::events::{NativeEvent, PageLoadState};

use super::{Binding, WindowInfo};

fn live(engine: HeadlessEngine) -> (Binding, CallJournal) {
    let journal = engine.journal();
    let binding = Binding::create(engine, &[]).unwrap();
    (binding, journal)
}

fn resize(width: i32, height: i32) -> NativeEvent {
    NativeEvent::Resized { width, height }
}

/// A callback counting its invocations and keeping the last arguments.
fn recorder() -> (HostValue, Rc<Cell<usize>>, Rc<RefCell<Vec<HostValue>>>) {
    let count = Rc::new(Cell::new(0));
    let last = Rc::new(RefCell::new(Vec::new()));
    let (c, l) = (count.clone(), last.clone());
    let f = HostValue::function(move |args| {
        c.set(c.get() + 1);
        *l.borrow_mut() = args.to_vec();
        Ok(HostValue::Undefined)
    });
    (f, count, last)
}

// -- construct --

#[test]
fn construct_creates_a_debug_top_level_window() {
    let (binding, journal) = live(HeadlessEngine::new());
    assert_eq!(binding.state(), WindowState::Live);
    assert_eq!(
        journal.calls(),
        vec![NativeCall::Create(CreateOptions {
            debug: true,
            parent: None
        })]
    );
}

#[test]
fn construct_with_arguments_is_rejected_before_creation() {
    let engine = HeadlessEngine::new();
    let journal = engine.journal();
    let err = Binding::create(engine, &[HostValue::from("x")]).unwrap_err();
    assert!(matches!(
        err,
        BindingError::Argument(ArgumentError::Arity {
            method: "construct",
            expected: 0,
            found: 1
        })
    ));
    assert!(journal.is_empty());
}

#[test]
fn construct_twice_is_a_lifecycle_error() {
    let (binding, journal) = live(HeadlessEngine::new());
    assert_eq!(
        binding.construct(&[]).unwrap_err(),
        BindingError::Lifecycle(LifecycleError::AlreadyConstructed)
    );
    assert_eq!(journal.len(), 1);
}

#[test]
fn construct_failure_leaves_binding_uninitialized() {
    let binding = Binding::new(HeadlessEngine::new().failing_create("no display"));
    let err = binding.construct(&[]).unwrap_err();
    assert_eq!(
        err,
        BindingError::Engine(EngineError::Create("no display".into()))
    );
    assert_eq!(binding.state(), WindowState::Uninitialized);
}

#[test]
fn methods_before_construct_are_lifecycle_errors() {
    let binding = Binding::new(HeadlessEngine::new());
    let err = binding.set_title("x").unwrap_err();
    assert_eq!(
        err,
        BindingError::Lifecycle(LifecycleError::NotLive {
            method: "setTitle",
            state: WindowState::Uninitialized
        })
    );
    assert!(matches!(
        binding.destroy(),
        Err(BindingError::Lifecycle(LifecycleError::NotLive { .. }))
    ));
    assert_eq!(binding.state(), WindowState::Uninitialized);
}

// -- argument validation --

#[test]
fn arity_and_kind_errors_never_reach_the_engine() {
    let (binding, journal) = live(HeadlessEngine::new());
    let f = HostValue::function(|_| Ok(HostValue::Undefined));

    let bad_calls: Vec<(&str, Vec<HostValue>)> = vec![
        ("setTitle", vec![]),
        ("setTitle", vec![HostValue::from(1)]),
        ("setTitle", vec![HostValue::from("a"), HostValue::from("b")]),
        ("setSize", vec![HostValue::from(800)]),
        ("setSize", vec![HostValue::from(800), HostValue::from("600")]),
        ("navigate", vec![HostValue::Null]),
        ("evaluate", vec![f.clone()]),
        ("getTitle", vec![HostValue::from("extra")]),
        ("run", vec![HostValue::from(true)]),
        ("destroy", vec![HostValue::Undefined]),
        ("onEvent", vec![HostValue::from("not callable")]),
        ("onResize", vec![]),
        ("setBackgroundColor", vec![HostValue::from(0)]),
        ("setCustomUserAgent", vec![]),
        ("getAdditionalInfo", vec![f]),
        ("isDocumentReady", vec![HostValue::Null]),
    ];

    for (name, args) in &bad_calls {
        let err = binding.call(name, args).unwrap_err();
        assert!(
            matches!(err, BindingError::Argument(_)),
            "{name}: expected an argument error, got {err:?}"
        );
    }
    assert_eq!(journal.len(), 1, "only Create reached the engine");
    assert_eq!(binding.state(), WindowState::Live);
}

#[test]
fn kind_error_reports_position_and_kinds() {
    let (binding, _) = live(HeadlessEngine::new());
    let err = binding
        .call("setSize", &[HostValue::from(800), HostValue::from("600")])
        .unwrap_err();
    assert_eq!(
        err,
        BindingError::Argument(ArgumentError::Kind {
            method: "setSize",
            index: 1,
            expected: ValueKind::Number,
            found: ValueKind::String
        })
    );
    assert_eq!(
        err.to_string(),
        "setSize: argument at index 1 should be number, got string"
    );
}

#[test]
fn unknown_method_is_an_argument_error() {
    let (binding, _) = live(HeadlessEngine::new());
    assert_eq!(
        binding.call("maximize", &[]).unwrap_err(),
        BindingError::Argument(ArgumentError::UnknownMethod("maximize".into()))
    );
}

#[test]
fn bad_colour_is_rejected_before_the_engine() {
    let (binding, journal) = live(HeadlessEngine::new());
    let err = binding
        .call("setBackgroundColor", &[HostValue::from("chartreuse-ish")])
        .unwrap_err();
    assert!(matches!(
        err,
        BindingError::Argument(ArgumentError::Invalid { index: 0, .. })
    ));
    assert_eq!(journal.count(|c| matches!(c, NativeCall::SetBackgroundColor(_))), 0);
}

#[test]
fn validation_runs_before_the_lifecycle_check() {
    let (binding, _) = live(HeadlessEngine::new());
    binding.destroy().unwrap();
    assert!(matches!(
        binding.call("setTitle", &[]),
        Err(BindingError::Argument(_))
    ));
    assert!(matches!(
        binding.call("setTitle", &[HostValue::from("x")]),
        Err(BindingError::Lifecycle(_))
    ));
}

// -- host methods --

#[test]
fn title_round_trips() {
    let (binding, _) = live(HeadlessEngine::new());
    binding.call("setTitle", &[HostValue::from("Hello")]).unwrap();
    assert_eq!(
        binding.call("getTitle", &[]).unwrap(),
        HostValue::from("Hello")
    );

    binding.set_title("").unwrap();
    assert_eq!(binding.title().unwrap(), "");
}

#[test]
fn set_size_forwards_with_no_hint() {
    let (binding, journal) = live(HeadlessEngine::new());
    binding
        .call("setSize", &[HostValue::from(1024), HostValue::from(768)])
        .unwrap();
    assert_eq!(
        journal.calls().last(),
        Some(&NativeCall::SetSize {
            width: 1024,
            height: 768,
            hint: SizeHint::None
        })
    );
    assert_eq!(
        binding.additional_info().unwrap(),
        WindowInfo {
            width: 1024,
            height: 768
        }
    );
}

#[test]
fn engine_failures_propagate_and_keep_the_window_live() {
    let (binding, _) = live(HeadlessEngine::new());
    let err = binding
        .call("setSize", &[HostValue::from(0), HostValue::from(600)])
        .unwrap_err();
    assert!(matches!(err, BindingError::Engine(EngineError::Resize(_))));
    assert_eq!(binding.state(), WindowState::Live);

    let err = binding.navigate("   ").unwrap_err();
    assert!(matches!(err, BindingError::Engine(EngineError::Navigation(_))));
}

#[test]
fn navigate_classifies_urls_and_documents() {
    let (binding, journal) = live(HeadlessEngine::new());
    binding.navigate("https://example.com").unwrap();
    binding.navigate("<h1>Hello</h1>").unwrap();
    let navigations: Vec<_> = journal
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            NativeCall::Navigate(target) => Some(target),
            _ => None,
        })
        .collect();
    assert_eq!(
        navigations,
        vec![
            NavigationTarget::Url("https://example.com".into()),
            NavigationTarget::Html("<h1>Hello</h1>".into()),
        ]
    );
}

#[test]
fn evaluate_is_fire_and_forget() {
    let (binding, journal) = live(HeadlessEngine::new());
    let result = binding
        .call("evaluate", &[HostValue::from("document.title = 'x'")])
        .unwrap();
    assert!(result.is_undefined());
    assert_eq!(
        journal.calls().last(),
        Some(&NativeCall::Eval("document.title = 'x'".into()))
    );
}

// -- extension methods --

#[test]
fn background_colour_and_user_agent_reach_the_engine() {
    let (binding, journal) = live(HeadlessEngine::new());
    binding
        .call("setBackgroundColor", &[HostValue::from("#1e1e2e")])
        .unwrap();
    binding
        .call("setCustomUserAgent", &[HostValue::from("intermask-test/1.0")])
        .unwrap();
    let calls = journal.calls();
    assert!(calls.contains(&NativeCall::SetBackgroundColor(Color::from_rgba(
        0x1e, 0x1e, 0x2e, 255
    ))));
    assert!(calls.contains(&NativeCall::SetUserAgent("intermask-test/1.0".into())));
}

#[test]
fn additional_info_is_an_object_with_the_size() {
    let (binding, _) = live(HeadlessEngine::new());
    let info = binding.call("getAdditionalInfo", &[]).unwrap();
    assert_eq!(info.get("width"), Some(&HostValue::from(800)));
    assert_eq!(info.get("height"), Some(&HostValue::from(600)));
}

#[test]
fn additional_info_renders_integer_sizes() {
    let (binding, _) = live(HeadlessEngine::new());
    let info = binding.call("getAdditionalInfo", &[]).unwrap();
    assert_eq!(info.to_json().to_string(), r#"{"height":600,"width":800}"#);
}

#[test]
fn document_ready_follows_page_load() {
    let (binding, _) = live(HeadlessEngine::new());
    assert_eq!(
        binding.call("isDocumentReady", &[]).unwrap(),
        HostValue::Boolean(false)
    );
    binding.navigate("about:blank").unwrap();
    binding.run().unwrap();
    assert!(binding.is_document_ready().unwrap());
}

#[test]
fn registering_does_not_invoke_the_callback() {
    let (binding, journal) = live(HeadlessEngine::new());
    let (f, count, _) = recorder();
    binding.call("onEvent", &[f.clone()]).unwrap();
    binding.call("onResize", &[f]).unwrap();
    assert_eq!(count.get(), 0);
    assert_eq!(journal.len(), 1);
}

#[test]
fn registering_after_destroy_is_a_lifecycle_error() {
    let (binding, _) = live(HeadlessEngine::new());
    binding.destroy().unwrap();
    let (f, _, _) = recorder();
    assert!(matches!(
        binding.call("onEvent", &[f]),
        Err(BindingError::Lifecycle(LifecycleError::NotLive {
            state: WindowState::Destroyed,
            ..
        }))
    ));
}

// -- run loop and event delivery --

#[test]
fn events_are_routed_to_their_slots_in_order() {
    let engine = HeadlessEngine::new().with_events([
        NativeEvent::TitleChanged {
            title: "Docs".into(),
        },
        resize(640, 480),
        NativeEvent::Message {
            body: r#"{"kind":"ping","payload":"hi"}"#.into(),
        },
    ]);
    let (binding, _) = live(engine);

    let seen = Rc::new(RefCell::new(Vec::new()));
    let s = seen.clone();
    binding
        .call(
            "onEvent",
            &[HostValue::function(move |args| {
                let kind = args[0].get("type").and_then(|t| t.as_str()).unwrap_or("");
                s.borrow_mut().push(kind.to_string());
                Ok(HostValue::Undefined)
            })],
        )
        .unwrap();
    let (on_resize, resize_count, resize_args) = recorder();
    binding.call("onResize", &[on_resize]).unwrap();

    binding.call("run", &[]).unwrap();

    assert_eq!(*seen.borrow(), vec!["titleChanged", "message"]);
    assert_eq!(resize_count.get(), 1);
    assert_eq!(
        *resize_args.borrow(),
        vec![HostValue::from(640), HostValue::from(480)]
    );
    assert_eq!(binding.title().unwrap(), "Docs");
    assert!(!binding.is_running());
}

#[test]
fn events_without_a_callback_are_dropped() {
    let engine = HeadlessEngine::new().with_events([resize(1, 1), NativeEvent::CloseRequested]);
    let (binding, _) = live(engine);
    binding.run().unwrap();
    assert_eq!(binding.state(), WindowState::Live);
}

#[test]
fn replacing_a_callback_drops_the_old_one() {
    let engine = HeadlessEngine::new().with_events([resize(10, 10)]);
    let (binding, _) = live(engine);
    let (first, first_count, _) = recorder();
    let (second, second_count, _) = recorder();
    binding.call("onResize", &[first]).unwrap();
    binding.call("onResize", &[second]).unwrap();
    binding.run().unwrap();
    assert_eq!(first_count.get(), 0);
    assert_eq!(second_count.get(), 1);
}

#[test]
fn destroy_from_a_callback_ends_run() {
    let engine = HeadlessEngine::new().with_idle_event(resize(800, 600));
    let (binding, journal) = live(engine);

    let weak = binding.downgrade();
    let calls = Rc::new(Cell::new(0));
    let c = calls.clone();
    binding
        .on_resize(intermask_common::HostFunction::new(move |_| {
            c.set(c.get() + 1);
            if let Some(binding) = weak.upgrade() {
                binding.destroy().map_err(|e| e.to_string())?;
            }
            Ok(HostValue::Undefined)
        }))
        .unwrap();

    binding.run().unwrap();

    assert_eq!(calls.get(), 1);
    assert_eq!(binding.state(), WindowState::Destroyed);
    assert!(!binding.is_running());
    assert_eq!(journal.count(|c| *c == NativeCall::Destroy), 1);
    assert_eq!(journal.count(|c| *c == NativeCall::NextEvent), 1);
}

#[test]
fn failed_teardown_still_invalidates_the_handle() {
    let (binding, journal) = live(HeadlessEngine::new().failing_destroy("compositor gone"));

    let err = binding.destroy().unwrap_err();
    assert!(matches!(err, BindingError::Engine(EngineError::Other(_))));
    assert_eq!(binding.state(), WindowState::Destroyed);
    assert!(matches!(
        binding.destroy().unwrap_err(),
        BindingError::Lifecycle(LifecycleError::AlreadyDestroyed)
    ));
    assert!(matches!(
        binding.set_title("x").unwrap_err(),
        BindingError::Lifecycle(LifecycleError::NotLive { .. })
    ));
    assert_eq!(journal.count(|c| *c == NativeCall::Destroy), 1);
}

#[test]
fn run_again_after_a_later_navigation() {
    let (binding, _) = live(HeadlessEngine::new());
    let (f, count, last) = recorder();
    binding.on_event(f.as_function().unwrap().clone()).unwrap();

    binding.run().unwrap();
    assert_eq!(count.get(), 0);

    binding.navigate("https://example.com").unwrap();
    binding.run().unwrap();
    assert_eq!(count.get(), 2);
    let event = last.borrow()[0].clone();
    assert_eq!(event.get("url").and_then(HostValue::as_str), Some("https://example.com"));
    assert!(binding.is_document_ready().unwrap());
}

#[test]
fn every_method_fails_after_destroy() {
    let (binding, _) = live(HeadlessEngine::new());
    binding.call("destroy", &[]).unwrap();
    let f = HostValue::function(|_| Ok(HostValue::Undefined));

    let calls: Vec<(&str, Vec<HostValue>)> = vec![
        ("setTitle", vec![HostValue::from("x")]),
        ("setSize", vec![HostValue::from(1), HostValue::from(1)]),
        ("navigate", vec![HostValue::from("about:blank")]),
        ("run", vec![]),
        ("evaluate", vec![HostValue::from("1")]),
        ("getTitle", vec![]),
        ("onEvent", vec![f.clone()]),
        ("onResize", vec![f]),
        ("setBackgroundColor", vec![HostValue::from("#000000")]),
        ("setCustomUserAgent", vec![HostValue::from("ua")]),
        ("getAdditionalInfo", vec![]),
        ("isDocumentReady", vec![]),
    ];
    for (name, args) in &calls {
        assert!(
            matches!(binding.call(name, args), Err(BindingError::Lifecycle(_))),
            "{name} should fail after destroy"
        );
    }
    assert_eq!(
        binding.call("destroy", &[]).unwrap_err(),
        BindingError::Lifecycle(LifecycleError::AlreadyDestroyed)
    );
}

#[test]
fn failing_callback_stops_run_with_callback_error() {
    let engine = HeadlessEngine::new().with_idle_event(NativeEvent::PageLoad {
        state: PageLoadState::Started,
        url: "about:blank".into(),
    });
    let (binding, _) = live(engine);
    binding
        .call(
            "onEvent",
            &[HostValue::function(|_| Err("boom".to_string()))],
        )
        .unwrap();

    let err = binding.run().unwrap_err();
    assert_eq!(
        err,
        BindingError::Callback {
            event: "event".into(),
            message: "boom".into()
        }
    );
    assert!(!binding.is_running());
    assert_eq!(binding.state(), WindowState::Live);
}

#[test]
fn run_is_not_reentrant() {
    let engine = HeadlessEngine::new().with_events([resize(2, 2)]);
    let (binding, _) = live(engine);
    let weak = binding.downgrade();
    let nested = Rc::new(RefCell::new(None));
    let n = nested.clone();
    binding
        .call(
            "onResize",
            &[HostValue::function(move |_| {
                if let Some(binding) = weak.upgrade() {
                    *n.borrow_mut() = Some(binding.run());
                }
                Ok(HostValue::Undefined)
            })],
        )
        .unwrap();

    binding.run().unwrap();
    assert_eq!(
        nested.borrow_mut().take(),
        Some(Err(BindingError::Lifecycle(LifecycleError::AlreadyRunning)))
    );
}

#[test]
fn host_methods_work_from_inside_a_callback() {
    let engine = HeadlessEngine::new().with_events([resize(300, 200)]);
    let (binding, _) = live(engine);
    let weak = binding.downgrade();
    binding
        .call(
            "onResize",
            &[HostValue::function(move |args| {
                let binding = weak.upgrade().ok_or("binding gone")?;
                let w = args[0].as_f64().unwrap_or_default();
                binding
                    .set_title(&format!("width {w}"))
                    .map_err(|e| e.to_string())?;
                Ok(HostValue::Undefined)
            })],
        )
        .unwrap();
    binding.run().unwrap();
    assert_eq!(binding.title().unwrap(), "width 300");
}

#[test]
fn dropping_the_last_handle_destroys_the_window() {
    let (binding, journal) = live(HeadlessEngine::new());
    let weak = binding.downgrade();
    drop(binding);
    assert!(weak.upgrade().is_none());
    assert_eq!(journal.calls().last(), Some(&NativeCall::Destroy));
}

#[test]
fn debug_output_shows_state() {
    let (binding, _) = live(HeadlessEngine::new());
    assert_eq!(
        format!("{binding:?}"),
        "Binding { state: Live, running: false }"
    );
}
