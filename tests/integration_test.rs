//! End-to-end tests of the invocation contract
//!
//! Everything here runs without network access or a config file: tools are
//! registered by hand or via the default toolset with a temp data dir.

use deskpilot::tools::decode::decode;
use deskpilot::tools::executor::InvocationExecutor;
use deskpilot::tools::format;
use deskpilot::{
    schema, DecodedArgs, ErrorKind, InvocationResult, Payload, Settings, ToolDescriptor, ToolHost,
    ToolOutput, ToolRegistry,
};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

fn echo_descriptor() -> ToolDescriptor {
    ToolDescriptor::new(
        "echo",
        "Echo the given text back.",
        schema![{
            name: "text",
            type: String,
            description: "Text to echo",
            required: true
        }],
        |args: DecodedArgs| async move {
            Ok(ToolOutput::text(args.require_str("text")?.to_string()))
        },
    )
}

fn host_with(descriptors: Vec<ToolDescriptor>) -> ToolHost {
    let mut registry = ToolRegistry::new();
    for descriptor in descriptors {
        registry.register(descriptor).unwrap();
    }
    ToolHost::new(registry)
}

#[tokio::test]
async fn test_scenario_a_echo_success() {
    let host = host_with(vec![echo_descriptor()]);
    let output = host.invoke_by_name("echo", json!({"text": "hi"})).await;
    assert_eq!(output, "hi");
}

#[tokio::test]
async fn test_scenario_b_unknown_tool_rendering() {
    let host = host_with(vec![echo_descriptor()]);
    let output = host.invoke_by_name("nonexistent", json!({})).await;
    assert_eq!(output, "Error: Unknown tool 'nonexistent'");
}

#[tokio::test]
async fn test_scenario_c_missing_argument_never_runs_operation() {
    let calls = Arc::new(AtomicUsize::new(0));
    let spy_calls = calls.clone();

    let spy = ToolDescriptor::new(
        "echo",
        "Echo with a call counter.",
        schema![{
            name: "text",
            type: String,
            description: "Text to echo",
            required: true
        }],
        move |args: DecodedArgs| {
            let calls = spy_calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(ToolOutput::text(args.require_str("text")?.to_string()))
            }
        },
    );

    let host = host_with(vec![spy]);
    let output = host.invoke_by_name("echo", json!({})).await;

    assert_eq!(output, "Error: Missing required argument 'text'");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_scenario_d_concurrent_invocations_do_not_serialize() {
    let sleeper = ToolDescriptor::new(
        "nap",
        "Sleep briefly.",
        schema![],
        |_args: DecodedArgs| async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            Ok(ToolOutput::text("rested"))
        },
    );

    let host = host_with(vec![sleeper]);
    let start = Instant::now();
    let (first, second) = tokio::join!(
        host.invoke_by_name("nap", json!({})),
        host.invoke_by_name("nap", json!({}))
    );
    let elapsed = start.elapsed();

    assert_eq!(first, "rested");
    assert_eq!(second, "rested");
    assert!(elapsed >= Duration::from_millis(100));
    assert!(
        elapsed < Duration::from_millis(300),
        "concurrent invocations took {:?}, executor is serializing",
        elapsed
    );
}

#[tokio::test]
async fn test_structured_round_trip_through_json() {
    let schema = schema![
        {
            name: "file_path",
            type: String,
            description: "Path",
            required: true
        },
        {
            name: "count",
            type: Int,
            description: "Count",
            required: true
        },
        {
            name: "verbose",
            type: Bool,
            description: "Verbose",
            required: true
        },
    ];

    let encoded = serde_json::to_string(&json!({
        "file_path": "report.txt",
        "count": 12,
        "verbose": false
    }))
    .unwrap();
    let payload = Payload::Text(encoded);

    let args = decode(&payload, &schema).unwrap();
    let expected: DecodedArgs = vec![
        ("file_path".to_string(), deskpilot::ArgValue::from("report.txt")),
        ("count".to_string(), deskpilot::ArgValue::from(12i64)),
        ("verbose".to_string(), deskpilot::ArgValue::from(false)),
    ]
    .into_iter()
    .collect();
    assert_eq!(args, expected);
}

#[tokio::test]
async fn test_duplicate_registration_is_rejected_and_harmless() {
    let mut registry = ToolRegistry::new();
    registry.register(echo_descriptor()).unwrap();
    let err = registry.register(echo_descriptor()).unwrap_err();
    assert_eq!(err.to_string(), "A tool named 'echo' is already registered");

    let host = ToolHost::new(registry);
    let output = host.invoke_by_name("echo", json!({"text": "still here"})).await;
    assert_eq!(output, "still here");
}

#[tokio::test]
async fn test_operation_errors_map_onto_taxonomy() {
    let cases = [
        (std::io::ErrorKind::NotFound, ErrorKind::ResourceNotFound),
        (
            std::io::ErrorKind::PermissionDenied,
            ErrorKind::PermissionDenied,
        ),
        (std::io::ErrorKind::BrokenPipe, ErrorKind::Unexpected),
    ];

    for (io_kind, expected) in cases {
        let descriptor = ToolDescriptor::new(
            "fragile",
            "Fails with a specific io error.",
            schema![],
            move |_args: DecodedArgs| async move {
                Err::<ToolOutput, _>(std::io::Error::new(io_kind, "boom").into())
            },
        );

        let result = InvocationExecutor::new()
            .invoke(&descriptor, DecodedArgs::new())
            .await;
        assert_eq!(result.kind(), Some(expected), "io kind {:?}", io_kind);

        let rendered = format::render(&result);
        assert!(rendered.starts_with("Error: "));
    }
}

#[tokio::test]
async fn test_free_form_payload_end_to_end() {
    let host = host_with(vec![echo_descriptor()]);

    // key:value pair extraction
    let output = host.invoke_by_name("echo", "text: hello there").await;
    assert_eq!(output, "hello");

    // quoted values keep their spaces
    let output = host.invoke_by_name("echo", r#"text: "hello there""#).await;
    assert_eq!(output, "hello there");

    // whole-text fallback for a single required field
    let output = host.invoke_by_name("echo", "plain message").await;
    assert_eq!(output, "plain message");
}

#[tokio::test]
async fn test_default_toolset_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let mut settings = Settings::default();
    settings.storage.data_dir = Some(dir.path().to_path_buf());

    let host = ToolHost::with_default_tools(&settings).await.unwrap();

    // The capability list is non-trivial, insertion-ordered, and serializable.
    let manifests = host.registry().manifests();
    assert!(manifests.len() >= 15);
    assert_eq!(manifests[0].name, host.capabilities()[0].name());
    serde_json::to_string(&manifests).unwrap();

    // create -> read through the public entry point
    let note = dir.path().join("note.txt");
    let output = host
        .invoke_by_name(
            "create_file",
            json!({"file_path": note.to_str().unwrap(), "content": "from the toolset"}),
        )
        .await;
    assert!(output.contains("Created file"));

    let output = host
        .invoke_by_name("read_file", json!({"file_path": note.to_str().unwrap()}))
        .await;
    assert_eq!(output, "from the toolset");

    // stored application paths survive a host rebuild (file-backed store)
    let output = host
        .invoke_by_name(
            "store_application_path",
            json!({"name": "editor", "path": "/usr/bin/vim"}),
        )
        .await;
    assert!(!output.starts_with("Error: "));

    let rebuilt = ToolHost::with_default_tools(&settings).await.unwrap();
    let output = rebuilt
        .invoke_by_name("get_application_path", json!({"name": "editor"}))
        .await;
    assert_eq!(output, "/usr/bin/vim");

    // unknown application path renders as a ResourceNotFound failure
    let result = rebuilt
        .dispatch("get_application_path", Payload::from(json!({"name": "nope"})))
        .await;
    assert_eq!(result.kind(), Some(ErrorKind::ResourceNotFound));
}

#[tokio::test]
async fn test_side_effects_are_reported_but_not_rendered() {
    let dir = tempfile::tempdir().unwrap();
    let mut settings = Settings::default();
    settings.storage.data_dir = Some(dir.path().to_path_buf());
    let host = ToolHost::with_default_tools(&settings).await.unwrap();

    let target = dir.path().join("audit.txt");
    let result = host
        .dispatch(
            "create_file",
            Payload::from(json!({"file_path": target.to_str().unwrap(), "content": "x"})),
        )
        .await;

    match result {
        InvocationResult::Success { text, side_effects } => {
            assert_eq!(side_effects.len(), 1);
            assert!(side_effects[0].contains("wrote"));
            assert!(!text.contains(&side_effects[0]));
        }
        InvocationResult::Failure { message, .. } => panic!("unexpected failure: {message}"),
    }
}
