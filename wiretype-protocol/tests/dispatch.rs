use serde_json::json;
use std::cell::Cell;
use wiretype_protocol::*;

#[derive(Default)]
struct Adapter {
    next_seq: Cell<i64>,
}

impl Adapter {
    fn seq(&self) -> i64 {
        let seq = self.next_seq.get() + 1;
        self.next_seq.set(seq);
        seq
    }
}

impl RequestHandlers for Adapter {
    fn handle_initialize(&self, request: InitializeRequest) -> InitializeResponse {
        InitializeResponse {
            seq: self.seq(),
            type_: InitializeResponseType::Response,
            request_seq: request.seq,
            success: true,
            command: request.command.to_string(),
            message: None,
            body: Some(Capabilities {
                supports_configuration_done_request: Some(true),
                supports_function_breakpoints: None,
                exception_breakpoint_filters: Some(vec![ExceptionBreakpointsFilter {
                    filter: "uncaught".to_string(),
                    label: "Uncaught Exceptions".to_string(),
                    default: Some(true),
                }]),
                supported_checksum_algorithms: Some(vec![ChecksumAlgorithm::SHA256]),
            }),
        }
    }

    fn handle_launch(&self, request: LaunchRequest) -> LaunchResponse {
        LaunchResponse {
            seq: self.seq(),
            type_: LaunchResponseType::Response,
            request_seq: request.seq,
            success: request.arguments.no_debug != Some(true),
            command: request.command.to_string(),
            message: None,
            body: Value::Null,
        }
    }

    fn handle_set_breakpoints(&self, request: SetBreakpointsRequest) -> SetBreakpointsResponse {
        let source = request.arguments.source;
        let breakpoints = request
            .arguments
            .breakpoints
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(index, breakpoint)| Breakpoint {
                id: Some(index as i64 + 1),
                verified: true,
                message: None,
                source: Some(source.clone()),
                line: Some(breakpoint.line),
            })
            .collect();

        SetBreakpointsResponse {
            seq: self.seq(),
            type_: SetBreakpointsResponseType::Response,
            request_seq: request.seq,
            success: true,
            command: request.command.to_string(),
            message: None,
            body: SetBreakpointsResponseBody { breakpoints },
        }
    }

    fn handle_threads(&self, request: ThreadsRequest) -> ThreadsResponse {
        ThreadsResponse {
            seq: self.seq(),
            type_: ThreadsResponseType::Response,
            request_seq: request.seq,
            success: true,
            command: request.command.to_string(),
            message: None,
            body: ThreadsResponseBody {
                threads: vec![Thread {
                    id: 1,
                    name: "main".to_string(),
                }],
            },
        }
    }
}

#[test]
fn test_commands() {
    assert_eq!(COMMANDS, &["initialize", "launch", "setBreakpoints", "threads"]);
}

#[test]
fn test_dispatch_initialize() {
    let adapter = Adapter::default();
    let request = json!({
        "seq": 1,
        "type": "request",
        "command": "initialize",
        "arguments": {"adapterID": "wiretype"}
    });

    let response = dispatch_request(&adapter, &request).expect("Failed to dispatch");
    assert_eq!(response["type"], json!("response"));
    assert_eq!(response["request_seq"], json!(1));
    assert_eq!(response["command"], json!("initialize"));
    assert_eq!(response["body"]["supportsConfigurationDoneRequest"], json!(true));
    assert_eq!(response["body"]["supportedChecksumAlgorithms"], json!(["SHA256"]));
    assert_eq!(
        response["body"]["exceptionBreakpointFilters"][0]["default"],
        json!(true)
    );
}

#[test]
fn test_dispatch_set_breakpoints() {
    let adapter = Adapter::default();
    let request = json!({
        "seq": 3,
        "type": "request",
        "command": "setBreakpoints",
        "arguments": {
            "source": {"name": "main.rs", "path": "/src/main.rs"},
            "breakpoints": [{"line": 10}, {"line": 20, "condition": "x > 1"}]
        }
    });

    let response = dispatch_request(&adapter, &request).expect("Failed to dispatch");
    let decoded = SetBreakpointsResponse::decode(&response).expect("Failed to decode response");
    assert_eq!(decoded.request_seq, 3);
    let lines: Vec<Option<i64>> = decoded.body.breakpoints.iter().map(|b| b.line).collect();
    assert_eq!(lines, vec![Some(10), Some(20)]);
    assert_eq!(
        decoded.body.breakpoints[1]
            .source
            .as_ref()
            .and_then(|source| source.path.as_deref()),
        Some("/src/main.rs")
    );
}

#[test]
fn test_sequence_numbers_advance() {
    let adapter = Adapter::default();
    let request = json!({"seq": 8, "type": "request", "command": "threads"});

    let first = dispatch_request(&adapter, &request).expect("Failed to dispatch");
    let second = dispatch_request(&adapter, &request).expect("Failed to dispatch");
    assert_eq!(first["seq"], json!(1));
    assert_eq!(second["seq"], json!(2));
    assert_eq!(second["body"]["threads"][0]["name"], json!("main"));
}

#[test]
fn test_unknown_command() {
    let adapter = Adapter::default();
    let request = json!({"seq": 1, "type": "request", "command": "evaluate"});

    let err = dispatch_request(&adapter, &request).expect_err("evaluate is not handled");
    assert_eq!(err.path_string(), "command");
    match err.kind() {
        DecodeErrorKind::UnknownVariant { found, expected } => {
            assert_eq!(found, "evaluate");
            assert_eq!(expected.len(), 4);
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_invalid_request_body() {
    let adapter = Adapter::default();
    let request = json!({"seq": 1, "type": "request", "command": "launch"});

    let err = dispatch_request(&adapter, &request).expect_err("launch needs arguments");
    assert_eq!(err.kind(), &DecodeErrorKind::MissingField);
    assert_eq!(err.path_string(), "arguments");
}

#[test]
fn test_request_must_be_object() {
    let adapter = Adapter::default();
    let err = dispatch_request(&adapter, &json!([1, 2])).expect_err("not an object");
    assert_eq!(err.path_string(), "<root>");
}
