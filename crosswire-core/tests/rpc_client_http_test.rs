use crosswire_core::client::{ConnectError, RpcClient};
use crosswire_core::codec::{CodecError, WireFormat};
use crosswire_core::options::{ClientOptions, HostOverride};
use crosswire_core::protocol::CallError;
use crosswire_core::service::ServiceConfig;
use crosswire_core::transport::TransportError;
use echo_service::{EchoMessage, EchoProcessor, EchoService, spawn_http, spawn_http_raw};

#[tokio::test]
async fn round_trips_binary_json_and_compact() {
    for format in [WireFormat::Binary, WireFormat::Json, WireFormat::Compact] {
        let addr = spawn_http(format, "", EchoProcessor::default()).await.unwrap();
        let options = ClientOptions {
            protocol: format,
            ..ClientOptions::default()
        };

        let mut client = RpcClient::connect(&format!("127.0.0.1:{}", addr.port()), &options)
            .await
            .unwrap();
        let request = EchoMessage {
            message: format!("hello over {format}"),
        };
        let reply: EchoMessage = client.call("Echo", &request).await.unwrap();
        assert_eq!(reply, request);
    }
}

#[tokio::test]
async fn respects_custom_http_path() {
    let addr = spawn_http(WireFormat::Binary, "/rpc", EchoProcessor::default())
        .await
        .unwrap();
    let options = ClientOptions {
        http_path: "/rpc".to_string(),
        ..ClientOptions::default()
    };

    let mut client = RpcClient::connect(&format!("127.0.0.1:{}", addr.port()), &options)
        .await
        .unwrap();
    let reply: EchoMessage = client
        .call(
            "Echo",
            &EchoMessage {
                message: "pathed".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(reply.message, "pathed");
}

#[tokio::test]
async fn works_without_buffering() {
    let addr = spawn_http(WireFormat::Binary, "", EchoProcessor::default())
        .await
        .unwrap();
    let options = ClientOptions {
        buffered: false,
        ..ClientOptions::default()
    };

    let mut client = RpcClient::connect(&format!("127.0.0.1:{}", addr.port()), &options)
        .await
        .unwrap();
    let reply: EchoMessage = client
        .call(
            "Echo",
            &EchoMessage {
                message: "unbuffered".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(reply.message, "unbuffered");
}

#[tokio::test]
async fn override_redirects_matching_host() {
    let addr = spawn_http(WireFormat::Binary, "", EchoProcessor::default())
        .await
        .unwrap();
    // "rpc.internal.test" resolves nowhere; only the override can make
    // this connection succeed.
    let options = ClientOptions {
        host_override: HostOverride::new(
            "rpc.internal.test",
            format!("127.0.0.1:{}", addr.port()),
        ),
        ..ClientOptions::default()
    };

    let mut client = RpcClient::connect(&format!("rpc.internal.test:{}", addr.port()), &options)
        .await
        .unwrap();
    let reply: EchoMessage = client
        .call(
            "Echo",
            &EchoMessage {
                message: "via override".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(reply.message, "via override");
}

#[tokio::test]
async fn override_ignores_non_matching_host() {
    let addr = spawn_http(WireFormat::Binary, "", EchoProcessor::default())
        .await
        .unwrap();
    // The override points into TEST-NET-1; a match would break the call.
    let options = ClientOptions {
        host_override: HostOverride::new("elsewhere.internal", "192.0.2.1:9"),
        ..ClientOptions::default()
    };

    let mut client = RpcClient::connect(&format!("127.0.0.1:{}", addr.port()), &options)
        .await
        .unwrap();
    let reply: EchoMessage = client
        .call(
            "Echo",
            &EchoMessage {
                message: "dialed as configured".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(reply.message, "dialed as configured");
}

#[tokio::test]
async fn malformed_target_url_fails_fast() {
    let err = RpcClient::connect("bad host:80", &ClientOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ConnectError::Transport {
            source: TransportError::InvalidUrl { .. },
            ..
        }
    ));
}

#[tokio::test]
async fn unparseable_override_address_fails_fast() {
    let options = ClientOptions {
        host_override: HostOverride::new("svc.internal", "not-an-address"),
        ..ClientOptions::default()
    };
    let err = RpcClient::connect("svc.internal:80", &options).await.unwrap_err();
    assert!(matches!(
        err,
        ConnectError::Transport {
            source: TransportError::InvalidOverrideAddr { .. },
            ..
        }
    ));
}

#[tokio::test]
async fn simple_json_cannot_read_replies() {
    let addr = spawn_http_raw("").await.unwrap();
    let options = ClientOptions {
        protocol: WireFormat::SimpleJson,
        ..ClientOptions::default()
    };

    let mut client = RpcClient::connect(&format!("127.0.0.1:{}", addr.port()), &options)
        .await
        .unwrap();
    let err = client
        .call::<EchoMessage, EchoMessage>(
            "Echo",
            &EchoMessage {
                message: "one way".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CallError::Codec(CodecError::WriteOnly(WireFormat::SimpleJson))
    ));
}

#[tokio::test]
async fn unknown_method_surfaces_as_fault() {
    let addr = spawn_http(WireFormat::Binary, "", EchoProcessor::default())
        .await
        .unwrap();

    let mut client = RpcClient::connect(
        &format!("127.0.0.1:{}", addr.port()),
        &ClientOptions::default(),
    )
    .await
    .unwrap();
    let err = client
        .call::<EchoMessage, EchoMessage>(
            "Nope",
            &EchoMessage {
                message: "ignored".to_string(),
            },
        )
        .await
        .unwrap_err();
    match err {
        CallError::Fault { method, fault } => {
            assert_eq!(method, "Nope");
            assert!(fault.message.contains("unknown method"));
        }
        other => panic!("expected a server fault, got {other:?}"),
    }
}

#[tokio::test]
async fn configured_prefix_applies_to_replies() {
    let mut service = EchoService::default();
    service.configure("prefix", "\"pong: \"").unwrap();
    let addr = spawn_http(WireFormat::Binary, "", service.processor().clone())
        .await
        .unwrap();

    let mut client = RpcClient::connect(
        &format!("127.0.0.1:{}", addr.port()),
        &ClientOptions::default(),
    )
    .await
    .unwrap();
    let reply: EchoMessage = client
        .call(
            "Echo",
            &EchoMessage {
                message: "hi".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(reply.message, "pong: hi");
}
