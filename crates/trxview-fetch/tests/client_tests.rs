// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow};
use std::thread;
use std::time::Duration;
use tiny_http::{Header, Response, Server};
use trxview_fetch::Client;
use trxview_testkit::{TransactionFaker, fixture_now, to_wire_json};

fn serve_once(status: u16, body: String) -> Result<(String, thread::JoinHandle<()>)> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}/get-tran", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        assert_eq!(request.url(), "/get-tran");
        let response = Response::from_string(body)
            .with_status_code(status)
            .with_header(
                Header::from_bytes("Content-Type", "application/json")
                    .expect("valid content type header"),
            );
        request.respond(response).expect("response should succeed");
    });
    Ok((addr, handle))
}

#[test]
fn fetch_records_decodes_snapshot() -> Result<()> {
    let records = TransactionFaker::new(11).snapshot(25, 4, fixture_now());
    let (addr, handle) = serve_once(200, to_wire_json(&records))?;

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let fetched = client.fetch_records()?;
    assert_eq!(fetched, records);

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn null_and_blank_bodies_are_empty_snapshots() -> Result<()> {
    for body in ["null", "", "  \n"] {
        let (addr, handle) = serve_once(200, body.to_owned())?;
        let client = Client::new(&addr, Duration::from_secs(1))?;
        assert!(client.fetch_records()?.is_empty(), "body {body:?}");
        handle.join().expect("server thread should join");
    }
    Ok(())
}

#[test]
fn server_errors_surface_status_and_message() -> Result<()> {
    let (addr, handle) = serve_once(500, r#"{"error":"database offline"}"#.to_owned())?;

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let error = client
        .fetch_records()
        .expect_err("500 response should fail");
    assert_eq!(error.to_string(), "server error (500): database offline");

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn malformed_body_is_an_error() -> Result<()> {
    let (addr, handle) = serve_once(200, "[{".to_owned())?;

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let error = client
        .fetch_records()
        .expect_err("truncated JSON should fail");
    assert!(error.to_string().contains("decode record snapshot"));

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn unreachable_endpoint_error_names_the_endpoint() {
    let client = Client::new("http://127.0.0.1:1/get-tran", Duration::from_millis(200))
        .expect("client should initialize");

    let error = client
        .fetch_records()
        .expect_err("fetch should fail for unreachable endpoint");
    let message = error.to_string();
    assert!(message.contains("127.0.0.1:1"), "unexpected message: {message}");
}
