use anyhow::Result;
use h2curl::{CommandSynthesizer, Error, OutputOptions, ParsedRequest};
use serde_json::json;

fn convert(input: &str, opts: OutputOptions) -> Result<String> {
    let request: ParsedRequest = input.parse()?;
    Ok(request.to_curl(&opts)?.to_string())
}

#[test]
fn head_request_with_default_options() -> Result<()> {
    let line = convert(
        "HEAD / HTTP/1.1\nHost: example.com\nUser-Agent: moo\n",
        OutputOptions::default(),
    )?;
    assert!(line.contains("--head"));
    assert!(line.contains("--http1.1"));
    assert!(line.contains("--header Accept:"));
    assert!(line.contains(r#"--user-agent "moo""#));
    assert!(line.ends_with(" https://example.com/"));
    Ok(())
}

#[test]
fn gzip_accept_encoding_becomes_compressed() -> Result<()> {
    let line = convert(
        "GET /feed HTTP/1.1\nHost: example.com\nAccept-Encoding: gzip, deflate\n",
        OutputOptions::default(),
    )?;
    assert!(line.contains("--compressed"));
    assert!(!line.contains("Accept-Encoding"));
    Ok(())
}

#[test]
fn put_without_body_overrides_method() -> Result<()> {
    let line = convert("PUT /x HTTP/1.1\nHost: h\n", OutputOptions::default())?;
    assert!(line.contains(r#"--data """#));
    assert!(line.contains("--request PUT"));
    Ok(())
}

#[test]
fn options_origin_form_exception() -> Result<()> {
    let line = convert("OPTIONS * HTTP/1.1\nHost: example.com\n", OutputOptions::default())?;
    assert!(line.contains(r#"--request-target "*""#));
    assert!(line.ends_with(" https://example.com"));
    assert!(!line.contains("example.com*"));
    Ok(())
}

#[test]
fn basic_auth_yields_credentials() -> Result<()> {
    let line = convert(
        "GET /private HTTP/1.1\nHost: h\nAuthorization: Basic dXNlcjpwYXNz\n",
        OutputOptions::default(),
    )?;
    assert!(line.contains(r#"--user "user:pass""#));
    Ok(())
}

#[test]
fn url_quoting_depends_on_path() -> Result<()> {
    let line = convert("GET /a b HTTP/1.1\nHost: example.com\n", OutputOptions::default())?;
    assert!(line.ends_with(r#" "https://example.com/a b""#));

    let line = convert("GET /ab HTTP/1.1\nHost: example.com\n", OutputOptions::default())?;
    assert!(line.ends_with(" https://example.com/ab"));
    Ok(())
}

#[test]
fn missing_host_wins_over_everything_else() {
    for input in [
        "GET / HTTP/1.1\n",
        "DELETE / HTTP/1.1\nAccept: */*\n",
        "POST / HTTP/2\nContent-Type: text/plain\n\nbody",
    ] {
        let err = input.parse::<ParsedRequest>().unwrap_err();
        assert!(matches!(err, Error::MissingHost), "{input:?}: {err}");
    }
}

#[test]
fn unsupported_method_is_rejected() {
    for method in ["DELETE", "Trace", "patch", "FOO"] {
        let input = format!("{method} / HTTP/1.1\nHost: h\n");
        let err = input.parse::<ParsedRequest>().unwrap_err();
        assert!(matches!(err, Error::UnsupportedMethod { .. }), "{method}: {err}");
    }
}

#[test]
fn synthesizer_is_reusable_across_requests() -> Result<()> {
    let synthesizer = CommandSynthesizer::new(OutputOptions {
        use_short_flags: true,
        allow_default_headers: true,
        ..Default::default()
    });
    let first: ParsedRequest = "GET /1 HTTP/1.1\nHost: h\n".parse()?;
    let second: ParsedRequest = "HEAD /2 HTTP/2\nHost: h\n".parse()?;
    assert_eq!(
        synthesizer.synthesize(&first)?.to_string(),
        "curl --http1.1 https://h/1"
    );
    assert_eq!(
        synthesizer.synthesize(&second)?.to_string(),
        "curl -I --http2 https://h/2"
    );
    assert_eq!(
        synthesizer.synthesize(&first)?,
        synthesizer.synthesize(&first)?
    );
    Ok(())
}

#[test]
fn templated_request_converts() -> Result<()> {
    let input = "POST /v1/charges HTTP/1.1\r\nHost: api.stripe.com\r\nAuthorization: Basic {{ auth }}\r\nContent-Type: application/x-www-form-urlencoded\r\n\r\namount=2000&currency=usd\r\n";
    let request = ParsedRequest::load(input, json!({ "auth": "c2tfdGVzdDo=" }))?;
    let command = request.to_curl(&OutputOptions {
        emit_docs: true,
        ..Default::default()
    })?;
    let line = command.to_string();
    assert!(line.contains(r#"--user "sk_test:""#));
    assert!(line.contains(r#"--data-binary "amount=2000&currency=usd""#));
    assert!(line.contains(r#"--header "Content-Type: application/x-www-form-urlencoded""#));
    assert!(command.docs.iter().any(|doc| doc.flag == "--data-binary"));
    Ok(())
}
