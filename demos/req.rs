use anyhow::Result;
use h2curl::{OutputOptions, ParsedRequest};
use serde_json::json;

fn main() -> Result<()> {
    let input = "PUT /user/email/visibility HTTP/2\r
Host: api.github.com\r
Accept: application/vnd.github+json\r
Authorization: Bearer {{ token }}\r
X-GitHub-Api-Version: 2022-11-28\r
Content-Type: application/json\r
\r
{\"visibility\":\"private\"}\r
";
    let context = json!({ "token": "abcd1234" });
    let parsed = ParsedRequest::load(input, context)?;
    println!("{parsed:#?}");

    let command = parsed.to_curl(&OutputOptions {
        emit_docs: true,
        ..Default::default()
    })?;
    println!("{command}");
    for doc in &command.docs {
        println!("  {doc}");
    }
    Ok(())
}
