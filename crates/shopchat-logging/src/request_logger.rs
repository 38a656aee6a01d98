use colored::Colorize;

use crate::safe_truncate;

const MAX_BODY_CHARS: usize = 5000;

/// Log an outgoing gateway request (console output, verbose only)
pub fn log_request(url: &str, payload: &serde_json::Value, verbose: bool) {
    if !verbose {
        return;
    }

    println!("\n{}", "═".repeat(80).bright_cyan());
    println!("{}", "🔍 HTTP REQUEST DEBUG".bright_cyan().bold());
    println!("{}", "═".repeat(80).bright_cyan());

    println!("{}: POST", "Method".bright_yellow());
    if let Ok(parsed_url) = reqwest::Url::parse(url) {
        println!("{}: {}", "URL".bright_yellow(), url);
        println!("{}: {}", "Host".bright_yellow(), parsed_url.host_str().unwrap_or("unknown"));
        println!("{}: {}", "Path".bright_yellow(), parsed_url.path());
    } else {
        println!("{}: {}", "URL".bright_yellow(), url);
    }

    println!("\n{}", "Headers:".bright_yellow());
    println!("  Content-Type: application/json");

    println!("\n{}", "Request Body:".bright_yellow());
    match serde_json::to_string_pretty(&redact_image_payload(payload)) {
        Ok(json) => print_bounded(&json),
        Err(e) => println!("{}", format!("Error serializing request: {}", e).red()),
    }

    println!("{}", "═".repeat(80).bright_cyan());
    println!();
}

/// Log a gateway response (console output, verbose only)
pub fn log_response(status: reqwest::StatusCode, body: &str, verbose: bool) {
    if !verbose {
        return;
    }

    println!("\n{}", "═".repeat(80).bright_green());
    println!("{}", "📥 HTTP RESPONSE DEBUG".bright_green().bold());
    println!("{}", "═".repeat(80).bright_green());

    println!("{}: {} {}",
        "Status".bright_yellow(),
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown")
    );

    println!("\n{}", "Response Body:".bright_yellow());
    // Try to pretty-print JSON, fall back to raw text
    match serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| serde_json::to_string_pretty(&value).ok())
    {
        Some(pretty) => print_bounded(&pretty),
        None => print_bounded(body),
    }

    println!("{}", "═".repeat(80).bright_green());
    println!();
}

/// Log a transport failure (console output, verbose only)
pub fn log_failure(url: &str, error: &dyn std::fmt::Display, verbose: bool) {
    if !verbose {
        return;
    }

    println!("{} {} {}", "⚠️".bright_red(), url.bright_white(), error.to_string().red());
}

fn print_bounded(text: &str) {
    if text.chars().count() > MAX_BODY_CHARS {
        println!("{}", safe_truncate(text, MAX_BODY_CHARS));
        println!("\n{}", format!("... (truncated, total {} bytes)", text.len()).bright_black());
    } else {
        println!("{}", text);
    }
}

/// Inline images are megabytes of base64; show only their size
fn redact_image_payload(payload: &serde_json::Value) -> serde_json::Value {
    let mut redacted = payload.clone();
    if let Some(image) = redacted.get_mut("image_b64") {
        if let Some(data) = image.as_str() {
            *image = serde_json::Value::String(format!("<{} bytes of inline image data>", data.len()));
        }
    }
    redacted
}
