//! `classify` and `split`: the pure text helpers.

use std::io::Read;

use crate::text::{classify_event_kind, split_title_and_body};

/// Print the kind for `label`.
pub fn classify(label: &str) {
    println!("{}", classify_event_kind(label).as_str());
}

/// Print the title and body of `message` (or stdin) as JSON.
///
/// # Errors
///
/// Returns an error string if stdin cannot be read.
pub fn split(message: Option<&str>) -> Result<(), String> {
    let owned;
    let message = match message {
        Some(message) => message,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| format!("Failed to read message from stdin: {e}"))?;
            owned = buffer;
            &owned
        }
    };
    let (title, body) = split_title_and_body(message);
    println!("{}", serde_json::json!({ "title": title, "body": body }));
    Ok(())
}
