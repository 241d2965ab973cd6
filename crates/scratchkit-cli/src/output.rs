use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// Print `message` as-is, or as `{"message": ...}` under `--json`.
pub fn print_message(message: &str, json: bool) -> anyhow::Result<()> {
    if json {
        print_json(&serde_json::json!({ "message": message }))
    } else {
        println!("{message}");
        Ok(())
    }
}
