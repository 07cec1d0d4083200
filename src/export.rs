//! CSV rendering for admin exports.

use serde_json::{Map, Value, json};

use crate::database::models::EventRegistration;

fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => quote(text),
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::Bool(flag)) => flag.to_string(),
        Some(nested) => quote(&nested.to_string()),
    }
}

/// Render JSON objects as CSV. Columns come from the first row's keys in
/// order; strings are always quoted, numbers and booleans are written bare.
pub fn to_csv(rows: &[Value]) -> String {
    let Some(columns) = rows.first().and_then(Value::as_object).map(|first| {
        first.keys().cloned().collect::<Vec<String>>()
    }) else {
        return String::new();
    };

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(columns.join(","));

    let empty = Map::new();
    for row in rows {
        let fields = row.as_object().unwrap_or(&empty);
        let line = columns
            .iter()
            .map(|column| cell(fields.get(column)))
            .collect::<Vec<String>>()
            .join(",");
        lines.push(line);
    }

    lines.join("\n")
}

/// One export row per registration, with teammates flattened into one cell.
pub fn registration_rows(registrations: &[EventRegistration]) -> Vec<Value> {
    registrations
        .iter()
        .map(|registration| {
            let details = &registration.user_details;
            let teammates = registration
                .team_members
                .iter()
                .map(|member| member.name.as_str())
                .collect::<Vec<&str>>()
                .join("; ");

            json!({
                "name": details.name,
                "email": details.email,
                "phone": details.phone,
                "rollNumber": details.roll_number,
                "department": details.department,
                "year": details.year,
                "teamName": registration.team_name,
                "teamMembers": teammates,
                "status": registration.status.as_str(),
                "registeredAt": registration.created_at.map(|t| t.to_rfc3339()),
                "checkedInAt": registration.checked_in_at.map(|t| t.to_rfc3339()),
            })
        })
        .collect()
}
