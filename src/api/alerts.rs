use axum::http::{HeaderMap, HeaderName, HeaderValue};

use crate::types::ChangeAction;

/// Notification headers for a write, e.g. `X-protocolAdmin-alert` and
/// `X-protocolAdmin-params`. Headers that cannot be encoded are skipped.
pub fn entity_alert(application: &str, entity: &str, id: i64, action: ChangeAction) -> HeaderMap {
    let message = match action {
        ChangeAction::Created => format!("A new {} is created with identifier {}", entity, id),
        _ => format!("A {} is {} with identifier {}", entity, action.verb(), id),
    };

    let mut headers = HeaderMap::new();
    insert(&mut headers, &format!("X-{}-alert", application), &message);
    insert(&mut headers, &format!("X-{}-params", application), &id.to_string());
    headers
}

fn insert(headers: &mut HeaderMap, name: &str, value: &str) {
    match (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(value)) {
        (Ok(name), Ok(value)) => {
            headers.insert(name, value);
        }
        _ => tracing::warn!("Skipping unencodable alert header {}", name),
    }
}
