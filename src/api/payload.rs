//! Create-request validation and the camelCase → snake_case insert payloads.

use serde_json::{json, Map, Value};

use crate::api::resources::Resource;
use crate::error::{ApiError, ApiResult};

type Body = Map<String, Value>;

/// Fields that must be present before an insert is forwarded, and the
/// message returned when any of them is missing.
pub struct Requirement {
    pub fields: &'static [&'static str],
    pub message: &'static str,
}

pub fn requirement(resource: Resource) -> Requirement {
    match resource {
        Resource::Users => Requirement {
            fields: &["username"],
            message: "Username is required",
        },
        Resource::Platforms => Requirement {
            fields: &["name"],
            message: "Name is required",
        },
        Resource::Workspaces => Requirement {
            fields: &["name", "ownerId"],
            message: "Name and ownerId are required",
        },
        Resource::Conversations => Requirement {
            fields: &["workspaceId", "userId"],
            message: "workspaceId and userId are required",
        },
        Resource::Messages => Requirement {
            fields: &["conversationId", "content", "authorId"],
            message: "conversationId, content, and authorId are required",
        },
    }
}

/// Parse a request body. Anything that is not a JSON object counts as `{}`.
pub fn parse_body(bytes: &[u8]) -> Body {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

/// Presence test: missing, `null`, `false`, `0` and `""` are all absent.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Validate `body` and build the row to insert upstream.
pub fn build_insert(resource: Resource, body: &Body) -> ApiResult<Value> {
    let req = requirement(resource);
    if !req.fields.iter().all(|f| is_truthy(body.get(*f))) {
        return Err(ApiError::Validation(req.message.to_string()));
    }

    // Absent optional fields are sent as null.
    let field = |name: &str| body.get(name).cloned().unwrap_or(Value::Null);

    let row = match resource {
        Resource::Users => json!({
            "username": field("username"),
            "email": field("email"),
        }),
        Resource::Platforms => json!({
            "name": field("name"),
            "type": field("type"),
        }),
        Resource::Workspaces => json!({
            "name": field("name"),
            "description": field("description"),
            "owner_id": field("ownerId"),
            "is_public": is_truthy(body.get("isPublic")),
        }),
        Resource::Conversations => json!({
            "workspace_id": field("workspaceId"),
            "user_id": field("userId"),
            "platform_id": field("platformId"),
        }),
        Resource::Messages => {
            let kind = match field("type") {
                Value::Null => Value::String("user".into()),
                v => v,
            };
            json!({
                "conversation_id": field("conversationId"),
                "content": field("content"),
                "author_id": field("authorId"),
                "type": kind,
            })
        }
    };

    Ok(row)
}
