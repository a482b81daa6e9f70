use serde_json::Value;

/// The response shapes the generation service is known to produce.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationResponse {
	/// `{"text": "..."}` or a bare string.
	Text(String),
	/// `{"candidates": [{"content": ...}, ...]}`.
	Candidates(Vec<Value>),
	/// `{"output": [{"content": ...}, ...]}`.
	Output(Vec<Value>),
	Unknown(Value),
}
impl GenerationResponse {
	pub fn from_json(json: Value) -> Self {
		match json {
			Value::String(text) => Self::Text(text),
			Value::Object(mut map) => {
				if let Some(text) = map.get("text").and_then(Value::as_str) {
					return Self::Text(text.to_string());
				}
				if let Some(items) = take_content_list(&mut map, "candidates") {
					return Self::Candidates(items);
				}
				if let Some(items) = take_content_list(&mut map, "output") {
					return Self::Output(items);
				}

				Self::Unknown(Value::Object(map))
			},
			other => Self::Unknown(other),
		}
	}

	/// Flattens the response to plain text. Never fails; `Unknown` renders as JSON and
	/// `Unknown(Null)` as the empty string.
	pub fn into_text(self) -> String {
		match self {
			Self::Text(text) => text,
			Self::Candidates(items) | Self::Output(items) =>
				items.into_iter().next().map(first_content_text).unwrap_or_default(),
			Self::Unknown(Value::Null) => String::new(),
			Self::Unknown(other) => other.to_string(),
		}
	}
}

// Only classifies when the first item carries a `content` field; otherwise the map is left
// untouched for the next probe.
fn take_content_list(map: &mut serde_json::Map<String, Value>, field: &str) -> Option<Vec<Value>> {
	let has_content = map
		.get(field)
		.and_then(Value::as_array)
		.and_then(|items| items.first())
		.map(|first| first.get("content").is_some())
		.unwrap_or(false);

	if !has_content {
		return None;
	}

	match map.remove(field) {
		Some(Value::Array(items)) => Some(items),
		_ => None,
	}
}

fn first_content_text(item: Value) -> String {
	let mut item = match item {
		Value::Object(item) => item,
		other => return other.to_string(),
	};

	match item.remove("content") {
		Some(Value::String(text)) => text,
		Some(Value::Object(content)) => match parts_text(&content) {
			Some(text) => text,
			None => Value::Object(content).to_string(),
		},
		Some(other) => other.to_string(),
		None => Value::Object(item).to_string(),
	}
}

fn parts_text(content: &serde_json::Map<String, Value>) -> Option<String> {
	let parts = content.get("parts")?.as_array()?;
	let texts = parts.iter().filter_map(|part| part.get("text")?.as_str()).collect::<Vec<_>>();

	if texts.is_empty() {
		return None;
	}

	Some(texts.concat())
}
