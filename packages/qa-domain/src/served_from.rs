use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServedFrom {
	Cache,
	Llm,
}
impl ServedFrom {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Cache => "cache",
			Self::Llm => "llm",
		}
	}

	pub fn parse(raw: &str) -> Option<Self> {
		match raw {
			"cache" => Some(Self::Cache),
			"llm" => Some(Self::Llm),
			_ => None,
		}
	}
}
impl std::fmt::Display for ServedFrom {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}
