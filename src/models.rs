use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Icon identifier used when a category or tool has none of its own
pub const DEFAULT_ICON: &str = "default_icon";

/// Treat an explicit JSON `null` the same as a missing key
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A top-level grouping of tools
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subcategories: Vec<Subcategory>,
    /// Keys this crate does not model, kept so a load/save cycle does not drop them
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            icon: None,
            priority: None,
            subcategories: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn icon_or_default(&self) -> &str {
        self.icon.as_deref().unwrap_or(DEFAULT_ICON)
    }

    /// Find one of this category's subcategories by id
    pub fn subcategory(&self, id: i64) -> Option<&Subcategory> {
        self.subcategories.iter().find(|s| s.id == Some(id))
    }
}

/// A second-level grouping nested under exactly one category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Subcategory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Subcategory {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            parent_id: None,
            priority: None,
            extra: Map::new(),
        }
    }

    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = Some(priority);
        self
    }
}

/// A launchable entry: a local executable, script or directory, or a web URL
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tool {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub path: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_web_tool: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_favorite: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub usage_count: u64,
    #[serde(default)]
    pub last_used: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_directory: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub run_in_terminal: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Tool {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            path: path.into(),
            is_web_tool: false,
            description: String::new(),
            category_id: None,
            subcategory_id: None,
            icon: None,
            background_image: None,
            tags: Vec::new(),
            priority: None,
            is_favorite: false,
            usage_count: 0,
            last_used: None,
            arguments: None,
            working_directory: None,
            run_in_terminal: false,
            extra: Map::new(),
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    pub fn with_category(mut self, category_id: i64, subcategory_id: Option<i64>) -> Self {
        self.category_id = Some(category_id);
        self.subcategory_id = subcategory_id;
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn web(mut self) -> Self {
        self.is_web_tool = true;
        self
    }

    pub fn favorite(mut self) -> Self {
        self.is_favorite = true;
        self
    }

    /// Whether the path has to be opened as a URL rather than a local file
    pub fn is_web(&self) -> bool {
        let path = self.path.trim();
        self.is_web_tool || path.starts_with("http://") || path.starts_with("https://")
    }

    /// Parse `last_used`, accepting RFC 3339 and naive ISO-8601 (assumed UTC)
    pub fn last_used_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.last_used.as_deref()?;
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .map(|naive| naive.and_utc())
            })
    }

    /// Count one successful launch
    pub(crate) fn record_launch(&mut self, at: DateTime<Utc>) {
        self.usage_count += 1;
        self.last_used = Some(at.to_rfc3339_opts(SecondsFormat::Millis, true));
    }
}

/// Replacement record for `Catalog::update_tool`.
///
/// Usage statistics carry over from the stored record unless set here.
#[derive(Debug, Clone)]
pub struct ToolUpdate {
    pub tool: Tool,
    pub usage_count: Option<u64>,
    pub last_used: Option<Option<String>>,
}

impl ToolUpdate {
    /// Override the stored usage statistics instead of preserving them
    pub fn with_usage(mut self, usage_count: u64, last_used: Option<String>) -> Self {
        self.usage_count = Some(usage_count);
        self.last_used = Some(last_used);
        self
    }
}

impl From<Tool> for ToolUpdate {
    fn from(tool: Tool) -> Self {
        Self {
            tool,
            usage_count: None,
            last_used: None,
        }
    }
}
