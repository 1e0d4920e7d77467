use crate::calendar::CalendarCell;
use serde::{Deserialize, Deserializer, Serialize};

/// One journaled record as returned by the collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: i64,
    pub content: String,
    pub mood_level: u8,
    pub date: String,
    #[serde(default)]
    pub analysis: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub is_anonymous: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default)]
    pub is_saved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reality_context: Option<String>,
}

impl Entry {
    pub fn is_positive_mood(&self) -> bool {
        self.mood_level >= 3
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedAnalysis {
    pub display_text: String,
    pub profile: [f64; 5],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordTag {
    pub value: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightedTag {
    pub value: String,
    pub count: u32,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub date: String,
    pub mood_level: u8,
}

/// Which collection the collaborator should list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Personal,
    Public,
    Saved,
}

impl Scope {
    pub fn as_mode(self) -> &'static str {
        match self {
            Scope::Personal => "personal",
            Scope::Public => "library",
            Scope::Saved => "saved",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoodBucket {
    Happy,
    Neutral,
    Sad,
}

impl MoodBucket {
    /// Accepts the bucket names used in query strings; anything else is no filter.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "happy" => Some(MoodBucket::Happy),
            "neutral" => Some(MoodBucket::Neutral),
            "sad" => Some(MoodBucket::Sad),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MoodBucket::Happy => "happy",
            MoodBucket::Neutral => "neutral",
            MoodBucket::Sad => "sad",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilters {
    pub search_text: Option<String>,
    pub mood_bucket: Option<MoodBucket>,
}

impl ListFilters {
    pub fn is_empty(&self) -> bool {
        self.search_text.is_none() && self.mood_bucket.is_none()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewEntry {
    pub content: String,
    pub mood_level: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reality_context: Option<String>,
    pub is_public: bool,
    pub is_anonymous: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleSaveResponse {
    pub is_saved: bool,
}

#[derive(Debug, Deserialize)]
pub struct EntryForm {
    pub content: String,
    pub mood_level: String,
    #[serde(default)]
    pub reality_context: Option<String>,
    #[serde(default)]
    pub is_public: Option<String>,
    #[serde(default)]
    pub is_anonymous: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AuthForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct JournalQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub date: Option<String>,
    pub q: Option<String>,
    pub mood: Option<String>,
    pub cached: Option<u8>,
    pub notice: Option<Notice>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LibraryQuery {
    pub saved: Option<u8>,
    pub cached: Option<u8>,
    pub notice: Option<Notice>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CalendarQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NoticeQuery {
    pub notice: Option<Notice>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DateQuery {
    pub date: Option<String>,
}

/// User-visible outcome of the previous action, carried across redirects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    Saved,
    Deleted,
    Cleared,
    DemoGenerated,
    Registered,
    LoginRequired,
    LoginFailed,
    RegisterFailed,
    InvalidEntry,
    CreateFailed,
    DeleteFailed,
    ClearFailed,
    DemoFailed,
    FetchFailed,
    ToggleFailed,
}

impl Notice {
    pub fn as_str(self) -> &'static str {
        match self {
            Notice::Saved => "saved",
            Notice::Deleted => "deleted",
            Notice::Cleared => "cleared",
            Notice::DemoGenerated => "demo_generated",
            Notice::Registered => "registered",
            Notice::LoginRequired => "login_required",
            Notice::LoginFailed => "login_failed",
            Notice::RegisterFailed => "register_failed",
            Notice::InvalidEntry => "invalid_entry",
            Notice::CreateFailed => "create_failed",
            Notice::DeleteFailed => "delete_failed",
            Notice::ClearFailed => "clear_failed",
            Notice::DemoFailed => "demo_failed",
            Notice::FetchFailed => "fetch_failed",
            Notice::ToggleFailed => "toggle_failed",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Notice::Saved => "Entry saved.",
            Notice::Deleted => "Entry deleted.",
            Notice::Cleared => "All of your entries were removed.",
            Notice::DemoGenerated => "Demo entries generated.",
            Notice::Registered => "Registration complete, please log in.",
            Notice::LoginRequired => "Please log in first.",
            Notice::LoginFailed => "Login failed.",
            Notice::RegisterFailed => "Registration failed.",
            Notice::InvalidEntry => "Entries need some text and a mood between 1 and 5.",
            Notice::CreateFailed => "Could not save the entry.",
            Notice::DeleteFailed => "Could not delete the entry.",
            Notice::ClearFailed => "Could not clear your entries.",
            Notice::DemoFailed => "Demo generation stopped early.",
            Notice::FetchFailed => "Could not refresh entries, showing the last loaded ones.",
            Notice::ToggleFailed => "Could not update the saved state.",
        }
    }

    pub fn is_failure(self) -> bool {
        !matches!(
            self,
            Notice::Saved
                | Notice::Deleted
                | Notice::Cleared
                | Notice::DemoGenerated
                | Notice::Registered
        )
    }
}

#[derive(Debug, Serialize)]
pub struct AnalyzedEntry {
    pub entry: Entry,
    pub analysis: ParsedAnalysis,
}

#[derive(Debug, Serialize)]
pub struct JournalResponse {
    pub entries: Vec<AnalyzedEntry>,
    pub keywords: Vec<WeightedTag>,
    pub trend: Vec<TrendPoint>,
}

#[derive(Debug, Serialize)]
pub struct CalendarResponse {
    pub year: i32,
    pub month: u32,
    pub title: String,
    pub cells: Vec<CalendarCell>,
}

#[derive(Debug, Serialize)]
pub struct SaveStateResponse {
    pub id: i64,
    pub is_saved: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_keywords_default_when_missing_or_null() {
        let missing: Entry = serde_json::from_value(serde_json::json!({
            "id": 1, "content": "sea", "mood_level": 3, "date": "2024-02-01"
        }))
        .unwrap();
        assert!(missing.keywords.is_empty());
        assert_eq!(missing.analysis, None);

        let null: Entry = serde_json::from_value(serde_json::json!({
            "id": 2, "content": "sea", "mood_level": 3, "date": "2024-02-01", "keywords": null
        }))
        .unwrap();
        assert!(null.keywords.is_empty());
    }

    #[test]
    fn notice_round_trips_through_query_value() {
        let notice: Notice = serde_json::from_str("\"toggle_failed\"").unwrap();
        assert_eq!(notice, Notice::ToggleFailed);
        assert_eq!(notice.as_str(), "toggle_failed");
        assert!(notice.is_failure());
        assert!(!Notice::Saved.is_failure());
    }

    #[test]
    fn mood_bucket_parses_query_values() {
        assert_eq!(MoodBucket::parse("happy"), Some(MoodBucket::Happy));
        assert_eq!(MoodBucket::parse(" sad "), Some(MoodBucket::Sad));
        assert_eq!(MoodBucket::parse(""), None);
        assert_eq!(MoodBucket::parse("ecstatic"), None);
    }
}
