use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ClientError;

/// A recipe as it appears in a result list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeSummary {
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub cuisine: Option<String>,
    #[serde(default)]
    pub course: Option<String>,
    #[serde(default)]
    pub diet: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub prep_time: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl RecipeSummary {
    /// Identifier used to open the recipe's detail page.
    ///
    /// Recipes without a server id are addressed by name.
    pub fn identifier(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.name)
    }
}

/// Full recipe as returned by `GET /recipes/{identifier}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeDetail {
    #[serde(flatten)]
    pub summary: RecipeSummary,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "list_or_string")]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: String,
}

impl RecipeDetail {
    /// Split the free-text instructions into steps.
    ///
    /// A step ends at a period followed by whitespace and an uppercase letter,
    /// so abbreviations like "approx. 5 min" stay in one step.
    pub fn steps(&self) -> Vec<&str> {
        let text = self.instructions.trim();
        let mut steps = Vec::new();
        let mut start = 0;
        let chars = text.char_indices();

        for (idx, ch) in chars {
            if ch != '.' {
                continue;
            }
            let boundary = idx + ch.len_utf8();
            let rest = &text[boundary..];
            let trimmed = rest.trim_start();
            if trimmed.len() == rest.len() {
                continue;
            }
            if trimmed.chars().next().is_some_and(char::is_uppercase) {
                steps.push(text[start..boundary].trim());
                start = boundary + (rest.len() - trimmed.len());
            }
        }

        let tail = text[start..].trim();
        if !tail.is_empty() {
            steps.push(tail);
        }
        steps
    }
}

/// Filter dimensions supported by the recipe listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterCategory {
    Cuisine,
    Course,
    Diet,
}

impl FilterCategory {
    pub const ALL: [FilterCategory; 3] = [
        FilterCategory::Cuisine,
        FilterCategory::Course,
        FilterCategory::Diet,
    ];

    /// Query parameter and path segment name
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterCategory::Cuisine => "cuisine",
            FilterCategory::Course => "course",
            FilterCategory::Diet => "diet",
        }
    }
}

impl fmt::Display for FilterCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterCategory {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cuisine" | "cuisines" => Ok(FilterCategory::Cuisine),
            "course" | "courses" => Ok(FilterCategory::Course),
            "diet" | "diets" => Ok(FilterCategory::Diet),
            other => Err(ClientError::ValidationError(format!(
                "Unknown filter category: {}",
                other
            ))),
        }
    }
}

/// Signed-in user's profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub age: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl UserProfile {
    /// Resolve the avatar reference against the API base URL.
    ///
    /// Inline `data:image` URIs are returned as is.
    pub fn avatar_url(&self, base_url: &str) -> Option<String> {
        let image = self.image.as_deref().filter(|i| !i.is_empty())?;
        if image.starts_with("data:image") {
            return Some(image.to_string());
        }
        Some(format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            image.trim_start_matches('/')
        ))
    }
}

/// Fields sent by the profile editor
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub age: String,
    pub bio: String,
    /// Local path of a new avatar image, if one was picked
    pub image_path: Option<std::path::PathBuf>,
}

impl From<&UserProfile> for ProfileUpdate {
    fn from(profile: &UserProfile) -> Self {
        ProfileUpdate {
            name: profile.name.clone(),
            email: profile.email.clone(),
            phone: profile.phone.clone().unwrap_or_default(),
            age: profile.age.clone().unwrap_or_default(),
            bio: profile.bio.clone().unwrap_or_default(),
            image_path: None,
        }
    }
}

/// Recipe submitted through the upload form
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewRecipe {
    pub title: String,
    pub ingredients: Vec<String>,
    pub instructions: String,
    pub image_url: String,
}

/// Envelope shared by the auth endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user: Option<UserProfile>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn list_or_string<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                serde_json::Value::String(s) => Some(s),
                serde_json::Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect(),
        Some(serde_json::Value::String(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    })
}
