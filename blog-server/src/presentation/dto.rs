use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

// ======================= AUTH =======================

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password_confirm: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub expires_in: i64,
    #[serde(rename = "token_type")]
    pub token_type: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
}

// ======================= POSTS =======================

/// `pub_date` stays a string so a bad value becomes a field error.
#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub pub_date: Option<String>,
    #[serde(default)]
    pub location_id: Option<Uuid>,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(default = "default_published")]
    pub is_published: bool,
    #[serde(default)]
    pub image: Option<String>,
}

/// Absent fields are left alone; `null` clears a nullable one.
#[derive(Debug, Default, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub text: Option<String>,
    pub pub_date: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub location_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "present")]
    pub category_id: Option<Option<Uuid>>,
    pub is_published: Option<bool>,
    #[serde(default, deserialize_with = "present")]
    pub image: Option<Option<String>>,
}

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

// ======================= Utils =======================

fn default_published() -> bool {
    true
}

/// Only called when the key exists, so `null` becomes `Some(None)`.
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_distinguishes_absent_from_null() {
        let absent: UpdatePostRequest = serde_json::from_str(r#"{"text": "x"}"#).unwrap();
        assert_eq!(absent.category_id, None);
        assert_eq!(absent.image, None);

        let cleared: UpdatePostRequest =
            serde_json::from_str(r#"{"category_id": null, "image": null}"#).unwrap();
        assert_eq!(cleared.category_id, Some(None));
        assert_eq!(cleared.image, Some(None));

        let id = Uuid::new_v4();
        let set: UpdatePostRequest =
            serde_json::from_str(&format!(r#"{{"location_id": "{id}"}}"#)).unwrap();
        assert_eq!(set.location_id, Some(Some(id)));
    }

    #[test]
    fn create_defaults_to_published() {
        let request: CreatePostRequest =
            serde_json::from_str(r#"{"title": "t", "text": "x"}"#).unwrap();
        assert!(request.is_published);
        assert_eq!(request.pub_date, None);
    }
}
