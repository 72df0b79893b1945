use log::info;
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use std::path::Path;

use super::{accepted, AuthClient};
use crate::model::{AuthResponse, ProfileUpdate, UserProfile};
use crate::ClientError;

fn image_mime(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase);
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

async fn image_part(path: &Path) -> Result<Part, ClientError> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("avatar")
        .to_string();
    Ok(Part::bytes(bytes)
        .file_name(file_name)
        .mime_str(image_mime(path))?)
}

impl AuthClient {
    /// Save the profile editor's fields (and optional new avatar).
    ///
    /// Returns the profile as stored by the server.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserProfile, ClientError> {
        let url = self.api().endpoint(&["auth", "update-profile"])?;
        let request = self.api().authorized(Method::PUT, url)?;

        let mut form = Form::new()
            .text("name", update.name.clone())
            .text("email", update.email.clone())
            .text("phone", update.phone.clone())
            .text("age", update.age.clone())
            .text("bio", update.bio.clone());
        if let Some(path) = &update.image_path {
            form = form.part("image", image_part(path).await?);
        }

        let response: AuthResponse = self.api().send_json(request.multipart(form)).await?;
        let user = accepted(response, "Update failed")?
            .user
            .ok_or_else(|| ClientError::MalformedResponse("Response has no user".to_string()))?;
        info!("Profile updated for {}", user.email);
        Ok(user)
    }
}
