use log::info;
use reqwest::{Method, StatusCode};

use crate::model::NewRecipe;
use crate::recipes::RecipeClient;
use crate::ClientError;

impl NewRecipe {
    /// Split a free-form ingredient field on commas and newlines
    pub fn parse_ingredients(text: &str) -> Vec<String> {
        text.split(|c: char| c == ',' || c == '\n')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        if self.title.trim().is_empty() {
            return Err(ClientError::ValidationError(
                "Recipe title cannot be empty".to_string(),
            ));
        }
        if self.ingredients.iter().all(|i| i.trim().is_empty()) {
            return Err(ClientError::ValidationError(
                "Add at least one ingredient".to_string(),
            ));
        }
        if self.instructions.trim().is_empty() {
            return Err(ClientError::ValidationError(
                "Instructions cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl RecipeClient {
    /// `POST /api/upload-recipe`; the API answers 200 or 201 on success
    pub async fn upload_recipe(&self, recipe: &NewRecipe) -> Result<(), ClientError> {
        recipe.validate()?;

        let url = self.api().endpoint(&["api", "upload-recipe"])?;
        let request = self.api().request(Method::POST, url).json(recipe);
        let response = self.api().send(request).await?;
        let status = response.status();
        if !matches!(status, StatusCode::OK | StatusCode::CREATED) {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::StatusError {
                status: status.as_u16(),
                body,
            });
        }
        info!("Uploaded \"{}\" ({})", recipe.title, status);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe() -> NewRecipe {
        NewRecipe {
            title: "Lemon Rice".to_string(),
            ingredients: vec!["rice".to_string(), "lemon".to_string()],
            instructions: "Cook rice. Add lemon.".to_string(),
            image_url: String::new(),
        }
    }

    #[test]
    fn test_parse_ingredients() {
        assert_eq!(
            NewRecipe::parse_ingredients("rice, lemon\n curry leaves ,,\n"),
            vec!["rice", "lemon", "curry leaves"]
        );
    }

    #[test]
    fn test_validate_accepts_complete_recipe() {
        assert!(recipe().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_missing_fields() {
        let mut missing_title = recipe();
        missing_title.title = "  ".to_string();
        assert!(matches!(
            missing_title.validate(),
            Err(ClientError::ValidationError(_))
        ));

        let mut no_ingredients = recipe();
        no_ingredients.ingredients = vec![" ".to_string()];
        assert!(no_ingredients.validate().is_err());

        let mut no_steps = recipe();
        no_steps.instructions.clear();
        assert!(no_steps.validate().is_err());
    }
}
