use serde::{Deserialize, Serialize};

use super::{FormErrors, required};
use crate::domain::Comment;

/// The comment form: a single text area.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentForm {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentInput {
    pub text: String,
}

impl CommentForm {
    pub fn from_comment(comment: &Comment) -> Self {
        Self {
            text: comment.text.clone(),
        }
    }

    pub fn validate(&self) -> Result<CommentInput, FormErrors> {
        let mut errors = FormErrors::new();
        let text = required(&mut errors, "text", &self.text);
        errors.finish(|| CommentInput { text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_comment_is_rejected() {
        let form = CommentForm {
            text: "   ".to_string(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("text"), &["This field is required.".to_string()]);
    }

    #[test]
    fn test_comment_text_is_trimmed() {
        let form = CommentForm {
            text: " Great post! \n".to_string(),
        };
        assert_eq!(form.validate().unwrap().text, "Great post!");
    }
}
