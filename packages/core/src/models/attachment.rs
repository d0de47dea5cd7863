//! Attachment Model
//!
//! An attachment is a named file shared by any number of posts.

use super::document::{
    check_length, check_references, Document, DocumentId, DocumentKind, Linked, NewDocument,
    ValidationError,
};
use super::post::Post;
use serde::{Deserialize, Serialize};

pub const MAX_FILE_NAME_LEN: usize = 255;

const FORBIDDEN_FILE_NAME_CHARS: [char; 3] = ['/', '\\', '\0'];

fn validate_file_name(file_name: &str) -> Result<(), ValidationError> {
    check_length("fileName", file_name, MAX_FILE_NAME_LEN)?;
    if let Some(c) = file_name
        .chars()
        .find(|c| FORBIDDEN_FILE_NAME_CHARS.contains(c))
    {
        return Err(ValidationError::forbidden_character("fileName", c));
    }
    Ok(())
}

/// An attachment that has not been stored yet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAttachment {
    #[serde(default)]
    pub file_name: String,
}

impl NewAttachment {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }
}

impl NewDocument for NewAttachment {
    type Output = Attachment;

    fn validate(&self) -> Result<(), ValidationError> {
        validate_file_name(&self.file_name)
    }

    fn into_document(self, id: DocumentId) -> Attachment {
        Attachment {
            id,
            file_name: self.file_name,
            posts: Vec::new(),
        }
    }
}

/// A stored attachment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    #[serde(rename = "uuid")]
    pub id: DocumentId,
    #[serde(default)]
    pub file_name: String,
    /// Post identifiers in link order; duplicates are kept
    #[serde(default)]
    pub posts: Vec<DocumentId>,
}

impl Attachment {
    /// Record that `post` shares this attachment, in memory only
    pub fn share(&mut self, post: DocumentId) {
        self.posts.push(post);
    }

    pub fn is_shared_by(&self, post: DocumentId) -> bool {
        self.posts.contains(&post)
    }
}

impl Document for Attachment {
    const KIND: DocumentKind = DocumentKind::Attachment;

    fn id(&self) -> DocumentId {
        self.id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validate_file_name(&self.file_name)?;
        check_references("posts", &self.posts)
    }
}

impl Linked for Attachment {
    type Target = Post;

    fn references(&self) -> &[DocumentId] {
        &self.posts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_file_name_uses_camel_case_on_the_wire() {
        let id = DocumentId::generate();
        let attachment = NewAttachment::new("f.txt").into_document(id);
        let value = serde_json::to_value(&attachment).unwrap();
        assert_eq!(
            value,
            json!({ "uuid": id.to_string(), "fileName": "f.txt", "posts": [] })
        );
    }

    #[test]
    fn test_path_separators_are_rejected() {
        assert_eq!(
            NewAttachment::new("dir/f.txt").validate(),
            Err(ValidationError::forbidden_character("fileName", '/'))
        );
        assert_eq!(
            NewAttachment::new("dir\\f.txt").validate(),
            Err(ValidationError::forbidden_character("fileName", '\\'))
        );
    }

    #[test]
    fn test_empty_file_name_is_valid() {
        assert!(NewAttachment::default().validate().is_ok());
    }

    #[test]
    fn test_share_records_post() {
        let mut attachment = NewAttachment::new("f.txt").into_document(DocumentId::generate());
        let post = DocumentId::generate();
        attachment.share(post);
        assert!(attachment.is_shared_by(post));
        assert_eq!(attachment.references(), &[post]);
    }
}
