//! Link Report
//!
//! Plain-text summary of the link graph as seen after a run: each post with
//! the file names it resolves to, and each attachment with the titles that
//! share it.

use super::materializer::Populated;
use crate::models::{Attachment, Post};
use std::fmt;

#[derive(Debug, Clone, Default)]
pub struct LinkReport {
    pub posts: Vec<Populated<Post>>,
    pub attachments: Vec<Populated<Attachment>>,
}

impl LinkReport {
    /// Total dangling identifiers seen across both kinds
    pub fn unresolved_count(&self) -> usize {
        self.posts.iter().map(|p| p.unresolved.len()).sum::<usize>()
            + self
                .attachments
                .iter()
                .map(|a| a.unresolved.len())
                .sum::<usize>()
    }

    pub fn find_post(&self, title: &str) -> Option<&Populated<Post>> {
        self.posts.iter().find(|p| p.document.title == title)
    }

    pub fn find_attachment(&self, file_name: &str) -> Option<&Populated<Attachment>> {
        self.attachments
            .iter()
            .find(|a| a.document.file_name == file_name)
    }
}

impl fmt::Display for LinkReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for post in &self.posts {
            writeln!(
                f,
                "Post {} has {} attachment(s):",
                post.document.title,
                post.resolved.len()
            )?;
            for attachment in &post.resolved {
                writeln!(f, "- Filename: {}", attachment.file_name)?;
            }
        }
        for attachment in &self.attachments {
            writeln!(
                f,
                "Attachment {} is shared by {} post(s):",
                attachment.document.file_name,
                attachment.resolved.len()
            )?;
            for post in &attachment.resolved {
                writeln!(f, "- Title: {}", post.title)?;
            }
        }
        Ok(())
    }
}
