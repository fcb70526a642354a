//! User-facing notices (toasts) produced by dashboard actions.

use hostdesk_core::HostdeskError;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NoticeLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub level: NoticeLevel,
}

impl Notice {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            level: NoticeLevel::Info,
        }
    }

    pub fn error(title: impl Into<String>, err: &HostdeskError) -> Self {
        Self {
            title: title.into(),
            description: err.to_string(),
            level: NoticeLevel::Error,
        }
    }
}
