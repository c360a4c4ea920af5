//! Redaction categories and the fixed strings substituted for effaced values

use serde::{Deserialize, Serialize};

/// 1x1 transparent PNG, small enough to keep image blocks valid for resume.
pub const IMAGE_PNG_BASE64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

pub const IMAGE_MEDIA_TYPE: &str = "image/png";

/// Every kind of rewrite the engine can report, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Thinking,
    FileRead,
    WriteInput,
    WriteResult,
    EditInput,
    EditResult,
    CommandInput,
    CommandResult,
    SearchResult,
    PlanInput,
    ToolResult,
    TaskOutput,
    TaskContent,
    TaskPrompt,
    BashProgress,
    AgentProgress,
    FilePath,
    MetaText,
    Image,
    CommandEcho,
    MarkedSpan,
    LocalOutput,
}

impl Category {
    pub const ALL: [Category; 22] = [
        Category::Thinking,
        Category::FileRead,
        Category::WriteInput,
        Category::WriteResult,
        Category::EditInput,
        Category::EditResult,
        Category::CommandInput,
        Category::CommandResult,
        Category::SearchResult,
        Category::PlanInput,
        Category::ToolResult,
        Category::TaskOutput,
        Category::TaskContent,
        Category::TaskPrompt,
        Category::BashProgress,
        Category::AgentProgress,
        Category::FilePath,
        Category::MetaText,
        Category::Image,
        Category::CommandEcho,
        Category::MarkedSpan,
        Category::LocalOutput,
    ];

    /// Placeholder string written over effaced string values of this category.
    pub fn placeholder(self) -> &'static str {
        match self {
            Category::Thinking => "[thinking effaced]",
            Category::FileRead => "[file content effaced]",
            Category::WriteInput => "[written content effaced]",
            Category::WriteResult => "[write result effaced]",
            Category::EditInput => "[edit effaced]",
            Category::EditResult => "[edit result effaced]",
            Category::CommandInput => "[command effaced]",
            Category::CommandResult => "[command output effaced]",
            Category::SearchResult => "",
            Category::PlanInput => "[plan effaced]",
            Category::ToolResult => "[tool result effaced]",
            Category::TaskOutput => "[task output effaced]",
            Category::TaskContent => "[task content effaced]",
            Category::TaskPrompt => "[task prompt effaced]",
            Category::BashProgress => "[progress output effaced]",
            Category::AgentProgress => "[agent progress effaced]",
            // paths are shortened to their basename, not replaced
            Category::FilePath => "",
            Category::MetaText => "[meta context effaced]",
            Category::Image => IMAGE_PNG_BASE64,
            Category::CommandEcho => "[local command effaced]",
            Category::MarkedSpan => "[marked text effaced]",
            Category::LocalOutput => "[local output effaced]",
        }
    }

    /// Human readable label used by the summary report.
    pub fn label(self) -> &'static str {
        match self {
            Category::Thinking => "thinking blocks",
            Category::FileRead => "file reads",
            Category::WriteInput => "write inputs",
            Category::WriteResult => "write results",
            Category::EditInput => "edit inputs",
            Category::EditResult => "edit results",
            Category::CommandInput => "bash commands",
            Category::CommandResult => "bash output",
            Category::SearchResult => "search results",
            Category::PlanInput => "plans",
            Category::ToolResult => "tool results",
            Category::TaskOutput => "task output",
            Category::TaskContent => "task content",
            Category::TaskPrompt => "task prompts",
            Category::BashProgress => "bash progress",
            Category::AgentProgress => "agent progress",
            Category::FilePath => "file paths",
            Category::MetaText => "meta context",
            Category::Image => "images",
            Category::CommandEcho => "local commands",
            Category::MarkedSpan => "marked spans",
            Category::LocalOutput => "local output",
        }
    }
}
