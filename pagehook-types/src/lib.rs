//! Shared types for pagehook
//!
//! This crate provides the payload and resource shapes passed between
//! pre-processing hooks, plus the commit-history records read from the
//! repository API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Request payload handed to every hook.
///
/// Unknown fields survive a deserialize/serialize round trip through `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,

    /// Branch, tag or commit sha
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub git_ref: Option<String>,

    /// Path of the source file within the repository (e.g. "docs/intro.md")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Strain name; used as the site context path when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strain: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<Resource>,

    /// Serialized form of the payload, set by the JSON hook
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Payload {
    /// Payload carrying only a resource
    pub fn with_resource(resource: Resource) -> Self {
        Self {
            resource: Some(resource),
            ..Self::default()
        }
    }
}

/// In-memory representation of one rendered content page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    /// Rendered fragments (strings) or AST nodes, in document order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Value>>,

    /// Raw commit-history API response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub committers: Option<Vec<Committer>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<LastModified>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nav: Option<Vec<Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_path: Option<String>,

    /// Source markdown
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    /// Rendered HTML
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mdast: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub htast: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Resource {
    /// Resource whose children are the given string fragments
    pub fn from_fragments<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            children: Some(
                fragments
                    .into_iter()
                    .map(|f| Value::String(f.into()))
                    .collect(),
            ),
            ..Self::default()
        }
    }
}

/// One entry of the commit-history API response.
///
/// The shape belongs to the API; every field is optional and unknown
/// fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommitRecord {
    #[serde(default)]
    pub author: Option<AccountRef>,

    #[serde(default)]
    pub commit: Option<CommitDetail>,
}

/// Hosting account attached to a commit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountRef {
    #[serde(default)]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommitDetail {
    #[serde(default)]
    pub author: Option<Signature>,
}

/// Git author signature
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Signature {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    /// Author date as sent by the API (usually ISO 8601)
    #[serde(default)]
    pub date: Option<String>,
}

impl CommitRecord {
    pub fn avatar_url(&self) -> Option<&str> {
        self.author.as_ref()?.avatar_url.as_deref()
    }

    pub fn signature(&self) -> Option<&Signature> {
        self.commit.as_ref()?.author.as_ref()
    }

    pub fn author_date(&self) -> Option<&str> {
        self.signature()?.date.as_deref()
    }
}

impl CommitRecord {
    /// Read a record field by field; mistyped fields read as absent.
    pub fn from_value(item: &Value) -> Self {
        let text = |pointer: &str| {
            item.pointer(pointer)
                .and_then(Value::as_str)
                .map(str::to_string)
        };

        let author = item
            .get("author")
            .filter(|v| v.is_object())
            .map(|_| AccountRef {
                avatar_url: text("/author/avatar_url"),
            });
        let commit = item
            .get("commit")
            .filter(|v| v.is_object())
            .map(|commit| CommitDetail {
                author: commit
                    .get("author")
                    .filter(|v| v.is_object())
                    .map(|_| Signature {
                        name: text("/commit/author/name"),
                        email: text("/commit/author/email"),
                        date: text("/commit/author/date"),
                    }),
            });

        Self { author, commit }
    }
}

/// Decode the records of a raw commit-history response.
///
/// Anything that is not an array yields no records. Every array entry
/// yields one record at the same index, empty when the entry is not an
/// object.
pub fn commit_records(metadata: Option<&Value>) -> Vec<CommitRecord> {
    match metadata {
        Some(Value::Array(items)) => items.iter().map(CommitRecord::from_value).collect(),
        _ => Vec::new(),
    }
}

/// Deduplicated contributor derived from commit history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Committer {
    pub avatar_url: String,

    /// "{name} | {email}"
    pub display: String,
}

/// Last-modified stamp of a resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastModified {
    pub raw: Option<String>,
    pub display: String,
}

impl LastModified {
    pub const UNKNOWN: &'static str = "Unknown";

    pub fn unknown() -> Self {
        Self {
            raw: None,
            display: Self::UNKNOWN.to_string(),
        }
    }
}
