//! Version management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;
use uuid::Uuid;

use crate::output::{self, OutputFormat};
use docvault_core::error::AppError;
use docvault_core::types::pagination::PageRequest;
use docvault_entity::{
    CreateComment, CreateTag, DocumentChange, DocumentVersion, UploadType,
};
use docvault_service::CreateVersionRequest;

/// Arguments for version commands
#[derive(Debug, Args)]
pub struct VersionArgs {
    /// Version subcommand
    #[command(subcommand)]
    pub command: VersionCommand,
}

/// Version subcommands
#[derive(Debug, Subcommand)]
pub enum VersionCommand {
    /// Create a new version from a content file
    Create {
        /// Document ID
        document_id: Uuid,
        /// File to read the new content from
        #[arg(long)]
        file: String,
        /// Logical document path (defaults to the content file path)
        #[arg(long)]
        path: Option<String>,
        /// Actor creating the version
        #[arg(long)]
        by: String,
        /// Upload type (initial, update, revision)
        #[arg(long, default_value = "update")]
        upload_type: String,
        /// Free-text reason for the upload
        #[arg(long)]
        reason: Option<String>,
    },
    /// List version history for a document
    List {
        /// Document ID
        document_id: Uuid,
        /// Page number
        #[arg(long, default_value_t = 1)]
        page: u64,
        /// Page size
        #[arg(long, default_value_t = 50)]
        page_size: u64,
    },
    /// Show one version, including its content
    Show {
        /// Document ID
        document_id: Uuid,
        /// Version number
        version_number: i32,
        /// Print the full content instead of metadata only
        #[arg(long)]
        content: bool,
    },
    /// Show the current version of a document
    Current {
        /// Document ID
        document_id: Uuid,
    },
    /// Compare two versions of a document
    Compare {
        /// Document ID
        document_id: Uuid,
        /// First version number
        version_1: i32,
        /// Second version number
        version_2: i32,
    },
    /// Roll a document back to an older version
    Rollback {
        /// Document ID
        document_id: Uuid,
        /// Version number to roll back to
        target_version: i32,
        /// Actor performing the rollback
        #[arg(long)]
        by: String,
        /// Reason for the rollback
        #[arg(long)]
        reason: String,
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
    /// Add a comment to a version
    Comment {
        /// Version ID
        version_id: Uuid,
        /// Actor writing the comment
        #[arg(long)]
        by: String,
        /// Comment body
        #[arg(long)]
        text: String,
        /// Comment category
        #[arg(long, default_value = "general")]
        comment_type: String,
    },
    /// List comments on a version
    Comments {
        /// Version ID
        version_id: Uuid,
    },
    /// Add a tag to a version
    Tag {
        /// Version ID
        version_id: Uuid,
        /// Tag name
        name: String,
        /// Tag value
        value: String,
        /// Tag category
        #[arg(long, default_value = "custom")]
        tag_type: String,
        /// Actor creating the tag
        #[arg(long)]
        by: String,
    },
    /// List tags on a version
    Tags {
        /// Version ID
        version_id: Uuid,
    },
}

/// Version display row for table output
#[derive(Debug, Serialize, Tabled)]
struct VersionRow {
    /// Version number
    version: i32,
    /// Current flag
    current: bool,
    /// Upload type
    upload_type: String,
    /// Uploader
    uploaded_by: String,
    /// Size in bytes
    file_size: i64,
    /// Content hash prefix
    hash: String,
    /// Created at
    created_at: String,
}

impl From<&DocumentVersion> for VersionRow {
    fn from(v: &DocumentVersion) -> Self {
        Self {
            version: v.version_number,
            current: v.is_current,
            upload_type: v.upload_type.to_string(),
            uploaded_by: v.uploaded_by.clone(),
            file_size: v.file_size,
            hash: v.content_hash.chars().take(12).collect(),
            created_at: v.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Change display row for table output
#[derive(Debug, Serialize, Tabled)]
struct ChangeRow {
    /// Line range
    lines: String,
    /// Change type
    change_type: String,
    /// Impact level
    impact: String,
    /// Affected frameworks
    frameworks: String,
    /// Summary
    summary: String,
}

impl From<&DocumentChange> for ChangeRow {
    fn from(c: &DocumentChange) -> Self {
        let frameworks = c
            .compliance_impact
            .affected_frameworks
            .iter()
            .map(|f| f.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            lines: format!("{}-{}", c.line_start, c.line_end),
            change_type: c.change_type.to_string(),
            impact: c.impact_assessment.to_string(),
            frameworks,
            summary: c.change_summary.clone(),
        }
    }
}

fn print_version_detail(version: &DocumentVersion) {
    output::print_kv("Document", &version.document_id.to_string());
    output::print_kv("Version", &version.version_number.to_string());
    output::print_kv("Version ID", &version.id.to_string());
    output::print_kv("Path", &version.path);
    output::print_kv("MIME type", &version.mime_type);
    output::print_kv("Size", &format!("{} bytes", version.file_size));
    output::print_kv("Hash", &version.content_hash);
    output::print_kv("Upload type", version.upload_type.as_str());
    output::print_kv("Uploaded by", &version.uploaded_by);
    output::print_kv("Current", &version.is_current.to_string());
    output::print_kv(
        "Created at",
        &version.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
    );
    if let Some(reason) = &version.upload_reason {
        output::print_kv("Reason", reason);
    }
}

/// Execute version commands
pub async fn execute(
    args: &VersionArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path).await?;
    let service = super::create_version_service(&config).await?;

    match &args.command {
        VersionCommand::Create {
            document_id,
            file,
            path,
            by,
            upload_type,
            reason,
        } => {
            let content = std::fs::read_to_string(file)
                .map_err(|e| AppError::internal(format!("Failed to read '{}': {}", file, e)))?;
            let upload_type: UploadType = upload_type.parse()?;

            let version = service
                .create_version(CreateVersionRequest {
                    document_id: *document_id,
                    path: path.clone().unwrap_or_else(|| file.clone()),
                    content,
                    uploaded_by: by.clone(),
                    upload_type,
                    upload_reason: reason.clone(),
                })
                .await?;

            output::print_success(&format!(
                "Created version {} of document {}",
                version.version_number, version.document_id
            ));
        }
        VersionCommand::List {
            document_id,
            page,
            page_size,
        } => {
            let versions = service
                .get_versions(*document_id, &PageRequest::new(*page, *page_size))
                .await?;

            let rows: Vec<VersionRow> = versions.items.iter().map(VersionRow::from).collect();
            output::print_list(&rows, format);
            if format == OutputFormat::Table {
                println!(
                    "Page {}/{} ({} versions total)",
                    versions.page, versions.total_pages, versions.total_items
                );
            }
        }
        VersionCommand::Show {
            document_id,
            version_number,
            content,
        } => {
            let version = service.get_version(*document_id, *version_number).await?;
            if *content {
                println!("{}", version.content);
            } else if format == OutputFormat::Table {
                print_version_detail(&version);
            } else {
                output::print_item(&version, format);
            }
        }
        VersionCommand::Current { document_id } => {
            let version = service.get_current_version(*document_id).await?;
            if format == OutputFormat::Table {
                print_version_detail(&version);
            } else {
                output::print_item(&version, format);
            }
        }
        VersionCommand::Compare {
            document_id,
            version_1,
            version_2,
        } => {
            let comparison = service
                .compare_versions(*document_id, *version_1, *version_2)
                .await?;

            if format == OutputFormat::Json {
                output::print_item(&comparison, format);
            } else {
                println!(
                    "Comparing version {} to version {}:",
                    comparison.version1.version_number, comparison.version2.version_number
                );
                let rows: Vec<ChangeRow> =
                    comparison.changes.iter().map(ChangeRow::from).collect();
                output::print_list(&rows, format);
                println!(
                    "{} changes: {} added, {} deleted, {} modified",
                    comparison.statistics.total_changes,
                    comparison.statistics.additions,
                    comparison.statistics.deletions,
                    comparison.statistics.modifications
                );
            }
        }
        VersionCommand::Rollback {
            document_id,
            target_version,
            by,
            reason,
            force,
        } => {
            if !force {
                let confirm = dialoguer::Confirm::new()
                    .with_prompt(format!(
                        "Roll document {} back to version {}? This creates a new version.",
                        document_id, target_version
                    ))
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {}", e)))?;

                if !confirm {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            let version = service
                .rollback_to_version(*document_id, *target_version, by, reason)
                .await?;

            output::print_success(&format!(
                "Rolled back to version {}; new current version is {}",
                target_version, version.version_number
            ));
        }
        VersionCommand::Comment {
            version_id,
            by,
            text,
            comment_type,
        } => {
            let comment = service
                .add_comment(CreateComment {
                    version_id: *version_id,
                    change_id: None,
                    commenter: by.clone(),
                    comment_type: comment_type.clone(),
                    comment_text: text.clone(),
                })
                .await?;
            output::print_success(&format!("Comment {} added", comment.id));
        }
        VersionCommand::Comments { version_id } => {
            let comments = service.list_comments(*version_id).await?;
            if format == OutputFormat::Json {
                output::print_item(&comments, format);
            } else if comments.is_empty() {
                println!("No comments.");
            } else {
                for comment in &comments {
                    println!(
                        "[{}] {} ({}): {}",
                        comment.created_at.format("%Y-%m-%d %H:%M"),
                        comment.commenter,
                        comment.comment_type,
                        comment.comment_text
                    );
                }
            }
        }
        VersionCommand::Tag {
            version_id,
            name,
            value,
            tag_type,
            by,
        } => {
            let tag = service
                .add_tag(CreateTag {
                    version_id: *version_id,
                    tag_name: name.clone(),
                    tag_value: value.clone(),
                    tag_type: tag_type.clone(),
                    created_by: by.clone(),
                })
                .await?;
            output::print_success(&format!("Tag '{}' added to version {}", tag.tag_name, version_id));
        }
        VersionCommand::Tags { version_id } => {
            let tags = service.list_tags(*version_id).await?;
            if format == OutputFormat::Json {
                output::print_item(&tags, format);
            } else if tags.is_empty() {
                println!("No tags.");
            } else {
                for tag in &tags {
                    output::print_kv(&tag.tag_name, &format!("{} ({})", tag.tag_value, tag.tag_type));
                }
            }
        }
    }

    Ok(())
}
