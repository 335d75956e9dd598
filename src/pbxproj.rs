// Copyright 2026 HealerKit Contributors
// SPDX-License-Identifier: Apache-2.0

//! Regex-anchored surgery on an Xcode `project.pbxproj` manifest.
//!
//! The manifest is treated as opaque text with three known structural
//! anchors: the `PBXBuildFile` section, the `PBXFileReference` section
//! (each delimited by Begin/End comments), and the compile-sources build
//! phase of the DungeonKitTests target (identified by a fixed object id).
//! Registering a source file mints two identifiers, appends one entry to
//! each of the two sections, and appends a reference to the build phase's
//! file list.
//!
//! Duplicate prevention is a substring check on the file name against the
//! whole manifest. It can false-positive (name appears elsewhere) and
//! false-negative (same name, different path); that matches the tool this
//! replaces and keeps re-runs idempotent in practice.
//!
//! Known quirk, kept on purpose: when the `PBXFileReference` section
//! delimiters are missing, the build-file entry is still inserted, leaving
//! a dangling `fileRef` identifier. Each insertion gates only on its own
//! anchor.

use anyhow::{Context, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Default manifest location, relative to the repository root.
pub const DEFAULT_PROJECT_FILE: &str = "HealerKit.xcodeproj/project.pbxproj";

/// Object id of the DungeonKitTests compile-sources build phase.
const TESTS_SOURCES_PHASE_ID: &str = "A194BCD52E7873C400DC3B4F";

const BUILD_FILE_END: &str = "/* End PBXBuildFile section */";
const FILE_REF_END: &str = "/* End PBXFileReference section */";

/// Test sources that belong in the DungeonKitTests target, as
/// `(relative path, file name)` pairs. Paths are relative to the project
/// root (the parent of the `.xcodeproj` directory).
pub const TEST_FILES: &[(&str, &str)] = &[
    (
        "DungeonKitTests/ModelTests/DungeonTests.swift",
        "DungeonTests.swift",
    ),
    (
        "DungeonKitTests/ModelTests/BossEncounterTests.swift",
        "BossEncounterTests.swift",
    ),
    (
        "DungeonKitTests/ModelTests/SeasonTests.swift",
        "SeasonTests.swift",
    ),
];

#[derive(Debug, Error)]
pub enum PatchError {
    #[error("project manifest not found: {}", .0.display())]
    ManifestMissing(PathBuf),
}

/// Per-entry result of a registration run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// Entries were inserted into the manifest.
    Added,
    /// File name already appears in the manifest; nothing inserted.
    AlreadyPresent,
    /// Source file absent on disk; entry skipped with a warning.
    SourceMissing,
}

/// One entry's outcome, for the CLI layer to report.
#[derive(Debug, Clone)]
pub struct RegisterReport {
    pub file_name: String,
    pub outcome: RegisterOutcome,
}

/// Mint a pseudo-unique 24-character identifier in the manifest's style:
/// an uppercased UUIDv4 with dashes stripped, truncated to 24 hex chars.
/// Uniqueness is probabilistic; no collision check against the manifest.
pub fn mint_identifier() -> String {
    let mut id = Uuid::new_v4().simple().to_string().to_uppercase();
    id.truncate(24);
    id
}

/// Register one source file in the manifest text. Pure string
/// transformation; the caller has already applied the existence and
/// duplicate gates.
pub fn register_file(content: &str, file_name: &str) -> String {
    let file_ref_id = mint_identifier();
    let build_file_id = mint_identifier();
    debug!("minting ids for {file_name}: {file_ref_id}, {build_file_id}");

    let mut content = content.to_string();

    // PBXBuildFile entry, inserted just before the section's end comment.
    let build_file_entry = format!(
        "\t\t{build_file_id} /* {file_name} in Sources */ = {{isa = PBXBuildFile; \
         fileRef = {file_ref_id} /* {file_name} */; }};"
    );
    let build_section_re = Regex::new(
        r"(?s)/\* Begin PBXBuildFile section \*/.*?/\* End PBXBuildFile section \*/",
    )
    .expect("build-file section regex is valid");
    if build_section_re.is_match(&content) {
        if let Some(end) = content.find(BUILD_FILE_END) {
            content.insert_str(end, &format!("{build_file_entry}\n"));
        }
    }

    // PBXFileReference entry, same placement rule in its own section.
    let file_ref_entry = format!(
        "\t\t{file_ref_id} /* {file_name} */ = {{isa = PBXFileReference; \
         lastKnownFileType = sourcecode.swift; path = {file_name}; \
         sourceTree = \"<group>\"; }};"
    );
    let file_ref_section_re = Regex::new(
        r"(?s)/\* Begin PBXFileReference section \*/.*?/\* End PBXFileReference section \*/",
    )
    .expect("file-reference section regex is valid");
    if file_ref_section_re.is_match(&content) {
        if let Some(end) = content.find(FILE_REF_END) {
            content.insert_str(end, &format!("{file_ref_entry}\n"));
        }
    }

    // Append to the DungeonKitTests compile-sources file list: match from
    // the phase's object id through the opening of its `files = (` list and
    // insert right after whatever entries are already there.
    let phase_re = Regex::new(&format!(
        r"(?s){TESTS_SOURCES_PHASE_ID} /\* Sources \*/ = \{{[^}}]+files = \([^)]+"
    ))
    .expect("sources phase regex is valid");
    if let Some(m) = phase_re.find(&content) {
        let phase_entry = format!("\n\t\t\t\t{build_file_id} /* {file_name} in Sources */,");
        content.insert_str(m.end(), &phase_entry);
    }

    content
}

/// Register every entry into the manifest at `project_file`.
///
/// The manifest is read once, each entry is gated (source file must exist
/// on disk, file name must not already appear in the manifest) and
/// registered in the fixed list order, and the whole file is written back
/// in one shot. No atomic replace, no backup.
pub fn run(project_file: &Path, entries: &[(&str, &str)]) -> Result<Vec<RegisterReport>> {
    if !project_file.exists() {
        return Err(PatchError::ManifestMissing(project_file.to_path_buf()).into());
    }

    let mut content = std::fs::read_to_string(project_file)
        .with_context(|| format!("failed to read {}", project_file.display()))?;

    // Entry paths resolve against the project root, one level above the
    // .xcodeproj directory the manifest lives in.
    let project_root = project_file
        .parent()
        .and_then(Path::parent)
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();

    let mut reports = Vec::with_capacity(entries.len());
    for (rel_path, file_name) in entries {
        let outcome = if !project_root.join(rel_path).exists() {
            warn!("{rel_path} does not exist, skipping");
            RegisterOutcome::SourceMissing
        } else if content.contains(file_name) {
            info!("{file_name} already in project");
            RegisterOutcome::AlreadyPresent
        } else {
            info!("adding {file_name} to project");
            content = register_file(&content, file_name);
            RegisterOutcome::Added
        };
        reports.push(RegisterReport {
            file_name: file_name.to_string(),
            outcome,
        });
    }

    std::fs::write(project_file, &content)
        .with_context(|| format!("failed to write {}", project_file.display()))?;

    Ok(reports)
}
