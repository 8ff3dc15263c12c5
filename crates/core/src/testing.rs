//! Shared fixtures for unit tests.

use crate::memory::{DocumentSeed, MemoryRepository};
use std::collections::BTreeMap;

pub(crate) const ADMIN: &str = "Administrator";

/// A root, a `workspaces` folder, the `Reports` folder (id 42) and one file inside it (id 99).
pub(crate) const REPORTS_SEED: &str = r#"
principals:
  - { id: u-admin, first_name: System, last_name: Administrator, login: Administrator }
  - { id: u-jdoe, first_name: John, last_name: Doe, login: jdoe }

documents:
  - id: root
    type: Root
    name: ""
    folderish: true
    properties: &stamps
      creator: Administrator
      last_contributor: Administrator
      created: "2014-01-01T00:00:00Z"
      modified: "2014-01-01T00:00:00Z"
  - { id: ws, type: WorkspaceRoot, name: workspaces, parent: root, folderish: true, properties: *stamps }
  - id: "42"
    type: Folder
    name: Reports
    parent: ws
    folderish: true
    properties:
      title: Reports
      description: Quarterly reports
      creator: jdoe
      last_contributor: Administrator
      created: "2014-03-01T10:00:00Z"
      modified: "2014-03-01T10:00:00Z"
  - id: "99"
    type: File
    name: one.txt
    parent: "42"
    properties:
      title: one.txt
      creator: jdoe
      last_contributor: jdoe
      created: "2014-03-01T10:00:00Z"
      modified: "2014-03-01T10:00:00Z"

tags:
  - { document: "42", label: finance, user: Administrator }
  - { document: "42", label: q1, user: Administrator }
  - { document: "42", label: private, user: jdoe }
"#;

pub(crate) fn reports_repository() -> MemoryRepository {
    MemoryRepository::from_yaml_str(REPORTS_SEED).expect("reports seed should load")
}

/// Adds a child created and modified at the same instant as the seeded documents.
pub(crate) fn seed_child(repo: &MemoryRepository, id: &str, name: &str, parent: &str, folderish: bool) {
    let mut properties = BTreeMap::new();
    for (key, value) in [
        ("title", name),
        ("creator", "jdoe"),
        ("last_contributor", "jdoe"),
        ("created", "2014-03-01T10:00:00Z"),
        ("modified", "2014-03-01T10:00:00Z"),
    ] {
        properties.insert(key.to_string(), serde_json::Value::String(value.to_string()));
    }
    repo.insert_document(DocumentSeed {
        id: Some(id.to_string()),
        doc_type: if folderish { "Folder" } else { "File" }.to_string(),
        name: name.to_string(),
        parent: Some(parent.to_string()),
        folderish,
        version_label: "0.1".into(),
        lifecycle_state: "project".into(),
        quota: None,
        properties,
    })
    .expect("child should insert");
}
