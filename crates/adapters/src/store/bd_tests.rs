// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use convoy_core::IssueStatus;

#[test]
fn parse_issues_single_object() {
    let issues =
        parse_issues(r#"{"id": "cv-1", "type": "task", "status": "open", "title": "t"}"#).unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].id, "cv-1");
}

#[test]
fn parse_issues_array() {
    let issues = parse_issues(
        r#"[{"id": "cv-1", "status": "open"}, {"id": "cv-2", "status": "closed"}]"#,
    )
    .unwrap();
    assert_eq!(issues.len(), 2);
    assert_eq!(issues[1].status, IssueStatus::Closed);
}

#[test]
fn parse_issues_empty_output() {
    assert!(parse_issues("").unwrap().is_empty());
    assert!(parse_issues("  \n").unwrap().is_empty());
}

#[test]
fn parse_issues_garbage_is_parse_error() {
    let err = parse_issues("not json").unwrap_err();
    assert!(matches!(err, StoreError::Parse(_)));
}

#[test]
fn parse_deps_rows() {
    let deps = parse_deps(
        r#"[{"id": "cv-a", "type": "blocks", "status": "open"},
            {"id": "cv-b", "type": "tracks", "status": "open"}]"#,
    )
    .unwrap();
    assert_eq!(deps.len(), 2);
    assert_eq!(deps[0].kind, DepKind::Blocks);
    assert_eq!(deps[1].kind, DepKind::Tracks);
}

#[test]
fn dir_for_routes_by_prefix() {
    let mut stores = HashMap::new();
    stores.insert("api".to_string(), PathBuf::from("/town/api-rig"));
    let store = BdIssueStore::new("/town", stores);

    assert_eq!(
        store.dir_for(&IssueId::new("api-abc123")),
        Path::new("/town/api-rig")
    );
    // Unknown prefix falls back to the town root
    assert_eq!(store.dir_for(&IssueId::new("xx-abc123")), Path::new("/town"));
    assert_eq!(store.dir_for(&IssueId::new("nodash")), Path::new("/town"));
}
