use qms_core::{CrossRefError, CrossReferenceResolver, RecordKind, RecordRef};
use qms_test_utils::InMemoryRecordDirectory;

fn directory() -> InMemoryRecordDirectory {
    let directory = InMemoryRecordDirectory::new();
    let nca = RecordRef::Nca("nca-1".into());

    directory.insert(nca.clone(), "NCA-2025-00012", "open");
    directory.insert(RecordRef::Mjc("mjc-1".into()), "MJC-2025-00034", "in-progress");
    directory.insert(RecordRef::Complaint("c-1".into()), "CMP-2025-007", "investigating");

    directory.link(&nca, RecordRef::Mjc("mjc-1".into()));
    directory.link(&nca, RecordRef::Complaint("c-1".into()));
    directory.link(&nca, RecordRef::Recall("gone".into()));
    directory
}

#[tokio::test]
async fn test_related_records_for_nca() {
    let resolver = CrossReferenceResolver::new(directory());
    let related = resolver
        .related_records(&RecordRef::Nca("nca-1".into()))
        .await
        .unwrap();

    assert_eq!(related.len(), 2, "dangling recall link is skipped");

    let mjc = &related[0];
    assert_eq!(mjc.record.kind(), RecordKind::Mjc);
    assert_eq!(mjc.title, "Maintenance Job Card: MJC-2025-00034");
    assert_eq!(mjc.procedure_reference, "4.7");
    assert_eq!(mjc.form_number, "4.7F1");
    assert_eq!(mjc.link, "/mjc/mjc-1");

    let complaint = &related[1];
    assert_eq!(complaint.status, "investigating");
    assert_eq!(complaint.form_number, "3.10F2");
}

#[tokio::test]
async fn test_record_without_links() {
    let resolver = CrossReferenceResolver::new(directory());
    let related = resolver
        .related_records(&RecordRef::Mjc("mjc-1".into()))
        .await
        .unwrap();
    assert!(related.is_empty());
}

#[tokio::test]
async fn test_unknown_record() {
    let resolver = CrossReferenceResolver::new(directory());
    let err = resolver
        .related_records(&RecordRef::WorkOrder("wo-404".into()))
        .await
        .unwrap_err();
    assert_eq!(err, CrossRefError::NotFound("work-order:wo-404".to_string()));
}
