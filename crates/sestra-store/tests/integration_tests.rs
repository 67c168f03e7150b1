//! Integration tests for sestra-store
//!
//! These tests verify storage of projects, documents and annotations through
//! the repository traits.

use sestra_domain::traits::{
    AnnotationRepository, AnnotationScope, DocumentRepository, NewAnnotation, PersistenceError,
    ProjectRepository, Transactional,
};
use sestra_domain::{
    Annotation, AnnotationAttribute, AnnotationId, AnnotationValue, Attribute, AttributeType,
    AttributeValue, Document, Layer, Project, RelationAnnotationSpanRole, RelationLayerSpanRole,
};
use sestra_store::{SqliteStore, StoreConfig};

fn sample_project(name: &str) -> Project {
    Project::new(
        name,
        vec![
            Layer::span(
                "entities",
                vec![
                    Attribute::new("confidence", AttributeType::Float),
                    Attribute::new("kind", AttributeType::enumeration(["person", "place"])),
                ],
            ),
            Layer::relation(
                "links",
                vec![
                    RelationLayerSpanRole::new("source", "entities"),
                    RelationLayerSpanRole::new("target", "entities"),
                ],
                vec![Attribute::new("weight", AttributeType::Int)],
            ),
        ],
    )
}

#[test]
fn test_store_initialization() {
    let store = SqliteStore::new(":memory:");
    assert!(store.is_ok(), "Store should initialize successfully");
}

#[test]
fn test_file_store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::with_path(dir.path().join("sestra.db"));

    {
        let mut store = SqliteStore::open(&config).unwrap();
        store.save_project(&sample_project("p1"), "user1").unwrap();
    }

    let store = SqliteStore::open(&config).unwrap();
    assert_eq!(
        store.find_project_by_name("p1").unwrap(),
        Some(sample_project("p1"))
    );
}

#[test]
fn test_project_names_in_creation_order() {
    let mut store = SqliteStore::in_memory().unwrap();
    store.save_project(&sample_project("zeta"), "user1").unwrap();
    store.save_project(&sample_project("alpha"), "user2").unwrap();

    assert_eq!(store.list_project_names().unwrap(), vec!["zeta", "alpha"]);
    assert!(store.exists_project_by_name("alpha").unwrap());
    assert!(!store.exists_project_by_name("beta").unwrap());
}

#[test]
fn test_duplicate_project_is_conflict() {
    let mut store = SqliteStore::in_memory().unwrap();
    store.save_project(&sample_project("p1"), "user1").unwrap();

    let err = store.save_project(&sample_project("p1"), "user2").unwrap_err();

    assert!(err.is_conflict(), "Duplicate name should be a conflict: {}", err);
    assert_eq!(store.list_project_names().unwrap(), vec!["p1"]);
}

#[test]
fn test_layer_lookup_is_per_project() {
    let mut store = SqliteStore::in_memory().unwrap();
    store.save_project(&sample_project("p1"), "user1").unwrap();
    store.save_project(&sample_project("p2"), "user1").unwrap();

    let in_p1 = store.find_layer_id("p1", "links").unwrap().unwrap();
    let in_p2 = store.find_layer_id("p2", "links").unwrap().unwrap();
    assert_ne!(in_p1, in_p2);

    let (id, layer) = store.find_layer_by_name("p2", "links").unwrap().unwrap();
    assert_eq!(id, in_p2);
    assert_eq!(&layer, &sample_project("p2").layers[1]);

    assert!(store.find_layer_id("p1", "missing").unwrap().is_none());
    assert!(store.find_layer_by_name("missing", "links").unwrap().is_none());
}

#[test]
fn test_documents_are_scoped_to_project() {
    let mut store = SqliteStore::in_memory().unwrap();
    let p1 = store.save_project(&sample_project("p1"), "user1").unwrap();
    let p2 = store.save_project(&sample_project("p2"), "user1").unwrap();

    let doc = Document::new("doc", "Hello, world!");
    let id = store.save_document(p1, &doc, "user1").unwrap();
    store.save_document(p2, &Document::new("doc", "Other text"), "user1").unwrap();
    store.save_document(p1, &Document::new("another", "More text"), "user1").unwrap();

    assert_eq!(store.find_document(p1, "doc").unwrap(), Some((id, doc)));
    assert_eq!(store.list_document_names(p1).unwrap(), vec!["doc", "another"]);
    assert_eq!(store.list_document_names(p2).unwrap(), vec!["doc"]);
    assert!(store.exists_document(p2, "doc").unwrap());
    assert!(!store.exists_document(p2, "another").unwrap());
}

#[test]
fn test_duplicate_document_is_conflict() {
    let mut store = SqliteStore::in_memory().unwrap();
    let p1 = store.save_project(&sample_project("p1"), "user1").unwrap();
    store.save_document(p1, &Document::new("doc", "a"), "user1").unwrap();

    let err = store
        .save_document(p1, &Document::new("doc", "b"), "user1")
        .unwrap_err();

    assert!(err.is_conflict());
}

#[test]
fn test_annotation_lifecycle() {
    let mut store = SqliteStore::in_memory().unwrap();
    let project_id = store.save_project(&sample_project("p1"), "user1").unwrap();
    let document_id = store
        .save_document(project_id, &Document::new("doc", "Alice met Bob"), "user1")
        .unwrap();
    let entities = store.find_layer_id("p1", "entities").unwrap().unwrap();
    let links = store.find_layer_id("p1", "links").unwrap().unwrap();

    let alice = Annotation::new(
        AnnotationId::new(),
        AnnotationValue::span(0, 5),
        vec![
            AnnotationAttribute::new("confidence", AttributeValue::Float { value: 0.75 }),
            AnnotationAttribute::new("kind", AttributeValue::Enum { value: "person".into() }),
        ],
    );
    let bob = Annotation::new(
        AnnotationId::new(),
        AnnotationValue::span(10, 13),
        vec![
            AnnotationAttribute::new("kind", AttributeValue::Enum { value: "person".into() }),
            AnnotationAttribute::new("confidence", AttributeValue::Float { value: 0.5 }),
        ],
    );
    let entity_scope = AnnotationScope {
        layer_id: entities,
        document_id,
        created_by: "user1",
    };

    let mut keys = Vec::new();
    for annotation in [&alice, &bob] {
        keys.push(
            store
                .save_annotation(&NewAnnotation {
                    annotation,
                    layer_id: entities,
                    document_id,
                    created_by: "user1",
                    role_targets: vec![],
                })
                .unwrap(),
        );
    }

    let met = Annotation::new(
        AnnotationId::new(),
        AnnotationValue::relation(vec![
            RelationAnnotationSpanRole::new("source", alice.id),
            RelationAnnotationSpanRole::new("target", bob.id),
        ]),
        vec![AnnotationAttribute::new("weight", AttributeValue::Int { value: -3 })],
    );
    store
        .save_annotation(&NewAnnotation {
            annotation: &met,
            layer_id: links,
            document_id,
            created_by: "user1",
            role_targets: keys.clone(),
        })
        .unwrap();

    // Reads keep persisted order and attribute order
    assert_eq!(
        store.find_all_annotations(&entity_scope).unwrap(),
        vec![alice.clone(), bob.clone()]
    );
    let link_scope = AnnotationScope {
        layer_id: links,
        ..entity_scope
    };
    assert_eq!(store.find_all_annotations(&link_scope).unwrap(), vec![met.clone()]);

    assert_eq!(store.find_annotation_key(alice.id, &entity_scope).unwrap(), Some(keys[0]));
    assert!(store.exists_annotation_in(bob.id, &entity_scope).unwrap());
    assert!(!store.exists_annotation_in(bob.id, &link_scope).unwrap());

    assert_eq!(store.find_all_annotations_referencing(bob.id).unwrap(), vec![met.id]);
    assert!(store.find_all_annotations_referencing(met.id).unwrap().is_empty());

    store.delete_annotation(met.id).unwrap();
    assert!(!store.exists_annotation(met.id).unwrap());
    assert!(store.find_all_annotations_referencing(bob.id).unwrap().is_empty());

    store.delete_annotation(bob.id).unwrap();
    assert_eq!(store.find_all_annotations(&entity_scope).unwrap(), vec![alice]);
}

#[test]
fn test_annotation_ownership_filters() {
    let mut store = SqliteStore::in_memory().unwrap();
    let project_id = store.save_project(&sample_project("p1"), "user1").unwrap();
    let document_id = store
        .save_document(project_id, &Document::new("doc", "Alice met Bob"), "user1")
        .unwrap();
    let entities = store.find_layer_id("p1", "entities").unwrap().unwrap();

    let annotation = Annotation::new(AnnotationId::new(), AnnotationValue::span(0, 5), vec![]);
    store
        .save_annotation(&NewAnnotation {
            annotation: &annotation,
            layer_id: entities,
            document_id,
            created_by: "user1",
            role_targets: vec![],
        })
        .unwrap();

    let other_scope = AnnotationScope {
        layer_id: entities,
        document_id,
        created_by: "user2",
    };
    assert!(store.exists_annotation(annotation.id).unwrap());
    assert!(store.exists_annotation_owned_by(annotation.id, "user1").unwrap());
    assert!(!store.exists_annotation_owned_by(annotation.id, "user2").unwrap());
    assert!(store.find_all_annotations(&other_scope).unwrap().is_empty());
    assert!(store.find_annotation_key(annotation.id, &other_scope).unwrap().is_none());
}

#[test]
fn test_duplicate_annotation_id_is_conflict() {
    let mut store = SqliteStore::in_memory().unwrap();
    let project_id = store.save_project(&sample_project("p1"), "user1").unwrap();
    let document_id = store
        .save_document(project_id, &Document::new("doc", "Alice met Bob"), "user1")
        .unwrap();
    let entities = store.find_layer_id("p1", "entities").unwrap().unwrap();
    let annotation = Annotation::new(AnnotationId::new(), AnnotationValue::span(0, 5), vec![]);

    let new = NewAnnotation {
        annotation: &annotation,
        layer_id: entities,
        document_id,
        created_by: "user1",
        role_targets: vec![],
    };
    store.save_annotation(&new).unwrap();
    let err = store
        .save_annotation(&NewAnnotation {
            created_by: "user2",
            ..new
        })
        .unwrap_err();

    assert!(err.is_conflict());
}

#[test]
fn test_transaction_commit_and_rollback() {
    let mut store = SqliteStore::in_memory().unwrap();

    store.begin().unwrap();
    store.save_project(&sample_project("kept"), "user1").unwrap();
    store.commit().unwrap();

    store.begin().unwrap();
    store.save_project(&sample_project("dropped"), "user1").unwrap();
    store.rollback().unwrap();

    assert_eq!(store.list_project_names().unwrap(), vec!["kept"]);
}
