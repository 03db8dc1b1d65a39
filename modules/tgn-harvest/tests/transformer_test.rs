//! Record transformer: parsed RDF records → ordered PIT/relation batches,
//! and the transform stage over snapshot directories.

mod harness;

use harness::{config, config_with_parents, rdf, Record};
use tgn_common::{
    snapshot_file_name, Geometry, GraphObject, QueryKind, RootTerm, StageDirs, TgnError,
};
use tgn_graph::MemoryWriter;
use tgn_harvest::{parse_snapshot, transform, transform_element};

fn batch_for(record: Record) -> Vec<GraphObject> {
    let body = rdf(&[record.build()]);
    let elements = parse_snapshot(&body).unwrap();
    assert_eq!(elements.len(), 1);
    transform_element(&config(), &elements[0])
}

// ---------------------------------------------------------------------------
// Single records
// ---------------------------------------------------------------------------

#[test]
fn point_place_with_parent_emits_pit_then_lies_in() {
    let batch = batch_for(
        Record::new("uri:A", "inhabited places")
            .text("gvp:term", "Amsterdam")
            .text("wgs:long", "10.5")
            .text("wgs:lat", "20.25")
            .resource("gvp:broaderPreferred", "uri:B"),
    );

    assert_eq!(batch.len(), 2);

    let pit = batch[0].as_pit().expect("first object is the PIT");
    assert_eq!(pit.uri.as_deref(), Some("uri:A"));
    assert_eq!(pit.name.as_deref(), Some("Amsterdam"));
    assert_eq!(pit.pit_type, "hg:Place");
    assert_eq!(pit.data.type_term, "inhabited places");
    assert_eq!(pit.geometry, Some(Geometry::point(10.5, 20.25)));

    let edge = batch[1].as_relation().expect("second object is the edge");
    assert_eq!(edge.from.as_deref(), Some("uri:A"));
    assert_eq!(edge.to, "uri:B");
    assert_eq!(edge.relation, "hg:liesIn");
}

#[test]
fn broader_and_subject_emit_three_objects_in_order() {
    let batch = batch_for(
        Record::new("uri:T", "provinces")
            .resource("gvp:broaderPreferred", "uri:B")
            .resource("rdf:subject", "uri:P"),
    );

    assert_eq!(batch.len(), 3);
    assert!(batch[0].as_pit().is_some());
    assert_eq!(batch[1].as_relation().unwrap().relation, "hg:liesIn");
    let equivalence = batch[2].as_relation().unwrap();
    assert_eq!(equivalence.relation, "hg:sameHgConcept");
    assert_eq!(equivalence.from.as_deref(), Some("uri:T"));
    assert_eq!(equivalence.to, "uri:P");
}

#[test]
fn unmapped_type_emits_nothing() {
    let batch = batch_for(
        Record::new("uri:R", "rivers")
            .text("gvp:term", "Amstel")
            .resource("gvp:broaderPreferred", "uri:B"),
    );
    assert!(batch.is_empty());
}

#[test]
fn missing_type_term_emits_nothing() {
    let batch = batch_for(Record::default().resource("dct:source", "uri:A"));
    assert!(batch.is_empty());
}

#[test]
fn missing_latitude_means_no_geometry() {
    let batch = batch_for(Record::new("uri:A", "inhabited places").text("wgs:long", "4.9"));
    let pit = batch[0].as_pit().unwrap();
    assert_eq!(pit.geometry, None);

    let json = serde_json::to_value(&batch[0]).unwrap();
    assert!(json["obj"].get("geometry").is_none());
}

#[test]
fn malformed_coordinate_becomes_nan() {
    let batch = batch_for(
        Record::new("uri:A", "inhabited places")
            .text("wgs:long", "four point nine")
            .text("wgs:lat", "52.37"),
    );
    let Some(Geometry::Point { coordinates: [lon, lat] }) = batch[0].as_pit().unwrap().geometry
    else {
        panic!("geometry expected");
    };
    assert!(lon.is_nan());
    assert_eq!(lat, 52.37);
}

#[test]
fn comment_and_estimates_copied_verbatim() {
    let batch = batch_for(
        Record::new("uri:A", "inhabited places")
            .text("rdfs:comment", "Chartered &amp; walled")
            .text("gvp:estStart", "ca. 1200")
            .text("gvp:estEnd", "9999"),
    );
    let pit = batch[0].as_pit().unwrap();
    assert_eq!(pit.data.comment.as_deref(), Some("Chartered & walled"));
    assert_eq!(pit.valid_since.as_deref(), Some("ca. 1200"));
    assert_eq!(pit.valid_until.as_deref(), Some("9999"));
}

#[test]
fn missing_source_still_emits_pit_with_null_uri() {
    let batch = batch_for(
        Record::default()
            .text("tgn:typeTerm", "inhabited places")
            .resource("gvp:broaderPreferred", "uri:B"),
    );
    assert_eq!(batch.len(), 2);
    assert_eq!(batch[0].as_pit().unwrap().uri, None);
    assert_eq!(batch[1].as_relation().unwrap().from, None);
}

// ---------------------------------------------------------------------------
// Transform stage
// ---------------------------------------------------------------------------

fn write_snapshot(dir: &std::path::Path, kind: QueryKind, root: &str, body: &str) {
    let name = snapshot_file_name(kind, &RootTerm::new(root));
    std::fs::write(dir.join(name), body).unwrap();
}

fn write_all_empty(dir: &std::path::Path, roots: &[&str]) {
    for kind in QueryKind::ALL {
        for root in roots {
            write_snapshot(dir, kind, root, &rdf(&[]));
        }
    }
}

#[tokio::test]
async fn batches_follow_kind_root_and_document_order() {
    let previous = tempfile::tempdir().unwrap();
    let current = tempfile::tempdir().unwrap();
    let roots = ["tgn:7000003", "tgn:1000080"];
    write_all_empty(previous.path(), &roots);

    write_snapshot(
        previous.path(),
        QueryKind::Parents,
        "tgn:1000080",
        &rdf(&[Record::new("uri:parent", "provinces").build()]),
    );
    write_snapshot(
        previous.path(),
        QueryKind::Places,
        "tgn:7000003",
        &rdf(&[
            Record::new("uri:first", "inhabited places").build(),
            Record::new("uri:skipped", "rivers").build(),
            Record::new("uri:second", "inhabited places")
                .resource("gvp:broaderPreferred", "uri:parent")
                .build(),
        ]),
    );
    write_snapshot(
        previous.path(),
        QueryKind::Terms,
        "tgn:7000003",
        &rdf(&[Record::new("uri:term", "inhabited places")
            .resource("rdf:subject", "uri:first")
            .build()]),
    );

    let dirs = StageDirs::new(previous.path(), current.path());
    let writer = MemoryWriter::new();
    let stats = transform(&config_with_parents(&roots), &dirs, &writer)
        .await
        .unwrap();

    let uris: Vec<_> = writer
        .batches()
        .iter()
        .map(|b| b[0].as_pit().unwrap().uri.clone().unwrap())
        .collect();
    assert_eq!(uris, ["uri:parent", "uri:first", "uri:second", "uri:term"]);
    assert_eq!(writer.batches()[2].len(), 2);

    assert_eq!(stats.snapshots, 6);
    assert_eq!(stats.elements, 5);
    assert_eq!(stats.skipped, 1);
    assert_eq!(stats.pits, 4);
    assert_eq!(stats.relations, 2);
}

#[tokio::test]
async fn missing_snapshot_aborts_run() {
    let previous = tempfile::tempdir().unwrap();
    let current = tempfile::tempdir().unwrap();
    // Only the first root has a parents snapshot.
    write_snapshot(
        previous.path(),
        QueryKind::Parents,
        "tgn:7000003",
        &rdf(&[Record::new("uri:A", "inhabited places").build()]),
    );

    let dirs = StageDirs::new(previous.path(), current.path());
    let writer = MemoryWriter::new();
    let err = transform(&config(), &dirs, &writer).await.unwrap_err();

    match err {
        TgnError::Io { path, .. } => assert!(path.ends_with("tgn-parents.1000080.xml")),
        other => panic!("expected Io error, got {other}"),
    }
    assert_eq!(writer.batches().len(), 1);
}

#[tokio::test]
async fn malformed_snapshot_aborts_run() {
    let previous = tempfile::tempdir().unwrap();
    let current = tempfile::tempdir().unwrap();
    let roots = ["tgn:7000003"];
    write_all_empty(previous.path(), &roots);
    write_snapshot(
        previous.path(),
        QueryKind::Places,
        "tgn:7000003",
        "<rdf:RDF><rdf:Description><gvp:term>x</rdf:Description>",
    );
    write_snapshot(
        previous.path(),
        QueryKind::Terms,
        "tgn:7000003",
        &rdf(&[Record::new("uri:never", "inhabited places").build()]),
    );

    let dirs = StageDirs::new(previous.path(), current.path());
    let writer = MemoryWriter::new();
    let err = transform(&config_with_parents(&roots), &dirs, &writer)
        .await
        .unwrap_err();

    assert!(matches!(err, TgnError::Xml { .. }));
    assert!(writer.batches().is_empty());
}

#[tokio::test]
async fn write_failure_stops_remaining_elements() {
    let previous = tempfile::tempdir().unwrap();
    let current = tempfile::tempdir().unwrap();
    let roots = ["tgn:7000003"];
    write_all_empty(previous.path(), &roots);
    write_snapshot(
        previous.path(),
        QueryKind::Parents,
        "tgn:7000003",
        &rdf(&[
            Record::new("uri:1", "inhabited places").build(),
            Record::new("uri:2", "inhabited places").build(),
            Record::new("uri:3", "inhabited places").build(),
        ]),
    );

    let dirs = StageDirs::new(previous.path(), current.path());
    let writer = MemoryWriter::failing_on(1);
    let err = transform(&config_with_parents(&roots), &dirs, &writer)
        .await
        .unwrap_err();

    assert!(matches!(err, TgnError::Write(_)));
    assert_eq!(writer.attempts(), 2);
    assert_eq!(writer.batches().len(), 1);
}
