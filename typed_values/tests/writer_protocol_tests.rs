//! The open/closed protocol shared by every writer.

mod common;

use common::{int_tuple, pair};
use typed_values::writers::{ListWriter, MapWriter, RelationWriter, SetWriter, TupleWriter};
use typed_values::{
    DiagnosticReason, DiagnosticsCollector, FactError, Type, TypeStore, Value, ValueFactory,
    Writer,
};

/// Insert `values`, finalize twice, then check every mutation fails.
fn check_finalize_once<W: Writer>(mut writer: W, values: Vec<Value>) {
    let kind = writer.kind();
    writer.insert_all(values).unwrap();
    let size = writer.size();

    let first = writer.done().unwrap();
    let second = writer.done().unwrap();
    assert_eq!(first, second, "{} writer", kind);
    assert!(writer.is_closed());
    assert_eq!(writer.size(), size);

    let probe = Value::from(0);
    assert_eq!(
        writer.insert(probe.clone()),
        Err(FactError::FinalizedMutation { writer: kind })
    );
    assert_eq!(
        writer.insert_all([probe.clone()]),
        Err(FactError::FinalizedMutation { writer: kind })
    );
    assert_eq!(
        writer.delete(&probe),
        Err(FactError::FinalizedMutation { writer: kind })
    );
    assert_eq!(writer.done().unwrap(), first);
}

#[test]
fn test_every_writer_finalizes_once() {
    check_finalize_once(SetWriter::new(), vec![Value::from(1), Value::from(2)]);
    check_finalize_once(RelationWriter::new(), vec![int_tuple(&[1, 2])]);
    check_finalize_once(ListWriter::new(), vec![Value::from(1), Value::from(1)]);
    check_finalize_once(MapWriter::new(), vec![pair(1, "one")]);
    check_finalize_once(TupleWriter::new(), vec![Value::from(1), Value::from("a")]);
}

#[test]
fn test_failed_insert_keeps_prior_elements() {
    let mut writer = SetWriter::with_element_type(Type::Integer);
    writer.insert(Value::from(1)).unwrap();
    let err = writer
        .insert_all([Value::from(2), Value::from("three"), Value::from(4)])
        .unwrap_err();
    assert!(matches!(err, FactError::TypeMismatch { .. }), "got {:?}", err);
    // Elements before the failure stay; the rest were never reached.
    assert_eq!(writer.size(), 2);
}

#[test]
fn test_declared_non_tuple_set_never_yields_relation() {
    let store = TypeStore::new();
    let vf = ValueFactory::new(&store);

    let mut writer = vf.set_writer_of(Type::String);
    assert!(writer.insert(pair(1, "x")).is_err());
    writer.insert(vf.string("x")).unwrap();
    assert!(writer.done().unwrap().as_set().is_some());

    let mut writer = vf.set_writer_of(Type::tuple(vec![Type::Integer, Type::String]));
    writer.insert(pair(1, "x")).unwrap();
    assert!(writer.done().unwrap().as_relation().is_some());
}

#[test]
fn test_widening_is_reported_in_insertion_order() {
    DiagnosticsCollector::enable();
    DiagnosticsCollector::clear();

    let mut writer = ListWriter::new();
    writer
        .insert_all([Value::from(1), Value::from(2), Value::from("s")])
        .unwrap();
    let diagnostics = DiagnosticsCollector::take();
    DiagnosticsCollector::disable();

    let widenings: Vec<(String, String)> = diagnostics
        .iter()
        .filter_map(|d| match &d.reason {
            DiagnosticReason::ElementTypeWidened { from, to, .. } => Some((from.clone(), to.clone())),
            _ => None,
        })
        .collect();
    assert_eq!(
        widenings,
        vec![
            ("void".to_string(), "int".to_string()),
            ("int".to_string(), "value".to_string()),
        ]
    );
}

#[test]
fn test_inferred_relation_is_reported() {
    DiagnosticsCollector::enable();
    DiagnosticsCollector::clear();

    let mut writer = SetWriter::new();
    writer.insert(int_tuple(&[1, 2])).unwrap();
    writer.done().unwrap();
    let diagnostics = DiagnosticsCollector::take();
    DiagnosticsCollector::disable();

    assert!(diagnostics
        .iter()
        .any(|d| matches!(d.reason, DiagnosticReason::InferredRelation { .. })));
}

#[test]
fn test_finish_consumes_writer() {
    let mut writer = MapWriter::with_types(Type::String, Type::Integer);
    writer.put(Value::from("a"), Value::from(1)).unwrap();
    let map = writer.finish().unwrap();
    assert_eq!(map.get_type(), Type::map(Type::String, Type::Integer));
}
