use searchdoc::{
    Clause, Codec, DateField, Document, Envelope, Field, MatchPhraseQuery, RankFeatureField, Schema,
    ScaledFloatParams, SearchdocError, TextField, TextParams,
};

fn price() -> ScaledFloatParams {
    ScaledFloatParams { scaling_factor: 100.into(), ..Default::default() }
}

#[test]
fn duplicate_name_is_rejected() {
    let mut mapping: Document<Field> = Document::new();
    mapping.add_params("price", price()).expect("first add");
    let err = mapping.add("price", TextField::new()).unwrap_err();
    match &err {
        SearchdocError::FieldExists { name, kind } => {
            assert_eq!(name, "price");
            assert_eq!(*kind, "scaled_float");
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert!(err.to_string().contains("`price` already exists"));
    assert_eq!(mapping.get("price").map(Envelope::tag), Some("scaled_float"));
}

#[test]
fn assign_overwrites_and_returns_previous() {
    let mut mapping: Document<Field> = Document::new();
    assert_eq!(mapping.assign("price", TextField::new()).unwrap(), None);
    let previous = mapping.assign_params("price", price()).unwrap();
    assert!(matches!(previous, Some(Field::Text(_))));
    assert_eq!(mapping.get("price").map(Envelope::tag), Some("scaled_float"));
    assert_eq!(mapping.len(), 1);
}

#[test]
fn empty_name_is_rejected() {
    let mut mapping: Document<Field> = Document::new();
    assert!(matches!(
        mapping.add("", DateField::new()),
        Err(SearchdocError::NameRequired { kind: "date" })
    ));
    assert!(mapping.assign("", DateField::new()).is_err());
}

#[test]
fn set_all_is_atomic() {
    let mut mapping: Document<Field> = Document::new();
    mapping.add("created", DateField::new()).unwrap();
    let result = mapping.set_all(vec![
        ("title", Field::from(TextField::new())),
        ("title", Field::from(DateField::new())),
    ]);
    assert!(matches!(result, Err(SearchdocError::FieldExists { .. })));
    assert_eq!(mapping.names().collect::<Vec<_>>(), vec!["created"]);

    mapping
        .set_all(vec![("title", Field::from(TextField::new())), ("rank", Field::from(RankFeatureField::new()))])
        .unwrap();
    assert_eq!(mapping.names().collect::<Vec<_>>(), vec!["rank", "title"]);
}

#[test]
fn remove_contains_and_iterate() {
    let mut mapping: Document<Field> = Document::new();
    mapping.add("a", DateField::new()).unwrap();
    mapping.add("b", TextField::new()).unwrap();
    assert!(mapping.contains("a"));
    assert!(matches!(mapping.remove("a"), Some(Field::Date(_))));
    assert!(!mapping.contains("a"));
    assert_eq!(mapping.remove("a"), None);
    let tags: Vec<_> = mapping.iter().map(|(name, field)| (name.as_str(), field.tag())).collect();
    assert_eq!(tags, vec![("b", "text")]);
}

#[test]
fn clear_entry_resets_and_ignores_missing() {
    let mut mapping: Document<Field> = Document::new();
    mapping.add_params("title", TextParams { store: true.into(), ..Default::default() }).unwrap();
    assert!(!mapping.get("title").unwrap().is_empty());
    mapping.clear_entry("title");
    assert!(mapping.get("title").unwrap().is_empty());
    mapping.clear_entry("missing");
    assert_eq!(mapping.len(), 1);
}

#[test]
fn get_mut_edits_in_place() {
    let mut mapping: Document<Field> = Document::new();
    mapping.add("title", TextField::new()).unwrap();
    if let Some(Field::Text(text)) = mapping.get_mut("title") {
        text.analyzer.set_analyzer("english").unwrap();
    }
    let json = Codec::json().encode_document(&mapping).unwrap();
    assert_eq!(
        String::from_utf8(json).unwrap(),
        r#"{"title":{"analyzer":"english","type":"text"}}"#
    );
}

#[test]
fn unknown_kind_leaves_nothing_behind() {
    let json = br#"{"a":{"type":"text"},"b":{"type":"geo_shape"},"c":{"type":"date"}}"#;
    let err = Codec::json().decode_document::<Field>(json).unwrap_err();
    match err {
        SearchdocError::UnknownKind { name, tag } => {
            assert_eq!(name, "b");
            assert_eq!(tag, "geo_shape");
        }
        other => panic!("unexpected error {:?}", other),
    }

    let mut mapping: Document<Field> = Document::new();
    mapping.add("kept", DateField::new()).unwrap();
    if let Ok(decoded) = Codec::json().decode_document::<Field>(json) {
        mapping = decoded;
    }
    assert_eq!(mapping.names().collect::<Vec<_>>(), vec!["kept"]);
}

#[test]
fn schema_supplies_missing_types() {
    let json = br#"{"title":{"store":true},"price":{"type":"scaled_float","scaling_factor":10}}"#;
    let schema = Schema::new().with("title", "text");
    let mapping: Document<Field> = Codec::json().decode_document_with_schema(json, &schema).unwrap();
    assert!(matches!(mapping.get("title"), Some(Field::Text(t)) if t.store.store()));
    assert!(matches!(mapping.get("price"), Some(Field::ScaledFloat(f)) if f.scaling_factor.scaling_factor() == Some(10.0)));

    let missing = Codec::json().decode_document::<Field>(json).unwrap_err();
    assert!(matches!(missing, SearchdocError::MissingKind { ref name } if name == "title"));
}

#[test]
fn schema_disagreement_is_an_error() {
    let json = br#"{"title":{"type":"date"}}"#;
    let schema = Schema::new().with("title", "text");
    let err = Codec::json().decode_document_with_schema::<Field>(json, &schema).unwrap_err();
    assert!(matches!(
        err,
        SearchdocError::KindMismatch { ref expected, ref found, .. } if expected == "text" && found == "date"
    ));
}

#[test]
fn schema_reflects_entries() {
    let mut query: Document<Clause> = Document::new();
    let mut phrase = MatchPhraseQuery::new();
    phrase.query.set_query("quick brown fox").unwrap();
    query.add("body", phrase).unwrap();
    let schema = query.schema();
    assert_eq!(schema.kind("body"), Some("match_phrase"));
    assert_eq!(schema.len(), 1);
}

#[test]
fn unknown_param_is_rejected() {
    let json = br#"{"title":{"type":"text","scaling_factor":10}}"#;
    let err = Codec::json().decode_document::<Field>(json).unwrap_err();
    assert!(matches!(
        err,
        SearchdocError::UnknownParam { ref name, kind: "text", ref key } if name == "title" && key == "scaling_factor"
    ));
}

#[test]
fn bad_param_value_names_the_entry() {
    let json = br#"{"title":{"type":"text","norms":"often"}}"#;
    let err = Codec::json().decode_document::<Field>(json).unwrap_err();
    assert!(matches!(err, SearchdocError::Param { ref name, kind: "text", .. } if name == "title"));
    assert!(err.to_string().starts_with("Invalid text `title`: norms"), "{}", err);
}

#[test]
fn regexp_clause_cannot_be_decoded() {
    let json = br#"{"pattern":{"type":"regexp"}}"#;
    let err = Codec::json().decode_document::<Clause>(json).unwrap_err();
    assert!(matches!(err, SearchdocError::Unimplemented { kind: "regexp", operation: "decode" }));
}

#[test]
fn entries_must_be_objects() {
    let err = Codec::json().decode_document::<Field>(br#"{"title":"text"}"#).unwrap_err();
    assert!(matches!(err, SearchdocError::NotAnObject { found: "string", .. }));
}
