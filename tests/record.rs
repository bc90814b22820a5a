use slashcsv::record::{FieldDescriptor, FieldKind, FieldValue, Record};
use slashcsv::{CsvError, CsvReader, CsvWriter, csv_enum, csv_record};

csv_enum! {
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub enum Level {
        #[default]
        Unknown,
        Low,
        High,
    }
}

csv_record! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Sample {
        pub id: u32,
        pub user_name: String,
        pub ip_address: Option<String>,
        pub level: Level,
        pub score: f64,
        pub active: bool,
        pub grade: char,
    }
}

#[test]
fn macro_derives_pascal_case_names_in_order() {
    let names: Vec<_> = Sample::fields().iter().map(FieldDescriptor::name).collect();
    assert_eq!(
        names,
        ["Id", "UserName", "IpAddress", "Level", "Score", "Active", "Grade"]
    );
}

#[test]
fn field_table_is_built_once() {
    assert!(std::ptr::eq(Sample::fields(), Sample::fields()));
}

#[test]
fn field_kinds_follow_value_types() {
    assert_eq!(Sample::field("Level").map(|f| f.kind()), Some(FieldKind::Enumeration));
    assert_eq!(Sample::field("Id").map(|f| f.kind()), Some(FieldKind::Convertible));
    assert!(Sample::field("level").is_none());
}

#[test]
fn descriptors_get_and_set() {
    let mut s = Sample::default();
    let Some(score) = Sample::field("Score") else {
        panic!("Score field missing");
    };
    assert!(score.set(&mut s, " 2.5 "));
    assert_eq!(score.get(&s), "2.5");
    assert!(!score.set(&mut s, "abc"));
    assert_eq!(s.score, 2.5);
}

#[test]
fn enum_names_are_case_sensitive() {
    assert_eq!(Level::try_convert("High"), Some(Level::High));
    assert_eq!(Level::try_convert("high"), None);
    assert_eq!(Level::try_convert(""), None);
    assert_eq!(Level::Low.to_text(), "Low");
}

#[test]
fn primitive_conversions() {
    assert_eq!(u8::try_convert("255"), Some(255));
    assert_eq!(u8::try_convert("256"), None);
    assert_eq!(i64::try_convert(" -7 "), Some(-7));
    assert_eq!(bool::try_convert("True"), Some(true));
    assert_eq!(bool::try_convert("yes"), None);
    assert_eq!(char::try_convert("x"), Some('x'));
    assert_eq!(char::try_convert("xy"), None);
    assert_eq!(String::try_convert(" keep "), Some(" keep ".to_string()));
}

#[test]
fn option_maps_blank_to_none() {
    assert_eq!(Option::<u32>::try_convert(""), Some(None));
    assert_eq!(Option::<u32>::try_convert("4"), Some(Some(4)));
    assert_eq!(Option::<u32>::try_convert("four"), None);
    assert_eq!(Some(4u32).to_text(), "4");
    assert_eq!(None::<u32>.to_text(), "");
    assert_eq!(Option::<Level>::kind(), FieldKind::Enumeration);
}

/// A field type that is written but never read back.
#[derive(Debug, Clone, Default, PartialEq)]
struct Tags(Vec<String>);

impl FieldValue for Tags {
    fn kind() -> FieldKind {
        FieldKind::Opaque
    }

    fn try_convert(_text: &str) -> Option<Self> {
        None
    }

    fn to_text(&self) -> String {
        self.0.join(";")
    }
}

#[derive(Debug, Default)]
struct Tagged {
    name: String,
    tags: Tags,
}

impl Record for Tagged {
    fn fields() -> &'static [FieldDescriptor<Self>] {
        static FIELDS: std::sync::OnceLock<Vec<FieldDescriptor<Tagged>>> =
            std::sync::OnceLock::new();
        FIELDS.get_or_init(|| {
            vec![
                FieldDescriptor::<Tagged>::new("name", |r| &r.name, |r| &mut r.name),
                FieldDescriptor::<Tagged>::new("tags", |r| &r.tags, |r| &mut r.tags),
            ]
        })
    }
}

#[test]
fn hand_written_record_with_opaque_field() -> anyhow::Result<()> {
    let mut out = Vec::new();
    let mut writer = CsvWriter::<Tagged, _>::from_writer(&mut out)?;
    writer.write(&Tagged {
        name: "a".into(),
        tags: Tags(vec!["x".into(), "y".into()]),
    })?;
    drop(writer);
    assert_eq!(String::from_utf8(out.clone())?, "name,tags\na,x;y\n");

    let mut reader = CsvReader::<Tagged, _>::from_reader(out.as_slice())?;
    assert!(reader.read()?);
    assert_eq!(reader.current()?.name, "a");
    assert_eq!(reader.current()?.tags, Tags::default());
    Ok(())
}

#[derive(Debug, Default)]
struct Empty;

impl Record for Empty {
    fn fields() -> &'static [FieldDescriptor<Self>] {
        &[]
    }
}

#[derive(Debug, Default)]
struct Duplicated {
    a: u32,
}

impl Record for Duplicated {
    fn fields() -> &'static [FieldDescriptor<Self>] {
        static FIELDS: std::sync::OnceLock<Vec<FieldDescriptor<Duplicated>>> =
            std::sync::OnceLock::new();
        FIELDS.get_or_init(|| {
            vec![
                FieldDescriptor::<Duplicated>::new("A", |r| &r.a, |r| &mut r.a),
                FieldDescriptor::<Duplicated>::new("A", |r| &r.a, |r| &mut r.a),
            ]
        })
    }
}

#[test]
fn model_without_fields_is_rejected() {
    let err = CsvReader::<Empty, _>::from_reader(&b"x\n"[..]).err().expect("must fail");
    assert!(matches!(
        err.downcast_ref::<CsvError>(),
        Some(CsvError::InvalidModel { .. })
    ));
    let err = CsvWriter::<Empty, _>::from_writer(Vec::new()).err().expect("must fail");
    assert!(matches!(
        err.downcast_ref::<CsvError>(),
        Some(CsvError::InvalidModel { .. })
    ));
}

#[test]
fn model_with_duplicate_names_is_rejected() {
    let err = CsvReader::<Duplicated, _>::from_reader(&b"A\n1\n"[..])
        .err()
        .expect("must fail");
    match err.downcast_ref::<CsvError>() {
        Some(CsvError::InvalidModel { reason, .. }) => assert!(reason.contains("'A'")),
        other => panic!("unexpected error: {other:?}"),
    }
}
