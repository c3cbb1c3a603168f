use chainql::{EvalError, Link, ParseError, Value, parse_query};
use serde::Serialize;
use std::collections::HashMap;
use time::macros::datetime;

fn record(pairs: &[(&str, Value)]) -> HashMap<String, Value> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

struct Case {
    name: &'static str,
    query: &'static str,
    record: Vec<(&'static str, Value)>,
    want: bool,
}

#[test]
fn check_map_table() {
    let title = || ("title", Value::from("foo bar"));
    let cases = vec![
        Case {
            name: "case-insensitive string",
            query: r#"title == "foo BAR""#,
            record: vec![title()],
            want: true,
        },
        Case {
            name: "not with disabled=false",
            query: r#"title == "foo BAR" && not disabled == t"#,
            record: vec![title(), ("disabled", Value::from(false))],
            want: true,
        },
        Case {
            name: "not with disabled=true",
            query: r#"title == "foo BAR" && not disabled == t"#,
            record: vec![title(), ("disabled", Value::from(true))],
            want: false,
        },
        Case {
            name: "age above",
            query: r#"title == "foo BAR" && age > 42"#,
            record: vec![title(), ("age", Value::from(43))],
            want: true,
        },
        Case {
            name: "age below",
            query: r#"title == "foo BAR" && age > 42"#,
            record: vec![title(), ("age", Value::from(39))],
            want: false,
        },
        Case {
            name: "date after",
            query: r#"title == "foo BAR" && date > '2008-01-02'"#,
            record: vec![title(), ("date", Value::from(datetime!(2010-01-01 0:00 UTC)))],
            want: true,
        },
        Case {
            name: "date before",
            query: r#"title == "foo BAR" && date > '2008-01-02'"#,
            record: vec![title(), ("date", Value::from(datetime!(2007-01-01 0:00 UTC)))],
            want: false,
        },
        Case {
            name: "or keyword",
            query: r#"title == nope OR age <= 39"#,
            record: vec![title(), ("age", Value::from(39))],
            want: true,
        },
    ];

    for case in cases {
        let mut chain = parse_query(case.query).unwrap();
        chain.add_date_format("[year]-[month]-[day]").unwrap();
        let got = chain.check_map(&record(&case.record)).unwrap();
        assert_eq!(got, case.want, "{}", case.name);
    }
}

#[test]
fn check_struct_fields() {
    #[derive(Serialize)]
    struct TestStruct {
        #[serde(rename = "Title")]
        title: String,
        #[serde(rename = "Age")]
        age: i32,
        created: String,
    }

    let s = TestStruct {
        title: "foo bar".into(),
        age: 42,
        created: "2009-06-30".into(),
    };

    let mut chain = parse_query(r#"Title == "foo bar" & Age < 43 & created >= '2009-06-30'"#).unwrap();
    chain.add_date_format("[year]-[month]-[day]").unwrap();
    assert!(chain.check_struct(&s).unwrap());

    let chain = parse_query("title == x").unwrap();
    assert!(matches!(
        chain.check_struct(&s),
        Err(EvalError::FieldNotFound(_))
    ));
}

#[test]
fn link_count_matches_clause_count() {
    let chain = parse_query("a == 1 & b == 2 || c == 3 and d == 4").unwrap();
    assert_eq!(chain.len(), 4);
    let links: Vec<Link> = chain.conditions().iter().map(|c| c.link).collect();
    assert_eq!(links, vec![Link::And, Link::Or, Link::And, Link::Eof]);
}

#[test]
fn triple_equals_is_a_parse_error() {
    assert!(matches!(
        parse_query(r#"title === "foo BAR""#),
        Err(ParseError::UnsupportedOperator { .. })
    ));
}

#[test]
fn non_numeric_field_is_an_error() {
    let chain = parse_query("age > 42").unwrap();
    let err = chain
        .check_map(&record(&[("age", Value::from("forty"))]))
        .unwrap_err();
    assert!(matches!(err, EvalError::InvalidValue { .. }));
}

#[test]
fn parsed_chain_is_shareable_across_threads() {
    let mut chain = parse_query("n >= 10").unwrap();
    chain.add_date_format("[year]-[month]-[day]").unwrap();
    let chain = std::sync::Arc::new(chain);

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let chain = chain.clone();
            std::thread::spawn(move || {
                chain
                    .check_map(&record(&[("n", Value::from(i * 5))]))
                    .unwrap()
            })
        })
        .collect();
    let results: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results, vec![false, false, true, true]);
}
