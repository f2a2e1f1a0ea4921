use json_value::{JsonDecoder, JsonEncoder, JsonError, JsonValue, WriteOptions};

fn obj(fields: &[(&str, JsonValue)]) -> JsonValue {
    JsonValue::Object(
        fields
            .iter()
            .map(|(k, v)| ((*k).to_owned(), v.clone()))
            .collect(),
    )
}

#[test]
fn compact_formatting_matrix() {
    let cases: Vec<(JsonValue, &str)> = vec![
        (JsonValue::Number(1.0), "1"),
        (
            JsonValue::from(vec![JsonValue::from(1.0), JsonValue::from(2.0)]),
            "[1,2]",
        ),
        (
            obj(&[("id", JsonValue::from("deadbeef"))]),
            "{\"id\":\"deadbeef\"}",
        ),
        (JsonValue::Bool(true), "true"),
        (JsonValue::Bool(false), "false"),
        (JsonValue::Null, "null"),
        (JsonValue::from("deadbeef"), "\"deadbeef\""),
        (JsonValue::from(Vec::<JsonValue>::new()), "[]"),
        (obj(&[]), "{}"),
        (JsonValue::Number(-0.5), "-0.5"),
    ];
    let mut encoder = JsonEncoder::new();
    for (value, expected) in cases {
        let encoded = encoder.encode_string(&value).unwrap();
        assert_eq!(encoded, expected, "compact form of {value:?}");
    }
}

#[test]
fn encode_decode_roundtrip_matrix() {
    let values = vec![
        JsonValue::Null,
        JsonValue::Bool(true),
        JsonValue::Bool(false),
        JsonValue::Number(0.0),
        JsonValue::Number(-123.0),
        JsonValue::Number(1.1),
        JsonValue::Number(-12321.321123),
        JsonValue::from(""),
        JsonValue::from("abc123"),
        JsonValue::from("...................🎉....................."),
        JsonValue::from("esc \" \\ \n \t \u{0007}"),
        JsonValue::from(vec![
            JsonValue::Number(0.0),
            JsonValue::Number(1.32),
            JsonValue::from("str"),
            JsonValue::Bool(true),
            JsonValue::Null,
            JsonValue::from(vec![JsonValue::Number(1.0), JsonValue::Number(2.0)]),
        ]),
        obj(&[]),
        obj(&[("foo", JsonValue::from("bar"))]),
        obj(&[
            ("", JsonValue::Null),
            ("null", JsonValue::Bool(false)),
            ("true", JsonValue::Bool(true)),
            ("num", JsonValue::Number(123.0)),
            ("arr", JsonValue::from(vec![JsonValue::Number(3.0)])),
            ("obj", obj(&[("nested", JsonValue::from("v"))])),
        ]),
    ];

    let mut decoder = JsonDecoder::new();
    for value in values {
        for options in [
            WriteOptions::compact(),
            WriteOptions::pretty(),
            WriteOptions::sorted(),
            WriteOptions {
                pretty: true,
                sorted_keys: true,
            },
        ] {
            let encoded = JsonEncoder::with_options(options)
                .encode(&value)
                .unwrap_or_else(|e| panic!("encode failed for {value:?}: {e}"));
            let decoded = decoder
                .decode(&encoded)
                .unwrap_or_else(|e| panic!("decode failed for {value:?}: {e}"));
            assert_eq!(decoded, value, "round trip under {options:?}");
        }
    }
}

#[test]
fn decoder_normalizes_all_numbers_to_double() {
    let mut decoder = JsonDecoder::new();
    assert_eq!(decoder.decode(b"1").unwrap(), JsonValue::Number(1.0));
    assert_eq!(decoder.decode(b"1.0").unwrap(), JsonValue::Number(1.0));
    assert_eq!(decoder.decode(b"1e2").unwrap(), JsonValue::Number(100.0));
    assert_eq!(
        decoder.decode(b"-9007199254740992").unwrap(),
        JsonValue::Number(-9007199254740992.0)
    );
}

#[test]
fn decoder_error_matrix() {
    let mut decoder = JsonDecoder::new();
    let malformed: &[&[u8]] = &[
        b"{",
        b"[1,",
        b"{\"a\":}",
        b"tru",
        b"\"unterminated",
        b"",
        b"1 2",
        b"[1,2],",
        b"{'single': 1}",
        b"[1, 2,]",
        b"// comment\n1",
    ];
    for input in malformed {
        let result = decoder.decode(input);
        // Never a silent Null fallback.
        assert!(
            matches!(result, Err(JsonError::Malformed(_))),
            "expected malformed error for {:?}, got {result:?}",
            String::from_utf8_lossy(input)
        );
    }
}

#[test]
fn decoder_reports_error_location() {
    let mut decoder = JsonDecoder::new();
    let err = decoder.decode(b"{\"a\": nope}").unwrap_err();
    let message = err.to_string();
    assert!(message.contains("column"), "missing location in {message:?}");
}

#[test]
fn pretty_and_sorted_compose() {
    let value = obj(&[
        ("b", JsonValue::Number(2.0)),
        ("a", JsonValue::Number(1.0)),
    ]);
    let out = value.to_json_string_with(WriteOptions {
        pretty: true,
        sorted_keys: true,
    });
    assert_eq!(out, "{\n  \"a\": 1,\n  \"b\": 2\n}");
}

#[test]
fn unicode_passes_through_unescaped() {
    let mut decoder = JsonDecoder::new();
    let value = JsonValue::from("héllo ✨");
    let encoded = JsonEncoder::new().encode(&value).unwrap();
    assert_eq!(encoded, "\"héllo ✨\"".as_bytes());
    assert_eq!(decoder.decode(&encoded).unwrap(), value);
    // Escaped input decodes to the same string.
    assert_eq!(
        decoder.decode(b"\"h\\u00e9llo \\u2728\"").unwrap(),
        value
    );
}

#[test]
fn deep_nesting_roundtrip() {
    let mut value = JsonValue::Number(1.0);
    for _ in 0..64 {
        value = JsonValue::from(vec![value]);
    }
    let mut decoder = JsonDecoder::new();
    let encoded = JsonEncoder::new().encode(&value).unwrap();
    assert_eq!(decoder.decode(&encoded).unwrap(), value);
}
