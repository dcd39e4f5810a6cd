//! End-to-end transcoding through the public drivers

use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use coref_babel::{
    conllu_to_json, conllu_to_text, decode, encode, json_to_conllu, text_to_conllu,
    DecodeOptions, EncodeOptions, JsonFormat, MarkerStyle, TextFormat,
};
use coref_conllu::{load, parse_str, Document};
use proptest::prelude::*;
use rstest::rstest;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("coref-conllu")
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn skeleton(forms: &[&str]) -> Vec<Document> {
    let mut doc = Document::new("doc1");
    doc.push_sentence(forms);
    vec![doc]
}

fn encode_text(docs: &mut [Document], options: &EncodeOptions) -> String {
    let mut out = Vec::new();
    let format = TextFormat::new(options.marker_style);
    encode(docs, &format, options, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

fn decode_text(text: &str, skeleton: Vec<Document>, options: &DecodeOptions) -> Vec<Document> {
    let mut out = Vec::new();
    decode(text, skeleton, &TextFormat::default(), options, &mut out).unwrap();
    parse_str(&String::from_utf8(out).unwrap()).unwrap()
}

/// Mention spans per entity, ignoring entity ids.
fn clusters(doc: &Document) -> Vec<Vec<String>> {
    let mut clusters: Vec<Vec<String>> = doc
        .entities()
        .iter()
        .map(|e| e.mentions.iter().map(|m| m.span(doc)).collect())
        .collect();
    clusters.sort();
    clusters
}

#[test]
fn unterminated_entity_and_sequential_reencoding() {
    let mut docs = decode_text(
        "John|[e1 said Mary|[e2 left|e2] .\n",
        skeleton(&["John", "said", "Mary", "left", "."]),
        &DecodeOptions::default(),
    );
    let doc = &docs[0];
    assert_eq!(doc.entities().len(), 1);
    let mary = doc.entity("e2").unwrap();
    assert_eq!(mary.mentions[0].span(doc), "3-4");

    let options = EncodeOptions {
        sequential_ids: true,
        ..EncodeOptions::default()
    };
    assert_eq!(encode_text(&mut docs, &options), "John said Mary|[e1 left|e1] .\n");
}

#[test]
fn mention_with_a_relocated_empty_keeps_its_words_together() {
    let source = "# newdoc id = d1\n\
        1\ta\ta\tX\t_\t_\t0\troot\t0:root\tEntity=(e1--1\n\
        1.1\t_\t_\t_\t_\t_\t_\t_\t3:nsubj\t_\n\
        2\tb\tb\tX\t_\t_\t1\tdep\t1:dep\tEntity=e1)\n\
        3\tc\tc\tX\t_\t_\t1\tdep\t1:dep\t_\n\n";
    let options = EncodeOptions {
        zero_mentions: true,
        ..EncodeOptions::default()
    };
    let mut docs = parse_str(source).unwrap();
    assert_eq!(encode_text(&mut docs, &options), "a|[e1 b|e1] c ##\n");

    let mut docs = parse_str(source).unwrap();
    let mut out = Vec::new();
    encode(&mut docs, &JsonFormat, &options, &mut out).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(value[0]["clusters_token_offsets"], serde_json::json!([[[0, 1]]]));
}

#[test]
fn offsets_skip_unrendered_empty_tokens() {
    let source = "# newdoc id = d1\n\
        1\ta\ta\tX\t_\t_\t0\troot\t0:root\t_\n\
        1.1\t_\t_\t_\t_\t_\t_\t_\t2:nsubj\t_\n\
        2\tb\tb\tX\t_\t_\t1\tdep\t1:dep\tEntity=(e1--1)\n\n";
    let mut docs = parse_str(source).unwrap();
    let mut out = Vec::new();
    encode(&mut docs, &JsonFormat, &EncodeOptions::default(), &mut out).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(value[0]["tokens"], serde_json::json!(["a", "b"]));
    assert_eq!(value[0]["clusters_token_offsets"], serde_json::json!([[[1, 1]]]));
}

#[rstest]
#[case::outer_first(["e1", "e2"])]
#[case::inner_first(["e2", "e1"])]
fn tag_nesting_does_not_depend_on_creation_order(#[case] order: [&str; 2]) {
    let mut docs = skeleton(&["a", "x", "c"]);
    let doc = &mut docs[0];
    let ids = doc.token_ids().to_vec();
    for eid in order {
        let entity = doc.create_entity(eid).unwrap();
        let span = if eid == "e1" { &ids[..] } else { &ids[1..2] };
        doc.create_mention(entity, span).unwrap();
    }
    let options = EncodeOptions {
        marker_style: MarkerStyle::Tags,
        ..EncodeOptions::default()
    };
    assert_eq!(encode_text(&mut docs, &options), "<e1>a <e2>x</e2> c</e1>\n");
}

#[test]
fn offsets_encode_and_decode_exactly() {
    let mut docs = skeleton(&["The", "old", "man", "slept"]);
    let ids = docs[0].token_ids().to_vec();
    let entity = docs[0].create_entity("c1").unwrap();
    docs[0].create_mention(entity, &ids[1..3]).unwrap();

    let mut out = Vec::new();
    encode(&mut docs, &JsonFormat, &EncodeOptions::default(), &mut out).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(value[0]["clusters_token_offsets"], serde_json::json!([[[1, 2]]]));
    assert_eq!(value[0]["clusters_text_mentions"], serde_json::json!([["old man"]]));

    let json = String::from_utf8(out).unwrap();
    let mut written = Vec::new();
    decode(
        &json,
        skeleton(&["The", "old", "man", "slept"]),
        &JsonFormat,
        &DecodeOptions::default(),
        &mut written,
    )
    .unwrap();
    let decoded = parse_str(&String::from_utf8(written).unwrap()).unwrap();
    let entity = &decoded[0].entities()[0];
    assert_eq!(entity.eid, "e1");
    assert_eq!(entity.mentions.len(), 1);
    assert_eq!(entity.mentions[0].span(&decoded[0]), "2-3");
}

#[test]
fn fixture_renders_to_text() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("sample.txt");
    let options = EncodeOptions {
        zero_mentions: true,
        sequential_ids: true,
        ..EncodeOptions::default()
    };
    let count = conllu_to_text(&fixture_path("sample.conllu"), &output, &options).unwrap();
    assert_eq!(count, 2);
    insta::assert_snapshot!(fs::read_to_string(&output).unwrap().trim_end(), @r###"
    John|[e1] said he|[e1] would come . Mary|[e2] met his|[e1],[e3 old friend|e3] and left ##|[e2] .
    The|[e1 board|e1] , however , met .
    "###);
}

#[test]
fn text_round_trip_through_the_skeleton() {
    let dir = tempfile::tempdir().unwrap();
    let text = dir.path().join("sample.txt");
    let conllu = dir.path().join("decoded.conllu");
    let skeleton = fixture_path("sample.conllu");
    let options = EncodeOptions {
        zero_mentions: true,
        sequential_ids: true,
        ..EncodeOptions::default()
    };
    conllu_to_text(&skeleton, &text, &options).unwrap();
    let decode_options = DecodeOptions {
        use_gold_empty_nodes: true,
    };
    text_to_conllu(&text, &skeleton, &conllu, &TextFormat::default(), &decode_options).unwrap();

    let mut original = load(&skeleton).unwrap();
    original[0].shift_empty_tokens();
    let decoded = load(&conllu).unwrap();
    assert_eq!(clusters(&decoded[0]), clusters(&original[0]));
    // the discontinuous mention comes back reduced
    assert_eq!(clusters(&decoded[1]), vec![vec!["1-2".to_string()]]);
}

#[test]
fn json_round_trip_rebuilds_empty_tokens() {
    let dir = tempfile::tempdir().unwrap();
    let json = dir.path().join("sample.json");
    let conllu = dir.path().join("decoded.conllu");
    let skeleton = fixture_path("sample.conllu");
    let options = EncodeOptions {
        zero_mentions: true,
        ..EncodeOptions::default()
    };
    conllu_to_json(&skeleton, &json, &options).unwrap();
    json_to_conllu(&json, &skeleton, &conllu, &DecodeOptions::default()).unwrap();

    let decoded = load(&conllu).unwrap();
    let ids: Vec<&str> = decoded[0].entities().iter().map(|e| e.eid.as_str()).collect();
    assert_eq!(ids, vec!["e1", "e2", "e3"]);
    // rebuilt right after "left", as a fresh empty token
    let zero = decoded[0].empty_ids()[0];
    assert_eq!(decoded[0][zero].ord.to_string(), "7.1");
    assert_eq!(decoded[0][zero].form, "_");

    let mut original = load(&skeleton).unwrap();
    original[0].shift_empty_tokens();
    assert_eq!(clusters(&decoded[0]), clusters(&original[0]));
}

fn mentions_strategy() -> impl Strategy<Value = (usize, Vec<(usize, usize, usize)>)> {
    (1usize..10).prop_flat_map(|len| {
        let mention = (0..len, 0..len, 0usize..4).prop_map(|(a, b, e)| (a.min(b), a.max(b), e));
        (Just(len), prop::collection::vec(mention, 0..6))
    })
}

/// Two mentions of one entity that overlap without nesting cannot be told apart by a
/// per-entity stack.
fn crossing(mentions: &[(usize, usize, usize)]) -> bool {
    mentions.iter().any(|&(s1, e1, a)| {
        mentions
            .iter()
            .any(|&(s2, e2, b)| a == b && s1 < s2 && s2 < e1 && e1 < e2)
    })
}

proptest! {
    #[test]
    fn bracket_text_round_trips_contiguous_mentions((len, mentions) in mentions_strategy()) {
        prop_assume!(!crossing(&mentions));
        let forms: Vec<String> = (0..len).map(|i| format!("w{i}")).collect();
        let forms: Vec<&str> = forms.iter().map(String::as_str).collect();

        let mut docs = skeleton(&forms);
        let ids = docs[0].token_ids().to_vec();
        let mut expected = BTreeSet::new();
        for (start, end, entity) in &mentions {
            let eid = format!("e{}", entity + 1);
            let index = match docs[0].entity_index(&eid) {
                Some(index) => index,
                None => docs[0].create_entity(&eid).unwrap(),
            };
            docs[0].create_mention(index, &ids[*start..=*end]).unwrap();
            expected.insert((eid, *start, *end));
        }

        let text = encode_text(&mut docs, &EncodeOptions::default());
        let decoded = decode_text(&text, skeleton(&forms), &DecodeOptions::default());
        let doc = &decoded[0];
        let mut found = BTreeSet::new();
        for entity in doc.entities() {
            for mention in &entity.mentions {
                let tokens = mention.tokens();
                let start = doc.position(tokens[0]).unwrap();
                let end = doc.position(tokens[tokens.len() - 1]).unwrap();
                found.insert((entity.eid.clone(), start, end));
            }
        }
        prop_assert_eq!(found, expected);
    }
}
