use loretta::{parse, GreenElement, LuaDialect, ParserOptions};

#[test]
fn keyword_vs_identifier_produces_no_diagnostics() {
    let output = parse("local x = 1", ParserOptions::default());
    assert!(!output.diagnostics_present, "{:?}", output.diagnostics());
}

#[test]
fn addition_binds_tighter_than_nothing_but_looser_than_multiplication() {
    let output = parse("return 1 + 2 * 3\n", ParserOptions::default());
    assert!(!output.diagnostics_present, "{:?}", output.diagnostics());
    let root = output.root();
    let outer = root
        .descendants()
        .find(|n| n.kind() == loretta_syntax::SyntaxKind::BinaryExpression)
        .expect("at least one binary expression");
    let right = outer.get_child(2).and_then(|e| e.into_node()).expect("right operand is a node");
    assert_eq!(right.kind(), loretta_syntax::SyntaxKind::BinaryExpression, "multiplication nests under addition's right operand");
}

#[test]
fn exponentiation_is_right_associative() {
    let output = parse("return 2 ^ 3 ^ 2\n", ParserOptions::default());
    assert!(!output.diagnostics_present, "{:?}", output.diagnostics());
    let root = output.root();
    let outer = root
        .descendants()
        .find(|n| n.kind() == loretta_syntax::SyntaxKind::BinaryExpression)
        .expect("at least one binary expression");
    let right = outer.get_child(2).and_then(|e| e.into_node()).expect("right operand is a node");
    assert_eq!(right.kind(), loretta_syntax::SyntaxKind::BinaryExpression, "right-associative power nests on the right");
}

#[test]
fn token_text_concatenation_equals_source_text() {
    let source = "local t = { 1, 2, x = 3, [k] = 4 }\nprint(t.x)\n";
    let output = parse(source, ParserOptions::default());
    let root = output.root();
    let mut reconstructed = String::new();
    for token in root.descendants().flat_map(|n| n.child_nodes_and_tokens().filter_map(|e| e.as_token().cloned())) {
        reconstructed.push_str(token.text());
    }
    // Leaf-token text alone (no trivia) must still be a subsequence of the
    // full reconstruction; the full reconstruction (with trivia) must match
    // the source exactly.
    assert_eq!(output.to_full_string(), source);
    assert!(source.contains(&reconstructed) || reconstructed.is_empty(), "token text drifted from source: {reconstructed:?}");
}

#[test]
fn reconstructed_text_reparses_to_an_identical_diagnostic_state() {
    let source = "for k, v in pairs(t) do\n  if v then\n    print(k, v)\n  end\nend\n";
    let first = parse(source, ParserOptions::default());
    let reconstructed = first.to_full_string();
    let second = parse(&reconstructed, ParserOptions::default());
    assert_eq!(reconstructed, source);
    assert_eq!(first.diagnostics_present, second.diagnostics_present);
}

#[test]
fn glua_continue_is_rejected_outside_its_dialect_but_accepted_inside_it() {
    let source = "while true do\n  continue\nend\n";
    let lua54 = parse(source, ParserOptions { dialect: LuaDialect::lua54(), ..ParserOptions::default() });
    assert!(lua54.diagnostics_present, "continue is not a Lua 5.4 statement");

    let glua = parse(source, ParserOptions { dialect: LuaDialect::glua(), ..ParserOptions::default() });
    assert!(!glua.diagnostics_present, "{:?}", glua.diagnostics());
}

#[test]
fn green_tree_survives_a_binary_serialize_round_trip() {
    let output = parse("local x <const> = 1\n", ParserOptions { dialect: LuaDialect::lua54(), ..ParserOptions::default() });
    let mut bytes = Vec::new();
    loretta::serialize_to(&GreenElement::Node(output.green.clone()), &mut bytes).expect("serialize");
    let restored = loretta::deserialize_from(&mut bytes.as_slice()).expect("deserialize");
    assert_eq!(restored.kind(), output.green.kind());
}
