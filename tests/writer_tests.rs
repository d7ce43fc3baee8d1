use chatdown::{parse, serialize, Options, Parser, StyledRun, WriteError, Writer};

/// Compile, serialize, recompile: the two trees must render identically.
fn round_trip(markup: &str) {
    let first = parse(markup).unwrap();
    let serialized = serialize(&first).unwrap();
    let second = parse(&serialized).unwrap();
    assert_eq!(
        second.flatten(),
        first.flatten(),
        "markup {markup:?} serialized as {serialized:?}"
    );
}

// ============ Exact canonical forms ============

#[test]
fn canonical_markup_survives_byte_for_byte() {
    for markup in [
        "plain text",
        "&green&hello **bold** world",
        "&gold&gilded",
        "**bold** then plain",
    ] {
        let run = parse(markup).unwrap();
        assert_eq!(serialize(&run).unwrap(), markup);
    }
}

// ============ Render-equivalent round trips ============

#[test]
fn plain_and_escaped_text() {
    round_trip("just words");
    round_trip(r"specials \[a\] \(b\) \{c\} \&d");
    round_trip(r"doubled \*\* stars");
}

#[test]
fn legacy_code_sequences() {
    round_trip("&6gold &l&obold italic &rback to plain");
    round_trip("§c&lnative marker");
    round_trip("&x00ff88raw hex");
}

#[test]
fn extended_tokens() {
    round_trip("&dark_purple&regal");
    round_trip("&#abcdef&hexed");
    round_trip("&gold,bold&both at once");
}

#[test]
fn inline_spans() {
    round_trip("a **b** c __d__ e");
    round_trip("**bold __and under__ tail**");
    round_trip("~~strike~~ and ??magic??");
    round_trip("**&cred inside** outside");
}

#[test]
fn gradients_and_rainbows() {
    round_trip("&#f00,#00f&gradient text");
    round_trip("&#f00,#0f0,#00f&three anchor gradient");
    round_trip("&rainbow&colorful");
    round_trip("&rainbow:45&shifted");
    round_trip("**&#f00,#00f&decorated gradient**");
}

#[test]
fn events() {
    round_trip("[styled](red,bold)");
    round_trip("[click](run_command=/spawn)");
    round_trip("[both](gold run_command=/help hover=the help menu)");
    round_trip("[outer [inner](green) end](aqua)");
    round_trip("[entity](show_entity={1-2-3:pig Porky})");
    round_trip("[item](show_item={minecraft:stone*16}) held");
    round_trip("[item](show_item=stone {display:\\{fancy\\}} extra)");
    round_trip("[inserted](insert={some text})");
    round_trip("[fancy](font=uniform)");
}

#[test]
fn detected_urls() {
    round_trip("visit example.com today");
    round_trip("docs at https://example.org/guide now");
}

#[test]
fn mixed_documents() {
    round_trip("&6Welcome! **Read the [rules](blue suggest_command=/rules)** at example.com");
    round_trip("&#f00,#00f&grad **bold &rainbow&rainbow** &rplain [e](hover=tip)");
}

#[test]
fn custom_writer_marker() {
    let parser = Parser::with_options(Options::default().marker('!'));
    let first = parser.parse("!gold!hi **there**").unwrap();
    let serialized = Writer::new().marker('!').write(&first).unwrap();
    let second = parser.parse(&serialized).unwrap();
    assert_eq!(second.flatten(), first.flatten());
}

// ============ Unsupported shapes ============

#[test]
fn text_with_children_is_rejected() {
    let run = StyledRun {
        text: "both".to_string(),
        children: vec![StyledRun::leaf("child")],
        ..Default::default()
    };
    assert!(matches!(serialize(&run), Err(WriteError::UnsupportedRun(_))));
}

#[test]
fn hand_built_trees_serialize_too() {
    // Trees assembled by hand, not by the compiler, still round-trip as
    // long as they keep text at the leaves.
    let tree = StyledRun::branch(vec![
        StyledRun::leaf("a "),
        StyledRun {
            text: "b".to_string(),
            decorations: chatdown::DecorationSet {
                bold: true,
                underline: true,
                ..Default::default()
            },
            ..Default::default()
        },
        StyledRun::leaf(" c"),
    ]);
    let serialized = serialize(&tree).unwrap();
    assert_eq!(parse(&serialized).unwrap().flatten(), tree.flatten());
}
