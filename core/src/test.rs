//! Tests for the Hashline Templating Engine.
// Copyright (C) 2024  Frankie Baffa
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use {
    crate::{
        block::Literal,
        compare::{
            equals,
            ordering,
        },
        config::{
            EngineConfig,
            Interpolation,
        },
        context::{
            read_context,
            Context,
            Segment,
            VarPath,
        },
        engine::Engine,
        error::{
            Error,
            Result,
        },
        file::{
            read_file,
            Coordinate,
        },
        interpreter::ForVarKey,
        lexer::tokenize,
        token::TokenKind,
        value::{
            is_blank,
            is_truthy,
            iterate,
        },
    },
    rstest::rstest,
    serde_json::{
        json,
        Value as JsonValue,
    },
    std::cmp::Ordering,
};

fn context(value: JsonValue) -> Context {
    match value {
        JsonValue::Object(map) => map,
        other => panic!("context must be an object, got {other}"),
    }
}

fn render(template: &str, ctx: JsonValue) -> Result<String> {
    Engine::new().evaluate(template, &context(ctx))
}

fn kinds(template: &str) -> Vec<TokenKind> {
    tokenize(template).iter().map(|t| t.kind()).collect()
}

#[test]
fn lex_directive_line() {
    assert_eq!(
        vec![
            TokenKind::If,
            TokenKind::Colon,
            TokenKind::Identifier,
            TokenKind::Dot,
            TokenKind::Identifier,
            TokenKind::LeftBracket,
            TokenKind::Number,
            TokenKind::RightBracket,
            TokenKind::GtEq,
            TokenKind::Number,
            TokenKind::And,
            TokenKind::String,
            TokenKind::Newline,
            TokenKind::Eof,
        ],
        kinds("#if :a.b[0] >= -1.5 && 'x\\'y'"),
    );

    let tokens = tokenize("#if :a.b[0] >= -1.5 && 'x\\'y'");
    assert_eq!("-1.5", tokens[9].literal());
    assert_eq!("x'y", tokens[11].literal());
}

#[test]
fn lex_plain_lines() {
    assert_eq!(
        vec![
            TokenKind::PlainText,
            TokenKind::EndIf,
            TokenKind::Newline,
            TokenKind::PlainText,
            TokenKind::Eof,
        ],
        kinds("text\n#fi\n"),
    );

    // a sigil not followed by a letter is plain text
    assert_eq!(
        vec![
            TokenKind::PlainText,
            TokenKind::PlainText,
            TokenKind::PlainText,
            TokenKind::Eof,
        ],
        kinds("# Heading\n#1 first\n## more"),
    );
}

#[test]
fn lex_operators() {
    assert_eq!(
        vec![
            TokenKind::If,
            TokenKind::Eq,
            TokenKind::Eq,
            TokenKind::NotEq,
            TokenKind::NotEq,
            TokenKind::Find,
            TokenKind::NotFind,
            TokenKind::Match,
            TokenKind::NotMatch,
            TokenKind::Not,
            TokenKind::Or,
            TokenKind::PipeSymbol,
            TokenKind::Lt,
            TokenKind::LtEq,
            TokenKind::Newline,
            TokenKind::Eof,
        ],
        kinds("#if == = != <> ~ !~ @ !@ ! || | < <="),
    );
}

#[test]
fn lex_check_throw_and_unknown() {
    assert_eq!(
        vec![
            TokenKind::Check,
            TokenKind::Colon,
            TokenKind::Identifier,
            TokenKind::CheckThrow,
            TokenKind::String,
            TokenKind::Newline,
            TokenKind::Eof,
        ],
        kinds("#check :a throw 'm'"),
    );

    assert_eq!(
        vec![ TokenKind::Unknown, TokenKind::Newline, TokenKind::Eof, ],
        kinds("#iffy"),
    );
}

#[test]
fn lex_unicode_indent_is_plain_text() {
    assert_eq!(
        vec![
            TokenKind::PlainText,
            TokenKind::PlainText,
            TokenKind::If,
            TokenKind::Colon,
            TokenKind::Identifier,
            TokenKind::Newline,
            TokenKind::Eof,
        ],
        kinds("\u{a0}#if true\n\u{3000}#fi\n \t#if :x"),
    );

    let template = "\u{a0}#if true\nx\n\u{3000}#fi";
    assert_eq!(template, render(template, json!({})).unwrap());
}

#[test]
fn lex_positions() {
    let tokens = tokenize("text\n  #for x of :xs");

    let for_token = &tokens[1];
    assert_eq!(TokenKind::For, for_token.kind());
    assert_eq!(2, for_token.line());
    assert_eq!(3, for_token.column());

    let name = &tokens[2];
    assert_eq!("x", name.literal());
    assert_eq!(8, name.column());
}

#[test]
fn lex_regex_escapes_survive() {
    let tokens = tokenize(r"#if :code ~ '\d+\.\d'");
    assert_eq!(r"\d+\.\d", tokens[4].literal());
}

#[test]
fn identity_without_directives() {
    let templates = [
        "",
        "Hello",
        "Hello\n\nworld\n",
        "# Heading\n#1 is not a directive\n## nor is this",
        "Hi ${name}, outside of a loop nothing is substituted",
        "  indented\n\ttabbed\r\n",
    ];

    for template in templates {
        assert_eq!(template, render(template, json!({ "name": "Someone" })).unwrap());
    }
}

#[test]
fn if_else() {
    let template = "#if :age >= 18\nadult\n#else\nminor\n#fi";

    assert_eq!("adult", render(template, json!({ "age": 20 })).unwrap());
    assert_eq!("minor", render(template, json!({ "age": 10 })).unwrap());
    assert_eq!("adult", render(template, json!({ "age": "18" })).unwrap());
}

#[test]
fn if_false_leaves_no_blank_line() {
    let template = "start\n#if :x\nhidden\n#fi\nend";

    assert_eq!("start\nend", render(template, json!({ "x": false })).unwrap());
    assert_eq!("start\nhidden\nend", render(template, json!({ "x": true })).unwrap());
}

#[test]
fn if_trailing_newline_kept() {
    assert_eq!("A\n", render("#if :x\nA\n#fi\n", json!({ "x": 1 })).unwrap());
}

#[test]
fn if_nested() {
    let template = r#"#if :a
A
#if :b
AB
#else
A-not-B
#fi
#else
not-A
#fi"#;

    assert_eq!("A\nAB", render(template, json!({ "a": true, "b": true })).unwrap());
    assert_eq!("A\nA-not-B", render(template, json!({ "a": true, "b": false })).unwrap());
    assert_eq!("not-A", render(template, json!({ "a": false, "b": true })).unwrap());
}

#[test]
fn if_truthiness() {
    let template = "#if :v\nyes\n#else\nno\n#fi";

    let cases = [
        (json!(true), "yes"),
        (json!(false), "no"),
        (json!(null), "no"),
        (json!(""), "no"),
        (json!("   "), "no"),
        (json!("false"), "no"),
        (json!("0"), "yes"),
        (json!(0), "no"),
        (json!(0.5), "yes"),
        (json!([]), "no"),
        (json!([ 0 ]), "yes"),
        (json!({}), "no"),
        (json!({ "k": null }), "yes"),
    ];

    for (value, expected) in cases {
        assert_eq!(
            expected,
            render(template, json!({ "v": value.clone() })).unwrap(),
            "truthiness of {value}",
        );
    }

    assert_eq!("no", render(template, json!({})).unwrap());
}

#[test]
fn dead_branches_are_not_evaluated() {
    let template = r#"#if false
#check true throw 'boom'
#var a = 1
#guard false
#throw
#fi
ok"#;

    assert_eq!("ok", render(template, json!({})).unwrap());
}

#[test]
fn expression_precedence() {
    let ctx = json!({ "a": true, "b": false, "c": false });

    assert_eq!("yes", render("#if :a || :b && :c\nyes\n#fi", ctx.clone()).unwrap());
    assert_eq!("", render("#if (:a || :b) && :c\nyes\n#fi", ctx.clone()).unwrap());
    assert_eq!("yes", render("#if !:a == false\nyes\n#fi", ctx.clone()).unwrap());
    assert_eq!("yes", render("#if !(:b || :c)\nyes\n#fi", ctx.clone()).unwrap());
}

#[test]
fn blank_and_null_keywords() {
    let template = "#if :name == blank\nempty\n#else\nfull\n#fi";

    assert_eq!("empty", render(template, json!({ "name": "  " })).unwrap());
    assert_eq!("empty", render(template, json!({})).unwrap());
    assert_eq!("full", render(template, json!({ "name": "x" })).unwrap());

    assert_eq!("yes", render("#if :missing == null\nyes\n#fi", json!({})).unwrap());
    assert_eq!("yes", render("#if :list == blank\nyes\n#fi", json!({ "list": [] })).unwrap());
}

#[test]
fn nested_paths() {
    let ctx = json!({
        "user": { "roles": [ "admin", "dev" ], "meta": { "team name": "core" } },
    });

    assert_eq!("yes", render("#if :user.roles[1] == 'dev'\nyes\n#fi", ctx.clone()).unwrap());
    assert_eq!("yes", render("#if :user.roles.0 == admin\nyes\n#fi", ctx.clone()).unwrap());
    assert_eq!("yes", render("#if :user.meta['team name'] == core\nyes\n#fi", ctx.clone()).unwrap());
    assert_eq!("", render("#if :user.roles[5]\nyes\n#fi", ctx).unwrap());
}

#[test]
fn switch_selects_first_matching_case() {
    let template = r#"#switch :color | lower
#case red, crimson
warm
#break
#case blue
cool
#break
#case red
never
#break
#default
unknown
#break
#end"#;

    assert_eq!("warm", render(template, json!({ "color": "CRIMSON" })).unwrap());
    assert_eq!("warm", render(template, json!({ "color": "red" })).unwrap());
    assert_eq!("cool", render(template, json!({ "color": "Blue" })).unwrap());
    assert_eq!("unknown", render(template, json!({ "color": "green" })).unwrap());
}

#[test]
fn switch_without_default() {
    let template = "#switch :n\n#case 1\none\n#break\n#case 2\ntwo\n#break\n#end";

    assert_eq!("two", render(template, json!({ "n": "2" })).unwrap());
    assert_eq!("one", render(template, json!({ "n": 1.0 })).unwrap());
    assert_eq!("", render(template, json!({ "n": 3 })).unwrap());
}

#[test]
fn switch_default_first() {
    let template = "#switch :n\n#default\nother\n#break\n#case 1\none\n#break\n#end";

    assert_eq!("one", render(template, json!({ "n": 1 })).unwrap());
    assert_eq!("other", render(template, json!({ "n": 5 })).unwrap());
}

#[test]
fn choose() {
    let template = r#"#choose
#when :score >= 90
A
#break
#when :score >= 80
B
#break
#default
C
#break
#end"#;

    assert_eq!("A", render(template, json!({ "score": 95 })).unwrap());
    assert_eq!("B", render(template, json!({ "score": 85 })).unwrap());
    assert_eq!("C", render(template, json!({ "score": 10 })).unwrap());
}

#[test]
fn choose_stops_at_first_true_condition() {
    // the second condition would fail to order a string
    let template = "#choose\n#when :ok\nfirst\n#break\n#when :name > 1\nsecond\n#break\n#end";

    assert_eq!("first", render(template, json!({ "ok": true, "name": "bob" })).unwrap());
    assert!(matches!(
        render(template, json!({ "ok": false, "name": "bob" })),
        Err(Error::OperandType { .. }),
    ));
}

#[test]
fn for_delimiter_open_close() {
    let template = "#for n,i of :nums delimiter ', ' open '[' close ']'\n${i}:${n}\n#done";

    assert_eq!("[0:10, 1:20]", render(template, json!({ "nums": [ 10, 20 ] })).unwrap());
    assert_eq!("", render(template, json!({ "nums": [] })).unwrap());
    assert_eq!("", render(template, json!({ "nums": null })).unwrap());
    assert_eq!("", render(template, json!({})).unwrap());
}

#[test]
fn for_options_in_any_order() {
    let template = "#for x of :xs close ')' delimiter '-' open '('\n${x}\n#done";
    assert_eq!("(a-b)", render(template, json!({ "xs": [ "a", "b" ] })).unwrap());
}

#[test]
fn for_default_delimiter() {
    let template = "#for x of :xs\n${x}\n#done";

    assert_eq!("a, b", render(template, json!({ "xs": [ "a", "b" ] })).unwrap());
    assert_eq!("", render(template, json!({ "xs": "" })).unwrap());
}

#[test]
fn for_single_value() {
    let template = "#for x of :name\n<${x}>\n#done";

    assert_eq!("<bob>", render(template, json!({ "name": "bob" })).unwrap());
    assert_eq!("<7>", render(template, json!({ "name": 7 })).unwrap());
}

#[test]
fn for_drops_empty_iterations() {
    let template = "#for x of :nums delimiter ','\n#if :x > 1\n${x}\n#fi\n#done";

    assert_eq!("2,3", render(template, json!({ "nums": [ 1, 2, 3 ] })).unwrap());
    assert_eq!("", render(template, json!({ "nums": [ 0, 1 ] })).unwrap());
}

#[test]
fn for_multiline_body() {
    let template = "#for x of :xs delimiter '\\n---\\n'\nname: ${x.name}\nage: ${x.age}\n#done";
    let ctx = json!({ "xs": [ { "name": "a", "age": 1 }, { "name": "b", "age": 2 } ] });

    assert_eq!("name: a\nage: 1\n---\nname: b\nage: 2", render(template, ctx).unwrap());
}

#[test]
fn for_unresolved_placeholders_are_kept() {
    let template = "#for x of :xs\n${x} ${nope} ${ not a path }\n#done";

    assert_eq!(
        "1 ${nope} ${ not a path }",
        render(template, json!({ "xs": [ 1 ] })).unwrap(),
    );
}

#[test]
fn for_nested() {
    let template = r#"#for row of :rows delimiter '; '
#for cell of :row.cells delimiter ','
${row.name}=${cell}
#done
#done"#;

    let ctx = json!({
        "rows": [
            { "name": "r1", "cells": [ 1, 2 ] },
            { "name": "r2", "cells": [ 3 ] },
        ],
    });

    assert_eq!("r1=1,r1=2; r2=3", render(template, ctx).unwrap());
}

#[test]
fn for_entries() {
    let template = "#for e of :m | entries delimiter ' '\n${e.key}=${e.value}\n#done";
    assert_eq!("a=1 b=2", render(template, json!({ "m": { "a": 1, "b": 2 } })).unwrap());
}

#[test]
fn for_names_must_be_free() {
    assert!(matches!(
        render("#for nums of :nums\nx\n#done", json!({ "nums": [ 1 ] })),
        Err(Error::DuplicateBinding { name, .. }) if name == "nums",
    ));

    assert!(matches!(
        render("#for x, x of :nums\n#done", json!({ "nums": [ 1 ] })),
        Err(Error::DuplicateBinding { name, .. }) if name == "x",
    ));

    assert!(matches!(
        render("#for x of :a\n#for x of :b\n#done\n#done", json!({ "a": [ 1 ], "b": [ 2 ] })),
        Err(Error::DuplicateBinding { name, .. }) if name == "x",
    ));

    // the same name may be reused by a later loop
    assert_eq!(
        "1\n2",
        render("#for x of :a\n${x}\n#done\n#for x of :b\n${x}\n#done", json!({ "a": 1, "b": 2 }))
            .unwrap(),
    );
}

#[test]
fn var_defines_global() {
    let engine = Engine::new();
    let template = engine.compile("#var adult = :age >= 18\n#if :adult\nyes\n#fi").unwrap();

    let rendering = engine.render(&template, &context(json!({ "age": 20 }))).unwrap();
    assert_eq!("yes", rendering.output);
    assert_eq!(Some(&json!(true)), rendering.defined_vars.get("adult"));
    assert!(rendering.for_generated_vars.is_empty());

    let rendering = engine.render(&template, &context(json!({ "age": 2 }))).unwrap();
    assert_eq!("", rendering.output);
    assert_eq!(Some(&json!(false)), rendering.defined_vars.get("adult"));
}

#[test]
fn var_with_pipes() {
    let template = "#var shout = :name | trim | upper\n#if :shout == 'BOB'\nyes\n#fi";
    assert_eq!("yes", render(template, json!({ "name": " bob " })).unwrap());
}

#[test]
fn var_rebinding_fails() {
    assert!(matches!(
        render("#var a = 1\n#var a = 2", json!({})),
        Err(Error::DuplicateBinding { name, .. }) if name == "a",
    ));

    assert!(matches!(
        render("#var a = 2", json!({ "a": 1 })),
        Err(Error::DuplicateBinding { name, coord, }) if name == "a" && coord.position() == 5,
    ));
}

#[test]
fn var_inside_loop() {
    let engine = Engine::new();
    let template = engine.compile(r#"#for n of :names delimiter ','
#var shout = :n | upper
${shout}
#done"#).unwrap();

    let rendering = engine.render(
        &template,
        &context(json!({ "names": [ "ann", "bo" ] })),
    ).unwrap();

    assert_eq!("ANN,BO", rendering.output);
    assert!(rendering.defined_vars.is_empty());

    let key = |iteration| ForVarKey { name: "shout".to_owned(), occurrence: 0, iteration, };
    assert_eq!(Some(&json!("ANN")), rendering.for_generated_vars.get(&key(0)));
    assert_eq!(Some(&json!("BO")), rendering.for_generated_vars.get(&key(1)));
    assert_eq!(2, rendering.for_generated_vars.len());
}

#[test]
fn loop_occurrences() {
    let engine = Engine::new();
    let template = engine.compile(r#"#for a of :outer
#for b of :inner
#var seen = :b
#done
#done
#for c of :inner
#var last = :c
#done"#).unwrap();

    let rendering = engine.render(
        &template,
        &context(json!({ "outer": [ 1, 2 ], "inner": [ "x" ] })),
    ).unwrap();

    let keys: Vec<(&str, usize, usize)> = rendering.for_generated_vars.keys()
        .map(|k| (k.name.as_str(), k.occurrence, k.iteration))
        .collect();

    assert_eq!(vec![ ("last", 3, 0), ("seen", 1, 0), ("seen", 2, 0), ], keys);
}

#[test]
fn guard() {
    let template = "#guard :ok\nbody\n#throw 'not ok'";

    assert_eq!("body", render(template, json!({ "ok": true })).unwrap());

    match render(template, json!({ "ok": false })) {
        Err(Error::GuardViolation { message, coord, }) => {
            assert_eq!("not ok", message);
            assert_eq!(Coordinate::new(0, 0), coord);
        },
        other => panic!("expected a guard violation, got {other:?}"),
    }
}

#[test]
fn guard_default_message() {
    assert!(matches!(
        render("#guard :ok\nbody\n#throw", json!({})),
        Err(Error::GuardViolation { message, .. }) if message == "guard condition failed",
    ));
}

#[test]
fn check() {
    let template = "before\n#check :n > 3 throw 'too big'\nafter";

    assert_eq!("before\nafter", render(template, json!({ "n": 1 })).unwrap());

    match render(template, json!({ "n": 5 })) {
        Err(e @ Error::CheckViolation { .. }) => {
            assert_eq!("Check violation: too big", e.to_string());
            assert_eq!(Some(Coordinate::new(1, 0)), e.coord());
        },
        other => panic!("expected a check violation, got {other:?}"),
    }
}

#[test]
fn errors_leave_no_partial_output() {
    let engine = Engine::new();
    let template = engine.compile("lots of output\n#check true throw 'stop'").unwrap();

    assert!(engine.render(&template, &Context::new()).is_err());
}

#[rstest]
#[case(json!(null), json!(""), true)]
#[case(json!([]), json!(null), true)]
#[case(json!("  "), json!({}), true)]
#[case(json!("1.0"), json!(1), true)]
#[case(json!(2.5), json!("2.50"), true)]
#[case(json!(true), json!(true), true)]
#[case(json!(true), json!("true"), true)]
#[case(json!(false), json!(true), false)]
#[case(json!("abc"), json!("abd"), false)]
#[case(json!(""), json!("x"), false)]
#[case(json!([ 1, 2 ]), json!("[1,2]"), true)]
#[case(json!(9007199254740993_u64), json!(9007199254740992_u64), false)]
#[case(json!("9007199254740993"), json!(9007199254740992_i64), false)]
#[case(json!(18446744073709551615_u64), json!("18446744073709551615"), true)]
fn loose_equality(#[case] lhs: JsonValue, #[case] rhs: JsonValue, #[case] expected: bool) {
    assert_eq!(expected, equals(&lhs, &rhs));
    assert_eq!(expected, equals(&rhs, &lhs));
}

#[rstest]
#[case(json!(1), json!(2), Ordering::Less)]
#[case(json!("10"), json!(9), Ordering::Greater)]
#[case(json!(-1.5), json!("-1.5"), Ordering::Equal)]
#[case(json!(9007199254740993_i64), json!(9007199254740992_i64), Ordering::Greater)]
#[case(json!("-9007199254740993"), json!(-9007199254740992_i64), Ordering::Less)]
#[case(json!(18446744073709551615_u64), json!(-1), Ordering::Greater)]
fn numeric_ordering(#[case] lhs: JsonValue, #[case] rhs: JsonValue, #[case] expected: Ordering) {
    assert_eq!(expected, ordering(&lhs, &rhs, Coordinate::default()).unwrap());
}

#[rstest]
#[case(json!("bob"), json!(1))]
#[case(json!(null), json!(1))]
#[case(json!(1), json!("1e5"))]
#[case(json!(1), json!("NaN"))]
fn ordering_needs_numbers(#[case] lhs: JsonValue, #[case] rhs: JsonValue) {
    assert!(matches!(
        ordering(&lhs, &rhs, Coordinate::default()),
        Err(Error::OperandType { .. }),
    ));
}

#[test]
fn ordering_in_template() {
    assert!(matches!(
        render("#if :name > 3\n#fi", json!({ "name": "bob" })),
        Err(Error::OperandType { coord, .. }) if coord.line() == 0,
    ));

    assert_eq!("yes", render("#if :n <= 3\nyes\n#fi", json!({ "n": 3 })).unwrap());
    assert_eq!("yes", render("#if :n != 3\nyes\n#fi", json!({ "n": 4 })).unwrap());
    assert_eq!("yes", render("#if :n <> 3\nyes\n#fi", json!({ "n": 4 })).unwrap());
}

#[test]
fn large_integers_compare_exactly() {
    let ctx = json!({ "id": 9007199254740993_u64 });

    assert_eq!("", render("#if :id == 9007199254740992\nsame\n#fi", ctx.clone()).unwrap());
    assert_eq!("gt", render("#if :id > 9007199254740992\ngt\n#fi", ctx.clone()).unwrap());

    let template = "#switch :id\n#case 9007199254740992\nwrong\n#break\n#case 9007199254740993\nright\n#break\n#end";
    assert_eq!("right", render(template, ctx).unwrap());
}

#[test]
fn malformed_number_fails_only_when_evaluated() {
    let huge = "9".repeat(400);
    let engine = Engine::new();

    let dead = format!("#if false\n#if :x > {huge}\n#fi\n#fi\nok");
    assert!(engine.verify(&dead).is_ok());
    assert_eq!("ok", engine.evaluate(&dead, &Context::new()).unwrap());

    let live = format!("#if :x > {huge}\nyes\n#fi");
    assert!(engine.verify(&live).is_ok());
    assert!(matches!(
        engine.evaluate(&live, &context(json!({ "x": 1 }))),
        Err(Error::OperandType { coord, .. }) if coord.position() == 9,
    ));

    let piped = format!("#var v = 'a' | default({huge})");
    assert!(matches!(
        engine.evaluate(&piped, &Context::new()),
        Err(Error::OperandType { .. }),
    ));
}

#[rstest]
#[case("#if :s ~ '[A-Z]{3}'", "xABCx", true)]
#[case("#if :s @ '[A-Z]{3}'", "xABCx", false)]
#[case("#if :s @ '[A-Z]{3}'", "ABC", true)]
#[case("#if :s @ 'a|b'", "ab", false)]
#[case("#if :s !~ '\\d'", "abc", true)]
#[case("#if :s !@ 'abc'", "abc", false)]
#[case("#if :s ~ '@example\\.com$'", "me@example.com", true)]
#[case("#if :s ~ '@example\\.com$'", "me@examplexcom", false)]
fn regex_comparators(#[case] head: &str, #[case] subject: &str, #[case] expected: bool) {
    let template = format!("{head}\nyes\n#fi");
    let output = render(&template, json!({ "s": subject })).unwrap();

    assert_eq!(expected, output == "yes", "{head} against {subject}");
}

#[test]
fn invalid_pattern() {
    assert!(matches!(
        render("#if :s ~ '('\nyes\n#fi", json!({ "s": "x" })),
        Err(Error::InvalidPattern { pattern, .. }) if pattern == "(",
    ));
}

#[test]
fn pattern_cache_reused_across_iterations() {
    let template = "#for w of :words delimiter ','\n#if :w ~ '^a'\n${w}\n#fi\n#done";
    let ctx = json!({ "words": [ "apple", "berry", "avocado" ] });

    assert_eq!("apple,avocado", render(template, ctx).unwrap());
}

#[rstest]
#[case(":v | length", json!("héllo"), json!(5))]
#[case(":v | length", json!([ 1, 2, 3 ]), json!(3))]
#[case(":v | length", json!(null), json!(0))]
#[case(":v | upper", json!("abc"), json!("ABC"))]
#[case(":v | lower", json!("ABC"), json!("abc"))]
#[case(":v | trim", json!("  x  "), json!("x"))]
#[case(":v | replace('-', '_')", json!("a-b-c"), json!("a_b_c"))]
#[case(":v | keys", json!({ "b": 1, "a": 2 }), json!([ "a", "b" ]))]
#[case(":v | values", json!({ "b": 1, "a": 2 }), json!([ 2, 1 ]))]
#[case(":v | entries", json!({ "a": 1 }), json!([ { "key": "a", "value": 1 } ]))]
#[case(":v | join", json!([ 1, "b" ]), json!("1,b"))]
#[case(":v | join(' + ')", json!([ 1, 2 ]), json!("1 + 2"))]
#[case(":v | default('none')", json!(""), json!("none"))]
#[case(":v | default('none')", json!("some"), json!("some"))]
#[case(":v | reverse", json!([ 1, 2 ]), json!([ 2, 1 ]))]
#[case(":v | reverse", json!("abc"), json!("cba"))]
#[case(":v | first", json!([ 1, 2 ]), json!(1))]
#[case(":v | last", json!("xyz"), json!("z"))]
#[case(":v | reverse | first | upper", json!([ "a", "b" ]), json!("B"))]
fn builtin_pipes(#[case] operand: &str, #[case] input: JsonValue, #[case] expected: JsonValue) {
    let engine = Engine::new();
    let template = engine.compile(&format!("#var out = {operand}")).unwrap();
    let rendering = engine.render(&template, &context(json!({ "v": input }))).unwrap();

    assert_eq!(Some(&expected), rendering.defined_vars.get("out"));
}

#[test]
fn pipe_input_errors() {
    assert!(matches!(
        render("#var out = :v | entries", json!({ "v": [ 1 ] })),
        Err(Error::PipeInput { pipe, .. }) if pipe == "entries",
    ));

    assert!(matches!(
        render("#var out = :v | replace('a')", json!({ "v": "abc" })),
        Err(Error::PipeInput { pipe, .. }) if pipe == "replace",
    ));
}

#[test]
fn pipe_not_found() {
    match render("text\n#if :x | nope\n#fi", json!({ "x": 1 })) {
        Err(Error::PipeNotFound { name, coord, }) => {
            assert_eq!("nope", name);
            assert_eq!(1, coord.line());
        },
        other => panic!("expected a missing pipe, got {other:?}"),
    }
}

#[test]
fn custom_pipe_shadows_builtin() {
    let mut engine = Engine::new();
    engine.register_pipe("upper", |_: JsonValue, _: &[Literal]| -> Result<JsonValue> {
        Ok(json!("custom"))
    });
    engine.register_pipe("wrap", |v: JsonValue, args: &[Literal]| -> Result<JsonValue> {
        let side = args.first().and_then(|a| a.as_str()).unwrap_or("*");
        Ok(json!(format!("{side}{}{side}", v.as_str().unwrap_or_default())))
    });

    assert!(!engine.pipes().is_builtin("upper"));
    assert!(engine.pipes().is_builtin("lower"));
    assert!(engine.pipes().contains("wrap"));

    let ctx = context(json!({ "x": "abc" }));

    let template = "#switch :x | upper\n#case custom\nshadowed\n#break\n#end";
    assert_eq!("shadowed", engine.evaluate(template, &ctx).unwrap());

    let template = "#if :x | wrap('_') == '_abc_'\nwrapped\n#fi";
    assert_eq!("wrapped", engine.evaluate(template, &ctx).unwrap());

    // builtins are untouched on other engines
    let template = "#if :x | upper == ABC\nbuiltin\n#fi";
    assert_eq!("builtin", Engine::new().evaluate(template, &ctx).unwrap());
}

fn assert_syntax_error(template: &str, line: usize) {
    let engine = Engine::new();

    match engine.verify(template) {
        Err(e) => {
            assert!(e.is_syntax(), "{template:?} gave {e}");
            assert_eq!(Some(line), e.coord().map(|c| c.line()), "{template:?} gave {e}");
        },
        Ok(outline) => panic!("{template:?} verified as {outline:?}"),
    }

    assert!(
        engine.evaluate(template, &Context::new()).is_err_and(|e| e.is_syntax()),
        "{template:?} rendered",
    );
}

#[test]
fn syntax_errors() {
    assert_syntax_error("#if :x\nno end", 0);
    assert_syntax_error("text\n#fi", 1);
    assert_syntax_error("#else", 0);
    assert_syntax_error("#break", 0);
    assert_syntax_error("#done\n", 0);
    assert_syntax_error("#bogus :x", 0);
    assert_syntax_error("#if\n#fi", 0);
    assert_syntax_error("#if :x extra\n#fi", 0);
    assert_syntax_error("#if (:x\n#fi", 0);
    assert_syntax_error("#if :x == \n#fi", 0);
    assert_syntax_error("#if :x > 1 > 2\n#fi", 0);
    assert_syntax_error("#if :x |\n#fi", 0);
    assert_syntax_error("#if :x\n#else\n#else\n#fi", 2);
    assert_syntax_error("#switch :x\n#case 1\none\n#end", 3);
    assert_syntax_error("#switch :x\ntext\n#end", 1);
    assert_syntax_error("#switch :x\n#when :y\n#break\n#end", 1);
    assert_syntax_error("#switch :x\n#case\n#break\n#end", 1);
    assert_syntax_error("#choose\n#default\na\n#break\n#default\nb\n#break\n#end", 4);
    assert_syntax_error("#choose\n#when :y\na\n#break", 0);
    assert_syntax_error("#for x in :xs\n#done", 0);
    assert_syntax_error("#for of :xs\n#done", 0);
    assert_syntax_error("#for x of :xs delimiter ',' delimiter ';'\n#done", 0);
    assert_syntax_error("#for x of :xs delimiter\n#done", 0);
    assert_syntax_error("#for x of :xs\nbody", 0);
    assert_syntax_error("#guard :x\nbody", 0);
    assert_syntax_error("#guard :x\nbody\n#throw 'a' 'b'", 2);
    assert_syntax_error("#check :x 'msg'", 0);
    assert_syntax_error("#check :x throw", 0);
    assert_syntax_error("#var = 3", 0);
    assert_syntax_error("#var x 3", 0);
    assert_syntax_error("#var x = 'unterminated", 0);
}

#[test]
fn syntax_error_message() {
    let e = Engine::new().verify("line\n  #fi").unwrap_err();
    assert_eq!(
        "Syntax error at line 2 position 3: Unexpected #fi without a matching opener",
        e.to_string(),
    );

    let e = Engine::new().verify("#for x of :xs\n#fi\n#done").unwrap_err();
    assert!(e.to_string().contains("expected #done"), "{e}");
}

#[test]
fn verify_agrees_with_evaluate() {
    let templates = [
        "plain",
        "#if :a\nA\n#fi",
        "#if :a\nA",
        "#for x of :xs\n${x}\n#done",
        "#for x of :xs\n#fi",
        "#switch :a\n#case 1\n#break\n#end",
        "#switch :a\n#case 1\n#end",
        "#choose\n#when :a ~ 'x'\nx\n#break\n#end",
        "#guard :a\nok\n#throw 'no'",
        "#check :a throw 'no'",
        "#var v = :a | nope",
        "#var v = :a | upper\n#var v = 1",
        "#if :a > 'x'\n#fi",
        "#if :a ~ '('\n#fi",
        "#unknown",
        "#if ::a\n#fi",
        "#if :a > 1\n#fi",
    ];
    let huge = "9".repeat(400);
    let dead_overflow = format!("#if false\n#if :a > {huge}\n#fi\n#fi");
    let live_overflow = format!("#if :a > {huge}\n#fi");

    let contexts = [
        json!({}),
        json!({ "a": 1, "xs": [ 1, 2 ] }),
        json!({ "a": "x", "xs": "single" }),
    ];

    let engine = Engine::new();

    for template in templates.into_iter().chain([ dead_overflow.as_str(), live_overflow.as_str() ]) {
        let verified = engine.verify(template).is_ok();

        for ctx in contexts.iter() {
            let syntax_failure = engine.evaluate(template, &context(ctx.clone()))
                .is_err_and(|e| e.is_syntax());

            assert_eq!(verified, !syntax_failure, "{template:?} with {ctx}");
        }
    }
}

#[test]
fn verify_outline() {
    let template = r#"#var total = :items | length
#guard :user.name
#for item, i of :items
${item.title} ${i} ${other.field}
#done
#throw 'no user'
#if :total > 1 && :flag
#check :limit < :total throw 'over'
#fi
#switch :kind | lower
#case a
#break
#default
#break
#end"#;

    let outline = Engine::new().verify(template).unwrap();

    assert_eq!(
        vec![ "flag", "items", "kind", "limit", "other", "user", ],
        outline.variables.iter().map(String::as_str).collect::<Vec<&str>>(),
    );
    assert_eq!(
        vec![ "length", "lower", ],
        outline.pipes.iter().map(String::as_str).collect::<Vec<&str>>(),
    );
    assert!(outline.defined.contains("total"));
    assert!(outline.bindings.contains("item"));
    assert!(outline.bindings.contains("i"));
    assert_eq!(Some(&1), outline.directives.get("#for"));
    assert_eq!(Some(&1), outline.directives.get("#default"));
    assert_eq!(None, outline.directives.get("#choose"));
}

#[test]
fn verify_ignores_data() {
    // a missing pipe is only an error once rendered
    assert!(Engine::new().verify("#if :x | nope\n#fi").is_ok());
}

#[test]
fn compiled_template_is_reusable() {
    let engine = Engine::new();
    let template = engine.compile("#for x of :xs delimiter ''\n${x}\n#done").unwrap();

    for (xs, expected) in [ (json!([ 1, 2 ]), "12"), (json!("z"), "z"), (json!([]), ""), ] {
        let rendering = engine.render(&template, &context(json!({ "xs": xs }))).unwrap();
        assert_eq!(expected, rendering.output);
    }

    assert_eq!(TokenKind::For, template.tokens()[0].kind());
    assert_eq!(1, template.blocks().len());
}

#[test]
fn engine_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Engine>();

    let engine = Engine::new();
    let template = engine.compile("#for x of :xs delimiter ','\n${x}\n#done").unwrap();

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|n| {
                let engine = &engine;
                let template = &template;
                s.spawn(move || {
                    let ctx = context(json!({ "xs": [ n, n + 1 ] }));
                    engine.render(template, &ctx).map(|r| r.output)
                })
            })
            .collect();

        for (n, handle) in handles.into_iter().enumerate() {
            let output = handle.join().unwrap().unwrap();
            assert_eq!(format!("{},{}", n, n + 1), output);
        }
    });
}

#[test]
fn engine_config() {
    let config: EngineConfig = serde_json::from_str(r#"{ "delimiter": "|" }"#).unwrap();
    assert_eq!("|", config.delimiter);
    assert_eq!(Interpolation::Standard, config.interpolation);

    let engine = Engine::with_config(config);
    assert_eq!(
        "a|b",
        engine.evaluate("#for x of :xs\n${x}\n#done", &context(json!({ "xs": [ "a", "b" ] })))
            .unwrap(),
    );

    let default = EngineConfig::default();
    assert_eq!(", ", default.delimiter);
}

#[test]
fn verbatim_config_skips_interpolation() {
    let engine = Engine::with_config(EngineConfig {
        interpolation: Interpolation::Verbatim,
        ..EngineConfig::default()
    });

    assert_eq!(
        "${x},${x}",
        engine.evaluate(
            "#for x of :xs delimiter ','\n${x}\n#done",
            &context(json!({ "xs": [ 1, 2 ] })),
        ).unwrap(),
    );
}

#[test]
fn files() {
    let config = EngineConfig::read("test/report/config.json").unwrap();
    assert_eq!(" | ", config.delimiter);
    assert_eq!(Interpolation::Verbatim, config.interpolation);

    let ctx = read_context("test/report/ctx.json").unwrap();
    let template = read_file("test/report/template.hl").unwrap();

    assert_eq!(
        "# Report\n0: alpha; 1: beta\n",
        Engine::new().evaluate(&template, &ctx).unwrap(),
    );

    assert!(matches!(
        Engine::new().evaluate(&template, &Context::new()),
        Err(Error::GuardViolation { message, .. }) if message == "no items",
    ));
}

#[test]
fn file_errors() {
    assert!(matches!(read_context("test/report/list.json"), Err(Error::NotAMap(_))));
    assert!(matches!(read_context("test/report/template.hl"), Err(Error::JsonParse(..))));
    assert!(matches!(read_file("test/report/missing.hl"), Err(Error::IO(..))));
}

#[test]
fn var_path_parse() {
    let path = VarPath::parse("a.b[0]['k'].1").unwrap();

    assert_eq!("a", path.root());
    assert_eq!(
        &[
            Segment::Key("b".to_owned()),
            Segment::Index(0),
            Segment::Key("k".to_owned()),
            Segment::Index(1),
        ],
        path.rest(),
    );
    assert_eq!("a.b[0].k[1]", path.to_string());

    assert!(VarPath::parse("1a").is_none());
    assert!(VarPath::parse("a[").is_none());
    assert!(VarPath::parse("a..b").is_none());
    assert!(VarPath::parse("").is_none());
}

#[test]
fn value_helpers() {
    assert!(is_blank(&json!(null)));
    assert!(is_blank(&json!(" \t")));
    assert!(is_blank(&json!([])));
    assert!(!is_blank(&json!(0)));
    assert!(!is_blank(&json!(false)));

    assert!(is_truthy(&json!("no")));
    assert!(!is_truthy(&json!("false")));
    assert!(!is_truthy(&json!(0.0)));

    assert_eq!(vec![ json!(1), json!(2) ], iterate(json!([ 1, 2 ])));
    assert_eq!(vec![ json!({ "a": 1 }) ], iterate(json!({ "a": 1 })));
    assert!(iterate(json!(null)).is_empty());
    assert!(iterate(json!("")).is_empty());
}
