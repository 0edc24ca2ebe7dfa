//! End-to-end tests for the front end: lexing, parsing with the default
//! and custom operator tables, and resuming after syntax errors.

use kaleidoscope_syntax::frontend::{
    ast::{Expr, Function, Prototype, ANON_FN_NAME},
    lexer::{Lex, Token},
    parser::{Parser, ParserError},
    precedence::PrecedenceTable,
    toplevel::{TopLevel, TopLevelItems},
};

fn num(val: f64) -> Expr {
    Expr::number(val)
}

fn var(name: &str) -> Expr {
    Expr::variable(name)
}

fn parse_program(src: &str) -> Vec<Result<TopLevel, ParserError>> {
    let table = PrecedenceTable::default();
    let mut parser = Parser::new(src.lex(), &table);
    TopLevelItems::new(&mut parser).collect()
}

fn top_level_body(src: &str) -> Result<Expr, ParserError> {
    let table = PrecedenceTable::default();
    let mut parser = Parser::new(src.lex(), &table);
    parser.parse_top_level_expr().map(|func| func.body)
}

#[test]
fn identifiers_keep_their_spelling() {
    for name in ["x", "foo", "Def", "extern2", "a1b2c3", "deff"] {
        let mut lexer = name.lex();

        assert_eq!(lexer.next_token(), Token::Identifier(name.to_string()));
        assert_eq!(lexer.identifier_str(), name);
        assert_eq!(lexer.next_token(), Token::EndOfInput);
    }
}

#[test]
fn number_runs_use_their_valid_prefix() {
    let cases = [
        ("0", 0.0),
        ("17", 17.0),
        ("3.5", 3.5),
        (".25", 0.25),
        ("9.", 9.0),
        ("1.2.3", 1.2),
        ("10..4", 10.0),
        ("..", 0.0),
    ];

    for (src, expected) in cases {
        let mut lexer = src.lex();

        assert_eq!(lexer.next_token(), Token::Number(expected), "lexing {src:?}");
        assert_eq!(lexer.num_val(), expected);
        assert_eq!(lexer.next_token(), Token::EndOfInput, "lexing {src:?}");
    }
}

#[test]
fn deleting_comments_does_not_change_tokens() {
    let commented = "def f(x) # doubles x\n  x * 2 # result\nf(4)";
    let plain = "def f(x) \n  x * 2 \nf(4)";

    assert_eq!(
        commented.lex().collect::<Vec<_>>(),
        plain.lex().collect::<Vec<_>>()
    );
}

#[test]
fn whitespace_and_comments_only() {
    let tokens = " \t# nothing here\n\n   # or here\r\n  ".lex().collect::<Vec<_>>();

    assert_eq!(tokens, vec![Token::EndOfInput]);
    assert!(parse_program(" # just a comment ").is_empty());
}

#[test]
fn multiplication_binds_tighter() {
    assert_eq!(
        top_level_body("1+2*3"),
        Ok(Expr::binary('+', num(1.0), Expr::binary('*', num(2.0), num(3.0))))
    );
}

#[test]
fn equal_precedence_is_left_associative() {
    assert_eq!(
        top_level_body("1-2-3"),
        Ok(Expr::binary('-', Expr::binary('-', num(1.0), num(2.0)), num(3.0)))
    );

    assert_eq!(
        top_level_body("a+b-c+d"),
        Ok(Expr::binary(
            '+',
            Expr::binary('-', Expr::binary('+', var("a"), var("b")), var("c")),
            var("d"),
        ))
    );
}

#[test]
fn less_than_is_loosest() {
    assert_eq!(
        top_level_body("x*2 < y-1"),
        Ok(Expr::binary(
            '<',
            Expr::binary('*', var("x"), num(2.0)),
            Expr::binary('-', var("y"), num(1.0)),
        ))
    );
}

#[test]
fn definition_with_parameters() {
    let items = parse_program("def foo(a b) a+b");

    assert_eq!(
        items,
        vec![Ok(TopLevel::Definition(Function {
            proto: Prototype::new("foo", vec!["a".to_string(), "b".to_string()]),
            body: Expr::binary('+', var("a"), var("b")),
        }))]
    );
}

#[test]
fn unterminated_call_fails() {
    assert_eq!(top_level_body("foo(1, 2"), Err(ParserError::ExpectedArgDelimiter));

    let items = parse_program("foo(1, 2");
    assert_eq!(items, vec![Err(ParserError::ExpectedArgDelimiter)]);
}

#[test]
fn top_level_expressions_get_anonymous_prototype() {
    let items = parse_program("4 + 5;");

    let [Ok(TopLevel::Expression(func))] = items.as_slice() else {
        panic!("expected a single expression, got {items:?}");
    };
    assert_eq!(func.proto.name, ANON_FN_NAME);
    assert!(func.proto.args.is_empty());
    assert_eq!(func.body, Expr::binary('+', num(4.0), num(5.0)));
}

#[test]
fn parsing_resumes_after_errors() {
    let src = "
        extern cos(x);
        def broken(a b a + b;
        def ok(a) cos(a) * 2;
        extern 5();
        ok(1);
    ";

    let items = parse_program(src);
    let parsed = items.iter().filter(|item| item.is_ok()).count();

    assert!(items.contains(&Err(ParserError::ExpectedProtoCloseParen)));
    assert!(items.contains(&Err(ParserError::ExpectedFunctionName)));
    assert!(items.contains(&Ok(TopLevel::Extern(Prototype::new(
        "cos",
        vec!["x".to_string()]
    )))));
    assert!(items.iter().any(|item| matches!(
        item,
        Ok(TopLevel::Definition(func)) if func.proto.name == "ok"
    )));
    assert!(items.iter().any(|item| matches!(
        item,
        Ok(TopLevel::Expression(func)) if func.body == Expr::call("ok", vec![num(1.0)])
    )));
    assert!(parsed >= 3);
}

#[test]
fn custom_table_changes_grouping() {
    let mut table = PrecedenceTable::new();
    table.insert(b'+', 50).unwrap();
    table.insert(b'*', 10).unwrap();

    let mut parser = Parser::new("1+2*3".lex(), &table);

    assert_eq!(
        parser.parse_expression(),
        Ok(Expr::binary('*', Expr::binary('+', num(1.0), num(2.0)), num(3.0)))
    );
}

#[test]
fn deeply_nested_input_fails_cleanly() {
    let table = PrecedenceTable::default();
    let src = format!("{}x{}", "f(".repeat(10_000), ")".repeat(10_000));
    let mut parser = Parser::new(src.lex(), &table);

    assert!(matches!(
        parser.parse_top_level_expr(),
        Err(ParserError::NestingTooDeep(_))
    ));
}
