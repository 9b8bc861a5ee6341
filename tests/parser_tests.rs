use larch::ast::{Expr, InfixOp, PrefixOp, Program, Stmt};
use larch::lexer::Lexer;
use larch::parser::{ParseError, Parser};

fn parse_src(src: &str) -> Program {
    Parser::new(Lexer::new(src))
        .parse_program()
        .expect("program should parse")
}

fn parse_err(src: &str) -> ParseError {
    Parser::new(Lexer::new(src))
        .parse_program()
        .expect_err("program should not parse")
}

fn expression(stmt: &Stmt) -> &Expr {
    match stmt {
        Stmt::Expression { value } => value,
        other => panic!("expected expression statement, got {other:?}"),
    }
}

#[test]
fn parses_declaration_statements() {
    let program = parse_src("var x = 5\nvar y = x\nvar foo = true");
    assert_eq!(
        program.statements,
        vec![
            Stmt::Declare {
                name: "x".to_string(),
                value: Expr::Integer(5),
            },
            Stmt::Declare {
                name: "y".to_string(),
                value: Expr::Identifier("x".to_string()),
            },
            Stmt::Declare {
                name: "foo".to_string(),
                value: Expr::Boolean(true),
            },
        ]
    );
}

#[test]
fn parses_return_statements() {
    let program = parse_src("return 5\nreturn x\nreturn true");
    assert_eq!(
        program.statements,
        vec![
            Stmt::Return {
                value: Expr::Integer(5),
            },
            Stmt::Return {
                value: Expr::Identifier("x".to_string()),
            },
            Stmt::Return {
                value: Expr::Boolean(true),
            },
        ]
    );
}

#[test]
fn parses_literal_expression_statements() {
    let program = parse_src("123\n456\nfalse\ntrue\nsome_name\n\"hi\"");
    let values: Vec<_> = program.statements.iter().map(expression).collect();
    assert_eq!(
        values,
        vec![
            &Expr::Integer(123),
            &Expr::Integer(456),
            &Expr::Boolean(false),
            &Expr::Boolean(true),
            &Expr::Identifier("some_name".to_string()),
            &Expr::String("hi".to_string()),
        ]
    );
}

#[test]
fn parses_prefix_expressions() {
    let program = parse_src("-1");
    assert_eq!(
        expression(&program.statements[0]),
        &Expr::Prefix {
            op: PrefixOp::Negate,
            right: Box::new(Expr::Integer(1)),
        }
    );

    let program = parse_src("!true");
    assert_eq!(
        expression(&program.statements[0]),
        &Expr::Prefix {
            op: PrefixOp::Not,
            right: Box::new(Expr::Boolean(true)),
        }
    );
}

#[test]
fn parses_infix_expressions() {
    let cases = [
        ("1 + 2", InfixOp::Plus),
        ("1 - 2", InfixOp::Minus),
        ("1 * 2", InfixOp::Star),
        ("1 / 2", InfixOp::Slash),
        ("1 < 2", InfixOp::Less),
        ("1 > 2", InfixOp::Greater),
        ("1 == 2", InfixOp::Equal),
        ("1 != 2", InfixOp::NotEqual),
    ];

    for (src, op) in cases {
        let program = parse_src(src);
        assert_eq!(
            expression(&program.statements[0]),
            &Expr::Infix {
                op,
                left: Box::new(Expr::Integer(1)),
                right: Box::new(Expr::Integer(2)),
            },
            "wrong tree for {src:?}"
        );
    }
}

#[test]
fn operator_precedence_round_trips() {
    let cases = [
        ("1 + 2", "(1 + 2)"),
        ("1 - 2 * 3", "(1 - (2 * 3))"),
        ("1 * 2 + 3", "((1 * 2) + 3)"),
        ("1 + 2 * 3", "(1 + (2 * 3))"),
        ("1 == 2 * 3", "(1 == (2 * 3))"),
        ("1 < 2 == true", "((1 < 2) == true)"),
        ("!true == false", "((!true) == false)"),
        ("-1 + 2", "((-1) + 2)"),
        ("(1 + 2) * 3", "((1 + 2) * 3)"),
        ("1 + (2 + 3) + 4", "((1 + (2 + 3)) + 4)"),
        (
            "(5 + 10 * 2 + 15 / 3) * 2 + -10",
            "((((5 + (10 * 2)) + (15 / 3)) * 2) + (-10))",
        ),
        ("a + add(b * c) + d", "((a + add((b * c))) + d)"),
    ];

    for (src, expected) in cases {
        assert_eq!(parse_src(src).to_string(), expected, "for {src:?}");
    }
}

#[test]
fn parses_if_expression() {
    let program = parse_src("if x < y { x }");
    let Expr::If {
        condition,
        consequence,
        otherwise,
    } = expression(&program.statements[0])
    else {
        panic!("expected if expression");
    };

    assert_eq!(condition.to_string(), "(x < y)");
    assert_eq!(consequence.statements.len(), 1);
    assert!(otherwise.is_none());
}

#[test]
fn parses_if_else_expression() {
    let program = parse_src("if 2 == 2 { 1 } else { 2 }");
    assert_eq!(
        program.to_string(),
        "if (2 == 2) { 1 } else { 2 }"
    );
}

#[test]
fn parses_function_literal() {
    let program = parse_src("fn(a, b) { return a + b }");
    let Expr::Function { parameters, body } = expression(&program.statements[0]) else {
        panic!("expected function literal");
    };

    assert_eq!(parameters, &["a", "b"]);
    assert_eq!(
        body.statements,
        vec![Stmt::Return {
            value: Expr::Infix {
                op: InfixOp::Plus,
                left: Box::new(Expr::Identifier("a".to_string())),
                right: Box::new(Expr::Identifier("b".to_string())),
            },
        }]
    );
}

#[test]
fn parses_empty_parameter_list() {
    let program = parse_src("fn() { 1 }");
    let Expr::Function { parameters, .. } = expression(&program.statements[0]) else {
        panic!("expected function literal");
    };
    assert!(parameters.is_empty());
}

#[test]
fn parses_call_arguments() {
    let program = parse_src("add(1, 2 * 3, 4 + 5)");
    assert_eq!(program.to_string(), "add(1, (2 * 3), (4 + 5))");
}

#[test]
fn parses_empty_argument_list() {
    let program = parse_src("ping()");
    let Expr::Call { arguments, .. } = expression(&program.statements[0]) else {
        panic!("expected call expression");
    };
    assert!(arguments.is_empty());
}

#[test]
fn call_operator_is_left_associative() {
    let program = parse_src("f(1)(2)");
    let Expr::Call { function, .. } = expression(&program.statements[0]) else {
        panic!("expected call expression");
    };
    assert!(matches!(function.as_ref(), Expr::Call { .. }));
    assert_eq!(program.to_string(), "f(1)(2)");
}

#[test]
fn allows_newlines_inside_call_arguments() {
    let program = parse_src("add(\n  1,\n  2\n)");
    assert_eq!(program.to_string(), "add(1, 2)");
}

#[test]
fn declaration_missing_assign_is_invalid_syntax() {
    let err = parse_err("var x 5");
    assert_eq!(
        err.to_string(),
        "invalid syntax. Expected \"=\" but got \"INTEGER\""
    );
}

#[test]
fn declaration_missing_identifier_is_invalid_syntax() {
    let err = parse_err("var = 5");
    assert_eq!(
        err.to_string(),
        "invalid syntax. Expected \"IDENTIFIER\" but got \"=\""
    );
}

#[test]
fn declaration_must_terminate() {
    let err = parse_err("var x = 5 var y = 6");
    assert_eq!(
        err.to_string(),
        "invalid syntax. Expected end of statement but got \"VAR\""
    );
}

#[test]
fn statement_may_end_at_closing_brace() {
    let program = parse_src("fn() { var x = 1 }");
    assert_eq!(program.to_string(), "fn() { x := 1 }");
}

#[test]
fn if_requires_opening_brace() {
    let err = parse_err("if x y");
    assert_eq!(
        err.to_string(),
        "invalid syntax. Expected \"{\" but got \"IDENTIFIER\""
    );
}

#[test]
fn grouped_expression_requires_closing_paren() {
    let err = parse_err("(1 + 2");
    assert_eq!(
        err.to_string(),
        "invalid syntax. Expected \")\" but got \"EOF\""
    );
}

#[test]
fn reports_illegal_tokens() {
    let err = parse_err("1 + $");
    assert_eq!(
        err.to_string(),
        "invalid syntax. Unexpected token \"ILLEGAL\" in expression"
    );
}

#[test]
fn rejects_out_of_range_integer_literal() {
    let err = parse_err("99999999999999999999");
    assert!(matches!(err, ParseError::IntegerOutOfRange { .. }));
}
