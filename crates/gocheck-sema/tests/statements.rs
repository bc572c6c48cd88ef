//! Declarations, assignments, control flow and returns.

use gocheck_ast::build::*;
use gocheck_ast::{BinaryOp, Program, Span, Stmt, UnaryOp};
use gocheck_sema::{analyze, DiagnosticKind, SemaError};
use pretty_assertions::assert_eq;

fn main_with(body: Vec<Stmt>) -> Program {
    program(vec![func("main", vec![], None, body)])
}

fn kinds(program: &Program) -> Vec<DiagnosticKind> {
    analyze(program).unwrap().kinds()
}

#[test]
fn test_short_variable_declarations() {
    let prog = main_with(vec![
        short_var_multi(&["a", "b"], vec![int(1), string("x")]),
        // `a` is reused, `c` is new
        short_var_multi(&["a", "c"], vec![int(2), float("1.5")]),
        // reused with the wrong type
        short_var_multi(&["b", "d"], vec![int(3), int(4)]),
        // nothing new
        short_var_multi(&["a", "c"], vec![int(5), float("2.5")]),
        short_var_multi(&["e", "f"], vec![int(1)]),
    ]);
    assert_eq!(
        kinds(&prog),
        vec![
            DiagnosticKind::AssignmentMismatch,
            DiagnosticKind::NoNewVariables,
            DiagnosticKind::AssignmentCountMismatch,
        ]
    );
}

#[test]
fn test_short_declaration_cannot_reassign_constants() {
    let prog = main_with(vec![
        const_stmt(&["limit"], Some(ty("int")), vec![int(10)]),
        short_var_multi(&["limit", "other"], vec![int(1), int(2)]),
    ]);
    match analyze(&prog).unwrap().diagnostics() {
        [SemaError::InvalidAssignmentTarget { target, .. }] => assert_eq!(target, "a constant `limit`"),
        other => panic!("unexpected findings: {:?}", other),
    }
}

#[test]
fn test_blank_identifier_discards() {
    let prog = main_with(vec![
        short_var_multi(&["_", "x"], vec![string("ignored"), int(1)]),
        assign(name("_"), name("x")),
        short_var("y", name("x")),
        assign(name("y"), name("_")),
    ]);
    assert_eq!(kinds(&prog), vec![DiagnosticKind::UnknownIdentifier]);
}

#[test]
fn test_var_declaration_counts() {
    let prog = main_with(vec![
        var_multi(&["a", "b"], Some(ty("int")), vec![int(1)]),
        var_multi(&["c", "d"], None, vec![int(1), string("two")]),
        var("e", Some(ty("int")), Some(name("d"))),
    ]);
    assert_eq!(
        kinds(&prog),
        vec![DiagnosticKind::AssignmentCountMismatch, DiagnosticKind::AssignmentMismatch]
    );
}

#[test]
fn test_duplicate_local_binding() {
    let prog = main_with(vec![
        var("x", Some(ty("int")), None),
        var("x", Some(ty("string")), None),
        block_stmt(vec![var("x", Some(ty("bool")), None)]),
    ]);
    assert_eq!(kinds(&prog), vec![DiagnosticKind::DuplicateBinding]);
}

#[test]
fn test_assignments() {
    let prog = main_with(vec![
        var("n", Some(ty("int")), None),
        var("s", Some(ty("string")), None),
        const_stmt(&["size"], None, vec![int(4)]),
        assign(name("n"), int(3)),
        compound_assign(name("n"), BinaryOp::Mul, int(2)),
        compound_assign(name("s"), BinaryOp::Add, string("!")),
        // errors
        assign(name("n"), name("s")),
        compound_assign(name("s"), BinaryOp::Sub, string("x")),
        assign(name("size"), int(5)),
        assign(int(3), int(4)),
    ]);
    assert_eq!(
        kinds(&prog),
        vec![
            DiagnosticKind::AssignmentMismatch,
            DiagnosticKind::InvalidOperand,
            DiagnosticKind::InvalidAssignmentTarget,
            DiagnosticKind::InvalidAssignmentTarget,
        ]
    );
}

#[test]
fn test_index_assignment() {
    let prog = main_with(vec![
        short_var("xs", composite(array_ty(3, ty("int")), vec![int(1), int(2), int(3)])),
        short_var("word", string("go")),
        assign(index(name("xs"), int(0)), int(9)),
        // errors
        assign(index(name("xs"), int(3)), int(9)),
        assign(index(name("xs"), unary(UnaryOp::Neg, int(1))), int(9)),
        assign(index(name("xs"), string("0")), int(9)),
        assign(index(name("word"), int(0)), rune('G')),
        assign(index(name("xs"), int(1)), string("nine")),
    ]);
    assert_eq!(
        kinds(&prog),
        vec![
            DiagnosticKind::InvalidIndex,
            DiagnosticKind::InvalidIndex,
            DiagnosticKind::InvalidIndex,
            DiagnosticKind::InvalidAssignmentTarget,
            DiagnosticKind::AssignmentMismatch,
        ]
    );
}

#[test]
fn test_increment_and_decrement() {
    let prog = main_with(vec![
        var("i", Some(ty("int")), None),
        var("flag", Some(ty("bool")), None),
        inc(name("i")),
        dec(name("i")),
        inc(name("flag")),
    ]);
    assert_eq!(kinds(&prog), vec![DiagnosticKind::InvalidOperand]);
}

#[test]
fn test_conditions_must_be_boolean() {
    let prog = main_with(vec![
        var("n", Some(ty("int")), Some(int(1))),
        if_stmt(binary(BinaryOp::Gt, name("n"), int(0)), vec![], None),
        if_stmt(name("n"), vec![], Some(if_stmt(name("true"), vec![], None))),
        for_stmt(None, Some(string("forever")), None, vec![]),
    ]);
    assert_eq!(
        kinds(&prog),
        vec![DiagnosticKind::NonBooleanCondition, DiagnosticKind::NonBooleanCondition]
    );
}

#[test]
fn test_for_loop_scopes_its_init() {
    let prog = main_with(vec![
        for_stmt(
            Some(short_var("i", int(0))),
            Some(binary(BinaryOp::Lt, name("i"), int(10))),
            Some(inc(name("i"))),
            vec![cont()],
        ),
        inc(name("i")),
    ]);
    assert_eq!(kinds(&prog), vec![DiagnosticKind::UnknownIdentifier]);
}

#[test]
fn test_range_element_types() {
    let prog = program(vec![
        func("takes_int", vec![param("n", ty("int"))], None, vec![]),
        func("takes_rune", vec![param("r", ty("rune"))], None, vec![]),
        func(
            "main",
            vec![],
            None,
            vec![
                short_var("xs", composite(slice_ty(ty("int")), vec![int(1)])),
                for_range(Some("i"), Some("x"), name("xs"), vec![
                    expr_stmt(call("takes_int", vec![name("i")])),
                    expr_stmt(call("takes_int", vec![name("x")])),
                ]),
                for_range(Some("i"), Some("r"), string("héllo"), vec![
                    expr_stmt(call("takes_rune", vec![name("r")])),
                    expr_stmt(call("takes_rune", vec![name("i")])),
                ]),
                for_range(None, Some("v"), int(5), vec![]),
            ],
        ),
    ]);
    assert_eq!(
        kinds(&prog),
        vec![DiagnosticKind::ArgumentTypeMismatch, DiagnosticKind::NotIterable]
    );
}

#[test]
fn test_return_values() {
    let prog = program(vec![
        func("none", vec![], None, vec![ret(None)]),
        func("one", vec![], Some(ty("int")), vec![ret(Some(int(1)))]),
        func("missing", vec![], Some(ty("int")), vec![ret(None)]),
        func("extra", vec![], None, vec![ret(Some(int(1)))]),
        func("wrong", vec![], Some(ty("string")), vec![ret(Some(float("3.2")))]),
        func("float32_result", vec![], Some(ty("float32")), vec![ret(Some(float("3.2")))]),
    ]);
    let analysis = analyze(&prog).unwrap();
    let returns: Vec<(String, String)> = analysis
        .diagnostics()
        .iter()
        .map(|error| match error {
            SemaError::ReturnTypeMismatch { expected, found, .. } => (expected.clone(), found.clone()),
            other => panic!("unexpected finding: {:?}", other),
        })
        .collect();
    assert_eq!(
        returns,
        vec![
            ("int".to_string(), "no value".to_string()),
            ("no value".to_string(), "untyped int".to_string()),
            ("string".to_string(), "untyped float".to_string()),
        ]
    );
}

#[test]
fn test_function_literal_returns_its_own_result() {
    let prog = program(vec![func(
        "outer",
        vec![],
        Some(ty("string")),
        vec![
            short_var("inner", func_lit(vec![], Some(ty("int")), vec![ret(Some(int(4)))])),
            ret(Some(string("done"))),
        ],
    )]);
    assert!(analyze(&prog).unwrap().is_clean());
}

#[test]
fn test_function_literal_sees_enclosing_locals() {
    let prog = main_with(vec![
        var("count", Some(ty("int")), Some(int(0))),
        short_var("bump", func_lit(vec![], None, vec![inc(name("count")), inc(name("missing"))])),
    ]);
    assert_eq!(kinds(&prog), vec![DiagnosticKind::UnknownIdentifier]);
}

#[test]
fn test_operators() {
    let prog = main_with(vec![
        var("n", Some(ty("int")), Some(int(1))),
        var("f", Some(ty("float64")), Some(float("1.5"))),
        var("ok", Some(ty("bool")), Some(binary(BinaryOp::And, name("true"), binary(BinaryOp::Eq, name("n"), int(1))))),
        short_var("shifted", binary(BinaryOp::Shl, name("n"), int(2))),
        // errors
        short_var("mixed", binary(BinaryOp::Add, name("n"), name("f"))),
        short_var("rem", binary(BinaryOp::Rem, name("f"), float("2.0"))),
        short_var("neg", unary(UnaryOp::Not, name("n"))),
        short_var("cat", binary(BinaryOp::Add, string("a"), int(1))),
    ]);
    assert_eq!(
        kinds(&prog),
        vec![
            DiagnosticKind::MismatchedOperands,
            DiagnosticKind::InvalidOperand,
            DiagnosticKind::InvalidOperand,
            DiagnosticKind::MismatchedOperands,
        ]
    );
}

#[test]
fn test_selector_on_a_value() {
    let prog = main_with(vec![
        var("n", Some(ty("int")), Some(int(1))),
        short_var("field", selector("n", "size")),
    ]);
    assert_eq!(kinds(&prog), vec![DiagnosticKind::InvalidSelector]);
}

#[test]
fn test_type_used_as_value() {
    let prog = main_with(vec![short_var("x", name("int"))]);
    match analyze(&prog).unwrap().diagnostics() {
        [SemaError::NotAValue { name, what, .. }] => {
            assert_eq!(name, "int");
            assert_eq!(what, "a type");
        }
        other => panic!("unexpected findings: {:?}", other),
    }
}

#[test]
fn test_package_names_are_visible_regardless_of_order() {
    let prog = program(vec![
        global_var("first", None, Some(name("second"))),
        global_var("second", Some(ty("int")), Some(int(2))),
        global_const(&["third"], None, vec![name("second")]),
        global_var(
            "later_value",
            None,
            Some(func_lit(vec![], Some(ty("int")), vec![ret(Some(name("later")))])),
        ),
        global_var("later", None, Some(int(5))),
        func(
            "main",
            vec![],
            None,
            vec![
                var("n", Some(ty("int")), Some(call("later_value", vec![]))),
                var("s", Some(ty("string")), Some(name("third"))),
                var("t", Some(ty("string")), Some(name("first"))),
            ],
        ),
    ]);
    assert_eq!(
        kinds(&prog),
        vec![DiagnosticKind::AssignmentMismatch, DiagnosticKind::AssignmentMismatch]
    );
}

#[test]
fn test_initialization_cycle() {
    let prog = program(vec![
        global_var("a", None, Some(binary(BinaryOp::Add, at(name("b"), 8, 9), int(1)))),
        global_var("b", None, Some(at(name("a"), 20, 21))),
        global_var("itself", Some(ty("int")), Some(at(name("itself"), 40, 46))),
        // a function literal body runs later, so it may read its own variable
        global_var(
            "counter",
            None,
            Some(func_lit(vec![], Some(ty("int")), vec![ret(Some(call("counter", vec![])))])),
        ),
    ]);
    assert_eq!(
        analyze(&prog).unwrap().diagnostics(),
        &[
            SemaError::InitializationCycle {
                name: "a".into(),
                span: Span::new(20, 21),
            },
            SemaError::InitializationCycle {
                name: "itself".into(),
                span: Span::new(40, 46),
            },
        ]
    );
}

#[test]
fn test_errors_do_not_cascade() {
    let prog = program(vec![
        func("sum", vec![param("a", ty("int")), param("b", ty("int"))], Some(ty("int")), vec![ret(Some(name("a")))]),
        func(
            "main",
            vec![],
            None,
            vec![
                short_var("x", name("undefined")),
                expr_stmt(call("sum", vec![name("x"), binary(BinaryOp::Add, name("x"), int(1))])),
                if_stmt(name("x"), vec![], None),
                inc(name("x")),
            ],
        ),
    ]);
    assert_eq!(kinds(&prog), vec![DiagnosticKind::UnknownIdentifier]);
}
