use pretty_assertions::assert_eq;

use ori_dispatch::{ClassHierarchy, ClassId, MemberProvider, SelectorId};

use crate::test_helpers::{parse, parse_err, SHAPES};
use crate::{MemberKind, ModelError, Program};

fn cid(program: &Program, name: &str) -> ClassId {
    match program.class_id(name) {
        Some(cid) => cid,
        None => panic!("no class {name}"),
    }
}

#[test]
fn class_ids_follow_preorder() {
    // C is declared before D but D's subtree comes first.
    let program = parse(
        r#"
        [[class]]
        name = "A"
        [[class]]
        name = "B"
        extends = "A"
        [[class]]
        name = "C"
        [[class]]
        name = "D"
        extends = "A"
        [[class]]
        name = "E"
        extends = "B"
        "#,
    );

    let ids: Vec<u32> = ["A", "B", "E", "D", "C"]
        .iter()
        .map(|name| cid(&program, name).raw())
        .collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    assert_eq!(program.num_cids(), 6);
    assert!(!program.has_class(ClassId::ILLEGAL));
}

#[test]
fn hierarchy_queries() {
    let program = parse(SHAPES);
    let object = cid(&program, "Object");
    let shape = cid(&program, "Shape");
    let circle = cid(&program, "Circle");

    assert_eq!(program.parent_of(object), None);
    assert_eq!(program.parent_of(circle), Some(shape));
    assert!(program.is_object_class(object));
    assert!(!program.is_object_class(shape));
    assert!(!program.is_concrete(shape));
    assert!(program.is_concrete(circle));
}

#[test]
fn selectors_are_shared_by_signature() {
    let program = parse(SHAPES);

    let selector = |class: &str, member: &str| {
        program
            .member_id(class, member)
            .and_then(|m| program.selector_id_of(m))
    };

    assert_eq!(selector("Object", "hashCode"), Some(SelectorId::new(0)));
    assert_eq!(selector("Object", "toString"), Some(SelectorId::new(1)));
    assert_eq!(selector("Square", "toString"), Some(SelectorId::new(1)));
    assert_eq!(selector("Shape", "area"), Some(SelectorId::new(2)));
    assert_eq!(selector("Circle", "area"), Some(SelectorId::new(2)));
    assert_eq!(program.num_selectors(), 3);
    assert_eq!(program.selector_name(SelectorId::new(0)), Some("get:hashCode"));
    assert_eq!(program.selector_name(SelectorId::new(2)), Some("area/0"));
}

#[test]
fn accessors_and_arities_are_distinct_selectors() {
    let program = parse(
        r#"
        [[class]]
        name = "Box"

        [[class.member]]
        name = "value"
        kind = "getter"

        [[class.member]]
        name = "value"
        kind = "setter"

        [[class.member]]
        name = "value"
        arity = 0

        [[class.member]]
        name = "value"
        arity = 1
        "#,
    );

    let names: Vec<Option<&str>> = (0..4)
        .map(|raw| program.selector_name(SelectorId::new(raw)))
        .collect();
    assert_eq!(
        names,
        vec![
            Some("get:value"),
            Some("set:value"),
            Some("value/0"),
            Some("value/1")
        ]
    );
}

#[test]
fn member_flags() {
    let program = parse(
        r#"
        [[class]]
        name = "Object"

        [[class.member]]
        name = "init"
        arity = 0
        dispatchable = false

        [[class.member]]
        name = "format"
        arity = 2
        optional_params = true

        [[class.member]]
        name = "stub"
        arity = 0
        compiled = false
        "#,
    );

    let member = |name: &str| match program.member_id("Object", name) {
        Some(m) => m,
        None => panic!("no member {name}"),
    };

    let init = member("init");
    assert!(!program.is_dynamically_dispatchable(init));
    assert_eq!(program.selector_id_of(init), None);
    assert!(program.code_of(init).is_some());

    let format = member("format");
    assert!(program.requires_args_descriptor(format));
    assert_eq!(program.selector_id_of(format), Some(SelectorId::new(0)));

    let stub = member("stub");
    assert_eq!(program.code_of(stub), None);
    assert!(!program.has_compiled_code(stub));
    assert_eq!(program.member(stub).kind, MemberKind::Method);
}

#[test]
fn code_owners_and_labels() {
    let program = parse(SHAPES);
    let Some(getter) = program.member_id("Object", "hashCode") else {
        panic!("no Object.hashCode");
    };
    let Some(code) = program.code_of(getter) else {
        panic!("Object.hashCode has no code");
    };
    let Some(owner) = program.code_owner(code) else {
        panic!("code {code} has no owner");
    };
    assert_eq!(program.label(owner).to_string(), "Object.get:hashCode");

    let Some(area) = program.member_id("Circle", "area") else {
        panic!("no Circle.area");
    };
    assert_eq!(program.label(program.member(area)).to_string(), "Circle.area");
}

#[test]
fn rejects_duplicate_classes() {
    let err = parse_err(
        r#"
        [[class]]
        name = "A"
        [[class]]
        name = "A"
        "#,
    );
    assert_eq!(err, "class `A` is declared more than once");
}

#[test]
fn rejects_unknown_parent() {
    let err = parse_err(
        r#"
        [[class]]
        name = "A"
        extends = "Missing"
        "#,
    );
    assert_eq!(err, "class `A` extends unknown class `Missing`");
}

#[test]
fn rejects_cycles() {
    let err = parse_err(
        r#"
        [[class]]
        name = "Root"
        [[class]]
        name = "A"
        extends = "B"
        [[class]]
        name = "B"
        extends = "A"
        "#,
    );
    assert_eq!(err, "class `A` is part of an inheritance cycle");
}

#[test]
fn rejects_method_without_arity() {
    let err = parse_err(
        r#"
        [[class]]
        name = "A"

        [[class.member]]
        name = "run"
        "#,
    );
    assert_eq!(err, "method `A.run` needs an arity");
}

#[test]
fn rejects_arity_on_accessors() {
    let err = parse_err(
        r#"
        [[class]]
        name = "A"

        [[class.member]]
        name = "size"
        kind = "getter"
        arity = 0
        "#,
    );
    assert_eq!(err, "accessor `A.size` cannot declare an arity");

    let err = parse_err(
        r#"
        [[class]]
        name = "A"

        [[class.member]]
        name = "size"
        kind = "setter"
        arity = 1
        dispatchable = false
        "#,
    );
    assert_eq!(err, "accessor `A.size` cannot declare an arity");
}

#[test]
fn non_dispatchable_method_needs_no_arity() {
    let program = parse(
        r#"
        [[class]]
        name = "A"

        [[class.member]]
        name = "helper"
        dispatchable = false
        "#,
    );
    assert_eq!(program.num_selectors(), 0);
}

#[test]
fn rejects_unknown_fields() {
    let result = Program::parse(
        r#"
        [[class]]
        name = "A"
        parent = "B"
        "#,
    );
    assert!(matches!(result, Err(ModelError::Parse(_))));
}

#[test]
fn missing_file_is_an_io_error() {
    let result = Program::load(std::path::Path::new("/nonexistent/model.toml"));
    assert!(matches!(result, Err(ModelError::Io { .. })));
}

#[test]
fn empty_model_has_no_classes() {
    let program = parse("");
    assert_eq!(program.num_cids(), 1);
    assert_eq!(program.num_selectors(), 0);
}
