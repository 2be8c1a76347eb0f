//! Shared program models for tests.

use crate::Program;

/// `Object` with `Shape` (abstract; `Circle`, `Square`) and `Point` below
/// it. `Shape.area` is declared but not compiled.
pub const SHAPES: &str = r#"
[[class]]
name = "Object"

[[class.member]]
name = "hashCode"
kind = "getter"

[[class.member]]
name = "toString"
arity = 0

[[class]]
name = "Shape"
extends = "Object"
abstract = true

[[class.member]]
name = "area"
arity = 0
compiled = false

[[class]]
name = "Circle"
extends = "Shape"

[[class.member]]
name = "area"
arity = 0

[[class]]
name = "Square"
extends = "Shape"

[[class.member]]
name = "area"
arity = 0

[[class.member]]
name = "toString"
arity = 0

[[class]]
name = "Point"
extends = "Object"
"#;

pub fn parse(text: &str) -> Program {
    match Program::parse(text) {
        Ok(program) => program,
        Err(err) => panic!("model failed to load: {err}"),
    }
}

pub fn parse_err(text: &str) -> String {
    match Program::parse(text) {
        Ok(_) => panic!("model loaded but should have been rejected"),
        Err(err) => err.to_string(),
    }
}
