//! Program models: a class hierarchy with member declarations, read from
//! TOML.
//!
//! ```toml
//! [[class]]
//! name = "Object"
//!
//! [[class.member]]
//! name = "hashCode"
//! kind = "getter"
//!
//! [[class]]
//! name = "Point"
//! extends = "Object"
//!
//! [[class.member]]
//! name = "distanceTo"
//! arity = 1
//! ```
//!
//! # Class ids
//!
//! Ids are assigned by a depth-first preorder walk over the declared tree,
//! roots and children in declaration order. Every subtree therefore owns a
//! contiguous id range, which keeps each class's concrete-subclass ranges
//! few and nested.

use std::fmt;
use std::path::Path;

use ori_dispatch::{
    ClassHierarchy, ClassId, CodeId, MemberProvider, MethodId, SelectorId, SelectorKey,
    SelectorNumbering,
};
use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::ModelError;

// ── File schema ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ModelFile {
    #[serde(default, rename = "class")]
    classes: Vec<ClassDecl>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ClassDecl {
    name: String,
    #[serde(default)]
    extends: Option<String>,
    #[serde(default, rename = "abstract")]
    is_abstract: bool,
    #[serde(default, rename = "member")]
    members: Vec<MemberDecl>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MemberDecl {
    name: String,
    #[serde(default)]
    kind: MemberKind,
    #[serde(default)]
    arity: Option<u32>,
    #[serde(default = "default_true")]
    dispatchable: bool,
    #[serde(default = "default_true")]
    compiled: bool,
    #[serde(default)]
    optional_params: bool,
}

fn default_true() -> bool {
    true
}

/// Kind of a declared member.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    #[default]
    Method,
    Getter,
    Setter,
}

// ── Resolved program ────────────────────────────────────────────────

/// A class after id assignment.
#[derive(Debug)]
pub struct ProgramClass {
    pub name: String,
    pub parent: Option<ClassId>,
    pub concrete: bool,
    pub members: Vec<MethodId>,
}

/// A member after selector numbering and code assignment.
#[derive(Debug)]
pub struct ProgramMember {
    pub class: ClassId,
    pub name: String,
    pub kind: MemberKind,
    pub selector: Option<SelectorId>,
    pub dispatchable: bool,
    pub requires_args_descriptor: bool,
    pub code: Option<CodeId>,
}

/// A loaded program model, indexed by class id.
#[derive(Debug)]
pub struct Program {
    /// Indexed by `ClassId::index()`; slot 0 is [`ClassId::ILLEGAL`].
    classes: Vec<Option<ProgramClass>>,
    members: Vec<ProgramMember>,
    /// Owner of each compiled code object, indexed by `CodeId::index()`.
    code_owners: Vec<MethodId>,
    /// Display name of each selector, indexed by `SelectorId::index()`.
    selector_names: Vec<String>,
}

impl Program {
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let text = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, ModelError> {
        let file: ModelFile = toml::from_str(text)?;
        Self::resolve(file)
    }

    fn resolve(file: ModelFile) -> Result<Self, ModelError> {
        let (order, parents) = preorder(&file.classes)?;

        // Declaration index -> class id.
        let mut cids = vec![ClassId::ILLEGAL; file.classes.len()];
        for (position, &decl) in order.iter().enumerate() {
            cids[decl] = ClassId::new(u32::try_from(position + 1).unwrap_or(u32::MAX));
        }

        let mut program = Program {
            classes: Vec::with_capacity(order.len() + 1),
            members: Vec::new(),
            code_owners: Vec::new(),
            selector_names: Vec::new(),
        };
        program.classes.push(None);

        let mut numbering = SelectorNumbering::new();
        let mut decls: Vec<Option<ClassDecl>> = file.classes.into_iter().map(Some).collect();

        for &index in &order {
            let Some(decl) = decls[index].take() else {
                continue;
            };
            let cid = cids[index];
            let parent = parents[index].map(|p| cids[p]);

            let mut members = Vec::with_capacity(decl.members.len());
            for member in decl.members {
                members.push(program.add_member(cid, &decl.name, member, &mut numbering)?);
            }

            program.classes.push(Some(ProgramClass {
                name: decl.name,
                parent,
                concrete: !decl.is_abstract,
                members,
            }));
        }

        tracing::debug!(
            classes = order.len(),
            members = program.members.len(),
            selectors = numbering.len(),
            "loaded program model"
        );
        Ok(program)
    }

    fn add_member(
        &mut self,
        class: ClassId,
        class_name: &str,
        decl: MemberDecl,
        numbering: &mut SelectorNumbering,
    ) -> Result<MethodId, ModelError> {
        let id = MethodId::new(u32::try_from(self.members.len()).unwrap_or(u32::MAX));

        if decl.kind != MemberKind::Method && decl.arity.is_some() {
            return Err(ModelError::AccessorArity {
                class: class_name.to_string(),
                member: decl.name,
            });
        }

        let selector = if decl.dispatchable {
            let key = match decl.kind {
                MemberKind::Getter => SelectorKey::getter(decl.name.as_str()),
                MemberKind::Setter => SelectorKey::setter(decl.name.as_str()),
                MemberKind::Method => {
                    let Some(arity) = decl.arity else {
                        return Err(ModelError::MissingArity {
                            class: class_name.to_string(),
                            member: decl.name,
                        });
                    };
                    SelectorKey::method(decl.name.as_str(), arity)
                }
            };
            let name = selector_name(&key);
            let sid = numbering.selector_id(key);
            if sid.index() == self.selector_names.len() {
                self.selector_names.push(name);
            }
            Some(sid)
        } else {
            None
        };

        let code = decl.compiled.then(|| {
            let code = CodeId::new(u32::try_from(self.code_owners.len()).unwrap_or(u32::MAX));
            self.code_owners.push(id);
            code
        });

        self.members.push(ProgramMember {
            class,
            name: decl.name,
            kind: decl.kind,
            selector,
            dispatchable: decl.dispatchable,
            requires_args_descriptor: decl.optional_params,
            code,
        });
        Ok(id)
    }

    pub fn class(&self, cid: ClassId) -> Option<&ProgramClass> {
        self.classes.get(cid.index()).and_then(Option::as_ref)
    }

    pub fn class_id(&self, name: &str) -> Option<ClassId> {
        self.classes
            .iter()
            .position(|c| c.as_ref().is_some_and(|c| c.name == name))
            .map(|i| ClassId::new(u32::try_from(i).unwrap_or(u32::MAX)))
    }

    pub fn member(&self, id: MethodId) -> &ProgramMember {
        &self.members[id.index()]
    }

    /// The member declared as `class_name.member_name`.
    pub fn member_id(&self, class_name: &str, member_name: &str) -> Option<MethodId> {
        let class = self.class(self.class_id(class_name)?)?;
        class
            .members
            .iter()
            .copied()
            .find(|&m| self.member(m).name == member_name)
    }

    /// The member whose compiled code is `code`.
    pub fn code_owner(&self, code: CodeId) -> Option<&ProgramMember> {
        let id = *self.code_owners.get(code.index())?;
        Some(self.member(id))
    }

    pub fn num_selectors(&self) -> usize {
        self.selector_names.len()
    }

    /// `name/arity` for methods, `get:name` and `set:name` for accessors.
    pub fn selector_name(&self, sid: SelectorId) -> Option<&str> {
        self.selector_names.get(sid.index()).map(String::as_str)
    }

    /// `Class.member` label for a member.
    pub fn label<'a>(&'a self, member: &'a ProgramMember) -> MemberLabel<'a> {
        let class = self.class(member.class).map_or("?", |c| c.name.as_str());
        MemberLabel {
            class,
            member: &member.name,
            kind: member.kind,
        }
    }
}

/// Displays a member as `Class.name`, with `get:`/`set:` prefixes for
/// accessors.
pub struct MemberLabel<'a> {
    class: &'a str,
    member: &'a str,
    kind: MemberKind,
}

impl fmt::Display for MemberLabel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            MemberKind::Method => write!(f, "{}.{}", self.class, self.member),
            MemberKind::Getter => write!(f, "{}.get:{}", self.class, self.member),
            MemberKind::Setter => write!(f, "{}.set:{}", self.class, self.member),
        }
    }
}

fn selector_name(key: &SelectorKey) -> String {
    match key {
        SelectorKey::Getter(name) => format!("get:{name}"),
        SelectorKey::Setter(name) => format!("set:{name}"),
        SelectorKey::Method { name, arity } => format!("{name}/{arity}"),
    }
}

/// Declaration indices in depth-first preorder, and each declaration's
/// parent index.
///
/// Rejects duplicate names, unknown parents and cycles (classes never
/// reached from a root).
fn preorder(classes: &[ClassDecl]) -> Result<(Vec<usize>, Vec<Option<usize>>), ModelError> {
    let mut by_name: FxHashMap<&str, usize> = FxHashMap::default();
    for (i, class) in classes.iter().enumerate() {
        if by_name.insert(class.name.as_str(), i).is_some() {
            return Err(ModelError::DuplicateClass(class.name.clone()));
        }
    }

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); classes.len()];
    let mut parents = vec![None; classes.len()];
    let mut roots = Vec::new();
    for (i, class) in classes.iter().enumerate() {
        match class.extends.as_deref() {
            None => roots.push(i),
            Some(parent) => {
                let Some(&p) = by_name.get(parent) else {
                    return Err(ModelError::UnknownParent {
                        class: class.name.clone(),
                        parent: parent.to_string(),
                    });
                };
                children[p].push(i);
                parents[i] = Some(p);
            }
        }
    }

    let mut order = Vec::with_capacity(classes.len());
    let mut stack: Vec<usize> = roots.into_iter().rev().collect();
    while let Some(i) = stack.pop() {
        order.push(i);
        stack.extend(children[i].iter().rev());
    }

    if order.len() != classes.len() {
        let mut visited = vec![false; classes.len()];
        for &i in &order {
            visited[i] = true;
        }
        if let Some(i) = visited.iter().position(|&v| !v) {
            return Err(ModelError::Cycle(classes[i].name.clone()));
        }
    }
    Ok((order, parents))
}

impl ClassHierarchy for Program {
    fn num_cids(&self) -> u32 {
        u32::try_from(self.classes.len()).unwrap_or(u32::MAX)
    }

    fn has_class(&self, cid: ClassId) -> bool {
        self.class(cid).is_some()
    }

    fn is_concrete(&self, cid: ClassId) -> bool {
        self.class(cid).is_some_and(|c| c.concrete)
    }

    fn parent_of(&self, cid: ClassId) -> Option<ClassId> {
        self.class(cid).and_then(|c| c.parent)
    }
}

impl MemberProvider for Program {
    fn members_of(&self, cid: ClassId) -> &[MethodId] {
        self.class(cid).map_or(&[], |c| c.members.as_slice())
    }

    fn is_dynamically_dispatchable(&self, member: MethodId) -> bool {
        self.member(member).dispatchable
    }

    fn selector_id_of(&self, member: MethodId) -> Option<SelectorId> {
        self.member(member).selector
    }

    fn requires_args_descriptor(&self, member: MethodId) -> bool {
        self.member(member).requires_args_descriptor
    }

    fn code_of(&self, member: MethodId) -> Option<CodeId> {
        self.member(member).code
    }
}

#[cfg(test)]
mod tests;
