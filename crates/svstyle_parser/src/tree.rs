//! The structural tree produced by the parser.
//!
//! One [`ModuleTree`] is produced per `module ... endmodule`. The tree is a
//! strict parent-to-children ownership tree; relationships between signals
//! (a declaration and its uses, a `_d`/`_q` pair) are resolved by name
//! through [`ModuleTree::lookup`].

use crate::expr::Expr;
use serde::{Deserialize, Serialize};
use svstyle_common::Ident;
use svstyle_source::Span;

/// A parsed module.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModuleTree {
    /// The module name.
    pub name: Ident,
    /// Span of the module name.
    pub name_span: Span,
    /// From the `module` keyword through `endmodule` (and its label).
    pub span: Span,
    /// `import` clauses before, inside, or after the header.
    pub imports: Vec<Import>,
    /// How the ports were declared.
    pub port_style: PortStyle,
    /// Ports in declaration order.
    pub ports: Vec<Port>,
    /// `parameter` and `localparam` declarations, header and body.
    pub params: Vec<SignalDecl>,
    /// Internal signal declarations in the module body.
    pub decls: Vec<SignalDecl>,
    /// Enumerated types declared in the module.
    pub enums: Vec<EnumType>,
    /// Continuous assignments.
    pub assigns: Vec<Assignment>,
    /// `always*` procedures.
    pub procedures: Vec<Procedure>,
    /// Functions declared in the module.
    pub functions: Vec<Function>,
    /// Regions kept as raw spans (generate, instances, tasks, assertions, ...).
    pub opaque: Vec<Span>,
}

impl ModuleTree {
    /// Finds the declaration of a port, internal signal, or parameter by name.
    pub fn lookup(&self, name: Ident) -> Option<&SignalDecl> {
        self.ports
            .iter()
            .map(|p| &p.decl)
            .chain(self.decls.iter())
            .chain(self.params.iter())
            .find(|d| d.name == name)
    }

    /// Finds a module-local enumerated type by its typedef name.
    pub fn enum_named(&self, name: Ident) -> Option<&EnumType> {
        self.enums.iter().find(|e| e.name == Some(name))
    }

    /// Returns the enumerated type of a declaration, if it has one that is
    /// declared in this module.
    pub fn enum_of(&self, decl: &SignalDecl) -> Option<&EnumType> {
        match decl.data_type {
            DataType::Enum(index) => self.enums.get(index),
            DataType::Named(name) => self.enum_named(name),
            _ => None,
        }
    }

    /// Returns `true` if `span` lies inside one of the opaque regions.
    pub fn in_opaque(&self, span: Span) -> bool {
        self.opaque.iter().any(|o| o.contains(span))
    }
}

/// An `import pkg::item;` or `import pkg::*;` clause.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Import {
    /// The package name.
    pub package: Ident,
    /// The imported item, or `None` for a wildcard import.
    pub item: Option<Ident>,
    /// Span of the clause.
    pub span: Span,
}

/// How a module declares its ports.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum PortStyle {
    /// No port list.
    None,
    /// Directions and types in the header (`module m(input logic a);`).
    Ansi,
    /// Names in the header, declarations in the body.
    NonAnsi,
}

/// Port direction.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Direction {
    /// `input`
    Input,
    /// `output`
    Output,
    /// `inout`
    Inout,
}

impl Direction {
    /// The name suffix letter(s) for this direction: `i`, `o`, or `io`.
    pub fn suffix(self) -> &'static str {
        match self {
            Direction::Input => "i",
            Direction::Output => "o",
            Direction::Inout => "io",
        }
    }

    /// The keyword spelling.
    pub fn keyword(self) -> &'static str {
        match self {
            Direction::Input => "input",
            Direction::Output => "output",
            Direction::Inout => "inout",
        }
    }
}

/// What kind of entity a declaration introduces.
///
/// Only ports carry a direction.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum SignalClass {
    /// A module port.
    Port(Direction),
    /// A signal declared in the module body.
    Internal,
    /// A `parameter`.
    Parameter,
    /// A `localparam`.
    Localparam,
}

/// The data type of a declaration.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum DataType {
    /// `logic`
    Logic,
    /// `wire`
    Wire,
    /// `reg`
    Reg,
    /// `bit`
    Bit,
    /// `byte`
    Byte,
    /// `shortint`
    Shortint,
    /// `int`
    Int,
    /// `longint`
    Longint,
    /// `integer`
    Integer,
    /// `tri`, `supply0`, `supply1`
    Tri,
    /// `real`
    Real,
    /// A user-defined type, possibly package-scoped.
    Named(Ident),
    /// An anonymous `enum { ... }`, indexing [`ModuleTree::enums`].
    Enum(usize),
    /// No type keyword (`input [7:0] a`, `parameter N = 4`).
    Implicit,
}

impl DataType {
    /// The fixed width of integer atom types.
    pub fn atom_width(self) -> Option<u32> {
        match self {
            DataType::Byte => Some(8),
            DataType::Shortint => Some(16),
            DataType::Int | DataType::Integer => Some(32),
            DataType::Longint => Some(64),
            _ => None,
        }
    }

    /// Returns `true` for single-bit-by-default vector types.
    pub fn is_vector(self) -> bool {
        matches!(
            self,
            DataType::Logic
                | DataType::Wire
                | DataType::Reg
                | DataType::Bit
                | DataType::Tri
                | DataType::Implicit
        )
    }
}

/// One `[msb:lsb]` dimension.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PackedRange {
    /// The left bound.
    pub msb: Expr,
    /// The right bound. A single-expression dimension `[N]` stores an opaque
    /// right bound.
    pub lsb: Expr,
    /// Span from `[` through `]`.
    pub span: Span,
}

/// A declared signal, port, or parameter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SignalDecl {
    /// The declared name.
    pub name: Ident,
    /// Span of the name.
    pub name_span: Span,
    /// Port direction, internal signal, or parameter kind.
    pub class: SignalClass,
    /// The data type.
    pub data_type: DataType,
    /// Whether `signed` was given.
    pub signed: bool,
    /// Packed dimensions, outermost first.
    pub packed: Vec<PackedRange>,
    /// Number of unpacked dimensions after the name.
    pub unpacked: usize,
    /// Initializer or parameter value.
    pub init: Option<Expr>,
    /// The first token of the declaration on its line, when the declaration
    /// spells its own kind (direction or keyword); `None` when it continues a
    /// comma-separated list.
    pub lead_span: Option<Span>,
    /// Span of the type keyword or type name, when written.
    pub type_span: Option<Span>,
    /// From the first `[` through the last `]` of the packed dimensions.
    pub dims_span: Option<Span>,
    /// Span of the whole declaration statement or list entry.
    pub span: Span,
}

impl SignalDecl {
    /// The direction, when this is a port.
    pub fn direction(&self) -> Option<Direction> {
        match self.class {
            SignalClass::Port(dir) => Some(dir),
            _ => None,
        }
    }

    /// Returns `true` for `parameter` and `localparam` declarations.
    pub fn is_param(&self) -> bool {
        matches!(self.class, SignalClass::Parameter | SignalClass::Localparam)
    }
}

/// A module port: a [`SignalDecl`] whose class is [`SignalClass::Port`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Port {
    /// The underlying declaration.
    pub decl: SignalDecl,
}

impl Port {
    /// The port direction.
    pub fn direction(&self) -> Direction {
        self.decl.direction().unwrap_or(Direction::Inout)
    }

    /// The name suffix this port should carry, e.g. `_i`, `_ni`, `_po`.
    ///
    /// The direction letters follow an active-low (`n`) or differential
    /// (`p`/`n`) tag without an underscore in between. The tag is read from
    /// `name` whether or not the name already carries a direction suffix.
    pub fn expected_suffix(&self, name: &str) -> String {
        let dir = self.direction().suffix();
        let base = strip_direction_suffix(name);
        let tag = if base.ends_with("_n") || has_tagged_suffix(name, 'n') {
            "n"
        } else if base.ends_with("_p") || has_tagged_suffix(name, 'p') {
            "p"
        } else {
            ""
        };
        format!("_{tag}{dir}")
    }
}

/// Strips a trailing `_i`, `_o`, or `_io`.
pub fn strip_direction_suffix(name: &str) -> &str {
    ["_io", "_i", "_o"]
        .iter()
        .find_map(|s| name.strip_suffix(s))
        .unwrap_or(name)
}

fn has_tagged_suffix(name: &str, tag: char) -> bool {
    ["i", "o", "io"]
        .iter()
        .any(|dir| name.ends_with(&format!("_{tag}{dir}")))
}

/// An enumerated type declared in a module.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumType {
    /// The typedef name, `None` for an anonymous enum.
    pub name: Option<Ident>,
    /// Members with the spans of their names.
    pub members: Vec<(Ident, Span)>,
    /// Span of the declaration.
    pub span: Span,
}

/// The construct that owns a [`Block`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum BlockParent {
    /// The module body (continuous assignments).
    Module,
    /// `always_comb`
    AlwaysComb,
    /// `always_ff`
    AlwaysFf,
    /// `always_latch`
    AlwaysLatch,
    /// Plain `always`
    Always,
    /// The then-branch of an `if`.
    If,
    /// The `else` branch.
    Else,
    /// A `case` statement.
    Case,
    /// The body of one case item.
    CaseItem,
    /// A `begin`/`end` nested directly in another block.
    Bare,
    /// A function body.
    Function,
    /// A loop body.
    Loop,
}

impl BlockParent {
    /// Returns `true` for the four procedure kinds.
    pub fn is_procedure(self) -> bool {
        matches!(
            self,
            BlockParent::AlwaysComb
                | BlockParent::AlwaysFf
                | BlockParent::AlwaysLatch
                | BlockParent::Always
        )
    }

    /// Contexts that never take a `begin`/`end` of their own.
    pub fn never_delimited(self) -> bool {
        matches!(
            self,
            BlockParent::Module | BlockParent::Case | BlockParent::Function
        )
    }

    /// A short human-readable name.
    pub fn describe(self) -> &'static str {
        match self {
            BlockParent::Module => "module",
            BlockParent::AlwaysComb => "always_comb",
            BlockParent::AlwaysFf => "always_ff",
            BlockParent::AlwaysLatch => "always_latch",
            BlockParent::Always => "always",
            BlockParent::If => "if",
            BlockParent::Else => "else",
            BlockParent::Case => "case",
            BlockParent::CaseItem => "case item",
            BlockParent::Bare => "begin-end",
            BlockParent::Function => "function",
            BlockParent::Loop => "loop",
        }
    }
}

/// A group of statements under one parent construct.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// The owning construct.
    pub parent: BlockParent,
    /// Whether the statements are wrapped in `begin`/`end`.
    pub delimited: bool,
    /// The `begin : label`, if any.
    pub label: Option<Ident>,
    /// Statements in source order. Null statements are not recorded.
    pub statements: Vec<Statement>,
    /// Span of the block (the `begin`..`end` or the single statement).
    pub span: Span,
}

impl Block {
    /// Visits every statement in this block and its nested blocks, depth first.
    pub fn walk<'a>(&'a self, f: &mut dyn FnMut(&'a Statement)) {
        for stmt in &self.statements {
            stmt.walk(f);
        }
    }

    /// Visits this block and every nested block, depth first.
    pub fn walk_blocks<'a>(&'a self, f: &mut dyn FnMut(&'a Block)) {
        f(self);
        for stmt in &self.statements {
            match stmt {
                Statement::Block(b) => b.walk_blocks(f),
                Statement::If(i) => i.walk_blocks(f),
                Statement::Case(c) => {
                    for item in &c.items {
                        item.body.walk_blocks(f);
                    }
                }
                Statement::Loop(l) => l.body.walk_blocks(f),
                Statement::Assign(_) | Statement::Other(_) => {}
            }
        }
    }
}

/// A procedural or continuous statement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    /// An assignment.
    Assign(Assignment),
    /// An `if`/`else if`/`else` chain.
    If(IfStmt),
    /// A `case` statement.
    Case(CaseStmt),
    /// A nested `begin`/`end`.
    Block(Block),
    /// A loop.
    Loop(LoopStmt),
    /// Task calls, local declarations, increments, `return`, and other
    /// statements the rules do not look into.
    Other(Span),
}

impl Statement {
    /// The span of the statement.
    pub fn span(&self) -> Span {
        match self {
            Statement::Assign(a) => a.span,
            Statement::If(i) => i.span,
            Statement::Case(c) => c.span,
            Statement::Block(b) => b.span,
            Statement::Loop(l) => l.span,
            Statement::Other(span) => *span,
        }
    }

    /// Visits this statement and every statement nested in it, depth first.
    pub fn walk<'a>(&'a self, f: &mut dyn FnMut(&'a Statement)) {
        f(self);
        match self {
            // An `else if` is part of the outer statement; only its branch
            // bodies are visited.
            Statement::If(i) => walk_if_chain(i, f),
            Statement::Case(c) => {
                for item in &c.items {
                    item.body.walk(f);
                }
            }
            Statement::Block(b) => b.walk(f),
            Statement::Loop(l) => l.body.walk(f),
            Statement::Assign(_) | Statement::Other(_) => {}
        }
    }

    /// Every assignment in this statement, including nested ones.
    pub fn assignments(&self) -> Vec<&Assignment> {
        let mut out = Vec::new();
        self.walk(&mut |s| {
            if let Statement::Assign(a) = s {
                out.push(a);
            }
        });
        out
    }
}

fn walk_if_chain<'a>(stmt: &'a IfStmt, f: &mut dyn FnMut(&'a Statement)) {
    stmt.then_block.walk(f);
    match &stmt.else_branch {
        Some(ElseBranch::Block(b)) => b.walk(f),
        Some(ElseBranch::If(nested)) => walk_if_chain(nested, f),
        None => {}
    }
}

/// Assignment operator kind.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum AssignOp {
    /// `=` (and compound `+=` etc.) in a procedure.
    Blocking,
    /// `<=` in a procedure.
    NonBlocking,
    /// `assign x = ...`
    Continuous,
}

/// One signal written by an assignment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    /// The base signal name.
    pub name: Ident,
    /// Span of the whole target expression.
    pub span: Span,
    /// Whether the target has a bit/part select or member access.
    pub selected: bool,
}

/// An assignment statement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    /// Signals written; a concatenation target yields several.
    pub targets: Vec<Target>,
    /// The operator kind.
    pub op: AssignOp,
    /// Whether the operator was a compound one such as `+=`.
    pub compound: bool,
    /// The right-hand side.
    pub rhs: Expr,
    /// The procedure (or module, or function) the assignment appears in.
    pub enclosing: BlockParent,
    /// Span of the operator token.
    pub op_span: Span,
    /// Span of the whole statement.
    pub span: Span,
}

/// `unique`, `unique0`, or `priority`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Qualifier {
    /// `unique`
    Unique,
    /// `unique0`
    Unique0,
    /// `priority`
    Priority,
}

/// An `if` statement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IfStmt {
    /// Optional qualifier.
    pub qualifier: Option<Qualifier>,
    /// The condition.
    pub cond: Expr,
    /// Span of the closing `)` of the condition.
    pub cond_close: Span,
    /// The then-branch (parent [`BlockParent::If`]).
    pub then_block: Block,
    /// Span of the `else` keyword.
    pub else_kw: Option<Span>,
    /// The else-branch.
    pub else_branch: Option<ElseBranch>,
    /// From the qualifier or `if` through the end of the chain.
    pub span: Span,
}

impl IfStmt {
    /// Visits the then-block, else-blocks, and nested blocks, depth first.
    pub fn walk_blocks<'a>(&'a self, f: &mut dyn FnMut(&'a Block)) {
        self.then_block.walk_blocks(f);
        match &self.else_branch {
            Some(ElseBranch::Block(b)) => b.walk_blocks(f),
            Some(ElseBranch::If(nested)) => nested.walk_blocks(f),
            None => {}
        }
    }
}

/// What follows `else`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ElseBranch {
    /// A plain else-branch (parent [`BlockParent::Else`]).
    Block(Block),
    /// An `else if`.
    If(Box<IfStmt>),
}

/// `case`, `casez`, or `casex`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum CaseKind {
    /// `case`
    Case,
    /// `casez`
    Casez,
    /// `casex`
    Casex,
}

/// A case statement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CaseStmt {
    /// Optional qualifier.
    pub qualifier: Option<Qualifier>,
    /// The case keyword variant.
    pub kind: CaseKind,
    /// Whether this is `case (...) inside`.
    pub inside: bool,
    /// The case subject.
    pub subject: Expr,
    /// Items in source order.
    pub items: Vec<CaseItem>,
    /// Index of the `default` item.
    pub default: Option<usize>,
    /// Span of the `case` keyword.
    pub keyword_span: Span,
    /// From the qualifier or keyword through `endcase`.
    pub span: Span,
}

/// One case item.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CaseItem {
    /// The labels; empty for `default`.
    pub labels: Vec<Expr>,
    /// The body (parent [`BlockParent::CaseItem`]).
    pub body: Block,
    /// Whether this is the `default` item.
    pub is_default: bool,
    /// Span of the item.
    pub span: Span,
}

/// Loop keyword.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum LoopKind {
    /// `for`
    For,
    /// `foreach`
    Foreach,
    /// `while`
    While,
    /// `do ... while`
    DoWhile,
    /// `repeat`
    Repeat,
    /// `forever`
    Forever,
}

/// A loop statement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoopStmt {
    /// The loop keyword.
    pub kind: LoopKind,
    /// The loop body (parent [`BlockParent::Loop`]).
    pub body: Block,
    /// Span of the whole loop.
    pub span: Span,
}

/// Procedure kind.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum ProcKind {
    /// `always_comb`
    AlwaysComb,
    /// `always_ff`
    AlwaysFf,
    /// `always_latch`
    AlwaysLatch,
    /// Plain `always`
    Always,
}

impl ProcKind {
    /// The block parent kind for this procedure's body.
    pub fn block_parent(self) -> BlockParent {
        match self {
            ProcKind::AlwaysComb => BlockParent::AlwaysComb,
            ProcKind::AlwaysFf => BlockParent::AlwaysFf,
            ProcKind::AlwaysLatch => BlockParent::AlwaysLatch,
            ProcKind::Always => BlockParent::Always,
        }
    }

    /// Returns `true` for procedures whose event list should name clock edges.
    pub fn is_sequential(self) -> bool {
        matches!(self, ProcKind::AlwaysFf | ProcKind::Always)
    }
}

/// An `always*` procedure.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Procedure {
    /// The procedure keyword.
    pub kind: ProcKind,
    /// Span of the keyword.
    pub keyword_span: Span,
    /// The `@(...)` event control, if present.
    pub sensitivity: Option<Sensitivity>,
    /// The body; its parent is the procedure kind.
    pub body: Block,
    /// Names declared inside the procedure.
    pub locals: Vec<Ident>,
    /// From the keyword through the end of the body.
    pub span: Span,
}

/// An event control `@(...)`, `@*`, or `@(*)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sensitivity {
    /// Events in order.
    pub events: Vec<Event>,
    /// Separators between events, in order.
    pub separators: Vec<Separator>,
    /// Whether this is an implicit `@*` list.
    pub star: bool,
    /// Span from `@` through the closing parenthesis.
    pub span: Span,
}

impl Sensitivity {
    /// Returns `true` if any event carries an edge.
    pub fn has_edge(&self) -> bool {
        self.events.iter().any(|e| e.edge.is_some())
    }
}

/// Edge specifier.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Edge {
    /// `posedge`
    Posedge,
    /// `negedge`
    Negedge,
    /// `edge`
    Both,
}

/// One event in a sensitivity list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// The edge, if any.
    pub edge: Option<Edge>,
    /// The event expression.
    pub expr: Expr,
    /// The signal name, when the expression is a plain name.
    pub signal: Option<Ident>,
    /// Span of the event.
    pub span: Span,
}

/// How two events are joined.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum SeparatorKind {
    /// `or`
    Or,
    /// `,`
    Comma,
    /// `|`
    Pipe,
    /// `||`
    DoublePipe,
}

/// A separator token in a sensitivity list.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Separator {
    /// The separator kind.
    pub kind: SeparatorKind,
    /// Span of the separator.
    pub span: Span,
}

/// A function declaration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Function {
    /// The function name.
    pub name: Ident,
    /// Span of the name.
    pub name_span: Span,
    /// The body; never delimited.
    pub body: Block,
    /// From `function` through `endfunction`.
    pub span: Span,
}

#[cfg(test)]
mod tests {
    use super::*;
    use svstyle_common::Interner;
    use svstyle_source::FileId;

    fn port(interner: &Interner, name: &str, dir: Direction) -> Port {
        Port {
            decl: SignalDecl {
                name: interner.get_or_intern(name),
                name_span: Span::DUMMY,
                class: SignalClass::Port(dir),
                data_type: DataType::Logic,
                signed: false,
                packed: Vec::new(),
                unpacked: 0,
                init: None,
                lead_span: None,
                type_span: None,
                dims_span: None,
                span: Span::DUMMY,
            },
        }
    }

    #[test]
    fn expected_suffix_plain() {
        let i = Interner::new();
        assert_eq!(port(&i, "clk", Direction::Input).expected_suffix("clk"), "_i");
        assert_eq!(port(&i, "data_o", Direction::Output).expected_suffix("data_o"), "_o");
        assert_eq!(port(&i, "sda", Direction::Inout).expected_suffix("sda"), "_io");
    }

    #[test]
    fn expected_suffix_tagged() {
        let i = Interner::new();
        assert_eq!(port(&i, "rst_n", Direction::Input).expected_suffix("rst_n"), "_ni");
        assert_eq!(port(&i, "rst_ni", Direction::Input).expected_suffix("rst_ni"), "_ni");
        assert_eq!(port(&i, "rst_n_i", Direction::Input).expected_suffix("rst_n_i"), "_ni");
        assert_eq!(port(&i, "lvds_p", Direction::Output).expected_suffix("lvds_p"), "_po");
        assert_eq!(port(&i, "en_no", Direction::Input).expected_suffix("en_no"), "_ni");
    }

    #[test]
    fn strip_suffix() {
        assert_eq!(strip_direction_suffix("data_io"), "data");
        assert_eq!(strip_direction_suffix("data_i"), "data");
        assert_eq!(strip_direction_suffix("data"), "data");
    }

    #[test]
    fn block_parent_predicates() {
        assert!(BlockParent::AlwaysFf.is_procedure());
        assert!(!BlockParent::If.is_procedure());
        assert!(BlockParent::Function.never_delimited());
        assert!(BlockParent::Case.never_delimited());
        assert!(!BlockParent::Else.never_delimited());
    }

    #[test]
    fn atom_widths() {
        assert_eq!(DataType::Int.atom_width(), Some(32));
        assert_eq!(DataType::Byte.atom_width(), Some(8));
        assert_eq!(DataType::Logic.atom_width(), None);
    }

    #[test]
    fn statement_walk_covers_else_if_chain() {
        let f = FileId::from_raw(0);
        let leaf = |start| Statement::Other(Span::new(f, start, start + 1));
        let block = |parent, stmts| Block {
            parent,
            delimited: false,
            label: None,
            statements: stmts,
            span: Span::DUMMY,
        };
        let cond = Expr::Opaque(Span::DUMMY);
        let inner = IfStmt {
            qualifier: None,
            cond: cond.clone(),
            cond_close: Span::DUMMY,
            then_block: block(BlockParent::If, vec![leaf(2)]),
            else_kw: None,
            else_branch: Some(ElseBranch::Block(block(BlockParent::Else, vec![leaf(3)]))),
            span: Span::DUMMY,
        };
        let outer = Statement::If(IfStmt {
            qualifier: None,
            cond,
            cond_close: Span::DUMMY,
            then_block: block(BlockParent::If, vec![leaf(1)]),
            else_kw: None,
            else_branch: Some(ElseBranch::If(Box::new(inner))),
            span: Span::DUMMY,
        });
        let mut seen = Vec::new();
        outer.walk(&mut |s| {
            if let Statement::Other(span) = s {
                seen.push(span.start);
            }
        });
        assert_eq!(seen, vec![1, 2, 3]);
    }
}
