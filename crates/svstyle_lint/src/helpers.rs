//! Tree queries shared by several rules.
//!
//! Naming predicates, reset and active-low detection, `if`-chain walks, and
//! a small constant evaluator used to infer declared widths.

use svstyle_common::Ident;
use svstyle_parser::{
    Assignment, BinaryOp, Block, DataType, ElseBranch, Event, Expr, IfStmt, LiteralKind,
    PackedRange, Select, Sensitivity, SignalDecl, Statement, UnaryOp,
};

use crate::LintContext;

/// Checks that a name is lower_snake_case: lowercase letters, digits, and
/// single underscores, starting with a letter.
pub fn is_snake_case(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    first.is_ascii_lowercase()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        && !name.contains("__")
        && !name.ends_with('_')
}

/// Checks that a name is UpperCamelCase: starts uppercase, no underscores.
pub fn is_upper_camel_case(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_uppercase())
        && name.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Checks that a name is ALL_CAPS: uppercase letters, digits, and
/// underscores, starting with a letter.
pub fn is_all_caps(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_uppercase())
        && name
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

/// Returns `true` if a name carries an active-low tag: `_n`, `_ni`, `_no`,
/// or `_nio`.
pub fn has_n_tag(name: &str) -> bool {
    ["_n", "_ni", "_no", "_nio"]
        .iter()
        .any(|suffix| name.ends_with(suffix))
}

/// Inserts an `_n` tag into a name, in front of any direction suffix.
pub fn with_n_tag(name: &str) -> String {
    ["_io", "_i", "_o"]
        .iter()
        .find_map(|suffix| {
            let core = name.strip_suffix(suffix)?;
            Some(format!("{core}_n{}", &suffix[1..]))
        })
        .unwrap_or_else(|| format!("{name}_n"))
}

/// Returns `true` for names that look like a reset: containing `rst` or
/// `reset`, in any case.
pub fn is_reset_name(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower.contains("rst") || lower.contains("reset")
}

/// Returns the name whose low level the condition tests: `!x`, `~x`,
/// `x == 0`, `x == '0`, `x == 1'b0`.
pub fn negated_signal(cond: &Expr) -> Option<Ident> {
    match cond.strip_parens() {
        Expr::Unary {
            op: UnaryOp::LogNot | UnaryOp::BitNot,
            operand,
            ..
        } => operand.as_plain_name(),
        Expr::Binary {
            op: BinaryOp::Eq | BinaryOp::CaseEq,
            lhs,
            rhs,
            ..
        } if is_zero(rhs) => lhs.as_plain_name(),
        _ => None,
    }
}

fn is_zero(expr: &Expr) -> bool {
    matches!(
        expr.strip_parens(),
        Expr::Literal {
            kind: LiteralKind::Unsized | LiteralKind::Sized | LiteralKind::Fill,
            value: Some(0),
            ..
        }
    )
}

/// The first edge event of a sensitivity list, taken as the clock.
pub fn clock_event(sens: &Sensitivity) -> Option<&Event> {
    sens.events.iter().find(|e| e.edge.is_some())
}

/// The `if` that opens a block, looking through nested `begin`/`end`.
pub fn first_if(block: &Block) -> Option<&IfStmt> {
    match block.statements.first()? {
        Statement::If(stmt) => Some(stmt),
        Statement::Block(inner) => first_if(inner),
        _ => None,
    }
}

/// The conditions of an `if` chain: the `if` and each `else if`.
pub fn chain_conditions(stmt: &IfStmt) -> Vec<&Expr> {
    let mut conds = vec![&stmt.cond];
    let mut current = stmt;
    while let Some(ElseBranch::If(next)) = &current.else_branch {
        conds.push(&next.cond);
        current = next;
    }
    conds
}

/// Visits every `if` in a block, including each `else if` of a chain.
pub fn for_each_if<'a>(block: &'a Block, f: &mut dyn FnMut(&'a IfStmt)) {
    block.walk(&mut |stmt| {
        if let Statement::If(head) = stmt {
            let mut current = head;
            loop {
                f(current);
                match &current.else_branch {
                    Some(ElseBranch::If(next)) => current = next,
                    _ => break,
                }
            }
        }
    });
}

/// Statements of a block with nested `begin`/`end` blocks flattened.
pub fn flatten(block: &Block) -> Vec<&Statement> {
    let mut out = Vec::new();
    for stmt in &block.statements {
        match stmt {
            Statement::Block(inner) => out.extend(flatten(inner)),
            other => out.push(other),
        }
    }
    out
}

/// Every assignment of the module: continuous assignments first, then those
/// in procedure and function bodies.
pub fn all_assignments<'a>(ctx: &LintContext<'a>) -> Vec<&'a Assignment> {
    let mut out: Vec<&'a Assignment> = ctx.module.assigns.iter().collect();
    for body in ctx.bodies() {
        body.walk(&mut |stmt| {
            if let Statement::Assign(assign) = stmt {
                out.push(assign);
            }
        });
    }
    out
}

/// The single unselected target of an assignment, if it has exactly one.
pub fn whole_target(assign: &Assignment) -> Option<Ident> {
    match assign.targets.as_slice() {
        [target] if !target.selected => Some(target.name),
        _ => None,
    }
}

/// A declared bit width.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Width {
    /// The width evaluates to a constant.
    Known(u64),
    /// The width depends on something that could not be evaluated, such as a
    /// parameter without a constant value.
    Parametric,
    /// The type has no bit width the rules can reason about (enums, structs,
    /// reals, arrays).
    Unknown,
}

const EVAL_DEPTH: u32 = 8;

/// The packed width of a declaration.
pub fn decl_width(ctx: &LintContext<'_>, decl: &SignalDecl) -> Width {
    if decl.unpacked > 0 {
        return Width::Unknown;
    }
    if let Some(width) = decl.data_type.atom_width() {
        return Width::Known(u64::from(width));
    }
    if !decl.data_type.is_vector() {
        return Width::Unknown;
    }
    let mut total: u64 = 1;
    for range in &decl.packed {
        match range_width(ctx, range) {
            Some(width) => total = total.saturating_mul(width),
            None => return Width::Parametric,
        }
    }
    Width::Known(total)
}

fn range_width(ctx: &LintContext<'_>, range: &PackedRange) -> Option<u64> {
    let msb = const_eval(ctx, &range.msb, 0)?;
    if let Expr::Opaque(_) = range.lsb {
        return u64::try_from(msb).ok();
    }
    let lsb = const_eval(ctx, &range.lsb, 0)?;
    Some(msb.abs_diff(lsb) + 1)
}

/// Evaluates a constant integer expression over literals and module
/// parameters with constant values.
pub fn const_eval(ctx: &LintContext<'_>, expr: &Expr, depth: u32) -> Option<i64> {
    if depth > EVAL_DEPTH {
        return None;
    }
    match expr {
        Expr::Literal {
            kind: LiteralKind::Unsized | LiteralKind::Sized,
            value,
            ..
        } => value.and_then(|v| i64::try_from(v).ok()),
        Expr::Name {
            name,
            selects,
            qualified: false,
            ..
        } if selects.is_empty() => {
            let decl = ctx.module.params.iter().find(|p| p.name == *name)?;
            const_eval(ctx, decl.init.as_ref()?, depth + 1)
        }
        Expr::Paren { inner, .. } => const_eval(ctx, inner, depth),
        Expr::Unary { op, operand, .. } => {
            let v = const_eval(ctx, operand, depth)?;
            match op {
                UnaryOp::Plus => Some(v),
                UnaryOp::Minus => v.checked_neg(),
                _ => None,
            }
        }
        Expr::Binary { op, lhs, rhs, .. } => {
            let l = const_eval(ctx, lhs, depth)?;
            let r = const_eval(ctx, rhs, depth)?;
            match op {
                BinaryOp::Add => l.checked_add(r),
                BinaryOp::Sub => l.checked_sub(r),
                BinaryOp::Mul => l.checked_mul(r),
                BinaryOp::Div => l.checked_div(r),
                BinaryOp::Mod => l.checked_rem(r),
                BinaryOp::Shl => l.checked_shl(u32::try_from(r).ok()?),
                BinaryOp::Shr => l.checked_shr(u32::try_from(r).ok()?),
                BinaryOp::Pow => l.checked_pow(u32::try_from(r).ok()?),
                _ => None,
            }
        }
        Expr::Call {
            name,
            system: true,
            args,
            ..
        } if ctx.name(*name) == "$clog2" && args.len() == 1 => {
            let v = const_eval(ctx, &args[0], depth)?;
            Some(clog2(v))
        }
        _ => None,
    }
}

fn clog2(v: i64) -> i64 {
    if v <= 1 {
        0
    } else {
        i64::from(64 - (v - 1).leading_zeros())
    }
}

/// Returns `true` if `name` is declared with a width of exactly one bit.
pub fn is_one_bit(ctx: &LintContext<'_>, name: Ident) -> bool {
    ctx.module
        .lookup(name)
        .is_some_and(|decl| !decl.is_param() && decl_width(ctx, decl) == Width::Known(1))
}

/// Returns `true` for expressions whose value is a single truth bit:
/// comparisons, logical operators, `!x`, reductions, `inside`, declared
/// 1-bit signals, and `&`/`|` between such expressions.
pub fn is_boolean(ctx: &LintContext<'_>, expr: &Expr) -> bool {
    match expr.strip_parens() {
        Expr::Binary { op, lhs, rhs, .. } => match op {
            op if op.is_comparison() || op.is_logical() => true,
            BinaryOp::BitAnd | BinaryOp::BitOr => is_boolean(ctx, lhs) && is_boolean(ctx, rhs),
            _ => false,
        },
        Expr::Unary { op, .. } => *op == UnaryOp::LogNot || op.is_reduction(),
        Expr::Inside { .. } => true,
        e => e.as_plain_name().is_some_and(|name| is_one_bit(ctx, name)),
    }
}

/// Returns `true` for expressions that yield more than one bit: wide or
/// parametric signals, sized literals wider than one bit, part selects,
/// multi-element concatenations, and arithmetic or bitwise operations over
/// any of these.
pub fn is_multi_bit(ctx: &LintContext<'_>, expr: &Expr) -> bool {
    match expr.strip_parens() {
        Expr::Name {
            name,
            selects,
            qualified,
            ..
        } => match selects.last() {
            None if !qualified => ctx.module.lookup(*name).is_some_and(|decl| {
                !decl.is_param()
                    && matches!(
                        decl_width(ctx, decl),
                        Width::Known(2..) | Width::Parametric
                    )
            }),
            Some(select) => select.is_part_select() && !is_single_bit_range(ctx, select),
            None => false,
        },
        Expr::Literal {
            kind: LiteralKind::Sized,
            width: Some(width),
            ..
        } => *width > 1,
        Expr::Concat { elements, .. } => {
            elements.len() > 1 || elements.iter().any(|e| is_multi_bit(ctx, e))
        }
        Expr::Replicate {
            count, elements, ..
        } => {
            const_eval(ctx, count, 0) != Some(1)
                || elements.len() > 1
                || elements.iter().any(|e| is_multi_bit(ctx, e))
        }
        Expr::Binary { op, lhs, rhs, .. } => {
            !op.is_comparison()
                && !op.is_logical()
                && (is_multi_bit(ctx, lhs) || is_multi_bit(ctx, rhs))
        }
        Expr::Unary { op, operand, .. } => {
            matches!(op, UnaryOp::BitNot | UnaryOp::Minus | UnaryOp::Plus)
                && is_multi_bit(ctx, operand)
        }
        Expr::Ternary {
            then_expr,
            else_expr,
            ..
        } => is_multi_bit(ctx, then_expr) || is_multi_bit(ctx, else_expr),
        _ => false,
    }
}

fn is_single_bit_range(ctx: &LintContext<'_>, select: &Select) -> bool {
    match select {
        Select::Range { msb, lsb, .. } => {
            matches!((const_eval(ctx, msb, 0), const_eval(ctx, lsb, 0)), (Some(m), Some(l)) if m == l)
        }
        Select::Indexed { width, .. } => const_eval(ctx, width, 0) == Some(1),
        _ => false,
    }
}

/// Returns `true` for data types the alignment rule groups together.
pub fn same_region_type(a: DataType, b: DataType) -> bool {
    match (a, b) {
        (DataType::Named(_), DataType::Named(_)) => true,
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snake_case_valid() {
        assert!(is_snake_case("my_signal"));
        assert!(is_snake_case("data_q2"));
        assert!(is_snake_case("a"));
    }

    #[test]
    fn snake_case_invalid() {
        assert!(!is_snake_case("MySignal"));
        assert!(!is_snake_case("my__signal"));
        assert!(!is_snake_case("_private"));
        assert!(!is_snake_case("trailing_"));
        assert!(!is_snake_case("dataOut"));
        assert!(!is_snake_case(""));
    }

    #[test]
    fn parameter_case_styles() {
        assert!(is_upper_camel_case("DataWidth"));
        assert!(is_upper_camel_case("Depth"));
        assert!(!is_upper_camel_case("DATA_WIDTH"));
        assert!(!is_upper_camel_case("dataWidth"));
        assert!(is_all_caps("DATA_WIDTH"));
        assert!(is_all_caps("N"));
        assert!(!is_all_caps("Data_Width"));
        assert!(!is_all_caps("_N"));
    }

    #[test]
    fn n_tags() {
        assert!(has_n_tag("rst_n"));
        assert!(has_n_tag("rst_ni"));
        assert!(has_n_tag("oe_no"));
        assert!(has_n_tag("pad_nio"));
        assert!(!has_n_tag("rst_i"));
        assert!(!has_n_tag("reset"));
    }

    #[test]
    fn inserting_n_tag() {
        assert_eq!(with_n_tag("rst_i"), "rst_ni");
        assert_eq!(with_n_tag("oe_o"), "oe_no");
        assert_eq!(with_n_tag("pad_io"), "pad_nio");
        assert_eq!(with_n_tag("reset"), "reset_n");
    }

    #[test]
    fn reset_names() {
        assert!(is_reset_name("rst_ni"));
        assert!(is_reset_name("soft_reset"));
        assert!(is_reset_name("SysRst"));
        assert!(!is_reset_name("clk_i"));
    }

    #[test]
    fn clog2_values() {
        assert_eq!(clog2(1), 0);
        assert_eq!(clog2(2), 1);
        assert_eq!(clog2(5), 3);
        assert_eq!(clog2(16), 4);
        assert_eq!(clog2(17), 5);
    }
}
