//! Pretty printing for terms
//!
//! Renders a term as driver-style source (`r.table("users").count()`) for
//! log lines and error messages. `Display` gives a single line; [`pretty`]
//! breaks long method chains across lines.

use std::fmt::{self, Display};

use crate::catalog::TermType;
use crate::serialize::MAX_NESTING_DEPTH;
use crate::term::Term;
use crate::value::Datum;

// ============ Display (single-line) ============

impl Display for Datum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Datum::Null => write!(f, "null"),
            Datum::Bool(b) => write!(f, "{}", b),
            Datum::Number(n) => write!(f, "{}", n),
            Datum::String(s) => write!(f, "\"{}\"", escape_string(s)),
            Datum::Binary(bytes) => write!(f, "r.binary(<{} bytes>)", bytes.len()),
        }
    }
}

impl Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_term(f, self, 0)
    }
}

/// `depth` counts enclosing argument lists; chain links don't add to it
fn write_term(f: &mut fmt::Formatter<'_>, term: &Term, depth: usize) -> fmt::Result {
    if depth > MAX_NESTING_DEPTH {
        return write!(f, "...");
    }
    if let Some(datum) = term.as_datum() {
        return write!(f, "{}", datum);
    }

    let detached = term.preceding().is_none();
    match term.op() {
        TermType::MakeArray if detached => {
            write!(f, "[")?;
            write_list(f, term.args(), depth)?;
            write!(f, "]")
        }
        TermType::MakeObj if detached && term.args().is_empty() => {
            write!(f, "{{")?;
            for (i, (key, value)) in term.optargs().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "\"{}\": ", escape_string(key))?;
                write_term(f, value, depth + 1)?;
            }
            write!(f, "}}")
        }
        TermType::ImplicitVar if detached => write!(f, "r.row"),
        TermType::Var if detached => match term.args() {
            [id] => write!(f, "var_{}", id),
            _ => write_chain(f, term, depth),
        },
        TermType::Func if detached => match term.args() {
            [params, body] => {
                write!(f, "|")?;
                for (i, id) in params.args().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "var_{}", id)?;
                }
                write!(f, "| ")?;
                write_term(f, body, depth + 1)
            }
            _ => write_chain(f, term, depth),
        },
        _ => write_chain(f, term, depth),
    }
}

/// `base.first(..).second(..)`, or `r.op(..)` for an unchained call
fn write_chain(f: &mut fmt::Formatter<'_>, term: &Term, depth: usize) -> fmt::Result {
    let segments = flatten_chain(term);
    match segments.split_first() {
        Some((base, calls)) if !calls.is_empty() => {
            write_term(f, base, depth)?;
            for call in calls {
                write!(f, ".")?;
                write_call(f, call, depth)?;
            }
            Ok(())
        }
        _ => {
            write!(f, "r.")?;
            write_call(f, term, depth)
        }
    }
}

/// `method(args, name=value)`
fn write_call(f: &mut fmt::Formatter<'_>, term: &Term, depth: usize) -> fmt::Result {
    write!(f, "{}(", term.op().method_name())?;
    write_list(f, term.args(), depth)?;
    for (i, (name, value)) in term.optargs().enumerate() {
        if i > 0 || !term.args().is_empty() {
            write!(f, ", ")?;
        }
        write!(f, "{}=", name)?;
        write_term(f, value, depth + 1)?;
    }
    write!(f, ")")
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Term], depth: usize) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write_term(f, item, depth + 1)?;
    }
    Ok(())
}

fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out
}

// ============ Intelligent line breaking ============

/// Flatten a method chain into its base followed by each chained call
fn flatten_chain(term: &Term) -> Vec<&Term> {
    let mut segments = Vec::new();
    let mut current = Some(term);
    while let Some(t) = current {
        segments.push(t);
        current = t.preceding();
    }
    segments.reverse();
    segments
}

fn format_args(term: &Term) -> String {
    term.args()
        .iter()
        .map(|a| a.to_string())
        .chain(term.optargs().map(|(name, value)| format!("{}={}", name, value)))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Pretty print a term with intelligent line breaking
///
/// Method chains that exceed `width` characters will be broken across lines.
pub fn pretty(term: &Term, width: usize) -> String {
    pretty_at(term, width, 0)
}

fn pretty_at(term: &Term, width: usize, depth: usize) -> String {
    let one_line = term.to_string();

    if one_line.len() <= width || depth > MAX_NESTING_DEPTH {
        return one_line;
    }

    let segments = flatten_chain(term);

    // Only break if we have a real chain (more than just base)
    if segments.len() <= 1 {
        return one_line;
    }

    let mut result = String::new();
    for (i, seg) in segments.iter().enumerate() {
        if i == 0 {
            result.push_str(&pretty_at(seg, width, depth));
            continue;
        }
        // First method stays on the same line as the base, the rest break
        if i > 1 {
            result.push_str("\n    ");
        }
        let name = seg.op().method_name();
        let call_line = format!(".{}({})", name, format_args(seg));
        let arg_count = seg.args().len() + seg.optargs().count();
        if call_line.len() > width.saturating_sub(4) && arg_count > 1 {
            result.push_str(&format!(".{}(\n        ", name));
            let inner = width.saturating_sub(8);
            let args = seg
                .args()
                .iter()
                .map(|a| pretty_at(a, inner, depth + 1))
                .chain(seg.optargs().map(|(k, v)| {
                    let inner = inner.saturating_sub(k.len() + 1);
                    format!("{}={}", k, pretty_at(v, inner, depth + 1))
                }));
            for (j, arg) in args.enumerate() {
                if j > 0 {
                    result.push_str(",\n        ");
                }
                result.push_str(&arg);
            }
            result.push_str("\n    )");
        } else {
            result.push_str(&call_line);
        }
    }

    result
}

impl Term {
    /// Pretty print with intelligent line breaking at the given width
    pub fn pretty(&self, width: usize) -> String {
        pretty(self, width)
    }
}
