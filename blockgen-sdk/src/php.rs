// ABOUTME: Minimal PHP syntax tree and serializer used by the block code generator
// ABOUTME: All quoting and escaping of generated PHP happens here and nowhere else

const INDENT: &str = "    ";

/// A PHP expression the generator knows how to print.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Single-quoted string literal.
    Str(String),
    /// Function call, e.g. `__('Hero')`.
    Call { function: String, args: Vec<Expr> },
    /// `array(...)`, with optional keys per item.
    Array(Vec<ArrayItem>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayItem {
    pub key: Option<String>,
    pub value: Expr,
}

/// A top-level PHP statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    /// `$name = value;`
    Assign { variable: String, value: Expr },
    /// `expr;`
    Expr(Expr),
}

impl Expr {
    pub fn str(value: impl Into<String>) -> Self {
        Expr::Str(value.into())
    }

    pub fn call(function: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Call {
            function: function.into(),
            args,
        }
    }

    /// `array('a', 'b')` from plain strings.
    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Expr::Array(
            items
                .into_iter()
                .map(|s| ArrayItem {
                    key: None,
                    value: Expr::str(s),
                })
                .collect(),
        )
    }

    /// `array(value, ...)` without keys.
    pub fn array(values: Vec<Expr>) -> Self {
        Expr::Array(
            values
                .into_iter()
                .map(|value| ArrayItem { key: None, value })
                .collect(),
        )
    }

    /// `array('key' => value, ...)` in the given order.
    pub fn assoc<K: Into<String>>(entries: Vec<(K, Expr)>) -> Self {
        Expr::Array(
            entries
                .into_iter()
                .map(|(key, value)| ArrayItem {
                    key: Some(key.into()),
                    value,
                })
                .collect(),
        )
    }

    fn is_inline(&self) -> bool {
        match self {
            Expr::Str(_) => true,
            Expr::Call { args, .. } => args.iter().all(Expr::is_inline),
            Expr::Array(items) => items
                .iter()
                .all(|item| item.key.is_none() && matches!(item.value, Expr::Str(_))),
        }
    }
}

/// Quote a value as a single-quoted PHP string literal.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        if c == '\\' || c == '\'' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('\'');
    out
}

/// Escape text placed into HTML markup.
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Turn an arbitrary key into something usable inside a PHP identifier.
pub fn sanitize_identifier(key: &str) -> String {
    let mut out: String = key
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if out.is_empty() || out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

pub fn render_expr(expr: &Expr, depth: usize) -> String {
    let mut out = String::new();
    write_expr(&mut out, expr, depth);
    out
}

/// Render a statement followed by a newline, starting at column 0.
pub fn render_stmt(stmt: &Stmt) -> String {
    let mut out = String::new();
    match stmt {
        Stmt::Assign { variable, value } => {
            out.push('$');
            out.push_str(&sanitize_identifier(variable));
            out.push_str(" = ");
            write_expr(&mut out, value, 0);
        }
        Stmt::Expr(expr) => write_expr(&mut out, expr, 0),
    }
    out.push_str(";\n");
    out
}

fn write_expr(out: &mut String, expr: &Expr, depth: usize) {
    match expr {
        Expr::Str(value) => out.push_str(&quote(value)),
        Expr::Call { function, args } => {
            out.push_str(function);
            out.push('(');
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_expr(out, arg, depth);
            }
            out.push(')');
        }
        Expr::Array(items) if items.is_empty() => out.push_str("array()"),
        Expr::Array(items) if expr.is_inline() => {
            out.push_str("array(");
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_expr(out, &item.value, depth);
            }
            out.push(')');
        }
        Expr::Array(items) => {
            out.push_str("array(\n");
            for item in items {
                push_indent(out, depth + 1);
                if let Some(key) = &item.key {
                    out.push_str(&quote(key));
                    out.push_str(" => ");
                }
                write_expr(out, &item.value, depth + 1);
                out.push_str(",\n");
            }
            push_indent(out, depth);
            out.push(')');
        }
    }
}

fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

/// Indent every non-empty line of `text` by `depth` levels.
pub fn indent(text: &str, depth: usize) -> String {
    let prefix = INDENT.repeat(depth);
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{prefix}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
