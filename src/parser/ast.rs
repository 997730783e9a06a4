// AST definitions for the bot-script language

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    // Comparison
    Eq,
    Ne,
    Lt,
    Gt,
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg, // -x
}

/// AST nodes representing statements and expressions
#[derive(Debug, Clone)]
pub enum AstNode {
    // Statements
    VarDecl {
        name: String,
        init: Box<AstNode>,
        location: SourceLocation,
    },
    Assign {
        name: String,
        value: Box<AstNode>,
        location: SourceLocation,
    },
    If {
        condition: Box<AstNode>,
        then_branch: Vec<AstNode>,
        else_branch: Option<Vec<AstNode>>,
        location: SourceLocation,
    },
    While {
        condition: Box<AstNode>,
        body: Vec<AstNode>,
        location: SourceLocation,
    },
    ExprStatement {
        expr: Box<AstNode>,
        location: SourceLocation,
    },

    // Expressions
    Number(f64, SourceLocation),
    /// String literal. Only legal in call-argument position; the parser
    /// rejects it everywhere else, so it never reaches the environment or
    /// the heap.
    Str(String, SourceLocation),
    Identifier(String, SourceLocation),
    Binary {
        op: BinOp,
        left: Box<AstNode>,
        right: Box<AstNode>,
        location: SourceLocation,
    },
    Unary {
        op: UnOp,
        operand: Box<AstNode>,
        location: SourceLocation,
    },
    Call {
        name: String,
        args: Vec<AstNode>,
        location: SourceLocation,
    },
}

impl AstNode {
    /// Get the source location of this node
    pub fn location(&self) -> SourceLocation {
        match self {
            AstNode::VarDecl { location, .. } => *location,
            AstNode::Assign { location, .. } => *location,
            AstNode::If { location, .. } => *location,
            AstNode::While { location, .. } => *location,
            AstNode::ExprStatement { location, .. } => *location,
            AstNode::Number(_, loc) => *loc,
            AstNode::Str(_, loc) => *loc,
            AstNode::Identifier(_, loc) => *loc,
            AstNode::Binary { location, .. } => *location,
            AstNode::Unary { location, .. } => *location,
            AstNode::Call { location, .. } => *location,
        }
    }
}

/// Top-level program structure: a flat statement list
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub statements: Vec<AstNode>,
}

impl Program {
    pub fn new() -> Self {
        Program::default()
    }
}
