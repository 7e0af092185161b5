//! Closed kind enums for program entities.

/// Expression node kinds.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ExprKind {
    // Literals and names
    Integer,
    Float,
    Bool,
    String,
    Ident,
    Randuint,
    // Binary arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Exp,
    AddTrunc,
    SubTrunc,
    MulTrunc,
    // Bitwise and logical
    BitAnd,
    BitOr,
    BitXor,
    And,
    Or,
    Xor,
    Shl,
    Shr,
    Rotl,
    Rotr,
    // Comparison
    Lt,
    Le,
    Gt,
    Ge,
    Equal,
    NotEqual,
    // Unary
    Negate,
    NegateTrunc,
    BitNot,
    Not,
    // Conversions and type operators
    Cast,
    CastTrunc,
    Signed,
    Unsigned,
    Secret,
    Reveal,
    Null,
    NotNull,
    Isnull,
    Typeof,
    Arrayof,
    Widthof,
    FuncAddr,
    // Structure
    Select,
    Call,
    Index,
    Slice,
    Dot,
    DotDotDot,
    Tuple,
    Array,
    List,
    In,
    Modint,
    NamedParam,
    TemplateInst,
    // Assignment
    Equals,
    AddEquals,
    SubEquals,
    MulEquals,
    DivEquals,
    ModEquals,
    ExpEquals,
    AddTruncEquals,
    SubTruncEquals,
    MulTruncEquals,
    BitAndEquals,
    BitOrEquals,
    BitXorEquals,
    AndEquals,
    OrEquals,
    XorEquals,
    ShlEquals,
    ShrEquals,
    RotlEquals,
    RotrEquals,
    // Type keywords
    UintType,
    IntType,
    FloatType,
    StringType,
    BoolType,
    NoneType,
}

impl ExprKind {
    /// Map a compound assignment to the operator it applies.
    pub fn compound_base(self) -> Option<ExprKind> {
        use ExprKind as K;
        Some(match self {
            K::AddEquals => K::Add,
            K::SubEquals => K::Sub,
            K::MulEquals => K::Mul,
            K::DivEquals => K::Div,
            K::ModEquals => K::Mod,
            K::ExpEquals => K::Exp,
            K::AddTruncEquals => K::AddTrunc,
            K::SubTruncEquals => K::SubTrunc,
            K::MulTruncEquals => K::MulTrunc,
            K::BitAndEquals => K::BitAnd,
            K::BitOrEquals => K::BitOr,
            K::BitXorEquals => K::BitXor,
            K::AndEquals => K::And,
            K::OrEquals => K::Or,
            K::XorEquals => K::Xor,
            K::ShlEquals => K::Shl,
            K::ShrEquals => K::Shr,
            K::RotlEquals => K::Rotl,
            K::RotrEquals => K::Rotr,
            _ => return None,
        })
    }

    /// True for `=` and every compound assignment.
    pub fn is_assignment(self) -> bool {
        self == ExprKind::Equals || self.compound_base().is_some()
    }

    /// Operators whose first operand is used for its type rather than its value.
    pub fn uses_first_child_as_type(self) -> bool {
        matches!(
            self,
            ExprKind::Cast
                | ExprKind::CastTrunc
                | ExprKind::Null
                | ExprKind::FuncAddr
                | ExprKind::Arrayof
                | ExprKind::Typeof
                | ExprKind::Widthof
        )
    }

    /// Operators a class may overload with a method of the same symbol.
    pub fn is_overloadable(self) -> bool {
        use ExprKind as K;
        matches!(
            self,
            K::BitOr
                | K::Add
                | K::Sub
                | K::Mul
                | K::Div
                | K::BitAnd
                | K::BitXor
                | K::AddTrunc
                | K::SubTrunc
                | K::MulTrunc
                | K::Mod
                | K::And
                | K::Or
                | K::Xor
                | K::Exp
                | K::Shl
                | K::Shr
                | K::Rotl
                | K::Rotr
                | K::Lt
                | K::Le
                | K::Gt
                | K::Ge
                | K::Equal
                | K::NotEqual
                | K::Negate
                | K::NegateTrunc
                | K::BitNot
                | K::Not
                | K::Index
                | K::Cast
                | K::In
        )
    }

    /// Name of the method that overloads this operator.
    pub fn operator_symbol(self) -> Option<&'static str> {
        use ExprKind as K;
        Some(match self {
            K::Add => "+",
            K::Sub | K::Negate => "-",
            K::Mul => "*",
            K::Div => "/",
            K::Mod => "%",
            K::Exp => "**",
            K::AddTrunc => "!+",
            K::SubTrunc | K::NegateTrunc => "!-",
            K::MulTrunc => "!*",
            K::BitAnd => "&",
            K::BitOr => "|",
            K::BitXor => "@",
            K::And => "&&",
            K::Or => "||",
            K::Xor => "^^",
            K::Shl => "<<",
            K::Shr => ">>",
            K::Rotl => "<<<",
            K::Rotr => ">>>",
            K::Lt => "<",
            K::Le => "<=",
            K::Gt => ">",
            K::Ge => ">=",
            K::Equal => "==",
            K::NotEqual => "!=",
            K::BitNot => "~",
            K::Not => "!",
            K::Index => "[]",
            K::Cast => "<>",
            K::In => "in",
            _ => return None,
        })
    }
}

/// Statement kinds.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum StmtKind {
    AppendCode,
    Assign,
    Call,
    Case,
    Default,
    Do,
    Else,
    ElseIf,
    Foreach,
    For,
    If,
    Import,
    Prependcode,
    Print,
    Raise,
    Ref,
    Relation,
    Return,
    Switch,
    Throw,
    Typeswitch,
    Unref,
    Use,
    While,
    Yield,
}

impl StmtKind {
    /// Imports are resolved before binding and never bound.
    pub fn is_import(self) -> bool {
        matches!(self, StmtKind::Import | StmtKind::Use)
    }

    /// Directives run by the transformer executor rather than bound.
    pub fn is_directive(self) -> bool {
        matches!(
            self,
            StmtKind::Relation | StmtKind::AppendCode | StmtKind::Prependcode
        )
    }
}

/// Function kinds.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum FuncKind {
    Plain,
    Operator,
    Constructor,
    Destructor,
    Iterator,
    Struct,
    Enum,
    Final,
    Module,
    Package,
    Transformer,
    Unittest,
}

impl FuncKind {
    /// Functions bound once in place rather than copied per signature.
    pub fn is_unique(self) -> bool {
        matches!(
            self,
            FuncKind::Package
                | FuncKind::Module
                | FuncKind::Enum
                | FuncKind::Transformer
                | FuncKind::Unittest
        )
    }
}

/// Function linkage.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Linkage {
    #[default]
    Module,
    Package,
    Builtin,
    ExternC,
    ExternRpc,
    Libcall,
    Rpc,
}

impl Linkage {
    pub fn is_extern(self) -> bool {
        matches!(self, Linkage::ExternC | Linkage::ExternRpc)
    }
}

/// Block kinds.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BlockKind {
    Function,
    Class,
    Statement,
}

/// Variable kinds.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum VarKind {
    Local,
    Parameter,
}
