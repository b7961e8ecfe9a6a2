//! Token kinds and lexed tokens for (System)Verilog source.
//!
//! The token stream is lossless: besides keywords, operators, literals, and
//! identifiers it carries whitespace runs, newlines, comments, and compiler
//! directives, so formatting rules can measure columns from real text.

use serde::{Deserialize, Serialize};
use svstyle_source::Span;

/// A (System)Verilog token kind.
///
/// Keywords are case-sensitive. Literal values are not stored in the token;
/// they are read back from the source text using the token's span.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum SvToken {
    // === Verilog-2005 keywords ===
    /// `always`
    Always,
    /// `and`
    And,
    /// `assign`
    Assign,
    /// `automatic`
    Automatic,
    /// `begin`
    Begin,
    /// `buf`
    Buf,
    /// `case`
    Case,
    /// `casex`
    Casex,
    /// `casez`
    Casez,
    /// `default`
    Default,
    /// `defparam`
    Defparam,
    /// `disable`
    Disable,
    /// `edge`
    Edge,
    /// `else`
    Else,
    /// `end`
    End,
    /// `endcase`
    Endcase,
    /// `endfunction`
    Endfunction,
    /// `endgenerate`
    Endgenerate,
    /// `endmodule`
    Endmodule,
    /// `endtask`
    Endtask,
    /// `for`
    For,
    /// `forever`
    Forever,
    /// `function`
    Function,
    /// `generate`
    Generate,
    /// `genvar`
    Genvar,
    /// `if`
    If,
    /// `initial`
    Initial,
    /// `inout`
    Inout,
    /// `input`
    Input,
    /// `integer`
    Integer,
    /// `localparam`
    Localparam,
    /// `module`
    Module,
    /// `nand`
    Nand,
    /// `negedge`
    Negedge,
    /// `nor`
    Nor,
    /// `not`
    Not,
    /// `or`
    Or,
    /// `output`
    Output,
    /// `parameter`
    Parameter,
    /// `posedge`
    Posedge,
    /// `real`
    Real,
    /// `reg`
    Reg,
    /// `repeat`
    Repeat,
    /// `signed`
    Signed,
    /// `supply0`
    Supply0,
    /// `supply1`
    Supply1,
    /// `task`
    Task,
    /// `tri`
    Tri,
    /// `unsigned`
    Unsigned,
    /// `wait`
    Wait,
    /// `while`
    While,
    /// `wire`
    Wire,
    /// `xnor`
    Xnor,
    /// `xor`
    Xor,

    // === SystemVerilog keywords ===
    /// `always_comb`
    AlwaysComb,
    /// `always_ff`
    AlwaysFf,
    /// `always_latch`
    AlwaysLatch,
    /// `assert`
    Assert,
    /// `assume`
    Assume,
    /// `bit`
    Bit,
    /// `break`
    Break,
    /// `byte`
    Byte,
    /// `class`
    Class,
    /// `clocking`
    Clocking,
    /// `const`
    Const,
    /// `continue`
    Continue,
    /// `cover`
    Cover,
    /// `covergroup`
    Covergroup,
    /// `do`
    Do,
    /// `endclass`
    Endclass,
    /// `endclocking`
    Endclocking,
    /// `endgroup`
    Endgroup,
    /// `endinterface`
    Endinterface,
    /// `endpackage`
    Endpackage,
    /// `endprogram`
    Endprogram,
    /// `endproperty`
    Endproperty,
    /// `endsequence`
    Endsequence,
    /// `enum`
    Enum,
    /// `export`
    Export,
    /// `final`
    Final,
    /// `foreach`
    Foreach,
    /// `fork`
    Fork,
    /// `iff`
    Iff,
    /// `import`
    Import,
    /// `inside`
    Inside,
    /// `int`
    Int,
    /// `interface`
    Interface,
    /// `join`
    Join,
    /// `join_any`
    JoinAny,
    /// `join_none`
    JoinNone,
    /// `logic`
    Logic,
    /// `longint`
    Longint,
    /// `modport`
    Modport,
    /// `package`
    Package,
    /// `packed`
    Packed,
    /// `priority`
    Priority,
    /// `program`
    Program,
    /// `property`
    Property,
    /// `ref`
    Ref,
    /// `return`
    Return,
    /// `sequence`
    Sequence,
    /// `shortint`
    Shortint,
    /// `static`
    Static,
    /// `struct`
    Struct,
    /// `type`
    Type,
    /// `typedef`
    Typedef,
    /// `union`
    Union,
    /// `unique`
    Unique,
    /// `unique0`
    Unique0,
    /// `var`
    Var,
    /// `void`
    Void,

    // === Literals ===
    /// Unsized decimal literal (e.g., `42`)
    IntLiteral,
    /// Sized or based literal (e.g., `4'b1010`, `16'hFF`, `'d3`)
    SizedLiteral,
    /// Unbased unsized fill literal (`'0`, `'1`, `'x`, `'z`)
    FillLiteral,
    /// Real literal (e.g., `3.5`, `1.0e-3`)
    RealLiteral,
    /// Time literal (e.g., `10ns`, `1.5us`)
    TimeLiteral,
    /// String literal (e.g., `"hello"`)
    StringLiteral,

    // === Operators and punctuation ===
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `:`
    Colon,
    /// `.`
    Dot,
    /// `#`
    Hash,
    /// `@`
    At,
    /// `=`
    Equals,
    /// `==`
    DoubleEquals,
    /// `!=`
    BangEquals,
    /// `===`
    TripleEquals,
    /// `!==`
    BangDoubleEquals,
    /// `==?`
    WildcardEq,
    /// `!=?`
    WildcardNeq,
    /// `<`
    LessThan,
    /// `<=` (less-equal or nonblocking assignment)
    LessEquals,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterEquals,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `**`
    DoubleStar,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `&`
    Ampersand,
    /// `&&`
    DoubleAmpersand,
    /// `|`
    Pipe,
    /// `||`
    DoublePipe,
    /// `^`
    Caret,
    /// `~^` or `^~`
    TildeCaret,
    /// `~`
    Tilde,
    /// `~&`
    TildeAmpersand,
    /// `~|`
    TildePipe,
    /// `!`
    Bang,
    /// `<<`
    DoubleLess,
    /// `>>`
    DoubleGreater,
    /// `<<<`
    TripleLess,
    /// `>>>`
    TripleGreater,
    /// `?`
    Question,
    /// `++`
    PlusPlus,
    /// `--`
    MinusMinus,
    /// `+=`
    PlusEquals,
    /// `-=`
    MinusEquals,
    /// `*=`
    StarEquals,
    /// `/=`
    SlashEquals,
    /// `%=`
    PercentEquals,
    /// `&=`
    AmpersandEquals,
    /// `|=`
    PipeEquals,
    /// `^=`
    CaretEquals,
    /// `<<=`
    DoubleLessEquals,
    /// `>>=`
    DoubleGreaterEquals,
    /// `<<<=`
    TripleLessEquals,
    /// `>>>=`
    TripleGreaterEquals,
    /// `::`
    ColonColon,
    /// `->`
    Arrow,
    /// `'` (casts and assignment patterns)
    Tick,

    // === Identifiers ===
    /// A regular identifier (e.g., `data_q`)
    Identifier,
    /// An escaped identifier (e.g., `\bus+idx `)
    EscapedIdentifier,
    /// A system identifier (e.g., `$clog2`)
    SystemIdentifier,
    /// A compiler directive or macro use (e.g., `` `define ``, `` `WIDTH ``)
    Directive,

    // === Trivia ===
    /// A run of spaces, tabs, and other non-newline whitespace
    Whitespace,
    /// A line terminator (`\n` or `\r\n`)
    Newline,
    /// A `//` comment, excluding the line terminator
    LineComment,
    /// A `/* ... */` comment
    BlockComment,
    /// A backslash immediately before a line terminator (macro continuation)
    LineContinuation,

    /// End of file (zero width)
    Eof,
    /// Characters the lexer could not turn into a valid token
    Error,
}

/// The coarse class of a token.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum TokenCategory {
    /// Regular, escaped, and system identifiers.
    Identifier,
    /// Reserved words.
    Keyword,
    /// Operators and punctuation.
    Operator,
    /// Numeric and string literals.
    Literal,
    /// Line and block comments.
    Comment,
    /// A run of non-newline whitespace.
    Whitespace,
    /// A line terminator.
    Newline,
    /// Directives, continuations, error tokens, and end of file.
    Other,
}

impl SvToken {
    /// Returns `true` if this token is a keyword.
    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            SvToken::Always
                | SvToken::And
                | SvToken::Assign
                | SvToken::Automatic
                | SvToken::Begin
                | SvToken::Buf
                | SvToken::Case
                | SvToken::Casex
                | SvToken::Casez
                | SvToken::Default
                | SvToken::Defparam
                | SvToken::Disable
                | SvToken::Edge
                | SvToken::Else
                | SvToken::End
                | SvToken::Endcase
                | SvToken::Endfunction
                | SvToken::Endgenerate
                | SvToken::Endmodule
                | SvToken::Endtask
                | SvToken::For
                | SvToken::Forever
                | SvToken::Function
                | SvToken::Generate
                | SvToken::Genvar
                | SvToken::If
                | SvToken::Initial
                | SvToken::Inout
                | SvToken::Input
                | SvToken::Integer
                | SvToken::Localparam
                | SvToken::Module
                | SvToken::Nand
                | SvToken::Negedge
                | SvToken::Nor
                | SvToken::Not
                | SvToken::Or
                | SvToken::Output
                | SvToken::Parameter
                | SvToken::Posedge
                | SvToken::Real
                | SvToken::Reg
                | SvToken::Repeat
                | SvToken::Signed
                | SvToken::Supply0
                | SvToken::Supply1
                | SvToken::Task
                | SvToken::Tri
                | SvToken::Unsigned
                | SvToken::Wait
                | SvToken::While
                | SvToken::Wire
                | SvToken::Xnor
                | SvToken::Xor
                | SvToken::AlwaysComb
                | SvToken::AlwaysFf
                | SvToken::AlwaysLatch
                | SvToken::Assert
                | SvToken::Assume
                | SvToken::Bit
                | SvToken::Break
                | SvToken::Byte
                | SvToken::Class
                | SvToken::Clocking
                | SvToken::Const
                | SvToken::Continue
                | SvToken::Cover
                | SvToken::Covergroup
                | SvToken::Do
                | SvToken::Endclass
                | SvToken::Endclocking
                | SvToken::Endgroup
                | SvToken::Endinterface
                | SvToken::Endpackage
                | SvToken::Endprogram
                | SvToken::Endproperty
                | SvToken::Endsequence
                | SvToken::Enum
                | SvToken::Export
                | SvToken::Final
                | SvToken::Foreach
                | SvToken::Fork
                | SvToken::Iff
                | SvToken::Import
                | SvToken::Inside
                | SvToken::Int
                | SvToken::Interface
                | SvToken::Join
                | SvToken::JoinAny
                | SvToken::JoinNone
                | SvToken::Logic
                | SvToken::Longint
                | SvToken::Modport
                | SvToken::Package
                | SvToken::Packed
                | SvToken::Priority
                | SvToken::Program
                | SvToken::Property
                | SvToken::Ref
                | SvToken::Return
                | SvToken::Sequence
                | SvToken::Shortint
                | SvToken::Static
                | SvToken::Struct
                | SvToken::Type
                | SvToken::Typedef
                | SvToken::Union
                | SvToken::Unique
                | SvToken::Unique0
                | SvToken::Var
                | SvToken::Void
        )
    }

    /// Returns `true` for tokens the structural parser never looks at.
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            SvToken::Whitespace
                | SvToken::Newline
                | SvToken::LineComment
                | SvToken::BlockComment
                | SvToken::LineContinuation
        )
    }

    /// Returns `true` for literal kinds.
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            SvToken::IntLiteral
                | SvToken::SizedLiteral
                | SvToken::FillLiteral
                | SvToken::RealLiteral
                | SvToken::TimeLiteral
                | SvToken::StringLiteral
        )
    }

    /// Returns `true` for identifier kinds that can name a signal.
    pub fn is_identifier(self) -> bool {
        matches!(self, SvToken::Identifier | SvToken::EscapedIdentifier)
    }

    /// Returns `true` if this token is a direction keyword (`input`, `output`, `inout`).
    pub fn is_direction(self) -> bool {
        matches!(self, SvToken::Input | SvToken::Output | SvToken::Inout)
    }

    /// Returns `true` if this token is a built-in data type or net type keyword.
    pub fn is_data_type(self) -> bool {
        matches!(
            self,
            SvToken::Logic
                | SvToken::Bit
                | SvToken::Byte
                | SvToken::Shortint
                | SvToken::Int
                | SvToken::Longint
                | SvToken::Integer
                | SvToken::Real
                | SvToken::Reg
                | SvToken::Wire
                | SvToken::Tri
                | SvToken::Supply0
                | SvToken::Supply1
        )
    }

    /// Returns `true` if this token is an always-block variant keyword.
    pub fn is_always_variant(self) -> bool {
        matches!(
            self,
            SvToken::Always | SvToken::AlwaysComb | SvToken::AlwaysFf | SvToken::AlwaysLatch
        )
    }

    /// Returns `true` if this token is a compound assignment operator.
    pub fn is_assignment_op(self) -> bool {
        matches!(
            self,
            SvToken::PlusEquals
                | SvToken::MinusEquals
                | SvToken::StarEquals
                | SvToken::SlashEquals
                | SvToken::PercentEquals
                | SvToken::AmpersandEquals
                | SvToken::PipeEquals
                | SvToken::CaretEquals
                | SvToken::DoubleLessEquals
                | SvToken::DoubleGreaterEquals
                | SvToken::TripleLessEquals
                | SvToken::TripleGreaterEquals
        )
    }

    /// Returns the coarse category of this kind.
    pub fn category(self) -> TokenCategory {
        match self {
            k if k.is_keyword() => TokenCategory::Keyword,
            k if k.is_literal() => TokenCategory::Literal,
            SvToken::Identifier | SvToken::EscapedIdentifier | SvToken::SystemIdentifier => {
                TokenCategory::Identifier
            }
            SvToken::LineComment | SvToken::BlockComment => TokenCategory::Comment,
            SvToken::Whitespace => TokenCategory::Whitespace,
            SvToken::Newline => TokenCategory::Newline,
            SvToken::Directive | SvToken::LineContinuation | SvToken::Eof | SvToken::Error => {
                TokenCategory::Other
            }
            _ => TokenCategory::Operator,
        }
    }
}

/// A lexed token with its kind, source span, and starting position.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Token {
    /// The kind of this token.
    pub kind: SvToken,
    /// The source span covering this token's text.
    pub span: Span,
    /// 1-based line of the first character.
    pub line: u32,
    /// 1-based character column of the first character.
    pub column: u32,
}

impl Token {
    /// Returns the coarse category of this token.
    pub fn category(&self) -> TokenCategory {
        self.kind.category()
    }

    /// Returns the text this token covers in `source`.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.span.start as usize..self.span.end as usize]
    }
}

/// Looks up a keyword from an identifier string.
///
/// Returns `None` for regular identifiers. Keywords are case-sensitive.
pub fn lookup_keyword(s: &str) -> Option<SvToken> {
    match s {
        "always" => Some(SvToken::Always),
        "and" => Some(SvToken::And),
        "assign" => Some(SvToken::Assign),
        "automatic" => Some(SvToken::Automatic),
        "begin" => Some(SvToken::Begin),
        "buf" => Some(SvToken::Buf),
        "case" => Some(SvToken::Case),
        "casex" => Some(SvToken::Casex),
        "casez" => Some(SvToken::Casez),
        "default" => Some(SvToken::Default),
        "defparam" => Some(SvToken::Defparam),
        "disable" => Some(SvToken::Disable),
        "edge" => Some(SvToken::Edge),
        "else" => Some(SvToken::Else),
        "end" => Some(SvToken::End),
        "endcase" => Some(SvToken::Endcase),
        "endfunction" => Some(SvToken::Endfunction),
        "endgenerate" => Some(SvToken::Endgenerate),
        "endmodule" => Some(SvToken::Endmodule),
        "endtask" => Some(SvToken::Endtask),
        "for" => Some(SvToken::For),
        "forever" => Some(SvToken::Forever),
        "function" => Some(SvToken::Function),
        "generate" => Some(SvToken::Generate),
        "genvar" => Some(SvToken::Genvar),
        "if" => Some(SvToken::If),
        "initial" => Some(SvToken::Initial),
        "inout" => Some(SvToken::Inout),
        "input" => Some(SvToken::Input),
        "integer" => Some(SvToken::Integer),
        "localparam" => Some(SvToken::Localparam),
        "module" => Some(SvToken::Module),
        "nand" => Some(SvToken::Nand),
        "negedge" => Some(SvToken::Negedge),
        "nor" => Some(SvToken::Nor),
        "not" => Some(SvToken::Not),
        "or" => Some(SvToken::Or),
        "output" => Some(SvToken::Output),
        "parameter" => Some(SvToken::Parameter),
        "posedge" => Some(SvToken::Posedge),
        "real" => Some(SvToken::Real),
        "reg" => Some(SvToken::Reg),
        "repeat" => Some(SvToken::Repeat),
        "signed" => Some(SvToken::Signed),
        "supply0" => Some(SvToken::Supply0),
        "supply1" => Some(SvToken::Supply1),
        "task" => Some(SvToken::Task),
        "tri" => Some(SvToken::Tri),
        "unsigned" => Some(SvToken::Unsigned),
        "wait" => Some(SvToken::Wait),
        "while" => Some(SvToken::While),
        "wire" => Some(SvToken::Wire),
        "xnor" => Some(SvToken::Xnor),
        "xor" => Some(SvToken::Xor),
        "always_comb" => Some(SvToken::AlwaysComb),
        "always_ff" => Some(SvToken::AlwaysFf),
        "always_latch" => Some(SvToken::AlwaysLatch),
        "assert" => Some(SvToken::Assert),
        "assume" => Some(SvToken::Assume),
        "bit" => Some(SvToken::Bit),
        "break" => Some(SvToken::Break),
        "byte" => Some(SvToken::Byte),
        "class" => Some(SvToken::Class),
        "clocking" => Some(SvToken::Clocking),
        "const" => Some(SvToken::Const),
        "continue" => Some(SvToken::Continue),
        "cover" => Some(SvToken::Cover),
        "covergroup" => Some(SvToken::Covergroup),
        "do" => Some(SvToken::Do),
        "endclass" => Some(SvToken::Endclass),
        "endclocking" => Some(SvToken::Endclocking),
        "endgroup" => Some(SvToken::Endgroup),
        "endinterface" => Some(SvToken::Endinterface),
        "endpackage" => Some(SvToken::Endpackage),
        "endprogram" => Some(SvToken::Endprogram),
        "endproperty" => Some(SvToken::Endproperty),
        "endsequence" => Some(SvToken::Endsequence),
        "enum" => Some(SvToken::Enum),
        "export" => Some(SvToken::Export),
        "final" => Some(SvToken::Final),
        "foreach" => Some(SvToken::Foreach),
        "fork" => Some(SvToken::Fork),
        "iff" => Some(SvToken::Iff),
        "import" => Some(SvToken::Import),
        "inside" => Some(SvToken::Inside),
        "int" => Some(SvToken::Int),
        "interface" => Some(SvToken::Interface),
        "join" => Some(SvToken::Join),
        "join_any" => Some(SvToken::JoinAny),
        "join_none" => Some(SvToken::JoinNone),
        "logic" => Some(SvToken::Logic),
        "longint" => Some(SvToken::Longint),
        "modport" => Some(SvToken::Modport),
        "package" => Some(SvToken::Package),
        "packed" => Some(SvToken::Packed),
        "priority" => Some(SvToken::Priority),
        "program" => Some(SvToken::Program),
        "property" => Some(SvToken::Property),
        "ref" => Some(SvToken::Ref),
        "return" => Some(SvToken::Return),
        "sequence" => Some(SvToken::Sequence),
        "shortint" => Some(SvToken::Shortint),
        "static" => Some(SvToken::Static),
        "struct" => Some(SvToken::Struct),
        "type" => Some(SvToken::Type),
        "typedef" => Some(SvToken::Typedef),
        "union" => Some(SvToken::Union),
        "unique" => Some(SvToken::Unique),
        "unique0" => Some(SvToken::Unique0),
        "var" => Some(SvToken::Var),
        "void" => Some(SvToken::Void),
        _ => None,
    }
}

/// Directive names that occupy the rest of their line rather than expanding
/// a macro in place.
pub fn is_line_directive(name: &str) -> bool {
    matches!(
        name,
        "define"
            | "undef"
            | "undefineall"
            | "include"
            | "ifdef"
            | "ifndef"
            | "elsif"
            | "else"
            | "endif"
            | "timescale"
            | "default_nettype"
            | "resetall"
            | "celldefine"
            | "endcelldefine"
            | "line"
            | "pragma"
            | "begin_keywords"
            | "end_keywords"
            | "unconnected_drive"
            | "nounconnected_drive"
    )
}
